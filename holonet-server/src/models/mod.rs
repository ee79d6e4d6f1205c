//! Domain models
//!
//! Catalog records, users and favorites, plus the payload parsing that
//! turns request bodies into validated inserts and patches.

pub mod validation;
pub mod catalog;
pub mod payload;
pub mod user;
pub mod favorite;

pub use validation::ValidationError;
pub use catalog::{CatalogEntity, Person, Planet};
pub use payload::{NewRecord, RecordPatch};
pub use user::{User, UserId};
pub use favorite::{Favorite, FavoriteTarget, FavoriteView, TargetKind};
