//! Catalog records - people and planets
//!
//! Both kinds share the same shape: an integer id, a required `name` and
//! a fixed set of optional free-text attributes. `CatalogEntity` describes
//! that shape so one repository and one set of handlers serve both.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;

use super::TargetKind;

/// A catalog record kind stored in its own table.
pub trait CatalogEntity:
    for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Sync + Unpin + 'static
{
    /// Table holding the records
    const TABLE: &'static str;

    /// Singular resource name used in messages
    const RESOURCE: &'static str;

    /// Optional free-text columns, in serialization order
    const ATTRIBUTES: &'static [&'static str];

    /// Favorite target kind that references this entity
    const TARGET: TargetKind;

    fn id(&self) -> i64;

    /// Column list for SELECT and RETURNING clauses.
    fn columns() -> String {
        let mut columns = vec!["id", "name"];
        columns.extend_from_slice(Self::ATTRIBUTES);
        columns.join(", ")
    }
}

/// Biographical record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub height: Option<String>,
    pub mass: Option<String>,
    pub hair_color: Option<String>,
    pub skin_color: Option<String>,
    pub eye_color: Option<String>,
    pub birth_year: Option<String>,
    pub gender: Option<String>,
}

impl CatalogEntity for Person {
    const TABLE: &'static str = "people";
    const RESOURCE: &'static str = "person";
    const ATTRIBUTES: &'static [&'static str] = &[
        "height",
        "mass",
        "hair_color",
        "skin_color",
        "eye_color",
        "birth_year",
        "gender",
    ];
    const TARGET: TargetKind = TargetKind::People;

    fn id(&self) -> i64 {
        self.id
    }
}

/// Astronomical record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub climate: Option<String>,
    pub population: Option<String>,
    pub terrain: Option<String>,
    pub diameter: Option<String>,
    pub rotation_period: Option<String>,
    pub orbital_period: Option<String>,
}

impl CatalogEntity for Planet {
    const TABLE: &'static str = "planets";
    const RESOURCE: &'static str = "planet";
    const ATTRIBUTES: &'static [&'static str] = &[
        "climate",
        "population",
        "terrain",
        "diameter",
        "rotation_period",
        "orbital_period",
    ];
    const TARGET: TargetKind = TargetKind::Planet;

    fn id(&self) -> i64 {
        self.id
    }
}
