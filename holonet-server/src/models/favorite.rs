//! Favorites - a user's link to exactly one person or planet

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use super::{Person, Planet, UserId};

/// Which catalog table a favorite points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    People,
    Planet,
}

impl TargetKind {
    /// Path segment form (`people` / `planet`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Planet => "planet",
        }
    }

    /// Parse a path segment.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "people" => Some(Self::People),
            "planet" => Some(Self::Planet),
            _ => None,
        }
    }

    /// Column in `favorites` holding the reference
    pub fn column(&self) -> &'static str {
        match self {
            Self::People => "people_id",
            Self::Planet => "planet_id",
        }
    }

    /// Singular resource name used in messages
    pub fn resource(&self) -> &'static str {
        match self {
            Self::People => "person",
            Self::Planet => "planet",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FavoriteTarget {
    pub kind: TargetKind,
    pub id: i64,
}

impl FavoriteTarget {
    pub fn new(kind: TargetKind, id: i64) -> Self {
        Self { kind, id }
    }

    pub fn people(id: i64) -> Self {
        Self::new(TargetKind::People, id)
    }

    pub fn planet(id: i64) -> Self {
        Self::new(TargetKind::Planet, id)
    }

    /// Rebuild the target from the two reference columns.
    ///
    /// Returns `None` unless exactly one column is set.
    pub fn from_columns(people_id: Option<i64>, planet_id: Option<i64>) -> Option<Self> {
        match (people_id, planet_id) {
            (Some(id), None) => Some(Self::people(id)),
            (None, Some(id)) => Some(Self::planet(id)),
            _ => None,
        }
    }

    fn people_id(&self) -> Option<i64> {
        (self.kind == TargetKind::People).then_some(self.id)
    }

    fn planet_id(&self) -> Option<i64> {
        (self.kind == TargetKind::Planet).then_some(self.id)
    }
}

/// Favorite record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub id: i64,
    pub user_id: UserId,
    pub target: FavoriteTarget,
}

impl<'r> FromRow<'r, SqliteRow> for Favorite {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let people_id: Option<i64> = row.try_get("people_id")?;
        let planet_id: Option<i64> = row.try_get("planet_id")?;
        let target = FavoriteTarget::from_columns(people_id, planet_id)
            .ok_or_else(|| sqlx::Error::Decode("favorite must reference exactly one target".into()))?;

        Ok(Self {
            id: row.try_get("id")?,
            user_id: UserId(row.try_get("user_id")?),
            target,
        })
    }
}

/// Favorite with its target record expanded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteView {
    pub id: i64,
    pub user_id: UserId,
    pub planet_id: Option<i64>,
    pub people_id: Option<i64>,
    pub planet: Option<Planet>,
    pub people: Option<Person>,
}

impl FavoriteView {
    /// Expand a favorite. Targets that do not match the favorite's kind
    /// are dropped.
    pub fn new(favorite: Favorite, people: Option<Person>, planet: Option<Planet>) -> Self {
        let target = favorite.target;
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            planet_id: target.planet_id(),
            people_id: target.people_id(),
            planet: planet.filter(|_| target.kind == TargetKind::Planet),
            people: people.filter(|_| target.kind == TargetKind::People),
        }
    }
}
