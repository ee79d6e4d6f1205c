//! Route handlers organized by resource

pub mod health;
pub mod catalog;
pub mod users;
pub mod favorites;

use serde::Serialize;

/// Plain confirmation body for deletes: `{"msg": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}
