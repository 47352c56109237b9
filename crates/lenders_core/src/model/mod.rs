//! Domain records persisted by the lending backend.
//!
//! # Responsibility
//! - Define the record shapes for accounts, houses and investments.
//! - Own field-level validation so every write path shares one rule set.
//!
//! # Invariants
//! - Every record is identified by a store-assigned `RecordId`.
//! - A record id never changes after creation.
//! - Wire names follow the snake_case JSON layout of the backing files.

pub mod account;
pub mod house;
pub mod investment;
pub mod validation;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validation::ValidationError;

/// Integer identity assigned by the owning store.
pub type RecordId = u32;

/// Common contract for anything a keyed store can hold.
pub trait Record: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> RecordId;

    /// Overwrites identity. Only stores call this, when allocating ids or
    /// pinning the id of a replacement value.
    fn set_id(&mut self, id: RecordId);

    /// Checks field-level rules before the record is persisted.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
