//! Use-case services layered over the repositories.
//!
//! # Responsibility
//! - Sequence calls that span more than one store.
//! - Provide the single construction entry point for all stores.
//!
//! # Invariants
//! - Services never bypass repository validation or persistence.
//! - Cross-store references are checked before a dependent write.

pub mod investment_service;
pub mod stores;
