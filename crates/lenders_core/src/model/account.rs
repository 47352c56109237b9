//! Account records: users, admins, buyers and lenders.
//!
//! # Responsibility
//! - Share credential and contact data through composition.
//! - Keep the flat JSON layout of the account files (`id`, `username`,
//!   `password`, `first_name`, ...) via `serde(flatten)`.
//!
//! # Invariants
//! - Credentials are compared as opaque strings.
//! - `username` and `password` are never empty on a persisted account.

use super::validation::{check_amount, ValidationError};
use super::{Record, RecordId};
use serde::{Deserialize, Serialize};

/// Login pair carried by every account kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Plaintext comparison against the stored password.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(())
    }
}

/// Identity and contact details shared by user, buyer and lender records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub ssn: String,
    pub email: String,
    pub phone_number: String,
    pub business_name: String,
}

/// Access to the credential pair of an account record.
pub trait Account: Record {
    fn credentials(&self) -> &Credentials;
    fn credentials_mut(&mut self) -> &mut Credentials;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(flatten)]
    pub contact: Contact,
}

/// Platform operator. Carries credentials plus reachability only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: RecordId,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
}

/// Track record counters for a buyer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    /// Units currently under management.
    pub num_units: u32,
    pub num_deals_complete: u32,
    pub num_flips_complete: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    pub id: RecordId,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(flatten)]
    pub portfolio: Portfolio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lender {
    pub id: RecordId,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(flatten)]
    pub contact: Contact,
    pub funds_available: f64,
}

macro_rules! impl_account {
    ($ty:ty) => {
        impl Account for $ty {
            fn credentials(&self) -> &Credentials {
                &self.credentials
            }

            fn credentials_mut(&mut self) -> &mut Credentials {
                &mut self.credentials
            }
        }
    };
}

impl Record for User {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.credentials.validate()
    }
}

impl Record for Admin {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.credentials.validate()
    }
}

impl Record for Buyer {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.credentials.validate()
    }
}

impl Record for Lender {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn validate(&self) -> Result<(), ValidationError> {
        self.credentials.validate()?;
        check_amount("funds_available", self.funds_available)
    }
}

impl_account!(User);
impl_account!(Admin);
impl_account!(Buyer);
impl_account!(Lender);
