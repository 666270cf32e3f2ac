//! Strongly-typed identifiers for domain entities
//!
//! Subjects are keyed by their national identity number (a 12 digit
//! numeral) and addresses by a store-assigned surrogate integer. Newtype
//! wrappers keep the two from being mixed up and guarantee that an
//! `AdhaarCardNo` value is always well-formed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of digits in a national identity number
pub const ADHAAR_CARD_NO_LEN: usize = 12;

/// Errors raised when parsing identifiers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identity number must be exactly {expected} digits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("identity number must contain only ASCII digits: {0}")]
    NonNumeric(String),

    #[error("invalid address id: {0}")]
    InvalidAddressId(String),
}

/// A national identity ("Adhaar card") number
///
/// The primary key of every subject, shared by patients and doctors.
/// Once assigned it is never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AdhaarCardNo(String);

impl AdhaarCardNo {
    /// Parses and validates an identity number
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError` unless the value is exactly 12 ASCII digits
    pub fn parse(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        let actual = value.chars().count();
        if actual != ADHAAR_CARD_NO_LEN {
            return Err(IdentifierError::InvalidLength {
                expected: ADHAAR_CARD_NO_LEN,
                actual,
            });
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentifierError::NonNumeric(value));
        }
        Ok(Self(value))
    }

    /// Builds an identity number from twelve decimal digits
    ///
    /// Each element is reduced modulo 10, so any input yields a valid value.
    pub fn from_digits(digits: [u8; ADHAAR_CARD_NO_LEN]) -> Self {
        Self(digits.iter().map(|d| char::from(b'0' + d % 10)).collect())
    }

    /// Returns the identity number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AdhaarCardNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AdhaarCardNo {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AdhaarCardNo {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AdhaarCardNo> for String {
    fn from(id: AdhaarCardNo) -> String {
        id.0
    }
}

impl AsRef<str> for AdhaarCardNo {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Surrogate key of an address record, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(i64);

impl AddressId {
    /// Wraps a raw key
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw key
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AddressId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| IdentifierError::InvalidAddressId(s.to_string()))
    }
}

impl From<i64> for AddressId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<AddressId> for i64 {
    fn from(id: AddressId) -> i64 {
        id.0
    }
}
