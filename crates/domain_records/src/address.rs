//! Postal addresses owned by subjects

use serde::{Deserialize, Serialize};

use core_kernel::{AddressId, AdhaarCardNo};

/// A postal address linked to exactly one subject
///
/// `id` is assigned by the store on insert. `owner` is attached by the
/// address service once the owning subject has been confirmed to exist;
/// the store refuses to persist an address without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: Option<AddressId>,
    pub house_number: String,
    pub street_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub owner: Option<AdhaarCardNo>,
}

impl Address {
    /// Creates an unsaved, unowned address
    pub fn new(
        house_number: impl Into<String>,
        street_name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip_code: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            house_number: house_number.into(),
            street_name: street_name.into(),
            city: city.into(),
            state: state.into(),
            zip_code: zip_code.into(),
            owner: None,
        }
    }

    /// Links the address to its owning subject
    pub fn owned_by(mut self, owner: AdhaarCardNo) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Returns true if the address belongs to `owner`
    pub fn is_owned_by(&self, owner: &AdhaarCardNo) -> bool {
        self.owner.as_ref() == Some(owner)
    }

    /// Places the postal fields under an existing id and owner
    pub fn stored_as(mut self, id: AddressId, owner: AdhaarCardNo) -> Self {
        self.id = Some(id);
        self.owner = Some(owner);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_as_replaces_id_and_owner() {
        let owner = AdhaarCardNo::parse("123456789012").unwrap();
        let other = AdhaarCardNo::parse("210987654321").unwrap();
        let mut replacement = Address::new("22B", "New Street", "Mumbai", "MH", "400001")
            .owned_by(other.clone());
        replacement.id = Some(AddressId::new(99));

        let stored = replacement.stored_as(AddressId::new(7), owner.clone());

        assert_eq!(stored.id, Some(AddressId::new(7)));
        assert_eq!(stored.street_name, "New Street");
        assert!(stored.is_owned_by(&owner));
        assert!(!stored.is_owned_by(&other));
    }
}
