//! Address DTOs

use serde::{Deserialize, Serialize};

use domain_records::Address;

/// Address fields; validated by the service after the owner checks
#[derive(Debug, Clone, Deserialize)]
pub struct AddressRequest {
    pub house_number: String,
    pub street_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl From<AddressRequest> for Address {
    fn from(request: AddressRequest) -> Self {
        Address::new(
            request.house_number,
            request.street_name,
            request.city,
            request.state,
            request.zip_code,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: Option<i64>,
    pub house_number: String,
    pub street_name: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub owner: Option<String>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id.map(i64::from),
            house_number: address.house_number,
            street_name: address.street_name,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            owner: address.owner.map(String::from),
        }
    }
}
