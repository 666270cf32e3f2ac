//! Address service
//!
//! Every mutation first confirms that the owning subject exists. Reads
//! never fail for a missing owner; they simply find nothing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use core_kernel::{AddressId, AdhaarCardNo};

use crate::address::Address;
use crate::error::RecordsError;
use crate::ports::RecordStore;
use crate::transaction::{run_in_transaction, TransactionPolicy, DEFAULT_INSERT_TIMEOUT};
use crate::validation::AddressValidator;

/// Creates, queries, updates and removes the addresses of a subject
#[derive(Clone)]
pub struct AddressService {
    store: Arc<dyn RecordStore>,
    insert_timeout: Duration,
}

impl AddressService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            insert_timeout: DEFAULT_INSERT_TIMEOUT,
        }
    }

    /// Overrides the bound on `add_address`
    pub fn with_insert_timeout(mut self, timeout: Duration) -> Self {
        self.insert_timeout = timeout;
        self
    }

    /// Stores a new address for `owner`
    ///
    /// # Arguments
    ///
    /// * `owner` - Identity number of the owning subject
    /// * `address` - The address; any id it carries is ignored
    ///
    /// # Returns
    ///
    /// The stored address with its generated id
    ///
    /// # Errors
    ///
    /// * `NullInput` if `address` is `None`
    /// * `SubjectNotFound` if no subject has identity number `owner`
    /// * `Validation` listing every failing field
    #[instrument(skip(self, owner, address), fields(owner = %owner))]
    pub async fn add_address(
        &self,
        owner: &AdhaarCardNo,
        address: Option<Address>,
    ) -> Result<Address, RecordsError> {
        let owner = owner.clone();
        let policy = TransactionPolicy::read_write().with_timeout(self.insert_timeout);

        let saved = run_in_transaction(self.store.as_ref(), &policy, "add_address", |tx| {
            Box::pin(async move {
                let mut address = address.ok_or_else(|| RecordsError::null_input("Address"))?;
                if !tx.subject_exists(&owner).await? {
                    return Err(RecordsError::subject_not_found(&owner));
                }
                AddressValidator::validate(&address).into_result()?;

                address.id = None;
                address.owner = Some(owner);
                Ok(tx.save_address(address).await?)
            })
        })
        .await
        .inspect_err(|e| {
            if e.is_not_found() {
                warn!("Address rejected for unknown owner");
            }
        })?;

        info!(address_id = ?saved.id, "Address added");
        Ok(saved)
    }

    /// Returns every address owned by `owner`, empty if there are none
    #[instrument(skip(self, owner), fields(owner = %owner))]
    pub async fn get_all_addresses(&self, owner: &AdhaarCardNo) -> Result<Vec<Address>, RecordsError> {
        let owner = owner.clone();
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_all_addresses",
            |tx| Box::pin(async move { Ok(tx.find_addresses_by_owner(&owner).await?) }),
        )
        .await
    }

    /// Returns the address matching both `owner` and `address_id`
    ///
    /// # Errors
    ///
    /// `NotFound` if no address matches both
    #[instrument(skip(self, owner), fields(owner = %owner))]
    pub async fn get_address_by_id(
        &self,
        owner: &AdhaarCardNo,
        address_id: AddressId,
    ) -> Result<Address, RecordsError> {
        let owner = owner.clone();
        run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_only(),
            "get_address_by_id",
            |tx| {
                Box::pin(async move {
                    tx.find_address_for_owner(address_id, &owner)
                        .await?
                        .ok_or_else(|| RecordsError::not_found("Address", address_id))
                })
            },
        )
        .await
    }

    /// Overwrites every postal field of an existing address
    ///
    /// # Errors
    ///
    /// * `NullInput` if `address` is `None`
    /// * `SubjectNotFound` if the owner does not exist
    /// * `NotFound` if no address matches `(address_id, owner)`
    /// * `Validation` listing every failing field
    #[instrument(skip(self, owner, address), fields(owner = %owner))]
    pub async fn update_address(
        &self,
        owner: &AdhaarCardNo,
        address_id: AddressId,
        address: Option<Address>,
    ) -> Result<Address, RecordsError> {
        let owner = owner.clone();

        let updated = run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_write(),
            "update_address",
            |tx| {
                Box::pin(async move {
                    let replacement = address.ok_or_else(|| RecordsError::null_input("Address"))?;
                    if !tx.subject_exists(&owner).await? {
                        return Err(RecordsError::subject_not_found(&owner));
                    }
                    if !tx.address_exists_for_owner(address_id, &owner).await? {
                        return Err(RecordsError::not_found("Address", address_id));
                    }
                    AddressValidator::validate(&replacement).into_result()?;

                    Ok(tx.save_address(replacement.stored_as(address_id, owner)).await?)
                })
            },
        )
        .await?;

        info!(address_id = %address_id, "Address updated");
        Ok(updated)
    }

    /// Removes the address matching `(address_id, owner)`
    ///
    /// Returns false without error when the owner or the address is missing.
    #[instrument(skip(self, owner), fields(owner = %owner))]
    pub async fn delete_address(
        &self,
        owner: &AdhaarCardNo,
        address_id: AddressId,
    ) -> Result<bool, RecordsError> {
        let owner = owner.clone();
        let deleted = run_in_transaction(
            self.store.as_ref(),
            &TransactionPolicy::read_write(),
            "delete_address",
            |tx| {
                Box::pin(async move {
                    if !tx.subject_exists(&owner).await? {
                        return Ok(false);
                    }
                    Ok(tx.delete_address_for_owner(address_id, &owner).await?)
                })
            },
        )
        .await?;

        if deleted {
            info!(address_id = %address_id, "Address deleted");
        } else {
            debug!(address_id = %address_id, "No address to delete");
        }
        Ok(deleted)
    }
}
