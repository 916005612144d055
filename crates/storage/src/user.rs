// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! The [`UserStore`] trait, implemented by user store backends

use std::sync::Arc;

use tenure_data_model::{UserRecord, UserRole};

/// A connection to the store holding the add-in's user records.
///
/// The store is non-transactional: each operation stands on its own, and the
/// batch delete is only as atomic as the backend makes it.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch all records with the given role.
    ///
    /// Returns an empty list if the store knows no such records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or replied with an
    /// unexpected payload.
    async fn list_users(&self, role: UserRole) -> Result<Vec<UserRecord>, anyhow::Error>;

    /// Delete the given records from the store, as a single batch.
    ///
    /// The batch fails as a unit: on error, none of the records should be
    /// assumed deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or rejected the batch.
    async fn delete_users(&self, records: &[UserRecord]) -> Result<(), anyhow::Error>;
}

#[async_trait::async_trait]
impl<S: UserStore + Send + Sync + ?Sized> UserStore for &S {
    async fn list_users(&self, role: UserRole) -> Result<Vec<UserRecord>, anyhow::Error> {
        (**self).list_users(role).await
    }

    async fn delete_users(&self, records: &[UserRecord]) -> Result<(), anyhow::Error> {
        (**self).delete_users(records).await
    }
}

#[async_trait::async_trait]
impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    async fn list_users(&self, role: UserRole) -> Result<Vec<UserRecord>, anyhow::Error> {
        (**self).list_users(role).await
    }

    async fn delete_users(&self, records: &[UserRecord]) -> Result<(), anyhow::Error> {
        (**self).delete_users(records).await
    }
}
