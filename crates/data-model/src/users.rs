// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// The onboarding role recorded for an account in the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// An account tracked by the onboarding flows, subject to retention
    NewHire,

    /// Any other account known to the add-in
    Member,
}

impl UserRole {
    /// Returns `true` if the role is [`NewHire`].
    ///
    /// [`NewHire`]: UserRole::NewHire
    #[must_use]
    pub fn is_new_hire(&self) -> bool {
        matches!(self, Self::NewHire)
    }
}

/// One row of the user store. Owned by the add-in backend; the retention
/// sweeper only ever reads and deletes these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Ulid,

    /// The account's identifier in the tenant directory
    pub directory_id: String,

    pub role: UserRole,

    /// When the add-in was installed for this account
    pub installed_at: DateTime<Utc>,
}

impl UserRecord {
    /// Whether the retention period has elapsed for this record.
    ///
    /// The comparison is strict: a record installed exactly
    /// `retention_days` whole days ago is kept. `now` must be sampled once
    /// per sweep and passed in, so that a long filter pass doesn't skew
    /// eligibility across records.
    #[must_use]
    pub fn retention_elapsed(&self, now: DateTime<Utc>, retention_days: u32) -> bool {
        (now - self.installed_at).num_days() > i64::from(retention_days)
    }
}

impl UserRecord {
    #[doc(hidden)]
    #[must_use]
    pub fn samples(now: chrono::DateTime<Utc>, rng: &mut impl Rng) -> Vec<Self> {
        vec![
            UserRecord {
                id: Ulid::from_datetime_with_source(now.into(), rng),
                directory_id: "4f21e351-96f9-40ca-bb71-6e525ee05d69".to_owned(),
                role: UserRole::NewHire,
                installed_at: now,
            },
            UserRecord {
                id: Ulid::from_datetime_with_source(now.into(), rng),
                directory_id: "7e8d2c10-2bc6-44a1-8f2a-98e5f0b4c8a3".to_owned(),
                role: UserRole::Member,
                installed_at: now,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn record(installed_at: DateTime<Utc>) -> UserRecord {
        UserRecord {
            id: Ulid::nil(),
            directory_id: "00000000-0000-0000-0000-000000000000".to_owned(),
            role: UserRole::NewHire,
            installed_at,
        }
    }

    #[test]
    fn retention_boundary_is_strict() {
        let now = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .to_utc();

        // 31 days ago: one full day past the period
        assert!(record(now - TimeDelta::days(31)).retention_elapsed(now, 30));

        // Exactly 30 days ago: kept
        assert!(!record(now - TimeDelta::days(30)).retention_elapsed(now, 30));

        // Well past the period
        assert!(record(now - TimeDelta::days(45)).retention_elapsed(now, 30));
    }

    #[test]
    fn retention_truncates_partial_days() {
        let now = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .to_utc();

        // 30 days and 23 hours is still "30 days" elapsed
        let installed = now - TimeDelta::days(30) - TimeDelta::hours(23);
        assert!(!record(installed).retention_elapsed(now, 30));

        let installed = now - TimeDelta::days(31) - TimeDelta::hours(1);
        assert!(record(installed).retention_elapsed(now, 30));
    }
}
