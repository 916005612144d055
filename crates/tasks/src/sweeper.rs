// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! The retention sweep loop

use std::time::Duration;

use anyhow::Context as _;
use tenure_data_model::{UserRecord, UserRole};
use tenure_directory::{AccessToken, DirectoryConnection as _, TokenService as _};
use tenure_storage::{Clock as _, UserStore as _};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::State;

/// How long to wait between two sweep cycles. This is intentionally short
/// and unrelated to the retention period: a failed cycle gets retried on the
/// next tick.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// What a single sweep cycle did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// How many new hire records the store returned
    pub scanned: usize,

    /// How many of them were past the retention period
    pub eligible: usize,

    /// How many users no longer have the app installed, whether we removed
    /// it or it was already gone
    pub revoked: usize,

    /// How many records were deleted from the store
    pub deleted: usize,
}

/// Run sweep cycles until the cancellation token is triggered.
///
/// A failing cycle is logged and does not stop the loop.
pub(crate) async fn run(state: State, cancellation_token: CancellationToken) {
    info!("Retention sweeper started");

    while !cancellation_token.is_cancelled() {
        if let Err(e) = sweep_once(&state).await {
            let error: &(dyn std::error::Error + 'static) = e.as_ref();
            error!(error, "Retention sweep failed");
        }

        tokio::select! {
            () = cancellation_token.cancelled() => break,
            () = tokio::time::sleep(SWEEP_INTERVAL) => {}
        }
    }

    info!("Retention sweeper stopped");
}

/// One sweep cycle: list new hires, filter the ones past the retention
/// period, revoke the app for each of them in order, then delete the swept
/// records from the store.
#[tracing::instrument(name = "task.retention_sweep", skip_all)]
async fn sweep_once(state: &State) -> Result<SweepOutcome, anyhow::Error> {
    // Pick up edits to the retention section. A change made while a cycle is
    // running only applies from the next cycle onwards.
    state.retention().reload();

    let mut outcome = SweepOutcome::default();

    let Some(token) = state
        .token_service()
        .obtain_app_token()
        .await
        .context("Failed to obtain an application token")?
    else {
        info!("Token service did not hand out an application token, skipping this cycle");
        return Ok(outcome);
    };

    let records = state
        .store()
        .list_users(UserRole::NewHire)
        .await
        .context("Failed to list new hire records")?;
    outcome.scanned = records.len();

    if records.is_empty() {
        debug!("No new hire records in the store");
        return Ok(outcome);
    }

    // Sampled once, so that a slow pass doesn't skew eligibility between the
    // first and the last record
    let now = state.clock().now();
    let retention_days = state.retention().new_hire_period_days();

    let eligible: Vec<UserRecord> = records
        .into_iter()
        .filter(|record| record.retention_elapsed(now, retention_days))
        .collect();
    outcome.eligible = eligible.len();

    if eligible.is_empty() {
        debug!(
            scanned = outcome.scanned,
            retention_days, "No new hire past the retention period"
        );
        return Ok(outcome);
    }

    // Revoke one user at a time. On a failure, the remaining records are
    // left in the store and picked up again on the next cycle.
    let mut revoked: Vec<UserRecord> = Vec::with_capacity(eligible.len());
    let mut failure = None;
    for record in eligible {
        match revoke_for(state, &token, &record).await {
            Ok(()) => revoked.push(record),
            Err(e) => {
                failure = Some(e.context(format!(
                    "Failed to revoke the app for user {}",
                    record.directory_id
                )));
                break;
            }
        }
    }
    outcome.revoked = revoked.len();

    // Only records whose app access is gone get deleted; revoking first
    // means a crash here leaves rows behind to re-sweep, never users with a
    // deleted row but a live installation
    if !revoked.is_empty() {
        state
            .store()
            .delete_users(&revoked)
            .await
            .context("Failed to delete swept records from the store")?;
        outcome.deleted = revoked.len();
    }

    if let Some(e) = failure {
        return Err(e);
    }

    info!(
        scanned = outcome.scanned,
        eligible = outcome.eligible,
        revoked = outcome.revoked,
        deleted = outcome.deleted,
        "Retention sweep complete"
    );

    Ok(outcome)
}

/// Make sure the app is no longer installed for the given record's user.
///
/// A user without an installation counts as already revoked, so that someone
/// who uninstalled by hand doesn't wedge the sweep forever.
async fn revoke_for(
    state: &State,
    token: &AccessToken,
    record: &UserRecord,
) -> Result<(), anyhow::Error> {
    let Some(installation) = state
        .directory()
        .find_installed_app(token, &record.directory_id)
        .await?
    else {
        debug!(
            user = record.directory_id,
            "App is not installed, nothing to revoke"
        );
        return Ok(());
    };

    state
        .directory()
        .revoke_installed_app(token, &record.directory_id, &installation)
        .await
}
