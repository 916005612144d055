// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::Figment;
use tracing::{info, warn};

use crate::{sections::RetentionConfig, util::ConfigurationSectionExt};

type FigmentLoader = Box<dyn Fn() -> Figment + Send + Sync>;

/// Hands out the current retention policy, re-reading it from the
/// configuration source on demand.
///
/// The watcher keeps the last good value: if a reload fails, readers keep
/// seeing the previous policy until the configuration is fixed.
pub struct RetentionWatcher {
    loader: FigmentLoader,
    current: ArcSwap<RetentionConfig>,
}

impl RetentionWatcher {
    /// Create a watcher from a closure assembling a fresh [`Figment`] from
    /// the configuration source.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial configuration can't be loaded.
    pub fn new(
        loader: impl Fn() -> Figment + Send + Sync + 'static,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let initial = RetentionConfig::extract_or_default(&loader())?;

        Ok(Self {
            loader: Box::new(loader),
            current: ArcSwap::from_pointee(initial),
        })
    }

    /// Re-read the retention policy from the configuration source.
    ///
    /// Keeps the previous value if the source can't be read anymore.
    pub fn reload(&self) {
        match RetentionConfig::extract_or_default(&(self.loader)()) {
            Ok(config) => {
                let previous = self.current.swap(Arc::new(config.clone()));
                if *previous != config {
                    info!(
                        old = previous.new_hire_period_days,
                        new = config.new_hire_period_days,
                        "Retention period changed"
                    );
                }
            }

            Err(error) => {
                warn!(%error, "Failed to reload the retention configuration, keeping the previous value");
            }
        }
    }

    /// The currently configured retention period, in days
    #[must_use]
    pub fn new_hire_period_days(&self) -> u32 {
        self.current.load().new_hire_period_days
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use figment::providers::Serialized;
    use serde_json::json;

    use super::*;

    #[test]
    fn reload_picks_up_changes() {
        let days = Arc::new(AtomicU32::new(30));

        let loader_days = Arc::clone(&days);
        let watcher = RetentionWatcher::new(move || {
            Figment::from(Serialized::defaults(json!({
                "retention": {
                    "new_hire_period_days": loader_days.load(Ordering::Relaxed),
                },
            })))
        })
        .unwrap();

        assert_eq!(watcher.new_hire_period_days(), 30);

        // The new value only becomes visible after a reload
        days.store(7, Ordering::Relaxed);
        assert_eq!(watcher.new_hire_period_days(), 30);

        watcher.reload();
        assert_eq!(watcher.new_hire_period_days(), 7);
    }

    #[test]
    fn reload_keeps_the_last_good_value() {
        let valid = Arc::new(AtomicU32::new(1));

        let loader_valid = Arc::clone(&valid);
        let watcher = RetentionWatcher::new(move || {
            if loader_valid.load(Ordering::Relaxed) == 1 {
                Figment::from(Serialized::defaults(json!({
                    "retention": { "new_hire_period_days": 15 },
                })))
            } else {
                Figment::from(Serialized::defaults(json!({
                    "retention": { "new_hire_period_days": "not a number" },
                })))
            }
        })
        .unwrap();

        assert_eq!(watcher.new_hire_period_days(), 15);

        valid.store(0, Ordering::Relaxed);
        watcher.reload();
        assert_eq!(watcher.new_hire_period_days(), 15);
    }

    #[test]
    fn a_missing_section_falls_back_to_defaults() {
        let watcher = RetentionWatcher::new(Figment::new).unwrap();
        assert_eq!(watcher.new_hire_period_days(), 30);
    }
}
