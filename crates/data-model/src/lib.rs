// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

#![allow(clippy::module_name_repetitions)]

//! Domain types shared across the service

pub(crate) mod users;

pub use ulid::Ulid;

pub use self::users::{UserRecord, UserRole};
