// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

//! [`reqwest`] client setup shared by the outbound connections

mod reqwest_ext;

pub use self::reqwest_ext::{RequestBuilderExt, client};
