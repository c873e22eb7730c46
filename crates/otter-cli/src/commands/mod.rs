// Copyright 2026 Otter Contributors
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `migrate up`: Apply pending migrations
//! - `migrate status`: Report applied and pending migrations
//! - `migrate new`: Scaffold a new migration

/// Migration commands.
pub mod migrate;
