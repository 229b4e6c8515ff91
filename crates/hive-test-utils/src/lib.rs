// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hive integration tests.
//!
//! - [`MockBackend`]: scripted model backend with request capture and an
//!   optional gate that holds a generation in flight.
//! - [`TestHarness`]: a temp database with a fully wired [`HiveApp`].
//!
//! [`HiveApp`]: hive_agent::HiveApp

pub mod harness;
pub mod mock_backend;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_backend::{MockBackend, MockReply};
