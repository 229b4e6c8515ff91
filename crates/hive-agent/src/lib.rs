// SPDX-FileCopyrightText: 2026 Hive Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Application layer for the Hive knowledge layer.
//!
//! [`HiveApp`] is the process-scoped state: the open store, the
//! repositories, the active session, and the chat and feedback services
//! built on them.

pub mod app;
pub mod chat;
pub mod feedback;
pub mod inflight;
pub mod uploads;

pub use app::{HiveApp, Session};
pub use chat::{ChatService, SendOutcome, SendRequest};
pub use feedback::{FeedbackOutcome, FeedbackProcessor};
pub use inflight::{InFlight, InFlightGuard};
pub use uploads::{PendingFile, UploadBatch};
