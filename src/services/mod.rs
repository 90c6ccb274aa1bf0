// SPDX-License-Identifier: MIT

//! Services module - sync business logic.

pub mod session;
pub mod sync;

pub use session::{EstablishedSession, SessionManager};
pub use sync::{run_sync_worker, SyncCoordinator};
