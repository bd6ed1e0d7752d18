//! Panel Reconcile - Pterodactyl panel database repair engines
//!
//! Two operator-driven reconciliation passes over a panel database:
//! - Startup: compare every server's startup command with its egg's and
//!   update the mismatches the operator confirms (one at a time or all at once)
//! - Transfers: find `server_transfers` rows that never recorded an outcome
//!   and delete the ones the operator confirms
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ StartupReconciler│────▶│  PanelStore  │────▶│ MySQL / SQLite│
//! │TransferRemediator│     │ (sqlx Any)   │     │  (panel db)   │
//! └──────────────────┘     └──────────────┘     └───────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │ConfirmationChannel │  terminal, or scripted in tests
//! └────────────────────┘
//! ```

mod confirm;
pub mod diff;
mod error;
mod report;
mod startup;
mod store;
mod transfers;
pub mod types;

// Re-export public API
pub use confirm::{AskedPrompt, ConfirmationChannel, ScriptedChannel};
pub use diff::startup_diff;
pub use error::{EntityKind, ReconcileError, Result};
pub use report::{
    ReconciliationReport, RemediationReport, ReviewStatus, ServerReview, TransferReview,
};
pub use startup::StartupReconciler;
pub use store::{PanelStore, SqlPanelStore};
pub use transfers::TransferRemediator;

pub use types::{Decision, EggId, Prompt, ReviewEvent, ServerId, ServerStartup, StuckTransfer};
