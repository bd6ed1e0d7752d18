//! Run reports

use serde::Serialize;

use crate::types::{EggId, ServerStartup, StuckTransfer};

/// What happened to one server during a startup run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Startup already equal to the egg's
    Matched,
    /// Updated after a `y`
    Updated,
    /// Left mismatched after a `n` (or anything unrecognised)
    Skipped,
    /// Covered by the egg-wide update after an `a`
    UpdatedViaAll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerReview {
    pub server: ServerStartup,
    pub status: ReviewStatus,
}

/// Outcome of one [`StartupReconciler`](crate::StartupReconciler) run
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub egg_id: EggId,
    pub egg_startup: String,
    /// Servers in fetch order
    pub servers: Vec<ServerReview>,
    /// Rows touched by the egg-wide update, if `a` was chosen
    pub bulk_rows_affected: Option<u64>,
}

impl ReconciliationReport {
    pub fn new(egg_id: EggId, egg_startup: String) -> Self {
        Self {
            egg_id,
            egg_startup,
            servers: Vec::new(),
            bulk_rows_affected: None,
        }
    }

    /// No server references the egg
    pub fn no_servers_found(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn matched(&self) -> usize {
        self.count(ReviewStatus::Matched)
    }

    pub fn updated(&self) -> usize {
        self.count(ReviewStatus::Updated)
    }

    pub fn skipped(&self) -> usize {
        self.count(ReviewStatus::Skipped)
    }

    pub fn updated_via_all(&self) -> usize {
        self.count(ReviewStatus::UpdatedViaAll)
    }

    /// Mismatches that ended up matching the egg
    pub fn resolved(&self) -> usize {
        self.updated() + self.updated_via_all()
    }

    fn count(&self, status: ReviewStatus) -> usize {
        self.servers.iter().filter(|r| r.status == status).count()
    }

    pub(crate) fn push(&mut self, server: ServerStartup, status: ReviewStatus) {
        self.servers.push(ServerReview { server, status });
    }

    /// Servers skipped earlier in the run are caught by the egg-wide update
    pub(crate) fn promote_skipped(&mut self) {
        for review in &mut self.servers {
            if review.status == ReviewStatus::Skipped {
                review.status = ReviewStatus::UpdatedViaAll;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferReview {
    pub transfer: StuckTransfer,
    pub server_name: String,
    pub removed: bool,
}

/// Outcome of one [`TransferRemediator`](crate::TransferRemediator) run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemediationReport {
    /// Stuck transfers in fetch order
    pub transfers: Vec<TransferReview>,
}

impl RemediationReport {
    pub fn no_stuck_transfers(&self) -> bool {
        self.transfers.is_empty()
    }

    pub fn visited(&self) -> usize {
        self.transfers.len()
    }

    pub fn removed(&self) -> usize {
        self.transfers.iter().filter(|t| t.removed).count()
    }

    pub fn retained(&self) -> usize {
        self.visited() - self.removed()
    }
}
