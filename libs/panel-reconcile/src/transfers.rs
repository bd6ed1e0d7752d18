//! Stuck transfer detection and removal

use tracing::info;

use crate::confirm::ConfirmationChannel;
use crate::error::{ReconcileError, Result};
use crate::report::{RemediationReport, TransferReview};
use crate::store::PanelStore;
use crate::types::{Decision, Prompt, ReviewEvent};

/// Walks transfers with no recorded outcome and deletes the ones the
/// operator confirms as abandoned.
///
/// Deliberately one row at a time: there is no delete-all answer here.
pub struct TransferRemediator<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    channel: &'a mut C,
}

impl<'a, S, C> TransferRemediator<'a, S, C>
where
    S: PanelStore + ?Sized,
    C: ConfirmationChannel + ?Sized,
{
    pub fn new(store: &'a S, channel: &'a mut C) -> Self {
        Self { store, channel }
    }

    /// Run one scan.
    ///
    /// A transfer whose server row is gone aborts the run with
    /// `OrphanedTransfer` instead of being skipped.
    pub async fn remediate(&mut self) -> Result<RemediationReport> {
        let stuck = self.store.stuck_transfers().await?;
        self.channel
            .notify(&ReviewEvent::TransfersScanned { count: stuck.len() });

        let mut report = RemediationReport::default();
        if stuck.is_empty() {
            info!("No stuck transfers found");
            return Ok(report);
        }

        let total = stuck.len();
        info!("Found {} stuck transfers", total);

        for (idx, transfer) in stuck.into_iter().enumerate() {
            let server_name = match self.store.server_name(transfer.server_id).await {
                Ok(name) => name,
                Err(ReconcileError::NotFound { .. }) => {
                    return Err(ReconcileError::OrphanedTransfer {
                        transfer_id: transfer.id,
                        server_id: transfer.server_id,
                    });
                },
                Err(e) => return Err(e),
            };

            let prompt = Prompt::StuckTransfer {
                transfer: &transfer,
                server_name: &server_name,
                position: idx + 1,
                total,
            };
            let removed = match prompt.decide(&self.channel.ask(&prompt)?) {
                Decision::Yes => {
                    self.store.delete_transfer(transfer.id).await?;
                    self.channel
                        .notify(&ReviewEvent::TransferRemoved {
                            transfer: &transfer,
                        });
                    true
                },
                Decision::No | Decision::All => {
                    info!(
                        "Stuck transfer {} for server {} retained",
                        transfer.id, transfer.server_id
                    );
                    self.channel
                        .notify(&ReviewEvent::TransferRetained {
                            transfer: &transfer,
                        });
                    false
                },
            };

            report.transfers.push(TransferReview {
                transfer,
                server_name,
                removed,
            });
        }

        info!(
            "Transfers: {} visited, {} removed, {} retained",
            report.visited(),
            report.removed(),
            report.retained()
        );
        Ok(report)
    }
}
