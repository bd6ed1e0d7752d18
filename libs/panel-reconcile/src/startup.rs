//! Egg vs server startup reconciliation

use tracing::info;

use crate::confirm::ConfirmationChannel;
use crate::diff::startup_diff;
use crate::error::Result;
use crate::report::{ReconciliationReport, ReviewStatus};
use crate::store::PanelStore;
use crate::types::{Decision, EggId, Prompt, ReviewEvent};

/// Compares each server of an egg against the egg's startup and asks the
/// operator what to do about every mismatch.
///
/// Rows are visited once, in fetch order. Each write is its own statement;
/// an interrupted run leaves earlier rows committed and later rows untouched.
pub struct StartupReconciler<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    channel: &'a mut C,
}

impl<'a, S, C> StartupReconciler<'a, S, C>
where
    S: PanelStore + ?Sized,
    C: ConfirmationChannel + ?Sized,
{
    pub fn new(store: &'a S, channel: &'a mut C) -> Self {
        Self { store, channel }
    }

    /// Run one reconciliation pass over `egg_id`.
    ///
    /// A missing egg fails with `NotFound` before anything is written. An
    /// egg without servers returns an empty report. Write failures abort the
    /// run; nothing is retried.
    pub async fn reconcile(&mut self, egg_id: EggId) -> Result<ReconciliationReport> {
        let egg_startup = self.store.egg_startup(egg_id).await?;
        let servers = self.store.servers_for_egg(egg_id).await?;

        self.channel.notify(&ReviewEvent::EggLoaded {
            egg_id,
            startup: &egg_startup,
            server_count: servers.len(),
        });

        let mut report = ReconciliationReport::new(egg_id, egg_startup.clone());
        if servers.is_empty() {
            info!("No servers found for egg {}", egg_id);
            return Ok(report);
        }

        let total = servers.len();
        info!("Checking {} servers against egg {}", total, egg_id);

        let mut rows = servers.into_iter().enumerate();
        while let Some((idx, server)) = rows.next() {
            if server.startup == egg_startup {
                self.channel
                    .notify(&ReviewEvent::ServerMatched { server: &server });
                report.push(server, ReviewStatus::Matched);
                continue;
            }

            let diff = startup_diff(&egg_startup, &server.startup);
            let prompt = Prompt::StartupMismatch {
                egg_id,
                server: &server,
                diff: &diff,
                position: idx + 1,
                total,
            };
            let decision = prompt.decide(&self.channel.ask(&prompt)?);

            match decision {
                Decision::Yes => {
                    self.store
                        .update_server_startup(&server.uuid_short, &egg_startup)
                        .await?;
                    self.channel
                        .notify(&ReviewEvent::ServerUpdated { server: &server });
                    report.push(server, ReviewStatus::Updated);
                },
                Decision::No => {
                    info!(
                        "Startup mismatch left in place for server {} ({})",
                        server.uuid_short, server.name
                    );
                    self.channel
                        .notify(&ReviewEvent::ServerSkipped { server: &server });
                    report.push(server, ReviewStatus::Skipped);
                },
                Decision::All => {
                    // The egg value read at the start of the run is the one
                    // applied; rows are not re-read before the bulk write.
                    let rows_affected = self
                        .store
                        .update_egg_servers_startup(egg_id, &egg_startup)
                        .await?;

                    report.promote_skipped();
                    report.push(server, ReviewStatus::UpdatedViaAll);
                    for (_, rest) in rows.by_ref() {
                        let status = if rest.startup == egg_startup {
                            ReviewStatus::Matched
                        } else {
                            ReviewStatus::UpdatedViaAll
                        };
                        report.push(rest, status);
                    }
                    report.bulk_rows_affected = Some(rows_affected);

                    self.channel.notify(&ReviewEvent::EggServersUpdated {
                        egg_id,
                        rows_affected,
                    });
                    break;
                },
            }
        }

        info!(
            "Egg {}: {} matched, {} updated, {} updated via all, {} skipped",
            egg_id,
            report.matched(),
            report.updated(),
            report.updated_via_all(),
            report.skipped()
        );
        Ok(report)
    }
}
