//! Actions and the interactive menu around them

use anyhow::{Context, Result};
use dialoguer::{theme::Theme, Input, Select};
use panel_reconcile::{
    ConfirmationChannel, EggId, PanelStore, ReconcileError, StartupReconciler, TransferRemediator,
};
use tracing::debug;

use crate::render::{self, Output};

const ACTIONS: [&str; 3] = [
    "Check egg startup commands",
    "Repair stuck transfers",
    "Exit",
];

/// What the menu does after an action returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub async fn check_startup<S, C>(
    store: &S,
    channel: &mut C,
    egg_id: EggId,
    output: Output,
) -> Result<()>
where
    S: PanelStore + ?Sized,
    C: ConfirmationChannel + ?Sized,
{
    let outcome = StartupReconciler::new(store, channel)
        .reconcile(egg_id)
        .await;
    match outcome {
        Ok(report) => render::print_reconciliation(&report, output),
        Err(e) => recoverable(e).context("Startup check aborted"),
    }
}

pub async fn repair_transfers<S, C>(store: &S, channel: &mut C, output: Output) -> Result<()>
where
    S: PanelStore + ?Sized,
    C: ConfirmationChannel + ?Sized,
{
    let outcome = TransferRemediator::new(store, channel).remediate().await;
    match outcome {
        Ok(report) => render::print_remediation(&report, output),
        Err(e) => recoverable(e).context("Transfer repair aborted"),
    }
}

/// Print errors the session survives; hand back the rest
fn recoverable(err: ReconcileError) -> std::result::Result<(), ReconcileError> {
    if err.is_fatal() {
        return Err(err);
    }
    render::print_error(&err);
    Ok(())
}

/// Loop until the operator picks "Exit". Fatal errors end the loop.
pub async fn run<S, C>(store: &S, channel: &mut C, theme: &dyn Theme, output: Output) -> Result<()>
where
    S: PanelStore + ?Sized,
    C: ConfirmationChannel + ?Sized,
{
    loop {
        if select_and_run(store, channel, theme, output).await? == Flow::Exit {
            return Ok(());
        }
    }
}

async fn select_and_run<S, C>(
    store: &S,
    channel: &mut C,
    theme: &dyn Theme,
    output: Output,
) -> Result<Flow>
where
    S: PanelStore + ?Sized,
    C: ConfirmationChannel + ?Sized,
{
    println!();
    let selection = Select::with_theme(theme)
        .with_prompt("What do you want to do?")
        .items(&ACTIONS)
        .default(0)
        .interact()?;
    debug!("Menu selection: {}", ACTIONS[selection]);

    match selection {
        0 => {
            let egg_id = Input::<EggId>::with_theme(theme)
                .with_prompt("Egg ID")
                .interact_text()?;
            check_startup(store, channel, egg_id, output).await?;
        },
        1 => repair_transfers(store, channel, output).await?,
        _ => return Ok(Flow::Exit),
    }
    Ok(Flow::Continue)
}
