//! Confirmation channel backed by the operator's terminal

use std::io::{self, BufRead, Write};

use colored::Colorize;
use panel_reconcile::{ConfirmationChannel, Prompt, ReviewEvent};
use tracing::warn;

use crate::render::Output;

/// Renders prompts and progress, then reads one answer line from stdin.
///
/// In JSON mode everything goes to stderr so stdout carries only the report.
pub struct TerminalChannel {
    output: Output,
}

impl TerminalChannel {
    pub fn new(output: Output) -> Self {
        Self { output }
    }

    fn writer(&self) -> Box<dyn Write> {
        if self.output.json {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        }
    }
}

impl ConfirmationChannel for TerminalChannel {
    fn ask(&mut self, prompt: &Prompt<'_>) -> panel_reconcile::Result<String> {
        let mut out = self.writer();
        write_prompt(&mut out, prompt)?;
        out.flush()?;

        let mut answer = String::new();
        // EOF leaves the line empty, which counts as "no"
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer)
    }

    fn notify(&mut self, event: &ReviewEvent<'_>) {
        let mut out = self.writer();
        show_event(&mut out, event);
    }
}

/// Progress lines are best effort; a closed terminal must not end the run
fn show_event(out: &mut dyn Write, event: &ReviewEvent<'_>) {
    if let Err(e) = write_event(out, event) {
        warn!("Failed to write progress line: {}", e);
    }
}

pub fn write_prompt(out: &mut dyn Write, prompt: &Prompt<'_>) -> io::Result<()> {
    match prompt {
        Prompt::StartupMismatch {
            server,
            diff,
            position,
            total,
            ..
        } => {
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                format!(
                    "[{}/{}] UUID Short: {}, Name: {}, Startup Mismatch",
                    position, total, server.uuid_short, server.name
                )
                .red()
            )?;
            writeln!(out, "{}", "Difference:".yellow())?;
            for line in diff.lines() {
                writeln!(out, "{}", diff_line(line))?;
            }
        },
        Prompt::StuckTransfer {
            transfer,
            server_name,
            position,
            total,
        } => {
            writeln!(out)?;
            writeln!(
                out,
                "{}",
                format!(
                    "[{}/{}] Stuck transfer ID: {}, Server ID: {}, Server Name: {}",
                    position, total, transfer.id, transfer.server_id, server_name
                )
                .yellow()
            )?;
        },
    }
    write!(out, "{} ({}): ", prompt.question(), prompt.choices().join("/"))
}

fn diff_line(line: &str) -> colored::ColoredString {
    if line.starts_with("---") || line.starts_with("+++") {
        line.bold()
    } else if line.starts_with("@@") {
        line.cyan()
    } else if line.starts_with('-') {
        line.red()
    } else if line.starts_with('+') {
        line.green()
    } else {
        line.yellow()
    }
}

pub fn write_event(out: &mut dyn Write, event: &ReviewEvent<'_>) -> io::Result<()> {
    match event {
        ReviewEvent::EggLoaded {
            egg_id,
            startup,
            server_count,
        } => {
            writeln!(
                out,
                "{} {}",
                format!("Startup value for Egg ID {}:", egg_id).bright_cyan(),
                startup
            )?;
            writeln!(out, "Servers using Egg ID {}: {}", egg_id, server_count)
        },
        ReviewEvent::ServerMatched { server } => writeln!(
            out,
            "{}",
            format!(
                "UUID Short: {}, Name: {}, Startup Matches",
                server.uuid_short, server.name
            )
            .green()
        ),
        ReviewEvent::ServerUpdated { server } => writeln!(
            out,
            "{}",
            format!("Startup updated for server {}", server.uuid_short).green()
        ),
        ReviewEvent::ServerSkipped { server } => writeln!(
            out,
            "{}",
            format!("Server {} left unchanged", server.uuid_short).dimmed()
        ),
        ReviewEvent::EggServersUpdated {
            egg_id,
            rows_affected,
        } => writeln!(
            out,
            "{}",
            format!(
                "Startup updated for all servers of egg {} ({} rows)",
                egg_id, rows_affected
            )
            .green()
        ),
        // an empty scan is reported by the summary alone
        ReviewEvent::TransfersScanned { count: 0 } => Ok(()),
        ReviewEvent::TransfersScanned { count } => {
            writeln!(out, "Found {} stuck transfers", count)
        },
        ReviewEvent::TransferRemoved { transfer } => writeln!(
            out,
            "{}",
            format!("Transfer {} deleted", transfer.id).green()
        ),
        ReviewEvent::TransferRetained { transfer } => writeln!(
            out,
            "{}",
            format!("Transfer {} kept", transfer.id).dimmed()
        ),
    }
}
