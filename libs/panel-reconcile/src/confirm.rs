//! Operator confirmation boundary

use std::collections::VecDeque;

use crate::error::Result;
use crate::types::{Prompt, ReviewEvent};

/// Where the engines get their yes/no/all answers from.
///
/// `ask` blocks until an answer arrives; there is no timeout. The returned
/// line is parsed with [`Prompt::decide`], so the channel never needs to
/// validate it.
pub trait ConfirmationChannel {
    fn ask(&mut self, prompt: &Prompt<'_>) -> Result<String>;

    /// Progress hook, called as rows are classified and written
    fn notify(&mut self, _event: &ReviewEvent<'_>) {}
}

/// Recorded prompt, owned so it outlives the engine's borrow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskedPrompt {
    StartupMismatch { uuid_short: String, diff: String },
    StuckTransfer { transfer_id: i64, server_name: String },
}

/// Channel answering from a fixed script.
///
/// Records what it was asked and notified of. Once the script runs out it
/// answers `n`.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    answers: VecDeque<String>,
    asked: Vec<AskedPrompt>,
    events: Vec<String>,
}

impl ScriptedChannel {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[AskedPrompt] {
        &self.asked
    }

    /// Events in a compact `kind:key` form, e.g. `egg:7:3` or `updated:s2`
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Answers never consumed
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ConfirmationChannel for ScriptedChannel {
    fn ask(&mut self, prompt: &Prompt<'_>) -> Result<String> {
        let recorded = match prompt {
            Prompt::StartupMismatch { server, diff, .. } => AskedPrompt::StartupMismatch {
                uuid_short: server.uuid_short.clone(),
                diff: diff.to_string(),
            },
            Prompt::StuckTransfer {
                transfer,
                server_name,
                ..
            } => AskedPrompt::StuckTransfer {
                transfer_id: transfer.id,
                server_name: server_name.to_string(),
            },
        };
        self.asked.push(recorded);

        Ok(self.answers.pop_front().unwrap_or_else(|| "n".to_string()))
    }

    fn notify(&mut self, event: &ReviewEvent<'_>) {
        let line = match event {
            ReviewEvent::EggLoaded {
                egg_id,
                server_count,
                ..
            } => format!("egg:{}:{}", egg_id, server_count),
            ReviewEvent::ServerMatched { server } => format!("matched:{}", server.uuid_short),
            ReviewEvent::ServerUpdated { server } => format!("updated:{}", server.uuid_short),
            ReviewEvent::ServerSkipped { server } => format!("skipped:{}", server.uuid_short),
            ReviewEvent::EggServersUpdated {
                egg_id,
                rows_affected,
            } => format!("bulk:{}:{}", egg_id, rows_affected),
            ReviewEvent::TransfersScanned { count } => format!("scan:{}", count),
            ReviewEvent::TransferRemoved { transfer } => format!("removed:{}", transfer.id),
            ReviewEvent::TransferRetained { transfer } => format!("retained:{}", transfer.id),
        };
        self.events.push(line);
    }
}
