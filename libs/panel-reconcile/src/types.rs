//! Panel row snapshots and operator decisions
//!
//! Rows are fetched per run and dropped afterwards; nothing here is cached.

use serde::Serialize;

/// Egg id as stored in `eggs.id`
pub type EggId = i64;

/// Server id as stored in `servers.id`
pub type ServerId = i64;

/// Transfer id as stored in `server_transfers.id`
pub type TransferId = i64;

/// Server row as seen by the startup reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerStartup {
    /// `servers.uuidShort`, the key every single-row update is scoped by
    pub uuid_short: String,
    pub name: String,
    pub startup: String,
}

/// `server_transfers` row whose `successful` column is NULL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StuckTransfer {
    pub id: TransferId,
    pub server_id: ServerId,
}

/// Operator answer to a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Yes,
    No,
    /// Apply to every remaining mismatch of the egg (startup prompts only)
    All,
}

impl Decision {
    /// Parse a raw answer line.
    ///
    /// Case-insensitive; surrounding whitespace is ignored. `a` is only
    /// honoured where `allow_all` is set. Anything unrecognised, including
    /// an empty line, is `No`.
    pub fn parse(answer: &str, allow_all: bool) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" => Decision::Yes,
            "a" if allow_all => Decision::All,
            _ => Decision::No,
        }
    }
}

/// Question put to the operator
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'a> {
    /// A server whose startup differs from its egg's
    StartupMismatch {
        egg_id: EggId,
        server: &'a ServerStartup,
        /// Unified diff, egg startup as "from" and server startup as "to"
        diff: &'a str,
        /// 1-based position in fetch order
        position: usize,
        total: usize,
    },
    /// A transfer that never recorded an outcome
    StuckTransfer {
        transfer: &'a StuckTransfer,
        server_name: &'a str,
        position: usize,
        total: usize,
    },
}

impl Prompt<'_> {
    pub fn question(&self) -> &'static str {
        match self {
            Prompt::StartupMismatch { .. } => {
                "Do you want to update the startup for this server?"
            },
            Prompt::StuckTransfer { .. } => "Do you want to delete this stuck transfer?",
        }
    }

    /// Accepted answer tokens; anything else means no
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            Prompt::StartupMismatch { .. } => &["y", "n", "a"],
            Prompt::StuckTransfer { .. } => &["y", "n"],
        }
    }

    pub fn allows_all(&self) -> bool {
        matches!(self, Prompt::StartupMismatch { .. })
    }

    /// Parse an answer with the choices valid for this prompt
    pub fn decide(&self, answer: &str) -> Decision {
        Decision::parse(answer, self.allows_all())
    }
}

/// Progress notification emitted while an engine walks its rows
#[derive(Debug, Clone, Copy)]
pub enum ReviewEvent<'a> {
    /// Egg and its servers fetched, before any row is checked
    EggLoaded {
        egg_id: EggId,
        startup: &'a str,
        server_count: usize,
    },
    ServerMatched { server: &'a ServerStartup },
    ServerUpdated { server: &'a ServerStartup },
    ServerSkipped { server: &'a ServerStartup },
    EggServersUpdated { egg_id: EggId, rows_affected: u64 },
    /// Stuck transfer scan finished
    TransfersScanned { count: usize },
    TransferRemoved { transfer: &'a StuckTransfer },
    TransferRetained { transfer: &'a StuckTransfer },
}
