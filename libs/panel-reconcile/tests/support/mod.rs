//! Shared fixtures: a seeded in-memory SQLite panel and an in-memory store
//! double that can be told to fail.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use panel_reconcile::{
    EntityKind, PanelStore, ReconcileError, Result, ServerStartup, SqlPanelStore, StuckTransfer,
};

const EGGS_TABLE: &str = "CREATE TABLE eggs (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    startup TEXT NOT NULL
)";

const TRANSFERS_TABLE: &str = "CREATE TABLE server_transfers (
    id INTEGER PRIMARY KEY,
    server_id INTEGER NOT NULL,
    successful INTEGER NULL
)";

fn servers_table(startup_collation: &str) -> String {
    format!(
        "CREATE TABLE servers (
            id INTEGER PRIMARY KEY,
            uuidShort TEXT NOT NULL,
            name TEXT NOT NULL,
            egg_id INTEGER NOT NULL,
            startup TEXT NOT NULL COLLATE {}
        )",
        startup_collation
    )
}

/// Connect to a fresh in-memory SQLite database with the panel tables
pub async fn panel_db() -> SqlPanelStore {
    panel_db_with_collation("BINARY").await
}

/// Panel tables with `servers.startup` compared under `collation`.
///
/// `RTRIM` ignores trailing spaces the way MySQL's PAD SPACE collations do;
/// `NOCASE` ignores ASCII case like `utf8mb4_unicode_ci`.
pub async fn panel_db_with_collation(collation: &str) -> SqlPanelStore {
    let store = SqlPanelStore::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    for statement in [
        EGGS_TABLE.to_string(),
        servers_table(collation),
        TRANSFERS_TABLE.to_string(),
    ] {
        sqlx::query(&statement)
            .execute(store.pool())
            .await
            .expect("Failed to create panel table");
    }

    store
}

pub async fn insert_egg(store: &SqlPanelStore, id: i64, startup: &str) {
    sqlx::query("INSERT INTO eggs (id, name, startup) VALUES (?, ?, ?)")
        .bind(id)
        .bind(format!("egg-{}", id))
        .bind(startup)
        .execute(store.pool())
        .await
        .expect("Failed to insert egg");
}

pub async fn insert_server(
    store: &SqlPanelStore,
    id: i64,
    uuid_short: &str,
    name: &str,
    egg_id: i64,
    startup: &str,
) {
    sqlx::query(
        "INSERT INTO servers (id, uuidShort, name, egg_id, startup) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(uuid_short)
    .bind(name)
    .bind(egg_id)
    .bind(startup)
    .execute(store.pool())
    .await
    .expect("Failed to insert server");
}

/// Insert an egg whose `startup` is stored as a BLOB value
pub async fn insert_egg_blob(store: &SqlPanelStore, id: i64, startup: &str) {
    sqlx::query("INSERT INTO eggs (id, name, startup) VALUES (?, ?, ?)")
        .bind(id)
        .bind(format!("egg-{}", id))
        .bind(startup.as_bytes().to_vec())
        .execute(store.pool())
        .await
        .expect("Failed to insert egg");
}

/// Insert a server whose `startup` is stored as a BLOB value
pub async fn insert_server_blob(
    store: &SqlPanelStore,
    id: i64,
    uuid_short: &str,
    egg_id: i64,
    startup: &str,
) {
    sqlx::query(
        "INSERT INTO servers (id, uuidShort, name, egg_id, startup) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(uuid_short)
    .bind(format!("server-{}", id))
    .bind(egg_id)
    .bind(startup.as_bytes().to_vec())
    .execute(store.pool())
    .await
    .expect("Failed to insert server");
}

/// `successful` of `None` leaves the column NULL
pub async fn insert_transfer(
    store: &SqlPanelStore,
    id: i64,
    server_id: i64,
    successful: Option<bool>,
) {
    let flag = match successful {
        Some(true) => "1",
        Some(false) => "0",
        None => "NULL",
    };
    let sql = format!(
        "INSERT INTO server_transfers (id, server_id, successful) VALUES (?, ?, {})",
        flag
    );
    sqlx::query(&sql)
        .bind(id)
        .bind(server_id)
        .execute(store.pool())
        .await
        .expect("Failed to insert transfer");
}

pub async fn server_startup(store: &SqlPanelStore, uuid_short: &str) -> String {
    sqlx::query_scalar("SELECT startup FROM servers WHERE uuidShort = ?")
        .bind(uuid_short)
        .fetch_one(store.pool())
        .await
        .expect("Failed to read server startup")
}

pub async fn transfer_ids(store: &SqlPanelStore) -> Vec<i64> {
    sqlx::query_scalar("SELECT id FROM server_transfers ORDER BY id")
        .fetch_all(store.pool())
        .await
        .expect("Failed to list transfers")
}

/// Seed the egg 7 scenario: `s1` matches, `s2` and `s3` run an old jar
pub async fn seed_egg_seven(store: &SqlPanelStore) {
    insert_egg(store, 7, "java -jar server.jar").await;
    insert_server(store, 1, "s1", "lobby", 7, "java -jar server.jar").await;
    insert_server(store, 2, "s2", "survival", 7, "java -jar old.jar").await;
    insert_server(store, 3, "s3", "creative", 7, "java -jar old.jar").await;
}

#[derive(Debug, Default)]
struct MemoryState {
    eggs: Vec<(i64, String)>,
    /// (id, egg_id, row)
    servers: Vec<(i64, i64, ServerStartup)>,
    transfers: Vec<StuckTransfer>,
    writes: usize,
}

/// Store double holding rows in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn with_egg(self, id: i64, startup: &str) -> Self {
        self.state.lock().unwrap().eggs.push((id, startup.to_string()));
        self
    }

    pub fn with_server(self, id: i64, egg_id: i64, uuid_short: &str, startup: &str) -> Self {
        self.state.lock().unwrap().servers.push((
            id,
            egg_id,
            ServerStartup {
                uuid_short: uuid_short.to_string(),
                name: format!("server-{}", id),
                startup: startup.to_string(),
            },
        ));
        self
    }

    pub fn with_stuck_transfer(self, id: i64, server_id: i64) -> Self {
        self.state
            .lock()
            .unwrap()
            .transfers
            .push(StuckTransfer { id, server_id });
        self
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    pub fn startup_of(&self, uuid_short: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .servers
            .iter()
            .find(|(_, _, s)| s.uuid_short == uuid_short)
            .map(|(_, _, s)| s.startup.clone())
    }

    pub fn startups_of(&self, uuid_short: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .servers
            .iter()
            .filter(|(_, _, s)| s.uuid_short == uuid_short)
            .map(|(_, _, s)| s.startup.clone())
            .collect()
    }

    pub fn transfer_ids(&self) -> Vec<i64> {
        self.state
            .lock()
            .unwrap()
            .transfers
            .iter()
            .map(|t| t.id)
            .collect()
    }

    fn check_read(&self, operation: &'static str) -> Result<()> {
        if self.fail_reads {
            return Err(ReconcileError::read(operation, "connection reset"));
        }
        Ok(())
    }

    fn check_write(&self, operation: &'static str) -> Result<()> {
        if self.fail_writes {
            return Err(ReconcileError::write(operation, "table is read only"));
        }
        Ok(())
    }
}

#[async_trait]
impl PanelStore for MemoryStore {
    async fn egg_startup(&self, egg_id: i64) -> Result<String> {
        self.check_read("egg_startup")?;
        self.state
            .lock()
            .unwrap()
            .eggs
            .iter()
            .find(|(id, _)| *id == egg_id)
            .map(|(_, startup)| startup.clone())
            .ok_or_else(|| ReconcileError::not_found(EntityKind::Egg, egg_id))
    }

    async fn servers_for_egg(&self, egg_id: i64) -> Result<Vec<ServerStartup>> {
        self.check_read("servers_for_egg")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .servers
            .iter()
            .filter(|(_, egg, _)| *egg == egg_id)
            .map(|(_, _, s)| s.clone())
            .collect())
    }

    async fn update_server_startup(&self, uuid_short: &str, startup: &str) -> Result<u64> {
        self.check_write("update_server_startup")?;
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let mut affected = 0;
        for (_, _, server) in state.servers.iter_mut() {
            if server.uuid_short == uuid_short {
                server.startup = startup.to_string();
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn update_egg_servers_startup(&self, egg_id: i64, startup: &str) -> Result<u64> {
        self.check_write("update_egg_servers_startup")?;
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let mut affected = 0;
        for (_, egg, server) in state.servers.iter_mut() {
            if *egg == egg_id {
                server.startup = startup.to_string();
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn stuck_transfers(&self) -> Result<Vec<StuckTransfer>> {
        self.check_read("stuck_transfers")?;
        Ok(self.state.lock().unwrap().transfers.clone())
    }

    async fn server_name(&self, server_id: i64) -> Result<String> {
        self.check_read("server_name")?;
        self.state
            .lock()
            .unwrap()
            .servers
            .iter()
            .find(|(id, _, _)| *id == server_id)
            .map(|(_, _, s)| s.name.clone())
            .ok_or_else(|| ReconcileError::not_found(EntityKind::Server, server_id))
    }

    async fn delete_transfer(&self, transfer_id: i64) -> Result<u64> {
        self.check_write("delete_transfer")?;
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let before = state.transfers.len();
        state.transfers.retain(|t| t.id != transfer_id);
        Ok((before - state.transfers.len()) as u64)
    }
}
