//! # SQLite
//!
//! Durable record store for draws.
//!
//! ## Schema
//!
//! - `draws(id TEXT PK, title TEXT, created_at TEXT, winners_count INTEGER, result_json TEXT)`
//! - `audit(id INTEGER PK AUTOINCREMENT, draw_id TEXT, action TEXT, ts TEXT)`
//!
//! A draw row is written exactly once at creation and never updated or
//! deleted afterwards, so the public page re-renders the same stored
//! outcome on every read. The audit table is append-only and mirrors draw
//! creation 1:1.
//!
//! Every operation is a single-record read or write dispatched through
//! `spawn_blocking`, so handlers await storage to completion without
//! holding the connection across suspension points.

use std::{
    fs::create_dir_all,
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::{params, Connection, OptionalExtension};
use tokio::task::spawn_blocking;

use crate::error::AppError;

const CREATE_DRAWS: &str = "CREATE TABLE IF NOT EXISTS draws (
    id TEXT PRIMARY KEY,
    title TEXT,
    created_at TEXT,
    winners_count INTEGER,
    result_json TEXT
)";

const CREATE_AUDIT: &str = "CREATE TABLE IF NOT EXISTS audit (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    draw_id TEXT,
    action TEXT,
    ts TEXT
)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub id: String,
    pub title: Option<String>,
    pub created_at: String,
    pub winners_count: i64,
    pub result_json: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSummary {
    pub id: String,
    pub title: Option<String>,
    pub created_at: String,
    pub winners_count: i64,
}

#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = path.parent() {
            let _ = create_dir_all(parent);
        }

        Self::init(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute(CREATE_DRAWS, [])?;
        conn.execute(CREATE_AUDIT, [])?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn call<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, AppError> + Send + 'static,
    {
        let conn = self.conn.clone();

        spawn_blocking(move || {
            let conn = conn.lock().expect("database mutex poisoned");
            op(&conn)
        })
        .await
        .map_err(|e| AppError::Internal(e.into()))?
    }

    pub async fn create_draw(&self, draw: Draw) -> Result<(), AppError> {
        self.call(move |conn| {
            conn.execute(
                "INSERT INTO draws (id, title, created_at, winners_count, result_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    draw.id,
                    draw.title,
                    draw.created_at,
                    draw.winners_count,
                    draw.result_json
                ],
            )?;
            Ok(())
        })
        .await
    }

    /// Unknown ids are `NotFound`, distinct from a storage-level failure.
    pub async fn get_draw(&self, id: String) -> Result<Draw, AppError> {
        self.call(move |conn| {
            conn.query_row(
                "SELECT id, title, created_at, winners_count, result_json
                 FROM draws WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Draw {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        created_at: row.get(2)?,
                        winners_count: row.get(3)?,
                        result_json: row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or(AppError::NotFound)
        })
        .await
    }

    pub async fn list_recent_draws(&self, limit: u32) -> Result<Vec<DrawSummary>, AppError> {
        self.call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, created_at, winners_count FROM draws
                 ORDER BY created_at DESC LIMIT ?1",
            )?;

            let rows = stmt.query_map(params![limit], |row| {
                Ok(DrawSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                    winners_count: row.get(3)?,
                })
            })?;

            let mut draws = Vec::new();
            for row in rows {
                draws.push(row?);
            }

            Ok(draws)
        })
        .await
    }

    pub async fn append_audit(
        &self,
        draw_id: String,
        action: &'static str,
        ts: String,
    ) -> Result<(), AppError> {
        self.call(move |conn| {
            conn.execute(
                "INSERT INTO audit (draw_id, action, ts) VALUES (?1, ?2, ?3)",
                params![draw_id, action, ts],
            )?;
            Ok(())
        })
        .await
    }
}
