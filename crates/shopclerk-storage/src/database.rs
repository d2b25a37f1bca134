// SPDX-FileCopyrightText: 2026 Shopclerk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::time::Duration;

use shopclerk_core::ClerkError;
use thiserror::Error;
use tokio_rusqlite::Connection;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for the open-time setup closure. PRAGMAs fail with plain
/// rusqlite errors; the migration runner reports through `ClerkError`.
#[derive(Debug, Error)]
enum SetupError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Migration(#[from] ClerkError),
}

/// Handle to the SQLite database.
///
/// Cloning is cheap; all clones share the single background connection.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled and run
    /// all pending migrations.
    pub async fn open(path: &str) -> Result<Self, ClerkError> {
        Self::open_with_options(path, true).await
    }

    /// Open with explicit control over WAL mode.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, ClerkError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ClerkError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = Connection::open(path).await.map_err(|e| ClerkError::Storage {
            source: Box::new(e),
        })?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            crate::migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(|e: tokio_rusqlite::Error<SetupError>| ClerkError::Storage {
            source: Box::new(e),
        })?;

        tracing::debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Access the shared connection for query execution.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the database, flushing the WAL.
    pub async fn close(self) -> Result<(), ClerkError> {
        self.conn
            .close()
            .await
            .map_err(|e| ClerkError::Storage {
                source: Box::new(e),
            })
    }
}

/// Map a tokio-rusqlite error into the storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ClerkError {
    ClerkError::Storage {
        source: Box::new(e),
    }
}
