use crate::auth::{PrincipalStore, StoredCredential};
use crate::types::{AppError, NewRugRequest, RequestStatus, Result, RugRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row};
use uuid::Uuid;

const RUG_REQUEST_COLUMNS: &str = "id, name, email, details, status, created_at, updated_at";

/// SQLite-backed storage for rug requests and admin accounts.
///
/// Holds a single connection so `:memory:` databases keep their contents for
/// the lifetime of the store.
pub struct RugStore {
    _db: Database,
    conn: Connection,
}

impl RugStore {
    /// Opens `url`, treating `:memory:` as an ephemeral in-memory database.
    pub async fn open(url: &str) -> Result<Self> {
        if url == ":memory:" {
            Self::new_memory().await
        } else {
            Self::new_local(url).await
        }
    }

    /// Opens (or creates) a SQLite file.
    pub async fn new_local(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Opens a fresh in-memory database.
    pub async fn new_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { _db: db, conn };
        store.initialize_schema().await?;
        tracing::info!("Database initialized successfully");

        Ok(store)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn initialize_schema(&self) -> Result<()> {
        // Rug requests table
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS rug_requests (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    details TEXT NOT NULL,
                    status TEXT NOT NULL DEFAULT 'PENDING',
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create rug_requests table: {}", e)))?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_rug_requests_status ON rug_requests(status)",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create status index: {}", e)))?;

        // Admin users table
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL COLLATE NOCASE,
                    password_hash TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }

    // Rug request operations
    pub async fn create_rug_request(&self, request: &NewRugRequest) -> Result<RugRequest> {
        let now = Utc::now().timestamp();

        let mut rows = self
            .conn
            .query(
                &format!(
                    "INSERT INTO rug_requests (name, email, details, status, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?)
                     RETURNING {RUG_REQUEST_COLUMNS}"
                ),
                (
                    request.name.trim(),
                    request.email.trim(),
                    request.details.trim(),
                    RequestStatus::Pending.as_str(),
                    now,
                    now,
                ),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert request: {}", e)))?;

        let row = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))?;

        row_to_rug_request(&row)
    }

    /// All requests, newest first.
    pub async fn list_rug_requests(&self) -> Result<Vec<RugRequest>> {
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {RUG_REQUEST_COLUMNS} FROM rug_requests
                     ORDER BY created_at DESC, id DESC"
                ),
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to retrieve requests: {}", e)))?;

        collect_rug_requests(rows).await
    }

    /// Requests in `status`, newest first.
    pub async fn list_rug_requests_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<RugRequest>> {
        let rows = self
            .conn
            .query(
                &format!(
                    "SELECT {RUG_REQUEST_COLUMNS} FROM rug_requests
                     WHERE UPPER(status) = ?
                     ORDER BY created_at DESC, id DESC"
                ),
                [status.as_str()],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to retrieve requests: {}", e)))?;

        collect_rug_requests(rows).await
    }

    pub async fn get_rug_request(&self, id: i64) -> Result<Option<RugRequest>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {RUG_REQUEST_COLUMNS} FROM rug_requests WHERE id = ?"),
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query request: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(row_to_rug_request(&row)?)),
            None => Ok(None),
        }
    }

    /// Sets the status of request `id`. Returns `false` if no such request exists.
    pub async fn update_rug_request_status(&self, id: i64, status: RequestStatus) -> Result<bool> {
        let affected = self
            .conn
            .execute(
                "UPDATE rug_requests SET status = ?, updated_at = ? WHERE id = ?",
                (status.as_str(), Utc::now().timestamp(), id),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to update request status: {}", e)))?;

        Ok(affected > 0)
    }

    /// Deletes request `id`. Returns `false` if no such request exists.
    pub async fn delete_rug_request(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM rug_requests WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete rug request: {}", e)))?;

        Ok(affected > 0)
    }

    // Admin user operations
    pub async fn create_admin(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        let now = Utc::now().timestamp();

        self.conn
            .execute(
                "INSERT INTO users (id, name, email, password_hash, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                (id.to_string(), name.trim(), email.trim(), password_hash, now),
            )
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    AppError::Conflict("An admin with this email already exists".to_string())
                } else {
                    AppError::Database(format!("Failed to create admin: {}", e))
                }
            })?;

        Ok(())
    }

    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminUser>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ? COLLATE NOCASE",
                [email.trim()],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let id: String = row.get(0).map_err(|e| AppError::Database(e.to_string()))?;
        Ok(Some(AdminUser {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::Database(format!("Corrupt user id '{}': {}", id, e)))?,
            name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            password_hash: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: timestamp(row.get(4).map_err(|e| AppError::Database(e.to_string()))?)?,
        }))
    }
}

#[async_trait]
impl PrincipalStore for RugStore {
    async fn lookup_credential(&self, email: &str) -> Result<Option<StoredCredential>> {
        Ok(self
            .get_admin_by_email(email)
            .await?
            .map(|user| StoredCredential {
                principal: user.id,
                password_hash: user.password_hash,
            }))
    }
}

/// Admin account record. The hash never leaves the auth layer.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

async fn collect_rug_requests(mut rows: libsql::Rows) -> Result<Vec<RugRequest>> {
    let mut requests = Vec::new();
    while let Some(row) = rows
        .next()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
    {
        requests.push(row_to_rug_request(&row)?);
    }
    Ok(requests)
}

fn row_to_rug_request(row: &Row) -> Result<RugRequest> {
    let status: String = row.get(4).map_err(|e| AppError::Database(e.to_string()))?;

    Ok(RugRequest {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        email: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        details: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        status: status
            .parse()
            .map_err(|_| AppError::Database(format!("Unknown status '{}' in database", status)))?,
        created_at: timestamp(row.get(5).map_err(|e| AppError::Database(e.to_string()))?)?,
        updated_at: timestamp(row.get(6).map_err(|e| AppError::Database(e.to_string()))?)?,
    })
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| AppError::Database(format!("Timestamp out of range: {}", secs)))
}
