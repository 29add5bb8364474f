use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::core::{AppError, RecordState, Result};
use crate::modules::clients::models::{Client, ClientType};

/// Repository for client database operations
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, only_active: bool) -> Result<Vec<Client>> {
        let sql = if only_active {
            "SELECT * FROM clients WHERE state = 'active' ORDER BY id"
        } else {
            "SELECT * FROM clients ORDER BY id"
        };

        let rows: Vec<ClientRow> = sqlx::query_as(sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(ClientRow::into_client).collect()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Client>> {
        let row: Option<ClientRow> = sqlx::query_as("SELECT * FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ClientRow::into_client).transpose()
    }

    pub async fn create(
        &self,
        name: &str,
        client_type: ClientType,
        program: Option<&str>,
        state: RecordState,
    ) -> Result<Client> {
        let registered_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, client_type, program, registered_at, state)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(name.trim())
        .bind(client_type.to_string())
        .bind(program)
        .bind(registered_at)
        .bind(state.to_string())
        .execute(&self.pool)
        .await?;

        Ok(Client {
            id: result.last_insert_rowid(),
            name: name.trim().to_string(),
            client_type,
            program: program.map(str::to_string),
            registered_at,
            state,
        })
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        client_type: ClientType,
        program: Option<&str>,
        state: RecordState,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE clients SET name = ?, client_type = ?, program = ?, state = ? WHERE id = ?",
        )
        .bind(name.trim())
        .bind(client_type.to_string())
        .bind(program)
        .bind(state.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Client with id {} not found", id)));
        }

        Ok(())
    }

    /// Delete a client; rejected while movements or invoices reference it
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::validation(
                            "Client has recorded movements or invoices and cannot be deleted",
                        );
                    }
                }
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Client with id {} not found", id)));
        }

        Ok(())
    }

    pub async fn is_active(&self, id: i64) -> Result<bool> {
        Ok(self
            .find_by_id(id)
            .await?
            .map(|c| c.state == RecordState::Active)
            .unwrap_or(false))
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: i64,
    name: String,
    client_type: String,
    program: Option<String>,
    registered_at: DateTime<Utc>,
    state: String,
}

impl ClientRow {
    fn into_client(self) -> Result<Client> {
        let client_type = ClientType::from_str(&self.client_type)
            .map_err(AppError::internal)?;
        let state = RecordState::from_str(&self.state)
            .map_err(AppError::internal)?;

        Ok(Client {
            id: self.id,
            name: self.name,
            client_type,
            program: self.program,
            registered_at: self.registered_at,
            state,
        })
    }
}
