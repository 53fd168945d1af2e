use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::Todo;
use crate::store::TodoStore;
use async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Object, Pool, PoolConfig, RecyclingMethod, Runtime, SslMode};
use tokio_postgres::{NoTls, Row};
use tracing::{error, info};

const SELECT_TODO_FOR_UPDATE: &str = "SELECT id, title, status FROM todo WHERE id = $1 FOR UPDATE";

/// PostgreSQL-backed todo store.
/// Holds a deadpool `Pool`; every request borrows a connection and returns it when done.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the connection pool and verify the database is reachable.
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool: {}", config.describe());

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.test_connection().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);
        pg_config.ssl_mode = Some(SslMode::Disable);

        pg_config.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pool_config.timeouts.create = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        pg_config.create_pool(Some(Runtime::Tokio1), NoTls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Run `SELECT 1` through the pool.
    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database connection test failed: {}", e);
            ApiError::Database(format!("Connection test failed: {}", e))
        })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// Create the `todo` table when it does not exist yet. Existing tables are left untouched.
    pub async fn ensure_schema(&self) -> Result<(), ApiError> {
        info!("Ensuring todo table exists");

        let client = self.get_connection().await?;

        let todo_table = r#"
            CREATE TABLE IF NOT EXISTS todo (
                id SERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                status TEXT NOT NULL
            )
        "#;

        client.execute(todo_table, &[]).await.map_err(|e| {
            error!("Failed to create todo table: {}", e);
            ApiError::Database(format!("Todo table creation failed: {}", e))
        })?;

        Ok(())
    }
}

fn todo_from_row(row: &Row) -> Result<Todo, ApiError> {
    Ok(Todo {
        id: row.try_get(0)?,
        title: row.try_get(1)?,
        status: row.try_get(2)?,
    })
}

#[async_trait]
impl TodoStore for Database {
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let client = self.get_connection().await?;
        let query = "SELECT id, title, status FROM todo ORDER BY id";

        let rows = client.query(query, &[]).await.map_err(|e| {
            error!("Failed to get rows from db: {}", e);
            ApiError::from(e)
        })?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn create_todo(&self, title: &str, status: &str) -> Result<Todo, ApiError> {
        let client = self.get_connection().await?;

        let query = r#"
            INSERT INTO todo (title, status)
            VALUES ($1, $2)
            RETURNING id, title, status
        "#;

        let row = client.query_one(query, &[&title, &status]).await.map_err(|e| {
            error!("Failed to save todo to db: {}", e);
            ApiError::from(e)
        })?;

        let created = todo_from_row(&row)?;
        info!("Todo created with id: {}", created.id);
        Ok(created)
    }

    /// Existence check and update run in one transaction; the row lock
    /// keeps a concurrent delete from slipping in between.
    async fn update_todo(&self, id: i32, title: &str, status: &str) -> Result<Todo, ApiError> {
        let mut client = self.get_connection().await?;
        let tx = client.transaction().await?;

        if tx.query_opt(SELECT_TODO_FOR_UPDATE, &[&id]).await?.is_none() {
            return Err(ApiError::not_found(format!("Todo with id {}", id)));
        }

        let rows_affected = tx
            .execute("UPDATE todo SET title = $2, status = $3 WHERE id = $1", &[&id, &title, &status])
            .await?;

        if rows_affected == 0 {
            return Err(ApiError::operation_failed(format!(
                "Update of todo {} affected no rows",
                id
            )));
        }

        tx.commit().await?;

        info!("Updated todo with id: {}", id);
        Ok(Todo {
            id,
            title: title.to_string(),
            status: status.to_string(),
        })
    }

    async fn delete_todo(&self, id: i32) -> Result<Todo, ApiError> {
        let mut client = self.get_connection().await?;
        let tx = client.transaction().await?;

        let snapshot = match tx.query_opt(SELECT_TODO_FOR_UPDATE, &[&id]).await? {
            Some(row) => todo_from_row(&row)?,
            None => return Err(ApiError::not_found(format!("Todo with id {}", id))),
        };

        let rows_affected = tx.execute("DELETE FROM todo WHERE id = $1", &[&id]).await?;

        if rows_affected == 0 {
            return Err(ApiError::operation_failed(format!(
                "Delete of todo {} affected no rows",
                id
            )));
        }

        tx.commit().await?;

        info!("Deleted todo with id: {}", id);
        Ok(snapshot)
    }
}
