//! PostgreSQL as a document store: one table per collection with a JSONB `doc` column.
//! Table names come from validated collection names; field names and values are always bound as parameters.

use super::{check_collection_name, Document, DocumentStore};
use crate::error::StoreError;
use crate::id::DocumentId;
use crate::query::{FieldMatch, Filter};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool, Postgres};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Escape `%`, `_` and `\` so the needle is matched literally by LIKE/ILIKE.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SqlParam {
    Text(String),
    Jsonb(Value),
    BigInt(i64),
}

#[derive(Debug, Default)]
pub(crate) struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn push_param(&mut self, p: SqlParam) -> usize {
        self.params.push(p);
        self.params.len()
    }

    fn bind_all(&self) -> sqlx::query::Query<'_, Postgres, PgArguments> {
        let mut query = sqlx::query(&self.sql);
        for p in &self.params {
            query = match p {
                SqlParam::Text(s) => query.bind(s.as_str()),
                SqlParam::Jsonb(v) => query.bind(Json(v)),
                SqlParam::BigInt(n) => query.bind(*n),
            };
        }
        query
    }
}

/// `SELECT id, doc ... WHERE <conditions> ORDER BY seq [LIMIT n]`.
pub(crate) fn select_documents(table: &str, filter: &Filter, limit: Option<u32>) -> QueryBuf {
    let mut q = QueryBuf::default();
    let mut clauses = Vec::with_capacity(filter.conditions().len());
    for condition in filter.conditions() {
        let field = q.push_param(SqlParam::Text(condition.field.clone()));
        let clause = match &condition.matcher {
            FieldMatch::Exact(value) => {
                let v = q.push_param(SqlParam::Jsonb(value.clone()));
                format!("doc -> ${} = ${}", field, v)
            }
            FieldMatch::ContainsIgnoreCase(needle) => {
                let pattern = format!("%{}%", escape_like(needle));
                let v = q.push_param(SqlParam::Text(pattern));
                format!("doc ->> ${} ILIKE ${}", field, v)
            }
        };
        clauses.push(clause);
    }
    q.sql = format!("SELECT id, doc FROM {}", table);
    if !clauses.is_empty() {
        q.sql.push_str(" WHERE ");
        q.sql.push_str(&clauses.join(" AND "));
    }
    q.sql.push_str(" ORDER BY seq");
    if let Some(limit) = limit {
        let n = q.push_param(SqlParam::BigInt(i64::from(limit)));
        q.sql.push_str(&format!(" LIMIT ${}", n));
    }
    q
}

fn into_document(collection: &str, id: Uuid, doc: Value) -> Result<Document, StoreError> {
    match doc {
        Value::Object(fields) => Ok(Document { id: id.into(), fields }),
        other => Err(StoreError::MalformedDocument {
            collection: collection.to_string(),
            reason: format!("expected object, found {}", other),
        }),
    }
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgDocumentStore {
            pool,
            schema: schema.into(),
        }
    }

    /// Pool that connects on first use, so the server can start while the database is down.
    /// `acquire_timeout` bounds how long a request waits for a connection.
    pub fn connect_lazy(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
        schema: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;
        Ok(Self::new(pool, schema))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn table(&self, collection: &str) -> Result<String, StoreError> {
        check_collection_name(collection)?;
        Ok(format!("{}.{}", quoted(&self.schema), quoted(collection)))
    }

    /// Create the schema and one table per collection if missing.
    pub async fn ensure_collections(&self, collections: &[&str]) -> Result<(), StoreError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(&self.schema)))
            .execute(&self.pool)
            .await?;
        for collection in collections {
            let table = self.table(collection)?;
            let ddl = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                    seq BIGSERIAL NOT NULL,
                    doc JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                table
            );
            sqlx::query(&ddl).execute(&self.pool).await?;
            tracing::info!(collection = %collection, "collection ready");
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: &str, fields: Map<String, Value>) -> Result<DocumentId, StoreError> {
        let table = self.table(collection)?;
        let sql = format!("INSERT INTO {} (doc) VALUES ($1) RETURNING id", table);
        tracing::debug!(sql = %sql, "insert");
        let id: Uuid = sqlx::query_scalar(&sql)
            .bind(Json(Value::Object(fields)))
            .fetch_one(&self.pool)
            .await?;
        Ok(id.into())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<u32>,
    ) -> Result<Vec<Document>, StoreError> {
        use sqlx::Row;
        let table = self.table(collection)?;
        let q = select_documents(&table, filter, limit);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = q.bind_all().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                let Json(doc): Json<Value> = row.try_get("doc")?;
                into_document(collection, id, doc)
            })
            .collect()
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        let table = self.table(collection)?;
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", table);
        tracing::debug!(sql = %sql, id = %id, "query");
        let row: Option<(Uuid, Json<Value>)> = sqlx::query_as(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|(id, Json(doc))| into_document(collection, id, doc)).transpose()
    }

    async fn list_collections(&self, limit: u32) -> Result<Vec<String>, StoreError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = $1 AND table_type = 'BASE TABLE' \
             ORDER BY table_name LIMIT $2",
        )
        .bind(&self.schema)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn database_name(&self) -> Result<String, StoreError> {
        let name: String = sqlx::query_scalar("SELECT current_database()::text")
            .fetch_one(&self.pool)
            .await?;
        Ok(name)
    }
}

/// Connect to the server's `postgres` database and create the database named in `database_url` if it is missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| StoreError::Unavailable("DATABASE_URL: no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim().to_string();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres{}", base, query), db_name))
}
