//! PostgreSQL table client
//!
//! Rows travel as `jsonb`. Filter and payload values are cast to the column
//! types through `jsonb_populate_record(NULL::<table>, ..)`, so callers never
//! need to know whether a column is `date`, `time`, `uuid` or `int`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Postgres};

use super::{check_ident, BackendError, Direction, Filter, Query, Row, TableClient};

/// Table client over a sqlx connection pool
#[derive(Clone)]
pub struct PgTables {
    pool: Pool<Postgres>,
}

impl PgTables {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, sql: &str, binds: Vec<Value>) -> Result<Vec<Row>, BackendError> {
        tracing::debug!(%sql, "table query");
        let mut query = sqlx::query_scalar::<_, Value>(sql);
        for bind in binds {
            query = query.bind(bind);
        }
        let values = query.fetch_all(&self.pool).await?;
        values
            .into_iter()
            .map(|value| match value {
                Value::Object(map) => Ok(map),
                other => Err(BackendError::Decode(format!("expected a row object, got {}", other))),
            })
            .collect()
    }
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db) = err.as_database_error() {
            if db.code().as_deref() == Some("23505") {
                return BackendError::UniqueViolation {
                    constraint: db.constraint().map(str::to_string),
                    message: db.message().to_string(),
                };
            }
            return BackendError::Request(db.message().to_string());
        }
        BackendError::Request(err.to_string())
    }
}

/// Build the WHERE clause for `filters`, pushing bind values; placeholders start after `binds.len()`
fn where_clause(table: &str, filters: &[Filter], binds: &mut Vec<Value>) -> Result<String, BackendError> {
    if filters.is_empty() {
        return Ok(String::new());
    }

    let mut conds = Vec::with_capacity(filters.len());
    for filter in filters {
        let column = filter.column();
        check_ident(column)?;

        let cond = match filter {
            Filter::Eq(_, Value::Null) => format!("t.{column} IS NULL"),
            Filter::Eq(_, value) | Filter::Gte(_, value) | Filter::Lte(_, value) => {
                let op = match filter {
                    Filter::Gte(..) => ">=",
                    Filter::Lte(..) => "<=",
                    _ => "=",
                };
                let mut single = serde_json::Map::new();
                single.insert(column.to_string(), value.clone());
                binds.push(Value::Object(single));
                format!(
                    "t.{column} {op} (jsonb_populate_record(NULL::{table}, ${})).{column}",
                    binds.len()
                )
            }
            Filter::In(_, values) if values.is_empty() => "FALSE".to_string(),
            Filter::In(_, values) => {
                let records: Vec<Value> = values
                    .iter()
                    .map(|v| {
                        let mut single = serde_json::Map::new();
                        single.insert(column.to_string(), v.clone());
                        Value::Object(single)
                    })
                    .collect();
                binds.push(Value::Array(records));
                format!(
                    "t.{column} IN (SELECT p.{column} FROM jsonb_populate_recordset(NULL::{table}, ${}) AS p)",
                    binds.len()
                )
            }
        };
        conds.push(cond);
    }

    Ok(format!(" WHERE {}", conds.join(" AND ")))
}

/// Union of the keys of `rows`, in first-seen order
fn row_columns(rows: &[Row]) -> Result<Vec<String>, BackendError> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                check_ident(key)?;
                columns.push(key.clone());
            }
        }
    }
    Ok(columns)
}

#[async_trait]
impl TableClient for PgTables {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, BackendError> {
        check_ident(table)?;
        let mut binds = Vec::new();
        let mut sql = format!("SELECT to_jsonb(t) FROM {table} AS t");
        sql.push_str(&where_clause(table, &query.filters, &mut binds)?);

        if !query.order.is_empty() {
            let mut parts = Vec::with_capacity(query.order.len());
            for (column, direction) in &query.order {
                check_ident(column)?;
                parts.push(match direction {
                    Direction::Asc => format!("t.{column} ASC"),
                    Direction::Desc => format!("t.{column} DESC"),
                });
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }

        self.fetch_rows(&sql, binds).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, BackendError> {
        check_ident(table)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let columns = row_columns(&rows)?.join(", ");
        let sql = format!(
            "INSERT INTO {table} AS t ({columns}) \
             SELECT {columns} FROM jsonb_populate_recordset(NULL::{table}, $1) \
             RETURNING to_jsonb(t)"
        );
        let payload = Value::Array(rows.into_iter().map(Value::Object).collect());
        self.fetch_rows(&sql, vec![payload]).await
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Row>,
        on_conflict: &[String],
    ) -> Result<Vec<Row>, BackendError> {
        check_ident(table)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        for column in on_conflict {
            check_ident(column)?;
        }

        let columns = row_columns(&rows)?;
        let updates: Vec<String> = columns
            .iter()
            .filter(|c| !on_conflict.contains(c))
            .map(|c| format!("{c} = EXCLUDED.{c}"))
            .collect();
        let action = if updates.is_empty() {
            "DO NOTHING".to_string()
        } else {
            format!("DO UPDATE SET {}", updates.join(", "))
        };

        let columns = columns.join(", ");
        let sql = format!(
            "INSERT INTO {table} AS t ({columns}) \
             SELECT {columns} FROM jsonb_populate_recordset(NULL::{table}, $1) \
             ON CONFLICT ({}) {action} \
             RETURNING to_jsonb(t)",
            on_conflict.join(", ")
        );
        let payload = Value::Array(rows.into_iter().map(Value::Object).collect());
        self.fetch_rows(&sql, vec![payload]).await
    }

    async fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, BackendError> {
        check_ident(table)?;
        if filters.is_empty() {
            return Err(BackendError::Request("Refusing to update without a filter".to_string()));
        }
        if patch.is_empty() {
            return self
                .select(table, &Query { filters: filters.to_vec(), order: Vec::new() })
                .await;
        }

        let columns = row_columns(std::slice::from_ref(&patch))?;
        let sets: Vec<String> = columns.iter().map(|c| format!("{c} = p.{c}")).collect();

        let mut binds = vec![Value::Object(patch)];
        let conds = where_clause(table, filters, &mut binds)?;
        let sql = format!(
            "UPDATE {table} AS t SET {} \
             FROM jsonb_populate_record(NULL::{table}, $1) AS p{conds} \
             RETURNING to_jsonb(t)",
            sets.join(", ")
        );
        self.fetch_rows(&sql, binds).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, BackendError> {
        check_ident(table)?;
        if filters.is_empty() {
            return Err(BackendError::Request("Refusing to delete without a filter".to_string()));
        }

        let mut binds = Vec::new();
        let conds = where_clause(table, filters, &mut binds)?;
        let sql = format!("DELETE FROM {table} AS t{conds}");
        tracing::debug!(%sql, "table delete");

        let mut query = sqlx::query(&sql);
        for bind in binds {
            query = query.bind(bind);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), BackendError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
