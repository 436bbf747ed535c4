//! Row-level table client over the hosted store
//!
//! Services never talk to a database driver directly: they go through a
//! [`TableClient`] handed to them at startup, so the same code runs against
//! PostgreSQL in production and against [`MemoryTables`] in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryTables;
pub use postgres::PgTables;

/// A table row as a JSON object keyed by column name
pub type Row = serde_json::Map<String, Value>;

/// Errors reported by a table client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// A unique constraint rejected the write
    #[error("{message}")]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("{0}")]
    Request(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Failed to decode row: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, BackendError::UniqueViolation { .. })
    }
}

/// Row filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq(c, _) | Filter::Gte(c, _) | Filter::Lte(c, _) | Filter::In(c, _) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Select query: filters are AND-ed, order is applied left to right
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub order: Vec<(String, Direction)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn gte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(column.to_string(), value.into()));
        self
    }

    pub fn lte(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(column.to_string(), value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(mut self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.filters.push(Filter::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn asc(mut self, column: &str) -> Self {
        self.order.push((column.to_string(), Direction::Asc));
        self
    }

    pub fn desc(mut self, column: &str) -> Self {
        self.order.push((column.to_string(), Direction::Desc));
        self
    }
}

/// Table read/write API of the hosted backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableClient: Send + Sync {
    /// Select rows matching `query`
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, BackendError>;

    /// Insert rows, returning them as stored
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, BackendError>;

    /// Insert rows, updating the existing row when `on_conflict` columns collide
    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Row>,
        on_conflict: &[String],
    ) -> Result<Vec<Row>, BackendError>;

    /// Apply `patch` to every row matching `filters`
    async fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, BackendError>;

    /// Delete every row matching `filters`, returning the number of rows removed
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, BackendError>;

    /// Connectivity check
    async fn ping(&self) -> Result<(), BackendError>;
}

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid regex"));

/// Reject anything that is not a plain lowercase SQL identifier
pub(crate) fn check_ident(name: &str) -> Result<(), BackendError> {
    if IDENT.is_match(name) {
        Ok(())
    } else {
        Err(BackendError::InvalidIdentifier(name.to_string()))
    }
}

/// Serialize a typed payload into a row
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, BackendError> {
    match serde_json::to_value(value).map_err(|e| BackendError::Decode(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(BackendError::Decode(format!("expected an object, got {}", other))),
    }
}

/// Deserialize rows into typed records
pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, BackendError> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).map_err(|e| BackendError::Decode(e.to_string()))
        })
        .collect()
}
