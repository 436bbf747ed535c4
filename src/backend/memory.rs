//! Process-local table client
//!
//! Mirrors the semantics the services rely on from PostgreSQL: generated ids
//! and `created_at`, unique constraints (nulls compare equal), NULLS LAST on
//! ascending order, upsert on a conflict target.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::{check_ident, BackendError, Direction, Filter, Query, Row, TableClient};

#[derive(Debug, Clone, Default)]
struct TableSchema {
    /// Fill a missing `id` with a random uuid
    generated_id: bool,
    /// Fill a missing `created_at` with the current time
    created_at: bool,
    unique: Vec<Vec<&'static str>>,
}

/// In-memory tables holding the studio schema
pub struct MemoryTables {
    schema: HashMap<&'static str, TableSchema>,
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl Default for MemoryTables {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTables {
    pub fn new() -> Self {
        let mut schema = HashMap::new();
        let uuid_table = |unique: Vec<Vec<&'static str>>| TableSchema {
            generated_id: true,
            created_at: true,
            unique,
        };

        schema.insert("booked_days", uuid_table(vec![vec!["date"]]));
        schema.insert(
            "availability_slots",
            uuid_table(vec![vec!["date", "slot_time", "is_full_day"]]),
        );
        schema.insert("photography_types", uuid_table(vec![vec!["slug"]]));
        schema.insert("packages", uuid_table(vec![]));
        schema.insert("portfolio_photos", uuid_table(vec![]));
        schema.insert("gallery_images", uuid_table(vec![]));
        schema.insert("admin_users", uuid_table(vec![vec!["email"]]));
        schema.insert(
            "site_settings",
            TableSchema {
                generated_id: false,
                created_at: false,
                unique: vec![vec!["id"]],
            },
        );

        let mut tables: HashMap<String, Vec<Row>> =
            schema.keys().map(|name| (name.to_string(), Vec::new())).collect();

        let mut settings = Row::new();
        settings.insert("id".to_string(), Value::from(1));
        if let Some(rows) = tables.get_mut("site_settings") {
            rows.push(settings);
        }

        Self {
            schema,
            tables: RwLock::new(tables),
        }
    }

    fn table_schema(&self, table: &str) -> Result<&TableSchema, BackendError> {
        check_ident(table)?;
        self.schema
            .get(table)
            .ok_or_else(|| BackendError::Request(format!("relation \"{}\" does not exist", table)))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<Row>>> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<Row>>> {
        self.tables.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn field<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

/// SQL-ish comparison; `None` when either side is null or the types differ
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) if a == b => {
            Some(Ordering::Equal)
        }
        _ => None,
    }
}

/// Equality for unique constraints: nulls are not distinct
fn same_key(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        _ => compare(a, b) == Some(Ordering::Equal),
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let value = field(row, filter.column());
    match filter {
        Filter::Eq(_, expected) => compare(value, expected) == Some(Ordering::Equal),
        Filter::Gte(_, bound) => matches!(compare(value, bound), Some(Ordering::Greater | Ordering::Equal)),
        Filter::Lte(_, bound) => matches!(compare(value, bound), Some(Ordering::Less | Ordering::Equal)),
        Filter::In(_, candidates) => candidates
            .iter()
            .any(|c| compare(value, c) == Some(Ordering::Equal)),
    }
}

fn order_rows(rows: &mut [Row], order: &[(String, Direction)]) {
    rows.sort_by(|a, b| {
        for (column, direction) in order {
            let (x, y) = (field(a, column), field(b, column));
            // NULLS LAST for ASC, NULLS FIRST for DESC, as PostgreSQL does
            let ord = match (x.is_null(), y.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => compare(x, y).unwrap_or(Ordering::Equal),
            };
            let ord = match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

fn conflicts(a: &Row, b: &Row, columns: &[&str]) -> bool {
    columns.iter().all(|c| same_key(field(a, c), field(b, c)))
}

fn violation(table: &str, columns: &[&str]) -> BackendError {
    let constraint = format!("{}_{}_key", table, columns.join("_"));
    BackendError::UniqueViolation {
        message: format!("duplicate key value violates unique constraint \"{}\"", constraint),
        constraint: Some(constraint),
    }
}

/// Check `candidate` against `rows`, skipping the row at `skip`
fn check_unique(
    table: &str,
    schema: &TableSchema,
    rows: &[Row],
    candidate: &Row,
    skip: Option<usize>,
) -> Result<(), BackendError> {
    for columns in &schema.unique {
        let clash = rows
            .iter()
            .enumerate()
            .filter(|(idx, _)| Some(*idx) != skip)
            .any(|(_, existing)| conflicts(existing, candidate, columns));
        if clash {
            return Err(violation(table, columns));
        }
    }
    Ok(())
}

fn complete(schema: &TableSchema, mut row: Row) -> Row {
    if schema.generated_id && field(&row, "id").is_null() {
        row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    if schema.created_at && field(&row, "created_at").is_null() {
        row.insert("created_at".to_string(), Value::String(Utc::now().to_rfc3339()));
    }
    row
}

fn check_columns(row: &Row) -> Result<(), BackendError> {
    row.keys().try_for_each(|k| check_ident(k))
}

#[async_trait]
impl TableClient for MemoryTables {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, BackendError> {
        self.table_schema(table)?;
        let tables = self.read();
        let mut rows: Vec<Row> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        order_rows(&mut rows, &query.order);
        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, BackendError> {
        let schema = self.table_schema(table)?.clone();
        let mut tables = self.write();
        let existing = tables.entry(table.to_string()).or_default();

        // All-or-nothing, like a single INSERT statement
        let mut staged = existing.clone();
        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            check_columns(&row)?;
            let row = complete(&schema, row);
            check_unique(table, &schema, &staged, &row, None)?;
            staged.push(row.clone());
            inserted.push(row);
        }

        *existing = staged;
        Ok(inserted)
    }

    async fn upsert(
        &self,
        table: &str,
        rows: Vec<Row>,
        on_conflict: &[String],
    ) -> Result<Vec<Row>, BackendError> {
        let schema = self.table_schema(table)?.clone();
        for column in on_conflict {
            check_ident(column)?;
        }
        let target: Vec<&str> = on_conflict.iter().map(String::as_str).collect();

        let mut tables = self.write();
        let existing = tables.entry(table.to_string()).or_default();
        let mut staged = existing.clone();
        let mut written = Vec::with_capacity(rows.len());

        for row in rows {
            check_columns(&row)?;
            match staged.iter().position(|r| conflicts(r, &row, &target)) {
                Some(idx) => {
                    let mut merged = staged[idx].clone();
                    for (k, v) in row {
                        merged.insert(k, v);
                    }
                    check_unique(table, &schema, &staged, &merged, Some(idx))?;
                    staged[idx] = merged.clone();
                    written.push(merged);
                }
                None => {
                    let row = complete(&schema, row);
                    check_unique(table, &schema, &staged, &row, None)?;
                    staged.push(row.clone());
                    written.push(row);
                }
            }
        }

        *existing = staged;
        Ok(written)
    }

    async fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, BackendError> {
        let schema = self.table_schema(table)?.clone();
        if filters.is_empty() {
            return Err(BackendError::Request("Refusing to update without a filter".to_string()));
        }
        check_columns(&patch)?;

        let mut tables = self.write();
        let existing = tables.entry(table.to_string()).or_default();
        let mut staged = existing.clone();
        let mut updated = Vec::new();

        for idx in 0..staged.len() {
            if !filters.iter().all(|f| matches(&staged[idx], f)) {
                continue;
            }
            let mut row = staged[idx].clone();
            for (k, v) in &patch {
                row.insert(k.clone(), v.clone());
            }
            check_unique(table, &schema, &staged, &row, Some(idx))?;
            staged[idx] = row.clone();
            updated.push(row);
        }

        *existing = staged;
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, BackendError> {
        self.table_schema(table)?;
        if filters.is_empty() {
            return Err(BackendError::Request("Refusing to delete without a filter".to_string()));
        }

        let mut tables = self.write();
        let rows = tables.entry(table.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| !filters.iter().all(|f| matches(row, f)));
        Ok((before - rows.len()) as u64)
    }

    async fn ping(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn test_insert_fills_id_and_created_at() {
        let tables = MemoryTables::new();
        let rows = tables
            .insert("booked_days", vec![row(json!({"date": "2024-01-05"}))])
            .await
            .unwrap();
        assert!(rows[0]["id"].is_string());
        assert!(rows[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_unique_violation_is_reported() {
        let tables = MemoryTables::new();
        let slot = json!({"date": "2024-01-05", "slot_time": null, "is_full_day": true});
        tables.insert("availability_slots", vec![row(slot.clone())]).await.unwrap();
        let err = tables
            .insert("availability_slots", vec![row(slot)])
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());

        // A different time on the same date is fine
        tables
            .insert(
                "availability_slots",
                vec![row(json!({"date": "2024-01-05", "slot_time": "10:00:00", "is_full_day": false}))],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_batch_insert_writes_nothing() {
        let tables = MemoryTables::new();
        let err = tables
            .insert(
                "booked_days",
                vec![row(json!({"date": "2024-01-05"})), row(json!({"date": "2024-01-05"}))],
            )
            .await;
        assert!(err.is_err());
        let all = tables
            .select("booked_days", &Query::new().gte("date", "2024-01-01"))
            .await
            .unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_updates_on_conflict() {
        let tables = MemoryTables::new();
        tables
            .insert("booked_days", vec![row(json!({"date": "2024-01-05", "updated_at": "a"}))])
            .await
            .unwrap();
        tables
            .upsert(
                "booked_days",
                vec![
                    row(json!({"date": "2024-01-05", "updated_at": "b"})),
                    row(json!({"date": "2024-01-06", "updated_at": "b"})),
                ],
                &["date".to_string()],
            )
            .await
            .unwrap();

        let rows = tables
            .select("booked_days", &Query::new().asc("date"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["updated_at"], json!("b"));
        assert_eq!(rows[1]["date"], json!("2024-01-06"));
    }

    #[tokio::test]
    async fn test_range_filters_and_order() {
        let tables = MemoryTables::new();
        for date in ["2024-02-01", "2024-01-31", "2024-01-01", "2023-12-31"] {
            tables
                .insert("booked_days", vec![row(json!({ "date": date }))])
                .await
                .unwrap();
        }
        let rows = tables
            .select(
                "booked_days",
                &Query::new()
                    .gte("date", "2024-01-01")
                    .lte("date", "2024-01-31")
                    .asc("date"),
            )
            .await
            .unwrap();
        let dates: Vec<&str> = rows.iter().map(|r| r["date"].as_str().unwrap()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-31"]);
    }

    #[tokio::test]
    async fn test_nulls_last_on_ascending_order() {
        let tables = MemoryTables::new();
        for time in [json!("12:00:00"), Value::Null, json!("09:00:00")] {
            tables
                .insert(
                    "availability_slots",
                    vec![row(json!({"date": "2024-01-05", "slot_time": time, "is_full_day": false}))],
                )
                .await
                .unwrap();
        }
        let rows = tables
            .select("availability_slots", &Query::new().asc("slot_time"))
            .await
            .unwrap();
        assert_eq!(rows[0]["slot_time"], json!("09:00:00"));
        assert!(rows[2]["slot_time"].is_null());
    }

    #[tokio::test]
    async fn test_delete_in_and_update() {
        let tables = MemoryTables::new();
        for date in ["2024-01-05", "2024-01-06", "2024-01-07"] {
            tables
                .insert("booked_days", vec![row(json!({ "date": date }))])
                .await
                .unwrap();
        }
        let removed = tables
            .delete(
                "booked_days",
                &[Filter::In("date".into(), vec![json!("2024-01-05"), json!("2024-01-07")])],
            )
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let updated = tables
            .update(
                "booked_days",
                row(json!({"note": "wedding"})),
                &[Filter::Eq("date".into(), json!("2024-01-06"))],
            )
            .await
            .unwrap();
        assert_eq!(updated[0]["note"], json!("wedding"));
        assert!(tables.delete("booked_days", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_site_settings_singleton_seeded() {
        let tables = MemoryTables::new();
        let rows = tables
            .select("site_settings", &Query::new().eq("id", 1))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let tables = MemoryTables::new();
        assert!(tables.select("nope", &Query::new()).await.is_err());
    }
}
