//! Generic repository for admin-managed record kinds

use std::marker::PhantomData;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    backend::{from_rows, Filter, Query, Row, TableClient},
    error::{AppError, AppResult},
    models::{Entity, ListFilter},
};

pub struct EntitiesRepository<E> {
    client: Arc<dyn TableClient>,
    _kind: PhantomData<fn() -> E>,
}

impl<E> Clone for EntitiesRepository<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _kind: PhantomData,
        }
    }
}

fn by_id(id: Uuid) -> Filter {
    Filter::Eq("id".to_string(), id.to_string().into())
}

fn not_found<E: Entity>(id: Uuid) -> AppError {
    AppError::NotFound(format!("{} {} not found", E::NAME, id))
}

fn first<E: Entity>(rows: Vec<Row>) -> AppResult<Option<E>> {
    Ok(from_rows::<E>(rows)?.into_iter().next())
}

impl<E: Entity> EntitiesRepository<E> {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self {
            client,
            _kind: PhantomData,
        }
    }

    /// Rows ordered by `sort_order`, ties by `created_at`
    pub async fn list(&self, filter: &ListFilter) -> AppResult<Vec<E>> {
        let mut query = Query::new();
        if let (Some(column), Some(category)) = (E::CATEGORY_COLUMN, filter.category.as_deref()) {
            query = query.eq(column, category);
        }
        if filter.active_only {
            query = query.eq("is_active", true);
        }
        let query = query.asc("sort_order").asc("created_at");

        let rows = self.client.select(E::TABLE, &query).await?;
        Ok(from_rows(rows)?)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<E> {
        let query = Query::new().eq("id", id.to_string());
        first(self.client.select(E::TABLE, &query).await?)?.ok_or_else(|| not_found::<E>(id))
    }

    pub async fn insert(&self, row: Row) -> AppResult<E> {
        first(self.client.insert(E::TABLE, vec![row]).await?)?
            .ok_or_else(|| AppError::Internal(format!("Insert into {} returned no row", E::TABLE)))
    }

    pub async fn update(&self, id: Uuid, patch: Row) -> AppResult<E> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        first(self.client.update(E::TABLE, patch, &[by_id(id)]).await?)?.ok_or_else(|| not_found::<E>(id))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let removed = self.client.delete(E::TABLE, &[by_id(id)]).await?;
        if removed == 0 {
            return Err(not_found::<E>(id));
        }
        Ok(())
    }
}
