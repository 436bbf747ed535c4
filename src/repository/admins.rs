//! Admin accounts repository

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    backend::{from_rows, to_row, Query, TableClient},
    error::{AppError, AppResult},
    models::admin::{AdminAccount, NewAdminAccount},
};

const TABLE: &str = "admin_users";

#[derive(Clone)]
pub struct AdminsRepository {
    client: Arc<dyn TableClient>,
}

impl AdminsRepository {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self { client }
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<AdminAccount>> {
        let query = Query::new().eq("email", email);
        Ok(from_rows(self.client.select(TABLE, &query).await?)?.into_iter().next())
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<AdminAccount>> {
        let query = Query::new().eq("id", id.to_string());
        Ok(from_rows(self.client.select(TABLE, &query).await?)?.into_iter().next())
    }

    pub async fn create(&self, account: &NewAdminAccount) -> AppResult<AdminAccount> {
        let rows = self.client.insert(TABLE, vec![to_row(account)?]).await?;
        from_rows(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Insert returned no row".to_string()))
    }
}
