//! Store repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use estore_core::{EstablishmentId, Store, StoreData, StoreId, StoreStorage, StorageResult};

use super::{storage_error, store_from_row};

/// Store repository
#[derive(Clone)]
pub struct StoreRepo {
    pool: PgPool,
}

impl StoreRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreStorage for StoreRepo {
    /// The foreign key on `establishment_id` turns an unknown owner into a
    /// constraint error.
    async fn create(&self, data: &StoreData) -> StorageResult<StoreId> {
        let profile = &data.profile;
        let row = sqlx::query(
            r#"
            INSERT INTO stores
                (number, name, corporate_name, address, address_number, city, state, zip_code,
                 establishment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&profile.number)
        .bind(&profile.name)
        .bind(&profile.corporate_name)
        .bind(&profile.address)
        .bind(&profile.address_number)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.zip_code)
        .bind(data.establishment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        row.try_get("id").map_err(storage_error)
    }

    async fn find_all(&self) -> StorageResult<Vec<Store>> {
        let rows = sqlx::query(
            r#"
            SELECT id, number, name, corporate_name, address, address_number, city, state,
                   zip_code, establishment_id
            FROM stores
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(store_from_row)
            .collect::<Result<_, _>>()
            .map_err(storage_error)
    }

    async fn find_by_id(&self, id: StoreId) -> StorageResult<Option<Store>> {
        let row = sqlx::query(
            r#"
            SELECT id, number, name, corporate_name, address, address_number, city, state,
                   zip_code, establishment_id
            FROM stores
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref()
            .map(store_from_row)
            .transpose()
            .map_err(storage_error)
    }

    async fn update(&self, store: &Store) -> StorageResult<()> {
        let profile = &store.data.profile;
        sqlx::query(
            r#"
            UPDATE stores SET
                number = $1, name = $2, corporate_name = $3, address = $4,
                address_number = $5, city = $6, state = $7, zip_code = $8,
                establishment_id = $9
            WHERE id = $10
            "#,
        )
        .bind(&profile.number)
        .bind(&profile.name)
        .bind(&profile.corporate_name)
        .bind(&profile.address)
        .bind(&profile.address_number)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.zip_code)
        .bind(store.data.establishment_id)
        .bind(store.id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn delete(&self, id: StoreId) -> StorageResult<()> {
        sqlx::query("DELETE FROM stores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn find_by_establishment(
        &self,
        establishment_id: EstablishmentId,
    ) -> StorageResult<Vec<Store>> {
        let rows = sqlx::query(
            r#"
            SELECT id, number, name, corporate_name, address, address_number, city, state,
                   zip_code, establishment_id
            FROM stores
            WHERE establishment_id = $1
            ORDER BY id
            "#,
        )
        .bind(establishment_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(store_from_row)
            .collect::<Result<_, _>>()
            .map_err(storage_error)
    }
}
