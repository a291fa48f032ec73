//! Establishment repository
//!
//! - create: INSERT ... RETURNING id
//! - summaries: LEFT JOIN with store count (no N+1)
//! - stores of an establishment: ordered by store id

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use estore_core::{
    Establishment, EstablishmentId, EstablishmentStorage, EstablishmentSummary, Profile, Store,
    StorageResult,
};

use super::{profile_from_row, storage_error, store_from_row};

/// Establishment repository
#[derive(Clone)]
pub struct EstablishmentRepo {
    pool: PgPool,
}

impl EstablishmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EstablishmentStorage for EstablishmentRepo {
    async fn create(&self, profile: &Profile) -> StorageResult<EstablishmentId> {
        let row = sqlx::query(
            r#"
            INSERT INTO establishments
                (number, name, corporate_name, address, address_number, city, state, zip_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        row.try_get("id").map_err(storage_error)
    }

    async fn find_all(&self) -> StorageResult<Vec<Establishment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, number, name, corporate_name, address, address_number, city, state, zip_code
            FROM establishments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(|row| -> Result<Establishment, sqlx::Error> {
                Ok(Establishment {
                    id: row.try_get("id")?,
                    profile: profile_from_row(row)?,
                })
            })
            .collect::<Result<_, _>>()
            .map_err(storage_error)
    }

    async fn find_by_id(&self, id: EstablishmentId) -> StorageResult<Option<Establishment>> {
        let row = sqlx::query(
            r#"
            SELECT id, number, name, corporate_name, address, address_number, city, state, zip_code
            FROM establishments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(|row| -> Result<Establishment, sqlx::Error> {
            Ok(Establishment {
                id: row.try_get("id")?,
                profile: profile_from_row(&row)?,
            })
        })
        .transpose()
        .map_err(storage_error)
    }

    async fn update(&self, establishment: &Establishment) -> StorageResult<()> {
        let profile = &establishment.profile;
        sqlx::query(
            r#"
            UPDATE establishments SET
                number = $1, name = $2, corporate_name = $3, address = $4,
                address_number = $5, city = $6, state = $7, zip_code = $8
            WHERE id = $9
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
        .bind(establishment.id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn delete(&self, id: EstablishmentId) -> StorageResult<()> {
        sqlx::query("DELETE FROM establishments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn count_stores_for_establishment(&self, id: EstablishmentId) -> StorageResult<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM stores WHERE establishment_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error)?;

        Ok(count)
    }

    async fn find_stores_for_establishment(
        &self,
        id: EstablishmentId,
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
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(store_from_row)
            .collect::<Result<_, _>>()
            .map_err(storage_error)
    }

    /// Single query: LEFT JOIN keeps establishments without stores.
    async fn find_all_with_store_counts(&self) -> StorageResult<Vec<EstablishmentSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT
                e.id, e.number, e.name, e.corporate_name, e.address, e.address_number,
                e.city, e.state, e.zip_code,
                COUNT(s.id) AS stores_total
            FROM establishments e
            LEFT JOIN stores s ON s.establishment_id = e.id
            GROUP BY e.id, e.number, e.name, e.corporate_name, e.address, e.address_number,
                     e.city, e.state, e.zip_code
            ORDER BY e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(|row| -> Result<EstablishmentSummary, sqlx::Error> {
                Ok(EstablishmentSummary {
                    establishment: Establishment {
                        id: row.try_get("id")?,
                        profile: profile_from_row(row)?,
                    },
                    stores_total: row.try_get("stores_total")?,
                })
            })
            .collect::<Result<_, _>>()
            .map_err(storage_error)
    }
}
