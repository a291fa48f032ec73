//! Schema bootstrap
//!
//! Creates the two tables if they are missing. Not a migration system:
//! existing tables are left exactly as they are.

use sqlx::PgPool;

/// Create `establishments` and `stores` when absent.
///
/// `stores.establishment_id` is `ON DELETE RESTRICT`, so the backend refuses
/// to orphan stores even if a store slips in between the service's
/// dependency check and its delete.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring database schema...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS establishments (
            id BIGSERIAL PRIMARY KEY,
            number TEXT NOT NULL,
            name TEXT NOT NULL,
            corporate_name TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL,
            address_number TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            zip_code TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stores (
            id BIGSERIAL PRIMARY KEY,
            number TEXT NOT NULL,
            name TEXT NOT NULL,
            corporate_name TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL,
            address_number TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            zip_code TEXT NOT NULL,
            establishment_id BIGINT NOT NULL
                REFERENCES establishments(id) ON DELETE RESTRICT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_stores_establishment_id ON stores(establishment_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema ready");
    Ok(())
}
