//! PostgreSQL implementations of the core storage traits
//!
//! Each repository owns a clone of the shared pool (cheap, reference
//! counted) so it can sit behind an `Arc<dyn ...Storage>`.

pub mod establishments;
pub mod stores;

pub use establishments::EstablishmentRepo;
pub use stores::StoreRepo;

use estore_core::{Profile, Store, StoreData, StorageError};
use sqlx::error::ErrorKind;
use sqlx::postgres::PgRow;
use sqlx::Row;

/// Classify a sqlx failure: rejected writes become constraint errors,
/// everything else is a backend failure.
pub(crate) fn storage_error(err: sqlx::Error) -> StorageError {
    let rejected = match &err {
        sqlx::Error::Database(db) => matches!(
            db.kind(),
            ErrorKind::ForeignKeyViolation
                | ErrorKind::UniqueViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ),
        _ => false,
    };

    if rejected {
        tracing::debug!(error = %err, "backend rejected write");
        StorageError::constraint(err)
    } else {
        StorageError::backend(err)
    }
}

pub(crate) fn profile_from_row(row: &PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        number: row.try_get("number")?,
        name: row.try_get("name")?,
        corporate_name: row.try_get("corporate_name")?,
        address: row.try_get("address")?,
        address_number: row.try_get("address_number")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zip_code: row.try_get("zip_code")?,
    })
}

pub(crate) fn store_from_row(row: &PgRow) -> Result<Store, sqlx::Error> {
    Ok(Store {
        id: row.try_get("id")?,
        data: StoreData {
            establishment_id: row.try_get("establishment_id")?,
            profile: profile_from_row(row)?,
        },
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use estore_core::Profile;
    use sqlx::PgPool;

    pub(crate) async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::ensure_schema(&pool).await.expect("schema bootstrap failed");
        pool
    }

    pub(crate) fn profile(name: &str) -> Profile {
        Profile {
            number: "0042".into(),
            name: name.into(),
            corporate_name: format!("{name} S.A."),
            address: "Rua da Aurora".into(),
            address_number: "325".into(),
            city: "Recife".into(),
            state: "PE".into(),
            zip_code: "50050-000".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estore_core::StorageErrorKind;

    #[test]
    fn non_database_errors_are_backend_failures() {
        let err = storage_error(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), StorageErrorKind::Backend);
    }

    #[test]
    fn row_not_found_is_backend_failure() {
        // repositories use fetch_optional; a stray RowNotFound is a bug, not a 404
        let err = storage_error(sqlx::Error::RowNotFound);
        assert!(!err.is_constraint());
    }
}
