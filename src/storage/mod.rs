// Storage adapter
// CRUD surface consumed by the resolvers and the event dispatcher

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::models::User;
use crate::companies::models::Company;
use crate::config::{Config, DatabaseType};
use crate::error::ApiError;
use crate::events::models::Event;

pub use memory::InMemoryStorage;
pub use postgres::PgStorage;

/// Persistence operations keyed by entity id
///
/// Implementations report absence and uniqueness conflicts with the typed
/// `ApiError` kinds (`UserNotFound`, `CompanyNotFound`, `UserAlreadyExists`)
/// and every other fault as `InternalServer`.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), ApiError>;

    async fn get_user_by_email(&self, email: &str) -> Result<User, ApiError>;

    async fn create_company(&self, company: &Company) -> Result<(), ApiError>;

    async fn get_company_by_id(&self, id: Uuid) -> Result<Company, ApiError>;

    /// Replace every field of the company at `company.id`
    async fn update_company(&self, company: &Company) -> Result<(), ApiError>;

    async fn delete_company(&self, id: Uuid) -> Result<(), ApiError>;

    async fn create_event(&self, event: &Event) -> Result<(), ApiError>;

    /// Release pooled connections
    async fn close(&self);
}

pub type DynStorage = Arc<dyn StorageAdapter>;

/// Build the configured storage variant
pub async fn connect(config: &Config) -> Result<DynStorage, ApiError> {
    match config.database_type {
        DatabaseType::Postgres => {
            let storage = PgStorage::connect(&config.postgres).await?;
            storage.migrate().await?;
            Ok(Arc::new(storage))
        }
        DatabaseType::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(InMemoryStorage::new()))
        }
    }
}

/// Bound a storage round-trip; an elapsed deadline is an internal error, never retried
pub async fn with_timeout<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::time::timeout(limit, fut).await.map_err(|_| {
        ApiError::internal(format!("{} timed out after {}s", operation, limit.as_secs_f64()))
    })?
}

pub(crate) fn company_not_found(id: Uuid) -> ApiError {
    ApiError::CompanyNotFound(format!("company with id '{}' not found", id))
}

pub(crate) fn user_not_found(email: &str) -> ApiError {
    ApiError::UserNotFound(format!("user with email '{}' not found", email))
}

pub(crate) fn user_already_exists(email: &str) -> ApiError {
    ApiError::UserAlreadyExists(format!("user with email '{}' already exists", email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_surfaces_as_internal_error() {
        let err = with_timeout(Duration::from_millis(10), "slow query", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ApiError>(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert!(err.to_string().starts_with("slow query timed out"));
    }

    #[tokio::test]
    async fn test_timeout_passes_inner_result_through() {
        let err = with_timeout(Duration::from_secs(1), "lookup", async {
            Err::<(), _>(company_not_found(Uuid::nil()))
        })
        .await
        .unwrap_err();
        assert_eq!(err.code(), "COMPANY_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_memory_backend_is_selected_from_config() {
        let config = Config::for_tests();
        let storage = connect(&config).await.unwrap();
        let err = storage.get_user_by_email("nobody@example.com").await.unwrap_err();
        assert_eq!(err.code(), "USER_NOT_FOUND");
    }
}
