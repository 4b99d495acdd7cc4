use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::companies::models::{Company, CompanyInput};
use crate::error::ApiError;
use crate::storage::{with_timeout, DynStorage};

/// Service for company business logic
///
/// Identifiers arrive as raw path strings and are parsed here, before any
/// storage round-trip, so a malformed id never reaches the adapter.
#[derive(Clone)]
pub struct CompanyService {
    storage: DynStorage,
    storage_timeout: Duration,
}

impl CompanyService {
    pub fn new(storage: DynStorage, storage_timeout: Duration) -> Self {
        Self {
            storage,
            storage_timeout,
        }
    }

    /// Create a company under a freshly generated id
    pub async fn create(&self, input: CompanyInput) -> Result<Company, ApiError> {
        info!("Creating company: {}", input.name);
        check_input(&input)?;

        let company = Company::from_input(Uuid::new_v4(), input);
        with_timeout(
            self.storage_timeout,
            "create company",
            self.storage.create_company(&company),
        )
        .await?;

        debug!("Created company {} with id {}", company.name, company.id);
        Ok(company)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Company, ApiError> {
        info!("Getting company by id: {}", id);
        let id = parse_id(id)?;

        with_timeout(
            self.storage_timeout,
            "get company by id",
            self.storage.get_company_by_id(id),
        )
        .await
    }

    /// Replace every field of the company at `id`
    ///
    /// Fails with `CompanyNotFound` when nothing is stored there.
    pub async fn update(&self, id: &str, input: CompanyInput) -> Result<Company, ApiError> {
        info!("Updating company by id: {}", id);
        let id = parse_id(id)?;
        check_input(&input)?;

        let company = Company::from_input(id, input);
        with_timeout(
            self.storage_timeout,
            "update company",
            self.storage.update_company(&company),
        )
        .await?;

        debug!("Updated company {}", id);
        Ok(company)
    }

    /// Delete the company at `id`, returning the parsed id
    pub async fn delete(&self, id: &str) -> Result<Uuid, ApiError> {
        info!("Deleting company by id: {}", id);
        let id = parse_id(id)?;

        with_timeout(
            self.storage_timeout,
            "delete company",
            self.storage.delete_company(id),
        )
        .await?;

        debug!("Deleted company {}", id);
        Ok(id)
    }
}

/// Parse a path identifier; empty and malformed ids are rejected distinctly
pub fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    if id.is_empty() {
        return Err(ApiError::CompanyIdRequired);
    }
    Uuid::parse_str(id).map_err(|_| ApiError::invalid_uuid(id))
}

fn check_input(input: &CompanyInput) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidBody("name is required".to_string()));
    }
    Ok(())
}
