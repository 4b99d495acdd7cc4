// In-memory storage adapter
// Same contract as the PostgreSQL adapter; used for DATABASE_TYPE=memory and tests

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{company_not_found, user_already_exists, user_not_found, StorageAdapter};
use crate::auth::models::User;
use crate::companies::models::Company;
use crate::error::ApiError;
use crate::events::models::Event;

#[derive(Default)]
pub struct InMemoryStorage {
    users: RwLock<HashMap<String, User>>,
    companies: RwLock<HashMap<Uuid, Company>>,
    events: RwLock<Vec<Event>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, in insertion order
    pub async fn events(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl StorageAdapter for InMemoryStorage {
    async fn create_user(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(user_already_exists(&user.email));
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, ApiError> {
        self.users
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or_else(|| user_not_found(email))
    }

    async fn create_company(&self, company: &Company) -> Result<(), ApiError> {
        let mut companies = self.companies.write().await;
        if companies.contains_key(&company.id) {
            return Err(ApiError::internal(format!(
                "failed to create company: id '{}' already in use",
                company.id
            )));
        }
        companies.insert(company.id, company.clone());
        Ok(())
    }

    async fn get_company_by_id(&self, id: Uuid) -> Result<Company, ApiError> {
        self.companies
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| company_not_found(id))
    }

    async fn update_company(&self, company: &Company) -> Result<(), ApiError> {
        match self.companies.write().await.get_mut(&company.id) {
            Some(existing) => {
                *existing = company.clone();
                Ok(())
            }
            None => Err(company_not_found(company.id)),
        }
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), ApiError> {
        self.companies
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| company_not_found(id))
    }

    async fn create_event(&self, event: &Event) -> Result<(), ApiError> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn close(&self) {}
}
