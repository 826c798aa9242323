//! Company read model and its persistence seam.
//!
//! Companies are owned by an entrepreneur. The HTTP layer uses them to check
//! ownership before report mutations and to list an owner's companies.

use async_trait::async_trait;
use bizdir_shared::types::{ActivityFieldId, CompanyId, UserId};
use serde::{Deserialize, Serialize};

use crate::repository::RepositoryError;

/// A company registered by an entrepreneur.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company ID.
    pub id: CompanyId,
    /// Entrepreneur who owns the company.
    pub owner_id: UserId,
    /// Business sector tag.
    pub activity_field_id: ActivityFieldId,
    /// Company name.
    pub name: String,
    /// City the company operates in.
    pub city: String,
}

impl Company {
    /// Returns true if `user_id` owns this company.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// Storage for companies.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Loads a company by ID.
    async fn get_by_id(&self, id: CompanyId) -> Result<Company, RepositoryError>;

    /// Lists the companies owned by an entrepreneur, oldest first.
    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Company>, RepositoryError>;

    /// Deletes a company and all of its financial reports atomically.
    async fn delete_with_reports(&self, id: CompanyId) -> Result<(), RepositoryError>;
}
