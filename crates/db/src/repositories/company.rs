//! Company repository backed by `SeaORM`.

use async_trait::async_trait;
use bizdir_core::RepositoryError;
use bizdir_core::companies::{Company, CompanyRepository};
use bizdir_shared::types::{ActivityFieldId, CompanyId, UserId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::info;

use crate::entities::{companies, fin_reports};

/// Company repository for ownership checks and cascading deletes.
#[derive(Debug, Clone)]
pub struct SeaOrmCompanyRepository {
    db: DatabaseConnection,
}

impl SeaOrmCompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<companies::Model> for Company {
    fn from(model: companies::Model) -> Self {
        Self {
            id: CompanyId::from_uuid(model.id),
            owner_id: UserId::from_uuid(model.owner_id),
            activity_field_id: ActivityFieldId::from_uuid(model.activity_field_id),
            name: model.name,
            city: model.city,
        }
    }
}

#[async_trait]
impl CompanyRepository for SeaOrmCompanyRepository {
    async fn get_by_id(&self, id: CompanyId) -> Result<Company, RepositoryError> {
        companies::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(RepositoryError::storage)?
            .map(Company::from)
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_by_owner(&self, owner_id: UserId) -> Result<Vec<Company>, RepositoryError> {
        let models = companies::Entity::find()
            .filter(companies::Column::OwnerId.eq(owner_id.into_inner()))
            .order_by_asc(companies::Column::CreatedAt)
            .order_by_asc(companies::Column::Id)
            .all(&self.db)
            .await
            .map_err(RepositoryError::storage)?;

        Ok(models.into_iter().map(Company::from).collect())
    }

    async fn delete_with_reports(&self, id: CompanyId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await.map_err(RepositoryError::storage)?;

        let reports = fin_reports::Entity::delete_many()
            .filter(fin_reports::Column::CompanyId.eq(id.into_inner()))
            .exec(&txn)
            .await
            .map_err(RepositoryError::storage)?;

        let result = companies::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await
            .map_err(RepositoryError::storage)?;

        // Dropping the transaction uncommitted rolls back the report deletion.
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        txn.commit().await.map_err(RepositoryError::storage)?;

        info!(
            company_id = %id,
            reports_deleted = reports.rows_affected,
            "company deleted with its financial reports"
        );
        Ok(())
    }
}
