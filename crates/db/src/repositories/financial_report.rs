//! Financial report repository backed by `SeaORM`.

use async_trait::async_trait;
use bizdir_core::RepositoryError;
use bizdir_core::fiscal::FiscalQuarter;
use bizdir_core::reports::{
    FinancialReport, FinancialReportChanges, FinancialReportRepository, NewFinancialReport,
};
use bizdir_shared::types::{CompanyId, FinancialReportId};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;
use uuid::Uuid;

use crate::entities::fin_reports;

/// Financial report repository for CRUD and per-quarter lookups.
#[derive(Debug, Clone)]
pub struct SeaOrmFinancialReportRepository {
    db: DatabaseConnection,
}

impl SeaOrmFinancialReportRepository {
    /// Creates a new financial report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_report(model: fin_reports::Model) -> Result<FinancialReport, RepositoryError> {
    let quarter = u8::try_from(model.quarter).map_err(|_| {
        RepositoryError::Storage(format!(
            "report {} has out-of-range quarter {}",
            model.id, model.quarter
        ))
    })?;

    Ok(FinancialReport {
        id: FinancialReportId::from_uuid(model.id),
        company_id: CompanyId::from_uuid(model.company_id),
        revenue: model.revenue,
        costs: model.costs,
        year: model.year,
        quarter,
    })
}

#[async_trait]
impl FinancialReportRepository for SeaOrmFinancialReportRepository {
    async fn create(&self, report: NewFinancialReport) -> Result<FinancialReport, RepositoryError> {
        let now = chrono::Utc::now().into();

        let model = fin_reports::ActiveModel {
            id: Set(Uuid::now_v7()),
            company_id: Set(report.company_id.into_inner()),
            revenue: Set(report.revenue),
            costs: Set(report.costs),
            year: Set(report.year),
            quarter: Set(i16::from(report.quarter)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = model
            .insert(&self.db)
            .await
            .map_err(RepositoryError::storage)?;
        into_report(model)
    }

    async fn get_by_id(&self, id: FinancialReportId) -> Result<FinancialReport, RepositoryError> {
        fin_reports::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(RepositoryError::storage)?
            .ok_or(RepositoryError::NotFound)
            .and_then(into_report)
    }

    async fn get_by_quarter(
        &self,
        company_id: CompanyId,
        quarter: FiscalQuarter,
    ) -> Result<FinancialReport, RepositoryError> {
        debug!(%company_id, %quarter, "looking up financial report");

        fin_reports::Entity::find()
            .filter(fin_reports::Column::CompanyId.eq(company_id.into_inner()))
            .filter(fin_reports::Column::Year.eq(quarter.year))
            .filter(fin_reports::Column::Quarter.eq(i16::from(quarter.quarter)))
            .one(&self.db)
            .await
            .map_err(RepositoryError::storage)?
            .ok_or(RepositoryError::NotFound)
            .and_then(into_report)
    }

    async fn update(
        &self,
        id: FinancialReportId,
        changes: FinancialReportChanges,
    ) -> Result<(), RepositoryError> {
        let mut query = fin_reports::Entity::update_many()
            .col_expr(
                fin_reports::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(fin_reports::Column::Id.eq(id.into_inner()));

        if let Some(revenue) = changes.revenue {
            query = query.col_expr(fin_reports::Column::Revenue, Expr::value(revenue));
        }
        if let Some(costs) = changes.costs {
            query = query.col_expr(fin_reports::Column::Costs, Expr::value(costs));
        }
        if let Some(year) = changes.year {
            query = query.col_expr(fin_reports::Column::Year, Expr::value(year));
        }
        if let Some(quarter) = changes.quarter {
            query = query.col_expr(fin_reports::Column::Quarter, Expr::value(i16::from(quarter)));
        }

        let result = query
            .exec(&self.db)
            .await
            .map_err(RepositoryError::storage)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: FinancialReportId) -> Result<(), RepositoryError> {
        let result = fin_reports::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(RepositoryError::storage)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
