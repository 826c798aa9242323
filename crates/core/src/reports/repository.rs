//! Persistence seam for financial reports.

use async_trait::async_trait;
use bizdir_shared::types::{CompanyId, FinancialReportId};

use super::types::{FinancialReport, FinancialReportChanges, NewFinancialReport};
use crate::fiscal::FiscalQuarter;
use crate::repository::RepositoryError;

/// Storage for individual financial reports.
///
/// Implementations report a missing row as `RepositoryError::NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinancialReportRepository: Send + Sync {
    /// Persists a new report and returns it with its assigned ID.
    async fn create(&self, report: NewFinancialReport) -> Result<FinancialReport, RepositoryError>;

    /// Loads a report by ID.
    async fn get_by_id(&self, id: FinancialReportId) -> Result<FinancialReport, RepositoryError>;

    /// Loads the report a company filed for one quarter.
    async fn get_by_quarter(
        &self,
        company_id: CompanyId,
        quarter: FiscalQuarter,
    ) -> Result<FinancialReport, RepositoryError>;

    /// Applies the fields set in `changes` to a stored report.
    async fn update(
        &self,
        id: FinancialReportId,
        changes: FinancialReportChanges,
    ) -> Result<(), RepositoryError>;

    /// Deletes a report by ID.
    async fn delete_by_id(&self, id: FinancialReportId) -> Result<(), RepositoryError>;
}
