//! Report error types.

use bizdir_shared::AppError;
use bizdir_shared::types::FinancialReportId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::fiscal::PeriodError;
use crate::repository::RepositoryError;

/// Errors that can occur while managing or aggregating financial reports.
#[derive(Debug, Error)]
pub enum ReportError {
    // ========== Validation Errors ==========
    /// The requested period is malformed.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodError),

    /// Revenue cannot be negative.
    #[error("revenue cannot be negative")]
    NegativeRevenue,

    /// Costs cannot be negative.
    #[error("costs cannot be negative")]
    NegativeCosts,

    /// Amount has more decimal places than storage keeps.
    #[error("amount {0} has more than 4 decimal places")]
    AmountTooPrecise(Decimal),

    /// Amount is too large to store.
    #[error("amount {0} must be less than 10^15")]
    AmountOutOfRange(Decimal),

    /// The requested period covers more quarters than one query may visit.
    #[error("period covers {quarters} quarters, at most {max} allowed")]
    PeriodTooLong {
        /// Quarters in the requested period.
        quarters: usize,
        /// Configured limit.
        max: usize,
    },

    /// Report quarter outside 1..=4.
    #[error("quarter must be between 1 and 4, got {0}")]
    InvalidQuarter(u8),

    // ========== Lookup Errors ==========
    /// Financial report not found.
    #[error("financial report not found: {0}")]
    NotFound(FinancialReportId),

    // ========== Storage Errors ==========
    /// Storage failure, prefixed with the operation that was running.
    #[error("{context}: {source}")]
    Repository {
        /// Operation that failed.
        context: String,
        /// Underlying repository failure.
        source: RepositoryError,
    },
}

impl ReportError {
    /// Wraps a repository failure with the name of the running operation.
    pub fn repository(context: impl Into<String>, source: RepositoryError) -> Self {
        Self::Repository {
            context: context.into(),
            source,
        }
    }

    /// Returns true if the caller supplied invalid data.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidPeriod(_)
                | Self::PeriodTooLong { .. }
                | Self::NegativeRevenue
                | Self::NegativeCosts
                | Self::AmountTooPrecise(_)
                | Self::AmountOutOfRange(_)
                | Self::InvalidQuarter(_)
        )
    }
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        if err.is_validation() {
            return Self::Validation(err.to_string());
        }
        match err {
            ReportError::NotFound(_) => Self::NotFound(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}
