//! Report data types.

use bizdir_shared::types::{CompanyId, FinancialReportId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::fiscal::{FiscalQuarter, Period};

/// One quarter's revenue and cost record for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Report ID, assigned by the store.
    pub id: FinancialReportId,
    /// Company that owns the report.
    pub company_id: CompanyId,
    /// Revenue for the quarter.
    pub revenue: Decimal,
    /// Costs for the quarter.
    pub costs: Decimal,
    /// Calendar year.
    pub year: i32,
    /// Quarter within the year (1-4).
    pub quarter: u8,
}

impl FinancialReport {
    /// Revenue minus costs for this quarter.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        self.revenue - self.costs
    }

    /// The quarter this report covers.
    #[must_use]
    pub const fn fiscal_quarter(&self) -> FiscalQuarter {
        FiscalQuarter {
            year: self.year,
            quarter: self.quarter,
        }
    }
}

/// Input for creating a financial report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFinancialReport {
    /// Company the report belongs to.
    pub company_id: CompanyId,
    /// Revenue for the quarter.
    pub revenue: Decimal,
    /// Costs for the quarter.
    pub costs: Decimal,
    /// Calendar year.
    pub year: i32,
    /// Quarter within the year (1-4).
    pub quarter: u8,
}

impl NewFinancialReport {
    /// Checks the report invariants before it reaches storage.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NegativeRevenue` or `ReportError::NegativeCosts` for a
    /// negative amount, `ReportError::AmountTooPrecise` or `ReportError::AmountOutOfRange`
    /// for an amount storage cannot hold, or `ReportError::InvalidQuarter`.
    pub fn validate(&self) -> Result<(), ReportError> {
        validate_amount(self.revenue, ReportError::NegativeRevenue)?;
        validate_amount(self.costs, ReportError::NegativeCosts)?;
        validate_quarter(self.quarter)
    }
}

/// Partial update for a financial report.
///
/// `None` leaves the stored value untouched; `Some(Decimal::ZERO)` sets it to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReportChanges {
    /// New revenue.
    pub revenue: Option<Decimal>,
    /// New costs.
    pub costs: Option<Decimal>,
    /// New year.
    pub year: Option<i32>,
    /// New quarter.
    pub quarter: Option<u8>,
}

impl FinancialReportChanges {
    /// Returns true if no field is being set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.revenue.is_none()
            && self.costs.is_none()
            && self.year.is_none()
            && self.quarter.is_none()
    }

    /// Validates only the fields that are being set.
    ///
    /// # Errors
    ///
    /// Same rules as [`NewFinancialReport::validate`].
    pub fn validate(&self) -> Result<(), ReportError> {
        if let Some(revenue) = self.revenue {
            validate_amount(revenue, ReportError::NegativeRevenue)?;
        }
        if let Some(costs) = self.costs {
            validate_amount(costs, ReportError::NegativeCosts)?;
        }
        self.quarter.map_or(Ok(()), validate_quarter)
    }
}

/// Decimal places kept by storage.
pub const AMOUNT_SCALE: u32 = 4;

/// Exclusive upper bound of an amount (`NUMERIC(19, 4)` keeps 15 integer digits).
pub const AMOUNT_LIMIT: i64 = 1_000_000_000_000_000;

fn validate_amount(amount: Decimal, negative: ReportError) -> Result<(), ReportError> {
    if amount < Decimal::ZERO {
        return Err(negative);
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ReportError::AmountTooPrecise(amount));
    }
    if amount >= Decimal::from(AMOUNT_LIMIT) {
        return Err(ReportError::AmountOutOfRange(amount));
    }
    Ok(())
}

fn validate_quarter(quarter: u8) -> Result<(), ReportError> {
    FiscalQuarter::new(0, quarter)
        .map(|_| ())
        .map_err(|_| ReportError::InvalidQuarter(quarter))
}

/// Reports of one or more companies over a period, in calendar order.
///
/// Built fresh per query; aggregates are derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCollection {
    /// Reports found within the period.
    pub reports: Vec<FinancialReport>,
    /// Period the collection was built for.
    pub period: Period,
}

impl ReportCollection {
    /// Creates an empty collection for a period.
    #[must_use]
    pub const fn new(period: Period) -> Self {
        Self {
            reports: Vec::new(),
            period,
        }
    }

    /// Total revenue over all reports.
    #[must_use]
    pub fn revenue(&self) -> Decimal {
        self.reports.iter().map(|r| r.revenue).sum()
    }

    /// Total costs over all reports.
    #[must_use]
    pub fn costs(&self) -> Decimal {
        self.reports.iter().map(|r| r.costs).sum()
    }

    /// Revenue minus costs.
    #[must_use]
    pub fn profit(&self) -> Decimal {
        self.revenue() - self.costs()
    }

    /// Number of reports in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if no quarter in the period had a report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
