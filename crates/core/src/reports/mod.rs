//! Quarterly financial reports and period aggregation.
//!
//! This module provides:
//! - Report records and their create/update inputs
//! - `ReportCollection` with revenue, costs and profit rollups
//! - The `FinancialReportRepository` persistence seam
//! - `FinancialReportService`, which assembles collections over a period

pub mod error;
pub mod repository;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use repository::FinancialReportRepository;
pub use service::{DEFAULT_MAX_PERIOD_QUARTERS, FinancialReportService};
pub use types::*;
