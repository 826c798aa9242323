//! Repository implementations for data access.
//!
//! Repositories implement the core persistence traits,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod company;
pub mod financial_report;

pub use company::SeaOrmCompanyRepository;
pub use financial_report::SeaOrmFinancialReportRepository;
