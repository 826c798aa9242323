//! Core business logic for Bizdir.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and aggregations live here.
//!
//! # Modules
//!
//! - `fiscal` - Fiscal quarters, periods and quarter iteration
//! - `reports` - Quarterly financial reports and period aggregation
//! - `companies` - Company read model and persistence seam
//! - `repository` - Errors shared by all repository seams

pub mod companies;
pub mod fiscal;
pub mod reports;
pub mod repository;

pub use repository::RepositoryError;
