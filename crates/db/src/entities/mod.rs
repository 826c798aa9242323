//! `SeaORM` entity definitions.

pub mod companies;
pub mod fin_reports;
