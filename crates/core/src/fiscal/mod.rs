//! Fiscal quarters and report periods.

pub mod period;


pub use period::{FiscalQuarter, Period, PeriodError, Quarters};
