//! Fiscal quarter arithmetic and report periods.
//!
//! A [`Period`] is an inclusive range of [`FiscalQuarter`]s. Quarters are
//! ordered by year first and quarter second, so `2021 Q4 < 2022 Q1`.

use std::fmt;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First quarter of a fiscal year.
pub const FIRST_QUARTER: u8 = 1;

/// Last quarter of a fiscal year.
pub const LAST_QUARTER: u8 = 4;

/// Errors raised when a period or quarter is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Quarter number outside 1..=4.
    #[error("quarter must be between 1 and 4, got {0}")]
    InvalidQuarter(u8),

    /// End of the period precedes its start.
    #[error("end of period must be after start")]
    EndBeforeStart,
}

/// A single (year, quarter) point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FiscalQuarter {
    /// Calendar year.
    pub year: i32,
    /// Quarter within the year (1-4).
    pub quarter: u8,
}

impl FiscalQuarter {
    /// Creates a quarter, rejecting quarter numbers outside 1..=4.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidQuarter` for an out-of-range quarter.
    pub const fn new(year: i32, quarter: u8) -> Result<Self, PeriodError> {
        if quarter < FIRST_QUARTER || quarter > LAST_QUARTER {
            return Err(PeriodError::InvalidQuarter(quarter));
        }
        Ok(Self { year, quarter })
    }

    /// Returns the quarter that follows this one, wrapping Q4 into next year's Q1.
    ///
    /// Returns `None` after the last quarter of `i32::MAX`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        if self.quarter < LAST_QUARTER {
            return Some(Self {
                year: self.year,
                quarter: self.quarter + 1,
            });
        }
        match self.year.checked_add(1) {
            Some(year) => Some(Self {
                year,
                quarter: FIRST_QUARTER,
            }),
            None => None,
        }
    }

    /// Position of the quarter on a continuous timeline.
    fn ordinal(self) -> i64 {
        i64::from(self.year) * i64::from(LAST_QUARTER) + i64::from(self.quarter) - 1
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter)
    }
}

/// Inclusive range of fiscal quarters bounding a report query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Year of the first quarter.
    pub start_year: i32,
    /// First quarter (1-4).
    pub start_quarter: u8,
    /// Year of the last quarter.
    pub end_year: i32,
    /// Last quarter (1-4).
    pub end_quarter: u8,
}

impl Period {
    /// Creates a validated period.
    ///
    /// # Errors
    ///
    /// See [`Period::validate`].
    pub fn new(
        start_year: i32,
        start_quarter: u8,
        end_year: i32,
        end_quarter: u8,
    ) -> Result<Self, PeriodError> {
        let period = Self {
            start_year,
            start_quarter,
            end_year,
            end_quarter,
        };
        period.validate()?;
        Ok(period)
    }

    /// Checks quarter ranges and that the end does not precede the start.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::InvalidQuarter` when either quarter is outside 1..=4,
    /// `PeriodError::EndBeforeStart` when `(end_year, end_quarter) < (start_year, start_quarter)`.
    pub fn validate(&self) -> Result<(), PeriodError> {
        let start = FiscalQuarter::new(self.start_year, self.start_quarter)?;
        let end = FiscalQuarter::new(self.end_year, self.end_quarter)?;
        if end < start {
            return Err(PeriodError::EndBeforeStart);
        }
        Ok(())
    }

    /// First quarter of the period.
    #[must_use]
    pub const fn start(&self) -> FiscalQuarter {
        FiscalQuarter {
            year: self.start_year,
            quarter: self.start_quarter,
        }
    }

    /// Last quarter of the period.
    #[must_use]
    pub const fn end(&self) -> FiscalQuarter {
        FiscalQuarter {
            year: self.end_year,
            quarter: self.end_quarter,
        }
    }

    /// Iterates the quarters of the period in calendar order.
    ///
    /// Every call starts a fresh iteration. An invalid period yields nothing.
    #[must_use]
    pub fn quarters(&self) -> Quarters {
        Quarters {
            next: self.validate().ok().map(|()| self.start()),
            last: self.end(),
        }
    }

    /// Number of quarters covered by the period (zero when invalid).
    #[must_use]
    pub fn quarter_count(&self) -> usize {
        self.quarters().len()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start(), self.end())
    }
}

/// Iterator over the quarters of a [`Period`].
#[derive(Debug, Clone)]
pub struct Quarters {
    next: Option<FiscalQuarter>,
    last: FiscalQuarter,
}

impl Iterator for Quarters {
    type Item = FiscalQuarter;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = if current < self.last {
            current.next()
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.next.map_or(0, |next| {
            usize::try_from(self.last.ordinal() - next.ordinal() + 1).unwrap_or(usize::MAX)
        });
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Quarters {}

impl FusedIterator for Quarters {}
