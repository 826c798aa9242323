//! Financial report service: validation and period aggregation.

use std::sync::Arc;

use bizdir_shared::types::{CompanyId, FinancialReportId};
use tracing::{debug, error, info, warn};

use super::error::ReportError;
use super::repository::FinancialReportRepository;
use super::types::{FinancialReport, FinancialReportChanges, NewFinancialReport, ReportCollection};
use crate::fiscal::Period;
use crate::repository::RepositoryError;

/// Longest period, in quarters, a single aggregation may span by default.
pub const DEFAULT_MAX_PERIOD_QUARTERS: usize = 400;

/// Service for managing financial reports and aggregating them over periods.
#[derive(Clone)]
pub struct FinancialReportService {
    repo: Arc<dyn FinancialReportRepository>,
    max_period_quarters: usize,
}

impl std::fmt::Debug for FinancialReportService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinancialReportService")
            .field("max_period_quarters", &self.max_period_quarters)
            .finish_non_exhaustive()
    }
}

impl FinancialReportService {
    /// Creates a service backed by the given repository.
    #[must_use]
    pub fn new(repo: Arc<dyn FinancialReportRepository>) -> Self {
        Self {
            repo,
            max_period_quarters: DEFAULT_MAX_PERIOD_QUARTERS,
        }
    }

    /// Caps the number of quarters a period query may span.
    #[must_use]
    pub fn with_max_period_quarters(mut self, max: usize) -> Self {
        self.max_period_quarters = max;
        self
    }

    fn check_period(&self, period: Period) -> Result<(), ReportError> {
        period.validate()?;
        let quarters = period.quarter_count();
        if quarters > self.max_period_quarters {
            return Err(ReportError::PeriodTooLong {
                quarters,
                max: self.max_period_quarters,
            });
        }
        Ok(())
    }

    /// Validates and stores a new report.
    ///
    /// # Errors
    ///
    /// Returns a validation error for negative revenue or costs or an invalid
    /// quarter (the repository is not called), or `ReportError::Repository`.
    pub async fn create(&self, report: NewFinancialReport) -> Result<FinancialReport, ReportError> {
        if let Err(e) = report.validate() {
            warn!(company_id = %report.company_id, error = %e, "rejected financial report");
            return Err(e);
        }

        let created = self
            .repo
            .create(report)
            .await
            .map_err(|e| ReportError::repository("creating financial report", e))?;

        info!(
            report_id = %created.id,
            company_id = %created.company_id,
            year = created.year,
            quarter = created.quarter,
            "financial report created"
        );
        Ok(created)
    }

    /// Loads a single report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NotFound` if the report does not exist.
    pub async fn get_by_id(&self, id: FinancialReportId) -> Result<FinancialReport, ReportError> {
        self.repo.get_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ReportError::NotFound(id),
            e => ReportError::repository("getting financial report by id", e),
        })
    }

    /// Collects a company's reports for every quarter of `period`.
    ///
    /// Quarters without a report are skipped. The first storage failure aborts
    /// the whole call; no partial collection is returned.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidPeriod` or `ReportError::PeriodTooLong`
    /// before any repository call, or `ReportError::Repository`.
    pub async fn get_by_company(
        &self,
        company_id: CompanyId,
        period: Period,
    ) -> Result<ReportCollection, ReportError> {
        if let Err(e) = self.check_period(period) {
            warn!(%company_id, %period, error = %e, "rejected report period");
            return Err(e);
        }

        let mut collection = ReportCollection::new(period);
        for quarter in period.quarters() {
            match self.repo.get_by_quarter(company_id, quarter).await {
                Ok(report) => collection.reports.push(report),
                Err(RepositoryError::NotFound) => {
                    debug!(%company_id, %quarter, "no financial report for quarter");
                }
                Err(e) => {
                    error!(%company_id, %quarter, error = %e, "failed to fetch financial report");
                    return Err(ReportError::repository(
                        format!("fetching report for {quarter}"),
                        e,
                    ));
                }
            }
        }

        debug!(
            %company_id,
            %period,
            reports = collection.len(),
            "financial reports collected"
        );
        Ok(collection)
    }

    /// Collects the reports of several companies over one period.
    ///
    /// Companies are visited in the given order; each company's reports stay in
    /// calendar order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_by_company`].
    pub async fn get_by_companies(
        &self,
        companies: &[CompanyId],
        period: Period,
    ) -> Result<ReportCollection, ReportError> {
        self.check_period(period)?;

        let mut rollup = ReportCollection::new(period);
        for &company_id in companies {
            let collection = self.get_by_company(company_id, period).await?;
            rollup.reports.extend(collection.reports);
        }
        Ok(rollup)
    }

    /// Finds the company with the highest profit over `period`.
    ///
    /// Ties go to the company listed first. Returns `None` for an empty list.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_by_company`].
    pub async fn most_profitable(
        &self,
        companies: &[CompanyId],
        period: Period,
    ) -> Result<Option<(CompanyId, ReportCollection)>, ReportError> {
        self.check_period(period)?;

        let mut best: Option<(CompanyId, ReportCollection)> = None;
        for &company_id in companies {
            let collection = self.get_by_company(company_id, period).await?;
            let is_better = best
                .as_ref()
                .is_none_or(|(_, current)| collection.profit() > current.profit());
            if is_better {
                best = Some((company_id, collection));
            }
        }
        Ok(best)
    }

    /// Applies a partial update to a report.
    ///
    /// An empty change set is a no-op and does not reach the repository.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative amount or an invalid quarter,
    /// `ReportError::NotFound`, or `ReportError::Repository`.
    pub async fn update(
        &self,
        id: FinancialReportId,
        changes: FinancialReportChanges,
    ) -> Result<(), ReportError> {
        changes.validate()?;
        if changes.is_empty() {
            debug!(report_id = %id, "empty financial report update");
            return Ok(());
        }

        self.repo.update(id, changes).await.map_err(|e| match e {
            RepositoryError::NotFound => ReportError::NotFound(id),
            e => ReportError::repository("updating financial report", e),
        })?;

        info!(report_id = %id, "financial report updated");
        Ok(())
    }

    /// Deletes a report.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NotFound` or `ReportError::Repository`, as reported
    /// by the repository.
    pub async fn delete_by_id(&self, id: FinancialReportId) -> Result<(), ReportError> {
        self.repo.delete_by_id(id).await.map_err(|e| match e {
            RepositoryError::NotFound => ReportError::NotFound(id),
            e => ReportError::repository("deleting financial report by id", e),
        })?;

        info!(report_id = %id, "financial report deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fiscal::FiscalQuarter;
    use crate::reports::repository::MockFinancialReportRepository;
    use mockall::predicate::eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn service(repo: MockFinancialReportRepository) -> FinancialReportService {
        FinancialReportService::new(Arc::new(repo))
    }

    fn report(
        company_id: CompanyId,
        year: i32,
        quarter: u8,
        revenue: Decimal,
        costs: Decimal,
    ) -> FinancialReport {
        FinancialReport {
            id: FinancialReportId::new(),
            company_id,
            revenue,
            costs,
            year,
            quarter,
        }
    }

    fn new_report(revenue: Decimal, costs: Decimal, quarter: u8) -> NewFinancialReport {
        NewFinancialReport {
            company_id: CompanyId::new(),
            revenue,
            costs,
            year: 1,
            quarter,
        }
    }

    #[tokio::test]
    async fn test_create_delegates_to_repository() {
        let mut repo = MockFinancialReportRepository::new();
        let input = new_report(dec!(1), dec!(1), 1);
        let expected = input.clone();
        repo.expect_create()
            .withf(move |r| *r == expected)
            .times(1)
            .returning(|r| {
                Ok(FinancialReport {
                    id: FinancialReportId::new(),
                    company_id: r.company_id,
                    revenue: r.revenue,
                    costs: r.costs,
                    year: r.year,
                    quarter: r.quarter,
                })
            });

        let created = service(repo).create(input.clone()).await.unwrap();

        assert_eq!(created.company_id, input.company_id);
        assert_eq!(created.revenue, dec!(1));
    }

    #[tokio::test]
    async fn test_create_negative_revenue_never_reaches_repository() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_create().never();

        let err = service(repo)
            .create(new_report(dec!(-1), dec!(1), 1))
            .await
            .unwrap_err();

        assert!(matches!(err, ReportError::NegativeRevenue));
        assert_eq!(err.to_string(), "revenue cannot be negative");
    }

    #[tokio::test]
    async fn test_create_rejects_negative_costs_and_bad_quarter() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_create().never();
        let svc = service(repo);

        let err = svc.create(new_report(dec!(1), dec!(-0.01), 1)).await.unwrap_err();
        assert!(matches!(err, ReportError::NegativeCosts));

        let err = svc.create(new_report(dec!(1), dec!(1), 5)).await.unwrap_err();
        assert!(matches!(err, ReportError::InvalidQuarter(5)));
    }

    #[tokio::test]
    async fn test_create_accepts_zero_amounts() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_create().times(1).returning(|r| {
            Ok(FinancialReport {
                id: FinancialReportId::new(),
                company_id: r.company_id,
                revenue: r.revenue,
                costs: r.costs,
                year: r.year,
                quarter: r.quarter,
            })
        });

        let created = service(repo)
            .create(new_report(Decimal::ZERO, Decimal::ZERO, 4))
            .await
            .unwrap();
        assert_eq!(created.profit(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_create_wraps_repository_error() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_create()
            .returning(|_| Err(RepositoryError::Storage("sql error".to_string())));

        let err = service(repo)
            .create(new_report(dec!(1), dec!(1), 1))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "creating financial report: sql error");
    }

    #[tokio::test]
    async fn test_get_by_id_maps_not_found() {
        let id = FinancialReportId::new();
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_id()
            .with(eq(id))
            .returning(|_| Err(RepositoryError::NotFound));

        let err = service(repo).get_by_id(id).await.unwrap_err();
        assert!(matches!(err, ReportError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_get_by_id_wraps_storage_error() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_id()
            .returning(|_| Err(RepositoryError::Storage("sql error".to_string())));

        let err = service(repo)
            .get_by_id(FinancialReportId::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "getting financial report by id: sql error");
    }

    #[tokio::test]
    async fn test_get_by_company_skips_missing_quarters() {
        let company_id = CompanyId::new();
        let q1 = report(company_id, 2021, 1, dec!(100), dec!(40));
        let q3 = report(company_id, 2021, 3, dec!(200), dec!(50));
        let stored = vec![q1.clone(), q3.clone()];

        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter()
            .withf(move |c, _| *c == company_id)
            .times(4)
            .returning(move |_, quarter| {
                stored
                    .iter()
                    .find(|r| r.fiscal_quarter() == quarter)
                    .cloned()
                    .ok_or(RepositoryError::NotFound)
            });

        let period = Period::new(2021, 1, 2021, 4).unwrap();
        let collection = service(repo).get_by_company(company_id, period).await.unwrap();

        assert_eq!(collection.reports, vec![q1, q3]);
        assert_eq!(collection.period, period);
        assert_eq!(collection.revenue(), dec!(300));
        assert_eq!(collection.costs(), dec!(90));
        assert_eq!(collection.profit(), dec!(210));
    }

    #[tokio::test]
    async fn test_get_by_company_queries_quarters_in_calendar_order() {
        let mut seq = mockall::Sequence::new();
        let mut repo = MockFinancialReportRepository::new();
        for (year, quarter) in [(2021, 4), (2022, 1), (2022, 2)] {
            repo.expect_get_by_quarter()
                .withf(move |_, q| *q == FiscalQuarter { year, quarter })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Err(RepositoryError::NotFound));
        }

        let period = Period::new(2021, 4, 2022, 2).unwrap();
        let collection = service(repo)
            .get_by_company(CompanyId::new(), period)
            .await
            .unwrap();
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_company_all_missing_is_empty_not_error() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter()
            .times(8)
            .returning(|_, _| Err(RepositoryError::NotFound));

        let period = Period::new(2020, 1, 2021, 4).unwrap();
        let collection = service(repo)
            .get_by_company(CompanyId::new(), period)
            .await
            .unwrap();

        assert!(collection.is_empty());
        assert_eq!(collection.revenue(), Decimal::ZERO);
        assert_eq!(collection.costs(), Decimal::ZERO);
        assert_eq!(collection.profit(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_get_by_company_invalid_period_makes_no_calls() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter().never();

        let period = Period {
            start_year: 2,
            start_quarter: 1,
            end_year: 1,
            end_quarter: 1,
        };
        let err = service(repo)
            .get_by_company(CompanyId::new(), period)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "end of period must be after start");
    }

    #[tokio::test]
    async fn test_get_by_company_fails_fast_on_storage_error() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter()
            .withf(|_, q| q.quarter == 1)
            .times(1)
            .returning(|c, _| Ok(report(c, 2021, 1, dec!(10), dec!(5))));
        repo.expect_get_by_quarter()
            .withf(|_, q| q.quarter == 2)
            .times(1)
            .returning(|_, _| Err(RepositoryError::Storage("connection reset".to_string())));
        repo.expect_get_by_quarter()
            .withf(|_, q| q.quarter > 2)
            .never();

        let period = Period::new(2021, 1, 2021, 4).unwrap();
        let err = service(repo)
            .get_by_company(CompanyId::new(), period)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "fetching report for 2021 Q2: connection reset");
    }

    #[tokio::test]
    async fn test_period_longer_than_limit_never_reaches_repository() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter().never();
        let svc = service(repo).with_max_period_quarters(8);
        let period = Period::new(2020, 1, 2022, 1).unwrap();

        let err = svc
            .get_by_company(CompanyId::new(), period)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::PeriodTooLong { quarters: 9, max: 8 }));
        assert!(err.is_validation());

        let companies = [CompanyId::new()];
        assert!(svc.get_by_companies(&companies, period).await.is_err());
        assert!(svc.most_profitable(&companies, period).await.is_err());
    }

    #[tokio::test]
    async fn test_period_at_limit_is_queried() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter()
            .times(8)
            .returning(|_, _| Err(RepositoryError::NotFound));
        let svc = service(repo).with_max_period_quarters(8);
        let period = Period::new(2020, 1, 2021, 4).unwrap();

        let collection = svc.get_by_company(CompanyId::new(), period).await.unwrap();
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn test_get_by_company_is_repeatable_on_unchanged_store() {
        let company_id = CompanyId::new();
        let stored = vec![
            report(company_id, 2021, 4, dec!(70), dec!(20)),
            report(company_id, 2022, 2, dec!(30), dec!(10)),
        ];

        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter()
            .times(8)
            .returning(move |_, quarter| {
                stored
                    .iter()
                    .find(|r| r.fiscal_quarter() == quarter)
                    .cloned()
                    .ok_or(RepositoryError::NotFound)
            });

        let svc = service(repo);
        let period = Period::new(2021, 3, 2022, 2).unwrap();
        let first = svc.get_by_company(company_id, period).await.unwrap();
        let second = svc.get_by_company(company_id, period).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.profit(), dec!(70));
    }

    #[tokio::test]
    async fn test_create_rejects_unstorable_amounts() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_create().never();
        let svc = service(repo);

        let err = svc
            .create(new_report(dec!(0.00001), dec!(1), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::AmountTooPrecise(_)));

        let err = svc
            .create(new_report(dec!(1), dec!(1000000000000000), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::AmountOutOfRange(_)));
    }

    #[tokio::test]
    async fn test_get_by_companies_concatenates_in_order() {
        let first = CompanyId::new();
        let second = CompanyId::new();
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter()
            .returning(|c, q| Ok(report(c, q.year, q.quarter, dec!(10), dec!(1))));

        let period = Period::new(2022, 1, 2022, 2).unwrap();
        let rollup = service(repo)
            .get_by_companies(&[first, second], period)
            .await
            .unwrap();

        let owners: Vec<CompanyId> = rollup.reports.iter().map(|r| r.company_id).collect();
        assert_eq!(owners, vec![first, first, second, second]);
        assert_eq!(rollup.revenue(), dec!(40));
        assert_eq!(rollup.profit(), dec!(36));
    }

    #[tokio::test]
    async fn test_most_profitable_prefers_first_on_tie() {
        let poor = CompanyId::new();
        let rich = CompanyId::new();
        let also_rich = CompanyId::new();
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_get_by_quarter().returning(move |c, q| {
            let revenue = if c == poor { dec!(10) } else { dec!(100) };
            Ok(report(c, q.year, q.quarter, revenue, dec!(5)))
        });

        let period = Period::new(2022, 1, 2022, 4).unwrap();
        let svc = service(repo);
        let (winner, collection) = svc
            .most_profitable(&[poor, rich, also_rich], period)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(winner, rich);
        assert_eq!(collection.profit(), dec!(380));
        assert!(svc.most_profitable(&[], period).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_passes_explicit_zero() {
        let id = FinancialReportId::new();
        let changes = FinancialReportChanges {
            revenue: Some(Decimal::ZERO),
            ..Default::default()
        };
        let expected = changes.clone();
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_update()
            .withf(move |i, c| *i == id && *c == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        service(repo).update(id, changes).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_empty_changes_is_noop() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_update().never();

        service(repo)
            .update(FinancialReportId::new(), FinancialReportChanges::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_validates_set_fields() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_update().never();
        let svc = service(repo);

        let negative = FinancialReportChanges {
            costs: Some(dec!(-5)),
            ..Default::default()
        };
        let err = svc.update(FinancialReportId::new(), negative).await.unwrap_err();
        assert!(matches!(err, ReportError::NegativeCosts));

        let bad_quarter = FinancialReportChanges {
            quarter: Some(0),
            ..Default::default()
        };
        let err = svc.update(FinancialReportId::new(), bad_quarter).await.unwrap_err();
        assert!(matches!(err, ReportError::InvalidQuarter(0)));
    }

    #[tokio::test]
    async fn test_update_wraps_repository_error() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_update()
            .returning(|_, _| Err(RepositoryError::Storage("sql error".to_string())));

        let changes = FinancialReportChanges {
            year: Some(2024),
            ..Default::default()
        };
        let err = service(repo)
            .update(FinancialReportId::new(), changes)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "updating financial report: sql error");
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let id = FinancialReportId::new();
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_delete_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(()));

        service(repo).delete_by_id(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_by_id_propagates_errors() {
        let mut repo = MockFinancialReportRepository::new();
        repo.expect_delete_by_id()
            .returning(|_| Err(RepositoryError::Storage("sql error".to_string())));

        let err = service(repo)
            .delete_by_id(FinancialReportId::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "deleting financial report by id: sql error");
    }
}
