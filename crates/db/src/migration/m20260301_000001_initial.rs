//! Initial schema: companies and their quarterly financial reports.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(FIN_REPORTS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS fin_reports CASCADE;")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS companies CASCADE;")
            .await?;
        Ok(())
    }
}

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL,
    activity_field_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    city VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Owner rollups list an entrepreneur's companies oldest first
CREATE INDEX idx_companies_owner ON companies(owner_id, created_at);

CREATE INDEX idx_companies_activity_field ON companies(activity_field_id);
";

const FIN_REPORTS_SQL: &str = r"
CREATE TABLE fin_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    revenue NUMERIC(19, 4) NOT NULL,
    costs NUMERIC(19, 4) NOT NULL,
    year INTEGER NOT NULL,
    quarter SMALLINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fin_reports_quarter CHECK (quarter BETWEEN 1 AND 4),
    CONSTRAINT chk_fin_reports_revenue CHECK (revenue >= 0),
    CONSTRAINT chk_fin_reports_costs CHECK (costs >= 0),
    -- One report per company per quarter; also serves the per-quarter lookup
    CONSTRAINT uq_fin_reports_company_quarter UNIQUE (company_id, year, quarter)
);
";
