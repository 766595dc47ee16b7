//! # Postgres Backend
//!
//! [`crate::store::ProfileStore`] over `sqlx::PgPool`. Queries are
//! runtime-bound; the schema ships as embedded migrations applied at
//! pool initialization.
//!
//! Nullable-column matching in lookups uses `IS NOT DISTINCT FROM` so a
//! NULL filing date matches a NULL stored date, which plain `=` would
//! not.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use uuid::Uuid;

use cpi_core::{CompanyId, InvestorId};

use crate::error::StoreError;
use crate::rows::{
    AddressRow, CompanyRow, ContactRow, FilingRow, FinancialStatementRow, FundingRoundRow,
    InvestmentRow, InvestorRow, LegalCaseRow, NewsRow, OfficialRow, RelationshipRow,
    RoundInvestorRow,
};
use crate::store::ProfileStore;

/// Initialize the connection pool and apply embedded migrations.
pub async fn init_pool(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(database_url)
        .await?;
    tracing::info!("connected to PostgreSQL");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;
    tracing::info!("database migrations applied");

    Ok(pool)
}

/// Postgres-backed profile store.
#[derive(Debug, Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    /// Wrap an initialized pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn upsert_company(&self, row: &CompanyRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO companies (id, name, name_lower, registration_number, tax_number,
             sector, industry, company_status, founded_date, website, email, phone,
             description, is_listed, stock_exchange, ticker_symbol, employee_count,
             logo_url, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                     $16, $17, $18, $19, $20)
             ON CONFLICT (id) DO UPDATE SET
               name = EXCLUDED.name,
               name_lower = EXCLUDED.name_lower,
               registration_number = EXCLUDED.registration_number,
               tax_number = EXCLUDED.tax_number,
               sector = EXCLUDED.sector,
               industry = EXCLUDED.industry,
               company_status = EXCLUDED.company_status,
               founded_date = EXCLUDED.founded_date,
               website = EXCLUDED.website,
               email = EXCLUDED.email,
               phone = EXCLUDED.phone,
               description = EXCLUDED.description,
               is_listed = EXCLUDED.is_listed,
               stock_exchange = EXCLUDED.stock_exchange,
               ticker_symbol = EXCLUDED.ticker_symbol,
               employee_count = EXCLUDED.employee_count,
               logo_url = EXCLUDED.logo_url,
               updated_at = EXCLUDED.updated_at",
        )
        .bind(row.id.0)
        .bind(&row.name)
        .bind(&row.name_lower)
        .bind(&row.registration_number)
        .bind(&row.tax_number)
        .bind(&row.sector)
        .bind(&row.industry)
        .bind(&row.company_status)
        .bind(row.founded_date)
        .bind(&row.website)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.description)
        .bind(row.is_listed)
        .bind(&row.stock_exchange)
        .bind(&row.ticker_symbol)
        .bind(row.employee_count)
        .bind(&row.logo_url)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_company(&self, row: &CompanyRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO companies (id, name, name_lower, company_status, is_listed,
             created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(row.id.0)
        .bind(&row.name)
        .bind(&row.name_lower)
        .bind(&row.company_status)
        .bind(row.is_listed)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_company(&self, id: CompanyId) -> Result<Option<CompanyRow>, StoreError> {
        let row = sqlx::query(
            "SELECT id, name, name_lower, registration_number, tax_number, sector,
             industry, company_status, founded_date, website, email, phone, description,
             is_listed, stock_exchange, ticker_symbol, employee_count, logo_url,
             created_at, updated_at
             FROM companies WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> Result<CompanyRow, sqlx::Error> {
            Ok(CompanyRow {
                id: CompanyId(r.try_get::<Uuid, _>("id")?),
                name: r.try_get("name")?,
                name_lower: r.try_get("name_lower")?,
                registration_number: r.try_get("registration_number")?,
                tax_number: r.try_get("tax_number")?,
                sector: r.try_get("sector")?,
                industry: r.try_get("industry")?,
                company_status: r.try_get("company_status")?,
                founded_date: r.try_get("founded_date")?,
                website: r.try_get("website")?,
                email: r.try_get("email")?,
                phone: r.try_get("phone")?,
                description: r.try_get("description")?,
                is_listed: r.try_get("is_listed")?,
                stock_exchange: r.try_get("stock_exchange")?,
                ticker_symbol: r.try_get("ticker_symbol")?,
                employee_count: r.try_get("employee_count")?,
                logo_url: r.try_get("logo_url")?,
                created_at: r.try_get("created_at")?,
                updated_at: r.try_get("updated_at")?,
            })
        })
        .transpose()
        .map_err(Into::into)
    }

    async fn find_company_by_name_lower(
        &self,
        name_lower: &str,
    ) -> Result<Option<CompanyId>, StoreError> {
        let row = sqlx::query("SELECT id FROM companies WHERE name_lower = $1 LIMIT 1")
            .bind(name_lower)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get::<Uuid, _>("id").map(CompanyId))
            .transpose()
            .map_err(Into::into)
    }

    async fn delete_addresses(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM company_addresses WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_addresses(&self, rows: &[AddressRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO company_addresses (id, company_id, address_type, street, city,
                 state_province, postal_code, country, is_primary, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(&row.address_type)
            .bind(&row.street)
            .bind(&row.city)
            .bind(&row.state_province)
            .bind(&row.postal_code)
            .bind(&row.country)
            .bind(row.is_primary)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_contacts(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM company_contacts WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_contacts(&self, rows: &[ContactRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO company_contacts (id, company_id, contact_name, title, email,
                 phone, is_primary, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(&row.contact_name)
            .bind(&row.title)
            .bind(&row.email)
            .bind(&row.phone)
            .bind(row.is_primary)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_officials(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM key_officials WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_officials(&self, rows: &[OfficialRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO key_officials (id, company_id, full_name, position, email,
                 phone, appointed_date, biography, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(&row.full_name)
            .bind(&row.position)
            .bind(&row.email)
            .bind(&row.phone)
            .bind(row.appointed_date)
            .bind(&row.biography)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_financials(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM financial_statements WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_financials(&self, rows: &[FinancialStatementRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO financial_statements (id, company_id, fiscal_year,
                 reporting_period, total_revenue, gross_profit, operating_profit,
                 net_profit, total_assets, current_assets, total_liabilities,
                 current_liabilities, shareholders_equity, operating_cash_flow,
                 investing_cash_flow, financing_cash_flow, debt_to_equity, current_ratio,
                 return_on_equity, return_on_assets, profit_margin, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                         $15, $16, $17, $18, $19, $20, $21, $22, $23)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(row.fiscal_year)
            .bind(&row.reporting_period)
            .bind(row.total_revenue)
            .bind(row.gross_profit)
            .bind(row.operating_profit)
            .bind(row.net_profit)
            .bind(row.total_assets)
            .bind(row.current_assets)
            .bind(row.total_liabilities)
            .bind(row.current_liabilities)
            .bind(row.shareholders_equity)
            .bind(row.operating_cash_flow)
            .bind(row.investing_cash_flow)
            .bind(row.financing_cash_flow)
            .bind(row.debt_to_equity)
            .bind(row.current_ratio)
            .bind(row.return_on_equity)
            .bind(row.return_on_assets)
            .bind(row.profit_margin)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_funding_rounds(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM funding_rounds WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_funding_rounds(&self, rows: &[FundingRoundRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO funding_rounds (id, company_id, round_type, round_name,
                 funding_date, amount_raised, pre_money_valuation, post_money_valuation,
                 round_status, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(&row.round_type)
            .bind(&row.round_name)
            .bind(row.funding_date)
            .bind(row.amount_raised)
            .bind(row.pre_money_valuation)
            .bind(row.post_money_valuation)
            .bind(&row.round_status)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_round_investors(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query(
            "DELETE FROM funding_investors WHERE round_id IN
             (SELECT id FROM funding_rounds WHERE company_id = $1)",
        )
        .bind(company.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_round_investors(&self, rows: &[RoundInvestorRow]) -> Result<(), StoreError> {
        for row in rows {
            // No updated_at column on the association table.
            sqlx::query(
                "INSERT INTO funding_investors (id, round_id, investor_id, amount_invested,
                 is_lead, board_seat, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(row.id.0)
            .bind(row.round_id.0)
            .bind(row.investor_id.0)
            .bind(row.amount_invested)
            .bind(row.is_lead)
            .bind(row.board_seat)
            .bind(row.created_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_investments(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM company_investments WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_investments(&self, rows: &[InvestmentRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO company_investments (id, company_id, invested_in_company_id,
                 investment_type, investment_date, amount_invested, stake_percentage,
                 created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(row.invested_in_company_id.0)
            .bind(&row.investment_type)
            .bind(row.investment_date)
            .bind(row.amount_invested)
            .bind(row.stake_percentage)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_filings(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM regulatory_filings WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_filings(&self, rows: &[FilingRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO regulatory_filings (id, company_id, filing_type, filing_date,
                 filing_number, authority, description, document_url, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(&row.filing_type)
            .bind(row.filing_date)
            .bind(&row.filing_number)
            .bind(&row.authority)
            .bind(&row.description)
            .bind(&row.document_url)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_legal_cases(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM legal_proceedings WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_legal_cases(&self, rows: &[LegalCaseRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO legal_proceedings (id, company_id, case_title, case_number,
                 court, case_status, filed_date, description, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(&row.case_title)
            .bind(&row.case_number)
            .bind(&row.court)
            .bind(&row.case_status)
            .bind(row.filed_date)
            .bind(&row.description)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_news(&self, company: CompanyId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM company_news WHERE company_id = $1")
            .bind(company.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_news(&self, rows: &[NewsRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO company_news (id, company_id, title, source, url,
                 published_date, summary, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(row.id.0)
            .bind(row.company_id.0)
            .bind(&row.title)
            .bind(&row.source)
            .bind(&row.url)
            .bind(row.published_date)
            .bind(&row.summary)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn delete_relationships(&self, company: CompanyId) -> Result<(), StoreError> {
        // The company may sit on either endpoint of the edge.
        sqlx::query(
            "DELETE FROM company_relationships
             WHERE parent_company_id = $1 OR subsidiary_company_id = $1",
        )
        .bind(company.0)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_relationships(&self, rows: &[RelationshipRow]) -> Result<(), StoreError> {
        for row in rows {
            sqlx::query(
                "INSERT INTO company_relationships (id, parent_company_id,
                 subsidiary_company_id, relationship_type, ownership_percentage,
                 effective_date, notes, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(row.id.0)
            .bind(row.parent_company_id.0)
            .bind(row.subsidiary_company_id.0)
            .bind(&row.relationship_type)
            .bind(row.ownership_percentage)
            .bind(row.effective_date)
            .bind(&row.notes)
            .bind(row.created_at)
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn find_investor(
        &self,
        name: &str,
        investor_type: &str,
    ) -> Result<Option<InvestorId>, StoreError> {
        let row = sqlx::query(
            "SELECT id FROM investors WHERE name = $1 AND investor_type = $2 LIMIT 1",
        )
        .bind(name)
        .bind(investor_type)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| r.try_get::<Uuid, _>("id").map(InvestorId))
            .transpose()
            .map_err(Into::into)
    }

    async fn insert_investor(&self, row: &InvestorRow) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO investors (id, name, investor_type, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(row.id.0)
        .bind(&row.name)
        .bind(&row.investor_type)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_filing_document(
        &self,
        company: CompanyId,
        filing_type: Option<&str>,
        filing_date: Option<NaiveDate>,
        filing_number: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        let row = sqlx::query(
            "SELECT document_url FROM regulatory_filings
             WHERE company_id = $1
               AND filing_type IS NOT DISTINCT FROM $2
               AND filing_date IS NOT DISTINCT FROM $3
               AND filing_number IS NOT DISTINCT FROM $4
             LIMIT 1",
        )
        .bind(company.0)
        .bind(filing_type)
        .bind(filing_date)
        .bind(filing_number)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| r.try_get::<Option<String>, _>("document_url"))
            .transpose()
            .map_err(StoreError::from)
            .map(|opt| opt.flatten())
    }
}
