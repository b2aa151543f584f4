//! Idempotent DDL for the CRM tables.

use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

pub const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        role VARCHAR(20) NOT NULL DEFAULT 'SALES_REP'
            CHECK (role IN ('SALES_REP', 'MANAGER', 'ADMIN')),
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS accounts (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE CHECK (btrim(name) <> ''),
        industry VARCHAR(100),
        website VARCHAR(255),
        phone VARCHAR(50),
        employee_count INTEGER,
        annual_revenue NUMERIC(15, 2),
        address TEXT,
        owner_id BIGINT NOT NULL REFERENCES users(id),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS contacts (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        email VARCHAR(255),
        phone VARCHAR(50),
        title VARCHAR(100),
        is_primary BOOLEAN NOT NULL DEFAULT FALSE,
        account_id BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS leads (
        id BIGSERIAL PRIMARY KEY,
        company_name VARCHAR(255) NOT NULL,
        contact_name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        phone VARCHAR(50),
        status VARCHAR(20) NOT NULL DEFAULT 'NEW'
            CHECK (status IN ('NEW', 'CONTACTED', 'QUALIFIED', 'LOST', 'CONVERTED')),
        source VARCHAR(20) NOT NULL DEFAULT 'OTHER'
            CHECK (source IN ('WEBSITE', 'REFERRAL', 'COLD_CALL', 'EMAIL', 'TRADE_SHOW', 'SOCIAL_MEDIA', 'OTHER')),
        owner_id BIGINT NOT NULL REFERENCES users(id),
        account_id BIGINT REFERENCES accounts(id) ON DELETE SET NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS opportunities (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        amount NUMERIC(15, 2),
        stage VARCHAR(30) NOT NULL DEFAULT 'PROSPECTING'
            CHECK (stage IN ('PROSPECTING', 'QUALIFICATION', 'NEEDS_ANALYSIS', 'VALUE_PROPOSITION',
                             'ID_DECISION_MAKERS', 'PERCEPTION_ANALYSIS', 'PROPOSAL',
                             'NEGOTIATION_REVIEW', 'CLOSED_WON', 'CLOSED_LOST')),
        probability INTEGER NOT NULL DEFAULT 10 CHECK (probability BETWEEN 0 AND 100),
        close_date DATE,
        account_id BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
        primary_contact_id BIGINT REFERENCES contacts(id) ON DELETE SET NULL,
        owner_id BIGINT NOT NULL REFERENCES users(id),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )"#,
    r#"CREATE TABLE IF NOT EXISTS activities (
        id BIGSERIAL PRIMARY KEY,
        activity_type VARCHAR(20) NOT NULL
            CHECK (activity_type IN ('CALL', 'EMAIL', 'MEETING', 'TASK', 'NOTE')),
        status VARCHAR(20) NOT NULL DEFAULT 'PLANNED'
            CHECK (status IN ('PLANNED', 'COMPLETED', 'CANCELLED')),
        activity_date TIMESTAMP NOT NULL,
        subject VARCHAR(255) NOT NULL,
        description TEXT,
        lead_id BIGINT REFERENCES leads(id) ON DELETE CASCADE,
        contact_id BIGINT REFERENCES contacts(id) ON DELETE CASCADE,
        opportunity_id BIGINT REFERENCES opportunities(id) ON DELETE CASCADE,
        user_id BIGINT NOT NULL REFERENCES users(id),
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        CONSTRAINT activities_single_target CHECK (num_nonnulls(lead_id, contact_id, opportunity_id) = 1)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status)",
    "CREATE INDEX IF NOT EXISTS idx_leads_source ON leads(source)",
    "CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_leads_owner_id ON leads(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_contacts_account_id ON contacts(account_id)",
    "CREATE INDEX IF NOT EXISTS idx_activities_lead_id ON activities(lead_id)",
];

/// Apply every statement inside one transaction.
pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("Schema up to date ({} statements)", STATEMENTS.len());
    Ok(())
}
