use async_trait::async_trait;
use sqlx::{self, PgPool};
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{timestamp_now, Lead, NewLead, NewUser, User};
use crate::database::query_builder::QueryBuilder;
use crate::filter::filter::LEAD_COLUMNS;
use crate::filter::{Filter, FilterOrderInfo, LeadCriteria, Page, PageRequest};

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, role, active, created_at, updated_at";

/// Lead persistence. Implemented over Postgres here and in memory for tests.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, DatabaseError>;

    /// One page of matching leads plus the total match count.
    async fn find_page(&self, criteria: &LeadCriteria, request: &PageRequest) -> Result<Page<Lead>, DatabaseError>;

    /// Every matching lead, unpaginated.
    async fn find_all(&self, criteria: &LeadCriteria, order: &[FilterOrderInfo]) -> Result<Vec<Lead>, DatabaseError>;

    async fn count(&self, criteria: &LeadCriteria) -> Result<i64, DatabaseError>;

    async fn insert(&self, lead: NewLead) -> Result<Lead, DatabaseError>;

    /// Overwrite the mutable columns of an existing lead. `None` when the id is gone.
    async fn update(&self, lead: &Lead) -> Result<Option<Lead>, DatabaseError>;

    /// Delete the lead and its activities. `false` when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// Fails with `DatabaseError::Conflict` when the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError>;
}

#[derive(Clone)]
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, DatabaseError> {
        let query = format!("SELECT {} FROM \"leads\" WHERE \"id\" = $1", LEAD_COLUMNS);
        let lead = sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lead)
    }

    async fn find_page(&self, criteria: &LeadCriteria, request: &PageRequest) -> Result<Page<Lead>, DatabaseError> {
        let builder = QueryBuilder::<Lead>::new(Filter::new(criteria.clone()).page(request));
        let total = builder.count(&self.pool).await?;
        let content = builder.select_all(&self.pool).await?;
        debug!("Lead page {} returned {} of {} rows", request.page, content.len(), total);
        Ok(Page::new(content, request, total))
    }

    async fn find_all(&self, criteria: &LeadCriteria, order: &[FilterOrderInfo]) -> Result<Vec<Lead>, DatabaseError> {
        QueryBuilder::<Lead>::new(Filter::new(criteria.clone()).order(order.to_vec()))
            .select_all(&self.pool)
            .await
    }

    async fn count(&self, criteria: &LeadCriteria) -> Result<i64, DatabaseError> {
        QueryBuilder::<Lead>::new(Filter::new(criteria.clone()))
            .count(&self.pool)
            .await
    }

    async fn insert(&self, lead: NewLead) -> Result<Lead, DatabaseError> {
        let now = timestamp_now();
        let query = format!(
            "INSERT INTO \"leads\" (\"company_name\", \"contact_name\", \"email\", \"phone\", \"status\", \"source\", \"owner_id\", \"account_id\", \"created_at\", \"updated_at\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING {}",
            LEAD_COLUMNS
        );
        let created = sqlx::query_as::<_, Lead>(&query)
            .bind(&lead.company_name)
            .bind(&lead.contact_name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(lead.status.as_str())
            .bind(lead.source.as_str())
            .bind(lead.owner_id)
            .bind(lead.account_id)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, lead: &Lead) -> Result<Option<Lead>, DatabaseError> {
        let query = format!(
            "UPDATE \"leads\" SET \"company_name\" = $2, \"contact_name\" = $3, \"email\" = $4, \"phone\" = $5, \
             \"status\" = $6, \"source\" = $7, \"owner_id\" = $8, \"account_id\" = $9, \"updated_at\" = $10 \
             WHERE \"id\" = $1 RETURNING {}",
            LEAD_COLUMNS
        );
        let updated = sqlx::query_as::<_, Lead>(&query)
            .bind(lead.id)
            .bind(&lead.company_name)
            .bind(&lead.contact_name)
            .bind(&lead.email)
            .bind(&lead.phone)
            .bind(lead.status.as_str())
            .bind(lead.source.as_str())
            .bind(lead.owner_id)
            .bind(lead.account_id)
            .bind(lead.updated_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM \"activities\" WHERE \"lead_id\" = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM \"leads\" WHERE \"id\" = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE lower(email) = lower($1)", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let now = timestamp_now();
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, role, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.active)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    DatabaseError::Conflict(format!("User with email {} already exists", user.email))
                }
                other => DatabaseError::Sqlx(other),
            })
    }
}
