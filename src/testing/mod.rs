//! In-memory stores and fixtures for unit and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::app::AppState;
use crate::auth::issue_token;
use crate::config::AppConfig;
use crate::database::models::{timestamp_now, Lead, LeadSource, LeadStatus, NewLead, NewUser, Role, User};
use crate::database::{DatabaseError, LeadStore, UserStore};
use crate::filter::{parse_date_time, FilterOrder, FilterOrderInfo, LeadCriteria, Page, PageRequest};

#[derive(Default)]
pub struct MemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
}

impl MemoryLeadStore {
    /// Store `lead` under the next free id and return the stored copy.
    pub fn seed(&self, mut lead: Lead) -> Lead {
        let mut leads = self.leads.lock().unwrap();
        lead.id = leads.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        leads.push(lead.clone());
        lead
    }

    fn matching(&self, criteria: &LeadCriteria, order: &[FilterOrderInfo]) -> Vec<Lead> {
        let mut found: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|l| criteria.matches(l))
            .cloned()
            .collect();
        found.sort_by(|a, b| FilterOrder::compare(order, a, b));
        found
    }
}

/// An unsaved lead created at `created_at` (`YYYY-MM-DDTHH:MM:SS`), owned by user 1.
pub fn lead_at(company: &str, contact: &str, email: &str, status: LeadStatus, created_at: &str) -> Lead {
    let at = parse_date_time(created_at).unwrap();
    Lead {
        id: 0,
        company_name: company.into(),
        contact_name: contact.into(),
        email: email.into(),
        phone: None,
        status,
        source: LeadSource::Other,
        owner_id: 1,
        account_id: None,
        created_at: at,
        updated_at: at,
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Lead>, DatabaseError> {
        Ok(self.leads.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    async fn find_page(&self, criteria: &LeadCriteria, request: &PageRequest) -> Result<Page<Lead>, DatabaseError> {
        let all = self.matching(criteria, &request.sort);
        let total = all.len() as i64;
        let content = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .collect();
        Ok(Page::new(content, request, total))
    }

    async fn find_all(&self, criteria: &LeadCriteria, order: &[FilterOrderInfo]) -> Result<Vec<Lead>, DatabaseError> {
        Ok(self.matching(criteria, order))
    }

    async fn count(&self, criteria: &LeadCriteria) -> Result<i64, DatabaseError> {
        Ok(self.leads.lock().unwrap().iter().filter(|l| criteria.matches(l)).count() as i64)
    }

    async fn insert(&self, lead: NewLead) -> Result<Lead, DatabaseError> {
        let now = timestamp_now();
        Ok(self.seed(Lead {
            id: 0,
            company_name: lead.company_name,
            contact_name: lead.contact_name,
            email: lead.email,
            phone: lead.phone,
            status: lead.status,
            source: lead.source,
            owner_id: lead.owner_id,
            account_id: lead.account_id,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update(&self, lead: &Lead) -> Result<Option<Lead>, DatabaseError> {
        let mut leads = self.leads.lock().unwrap();
        Ok(leads.iter_mut().find(|l| l.id == lead.id).map(|stored| {
            *stored = lead.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut leads = self.leads.lock().unwrap();
        let before = leads.len();
        leads.retain(|l| l.id != id);
        Ok(leads.len() < before)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn set_active(&self, id: i64, active: bool) {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.active = active;
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DatabaseError::Conflict(user.email));
        }
        let now = timestamp_now();
        let created = User {
            id: users.len() as i64 + 1,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            active: user.active,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }
}

/// App state over memory stores, with one user per role already signed in.
pub struct TestContext {
    pub state: AppState,
    pub leads: Arc<MemoryLeadStore>,
    pub users: Arc<MemoryUserStore>,
    pub config: AppConfig,
}

impl TestContext {
    pub async fn new() -> Self {
        let config = AppConfig::development();
        let leads = Arc::new(MemoryLeadStore::default());
        let users = Arc::new(MemoryUserStore::default());
        for (role, email) in [
            (Role::SalesRep, "rep@salesforge.test"),
            (Role::Manager, "manager@salesforge.test"),
            (Role::Admin, "admin@salesforge.test"),
        ] {
            users
                .insert(NewUser {
                    first_name: role.as_str().to_string(),
                    last_name: "User".to_string(),
                    email: email.to_string(),
                    // Never verified in router tests; login tests register their own users.
                    password_hash: String::new(),
                    role,
                    active: true,
                })
                .await
                .unwrap();
        }
        let state = AppState::new(config.clone(), leads.clone(), users.clone());
        Self { state, leads, users, config }
    }

    /// Bearer token for the seeded user holding `role`.
    pub async fn token_for(&self, role: Role) -> String {
        let email = match role {
            Role::SalesRep => "rep@salesforge.test",
            Role::Manager => "manager@salesforge.test",
            Role::Admin => "admin@salesforge.test",
        };
        let user = self.users.find_by_email(email).await.unwrap().unwrap();
        issue_token(&user, &self.config.security).unwrap().token
    }
}
