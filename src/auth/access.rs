use std::collections::HashMap;

use axum::http::Method;
use once_cell::sync::Lazy;

use crate::database::models::Role;

/// Every protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListLeads,
    GetLead,
    CreateLead,
    ReplaceLead,
    PatchLead,
    DeleteLead,
    LeadsByStatus,
    LeadsBySource,
    SearchLeads,
    LeadStatistics,
    LeadCount,
    CurrentUser,
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Operation::ListLeads,
        Operation::GetLead,
        Operation::CreateLead,
        Operation::ReplaceLead,
        Operation::PatchLead,
        Operation::DeleteLead,
        Operation::LeadsByStatus,
        Operation::LeadsBySource,
        Operation::SearchLeads,
        Operation::LeadStatistics,
        Operation::LeadCount,
        Operation::CurrentUser,
    ];

    pub fn minimum_role(&self) -> Role {
        match self {
            Operation::DeleteLead => Role::Manager,
            Operation::ListLeads
            | Operation::GetLead
            | Operation::CreateLead
            | Operation::ReplaceLead
            | Operation::PatchLead
            | Operation::LeadsByStatus
            | Operation::LeadsBySource
            | Operation::SearchLeads
            | Operation::LeadStatistics
            | Operation::LeadCount
            | Operation::CurrentUser => Role::SalesRep,
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        role >= self.minimum_role()
    }
}

/// (method, route template) → operation, for every protected route.
pub static ROUTE_OPERATIONS: Lazy<HashMap<(Method, &'static str), Operation>> = Lazy::new(|| {
    HashMap::from([
        ((Method::GET, "/api/v1/leads"), Operation::ListLeads),
        ((Method::POST, "/api/v1/leads"), Operation::CreateLead),
        ((Method::GET, "/api/v1/leads/search"), Operation::SearchLeads),
        ((Method::GET, "/api/v1/leads/stats"), Operation::LeadStatistics),
        ((Method::GET, "/api/v1/leads/count"), Operation::LeadCount),
        ((Method::GET, "/api/v1/leads/status/:status"), Operation::LeadsByStatus),
        ((Method::GET, "/api/v1/leads/source/:source"), Operation::LeadsBySource),
        ((Method::GET, "/api/v1/leads/:id"), Operation::GetLead),
        ((Method::PUT, "/api/v1/leads/:id"), Operation::ReplaceLead),
        ((Method::PATCH, "/api/v1/leads/:id"), Operation::PatchLead),
        ((Method::DELETE, "/api/v1/leads/:id"), Operation::DeleteLead),
        ((Method::GET, "/api/v1/auth/me"), Operation::CurrentUser),
    ])
});

pub fn operation_for(method: &Method, route: &str) -> Option<Operation> {
    ROUTE_OPERATIONS.get(&(method.clone(), route)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_delete_needs_manager() {
        for op in Operation::ALL {
            let expected = if *op == Operation::DeleteLead { Role::Manager } else { Role::SalesRep };
            assert_eq!(op.minimum_role(), expected, "{:?}", op);
        }
        assert!(!Operation::DeleteLead.permits(Role::SalesRep));
        assert!(Operation::DeleteLead.permits(Role::Manager));
        assert!(Operation::DeleteLead.permits(Role::Admin));
        assert!(Operation::ListLeads.permits(Role::SalesRep));
    }

    #[test]
    fn every_operation_has_a_route() {
        for op in Operation::ALL {
            assert!(ROUTE_OPERATIONS.values().any(|o| o == op), "{:?} is unrouted", op);
        }
        assert_eq!(operation_for(&Method::DELETE, "/api/v1/leads/:id"), Some(Operation::DeleteLead));
        assert_eq!(operation_for(&Method::POST, "/api/v1/leads/:id"), None);
    }
}
