pub mod auth_service;
pub mod lead_patch;
pub mod lead_service;

pub use auth_service::{AuthService, AuthUser, LoginRequest, LoginResponse, RegisterRequest};
pub use lead_patch::{LeadPatch, PatchError};
pub use lead_service::{LeadError, LeadRequest, LeadService, LeadStatistics, SearchResults};
