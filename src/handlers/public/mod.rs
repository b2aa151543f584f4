// Public handlers: no authentication required.
pub mod auth;
