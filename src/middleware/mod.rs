pub mod access;
pub mod auth;
pub mod response;
pub mod security;

pub use access::access_control_middleware;
pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use security::{cors_layer, with_security_headers};
