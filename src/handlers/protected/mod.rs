// Protected handlers: every route here sits behind jwt_auth_middleware and
// access_control_middleware, so AuthUser is always present.
pub mod auth;
pub mod leads;
