// Middleware for access-token authentication and CORS

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
