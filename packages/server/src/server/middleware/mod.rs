// HTTP middleware
pub mod client_meta;
pub mod jwt_auth;

pub use client_meta::*;
pub use jwt_auth::*;
