//! Auth domain - OTP authentication and session issuance
//!
//! Flow: client requests a code -> issuer writes it to the credential
//! store -> client submits the code -> verifier consumes it, probes
//! profile completion, and mints a session token.
//!
//! Responsibilities:
//! - Mobile-number OTP issuance and verification
//! - Session/JWT token management
//! - Password registration as the non-OTP signup path
//! - Durable audit trail for every credential-store mutation

pub mod actions;
pub mod errors;
pub mod jwt;
pub mod models;
pub mod otp;
pub mod password;
pub mod types;

pub use errors::{AuthError, AuthResult};
pub use jwt::{Claims, JwtService};
pub use types::Role;
