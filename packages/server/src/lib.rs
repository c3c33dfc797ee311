// Rozgar - Auth Core
//
// This crate provides the authentication backend for the Rozgar job-matching
// marketplace: OTP issuance and verification for mobile numbers, password
// registration, session-token minting, and the durable audit trail around
// every credential-store mutation. Job, application, and profile CRUD live
// in sibling services and consume the session tokens minted here.

pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
