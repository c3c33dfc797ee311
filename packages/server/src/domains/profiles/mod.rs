//! Profiles domain - external-collaborator surface.
//!
//! Profile CRUD belongs to a sibling service; the auth core only probes
//! for existence to steer post-login routing.

pub mod models;

pub use models::{candidate_profile_exists, employer_profile_exists};
