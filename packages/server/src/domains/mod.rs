// Domain modules - each owns its models and actions
pub mod auth;
pub mod profiles;
