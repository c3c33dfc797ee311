//! Direct registration action (password credential instead of OTP).

use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::domains::auth::actions::is_valid_mobile;
use crate::domains::auth::errors::{AuthError, AuthResult};
use crate::domains::auth::jwt::JwtService;
use crate::domains::auth::models::{AuditEntry, AuditLogger, ClientMeta, Identity};
use crate::domains::auth::password;
use crate::domains::auth::types::{Role, UserSummary};

/// Successful registration outcome.
#[derive(Debug)]
pub struct Registered {
    pub token: String,
    pub user: UserSummary,
}

/// Register an identity directly, without an OTP round-trip.
///
/// The identity starts unverified: the returned token authenticates the
/// session but `user.is_verified` stays false until an OTP verification
/// completes. A password is optional; without one the identity remains
/// OTP-only.
pub async fn register(
    mobile: &str,
    email: Option<&str>,
    plain_password: Option<&str>,
    role: Role,
    client: &ClientMeta,
    pool: &PgPool,
    audit: &AuditLogger,
    jwt: &JwtService,
) -> AuthResult<Registered> {
    if !is_valid_mobile(mobile) {
        warn!("rejected registration with invalid mobile");
        audit
            .record(
                AuditEntry::warning("REGISTER", mobile, role.as_str(), "Invalid mobile number")
                    .with_client(client),
            )
            .await;
        return Err(AuthError::invalid_input(
            "A valid mobile number of at least 10 digits is required",
        ));
    }

    if Identity::find_by_mobile(mobile, pool).await?.is_some() {
        warn!("rejected duplicate registration");
        audit
            .record(
                AuditEntry::warning(
                    "REGISTER",
                    mobile,
                    role.as_str(),
                    "Mobile already registered",
                )
                .with_client(client),
            )
            .await;
        return Err(AuthError::AlreadyExists);
    }

    let password_hash = match plain_password {
        Some(p) if !p.is_empty() => Some(password::hash_password(p)?),
        _ => None,
    };

    match create_and_issue(mobile, email, password_hash.as_deref(), role, pool, jwt).await {
        Ok(registered) => {
            info!(user_id = %registered.user.id, role = role.as_str(), "identity registered");
            audit
                .record(
                    AuditEntry::success("REGISTER", mobile, role.as_str(), "Identity registered")
                        .with_user(registered.user.id)
                        .with_client(client),
                )
                .await;
            Ok(registered)
        }
        Err(e) => {
            error!(error = %e, "registration failed");
            audit
                .record(
                    AuditEntry::error(
                        "REGISTER",
                        mobile,
                        role.as_str(),
                        "Failed to register identity",
                        format!("{e:?}"),
                    )
                    .with_client(client),
                )
                .await;
            Err(e)
        }
    }
}

async fn create_and_issue(
    mobile: &str,
    email: Option<&str>,
    password_hash: Option<&str>,
    role: Role,
    pool: &PgPool,
    jwt: &JwtService,
) -> AuthResult<Registered> {
    let identity = Identity::insert_registered(mobile, email, password_hash, role, pool)
        .await
        .map_err(|e| {
            // Two concurrent registrations can both pass the duplicate
            // check; the unique index catches the loser.
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AuthError::AlreadyExists
            } else {
                AuthError::Persistence(e)
            }
        })?;

    let token = jwt.issue_token(identity.id, identity.mobile.clone(), identity.role)?;

    Ok(Registered {
        token,
        user: UserSummary {
            id: identity.id,
            mobile: identity.mobile,
            role: identity.role,
            is_verified: false,
        },
    })
}
