//! OTP issuance action.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::domains::auth::actions::is_valid_mobile;
use crate::domains::auth::errors::{AuthError, AuthResult};
use crate::domains::auth::models::{AuditEntry, AuditLogger, ClientMeta, Identity};
use crate::domains::auth::otp;
use crate::domains::auth::types::Role;

/// Result of issuing a code.
#[derive(Debug)]
pub struct OtpIssued {
    /// The generated code. The HTTP layer exposes it to the caller only
    /// outside production.
    pub code: String,
}

/// Issue a one-time code for `mobile`, creating the identity if absent.
///
/// Re-requests overwrite the stored code and expiry in place; only the
/// most recent code is ever valid. `role` applies only when the identity
/// is created here - an existing identity keeps the role it was created
/// with.
pub async fn send_otp(
    mobile: &str,
    role: Role,
    client: &ClientMeta,
    pool: &PgPool,
    audit: &AuditLogger,
) -> AuthResult<OtpIssued> {
    if !is_valid_mobile(mobile) {
        warn!("rejected OTP request with invalid mobile");
        audit
            .record(
                AuditEntry::warning(
                    "SEND_OTP_VALIDATE",
                    mobile,
                    role.as_str(),
                    "Invalid mobile number",
                )
                .with_client(client),
            )
            .await;
        return Err(AuthError::invalid_input(
            "A valid mobile number of at least 10 digits is required",
        ));
    }

    let code = otp::generate_code();
    let expires_at = otp::expiry_from(Utc::now());

    match store_code(mobile, role, &code, expires_at, client, pool, audit).await {
        Ok(identity) => {
            info!(user_id = %identity.id, "OTP issued");
            audit
                .record(
                    AuditEntry::success("SEND_OTP", mobile, identity.role.as_str(), "OTP generated")
                        .with_user(identity.id)
                        .with_client(client),
                )
                .await;
            Ok(OtpIssued { code })
        }
        Err(e) => {
            error!(error = %e, "failed to issue OTP");
            audit
                .record(
                    AuditEntry::error(
                        "SEND_OTP",
                        mobile,
                        role.as_str(),
                        "Failed to issue OTP",
                        format!("{e:?}"),
                    )
                    .with_client(client),
                )
                .await;
            Err(e)
        }
    }
}

/// Persist the code, branching on whether the mobile is already known.
/// Each sub-step leaves its own audit entry.
async fn store_code(
    mobile: &str,
    role: Role,
    code: &str,
    expires_at: chrono::DateTime<Utc>,
    client: &ClientMeta,
    pool: &PgPool,
    audit: &AuditLogger,
) -> AuthResult<Identity> {
    let existing = Identity::find_by_mobile(mobile, pool).await?;
    audit
        .record(
            AuditEntry::success(
                "SEND_OTP_CHECK_USER",
                mobile,
                role.as_str(),
                if existing.is_some() {
                    "Existing identity found"
                } else {
                    "No identity for mobile"
                },
            )
            .with_client(client),
        )
        .await;

    match existing {
        Some(identity) => {
            Identity::set_code(identity.id, code, expires_at, pool).await?;
            audit
                .record(
                    AuditEntry::success(
                        "SEND_OTP_UPDATE_OTP",
                        mobile,
                        identity.role.as_str(),
                        "OTP overwritten for existing identity",
                    )
                    .with_user(identity.id)
                    .with_client(client),
                )
                .await;
            Ok(identity)
        }
        None => {
            let identity = Identity::insert_with_code(mobile, role, code, expires_at, pool).await?;
            audit
                .record(
                    AuditEntry::success(
                        "SEND_OTP_INSERT_USER",
                        mobile,
                        identity.role.as_str(),
                        "Identity created with pending OTP",
                    )
                    .with_user(identity.id)
                    .with_client(client),
                )
                .await;
            Ok(identity)
        }
    }
}
