//! OTP verification action.

use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::domains::auth::errors::{AuthError, AuthResult};
use crate::domains::auth::jwt::JwtService;
use crate::domains::auth::models::{AuditEntry, AuditLogger, ClientMeta, Identity};
use crate::domains::auth::otp;
use crate::domains::auth::types::{redirect_hint, Role, UserSummary};
use crate::domains::profiles;

/// Successful verification outcome.
#[derive(Debug)]
pub struct OtpVerified {
    pub token: String,
    pub user: UserSummary,
    pub profile_completed: bool,
    pub redirect_to: &'static str,
}

/// Verify a submitted code, consume it, and mint a session token.
///
/// A lookup miss answers the same way whether the mobile is unknown or
/// the code is wrong. An expired code is left in place so the caller can
/// tell the user to re-request; a matching, unexpired code is cleared
/// together with its expiry while `is_verified` flips true, all in one
/// durable update.
pub async fn verify_otp(
    mobile: &str,
    code: &str,
    client: &ClientMeta,
    pool: &PgPool,
    audit: &AuditLogger,
    jwt: &JwtService,
) -> AuthResult<OtpVerified> {
    if mobile.trim().is_empty() || code.trim().is_empty() {
        audit
            .record(
                AuditEntry::warning("VERIFY_OTP", mobile, "unknown", "Missing mobile or OTP")
                    .with_client(client),
            )
            .await;
        return Err(AuthError::invalid_input("Mobile number and OTP are required"));
    }

    let Some(identity) = Identity::find_by_mobile_and_code(mobile, code, pool).await? else {
        warn!("OTP verification failed: no matching code");
        audit
            .record(
                AuditEntry::warning("VERIFY_OTP", mobile, "unknown", "Invalid OTP")
                    .with_client(client),
            )
            .await;
        return Err(AuthError::InvalidCode);
    };

    // A matching code with a missing expiry cannot be produced by this
    // service; treat it the same as a stale one.
    let expired = match identity.otp_expires_at {
        Some(expires_at) => otp::is_expired(expires_at, Utc::now()),
        None => true,
    };
    if expired {
        warn!(user_id = %identity.id, "OTP verification failed: code expired");
        audit
            .record(
                AuditEntry::warning("VERIFY_OTP", mobile, identity.role.as_str(), "OTP expired")
                    .with_user(identity.id)
                    .with_client(client),
            )
            .await;
        return Err(AuthError::CodeExpired);
    }

    match consume_and_issue(&identity, pool, jwt).await {
        Ok(outcome) => {
            info!(user_id = %identity.id, role = identity.role.as_str(), "OTP verified");
            audit
                .record(
                    AuditEntry::success(
                        "VERIFY_OTP",
                        mobile,
                        identity.role.as_str(),
                        "OTP verified, session issued",
                    )
                    .with_user(identity.id)
                    .with_client(client),
                )
                .await;
            Ok(outcome)
        }
        Err(e) => {
            error!(user_id = %identity.id, error = %e, "OTP verification failed");
            audit
                .record(
                    AuditEntry::error(
                        "VERIFY_OTP",
                        mobile,
                        identity.role.as_str(),
                        "Failed to complete verification",
                        format!("{e:?}"),
                    )
                    .with_user(identity.id)
                    .with_client(client),
                )
                .await;
            Err(e)
        }
    }
}

/// Clear the code and mint the token under one transaction: if the mint
/// fails, the rolled-back code is still usable for a retry.
async fn consume_and_issue(
    identity: &Identity,
    pool: &PgPool,
    jwt: &JwtService,
) -> AuthResult<OtpVerified> {
    let mut tx = pool.begin().await?;
    Identity::consume_code(identity.id, &mut tx).await?;

    let profile_completed = match identity.role {
        Role::Admin => true,
        Role::Candidate => profiles::candidate_profile_exists(identity.id, pool).await?,
        Role::Employer => profiles::employer_profile_exists(identity.id, pool).await?,
    };

    let token = jwt.issue_token(identity.id, identity.mobile.clone(), identity.role)?;
    tx.commit().await?;

    Ok(OtpVerified {
        token,
        user: UserSummary {
            id: identity.id,
            mobile: identity.mobile.clone(),
            role: identity.role,
            // The committed update above set the flag.
            is_verified: true,
        },
        profile_completed,
        redirect_to: redirect_hint(identity.role, profile_completed),
    })
}
