use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domains::auth::types::Role;

/// Identity - one authenticable principal, keyed by mobile number.
///
/// Holds verification state and the current single-use code. Code and
/// expiry are always set and cleared as a pair (the table carries a CHECK
/// constraint for the same invariant), and `is_verified` only ever moves
/// false -> true here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Identity {
    pub id: Uuid,
    pub mobile: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries touching the users table live here
// =============================================================================

impl Identity {
    /// Find identity by mobile number
    pub async fn find_by_mobile(mobile: &str, pool: &PgPool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Identity>("SELECT * FROM users WHERE mobile = $1")
            .bind(mobile)
            .fetch_optional(pool)
            .await
    }

    /// Find the identity whose stored code matches `code` exactly.
    ///
    /// One lookup covers both "unknown mobile" and "wrong code"; callers
    /// cannot distinguish the two, so neither can clients.
    pub async fn find_by_mobile_and_code(
        mobile: &str,
        code: &str,
        pool: &PgPool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Identity>("SELECT * FROM users WHERE mobile = $1 AND otp_code = $2")
            .bind(mobile)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Create an identity with a pending code.
    ///
    /// Two first-time requests for the same mobile can race on the unique
    /// index; the conflict arm folds the loser into an overwrite so the
    /// last write wins and exactly one row exists.
    pub async fn insert_with_code(
        mobile: &str,
        role: Role,
        code: &str,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Identity>(
            r#"
            INSERT INTO users (mobile, role, is_active, is_verified, otp_code, otp_expires_at)
            VALUES ($1, $2, TRUE, FALSE, $3, $4)
            ON CONFLICT (mobile) DO UPDATE
                SET otp_code = EXCLUDED.otp_code,
                    otp_expires_at = EXCLUDED.otp_expires_at,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(mobile)
        .bind(role)
        .bind(code)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Overwrite the pending code and expiry in place (idempotent
    /// re-request; only the most recent code is valid).
    pub async fn set_code(
        id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET otp_code = $2, otp_expires_at = $3, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Consume the pending code: clear code and expiry and mark the
    /// identity verified, in one statement.
    ///
    /// Runs on a caller-held transaction so that dependent steps (token
    /// minting) commit together with it or not at all.
    pub async fn consume_code(id: Uuid, conn: &mut PgConnection) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET otp_code = NULL, otp_expires_at = NULL, is_verified = TRUE, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Create an identity through direct registration (no pending code).
    pub async fn insert_registered(
        mobile: &str,
        email: Option<&str>,
        password_hash: Option<&str>,
        role: Role,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Identity>(
            r#"
            INSERT INTO users (mobile, email, password_hash, role, is_active, is_verified)
            VALUES ($1, $2, $3, $4, TRUE, FALSE)
            RETURNING *
            "#,
        )
        .bind(mobile)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let identity = Identity {
            id: Uuid::new_v4(),
            mobile: "9999999999".to_string(),
            email: None,
            password_hash: Some("$argon2id$...".to_string()),
            role: Role::Candidate,
            is_active: true,
            is_verified: false,
            otp_code: None,
            otp_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
