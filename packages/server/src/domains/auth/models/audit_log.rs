//! Durable audit trail for the authentication pipeline.
//!
//! Entries are write-once: inserted synchronously after the action they
//! describe and never updated or deleted by this service. A write failure
//! is reported to the operational log only; it must never abort the
//! operation being logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::net::IpAddr;
use uuid::Uuid;

/// Outcome recorded with an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Warning,
    Error,
}

/// Client metadata captured per request, attached to every entry.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    pub ip: Option<IpAddr>,
    pub device: Option<String>,
}

/// One persisted record of an authentication-pipeline action.
///
/// `mobile` is denormalized so the record stands on its own even if the
/// identity row outlives it or vice versa.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthAuditLog {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub mobile: String,
    pub role: String,
    pub step: String,
    pub status: AuditStatus,
    pub message: String,
    pub error_detail: Option<String>,
    pub client_ip: Option<String>,
    pub device: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuthAuditLog {
    /// Entries for one mobile, newest first. External consumers also query
    /// by role and time range directly against the table.
    pub async fn find_by_mobile(mobile: &str, pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, AuthAuditLog>(
            "SELECT * FROM auth_logs WHERE mobile = $1 ORDER BY created_at DESC",
        )
        .bind(mobile)
        .fetch_all(pool)
        .await
    }
}

/// Entry payload for [`AuditLogger::record`].
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: Option<Uuid>,
    pub mobile: String,
    pub role: String,
    pub step: &'static str,
    pub status: AuditStatus,
    pub message: String,
    pub error_detail: Option<String>,
    pub client_ip: Option<String>,
    pub device: Option<String>,
}

impl AuditEntry {
    fn new(step: &'static str, status: AuditStatus, mobile: &str, role: &str, message: &str) -> Self {
        Self {
            user_id: None,
            mobile: mobile.to_string(),
            role: role.to_string(),
            step,
            status,
            message: message.to_string(),
            error_detail: None,
            client_ip: None,
            device: None,
        }
    }

    pub fn success(step: &'static str, mobile: &str, role: &str, message: &str) -> Self {
        Self::new(step, AuditStatus::Success, mobile, role, message)
    }

    pub fn warning(step: &'static str, mobile: &str, role: &str, message: &str) -> Self {
        Self::new(step, AuditStatus::Warning, mobile, role, message)
    }

    pub fn error(
        step: &'static str,
        mobile: &str,
        role: &str,
        message: &str,
        detail: String,
    ) -> Self {
        let mut entry = Self::new(step, AuditStatus::Error, mobile, role, message);
        entry.error_detail = Some(detail);
        entry
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_client(mut self, client: &ClientMeta) -> Self {
        self.client_ip = client.ip.map(|ip| ip.to_string());
        self.device = client.device.clone();
        self
    }
}

/// Best-effort durable sink for audit entries.
#[derive(Clone)]
pub struct AuditLogger {
    pool: PgPool,
}

impl AuditLogger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Write one entry. Never fails from the caller's point of view:
    /// failures go to the operational log and the entry is dropped.
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.insert(&entry).await {
            tracing::warn!(
                step = entry.step,
                mobile = %entry.mobile,
                error = %e,
                "audit log write failed"
            );
        }
    }

    /// Each write gets its own pooled connection, released when the write
    /// finishes or fails, so a broken sink cannot hold a resource open.
    async fn insert(&self, entry: &AuditEntry) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            r#"
            INSERT INTO auth_logs
                (user_id, mobile, role, step, status, message, error_detail, client_ip, device)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.mobile)
        .bind(&entry.role)
        .bind(entry.step)
        .bind(entry.status)
        .bind(&entry.message)
        .bind(&entry.error_detail)
        .bind(&entry.client_ip)
        .bind(&entry.device)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builders() {
        let entry = AuditEntry::success("SEND_OTP", "9999999999", "candidate", "OTP generated");
        assert_eq!(entry.status, AuditStatus::Success);
        assert_eq!(entry.step, "SEND_OTP");
        assert!(entry.user_id.is_none());
        assert!(entry.error_detail.is_none());

        let entry = AuditEntry::error(
            "SEND_OTP",
            "9999999999",
            "candidate",
            "Failed to issue OTP",
            "PoolTimedOut".to_string(),
        );
        assert_eq!(entry.status, AuditStatus::Error);
        assert_eq!(entry.error_detail.as_deref(), Some("PoolTimedOut"));
    }

    #[test]
    fn test_with_client_renders_ip() {
        let client = ClientMeta {
            ip: Some("203.0.113.7".parse().unwrap()),
            device: Some("okhttp/4.9".to_string()),
        };
        let entry = AuditEntry::warning("VERIFY_OTP", "9999999999", "candidate", "Invalid OTP")
            .with_client(&client);
        assert_eq!(entry.client_ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(entry.device.as_deref(), Some("okhttp/4.9"));
    }

    #[test]
    fn test_with_client_tolerates_missing_meta() {
        let entry = AuditEntry::success("REGISTER", "9999999999", "employer", "Registered")
            .with_client(&ClientMeta::default());
        assert!(entry.client_ip.is_none());
        assert!(entry.device.is_none());
    }
}
