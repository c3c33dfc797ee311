//! One-time code generation and expiry arithmetic.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Validity window for an issued code.
pub const OTP_TTL_MINUTES: i64 = 10;

/// Number of digits in a code.
pub const OTP_LENGTH: usize = 6;

/// Generate a numeric one-time code, leading zeros preserved.
///
/// Each digit is drawn independently, so the code is uniform over the full
/// 000000-999999 range.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_LENGTH)
        .map(|_| rng.gen_range(0..10).to_string())
        .collect()
}

/// Expiry timestamp for a code issued at `now`.
pub fn expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(OTP_TTL_MINUTES)
}

/// A stored code is stale once its expiry is strictly before `now`.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at < now
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..200).map(|_| generate_code()).collect();
        // 200 identical draws from a million-code space would mean a broken
        // generator, not bad luck.
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_expiry_is_ten_minutes_out() {
        let now = Utc::now();
        let expiry = expiry_from(now);
        assert_eq!(expiry - now, Duration::minutes(10));
    }

    #[test]
    fn test_is_expired_strictly_before() {
        let now = Utc::now();
        assert!(is_expired(now - Duration::seconds(1), now));
        assert!(!is_expired(now, now));
        assert!(!is_expired(now + Duration::seconds(1), now));
    }
}
