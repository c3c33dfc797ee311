use sqlx::PgPool;
use uuid::Uuid;

/// Whether a candidate has completed profile setup.
pub async fn candidate_profile_exists(user_id: Uuid, pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM candidate_profiles WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Whether an employer has completed profile setup.
pub async fn employer_profile_exists(user_id: Uuid, pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employer_profiles WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}
