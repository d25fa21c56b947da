//! Review queries

use shared::models::{Rating, Review};
use sqlx::PgPool;

pub async fn create(
    pool: &PgPool,
    user_id: i64,
    brewery_id: i64,
    rating: Rating,
    comment: Option<&str>,
) -> Result<Review, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO reviews (user_id, brewery_id, rating, comment)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(brewery_id)
    .bind(rating.value())
    .bind(comment)
    .fetch_one(pool)
    .await
}

pub async fn list_by_brewery(pool: &PgPool, brewery_id: i64) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE brewery_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(brewery_id)
        .fetch_all(pool)
        .await
}

/// Mean rating and review count; the mean is `None` without reviews
pub async fn average_rating(pool: &PgPool, brewery_id: i64) -> Result<(Option<f64>, i64), sqlx::Error> {
    sqlx::query_as("SELECT AVG(rating)::FLOAT8, COUNT(*) FROM reviews WHERE brewery_id = $1")
        .bind(brewery_id)
        .fetch_one(pool)
        .await
}
