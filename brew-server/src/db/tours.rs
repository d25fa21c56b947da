//! Tour queries

use shared::models::{Tour, TourCreate, TourQuery, TourUpdate};
use sqlx::{PgExecutor, PgPool};

pub async fn create(pool: &PgPool, data: &TourCreate) -> Result<Tour, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO tours (brewery_id, name, description, duration, price,
                           max_participants, available_dates, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(data.brewery_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.duration)
    .bind(data.price)
    .bind(data.max_participants)
    .bind(&data.available_dates)
    .bind(&data.image_url)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Tour>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tours WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Load a tour and hold its row lock until the transaction ends
pub async fn lock<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Tour>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tours WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Tour>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tours WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Active tours of active breweries, optionally filtered by brewery and date
pub async fn list(pool: &PgPool, query: &TourQuery) -> Result<Vec<Tour>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT t.* FROM tours t
        JOIN breweries b ON b.id = t.brewery_id
        WHERE t.is_active AND b.is_active
          AND ($1::BIGINT IS NULL OR t.brewery_id = $1)
          AND ($2::DATE IS NULL OR cardinality(t.available_dates) = 0 OR $2 = ANY(t.available_dates))
        ORDER BY t.name, t.id
        "#,
    )
    .bind(query.brewery_id)
    .bind(query.date)
    .fetch_all(pool)
    .await
}

/// Active tours of one brewery
pub async fn list_by_brewery(pool: &PgPool, brewery_id: i64) -> Result<Vec<Tour>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tours WHERE brewery_id = $1 AND is_active ORDER BY name, id")
        .bind(brewery_id)
        .fetch_all(pool)
        .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &TourUpdate,
) -> Result<Option<Tour>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE tours
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            duration = COALESCE($3, duration),
            price = COALESCE($4, price),
            max_participants = COALESCE($5, max_participants),
            available_dates = COALESCE($6, available_dates),
            image_url = COALESCE($7, image_url),
            is_active = COALESCE($8, is_active)
        WHERE id = $9
        RETURNING *
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.duration)
    .bind(data.price)
    .bind(data.max_participants)
    .bind(&data.available_dates)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_active(pool: &PgPool, id: i64, active: bool) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("UPDATE tours SET is_active = $1 WHERE id = $2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
