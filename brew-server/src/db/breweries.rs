//! Brewery queries

use shared::models::{Brewery, BreweryCreate, BreweryQuery, BreweryUpdate};
use sqlx::PgPool;

pub async fn create(pool: &PgPool, data: &BreweryCreate) -> Result<Brewery, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO breweries (name, description, location, latitude, longitude,
                               contact_email, contact_phone, website, opening_hours, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.location.trim())
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(&data.contact_email)
    .bind(&data.contact_phone)
    .bind(&data.website)
    .bind(&data.opening_hours)
    .bind(&data.image_url)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Brewery>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM breweries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Brewery>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM breweries WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// `ILIKE` pattern matching `term` literally anywhere in the value
///
/// Pairs with `ESCAPE '\'` in the query.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn filter_pattern(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(contains_pattern)
}

/// Active breweries, optionally filtered by name and location
///
/// Filters are plain substrings; `%` and `_` in them match themselves.
pub async fn list(pool: &PgPool, query: &BreweryQuery) -> Result<Vec<Brewery>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM breweries
        WHERE is_active
          AND ($1::TEXT IS NULL OR location ILIKE $1 ESCAPE '\')
          AND ($2::TEXT IS NULL OR name ILIKE $2 ESCAPE '\')
        ORDER BY name, id
        "#,
    )
    .bind(filter_pattern(query.location.as_deref()))
    .bind(filter_pattern(query.search.as_deref()))
    .fetch_all(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &BreweryUpdate,
) -> Result<Option<Brewery>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE breweries
        SET name = COALESCE($1, name),
            description = COALESCE($2, description),
            location = COALESCE($3, location),
            latitude = COALESCE($4, latitude),
            longitude = COALESCE($5, longitude),
            contact_email = COALESCE($6, contact_email),
            contact_phone = COALESCE($7, contact_phone),
            website = COALESCE($8, website),
            opening_hours = COALESCE($9, opening_hours),
            image_url = COALESCE($10, image_url),
            is_active = COALESCE($11, is_active)
        WHERE id = $12
        RETURNING *
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.location.as_deref().map(str::trim))
    .bind(data.latitude)
    .bind(data.longitude)
    .bind(&data.contact_email)
    .bind(&data.contact_phone)
    .bind(&data.website)
    .bind(&data.opening_hours)
    .bind(&data.image_url)
    .bind(data.is_active)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_active(pool: &PgPool, id: i64, active: bool) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("UPDATE breweries SET is_active = $1 WHERE id = $2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Nairobi"), "%Nairobi%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("rift_valley"), "%rift\\_valley%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        assert_eq!(filter_pattern(None), None);
        assert_eq!(filter_pattern(Some("   ")), None);
        assert_eq!(filter_pattern(Some(" Kisumu ")).as_deref(), Some("%Kisumu%"));
    }
}
