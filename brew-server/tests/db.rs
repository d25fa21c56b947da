//! Database integration tests
//!
//! Each test gets a fresh, migrated database from `#[sqlx::test]`.
//! Run with `DATABASE_URL` pointing at a Postgres server and `--ignored`.

use brew_server::auth::Argon2Hasher;
use brew_server::db;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BookingCreate, BookingStatus, Brewery, BreweryCreate, BreweryQuery, NewBooking, NewUser,
    Rating, Tour, TourCreate, User,
};
use sqlx::PgPool;

async fn seed_user(pool: &PgPool, username: &str) -> User {
    db::users::create(
        pool,
        &NewUser {
            username: username.into(),
            email: format!("{username}@example.co.ke"),
            password_hash: "unused".into(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .unwrap()
}

fn brewery_create() -> BreweryCreate {
    BreweryCreate {
        name: "Nairobi Craft Works".into(),
        description: "Small batch ales".into(),
        location: "Nairobi".into(),
        latitude: Some(-1.2921),
        longitude: Some(36.8219),
        contact_email: None,
        contact_phone: None,
        website: None,
        opening_hours: None,
        image_url: None,
    }
}

async fn seed_brewery(pool: &PgPool) -> Brewery {
    db::breweries::create(pool, &brewery_create()).await.unwrap()
}

fn tour_create(brewery_id: i64, max_participants: i32) -> TourCreate {
    TourCreate {
        brewery_id,
        name: "Brewhouse Walkthrough".into(),
        description: "Mash tun to bottling line".into(),
        duration: 90,
        price: Decimal::new(150000, 2),
        max_participants,
        available_dates: Vec::new(),
        image_url: None,
    }
}

async fn seed_tour(pool: &PgPool, max_participants: i32) -> Tour {
    let brewery = seed_brewery(pool).await;
    db::tours::create(pool, &tour_create(brewery.id, max_participants))
        .await
        .unwrap()
}

fn booking(user_id: i64, tour_id: i64, participants: i32) -> NewBooking {
    NewBooking::new(
        user_id,
        BookingCreate {
            tour_id,
            booking_date: Utc::now() + Duration::days(7),
            participants,
            special_requests: None,
        },
    )
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_tour_for_missing_brewery(pool: PgPool) {
    let err = db::tours::create(&pool, &tour_create(9999, 10))
        .await
        .unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::ReferenceNotFound);
    assert_eq!(err.message, "Referenced brewery does not exist");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_email(pool: PgPool) {
    let first = seed_user(&pool, "amani").await;

    let err = db::users::create(
        &pool,
        &NewUser {
            username: "amani2".into(),
            email: first.email.clone(),
            password_hash: "unused".into(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::EmailExists);

    let found = db::users::find_by_email(&pool, "AMANI@example.co.ke").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(first.id));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_concurrent_bookings_respect_capacity(pool: PgPool) {
    let tour = seed_tour(&pool, 10).await;
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;

    let first = booking(alice.id, tour.id, 6);
    let second = booking(bob.id, tour.id, 6);
    let (a, b) = tokio::join!(
        db::bookings::create(&pool, &first),
        db::bookings::create(&pool, &second),
    );

    let results = [a, b];
    let succeeded: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(succeeded.len(), 1);
    assert_eq!(succeeded[0].total_price, Decimal::new(900000, 2));

    let failure = results.into_iter().find_map(Result::err).unwrap();
    assert_eq!(AppError::from(failure).code, ErrorCode::CapacityExceeded);

    let date = first.booking_date.date_naive();
    let booked = db::bookings::booked_participants(&pool, tour.id, date).await.unwrap();
    assert_eq!(booked, 6);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_cancellation_frees_seats(pool: PgPool) {
    let tour = seed_tour(&pool, 4).await;
    let user = seed_user(&pool, "wanjiru").await;
    let other = seed_user(&pool, "otieno").await;

    let created = db::bookings::create(&pool, &booking(user.id, tour.id, 4)).await.unwrap();
    assert_eq!(created.status, BookingStatus::Confirmed);

    // Another user's booking is not visible to them
    let err = db::bookings::update_status(&pool, created.id, BookingStatus::Cancelled, Some(other.id))
        .await
        .unwrap_err();
    assert_eq!(AppError::from(err).code, ErrorCode::BookingNotFound);

    let cancelled =
        db::bookings::update_status(&pool, created.id, BookingStatus::Cancelled, Some(user.id))
            .await
            .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let err = db::bookings::update_status(&pool, created.id, BookingStatus::Completed, None)
        .await
        .unwrap_err();
    assert_eq!(AppError::from(err).code, ErrorCode::InvalidStatusTransition);

    db::bookings::create(&pool, &booking(other.id, tour.id, 4)).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_booking_view_nests_tour_and_user(pool: PgPool) {
    let tour = seed_tour(&pool, 10).await;
    let user = seed_user(&pool, "kamau").await;
    let created = db::bookings::create(&pool, &booking(user.id, tour.id, 2)).await.unwrap();

    let view = db::views::booking_view(&pool, created).await.unwrap();
    let nested = view.tour.as_ref().unwrap();
    assert_eq!(nested.tour.id, tour.id);
    assert_eq!(nested.brewery.as_ref().map(|b| b.id), Some(tour.brewery_id));
    assert_eq!(view.user.as_ref().map(|u| u.id), Some(user.id));

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["tour"]["brewery"]["name"], "Nairobi Craft Works");
    assert!(json["user"].get("password_hash").is_none());
    assert_eq!(json["total_price"], 3000.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_reviews_and_average(pool: PgPool) {
    let brewery = seed_brewery(&pool).await;
    let user = seed_user(&pool, "njeri").await;

    let (avg, count) = db::reviews::average_rating(&pool, brewery.id).await.unwrap();
    assert_eq!((avg, count), (None, 0));

    for stars in [5, 4] {
        db::reviews::create(&pool, user.id, brewery.id, Rating::new(stars).unwrap(), Some("Crisp"))
            .await
            .unwrap();
    }
    let (avg, count) = db::reviews::average_rating(&pool, brewery.id).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(avg, Some(4.5));

    let reviews = db::reviews::list_by_brewery(&pool, brewery.id).await.unwrap();
    let views = db::views::review_views(&pool, reviews).await.unwrap();
    assert!(views.iter().all(|v| v.user.as_ref().map(|u| u.id) == Some(user.id)));

    // The column check backs up the type
    let err = sqlx::query("INSERT INTO reviews (user_id, brewery_id, rating) VALUES ($1, $2, 6)")
        .bind(user.id)
        .bind(brewery.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_password_round_trip(pool: PgPool) {
    let hasher = Argon2Hasher::new();
    let mut user = seed_user(&pool, "achieng").await;

    user.set_password(&hasher, "karibu-sana-2026").unwrap();
    assert!(db::users::update_password(&pool, user.id, &user.password_hash).await.unwrap());

    let stored = db::users::find_by_login(&pool, "achieng").await.unwrap().unwrap();
    assert!(stored.check_password(&hasher, "karibu-sana-2026"));
    assert!(!stored.check_password(&hasher, "wrong-password"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_username(pool: PgPool) {
    seed_user(&pool, "amani").await;

    let err = db::users::create(
        &pool,
        &NewUser {
            username: "amani".into(),
            email: "someone-else@example.co.ke".into(),
            password_hash: "unused".into(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::UsernameExists);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_booking_references_must_exist(pool: PgPool) {
    let tour = seed_tour(&pool, 10).await;
    let user = seed_user(&pool, "mwangi").await;

    let conn = &pool;
    let insert = move |user_id: i64, tour_id: i64| {
        sqlx::query(
            "INSERT INTO bookings (user_id, tour_id, booking_date, participants, total_price) \
             VALUES ($1, $2, NOW() + INTERVAL '7 days', 1, 1500.00)",
        )
        .bind(user_id)
        .bind(tour_id)
        .execute(conn)
    };

    let err = insert(9999, tour.id).await.unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::ReferenceNotFound);
    assert_eq!(err.message, "Referenced user does not exist");
    assert_eq!(err.details.unwrap()["constraint"], "bookings_user_id_fkey");

    let err = insert(user.id, 9999).await.unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::ReferenceNotFound);
    assert_eq!(err.message, "Referenced tour does not exist");
    assert_eq!(err.details.unwrap()["constraint"], "bookings_tour_id_fkey");

    // Through the repository a missing tour is caught before the insert
    let err = db::bookings::create(&pool, &booking(user.id, 9999, 1)).await.unwrap_err();
    assert_eq!(AppError::from(err).code, ErrorCode::TourNotFound);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_review_references_must_exist(pool: PgPool) {
    let brewery = seed_brewery(&pool).await;
    let user = seed_user(&pool, "chebet").await;
    let rating = Rating::new(4).unwrap();

    let err = db::reviews::create(&pool, 9999, brewery.id, rating, None).await.unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::ReferenceNotFound);
    assert_eq!(err.message, "Referenced user does not exist");
    assert_eq!(err.details.unwrap()["constraint"], "reviews_user_id_fkey");

    let err = db::reviews::create(&pool, user.id, 9999, rating, None).await.unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::ReferenceNotFound);
    assert_eq!(err.message, "Referenced brewery does not exist");
    assert_eq!(err.details.unwrap()["constraint"], "reviews_brewery_id_fkey");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_total_price_over_column_limit(pool: PgPool) {
    let brewery = seed_brewery(&pool).await;
    let user = seed_user(&pool, "kiprono").await;
    let tour = db::tours::create(
        &pool,
        &TourCreate {
            price: Decimal::new(5_000_000_000, 2),
            ..tour_create(brewery.id, 10)
        },
    )
    .await
    .unwrap();

    let err = db::bookings::create(&pool, &booking(user.id, tour.id, 3)).await.unwrap_err();
    let err = AppError::from(err);
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    assert_eq!(err.details.unwrap()["field"], "total_price");

    let created = db::bookings::create(&pool, &booking(user.id, tour.id, 1)).await.unwrap();
    assert_eq!(created.total_price, Decimal::new(5_000_000_000, 2));

    // Postgres overflow on a money column is a client error, not a 500
    let err = sqlx::query("UPDATE tours SET price = 100000000.00 WHERE id = $1")
        .bind(tour.id)
        .execute(&pool)
        .await
        .unwrap_err();
    let err = AppError::from(brew_server::error::ServiceError::from(err));
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_login_prefers_username_match(pool: PgPool) {
    // Written directly: registration no longer accepts '@' in usernames
    let by_name: User = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, 'unused') RETURNING *",
    )
    .bind("kip@example.co.ke")
    .bind("kip.one@example.co.ke")
    .fetch_one(&pool)
    .await
    .unwrap();
    let by_email = db::users::create(
        &pool,
        &NewUser {
            username: "kip".into(),
            email: "kip@example.co.ke".into(),
            password_hash: "unused".into(),
            first_name: None,
            last_name: None,
        },
    )
    .await
    .unwrap();

    let found = db::users::find_by_login(&pool, "kip@example.co.ke").await.unwrap().unwrap();
    assert_eq!(found.id, by_name.id);

    let found = db::users::find_by_login(&pool, "KIP.ONE@example.co.ke").await.unwrap().unwrap();
    assert_eq!(found.id, by_name.id);
    let found = db::users::find_by_login(&pool, "kip").await.unwrap().unwrap();
    assert_eq!(found.id, by_email.id);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL"]
async fn test_brewery_filters_match_wildcards_literally(pool: PgPool) {
    seed_brewery(&pool).await;
    let percent = BreweryCreate {
        name: "100% Sorghum".into(),
        location: "Kisumu_West".into(),
        ..brewery_create()
    };
    let percent = db::breweries::create(&pool, &percent).await.unwrap();

    let search = |location: Option<&str>, search: Option<&str>| BreweryQuery {
        location: location.map(Into::into),
        search: search.map(Into::into),
    };

    let all = db::breweries::list(&pool, &search(None, None)).await.unwrap();
    assert_eq!(all.len(), 2);

    let found = db::breweries::list(&pool, &search(None, Some("%"))).await.unwrap();
    assert_eq!(found.iter().map(|b| b.id).collect::<Vec<_>>(), vec![percent.id]);

    let found = db::breweries::list(&pool, &search(Some("_"), None)).await.unwrap();
    assert_eq!(found.iter().map(|b| b.id).collect::<Vec<_>>(), vec![percent.id]);

    let found = db::breweries::list(&pool, &search(Some("nairobi"), None)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Nairobi Craft Works");
}
