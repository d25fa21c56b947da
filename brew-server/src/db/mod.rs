//! Database access layer
//!
//! Plain repository functions over `PgPool`. Relationships are never
//! traversed implicitly; nested views are assembled in [`views`].

pub mod bookings;
pub mod breweries;
pub mod reviews;
pub mod tours;
pub mod users;
pub mod views;
