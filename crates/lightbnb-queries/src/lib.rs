//! Data access for the LightBnB listing application.
//!
//! Every operation here is a single parameterised statement against a
//! borrowed [`rusqlite::Connection`]: look users up by email or id, create
//! users, list a guest's completed reservations, search properties, and
//! create properties. Callers own the connection (normally checked out of a
//! [`lightbnb_db::DbPool`]); nothing in this crate keeps state between
//! calls.
//!
//! # Money
//!
//! Nightly prices are stored as integer cents. Amounts supplied by callers
//! (search price bounds, the price of a new property) are in dollars and
//! are converted with [`dollars_to_cents`] before they reach SQL.
//!
//! # Errors
//!
//! Lookups that find nothing return `Ok(None)`. Everything else that goes
//! wrong is a [`QueryError`]: rejected input, a constraint violation, or a
//! failure from the store itself.
//!
//! # Ratings
//!
//! Average ratings come from an inner join against `property_reviews`, so
//! a property with no reviews does not appear in search results or in a
//! guest's reservation history.

mod error;
mod money;
mod properties;
mod reservations;
mod search;
mod users;

pub use error::QueryError;
pub use money::{dollars_to_cents, MAX_PRICE_CENTS};
pub use properties::{create_property, search_properties, NewProperty, Property, PropertyListing};
pub use reservations::{list_reservations_for_guest, GuestReservation, Reservation};
pub use search::{build_search_query, PropertySearch, SearchQuery};
pub use users::{create_user, get_user_by_email, get_user_by_id, NewUser, User};

/// Row cap applied when a caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Rejects a zero row cap and widens the rest for binding.
pub(crate) fn check_limit(limit: u32) -> Result<i64, QueryError> {
    if limit == 0 {
        return Err(QueryError::Validation(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(i64::from(limit))
}

#[cfg(test)]
pub(crate) mod test_support;
