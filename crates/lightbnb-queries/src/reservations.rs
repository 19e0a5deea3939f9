//! A guest's reservation history.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::error::QueryError;
use crate::properties::{
    map_row_to_property, qualified_property_columns, Property, PROPERTY_COLUMN_COUNT,
};

const RESERVATION_COLUMN_COUNT: usize = 5;

/// A row of the `reservations` table. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub id: i64,
    pub start_date: String,
    pub end_date: String,
    pub property_id: i64,
    pub guest_id: i64,
}

/// A completed reservation with the property it was for and that
/// property's average review rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestReservation {
    pub reservation: Reservation,
    pub property: Property,
    pub average_rating: f64,
}

/// Lists the guest's reservations that ended before today, oldest stay
/// first, capped at `limit` rows.
///
/// The rating average covers every review of the property, not only the
/// guest's own. Reservations at properties nobody has reviewed are left
/// out.
pub fn list_reservations_for_guest(
    conn: &Connection,
    guest_id: i64,
    limit: u32,
) -> Result<Vec<GuestReservation>, QueryError> {
    let limit = crate::check_limit(limit)?;

    let sql = format!(
        "SELECT
            reservations.id, reservations.start_date, reservations.end_date,
            reservations.property_id, reservations.guest_id,
            {},
            AVG(property_reviews.rating) AS average_rating
        FROM reservations
        JOIN properties ON reservations.property_id = properties.id
        JOIN property_reviews ON properties.id = property_reviews.property_id
        WHERE reservations.guest_id = ?1
          AND reservations.end_date < date('now')
        GROUP BY reservations.id, properties.id
        ORDER BY reservations.start_date ASC, reservations.id ASC
        LIMIT ?2",
        qualified_property_columns()
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![guest_id, limit], map_row_to_guest_reservation)?;

    let mut reservations = Vec::new();
    for row in rows {
        reservations.push(row?);
    }

    tracing::debug!(
        guest_id,
        rows = reservations.len(),
        "listed past reservations"
    );
    Ok(reservations)
}

fn map_row_to_guest_reservation(row: &Row) -> rusqlite::Result<GuestReservation> {
    Ok(GuestReservation {
        reservation: Reservation {
            id: row.get(0)?,
            start_date: row.get(1)?,
            end_date: row.get(2)?,
            property_id: row.get(3)?,
            guest_id: row.get(4)?,
        },
        property: map_row_to_property(row, RESERVATION_COLUMN_COUNT)?,
        average_rating: row.get(RESERVATION_COLUMN_COUNT + PROPERTY_COLUMN_COUNT)?,
    })
}
