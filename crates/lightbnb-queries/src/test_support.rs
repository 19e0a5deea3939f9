//! Seeding helpers for the unit tests.

use rusqlite::{params, Connection};

/// Opens an in-memory database with the schema applied and foreign keys on.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("should open in-memory db");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("should enable foreign keys");
    lightbnb_db::run_migrations(&conn).expect("migrations should succeed");
    conn
}

pub fn seed_user(conn: &Connection, name: &str, email: &str) -> i64 {
    conn.execute(
        "INSERT INTO users (name, email, password) VALUES (?1, ?2, 'hashed')",
        params![name, email],
    )
    .expect("should insert user");
    conn.last_insert_rowid()
}

/// Inserts a property priced in cents.
pub fn seed_property(conn: &Connection, owner_id: i64, title: &str, city: &str, cents: i64) -> i64 {
    conn.execute(
        "INSERT INTO properties (owner_id, title, description, thumbnail_photo_url,
             cover_photo_url, cost_per_night, parking_spaces, number_of_bathrooms,
             number_of_bedrooms, country, street, city, province, post_code)
         VALUES (?1, ?2, 'seeded', 'https://img/thumb.jpg', 'https://img/cover.jpg',
             ?3, 1, 1, 2, 'Canada', '1 Test Street', ?4, 'BC', 'V0V 0V0')",
        params![owner_id, title, cents, city],
    )
    .expect("should insert property");
    conn.last_insert_rowid()
}

/// Inserts a reservation whose dates are offsets in days from today.
pub fn seed_reservation(
    conn: &Connection,
    guest_id: i64,
    property_id: i64,
    start_offset_days: i64,
    end_offset_days: i64,
) -> i64 {
    conn.execute(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id)
         VALUES (date('now', ?1 || ' days'), date('now', ?2 || ' days'), ?3, ?4)",
        params![
            format!("{start_offset_days:+}"),
            format!("{end_offset_days:+}"),
            property_id,
            guest_id
        ],
    )
    .expect("should insert reservation");
    conn.last_insert_rowid()
}

/// Attaches a review (and a throwaway past reservation backing it).
pub fn seed_review(conn: &Connection, guest_id: i64, property_id: i64, rating: i64) {
    let reservation_id = seed_reservation(conn, guest_id, property_id, -400, -395);
    conn.execute(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating, message)
         VALUES (?1, ?2, ?3, ?4, 'review')",
        params![guest_id, property_id, reservation_id, rating],
    )
    .expect("should insert review");
}
