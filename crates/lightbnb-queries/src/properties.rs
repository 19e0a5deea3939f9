//! Property records, creation and search execution.

use rusqlite::{params, params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::money::dollars_to_cents;
use crate::search::{build_search_query, PropertySearch};

/// Column order shared by every statement that reads a [`Property`].
const PROPERTY_FIELDS: [&str; 16] = [
    "id",
    "owner_id",
    "title",
    "description",
    "thumbnail_photo_url",
    "cover_photo_url",
    "cost_per_night",
    "parking_spaces",
    "number_of_bathrooms",
    "number_of_bedrooms",
    "country",
    "street",
    "city",
    "province",
    "post_code",
    "active",
];

/// Number of columns [`map_row_to_property`] consumes.
pub(crate) const PROPERTY_COLUMN_COUNT: usize = PROPERTY_FIELDS.len();

/// `properties.`-qualified column list, for statements that join other
/// tables with clashing column names.
pub(crate) fn qualified_property_columns() -> String {
    PROPERTY_FIELDS
        .iter()
        .map(|field| format!("properties.{field}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A row of the `properties` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in cents.
    pub cost_per_night: i64,
    pub parking_spaces: u32,
    pub number_of_bathrooms: u32,
    pub number_of_bedrooms: u32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

/// A search hit: the property plus the mean of its review ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: f64,
}

/// Fields for inserting a property.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub owner_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Nightly price in dollars; stored as cents.
    pub cost_per_night: f64,
    #[serde(default)]
    pub parking_spaces: u32,
    #[serde(default)]
    pub number_of_bathrooms: u32,
    #[serde(default)]
    pub number_of_bedrooms: u32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}

/// Inserts a property and returns the stored row.
///
/// # Errors
///
/// `Validation` for a blank title or city or an invalid price, `Conflict`
/// when `owner_id` does not reference an existing user (foreign keys must be
/// enabled on the connection, as they are for pooled connections).
pub fn create_property(conn: &Connection, property: &NewProperty) -> Result<Property, QueryError> {
    if property.title.trim().is_empty() {
        return Err(QueryError::Validation("title is required".to_string()));
    }
    if property.city.trim().is_empty() {
        return Err(QueryError::Validation("city is required".to_string()));
    }
    let cost_cents = dollars_to_cents(property.cost_per_night)?;

    let sql = format!(
        "INSERT INTO properties (
            owner_id, title, description, thumbnail_photo_url, cover_photo_url,
            cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
            country, street, city, province, post_code
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        RETURNING {}",
        PROPERTY_FIELDS.join(", ")
    );

    let created = conn.query_row(
        &sql,
        params![
            property.owner_id,
            property.title,
            property.description,
            property.thumbnail_photo_url,
            property.cover_photo_url,
            cost_cents,
            property.parking_spaces,
            property.number_of_bathrooms,
            property.number_of_bedrooms,
            property.country,
            property.street,
            property.city,
            property.province,
            property.post_code,
        ],
        |row| map_row_to_property(row, 0),
    )?;

    tracing::debug!(
        property_id = created.id,
        owner_id = created.owner_id,
        "created property"
    );
    Ok(created)
}

/// Runs a property search built by [`build_search_query`].
///
/// Results are ordered by nightly price, cheapest first, and capped at
/// `limit` rows. Properties without any review never match.
pub fn search_properties(
    conn: &Connection,
    search: &PropertySearch,
    limit: u32,
) -> Result<Vec<PropertyListing>, QueryError> {
    let query = build_search_query(search, limit)?;

    let mut stmt = conn.prepare(&query.sql)?;
    let rows = stmt.query_map(params_from_iter(query.params.iter()), |row| {
        Ok(PropertyListing {
            property: map_row_to_property(row, 0)?,
            average_rating: row.get(PROPERTY_COLUMN_COUNT)?,
        })
    })?;

    let mut listings = Vec::new();
    for row in rows {
        listings.push(row?);
    }

    tracing::debug!(
        bound_params = query.params.len(),
        rows = listings.len(),
        "property search"
    );
    Ok(listings)
}

/// Reads a [`Property`] from `row`, starting at column `offset`.
pub(crate) fn map_row_to_property(row: &Row, offset: usize) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(offset)?,
        owner_id: row.get(offset + 1)?,
        title: row.get(offset + 2)?,
        description: row.get(offset + 3)?,
        thumbnail_photo_url: row.get(offset + 4)?,
        cover_photo_url: row.get(offset + 5)?,
        cost_per_night: row.get(offset + 6)?,
        parking_spaces: row.get(offset + 7)?,
        number_of_bathrooms: row.get(offset + 8)?,
        number_of_bedrooms: row.get(offset + 9)?,
        country: row.get(offset + 10)?,
        street: row.get(offset + 11)?,
        city: row.get(offset + 12)?,
        province: row.get(offset + 13)?,
        post_code: row.get(offset + 14)?,
        active: row.get(offset + 15)?,
    })
}
