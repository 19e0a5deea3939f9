//! Property search statement builder.
//!
//! [`build_search_query`] turns a [`PropertySearch`] into SQL text plus the
//! values bound to its numbered placeholders. Each present filter appends a
//! clause and binds its value in the same step, so placeholder numbers
//! always follow clause order. User input only ever travels as a bound
//! value.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::money::dollars_to_cents;
use crate::properties::qualified_property_columns;

/// Highest rating a review can carry.
const MAX_RATING: f64 = 5.0;

/// Optional filters for a property search. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySearch {
    /// Case-sensitive substring of the property's city. Blank counts as
    /// absent.
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    /// Inclusive lower bound on the nightly price, in dollars.
    #[serde(default)]
    pub minimum_price_per_night: Option<f64>,
    /// Inclusive upper bound on the nightly price, in dollars.
    #[serde(default)]
    pub maximum_price_per_night: Option<f64>,
    /// Inclusive lower bound on the average review rating.
    #[serde(default)]
    pub minimum_rating: Option<f64>,
}

/// SQL text and the values for its `?1..?N` placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Default)]
struct Bindings {
    values: Vec<Value>,
}

impl Bindings {
    /// Records `value` and returns the placeholder that refers to it.
    fn bind(&mut self, value: impl Into<Value>) -> String {
        self.values.push(value.into());
        format!("?{}", self.values.len())
    }
}

/// Builds the search statement for `search`, capped at `limit` rows.
///
/// Properties are inner-joined with their reviews and grouped so the average
/// rating can be selected and filtered on; a property without reviews never
/// matches. Results are ordered by nightly price, cheapest first, with the
/// property id breaking ties. The limit is always the last bound value.
///
/// # Errors
///
/// Returns `QueryError::Validation` for a zero limit, a negative or
/// non-finite price, a minimum price above the maximum, or a rating outside
/// 0 to 5.
pub fn build_search_query(search: &PropertySearch, limit: u32) -> Result<SearchQuery, QueryError> {
    let limit = crate::check_limit(limit)?;
    validate(search)?;

    let mut bindings = Bindings::default();
    let mut conditions: Vec<String> = Vec::new();

    if let Some(city) = search.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        let placeholder = bindings.bind(city.to_string());
        conditions.push(format!("instr(properties.city, {placeholder}) > 0"));
    }

    if let Some(owner_id) = search.owner_id {
        let placeholder = bindings.bind(owner_id);
        conditions.push(format!("properties.owner_id = {placeholder}"));
    }

    if let Some(min) = search.minimum_price_per_night {
        let placeholder = bindings.bind(dollars_to_cents(min)?);
        conditions.push(format!("properties.cost_per_night >= {placeholder}"));
    }

    if let Some(max) = search.maximum_price_per_night {
        let placeholder = bindings.bind(dollars_to_cents(max)?);
        conditions.push(format!("properties.cost_per_night <= {placeholder}"));
    }

    let mut sql = format!(
        "SELECT {}, AVG(property_reviews.rating) AS average_rating
FROM properties
JOIN property_reviews ON properties.id = property_reviews.property_id",
        qualified_property_columns()
    );

    if !conditions.is_empty() {
        sql.push_str("\nWHERE ");
        sql.push_str(&conditions.join("\n  AND "));
    }

    sql.push_str("\nGROUP BY properties.id");

    if let Some(rating) = search.minimum_rating {
        let placeholder = bindings.bind(rating);
        sql.push_str(&format!(
            "\nHAVING AVG(property_reviews.rating) >= {placeholder}"
        ));
    }

    let placeholder = bindings.bind(limit);
    sql.push_str(&format!(
        "\nORDER BY properties.cost_per_night ASC, properties.id ASC\nLIMIT {placeholder}"
    ));

    Ok(SearchQuery {
        sql,
        params: bindings.values,
    })
}

fn validate(search: &PropertySearch) -> Result<(), QueryError> {
    if let (Some(min), Some(max)) = (
        search.minimum_price_per_night,
        search.maximum_price_per_night,
    ) {
        if min > max {
            return Err(QueryError::Validation(format!(
                "minimum price {min} is above maximum price {max}"
            )));
        }
    }

    if let Some(rating) = search.minimum_rating {
        if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
            return Err(QueryError::Validation(format!(
                "minimum rating must be between 0 and {MAX_RATING}, got {rating}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_LIMIT;

    #[test]
    fn no_filters_binds_only_the_limit() {
        let query = build_search_query(&PropertySearch::default(), DEFAULT_LIMIT).unwrap();

        assert!(!query.sql.contains("WHERE"));
        assert!(!query.sql.contains("HAVING"));
        assert!(query.sql.contains("JOIN property_reviews"));
        assert!(query.sql.contains("GROUP BY properties.id"));
        assert!(query.sql.ends_with("LIMIT ?1"));
        assert_eq!(query.params, vec![Value::Integer(10)]);
    }

    #[test]
    fn every_filter_in_clause_order() {
        let search = PropertySearch {
            city: Some("Vancouver".to_string()),
            owner_id: Some(7),
            minimum_price_per_night: Some(50.0),
            maximum_price_per_night: Some(250.5),
            minimum_rating: Some(3.5),
        };
        let query = build_search_query(&search, 20).unwrap();

        assert!(query.sql.contains("WHERE instr(properties.city, ?1) > 0"));
        assert!(query.sql.contains("AND properties.owner_id = ?2"));
        assert!(query.sql.contains("AND properties.cost_per_night >= ?3"));
        assert!(query.sql.contains("AND properties.cost_per_night <= ?4"));
        assert!(query
            .sql
            .contains("HAVING AVG(property_reviews.rating) >= ?5"));
        assert!(query.sql.ends_with("LIMIT ?6"));

        assert_eq!(
            query.params,
            vec![
                Value::Text("Vancouver".to_string()),
                Value::Integer(7),
                Value::Integer(5_000),
                Value::Integer(25_050),
                Value::Real(3.5),
                Value::Integer(20),
            ]
        );
    }

    #[test]
    fn placeholders_renumber_when_filters_are_skipped() {
        let search = PropertySearch {
            maximum_price_per_night: Some(100.0),
            minimum_rating: Some(4.0),
            ..Default::default()
        };
        let query = build_search_query(&search, DEFAULT_LIMIT).unwrap();

        assert!(query.sql.contains("WHERE properties.cost_per_night <= ?1"));
        assert!(query
            .sql
            .contains("HAVING AVG(property_reviews.rating) >= ?2"));
        assert!(query.sql.ends_with("LIMIT ?3"));
        assert_eq!(
            query.params,
            vec![Value::Integer(10_000), Value::Real(4.0), Value::Integer(10)]
        );
    }

    #[test]
    fn having_follows_group_by() {
        let search = PropertySearch {
            minimum_rating: Some(2.0),
            ..Default::default()
        };
        let query = build_search_query(&search, DEFAULT_LIMIT).unwrap();

        let group_by = query.sql.find("GROUP BY").unwrap();
        let having = query.sql.find("HAVING").unwrap();
        let order_by = query.sql.find("ORDER BY").unwrap();
        assert!(group_by < having && having < order_by);
    }

    #[test]
    fn blank_city_counts_as_absent() {
        let blank = PropertySearch {
            city: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            build_search_query(&blank, DEFAULT_LIMIT).unwrap(),
            build_search_query(&PropertySearch::default(), DEFAULT_LIMIT).unwrap()
        );
    }

    #[test]
    fn city_metacharacters_stay_in_the_bound_value() {
        let hostile = "'; DROP TABLE properties; --";
        let search = PropertySearch {
            city: Some(hostile.to_string()),
            ..Default::default()
        };
        let query = build_search_query(&search, DEFAULT_LIMIT).unwrap();

        assert!(!query.sql.contains("DROP"));
        assert_eq!(query.params[0], Value::Text(hostile.to_string()));
    }

    #[test]
    fn rejects_bad_input() {
        let cases = [
            PropertySearch {
                minimum_price_per_night: Some(-1.0),
                ..Default::default()
            },
            PropertySearch {
                minimum_price_per_night: Some(300.0),
                maximum_price_per_night: Some(100.0),
                ..Default::default()
            },
            PropertySearch {
                minimum_rating: Some(6.0),
                ..Default::default()
            },
            PropertySearch {
                minimum_rating: Some(f64::NAN),
                ..Default::default()
            },
        ];

        for search in &cases {
            let err = build_search_query(search, DEFAULT_LIMIT).unwrap_err();
            assert!(matches!(err, QueryError::Validation(_)), "{search:?} gave {err:?}");
        }

        let err = build_search_query(&PropertySearch::default(), 0).unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
    }

    #[test]
    fn equal_price_bounds_are_allowed() {
        let search = PropertySearch {
            minimum_price_per_night: Some(120.0),
            maximum_price_per_night: Some(120.0),
            ..Default::default()
        };
        let query = build_search_query(&search, DEFAULT_LIMIT).unwrap();
        assert_eq!(query.params[0], query.params[1]);
    }
}
