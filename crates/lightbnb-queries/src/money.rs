use crate::error::QueryError;

/// Largest nightly price accepted, in cents ($1,000,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;

/// Converts a caller-supplied dollar amount into the integer cents stored in
/// `properties.cost_per_night`.
///
/// Fractions of a cent are rounded to the nearest cent.
///
/// # Errors
///
/// Returns `QueryError::Validation` for negative, NaN or infinite amounts,
/// and for amounts above [`MAX_PRICE_CENTS`].
pub fn dollars_to_cents(dollars: f64) -> Result<i64, QueryError> {
    if !dollars.is_finite() || dollars < 0.0 {
        return Err(QueryError::Validation(format!(
            "price must be a non-negative dollar amount, got {dollars}"
        )));
    }
    let cents = (dollars * 100.0).round();
    if cents > MAX_PRICE_CENTS as f64 {
        return Err(QueryError::Validation(format!(
            "price {dollars} exceeds the maximum of {} dollars",
            MAX_PRICE_CENTS / 100
        )));
    }
    Ok(cents as i64)
}
