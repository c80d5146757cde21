//! Classification of raw location input.
//!
//! Every input string is either a postal code, a "City, State" pair, or
//! rejected with a [`QueryError`]. The digits-only test always runs first.

use thiserror::Error;

/// A validated location query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQuery {
    /// Digits only, with any spaces removed
    PostalCode(String),
    /// City and state as trimmed parts; `raw` is the input as supplied
    CityState {
        raw: String,
        city: String,
        state: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid postal code: {0:?} (expected digits only)")]
    InvalidPostalCode(String),

    #[error("Invalid city/state format: {0:?} (expected \"City, State\")")]
    MissingSeparator(String),

    #[error("Invalid city/state format: {0:?} (city and state must not be empty)")]
    EmptyPart(String),
}

impl LocationQuery {
    /// Classify raw input. Inputs that are all digits once spaces are
    /// removed are postal codes; anything else must be a city/state pair.
    pub fn classify(input: &str) -> Result<Self, QueryError> {
        if is_postal_code(input) {
            normalize_postal_code(input).map(LocationQuery::PostalCode)
        } else {
            let (city, state) = split_city_state(input)?;
            Ok(LocationQuery::CityState {
                raw: input.to_string(),
                city,
                state,
            })
        }
    }
}

/// True when `input` consists of ASCII digits and spaces, with at least one digit.
pub fn is_postal_code(input: &str) -> bool {
    let mut digits = input.chars().filter(|c| *c != ' ').peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

/// Strip spaces from a postal code and check that only digits remain.
pub fn normalize_postal_code(code: &str) -> Result<String, QueryError> {
    if !is_postal_code(code) {
        return Err(QueryError::InvalidPostalCode(code.to_string()));
    }
    Ok(code.chars().filter(|c| *c != ' ').collect())
}

/// Split "City, State" into trimmed parts. Parts after the second are ignored.
pub fn split_city_state(input: &str) -> Result<(String, String), QueryError> {
    let mut parts = input.split(',').map(str::trim);

    let (city, state) = match (parts.next(), parts.next()) {
        (Some(city), Some(state)) => (city, state),
        _ => return Err(QueryError::MissingSeparator(input.to_string())),
    };

    if city.is_empty() || state.is_empty() {
        return Err(QueryError::EmptyPart(input.to_string()));
    }

    Ok((city.to_string(), state.to_string()))
}
