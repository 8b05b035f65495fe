//! Contract date normalization.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{DocumentError, Result};

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Display format used in the documents.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Convert an ISO date (`YYYY-MM-DD`) to the display form `DD/MM/YYYY`.
///
/// # Examples
/// ```
/// use dealdocs_core::dates::normalize_contract_date;
///
/// assert_eq!(normalize_contract_date("2024-03-05").unwrap(), "05/03/2024");
/// assert!(normalize_contract_date("2024-13-40").is_err());
/// ```
pub fn normalize_contract_date(date_str: &str) -> Result<String> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(DocumentError::InvalidDate(date_str.to_string()));
    }

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| DocumentError::InvalidDate(date_str.to_string()))?;

    Ok(date.format(DISPLAY_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_valid_date() {
        assert_eq!(normalize_contract_date("2024-03-05").unwrap(), "05/03/2024");
        assert_eq!(normalize_contract_date("1999-12-31").unwrap(), "31/12/1999");
    }

    #[test]
    fn test_leap_day() {
        assert_eq!(normalize_contract_date("2024-02-29").unwrap(), "29/02/2024");
        assert!(normalize_contract_date("2023-02-29").is_err());
    }

    #[test]
    fn test_invalid_month_and_day() {
        let err = normalize_contract_date("2024-13-40").unwrap_err();
        assert!(matches!(err, DocumentError::InvalidDate(ref s) if s == "2024-13-40"));
    }

    #[test]
    fn test_wrong_shape() {
        assert!(normalize_contract_date("05/03/2024").is_err());
        assert!(normalize_contract_date("2024-3-5").is_err());
        assert!(normalize_contract_date("").is_err());
        assert!(normalize_contract_date("2024-03-05T00:00:00").is_err());
    }
}
