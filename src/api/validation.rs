use super::ApiError;
use crate::domain::LocationId;

/// Returns the query exactly as the caller sent it; the stored location is
/// keyed on that text.
pub fn validate_location_query(query: Option<&str>) -> Result<&str, ApiError> {
    let query = query.unwrap_or_default();

    if query.trim().is_empty() {
        return Err(ApiError::validation("Missing location query in 'data'"));
    }

    if query.chars().count() > 200 {
        return Err(ApiError::validation(
            "Location query must be 200 characters or less",
        ));
    }

    Ok(query)
}

pub fn validate_location_id(raw: Option<&str>) -> Result<LocationId, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Missing location id"))?;

    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(LocationId::new(id)),
        _ => Err(ApiError::validation(format!(
            "Invalid location id: {}. ID must be a positive integer",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_query_is_kept_as_typed() {
        assert_eq!(validate_location_query(Some("  90210 ")).unwrap(), "  90210 ");
        assert_eq!(validate_location_query(Some("Seattle")).unwrap(), "Seattle");
    }

    #[test]
    fn blank_location_query_is_rejected() {
        assert!(validate_location_query(Some("   ")).is_err());
        assert!(validate_location_query(Some("")).is_err());
        assert!(validate_location_query(None).is_err());
    }

    #[test]
    fn location_query_limit_counts_characters() {
        let accented = "é".repeat(200);
        assert_eq!(accented.len(), 400);
        assert!(validate_location_query(Some(&accented)).is_ok());

        let too_long = "a".repeat(201);
        assert!(validate_location_query(Some(&too_long)).is_err());
    }

    #[test]
    fn location_id_must_be_positive_integer() {
        assert_eq!(validate_location_id(Some("7")).unwrap(), LocationId::new(7));
        assert!(validate_location_id(Some("0")).is_err());
        assert!(validate_location_id(Some("-3")).is_err());
        assert!(validate_location_id(Some("abc")).is_err());
        assert!(validate_location_id(None).is_err());
    }
}
