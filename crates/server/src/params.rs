//! Helpers for query string values.

use engine::{DishFilter, StatusFilter};

use crate::ServerError;

/// Parse an optional id. Empty counts as absent.
pub fn optional_id(value: Option<&str>, field: &str) -> Result<Option<i32>, ServerError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ServerError::Generic(format!("{field} must be a numeric id"))),
    }
}

/// Parse the `{id}` segment of a route.
pub fn path_id(raw: &str) -> Result<i32, ServerError> {
    raw.trim()
        .parse()
        .map_err(|_| ServerError::Generic(format!("'{raw}' is not a valid id")))
}

pub fn dish_filter(query: &api_types::dish::DishListQuery) -> Result<DishFilter, ServerError> {
    Ok(DishFilter {
        search: query.search.clone(),
        category_id: optional_id(query.category.as_deref(), "category")?,
        tag_id: optional_id(query.tag.as_deref(), "tag")?,
        status: StatusFilter::from_param(query.status.as_deref())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_is_absent() {
        assert!(matches!(optional_id(Some(""), "tag"), Ok(None)));
        assert!(matches!(optional_id(None, "tag"), Ok(None)));
        assert!(matches!(optional_id(Some("7"), "tag"), Ok(Some(7))));
    }

    #[test]
    fn path_id_must_be_numeric() {
        assert!(matches!(path_id("12"), Ok(12)));
        assert!(matches!(path_id("abc"), Err(ServerError::Generic(_))));
        assert!(matches!(path_id(""), Err(ServerError::Generic(_))));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(matches!(
            optional_id(Some("seven"), "tag"),
            Err(ServerError::Generic(_))
        ));
    }
}
