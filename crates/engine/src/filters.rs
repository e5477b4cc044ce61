//! Query filters shared by the listing operations.

use std::{fmt, str::FromStr};

use sea_orm::{ColumnTrait, QueryFilter};

use crate::EngineError;

/// Which rows a listing shows according to their `is_active` flag.
///
/// Soft-deleted rows are never listed, whatever the status. When the caller
/// gives no status only active rows are shown; the other views must be asked
/// for explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    Active,
    Inactive,
    All,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::All => "all",
        }
    }

    /// Parse an optional request value. Absent or blank means the default.
    pub fn from_param(value: Option<&str>) -> Result<Self, EngineError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => raw.parse(),
        }
    }

    pub(crate) fn apply<Q, C>(self, query: Q, is_active: C) -> Q
    where
        Q: QueryFilter,
        C: ColumnTrait,
    {
        match self {
            Self::Active => query.filter(is_active.eq(true)),
            Self::Inactive => query.filter(is_active.eq(false)),
            Self::All => query,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "all" => Ok(Self::All),
            other => Err(EngineError::InvalidFilter(format!(
                "unknown status '{other}', expected active, inactive or all"
            ))),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filters for listing dishes.
///
/// Every predicate is optional and they are intersected.
#[derive(Clone, Debug, Default)]
pub struct DishFilter {
    /// Accent and case insensitive, matched against name and description.
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
    pub status: StatusFilter,
}

impl DishFilter {
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn tag(mut self, tag_id: i32) -> Self {
        self.tag_id = Some(tag_id);
        self
    }

    #[must_use]
    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_means_active() {
        assert_eq!(StatusFilter::from_param(None).unwrap(), StatusFilter::Active);
        assert_eq!(
            StatusFilter::from_param(Some("  ")).unwrap(),
            StatusFilter::Active
        );
    }

    #[test]
    fn explicit_statuses_parse() {
        assert_eq!(
            StatusFilter::from_param(Some("inactive")).unwrap(),
            StatusFilter::Inactive
        );
        assert_eq!(StatusFilter::from_param(Some("all")).unwrap(), StatusFilter::All);
        assert_eq!("active".parse::<StatusFilter>().unwrap(), StatusFilter::Active);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(matches!(
            StatusFilter::from_param(Some("archived")),
            Err(EngineError::InvalidFilter(_))
        ));
    }
}
