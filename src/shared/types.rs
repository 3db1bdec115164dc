use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// List metadata. Paginated endpoints fill every field, plain lists only `total`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<i64>,
}

impl Meta {
    pub fn total(total: i64) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn paginated(page: &PaginationQuery, total: i64) -> Self {
        let per_page = page.limit();
        let last_page = ((total + per_page - 1) / per_page).max(1);
        Self {
            total,
            current_page: Some(page.page()),
            per_page: Some(per_page),
            last_page: Some(last_page),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for all list endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 12, max: 100)
    #[serde(default = "default_per_page")]
    #[param(minimum = 1, maximum = 100)]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page }
    }

    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// Calculate SQL OFFSET from page number, saturating for huge pages
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Get clamped per_page (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Deserialize a nullable field of a partial update.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent keeps the stored value (`None`), `null` clears
/// it (`Some(None)`), anything else sets it.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_caps_page_size() {
        let page = PaginationQuery::new(1, 500);
        assert_eq!(page.limit(), MAX_PAGE_SIZE);

        let page = PaginationQuery::new(0, 0);
        assert_eq!(page.limit(), 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_pagination_offset() {
        let page = PaginationQuery::new(3, 12);
        assert_eq!(page.offset(), 24);
    }

    #[test]
    fn test_pagination_offset_saturates_on_huge_page() {
        let page = PaginationQuery::new(i64::MAX, 12);
        assert_eq!(page.offset(), i64::MAX);

        let meta = Meta::paginated(&page, 25);
        assert_eq!(meta.current_page, Some(i64::MAX));
        assert_eq!(meta.last_page, Some(3));
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        capacity: Option<Option<i32>>,
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.capacity, None);

        let cleared: Patch = serde_json::from_str(r#"{"capacity": null}"#).unwrap();
        assert_eq!(cleared.capacity, Some(None));

        let set: Patch = serde_json::from_str(r#"{"capacity": 300}"#).unwrap();
        assert_eq!(set.capacity, Some(Some(300)));
    }

    #[test]
    fn test_meta_paginated_last_page() {
        let meta = Meta::paginated(&PaginationQuery::new(2, 12), 25);
        assert_eq!(meta.last_page, Some(3));
        assert_eq!(meta.current_page, Some(2));

        let empty = Meta::paginated(&PaginationQuery::default(), 0);
        assert_eq!(empty.last_page, Some(1));
    }
}
