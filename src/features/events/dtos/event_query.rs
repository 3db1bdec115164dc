use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::core::error::{AppError, Result};
use crate::features::events::models::{EventSort, EventStatus, SortDirection};
use crate::shared::types::PaginationQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PriceFilter {
    Free,
    Paid,
}

/// Query params for listing events.
///
/// Parsed from raw key/value pairs so `categories[]=1&categories[]=2`,
/// `categories=1&categories=2` and `categories=1,2` all work.
#[derive(Debug, Clone, Default, PartialEq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventQueryParams {
    /// Case-insensitive match on name or description
    pub search: Option<String>,
    /// Category ids; an event matches if it has any of them
    #[param(rename = "categories[]")]
    pub categories: Vec<i64>,
    pub venue: Option<i64>,
    pub organizer: Option<i64>,
    /// Calendar day of the start time (YYYY-MM-DD)
    #[param(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    #[param(inline)]
    pub price_filter: Option<PriceFilter>,
    /// Honored across all statuses for admins only
    #[param(inline)]
    pub status: Option<EventStatus>,
    #[param(inline)]
    pub sort_by: EventSort,
    #[param(inline)]
    pub sort_direction: SortDirection,
    #[param(ignore)]
    pub pagination: PaginationQuery,
}

impl EventQueryParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self> {
        let mut params = Self::default();

        for (key, value) in pairs {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.trim_end_matches("[]") {
                "search" => params.search = Some(value.to_string()),
                "categories" => {
                    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                        params.categories.push(parse_number("categories", part)?);
                    }
                }
                "venue" => params.venue = Some(parse_number("venue", value)?),
                "organizer" => params.organizer = Some(parse_number("organizer", value)?),
                "date" => {
                    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                        AppError::BadRequest(format!(
                            "Invalid date '{}', expected YYYY-MM-DD",
                            value
                        ))
                    })?;
                    params.date = Some(date);
                }
                // Anything other than free/paid is ignored
                "price_filter" => {
                    params.price_filter = match value {
                        "free" => Some(PriceFilter::Free),
                        "paid" => Some(PriceFilter::Paid),
                        _ => None,
                    }
                }
                "status" => {
                    params.status = Some(value.parse().map_err(AppError::BadRequest)?);
                }
                // Unknown sort options fall back to the defaults
                "sort_by" => params.sort_by = value.parse().unwrap_or_default(),
                "sort_direction" => params.sort_direction = value.parse().unwrap_or_default(),
                "page" => params.pagination.page = parse_number("page", value)?,
                "per_page" => params.pagination.per_page = parse_number("per_page", value)?,
                _ => {}
            }
        }

        Ok(params)
    }
}

/// Query params for the caller's own events
#[derive(Debug, Clone, Default, PartialEq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MyEventsQuery {
    #[param(inline)]
    pub status: Option<EventStatus>,
    pub page: Option<i64>,
}

impl MyEventsQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self> {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.trim();
            match key.as_str() {
                "status" if !value.is_empty() => {
                    query.status = Some(value.parse().map_err(AppError::BadRequest)?);
                }
                "page" if !value.is_empty() => query.page = Some(parse_number("page", value)?),
                _ => {}
            }
        }
        Ok(query)
    }
}

fn parse_number(field: &str, value: &str) -> Result<i64> {
    value
        .parse::<i64>()
        .map_err(|_| AppError::BadRequest(format!("Invalid value '{}' for '{}'", value, field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let params = EventQueryParams::from_pairs(vec![]).unwrap();
        assert_eq!(params.sort_by, EventSort::StartDateTime);
        assert_eq!(params.sort_direction, SortDirection::Asc);
        assert_eq!(params.pagination.limit(), 12);
        assert_eq!(params.pagination.page(), 1);
    }

    #[test]
    fn test_category_array_forms() {
        let bracketed =
            EventQueryParams::from_pairs(pairs(&[("categories[]", "1"), ("categories[]", "3")]))
                .unwrap();
        assert_eq!(bracketed.categories, vec![1, 3]);

        let csv = EventQueryParams::from_pairs(pairs(&[("categories", "2, 5")])).unwrap();
        assert_eq!(csv.categories, vec![2, 5]);
    }

    #[test]
    fn test_filters_parse() {
        let params = EventQueryParams::from_pairs(pairs(&[
            ("search", "jazz"),
            ("venue", "4"),
            ("date", "2030-06-01"),
            ("price_filter", "paid"),
            ("status", "pending"),
            ("sort_by", "name"),
            ("sort_direction", "desc"),
            ("per_page", "500"),
        ]))
        .unwrap();

        assert_eq!(params.search.as_deref(), Some("jazz"));
        assert_eq!(params.venue, Some(4));
        assert_eq!(params.date, NaiveDate::from_ymd_opt(2030, 6, 1));
        assert_eq!(params.price_filter, Some(PriceFilter::Paid));
        assert_eq!(params.status, Some(EventStatus::Pending));
        assert_eq!(params.sort_by, EventSort::Name);
        assert_eq!(params.sort_direction, SortDirection::Desc);
        assert_eq!(params.pagination.limit(), 100);
    }

    #[test]
    fn test_unknown_sort_falls_back_and_bad_price_filter_ignored() {
        let params = EventQueryParams::from_pairs(pairs(&[
            ("sort_by", "popularity"),
            ("price_filter", "cheap"),
        ]))
        .unwrap();
        assert_eq!(params.sort_by, EventSort::StartDateTime);
        assert_eq!(params.price_filter, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(EventQueryParams::from_pairs(pairs(&[("venue", "abc")])).is_err());
        assert!(EventQueryParams::from_pairs(pairs(&[("status", "archived")])).is_err());
        assert!(EventQueryParams::from_pairs(pairs(&[("date", "01/06/2030")])).is_err());
    }
}
