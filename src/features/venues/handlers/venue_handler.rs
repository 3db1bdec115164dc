use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::auth::guards::RequireAdmin;
use crate::features::venues::dtos::{CreateVenueDto, UpdateVenueDto, VenueResponseDto};
use crate::features::venues::services::VenueService;
use crate::shared::types::{ApiResponse, Meta};

/// List all venues
#[utoipa::path(
    get,
    path = "/api/venues",
    responses(
        (status = 200, description = "List of venues", body = ApiResponse<Vec<VenueResponseDto>>),
    ),
    tag = "venues"
)]
pub async fn list_venues(
    State(service): State<Arc<VenueService>>,
) -> Result<Json<ApiResponse<Vec<VenueResponseDto>>>> {
    let venues = service.list().await?;
    let total = venues.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(venues),
        None,
        Some(Meta::total(total)),
    )))
}

/// Get venue by id
#[utoipa::path(
    get,
    path = "/api/venues/{id}",
    params(
        ("id" = i64, Path, description = "Venue ID")
    ),
    responses(
        (status = 200, description = "Venue found", body = ApiResponse<VenueResponseDto>),
        (status = 404, description = "Venue not found")
    ),
    tag = "venues"
)]
pub async fn get_venue(
    State(service): State<Arc<VenueService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<VenueResponseDto>>> {
    let venue = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(venue), None, None)))
}

/// Create a venue (admin)
#[utoipa::path(
    post,
    path = "/api/venues",
    request_body = CreateVenueDto,
    responses(
        (status = 201, description = "Venue created", body = ApiResponse<VenueResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required")
    ),
    tag = "venues",
    security(("bearer_auth" = []))
)]
pub async fn create_venue(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<VenueService>>,
    AppJson(dto): AppJson<CreateVenueDto>,
) -> Result<(StatusCode, Json<ApiResponse<VenueResponseDto>>)> {
    dto.validate()?;

    let venue = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(venue),
            Some("Venue created successfully".to_string()),
            None,
        )),
    ))
}

/// Update a venue (admin)
#[utoipa::path(
    put,
    path = "/api/venues/{id}",
    params(
        ("id" = i64, Path, description = "Venue ID")
    ),
    request_body = UpdateVenueDto,
    responses(
        (status = 200, description = "Venue updated", body = ApiResponse<VenueResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Venue not found")
    ),
    tag = "venues",
    security(("bearer_auth" = []))
)]
pub async fn update_venue(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<VenueService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateVenueDto>,
) -> Result<Json<ApiResponse<VenueResponseDto>>> {
    dto.validate()?;

    let venue = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(venue),
        Some("Venue updated successfully".to_string()),
        None,
    )))
}

/// Delete a venue (admin). Events held there are deleted with it.
#[utoipa::path(
    delete,
    path = "/api/venues/{id}",
    params(
        ("id" = i64, Path, description = "Venue ID")
    ),
    responses(
        (status = 200, description = "Venue deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Venue not found")
    ),
    tag = "venues",
    security(("bearer_auth" = []))
)]
pub async fn delete_venue(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<VenueService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Venue deleted successfully".to_string()),
        None,
    )))
}
