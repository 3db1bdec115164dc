use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath, MaybeUser};
use crate::features::auth::guards::{RequireAdmin, RequireOrganizer};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::events::dtos::{
    ApproveEventDto, CreateEventDto, EventQueryParams, EventResponseDto, MyEventsQuery,
    RejectEventDto, UpdateEventDto,
};
use crate::features::events::services::EventService;
use crate::shared::types::ApiResponse;

/// List events with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/events",
    params(EventQueryParams, crate::shared::types::PaginationQuery),
    responses(
        (status = 200, description = "Page of events", body = ApiResponse<Vec<EventResponseDto>>),
        (status = 400, description = "Malformed filter value")
    ),
    tag = "events"
)]
pub async fn list_events(
    MaybeUser(caller): MaybeUser,
    State(service): State<Arc<EventService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let params = EventQueryParams::from_pairs(pairs)?;
    let (events, meta) = service.list(params, caller.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(events), None, Some(meta))))
}

/// Get event by id
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<EventResponseDto>),
        (status = 404, description = "Event not found or not visible to the caller")
    ),
    tag = "events"
)]
pub async fn get_event(
    MaybeUser(caller): MaybeUser,
    State(service): State<Arc<EventService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = service.get(id, caller.as_ref()).await?;
    Ok(Json(ApiResponse::success(Some(event), None, None)))
}

/// Submit an event for approval
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event submitted", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Organizer or admin access required")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    RequireOrganizer(user): RequireOrganizer,
    State(service): State<Arc<EventService>>,
    AppJson(dto): AppJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponseDto>>)> {
    dto.validate()?;

    let event = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(event),
            Some("Event created successfully and submitted for approval".to_string()),
            None,
        )),
    ))
}

/// Update an event (owner or admin)
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Validation error or illegal status change"),
        (status = 403, description = "Not the owner, or status change needs an admin"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateEventDto>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    dto.validate()?;

    let event = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(event),
        Some("Event updated successfully".to_string()),
        None,
    )))
}

/// Delete an event (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Event deleted successfully".to_string()),
        None,
    )))
}

/// Approved events starting in the given month
#[utoipa::path(
    get,
    path = "/api/events/calendar/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year, 2020 to 2030"),
        ("month" = u32, Path, description = "Month, 1 to 12")
    ),
    responses(
        (status = 200, description = "Events in the month", body = ApiResponse<Vec<EventResponseDto>>),
        (status = 400, description = "Year or month out of range")
    ),
    tag = "events"
)]
pub async fn calendar_events(
    State(service): State<Arc<EventService>>,
    AppPath((year, month)): AppPath<(i32, u32)>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let events = service.calendar(year, month).await?;
    Ok(Json(ApiResponse::success(Some(events), None, None)))
}

/// The caller's own events in any status
#[utoipa::path(
    get,
    path = "/api/my-events",
    params(MyEventsQuery),
    responses(
        (status = 200, description = "Page of the caller's events", body = ApiResponse<Vec<EventResponseDto>>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn my_events(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let query = MyEventsQuery::from_pairs(pairs)?;
    let (events, meta) = service.my_events(&user, query).await?;
    Ok(Json(ApiResponse::success(Some(events), None, Some(meta))))
}

/// Approve an event (admin). The body is optional.
#[utoipa::path(
    post,
    path = "/api/events/{id}/approve",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    request_body(content = ApproveEventDto, description = "Optional admin notes"),
    responses(
        (status = 200, description = "Event approved", body = ApiResponse<EventResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn approve_event(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<EventService>>,
    AppPath(id): AppPath<i64>,
    body: Bytes,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let dto = if body.iter().all(u8::is_ascii_whitespace) {
        ApproveEventDto::default()
    } else {
        serde_json::from_slice::<ApproveEventDto>(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON data: {}", e)))?
    };

    let event = service.approve(&admin, id, dto.admin_notes).await?;
    Ok(Json(ApiResponse::success(
        Some(event),
        Some("Event approved successfully".to_string()),
        None,
    )))
}

/// Reject an event (admin) with a required reason
#[utoipa::path(
    post,
    path = "/api/events/{id}/reject",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    request_body = RejectEventDto,
    responses(
        (status = 200, description = "Event rejected", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Reason missing"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Event not found")
    ),
    tag = "events",
    security(("bearer_auth" = []))
)]
pub async fn reject_event(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<EventService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<RejectEventDto>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = service.reject(&admin, id, &dto.reason).await?;
    Ok(Json(ApiResponse::success(
        Some(event),
        Some("Event rejected".to_string()),
        None,
    )))
}
