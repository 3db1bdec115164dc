use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::repositories::CategoryRepository;
use crate::features::events::dtos::{
    CreateEventDto, EventQueryParams, EventResponseDto, MyEventsQuery, PriceFilter,
    UpdateEventDto,
};
use crate::features::events::models::{
    EventChanges, EventDetail, EventFilter, EventSort, EventStatus, NewEvent, SortDirection,
    StatusChange,
};
use crate::features::events::repositories::EventRepository;
use crate::features::events::workflow;
use crate::features::venues::repositories::VenueRepository;
use crate::shared::constants::{CALENDAR_MAX_YEAR, CALENDAR_MIN_YEAR, DEFAULT_PAGE_SIZE};
use crate::shared::types::{Meta, PaginationQuery};
use crate::shared::validation::{invalid_field, required_text};

/// Service for event submission, listing and the approval workflow
pub struct EventService {
    events: Arc<dyn EventRepository>,
    venues: Arc<dyn VenueRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        venues: Arc<dyn VenueRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            events,
            venues,
            categories,
        }
    }

    /// Filtered, paginated listing.
    ///
    /// Only admins see beyond `approved`; anyone else asking for another
    /// status gets an empty page.
    pub async fn list(
        &self,
        params: EventQueryParams,
        caller: Option<&AuthenticatedUser>,
    ) -> Result<(Vec<EventResponseDto>, Meta)> {
        let is_admin = caller.is_some_and(|u| u.is_admin());

        let status = if is_admin {
            params.status
        } else {
            match params.status {
                None | Some(EventStatus::Approved) => Some(EventStatus::Approved),
                Some(_) => return Ok((Vec::new(), Meta::paginated(&params.pagination, 0))),
            }
        };

        let filter = EventFilter {
            search: params.search,
            category_ids: params.categories,
            venue_id: params.venue,
            organizer_id: params.organizer,
            date: params.date,
            is_free: params.price_filter.map(|p| p == PriceFilter::Free),
            status,
            sort: params.sort_by,
            direction: params.sort_direction,
            ..Default::default()
        };

        let (events, total) = self
            .events
            .search(filter, Some(params.pagination.clone()))
            .await?;

        Ok((
            events.into_iter().map(Into::into).collect(),
            Meta::paginated(&params.pagination, total),
        ))
    }

    /// Event detail. Unapproved events are visible to admins, organizers and
    /// the owner; everyone else gets 404.
    pub async fn get(
        &self,
        id: i64,
        caller: Option<&AuthenticatedUser>,
    ) -> Result<EventResponseDto> {
        let detail = self.find(id).await?;

        let visible = detail.event.status == EventStatus::Approved
            || caller.is_some_and(|u| {
                u.is_admin() || u.is_organizer() || u.id == detail.event.organizer_id
            });

        if !visible {
            return Err(not_found(id));
        }

        Ok(detail.into())
    }

    /// Submit an event. It is always stored as `pending`.
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreateEventDto,
    ) -> Result<EventResponseDto> {
        let name = required_text("name", &dto.name, NAME_REQUIRED)?;
        let description = required_text("description", &dto.description, DESCRIPTION_REQUIRED)?;
        workflow::check_schedule(dto.start_date_time, dto.end_date_time)?;
        let pricing = workflow::resolve_pricing(dto.is_free, dto.ticket_price)?;
        let category_ids = dedup(dto.category_ids);
        self.check_references(dto.venue_id, &category_ids).await?;

        if let Some(requested) = dto.status.filter(|s| *s != EventStatus::Pending) {
            tracing::debug!(%requested, "Ignoring caller-supplied status on create");
        }

        let detail = self
            .events
            .create(NewEvent {
                name,
                description,
                start_date_time: dto.start_date_time,
                end_date_time: dto.end_date_time,
                venue_id: dto.venue_id,
                organizer_id: user.id,
                ticket_price: pricing.ticket_price,
                is_free: pricing.is_free,
                website: dto.website,
                ticketing_link: dto.ticketing_link,
                image_url: dto.image_url,
                status: EventStatus::Pending,
                category_ids,
            })
            .await?;

        tracing::info!(
            event_id = detail.event.id,
            organizer_id = user.id,
            "Event submitted for approval"
        );

        Ok(detail.into())
    }

    /// Edit an event (owner or admin). Status changes follow the workflow.
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: i64,
        dto: UpdateEventDto,
    ) -> Result<EventResponseDto> {
        let current = self.find(id).await?.event;

        if !user.can_manage(current.organizer_id) {
            return Err(AppError::Forbidden(
                "Unauthorized to update this event".to_string(),
            ));
        }

        let name = dto
            .name
            .as_deref()
            .map(|n| required_text("name", n, NAME_REQUIRED))
            .transpose()?;
        let description = dto
            .description
            .as_deref()
            .map(|d| required_text("description", d, DESCRIPTION_REQUIRED))
            .transpose()?;

        let status = dto.status.unwrap_or(current.status);
        workflow::check_transition(user, current.status, status)?;

        let start = dto.start_date_time.unwrap_or(current.start_date_time);
        let end = dto.end_date_time.unwrap_or(current.end_date_time);
        workflow::check_schedule(start, end)?;

        let price_given = dto.ticket_price.is_some();
        let ticket_price = dto.ticket_price.unwrap_or(current.ticket_price);
        let is_free = dto
            .is_free
            .or((!price_given).then_some(current.is_free));
        let pricing = workflow::resolve_pricing(is_free, ticket_price)?;

        let venue_id = dto.venue_id.unwrap_or(current.venue_id);
        let category_ids = dto.category_ids.map(dedup);
        if dto.venue_id.is_some() || category_ids.is_some() {
            self.check_references(venue_id, category_ids.as_deref().unwrap_or_default())
                .await?;
        }

        let now = Utc::now();
        let changed = status != current.status;

        let changes = EventChanges {
            name: name.unwrap_or(current.name),
            description: description.unwrap_or(current.description),
            start_date_time: start,
            end_date_time: end,
            venue_id,
            ticket_price: pricing.ticket_price,
            is_free: pricing.is_free,
            website: dto.website.unwrap_or(current.website),
            ticketing_link: dto.ticketing_link.unwrap_or(current.ticketing_link),
            image_url: dto.image_url.unwrap_or(current.image_url),
            status,
            approved_at: if changed && status == EventStatus::Approved {
                Some(now)
            } else {
                current.approved_at
            },
            rejected_at: if changed && status == EventStatus::Rejected {
                Some(now)
            } else {
                current.rejected_at
            },
            category_ids,
        };

        let detail = self
            .events
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        if changed {
            tracing::info!(event_id = id, from = %current.status, to = %status, "Event status changed");
        }

        Ok(detail.into())
    }

    /// Delete an event (owner or admin)
    pub async fn delete(&self, user: &AuthenticatedUser, id: i64) -> Result<()> {
        let event = self.find(id).await?.event;

        if !user.can_manage(event.organizer_id) {
            return Err(AppError::Forbidden(
                "Unauthorized to delete this event".to_string(),
            ));
        }

        if !self.events.delete(id).await? {
            return Err(not_found(id));
        }

        tracing::info!(event_id = id, user_id = user.id, "Event deleted");
        Ok(())
    }

    /// Approved events starting within the given month, ordered by start
    pub async fn calendar(&self, year: i32, month: u32) -> Result<Vec<EventResponseDto>> {
        if !(CALENDAR_MIN_YEAR..=CALENDAR_MAX_YEAR).contains(&year) {
            return Err(AppError::InvalidFields(invalid_field(
                "year",
                "range",
                format!(
                    "The year must be between {} and {}.",
                    CALENDAR_MIN_YEAR, CALENDAR_MAX_YEAR
                ),
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(AppError::InvalidFields(invalid_field(
                "month",
                "range",
                "The month must be between 1 and 12.",
            )));
        }

        let (from, until) = month_bounds(year, month)?;

        let filter = EventFilter {
            status: Some(EventStatus::Approved),
            starts_from: Some(from),
            starts_before: Some(until),
            sort: EventSort::StartDateTime,
            direction: SortDirection::Asc,
            ..Default::default()
        };

        let (events, _) = self.events.search(filter, None).await?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    /// The caller's own events in any status, newest first
    pub async fn my_events(
        &self,
        user: &AuthenticatedUser,
        query: MyEventsQuery,
    ) -> Result<(Vec<EventResponseDto>, Meta)> {
        let page = PaginationQuery::new(query.page.unwrap_or(1), DEFAULT_PAGE_SIZE);

        let filter = EventFilter {
            organizer_id: Some(user.id),
            status: query.status,
            sort: EventSort::CreatedAt,
            direction: SortDirection::Desc,
            ..Default::default()
        };

        let (events, total) = self.events.search(filter, Some(page.clone())).await?;
        Ok((
            events.into_iter().map(Into::into).collect(),
            Meta::paginated(&page, total),
        ))
    }

    /// Approve an event. Any prior status is accepted; re-approval restamps
    /// `approved_at`.
    pub async fn approve(
        &self,
        admin: &AuthenticatedUser,
        id: i64,
        admin_notes: Option<String>,
    ) -> Result<EventResponseDto> {
        let admin_notes = admin_notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let detail = self
            .events
            .set_status(
                id,
                StatusChange {
                    status: EventStatus::Approved,
                    admin_notes,
                    approved_at: Some(Utc::now()),
                    rejected_at: None,
                },
            )
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(event_id = id, admin_id = admin.id, "Event approved");
        Ok(detail.into())
    }

    /// Reject an event; the trimmed reason is required and kept as admin notes
    pub async fn reject(
        &self,
        admin: &AuthenticatedUser,
        id: i64,
        reason: &str,
    ) -> Result<EventResponseDto> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::InvalidFields(invalid_field(
                "reason",
                "required",
                "The reason field is required.",
            )));
        }

        let detail = self
            .events
            .set_status(
                id,
                StatusChange {
                    status: EventStatus::Rejected,
                    admin_notes: Some(reason.to_string()),
                    approved_at: None,
                    rejected_at: Some(Utc::now()),
                },
            )
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(event_id = id, admin_id = admin.id, "Event rejected");
        Ok(detail.into())
    }

    async fn find(&self, id: i64) -> Result<EventDetail> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn check_references(&self, venue_id: i64, category_ids: &[i64]) -> Result<()> {
        if !self.venues.exists(venue_id).await? {
            return Err(AppError::InvalidFields(invalid_field(
                "venue_id",
                "exists",
                "The selected venue id is invalid.",
            )));
        }

        if !category_ids.is_empty() {
            let missing = self.categories.missing_ids(category_ids.to_vec()).await?;
            if !missing.is_empty() {
                tracing::debug!(?missing, "Unknown category ids");
                return Err(AppError::InvalidFields(invalid_field(
                    "category_ids",
                    "exists",
                    "The selected category ids are invalid.",
                )));
            }
        }

        Ok(())
    }
}

const NAME_REQUIRED: &str = "The name field is required.";
const DESCRIPTION_REQUIRED: &str = "The description field is required.";

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Event {} not found", id))
}

fn dedup(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// `[first instant of the month, first instant of the next month)` in UTC
fn month_bounds(
    year: i32,
    month: u32,
) -> Result<(chrono::DateTime<Utc>, chrono::DateTime<Utc>)> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month {}-{}", year, month)))?;
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| AppError::BadRequest(format!("Invalid month {}-{}", year, month)))?;

    Ok((Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end)))
}
