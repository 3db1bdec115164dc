use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::events::{
    dtos as events_dtos, handlers as events_handlers, models as events_models,
};
use crate::features::venues::{dtos as venues_dtos, handlers as venues_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::get_user,
        auth_handlers::update_profile,
        auth_handlers::refresh_token,
        // Events
        events_handlers::list_events,
        events_handlers::get_event,
        events_handlers::create_event,
        events_handlers::update_event,
        events_handlers::delete_event,
        events_handlers::calendar_events,
        events_handlers::my_events,
        events_handlers::approve_event,
        events_handlers::reject_event,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Venues
        venues_handlers::list_venues,
        venues_handlers::get_venue,
        venues_handlers::create_venue,
        venues_handlers::update_venue,
        venues_handlers::delete_venue,
    ),
    components(
        schemas(
            Meta,
            auth_model::UserRole,
            auth_dtos::RegisterRole,
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::UpdateProfileDto,
            auth_dtos::UserDto,
            auth_dtos::AuthResponseDto,
            ApiResponse<auth_dtos::UserDto>,
            ApiResponse<auth_dtos::AuthResponseDto>,
            events_models::EventStatus,
            events_models::EventSort,
            events_models::SortDirection,
            events_dtos::PriceFilter,
            events_dtos::EventVenueDto,
            events_dtos::EventOrganizerDto,
            events_dtos::EventCategoryDto,
            events_dtos::EventResponseDto,
            events_dtos::CreateEventDto,
            events_dtos::UpdateEventDto,
            events_dtos::ApproveEventDto,
            events_dtos::RejectEventDto,
            ApiResponse<events_dtos::EventResponseDto>,
            ApiResponse<Vec<events_dtos::EventResponseDto>>,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            venues_dtos::VenueResponseDto,
            venues_dtos::CreateVenueDto,
            venues_dtos::UpdateVenueDto,
            ApiResponse<venues_dtos::VenueResponseDto>,
            ApiResponse<Vec<venues_dtos::VenueResponseDto>>,
        )
    ),
    tags(
        (name = "auth", description = "Accounts and bearer tokens"),
        (name = "events", description = "Event submission, discovery and approval"),
        (name = "categories", description = "Event categories (writes are admin only)"),
        (name = "venues", description = "Venues (writes are admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "PulseCity API",
        version = "0.1.0",
        description = "API documentation for PulseCity",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_event_workflow() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/events/{id}/approve"));
        assert!(doc.paths.paths.contains_key("/api/events/calendar/{year}/{month}"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging docs".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.description.as_deref(), Some("staging docs"));
    }
}
