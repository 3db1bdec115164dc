//! Wire to canonical translation for events and users.

use crate::client::models::{
    Category, Event, Organizer, Session, User, Venue, WireAuth, WireCategory, WireEvent,
    WireFlag, WireUser, WireVenue,
};
use crate::features::auth::model::UserRole;

/// Decide whether an event is free.
///
/// Priority: an explicit flag wins, then an explicit price (free when it is
/// zero), then the word "free" in the name, otherwise paid.
pub fn resolve_is_free(flag: Option<&WireFlag>, price: Option<f64>, name: &str) -> bool {
    if let Some(flag) = flag {
        return flag.is_set();
    }
    if let Some(price) = price {
        return price == 0.0;
    }
    name.to_lowercase().contains("free")
}

/// Card label for an event's price
pub fn price_label(event: &Event) -> String {
    match event.ticket_price {
        Some(price) if price > 0.0 => format!("${:.2}", price),
        Some(price) if price == 0.0 => "Free".to_string(),
        _ if event.is_free => "Free".to_string(),
        _ => "Contact for price".to_string(),
    }
}

pub fn normalize_event(wire: WireEvent) -> Event {
    let ticket_price = wire.ticket_price.as_ref().and_then(|p| p.amount());
    let is_free = resolve_is_free(wire.is_free.as_ref(), ticket_price, &wire.name);

    Event {
        id: wire.id.to_string(),
        name: wire.name,
        description: wire.description,
        start_date_time: wire.start_date_time,
        end_date_time: wire.end_date_time,
        venue: normalize_venue(wire.venue),
        organizer: Organizer {
            id: wire.organizer.id.to_string(),
            name: wire.organizer.name,
            contact_email: wire.organizer.email,
        },
        categories: wire.categories.into_iter().map(normalize_category).collect(),
        ticket_price,
        is_free,
        website: wire.website,
        ticketing_link: wire.ticketing_link,
        image_url: wire.image_url,
        status: wire.status,
        admin_notes: wire.admin_notes,
        approved_at: wire.approved_at,
        rejected_at: wire.rejected_at,
        created_at: wire.created_at,
        updated_at: wire.updated_at,
    }
}

/// Missing coordinates become 0
pub fn normalize_venue(wire: WireVenue) -> Venue {
    Venue {
        id: wire.id.to_string(),
        name: wire.name,
        address: wire.address,
        latitude: wire.latitude.unwrap_or(0.0),
        longitude: wire.longitude.unwrap_or(0.0),
        capacity: wire.capacity,
    }
}

pub fn normalize_category(wire: WireCategory) -> Category {
    Category {
        id: wire.id.to_string(),
        name: wire.name,
        color: wire.color,
    }
}

/// Missing roles default to `public`
pub fn normalize_user(wire: WireUser) -> User {
    User {
        id: wire.id.to_string(),
        name: wire.name,
        email: wire.email,
        role: wire.role.unwrap_or(UserRole::Public),
        created_at: wire.created_at,
    }
}

pub fn normalize_session(wire: WireAuth) -> Session {
    Session {
        user: normalize_user(wire.user),
        token: wire.token,
        expires_at: wire.expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::events::models::EventStatus;
    use serde_json::json;

    fn wire_event(overrides: serde_json::Value) -> WireEvent {
        let mut value = json!({
            "id": 7,
            "name": "Jazz Night",
            "description": "An evening of live jazz.",
            "start_date_time": "2030-06-01T19:00:00.000000Z",
            "end_date_time": "2030-06-01T22:00:00Z",
            "venue": {"id": 2, "name": "Riverside Hall", "address": "1 River Rd", "latitude": 40.7, "longitude": -74.0},
            "organizer": {"id": "3", "name": "Dana", "email": "dana@example.com"},
            "categories": [{"id": 1, "name": "Music", "color": "#8B5CF6"}],
            "status": "approved"
        });
        if let (Some(target), Some(source)) = (value.as_object_mut(), overrides.as_object()) {
            for (k, v) in source {
                target.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_free_priority_order() {
        // Flag beats price
        assert!(resolve_is_free(Some(&WireFlag::Number(1)), Some(20.0), "Gala"));
        assert!(!resolve_is_free(Some(&WireFlag::Text("0".into())), Some(0.0), "Free Gala"));
        // Price beats name
        assert!(!resolve_is_free(None, Some(15.0), "Free Jazz"));
        assert!(resolve_is_free(None, Some(0.0), "Gala"));
        // Name heuristic, then paid
        assert!(resolve_is_free(None, None, "FREE yoga in the park"));
        assert!(!resolve_is_free(None, None, "Gala"));
    }

    #[test]
    fn test_normalize_event_ids_and_price() {
        let event = normalize_event(wire_event(json!({
            "ticket_price": "25.00",
            "is_free": false
        })));

        assert_eq!(event.id, "7");
        assert_eq!(event.organizer.id, "3");
        assert_eq!(event.organizer.contact_email.as_deref(), Some("dana@example.com"));
        assert_eq!(event.ticket_price, Some(25.0));
        assert!(!event.is_free);
        assert_eq!(event.status, EventStatus::Approved);
        assert_eq!(event.categories[0].id, "1");
    }

    #[test]
    fn test_normalize_event_without_price_or_flag_falls_back_to_name() {
        let event = normalize_event(wire_event(json!({"name": "Free Friday Film"})));
        assert!(event.is_free);
        assert_eq!(event.ticket_price, None);
    }

    #[test]
    fn test_camel_case_output() {
        let value = serde_json::to_value(normalize_event(wire_event(json!({})))).unwrap();
        assert!(value.get("startDateTime").is_some());
        assert!(value.get("isFree").is_some());
        assert_eq!(value["venue"]["id"], "2");
    }

    #[test]
    fn test_price_labels() {
        let mut event = normalize_event(wire_event(json!({"ticket_price": 12.5, "is_free": 0})));
        assert_eq!(price_label(&event), "$12.50");

        event.is_free = true;
        event.ticket_price = None;
        assert_eq!(price_label(&event), "Free");

        event.is_free = false;
        assert_eq!(price_label(&event), "Contact for price");
    }

    #[test]
    fn test_price_label_prefers_positive_price_over_flag() {
        let event = normalize_event(wire_event(json!({"ticket_price": 15, "is_free": true})));
        assert!(event.is_free);
        assert_eq!(price_label(&event), "$15.00");
    }

    #[test]
    fn test_price_label_zero_price_is_free_even_when_flagged_paid() {
        let event = normalize_event(wire_event(json!({"ticket_price": "0.00", "is_free": false})));
        assert!(!event.is_free);
        assert_eq!(price_label(&event), "Free");
    }

    #[test]
    fn test_user_without_role_is_public() {
        let wire: WireUser = serde_json::from_value(json!({
            "id": 4, "name": "Ana", "email": "ana@example.com"
        }))
        .unwrap();
        assert_eq!(normalize_user(wire).role, UserRole::Public);
    }
}
