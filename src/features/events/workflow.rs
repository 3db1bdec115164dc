//! Event approval workflow.
//!
//! ```text
//! draft ──▶ pending ──▶ approved ──▶ cancelled
//!              │
//!              └──────▶ rejected
//! ```
//!
//! `rejected` and `cancelled` are terminal. Moving into `approved` or
//! `rejected` is an admin decision; every other move is open to whoever may
//! edit the event (owner or admin).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::events::models::EventStatus;
use crate::shared::constants::PAID_EVENT_PRICE_REQUIRED;
use crate::shared::validation::invalid_field;

/// Whether the state machine has an edge `from -> to`
pub fn can_transition(from: EventStatus, to: EventStatus) -> bool {
    use EventStatus::*;

    matches!(
        (from, to),
        (Draft, Pending) | (Pending, Approved) | (Pending, Rejected) | (Approved, Cancelled)
    )
}

pub fn requires_admin(to: EventStatus) -> bool {
    matches!(to, EventStatus::Approved | EventStatus::Rejected)
}

/// Check a status change requested through the generic update.
///
/// Keeping the current status is always allowed.
pub fn check_transition(
    user: &AuthenticatedUser,
    from: EventStatus,
    to: EventStatus,
) -> Result<()> {
    if from == to {
        return Ok(());
    }

    if !can_transition(from, to) {
        return Err(AppError::InvalidFields(invalid_field(
            "status",
            "transition",
            format!("Cannot change status from {} to {}", from, to),
        )));
    }

    if requires_admin(to) && !user.is_admin() {
        return Err(AppError::Forbidden(format!(
            "Only administrators can mark an event as {}",
            to
        )));
    }

    Ok(())
}

/// Price columns as they are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub is_free: bool,
    pub ticket_price: Option<Decimal>,
}

/// Settle `is_free` and `ticket_price` into a consistent pair.
///
/// An absent flag is derived as "no price, or a price of zero". Free events
/// store no price; paid events need a positive one.
pub fn resolve_pricing(is_free: Option<bool>, ticket_price: Option<Decimal>) -> Result<Pricing> {
    if ticket_price.is_some_and(|p| p.is_sign_negative() && !p.is_zero()) {
        return Err(AppError::InvalidFields(invalid_field(
            "ticket_price",
            "min",
            "Ticket price must be at least 0.",
        )));
    }

    let is_free = is_free.unwrap_or_else(|| ticket_price.is_none_or(|p| p.is_zero()));

    if is_free {
        return Ok(Pricing {
            is_free: true,
            ticket_price: None,
        });
    }

    match ticket_price {
        Some(price) if price > Decimal::ZERO => Ok(Pricing {
            is_free: false,
            ticket_price: Some(price.round_dp(2)),
        }),
        _ => Err(AppError::InvalidFields(invalid_field(
            "ticket_price",
            "required",
            PAID_EVENT_PRICE_REQUIRED,
        ))),
    }
}

/// The end must be strictly after the start
pub fn check_schedule(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end <= start {
        return Err(AppError::InvalidFields(invalid_field(
            "end_date_time",
            "after",
            "The end date time must be a date after start date time.",
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{admin_user, organizer_user};
    use EventStatus::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_transition_table() {
        assert!(can_transition(Draft, Pending));
        assert!(can_transition(Pending, Approved));
        assert!(can_transition(Pending, Rejected));
        assert!(can_transition(Approved, Cancelled));

        assert!(!can_transition(Rejected, Pending));
        assert!(!can_transition(Cancelled, Approved));
        assert!(!can_transition(Draft, Approved));
        assert!(!can_transition(Approved, Pending));
    }

    #[test]
    fn test_owner_cannot_self_approve() {
        let owner = organizer_user(3);
        assert!(matches!(
            check_transition(&owner, Pending, Approved),
            Err(AppError::Forbidden(_))
        ));
        assert!(check_transition(&admin_user(1), Pending, Approved).is_ok());
    }

    #[test]
    fn test_owner_can_cancel_and_submit() {
        let owner = organizer_user(3);
        assert!(check_transition(&owner, Approved, Cancelled).is_ok());
        assert!(check_transition(&owner, Draft, Pending).is_ok());
        assert!(check_transition(&owner, Rejected, Rejected).is_ok());
    }

    #[test]
    fn test_terminal_states_reject_moves_even_for_admin() {
        assert!(matches!(
            check_transition(&admin_user(1), Rejected, Pending),
            Err(AppError::InvalidFields(_))
        ));
    }

    #[test]
    fn test_pricing_derives_free_when_flag_absent() {
        assert_eq!(
            resolve_pricing(None, None).unwrap(),
            Pricing {
                is_free: true,
                ticket_price: None
            }
        );
        assert_eq!(
            resolve_pricing(None, Some(dec("0"))).unwrap(),
            Pricing {
                is_free: true,
                ticket_price: None
            }
        );
        assert_eq!(
            resolve_pricing(None, Some(dec("25.00"))).unwrap(),
            Pricing {
                is_free: false,
                ticket_price: Some(dec("25.00"))
            }
        );
    }

    #[test]
    fn test_free_event_drops_price() {
        let pricing = resolve_pricing(Some(true), Some(dec("10"))).unwrap();
        assert!(pricing.is_free);
        assert_eq!(pricing.ticket_price, None);
    }

    #[test]
    fn test_paid_event_requires_positive_price() {
        for price in [None, Some(dec("0"))] {
            match resolve_pricing(Some(false), price) {
                Err(AppError::InvalidFields(errors)) => {
                    let messages = crate::shared::validation::field_messages(&errors);
                    assert_eq!(
                        messages,
                        vec![format!("ticket_price: {}", PAID_EVENT_PRICE_REQUIRED)]
                    );
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(resolve_pricing(None, Some(dec("-5"))).is_err());
    }

    #[test]
    fn test_schedule_requires_end_after_start() {
        let start = Utc::now();
        assert!(check_schedule(start, start).is_err());
        assert!(check_schedule(start, start + chrono::Duration::hours(2)).is_ok());
    }
}
