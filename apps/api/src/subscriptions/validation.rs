use chrono::NaiveDate;

use crate::models::subscription::{NewSubscription, Subscription, SubscriptionRequest};
use crate::validation::{optional_text, required, required_text, FieldErrors};

pub const MAX_TYPE_CHARS: usize = 100;
pub const DATE_RANGE: &str = "End of the subscription cannot be earlier than start date.";
pub const NEGATIVE_PRICE: &str = "Ensure this value is greater than or equal to 0.";

pub fn unknown_user(user_id: i64) -> FieldErrors {
    FieldErrors::single("user_id", format!("User {user_id} does not exist."))
}

/// Validates a `POST /subscriptions` body. Every field is required.
pub fn validate_new_subscription(req: SubscriptionRequest) -> Result<NewSubscription, FieldErrors> {
    let mut errors = FieldErrors::new();

    let user_id = required(&mut errors, "user_id", req.user_id);
    let start_date = required(&mut errors, "start_date", req.start_date);
    let end_date = required(&mut errors, "end_date", req.end_date);
    let price = required(&mut errors, "price", req.price);
    let kind = required_text(&mut errors, "type", req.kind.as_deref(), MAX_TYPE_CHARS);

    if let Some(price) = price {
        check_price(&mut errors, price);
    }
    if let (Some(start), Some(end)) = (start_date, end_date) {
        check_date_range(&mut errors, start, end);
    }

    match (user_id, start_date, end_date, price, kind) {
        (Some(user_id), Some(start_date), Some(end_date), Some(price), Some(kind))
            if errors.is_empty() =>
        {
            Ok(NewSubscription {
                user_id,
                start_date,
                end_date,
                price,
                kind,
            })
        }
        _ => Err(errors),
    }
}

/// Merges a `PUT /subscriptions/:id` body into the stored record.
///
/// Only fields present in the body change. The date range is checked on the
/// merged result, so moving just one end of the period is still validated
/// against the stored other end.
pub fn validate_subscription_update(
    existing: &Subscription,
    req: SubscriptionRequest,
) -> Result<Subscription, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut merged = existing.clone();

    if let Some(user_id) = req.user_id {
        merged.user_id = user_id;
    }
    if let Some(start_date) = req.start_date {
        merged.start_date = start_date;
    }
    if let Some(end_date) = req.end_date {
        merged.end_date = end_date;
    }
    if let Some(price) = req.price {
        check_price(&mut errors, price);
        merged.price = price;
    }
    if let Some(kind) = optional_text(&mut errors, "type", req.kind.as_deref(), MAX_TYPE_CHARS) {
        merged.kind = kind;
    }

    check_date_range(&mut errors, merged.start_date, merged.end_date);
    errors.finish(|| merged)
}

fn check_price(errors: &mut FieldErrors, price: i64) {
    if price < 0 {
        errors.add("price", NEGATIVE_PRICE);
    }
}

fn check_date_range(errors: &mut FieldErrors, start: NaiveDate, end: NaiveDate) {
    if start > end {
        errors.add("end_date", DATE_RANGE);
    }
}
