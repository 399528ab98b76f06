use crate::models::visit::{CreateVisitRequest, NewVisit, UpdateVisitRequest, Visit};
use crate::validation::{required, FieldErrors};

pub fn unknown_subscription(subscription_id: i64) -> FieldErrors {
    FieldErrors::single(
        "subscription_id",
        format!("Subscription {subscription_id} does not exist."),
    )
}

pub fn validate_new_visit(req: CreateVisitRequest) -> Result<NewVisit, FieldErrors> {
    let mut errors = FieldErrors::new();
    let subscription_id = required(&mut errors, "subscription_id", req.subscription_id);
    let date = required(&mut errors, "date", req.date);

    match (subscription_id, date) {
        (Some(subscription_id), Some(date)) => Ok(NewVisit {
            subscription_id,
            date,
        }),
        _ => Err(errors),
    }
}

/// Applies a `PUT /visits/:id` body. An absent date leaves the visit unchanged.
pub fn apply_visit_update(visit: &mut Visit, req: UpdateVisitRequest) {
    if let Some(date) = req.date {
        visit.date = date;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_valid_visit() {
        let visit = validate_new_visit(CreateVisitRequest {
            subscription_id: Some(4),
            date: Some(date("2024-05-02")),
        })
        .unwrap();
        assert_eq!(visit.subscription_id, 4);
        assert_eq!(visit.date, date("2024-05-02"));
    }

    #[test]
    fn test_missing_fields_reported() {
        let errors = validate_new_visit(CreateVisitRequest::default()).unwrap_err();
        assert!(errors.contains("subscription_id"));
        assert!(errors.contains("date"));
    }

    #[test]
    fn test_update_writes_date() {
        let mut visit = Visit {
            id: 1,
            subscription_id: 4,
            date: date("2024-05-02"),
        };
        apply_visit_update(
            &mut visit,
            UpdateVisitRequest {
                date: Some(date("2024-05-09")),
            },
        );
        assert_eq!(visit.date, date("2024-05-09"));
        assert_eq!(visit.subscription_id, 4);

        apply_visit_update(&mut visit, UpdateVisitRequest::default());
        assert_eq!(visit.date, date("2024-05-09"));
    }
}
