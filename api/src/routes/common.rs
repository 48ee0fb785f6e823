use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use validator::ValidationErrors;

/// Flattens validator errors into the single user-visible message carried by
/// `ApiResponse::error`.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            match &err.message {
                Some(msg) => messages.push(msg.to_string()),
                None => messages.push(format!("{field} is invalid")),
            }
        }
    }
    messages.join(", ")
}

/// Optional date carried by code and attendance requests. Everything in the
/// original flow operates on "today"; an explicit date mostly serves tests
/// and catch-up sweeps.
#[derive(Debug, Default, Deserialize)]
pub struct DateParam {
    pub date: Option<NaiveDate>,
}

impl DateParam {
    pub fn resolve(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Utc::now().date_naive())
    }
}
