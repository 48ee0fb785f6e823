use chrono::{NaiveDate, NaiveTime};
use db::models::daily_code::Model as DailyCode;
use serde::Serialize;

#[derive(Debug, Serialize, Default)]
pub struct DailyCodeResponse {
    pub class_name: String,
    pub subject: String,
    pub code: String,
    pub generated_by: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
}

impl From<DailyCode> for DailyCodeResponse {
    fn from(row: DailyCode) -> Self {
        Self {
            class_name: row.class_name,
            subject: row.subject,
            code: row.code,
            generated_by: row.generated_by,
            date: Some(row.date),
            time: Some(row.time),
        }
    }
}
