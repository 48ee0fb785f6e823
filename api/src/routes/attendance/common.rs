use chrono::{Datelike, NaiveDate, NaiveTime};
use db::models::attendance_record::{Model as AttendanceRecord, Status};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AttendanceRecordResponse {
    pub name: String,
    pub roll_no: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: Status,
}

impl From<AttendanceRecord> for AttendanceRecordResponse {
    fn from(row: AttendanceRecord) -> Self {
        Self {
            name: row.name,
            roll_no: row.roll_no,
            date: row.date,
            time: row.time,
            status: row.status,
        }
    }
}

/// Present share of `total`, rounded to two decimals; 0 when there are no
/// records. 2 Present out of 3 gives 66.67.
pub fn percentage(present: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = present as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Calendar month name ("January", ...) used to filter the analytics.
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// Distinct month names across the records, in calendar order.
pub fn month_names(records: &[AttendanceRecord]) -> Vec<String> {
    let mut months: Vec<(u32, String)> = Vec::new();
    for record in records {
        let entry = (record.date.month(), month_name(record.date));
        if !months.contains(&entry) {
            months.push(entry);
        }
    }
    months.sort_by_key(|(number, _)| *number);
    months.into_iter().map(|(_, name)| name).collect()
}

/// Minimal CSV quoting for the report download: fields containing the
/// separator, quotes or newlines get wrapped and inner quotes doubled.
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Renders the ledger rows as the downloadable attendance report.
pub fn render_csv(records: &[AttendanceRecord]) -> String {
    let mut out = String::from("name,roll_no,date,time,status\r\n");
    for record in records {
        out.push_str(&format!(
            "{},{},{},{},{}\r\n",
            csv_field(&record.name),
            csv_field(&record.roll_no),
            record.date,
            record.time.format("%H:%M:%S"),
            record.status,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(date: NaiveDate, status: Status, name: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            name: name.into(),
            roll_no: "R1".into(),
            date,
            time: Utc::now().time(),
            status,
            username: "amit01".into(),
            class_name: "10A".into(),
            subject: "Math".into(),
        }
    }

    #[test]
    fn two_of_three_present_is_66_67() {
        assert_eq!(percentage(2, 3), 66.67);
    }

    #[test]
    fn empty_history_is_zero_percent() {
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn full_attendance_is_100() {
        assert_eq!(percentage(4, 4), 100.0);
    }

    #[test]
    fn month_names_are_distinct_and_ordered() {
        let records = vec![
            record(NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(), Status::Present, "Amit"),
            record(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), Status::Absent, "Amit"),
            record(NaiveDate::from_ymd_opt(2025, 1, 11).unwrap(), Status::Present, "Amit"),
        ];
        assert_eq!(month_names(&records), vec!["January", "March"]);
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        assert_eq!(csv_field("Amit"), "Amit");
        assert_eq!(csv_field("Rao, Amit"), "\"Rao, Amit\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_render_includes_header_and_rows() {
        let records = vec![record(
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            Status::Present,
            "Amit",
        )];
        let csv = render_csv(&records);
        assert!(csv.starts_with("name,roll_no,date,time,status\r\n"));
        assert!(csv.contains("Amit,R1,2025-01-10,"));
        assert!(csv.trim_end().ends_with("Present"));
    }
}
