pub mod m202608200001_create_users;
pub mod m202608200002_create_daily_codes;
pub mod m202608200003_create_attendance_records;
pub mod m202608200004_create_roster_entries;
