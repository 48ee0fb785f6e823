pub mod attendance_record;
pub mod daily_code;
pub mod roster_entry;
pub mod user;

pub use attendance_record::Entity as AttendanceRecord;
pub use daily_code::Entity as DailyCode;
pub use roster_entry::Entity as RosterEntry;
pub use user::Entity as User;
