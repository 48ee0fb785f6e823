use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{Condition, DatabaseConnection, QueryFilter, QueryOrder, Set, SqlErr};
use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use crate::models::{daily_code, roster_entry, user};

/// One attendance record per (roll_no, class, subject, date).
///
/// The ledger is append-only: rows are created either by a student's
/// successful code submission (Present) or by the reconciliation sweep
/// (Absent, with an empty username) and are never mutated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub roll_no: String,
    pub date: Date,
    pub time: Time,
    pub status: Status,
    /// Empty for system-inserted Absent rows.
    pub username: String,
    pub class_name: String,
    pub subject: String,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
pub enum Status {
    #[sea_orm(string_value = "Present")]
    Present,

    #[sea_orm(string_value = "Absent")]
    Absent,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Failure modes of a code submission. Storage errors pass through as `Db`.
#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("no code generated today for this class and subject")]
    NoActiveCode,

    #[error("invalid or expired code")]
    InvalidCode,

    #[error("attendance already recorded")]
    AlreadyMarked,

    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Key comparison matches the code registry: class and subject are
/// case-insensitive, the date is exact.
fn key_condition(roll_no: &str, class_name: &str, subject: &str, date: Date) -> Condition {
    Condition::all()
        .add(Column::RollNo.eq(roll_no))
        .add(
            Expr::expr(Func::lower(Expr::col(Column::ClassName)))
                .eq(class_name.trim().to_lowercase()),
        )
        .add(Expr::expr(Func::lower(Expr::col(Column::Subject))).eq(subject.trim().to_lowercase()))
        .add(Column::Date.eq(date))
}

fn class_condition(class_name: &str, subject: &str) -> Condition {
    Condition::all()
        .add(
            Expr::expr(Func::lower(Expr::col(Column::ClassName)))
                .eq(class_name.trim().to_lowercase()),
        )
        .add(Expr::expr(Func::lower(Expr::col(Column::Subject))).eq(subject.trim().to_lowercase()))
}

impl Model {
    /// Marks the student Present for today's key, gated by the active code.
    ///
    /// The submitted code must exactly equal the active code for the
    /// student's (class, subject, date); the code value comparison is
    /// case-sensitive even though the key lookup is not. A student can hold
    /// at most one record per day: repeats fail with `AlreadyMarked`, and
    /// the unique index closes the race between concurrent submissions.
    pub async fn mark_present(
        db: &DatabaseConnection,
        student: &user::Model,
        date: Date,
        submitted_code: &str,
    ) -> Result<Self, AttendanceError> {
        let active =
            daily_code::Model::lookup_active(db, &student.class_name, &student.subject, date)
                .await?;

        let Some(active) = active else {
            return Err(AttendanceError::NoActiveCode);
        };
        if active.code != submitted_code.trim() {
            return Err(AttendanceError::InvalidCode);
        }

        if Self::find_for_key(db, &student.roll_no, &student.class_name, &student.subject, date)
            .await?
            .is_some()
        {
            return Err(AttendanceError::AlreadyMarked);
        }

        let row = ActiveModel {
            name: Set(student.name.clone()),
            roll_no: Set(student.roll_no.clone()),
            date: Set(date),
            time: Set(Utc::now().time()),
            status: Set(Status::Present),
            username: Set(student.username.clone()),
            class_name: Set(student.class_name.trim().to_owned()),
            subject: Set(student.subject.trim().to_owned()),
            ..Default::default()
        };

        match row.insert(db).await {
            Ok(model) => Ok(model),
            // Lost the race against another submission for the same key.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AttendanceError::AlreadyMarked)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Inserts an Absent row for the key unless any record already exists.
    ///
    /// Used exclusively by the reconciliation sweep; idempotent. Returns the
    /// inserted row, or `None` when the student already had a record.
    pub async fn mark_absent_if_missing(
        db: &DatabaseConnection,
        roll_no: &str,
        name: &str,
        class_name: &str,
        subject: &str,
        date: Date,
    ) -> Result<Option<Self>, DbErr> {
        if Self::find_for_key(db, roll_no, class_name, subject, date)
            .await?
            .is_some()
        {
            return Ok(None);
        }

        let row = ActiveModel {
            name: Set(name.to_owned()),
            roll_no: Set(roll_no.to_owned()),
            date: Set(date),
            time: Set(Utc::now().time()),
            status: Set(Status::Absent),
            username: Set(String::new()),
            class_name: Set(class_name.trim().to_owned()),
            subject: Set(subject.trim().to_owned()),
            ..Default::default()
        };

        match row.insert(db).await {
            Ok(model) => Ok(Some(model)),
            // Someone marked Present between our check and the insert; the
            // existing record wins.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Compares the roster against the ledger for (class, subject, date) and
    /// inserts Absent rows for everyone missing. Manually triggered by a
    /// teacher; running it twice adds nothing. Returns the number of rows
    /// inserted.
    pub async fn sweep_absent(
        db: &DatabaseConnection,
        class_name: &str,
        subject: &str,
        date: Date,
    ) -> Result<usize, DbErr> {
        let roster = roster_entry::Model::list(db, class_name, subject).await?;

        let mut inserted = 0;
        for entry in roster {
            if Self::mark_absent_if_missing(db, &entry.roll_no, &entry.name, class_name, subject, date)
                .await?
                .is_some()
            {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    pub async fn find_for_key(
        db: &DatabaseConnection,
        roll_no: &str,
        class_name: &str,
        subject: &str,
        date: Date,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(key_condition(roll_no, class_name, subject, date))
            .one(db)
            .await
    }

    /// All records for a class/subject pair, newest day first, then by roll
    /// number. This is the report projector's read surface.
    pub async fn query(
        db: &DatabaseConnection,
        class_name: &str,
        subject: &str,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(class_condition(class_name, subject))
            .order_by_desc(Column::Date)
            .order_by_asc(Column::RollNo)
            .all(db)
            .await
    }

    /// All records tied to a username, for the percentage analytics. Sweep
    /// rows carry an empty username and so never show up here.
    pub async fn query_by_student(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .order_by_asc(Column::Date)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{self, Role};
    use crate::test_utils::setup_test_db;
    use chrono::NaiveDate;

    fn day() -> Date {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    async fn student(db: &DatabaseConnection, username: &str, roll_no: &str, name: &str) -> user::Model {
        let u = user::Model::create(db, username, &format!("{username}@example.com"), "pw123456")
            .await
            .unwrap();
        user::Model::update_profile(db, u.id, name, Role::Student, "10A", "Math", roll_no)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn mark_present_requires_an_active_code() {
        let db = setup_test_db().await;
        let amit = student(&db, "amit01", "R1", "Amit").await;

        let err = Model::mark_present(&db, &amit, day(), "123456").await.unwrap_err();
        assert!(matches!(err, AttendanceError::NoActiveCode));
    }

    #[tokio::test]
    async fn mark_present_rejects_a_wrong_code() {
        let db = setup_test_db().await;
        let amit = student(&db, "amit01", "R1", "Amit").await;

        let code = daily_code::Model::generate(&db, "10A", "Math", day(), "trao")
            .await
            .unwrap();
        let wrong = if code.code == "111111" { "222222" } else { "111111" };

        let err = Model::mark_present(&db, &amit, day(), wrong).await.unwrap_err();
        assert!(matches!(err, AttendanceError::InvalidCode));
        assert!(Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_present_appends_exactly_one_record() {
        let db = setup_test_db().await;
        let amit = student(&db, "amit01", "R1", "Amit").await;

        let code = daily_code::Model::generate(&db, "10A", "Math", day(), "trao")
            .await
            .unwrap();

        let rec = Model::mark_present(&db, &amit, day(), &code.code).await.unwrap();
        assert_eq!(rec.status, Status::Present);
        assert_eq!(rec.username, "amit01");
        assert_eq!(rec.roll_no, "R1");

        // A second submission with the still-valid code is rejected.
        let err = Model::mark_present(&db, &amit, day(), &code.code).await.unwrap_err();
        assert!(matches!(err, AttendanceError::AlreadyMarked));
        assert_eq!(Entity::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn revoked_code_no_longer_marks() {
        let db = setup_test_db().await;
        let amit = student(&db, "amit01", "R1", "Amit").await;

        let code = daily_code::Model::generate(&db, "10A", "Math", day(), "trao")
            .await
            .unwrap();
        daily_code::Model::revoke(&db, "10A", "Math", day()).await.unwrap();

        let err = Model::mark_present(&db, &amit, day(), &code.code).await.unwrap_err();
        assert!(matches!(err, AttendanceError::NoActiveCode));
    }

    #[tokio::test]
    async fn mark_absent_if_missing_is_idempotent() {
        let db = setup_test_db().await;

        let first = Model::mark_absent_if_missing(&db, "R2", "Bala", "10A", "Math", day())
            .await
            .unwrap();
        assert!(first.is_some());
        let again = Model::mark_absent_if_missing(&db, "R2", "Bala", "10A", "Math", day())
            .await
            .unwrap();
        assert!(again.is_none());

        let all = Entity::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, Status::Absent);
        assert_eq!(all[0].username, "");
    }

    #[tokio::test]
    async fn query_orders_by_date_desc_then_roll_no() {
        let db = setup_test_db().await;

        let d1 = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let d2 = day();
        Model::mark_absent_if_missing(&db, "R2", "Bala", "10A", "Math", d1).await.unwrap();
        Model::mark_absent_if_missing(&db, "R1", "Amit", "10A", "Math", d2).await.unwrap();
        Model::mark_absent_if_missing(&db, "R2", "Bala", "10A", "Math", d2).await.unwrap();

        let rows = Model::query(&db, "10A", "Math").await.unwrap();
        let keys: Vec<(Date, String)> = rows.into_iter().map(|r| (r.date, r.roll_no)).collect();
        assert_eq!(
            keys,
            vec![
                (d2, "R1".to_string()),
                (d2, "R2".to_string()),
                (d1, "R2".to_string()),
            ]
        );
    }
}
