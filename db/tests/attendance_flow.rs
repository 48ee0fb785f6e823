//! End-to-end flow over the core stores: generate a code, one student
//! submits, the sweep fills in the rest, and the report reads it back.

use chrono::NaiveDate;
use db::models::{
    attendance_record::{self, Status},
    daily_code,
    roster_entry::{self, RosterRow},
    user::{self, Role},
};
use db::test_utils::setup_test_db;

#[tokio::test]
async fn present_submission_then_sweep_yields_one_row_per_student() {
    let db = setup_test_db().await;
    let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

    // Roster: Amit (R1) and Bala (R2) in 10A / Math.
    roster_entry::Model::bulk_insert(
        &db,
        "10A",
        "Math",
        &[
            RosterRow {
                roll_no: "R1".into(),
                name: "Amit".into(),
            },
            RosterRow {
                roll_no: "R2".into(),
                name: "Bala".into(),
            },
        ],
    )
    .await
    .unwrap();

    // Amit has an account; Bala never signed up.
    let amit = user::Model::create(&db, "amit01", "amit@example.com", "pw123456")
        .await
        .unwrap();
    let amit = user::Model::update_profile(&db, amit.id, "Amit", Role::Student, "10A", "Math", "R1")
        .await
        .unwrap();

    let code = daily_code::Model::generate(&db, "10A", "Math", date, "trao")
        .await
        .unwrap();

    // Amit submits the valid code.
    let rec = attendance_record::Model::mark_present(&db, &amit, date, &code.code)
        .await
        .unwrap();
    assert_eq!(rec.status, Status::Present);

    // Sweep marks exactly the missing student Absent.
    let inserted = attendance_record::Model::sweep_absent(&db, "10A", "Math", date)
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    // Running the sweep again adds nothing.
    let inserted_again = attendance_record::Model::sweep_absent(&db, "10A", "Math", date)
        .await
        .unwrap();
    assert_eq!(inserted_again, 0);

    // Report: exactly two rows for the day, Amit Present and Bala Absent.
    let rows = attendance_record::Model::query(&db, "10A", "Math").await.unwrap();
    assert_eq!(rows.len(), 2);

    let amit_row = rows.iter().find(|r| r.roll_no == "R1").unwrap();
    assert_eq!(amit_row.status, Status::Present);
    assert_eq!(amit_row.name, "Amit");
    assert_eq!(amit_row.username, "amit01");

    let bala_row = rows.iter().find(|r| r.roll_no == "R2").unwrap();
    assert_eq!(bala_row.status, Status::Absent);
    assert_eq!(bala_row.name, "Bala");
    assert_eq!(bala_row.username, "");
}

#[tokio::test]
async fn sweep_before_submission_locks_the_student_out() {
    let db = setup_test_db().await;
    let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

    roster_entry::Model::bulk_insert(
        &db,
        "10A",
        "Math",
        &[RosterRow {
            roll_no: "R1".into(),
            name: "Amit".into(),
        }],
    )
    .await
    .unwrap();

    let amit = user::Model::create(&db, "amit01", "amit@example.com", "pw123456")
        .await
        .unwrap();
    let amit = user::Model::update_profile(&db, amit.id, "Amit", Role::Student, "10A", "Math", "R1")
        .await
        .unwrap();

    let code = daily_code::Model::generate(&db, "10A", "Math", date, "trao")
        .await
        .unwrap();

    // Teacher runs the sweep early; nothing prevents it.
    let inserted = attendance_record::Model::sweep_absent(&db, "10A", "Math", date)
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    // A late but valid submission now fails: the day's record exists.
    let err = attendance_record::Model::mark_present(&db, &amit, date, &code.code)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        attendance_record::AttendanceError::AlreadyMarked
    ));

    let rows = attendance_record::Model::query(&db, "10A", "Math").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, Status::Absent);
}

#[tokio::test]
async fn duplicate_roster_rows_do_not_duplicate_absences() {
    let db = setup_test_db().await;
    let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

    // The same sheet uploaded twice.
    let sheet = [RosterRow {
        roll_no: "R1".into(),
        name: "Amit".into(),
    }];
    roster_entry::Model::bulk_insert(&db, "10A", "Math", &sheet).await.unwrap();
    roster_entry::Model::bulk_insert(&db, "10A", "Math", &sheet).await.unwrap();

    let inserted = attendance_record::Model::sweep_absent(&db, "10A", "Math", date)
        .await
        .unwrap();
    assert_eq!(inserted, 1);
}
