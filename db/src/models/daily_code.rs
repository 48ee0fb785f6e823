use chrono::Utc;
use rand::Rng;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{Condition, DatabaseConnection, QueryFilter, Set};

/// A code row is only ever `active`; stale codes are deleted, never flagged.
pub const ACTIVE_STATUS: &str = "active";

/// One daily access code for a (class, subject, date) key.
///
/// Rows are created on generate and deleted on revoke or regeneration;
/// they are never updated in place, so at most one active row exists per key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "daily_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_name: String,
    pub subject: String,
    /// 6-digit numeric string, 100000..=999999.
    pub code: String,
    pub status: String,
    /// Username of the teacher who generated the code.
    pub generated_by: String,
    pub date: Date,
    pub time: Time,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Class and subject act as case-insensitive keys for every lookup, even
/// though they are stored as typed. Both sides are lowercased in SQL.
fn key_condition(class_name: &str, subject: &str, date: Date) -> Condition {
    Condition::all()
        .add(
            Expr::expr(Func::lower(Expr::col(Column::ClassName)))
                .eq(class_name.trim().to_lowercase()),
        )
        .add(Expr::expr(Func::lower(Expr::col(Column::Subject))).eq(subject.trim().to_lowercase()))
        .add(Column::Date.eq(date))
}

impl Model {
    /// Generates a fresh code for (class, subject, date), invalidating any
    /// previous one. Existing rows for the key are deleted first regardless
    /// of status, so only the latest code is ever valid.
    pub async fn generate(
        db: &DatabaseConnection,
        class_name: &str,
        subject: &str,
        date: Date,
        generated_by: &str,
    ) -> Result<Self, DbErr> {
        let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();

        Entity::delete_many()
            .filter(key_condition(class_name, subject, date))
            .exec(db)
            .await?;

        let row = ActiveModel {
            class_name: Set(class_name.trim().to_owned()),
            subject: Set(subject.trim().to_owned()),
            code: Set(code),
            status: Set(ACTIVE_STATUS.to_owned()),
            generated_by: Set(generated_by.to_owned()),
            date: Set(date),
            time: Set(Utc::now().time()),
            ..Default::default()
        };

        row.insert(db).await
    }

    /// Deletes all code rows for the key. Until the next generate, no code is
    /// valid and submissions fail with `NoActiveCode`.
    pub async fn revoke(
        db: &DatabaseConnection,
        class_name: &str,
        subject: &str,
        date: Date,
    ) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(key_condition(class_name, subject, date))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    /// Returns the single active code row for the key, if any.
    pub async fn lookup_active(
        db: &DatabaseConnection,
        class_name: &str,
        subject: &str,
        date: Date,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(key_condition(class_name, subject, date))
            .filter(Column::Status.eq(ACTIVE_STATUS))
            .one(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;
    use chrono::NaiveDate;

    fn day() -> Date {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    #[tokio::test]
    async fn generate_then_lookup_returns_code() {
        let db = setup_test_db().await;

        let generated = Model::generate(&db, "10A", "Math", day(), "trao").await.unwrap();
        assert_eq!(generated.code.len(), 6);
        let value: u32 = generated.code.parse().unwrap();
        assert!((100_000..=999_999).contains(&value));

        let active = Model::lookup_active(&db, "10A", "Math", day())
            .await
            .unwrap()
            .expect("active code");
        assert_eq!(active.code, generated.code);
        assert_eq!(active.generated_by, "trao");
    }

    #[tokio::test]
    async fn regeneration_leaves_exactly_one_code() {
        let db = setup_test_db().await;

        let first = Model::generate(&db, "10A", "Math", day(), "trao").await.unwrap();
        let second = Model::generate(&db, "10A", "Math", day(), "trao").await.unwrap();

        let all = Entity::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].code, second.code);
        // The first code is no longer valid even if it happens to differ.
        if first.code != second.code {
            let active = Model::lookup_active(&db, "10A", "Math", day())
                .await
                .unwrap()
                .unwrap();
            assert_ne!(active.code, first.code);
        }
    }

    #[tokio::test]
    async fn revoke_removes_active_code() {
        let db = setup_test_db().await;

        Model::generate(&db, "10A", "Math", day(), "trao").await.unwrap();
        let removed = Model::revoke(&db, "10A", "Math", day()).await.unwrap();
        assert_eq!(removed, 1);

        let active = Model::lookup_active(&db, "10A", "Math", day()).await.unwrap();
        assert!(active.is_none());
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive_on_class_and_subject() {
        let db = setup_test_db().await;

        let generated = Model::generate(&db, "10A", "Math", day(), "trao").await.unwrap();
        let active = Model::lookup_active(&db, "10a", "math", day())
            .await
            .unwrap()
            .expect("case-insensitive match");
        assert_eq!(active.code, generated.code);
        // Stored values keep the typed case.
        assert_eq!(active.class_name, "10A");
        assert_eq!(active.subject, "Math");
    }

    #[tokio::test]
    async fn keys_are_scoped_per_class_subject_and_date() {
        let db = setup_test_db().await;

        let math = Model::generate(&db, "10A", "Math", day(), "trao").await.unwrap();
        let physics = Model::generate(&db, "10A", "Physics", day(), "mjoshi").await.unwrap();

        let other_day = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
        assert!(Model::lookup_active(&db, "10A", "Math", other_day)
            .await
            .unwrap()
            .is_none());

        let found_math = Model::lookup_active(&db, "10A", "Math", day()).await.unwrap().unwrap();
        let found_physics = Model::lookup_active(&db, "10A", "Physics", day())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found_math.code, math.code);
        assert_eq!(found_physics.code, physics.code);
    }
}
