use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{Condition, DatabaseConnection, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

/// One enrolled student in a class/subject roster.
///
/// Populated by bulk upload from an externally parsed spreadsheet.
/// Append-only: re-uploading a sheet appends rows rather than replacing
/// them; the sweep existence check is keyed by roll_no, so duplicate
/// roster rows cannot produce duplicate Absent records.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "roster_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_name: String,
    pub subject: String,
    pub roll_no: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An uploaded roster row, already parsed out of the spreadsheet's
/// "Roll No" / "Name" columns by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRow {
    pub roll_no: String,
    pub name: String,
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
    /// Appends the given rows to the roster for (class, subject).
    pub async fn bulk_insert(
        db: &DatabaseConnection,
        class_name: &str,
        subject: &str,
        rows: &[RosterRow],
    ) -> Result<u64, DbErr> {
        if rows.is_empty() {
            return Ok(0);
        }

        let models = rows.iter().map(|row| ActiveModel {
            class_name: Set(class_name.trim().to_owned()),
            subject: Set(subject.trim().to_owned()),
            roll_no: Set(row.roll_no.trim().to_owned()),
            name: Set(row.name.trim().to_owned()),
            ..Default::default()
        });

        Entity::insert_many(models).exec(db).await?;
        Ok(rows.len() as u64)
    }

    /// Lists the roster for (class, subject), ordered by roll number.
    pub async fn list(
        db: &DatabaseConnection,
        class_name: &str,
        subject: &str,
    ) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(class_condition(class_name, subject))
            .order_by_asc(Column::RollNo)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    fn rows() -> Vec<RosterRow> {
        vec![
            RosterRow {
                roll_no: "R1".into(),
                name: "Amit".into(),
            },
            RosterRow {
                roll_no: "R2".into(),
                name: "Bala".into(),
            },
        ]
    }

    #[tokio::test]
    async fn bulk_insert_and_list() {
        let db = setup_test_db().await;

        let inserted = Model::bulk_insert(&db, "10A", "Math", &rows()).await.unwrap();
        assert_eq!(inserted, 2);

        let listed = Model::list(&db, "10a", "math").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].roll_no, "R1");
        assert_eq!(listed[1].name, "Bala");

        // A different subject sees nothing.
        assert!(Model::list(&db, "10A", "Physics").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reupload_appends_rows() {
        let db = setup_test_db().await;

        Model::bulk_insert(&db, "10A", "Math", &rows()).await.unwrap();
        Model::bulk_insert(&db, "10A", "Math", &rows()).await.unwrap();

        // No de-duplication on re-upload.
        let listed = Model::list(&db, "10A", "Math").await.unwrap();
        assert_eq!(listed.len(), 4);
    }

    #[tokio::test]
    async fn empty_upload_is_a_noop() {
        let db = setup_test_db().await;
        let inserted = Model::bulk_insert(&db, "10A", "Math", &[]).await.unwrap();
        assert_eq!(inserted, 0);
    }
}
