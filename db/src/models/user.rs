use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents an account in the `users` table.
///
/// Accounts are created at signup with blank profile fields and no role;
/// the profile-setup mutation fills in name, role and class details.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name.
    pub username: String,
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name, empty until the profile is completed.
    pub name: String,
    /// `None` until the profile is completed.
    pub role: Option<Role>,
    pub class_name: String,
    pub subject: String,
    /// Only meaningful for students.
    pub roll_no: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account role, stored as a string column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "teacher")]
    Teacher,

    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a new account with a hashed password and blank profile fields.
    ///
    /// A duplicate username surfaces as a unique-constraint `DbErr` from the
    /// insert; callers translate that into a user-visible conflict.
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))?
            .to_string();

        let now = Utc::now();
        let user = ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(password_hash),
            name: Set(String::new()),
            role: Set(None),
            class_name: Set(String::new()),
            subject: Set(String::new()),
            roll_no: Set(String::new()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        user.insert(db).await
    }

    /// Looks up an account by username and verifies the password.
    ///
    /// Returns `Ok(None)` both for an unknown username and for a wrong
    /// password so callers cannot distinguish the two.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<Option<Self>, DbErr> {
        let Some(user) = Self::get_by_username(db, username).await? else {
            return Ok(None);
        };

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| DbErr::Custom(format!("Stored password hash is invalid: {e}")))?;

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub async fn get_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Completes (or edits) the account profile set up after first login.
    pub async fn update_profile(
        db: &DatabaseConnection,
        id: i64,
        name: &str,
        role: Role,
        class_name: &str,
        subject: &str,
        roll_no: &str,
    ) -> Result<Self, DbErr> {
        let Some(user) = Self::get_by_id(db, id).await? else {
            return Err(DbErr::RecordNotFound(format!("User ID {id} not found")));
        };

        let mut active: ActiveModel = user.into();
        active.name = Set(name.trim().to_owned());
        active.role = Set(Some(role));
        active.class_name = Set(class_name.trim().to_owned());
        active.subject = Set(subject.trim().to_owned());
        active.roll_no = Set(roll_no.trim().to_owned());
        active.updated_at = Set(Utc::now());

        active.update(db).await
    }

    /// A profile is complete once name, role and class are filled in; the
    /// original signup leaves all three blank.
    pub fn profile_complete(&self) -> bool {
        !self.name.is_empty() && self.role.is_some() && !self.class_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_and_verify_credentials() {
        let db = setup_test_db().await;

        let user = Model::create(&db, "amit01", "amit@example.com", "hunter22")
            .await
            .expect("create user");
        assert_eq!(user.username, "amit01");
        assert!(user.role.is_none());
        assert!(!user.profile_complete());
        assert_ne!(user.password_hash, "hunter22");

        let ok = Model::verify_credentials(&db, "amit01", "hunter22")
            .await
            .unwrap();
        assert_eq!(ok.map(|u| u.id), Some(user.id));

        let wrong = Model::verify_credentials(&db, "amit01", "wrong")
            .await
            .unwrap();
        assert!(wrong.is_none());

        let unknown = Model::verify_credentials(&db, "nobody", "hunter22")
            .await
            .unwrap();
        assert!(unknown.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let db = setup_test_db().await;

        Model::create(&db, "bala02", "bala@example.com", "pw123456")
            .await
            .unwrap();
        let dup = Model::create(&db, "bala02", "other@example.com", "pw123456").await;
        assert!(matches!(
            dup.unwrap_err().sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn profile_setup_completes_account() {
        let db = setup_test_db().await;

        let user = Model::create(&db, "t01", "t@example.com", "pw123456")
            .await
            .unwrap();
        let updated = Model::update_profile(&db, user.id, "Ms. Rao", Role::Teacher, "10A", "Math", "")
            .await
            .unwrap();

        assert!(updated.profile_complete());
        assert_eq!(updated.role, Some(Role::Teacher));
        assert_eq!(updated.class_name, "10A");
        assert_eq!(updated.subject, "Math");
    }
}
