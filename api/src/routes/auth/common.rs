use db::models::user::{Model as Account, Role};
use serde::Serialize;

/// Account payload returned by register, login, profile setup and `/me`.
///
/// `token` is only populated by register and login.
#[derive(Debug, Serialize, Default)]
pub struct AccountResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: Option<Role>,
    pub class_name: String,
    pub subject: String,
    pub roll_no: String,
    pub profile_complete: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expires_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        let profile_complete = account.profile_complete();
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            name: account.name,
            role: account.role,
            class_name: account.class_name,
            subject: account.subject,
            roll_no: account.roll_no,
            profile_complete,
            token: String::new(),
            expires_at: String::new(),
        }
    }
}

impl AccountResponse {
    pub fn with_token(mut self, token: String, expires_at: String) -> Self {
        self.token = token;
        self.expires_at = expires_at;
        self
    }
}
