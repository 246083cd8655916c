use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct User {
    #[serde(skip)]
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub user_type: String,
    pub is_admin: bool,
    /// `YYYY-MM-DD`
    #[serde(rename = "joined")]
    pub joined_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
}
