//! Types for user management

use serde::{Deserialize, Serialize};

/// An app user as listed by the admin API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user ID, immutable
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub role: Option<String>,

    /// Independent of role and membership
    #[serde(default)]
    pub blocked: bool,

    #[serde(default)]
    pub profile_pic: Option<String>,

    #[serde(default)]
    pub mobile_number: Option<String>,

    /// Older payloads spell it `dateofBirth`
    #[serde(default, alias = "dateofBirth")]
    pub date_of_birth: Option<String>,

    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub height: Option<String>,

    #[serde(default)]
    pub weight: Option<String>,

    /// Sign-in provider
    #[serde(default)]
    pub provider: Option<String>,

    #[serde(default)]
    pub premium_membership: bool,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `PUT /admin/user/:id`: the editable profile fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: String,
    pub profile_pic: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub provider: Option<String>,
}

impl From<&User> for UserUpdate {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            profile_pic: user.profile_pic.clone(),
            date_of_birth: user.date_of_birth.clone(),
            gender: user.gender.clone(),
            height: user.height.clone(),
            weight: user.weight.clone(),
            provider: user.provider.clone(),
        }
    }
}

/// Body of `PUT /admin/user/:id/block`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BlockRequest {
    pub blocked: bool,
}

/// An in-app purchase, read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub purchase_token: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
}
