use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

/// Panel-assigned numeric user id.
pub type UserId = u64;

/// A user as returned by the panel, wrapped in its object envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub object: String,
    pub attributes: UserAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttributes {
    pub id: UserId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub language: String,
    #[serde(alias = "root_admin")]
    pub is_root_admin: bool,
    #[serde(alias = "2fa")]
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn id(&self) -> UserId {
        self.attributes.id
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.attributes.first_name, self.attributes.last_name)
    }
}

/// `GET /users` response: `{"data": [User, ...]}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserList {
    pub data: Vec<User>,
}

/// `POST /users` response. The panel echoes the record; some versions also
/// put the id at the top level.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreatedUser {
    #[serde(default)]
    id: Option<UserId>,
    #[serde(default)]
    attributes: Option<CreatedAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
struct CreatedAttributes {
    id: UserId,
}

impl CreatedUser {
    pub fn id(&self) -> Option<UserId> {
        self.id.or_else(|| self.attributes.as_ref().map(|a| a.id))
    }
}

/// Request body for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub root_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl NewUser {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn root_admin(mut self, root_admin: bool) -> Self {
        self.root_admin = root_admin;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Check that every required field is present and non-blank.
    /// Reports the first missing field in declaration order.
    pub fn validate(&self) -> Result<(), ApiError> {
        let required = [
            ("email", &self.email),
            ("username", &self.username),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ApiError::validation(format!("{} is required", field)));
            }
        }
        Ok(())
    }
}

/// Request body for a partial user update. Unset fields are left unchanged
/// by the panel and are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
