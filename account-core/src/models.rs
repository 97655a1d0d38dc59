//! User record shapes and projections.
//!
//! [`User`] is the persisted record exactly as the store accepts and returns
//! it. [`PublicUser`] is the reduced projection handed to callers outside the
//! core; it never carries the password hash or the security question/answer.
//! Wire names follow the persisted document spelling (`zipCode`,
//! `fieldOfActivity`, `eventbasedRole`, ...).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Platform-wide role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Parse a stored role value. Unknown values fall back to the default
    /// role rather than failing the whole record.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's role within one external event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventRole {
    /// Identifier of the event this role applies to.
    pub event: i64,
    pub role: String,
}

/// The persisted user record — the bit-exact shape the store accepts and
/// returns. `password` always holds a hash once the record has been stored;
/// `security_answer` is stored lowercased and trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque immutable identifier, assigned when the record is created.
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<i64>,
    pub field_of_activity: String,
    pub research_interest: Vec<String>,
    #[serde(default)]
    pub role: Role,
    pub security_question: String,
    pub security_answer: String,
    #[serde(default)]
    pub eventbased_role: Vec<EventRole>,
}

impl User {
    /// Reduce to the public projection, stripping sensitive fields.
    pub fn reduce(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            gender: self.gender.clone(),
            role: self.role,
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            organisation: self.organisation.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            zip_code: self.zip_code,
            field_of_activity: self.field_of_activity.clone(),
            research_interest: self.research_interest.clone(),
            eventbased_role: self.eventbased_role.clone(),
        }
    }
}

/// Reduced user projection: everything a caller outside the core may see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<i64>,
    pub field_of_activity: String,
    pub research_interest: Vec<String>,
    pub eventbased_role: Vec<EventRole>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        user.reduce()
    }
}

/// Fields accepted when registering a new user. The password is plaintext
/// here and is hashed exactly once, when the record is persisted.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub organisation: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip_code: Option<i64>,
    pub field_of_activity: String,
    #[serde(default)]
    pub research_interest: Vec<String>,
    pub security_question: String,
    pub security_answer: String,
    #[serde(default)]
    pub eventbased_role: Vec<EventRole>,
}

/// Partial profile update. Fields left as `None` are not touched.
///
/// There is deliberately no password field: password changes go through
/// their own operation so a stored hash can never be overwritten with an
/// unhashed value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub organisation: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub zip_code: Option<i64>,
    #[serde(default)]
    pub field_of_activity: Option<String>,
    #[serde(default)]
    pub research_interest: Option<Vec<String>>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub security_question: Option<String>,
    #[serde(default)]
    pub security_answer: Option<String>,
    #[serde(default)]
    pub eventbased_role: Option<Vec<EventRole>>,
}

impl UserUpdate {
    /// True when no field is set, i.e. the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.gender.is_none()
            && self.firstname.is_none()
            && self.lastname.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.organisation.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.zip_code.is_none()
            && self.field_of_activity.is_none()
            && self.research_interest.is_none()
            && self.role.is_none()
            && self.security_question.is_none()
            && self.security_answer.is_none()
            && self.eventbased_role.is_none()
    }

    /// Apply this update on top of an existing record.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(v) = &self.title {
            user.title = Some(v.clone());
        }
        if let Some(v) = &self.gender {
            user.gender = Some(v.clone());
        }
        if let Some(v) = &self.firstname {
            user.firstname = v.clone();
        }
        if let Some(v) = &self.lastname {
            user.lastname = v.clone();
        }
        if let Some(v) = &self.username {
            user.username = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.organisation {
            user.organisation = Some(v.clone());
        }
        if let Some(v) = &self.address {
            user.address = Some(v.clone());
        }
        if let Some(v) = &self.city {
            user.city = Some(v.clone());
        }
        if let Some(v) = &self.country {
            user.country = Some(v.clone());
        }
        if let Some(v) = self.zip_code {
            user.zip_code = Some(v);
        }
        if let Some(v) = &self.field_of_activity {
            user.field_of_activity = v.clone();
        }
        if let Some(v) = &self.research_interest {
            user.research_interest = v.clone();
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = &self.security_question {
            user.security_question = v.clone();
        }
        if let Some(v) = &self.security_answer {
            user.security_answer = v.clone();
        }
        if let Some(v) = &self.eventbased_role {
            user.eventbased_role = v.clone();
        }
    }
}

/// Identifier and question returned by the password-reset lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurityQuestionInfo {
    pub id: Uuid,
    pub security_question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            title: Some("Dr.".to_string()),
            gender: Some("female".to_string()),
            firstname: "Alice".to_string(),
            lastname: "Archer".to_string(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            organisation: Some("LMU".to_string()),
            address: None,
            city: Some("Munich".to_string()),
            country: Some("Germany".to_string()),
            zip_code: Some(80333),
            field_of_activity: "HCI".to_string(),
            research_interest: vec!["VR".to_string(), "AR".to_string()],
            role: Role::User,
            security_question: "What primary school did you attend?".to_string(),
            security_answer: "park lane".to_string(),
            eventbased_role: vec![EventRole {
                event: 1,
                role: "presenter".to_string(),
            }],
        }
    }

    #[test]
    fn reduction_strips_sensitive_fields() {
        let user = sample_user();
        let value = serde_json::to_value(user.reduce()).unwrap();
        let keys = value.as_object().unwrap();

        assert!(!keys.contains_key("password"));
        assert!(!keys.contains_key("securityQuestion"));
        assert!(!keys.contains_key("securityAnswer"));
        assert!(!keys.contains_key("title"));
        assert_eq!(value["username"], "alice");
        assert_eq!(value["eventbasedRole"][0]["event"], 1);
    }

    #[test]
    fn reduction_is_a_pure_projection() {
        let user = sample_user();
        // Reducing the same record twice yields the same projection.
        assert_eq!(user.reduce(), user.reduce());
        assert_eq!(PublicUser::from(&user), user.reduce());
    }

    #[test]
    fn persisted_shape_uses_document_field_names() {
        let value = serde_json::to_value(sample_user()).unwrap();
        let keys = value.as_object().unwrap();

        assert!(keys.contains_key("zipCode"));
        assert!(keys.contains_key("fieldOfActivity"));
        assert!(keys.contains_key("researchInterest"));
        assert!(keys.contains_key("securityAnswer"));
        assert!(keys.contains_key("eventbasedRole"));
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UserUpdate::default().is_empty());
        let update = UserUpdate {
            username: Some("bob".to_string()),
            ..UserUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn update_overwrites_only_present_fields() {
        let mut user = sample_user();
        let update = UserUpdate {
            city: Some("Berlin".to_string()),
            zip_code: Some(10117),
            ..UserUpdate::default()
        };
        update.apply_to(&mut user);

        assert_eq!(user.city.as_deref(), Some("Berlin"));
        assert_eq!(user.zip_code, Some(10117));
        assert_eq!(user.username, "alice");
        assert_eq!(user.firstname, "Alice");
    }

    #[test]
    fn unknown_stored_role_falls_back_to_user() {
        assert_eq!(Role::from_stored("admin"), Role::Admin);
        assert_eq!(Role::from_stored("user"), Role::User);
        assert_eq!(Role::from_stored("superuser"), Role::User);
    }
}
