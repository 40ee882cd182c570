//! User accounts and their profile data

use crate::EntityId;
use serde::{Deserialize, Serialize};

/// Gender shown on a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Default when the user does not say otherwise
    #[default]
    Male,
    /// Female
    Female,
}

impl Gender {
    /// Storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parse from storage name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// One entry of a user's work history (both fields reference topics)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employment {
    /// Company topic
    pub company: Option<EntityId>,
    /// Job title topic
    pub job: Option<EntityId>,
}

/// One entry of a user's education history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    /// School topic
    pub school: Option<EntityId>,
    /// Major topic
    pub major: Option<EntityId>,
    /// Diploma level, 1 through 5
    pub diploma: Option<u8>,
    /// Year of entrance
    pub entrance_year: Option<u16>,
    /// Year of graduation
    pub graduation_year: Option<u16>,
}

impl Education {
    /// Check the diploma level range
    pub fn validate(&self) -> Result<(), String> {
        match self.diploma {
            Some(level) if !(1..=5).contains(&level) => {
                Err(format!("diploma must be between 1 and 5, got {}", level))
            }
            _ => Ok(()),
        }
    }
}

/// A registered user
///
/// Profile fields below `headline` are hidden by default and only
/// populated when explicitly selected (see [`crate::FieldSelector`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier
    pub id: EntityId,

    /// Unique display name
    pub name: String,

    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Gender
    #[serde(default)]
    pub gender: Gender,

    /// One-line introduction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,

    /// Places of residence (topic references)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<EntityId>>,

    /// Industry (topic reference)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business: Option<EntityId>,

    /// Work history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employments: Option<Vec<Employment>>,

    /// Education history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educations: Option<Vec<Education>>,
}

impl User {
    /// Drop every hidden profile field
    pub fn summary(mut self) -> Self {
        self.locations = None;
        self.business = None;
        self.employments = None;
        self.educations = None;
        self
    }
}

/// Salted password digest; the plain password never reaches the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    /// Self-describing hash string (algorithm, parameters, salt and output)
    pub hash: String,
    /// Per-user salt, kept alongside for inspection
    pub salt: String,
}

/// Stored login data for a user
#[derive(Debug, Clone)]
pub struct Credentials {
    /// User id
    pub user_id: EntityId,
    /// User name
    pub name: String,
    /// Password digest
    pub digest: PasswordDigest,
}

/// Data required to register a user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique display name
    pub name: String,
    /// Password digest
    pub password: PasswordDigest,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Gender
    pub gender: Gender,
    /// One-line introduction
    pub headline: Option<String>,
}

/// Partial update of a user; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New name (must stay unique)
    pub name: Option<String>,
    /// New password digest
    pub password: Option<PasswordDigest>,
    /// New avatar URL
    pub avatar_url: Option<String>,
    /// New gender
    pub gender: Option<Gender>,
    /// New headline
    pub headline: Option<String>,
    /// New locations
    pub locations: Option<Vec<EntityId>>,
    /// New business
    pub business: Option<EntityId>,
    /// New work history
    pub employments: Option<Vec<Employment>>,
    /// New education history
    pub educations: Option<Vec<Education>>,
}

impl UserPatch {
    /// Reject shapes the store must never see
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("name cannot be empty".to_string());
            }
        }
        if let Some(educations) = &self.educations {
            educations.iter().try_for_each(Education::validate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: EntityId::from_value(7),
            name: "alice".to_string(),
            avatar_url: None,
            gender: Gender::Female,
            headline: Some("hi".to_string()),
            locations: Some(vec![EntityId::from_value(1)]),
            business: Some(EntityId::from_value(2)),
            employments: Some(vec![]),
            educations: None,
        }
    }

    #[test]
    fn test_hidden_fields_are_not_serialized() {
        let json = serde_json::to_value(sample_user().summary()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["name"], "alice");
        assert_eq!(obj["gender"], "female");
        assert!(!obj.contains_key("locations"));
        assert!(!obj.contains_key("business"));
        assert!(!obj.contains_key("avatarUrl"));
    }

    #[test]
    fn test_gender_defaults_to_male() {
        assert_eq!(Gender::default(), Gender::Male);
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("other"), None);
    }

    #[test]
    fn test_patch_validation() {
        let patch = UserPatch {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = UserPatch {
            educations: Some(vec![Education {
                school: None,
                major: None,
                diploma: Some(6),
                entrance_year: None,
                graduation_year: None,
            }]),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        assert!(UserPatch::default().validate().is_ok());
    }
}
