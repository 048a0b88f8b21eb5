use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored contact form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Data structure for creating a new submission.
///
/// Holds validated values as submitted. Optional fields are `None` when left blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

impl NewContact {
    /// Create a new `NewContact`, normalizing blank optional fields to `None`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        company: Option<String>,
        phone: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            company: non_blank(company),
            phone: non_blank(phone),
            message: message.into(),
        }
    }

    pub(crate) fn into_submission(self, id: i64, created_at: DateTime<Utc>) -> ContactSubmission {
        ContactSubmission {
            id,
            name: self.name,
            email: self.email,
            company: self.company,
            phone: self.phone,
            message: self.message,
            created_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_optionals_become_none() {
        let new = NewContact::new(
            "Ada",
            "ada@example.com",
            Some("   ".to_string()),
            Some(" +44 1 ".to_string()),
            "Hello there, world",
        );
        assert_eq!(new.company, None);
        assert_eq!(new.phone.as_deref(), Some(" +44 1 "));
    }

    #[test]
    fn test_submission_serializes_camel_case() {
        let sub = NewContact::new("Ada", "ada@example.com", None, None, "Hello there, world")
            .into_submission(1, Utc::now());
        let json = serde_json::to_value(&sub).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["id"], 1);
    }
}
