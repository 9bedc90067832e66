use lettre::Address;
use serde::{Deserialize, Serialize};

use crate::assessment::AssessmentInput;

/// Payload accepted by the send-results endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResultsRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Opt-in for future updates. Recorded in logs only.
    #[serde(default)]
    pub updates: bool,
    pub assessment_data: AssessmentInput,
}

impl SendResultsRequest {
    pub fn new(email: impl Into<String>, assessment_data: AssessmentInput) -> Self {
        Self {
            email: email.into(),
            name: None,
            updates: false,
            assessment_data,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check the recipient and normalize the display name.
    pub fn validate(self) -> Result<ValidatedRequest, ValidationError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingEmail);
        }

        let recipient: Address = email
            .parse()
            .map_err(|_| ValidationError::InvalidEmail(email.to_string()))?;

        let name = self
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(ValidatedRequest {
            recipient,
            name,
            updates: self.updates,
            assessment: self.assessment_data,
        })
    }
}

/// A request whose recipient parsed as a mailbox address.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub recipient: Address,
    pub name: Option<String>,
    pub updates: bool,
    pub assessment: AssessmentInput,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("email address is required")]
    MissingEmail,
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("invalid request payload: {0}")]
    Payload(String),
}
