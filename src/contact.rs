use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::gateway::{CmsClient, Endpoint};

pub const SUCCESS_MESSAGE: &str =
    "Thank you for your message. We will get back to you within 2 working days.";
pub const FAILURE_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again or call us directly.";

/// Subject values accepted by the contact endpoint, with their labels
pub const SUBJECTS: &[(&str, &str)] = &[
    ("general", "General Enquiry"),
    ("planning", "Planning Application"),
    ("meetings", "Council Meetings"),
    ("services", "Council Services"),
    ("complaint", "Complaint"),
    ("suggestion", "Suggestion"),
    ("other", "Other"),
];

/// Body of `POST /api/contact`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub privacy: bool,
}

impl ContactForm {
    /// Check required fields before anything is sent
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::Validation(format!("The {} field is required", field)));
        }

        let email = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .map_err(|e| Error::Validation(e.to_string()))?;
        if !email.is_match(self.email.trim()) {
            return Err(Error::Validation(format!(
                "'{}' is not a valid e-mail address",
                self.email
            )));
        }

        if !SUBJECTS.iter().any(|(value, _)| *value == self.subject) {
            return Err(Error::Validation(format!("Unknown subject '{}'", self.subject)));
        }

        if !self.privacy {
            return Err(Error::Validation(
                "You must agree to the privacy policy before sending".to_string(),
            ));
        }

        Ok(())
    }
}

/// Reply of `POST /api/contact`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// What the user is told after submitting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum ContactOutcome {
    Sent(String),
    Failed(String),
}

impl ContactOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, ContactOutcome::Sent(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ContactOutcome::Sent(m) | ContactOutcome::Failed(m) => m,
        }
    }
}

impl From<ContactResponse> for ContactOutcome {
    fn from(response: ContactResponse) -> Self {
        let message = response.message.filter(|m| !m.trim().is_empty());
        if response.success {
            ContactOutcome::Sent(message.unwrap_or_else(|| SUCCESS_MESSAGE.to_string()))
        } else {
            ContactOutcome::Failed(message.unwrap_or_else(|| FAILURE_MESSAGE.to_string()))
        }
    }
}

/// Validate and submit the form.
///
/// Validation failures are returned as errors. Delivery failures of any kind
/// become [`ContactOutcome::Failed`] with a message fit for the user.
pub async fn send(client: &CmsClient, form: &ContactForm) -> Result<ContactOutcome> {
    form.validate()?;

    match client
        .post_json::<_, ContactResponse>(&Endpoint::Contact, form)
        .await
    {
        Ok(response) => Ok(response.into()),
        Err(err) => {
            warn!(error = %err, "contact submission failed");
            Ok(ContactOutcome::Failed(FAILURE_MESSAGE.to_string()))
        }
    }
}
