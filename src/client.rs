// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Typed client for the contact endpoint.
//!
//! The form-controller counterpart to the server pipeline: it serializes
//! the collected field values, issues a single submission request, and maps
//! the JSON response onto a user-visible outcome. There is no client-side
//! retry and no optimistic state; a transport failure is reported the same
//! way as a server rejection, with a generic message.

use serde::{Deserialize, Serialize};
use tracing::debug;

const GENERIC_FAILURE: &str = "Sorry, there was an error sending your message.";

/// Field values collected from the form. The honeypot field is never
/// populated by this client; only automated senders fill it in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// Server response body for a submission.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Server confirmed the submission
    Accepted { message: String },
    /// Server rejected it, or the request itself failed
    Rejected { message: String },
}

/// HTTP client for the contact endpoint.
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ContactClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Submit the form once.
    ///
    /// A 2xx response whose body carries `success: true` is accepted;
    /// anything else, including a failed request or an unreadable body, is
    /// a rejection carrying the server's `error` string when one exists.
    pub async fn submit(&self, fields: &FormFields) -> Outcome {
        let response = match self.http.post(&self.endpoint).json(fields).send().await {
            Ok(response) => response,
            Err(error) => {
                debug!(%error, "submission request failed");
                return Outcome::Rejected {
                    message: GENERIC_FAILURE.to_string(),
                };
            }
        };

        let ok = response.status().is_success();
        let body: SubmitResponse = match response.json().await {
            Ok(body) => body,
            Err(error) => {
                debug!(%error, "unreadable submission response");
                return Outcome::Rejected {
                    message: GENERIC_FAILURE.to_string(),
                };
            }
        };

        if ok && body.success {
            Outcome::Accepted {
                message: body
                    .message
                    .unwrap_or_else(|| "Email sent successfully".to_string()),
            }
        } else {
            Outcome::Rejected {
                message: body.error.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            }
        }
    }
}

/// Form submission state.
///
/// `Succeeded` and `Failed` are terminal only between submissions; the next
/// attempt moves back through `Submitting`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Succeeded { message: String },
    Failed { message: String },
}

/// Form controller: owns the field values and the submission state.
pub struct ContactForm {
    client: ContactClient,
    fields: FormFields,
    state: FormState,
}

impl ContactForm {
    pub fn new(client: ContactClient) -> Self {
        Self {
            client,
            fields: FormFields::default(),
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.fields
    }

    /// Run one submission attempt and return the resulting state.
    pub async fn submit(&mut self) -> &FormState {
        self.state = FormState::Submitting;
        let outcome = self.client.submit(&self.fields).await;
        self.apply(outcome);
        self.state()
    }

    /// Fold a submission outcome into the form state. Success resets the
    /// field values; failure keeps them so the user can correct and resend.
    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Accepted { message } => {
                self.fields = FormFields::default();
                self.state = FormState::Succeeded { message };
            }
            Outcome::Rejected { message } => {
                self.state = FormState::Failed { message };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        let mut form = ContactForm::new(ContactClient::new("http://localhost:8080/api/contact"));
        form.fields_mut().name = "Ada".to_string();
        form.fields_mut().email = "ada@example.com".to_string();
        form.fields_mut().message = "hello".to_string();
        form
    }

    #[test]
    fn starts_idle() {
        assert_eq!(*form().state(), FormState::Idle);
    }

    #[test]
    fn acceptance_resets_fields() {
        let mut form = form();
        form.apply(Outcome::Accepted {
            message: "Email sent successfully".to_string(),
        });

        assert_eq!(
            *form.state(),
            FormState::Succeeded {
                message: "Email sent successfully".to_string()
            }
        );
        assert_eq!(form.fields, FormFields::default());
    }

    #[test]
    fn rejection_keeps_fields() {
        let mut form = form();
        form.apply(Outcome::Rejected {
            message: "Please provide a valid email address".to_string(),
        });

        assert_eq!(
            *form.state(),
            FormState::Failed {
                message: "Please provide a valid email address".to_string()
            }
        );
        assert_eq!(form.fields.name, "Ada");
        assert_eq!(form.fields.message, "hello");
    }

    #[test]
    fn optional_fields_are_skipped_in_the_payload() {
        let fields = FormFields {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            phone: None,
            message: "hello".to_string(),
        };
        let payload = serde_json::to_value(&fields).unwrap();
        assert!(payload.get("company").is_none());
        assert!(payload.get("phone").is_none());
        assert_eq!(payload["name"], "Ada");
    }
}
