//! Contact form: field state, outcome classification and the submission controller.

mod controller;

pub use controller::{ContactController, ContactView};

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

pub const DEFAULT_SUCCESS_MESSAGE: &str =
    "Thank you for your message! I will get back to you soon.";
pub const CONNECT_FAILURE_MESSAGE: &str =
    "Unable to connect to server. Please check if the backend is running.";
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    /// The `name` attribute of the matching form control.
    pub fn input_name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Message => "message",
        }
    }

    pub fn from_input_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.input_name() == name)
    }
}

/// The three user-entered fields, serialised as the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl SubmitStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

/// Raw HTTP response as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The optional `message` field of a JSON body. Empty strings and
    /// unparseable bodies count as no message.
    pub fn message(&self) -> Option<String> {
        #[derive(Deserialize)]
        struct Reply {
            message: Option<String>,
        }
        serde_json::from_str::<Reply>(&self.body)
            .ok()
            .and_then(|r| r.message)
            .filter(|m| !m.is_empty())
    }
}

/// Sends a JSON body with a single POST.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError>;
}

/// Classified result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { message: Option<String> },
    ServerError {
        status: u16,
        message: Option<String>,
    },
    TransportError(String),
    Unexpected(String),
}

impl Outcome {
    pub fn classify(result: Result<HttpResponse, TransportError>) -> Self {
        match result {
            Ok(resp) if resp.is_success() => Outcome::Success {
                message: resp.message(),
            },
            Ok(resp) => Outcome::ServerError {
                status: resp.status,
                message: resp.message(),
            },
            Err(TransportError::NoResponse(detail)) => Outcome::TransportError(detail),
            Err(TransportError::Request(detail)) => Outcome::Unexpected(detail),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn status(&self) -> SubmitStatus {
        match self {
            Outcome::Success { message } => {
                SubmitStatus::success(message.as_deref().unwrap_or(DEFAULT_SUCCESS_MESSAGE))
            }
            Outcome::ServerError { status, message } => match message {
                Some(m) => SubmitStatus::error(m.as_str()),
                None => SubmitStatus::error(format!("Server error: {status}")),
            },
            Outcome::TransportError(_) => SubmitStatus::error(CONNECT_FAILURE_MESSAGE),
            Outcome::Unexpected(detail) if !detail.is_empty() => {
                SubmitStatus::error(detail.as_str())
            }
            Outcome::Unexpected(_) => SubmitStatus::error(UNEXPECTED_FAILURE_MESSAGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn success_defaults_when_message_missing_or_empty() {
        for body in ["{}", r#"{"message": ""}"#, "not json", ""] {
            let status = Outcome::classify(resp(201, body)).status();
            let expected = SubmitStatus::success(DEFAULT_SUCCESS_MESSAGE);
            assert_eq!(status, expected, "body {body:?}");
        }
    }

    #[test]
    fn server_error_without_message_uses_code() {
        let status = Outcome::classify(resp(503, "<html>")).status();
        assert_eq!(status, SubmitStatus::error("Server error: 503"));
    }

    #[test]
    fn redirect_status_is_an_error() {
        assert!(!Outcome::classify(resp(302, "{}")).is_success());
    }

    #[test]
    fn request_failure_uses_its_description() {
        let failed = TransportError::Request("bad header".into());
        let outcome = Outcome::classify(Err(failed));
        assert_eq!(outcome.status(), SubmitStatus::error("bad header"));

        let failed = TransportError::Request(String::new());
        let status = Outcome::classify(Err(failed)).status();
        assert_eq!(status, SubmitStatus::error(UNEXPECTED_FAILURE_MESSAGE));
    }

    #[test]
    fn form_serialises_three_fields() {
        let mut form = ContactForm::default();
        form.set(Field::Name, "Ada");
        form.set(Field::from_input_name("email").unwrap(), "ada@example.com");
        form.set(Field::Message, "hi");
        let json: serde_json::Value = serde_json::to_value(&form).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Ada", "email": "ada@example.com", "message": "hi"})
        );
    }
}
