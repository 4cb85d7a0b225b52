use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ContactField {
    FirstName,
    Email,
    Message,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

pub fn validate(submission: &ContactSubmission) -> Vec<(ContactField, &'static str)> {
    let mut errors = Vec::new();

    if submission.first_name.trim().is_empty() {
        errors.push((ContactField::FirstName, "First name is required"));
    }

    let email = submission.email.trim();
    if email.is_empty() {
        errors.push((ContactField::Email, "Email is required"));
    } else if !email_looks_valid(email) {
        errors.push((ContactField::Email, "Email is invalid"));
    }

    if submission.message.trim().is_empty() {
        errors.push((ContactField::Message, "Message is required"));
    }

    errors
}

// Same acceptance set as the \S+@\S+\.\S+ check the form always used.
fn email_looks_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct MailTemplateParams {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub time: String,
}

impl MailTemplateParams {
    pub fn from_submission(submission: &ContactSubmission, time: String) -> Self {
        Self {
            firstname: submission.first_name.clone(),
            lastname: submission.last_name.clone(),
            email: submission.email.clone(),
            phone: submission.phone_number.clone(),
            subject: submission.subject.clone(),
            message: submission.message.clone(),
            time,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn submit(submission: &ContactSubmission) -> Result<String, String> {
    use crate::api::RawEnvelope;
    use gloo_net::http::Request;

    let request = Request::post("/api/contact")
        .json(submission)
        .map_err(|err| format!("could not encode the message: {err}"))?;

    let response = request
        .send()
        .await
        .map_err(|err| format!("could not reach the server: {err}"))?;

    let envelope = response
        .json::<RawEnvelope<serde::de::IgnoredAny>>()
        .await
        .map_err(|err| format!("unreadable response: {err}"))?
        .normalize();

    if envelope.success {
        Ok(envelope
            .message
            .unwrap_or_else(|| "Message sent successfully!".to_string()))
    } else {
        Err(envelope
            .message
            .unwrap_or_else(|| "Message could not be sent".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_submission() -> ContactSubmission {
        ContactSubmission {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: String::new(),
            subject: "Hello".to_string(),
            message: "I would like to talk.".to_string(),
        }
    }

    #[test]
    fn complete_submission_passes_validation() {
        assert!(validate(&filled_submission()).is_empty());
    }

    #[test]
    fn required_fields_are_reported_together() {
        let errors = validate(&ContactSubmission::default());
        let fields: Vec<ContactField> = errors.iter().map(|(field, _)| *field).collect();

        assert_eq!(
            fields,
            vec![ContactField::FirstName, ContactField::Email, ContactField::Message]
        );
    }

    #[test]
    fn whitespace_only_fields_do_not_pass() {
        let mut submission = filled_submission();
        submission.message = "   ".to_string();

        let errors = validate(&submission);
        assert_eq!(errors, vec![(ContactField::Message, "Message is required")]);
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["plainaddress", "missing@tld", "spaced @example.com", "trailing@dot."] {
            let mut submission = filled_submission();
            submission.email = bad.to_string();
            let errors = validate(&submission);
            assert_eq!(errors, vec![(ContactField::Email, "Email is invalid")], "email: {bad}");
        }
    }

    #[test]
    fn unusual_but_plausible_emails_are_accepted() {
        for ok in ["a@b.c", "first.last@sub.example.co.uk", "tag+filter@example.io"] {
            let mut submission = filled_submission();
            submission.email = ok.to_string();
            assert!(validate(&submission).is_empty(), "email: {ok}");
        }
    }

    #[test]
    fn template_params_follow_the_provider_field_names() {
        let params = MailTemplateParams::from_submission(&filled_submission(), "now".to_string());
        let encoded = serde_json::to_value(&params).expect("params should encode");

        assert_eq!(encoded["firstname"], "Ada");
        assert_eq!(encoded["lastname"], "Lovelace");
        assert_eq!(encoded["phone"], "");
        assert_eq!(encoded["time"], "now");
    }
}
