use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::session::SessionUser;

use super::fields::FormState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
}

/// Body of `POST /employee-requests`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPayload {
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub position: String,
    pub experience: String,
    pub skills: String,
    pub message: String,
    pub status: RequestStatus,
    #[serde(serialize_with = "iso_millis")]
    pub requested_at: DateTime<Utc>,
}

impl RequestPayload {
    /// Field values go out trimmed, the same way they were validated.
    pub fn build(user: &SessionUser, form: &FormState, requested_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            position: form.position.trim().to_string(),
            experience: form.experience.trim().to_string(),
            skills: form.skills.trim().to_string(),
            message: form.message.trim().to_string(),
            status: RequestStatus::Pending,
            requested_at,
        }
    }
}

fn iso_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_camel_case_with_pending_status() {
        let user = SessionUser {
            id: "u-42".into(),
            name: "Dana".into(),
            email: "dana@example.com".into(),
        };
        let form = FormState {
            position: "Manager".into(),
            experience: "4".into(),
            skills: "Ironing".into(),
            message: "Hire me".into(),
        };
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();

        let json = serde_json::to_value(RequestPayload::build(&user, &form, at)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userId": "u-42",
                "userName": "Dana",
                "userEmail": "dana@example.com",
                "position": "Manager",
                "experience": "4",
                "skills": "Ironing",
                "message": "Hire me",
                "status": "pending",
                "requestedAt": "2026-03-01T09:30:00.000Z",
            })
        );
    }

    #[test]
    fn sends_trimmed_values() {
        let user = SessionUser {
            id: "u-1".into(),
            name: "Sam".into(),
            email: "sam@example.com".into(),
        };
        let form = FormState {
            position: " Manager ".into(),
            experience: "\t2 ".into(),
            skills: "  ".into(),
            message: " Hire me\n".into(),
        };

        let payload = RequestPayload::build(&user, &form, Utc::now());
        assert_eq!(payload.position, "Manager");
        assert_eq!(payload.experience, "2");
        assert_eq!(payload.skills, "");
        assert_eq!(payload.message, "Hire me");
    }
}
