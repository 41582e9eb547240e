//! Request payload validation.
//!
//! Each notification kind declares which text fields it requires. A required
//! field fails when it is absent, not a string, or blank after trimming. The
//! validator turns a raw JSON payload into a typed [`NotificationIntent`].

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::AppError;

use super::{NotificationIntent, NotificationKind};

/// Wire names of the payload fields
pub mod fields {
    pub const TITLE: &str = "title";
    pub const MESSAGE: &str = "message";
    pub const TOKEN: &str = "token";
    pub const IMAGE_URL: &str = "imageUrl";
    pub const PROMO_CODE: &str = "promoCode";
    pub const FORTUNE_TYPE: &str = "fortuneType";
    pub const FORTUNE_ID: &str = "fortuneId";
    pub const DATA: &str = "data";
    pub const BODY: &str = "body";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            field: err.field,
            reason: err.reason,
        }
    }
}

/// How a text field is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Must be present, a string and non-blank
    Required,
    /// Checked like `Required` only when the caller supplies it
    IfPresent,
    /// Must be a string when present; blank counts as absent
    Optional,
    /// Not read for this kind
    Ignored,
}

/// Field rules for one notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    pub title: FieldRule,
    pub message: FieldRule,
    pub token: FieldRule,
    pub image_url: FieldRule,
    pub promo_code: FieldRule,
    pub fortune: FieldRule,
    pub accepts_data: bool,
}

impl NotificationKind {
    pub fn field_rules(&self) -> FieldRules {
        use FieldRule::*;

        match self {
            NotificationKind::AdminAnnouncement => FieldRules {
                title: Required,
                message: Required,
                token: Ignored,
                image_url: Optional,
                promo_code: Ignored,
                fortune: Ignored,
                accepts_data: true,
            },
            NotificationKind::Promotion => FieldRules {
                title: Required,
                message: Required,
                token: Ignored,
                image_url: Optional,
                promo_code: Optional,
                fortune: Ignored,
                accepts_data: true,
            },
            // Title and body are derived from the fortune type
            NotificationKind::FortuneReady => FieldRules {
                title: IfPresent,
                message: IfPresent,
                token: Required,
                image_url: Ignored,
                promo_code: Ignored,
                fortune: Optional,
                accepts_data: true,
            },
            NotificationKind::UserNotification => FieldRules {
                title: Required,
                message: Required,
                token: Required,
                image_url: Optional,
                promo_code: Ignored,
                fortune: Ignored,
                accepts_data: true,
            },
            NotificationKind::Test => FieldRules {
                title: Ignored,
                message: Ignored,
                token: Optional,
                image_url: Ignored,
                promo_code: Ignored,
                fortune: Ignored,
                accepts_data: false,
            },
        }
    }
}

/// Parse a request body into a JSON object. An empty body reads as `{}`.
pub fn parse_payload(body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::new(fields::BODY, "must be a JSON object")),
        Err(_) => Err(ValidationError::new(fields::BODY, "malformed JSON")),
    }
}

fn check_text(
    payload: &Map<String, Value>,
    field: &str,
    rule: FieldRule,
) -> Result<Option<String>, ValidationError> {
    let value = match rule {
        FieldRule::Ignored => return Ok(None),
        FieldRule::Required => payload.get(field),
        FieldRule::IfPresent | FieldRule::Optional => match payload.get(field) {
            None | Some(Value::Null) => return Ok(None),
            present => present,
        },
    };

    match value {
        None | Some(Value::Null) => Err(ValidationError::new(field, "missing")),
        Some(Value::String(s)) if s.trim().is_empty() => match rule {
            FieldRule::Optional => Ok(None),
            _ => Err(ValidationError::new(field, "empty")),
        },
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::new(field, "must be a string")),
    }
}

fn check_data(payload: &Map<String, Value>) -> Result<BTreeMap<String, String>, ValidationError> {
    match payload.get(fields::DATA) {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => Ok((key.clone(), s.clone())),
                _ => Err(ValidationError::new(
                    fields::DATA,
                    &format!("value for '{}' must be a string", key),
                )),
            })
            .collect(),
        Some(_) => Err(ValidationError::new(fields::DATA, "must be an object")),
    }
}

/// Validate a raw payload for `kind` and build the typed intent.
///
/// Fields are checked in a fixed order (title, message, token, then optional
/// fields) so the first failure reported is deterministic.
pub fn validate(
    kind: NotificationKind,
    payload: &Map<String, Value>,
) -> Result<NotificationIntent, ValidationError> {
    let rules = kind.field_rules();

    let title = check_text(payload, fields::TITLE, rules.title)?;
    let body = check_text(payload, fields::MESSAGE, rules.message)?;
    let recipient = check_text(payload, fields::TOKEN, rules.token)?;
    let image_url = check_text(payload, fields::IMAGE_URL, rules.image_url)?;
    let promo_code = check_text(payload, fields::PROMO_CODE, rules.promo_code)?;
    let fortune_type = check_text(payload, fields::FORTUNE_TYPE, rules.fortune)?;
    let fortune_id = check_text(payload, fields::FORTUNE_ID, rules.fortune)?;
    let extra_data = if rules.accepts_data {
        check_data(payload)?
    } else {
        BTreeMap::new()
    };

    Ok(NotificationIntent {
        kind,
        title,
        body,
        recipient,
        image_url,
        extra_data,
        promo_code,
        fortune_type,
        fortune_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    fn failed_field(kind: NotificationKind, value: Value) -> String {
        validate(kind, &payload(value)).unwrap_err().field
    }

    #[test]
    fn test_parse_payload() {
        assert!(parse_payload(b"").unwrap().is_empty());
        assert!(parse_payload(b"  \n").unwrap().is_empty());
        assert_eq!(parse_payload(br#"{"a":1}"#).unwrap()["a"], 1);
        assert_eq!(parse_payload(b"[1,2]").unwrap_err().field, "body");
        assert_eq!(parse_payload(b"{not json").unwrap_err().field, "body");
    }

    #[test]
    fn test_admin_requires_title_and_message() {
        use NotificationKind::AdminAnnouncement as Admin;

        assert_eq!(failed_field(Admin, json!({"message": "m"})), "title");
        assert_eq!(failed_field(Admin, json!({"title": "  ", "message": "m"})), "title");
        assert_eq!(failed_field(Admin, json!({"title": 7, "message": "m"})), "title");
        assert_eq!(failed_field(Admin, json!({"title": "t"})), "message");
        assert_eq!(failed_field(Admin, json!({"title": "t", "message": "\t"})), "message");

        let intent = validate(Admin, &payload(json!({"title": "t", "message": "m"}))).unwrap();
        assert_eq!(intent.title.as_deref(), Some("t"));
        assert_eq!(intent.body.as_deref(), Some("m"));
        assert_eq!(intent.recipient, None);
    }

    #[test]
    fn test_title_checked_before_message() {
        assert_eq!(
            failed_field(NotificationKind::Promotion, json!({"title": "", "message": "x"})),
            "title"
        );
        assert_eq!(failed_field(NotificationKind::Promotion, json!({})), "title");
    }

    #[test]
    fn test_token_required_for_user_and_fortune() {
        assert_eq!(
            failed_field(
                NotificationKind::UserNotification,
                json!({"title": "t", "message": "m"})
            ),
            "token"
        );
        assert_eq!(failed_field(NotificationKind::FortuneReady, json!({})), "token");
        assert_eq!(
            failed_field(NotificationKind::FortuneReady, json!({"token": "   "})),
            "token"
        );
    }

    #[test]
    fn test_fortune_title_checked_only_when_supplied() {
        let intent = validate(
            NotificationKind::FortuneReady,
            &payload(json!({"token": "t1", "fortuneType": "coffee"})),
        )
        .unwrap();
        assert_eq!(intent.recipient.as_deref(), Some("t1"));
        assert_eq!(intent.fortune_type.as_deref(), Some("coffee"));
        assert_eq!(intent.title, None);

        assert_eq!(
            failed_field(NotificationKind::FortuneReady, json!({"title": "", "token": "t1"})),
            "title"
        );
    }

    #[test]
    fn test_test_kind_accepts_empty_payload() {
        let intent = validate(NotificationKind::Test, &Map::new()).unwrap();
        assert_eq!(intent.recipient, None);

        let intent = validate(NotificationKind::Test, &payload(json!({"token": ""}))).unwrap();
        assert_eq!(intent.recipient, None);

        assert_eq!(failed_field(NotificationKind::Test, json!({"token": 42})), "token");
    }

    #[test]
    fn test_optional_fields() {
        let intent = validate(
            NotificationKind::Promotion,
            &payload(json!({
                "title": "t",
                "message": "m",
                "promoCode": "SPRING",
                "imageUrl": ""
            })),
        )
        .unwrap();
        assert_eq!(intent.promo_code.as_deref(), Some("SPRING"));
        assert_eq!(intent.image_url, None);

        assert_eq!(
            failed_field(
                NotificationKind::Promotion,
                json!({"title": "t", "message": "m", "imageUrl": false})
            ),
            "imageUrl"
        );
    }

    #[test]
    fn test_data_must_be_string_map() {
        let intent = validate(
            NotificationKind::UserNotification,
            &payload(json!({
                "title": "t",
                "message": "m",
                "token": "abc",
                "data": {"orderId": "42"}
            })),
        )
        .unwrap();
        assert_eq!(intent.extra_data["orderId"], "42");

        assert_eq!(
            failed_field(
                NotificationKind::AdminAnnouncement,
                json!({"title": "t", "message": "m", "data": {"n": 1}})
            ),
            "data"
        );
        assert_eq!(
            failed_field(
                NotificationKind::AdminAnnouncement,
                json!({"title": "t", "message": "m", "data": "x"})
            ),
            "data"
        );
    }

    #[test]
    fn test_test_kind_ignores_data() {
        let intent = validate(NotificationKind::Test, &payload(json!({"data": 5}))).unwrap();
        assert!(intent.extra_data.is_empty());
    }
}
