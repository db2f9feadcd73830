use crate::entry::ValidatedFields;
use crate::error::CollectorError;

pub const VALID_LANGUAGES: [&str; 3] = ["bengali", "english", "mixed"];
pub const VALID_ENVIRONMENTS: [&str; 2] = ["noisy", "quiet"];
pub const VALID_INTENTS: [&str; 4] = ["pick", "place", "move", "stop"];
pub const VALID_COLORS: [&str; 4] = ["red", "green", "blue", "yellow"];
pub const VALID_DIRECTIONS: [&str; 4] = ["left", "right", "forward", "backward"];

pub const MAX_TEXT_LEN: usize = 1000;
pub const MAX_SPEAKER_ID_LEN: usize = 20;

/// Raw form fields as submitted, before any normalization
#[derive(Debug, Default, Clone, Copy)]
pub struct RawFields<'a> {
    pub text: &'a str,
    pub speaker_id: &'a str,
    pub language: &'a str,
    pub environment: &'a str,
    pub intent: &'a str,
    pub object_color: &'a str,
    pub target_color: &'a str,
    pub direction: &'a str,
}

/// Validate and normalize a submission.
///
/// Checks run in a fixed order and the first failure is reported:
/// text, speaker_id, language, environment, intent, object_color,
/// target_color, direction. Pure; no side effects.
pub fn validate(raw: &RawFields) -> Result<ValidatedFields, CollectorError> {
    let text = validate_text(raw.text)?;
    let speaker_id = validate_speaker_id(raw.speaker_id)?;
    let language = required_choice("language", raw.language, &VALID_LANGUAGES)?;
    let environment = required_choice("environment", raw.environment, &VALID_ENVIRONMENTS)?;
    let intent = optional_choice("intent", raw.intent, &VALID_INTENTS)?;
    let object_color = optional_choice("object_color", raw.object_color, &VALID_COLORS)?;
    let target_color = optional_choice("target_color", raw.target_color, &VALID_COLORS)?;
    let direction = optional_choice("direction", raw.direction, &VALID_DIRECTIONS)?;

    Ok(ValidatedFields {
        speaker_id,
        text,
        language,
        environment,
        intent,
        object_color,
        target_color,
        direction,
    })
}

fn validate_text(raw: &str) -> Result<String, CollectorError> {
    let text = raw.trim();
    if text.is_empty() || text.chars().count() > MAX_TEXT_LEN {
        return Err(CollectorError::Validation {
            field: "text",
            message: format!("must be 1-{} characters", MAX_TEXT_LEN),
        });
    }
    Ok(text.to_string())
}

fn validate_speaker_id(raw: &str) -> Result<String, CollectorError> {
    let speaker_id = raw.trim().to_uppercase();
    if speaker_id.is_empty() || speaker_id.chars().count() > MAX_SPEAKER_ID_LEN {
        return Err(CollectorError::Validation {
            field: "speaker_id",
            message: format!("must be 1-{} characters", MAX_SPEAKER_ID_LEN),
        });
    }
    Ok(speaker_id)
}

/// Case-insensitive match against a fixed set; stored lower-case
fn required_choice(
    field: &'static str,
    raw: &str,
    allowed: &[&str],
) -> Result<String, CollectorError> {
    let value = raw.trim().to_lowercase();
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(CollectorError::Validation {
            field,
            message: format!("must be one of: {}", allowed.join(", ")),
        })
    }
}

/// Like required_choice, but the empty string is a valid "unset" value
fn optional_choice(
    field: &'static str,
    raw: &str,
    allowed: &[&str],
) -> Result<String, CollectorError> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return Ok(value);
    }
    required_choice(field, &value, allowed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_valid() -> RawFields<'static> {
        RawFields {
            text: "tumi ekhane asho",
            speaker_id: "spk01",
            language: "Bengali",
            environment: "QUIET",
            intent: "",
            object_color: "",
            target_color: "",
            direction: "",
        }
    }

    #[test]
    fn test_valid_submission_is_normalized() {
        let fields = validate(&raw_valid()).unwrap();
        assert_eq!(fields.speaker_id, "SPK01");
        assert_eq!(fields.language, "bengali");
        assert_eq!(fields.environment, "quiet");
        assert_eq!(fields.intent, "");
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut raw = raw_valid();
        raw.text = "  hello there  ";
        assert_eq!(validate(&raw).unwrap().text, "hello there");
    }

    #[test]
    fn test_empty_text_rejected() {
        let mut raw = raw_valid();
        raw.text = "   ";
        let err = validate(&raw).unwrap_err();
        assert!(matches!(
            err,
            CollectorError::Validation { field: "text", .. }
        ));
    }

    #[test]
    fn test_text_length_bounds() {
        let long = "x".repeat(1000);
        let mut raw = raw_valid();
        raw.text = &long;
        assert!(validate(&raw).is_ok());

        let too_long = "x".repeat(1001);
        raw.text = &too_long;
        assert!(matches!(
            validate(&raw).unwrap_err(),
            CollectorError::Validation { field: "text", .. }
        ));
    }

    #[test]
    fn test_speaker_id_uppercased_and_bounded() {
        let mut raw = raw_valid();
        raw.speaker_id = " spk_a1 ";
        assert_eq!(validate(&raw).unwrap().speaker_id, "SPK_A1");

        raw.speaker_id = "";
        assert!(matches!(
            validate(&raw).unwrap_err(),
            CollectorError::Validation {
                field: "speaker_id",
                ..
            }
        ));

        let too_long = "s".repeat(21);
        raw.speaker_id = &too_long;
        assert!(validate(&raw).is_err());
    }

    #[test]
    fn test_unknown_language_rejected() {
        let mut raw = raw_valid();
        raw.language = "french";
        let err = validate(&raw).unwrap_err();
        match err {
            CollectorError::Validation { field, message } => {
                assert_eq!(field, "language");
                assert!(message.contains("bengali"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_optional_enums_accept_empty_and_match_case_insensitively() {
        let mut raw = raw_valid();
        raw.intent = "PICK";
        raw.object_color = "Red";
        raw.direction = "forward";
        let fields = validate(&raw).unwrap();
        assert_eq!(fields.intent, "pick");
        assert_eq!(fields.object_color, "red");
        assert_eq!(fields.target_color, "");
        assert_eq!(fields.direction, "forward");

        raw.intent = "fly";
        assert!(matches!(
            validate(&raw).unwrap_err(),
            CollectorError::Validation { field: "intent", .. }
        ));
    }

    #[test]
    fn test_first_failure_wins() {
        // Both text and language are invalid; text is checked first
        let mut raw = raw_valid();
        raw.text = "";
        raw.language = "klingon";
        assert!(matches!(
            validate(&raw).unwrap_err(),
            CollectorError::Validation { field: "text", .. }
        ));
    }
}
