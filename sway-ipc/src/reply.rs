use crate::codec::Frame;
use crate::command::EventType;
use crate::error::{ParsingCode, Result, SwayIpcError};
use serde_json::Value;
use thiserror::Error;

/// A sub-command of a RUN_COMMAND batch that sway refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", .error.as_deref().unwrap_or("command failed"))]
pub struct CommandError {
    pub error: Option<String>,
    pub parse_error: Option<bool>,
}

pub type CommandOutcome = Result<(), CommandError>;

/// A frame received after a successful subscription.
#[derive(Debug)]
pub struct Event {
    pub code: u32,
    pub document: Value,
}

impl Event {
    /// `None` when sway used a code this client does not know about.
    pub fn event_type(&self) -> Option<EventType> {
        EventType::from_code(self.code)
    }
}

impl From<Frame> for Event {
    fn from(frame: Frame) -> Self {
        Event {
            code: frame.payload_type,
            document: frame.document,
        }
    }
}

/// What happened to a subscription.
///
/// `subscribed` and `error` are independent: a subscription that went well
/// can still fail to reconnect afterwards.
#[derive(Debug)]
pub struct SubscribeOutcome {
    /// Sway acknowledged the subscription and events were delivered.
    pub subscribed: bool,
    pub error: Option<SwayIpcError>,
}

impl SubscribeOutcome {
    pub(crate) fn failed(error: SwayIpcError) -> Self {
        SubscribeOutcome {
            subscribed: false,
            error: Some(error),
        }
    }

    pub(crate) fn rejected() -> Self {
        SubscribeOutcome {
            subscribed: false,
            error: None,
        }
    }
}

pub(crate) fn command_outcomes(document: &Value) -> Result<Vec<CommandOutcome>> {
    let Value::Array(replies) = document else {
        return Err(SwayIpcError::parsing(
            ParsingCode::IncorrectType,
            "Response from RUN_COMMAND wasn't array",
        ));
    };

    replies.iter().map(command_outcome).collect()
}

fn command_outcome(reply: &Value) -> Result<CommandOutcome> {
    if bool_field(reply, "success", "Response from RUN_COMMAND")? {
        return Ok(Ok(()));
    }

    Ok(Err(CommandError {
        error: reply.get("error").and_then(Value::as_str).map(String::from),
        parse_error: reply.get("parse_error").and_then(Value::as_bool),
    }))
}

/// Reads a boolean field of a reply, failing with `NoSuchField` or
/// `IncorrectType`.
pub fn bool_field(
    document: &Value,
    field: &str,
    context: &str,
) -> Result<bool> {
    field_value(document, field, context)?.as_bool().ok_or_else(|| {
        SwayIpcError::parsing(
            ParsingCode::IncorrectType,
            format!("{}: field `{}` is not a boolean", context, field),
        )
    })
}

pub fn string_field(
    document: &Value,
    field: &str,
    context: &str,
) -> Result<String> {
    field_value(document, field, context)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| {
            SwayIpcError::parsing(
                ParsingCode::IncorrectType,
                format!("{}: field `{}` is not a string", context, field),
            )
        })
}

fn field_value<'a>(
    document: &'a Value,
    field: &str,
    context: &str,
) -> Result<&'a Value> {
    document.get(field).ok_or_else(|| {
        SwayIpcError::parsing(
            ParsingCode::NoSuchField,
            format!("{}: missing field `{}`", context, field),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcomes_keep_order() -> anyhow::Result<()> {
        let reply = json!([
            {"success": true},
            {"success": false, "error": "x"},
            {"success": true},
        ]);

        let outcomes = command_outcomes(&reply)?;

        assert_eq!(
            outcomes,
            vec![
                Ok(()),
                Err(CommandError {
                    error: Some("x".into()),
                    parse_error: None,
                }),
                Ok(()),
            ]
        );

        Ok(())
    }

    #[test]
    fn failure_fields_are_best_effort() -> anyhow::Result<()> {
        let reply = json!([
            {"success": false, "parse_error": true, "error": "Unknown/invalid command 'wrkspace'"},
            {"success": false, "parse_error": "yes", "error": 42},
            {"success": false},
        ]);

        let outcomes = command_outcomes(&reply)?;

        assert_eq!(
            outcomes[0],
            Err(CommandError {
                error: Some("Unknown/invalid command 'wrkspace'".into()),
                parse_error: Some(true),
            })
        );
        assert_eq!(outcomes[1], Err(CommandError::default()));
        assert_eq!(outcomes[2], Err(CommandError::default()));

        Ok(())
    }

    #[test]
    fn reply_must_be_array() {
        let result = command_outcomes(&json!({"success": true}));

        assert!(matches!(
            result,
            Err(SwayIpcError::Parsing {
                code: ParsingCode::IncorrectType,
                ..
            })
        ));
    }

    #[test]
    fn success_is_required() {
        let missing = command_outcomes(&json!([{"error": "x"}]));
        assert!(matches!(
            missing,
            Err(SwayIpcError::Parsing {
                code: ParsingCode::NoSuchField,
                ..
            })
        ));

        let wrong_type = command_outcomes(&json!([{"success": "true"}]));
        assert!(matches!(
            wrong_type,
            Err(SwayIpcError::Parsing {
                code: ParsingCode::IncorrectType,
                ..
            })
        ));
    }

    #[test]
    fn empty_reply() -> anyhow::Result<()> {
        assert!(command_outcomes(&json!([]))?.is_empty());
        Ok(())
    }

    #[test]
    fn string_field_lookup() -> anyhow::Result<()> {
        let document = json!({"name": "resize", "count": 1});

        assert_eq!(string_field(&document, "name", "state")?, "resize");
        assert!(matches!(
            string_field(&document, "count", "state"),
            Err(SwayIpcError::Parsing {
                code: ParsingCode::IncorrectType,
                ..
            })
        ));
        assert!(matches!(
            string_field(&document, "mode", "state"),
            Err(SwayIpcError::Parsing {
                code: ParsingCode::NoSuchField,
                ..
            })
        ));

        Ok(())
    }

    #[test]
    fn command_error_display() {
        let error = CommandError {
            error: Some("No matching node.".into()),
            parse_error: Some(false),
        };
        assert_eq!(error.to_string(), "No matching node.");
        assert_eq!(CommandError::default().to_string(), "command failed");
    }

    #[test]
    fn event_type_from_code() {
        let event = Event {
            code: EventType::Window.code(),
            document: json!({"change": "move"}),
        };
        assert_eq!(event.event_type(), Some(EventType::Window));

        let unknown = Event {
            code: 0x80000042,
            document: Value::Null,
        };
        assert_eq!(unknown.event_type(), None);
    }
}
