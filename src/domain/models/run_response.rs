#[cfg(test)]
#[path = "run_response_test.rs"]
mod tests;

use serde_json::Value;

use super::EventContent;
use super::ResponseEvent;
use super::TurnError;

/// Decoded body of a `/run` call.
#[derive(Clone, Debug, PartialEq)]
pub enum RunResponse {
    Events(Vec<ResponseEvent>),
    Single(Value),
}

impl RunResponse {
    pub fn parse(body: &str) -> Result<RunResponse, TurnError> {
        let value: Value =
            serde_json::from_str(body).map_err(|err| return TurnError::Parse(err.to_string()))?;

        match value {
            Value::Array(events) => {
                return Ok(RunResponse::Events(
                    events.iter().map(ResponseEvent::from_value).collect(),
                ));
            }
            Value::Object(_) => return Ok(RunResponse::Single(value)),
            other => {
                return Err(TurnError::Parse(format!(
                    "expected a list of events or a message object, got {other}"
                )));
            }
        }
    }
}

/// Text of a non-streaming reply: `content` when present, otherwise
/// `newMessage.parts[0].text`. None of the event filters run on this path.
pub fn single_response_text(value: &Value) -> Option<String> {
    let text = match value.get("content").filter(|content| return !content.is_null()) {
        Some(content) => EventContent::from_value(content)
            .map(|content| return content.text().to_string())
            .unwrap_or_default(),
        None => value
            .pointer("/newMessage/parts/0/text")
            .and_then(|text| return text.as_str())
            .unwrap_or("")
            .to_string(),
    };

    if text.is_empty() {
        return None;
    }

    return Some(text);
}
