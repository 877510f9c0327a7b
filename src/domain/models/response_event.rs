#[cfg(test)]
#[path = "response_event_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Deserializer;
use serde_json::Value;

/// A single `part` entry of structured event content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentPart {
    pub text: Option<String>,
}

fn last_text(parts: &[ContentPart]) -> &str {
    return parts
        .iter()
        .rev()
        .find_map(|part| return part.text.as_deref())
        .unwrap_or("");
}

/// The `content` field of an event, in whichever shape the service sent it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventContent {
    Plain(String),
    Structured(Vec<ContentPart>),
}

impl EventContent {
    pub fn from_value(value: &Value) -> Option<EventContent> {
        match value {
            Value::String(text) => return Some(EventContent::Plain(text.to_string())),
            Value::Object(obj) => {
                let parts = obj
                    .get("parts")
                    .and_then(|parts| return parts.as_array())
                    .map(|parts| {
                        return parts
                            .iter()
                            .map(|part| {
                                return ContentPart {
                                    text: part
                                        .get("text")
                                        .and_then(|text| return text.as_str())
                                        .map(|text| return text.to_string()),
                                };
                            })
                            .collect::<Vec<ContentPart>>();
                    })
                    .unwrap_or_default();

                return Some(EventContent::Structured(parts));
            }
            _ => return None,
        }
    }

    /// Plain content is used as is. For structured content only the last part
    /// carrying text counts.
    pub fn text(&self) -> &str {
        match self {
            EventContent::Plain(text) => return text,
            EventContent::Structured(parts) => return last_text(parts),
        }
    }
}

/// One pipeline step as emitted by the orchestration service. The service
/// sends no type discriminant, so the variant is picked from the fields that
/// are present when the event is decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseEvent {
    PlainText(String),
    StructuredContent(Vec<ContentPart>),
    FunctionCall {
        name: Option<String>,
        content: Option<EventContent>,
    },
    Unknown,
}

impl ResponseEvent {
    pub fn from_value(value: &Value) -> ResponseEvent {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return ResponseEvent::Unknown,
        };

        let content = obj.get("content").and_then(EventContent::from_value);

        if let Some(function_call) = obj.get("functionCall") {
            if !function_call.is_null() {
                return ResponseEvent::FunctionCall {
                    name: function_call
                        .get("name")
                        .and_then(|name| return name.as_str())
                        .map(|name| return name.to_string()),
                    content,
                };
            }
        }

        match content {
            Some(EventContent::Plain(text)) => return ResponseEvent::PlainText(text),
            Some(EventContent::Structured(parts)) => {
                return ResponseEvent::StructuredContent(parts)
            }
            None => return ResponseEvent::Unknown,
        }
    }

    /// Raw text carried by the event, or an empty string when there is none.
    pub fn text(&self) -> &str {
        match self {
            ResponseEvent::PlainText(text) => return text,
            ResponseEvent::StructuredContent(parts) => return last_text(parts),
            ResponseEvent::FunctionCall {
                content: Some(content),
                ..
            } => return content.text(),
            ResponseEvent::FunctionCall { content: None, .. } => return "",
            ResponseEvent::Unknown => return "",
        }
    }
}

impl<'de> Deserialize<'de> for ResponseEvent {
    fn deserialize<D>(deserializer: D) -> Result<ResponseEvent, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        return Ok(ResponseEvent::from_value(&value));
    }
}
