#[cfg(test)]
#[path = "reconstructor_test.rs"]
mod tests;

use crate::domain::models::ResponseEvent;

/// Inter-agent acknowledgements that never reach the user.
pub const FILLER_PHRASES: [&str; 7] = [
    "I understand",
    "Okay, I will",
    "Great! I'm glad",
    "Okay, great!",
    "No further action",
    "Understood.",
    "I will await",
];

/// Verdicts that end a research run. Checked in this order.
pub const FINALITY_MARKERS: [&str; 3] = [
    "Final Evaluation: Approved",
    "Final Recommendation:",
    "Final Assessment:",
];

const UNKNOWN_FUNCTION: &str = "Unknown function";

enum State {
    Accumulating(Vec<String>),
    Done(String),
}

/// Rebuilds the single assistant reply of a turn from the service's event
/// list, dropping leaked JSON and agent chatter and stopping at the first
/// final verdict.
pub struct Reconstructor {
    state: State,
}

impl Default for Reconstructor {
    fn default() -> Reconstructor {
        return Reconstructor {
            state: State::Accumulating(vec![]),
        };
    }
}

fn is_structured_noise(trimmed: &str) -> bool {
    return trimmed.starts_with('{') || trimmed.starts_with("\"report\"");
}

fn truncate_at_marker(text: &str) -> Option<String> {
    for marker in FINALITY_MARKERS {
        if let Some(idx) = text.find(marker) {
            return Some(text[..idx + marker.len()].trim().to_string());
        }
    }

    return None;
}

impl Reconstructor {
    pub fn is_done(&self) -> bool {
        return matches!(self.state, State::Done(_));
    }

    pub fn push(&mut self, event: &ResponseEvent) {
        let parts = match &mut self.state {
            State::Done(_) => return,
            State::Accumulating(parts) => parts,
        };

        let text = event.text();
        let trimmed = text.trim();

        if is_structured_noise(trimmed) {
            tracing::debug!(text = trimmed, "Dropping structured payload");
            return;
        }

        if let Some(phrase) = FILLER_PHRASES.iter().find(|phrase| return text.contains(*phrase)) {
            tracing::debug!(phrase = phrase, "Dropping agent chatter");
            return;
        }

        if let Some(final_text) = truncate_at_marker(text) {
            tracing::debug!(discarded = parts.len(), "Final verdict reached");
            self.state = State::Done(final_text);
            return;
        }

        if let ResponseEvent::FunctionCall { name, .. } = event {
            let name = name.as_deref().unwrap_or(UNKNOWN_FUNCTION);
            parts.push(format!("Planning step: {name}"));
            return;
        }

        if !trimmed.is_empty() {
            parts.push(text.to_string());
        }
    }

    pub fn finish(self) -> Option<String> {
        match self.state {
            State::Done(text) => return Some(text),
            State::Accumulating(parts) => {
                if parts.is_empty() {
                    return None;
                }

                return Some(parts.join("\n"));
            }
        }
    }
}

pub fn reconstruct(events: &[ResponseEvent]) -> Option<String> {
    let mut reconstructor = Reconstructor::default();
    for event in events {
        reconstructor.push(event);
        if reconstructor.is_done() {
            break;
        }
    }

    return reconstructor.finish();
}
