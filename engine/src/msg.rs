use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub count: u32,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count > 1 {
            write!(f, "{} (x{})", self.text, self.count)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// Player-facing message buffer. Consecutive identical messages stack
/// into one entry with a repeat count.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn append(&mut self, text: impl Into<String>) {
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            if last.text == text {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message { text, count: 1 });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn repeats_stack() {
        let mut log = MessageLog::default();
        log.append("Blocked.");
        log.append("Blocked.");
        log.append("Blocked.");
        log.append("You hit the orc.");
        log.append("Blocked.");

        let lines: Vec<String> =
            log.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            lines,
            vec!["Blocked. (x3)", "You hit the orc.", "Blocked."]
        );
    }
}
