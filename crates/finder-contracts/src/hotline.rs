//! Crisis hotline reference data.
//!
//! Loaded once at startup and never modified.

use serde::{Deserialize, Serialize};

/// How a hotline is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactType {
    Call,
    Text,
}

/// One crisis support line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotlineEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub contact: ContactType,
    /// Number to dial or text.
    pub number: String,
    /// Keyword to send for text lines, e.g. "HOME".
    #[serde(default)]
    pub text_code: Option<String>,
    /// Menu option to press after connecting, e.g. 1 for veterans.
    #[serde(default)]
    pub press: Option<u8>,
    /// Hours-of-operation label, e.g. "24/7".
    pub hours: String,
}

impl HotlineEntry {
    /// Label for the hotline's primary action button.
    pub fn action_label(&self) -> String {
        match self.contact {
            ContactType::Call => format!("Call {}", self.number),
            ContactType::Text => format!(
                "Text {} to {}",
                self.text_code.as_deref().unwrap_or(""),
                self.number
            ),
        }
    }

    /// "Press N" hint, when the line routes through a menu.
    pub fn dial_hint(&self) -> Option<String> {
        self.press.map(|n| format!("Press {}", n))
    }
}
