use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel an interaction happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    #[default]
    Phone,
    Chat,
    Email,
    Meeting,
    Video,
}

impl ContactChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "phone",
            Self::Chat => "chat",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Video => "video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Chat => "Chat",
            Self::Email => "E-mail",
            Self::Meeting => "Meeting",
            Self::Video => "Video",
        }
    }

    /// Accepts our own names plus the labels used by the browser-era records.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "phone" | "call" | "telefone" => Some(Self::Phone),
            "chat" | "whatsapp" | "text" => Some(Self::Chat),
            "email" | "e-mail" => Some(Self::Email),
            "meeting" | "reunião" | "reuniao" => Some(Self::Meeting),
            "video" | "vídeo" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn all() -> &'static [ContactChannel] {
        &[
            Self::Phone,
            Self::Chat,
            Self::Email,
            Self::Meeting,
            Self::Video,
        ]
    }
}

/// One logged interaction. Lives only inside its parent `Company`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactHistoryEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub channel: ContactChannel,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<NaiveDate>,
}

impl ContactHistoryEntry {
    pub fn new(date: NaiveDate, channel: ContactChannel, summary: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            channel,
            summary,
            notes: None,
            follow_up: None,
        }
    }
}
