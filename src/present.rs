//! Presentational derivations shared by the console screens

use chrono::{DateTime, Datelike, NaiveDate};

use crate::articles::ArticleStatus;
use crate::users::User;

/// Badge color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Gray,
    Blue,
    Red,
    Yellow,
}

impl Tone {
    /// Utility classes for the badge
    pub fn classes(&self) -> &'static str {
        match self {
            Tone::Green => "bg-green-100 text-green-800",
            Tone::Gray => "bg-gray-100 text-gray-800",
            Tone::Blue => "bg-blue-100 text-blue-800",
            Tone::Red => "bg-red-100 text-red-800",
            Tone::Yellow => "bg-yellow-100 text-yellow-800",
        }
    }
}

pub fn article_status_tone(status: ArticleStatus) -> Tone {
    match status {
        ArticleStatus::Published => Tone::Green,
        ArticleStatus::Draft => Tone::Gray,
        ArticleStatus::Scheduled => Tone::Blue,
        ArticleStatus::Unpublished => Tone::Red,
    }
}

/// 2xx green, 4xx yellow, anything else red
pub fn http_status_tone(status: u16) -> Tone {
    match status {
        200..=299 => Tone::Green,
        400..=499 => Tone::Yellow,
        _ => Tone::Red,
    }
}

/// Label plus color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

pub fn user_status_badge(user: &User) -> Badge {
    if user.blocked {
        Badge {
            label: "Blocked",
            tone: Tone::Red,
        }
    } else {
        Badge {
            label: "Active",
            tone: Tone::Green,
        }
    }
}

pub fn membership_badge(user: &User) -> Badge {
    if user.premium_membership {
        Badge {
            label: "Premium",
            tone: Tone::Yellow,
        }
    } else {
        Badge {
            label: "Free",
            tone: Tone::Gray,
        }
    }
}

/// Row action offered for the blocked flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockAction {
    Block,
    Unblock,
}

impl BlockAction {
    pub fn for_user(user: &User) -> Self {
        if user.blocked {
            BlockAction::Unblock
        } else {
            BlockAction::Block
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BlockAction::Block => "Ban",
            BlockAction::Unblock => "CheckCircle",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockAction::Block => "Block user",
            BlockAction::Unblock => "Unblock user",
        }
    }
}

/// `M/D/YYYY` for an RFC 3339 timestamp or a plain date.
///
/// Empty input gives an empty string; anything unparseable is returned as is.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(d) => format!("{}/{}/{}", d.month(), d.day(), d.year()),
        Err(_) => raw.to_string(),
    }
}

/// "1 purchase", "3 purchases"
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
