//! Lead record and review status

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Review status of a lead
///
/// Unknown status strings (from CSV or a stored snapshot) decode as `Review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum LeadStatus {
    #[default]
    Review,
    Approved,
    Rejected,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 3] = [
        LeadStatus::Review,
        LeadStatus::Approved,
        LeadStatus::Rejected,
    ];

    /// Parse an exact status name, falling back to `Review`
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Approved" => LeadStatus::Approved,
            "Rejected" => LeadStatus::Rejected,
            _ => LeadStatus::Review,
        }
    }

    /// Next status in the fixed Review -> Approved -> Rejected -> Review cycle
    pub fn cycle(self) -> Self {
        match self {
            LeadStatus::Review => LeadStatus::Approved,
            LeadStatus::Approved => LeadStatus::Rejected,
            LeadStatus::Rejected => LeadStatus::Review,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Review => "Review",
            LeadStatus::Approved => "Approved",
            LeadStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(LeadStatus::parse(&raw))
    }
}

/// Free-function form of [`LeadStatus::cycle`]
pub fn cycle_status(current: LeadStatus) -> LeadStatus {
    current.cycle()
}

/// A single prospective contact under review
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub company: String,
    pub website: String,
    pub personalized_opener: String,
    pub blog_title: String,
    pub status: LeadStatus,
}

impl Lead {
    /// Id for the lead at a 1-based output position
    pub fn id_for(position: usize) -> String {
        format!("lead-{}", position)
    }

    /// Absolute website link, or `None` when there is nothing to link to
    pub fn website_url(&self) -> Option<String> {
        let site = self.website.trim();
        if site.is_empty() || site == "N/A" {
            return None;
        }

        if site.starts_with("http") {
            Some(site.to_string())
        } else {
            Some(format!("https://{}", site))
        }
    }

    /// First word of the name, used as the mail greeting
    pub fn first_name(&self) -> &str {
        self.name.split(' ').next().unwrap_or_default()
    }
}

/// Shorten a table cell to `max_chars` characters, appending `...` when cut
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
