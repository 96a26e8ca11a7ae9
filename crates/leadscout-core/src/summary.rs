use crate::lead::{Lead, LeadStatus};
use serde::Serialize;

/// Per-status lead counts shown on the dashboard header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub total: usize,
    pub review: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl LeadSummary {
    pub fn from_leads(leads: &[Lead]) -> Self {
        leads.iter().fold(
            Self {
                total: leads.len(),
                ..Self::default()
            },
            |mut summary, lead| {
                match lead.status {
                    LeadStatus::Review => summary.review += 1,
                    LeadStatus::Approved => summary.approved += 1,
                    LeadStatus::Rejected => summary.rejected += 1,
                }
                summary
            },
        )
    }

    /// True once every loaded lead has left `Review`
    pub fn all_processed(&self, loaded: bool) -> bool {
        loaded && self.total > 0 && self.review == 0
    }
}
