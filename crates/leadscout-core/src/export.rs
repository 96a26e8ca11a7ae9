//! Approved-lead CSV export

use crate::codec;
use crate::error::LeadError;
use crate::lead::{Lead, LeadStatus};
use serde::Serialize;

pub const DEFAULT_EXPORT_FILENAME: &str = "approved-leads.csv";
pub const EXPORT_MIME_TYPE: &str = "text/csv;charset=utf-8;";

/// A ready-to-download export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedExport {
    pub filename: String,
    pub mime_type: &'static str,
    pub count: usize,
    pub csv: String,
}

/// Encode the leads that are `Approved` right now
///
/// Returns `None` when nothing is approved, in which case there is nothing
/// to download.
pub fn export_approved(
    leads: &[Lead],
    filename: &str,
) -> Result<Option<ApprovedExport>, LeadError> {
    let approved: Vec<Lead> = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Approved)
        .cloned()
        .collect();

    if approved.is_empty() {
        return Ok(None);
    }

    let csv = codec::encode(&approved)?;
    tracing::info!("Exported {} approved leads", approved.len());

    Ok(Some(ApprovedExport {
        filename: filename.to_string(),
        mime_type: EXPORT_MIME_TYPE,
        count: approved.len(),
        csv,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(n: usize, status: LeadStatus) -> Lead {
        Lead {
            id: Lead::id_for(n),
            name: format!("Person {}", n),
            status,
            ..Lead::default()
        }
    }

    #[test]
    fn test_nothing_approved() {
        let leads = vec![lead(1, LeadStatus::Review), lead(2, LeadStatus::Rejected)];
        assert!(export_approved(&leads, DEFAULT_EXPORT_FILENAME)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_only_approved_rows() {
        let leads = vec![
            lead(1, LeadStatus::Approved),
            lead(2, LeadStatus::Review),
            lead(3, LeadStatus::Approved),
        ];
        let export = export_approved(&leads, DEFAULT_EXPORT_FILENAME)
            .unwrap()
            .unwrap();

        assert_eq!(export.count, 2);
        assert_eq!(export.filename, "approved-leads.csv");
        let ids: Vec<_> = codec::decode(&export.csv)
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(ids, vec!["Person 1", "Person 3"]);
        assert!(export.csv.contains("lead-3"));
        assert!(!export.csv.contains("lead-2"));
    }
}
