//! Pre-filled outreach email drafts

use crate::lead::Lead;
use serde::Serialize;

/// Subject and body for a `mailto:` draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailDraft {
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    pub fn for_lead(lead: &Lead) -> Self {
        let subject = format!("Quick question regarding {}", lead.company);

        let blog_reference = if lead.blog_title.is_empty() {
            String::new()
        } else {
            format!(
                "I recently read your article on \"{}\" and found it very insightful. ",
                lead.blog_title
            )
        };

        let body = format!(
            "Hi {},\n\n{}{}",
            lead.first_name(),
            blog_reference,
            lead.personalized_opener
        );

        Self { subject, body }
    }

    /// `mailto:` link with no recipient and percent-encoded subject and body
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}
