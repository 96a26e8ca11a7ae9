//! CSV codec for lead records
//!
//! Decoding is best-effort: it never fails, it skips what it cannot use.
//! Encoding emits the fixed export column set, which `decode` reads back.

use crate::error::LeadError;
use crate::lead::{Lead, LeadStatus};
use csv::{
    QuoteStyle, ReaderBuilder, StringRecord, StringRecordsIntoIter, Terminator, Trim, WriterBuilder,
};

/// Column order written by [`encode`]
pub const EXPORT_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "company",
    "website",
    "personalizedOpener",
    "blogTitle",
    "status",
];

// Accepted header spellings per field, first match wins.
const NAME_HEADERS: &[&str] = &["Name", "name"];
const COMPANY_HEADERS: &[&str] = &["Company", "company"];
const WEBSITE_HEADERS: &[&str] = &["Website", "website"];
const OPENER_HEADERS: &[&str] = &["Personalized Opener", "personalizedOpener"];
const BLOG_HEADERS: &[&str] = &["Latest Blog Title", "blogResearch", "blogTitle"];
const STATUS_HEADERS: &[&str] = &["Status", "status"];

/// Header positions resolved once per decode
#[derive(Debug, Default)]
struct Columns {
    name: Option<usize>,
    company: Option<usize>,
    website: Option<usize>,
    opener: Option<usize>,
    blog: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == *alias))
        };

        Self {
            name: find(NAME_HEADERS),
            company: find(COMPANY_HEADERS),
            website: find(WEBSITE_HEADERS),
            opener: find(OPENER_HEADERS),
            blog: find(BLOG_HEADERS),
            status: find(STATUS_HEADERS),
        }
    }
}

fn field(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|i| record.get(i)).unwrap_or_default()
}

/// Split `text` into chunks that each hold whole records
///
/// A quoted field may span lines. A quote still open at end of input only
/// claims its own line, so the rows after it still decode.
fn record_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = start;
        let mut open = false;
        let mut closed_at = None;

        for line in text[start..].split_inclusive('\n') {
            end += line.len();
            open ^= line.matches('"').count() % 2 == 1;
            if !open {
                closed_at = Some(end);
                break;
            }
        }

        match closed_at {
            Some(end) => {
                segments.push(&text[start..end]);
                start = end;
            }
            None => {
                let line_end = text[start..]
                    .find('\n')
                    .map_or(text.len(), |i| start + i + 1);
                let line = text[start..line_end].trim_end_matches(['\r', '\n']);
                tracing::warn!("Unterminated quote, reading line as literal text: {}", line);
                segments.push(line);
                start = line_end;
            }
        }
    }

    segments
}

fn read_records(segment: &str) -> StringRecordsIntoIter<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(segment.as_bytes())
        .into_records()
}

/// Decode CSV text into leads
///
/// Rows without a name are dropped and do not consume an id, so ids are
/// always `lead-1..=lead-n` over the returned sequence.
pub fn decode(text: &str) -> Vec<Lead> {
    let mut records = record_segments(text).into_iter().flat_map(read_records);

    let columns = match records.next() {
        Some(Ok(headers)) => Columns::from_headers(&headers),
        Some(Err(err)) => {
            tracing::warn!("Unreadable CSV header, no leads decoded: {}", err);
            return Vec::new();
        }
        None => Columns::default(),
    };

    if columns.name.is_none() {
        tracing::warn!("CSV has no name column, no leads decoded");
    }

    let mut leads = Vec::new();
    let mut skipped = 0usize;

    for (row, record) in records.enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!("Skipping malformed CSV row {}: {}", row + 1, err);
                skipped += 1;
                continue;
            }
        };

        let name = field(&record, columns.name);
        if name.is_empty() {
            skipped += 1;
            continue;
        }

        leads.push(Lead {
            id: Lead::id_for(leads.len() + 1),
            name: name.to_string(),
            company: field(&record, columns.company).to_string(),
            website: field(&record, columns.website).to_string(),
            personalized_opener: field(&record, columns.opener).to_string(),
            blog_title: field(&record, columns.blog).to_string(),
            status: LeadStatus::parse(field(&record, columns.status)),
        });
    }

    tracing::debug!("Decoded {} leads ({} rows skipped)", leads.len(), skipped);
    leads
}

/// Encode leads as CSV with the [`EXPORT_COLUMNS`] header
///
/// Values containing a delimiter, quote or line break are quoted with inner
/// quotes doubled. Lines are `\n`-separated with no trailing newline.
pub fn encode(leads: &[Lead]) -> Result<String, LeadError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_COLUMNS)?;
    for lead in leads {
        writer.write_record([
            lead.id.as_str(),
            lead.name.as_str(),
            lead.company.as_str(),
            lead.website.as_str(),
            lead.personalized_opener.as_str(),
            lead.blog_title.as_str(),
            lead.status.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LeadError::Csv(e.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| LeadError::Csv(e.to_string()))?;

    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}
