//! Lead review core
//!
//! Browser-independent logic for the lead review dashboard: the lead model,
//! the CSV codec, the persisted lead store and the paywall policy. The wasm
//! crate wires these to `localStorage`, `fetch` and the DOM.

pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod lead;
pub mod mail;
pub mod paywall;
pub mod store;
pub mod summary;

pub use codec::{decode, encode, EXPORT_COLUMNS};
pub use config::DashboardConfig;
pub use error::{LeadError, StorageError};
pub use export::{export_approved, ApprovedExport, DEFAULT_EXPORT_FILENAME};
pub use lead::{cycle_status, truncate_preview, Lead, LeadStatus};
pub use mail::MailDraft;
pub use paywall::{
    Entitlement, GatedDisplay, PaywallPolicy, PaywallSummary, Visibility, DEFAULT_FREE_PREVIEW,
};
pub use store::{KeyValueStore, LeadStore, MemoryStore};
pub use summary::LeadSummary;
