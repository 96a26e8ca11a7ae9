//! WASM bindings for the lead review dashboard
//!
//! State lives in Rust (`LeadDashboard`); JavaScript renders rows and
//! forwards user events.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { LeadDashboard } from './pkg/leadscout_wasm.js';
//!
//! await init();
//!
//! const dashboard = new LeadDashboard({ freePreview: 3 });
//! await dashboard.load();
//! render(dashboard.getLeads(), dashboard.getSummary());
//!
//! // status badge click
//! dashboard.cycleStatus("lead-2");
//!
//! // row click
//! if (dashboard.openLead(id)) showPanel(dashboard.getLead(id));
//! else showCheckout();
//!
//! // checkout success callback
//! dashboard.confirmPayment();
//!
//! dashboard.downloadApproved();
//! ```

pub mod browser_store;
pub mod dashboard;
pub mod download;
pub mod fetch;

use leadscout_core::LeadStatus;
use wasm_bindgen::prelude::*;

pub use browser_store::BrowserStore;
pub use dashboard::{DashboardStats, LeadDashboard, LeadDetail, LeadRow};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Status that follows `current` in the review cycle
///
/// Unknown names are treated as `Review`.
#[wasm_bindgen(js_name = nextStatus)]
pub fn next_status(current: &str) -> String {
    LeadStatus::parse(current).cycle().as_str().to_string()
}
