//! Stateful lead review session
//!
//! Holds the lead store, paywall policy and entitlement in Rust. JavaScript
//! renders what `getLeads` / `getSummary` return and forwards clicks.

use crate::browser_store::BrowserStore;
use crate::download::download_text;
use crate::fetch::fetch_text;
use leadscout_core::{
    export_approved, truncate_preview, ApprovedExport, DashboardConfig, Entitlement, Lead,
    LeadStatus, LeadStore, LeadSummary, MailDraft, PaywallPolicy, PaywallSummary, Visibility,
};
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

/// Table row as handed to JavaScript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRow {
    pub id: String,
    pub index: usize,
    pub name: String,
    pub company: String,
    pub opener_preview: String,
    pub status: LeadStatus,
    pub visibility: Visibility,
}

/// Side panel contents for one lead
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail {
    #[serde(flatten)]
    pub lead: Lead,
    pub website_url: Option<String>,
    pub mailto_url: String,
}

/// Header metrics plus paywall counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub loaded: bool,
    pub paid: bool,
    pub all_processed: bool,
    pub leads: LeadSummary,
    pub paywall: PaywallSummary,
}

/// Browser-independent session state
pub(crate) struct DashboardState {
    config: DashboardConfig,
    policy: PaywallPolicy,
    store: LeadStore<BrowserStore>,
    entitlement: Entitlement,
}

impl DashboardState {
    pub(crate) fn new(config: DashboardConfig, storage: BrowserStore) -> Self {
        let store = LeadStore::new(storage, config.storage_key.clone());
        Self {
            policy: config.paywall(),
            config,
            store,
            entitlement: Entitlement::unpaid(),
        }
    }

    fn visibility_of(&self, id: &str) -> Result<(usize, Visibility), String> {
        let index = self
            .store
            .index_of(id)
            .ok_or_else(|| format!("Unknown lead: {}", id))?;
        Ok((index, self.policy.classify(self.entitlement, index)))
    }

    pub(crate) fn rows(&self) -> Vec<LeadRow> {
        self.store
            .leads()
            .iter()
            .enumerate()
            .filter_map(|(index, lead)| {
                let visibility = self.policy.classify(self.entitlement, index);
                if visibility == Visibility::Hidden {
                    return None;
                }

                Some(LeadRow {
                    id: lead.id.clone(),
                    index,
                    name: lead.name.clone(),
                    company: lead.company.clone(),
                    opener_preview: truncate_preview(
                        &lead.personalized_opener,
                        self.config.preview_chars,
                    ),
                    status: lead.status,
                    visibility,
                })
            })
            .collect()
    }

    pub(crate) fn open_lead(&self, id: &str) -> bool {
        self.store
            .index_of(id)
            .is_some_and(|index| self.policy.allows_detail(self.entitlement, index))
    }

    /// Detail for an unlocked lead; gated leads are refused
    pub(crate) fn detail(&self, id: &str) -> Result<LeadDetail, String> {
        let (_, visibility) = self.visibility_of(id)?;
        if !visibility.is_visible() {
            return Err(format!("Lead {} is locked", id));
        }

        let lead = self
            .store
            .get(id)
            .ok_or_else(|| format!("Unknown lead: {}", id))?;

        Ok(LeadDetail {
            lead: lead.clone(),
            website_url: lead.website_url(),
            mailto_url: MailDraft::for_lead(lead).mailto_url(),
        })
    }

    pub(crate) fn draft_email(&self, id: &str) -> Result<String, String> {
        self.detail(id).map(|detail| detail.mailto_url)
    }

    pub(crate) fn set_status(&mut self, id: &str, status: &str) -> Result<(), String> {
        let status = LeadStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == status)
            .ok_or_else(|| format!("Unknown status: {}", status))?;

        self.store.set_status(id, status);
        Ok(())
    }

    pub(crate) fn cycle_status(&mut self, id: &str) -> Option<LeadStatus> {
        self.store.cycle(id)
    }

    pub(crate) fn confirm_payment(&mut self) {
        self.entitlement.unlock();
    }

    pub(crate) fn stats(&self) -> DashboardStats {
        let leads = self.store.summary();
        DashboardStats {
            loaded: self.store.is_loaded(),
            paid: self.entitlement.is_paid(),
            all_processed: leads.all_processed(self.store.is_loaded()),
            leads,
            paywall: self.policy.summary(self.entitlement, self.store.len()),
        }
    }

    pub(crate) fn export(&self) -> Result<Option<ApprovedExport>, String> {
        export_approved(self.store.leads(), &self.config.export_filename).map_err(|e| e.to_string())
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Lead review dashboard exposed to JavaScript
#[wasm_bindgen]
pub struct LeadDashboard {
    state: RefCell<DashboardState>,
}

#[wasm_bindgen]
impl LeadDashboard {
    /// Create a dashboard; `config` is an optional partial config object
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<LeadDashboard, JsValue> {
        let config: DashboardConfig = if config.is_undefined() || config.is_null() {
            DashboardConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?
        };

        Ok(Self {
            state: RefCell::new(DashboardState::new(config, BrowserStore::open())),
        })
    }

    /// Restore the saved snapshot or fetch the bundled CSV
    ///
    /// Resolves with the lead count. A failed fetch resolves with 0.
    pub async fn load(&self) -> Result<usize, JsValue> {
        let data_url = {
            let mut state = self.state.borrow_mut();
            if state.store.restore() {
                return Ok(state.store.len());
            }
            state.config.data_url.clone()
        };

        let source = fetch_text(&data_url).await;

        let mut state = self.state.borrow_mut();
        Ok(state.store.adopt_source(source).len())
    }

    #[wasm_bindgen(getter, js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().store.is_loaded()
    }

    #[wasm_bindgen(getter, js_name = isPaid)]
    pub fn is_paid(&self) -> bool {
        self.state.borrow().entitlement.is_paid()
    }

    #[wasm_bindgen(getter, js_name = leadCount)]
    pub fn lead_count(&self) -> usize {
        self.state.borrow().store.len()
    }

    /// Whether snapshots survive a reload
    #[wasm_bindgen(getter, js_name = isPersistent)]
    pub fn is_persistent(&self) -> bool {
        self.state.borrow().store.storage().is_persistent()
    }

    /// Rows to render, hidden rows omitted
    #[wasm_bindgen(js_name = getLeads)]
    pub fn get_leads(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().rows())
    }

    #[wasm_bindgen(js_name = getLead)]
    pub fn get_lead(&self, id: &str) -> Result<JsValue, JsValue> {
        let detail = self
            .state
            .borrow()
            .detail(id)
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&detail)
    }

    /// Whether the side panel may open; `false` means show checkout
    #[wasm_bindgen(js_name = openLead)]
    pub fn open_lead(&self, id: &str) -> bool {
        self.state.borrow().open_lead(id)
    }

    #[wasm_bindgen(js_name = getSummary)]
    pub fn get_summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().stats())
    }

    #[wasm_bindgen(js_name = setStatus)]
    pub fn set_status(&self, id: &str, status: &str) -> Result<(), JsValue> {
        self.state
            .borrow_mut()
            .set_status(id, status)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Advance a lead's status; returns the new status name
    #[wasm_bindgen(js_name = cycleStatus)]
    pub fn cycle_status(&self, id: &str) -> Option<String> {
        self.state
            .borrow_mut()
            .cycle_status(id)
            .map(|s| s.as_str().to_string())
    }

    /// Called by the checkout button once payment succeeds
    #[wasm_bindgen(js_name = confirmPayment)]
    pub fn confirm_payment(&self) {
        self.state.borrow_mut().confirm_payment();
        web_sys::console::log_1(&"Payment confirmed, all leads unlocked".into());
    }

    /// `mailto:` link for an unlocked lead
    #[wasm_bindgen(js_name = draftEmail)]
    pub fn draft_email(&self, id: &str) -> Result<String, JsValue> {
        self.state
            .borrow()
            .draft_email(id)
            .map_err(|e| JsValue::from_str(&e))
    }

    /// CSV of the approved leads, or `undefined` if none are approved
    #[wasm_bindgen(js_name = exportApproved)]
    pub fn export_approved(&self) -> Result<Option<String>, JsValue> {
        let export = self
            .state
            .borrow()
            .export()
            .map_err(|e| JsValue::from_str(&e))?;
        Ok(export.map(|e| e.csv))
    }

    /// Trigger a browser download of the approved leads
    ///
    /// Returns false when nothing is approved.
    #[wasm_bindgen(js_name = downloadApproved)]
    pub fn download_approved(&self) -> Result<bool, JsValue> {
        let export = self
            .state
            .borrow()
            .export()
            .map_err(|e| JsValue::from_str(&e))?;

        match export {
            Some(export) => {
                download_text(&export.csv, &export.filename, export.mime_type)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Forget all reviews; call `load` again afterwards
    pub fn reset(&self) {
        self.state.borrow_mut().store.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadscout_core::{GatedDisplay, MemoryStore};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const CSV: &str = "Name,Company,Website,Latest Blog Title,Personalized Opener\n\
                       Ada Lovelace,Analytical,ada.dev,Engines,Loved the notes on the engine\n\
                       Grace Hopper,Navy,,Compilers,Hi\n\
                       Alan Turing,Bletchley,,,Hello\n\
                       Edsger Dijkstra,Eindhoven,ewd.org,Goto,Hey\n\
                       Barbara Liskov,MIT,,,Yo";

    fn loaded_state(config: DashboardConfig) -> DashboardState {
        let mut state = DashboardState::new(config, BrowserStore::Memory(MemoryStore::new()));
        state.store.adopt_source(Ok(CSV.to_string()));
        state
    }

    fn state() -> DashboardState {
        loaded_state(DashboardConfig::default())
    }

    #[test]
    fn test_rows_lock_past_free_preview() {
        let rows = state().rows();
        let visibility: Vec<_> = rows.iter().map(|r| r.visibility).collect();
        assert_eq!(
            visibility,
            vec![
                Visibility::Visible,
                Visibility::Visible,
                Visibility::Visible,
                Visibility::Locked,
                Visibility::Locked,
            ]
        );
    }

    #[test]
    fn test_hidden_rows_are_omitted() {
        let config = DashboardConfig {
            gated_display: GatedDisplay::Hidden,
            ..DashboardConfig::default()
        };
        let rows = loaded_state(config).rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.last().unwrap().id, "lead-3");
    }

    #[test]
    fn test_rows_truncate_opener() {
        let config = DashboardConfig {
            preview_chars: 10,
            ..DashboardConfig::default()
        };
        let rows = loaded_state(config).rows();
        assert_eq!(rows[0].opener_preview, "Loved the ...");
        assert_eq!(rows[1].opener_preview, "Hi");
    }

    #[test]
    fn test_payment_unlocks_detail() {
        let mut state = state();
        assert!(state.open_lead("lead-2"));
        assert!(!state.open_lead("lead-4"));
        assert!(state.detail("lead-4").is_err());
        assert!(!state.open_lead("lead-404"));

        state.confirm_payment();

        assert!(state.open_lead("lead-4"));
        let detail = state.detail("lead-4").unwrap();
        assert_eq!(detail.lead.name, "Edsger Dijkstra");
        assert_eq!(detail.website_url.as_deref(), Some("https://ewd.org"));
    }

    #[test]
    fn test_draft_email() {
        let state = state();
        let url = state.draft_email("lead-2").unwrap();
        assert!(url.starts_with("mailto:?subject=Quick%20question%20regarding%20Navy"));
        assert!(state.draft_email("lead-5").is_err());
    }

    #[test]
    fn test_set_status_validates_name() {
        let mut state = state();
        state.set_status("lead-1", "Approved").unwrap();
        assert!(state.set_status("lead-1", "approved").is_err());
        assert_eq!(state.stats().leads.approved, 1);
    }

    #[test]
    fn test_cycle_and_export() {
        let mut state = state();
        assert!(state.export().unwrap().is_none());

        assert_eq!(state.cycle_status("lead-3"), Some(LeadStatus::Approved));
        let export = state.export().unwrap().unwrap();
        assert_eq!(export.count, 1);
        assert_eq!(export.csv.lines().count(), 2);
        assert!(export.csv.contains("lead-3,Alan Turing,Bletchley"));
    }

    #[test]
    fn test_stats() {
        let mut state = state();
        let stats = state.stats();
        assert!(stats.loaded);
        assert!(!stats.paid);
        assert!(!stats.all_processed);
        assert_eq!(stats.paywall.gated, 2);

        for id in ["lead-1", "lead-2", "lead-3", "lead-4", "lead-5"] {
            state.set_status(id, "Rejected").unwrap();
        }
        state.confirm_payment();

        let stats = state.stats();
        assert!(stats.all_processed);
        assert!(stats.paid);
        assert_eq!(stats.paywall.gated, 0);
    }

    #[test]
    fn test_statuses_persist_to_storage() {
        let mut state = state();
        state.set_status("lead-2", "Approved").unwrap();

        let storage = match state.store.storage() {
            BrowserStore::Memory(memory) => memory.clone(),
            BrowserStore::Local(_) => unreachable!(),
        };
        let mut reloaded = DashboardState::new(
            DashboardConfig::default(),
            BrowserStore::Memory(storage),
        );
        assert!(reloaded.store.restore());
        assert_eq!(reloaded.stats().leads.approved, 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn locked_rows_match_paywall_summary(free_preview in 0usize..8) {
            let config = DashboardConfig {
                free_preview,
                ..DashboardConfig::default()
            };
            let state = loaded_state(config);
            let locked = state
                .rows()
                .iter()
                .filter(|r| r.visibility == Visibility::Locked)
                .count();

            prop_assert_eq!(locked, state.stats().paywall.gated);
        }
    }
}
