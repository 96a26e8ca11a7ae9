//! Paywall visibility policy
//!
//! A pure mapping from (entitlement, row index) to how the row is shown.
//! The free-preview threshold and the treatment of gated rows are policy
//! parameters applied uniformly to every row.

use serde::{Deserialize, Serialize};

/// Rows shown in full before the paywall applies
pub const DEFAULT_FREE_PREVIEW: usize = 3;

/// How a single lead row is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    /// Rendered normally
    Visible,
    /// Rendered but obscured and not interactive
    Locked,
    /// Not rendered
    Hidden,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Treatment of rows past the free preview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatedDisplay {
    #[default]
    Locked,
    Hidden,
}

impl From<GatedDisplay> for Visibility {
    fn from(display: GatedDisplay) -> Self {
        match display {
            GatedDisplay::Locked => Visibility::Locked,
            GatedDisplay::Hidden => Visibility::Hidden,
        }
    }
}

/// Paid-access latch
///
/// Starts unpaid and can only move to paid; there is no way back within a
/// session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Entitlement {
    paid: bool,
}

impl Entitlement {
    pub fn unpaid() -> Self {
        Self::default()
    }

    pub fn paid() -> Self {
        Self { paid: true }
    }

    /// Record a confirmed payment
    pub fn unlock(&mut self) {
        if !self.paid {
            tracing::info!("Entitlement unlocked");
        }
        self.paid = true;
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }
}

/// Counts for the upsell message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaywallSummary {
    pub total: usize,
    pub visible: usize,
    pub gated: usize,
}

impl PaywallSummary {
    /// Whether an upsell should be shown at all
    pub fn has_gated(&self) -> bool {
        self.gated > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaywallPolicy {
    pub free_preview: usize,
    pub gated: GatedDisplay,
}

impl Default for PaywallPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_PREVIEW, GatedDisplay::Locked)
    }
}

impl PaywallPolicy {
    pub fn new(free_preview: usize, gated: GatedDisplay) -> Self {
        Self {
            free_preview,
            gated,
        }
    }

    pub fn classify(&self, entitlement: Entitlement, index: usize) -> Visibility {
        if entitlement.is_paid() || index < self.free_preview {
            Visibility::Visible
        } else {
            self.gated.into()
        }
    }

    /// Whether the detail panel may open for the row at `index`
    ///
    /// A `false` answer means the caller should offer checkout instead.
    pub fn allows_detail(&self, entitlement: Entitlement, index: usize) -> bool {
        self.classify(entitlement, index).is_visible()
    }

    pub fn summary(&self, entitlement: Entitlement, total: usize) -> PaywallSummary {
        let visible = if entitlement.is_paid() {
            total
        } else {
            total.min(self.free_preview)
        };

        PaywallSummary {
            total,
            visible,
            gated: total - visible,
        }
    }
}
