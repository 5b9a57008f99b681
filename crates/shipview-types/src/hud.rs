//! HUD state recovered by the bounded HUD scan.

use serde::{Deserialize, Serialize};

/// Result of one HUD scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudStatus {
    /// Whether the report button is currently enabled. `None` when the
    /// button could not be located within the scan budget.
    pub report_button_active: Option<bool>,

    /// Number of candidate objects inspected before the scan stopped.
    pub candidates_examined: usize,
}

impl HudStatus {
    /// Whether the scan located the HUD at all.
    pub fn is_visible(&self) -> bool {
        self.report_button_active.is_some()
    }
}
