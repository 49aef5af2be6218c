//! Rendering of the engine's visible panels.

use super::model::Engine;
use crate::document::FieldId;

impl Engine {
    /// Renders the panel bound to `field`, or an empty string when hidden.
    pub fn panel_view(&self, field: FieldId) -> String {
        self.panel(field).map(|p| p.view()).unwrap_or_default()
    }

    /// Renders every visible panel, one block per panel in bind order. Hosts
    /// that overlay panels at their anchors should use [`Engine::panel_view`]
    /// with [`Panel::rect`](crate::panel::Panel::rect) instead.
    pub fn view(&self) -> String {
        self.instances
            .iter()
            .filter(|inst| inst.panel.is_visible())
            .map(|inst| inst.panel.view())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
