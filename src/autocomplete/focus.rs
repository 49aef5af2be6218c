//! Focus, blur and resize handling.

use super::model::{Engine, BLUR_SETTLE, REFOCUS_SETTLE};
use super::types::SettleAction;
use bubbletea_rs::Cmd;
use tracing::trace;

impl Engine {
    /// Focus on instance `i`. Only bound when the threshold was zero at bind
    /// time; it forces a query even for an unchanged, empty field.
    pub(super) fn focus_field(&mut self, i: usize) -> Option<Cmd> {
        let field = self.instances[i].field;
        self.document.focus(field);
        if !self.instances[i].listens_focus {
            return None;
        }
        self.instances[i].last_value = None;
        self.query(i)
    }

    /// Blur on instance `i`.
    ///
    /// A blur caused by pressing a suggestion arrives before the press itself.
    /// While the pointer is over the open panel the panel therefore stays open
    /// and focus is handed back shortly after, so the pending press can select.
    pub(super) fn blur_field(&mut self, i: usize) -> Option<Cmd> {
        let field = self.instances[i].field;
        if self.document.active() == Some(field) {
            self.document.blur();
        }

        let panel = &self.instances[i].panel;
        if panel.is_visible() && self.hovered == Some(panel.id()) {
            trace!("blur while hovering the panel; refocusing");
            return Some(self.schedule_settle(i, 0, SettleAction::Refocus, REFOCUS_SETTLE));
        }

        self.close(i);
        Some(self.schedule_settle(i, 0, SettleAction::HideAfterBlur, BLUR_SETTLE))
    }

    /// Records the field text as committed and hides the panel.
    pub(super) fn close(&mut self, i: usize) {
        let value = self.field_value(i);
        self.instances[i].last_value = Some(value);
        self.hide_panel(i);
    }

    /// Hides panel `i`. A hidden panel cannot be under the pointer.
    pub(super) fn hide_panel(&mut self, i: usize) {
        let panel = &mut self.instances[i].panel;
        panel.hide();
        if self.hovered == Some(panel.id()) {
            self.hovered = None;
        }
    }

    /// Re-anchors every panel without touching cache or selection.
    pub(super) fn resize(&mut self) {
        for i in 0..self.instances.len() {
            self.position(i);
        }
    }
}
