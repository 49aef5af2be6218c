//! Key-down handling: row navigation, cancel and keyboard selection.

use super::model::{Engine, SELECT_SETTLE};
use super::types::{SelectTrigger, SettleAction};
use crate::key::KeyPress;
use bubbletea_rs::Cmd;
use crossterm::event::KeyCode;

impl Engine {
    /// Key-down on instance `i`. Returns the follow-up command and whether the
    /// key was consumed (its default text edit must not run).
    pub(super) fn key_down(&mut self, i: usize, press: KeyPress) -> (Option<Cmd>, bool) {
        let down = self.key_map.next_suggestion.matches(&press);
        if (down || self.key_map.prev_suggestion.matches(&press))
            && !self.instances[i].panel.is_empty()
        {
            self.step(i, down);
            return (None, true);
        }

        if self.key_map.cancel.matches(&press) {
            let inst = &self.instances[i];
            if let Some(last) = inst.last_value.clone() {
                if let Some(field) = self.document.field_mut(inst.field) {
                    field.set_value(last);
                }
            }
            self.hide_panel(i);
            return (None, false);
        }

        if self.key_map.accept.matches(&press) {
            let panel = &self.instances[i].panel;
            if let (Some(row), true) = (panel.selected(), panel.is_visible()) {
                let trigger = if press.code == KeyCode::Tab {
                    SelectTrigger::Tab
                } else {
                    SelectTrigger::Enter
                };
                if self.commit(i, row, trigger) {
                    let action = SettleAction::HideAfterSelect;
                    let cmd = self.schedule_settle(i, 0, action, SELECT_SETTLE);
                    return (Some(cmd), false);
                }
            }
        }

        (None, false)
    }

    /// Moves the selected mark one row. Stepping past either end clears the
    /// mark and restores the typed text; there is no wraparound.
    fn step(&mut self, i: usize, down: bool) {
        let inst = &mut self.instances[i];
        let len = inst.panel.rows().len();
        let next = match inst.panel.selected() {
            None if down => Some(0),
            None => Some(len - 1),
            Some(current) if down => (current + 1 < len).then_some(current + 1),
            Some(current) => current.checked_sub(1),
        };
        inst.panel.select(next);

        let text = match next {
            Some(row) => inst.panel.rows()[row].item.value().to_string(),
            None => inst.last_value.clone().unwrap_or_default(),
        };
        if let Some(field) = self.document.field_mut(inst.field) {
            field.set_value(text);
        }
        self.show(i, next);
    }
}
