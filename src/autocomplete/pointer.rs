//! Pointer handling over panels.

use super::model::{Engine, HOVER_SETTLE};
use super::types::{PointerMsg, SelectTrigger, SettleAction};
use bubbletea_rs::Cmd;

impl Engine {
    pub(super) fn pointer(&mut self, msg: PointerMsg) -> Option<Cmd> {
        match msg {
            PointerMsg::Over { panel, row } => {
                let i = self.instance_for_panel(panel)?;
                self.hovered = Some(panel);
                if let Some(row) = row {
                    let inst = &mut self.instances[i];
                    // Invalidates a pending mark clear from an earlier leave.
                    inst.hover_tag += 1;
                    inst.panel.select(Some(row));
                }
                None
            }
            PointerMsg::Leave { panel } => {
                let i = self.instance_for_panel(panel)?;
                if self.hovered == Some(panel) {
                    self.hovered = None;
                }
                let inst = &mut self.instances[i];
                let row = inst.panel.selected()?;
                inst.hover_tag += 1;
                let tag = inst.hover_tag;
                let action = SettleAction::ClearHoverMark { row };
                Some(self.schedule_settle(i, tag, action, HOVER_SETTLE))
            }
            PointerMsg::Down { panel, row } => {
                let i = self.instance_for_panel(panel)?;
                // A press between rows is an outside click; blur resolves it.
                let row = row?;
                if self.commit(i, row, SelectTrigger::Pointer) {
                    self.hide_panel(i);
                }
                None
            }
        }
    }
}
