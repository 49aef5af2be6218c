//! Query triggering: debouncing, the per-instance cache, the empty-prefix
//! short-circuit, source dispatch and rendering of answers.

use super::keymap::is_navigation_release;
use super::model::Engine;
use super::types::{DebounceMsg, SuggestionsMsg};
use crate::key::KeyPress;
use crate::panel::Row;
use crate::render::Suggestion;
use crate::source::Responder;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, trace};

impl Engine {
    /// Key-up on instance `i`. Navigation keys are left to key-down.
    pub(super) fn key_up(&mut self, i: usize, press: KeyPress) -> Option<Cmd> {
        if is_navigation_release(&press) {
            return None;
        }
        self.query(i)
    }

    /// Reacts to the field's current text: hides below the threshold, answers
    /// from the cache when possible, otherwise (re)starts the debounce timer.
    pub(super) fn query(&mut self, i: usize) -> Option<Cmd> {
        let value = self.field_value(i);
        let len = value.chars().count();
        let min_chars = self.config.min_chars;
        let inst = &mut self.instances[i];

        if len < min_chars {
            inst.last_value = Some(value);
            inst.debounce_tag += 1;
            inst.pending_query = None;
            inst.panel.hide();
            return None;
        }
        if inst.last_value.as_deref() == Some(value.as_str()) {
            return None;
        }
        inst.last_value = Some(value.clone());
        inst.debounce_tag += 1;
        inst.pending_query = None;

        if self.config.cache {
            if let Some(items) = inst.cache.get(&value).cloned() {
                trace!(query = %value, "suggestions served from cache");
                self.show_answer(i, &value, items);
                return None;
            }
            // No answer for a prefix means no answer for its extensions.
            let lower = min_chars.max(1);
            let suppressed = (lower..len).rev().any(|n| {
                inst.cache
                    .get(char_prefix(&value, n))
                    .is_some_and(|items| items.is_empty())
            });
            if suppressed {
                trace!(query = %value, "query suppressed by empty prefix");
                self.show_answer(i, &value, Vec::new());
                return None;
            }
        }

        inst.pending_query = Some(value);
        let id = inst.id;
        let tag = inst.debounce_tag;
        Some(bubbletea_tick(self.config.delay(), move |_| {
            Box::new(DebounceMsg { id, tag }) as Msg
        }))
    }

    /// Debounce expiry: dispatches the pending query unless superseded.
    pub(super) fn fire_debounce(&mut self, msg: DebounceMsg) -> Option<Cmd> {
        let i = self.instance_by_id(msg.id)?;
        let inst = &mut self.instances[i];
        if msg.tag != inst.debounce_tag {
            return None;
        }
        let query = inst.pending_query.take()?;
        let id = inst.id;

        debug!(%query, "dispatching suggestion query");
        let (responder, mut rx) = Responder::channel();
        self.source.request(&query, responder);

        match rx.try_recv() {
            Ok(items) => {
                self.deliver(i, query, items);
                None
            }
            Err(TryRecvError::Closed) => {
                debug!(%query, "source dropped the query unanswered");
                None
            }
            Err(TryRecvError::Empty) => Some(Box::pin(async move {
                let items = rx.await.ok()?;
                Some(Box::new(SuggestionsMsg { id, query, items }) as Msg)
            })),
        }
    }

    /// Applies the suggestion limit and renders an answer for `query`.
    pub(super) fn deliver(&mut self, i: usize, query: String, mut items: Vec<Suggestion>) {
        if let Some(limit) = self.config.limit() {
            items.truncate(limit);
        }
        if !self.config.item_as_markup {
            items = items.iter().map(Suggestion::stripped).collect();
        }
        self.show_answer(i, &query, items);
    }

    /// Caches the answer and, when it still matches the field, shows it.
    pub(super) fn show_answer(&mut self, i: usize, query: &str, items: Vec<Suggestion>) {
        let current = self.field_value(i);
        let min_chars = self.config.min_chars;
        let inst = &mut self.instances[i];
        if self.config.cache {
            inst.cache
                .entry(query.to_string())
                .or_insert_with(|| items.clone());
        }
        if query != current {
            trace!(%query, %current, "stale answer cached only");
            return;
        }

        if items.is_empty() || query.chars().count() < min_chars {
            inst.panel.clear();
            inst.panel.hide();
            return;
        }

        let rows = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let markup = (self.render)(&item, query);
                Row {
                    index,
                    item,
                    markup,
                }
            })
            .collect();
        inst.panel.set_rows(rows);
        self.show(i, None);
    }
}

fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
