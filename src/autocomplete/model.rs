//! Core model of the suggestion engine: options, per-field instances, binding,
//! teardown and message dispatch.

use super::keymap::{default_key_map, KeyMap};
use super::types::{
    DebounceMsg, FieldEvent, FieldMsg, OnSelect, Overflow, PointerMsg, ResizeMsg, SelectEvent,
    SelectTrigger, SettleAction, SettleMsg, SuggestionsMsg, Targets,
};
use crate::config::{Config, ScrollBehavior};
use crate::document::{Document, FieldId, AUTOCOMPLETE_ATTR};
use crate::key::KeyPress;
use crate::panel::{Panel, PanelId, PanelStyles};
use crate::render::{default_render, RenderFn, Suggestion};
use crate::selector::Selector;
use crate::source::{StaticSource, SuggestionSource};
use crate::Component;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// Used to ensure timer messages only reach the instance that scheduled them.
static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

pub(super) const SELECT_SETTLE: Duration = Duration::from_millis(20);
pub(super) const HOVER_SETTLE: Duration = Duration::from_millis(20);
pub(super) const BLUR_SETTLE: Duration = Duration::from_millis(350);
pub(super) const REFOCUS_SETTLE: Duration = Duration::from_millis(20);

/// Everything needed to construct an [`Engine`].
///
/// # Examples
///
/// ```rust
/// use bubbletea_autocomplete::autocomplete::{Options, Targets};
/// use bubbletea_autocomplete::config::Config;
/// use bubbletea_autocomplete::source::StaticSource;
///
/// let options = Options::new(".city", StaticSource::new(["Berlin", "Bern"]))
///     .with_config(Config::default().with_min_chars(1))
///     .on_select(|event| println!("picked {}", event.value));
/// assert_eq!(options.targets, Targets::Selector(".city".to_string()));
/// ```
pub struct Options {
    /// Fields to bind.
    pub targets: Targets,
    /// Where suggestions come from.
    pub source: Arc<dyn SuggestionSource>,
    /// Plain-data settings.
    pub config: Config,
    /// Row renderer.
    pub render: RenderFn,
    /// Selection callback.
    pub on_select: OnSelect,
    /// Panel styles.
    pub styles: PanelStyles,
    /// Key bindings.
    pub key_map: KeyMap,
}

impl Options {
    /// Options with default configuration, the default renderer and a no-op
    /// selection callback.
    pub fn new(targets: impl Into<Targets>, source: impl SuggestionSource + 'static) -> Self {
        Self {
            targets: targets.into(),
            source: Arc::new(source),
            config: Config::default(),
            render: Box::new(default_render),
            on_select: Box::new(|_| {}),
            styles: PanelStyles::default(),
            key_map: default_key_map(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the row renderer.
    pub fn with_render(
        mut self,
        render: impl Fn(&Suggestion, &str) -> String + Send + 'static,
    ) -> Self {
        self.render = Box::new(render);
        self
    }

    /// Sets the selection callback.
    pub fn on_select(mut self, on_select: impl FnMut(&SelectEvent) + Send + 'static) -> Self {
        self.on_select = Box::new(on_select);
        self
    }

    /// Replaces the panel styles.
    pub fn with_styles(mut self, styles: PanelStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Replaces the key bindings.
    pub fn with_key_map(mut self, key_map: KeyMap) -> Self {
        self.key_map = key_map;
        self
    }
}

/// Bound state for one field.
pub(super) struct Instance {
    pub(super) id: usize,
    pub(super) field: FieldId,
    pub(super) panel: Panel,
    pub(super) saved_autocomplete: Option<String>,
    pub(super) cache: HashMap<String, Vec<Suggestion>>,
    // `None` until the first commit; also forced to `None` so a focus query
    // never equals it.
    pub(super) last_value: Option<String>,
    pub(super) debounce_tag: usize,
    pub(super) pending_query: Option<String>,
    pub(super) hover_tag: usize,
    pub(super) listens_focus: bool,
}

/// The suggestion engine.
///
/// Binds one [`Panel`] to each target field of a [`Document`] and drives
/// querying, caching, rendering and selection from forwarded events. Timers are
/// bubbletea commands; feed the messages they produce back into
/// [`Engine::update`].
///
/// # Examples
///
/// ```rust
/// use bubbletea_autocomplete::autocomplete::{Engine, FieldEvent, FieldMsg, Options};
/// use bubbletea_autocomplete::config::Config;
/// use bubbletea_autocomplete::document::{Document, Field, Rect};
/// use bubbletea_autocomplete::source::StaticSource;
/// use crossterm::event::KeyCode;
///
/// let mut doc = Document::new();
/// let city = doc.add_field(Field::new(Rect::new(0, 0, 20, 1)).with_class("city"));
///
/// let options = Options::new(".city", StaticSource::new(["Berlin", "Bern", "Bonn"]))
///     .with_config(Config::default().with_min_chars(2).with_cache(true));
/// let mut engine = Engine::new(options, doc);
/// assert_eq!(engine.len(), 1);
///
/// engine.document_mut().field_mut(city).unwrap().set_value("be");
/// let debounce = engine.update(Box::new(FieldMsg {
///     field: city,
///     event: FieldEvent::KeyUp(KeyCode::Char('e').into()),
/// }));
/// assert!(debounce.is_some());
///
/// let doc = engine.teardown();
/// assert!(doc.panels().is_empty());
/// ```
pub struct Engine {
    /// Key bindings.
    pub key_map: KeyMap,
    pub(super) config: Config,
    pub(super) source: Arc<dyn SuggestionSource>,
    pub(super) render: RenderFn,
    pub(super) on_select: OnSelect,
    pub(super) listeners: Vec<OnSelect>,
    pub(super) document: Document,
    pub(super) instances: Vec<Instance>,
    pub(super) hovered: Option<PanelId>,
}

impl Engine {
    /// Binds to every target field. Unresolvable targets bind nothing.
    pub fn new(options: Options, mut document: Document) -> Self {
        let Options {
            targets,
            source,
            config,
            render,
            on_select,
            styles,
            key_map,
        } = options;

        let fields = resolve(&targets, &document);
        let mut instances = Vec::with_capacity(fields.len());
        for field_id in fields {
            let Some(field) = document.field_mut(field_id) else {
                continue;
            };
            let saved_autocomplete = field.attribute(AUTOCOMPLETE_ATTR).map(str::to_string);
            field.set_attribute(AUTOCOMPLETE_ATTR, "off");

            let mut panel = Panel::new(&config.menu_class);
            panel.styles = styles.clone();
            document.append_panel(panel.id());

            instances.push(Instance {
                id: next_id(),
                field: field_id,
                panel,
                saved_autocomplete,
                cache: HashMap::new(),
                last_value: None,
                debounce_tag: 0,
                pending_query: None,
                hover_tag: 0,
                listens_focus: config.min_chars == 0,
            });
        }
        debug!(instances = instances.len(), "autocomplete bound");

        let mut engine = Self {
            key_map,
            config,
            source,
            render,
            on_select,
            listeners: Vec::new(),
            document,
            instances,
            hovered: None,
        };
        for i in 0..engine.instances.len() {
            engine.position(i);
        }
        engine
    }

    /// Unbinds every field: restores the native completion attribute, removes
    /// the panels and hands the document back.
    pub fn teardown(mut self) -> Document {
        for instance in self.instances.drain(..) {
            if let Some(field) = self.document.field_mut(instance.field) {
                match instance.saved_autocomplete {
                    Some(value) => field.set_attribute(AUTOCOMPLETE_ATTR, value),
                    None => {
                        field.remove_attribute(AUTOCOMPLETE_ATTR);
                    }
                }
            }
            self.document.remove_panel(instance.panel.id());
        }
        debug!("autocomplete unbound");
        self.document
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no field is bound.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// The bound fields in bind order.
    pub fn fields(&self) -> Vec<FieldId> {
        self.instances.iter().map(|inst| inst.field).collect()
    }

    /// The host document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The host document, for edits the host makes itself.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The panel bound to `field`.
    pub fn panel(&self, field: FieldId) -> Option<&Panel> {
        self.instance_for_field(field)
            .map(|i| &self.instances[i].panel)
    }

    /// Instance id of the binding for `field`; timer messages carry it.
    pub fn instance_id(&self, field: FieldId) -> Option<usize> {
        self.instance_for_field(field).map(|i| self.instances[i].id)
    }

    /// The cached suggestions for `query` on `field`.
    pub fn cached(&self, field: FieldId, query: &str) -> Option<&[Suggestion]> {
        self.instance_for_field(field)
            .and_then(|i| self.instances[i].cache.get(query))
            .map(Vec::as_slice)
    }

    /// The last committed text of `field`.
    pub fn last_value(&self, field: FieldId) -> Option<&str> {
        self.instance_for_field(field)
            .and_then(|i| self.instances[i].last_value.as_deref())
    }

    /// Current debounce generation of `field`.
    pub fn debounce_tag(&self, field: FieldId) -> Option<usize> {
        self.instance_for_field(field)
            .map(|i| self.instances[i].debounce_tag)
    }

    /// Current hover generation of `field`.
    pub fn hover_tag(&self, field: FieldId) -> Option<usize> {
        self.instance_for_field(field)
            .map(|i| self.instances[i].hover_tag)
    }

    /// The configuration in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers an extra selection listener, called after the main callback.
    pub fn add_select_listener(&mut self, listener: impl FnMut(&SelectEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Changes the minimum character threshold. Focus queries stay as bound.
    pub fn set_min_chars(&mut self, min_chars: usize) {
        self.config.min_chars = min_chars;
    }

    /// Changes the debounce delay in milliseconds.
    pub fn set_delay(&mut self, delay: i64) {
        self.config.delay = delay;
    }

    /// Enables or disables caching. Existing entries are kept.
    pub fn set_cache(&mut self, cache: bool) {
        self.config.cache = cache;
    }

    /// Changes the suggestion limit.
    pub fn set_suggestion_limit(&mut self, limit: i32) {
        self.config.suggestion_limit = limit;
    }

    /// Switches between plain-text and markup items.
    pub fn set_item_as_markup(&mut self, item_as_markup: bool) {
        self.config.item_as_markup = item_as_markup;
    }

    /// Changes the overflow compensation.
    pub fn set_scroll_behavior(&mut self, behavior: ScrollBehavior) {
        self.config.scroll_behavior = behavior;
    }

    /// Adds menu classes to every panel.
    pub fn add_menu_class(&mut self, names: &str) {
        self.config.add_menu_class(names);
        self.sync_menu_class();
    }

    /// Removes menu classes from every panel.
    pub fn remove_menu_class(&mut self, names: &str) {
        self.config.remove_menu_class(names);
        self.sync_menu_class();
    }

    fn sync_menu_class(&mut self) {
        for inst in &mut self.instances {
            inst.panel.set_menu_class(&self.config.menu_class);
        }
    }

    /// How far the visible panel of `field` runs past the viewport bottom, and
    /// how the host should compensate.
    pub fn overflow(&self, field: FieldId) -> Option<Overflow> {
        if self.config.scroll_behavior == ScrollBehavior::None {
            return None;
        }
        let panel = &self.instances[self.instance_for_field(field)?].panel;
        if !panel.is_visible() {
            return None;
        }
        let (_, scroll_y) = self.document.scroll();
        let (_, viewport_height) = self.document.viewport();
        let bottom = panel.rect().bottom() - scroll_y;
        (bottom > viewport_height).then(|| Overflow {
            lines: bottom - viewport_height,
            behavior: self.config.scroll_behavior,
        })
    }

    /// Handles one message.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(field_msg) = msg.downcast_ref::<FieldMsg>() {
            let i = self.instance_for_field(field_msg.field)?;
            return match field_msg.event {
                FieldEvent::KeyDown(press) => self.key_down(i, press).0,
                FieldEvent::KeyUp(press) => self.key_up(i, press),
                FieldEvent::Focus => self.focus_field(i),
                FieldEvent::Blur => self.blur_field(i),
            };
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            let i = self.active_instance()?;
            return self.keystroke(i, KeyPress::from(key_msg));
        }

        if let Some(pointer) = msg.downcast_ref::<PointerMsg>() {
            return self.pointer(*pointer);
        }

        if msg.downcast_ref::<ResizeMsg>().is_some() {
            self.resize();
            return None;
        }

        if let Some(size) = msg.downcast_ref::<bubbletea_rs::WindowSizeMsg>() {
            self.document
                .set_viewport(size.width as i32, size.height as i32);
            self.resize();
            return None;
        }

        if let Some(debounce) = msg.downcast_ref::<DebounceMsg>() {
            return self.fire_debounce(*debounce);
        }

        if let Some(answer) = msg.downcast_ref::<SuggestionsMsg>() {
            let i = self.instance_by_id(answer.id)?;
            self.deliver(i, answer.query.clone(), answer.items.clone());
            return None;
        }

        if let Some(settle) = msg.downcast_ref::<SettleMsg>() {
            return self.settle(*settle);
        }

        None
    }

    /// A full keystroke on a bound field: key-down handling, the default text
    /// edit unless the key-down handler consumed the key, then key-up handling.
    pub(super) fn keystroke(&mut self, i: usize, press: KeyPress) -> Option<Cmd> {
        let (cmd, consumed) = self.key_down(i, press);
        if cmd.is_some() {
            return cmd;
        }
        if !consumed {
            self.default_edit(i, press);
        }
        self.key_up(i, press)
    }

    fn default_edit(&mut self, i: usize, press: KeyPress) {
        use crossterm::event::{KeyCode, KeyModifiers};

        let Some(field) = self.document.field_mut(self.instances[i].field) else {
            return;
        };
        match press.code {
            KeyCode::Char(ch)
                if !press.modifiers.contains(KeyModifiers::CONTROL)
                    && !press.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut buf = [0u8; 4];
                field.insert_str(ch.encode_utf8(&mut buf));
            }
            KeyCode::Backspace => field.backspace(),
            KeyCode::Delete => field.delete(),
            KeyCode::Left => field.move_left(),
            KeyCode::Right => field.move_right(),
            KeyCode::Home => field.move_home(),
            KeyCode::End => field.move_end(),
            _ => {}
        }
    }

    fn settle(&mut self, msg: SettleMsg) -> Option<Cmd> {
        let i = self.instance_by_id(msg.id)?;
        match msg.action {
            SettleAction::HideAfterSelect | SettleAction::HideAfterBlur => {
                self.hide_panel(i);
                None
            }
            SettleAction::ClearHoverMark { row } => {
                let inst = &mut self.instances[i];
                if msg.tag == inst.hover_tag && inst.panel.selected() == Some(row) {
                    inst.panel.select(None);
                }
                None
            }
            SettleAction::Refocus => {
                let field = self.instances[i].field;
                self.document.focus(field);
                if self.instances[i].listens_focus {
                    return self.focus_field(i);
                }
                None
            }
        }
    }

    /// Commits row `row` of instance `i`: writes its value into the field,
    /// records it as committed text and notifies every selection callback.
    pub(super) fn commit(&mut self, i: usize, row: usize, trigger: SelectTrigger) -> bool {
        let inst = &mut self.instances[i];
        let Some(item) = inst.panel.rows().get(row).map(|r| r.item.clone()) else {
            return false;
        };
        let value = item.value().to_string();
        if let Some(field) = self.document.field_mut(inst.field) {
            field.set_value(value.clone());
        }
        inst.last_value = Some(value.clone());
        inst.debounce_tag += 1;
        inst.pending_query = None;

        let event = SelectEvent {
            field: inst.field,
            value,
            row,
            item,
            trigger,
        };
        debug!(value = %event.value, ?trigger, "suggestion selected");
        (self.on_select)(&event);
        for listener in &mut self.listeners {
            listener(&event);
        }
        true
    }

    /// Recomputes the anchor of panel `i` below its field.
    pub(super) fn position(&mut self, i: usize) {
        let inst = &mut self.instances[i];
        let Some(field) = self.document.field(inst.field) else {
            return;
        };
        let rect = field.rect();
        let (scroll_x, scroll_y) = self.document.scroll();
        inst.panel.place(
            rect.left + scroll_x + self.config.offset_left,
            rect.bottom() + scroll_y + self.config.offset_top,
            rect.width,
        );
    }

    /// Positions and shows panel `i`, scrolling to `target` (or to the top).
    pub(super) fn show(&mut self, i: usize, target: Option<usize>) {
        self.position(i);
        let max_height = self.config.max_height;
        let panel = &mut self.instances[i].panel;
        panel.set_visible(true);
        panel.measure(max_height);
        panel.scroll_to(target);
    }

    pub(super) fn schedule_settle(
        &self,
        i: usize,
        tag: usize,
        action: SettleAction,
        delay: Duration,
    ) -> Cmd {
        let id = self.instances[i].id;
        bubbletea_tick(delay, move |_| Box::new(SettleMsg { id, tag, action }) as Msg)
    }

    pub(super) fn field_value(&self, i: usize) -> String {
        self.document
            .field(self.instances[i].field)
            .map(|f| f.value().to_string())
            .unwrap_or_default()
    }

    pub(super) fn instance_for_field(&self, field: FieldId) -> Option<usize> {
        self.instances.iter().position(|inst| inst.field == field)
    }

    pub(super) fn instance_by_id(&self, id: usize) -> Option<usize> {
        self.instances.iter().position(|inst| inst.id == id)
    }

    pub(super) fn instance_for_panel(&self, panel: PanelId) -> Option<usize> {
        self.instances
            .iter()
            .position(|inst| inst.panel.id() == panel)
    }

    fn active_instance(&self) -> Option<usize> {
        self.instance_for_field(self.document.active()?)
    }
}

fn resolve(targets: &Targets, document: &Document) -> Vec<FieldId> {
    if !document.is_queryable() {
        debug!("document cannot run selector queries; nothing bound");
        return Vec::new();
    }
    match targets {
        Targets::Fields(fields) => fields
            .iter()
            .copied()
            .filter(|f| document.field(*f).is_some())
            .collect(),
        Targets::Selector(s) => {
            let selector = match Selector::parse(s) {
                Ok(selector) => selector,
                Err(err) => {
                    debug!(%err, "autocomplete target selector rejected");
                    return Vec::new();
                }
            };
            document.query_selector_all(&selector).unwrap_or_default()
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(
            Options::new(Targets::Fields(Vec::new()), StaticSource::default()),
            Document::new(),
        )
    }
}

impl BubbleTeaModel for Engine {
    fn init() -> (Self, Option<Cmd>) {
        (Engine::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

impl Component for Engine {
    fn focus(&mut self) -> Option<Cmd> {
        let field = self.instances.first()?.field;
        self.document.focus(field);
        self.focus_field(0)
    }

    fn blur(&mut self) {
        // No command can be returned here, so a hover refocus is not possible.
        if let Some(i) = self.active_instance() {
            self.document.blur();
            self.close(i);
        }
    }

    fn focused(&self) -> bool {
        self.active_instance().is_some()
    }
}
