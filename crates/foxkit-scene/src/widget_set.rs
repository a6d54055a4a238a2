//! Flat widget container with z-ordered drawing, hit-test routing, and
//! exclusive keyboard focus.

use foxkit_core::Canvas;

use crate::input::{EventResult, InputEvent, Key};
use crate::widget::{EventCtx, PaintCtx, Widget, WidgetId};

/// Vertical space reserved for each widget's internal layers when the set
/// assigns draw depths.
const Z_STRIDE: i32 = 16;
const Z_BASE: i32 = 100;

struct Entry {
    id: WidgetId,
    /// Stacking layer. Higher layers draw later and receive pointer events
    /// first. Ties break toward later insertion.
    z: i32,
    /// Keep calling `update` while the widget is hidden. Off by default so
    /// hidden panes stop animating.
    update_hidden: bool,
    widget: Box<dyn Widget>,
}

/// Owns the widgets of one scene. Scenes talk to widgets through the
/// [`WidgetId`] handles returned at insertion.
pub struct WidgetSet {
    entries: Vec<Entry>,
    next_id: u32,
    focus: Option<WidgetId>,
}

impl WidgetSet {
    pub fn new() -> WidgetSet {
        WidgetSet {
            entries: Vec::new(),
            next_id: 1,
            focus: None,
        }
    }

    pub fn insert(&mut self, widget: impl Widget) -> WidgetId {
        self.insert_with_z(widget, 0)
    }

    pub fn insert_with_z(&mut self, widget: impl Widget, z: i32) -> WidgetId {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            z,
            update_hidden: false,
            widget: Box::new(widget),
        });
        id
    }

    pub fn remove(&mut self, id: WidgetId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.focus == Some(id) {
            self.focus = None;
        }
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_update_hidden(&mut self, id: WidgetId, update_hidden: bool) {
        if let Some(entry) = self.entry_mut(id) {
            entry.update_hidden = update_hidden;
        }
    }

    pub fn widget(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.widget.as_ref())
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut (dyn Widget + 'static)> {
        self.entry_mut(id).map(|e| e.widget.as_mut())
    }

    /// Typed access to a widget previously inserted as `T`.
    pub fn get<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.widget(id).and_then(|w| w.as_any().downcast_ref())
    }

    pub fn get_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.widget_mut(id)
            .and_then(|w| w.as_any_mut().downcast_mut())
    }

    pub fn set_visible(&mut self, id: WidgetId, visible: bool) {
        if let Some(entry) = self.entry_mut(id) {
            entry.widget.set_visible(visible);
            if !visible && self.focus == Some(id) {
                self.blur();
            }
        }
    }

    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        if let Some(entry) = self.entry_mut(id) {
            entry.widget.set_enabled(enabled);
            if !enabled && self.focus == Some(id) {
                self.blur();
            }
        }
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Move focus to `id`, clearing it from everything else. Ignored when
    /// the target is not focusable or not interactive right now.
    pub fn set_focus(&mut self, id: WidgetId) {
        let ok = self
            .entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.widget.focusable() && e.widget.visible() && e.widget.enabled())
            .unwrap_or(false);
        if !ok {
            return;
        }
        for entry in &mut self.entries {
            entry.widget.set_focused(entry.id == id);
        }
        self.focus = Some(id);
    }

    pub fn blur(&mut self) {
        for entry in &mut self.entries {
            entry.widget.set_focused(false);
        }
        self.focus = None;
    }

    /// Advance focus to the next focusable widget in insertion order,
    /// wrapping around. No-op when nothing is focusable.
    pub fn focus_next(&mut self) {
        let candidates: Vec<WidgetId> = self
            .entries
            .iter()
            .filter(|e| e.widget.focusable() && e.widget.visible() && e.widget.enabled())
            .map(|e| e.id)
            .collect();
        if candidates.is_empty() {
            return;
        }
        let next = match self.focus.and_then(|f| candidates.iter().position(|&c| c == f)) {
            Some(pos) => candidates[(pos + 1) % candidates.len()],
            None => candidates[0],
        };
        self.set_focus(next);
    }

    /// Route one event through the set.
    ///
    /// Pointer presses first resolve focus: the topmost focusable widget
    /// under the cursor takes it, and a press anywhere else clears it.
    /// Positional events then go topmost-first until a widget handles them;
    /// pointer motion is broadcast so hover state stays consistent. Keyboard
    /// events go to the focused widget only, except Tab, which cycles focus
    /// here.
    pub fn route_event(&mut self, event: &InputEvent, ctx: &mut EventCtx<'_>) -> EventResult {
        match event {
            InputEvent::PointerPressed { x, y, .. } => {
                self.update_focus_for_press(*x, *y);
                self.dispatch_topmost_first(event, ctx)
            }
            InputEvent::PointerReleased { .. } | InputEvent::Wheel { .. } => {
                self.dispatch_topmost_first(event, ctx)
            }
            InputEvent::PointerMoved { .. } => {
                for idx in self.route_order() {
                    let entry = &mut self.entries[idx];
                    if entry.widget.visible() && entry.widget.enabled() {
                        ctx.set_current(entry.id);
                        let _ = entry.widget.handle_event(event, ctx);
                    }
                }
                EventResult::Ignored
            }
            InputEvent::KeyPressed { key, modifiers } => {
                if *key == Key::Tab && !modifiers.ctrl && !modifiers.alt {
                    self.focus_next();
                    return EventResult::Handled;
                }
                let Some(focus) = self.focus else {
                    return EventResult::Ignored;
                };
                let Some(entry) = self.entries.iter_mut().find(|e| e.id == focus) else {
                    return EventResult::Ignored;
                };
                if !entry.widget.visible() || !entry.widget.enabled() {
                    return EventResult::Ignored;
                }
                ctx.set_current(entry.id);
                entry.widget.handle_event(event, ctx)
            }
        }
    }

    pub fn update_all(&mut self, dt: f32) {
        for entry in &mut self.entries {
            if entry.widget.visible() || entry.update_hidden {
                entry.widget.update(dt);
            }
        }
    }

    /// Draw all visible widgets bottom-up. Each widget receives a depth
    /// band of [`Z_STRIDE`] values for its own layers.
    pub fn draw_all(&self, canvas: &mut Canvas, ctx: &PaintCtx<'_>) {
        for (slot, idx) in self.draw_order().into_iter().enumerate() {
            let entry = &self.entries[idx];
            if entry.widget.visible() {
                entry
                    .widget
                    .draw(canvas, ctx, Z_BASE + slot as i32 * Z_STRIDE);
            }
        }
    }

    fn entry_mut(&mut self, id: WidgetId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Indices in draw order: ascending z, insertion order within a layer.
    fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by_key(|&i| self.entries[i].z);
        order
    }

    /// Indices in routing order: topmost first.
    fn route_order(&self) -> Vec<usize> {
        let mut order = self.draw_order();
        order.reverse();
        order
    }

    fn dispatch_topmost_first(
        &mut self,
        event: &InputEvent,
        ctx: &mut EventCtx<'_>,
    ) -> EventResult {
        for idx in self.route_order() {
            let entry = &mut self.entries[idx];
            if !entry.widget.visible() || !entry.widget.enabled() {
                continue;
            }
            ctx.set_current(entry.id);
            if entry.widget.handle_event(event, ctx).is_handled() {
                return EventResult::Handled;
            }
        }
        EventResult::Ignored
    }

    fn update_focus_for_press(&mut self, x: f32, y: f32) {
        let hit = self
            .route_order()
            .into_iter()
            .map(|i| &self.entries[i])
            .find(|e| e.widget.visible() && e.widget.enabled() && e.widget.contains_point(x, y))
            .map(|e| (e.id, e.widget.focusable()));
        match hit {
            Some((id, true)) => self.set_focus(id),
            // Press on a non-focusable widget or empty space clears focus.
            _ => self.blur(),
        }
    }
}

impl Default for WidgetSet {
    fn default() -> Self {
        WidgetSet::new()
    }
}
