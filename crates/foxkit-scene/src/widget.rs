//! The widget contract and the contexts widgets see during events and drawing.

use std::any::Any;

use foxkit_core::{Canvas, Rect};
use foxkit_text::{Clipboard, TextMeasure};

use crate::input::{EventResult, InputEvent};
use crate::theme::Palette;

/// Stable handle to a widget inside a [`crate::widget_set::WidgetSet`].
/// Handles are never reused within one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u32);

impl WidgetId {
    /// Placeholder id used when a widget is driven outside a set, e.g. in
    /// unit tests.
    pub const DETACHED: WidgetId = WidgetId(0);
}

/// What a widget announces, paired with the widget that announced it.
/// Scenes drain these after routing an event instead of wiring callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub source: WidgetId,
    pub kind: SignalKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignalKind {
    /// A button completed a press-release cycle inside its bounds.
    Clicked,
    /// A tab bar switched to the tab at this index.
    TabChanged(usize),
    /// A list row at this index became the selection.
    RowSelected(usize),
    /// The row that was at this index was removed.
    RowRemoved(usize),
    /// Enter was pressed in a focused text box.
    Submitted,
}

/// Context handed to widgets while an event is routed. Carries the text
/// measurement and clipboard services plus the signal queue.
pub struct EventCtx<'a> {
    pub measure: &'a dyn TextMeasure,
    pub clipboard: &'a mut dyn Clipboard,
    current: WidgetId,
    signals: Vec<Signal>,
}

impl<'a> EventCtx<'a> {
    pub fn new(measure: &'a dyn TextMeasure, clipboard: &'a mut dyn Clipboard) -> EventCtx<'a> {
        EventCtx {
            measure,
            clipboard,
            current: WidgetId::DETACHED,
            signals: Vec::new(),
        }
    }

    pub(crate) fn set_current(&mut self, id: WidgetId) {
        self.current = id;
    }

    /// Queue a signal attributed to the widget currently being dispatched.
    pub fn emit(&mut self, kind: SignalKind) {
        self.signals.push(Signal {
            source: self.current,
            kind,
        });
    }

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }
}

/// Context handed to widgets while drawing. Drawing never mutates widget
/// or app state.
pub struct PaintCtx<'a> {
    pub palette: &'a Palette,
    pub measure: &'a dyn TextMeasure,
}

/// The base contract every interactive element implements.
///
/// Widgets are retained: they hold their own geometry and interaction state
/// and re-describe themselves into the display list every frame.
pub trait Widget: Any {
    fn rect(&self) -> Rect;
    fn set_rect(&mut self, rect: Rect);

    fn visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);

    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);

    /// Whether this widget participates in keyboard focus.
    fn focusable(&self) -> bool {
        false
    }

    fn is_focused(&self) -> bool {
        false
    }

    fn set_focused(&mut self, _focused: bool) {}

    /// Hit test in logical coordinates. The default is the bounding rect;
    /// widgets with non-rectangular hot areas override this.
    fn contains_point(&self, x: f32, y: f32) -> bool {
        self.rect().contains(x, y)
    }

    fn handle_event(&mut self, _event: &InputEvent, _ctx: &mut EventCtx<'_>) -> EventResult {
        EventResult::Ignored
    }

    fn update(&mut self, _dt: f32) {}

    fn draw(&self, canvas: &mut Canvas, ctx: &PaintCtx<'_>, z: i32);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
