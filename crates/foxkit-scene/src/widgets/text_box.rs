use std::any::Any;

use foxkit_core::{Brush, Canvas, Path, Rect, RoundedRect};
use foxkit_text::{TextMeasure, next_grapheme_boundary, prev_grapheme_boundary};
use unicode_segmentation::UnicodeSegmentation;

use crate::input::{EventResult, InputEvent, Key, MouseButton};
use crate::widget::{EventCtx, PaintCtx, SignalKind, Widget};

const BLINK_PERIOD: f32 = 1.0;
const MASK_CHAR: char = '\u{2022}';

/// Single-line editable text field with caret, selection, horizontal
/// scrolling, and clipboard shortcuts.
///
/// The caret is a byte index into the buffer, always on a grapheme cluster
/// boundary in `[0, len]`. The selection anchor obeys the same bounds; a
/// selection exists whenever the anchor differs from the caret.
pub struct TextBox {
    rect: Rect,
    buffer: String,
    caret: usize,
    anchor: Option<usize>,
    scroll_x: f32,
    placeholder: String,
    password: bool,
    max_graphemes: Option<usize>,
    text_size: f32,
    pad_x: f32,
    focused: bool,
    hovered: bool,
    blink: f32,
    visible: bool,
    enabled: bool,
}

impl TextBox {
    pub fn new(rect: Rect) -> TextBox {
        TextBox {
            rect,
            buffer: String::new(),
            caret: 0,
            anchor: None,
            scroll_x: 0.0,
            placeholder: String::new(),
            password: false,
            max_graphemes: None,
            text_size: 16.0,
            pad_x: 8.0,
            focused: false,
            hovered: false,
            blink: 0.0,
            visible: true,
            enabled: true,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> TextBox {
        self.placeholder = placeholder.into();
        self
    }

    /// Render the buffer as mask characters. Clipboard copy/cut are
    /// disabled for masked fields.
    pub fn password(mut self) -> TextBox {
        self.password = true;
        self
    }

    pub fn with_max_graphemes(mut self, max: usize) -> TextBox {
        self.max_graphemes = Some(max);
        self
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.caret = self.buffer.len();
        self.anchor = None;
        self.scroll_x = 0.0;
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Selection as an ordered byte range, when non-empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.caret {
            return None;
        }
        Some((anchor.min(self.caret), anchor.max(self.caret)))
    }

    pub fn select_all(&mut self) {
        self.anchor = Some(0);
        self.caret = self.buffer.len();
    }

    /// Insert at the caret, replacing the selection if one exists. Control
    /// characters are dropped; the grapheme cap is enforced.
    pub fn insert_str(&mut self, text: &str) {
        let clean: String = text.chars().filter(|ch| !ch.is_control()).collect();
        if clean.is_empty() {
            return;
        }
        self.delete_selection();
        let mut budget = self.max_graphemes.map(|max| {
            let current = self.buffer.graphemes(true).count();
            max.saturating_sub(current)
        });
        let mut accepted = String::new();
        for g in clean.graphemes(true) {
            if let Some(b) = budget.as_mut() {
                if *b == 0 {
                    break;
                }
                *b -= 1;
            }
            accepted.push_str(g);
        }
        self.buffer.insert_str(self.caret, &accepted);
        self.caret += accepted.len();
        self.blink = 0.0;
    }

    /// Delete the selection, or the grapheme before the caret.
    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        let prev = prev_grapheme_boundary(&self.buffer, self.caret);
        if prev < self.caret {
            self.buffer.drain(prev..self.caret);
            self.caret = prev;
        }
        self.blink = 0.0;
    }

    /// Delete the selection, or the grapheme after the caret.
    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let next = next_grapheme_boundary(&self.buffer, self.caret);
        if next > self.caret {
            self.buffer.drain(self.caret..next);
        }
        self.blink = 0.0;
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend {
            if let Some((start, _)) = self.selection() {
                self.caret = start;
                self.anchor = None;
                return;
            }
        }
        self.ensure_anchor(extend);
        self.caret = prev_grapheme_boundary(&self.buffer, self.caret);
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend {
            if let Some((_, end)) = self.selection() {
                self.caret = end;
                self.anchor = None;
                return;
            }
        }
        self.ensure_anchor(extend);
        self.caret = next_grapheme_boundary(&self.buffer, self.caret);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.ensure_anchor(extend);
        self.caret = 0;
    }

    pub fn move_end(&mut self, extend: bool) {
        self.ensure_anchor(extend);
        self.caret = self.buffer.len();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn ensure_anchor(&mut self, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.caret);
            }
        } else {
            self.anchor = None;
        }
        self.blink = 0.0;
    }

    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            self.anchor = None;
            return false;
        };
        self.buffer.drain(start..end);
        self.caret = start;
        self.anchor = None;
        self.blink = 0.0;
        true
    }

    fn selected_text(&self) -> Option<&str> {
        self.selection().map(|(start, end)| &self.buffer[start..end])
    }

    /// Buffer as displayed: masked fields show one mask char per grapheme.
    fn display_text(&self) -> String {
        if self.password {
            self.buffer
                .graphemes(true)
                .map(|_| MASK_CHAR)
                .collect()
        } else {
            self.buffer.clone()
        }
    }

    /// Map a byte index in the buffer to the matching byte index in the
    /// display text. Identity for unmasked fields.
    fn display_index(&self, buffer_index: usize) -> usize {
        if !self.password {
            return buffer_index;
        }
        let graphemes_before = self.buffer[..buffer_index].graphemes(true).count();
        graphemes_before * MASK_CHAR.len_utf8()
    }

    fn caret_from_pointer(&self, measure: &dyn TextMeasure, x: f32) -> usize {
        let local = x - (self.rect.x + self.pad_x) + self.scroll_x;
        let display = self.display_text();
        let display_idx = measure.caret_index_for_x(&display, self.text_size, local);
        if !self.password {
            return display_idx.min(self.buffer.len());
        }
        // Mask chars are fixed-width; each stands for one buffer grapheme.
        let nth = display_idx / MASK_CHAR.len_utf8();
        let mut boundary = 0;
        for _ in 0..nth {
            boundary = next_grapheme_boundary(&self.buffer, boundary);
        }
        boundary
    }

    fn inner_width(&self) -> f32 {
        (self.rect.w - self.pad_x * 2.0).max(0.0)
    }

    /// Keep the caret inside the visible window, then clamp the window to
    /// the text extent.
    fn ensure_caret_visible(&mut self, measure: &dyn TextMeasure) {
        let display = self.display_text();
        let caret_x = measure.width(&display[..self.display_index(self.caret)], self.text_size);
        let inner = self.inner_width();
        if caret_x - self.scroll_x < 0.0 {
            self.scroll_x = caret_x;
        } else if caret_x - self.scroll_x > inner {
            self.scroll_x = caret_x - inner;
        }
        let full = measure.width(&display, self.text_size);
        self.scroll_x = self.scroll_x.clamp(0.0, (full - inner).max(0.0));
    }

    fn handle_key(&mut self, key: Key, shift: bool, command: bool, ctx: &mut EventCtx<'_>) -> EventResult {
        if command {
            match key {
                Key::Char('a') | Key::Char('A') => {
                    self.select_all();
                    return EventResult::Handled;
                }
                Key::Char('c') | Key::Char('C') => {
                    if !self.password {
                        if let Some(sel) = self.selected_text() {
                            let sel = sel.to_string();
                            if let Err(err) = ctx.clipboard.write(&sel) {
                                log::warn!("clipboard write failed: {err}");
                            }
                        }
                    }
                    return EventResult::Handled;
                }
                Key::Char('x') | Key::Char('X') => {
                    if !self.password {
                        if let Some(sel) = self.selected_text() {
                            let sel = sel.to_string();
                            if let Err(err) = ctx.clipboard.write(&sel) {
                                log::warn!("clipboard write failed: {err}");
                            }
                            self.delete_selection();
                        }
                    }
                    return EventResult::Handled;
                }
                Key::Char('v') | Key::Char('V') => {
                    match ctx.clipboard.read() {
                        Ok(pasted) => self.insert_str(&pasted),
                        Err(err) => log::warn!("clipboard read failed: {err}"),
                    }
                    return EventResult::Handled;
                }
                _ => return EventResult::Ignored,
            }
        }
        match key {
            Key::Char(ch) => {
                let mut tmp = [0u8; 4];
                self.insert_str(ch.encode_utf8(&mut tmp));
                EventResult::Handled
            }
            Key::Backspace => {
                self.backspace();
                EventResult::Handled
            }
            Key::Delete => {
                self.delete_forward();
                EventResult::Handled
            }
            Key::ArrowLeft => {
                self.move_left(shift);
                EventResult::Handled
            }
            Key::ArrowRight => {
                self.move_right(shift);
                EventResult::Handled
            }
            Key::Home => {
                self.move_home(shift);
                EventResult::Handled
            }
            Key::End => {
                self.move_end(shift);
                EventResult::Handled
            }
            Key::Enter => {
                ctx.emit(SignalKind::Submitted);
                EventResult::Handled
            }
            Key::Escape => {
                self.anchor = None;
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }
}

impl Widget for TextBox {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.hovered = false;
        }
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.hovered = false;
        }
    }

    fn focusable(&self) -> bool {
        true
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        if focused && !self.focused {
            self.blink = 0.0;
        }
        self.focused = focused;
        if !focused {
            self.anchor = None;
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut EventCtx<'_>) -> EventResult {
        match *event {
            InputEvent::PointerMoved { x, y } => {
                self.hovered = self.rect.contains(x, y);
                EventResult::Ignored
            }
            InputEvent::PointerPressed {
                x,
                y,
                button: MouseButton::Left,
            } => {
                if !self.rect.contains(x, y) {
                    return EventResult::Ignored;
                }
                self.caret = self.caret_from_pointer(ctx.measure, x);
                self.anchor = None;
                self.blink = 0.0;
                self.ensure_caret_visible(ctx.measure);
                EventResult::Handled
            }
            InputEvent::KeyPressed { key, modifiers } => {
                if !self.focused {
                    return EventResult::Ignored;
                }
                let result = self.handle_key(key, modifiers.shift, modifiers.command(), ctx);
                if result.is_handled() {
                    self.ensure_caret_visible(ctx.measure);
                }
                result
            }
            _ => EventResult::Ignored,
        }
    }

    fn update(&mut self, dt: f32) {
        if self.focused {
            self.blink = (self.blink + dt) % BLINK_PERIOD;
        }
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &PaintCtx<'_>, z: i32) {
        let rrect = RoundedRect::uniform(self.rect, 5.0);
        canvas.rounded_rect(rrect, Brush::Solid(ctx.palette.panel), z);
        let border = if self.focused {
            ctx.palette.accent
        } else if self.hovered {
            ctx.palette.text_muted
        } else {
            ctx.palette.panel_border
        };
        canvas.stroke_rounded_rect(rrect, if self.focused { 2.0 } else { 1.0 }, Brush::Solid(border), z + 1);

        let inner = Rect::new(
            self.rect.x + self.pad_x,
            self.rect.y,
            self.inner_width(),
            self.rect.h,
        );
        canvas.push_clip_rect(inner);

        let display = self.display_text();
        let base_x = inner.x - self.scroll_x;
        let base_y = self.rect.y + self.rect.h * 0.5 + self.text_size * 0.35;

        if let Some((start, end)) = self.selection() {
            let x0 = ctx
                .measure
                .width(&display[..self.display_index(start)], self.text_size);
            let x1 = ctx
                .measure
                .width(&display[..self.display_index(end)], self.text_size);
            canvas.fill_rect(
                base_x + x0,
                self.rect.y + 4.0,
                x1 - x0,
                self.rect.h - 8.0,
                Brush::Solid(ctx.palette.selection),
                z + 2,
            );
        }

        if display.is_empty() {
            if !self.placeholder.is_empty() {
                canvas.draw_text_run(
                    [inner.x, base_y],
                    self.placeholder.clone(),
                    self.text_size,
                    ctx.palette.text_muted,
                    z + 3,
                );
            }
        } else {
            canvas.draw_text_run([base_x, base_y], display.clone(), self.text_size, ctx.palette.text, z + 3);
        }

        if self.focused && self.blink < BLINK_PERIOD * 0.5 {
            let caret_x =
                base_x + ctx.measure.width(&display[..self.display_index(self.caret)], self.text_size);
            let caret = Path::line(
                [caret_x, self.rect.y + 4.0],
                [caret_x, self.rect.bottom() - 4.0],
            );
            canvas.stroke_path(caret, 1.5, ctx.palette.text, z + 4);
        }

        canvas.pop_clip();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
