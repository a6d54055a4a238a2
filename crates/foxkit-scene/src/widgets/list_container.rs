use std::any::Any;

use foxkit_core::shapes::{BorderStyle, BorderWidths, RectStyle, draw_rectangle};
use foxkit_core::{Brush, Canvas, Rect, RoundedRect};

use crate::input::{EventResult, InputEvent, MouseButton};
use crate::widget::{EventCtx, PaintCtx, SignalKind, Widget};
use crate::widgets::ListBox;

/// Scrollable, single-selection list of [`ListBox`] rows.
///
/// The scroll offset is re-clamped inside every mutating operation, so
/// `0 <= offset <= max(0, content_height - viewport_height)` holds after
/// each call, including add/remove while scrolled to the bottom. Selection
/// is stored as an index only; rows carry no selected flag.
pub struct ListContainer {
    rect: Rect,
    rows: Vec<ListBox>,
    row_height: f32,
    gap: f32,
    padding: f32,
    text_size: f32,
    scroll: f32,
    selected: Option<usize>,
    hovered_row: Option<usize>,
    visible: bool,
    enabled: bool,
}

impl ListContainer {
    pub fn new(rect: Rect) -> ListContainer {
        ListContainer {
            rect,
            rows: Vec::new(),
            row_height: 28.0,
            gap: 4.0,
            padding: 6.0,
            text_size: 14.0,
            scroll: 0.0,
            selected: None,
            hovered_row: None,
            visible: true,
            enabled: true,
        }
    }

    pub fn with_row_height(mut self, row_height: f32) -> ListContainer {
        self.row_height = row_height;
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ListBox] {
        &self.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&ListBox> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll
    }

    pub fn content_height(&self) -> f32 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let n = self.rows.len() as f32;
        self.padding * 2.0 + n * self.row_height + (n - 1.0) * self.gap
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.rect.h).max(0.0)
    }

    /// Append a row. Returns its index.
    pub fn add(&mut self, row: ListBox) -> usize {
        self.rows.push(row);
        self.clamp_scroll();
        self.rows.len() - 1
    }

    /// Remove the row at `index`. Removing the selected row clears the
    /// selection; removing an earlier row shifts the selection down so it
    /// keeps naming the same row.
    pub fn remove(&mut self, index: usize) -> Option<ListBox> {
        if index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        self.hovered_row = None;
        self.clamp_scroll();
        Some(row)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.selected = None;
        self.hovered_row = None;
        self.scroll = 0.0;
    }

    /// Programmatic selection. Out-of-bounds indices clear the selection.
    pub fn select(&mut self, index: usize) {
        self.selected = (index < self.rows.len()).then_some(index);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll += delta;
        self.clamp_scroll();
    }

    /// Scroll so the row at `index` is fully visible.
    pub fn scroll_to(&mut self, index: usize) {
        if index >= self.rows.len() {
            return;
        }
        let top = self.padding + index as f32 * (self.row_height + self.gap);
        let bottom = top + self.row_height;
        if top - self.padding < self.scroll {
            self.scroll = top - self.padding;
        } else if bottom + self.padding > self.scroll + self.rect.h {
            self.scroll = bottom + self.padding - self.rect.h;
        }
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    fn row_rect(&self, index: usize) -> Rect {
        let y = self.rect.y + self.padding + index as f32 * (self.row_height + self.gap)
            - self.scroll;
        Rect::new(
            self.rect.x + self.padding,
            y,
            self.rect.w - self.padding * 2.0 - self.scrollbar_inset(),
            self.row_height,
        )
    }

    fn scrollbar_inset(&self) -> f32 {
        if self.max_scroll() > 0.0 { 8.0 } else { 0.0 }
    }

    fn row_at(&self, x: f32, y: f32) -> Option<usize> {
        if !self.rect.contains(x, y) {
            return None;
        }
        (0..self.rows.len()).find(|&i| self.row_rect(i).contains(x, y))
    }
}

impl Widget for ListContainer {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
        self.clamp_scroll();
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.hovered_row = None;
        }
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.hovered_row = None;
        }
    }

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut EventCtx<'_>) -> EventResult {
        match *event {
            InputEvent::Wheel { x, y, delta_y } => {
                if self.rect.contains(x, y) {
                    self.scroll_by(-delta_y);
                    return EventResult::Handled;
                }
                EventResult::Ignored
            }
            InputEvent::PointerMoved { x, y } => {
                self.hovered_row = self.row_at(x, y);
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
                if let Some(index) = self.row_at(x, y) {
                    let on_remove = self.rows[index]
                        .remove_rect(self.row_rect(index))
                        .is_some_and(|r| r.contains(x, y));
                    if on_remove {
                        self.remove(index);
                        ctx.emit(SignalKind::RowRemoved(index));
                    } else {
                        self.select(index);
                        ctx.emit(SignalKind::RowSelected(index));
                    }
                }
                EventResult::Handled
            }
            _ => EventResult::Ignored,
        }
    }

    fn draw(&self, canvas: &mut Canvas, ctx: &PaintCtx<'_>, z: i32) {
        let style = RectStyle {
            fill: Some(Brush::Solid(ctx.palette.panel)),
            border: Some(BorderStyle {
                widths: BorderWidths::uniform(1.0),
                brush: Brush::Solid(ctx.palette.panel_border),
            }),
        };
        draw_rectangle(canvas, self.rect, &style, z);

        canvas.push_clip_rect(self.rect);
        for (i, row) in self.rows.iter().enumerate() {
            let row_rect = self.row_rect(i);
            if row_rect.bottom() < self.rect.y || row_rect.y > self.rect.bottom() {
                continue;
            }
            row.draw_row(
                canvas,
                ctx,
                row_rect,
                self.text_size,
                self.selected == Some(i),
                self.hovered_row == Some(i),
                z + 4,
            );
        }
        canvas.pop_clip();

        let max_scroll = self.max_scroll();
        if max_scroll > 0.0 {
            let track_x = self.rect.right() - 6.0;
            let track = Rect::new(track_x, self.rect.y + 2.0, 4.0, self.rect.h - 4.0);
            let thumb_h = (track.h * self.rect.h / self.content_height()).max(16.0);
            let thumb_y = track.y + (track.h - thumb_h) * (self.scroll / max_scroll);
            canvas.rounded_rect(
                RoundedRect::uniform(track, 2.0),
                Brush::Solid(ctx.palette.button.normal),
                z + 10,
            );
            canvas.rounded_rect(
                RoundedRect::uniform(Rect::new(track.x, thumb_y, track.w, thumb_h), 2.0),
                Brush::Solid(ctx.palette.accent),
                z + 11,
            );
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foxkit_text::{MemoryClipboard, MonoMeasure};

    fn container_with(labels: &[&str]) -> ListContainer {
        let mut list = ListContainer::new(Rect::new(0.0, 0.0, 200.0, 100.0));
        for label in labels {
            list.add(ListBox::new(*label));
        }
        list
    }

    fn scroll_in_bounds(list: &ListContainer) -> bool {
        list.scroll_offset() >= 0.0 && list.scroll_offset() <= list.max_scroll()
    }

    #[test]
    fn scroll_offset_stays_clamped_through_mutations() {
        let mut list = container_with(&[]);
        for i in 0..20 {
            list.add(ListBox::new(format!("row {i}")));
            assert!(scroll_in_bounds(&list));
        }
        list.scroll_by(10_000.0);
        assert_eq!(list.scroll_offset(), list.max_scroll());

        // Removing rows while pinned to the bottom must re-clamp.
        while list.len() > 0 {
            list.remove(list.len() - 1);
            assert!(scroll_in_bounds(&list), "offset out of bounds at len {}", list.len());
        }
        assert_eq!(list.scroll_offset(), 0.0);

        list.scroll_by(-50.0);
        assert_eq!(list.scroll_offset(), 0.0);
    }

    #[test]
    fn removing_selected_row_clears_selection() {
        let mut list = container_with(&["A", "B", "C"]);
        list.select(1);
        assert_eq!(list.selected(), Some(1));
        list.remove(1);
        assert_eq!(list.selected(), None);
        let labels: Vec<&str> = list.rows().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["A", "C"]);
    }

    #[test]
    fn removing_earlier_row_shifts_selection() {
        let mut list = container_with(&["A", "B", "C"]);
        list.select(2);
        list.remove(0);
        assert_eq!(list.selected(), Some(1));
        assert_eq!(list.selected_row().unwrap().label, "C");
    }

    #[test]
    fn select_out_of_bounds_clears() {
        let mut list = container_with(&["A"]);
        list.select(0);
        list.select(5);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn click_selects_row_and_emits() {
        let mut list = container_with(&["A", "B", "C"]);
        let measure = MonoMeasure::default();
        let mut clip = MemoryClipboard::new();
        let mut ctx = EventCtx::new(&measure, &mut clip);
        // Second row: padding 6 + one row (28) + gap (4) => y in [38, 66).
        let ev = InputEvent::PointerPressed {
            x: 20.0,
            y: 40.0,
            button: MouseButton::Left,
        };
        assert!(list.handle_event(&ev, &mut ctx).is_handled());
        assert_eq!(list.selected(), Some(1));
        assert_eq!(ctx.signals().len(), 1);
        assert_eq!(ctx.signals()[0].kind, SignalKind::RowSelected(1));
    }

    #[test]
    fn click_on_remove_affordance_removes_row() {
        let mut list = container_with(&[]);
        list.add(ListBox::new("keep"));
        list.add(ListBox::new("drop").removable());
        let x_rect = list.rows()[1].remove_rect(list.row_rect(1)).unwrap();
        let [cx, cy] = x_rect.center();
        let measure = MonoMeasure::default();
        let mut clip = MemoryClipboard::new();
        let mut ctx = EventCtx::new(&measure, &mut clip);
        let ev = InputEvent::PointerPressed {
            x: cx,
            y: cy,
            button: MouseButton::Left,
        };
        list.handle_event(&ev, &mut ctx);
        assert_eq!(list.len(), 1);
        assert_eq!(list.rows()[0].label, "keep");
        assert_eq!(ctx.signals()[0].kind, SignalKind::RowRemoved(1));
    }

    #[test]
    fn wheel_scrolls_only_inside_bounds() {
        let mut list = container_with(&[]);
        for i in 0..20 {
            list.add(ListBox::new(format!("row {i}")));
        }
        let measure = MonoMeasure::default();
        let mut clip = MemoryClipboard::new();
        let mut ctx = EventCtx::new(&measure, &mut clip);
        let inside = InputEvent::Wheel {
            x: 50.0,
            y: 50.0,
            delta_y: -30.0,
        };
        assert!(list.handle_event(&inside, &mut ctx).is_handled());
        assert_eq!(list.scroll_offset(), 30.0);

        let outside = InputEvent::Wheel {
            x: 500.0,
            y: 500.0,
            delta_y: -30.0,
        };
        assert!(!list.handle_event(&outside, &mut ctx).is_handled());
        assert_eq!(list.scroll_offset(), 30.0);
    }

    #[test]
    fn scroll_to_brings_row_into_view() {
        let mut list = container_with(&[]);
        for i in 0..20 {
            list.add(ListBox::new(format!("row {i}")));
        }
        list.scroll_to(19);
        let rect = list.row_rect(19);
        assert!(rect.y >= list.rect().y);
        assert!(rect.bottom() <= list.rect().bottom());
        list.scroll_to(0);
        assert_eq!(list.scroll_offset(), 0.0);
    }
}
