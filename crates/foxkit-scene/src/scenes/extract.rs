use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use foxkit_core::shapes::draw_progress_bar;
use foxkit_core::{Canvas, Rect};
use foxkit_io::{
    ExtractFormat, ExtractionEvent, ExtractionJob, ExtractionRequest, ThreadExtractor,
};

use crate::background::{BackgroundSystem, SolidLayer};
use crate::input::{EventResult, InputEvent};
use crate::scene::{Scene, SceneServices};
use crate::scenes::{self, MAIN_SCENE};
use crate::widget::{SignalKind, WidgetId};
use crate::widget_set::WidgetSet;
use crate::widgets::{Button, LabelBox, ListBox, ListContainer, TabBar, TextBox};

/// Media extraction screen: URL entry, format choice, one job at a time,
/// progress polled from the worker once per frame.
pub struct ExtractScene {
    widgets: WidgetSet,
    background: BackgroundSystem,
    url: WidgetId,
    format_tabs: WidgetId,
    start: WidgetId,
    cancel: WidgetId,
    back: WidgetId,
    status: WidgetId,
    completed: WidgetId,
    format: ExtractFormat,
    job: Option<ExtractionJob>,
    progress: f32,
    progress_rect: Rect,
}

impl ExtractScene {
    pub fn new() -> ExtractScene {
        ExtractScene {
            widgets: WidgetSet::new(),
            background: BackgroundSystem::new(),
            url: WidgetId::DETACHED,
            format_tabs: WidgetId::DETACHED,
            start: WidgetId::DETACHED,
            cancel: WidgetId::DETACHED,
            back: WidgetId::DETACHED,
            status: WidgetId::DETACHED,
            completed: WidgetId::DETACHED,
            format: ExtractFormat::Mp3,
            job: None,
            progress: 0.0,
            progress_rect: Rect::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    fn set_status(&mut self, text: impl Into<String>) {
        if let Some(status) = self.widgets.get_mut::<LabelBox>(self.status) {
            status.set_text(text);
        }
    }

    fn set_running(&mut self, running: bool) {
        self.widgets.set_enabled(self.start, !running);
        self.widgets.set_enabled(self.cancel, running);
    }

    fn start_job(&mut self, services: &mut SceneServices<'_>) {
        if self.job.is_some() {
            return;
        }
        let url = self
            .widgets
            .get::<TextBox>(self.url)
            .map(|tb| tb.text().trim().to_string())
            .unwrap_or_default();
        if url.is_empty() {
            self.set_status("Enter a source URL first");
            return;
        }
        let request = ExtractionRequest {
            source_url: url.clone(),
            output_dir: PathBuf::from(&services.config.extract.output_dir),
            format: self.format,
        };
        log::info!("extraction started: {url} as {}", self.format.label());
        self.job = Some(services.extractor.spawn(request));
        self.progress = 0.0;
        self.set_running(true);
        self.set_status(format!("Extracting {url}"));
    }

    fn cancel_job(&mut self) {
        if let Some(mut job) = self.job.take() {
            job.cancel();
            self.progress = 0.0;
            self.set_running(false);
            self.set_status("Cancelled");
        }
    }

    fn finish_job(&mut self, services: &mut SceneServices<'_>, outcome: ExtractionEvent) {
        match outcome {
            ExtractionEvent::Done(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string_lossy().into_owned());
                services.user_state.push_recent(&name);
                if let Some(list) = self.widgets.get_mut::<ListContainer>(self.completed) {
                    let index = list.add(ListBox::new(name.clone()).removable());
                    list.scroll_to(index);
                }
                self.progress = 1.0;
                self.set_status(format!("Saved {name}"));
            }
            ExtractionEvent::Failed(reason) => {
                log::warn!("extraction failed: {reason}");
                self.progress = 0.0;
                self.set_status(format!("Failed: {reason}"));
            }
            ExtractionEvent::Progress(_) => unreachable!("terminal event expected"),
        }
        self.job = None;
        self.set_running(false);
    }
}

impl Scene for ExtractScene {
    fn on_enter(&mut self, services: &mut SceneServices<'_>) -> Result<()> {
        self.background.push(SolidLayer::themed());

        let w = services.viewport.width as f32;
        let margin = 48.0;
        let content_w = w - margin * 2.0;
        let left_w = content_w * 0.55;

        self.widgets.insert(
            LabelBox::new(Rect::new(margin, 28.0, content_w, 36.0), "Extractor")
                .with_text_size(24.0),
        );
        self.url = self.widgets.insert(
            TextBox::new(Rect::new(margin, 90.0, left_w, 36.0))
                .with_placeholder("Source URL"),
        );
        self.format_tabs = self.widgets.insert(TabBar::new(
            Rect::new(margin, 138.0, 180.0, 32.0),
            vec![
                ExtractFormat::Mp3.label().to_string(),
                ExtractFormat::Mp4.label().to_string(),
            ],
        ));
        self.start = self
            .widgets
            .insert(Button::new(Rect::new(margin, 184.0, 120.0, 38.0), "Start"));
        self.cancel = self.widgets.insert(Button::new(
            Rect::new(margin + 132.0, 184.0, 120.0, 38.0),
            "Cancel",
        ));
        self.back = self.widgets.insert(Button::new(
            Rect::new(margin + 264.0, 184.0, 120.0, 38.0),
            "Back",
        ));
        self.progress_rect = Rect::new(margin, 238.0, left_w, 18.0);
        self.status = self.widgets.insert(
            LabelBox::new(Rect::new(margin, 264.0, left_w, 20.0), "Idle")
                .with_text_size(13.0)
                .muted(),
        );
        self.completed = self.widgets.insert(
            ListContainer::new(Rect::new(
                margin + left_w + 24.0,
                90.0,
                content_w - left_w - 24.0,
                420.0,
            ))
            .with_row_height(28.0),
        );

        self.widgets.set_enabled(self.cancel, false);
        self.widgets.set_focus(self.url);
        Ok(())
    }

    fn on_exit(&mut self, _services: &mut SceneServices<'_>) -> Result<()> {
        // Leaving the screen abandons the job.
        self.cancel_job();
        Ok(())
    }

    fn handle_event(
        &mut self,
        event: &InputEvent,
        services: &mut SceneServices<'_>,
    ) -> Result<EventResult> {
        let (result, signals) = scenes::route_widgets(&mut self.widgets, event, services);
        for signal in signals {
            match signal.kind {
                SignalKind::Clicked if signal.source == self.start => {
                    self.start_job(services);
                }
                SignalKind::Submitted if signal.source == self.url => {
                    self.start_job(services);
                }
                SignalKind::Clicked if signal.source == self.cancel => {
                    self.cancel_job();
                }
                SignalKind::Clicked if signal.source == self.back => {
                    services.request_transition(MAIN_SCENE);
                }
                SignalKind::TabChanged(index) if signal.source == self.format_tabs => {
                    self.format = match index {
                        1 => ExtractFormat::Mp4,
                        _ => ExtractFormat::Mp3,
                    };
                }
                _ => {}
            }
        }
        Ok(result)
    }

    fn update(&mut self, dt: f32, services: &mut SceneServices<'_>) -> Result<()> {
        self.background.update(dt);
        self.widgets.update_all(dt);

        let events = match self.job.as_mut() {
            Some(job) => job.poll(),
            None => Vec::new(),
        };
        for event in events {
            match event {
                ExtractionEvent::Progress(fraction) => {
                    self.progress = fraction;
                    self.set_status(format!("Extracting {:.0}%", fraction * 100.0));
                }
                terminal => self.finish_job(services, terminal),
            }
        }
        Ok(())
    }

    fn draw(&mut self, canvas: &mut Canvas, services: &mut SceneServices<'_>) -> Result<()> {
        let ctx = scenes::paint_ctx(services);
        canvas.clear(ctx.palette.bg);
        self.background
            .draw(canvas, services.viewport, ctx.palette, 0);
        self.widgets.draw_all(canvas, &ctx);
        if self.job.is_some() || self.progress > 0.0 {
            draw_progress_bar(
                canvas,
                self.progress_rect,
                self.progress,
                ctx.palette.panel,
                ctx.palette.accent,
                ctx.palette.panel_border,
                900,
            );
        }
        Ok(())
    }
}

/// Worker used when no real extraction backend is wired in: walks progress
/// to completion on a timer and reports a file named after the request.
pub fn simulated_extractor() -> ThreadExtractor {
    ThreadExtractor::new(|request, feed| {
        let steps = 20;
        for step in 1..=steps {
            if feed.is_cancelled() {
                return;
            }
            std::thread::sleep(Duration::from_millis(80));
            feed.progress(step as f32 / steps as f32);
        }
        let stem: String = request
            .source_url
            .chars()
            .rev()
            .take_while(|ch| *ch != '/')
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let stem = if stem.is_empty() { "extract".to_string() } else { stem };
        let ext = match request.format {
            ExtractFormat::Mp3 => "mp3",
            ExtractFormat::Mp4 => "mp4",
        };
        feed.done(request.output_dir.join(format!("{stem}.{ext}")));
    })
}
