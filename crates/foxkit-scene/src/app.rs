//! The windowing frame loop: winit event translation, per-frame update and
//! draw, and frame submission through a [`FrameSink`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseScrollDelta, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use foxkit_config::AppConfig;
use foxkit_core::{Canvas, FrameSink, RecordingSink, Viewport};
use foxkit_io::{AssetLoader, Extractor};
use foxkit_text::{Clipboard, FontManager, FontStyle, open_clipboard, register_system_fallback};

use crate::input::{InputEvent, Key, Modifiers, MouseButton};
use crate::scene::{SceneRequests, SceneServices};
use crate::scene_db::SceneDB;
use crate::scene_manager::SceneManager;
use crate::scenes::simulated_extractor;
use crate::theme::{ThemeId, ThemeManager};

/// Map a window size onto a fixed logical design size: uniform scale to
/// fit, centered with letterbox offsets. Returns (scale, offset_x,
/// offset_y) in physical pixels.
pub fn scale_to_fit(design: Viewport, win_w: f32, win_h: f32) -> (f32, f32, f32) {
    let dw = design.width.max(1) as f32;
    let dh = design.height.max(1) as f32;
    if win_w <= 0.0 || win_h <= 0.0 {
        return (1.0, 0.0, 0.0);
    }
    let scale = (win_w / dw).min(win_h / dh);
    let off_x = (win_w - dw * scale) * 0.5;
    let off_y = (win_h - dh * scale) * 0.5;
    (scale, off_x, off_y)
}

/// Owns every framework service plus the scene manager, and drives them
/// from the winit event loop.
pub struct App {
    config: AppConfig,
    fonts: FontManager,
    theme: ThemeManager,
    clipboard: Box<dyn Clipboard>,
    assets: AssetLoader,
    user_state: foxkit_config::UserStateStore,
    extractor: Box<dyn Extractor>,
    sink: Box<dyn FrameSink>,
    manager: SceneManager,
    initial_scene: String,
}

impl App {
    pub fn new(config: AppConfig, db: SceneDB) -> Result<App> {
        let user_state = foxkit_config::UserStateStore::load()?;

        let fonts = FontManager::new();
        match &config.assets.font {
            Some(font) => {
                fonts
                    .register_file("sans", FontStyle::Regular, font)
                    .with_context(|| {
                        format!("failed to load configured font {}", font.display())
                    })?;
            }
            None => {
                if let Err(err) = register_system_fallback(&fonts, "sans") {
                    log::warn!("no usable system font found: {err}");
                }
            }
        }

        // Persisted theme choice wins over the config default.
        let theme_name = user_state.state().theme.clone();
        let theme = ThemeId::from_name(&theme_name)
            .or_else(|| ThemeId::from_name(&config.theme.name))
            .unwrap_or(ThemeId::Dark);

        let initial_scene = config.extract.initial_scene.clone();
        let assets = AssetLoader::new(&config.assets.dir);
        Ok(App {
            fonts,
            theme: ThemeManager::new(theme),
            clipboard: open_clipboard(),
            assets,
            user_state,
            extractor: Box::new(simulated_extractor()),
            sink: Box::new(RecordingSink::new()),
            manager: SceneManager::new(db),
            initial_scene,
            config,
        })
    }

    /// Replace the simulated extraction worker with a real backend.
    pub fn with_extractor(mut self, extractor: impl Extractor + 'static) -> App {
        self.extractor = Box::new(extractor);
        self
    }

    /// Replace the frame sink; this is where a rasterizer plugs in.
    pub fn with_sink(mut self, sink: impl FrameSink + 'static) -> App {
        self.sink = Box::new(sink);
        self
    }

    pub fn run(self) -> Result<()> {
        let App {
            config,
            fonts,
            mut theme,
            mut clipboard,
            assets,
            mut user_state,
            extractor,
            mut sink,
            mut manager,
            initial_scene,
        } = self;

        let viewport = Viewport {
            width: config.window.width,
            height: config.window.height,
        };
        let mut requests = SceneRequests::default();

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(
                config.window.width as f64 * config.window.ui_scale as f64,
                config.window.height as f64 * config.window.ui_scale as f64,
            ))
            .with_resizable(config.window.resizable)
            .build(&event_loop)?;

        manager.request_transition(&initial_scene);

        let mut win_size = window.inner_size();
        let mut cursor = (0.0f32, 0.0f32);
        let mut modifiers = Modifiers::default();
        let mut last_frame = Instant::now();
        let fatal: Rc<RefCell<Option<anyhow::Error>>> = Rc::new(RefCell::new(None));
        let fatal_slot = fatal.clone();

        event_loop.run(move |event, target| {
            // Fresh service borrows per loop turn.
            let mut services = SceneServices {
                viewport,
                config: &config,
                fonts: &fonts,
                theme: &mut theme,
                clipboard: &mut *clipboard,
                assets: &assets,
                user_state: &mut user_state,
                extractor: &*extractor,
                requests: &mut requests,
            };

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        if let Err(err) = services.user_state.save() {
                            log::warn!("failed to persist user state on close: {err}");
                        }
                        target.exit();
                    }
                    WindowEvent::Resized(size) => {
                        win_size = size;
                    }
                    WindowEvent::ModifiersChanged(state) => {
                        let state = state.state();
                        modifiers = Modifiers {
                            shift: state.shift_key(),
                            ctrl: state.control_key(),
                            alt: state.alt_key(),
                            cmd: state.super_key(),
                        };
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let (scale, off_x, off_y) = scale_to_fit(
                            viewport,
                            win_size.width as f32,
                            win_size.height as f32,
                        );
                        cursor = (
                            (position.x as f32 - off_x) / scale,
                            (position.y as f32 - off_y) / scale,
                        );
                        manager.handle_event(
                            &InputEvent::PointerMoved {
                                x: cursor.0,
                                y: cursor.1,
                            },
                            &mut services,
                        );
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        let Some(button) = translate_button(button) else {
                            return;
                        };
                        let event = match state {
                            ElementState::Pressed => InputEvent::PointerPressed {
                                x: cursor.0,
                                y: cursor.1,
                                button,
                            },
                            ElementState::Released => InputEvent::PointerReleased {
                                x: cursor.0,
                                y: cursor.1,
                                button,
                            },
                        };
                        manager.handle_event(&event, &mut services);
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let delta_y = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y * 20.0,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                        };
                        manager.handle_event(
                            &InputEvent::Wheel {
                                x: cursor.0,
                                y: cursor.1,
                                delta_y,
                            },
                            &mut services,
                        );
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state != ElementState::Pressed {
                            return;
                        }
                        for key in translate_key(&event, modifiers) {
                            manager.handle_event(
                                &InputEvent::KeyPressed { key, modifiers },
                                &mut services,
                            );
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let mut canvas = Canvas::new(viewport);
                        let (scale, _, _) = scale_to_fit(
                            viewport,
                            win_size.width as f32,
                            win_size.height as f32,
                        );
                        canvas.set_dpi_scale(scale);
                        manager.draw(&mut canvas, &mut services);
                        if let Err(err) = sink.submit(canvas.finish()) {
                            log::error!("frame submission failed: {err:#}");
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    let now = Instant::now();
                    let dt = (now - last_frame).as_secs_f32().min(0.25);
                    last_frame = now;

                    if let Some(name) = services.requests.take_transition() {
                        manager.request_transition(name);
                    }
                    if services.requests.quit {
                        if let Err(err) = services.user_state.save() {
                            log::warn!("failed to persist user state on quit: {err}");
                        }
                        target.exit();
                        return;
                    }
                    if let Err(err) = manager.apply_pending(&mut services) {
                        *fatal_slot.borrow_mut() = Some(err);
                        target.exit();
                        return;
                    }
                    manager.update(dt, &mut services);
                    window.request_redraw();
                }
                _ => {}
            }
        })?;

        match Rc::try_unwrap(fatal) {
            Ok(slot) => match slot.into_inner() {
                Some(err) => Err(err),
                None => Ok(()),
            },
            Err(_) => Ok(()),
        }
    }
}

fn translate_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Translate one winit key event into framework keys. Named keys map from
/// the physical code; printable input comes from the produced text. With
/// the command modifier held, letter keys map by code so shortcuts survive
/// the control-character text the platform reports.
fn translate_key(event: &winit::event::KeyEvent, modifiers: Modifiers) -> Vec<Key> {
    if let PhysicalKey::Code(code) = event.physical_key {
        let named = match code {
            KeyCode::ArrowLeft => Some(Key::ArrowLeft),
            KeyCode::ArrowRight => Some(Key::ArrowRight),
            KeyCode::ArrowUp => Some(Key::ArrowUp),
            KeyCode::ArrowDown => Some(Key::ArrowDown),
            KeyCode::Home => Some(Key::Home),
            KeyCode::End => Some(Key::End),
            KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Delete => Some(Key::Delete),
            KeyCode::Tab => Some(Key::Tab),
            _ => None,
        };
        if let Some(key) = named {
            return vec![key];
        }
        if modifiers.command() {
            let letter = match code {
                KeyCode::KeyA => Some('a'),
                KeyCode::KeyC => Some('c'),
                KeyCode::KeyV => Some('v'),
                KeyCode::KeyX => Some('x'),
                _ => None,
            };
            if let Some(ch) = letter {
                return vec![Key::Char(ch)];
            }
        }
    }
    match &event.text {
        Some(text) => text
            .chars()
            .filter(|ch| !ch.is_control())
            .map(Key::Char)
            .collect(),
        None => Vec::new(),
    }
}
