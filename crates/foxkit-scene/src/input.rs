//! Framework-level input events.
//!
//! The windowing layer translates platform events into these before anything
//! in the scene or widget layer sees them, so widgets never depend on winit.

/// Mouse buttons the framework routes. Anything else is dropped at the
/// translation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Logical keys. Printable input arrives as `Char`, already resolved
/// against the active layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub cmd: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        cmd: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        cmd: false,
    };

    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        cmd: false,
    };

    /// The primary shortcut modifier: Cmd on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        if cfg!(target_os = "macos") {
            self.cmd
        } else {
            self.ctrl
        }
    }
}

/// One routed input event, in logical surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved {
        x: f32,
        y: f32,
    },
    PointerPressed {
        x: f32,
        y: f32,
        button: MouseButton,
    },
    PointerReleased {
        x: f32,
        y: f32,
        button: MouseButton,
    },
    /// Positive `delta_y` scrolls content up (wheel away from the user).
    Wheel {
        x: f32,
        y: f32,
        delta_y: f32,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Pointer position for positional events, `None` for keyboard events.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            InputEvent::PointerMoved { x, y }
            | InputEvent::PointerPressed { x, y, .. }
            | InputEvent::PointerReleased { x, y, .. }
            | InputEvent::Wheel { x, y, .. } => Some((x, y)),
            InputEvent::KeyPressed { .. } => None,
        }
    }
}

/// Outcome of offering an event to a handler. A `Handled` result stops
/// propagation to handlers underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Handled,
    Ignored,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }
}
