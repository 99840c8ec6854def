use crate::id::ElementId;
use crossterm::event::{
    KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

/// Input events a host forwards to widgets.
///
/// Keys use crossterm's vocabulary so the same widgets work behind a terminal
/// host and behind any other host that can translate its key events. Focus
/// and hover events carry the [`ElementId`] of the element they happened on,
/// which lets one widget tell its own parts apart (e.g. a carousel's slides
/// from its rotation button).
///
/// # Example
///
/// ```rust,ignore
/// use taro_core::{Host, UiEvent};
///
/// let (host, effects) = Host::new(tabs, |event| match event {
///     UiEvent::Key(k) => Some(tabs::Message::KeyPress(k)),
///     _ => None,
/// });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A key press (or repeat). Releases are never delivered.
    Key(KeyEvent),
    /// A pointer event in host coordinates.
    Pointer(PointerEvent),
    /// The element gained focus.
    FocusIn(ElementId),
    /// The element lost focus.
    FocusOut(ElementId),
    /// The pointer entered the element.
    PointerEnter(ElementId),
    /// The pointer left the element.
    PointerLeave(ElementId),
}

/// What a pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
    Drag,
    Move,
    ScrollUp,
    ScrollDown,
}

/// A pointer event at a host position (cells for terminal hosts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Position,
    pub modifiers: KeyModifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            position: Position::new(x, y),
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Convert a crossterm mouse event. Only the primary button counts as a
    /// pointer press; other buttons and horizontal scrolling are dropped.
    pub fn from_mouse(event: MouseEvent) -> Option<Self> {
        let kind = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
            MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
            MouseEventKind::Drag(MouseButton::Left) => PointerKind::Drag,
            MouseEventKind::Moved => PointerKind::Move,
            MouseEventKind::ScrollUp => PointerKind::ScrollUp,
            MouseEventKind::ScrollDown => PointerKind::ScrollDown,
            _ => return None,
        };
        Some(Self {
            kind,
            position: Position::new(event.column, event.row),
            modifiers: event.modifiers,
        })
    }
}

impl UiEvent {
    /// Translate a raw terminal event. Key releases, resizes, pastes and
    /// window focus changes have no widget meaning and map to `None`.
    pub fn from_terminal(event: crossterm::event::Event) -> Option<Self> {
        match event {
            crossterm::event::Event::Key(k) if k.kind != KeyEventKind::Release => {
                Some(UiEvent::Key(k))
            }
            crossterm::event::Event::Mouse(m) => PointerEvent::from_mouse(m).map(UiEvent::Pointer),
            _ => None,
        }
    }
}
