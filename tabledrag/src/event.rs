use crate::geometry::Point;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// A pointer sample delivered by the host.
///
/// Touch input is expected to arrive already translated into this shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Element the event was dispatched to, if the host resolved one.
    pub target: Option<String>,
    /// Page coordinates, when the event source provides them.
    pub page: Option<Point>,
    /// Viewport-relative coordinates.
    pub client: Point,
    pub button: MouseButton,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            target: None,
            page: Some(Point::new(x, y)),
            client: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    /// Pointer press on `target` at page coordinates.
    pub fn down(target: impl Into<String>, x: i32, y: i32) -> Self {
        Self::new(PointerKind::Down, x, y).target(target)
    }

    /// Pointer movement at page coordinates.
    pub fn moved(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    /// Pointer movement that only carries client coordinates.
    pub fn moved_client(x: i32, y: i32) -> Self {
        Self {
            page: None,
            ..Self::new(PointerKind::Move, x, y)
        }
    }

    /// Pointer release at page coordinates.
    pub fn up(x: i32, y: i32) -> Self {
        Self::new(PointerKind::Up, x, y)
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Convert a crossterm mouse event into a client-coordinate pointer event.
    ///
    /// Terminals report cells relative to the visible screen, so no page
    /// coordinates are attached. Scroll and bare movement events have no
    /// pointer counterpart and yield `None`.
    pub fn from_crossterm(event: &crossterm::event::MouseEvent) -> Option<Self> {
        use crossterm::event::MouseEventKind;

        let (kind, button) = match event.kind {
            MouseEventKind::Down(button) => (PointerKind::Down, button),
            MouseEventKind::Drag(button) => (PointerKind::Move, button),
            MouseEventKind::Up(button) => (PointerKind::Up, button),
            _ => return None,
        };

        Some(Self {
            kind,
            target: None,
            page: None,
            client: Point::new(i32::from(event.column), i32::from(event.row)),
            button: button.into(),
        })
    }
}

/// Result of handling a pointer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, the host should apply its default action.
    Ignored,
    /// Event was consumed, the host should suppress its default action.
    Consumed,
    /// Event started a drag session.
    StartDrag,
}

impl EventResult {
    /// Check if the event was handled (consumed or started drag).
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

impl From<crossterm::event::MouseButton> for MouseButton {
    fn from(btn: crossterm::event::MouseButton) -> Self {
        use crossterm::event::MouseButton as CtBtn;
        match btn {
            CtBtn::Left => MouseButton::Left,
            CtBtn::Right => MouseButton::Right,
            CtBtn::Middle => MouseButton::Middle,
        }
    }
}
