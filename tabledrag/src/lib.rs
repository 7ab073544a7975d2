pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod event;
pub mod geometry;
pub mod selection;
pub mod session;
pub mod target;
pub mod throttle;

pub use config::{DragConfig, DragEvent, DropStatus, VisualMarker, DEFAULT_SCROLL_AMOUNT};
pub use controller::TableDnd;
pub use dom::{Document, Dom, Element, ElementKind, InlineStyle, OffsetBox, Viewport};
pub use error::{DomError, HookError};
pub use event::{EventResult, MouseButton, PointerEvent, PointerKind};
pub use geometry::{pointer_coordinates, pointer_offset, position, Point, Rect};
pub use selection::{Companion, Selection};
pub use session::{DragSession, DragState};
pub use target::find_drop_target;
pub use throttle::{MoveThrottle, DEFAULT_MOVE_THROTTLE};
