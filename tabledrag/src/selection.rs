//! Participants of a drag.

use log::debug;

use crate::config::DragConfig;
use crate::dom::{Dom, ElementKind};
use crate::geometry::{self, Point};

/// Height used to normalise a companion's pointer offset when the row
/// reports none.
const FALLBACK_ROW_HEIGHT: i32 = 30;

/// A row dragged along with the primary row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    pub row: String,
    /// Position among the selected rows at drag start.
    pub drag_index: usize,
    /// Pointer position relative to this row at drag start.
    pub pointer_offset: Point,
}

/// Rows taking part in a drag, captured once at pointer-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub primary: String,
    pub companions: Vec<Companion>,
    /// The primary row's `drag_index`, when it is itself selected. An
    /// unselected primary row anchors every companion below it.
    pub master_index: Option<usize>,
}

impl Selection {
    /// Capture the selection for a drag of `primary` starting at `pointer`.
    ///
    /// Companions are the rows containing a checked control of the configured
    /// checkable class, in visual order. Without that class the selection is
    /// the primary row alone.
    pub fn capture(
        dom: &dyn Dom,
        table: &str,
        config: &DragConfig,
        primary: &str,
        pointer: Point,
    ) -> Self {
        let companions: Vec<Companion> = match &config.checkable_class {
            Some(class) => checked_rows(dom, table, class)
                .into_iter()
                .enumerate()
                .map(|(drag_index, row)| {
                    let pointer_offset = companion_offset(dom, &row, pointer);
                    Companion {
                        row,
                        drag_index,
                        pointer_offset,
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        let master_index = companions
            .iter()
            .find(|companion| companion.row == primary)
            .map(|companion| companion.drag_index);

        debug!(
            "Captured selection on '{table}': primary '{primary}', {} companion(s), master index {master_index:?}",
            companions.len()
        );

        Self {
            primary: primary.to_string(),
            companions,
            master_index,
        }
    }

    pub fn has_companions(&self) -> bool {
        !self.companions.is_empty()
    }

    /// Companion row ids in participant order.
    pub fn companion_rows(&self) -> Vec<String> {
        self.companions
            .iter()
            .map(|companion| companion.row.clone())
            .collect()
    }

    /// The primary row followed by every companion that is not the primary.
    pub fn participants(&self) -> Vec<&str> {
        std::iter::once(self.primary.as_str())
            .chain(
                self.companions
                    .iter()
                    .map(|companion| companion.row.as_str())
                    .filter(|row| *row != self.primary),
            )
            .collect()
    }

    /// Whether a companion belongs above the primary row.
    pub fn goes_before_primary(&self, companion: &Companion) -> bool {
        self.master_index
            .is_some_and(|master| companion.drag_index < master)
    }
}

/// Rows owning a checked control of `class`, deduplicated, in visual order.
fn checked_rows(dom: &dyn Dom, table: &str, class: &str) -> Vec<String> {
    let mut rows: Vec<String> = Vec::new();
    for control in dom.find_by_class(table, class) {
        if !dom.is_checked(&control) {
            continue;
        }
        let Some(row) = dom.closest(&control, ElementKind::Row) else {
            continue;
        };
        if !rows.contains(&row) {
            rows.push(row);
        }
    }
    rows
}

fn companion_offset(dom: &dyn Dom, row: &str, pointer: Point) -> Point {
    let mut offset = pointer - geometry::position(dom, row);
    if offset.y < 0 {
        let height = geometry::measure(dom, row)
            .map(|rect| rect.height)
            .filter(|height| *height > 0)
            .unwrap_or(FALLBACK_ROW_HEIGHT);
        offset.y += height;
    }
    offset
}
