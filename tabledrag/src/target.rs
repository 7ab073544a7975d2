use log::trace;

use crate::config::DragConfig;
use crate::dom::Dom;
use crate::geometry;

/// Find the row a dragged row would land on at vertical position `y`.
///
/// Each row owns the zone `[center - half, center + half)` of its measured
/// box. The first row whose zone contains `y` is the candidate; the dragged
/// row itself is never a target, and the candidate must pass
/// [`DragConfig::allows_drop`].
pub fn find_drop_target(
    dom: &dyn Dom,
    table: &str,
    config: &DragConfig,
    dragged: &str,
    y: i32,
) -> Option<String> {
    for row in dom.rows(table) {
        let Some(rect) = geometry::measure(dom, &row) else {
            continue;
        };
        let half = rect.height / 2;
        let center = rect.center().y;
        let lower = center - half;
        let upper = lower + rect.height;
        if y < lower || y >= upper {
            continue;
        }

        if row == dragged {
            return None;
        }
        if config.allows_drop(dom, dragged, &row) {
            trace!("Drop target for '{dragged}' at y={y}: '{row}'");
            return Some(row);
        }
        trace!("Row '{row}' refused drop of '{dragged}'");
        return None;
    }
    None
}
