mod terminal;
mod view;

use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use log::{debug, info, warn, LevelFilter};
use simplelog::{Config, WriteLogger};
use tabledrag::{
    pointer_coordinates, Document, Dom, DragConfig, DropStatus, Element, ElementKind,
    PointerEvent, PointerKind, TableDnd,
};

use crate::terminal::Terminal;
use crate::view::{check_id, label_id, DRAG_CLASS, HEADER_LINES, LABEL_WIDTH, TABLE};

const GRIP_CLASS: &str = "grip";
const SELECT_CLASS: &str = "select";
const SELECT_CELL_CLASS: &str = "select-cell";

const TASKS: &[&str] = &[
    "Write release notes",
    "Review open pull requests",
    "Fix flaky scroll test",
    "Update dependencies",
    "Triage new issues",
    "Benchmark layout pass",
    "Reply to mailing list",
    "Draft roadmap",
    "Clean up CI cache",
    "Plan next sprint",
];

fn task_row(index: usize, label: &str) -> Element {
    let id = format!("task-{index}");
    Element::row()
        .id(id.as_str())
        .height(1)
        .child(
            Element::cell("")
                .id(format!("{id}-select"))
                .class(SELECT_CELL_CLASS)
                .width(4)
                .child(Element::checkbox().id(check_id(&id)).class(SELECT_CLASS)),
        )
        .child(
            Element::cell(label)
                .id(label_id(&id))
                .class(GRIP_CLASS)
                .width(LABEL_WIDTH as i32),
        )
}

fn document(viewport_height: i32) -> Document {
    let table = Element::table()
        .id(TABLE)
        .children(TASKS.iter().enumerate().map(|(i, label)| task_row(i, label)));
    Document::new(Element::container().id("body").child(table)).with_viewport_height(viewport_height)
}

fn drag_config() -> DragConfig {
    DragConfig::new()
        .drag_handle(GRIP_CLASS)
        .checkable_class(SELECT_CLASS)
        .drag_class(DRAG_CLASS)
        .scroll_amount(1)
        .on_drag_start(|drag| {
            info!(
                "Dragging '{}' with {} selected row(s)",
                drag.primary,
                drag.companions.len()
            );
            Ok(())
        })
        .on_drop(|drop| {
            info!("New order: {:?}", drop.dom.rows(drop.table));
            DropStatus::Done
        })
}

struct App {
    doc: Document,
    dnd: TableDnd,
    next_task: usize,
}

impl App {
    fn new(viewport_height: i32) -> Self {
        let doc = document(viewport_height);
        let mut dnd = TableDnd::new().with_move_throttle(Duration::from_millis(30));
        dnd.attach(&doc, &[TABLE], drag_config());
        Self {
            doc,
            dnd,
            next_task: TASKS.len(),
        }
    }

    /// Returns `false` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Char('n') => self.add_task(),
            _ => {}
        }
        true
    }

    fn add_task(&mut self) {
        let index = self.next_task;
        self.next_task += 1;
        let row = task_row(index, &format!("New task {index}"));
        match self.doc.append(TABLE, row) {
            Ok(()) => self.dnd.refresh(&self.doc, &[TABLE]),
            Err(e) => warn!("Could not add task {index}: {e}"),
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.doc.scroll_by(0, 1),
            MouseEventKind::ScrollUp => self.doc.scroll_by(0, -1),
            _ => {}
        }

        let Some(mut event) = PointerEvent::from_crossterm(mouse) else {
            return;
        };
        event.client.y -= HEADER_LINES;
        let page = pointer_coordinates(&event, self.doc.viewport());
        event.target = self.doc.hit_test(page.x, page.y);

        let now = Instant::now();
        match event.kind {
            PointerKind::Down => {
                if !self.dnd.pointer_down(&mut self.doc, &event).is_handled() {
                    self.toggle_selection(event.target.as_deref());
                }
            }
            PointerKind::Move => {
                self.dnd.pointer_move(&mut self.doc, &event, now);
            }
            PointerKind::Up => {
                self.dnd.pointer_up(&mut self.doc, &event);
            }
        }
    }

    /// Toggle the checkbox of the row whose select cell was clicked.
    fn toggle_selection(&mut self, target: Option<&str>) {
        let Some(cell) = target.and_then(|t| self.doc.closest(t, ElementKind::Cell)) else {
            return;
        };
        if !self.doc.has_class(&cell, SELECT_CELL_CLASS) {
            return;
        }
        let Some(row) = self.doc.closest(&cell, ElementKind::Row) else {
            return;
        };
        match self.doc.toggle_checked(&check_id(&row)) {
            Ok(checked) => debug!("'{row}' selected: {checked}"),
            Err(e) => warn!("Could not toggle '{row}': {e}"),
        }
    }
}

fn viewport_height(rows: u16) -> i32 {
    (i32::from(rows) - HEADER_LINES).max(1)
}

fn main() -> io::Result<()> {
    let log_file = File::create("tabledrag-demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .map_err(io::Error::other)?;

    let mut term = Terminal::new()?;
    let (mut width, height) = term.size()?;
    let mut app = App::new(viewport_height(height));

    loop {
        view::draw(term.out(), &app.doc, width)?;
        term.flush()?;

        for event in term.poll(Duration::from_millis(30))? {
            match event {
                CrosstermEvent::Key(key) => {
                    if !app.handle_key(key) {
                        return Ok(());
                    }
                }
                CrosstermEvent::Mouse(mouse) => app.handle_mouse(&mouse),
                CrosstermEvent::Resize(w, h) => {
                    width = w;
                    app.doc.set_viewport_height(viewport_height(h));
                }
                _ => {}
            }
        }

        app.dnd.flush(&mut app.doc, Instant::now());
    }
}
