use tabledrag::{find_drop_target, Document, DragConfig, Element};

const ROW_HEIGHT: i32 = 20;

fn table(rows: &[Element]) -> Document {
    Document::new(
        Element::container()
            .id("body")
            .child(Element::table().id("t").children(rows.iter().cloned())),
    )
}

fn row(name: &str) -> Element {
    Element::row()
        .id(name)
        .height(ROW_HEIGHT)
        .child(Element::cell(name.to_uppercase()).id(format!("{name}-label")))
}

fn abcd() -> Document {
    table(&[row("a"), row("b"), row("c").class("nodrop"), row("d")])
}

// ============================================================================
// Hit zones
// ============================================================================

#[test]
fn test_row_zone_is_half_open() {
    let doc = abcd();
    let config = DragConfig::new();

    assert_eq!(find_drop_target(&doc, "t", &config, "a", 20), Some("b".to_string()));
    assert_eq!(find_drop_target(&doc, "t", &config, "a", 39), Some("b".to_string()));
    assert_eq!(find_drop_target(&doc, "t", &config, "a", 60), Some("d".to_string()));
}

#[test]
fn test_outside_table_is_none() {
    let doc = abcd();
    let config = DragConfig::new();

    assert_eq!(find_drop_target(&doc, "t", &config, "a", -1), None);
    assert_eq!(find_drop_target(&doc, "t", &config, "a", 80), None);
    assert_eq!(find_drop_target(&doc, "t", &config, "a", 500), None);
}

#[test]
fn test_never_returns_dragged_row() {
    let doc = abcd();
    let config = DragConfig::new().on_allow_drop(|_, _| true);

    for y in 0..80 {
        assert_ne!(
            find_drop_target(&doc, "t", &config, "b", y),
            Some("b".to_string()),
            "y={y}"
        );
    }
    assert_eq!(find_drop_target(&doc, "t", &config, "b", 25), None);
}

#[test]
fn test_zero_height_row_uses_cell_probe() {
    let doc = table(&[row("a"), row("b").collapsed(true), row("c")]);
    let config = DragConfig::new();

    assert_eq!(find_drop_target(&doc, "t", &config, "a", 25), Some("b".to_string()));
}

// ============================================================================
// Eligibility
// ============================================================================

#[test]
fn test_nodrop_row_rejected_without_hook() {
    let doc = abcd();
    let config = DragConfig::new();

    assert_eq!(find_drop_target(&doc, "t", &config, "a", 45), None);
}

#[test]
fn test_allow_drop_overrides_nodrop() {
    let doc = abcd();
    let config = DragConfig::new().on_allow_drop(|_, candidate| candidate == "c");

    assert_eq!(find_drop_target(&doc, "t", &config, "a", 45), Some("c".to_string()));
}

#[test]
fn test_allow_drop_can_reject_unmarked_row() {
    let doc = abcd();
    let config = DragConfig::new().on_allow_drop(|_, candidate| candidate != "b");

    assert_eq!(find_drop_target(&doc, "t", &config, "a", 25), None);
    assert_eq!(find_drop_target(&doc, "t", &config, "a", 65), Some("d".to_string()));
}

#[test]
fn test_allow_drop_receives_dragged_and_candidate() {
    let doc = abcd();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    let config = DragConfig::new().on_allow_drop(move |dragged, candidate| {
        sink.borrow_mut()
            .push((dragged.to_string(), candidate.to_string()));
        true
    });

    find_drop_target(&doc, "t", &config, "d", 5);
    assert_eq!(*seen.borrow(), vec![("d".to_string(), "a".to_string())]);
}
