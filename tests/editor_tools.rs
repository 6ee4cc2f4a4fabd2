use std::cell::RefCell;
use std::rc::Rc;

use doodlepad::editor::Editor;
use doodlepad::error::SurfaceError;
use doodlepad::event::EditorEvent;
use doodlepad::tools::{ShapeKind, ToolKind, ToolOutcome};
use doodlepad::SurfaceSettings;
use egui::{Color32, Pos2, pos2};

// Helper to create an editor on a small white surface
fn create_editor() -> Editor {
    let settings = SurfaceSettings { width: 100, height: 100, ..Default::default() };
    Editor::new(settings).unwrap().with_seed(3)
}

fn drag(editor: &mut Editor, points: &[Pos2]) {
    editor.press(points[0]).unwrap();
    for point in &points[1..] {
        editor.move_to(*point);
    }
    editor.release();
}

fn record_events(editor: &Editor) -> Rc<RefCell<Vec<EditorEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    editor.subscribe(move |event: &EditorEvent| sink.borrow_mut().push(event.clone()));
    seen
}

#[test]
fn test_filled_rectangle_without_stroke() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Shape);
    editor.set_shape_kind(ShapeKind::Rectangle);
    editor.set_shape_fill(true);
    editor.set_shape_stroke(false);
    editor.set_color(Color32::BLUE);

    drag(&mut editor, &[pos2(2.0, 2.0), pos2(8.0, 8.0)]);

    let surface = editor.surface();
    for y in 0..100 {
        for x in 0..100 {
            let inside = (2..8).contains(&x) && (2..8).contains(&y);
            let expected = if inside { Color32::BLUE } else { Color32::WHITE };
            assert_eq!(surface.pixel(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
    assert_eq!(editor.history().undo_len(), 2);
}

#[test]
fn test_shape_preview_leaves_no_residue() {
    let mut previewed = create_editor();
    previewed.set_tool(ToolKind::Shape);
    drag(&mut previewed, &[pos2(10.0, 10.0), pos2(90.0, 90.0), pos2(50.0, 20.0), pos2(30.0, 30.0)]);

    let mut direct = create_editor();
    direct.set_tool(ToolKind::Shape);
    drag(&mut direct, &[pos2(10.0, 10.0), pos2(30.0, 30.0)]);

    assert_eq!(previewed.surface().snapshot(), direct.surface().snapshot());
    assert_eq!(previewed.history().undo_len(), 2);
}

#[test]
fn test_shape_release_without_move_draws_nothing() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Shape);
    let blank = editor.surface().snapshot();
    drag(&mut editor, &[pos2(40.0, 40.0)]);
    assert_eq!(editor.surface().snapshot(), blank);
    assert_eq!(editor.history().undo_len(), 1);
}

#[test]
fn test_line_tool_draws_segment() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Line);
    editor.set_color(Color32::BLACK);
    drag(&mut editor, &[pos2(10.0, 50.0), pos2(90.0, 50.0)]);
    assert_eq!(editor.surface().pixel(50, 50), Some(Color32::BLACK));
    assert_eq!(editor.surface().pixel(50, 20), Some(Color32::WHITE));
}

#[test]
fn test_fill_on_target_colour_records_nothing() {
    let mut editor = create_editor();
    let events = record_events(&editor);
    editor.set_tool(ToolKind::Fill);
    editor.set_color(Color32::WHITE);

    let outcome = editor.press(pos2(50.0, 50.0)).unwrap();
    assert_eq!(outcome, ToolOutcome::Unchanged);
    assert_eq!(editor.history().undo_len(), 1);
    assert!(events.borrow().contains(&EditorEvent::Unchanged { tool: ToolKind::Fill }));
}

#[test]
fn test_fill_is_undoable() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Fill);
    editor.set_color(Color32::RED);
    assert_eq!(editor.press(pos2(50.0, 50.0)).unwrap(), ToolOutcome::Commit);
    assert_eq!(editor.surface().pixel(0, 0), Some(Color32::RED));
    assert_eq!(editor.history().undo_len(), 2);
    // Fill has no drag phase; the release adds nothing
    assert_eq!(editor.release(), ToolOutcome::Idle);
    assert_eq!(editor.history().undo_len(), 2);
    editor.undo();
    assert_eq!(editor.surface().pixel(0, 0), Some(Color32::WHITE));
}

#[test]
fn test_fill_outside_surface_is_unchanged() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Fill);
    assert_eq!(editor.press(pos2(-5.0, 500.0)).unwrap(), ToolOutcome::Unchanged);
    assert_eq!(editor.history().undo_len(), 1);
}

#[test]
fn test_pencil_click_without_move_records_nothing() {
    let mut editor = create_editor();
    drag(&mut editor, &[pos2(50.0, 50.0)]);
    assert_eq!(editor.history().undo_len(), 1);
    assert_eq!(editor.surface().pixel(50, 50), Some(Color32::WHITE));
}

#[test]
fn test_eraser_paints_background() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Fill);
    editor.set_color(Color32::GREEN);
    editor.press(pos2(1.0, 1.0)).unwrap();

    editor.set_tool(ToolKind::Eraser);
    editor.set_stroke_size(10.0);
    drag(&mut editor, &[pos2(20.0, 50.0), pos2(80.0, 50.0)]);
    assert_eq!(editor.surface().pixel(50, 50), Some(Color32::WHITE));
    assert_eq!(editor.surface().pixel(50, 10), Some(Color32::GREEN));
    assert_eq!(editor.history().undo_len(), 3);
}

#[test]
fn test_spray_marks_surface() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Spray);
    editor.set_color(Color32::BLACK);
    drag(&mut editor, &[pos2(50.0, 50.0), pos2(55.0, 50.0)]);
    let inked = editor
        .surface()
        .image()
        .pixels()
        .filter(|p| p.0 != [255, 255, 255, 255])
        .count();
    assert!(inked > 0);
    assert_eq!(editor.history().undo_len(), 2);
}

#[test]
fn test_emoji_stamp_commits() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Emoji);
    editor.set_emoji("⭐");
    editor.set_stroke_size(10.0);
    assert_eq!(editor.press(pos2(50.0, 50.0)).unwrap(), ToolOutcome::Commit);
    assert_eq!(editor.history().undo_len(), 2);
}

#[test]
fn test_text_uses_prompt() {
    let mut editor = create_editor().with_text_prompt(|| Some("Hi there".to_owned()));
    editor.set_tool(ToolKind::Text);
    editor.set_color(Color32::BLACK);
    assert_eq!(editor.press(pos2(10.0, 10.0)).unwrap(), ToolOutcome::Commit);
    assert_eq!(editor.history().undo_len(), 2);
}

#[test]
fn test_text_cancelled_prompt_is_unchanged() {
    let mut editor = create_editor().with_text_prompt(|| None);
    editor.set_tool(ToolKind::Text);
    assert_eq!(editor.press(pos2(10.0, 10.0)).unwrap(), ToolOutcome::Unchanged);
    assert_eq!(editor.history().undo_len(), 1);
}

#[test]
fn test_ai_tool_reports_not_implemented() {
    let mut editor = create_editor();
    editor.set_tool(ToolKind::Ai);
    let blank = editor.surface().snapshot();
    let err = editor.press(pos2(10.0, 10.0)).unwrap_err();
    assert!(matches!(err, SurfaceError::NotImplemented(_)));
    assert_eq!(editor.surface().snapshot(), blank);
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut editor = create_editor();
    drag(&mut editor, &[pos2(10.0, 10.0), pos2(40.0, 40.0)]);
    editor.undo();
    assert!(editor.can_redo());
    drag(&mut editor, &[pos2(60.0, 10.0), pos2(90.0, 40.0)]);
    assert!(!editor.can_redo());
    assert!(!editor.redo());
}

#[test]
fn test_clear_on_blank_surface_records_nothing() {
    let mut editor = create_editor();
    let events = record_events(&editor);
    editor.clear();
    assert_eq!(editor.history().undo_len(), 1);
    assert!(events.borrow().contains(&EditorEvent::Unchanged { tool: ToolKind::Pencil }));
}

#[test]
fn test_resize_then_noop_click_records_nothing() {
    let mut editor = create_editor();
    editor.set_color(Color32::BLACK);
    drag(&mut editor, &[pos2(10.0, 10.0), pos2(60.0, 60.0)]);
    assert_eq!(editor.history().undo_len(), 2);

    editor.resize(200, 150);
    drag(&mut editor, &[pos2(120.0, 100.0)]);
    assert_eq!(editor.history().undo_len(), 2);
    editor.clear();
    editor.clear();
    assert_eq!(editor.history().undo_len(), 3);
}

#[test]
fn test_noop_click_after_undo_at_new_size_records_nothing() {
    let mut editor = create_editor();
    drag(&mut editor, &[pos2(10.0, 10.0), pos2(60.0, 60.0)]);
    editor.resize(200, 150);
    editor.undo();
    drag(&mut editor, &[pos2(120.0, 100.0)]);
    assert_eq!(editor.history().undo_len(), 1);
    assert!(!editor.can_redo());
}

#[test]
fn test_press_without_release_records_strokes_separately() {
    let mut editor = create_editor();
    editor.set_color(Color32::BLACK);
    editor.press(pos2(10.0, 10.0)).unwrap();
    editor.move_to(pos2(40.0, 40.0));
    // The release of the first stroke never arrives
    editor.press(pos2(60.0, 60.0)).unwrap();
    editor.move_to(pos2(90.0, 90.0));
    editor.release();
    assert_eq!(editor.history().undo_len(), 3);

    editor.undo();
    assert_eq!(editor.surface().pixel(25, 25), Some(Color32::BLACK));
    assert_eq!(editor.surface().pixel(75, 75), Some(Color32::WHITE));
}
