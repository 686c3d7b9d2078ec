use egui::{Modifiers, PointerButton, Pos2, Rect, pos2};
use futures::executor::block_on;
use paintbox::command::Command;
use paintbox::config::FillStyle;
use paintbox::input::{InputEvent, Key};
use paintbox::state::EditorContext;
use paintbox::tools::{Tool, ToolKind};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn context_with(kind: ToolKind) -> EditorContext {
    let mut context = EditorContext::new(50, 50);
    block_on(context.set_tool(kind)).unwrap();
    context
}

fn send(context: &mut EditorContext, event: InputEvent) {
    block_on(context.handle_event(event)).unwrap();
}

fn down(context: &mut EditorContext, pos: Pos2) {
    send(context, InputEvent::PointerDown { button: PointerButton::Primary, pos });
}

fn drag_to(context: &mut EditorContext, pos: Pos2) {
    send(context, InputEvent::PointerMove { pos });
}

fn up(context: &mut EditorContext, pos: Pos2) {
    send(context, InputEvent::PointerUp { button: PointerButton::Primary, pos });
}

fn key(context: &mut EditorContext, key: Key) {
    send(context, InputEvent::KeyDown { key, modifiers: Modifiers::NONE });
}

fn click(context: &mut EditorContext, pos: Pos2) {
    down(context, pos);
    up(context, pos);
}

fn preview_is_clear(context: &EditorContext) -> bool {
    context.preview().image().pixels().all(|p| p.0[3] == 0)
}

#[test]
fn test_other_buttons_are_ignored_by_every_tool() {
    for kind in ToolKind::ALL {
        let mut context = context_with(kind);
        let before = context.base().clone();

        for button in [PointerButton::Secondary, PointerButton::Middle] {
            send(&mut context, InputEvent::PointerDown { button, pos: pos2(10.0, 10.0) });
            drag_to(&mut context, pos2(20.0, 25.0));
            send(&mut context, InputEvent::PointerUp { button, pos: pos2(20.0, 25.0) });
        }

        assert_eq!(context.base(), &before, "{kind:?} touched the canvas");
        assert_eq!(context.history().past_size(), 0, "{kind:?} committed a command");
        assert!(!context.active_tool().is_busy(), "{kind:?} started a gesture");
    }
}

#[test]
fn test_mouse_up_without_down_is_ignored_by_every_tool() {
    for kind in ToolKind::ALL {
        let mut context = context_with(kind);
        up(&mut context, pos2(10.0, 10.0));

        assert_eq!(context.history().past_size(), 0, "{kind:?} committed a command");
        assert!(!context.active_tool().is_busy(), "{kind:?} started a gesture");
    }
}

#[test]
fn test_pointer_down_outside_canvas_is_ignored() {
    let mut context = context_with(ToolKind::Pencil);
    down(&mut context, pos2(-5.0, 10.0));
    assert!(!context.active_tool().is_busy());

    down(&mut context, pos2(10.0, 50.0));
    assert!(!context.active_tool().is_busy());
}

#[test]
fn test_even_rectangle_commits_square() {
    let mut context = context_with(ToolKind::Rectangle);
    let mut settings = context.settings().clone();
    settings.fill_style = FillStyle::Fill;
    context.set_settings(settings);

    key(&mut context, Key::Shift);
    down(&mut context, pos2(0.0, 0.0));
    drag_to(&mut context, pos2(20.0, 30.0));
    assert!(!preview_is_clear(&context));
    up(&mut context, pos2(20.0, 30.0));

    let [Command::Rectangle(shape)] = context.history().past_commands() else {
        panic!("expected one rectangle, got {:?}", context.history().past_commands());
    };
    assert!(shape.is_even);
    assert_eq!(shape.bounds(), Rect::from_min_max(pos2(0.0, 0.0), pos2(20.0, 20.0)));

    assert_eq!(context.base().pixel(10, 10), Some(BLACK));
    assert_eq!(context.base().pixel(10, 25), Some(WHITE));
    assert!(preview_is_clear(&context));
}

#[test]
fn test_shift_release_restores_free_shape() {
    let mut context = context_with(ToolKind::Ellipse);
    key(&mut context, Key::Shift);
    down(&mut context, pos2(0.0, 0.0));
    drag_to(&mut context, pos2(20.0, 30.0));
    send(&mut context, InputEvent::KeyUp { key: Key::Shift, modifiers: Modifiers::NONE });
    up(&mut context, pos2(20.0, 30.0));

    let [Command::Ellipse(shape)] = context.history().past_commands() else {
        panic!("expected one ellipse");
    };
    assert!(!shape.is_even);
    assert_eq!(shape.bounds().size(), egui::vec2(20.0, 30.0));
}

#[test]
fn test_escape_cancels_shape() {
    let mut context = context_with(ToolKind::Rectangle);
    down(&mut context, pos2(5.0, 5.0));
    drag_to(&mut context, pos2(25.0, 25.0));
    assert!(context.history().is_disabled());

    key(&mut context, Key::Escape);
    assert!(preview_is_clear(&context));
    assert!(!context.active_tool().is_busy());
    assert!(!context.history().is_disabled());

    up(&mut context, pos2(25.0, 25.0));
    assert_eq!(context.history().past_size(), 0);
}

#[test]
fn test_click_without_drag_draws_no_shape() {
    let mut context = context_with(ToolKind::Rectangle);
    click(&mut context, pos2(5.0, 5.0));
    assert_eq!(context.history().past_size(), 0);
}

#[test]
fn test_flat_drag_draws_no_shape() {
    for kind in [ToolKind::Rectangle, ToolKind::Ellipse] {
        let mut context = context_with(kind);
        let before = context.base().clone();

        // Free drag along one axis
        down(&mut context, pos2(5.0, 5.0));
        drag_to(&mut context, pos2(30.0, 5.0));
        up(&mut context, pos2(30.0, 5.0));

        // Even mode collapses a flat drag to a zero-sided square
        key(&mut context, Key::Shift);
        down(&mut context, pos2(5.0, 10.0));
        drag_to(&mut context, pos2(30.0, 10.0));
        up(&mut context, pos2(30.0, 10.0));

        assert_eq!(context.history().past_size(), 0, "{kind:?} committed an empty shape");
        assert_eq!(context.base(), &before);
        assert!(preview_is_clear(&context));
    }
}

#[test]
fn test_pencil_stroke_is_one_command() {
    let mut context = context_with(ToolKind::Pencil);
    down(&mut context, pos2(10.0, 10.0));
    drag_to(&mut context, pos2(20.0, 10.0));
    drag_to(&mut context, pos2(30.0, 10.0));

    // The stroke is only on the preview until release
    assert_eq!(context.base().pixel(20, 10), Some(WHITE));
    assert_eq!(context.preview().pixel(20, 10), Some(BLACK));
    assert!(context.history().is_disabled());

    up(&mut context, pos2(30.0, 10.0));
    let [Command::Stroke(stroke)] = context.history().past_commands() else {
        panic!("expected one stroke");
    };
    assert_eq!(stroke.points.len(), 3);
    assert_eq!(context.base().pixel(20, 10), Some(BLACK));
    assert!(preview_is_clear(&context));
    assert!(!context.history().is_disabled());
}

#[test]
fn test_undo_is_ignored_mid_gesture() {
    let mut context = context_with(ToolKind::Pencil);
    down(&mut context, pos2(10.0, 10.0));
    up(&mut context, pos2(10.0, 10.0));
    assert_eq!(context.history().past_size(), 1);

    down(&mut context, pos2(20.0, 20.0));
    send(&mut context, InputEvent::KeyDown { key: Key::Character('z'), modifiers: Modifiers::CTRL });
    assert_eq!(context.history().past_size(), 1);

    up(&mut context, pos2(20.0, 20.0));
    assert_eq!(context.history().past_size(), 2);

    send(&mut context, InputEvent::KeyDown { key: Key::Character('z'), modifiers: Modifiers::CTRL });
    assert_eq!(context.history().past_size(), 1);
    assert_eq!(context.history().redo_size(), 1);

    let redo = Modifiers { shift: true, ..Modifiers::CTRL };
    send(&mut context, InputEvent::KeyDown { key: Key::Character('z'), modifiers: redo });
    assert_eq!(context.history().past_size(), 2);
    assert_eq!(context.history().redo_size(), 0);

    send(&mut context, InputEvent::KeyDown { key: Key::Character('z'), modifiers: Modifiers::CTRL });
    send(&mut context, InputEvent::KeyDown { key: Key::Character('y'), modifiers: Modifiers::CTRL });
    assert_eq!(context.history().past_size(), 2);
}

#[test]
fn test_eraser_paints_white() {
    let mut context = context_with(ToolKind::Pencil);
    down(&mut context, pos2(10.0, 25.0));
    drag_to(&mut context, pos2(40.0, 25.0));
    up(&mut context, pos2(40.0, 25.0));
    assert_eq!(context.base().pixel(25, 25), Some(BLACK));

    block_on(context.set_tool(ToolKind::Eraser)).unwrap();
    down(&mut context, pos2(25.0, 25.0));
    up(&mut context, pos2(25.0, 25.0));

    assert!(matches!(context.history().past_commands().last(), Some(Command::Erase(_))));
    assert_eq!(context.base().pixel(25, 25), Some(WHITE));
    assert_eq!(context.base().pixel(12, 25), Some(BLACK));
}

#[test]
fn test_line_finishes_on_double_click() {
    let mut context = context_with(ToolKind::Line);
    click(&mut context, pos2(10.0, 10.0));
    click(&mut context, pos2(40.0, 10.0));
    assert!(context.active_tool().is_busy());
    // A double-click delivers a second press on the same spot first
    click(&mut context, pos2(40.0, 10.0));
    send(&mut context, InputEvent::DoubleClick { pos: pos2(40.0, 10.0) });

    let [Command::Line(line)] = context.history().past_commands() else {
        panic!("expected one line");
    };
    assert_eq!(line.points, vec![pos2(10.0, 10.0), pos2(40.0, 10.0)]);
    assert!(!context.active_tool().is_busy());
    assert_eq!(context.base().pixel(25, 10), Some(BLACK));
}

#[test]
fn test_line_closes_near_start() {
    let mut context = context_with(ToolKind::Line);
    for pos in [pos2(10.0, 10.0), pos2(40.0, 10.0), pos2(40.0, 40.0), pos2(15.0, 15.0)] {
        click(&mut context, pos);
    }
    send(&mut context, InputEvent::DoubleClick { pos: pos2(15.0, 15.0) });

    let [Command::Line(line)] = context.history().past_commands() else {
        panic!("expected one line");
    };
    assert_eq!(line.points.first(), line.points.last());
    assert_eq!(line.points.len(), 4);
}

#[test]
fn test_line_backspace_and_escape() {
    let mut context = context_with(ToolKind::Line);
    click(&mut context, pos2(10.0, 10.0));
    click(&mut context, pos2(20.0, 20.0));
    click(&mut context, pos2(30.0, 10.0));
    key(&mut context, Key::Backspace);

    let junctions = match context.active_tool() {
        paintbox::ToolType::Line(tool) => tool.junctions().to_vec(),
        other => panic!("unexpected tool {other:?}"),
    };
    assert_eq!(junctions, vec![pos2(10.0, 10.0), pos2(20.0, 20.0)]);

    key(&mut context, Key::Escape);
    assert!(!context.active_tool().is_busy());
    assert!(preview_is_clear(&context));
    assert_eq!(context.history().past_size(), 0);
}

#[test]
fn test_line_shift_snaps_to_45_degrees() {
    let mut context = context_with(ToolKind::Line);
    click(&mut context, pos2(10.0, 10.0));
    key(&mut context, Key::Shift);
    click(&mut context, pos2(40.0, 12.0));
    send(&mut context, InputEvent::DoubleClick { pos: pos2(40.0, 12.0) });

    let [Command::Line(line)] = context.history().past_commands() else {
        panic!("expected one line");
    };
    let end = line.points[1];
    assert!((end.x - 40.0).abs() < 1e-4 && (end.y - 10.0).abs() < 1e-4, "{end:?}");
}

#[test]
fn test_switching_tool_commits_pending_line() {
    let mut context = context_with(ToolKind::Line);
    click(&mut context, pos2(10.0, 10.0));
    click(&mut context, pos2(40.0, 10.0));

    block_on(context.set_tool(ToolKind::Pencil)).unwrap();
    assert_eq!(context.history().past_size(), 1);
    assert_eq!(context.tool_kind(), ToolKind::Pencil);
    assert!(preview_is_clear(&context));
}

#[test]
fn test_paint_bucket_fills_canvas() {
    let mut context = context_with(ToolKind::PaintBucket);
    down(&mut context, pos2(60.0, 60.0));
    assert_eq!(context.history().past_size(), 0);

    down(&mut context, pos2(3.0, 3.0));
    up(&mut context, pos2(3.0, 3.0));
    assert!(matches!(context.history().past_commands(), [Command::Paint(_)]));
    assert!(context.base().image().pixels().all(|p| p.0 == BLACK));

    block_on(context.undo()).unwrap();
    assert!(context.base().image().pixels().all(|p| p.0 == WHITE));
}

#[test]
fn test_new_document_resets_everything() {
    let mut context = context_with(ToolKind::Line);
    click(&mut context, pos2(10.0, 10.0));
    click(&mut context, pos2(40.0, 10.0));
    let first_document = context.history().document_id();

    context.new_document(30, 20);
    assert!(!context.active_tool().is_busy());
    assert_eq!(context.base().size(), [30, 20]);
    assert_eq!(context.preview().size(), [30, 20]);
    assert_eq!(context.history().past_size(), 0);
    assert_ne!(context.history().document_id(), first_document);
    assert!(context.base().image().pixels().all(|p| p.0 == WHITE));
}
