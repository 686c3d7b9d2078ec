use egui::{Modifiers, PointerButton, Pos2, Rect, pos2, vec2};
use futures::executor::block_on;
use image::{Rgba, RgbaImage};
use paintbox::command::Command;
use paintbox::input::{InputEvent, Key};
use paintbox::selection::{Handle, Selection, SelectionState};
use paintbox::state::EditorContext;
use paintbox::surface::ImageData;
use paintbox::tools::{SelectionTool, ToolKind, ToolType};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

fn selection(rect: Rect) -> Selection {
    let content = RgbaImage::new(rect.width() as u32, rect.height() as u32);
    Selection::new(rect, ImageData::from(content))
}

#[test]
fn test_dragging_east_past_west_edge_flips_once() {
    let mut sel = selection(Rect::from_min_max(pos2(10.0, 10.0), pos2(30.0, 30.0)));
    sel.begin_resize(Handle::E);

    let handle = sel.resize(Handle::E, pos2(5.0, 20.0), false);
    assert_eq!(handle, Handle::W);
    assert!(sel.has_flipped.vertical);
    assert!(!sel.has_flipped.horizontal);
    assert_eq!(sel.position, pos2(5.0, 10.0));
    assert_eq!(sel.dimension, vec2(5.0, 20.0));

    // Further drags on the same side keep the flip
    let handle = sel.resize(handle, pos2(0.0, 20.0), false);
    assert_eq!(handle, Handle::W);
    assert!(sel.has_flipped.vertical);
    assert_eq!(sel.rect(), Rect::from_min_max(pos2(0.0, 10.0), pos2(10.0, 30.0)));

    // Crossing back undoes it
    let handle = sel.resize(handle, pos2(25.0, 20.0), false);
    assert_eq!(handle, Handle::E);
    assert!(!sel.has_flipped.vertical);
    assert_eq!(sel.rect(), Rect::from_min_max(pos2(10.0, 10.0), pos2(25.0, 30.0)));
}

#[test]
fn test_dragging_north_past_south_edge_flips_horizontally() {
    let mut sel = selection(Rect::from_min_max(pos2(0.0, 0.0), pos2(20.0, 20.0)));
    sel.begin_resize(Handle::N);

    let handle = sel.resize(Handle::N, pos2(10.0, 30.0), false);
    assert_eq!(handle, Handle::S);
    assert!(sel.has_flipped.horizontal);
    assert!(!sel.has_flipped.vertical);
    assert_eq!(sel.rect(), Rect::from_min_max(pos2(0.0, 20.0), pos2(20.0, 30.0)));
}

#[test]
fn test_corner_flips_each_axis_independently() {
    let mut sel = selection(Rect::from_min_max(pos2(10.0, 10.0), pos2(30.0, 30.0)));
    sel.begin_resize(Handle::SE);

    let handle = sel.resize(Handle::SE, pos2(0.0, 40.0), false);
    assert_eq!(handle, Handle::SW);
    assert!(sel.has_flipped.vertical);
    assert!(!sel.has_flipped.horizontal);

    let handle = sel.resize(handle, pos2(0.0, 0.0), false);
    assert_eq!(handle, Handle::NW);
    assert!(sel.has_flipped.vertical);
    assert!(sel.has_flipped.horizontal);
    assert_eq!(sel.rect(), Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0)));
}

#[test]
fn test_shift_keeps_aspect_ratio_on_corners() {
    let mut sel = selection(Rect::from_min_max(pos2(0.0, 0.0), pos2(20.0, 10.0)));
    sel.begin_resize(Handle::SE);

    sel.resize(Handle::SE, pos2(40.0, 12.0), true);
    assert_eq!(sel.dimension, vec2(40.0, 20.0));

    sel.resize(Handle::SE, pos2(22.0, 30.0), true);
    assert_eq!(sel.dimension, vec2(60.0, 30.0));
    assert_eq!(sel.position, Pos2::ZERO);
}

#[test]
fn test_aspect_lock_uses_original_ratio_after_free_resize() {
    let mut sel = selection(Rect::from_min_max(pos2(0.0, 0.0), pos2(20.0, 10.0)));
    sel.begin_resize(Handle::SE);
    sel.resize(Handle::SE, pos2(30.0, 30.0), false);
    assert_eq!(sel.dimension, vec2(30.0, 30.0));

    sel.begin_resize(Handle::SE);
    sel.resize(Handle::SE, pos2(40.0, 12.0), true);
    assert_eq!(sel.dimension, vec2(40.0, 20.0));
}

#[test]
fn test_shift_is_ignored_on_edges() {
    let mut sel = selection(Rect::from_min_max(pos2(0.0, 0.0), pos2(20.0, 10.0)));
    sel.begin_resize(Handle::E);
    sel.resize(Handle::E, pos2(50.0, 3.0), true);
    assert_eq!(sel.dimension, vec2(50.0, 10.0));
}

#[test]
fn test_resize_never_collapses() {
    let mut sel = selection(Rect::from_min_max(pos2(10.0, 10.0), pos2(30.0, 30.0)));
    sel.begin_resize(Handle::E);
    sel.resize(Handle::E, pos2(10.0, 20.0), false);
    assert_eq!(sel.dimension.x, 1.0);
}

#[test]
fn test_reset_restores_original_geometry() {
    let mut sel = selection(Rect::from_min_max(pos2(10.0, 10.0), pos2(30.0, 30.0)));
    assert!(!sel.is_modified());
    sel.translate(vec2(3.0, 0.0));
    assert!(sel.is_modified());
    sel.reset();
    assert!(!sel.is_modified());
}

/// 50x50 white canvas with a black 10x10 square at (10, 10).
fn context_with_square() -> EditorContext {
    let mut image = RgbaImage::from_pixel(50, 50, Rgba(WHITE));
    for y in 10..20 {
        for x in 10..20 {
            image.put_pixel(x, y, Rgba(BLACK));
        }
    }
    let mut context = EditorContext::new(50, 50);
    context.open_image(image);
    block_on(context.set_tool(ToolKind::Selection)).unwrap();
    context
}

fn send(context: &mut EditorContext, event: InputEvent) {
    block_on(context.handle_event(event)).unwrap();
}

fn drag(context: &mut EditorContext, from: Pos2, to: Pos2) {
    send(context, InputEvent::PointerDown { button: PointerButton::Primary, pos: from });
    send(context, InputEvent::PointerMove { pos: to });
    send(context, InputEvent::PointerUp { button: PointerButton::Primary, pos: to });
}

fn key(context: &mut EditorContext, key: Key, modifiers: Modifiers) {
    send(context, InputEvent::KeyDown { key, modifiers });
}

fn tool(context: &EditorContext) -> &SelectionTool {
    match context.active_tool() {
        ToolType::Selection(tool) => tool,
        other => panic!("unexpected tool {other:?}"),
    }
}

#[test]
fn test_drag_creates_idle_selection() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));

    let tool = tool(&context);
    assert_eq!(tool.state(), SelectionState::Idle);
    let sel = tool.selection().unwrap();
    assert_eq!(sel.rect(), Rect::from_min_max(pos2(10.0, 10.0), pos2(30.0, 30.0)));
    assert_eq!((sel.content.width, sel.content.height), (20, 20));
    assert_eq!(&sel.content.data[..4], &BLACK);
    assert!(context.history().is_disabled());
}

#[test]
fn test_zero_area_drag_returns_to_off() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(10.0, 30.0));
    assert_eq!(tool(&context).state(), SelectionState::Off);
    assert!(tool(&context).selection().is_none());
}

#[test]
fn test_move_and_commit() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
    drag(&mut context, pos2(20.0, 20.0), pos2(40.0, 40.0));
    assert_eq!(tool(&context).selection().unwrap().position, pos2(30.0, 30.0));
    // Nothing lands on the canvas before the commit
    assert_eq!(context.base().pixel(15, 15), Some(BLACK));

    key(&mut context, Key::Escape, Modifiers::NONE);

    assert_eq!(tool(&context).state(), SelectionState::Off);
    assert!(matches!(context.history().past_commands(), [Command::Selection(_)]));
    assert_eq!(context.base().pixel(15, 15), Some(WHITE));
    assert_eq!(context.base().pixel(35, 35), Some(BLACK));
    assert_eq!(context.base().pixel(45, 45), Some(WHITE));
    assert!(!context.history().is_disabled());
}

#[test]
fn test_escape_during_drag_commits_and_release_is_ignored() {
    let down = |pos| InputEvent::PointerDown { button: PointerButton::Primary, pos };
    let up = |pos| InputEvent::PointerUp { button: PointerButton::Primary, pos };

    // Mid-move
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
    send(&mut context, down(pos2(20.0, 20.0)));
    send(&mut context, InputEvent::PointerMove { pos: pos2(40.0, 40.0) });
    assert_eq!(tool(&context).state(), SelectionState::Move);

    key(&mut context, Key::Escape, Modifiers::NONE);
    assert_eq!(tool(&context).state(), SelectionState::Off);
    assert_eq!(context.history().past_size(), 1);
    let committed = context.base().clone();

    send(&mut context, InputEvent::PointerMove { pos: pos2(45.0, 45.0) });
    send(&mut context, up(pos2(45.0, 45.0)));
    assert_eq!(tool(&context).state(), SelectionState::Off);
    assert_eq!(context.history().past_size(), 1);
    assert_eq!(context.base(), &committed);
    assert_eq!(context.base().pixel(35, 35), Some(BLACK));
    assert!(context.preview().image().pixels().all(|p| p.0[3] == 0));

    // Mid-resize through the east handle
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
    send(&mut context, down(pos2(30.0, 20.0)));
    send(&mut context, InputEvent::PointerMove { pos: pos2(40.0, 20.0) });
    assert_eq!(tool(&context).state(), SelectionState::Resize(Handle::E));

    key(&mut context, Key::Escape, Modifiers::NONE);
    send(&mut context, up(pos2(40.0, 20.0)));
    assert_eq!(tool(&context).state(), SelectionState::Off);
    let [Command::Selection(command)] = context.history().past_commands() else {
        panic!("expected one selection command");
    };
    assert_eq!(command.dest, Rect::from_min_max(pos2(10.0, 10.0), pos2(40.0, 30.0)));
    assert_eq!(context.base().pixel(12, 12), Some(BLACK));
    assert_eq!(context.base().pixel(25, 15), Some(WHITE));
    assert!(!context.history().is_disabled());
}

#[test]
fn test_escape_without_changes_commits_nothing() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
    key(&mut context, Key::Escape, Modifiers::NONE);

    assert_eq!(tool(&context).state(), SelectionState::Off);
    assert_eq!(context.history().past_size(), 0);
    assert!(context.preview().image().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn test_escape_while_creating_discards() {
    let mut context = context_with_square();
    send(&mut context, InputEvent::PointerDown { button: PointerButton::Primary, pos: pos2(5.0, 5.0) });
    send(&mut context, InputEvent::PointerMove { pos: pos2(25.0, 25.0) });
    assert_eq!(tool(&context).state(), SelectionState::Creating);

    key(&mut context, Key::Escape, Modifiers::NONE);
    assert_eq!(tool(&context).state(), SelectionState::Off);
    assert!(context.preview().image().pixels().all(|p| p.0[3] == 0));
}

#[test]
fn test_flip_through_east_handle_mirrors_pixels() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));

    // Grab the east handle and pull it across to the other side
    send(&mut context, InputEvent::PointerDown { button: PointerButton::Primary, pos: pos2(30.0, 20.0) });
    assert_eq!(tool(&context).state(), SelectionState::Resize(Handle::E));
    send(&mut context, InputEvent::PointerMove { pos: pos2(-10.0, 20.0) });
    assert_eq!(tool(&context).state(), SelectionState::Resize(Handle::W));
    send(&mut context, InputEvent::PointerUp { button: PointerButton::Primary, pos: pos2(-10.0, 20.0) });
    assert_eq!(tool(&context).state(), SelectionState::Idle);

    let sel = tool(&context).selection().unwrap();
    assert!(sel.has_flipped.vertical);
    assert_eq!(sel.rect(), Rect::from_min_max(pos2(-10.0, 10.0), pos2(10.0, 30.0)));

    key(&mut context, Key::Escape, Modifiers::NONE);
    // The black square sat on the left of the selection; mirrored it lands on the right
    assert_eq!(context.base().pixel(5, 15), Some(BLACK));
    assert_eq!(context.base().pixel(15, 15), Some(WHITE));
    assert_eq!(context.base().pixel(5, 25), Some(WHITE));
}

#[test]
fn test_arrow_keys_nudge_idle_selection() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
    key(&mut context, Key::ArrowRight, Modifiers::NONE);
    key(&mut context, Key::ArrowDown, Modifiers::NONE);
    key(&mut context, Key::ArrowDown, Modifiers::NONE);

    assert_eq!(tool(&context).selection().unwrap().position, pos2(13.0, 16.0));
}

#[test]
fn test_ctrl_a_selects_everything() {
    let mut context = context_with_square();
    key(&mut context, Key::Character('a'), Modifiers::CTRL);

    let tool = tool(&context);
    assert_eq!(tool.state(), SelectionState::Idle);
    assert_eq!(tool.selection().unwrap().rect(), context.base().bounds());
}

#[test]
fn test_click_outside_commits_and_starts_over() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
    key(&mut context, Key::ArrowRight, Modifiers::NONE);

    send(&mut context, InputEvent::PointerDown { button: PointerButton::Primary, pos: pos2(45.0, 45.0) });
    assert_eq!(context.history().past_size(), 1);
    assert_eq!(tool(&context).state(), SelectionState::Creating);
}

#[test]
fn test_switching_tool_commits_selection() {
    let mut context = context_with_square();
    drag(&mut context, pos2(10.0, 10.0), pos2(30.0, 30.0));
    key(&mut context, Key::ArrowLeft, Modifiers::NONE);

    block_on(context.set_tool(ToolKind::Pencil)).unwrap();
    assert_eq!(context.history().past_size(), 1);
    assert_eq!(context.base().pixel(7, 10), Some(BLACK));
    assert_eq!(context.base().pixel(17, 10), Some(WHITE));
}
