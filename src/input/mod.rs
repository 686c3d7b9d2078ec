use egui::{Context, Pos2, Rect, Vec2};

pub use egui::{Modifiers, PointerButton};

/// Keys the editor reacts to. Everything else arrives as [`Key::Character`]
/// or is dropped by the [`InputHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Backspace,
    Delete,
    Enter,
    Shift,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// A letter, always lowercase
    Character(char),
}

impl Key {
    fn from_egui(key: egui::Key) -> Option<Self> {
        use egui::Key as K;
        let key = match key {
            K::Escape => Key::Escape,
            K::Backspace => Key::Backspace,
            K::Delete => Key::Delete,
            K::Enter => Key::Enter,
            K::ArrowUp => Key::ArrowUp,
            K::ArrowDown => Key::ArrowDown,
            K::ArrowLeft => Key::ArrowLeft,
            K::ArrowRight => Key::ArrowRight,
            other => {
                let mut chars = other.name().chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => Key::Character(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }
}

/// Ctrl, or Cmd on macOS.
pub fn is_command(modifiers: Modifiers) -> bool {
    modifiers.ctrl || modifiers.command || modifiers.mac_cmd
}

/// Represents the input events the editor consumes, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button was pressed
    PointerDown { button: PointerButton, pos: Pos2 },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { pos: Pos2 },
    /// Mouse button was released
    PointerUp { button: PointerButton, pos: Pos2 },
    DoubleClick { pos: Pos2 },
    /// Mouse entered the canvas
    PointerEnter { pos: Pos2 },
    /// Mouse left the canvas
    PointerLeave,
    KeyDown { key: Key, modifiers: Modifiers },
    KeyUp { key: Key, modifiers: Modifiers },
    Wheel { delta: Vec2 },
}

/// Handles converting raw egui input into our domain-specific InputEvents
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    shift_down: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate this frame's egui input. `canvas_rect` is where the canvas
    /// is drawn on screen; positions are reported relative to its top-left.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<InputEvent> {
        let to_canvas = |pos: Pos2| (pos - canvas_rect.min).to_pos2();
        let mut events = Vec::new();

        ctx.input(|input| {
            if input.modifiers.shift != self.shift_down {
                self.shift_down = input.modifiers.shift;
                events.push(if self.shift_down {
                    InputEvent::KeyDown {
                        key: Key::Shift,
                        modifiers: input.modifiers,
                    }
                } else {
                    InputEvent::KeyUp {
                        key: Key::Shift,
                        modifiers: input.modifiers,
                    }
                });
            }

            for event in &input.events {
                match event {
                    egui::Event::PointerMoved(pos) => {
                        let inside = canvas_rect.contains(*pos);
                        let was_inside = self.last_pointer_pos.is_some_and(|p| canvas_rect.contains(p));
                        if inside && !was_inside {
                            events.push(InputEvent::PointerEnter { pos: to_canvas(*pos) });
                        } else if !inside && was_inside {
                            events.push(InputEvent::PointerLeave);
                        }
                        events.push(InputEvent::PointerMove { pos: to_canvas(*pos) });
                        self.last_pointer_pos = Some(*pos);
                    }
                    egui::Event::PointerButton {
                        pos,
                        button,
                        pressed,
                        ..
                    } => {
                        let pos = to_canvas(*pos);
                        events.push(if *pressed {
                            InputEvent::PointerDown { button: *button, pos }
                        } else {
                            InputEvent::PointerUp { button: *button, pos }
                        });
                    }
                    egui::Event::PointerGone => {
                        if self.last_pointer_pos.take().is_some() {
                            events.push(InputEvent::PointerLeave);
                        }
                    }
                    egui::Event::Key {
                        key,
                        pressed,
                        modifiers,
                        ..
                    } => {
                        if let Some(key) = Key::from_egui(*key) {
                            events.push(if *pressed {
                                InputEvent::KeyDown {
                                    key,
                                    modifiers: *modifiers,
                                }
                            } else {
                                InputEvent::KeyUp {
                                    key,
                                    modifiers: *modifiers,
                                }
                            });
                        }
                    }
                    _ => {}
                }
            }

            if input.pointer.button_double_clicked(PointerButton::Primary) {
                if let Some(pos) = input.pointer.interact_pos() {
                    events.push(InputEvent::DoubleClick { pos: to_canvas(pos) });
                }
            }

            if input.raw_scroll_delta != Vec2::ZERO {
                events.push(InputEvent::Wheel {
                    delta: input.raw_scroll_delta,
                });
            }
        });

        events
    }
}
