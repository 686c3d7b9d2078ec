use egui::Pos2;

/// Pointer bookkeeping shared by the drag-based tools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureState {
    pub mouse_down: bool,
    /// Where the current drag started.
    pub mouse_down_coord: Pos2,
    pub last_mouse_pos: Pos2,
    /// Points collected during the drag, used by the stroke tools.
    pub path_data: Vec<Pos2>,
}

impl GestureState {
    pub fn begin(&mut self, pos: Pos2) {
        self.mouse_down = true;
        self.mouse_down_coord = pos;
        self.last_mouse_pos = pos;
        self.path_data.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
