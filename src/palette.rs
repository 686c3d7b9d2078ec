use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Number of recently used colours kept by the palette.
pub const COLOR_HISTORY_SIZE: usize = 10;

/// Primary/secondary colours plus a short history of replaced colours.
///
/// Colours are `Copy`, so everything stored here is an independent value:
/// changing the primary colour later never rewrites an entry of the history
/// or a colour captured by an already committed command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    primary: Color,
    secondary: Color,
    history: VecDeque<Color>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            primary: Color::BLACK,
            secondary: Color::WHITE,
            history: VecDeque::new(),
        }
    }
}

impl ColorPalette {
    pub fn primary(&self) -> Color {
        self.primary
    }

    pub fn secondary(&self) -> Color {
        self.secondary
    }

    /// Recent colours, newest first.
    pub fn history(&self) -> impl Iterator<Item = &Color> {
        self.history.iter()
    }

    pub fn set_primary(&mut self, color: Color) {
        if color != self.primary {
            self.remember(self.primary);
            self.primary = color;
        }
    }

    pub fn set_secondary(&mut self, color: Color) {
        if color != self.secondary {
            self.remember(self.secondary);
            self.secondary = color;
        }
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.primary, &mut self.secondary);
    }

    fn remember(&mut self, color: Color) {
        if self.history.front() == Some(&color) {
            return;
        }
        self.history.push_front(color);
        self.history.truncate(COLOR_HISTORY_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded_and_newest_first() {
        let mut palette = ColorPalette::default();
        for hue in 0..15 {
            palette.set_primary(Color::new(f64::from(hue) * 10.0, 50.0, 50.0, 1.0));
        }
        let history: Vec<_> = palette.history().copied().collect();
        assert_eq!(history.len(), COLOR_HISTORY_SIZE);
        assert_eq!(history[0], Color::new(130.0, 50.0, 50.0, 1.0));
    }

    #[test]
    fn test_swap_exchanges_colors() {
        let mut palette = ColorPalette::default();
        palette.swap();
        assert_eq!(palette.primary(), Color::WHITE);
        assert_eq!(palette.secondary(), Color::BLACK);
    }
}
