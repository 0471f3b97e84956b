//! Path colours
//!
//! Maps action types and node states to colours derived from the app theme.

use crate::records::ActionType;
use crate::theme::Theme;
use eframe::egui::Color32;

/// Colours used by the path renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathTheme {
    pub canvas_bg: Color32,

    pub click: Color32,
    pub input: Color32,
    pub change: Color32,
    pub submit: Color32,

    /// Fill of grouped table nodes
    pub table_group: Color32,

    pub node_stroke: Color32,
    pub node_selected: Color32,

    /// Text drawn inside node circles
    pub node_text: Color32,
    /// Type label below the circle
    pub label_title: Color32,
    /// Wrapped description below the type label
    pub label_text: Color32,

    pub connector: Color32,
}

impl PathTheme {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            canvas_bg: theme.canvas_bg,

            click: theme.syntax_keyword,
            input: theme.success,
            change: theme.syntax_string,
            submit: theme.error,

            table_group: theme.syntax_type,

            node_stroke: theme.border,
            node_selected: theme.accent_hover,

            node_text: Color32::WHITE,
            label_title: theme.fg_bright,
            label_text: theme.fg_dim,

            connector: theme.fg_dim,
        }
    }

    pub fn dark() -> Self {
        Self::from_theme(&Theme::dark())
    }

    pub fn light() -> Self {
        Self::from_theme(&Theme::light())
    }

    pub fn action_color(&self, action: ActionType) -> Color32 {
        match action {
            ActionType::Click => self.click,
            ActionType::Input => self.input,
            ActionType::Change => self.change,
            ActionType::Submit => self.submit,
        }
    }
}

impl Default for PathTheme {
    fn default() -> Self {
        Self::dark()
    }
}
