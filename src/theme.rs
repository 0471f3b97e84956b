//! Application colour themes

use eframe::egui::{self, Color32, Stroke};

/// VS Code Dark+/Light+ inspired palette
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub bg: Color32,
    pub panel_bg: Color32,
    pub canvas_bg: Color32,

    pub fg: Color32,
    pub fg_dim: Color32,
    pub fg_bright: Color32,

    pub accent: Color32,
    pub accent_hover: Color32,

    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    pub border: Color32,
    pub selection: Color32,

    // Syntax colours, reused for action types
    pub syntax_keyword: Color32,
    pub syntax_string: Color32,
    pub syntax_type: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color32::from_rgb(30, 30, 30),         // #1e1e1e
            panel_bg: Color32::from_rgb(37, 37, 38),   // #252526
            canvas_bg: Color32::from_rgb(26, 26, 26),  // #1a1a1a

            fg: Color32::from_rgb(204, 204, 204),     // #cccccc
            fg_dim: Color32::from_rgb(128, 128, 128), // #808080
            fg_bright: Color32::from_rgb(255, 255, 255), // #ffffff

            accent: Color32::from_rgb(0, 120, 212), // #0078d4
            accent_hover: Color32::from_rgb(26, 140, 255), // #1a8cff

            success: Color32::from_rgb(63, 185, 80), // #3fb950
            warning: Color32::from_rgb(204, 167, 0), // #cca700
            error: Color32::from_rgb(248, 81, 73),   // #f85149

            border: Color32::from_rgb(60, 60, 60), // #3c3c3c
            selection: Color32::from_rgb(38, 79, 120), // #264f78

            syntax_keyword: Color32::from_rgb(86, 156, 214), // #569cd6 - blue
            syntax_string: Color32::from_rgb(206, 145, 120), // #ce9178 - orange
            syntax_type: Color32::from_rgb(78, 201, 176),    // #4ec9b0 - teal
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color32::from_rgb(255, 255, 255),      // #ffffff
            panel_bg: Color32::from_rgb(243, 243, 243), // #f3f3f3
            canvas_bg: Color32::from_rgb(250, 250, 250), // #fafafa

            fg: Color32::from_rgb(51, 51, 51),        // #333333
            fg_dim: Color32::from_rgb(128, 128, 128), // #808080
            fg_bright: Color32::from_rgb(0, 0, 0),    // #000000

            accent: Color32::from_rgb(0, 120, 212), // #0078d4
            accent_hover: Color32::from_rgb(26, 140, 255), // #1a8cff

            success: Color32::from_rgb(40, 160, 40), // green
            warning: Color32::from_rgb(180, 130, 0), // amber
            error: Color32::from_rgb(200, 50, 50),   // red

            border: Color32::from_rgb(200, 200, 200), // light gray
            selection: Color32::from_rgb(173, 214, 255), // light blue selection

            syntax_keyword: Color32::from_rgb(0, 0, 255), // #0000ff - blue
            syntax_string: Color32::from_rgb(163, 21, 21), // #a31515 - red
            syntax_type: Color32::from_rgb(38, 127, 153), // #267f99 - teal
        }
    }

    /// Theme by config name, falling back to dark
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "light" => Self::light(),
            "dark" => Self::dark(),
            other => {
                log::warn!("Unknown theme '{}', using dark", other);
                Self::dark()
            }
        }
    }

    /// Whether this is a light theme (based on background luminance)
    pub fn is_light(&self) -> bool {
        let luminance =
            0.299 * self.bg.r() as f32 + 0.587 * self.bg.g() as f32 + 0.114 * self.bg.b() as f32;
        luminance > 128.0
    }

    /// Apply the palette to egui visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.is_light() {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        visuals.panel_fill = self.panel_bg;
        visuals.window_fill = self.bg;
        visuals.extreme_bg_color = self.canvas_bg;
        visuals.selection.bg_fill = self.selection;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.active.bg_fill = self.accent;
        visuals.override_text_color = Some(self.fg);
        ctx.set_visuals(visuals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_detection() {
        assert!(Theme::light().is_light());
        assert!(!Theme::dark().is_light());
        assert_eq!(Theme::from_name("LIGHT"), Theme::light());
        assert_eq!(Theme::from_name("solarized"), Theme::dark());
    }
}
