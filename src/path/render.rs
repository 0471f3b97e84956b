//! Path renderer
//!
//! Turns laid-out nodes into backend-neutral draw commands in world space,
//! plus the per-node bounds used for hit-testing. The frame carries the view
//! transform once; whoever paints the commands applies it to all geometry.
//!
//! - Straight or cubic Bézier connectors with arrowheads
//! - Circle glyphs coloured by action type, larger for table groups
//! - Index / table count inside the circle, type + wrapped description below

use super::aggregate::AggregatedNode;
use super::theme::PathTheme;
use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, Vec2};

/// Pan offset + uniform scale: `screen = world * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        offset: Vec2::ZERO,
        scale: 1.0,
    };

    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        Pos2::new(
            world.x * self.scale + self.offset.x,
            world.y * self.scale + self.offset.y,
        )
    }

    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        Pos2::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }
}

/// Node geometry and label metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    /// Circle radius of a single node; groups add `group_radius_bonus`
    pub radius: f32,
    pub group_radius_bonus: f32,
    /// Wrap threshold for the description, in characters
    pub wrap_chars: usize,
    pub max_label_lines: usize,
    /// Gap between circle and label block
    pub label_gap: f32,
    pub line_height: f32,
    /// Average glyph width used to size label bounds
    pub char_width: f32,
    pub index_font_size: f32,
    pub title_font_size: f32,
    pub text_font_size: f32,
    pub connector_width: f32,
    pub arrow_size: f32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            radius: 25.0,
            group_radius_bonus: 5.0,
            wrap_chars: 20,
            max_label_lines: 3,
            label_gap: 8.0,
            line_height: 14.0,
            char_width: 6.5,
            index_font_size: 14.0,
            title_font_size: 12.0,
            text_font_size: 11.0,
            connector_width: 2.0,
            arrow_size: 10.0,
        }
    }
}

impl NodeStyle {
    pub fn radius_for(&self, node: &AggregatedNode) -> f32 {
        if node.is_group() {
            self.radius + self.group_radius_bonus
        } else {
            self.radius
        }
    }
}

/// One drawing primitive, in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Line {
        points: [Pos2; 2],
        stroke: Stroke,
    },
    Bezier {
        points: [Pos2; 4],
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Pos2>,
        fill: Color32,
    },
    Text {
        pos: Pos2,
        anchor: Align2,
        text: String,
        /// Unscaled font size
        size: f32,
        color: Color32,
    },
}

/// Hit-test rectangle of one node, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBounds {
    pub index: usize,
    pub center: Pos2,
    pub radius: f32,
    /// Circle plus label block
    pub rect: Rect,
}

/// First node whose bounds contain `world`
pub fn hit_test(bounds: &[NodeBounds], world: Pos2) -> Option<usize> {
    bounds.iter().find(|b| b.rect.contains(world)).map(|b| b.index)
}

/// Output of one render pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedFrame {
    pub transform: ViewTransform,
    pub commands: Vec<DrawCommand>,
    pub bounds: Vec<NodeBounds>,
}

/// Per-pass options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub curved: bool,
    pub selected: Option<usize>,
}

/// Render laid-out nodes
pub fn render(
    nodes: &[AggregatedNode],
    positions: &[Pos2],
    transform: ViewTransform,
    options: &RenderOptions,
    style: &NodeStyle,
    theme: &PathTheme,
) -> RenderedFrame {
    let count = nodes.len().min(positions.len());
    let mut commands = Vec::new();
    let mut bounds = Vec::with_capacity(count);

    // Connectors first so they sit behind the circles
    for i in 1..count {
        draw_connector(
            &mut commands,
            positions[i - 1],
            style.radius_for(&nodes[i - 1]),
            positions[i],
            style.radius_for(&nodes[i]),
            options.curved,
            style,
            theme,
        );
    }

    for (index, (node, &center)) in nodes.iter().zip(positions).enumerate().take(count) {
        let node_bounds = draw_node(&mut commands, index, node, center, options, style, theme);
        bounds.push(node_bounds);
    }

    RenderedFrame {
        transform,
        commands,
        bounds,
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_connector(
    commands: &mut Vec<DrawCommand>,
    from: Pos2,
    from_radius: f32,
    to: Pos2,
    to_radius: f32,
    curved: bool,
    style: &NodeStyle,
    theme: &PathTheme,
) {
    let chord = to - from;
    if chord.length() <= from_radius + to_radius {
        return;
    }
    let dir = chord.normalized();
    let start = from + dir * from_radius;
    let end = to - dir * to_radius;
    let stroke = Stroke::new(style.connector_width, theme.connector);

    let arrow_dir = if curved {
        let mid_x = (start.x + end.x) / 2.0;
        let points = [
            start,
            Pos2::new(mid_x, start.y),
            Pos2::new(mid_x, end.y),
            end,
        ];
        commands.push(DrawCommand::Bezier { points, stroke });

        let tangent = bezier_tangent(&points, 0.9);
        if tangent.length() > f32::EPSILON {
            tangent.normalized()
        } else {
            dir
        }
    } else {
        commands.push(DrawCommand::Line {
            points: [start, end],
            stroke,
        });
        dir
    };

    commands.push(DrawCommand::Polygon {
        points: arrow_head(end, arrow_dir, style.arrow_size).to_vec(),
        fill: theme.connector,
    });
}

fn draw_node(
    commands: &mut Vec<DrawCommand>,
    index: usize,
    node: &AggregatedNode,
    center: Pos2,
    options: &RenderOptions,
    style: &NodeStyle,
    theme: &PathTheme,
) -> NodeBounds {
    let radius = style.radius_for(node);

    let stroke = if options.selected == Some(index) {
        Stroke::new(4.0, theme.node_selected)
    } else {
        Stroke::new(2.0, theme.node_stroke)
    };

    let (fill, inner, title, description) = match node {
        AggregatedNode::Single(record) => (
            theme.action_color(record.action),
            (index + 1).to_string(),
            record.action.label().to_string(),
            record.description.as_str(),
        ),
        AggregatedNode::TableGroup(group) => (
            theme.table_group,
            format!("▦ {}", group.count()),
            "Table".to_string(),
            group.table.display_name(),
        ),
    };

    commands.push(DrawCommand::Circle {
        center,
        radius,
        fill,
        stroke,
    });
    commands.push(DrawCommand::Text {
        pos: center,
        anchor: Align2::CENTER_CENTER,
        text: inner,
        size: style.index_font_size,
        color: theme.node_text,
    });

    let label_top = center.y + radius + style.label_gap;
    let lines = wrap_text(description, style.wrap_chars, style.max_label_lines);
    let widest = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);

    commands.push(DrawCommand::Text {
        pos: Pos2::new(center.x, label_top),
        anchor: Align2::CENTER_TOP,
        text: title,
        size: style.title_font_size,
        color: theme.label_title,
    });
    for (i, line) in lines.iter().enumerate() {
        commands.push(DrawCommand::Text {
            pos: Pos2::new(center.x, label_top + (i + 1) as f32 * style.line_height),
            anchor: Align2::CENTER_TOP,
            text: line.clone(),
            size: style.text_font_size,
            color: theme.label_text,
        });
    }

    let half_width = (widest as f32 * style.char_width / 2.0).max(radius);
    let bottom = label_top + (lines.len() + 1) as f32 * style.line_height;
    NodeBounds {
        index,
        center,
        radius,
        rect: Rect::from_min_max(
            Pos2::new(center.x - half_width, center.y - radius),
            Pos2::new(center.x + half_width, bottom),
        ),
    }
}

/// Derivative of a cubic Bézier at `t`
pub fn bezier_tangent(points: &[Pos2; 4], t: f32) -> Vec2 {
    let [p0, p1, p2, p3] = *points;
    let u = 1.0 - t;
    (p1 - p0) * (3.0 * u * u) + (p2 - p1) * (6.0 * u * t) + (p3 - p2) * (3.0 * t * t)
}

/// Triangle with its tip at `tip`, pointing along `direction`
pub fn arrow_head(tip: Pos2, direction: Vec2, size: f32) -> [Pos2; 3] {
    let back = -direction.normalized();
    let angle: f32 = std::f32::consts::PI / 6.0;
    let (sin, cos) = angle.sin_cos();

    let left = tip + Vec2::new(back.x * cos - back.y * sin, back.x * sin + back.y * cos) * size;
    let right = tip + Vec2::new(back.x * cos + back.y * sin, -back.x * sin + back.y * cos) * size;

    [tip, left, right]
}

/// Word-wrap `text` to lines of at most `width` characters
///
/// A word longer than a line keeps its first `width` characters and loses
/// the rest; it never continues on the next line. Anything beyond
/// `max_lines` is dropped at a word boundary, without an ellipsis.
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    if max_lines == 0 {
        return lines;
    }

    let mut current = String::new();
    let mut current_len = 0;

    for piece in text.split_whitespace().map(|w| clip_word(w, width)) {
        let piece_len = piece.chars().count();
        if current.is_empty() {
            current = piece;
            current_len = piece_len;
        } else if current_len + 1 + piece_len <= width {
            current.push(' ');
            current.push_str(&piece);
            current_len += 1 + piece_len;
        } else {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                return lines;
            }
            current = piece;
            current_len = piece_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn clip_word(word: &str, width: usize) -> String {
    word.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::aggregate::{aggregate, fixtures};
    use crate::records::ActionType;

    fn frame(curved: bool) -> RenderedFrame {
        let nodes = aggregate(&[
            fixtures::cell("orders", 0, 0, 0),
            fixtures::cell("orders", 0, 1, 1),
            fixtures::plain(ActionType::Input, "search", 2),
        ]);
        let positions = vec![Pos2::new(100.0, 100.0), Pos2::new(300.0, 100.0)];
        render(
            &nodes,
            &positions,
            ViewTransform::IDENTITY,
            &RenderOptions { curved, ..Default::default() },
            &NodeStyle::default(),
            &PathTheme::default(),
        )
    }

    #[test]
    fn test_transform_roundtrip() {
        let t = ViewTransform { offset: Vec2::new(40.0, -10.0), scale: 2.0 };
        let world = Pos2::new(12.5, 7.0);
        let screen = t.to_screen(world);
        assert_eq!(screen, Pos2::new(65.0, 4.0));
        assert_eq!(t.to_world(screen), world);
    }

    #[test]
    fn test_group_radius_and_bounds() {
        let frame = frame(false);
        assert_eq!(frame.bounds.len(), 2);

        let group = frame.bounds[0];
        assert_eq!(group.radius, 30.0);
        assert_eq!(frame.bounds[1].radius, 25.0);
        assert!(group.rect.contains(group.center));
        assert!(group.rect.max.y > group.center.y + group.radius);
        assert_eq!(hit_test(&frame.bounds, Pos2::new(300.0, 100.0)), Some(1));
        assert_eq!(hit_test(&frame.bounds, Pos2::new(200.0, 100.0)), None);
    }

    #[test]
    fn test_straight_connector_has_arrow() {
        let frame = frame(false);
        let line = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Line { points, .. } => Some(*points),
                _ => None,
            })
            .unwrap();
        // From the group's rim (r=30) to the single's rim (r=25)
        assert_eq!(line, [Pos2::new(130.0, 100.0), Pos2::new(275.0, 100.0)]);
        assert!(frame
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Polygon { points, .. } if points[0] == line[1])));
    }

    #[test]
    fn test_curved_connector_control_points() {
        let frame = frame(true);
        let points = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Bezier { points, .. } => Some(*points),
                _ => None,
            })
            .unwrap();
        assert_eq!(points[1], Pos2::new(202.5, 100.0));
        assert_eq!(points[2], Pos2::new(202.5, 100.0));
        assert!(!frame.commands.iter().any(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_bezier_tangent_direction() {
        let points = [
            Pos2::new(0.0, 0.0),
            Pos2::new(50.0, 0.0),
            Pos2::new(50.0, 100.0),
            Pos2::new(100.0, 100.0),
        ];
        let tangent = bezier_tangent(&points, 0.9);
        assert!(tangent.x > 0.0);
        assert!(tangent.y > 0.0);
        // Close to the end the curve flattens out horizontally
        assert!(tangent.x > tangent.y);
    }

    #[test]
    fn test_arrow_head_points_backwards() {
        let [tip, left, right] = arrow_head(Pos2::new(100.0, 0.0), Vec2::new(1.0, 0.0), 10.0);
        assert_eq!(tip, Pos2::new(100.0, 0.0));
        assert!(left.x < 100.0 && right.x < 100.0);
        assert!((left.y + right.y).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("Click button Save changes now please", 12, 3),
            vec!["Click button", "Save changes", "now please"]
        );
        // Overflow is dropped at a word boundary
        assert_eq!(
            wrap_text("one two three four five six seven", 9, 2),
            vec!["one two", "three"]
        );
        assert_eq!(wrap_text("abcdefghij", 4, 3), vec!["abcd"]);
        assert!(wrap_text("anything", 10, 0).is_empty());
        assert!(wrap_text("   ", 10, 3).is_empty());
    }

    #[test]
    fn test_long_word_tail_dropped_not_wrapped() {
        assert_eq!(
            wrap_text("Open https://shop.example/admin/orders/10423 now", 10, 3),
            vec!["Open", "https://sh", "now"]
        );
        // At the line cap the last line is a whole word, never a word fragment
        let lines = wrap_text("alpha beta averyveryverylongword tail", 6, 2);
        assert_eq!(lines, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_bounds_grow_with_label_lines() {
        let style = NodeStyle::default();
        let theme = PathTheme::default();
        let short = aggregate(&[fixtures::plain(ActionType::Click, "a", 0)]);
        let mut long_record = fixtures::plain(ActionType::Click, "b", 0);
        long_record.description = "a fairly long description that wraps onto several lines".into();
        let long = aggregate(&[long_record]);

        let p = [Pos2::new(0.0, 0.0)];
        let opts = RenderOptions::default();
        let a = render(&short, &p, ViewTransform::IDENTITY, &opts, &style, &theme).bounds[0];
        let b = render(&long, &p, ViewTransform::IDENTITY, &opts, &style, &theme).bounds[0];
        assert!(b.rect.height() > a.rect.height());
    }
}
