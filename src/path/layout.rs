//! Path layout
//!
//! Two placements for the aggregated node sequence:
//! - Linear: one horizontal row
//! - Serpentine: near-square grid in row-major order, used in curve mode
//!
//! Positions are node centres in world space, centred on the canvas centre.
//! The view transform is applied by the renderer, never here.

use eframe::egui::{Pos2, Vec2};

/// Serpentine needs more nodes than this to be legible
pub const MIN_SERPENTINE_NODES: usize = 4;

/// Available placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Linear,
    Serpentine,
}

impl LayoutMode {
    /// Placement used for `count` nodes with the curve flag set as given
    pub fn for_nodes(count: usize, curved: bool) -> Self {
        if curved && count >= MIN_SERPENTINE_NODES {
            LayoutMode::Serpentine
        } else {
            LayoutMode::Linear
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutMode::Linear => "Linear",
            LayoutMode::Serpentine => "Serpentine",
        }
    }
}

/// Layout configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Distance between neighbouring node centres, both axes
    pub pitch: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { pitch: 200.0 }
    }
}

/// Grid dimensions (rows, cols) for a serpentine layout of `count` nodes
pub fn grid_dimensions(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let rows = (count as f64).sqrt().ceil() as usize;
    let cols = count.div_ceil(rows);
    (rows, cols)
}

/// Compute node centres for `count` nodes on a canvas of `canvas_size`
pub fn compute_layout(
    count: usize,
    canvas_size: Vec2,
    curved: bool,
    config: &LayoutConfig,
) -> Vec<Pos2> {
    let center = Pos2::new(canvas_size.x / 2.0, canvas_size.y / 2.0);

    match LayoutMode::for_nodes(count, curved) {
        LayoutMode::Linear => linear_layout(count, center, config.pitch),
        LayoutMode::Serpentine => grid_layout(count, center, config.pitch),
    }
}

fn linear_layout(count: usize, center: Pos2, pitch: f32) -> Vec<Pos2> {
    if count == 0 {
        return Vec::new();
    }
    let extent = (count - 1) as f32 * pitch;
    let start_x = center.x - extent / 2.0;

    (0..count)
        .map(|i| Pos2::new(start_x + i as f32 * pitch, center.y))
        .collect()
}

fn grid_layout(count: usize, center: Pos2, pitch: f32) -> Vec<Pos2> {
    let (rows, cols) = grid_dimensions(count);
    let width = (cols.saturating_sub(1)) as f32 * pitch;
    let height = (rows.saturating_sub(1)) as f32 * pitch;
    let origin = Pos2::new(center.x - width / 2.0, center.y - height / 2.0);

    (0..count)
        .map(|i| {
            let row = i / cols;
            let col = i % cols;
            Pos2::new(
                origin.x + col as f32 * pitch,
                origin.y + row as f32 * pitch,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = Vec2::new(1000.0, 600.0);

    #[test]
    fn test_linear_layout_centered() {
        let positions = compute_layout(3, CANVAS, false, &LayoutConfig::default());
        assert_eq!(
            positions,
            vec![
                Pos2::new(300.0, 300.0),
                Pos2::new(500.0, 300.0),
                Pos2::new(700.0, 300.0),
            ]
        );
    }

    #[test]
    fn test_curved_with_few_nodes_stays_linear() {
        let config = LayoutConfig::default();
        assert_eq!(
            compute_layout(3, CANVAS, true, &config),
            compute_layout(3, CANVAS, false, &config)
        );
        assert_eq!(LayoutMode::for_nodes(3, true), LayoutMode::Linear);
        assert_eq!(LayoutMode::for_nodes(4, true), LayoutMode::Serpentine);
    }

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (3, 2));
        assert_eq!(grid_dimensions(10), (4, 3));
        assert_eq!(grid_dimensions(0), (0, 0));
    }

    #[test]
    fn test_serpentine_row_major_and_centered() {
        let positions = compute_layout(5, CANVAS, true, &LayoutConfig { pitch: 100.0 });
        // 3 rows x 2 cols, spanning 100 x 200 around (500, 300)
        assert_eq!(positions[0], Pos2::new(450.0, 200.0));
        assert_eq!(positions[1], Pos2::new(550.0, 200.0));
        assert_eq!(positions[2], Pos2::new(450.0, 300.0));
        assert_eq!(positions[4], Pos2::new(450.0, 400.0));
    }

    #[test]
    fn test_empty_and_single() {
        assert!(compute_layout(0, CANVAS, true, &LayoutConfig::default()).is_empty());
        assert_eq!(
            compute_layout(1, CANVAS, false, &LayoutConfig::default()),
            vec![Pos2::new(500.0, 300.0)]
        );
    }
}
