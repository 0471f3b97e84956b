//! Action path visualization
//!
//! Aggregates a recorded action log into nodes, lays them out, renders them
//! as draw commands and handles pan/zoom/hover/selection on an egui canvas.

pub mod aggregate;
pub mod details;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod theme;
pub mod view;
pub mod viewer;

pub use aggregate::{aggregate, count_nodes, flatten, AggregatedNode, NodeCounts, TableGroup};
pub use details::{node_panel, summary_panel, tooltip_lines, DetailField, DetailPanel};
pub use interaction::{
    transition, zoom_at, EventOutcome, PathEvent, PointerState, TooltipUpdate,
    VisualizationState, ZoomConfig,
};
pub use layout::{compute_layout, grid_dimensions, LayoutConfig, LayoutMode};
pub use render::{
    hit_test, render, DrawCommand, NodeBounds, NodeStyle, RenderOptions, RenderedFrame,
    ViewTransform,
};
pub use theme::PathTheme;
pub use view::{PathSettings, PathView, Tooltip};
pub use viewer::PathViewer;
