//! Path view
//!
//! Owns the aggregated nodes, the interaction state and the last rendered
//! frame. Every state-changing call re-runs layout and render together so the
//! bounds used for hit-testing always match the current nodes.

use super::aggregate::{aggregate, AggregatedNode};
use super::details::{node_panel, summary_panel, tooltip_lines, DetailPanel};
use super::interaction::{
    transition, EventOutcome, PathEvent, TooltipUpdate, VisualizationState, ZoomConfig,
};
use super::layout::{compute_layout, LayoutConfig, LayoutMode};
use super::render::{render, NodeStyle, RenderOptions, RenderedFrame};
use super::theme::PathTheme;
use crate::error::{PathError, Result};
use crate::records::ActionRecord;
use eframe::egui::{Pos2, Vec2};

/// Tunables for layout, rendering and zoom
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathSettings {
    pub layout: LayoutConfig,
    pub style: NodeStyle,
    pub zoom: ZoomConfig,
}

/// Visible tooltip
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub node: usize,
    /// Canvas-local pointer position
    pub anchor: Pos2,
    pub lines: Vec<String>,
}

pub struct PathView {
    nodes: Vec<AggregatedNode>,
    state: VisualizationState,
    frame: RenderedFrame,
    tooltip: Option<(usize, Pos2)>,
    settings: PathSettings,
    theme: PathTheme,
}

impl PathView {
    /// Open the view over `records`; refuses an empty log
    pub fn open(
        records: &[ActionRecord],
        canvas_size: Vec2,
        settings: PathSettings,
        theme: PathTheme,
    ) -> Result<Self> {
        if records.is_empty() {
            log::info!("Refusing to open path view: no recorded actions");
            return Err(PathError::EmptyRecordLog);
        }

        let nodes = aggregate(records);
        log::info!(
            "Opened path view: {} records in {} nodes",
            records.len(),
            nodes.len()
        );

        let mut view = Self {
            nodes,
            state: VisualizationState::new(canvas_size),
            frame: RenderedFrame::default(),
            tooltip: None,
            settings,
            theme,
        };
        view.redraw();
        Ok(view)
    }

    /// Replace the records, re-aggregating and clearing selection and hover
    ///
    /// An empty log is refused and leaves the view untouched.
    pub fn set_records(&mut self, records: &[ActionRecord]) -> Result<()> {
        if records.is_empty() {
            return Err(PathError::EmptyRecordLog);
        }
        self.nodes = aggregate(records);
        self.state.clear_selection();
        self.tooltip = None;
        log::debug!("Re-aggregated {} records into {} nodes", records.len(), self.nodes.len());
        self.redraw();
        Ok(())
    }

    /// Feed one input event; returns what changed
    pub fn handle(&mut self, event: PathEvent) -> EventOutcome {
        let outcome = transition(
            &mut self.state,
            &self.frame.bounds,
            event,
            &self.settings.zoom,
        );

        match outcome.tooltip {
            TooltipUpdate::Show { node, anchor } => self.tooltip = Some((node, anchor)),
            TooltipUpdate::Hide => self.tooltip = None,
            TooltipUpdate::Unchanged => {}
        }

        if outcome.redraw {
            self.redraw();
        }
        outcome
    }

    /// Relayout and render with the current state
    pub fn redraw(&mut self) {
        let positions = compute_layout(
            self.nodes.len(),
            self.state.canvas_size,
            self.state.curved,
            &self.settings.layout,
        );
        let options = RenderOptions {
            curved: self.state.curved,
            selected: self.state.selected,
        };
        self.frame = render(
            &self.nodes,
            &positions,
            self.state.transform,
            &options,
            &self.settings.style,
            &self.theme,
        );
    }

    /// Select a node directly, e.g. from a record list
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index >= self.nodes.len() {
            return Err(PathError::UnknownNode {
                index,
                count: self.nodes.len(),
            });
        }
        if self.state.selected != Some(index) {
            self.state.selected = Some(index);
            self.redraw();
        }
        Ok(())
    }

    pub fn set_theme(&mut self, theme: PathTheme) {
        self.theme = theme;
        self.redraw();
    }

    pub fn frame(&self) -> &RenderedFrame {
        &self.frame
    }

    pub fn nodes(&self) -> &[AggregatedNode] {
        &self.nodes
    }

    pub fn state(&self) -> &VisualizationState {
        &self.state
    }

    pub fn theme(&self) -> &PathTheme {
        &self.theme
    }

    pub fn layout_mode(&self) -> LayoutMode {
        LayoutMode::for_nodes(self.nodes.len(), self.state.curved)
    }

    pub fn selected_node(&self) -> Option<&AggregatedNode> {
        self.state.selected.and_then(|i| self.nodes.get(i))
    }

    /// Summary when nothing is selected, otherwise the selected node
    pub fn details(&self) -> DetailPanel {
        match self.state.selected {
            Some(index) if index < self.nodes.len() => node_panel(index, &self.nodes[index]),
            _ => summary_panel(&self.nodes),
        }
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let (node, anchor) = self.tooltip?;
        let aggregated = self.nodes.get(node)?;
        Some(Tooltip {
            node,
            anchor,
            lines: tooltip_lines(node, aggregated),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::aggregate::fixtures;
    use crate::path::render::ViewTransform;
    use crate::records::ActionType;

    const CANVAS: Vec2 = Vec2::new(1000.0, 600.0);

    fn records() -> Vec<ActionRecord> {
        vec![
            fixtures::cell("orders", 0, 0, 0),
            fixtures::cell("orders", 0, 1, 5),
            fixtures::plain(ActionType::Input, "x", 10),
        ]
    }

    fn open() -> PathView {
        PathView::open(&records(), CANVAS, PathSettings::default(), PathTheme::default())
            .unwrap()
    }

    #[test]
    fn test_open_refuses_empty_log() {
        let result = PathView::open(&[], CANVAS, PathSettings::default(), PathTheme::default());
        assert!(matches!(result, Err(PathError::EmptyRecordLog)));
    }

    #[test]
    fn test_open_renders_bounds() {
        let view = open();
        assert_eq!(view.nodes().len(), 2);
        assert_eq!(view.frame().bounds.len(), 2);
        assert_eq!(view.details().title, "Path summary");
    }

    #[test]
    fn test_click_at_node_center_selects() {
        let mut view = open();
        let center = view.frame().bounds[1].rect.center();
        let screen = view.state().transform.to_screen(center);
        let outcome = view.handle(PathEvent::Click(screen));
        assert!(outcome.selection_changed);
        assert_eq!(view.details().title, "#2 Input");
    }

    #[test]
    fn test_hover_tooltip_does_not_redraw() {
        let mut view = open();
        let before = view.frame().clone();
        let center = view.frame().bounds[0].center;
        let outcome = view.handle(PathEvent::PointerMove(center));
        assert!(!outcome.redraw);
        assert_eq!(view.frame(), &before);
        let tooltip = view.tooltip().unwrap();
        assert_eq!(tooltip.node, 0);
        assert_eq!(tooltip.lines[1], "2 actions");

        view.handle(PathEvent::PointerLeave);
        assert!(view.tooltip().is_none());
    }

    #[test]
    fn test_pan_moves_frame_transform_not_bounds() {
        let mut view = open();
        let bounds = view.frame().bounds.clone();
        view.handle(PathEvent::PointerDown(Pos2::ZERO));
        view.handle(PathEvent::PointerMove(Pos2::new(50.0, 50.0)));
        assert_eq!(view.frame().transform.offset, Vec2::new(50.0, 50.0));
        assert_eq!(view.frame().bounds, bounds);
    }

    #[test]
    fn test_set_records_clears_selection() {
        let mut view = open();
        view.select(1).unwrap();
        let mut more = records();
        more.push(fixtures::plain(ActionType::Submit, "go", 20));
        view.set_records(&more).unwrap();
        assert_eq!(view.state().selected, None);
        assert_eq!(view.frame().bounds.len(), 3);

        assert!(matches!(view.set_records(&[]), Err(PathError::EmptyRecordLog)));
        assert_eq!(view.nodes().len(), 3);
    }

    #[test]
    fn test_select_unknown_node() {
        let mut view = open();
        assert!(matches!(
            view.select(7),
            Err(PathError::UnknownNode { index: 7, count: 2 })
        ));
    }

    #[test]
    fn test_reset_after_pan_and_zoom() {
        let mut view = open();
        view.handle(PathEvent::PointerDown(Pos2::ZERO));
        view.handle(PathEvent::PointerMove(Pos2::new(50.0, 50.0)));
        view.handle(PathEvent::PointerUp);
        for _ in 0..8 {
            view.handle(PathEvent::Wheel { pos: Pos2::new(500.0, 300.0), delta: 1.0 });
        }
        view.handle(PathEvent::ToggleCurve);
        assert!(view.frame().transform.scale > 2.0);

        view.handle(PathEvent::Reset);
        assert_eq!(view.frame().transform, ViewTransform::IDENTITY);
        assert!(!view.state().curved);
    }
}
