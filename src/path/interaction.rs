//! Interaction controller
//!
//! Pointer and toolbar input as a pure transition over [`VisualizationState`].
//! Positions in events are canvas-local screen coordinates. Hit-testing goes
//! through the inverse view transform against the bounds of the last render.

use super::render::{hit_test, NodeBounds, ViewTransform};
use eframe::egui::{Pos2, Vec2};

/// Pointer mode; selection is held separately
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging {
        last: Pos2,
    },
    Hovering(usize),
}

/// Input understood by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp,
    PointerLeave,
    Click(Pos2),
    /// Positive `delta` scrolls up (zoom in)
    Wheel {
        pos: Pos2,
        delta: f32,
    },
    ZoomIn,
    ZoomOut,
    Reset,
    ToggleCurve,
    Resize(Vec2),
}

/// What the tooltip overlay should do after an event
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TooltipUpdate {
    #[default]
    Unchanged,
    Show {
        node: usize,
        anchor: Pos2,
    },
    Hide,
}

/// Effects of one transition
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventOutcome {
    /// Relayout and render the canvas
    pub redraw: bool,
    pub tooltip: TooltipUpdate,
    pub selection_changed: bool,
}

impl EventOutcome {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Default::default()
        }
    }
}

/// Zoom limits and step factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub wheel_in: f32,
    pub wheel_out: f32,
    pub button_step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 3.0,
            wheel_in: 1.1,
            wheel_out: 0.9,
            button_step: 1.2,
        }
    }
}

impl ZoomConfig {
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

/// View state of the path canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizationState {
    pub transform: ViewTransform,
    pub curved: bool,
    pub selected: Option<usize>,
    pub pointer: PointerState,
    pub canvas_size: Vec2,
}

impl Default for VisualizationState {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

impl VisualizationState {
    pub fn new(canvas_size: Vec2) -> Self {
        Self {
            transform: ViewTransform::IDENTITY,
            curved: false,
            selected: None,
            pointer: PointerState::Idle,
            canvas_size,
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        match self.pointer {
            PointerState::Hovering(index) => Some(index),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pointer, PointerState::Dragging { .. })
    }

    /// Drop selection and hover after the node list changed
    pub fn clear_selection(&mut self) {
        self.selected = None;
        if self.hovered().is_some() {
            self.pointer = PointerState::Idle;
        }
    }
}

/// Apply one event to `state`
pub fn transition(
    state: &mut VisualizationState,
    bounds: &[NodeBounds],
    event: PathEvent,
    zoom: &ZoomConfig,
) -> EventOutcome {
    match event {
        PathEvent::PointerDown(pos) => {
            let was_hovering = state.hovered().is_some();
            state.pointer = PointerState::Dragging { last: pos };
            EventOutcome {
                tooltip: if was_hovering {
                    TooltipUpdate::Hide
                } else {
                    TooltipUpdate::Unchanged
                },
                ..Default::default()
            }
        }

        PathEvent::PointerMove(pos) => match state.pointer {
            PointerState::Dragging { last } => {
                state.transform.offset += pos - last;
                state.pointer = PointerState::Dragging { last: pos };
                EventOutcome::redraw()
            }
            _ => hover(state, bounds, pos),
        },

        PathEvent::PointerUp => {
            if state.is_dragging() {
                state.pointer = PointerState::Idle;
            }
            EventOutcome::default()
        }

        PathEvent::PointerLeave => {
            let was_hovering = state.hovered().is_some();
            state.pointer = PointerState::Idle;
            EventOutcome {
                tooltip: if was_hovering {
                    TooltipUpdate::Hide
                } else {
                    TooltipUpdate::Unchanged
                },
                ..Default::default()
            }
        }

        PathEvent::Click(pos) => {
            let world = state.transform.to_world(pos);
            match hit_test(bounds, world) {
                Some(index) => {
                    let changed = state.selected != Some(index);
                    state.selected = Some(index);
                    EventOutcome {
                        redraw: changed,
                        selection_changed: changed,
                        ..Default::default()
                    }
                }
                // A miss keeps the current selection
                None => EventOutcome::default(),
            }
        }

        PathEvent::Wheel { pos, delta } => {
            if delta == 0.0 {
                return EventOutcome::default();
            }
            let factor = if delta > 0.0 {
                zoom.wheel_in
            } else {
                zoom.wheel_out
            };
            zoom_outcome(zoom_at(&mut state.transform, pos, factor, zoom))
        }

        PathEvent::ZoomIn => {
            let center = canvas_center(state.canvas_size);
            zoom_outcome(zoom_at(&mut state.transform, center, zoom.button_step, zoom))
        }

        PathEvent::ZoomOut => {
            let center = canvas_center(state.canvas_size);
            zoom_outcome(zoom_at(
                &mut state.transform,
                center,
                1.0 / zoom.button_step,
                zoom,
            ))
        }

        PathEvent::Reset => {
            let selection_changed = state.selected.is_some();
            state.transform = ViewTransform::IDENTITY;
            state.selected = None;
            state.pointer = PointerState::Idle;
            state.curved = false;
            EventOutcome {
                redraw: true,
                tooltip: TooltipUpdate::Hide,
                selection_changed,
            }
        }

        PathEvent::ToggleCurve => {
            state.curved = !state.curved;
            // Bounds move under the pointer, so hover is re-evaluated on the next move
            let was_hovering = state.hovered().is_some();
            if was_hovering {
                state.pointer = PointerState::Idle;
            }
            EventOutcome {
                redraw: true,
                tooltip: if was_hovering {
                    TooltipUpdate::Hide
                } else {
                    TooltipUpdate::Unchanged
                },
                selection_changed: false,
            }
        }

        PathEvent::Resize(size) => {
            if size == state.canvas_size {
                return EventOutcome::default();
            }
            state.canvas_size = size;
            EventOutcome::redraw()
        }
    }
}

fn hover(state: &mut VisualizationState, bounds: &[NodeBounds], pos: Pos2) -> EventOutcome {
    let world = state.transform.to_world(pos);
    match hit_test(bounds, world) {
        Some(node) => {
            state.pointer = PointerState::Hovering(node);
            EventOutcome {
                tooltip: TooltipUpdate::Show { node, anchor: pos },
                ..Default::default()
            }
        }
        None => {
            let was_hovering = state.hovered().is_some();
            state.pointer = PointerState::Idle;
            EventOutcome {
                tooltip: if was_hovering {
                    TooltipUpdate::Hide
                } else {
                    TooltipUpdate::Unchanged
                },
                ..Default::default()
            }
        }
    }
}

fn zoom_outcome(changed: bool) -> EventOutcome {
    if changed {
        EventOutcome::redraw()
    } else {
        EventOutcome::default()
    }
}

fn canvas_center(size: Vec2) -> Pos2 {
    Pos2::new(size.x / 2.0, size.y / 2.0)
}

/// Multiply the scale by `factor`, keeping the world point under `anchor` fixed
///
/// Returns false when the clamped scale did not change.
pub fn zoom_at(
    transform: &mut ViewTransform,
    anchor: Pos2,
    factor: f32,
    zoom: &ZoomConfig,
) -> bool {
    let old_scale = transform.scale;
    let new_scale = zoom.clamp(old_scale * factor);
    if (new_scale - old_scale).abs() <= f32::EPSILON {
        return false;
    }

    let anchor = anchor.to_vec2();
    transform.offset = anchor - (anchor - transform.offset) * (new_scale / old_scale);
    transform.scale = new_scale;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Rect;

    fn bounds() -> Vec<NodeBounds> {
        [Pos2::new(100.0, 100.0), Pos2::new(300.0, 100.0)]
            .iter()
            .enumerate()
            .map(|(index, &center)| NodeBounds {
                index,
                center,
                radius: 25.0,
                rect: Rect::from_center_size(center, Vec2::new(60.0, 80.0)),
            })
            .collect()
    }

    fn apply(state: &mut VisualizationState, event: PathEvent) -> EventOutcome {
        transition(state, &bounds(), event, &ZoomConfig::default())
    }

    #[test]
    fn test_drag_pans_by_delta() {
        let mut state = VisualizationState::default();
        apply(&mut state, PathEvent::PointerDown(Pos2::new(10.0, 10.0)));
        let outcome = apply(&mut state, PathEvent::PointerMove(Pos2::new(40.0, 30.0)));
        assert!(outcome.redraw);
        apply(&mut state, PathEvent::PointerMove(Pos2::new(60.0, 60.0)));
        assert_eq!(state.transform.offset, Vec2::new(50.0, 50.0));

        apply(&mut state, PathEvent::PointerUp);
        assert_eq!(state.pointer, PointerState::Idle);
        // Moving after release only hovers
        apply(&mut state, PathEvent::PointerMove(Pos2::new(500.0, 500.0)));
        assert_eq!(state.transform.offset, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_hover_shows_and_hides_tooltip() {
        let mut state = VisualizationState::default();
        let shown = apply(&mut state, PathEvent::PointerMove(Pos2::new(105.0, 95.0)));
        assert_eq!(
            shown.tooltip,
            TooltipUpdate::Show {
                node: 0,
                anchor: Pos2::new(105.0, 95.0)
            }
        );
        assert!(!shown.redraw);
        assert_eq!(state.hovered(), Some(0));

        let hidden = apply(&mut state, PathEvent::PointerMove(Pos2::new(200.0, 100.0)));
        assert_eq!(hidden.tooltip, TooltipUpdate::Hide);
        assert!(!hidden.redraw);
        assert_eq!(state.hovered(), None);

        let idle = apply(&mut state, PathEvent::PointerMove(Pos2::new(210.0, 100.0)));
        assert_eq!(idle.tooltip, TooltipUpdate::Unchanged);
    }

    #[test]
    fn test_hover_uses_inverse_transform() {
        let mut state = VisualizationState::default();
        state.transform = ViewTransform {
            offset: Vec2::new(100.0, 0.0),
            scale: 2.0,
        };
        // World (300, 100) is at screen (700, 200)
        apply(&mut state, PathEvent::PointerMove(Pos2::new(700.0, 200.0)));
        assert_eq!(state.hovered(), Some(1));
    }

    #[test]
    fn test_leave_ends_drag_and_hover() {
        let mut state = VisualizationState::default();
        apply(&mut state, PathEvent::PointerMove(Pos2::new(100.0, 100.0)));
        let outcome = apply(&mut state, PathEvent::PointerLeave);
        assert_eq!(outcome.tooltip, TooltipUpdate::Hide);

        apply(&mut state, PathEvent::PointerDown(Pos2::ZERO));
        apply(&mut state, PathEvent::PointerLeave);
        assert_eq!(state.pointer, PointerState::Idle);
    }

    #[test]
    fn test_click_selects_and_miss_keeps_selection() {
        let mut state = VisualizationState::default();
        let hit = apply(&mut state, PathEvent::Click(Pos2::new(300.0, 100.0)));
        assert!(hit.selection_changed);
        assert_eq!(state.selected, Some(1));

        let miss = apply(&mut state, PathEvent::Click(Pos2::new(200.0, 400.0)));
        assert!(!miss.selection_changed);
        assert_eq!(state.selected, Some(1));

        let again = apply(&mut state, PathEvent::Click(Pos2::new(300.0, 100.0)));
        assert!(!again.selection_changed);
    }

    #[test]
    fn test_wheel_zoom_clamped() {
        let mut state = VisualizationState::default();
        for _ in 0..50 {
            apply(&mut state, PathEvent::Wheel { pos: Pos2::new(10.0, 20.0), delta: 1.0 });
        }
        assert_eq!(state.transform.scale, 3.0);
        let outcome = apply(&mut state, PathEvent::Wheel { pos: Pos2::ZERO, delta: 1.0 });
        assert!(!outcome.redraw);

        for _ in 0..50 {
            apply(&mut state, PathEvent::Wheel { pos: Pos2::new(10.0, 20.0), delta: -1.0 });
        }
        assert_eq!(state.transform.scale, 0.5);
    }

    #[test]
    fn test_wheel_zoom_keeps_anchor() {
        let mut state = VisualizationState::default();
        state.transform = ViewTransform {
            offset: Vec2::new(30.0, -20.0),
            scale: 1.3,
        };
        let cursor = Pos2::new(250.0, 180.0);
        let world = state.transform.to_world(cursor);

        apply(&mut state, PathEvent::Wheel { pos: cursor, delta: 3.0 });
        let after = state.transform.to_screen(world);
        assert!((after - cursor).length() < 1e-3);
        assert!((state.transform.scale - 1.43).abs() < 1e-5);
    }

    #[test]
    fn test_button_zoom_centred_on_canvas() {
        let mut state = VisualizationState::new(Vec2::new(800.0, 600.0));
        let center = Pos2::new(400.0, 300.0);
        let world = state.transform.to_world(center);

        apply(&mut state, PathEvent::ZoomIn);
        assert!((state.transform.scale - 1.2).abs() < 1e-6);
        assert!((state.transform.to_screen(world) - center).length() < 1e-3);

        apply(&mut state, PathEvent::ZoomOut);
        assert!((state.transform.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_button_zoom_clamped() {
        let mut state = VisualizationState::new(Vec2::new(800.0, 600.0));

        for _ in 0..20 {
            apply(&mut state, PathEvent::ZoomIn);
            assert!(state.transform.scale <= 3.0);
        }
        assert_eq!(state.transform.scale, 3.0);
        let pinned = state.transform;
        assert!(!apply(&mut state, PathEvent::ZoomIn).redraw);
        assert_eq!(state.transform, pinned);

        for _ in 0..20 {
            apply(&mut state, PathEvent::ZoomOut);
            assert!(state.transform.scale >= 0.5);
        }
        assert_eq!(state.transform.scale, 0.5);
        assert!(!apply(&mut state, PathEvent::ZoomOut).redraw);
    }

    #[test]
    fn test_reset_restores_identity() {
        let mut state = VisualizationState::default();
        state.transform = ViewTransform {
            offset: Vec2::new(50.0, 50.0),
            scale: 2.0,
        };
        state.curved = true;
        state.selected = Some(0);
        state.pointer = PointerState::Hovering(1);

        let outcome = apply(&mut state, PathEvent::Reset);
        assert!(outcome.redraw && outcome.selection_changed);
        assert_eq!(outcome.tooltip, TooltipUpdate::Hide);
        assert_eq!(state.transform, ViewTransform::IDENTITY);
        assert_eq!(state.selected, None);
        assert_eq!(state.hovered(), None);
        assert!(!state.curved);
    }

    #[test]
    fn test_toggle_curve_keeps_selection() {
        let mut state = VisualizationState::default();
        state.selected = Some(1);
        let outcome = apply(&mut state, PathEvent::ToggleCurve);
        assert!(outcome.redraw);
        assert!(state.curved);
        assert_eq!(state.selected, Some(1));
    }

    #[test]
    fn test_resize_redraws_only_on_change() {
        let mut state = VisualizationState::new(Vec2::new(800.0, 600.0));
        assert!(!apply(&mut state, PathEvent::Resize(Vec2::new(800.0, 600.0))).redraw);
        assert!(apply(&mut state, PathEvent::Resize(Vec2::new(1024.0, 600.0))).redraw);
        assert_eq!(state.canvas_size, Vec2::new(1024.0, 600.0));
    }
}
