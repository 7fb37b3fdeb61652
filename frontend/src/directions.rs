use shared::{Coordinate, DirectionStep};

use crate::error::DirectionsError;
use crate::map::{MapView, STEP_FOCUS_ZOOM};

/// Holds the turn-by-turn steps of the current route and the focused
/// step, if any. Steps are only meaningful against the path they were
/// returned with; `focus_step` re-checks that pairing on every call.
#[derive(Debug, Default)]
pub struct DirectionsNavigator {
    steps: Vec<DirectionStep>,
    focused: Option<usize>,
}

impl DirectionsNavigator {
    /// Replaces the step list and drops any focus.
    pub fn set_steps(&mut self, steps: Vec<DirectionStep>) {
        self.steps = steps;
        self.focused = None;
    }

    pub fn steps(&self) -> &[DirectionStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Focuses a step and jumps the viewport to its anchor point on
    /// `path`. Out-of-range indices and steps whose anchor falls
    /// outside the current path are rejected without issuing a view
    /// command or moving the previous focus.
    pub fn focus_step(
        &mut self,
        index: usize,
        path: &[Coordinate],
        map: &dyn MapView,
    ) -> Result<(), DirectionsError> {
        let step = self
            .steps
            .get(index)
            .ok_or(DirectionsError::OutOfRangeStep {
                index,
                len: self.steps.len(),
            })?;
        let point =
            path.get(step.node_index)
                .copied()
                .ok_or(DirectionsError::CorruptDirections {
                    index,
                    node_index: step.node_index,
                    path_len: path.len(),
                })?;
        self.focused = Some(index);
        map.set_center(point, STEP_FOCUS_ZOOM);
        map.highlight_point(point);
        Ok(())
    }

    /// Anchor point of the focused step, when it lies on `path`.
    pub fn focused_point(&self, path: &[Coordinate]) -> Option<Coordinate> {
        let step = self.steps.get(self.focused?)?;
        path.get(step.node_index).copied()
    }
}
