//! Rejection sampling for new leaf positions.
use rand::Rng;

use crate::constants::{
    PLACEMENT_MAX_ATTEMPTS, PLACEMENT_MIN_SPACING, PLACEMENT_X_MIN, PLACEMENT_X_SPAN,
    PLACEMENT_Y_MIN, PLACEMENT_Y_SPAN,
};
use crate::part::Position;

/// Sampling window and spacing rules for spawned parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementBounds {
    pub x_min: f64,
    pub x_span: f64,
    pub y_min: f64,
    pub y_span: f64,
    pub min_spacing: f64,
    pub max_attempts: u32,
}

impl Default for PlacementBounds {
    fn default() -> Self {
        Self {
            x_min: PLACEMENT_X_MIN,
            x_span: PLACEMENT_X_SPAN,
            y_min: PLACEMENT_Y_MIN,
            y_span: PLACEMENT_Y_SPAN,
            min_spacing: PLACEMENT_MIN_SPACING,
            max_attempts: PLACEMENT_MAX_ATTEMPTS,
        }
    }
}

impl PlacementBounds {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let x = self.x_min + rng.r#gen::<f64>() * self.x_span;
        let y = self.y_min + rng.r#gen::<f64>() * self.y_span;
        Position::new(x, y)
    }

    /// Whether `pos` lies inside the sampling window.
    #[must_use]
    pub fn contains(&self, pos: &Position) -> bool {
        (self.x_min..self.x_min + self.x_span).contains(&pos.x)
            && (self.y_min..self.y_min + self.y_span).contains(&pos.y)
    }
}

/// Result of a placement search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Position,
    pub attempts: u32,
    /// False when every attempt collided and the last candidate was kept.
    pub clear: bool,
}

/// Pick a spot that is not crowded by any of `existing`.
///
/// Gives up after `bounds.max_attempts` candidates and keeps the last one, so
/// placement always succeeds even on a packed tree.
pub fn place<'a, R, I>(existing: I, bounds: &PlacementBounds, rng: &mut R) -> Placement
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a Position>,
    I::IntoIter: Clone,
{
    let existing = existing.into_iter();
    let max_attempts = bounds.max_attempts.max(1);
    let mut attempts = 0;
    loop {
        let candidate = bounds.sample(rng);
        attempts += 1;
        let crowded = existing
            .clone()
            .any(|pos| pos.crowds(&candidate, bounds.min_spacing));
        if !crowded {
            return Placement {
                position: candidate,
                attempts,
                clear: true,
            };
        }
        if attempts >= max_attempts {
            log::trace!("placement exhausted {attempts} attempts; keeping crowded candidate");
            return Placement {
                position: candidate,
                attempts,
                clear: false,
            };
        }
    }
}
