//! Leaf cluster entities tracked by the registry.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single part. Ids start at 1 and only ever grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub u32);

impl PartId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Id following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl From<u32> for PartId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point in the drawing's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether `other` sits within `spacing` of this point on both axes.
    #[must_use]
    pub fn crowds(&self, other: &Self, spacing: f64) -> bool {
        (self.x - other.x).abs() < spacing && (self.y - other.y).abs() < spacing
    }
}

/// One leaf cluster on the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: PartId,
    pub position: Position,
    #[serde(default)]
    pub is_bad: bool,
    #[serde(default)]
    pub is_cut: bool,
}

impl Part {
    /// Fresh healthy part.
    #[must_use]
    pub const fn healthy(id: PartId, position: Position) -> Self {
        Self {
            id,
            position,
            is_bad: false,
            is_cut: false,
        }
    }

    /// Counts toward the win tally.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        !self.is_bad && !self.is_cut
    }

    /// Counts toward the loss tally.
    #[must_use]
    pub const fn is_rotten(&self) -> bool {
        self.is_bad && !self.is_cut
    }

    /// Mark the part unhealthy. Cut parts are inert and ignore this.
    pub(crate) const fn decay(&mut self) -> bool {
        if self.is_cut || self.is_bad {
            return false;
        }
        self.is_bad = true;
        true
    }

    /// Remove the part from play, returning whether anything changed.
    pub(crate) const fn cut(&mut self) -> bool {
        if self.is_cut {
            return false;
        }
        self.is_cut = true;
        self.is_bad = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_clears_bad_and_is_permanent() {
        let mut part = Part::healthy(PartId(3), Position::new(10.0, 20.0));
        assert!(part.decay());
        assert!(part.is_rotten());

        assert!(part.cut());
        assert!(part.is_cut);
        assert!(!part.is_bad);
        assert!(!part.is_healthy());
        assert!(!part.is_rotten());

        assert!(!part.decay(), "cut parts never decay");
        assert!(!part.cut(), "second cut is a no-op");
        assert!(!part.is_bad);
    }

    #[test]
    fn crowding_requires_both_axes() {
        let origin = Position::new(100.0, 100.0);
        assert!(origin.crowds(&Position::new(140.0, 60.5), 50.0));
        assert!(!origin.crowds(&Position::new(150.0, 100.0), 50.0));
        assert!(!origin.crowds(&Position::new(100.0, 160.0), 50.0));
    }

    #[test]
    fn part_serializes_with_camel_case_flags() {
        let part = Part::healthy(PartId(7), Position::new(1.0, 2.0));
        let json = serde_json::to_value(&part).expect("serialize");
        assert_eq!(json["id"], 7);
        assert_eq!(json["isBad"], false);
        assert_eq!(json["isCut"], false);
    }
}
