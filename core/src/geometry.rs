//! Planar geometry helpers shared by the simulation systems.
//!
//! All positions are expressed in board pixels. Movement never overshoots:
//! a step that would pass the target lands exactly on it instead.

pub use glam::Vec2;

/// Clamps `value` into the inclusive `0.0..=1.0` range.
#[must_use]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(from: Vec2, to: Vec2) -> f32 {
    from.distance(to)
}

/// Squared distance between two points, used by range checks.
#[must_use]
pub fn distance_squared(from: Vec2, to: Vec2) -> f32 {
    from.distance_squared(to)
}

/// Result of a single bounded step toward a target point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// Position reached after the step.
    pub position: Vec2,
    /// Indicates whether the step landed exactly on the target.
    pub arrived: bool,
}

/// Moves `current` toward `target` by at most `max_delta`.
///
/// Lands exactly on `target` when it is already there or when the remaining
/// distance is no larger than the permitted step.
#[must_use]
pub fn step_towards(current: Vec2, target: Vec2, max_delta: f32) -> Step {
    let max_delta = max_delta.max(0.0);
    let remaining = current.distance(target);
    if remaining == 0.0 || max_delta >= remaining {
        return Step {
            position: target,
            arrived: true,
        };
    }

    let t = max_delta / remaining;
    Step {
        position: current + (target - current) * t,
        arrived: false,
    }
}

/// Convenience wrapper over [`step_towards`] that only reports the position.
#[must_use]
pub fn move_towards(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    step_towards(current, target, max_delta).position
}

/// Six-way facing used to pick a tower sprite row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Looking toward increasing y.
    #[default]
    Down,
    /// Looking down and to the right.
    DownRight,
    /// Looking down and to the left.
    DownLeft,
    /// Looking toward decreasing y.
    Up,
    /// Looking up and to the right.
    UpRight,
    /// Looking up and to the left.
    UpLeft,
}

impl Facing {
    /// Horizontal component must stay below this share of the vertical one
    /// for the facing to count as straight up or down.
    const VERTICAL_BIAS: f32 = 0.4;

    /// Buckets a direction vector into a facing.
    #[must_use]
    pub fn from_vector(delta: Vec2) -> Self {
        let vertical = delta.x.abs() < delta.y.abs() * Self::VERTICAL_BIAS;
        let rightward = delta.x >= 0.0;

        if delta.y >= 0.0 {
            match (vertical, rightward) {
                (true, _) => Self::Down,
                (false, true) => Self::DownRight,
                (false, false) => Self::DownLeft,
            }
        } else {
            match (vertical, rightward) {
                (true, _) => Self::Up,
                (false, true) => Self::UpRight,
                (false, false) => Self::UpLeft,
            }
        }
    }

    /// Row of the tower sprite sheet that depicts this facing.
    #[must_use]
    pub const fn sprite_row(self) -> u32 {
        match self {
            Self::Down => 0,
            Self::DownRight => 1,
            Self::DownLeft => 2,
            Self::Up => 3,
            Self::UpRight => 4,
            Self::UpLeft => 5,
        }
    }
}

/// Cardinal travel direction used to pick an enemy sprite row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing y.
    North,
    /// Movement toward increasing x.
    East,
    /// Movement toward increasing y.
    #[default]
    South,
    /// Movement toward decreasing x.
    West,
}

impl Direction {
    /// Picks the direction of the dominant axis of `delta`.
    ///
    /// Ties favour the vertical axis.
    #[must_use]
    pub fn from_vector(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x >= 0.0 {
                Self::East
            } else {
                Self::West
            }
        } else if delta.y >= 0.0 {
            Self::South
        } else {
            Self::North
        }
    }

    /// Row of the enemy sprite sheet that depicts this direction.
    #[must_use]
    pub const fn sprite_row(self) -> u32 {
        match self {
            Self::South => 0,
            Self::West => 1,
            Self::East => 2,
            Self::North => 3,
        }
    }
}
