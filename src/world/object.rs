/*!
object: per-object animation, motion, and flag state (spec §3 "Object").
*/

use std::rc::Rc;

use bitflags::bitflags;

use crate::resource::View;

pub const OBJECT_COUNT: usize = 256;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Stationary,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL_MOVING: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Per-step (dx, dy) for one unit of step size.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Stationary => (0, 0),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// The eight-way direction that reduces the Euclidean distance from
    /// `(from_x, from_y)` to `(to_x, to_y)` fastest, used by `FollowEgo` and
    /// `MoveToPoint` (spec §4.8 "Direction update").
    pub fn toward(from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> Direction {
        let dx = (to_x - from_x).signum();
        let dy = (to_y - from_y).signum();
        match (dx, dy) {
            (0, 0) => Direction::Stationary,
            (0, -1) => Direction::North,
            (1, -1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, 1) => Direction::SouthEast,
            (0, 1) => Direction::South,
            (-1, 1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            (-1, -1) => Direction::NorthWest,
            _ => Direction::Stationary,
        }
    }
}

/// `set.dir`/`get.dir` encode `Direction` as the original's numeric
/// enumeration (`object.h`'s `enum class Direction`): `Stationary = 0`,
/// then `N..NW` clockwise as `1..=8`.
pub fn direction_from_code(code: u8) -> Direction {
    match code {
        1 => Direction::North,
        2 => Direction::NorthEast,
        3 => Direction::East,
        4 => Direction::SouthEast,
        5 => Direction::South,
        6 => Direction::SouthWest,
        7 => Direction::West,
        8 => Direction::NorthWest,
        _ => Direction::Stationary,
    }
}

pub fn direction_to_code(direction: Direction) -> u8 {
    match direction {
        Direction::Stationary => 0,
        Direction::North => 1,
        Direction::NorthEast => 2,
        Direction::East => 3,
        Direction::SouthEast => 4,
        Direction::South => 5,
        Direction::SouthWest => 6,
        Direction::West => 7,
        Direction::NorthWest => 8,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Motion {
    #[default]
    Normal,
    Wander,
    FollowEgo,
    MoveToPoint,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SurfaceType {
    #[default]
    Any,
    Water,
    Land,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AnimationCycle {
    #[default]
    Normal,
    EndOfLoop,
    ReverseLoop,
    ReverseCycle,
}

/// Destination state for `Motion::MoveToPoint` (spec §3).
#[derive(Copy, Clone, Debug, Default)]
pub struct MoveToPoint {
    pub dst_x: u8,
    pub dst_y: u8,
    pub speed: u8,
    pub completion_flag: u8,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct ObjectFlags: u16 {
        const ANIMATED         = 1 << 0;
        const UPDATE           = 1 << 1;
        const DRAWN            = 1 << 2;
        const CYCLING          = 1 << 3;
        const OBSERVE_BLOCKS   = 1 << 4;
        const FIXED_PRIORITY   = 1 << 5;
        const OBSERVE_HORIZON  = 1 << 6;
        const ON_WATER         = 1 << 7;
        const ON_LAND          = 1 << 8;
        const FIXED_LOOP       = 1 << 9;
        const OBSERVE_OBJECTS  = 1 << 10;
    }
}

/// Movement state (spec §3 "Movement").
#[derive(Clone, Debug, Default)]
pub struct Movement {
    pub x: u8,
    pub y: u8,
    pub x_size: u8,
    pub y_size: u8,
    pub direction: Direction,
    pub motion: Motion,
    pub surface: SurfaceType,
    pub step_size: u8,
    pub step_time: u8,
    pub step_time_counter: u8,
    pub move_to_point: MoveToPoint,
}

/// Animation state (spec §3 "Animation").
#[derive(Clone, Debug, Default)]
pub struct Animation {
    pub view_index: u8,
    pub view: Option<Rc<View>>,
    pub loop_index: u8,
    pub cel_index: u8,
    pub cycle_time: u8,
    pub cycle_time_counter: u8,
    pub loop_count: u8,
    pub cel_count: u8,
    pub completion_flag: u8,
    pub priority: u8,
    pub cycle_type: AnimationCycle,
}

/// One of the 256 game objects; object 0 is ego, the player avatar.
#[derive(Clone, Debug, Default)]
pub struct Object {
    pub movement: Movement,
    pub animation: Animation,
    pub flags: ObjectFlags,
}

impl Object {
    /// Derived render priority: the fixed value if `FIXED_PRIORITY` is set,
    /// otherwise the monotone band for the object's current `y` (spec §3
    /// "Derived priority").
    pub fn priority(&self) -> u8 {
        if self.flags.contains(ObjectFlags::FIXED_PRIORITY) {
            self.animation.priority
        } else {
            priority_band(self.movement.y)
        }
    }
}

const PRIORITY_CUTOFFS: [u8; 11] = [48, 60, 72, 84, 96, 108, 120, 132, 144, 156, 168];

/// The monotone step function mapping a y-coordinate to a priority band
/// (spec §3 "Derived priority"): bands 4..=14, falling back to 4 below the
/// first cutoff.
pub fn priority_band(y: u8) -> u8 {
    for (i, &cutoff) in PRIORITY_CUTOFFS.iter().enumerate() {
        if y < cutoff {
            return i as u8 + 4;
        }
    }
    14
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_band_matches_cutoffs() {
        assert_eq!(priority_band(0), 4);
        assert_eq!(priority_band(47), 4);
        assert_eq!(priority_band(48), 5);
        assert_eq!(priority_band(167), 14);
        assert_eq!(priority_band(200), 14);
    }

    #[test]
    fn fixed_priority_overrides_band() {
        let mut obj = Object::default();
        obj.movement.y = 0;
        obj.flags.insert(ObjectFlags::FIXED_PRIORITY);
        obj.animation.priority = 9;
        assert_eq!(obj.priority(), 9);
    }
}
