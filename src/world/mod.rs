/*!
world: the game-object table and its sprite compositor (spec §3 "Object",
§4.8).
*/

pub mod object;
pub mod table;

pub use object::{
    direction_from_code, direction_to_code, AnimationCycle, Direction, Motion, MoveToPoint,
    Object, ObjectFlags, SurfaceType,
};
pub use table::{BlockRect, ObjectTable, EGO};
