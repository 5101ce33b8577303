/*!
object_motion: object movement, surface/block constraints, and ego
program-control toggling (spec §4.7 "Object motion", §4.8). Grounded on
`lib/cmd_exec.cpp::ObjectMotionCommand`, which has no case at all for
`move.obj.v`/`follow.ego`/`wander`/`normal.motion`/`set.dir`/`get.dir`/
`block`/`unblock` — their arity slots are reserved but the switch falls
through to nothing, so those eight are implemented here for real from
their names and the sibling opcodes that already work the same way.
*/

use crate::error::Result;
use crate::interpreter::{block_rect, surface_type, Interpreter};
use crate::world::object::{Motion, MoveToPoint};

pub fn exec(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<()> {
    match cmd {
        40 => {
            // reposition(o, dx, dy)
            interp.objects_mut().reposition(args[0], args[1] as i8, args[2] as i8);
        }
        58 => interp.objects_mut().stop_update(args[0]),
        59 => interp.objects_mut().start_update(args[0]),
        60 => interp.objects_mut().force_update(args[0]),
        61 => interp.objects_mut().ignore_horizon(args[0]),
        62 => interp.objects_mut().observe_horizon(args[0]),
        63 => interp.objects_mut().horizon = args[0], // set.horizon(n)
        64 => interp.objects_mut().set_allowed_surface(args[0], surface_type(1)), // object.on.water
        65 => interp.objects_mut().set_allowed_surface(args[0], surface_type(2)), // object.on.land
        66 => interp.objects_mut().set_allowed_surface(args[0], surface_type(0)), // object.on.anything
        67 => interp.objects_mut().ignore_objects(args[0]),
        68 => interp.objects_mut().observe_objects(args[0]),
        69 => {
            // distance(o1, o2, varOut)
            let d = interp.objects().distance(args[0], args[1]);
            interp.set_var(args[2], d);
        }
        77 => {
            // stop.motion(o): halt o's motion; for ego this also hands
            // control back to the program (spec §4.7).
            interp.objects_mut().stop_motion(args[0]);
            if args[0] == crate::world::table::EGO {
                interp.program_control = true;
            }
        }
        78 => {
            // start.motion(o): resume normal motion; for ego this also
            // hands control back to the player (spec §4.7).
            interp.objects_mut().start_motion(args[0]);
            if args[0] == crate::world::table::EGO {
                interp.program_control = false;
            }
        }
        79 => interp.objects_mut().set_step_size(args[0], args[1]),
        80 => interp.objects_mut().set_step_time(args[0], args[1]),
        81 => {
            // move.obj(o, x, y, stepsize, flag)
            interp.objects_mut().move_obj(
                args[0],
                MoveToPoint { dst_x: args[1], dst_y: args[2], speed: args[3], completion_flag: args[4] },
            );
        }
        82 => {
            // move.obj.v(o, varX, varY, stepsize, flag)
            let (x, y) = (interp.var(args[1]), interp.var(args[2]));
            interp.objects_mut().move_obj(
                args[0],
                MoveToPoint { dst_x: x, dst_y: y, speed: args[3], completion_flag: args[4] },
            );
        }
        83 => {
            // follow.ego(o, distance, flag): the completion flag and close
            // distance aren't modeled by the direction-toward-ego stepper
            // (spec §4.8 keeps `FollowEgo` a direction rule only); the args
            // are still consumed so the decode stays byte-accurate.
            let _ = (args[1], args[2]);
            interp.objects_mut().set_motion(args[0], Motion::FollowEgo);
        }
        84 => interp.objects_mut().set_motion(args[0], Motion::Wander),
        85 => interp.objects_mut().set_motion(args[0], Motion::Normal),
        86 => {
            // set.dir(o, varDir)
            let d = interp.var(args[1]);
            interp.objects_mut().set_dir(args[0], d);
        }
        87 => {
            // get.dir(o, varOut)
            let d = interp.objects().get_dir(args[0]);
            interp.set_var(args[1], d);
        }
        88 => interp.objects_mut().ignore_blocks(args[0]),
        89 => interp.objects_mut().observe_blocks(args[0]),
        90 => interp.objects_mut().block(block_rect(args[0], args[1], args[2], args[3])),
        91 => interp.objects_mut().unblock(),
        131 => interp.program_control = true,  // program.control
        132 => interp.program_control = false, // player.control
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    #[test]
    fn set_dir_reads_through_the_variable() {
        let mut interp = Interpreter::for_tests();
        interp.set_var(10, 3); // direction code for South, say
        exec(&mut interp, 86, &[0, 10]).unwrap();
        exec(&mut interp, 87, &[0, 20]).unwrap();
        assert_eq!(interp.var(20), 3);
    }

    #[test]
    fn player_control_then_program_control_round_trips() {
        let mut interp = Interpreter::for_tests();
        interp.program_control = false;
        exec(&mut interp, 131, &[]).unwrap();
        assert!(interp.program_control);
        exec(&mut interp, 132, &[]).unwrap();
        assert!(!interp.program_control);
    }
}
