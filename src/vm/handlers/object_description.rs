/*!
object_description: object animation/view/loop/cel/priority state (spec
§4.7 "Object description", §4.8). Grounded on
`lib/cmd_exec.cpp::ObjectDescriptionCommand`, which this follows opcode for
opcode.
*/

use crate::error::Result;
use crate::interpreter::Interpreter;

pub fn exec(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<()> {
    match cmd {
        33 => interp.objects_mut().animate_obj(args[0]),
        34 => interp.objects_mut().unanimate_all(),
        35 => interp.objects_mut().draw(args[0]),
        36 => interp.objects_mut().erase(args[0]),
        37 => interp.objects_mut().set_position(args[0], args[1], args[2]), // position(o, x, y)
        38 => {
            // position.v(o, varX, varY)
            let (x, y) = (interp.var(args[1]), interp.var(args[2]));
            interp.objects_mut().set_position(args[0], x, y);
        }
        39 => {
            // get.posn(o, varX, varY): write the object's position out
            let (x, y) = interp.objects().position(args[0]);
            interp.set_var(args[1], x);
            interp.set_var(args[2], y);
        }
        41 => interp.set_view(args[0], args[1])?, // set.view(o, view)
        42 => {
            // set.view.v(o, varView)
            let view = interp.var(args[1]);
            interp.set_view(args[0], view)?;
        }
        43 => interp.objects_mut().set_loop(args[0], args[1]), // set.loop(o, loop)
        44 => {
            // set.loop.v(o, varLoop)
            let l = interp.var(args[1]);
            interp.objects_mut().set_loop(args[0], l);
        }
        45 => interp.objects_mut().fix_loop(args[0]),
        46 => interp.objects_mut().release_loop(args[0]),
        47 => interp.objects_mut().set_cel(args[0], args[1]), // sel.cel(o, cel)
        48 => {
            // sel.cel.v(o, varCel)
            let c = interp.var(args[1]);
            interp.objects_mut().set_cel(args[0], c);
        }
        49 => {
            // last.cel(o, varOut)
            let v = interp.objects().last_cel(args[0]);
            interp.set_var(args[1], v);
        }
        50 => {
            // current.cel(o, varOut)
            let v = interp.objects().current_cel_index(args[0]);
            interp.set_var(args[1], v);
        }
        51 => {
            // current.loop(o, varOut)
            let v = interp.objects().current_loop(args[0]);
            interp.set_var(args[1], v);
        }
        52 => {
            // current.view(o, varOut)
            let v = interp.objects().current_view(args[0]);
            interp.set_var(args[1], v);
        }
        53 => {
            // number.of.loops(o, varOut)
            let v = interp.objects().number_of_loops(args[0]);
            interp.set_var(args[1], v);
        }
        54 => interp.objects_mut().set_priority(args[0], args[1]), // set.priority(o, p)
        55 => {
            // set.priority.v(o, varP)
            let p = interp.var(args[1]);
            interp.objects_mut().set_priority(args[0], p);
        }
        56 => interp.objects_mut().release_priority(args[0]),
        57 => {
            // get.priority(o, varOut)
            let v = interp.objects().get_priority(args[0]);
            interp.set_var(args[1], v);
        }
        70 => interp.objects_mut().stop_cycling(args[0]),
        71 => interp.objects_mut().start_cycling(args[0]),
        72 => interp.objects_mut().normal_cycle(args[0]),
        73 => interp.objects_mut().end_of_loop(args[0], args[1]), // end.of.loop(o, flag)
        74 => interp.objects_mut().reverse_cycle(args[0]),
        75 => interp.objects_mut().reverse_loop(args[0], args[1]), // reverse.loop(o, flag)
        76 => interp.objects_mut().set_cycle_time(args[0], args[1]), // cycle.time(o, t)
        _ => {}
    }
    Ok(())
}
