/*!
arithmetic: variable/flag primitives and `random` (spec §4.7 "Arithmetic /
flag"). Grounded on `lib/cmd_exec.cpp::ArithmeticCommand`. `mul.n`/`mul.v`/
`div.n`/`div.v` have no case in that switch at all — the arity table still
reserves their slots, so they are implemented here with the obvious
saturating/integer-division semantics their names imply.
*/

use rand::Rng;

use crate::error::Result;
use crate::interpreter::Interpreter;

pub fn exec(interp: &mut Interpreter, cmd: u8, args: &[u8]) -> Result<()> {
    match cmd {
        1 => {
            // increment(n)
            let v = interp.var(args[0]);
            if v < 255 {
                interp.set_var(args[0], v + 1);
            }
        }
        2 => {
            // decrement(n)
            let v = interp.var(args[0]);
            if v > 0 {
                interp.set_var(args[0], v - 1);
            }
        }
        3 => interp.set_var(args[0], args[1]), // assignn(n, m)
        4 => interp.set_var(args[0], interp.var(args[1])), // assignv(n, m)
        5 => {
            // addn(n, m)
            let v = interp.var(args[0]) as u32 + args[1] as u32;
            interp.set_var(args[0], v.min(255) as u8);
        }
        6 => {
            // addv(n, m)
            let v = interp.var(args[0]) as u32 + interp.var(args[1]) as u32;
            interp.set_var(args[0], v.min(255) as u8);
        }
        7 => {
            // subn(n, m)
            let v = interp.var(args[0]);
            interp.set_var(args[0], v.saturating_sub(args[1]));
        }
        8 => {
            // subv(n, m)
            let v = interp.var(args[0]);
            let m = interp.var(args[1]);
            interp.set_var(args[0], v.saturating_sub(m));
        }
        9 => {
            // lindirectv(n, m): Var(Var(n)) = Var(m)
            let target = interp.var(args[0]);
            let value = interp.var(args[1]);
            interp.set_var(target, value);
        }
        10 => {
            // rindirect(n, m): Var(n) = Var(Var(m))
            let addr = interp.var(args[1]);
            interp.set_var(args[0], interp.var(addr));
        }
        11 => {
            // lindirectn(n, m): Var(Var(n)) = m
            let target = interp.var(args[0]);
            interp.set_var(target, args[1]);
        }
        12 => interp.set_flag(args[0], true),                        // set(f)
        13 => interp.set_flag(args[0], false),                       // reset(f)
        14 => interp.set_flag(args[0], !interp.flag(args[0])),       // toggle(f)
        15 => interp.set_flag(interp.var(args[0]), true),            // set.v(n)
        16 => interp.set_flag(interp.var(args[0]), false),           // reset.v(n)
        17 => {
            // toggle.v(n)
            let f = interp.var(args[0]);
            interp.set_flag(f, !interp.flag(f));
        }
        130 => {
            // random(n, m, k): Var(k) = (rand() % m) + n
            let (n, m, k) = (args[0], args[1], args[2]);
            let roll = if m == 0 { 0 } else { interp.rng.gen_range(0..m as u32) };
            interp.set_var(k, (roll + n as u32).min(255) as u8);
        }
        165 => {
            // mul.n(n, m)
            let v = interp.var(args[0]) as u32 * args[1] as u32;
            interp.set_var(args[0], v.min(255) as u8);
        }
        166 => {
            // mul.v(n, m)
            let v = interp.var(args[0]) as u32 * interp.var(args[1]) as u32;
            interp.set_var(args[0], v.min(255) as u8);
        }
        167 => {
            // div.n(n, m)
            if args[1] != 0 {
                interp.set_var(args[0], interp.var(args[0]) / args[1]);
            }
        }
        168 => {
            // div.v(n, m)
            let m = interp.var(args[1]);
            if m != 0 {
                interp.set_var(args[0], interp.var(args[0]) / m);
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    fn blank_interp() -> Interpreter {
        // A script directory isn't needed to exercise pure variable/flag
        // opcodes, so we bypass `Interpreter::new`'s resource open.
        Interpreter::for_tests()
    }

    #[test]
    fn addn_saturates_at_255() {
        let mut interp = blank_interp();
        interp.set_var(0, 250);
        exec(&mut interp, 5, &[0, 20]).unwrap();
        assert_eq!(interp.var(0), 255);
    }

    #[test]
    fn subn_floors_at_zero() {
        let mut interp = blank_interp();
        interp.set_var(0, 3);
        exec(&mut interp, 7, &[0, 10]).unwrap();
        assert_eq!(interp.var(0), 0);
    }

    #[test]
    fn toggle_flips_flag() {
        let mut interp = blank_interp();
        exec(&mut interp, 14, &[5]).unwrap();
        assert!(interp.flag(5));
        exec(&mut interp, 14, &[5]).unwrap();
        assert!(!interp.flag(5));
    }

    #[test]
    fn lindirectn_writes_through_pointer_var() {
        let mut interp = blank_interp();
        interp.set_var(0, 9); // n -> points at var 9
        exec(&mut interp, 11, &[0, 42]).unwrap();
        assert_eq!(interp.var(9), 42);
    }
}
