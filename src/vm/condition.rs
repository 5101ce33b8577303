/*!
condition: the two-level AND-of-OR-groups conditional grammar (spec §4.7
"Condition grammar", "Primitive conditions").

Grounded on `lib/conditions.cpp` (`LogicalAnd`, `LogicalOr`,
`ProcessSingleCondition`): negation toggles via a leading `0xFD` term,
`0xFC` opens a nested OR-group, and both forms keep consuming bytes after a
short-circuit until they hit their terminator, so `ip` always lands exactly
on the byte after the grammar regardless of which branch decided it.
*/

use crate::error::{AgiError, Result};

const NEGATE: u8 = 0xFD;
const OR_OPEN: u8 = 0xFC;
const OR_END: u8 = 0xFC;
const AND_END: u8 = 0xFF;

/// Fixed argument-byte counts for each primitive condition code (spec
/// §4.7's table, carried verbatim from `lib/conditions.cpp`'s
/// `ConditionArguments`). `said` (0x0E) is handled specially since its
/// argument count is data-dependent.
const CONDITION_ARGS: [u8; 19] = [0, 2, 2, 2, 2, 2, 2, 1, 1, 1, 2, 5, 1, 0, 0, 2, 5, 5, 5];

/// What a condition evaluator needs from the interpreter: variable/flag
/// storage, the baseline-in-rectangle predicate, and whether a key is
/// pending.
pub trait ConditionHost {
    fn var(&self, index: u8) -> u8;
    fn flag(&self, index: u8) -> bool;
    fn object_in_box(&self, obj: u8, x1: u8, y1: u8, x2: u8, y2: u8) -> bool;
    fn has_key(&self) -> bool;
}

fn read_u8(code: &[u8], ip: &mut usize) -> Result<u8> {
    let b = *code.get(*ip).ok_or(AgiError::TruncatedScript)?;
    *ip += 1;
    Ok(b)
}

fn primitive(host: &dyn ConditionHost, code: &[u8], ip: &mut usize, cond: u8) -> Result<bool> {
    if cond == 0x0E {
        // said(n, then 2n bytes): parser predicate, out of scope -> false,
        // but argument bytes are still consumed so ip stays synchronised.
        let n = read_u8(code, ip)? as usize;
        for _ in 0..(n * 2) {
            read_u8(code, ip)?;
        }
        return Ok(false);
    }

    let argc = *CONDITION_ARGS.get(cond as usize).unwrap_or(&0) as usize;
    match cond {
        0x01 => {
            let var = read_u8(code, ip)?;
            let n = read_u8(code, ip)?;
            Ok(host.var(var) == n)
        }
        0x02 => {
            let v1 = read_u8(code, ip)?;
            let v2 = read_u8(code, ip)?;
            Ok(host.var(v1) == host.var(v2))
        }
        0x03 => {
            let var = read_u8(code, ip)?;
            let n = read_u8(code, ip)?;
            Ok(host.var(var) < n)
        }
        0x04 => {
            let v1 = read_u8(code, ip)?;
            let v2 = read_u8(code, ip)?;
            Ok(host.var(v1) < host.var(v2))
        }
        0x05 => {
            let var = read_u8(code, ip)?;
            let n = read_u8(code, ip)?;
            Ok(host.var(var) > n)
        }
        0x06 => {
            let v1 = read_u8(code, ip)?;
            let v2 = read_u8(code, ip)?;
            Ok(host.var(v1) > host.var(v2))
        }
        0x07 => {
            let flag = read_u8(code, ip)?;
            Ok(host.flag(flag))
        }
        0x08 => {
            let var = read_u8(code, ip)?;
            Ok(host.flag(host.var(var)))
        }
        0x09 => {
            // has(item): inventory predicate, out of scope -> false.
            let _item = read_u8(code, ip)?;
            Ok(false)
        }
        0x0A => {
            let obj = read_u8(code, ip)?;
            let x1 = read_u8(code, ip)?;
            let y1 = read_u8(code, ip)?;
            let x2 = read_u8(code, ip)?;
            let y2 = read_u8(code, ip)?;
            Ok(host.object_in_box(obj, x1, y1, x2, y2))
        }
        0x0C => {
            // controller(id): out of scope -> false.
            let _id = read_u8(code, ip)?;
            Ok(false)
        }
        0x0D => Ok(host.has_key()),
        _ => {
            for _ in 0..argc {
                read_u8(code, ip)?;
            }
            Ok(false)
        }
    }
}

/// Evaluate an OR-form: terms terminated by `0xFC`. Mirrors
/// `lib/conditions.cpp::LogicalOr` exactly, including its structural
/// consumption of every term right up to (and including) the one that
/// short-circuits: only once a term is found `true` does it fall into a
/// raw byte scan for the next `0xFC`.
pub fn eval_or(host: &dyn ConditionHost, code: &[u8], ip: &mut usize) -> Result<bool> {
    let mut negation = false;
    let mut ok = false;
    let mut b = read_u8(code, ip)?;
    while b != OR_END {
        if b == NEGATE {
            negation = !negation;
        } else {
            ok = primitive(host, code, ip, b)? != negation;
            if ok {
                break;
            }
            negation = false;
        }
        b = read_u8(code, ip)?;
    }
    while b != OR_END {
        b = read_u8(code, ip)?;
    }
    Ok(ok)
}

/// Evaluate an AND-form: terms terminated by `0xFF`. Mirrors
/// `lib/conditions.cpp::LogicalAnd`: every term up to and including the one
/// that fails is consumed structurally; only the raw remainder is skipped
/// byte-by-byte hunting for a literal `0xFF` (so a short-circuited AND does
/// not attempt to understand term boundaries after the failure — a quirk
/// of the original format carried over deliberately, since a well-formed
/// compiler never emits a bare `0xFF` as a condition argument).
pub fn eval_and(host: &dyn ConditionHost, code: &[u8], ip: &mut usize) -> Result<bool> {
    let mut negation = false;
    let mut ok = true;
    let mut b = read_u8(code, ip)?;
    while b != AND_END && ok {
        if b == OR_OPEN {
            ok = eval_or(host, code, ip)? != negation;
            negation = false;
        } else if b == NEGATE {
            negation = !negation;
        } else {
            ok = primitive(host, code, ip, b)? != negation;
            negation = false;
        }
        b = read_u8(code, ip)?;
    }
    while b != AND_END {
        b = read_u8(code, ip)?;
    }
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct TestHost {
        vars: RefCell<[u8; 256]>,
        flags: RefCell<[bool; 256]>,
    }

    impl ConditionHost for TestHost {
        fn var(&self, index: u8) -> u8 {
            self.vars.borrow()[index as usize]
        }
        fn flag(&self, index: u8) -> bool {
            self.flags.borrow()[index as usize]
        }
        fn object_in_box(&self, _obj: u8, _x1: u8, _y1: u8, _x2: u8, _y2: u8) -> bool {
            false
        }
        fn has_key(&self) -> bool {
            false
        }
    }

    fn host_with_var3(value: u8) -> TestHost {
        let mut vars = [0u8; 256];
        vars[3] = value;
        TestHost { vars: RefCell::new(vars), flags: RefCell::new([false; 256]) }
    }

    #[test]
    fn equaln_true_then_code_after_terminator() {
        let host = host_with_var3(5);
        // equaln(3, 5), AND_END, then a sentinel byte
        let code = [0x01, 0x03, 0x05, 0xFF, 0xAB];
        let mut ip = 0;
        assert!(eval_and(&host, &code, &mut ip).unwrap());
        assert_eq!(ip, 4);
        assert_eq!(code[ip], 0xAB);
    }

    #[test]
    fn equaln_false_still_advances_past_terminator() {
        let host = host_with_var3(4);
        let code = [0x01, 0x03, 0x05, 0xFF, 0xAB];
        let mut ip = 0;
        assert!(!eval_and(&host, &code, &mut ip).unwrap());
        assert_eq!(ip, 4);
    }

    #[test]
    fn negation_toggles_the_next_term() {
        let host = host_with_var3(5);
        // not(equaln(3, 5)) -> false
        let code = [0xFD, 0x01, 0x03, 0x05, 0xFF];
        let mut ip = 0;
        assert!(!eval_and(&host, &code, &mut ip).unwrap());
    }

    #[test]
    fn and_of_or_group() {
        let host = host_with_var3(5);
        // A and (B or C): A=equaln(3,5)=true, OR group: equaln(3,9)=false, equaln(3,5)=true
        let code = [
            0x01, 0x03, 0x05, // A
            0xFC, 0x01, 0x03, 0x09, 0x01, 0x03, 0x05, 0xFC, // (B or C)
            0xFF,
        ];
        let mut ip = 0;
        assert!(eval_and(&host, &code, &mut ip).unwrap());
        assert_eq!(ip, code.len());
    }
}
