/*!
opcode: the 182-entry arity table and the command-family classification
(spec §4.7 "Command dispatch", "Arity table").

Carried over verbatim from `lib/cmd_exec.cpp`'s `ArgumentCount` (the
original ships no public enum for opcode->family, so family boundaries here
are reconstructed from which `*Command` handler `cmd_exec.cpp` routes each
opcode to; see DESIGN.md for the reconstruction notes). Positions with no
handler in this core still carry correct arity so the fetcher always
advances the right number of bytes, per spec §7's "unrecognised opcodes ...
silently no-op".
*/

/// Fixed argument-byte count per opcode, indices `0..182` (spec §4.7).
pub const ARITY: [u8; 182] = [
    0, 1, 1, 2, 2, 2, 2, 2, // 0x00
    2, 2, 2, 2, 1, 1, 1, 1, // 0x08
    1, 1, 1, 1, 1, 1, 1, 1, // 0x10  (call.v @ 0x17)
    1, 1, 0, 1, 1, 0, 1, 1, // 0x18  (var)
    1, 1, 0, 1, 1, 3, 3, 3, // 0x20  (get.posn)
    3, 2, 2, 2, 2, 1, 1, 2, // 0x28  (set.cel)
    2, 2, 2, 2, 2, 2, 2, 2, // 0x30  (set.priority.v)
    1, 2, 1, 1, 1, 1, 1, 1, // 0x38  (set.horizon)
    1, 1, 1, 1, 1, 3, 1, 1, // 0x40  (start.cycling)
    1, 2, 1, 2, 2, 1, 1, 2, // 0x48  (step.size)
    2, 5, 5, 3, 1, 1, 2, 2, // 0x50  (get.dir)
    1, 1, 4, 0, 1, 1, 1, 2, // 0x58  (put)
    2, 2, 1, 2, 0, 1, 1, 3, // 0x60  (display)
    3, 3, 0, 0, 1, 2, 1, 3, // 0x68  (configure.screen)
    0, 0, 2, 5, 2, 1, 2, 0, // 0x70  (prevent.input)
    0, 3, 7, 7, 0, 0, 0, 0, // 0x78  (init.disk)
    0, 1, 3, 0, 0, 1, 1, 0, // 0x80  (show.mem)
    0, 0, 0, 0, 0, 0, 1, 1, // 0x88  (set.game.id)
    1, 0, 0, 3, 3, 0, 3, 4, // 0x90  (print.at)
    4, 1, 5, 2, 1, 2, 0, 1, // 0x98  (enable.item)
    1, 0, 1, 0, 0, 2, 2, 2, // 0xA0  (div.n)
    2, 0, 1, 0, 0, 0, 1, 1, // 0xA8  (unknown175)
    0, 1, 0, 4, 2, 0, // 0xB0 .. 0xB5 (unknown 181)
];

/// Look up the arity of opcode `cmd`. Opcodes beyond the table's end (no
/// arity defined in this core, spec §9 "Open questions") are treated as
/// zero-argument so the fetcher still advances deterministically.
pub fn arity(cmd: u8) -> u8 {
    ARITY.get(cmd as usize).copied().unwrap_or(0)
}

/// The command families opcodes are grouped into (§4.7 "Command
/// dispatch"). `Inventory`, `Sound`, `String`, `Init`, and `Menu` are folded
/// into a single `misc` handler module in this core, since every opcode in
/// those families is, per §1/§7, "recognised, consumes arguments, and
/// otherwise has no semantic effect" — splitting five empty handler
/// functions apart from `Misc` would add indirection with no behavioral
/// payoff.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Family {
    Arithmetic,
    Resource,
    ProgramControl,
    ObjectDescription,
    ObjectMotion,
    Picture,
    Text,
    /// Inventory, Sound, String, Init, Menu, and unclassified tail opcodes.
    Misc,
}

/// Classify opcode `cmd` by family, reconstructed from `cmd_exec.cpp`'s
/// dispatch (see module doc comment and DESIGN.md).
pub fn family_of(cmd: u8) -> Family {
    use Family::*;
    match cmd {
        // ArithmeticCommand. mul.n/mul.v/div.n/div.v (165-168) have no case
        // in this core's ArithmeticCommand switch at all (ArgumentCount
        // still reserves their slots) — classified here and implemented for
        // real, since the arithmetic opcode table names them explicitly.
        1..=17 | 130 | 165 | 166 | 167 | 168 => Arithmetic,
        // ResourceManagementCommand (load/discard logic, pic, view, sound)
        20 | 21 | 24 | 27 | 30 | 31 | 32 | 153 | 98 => Resource,
        // ProgramControlCommand
        0 | 18 | 19 | 22 | 23 => ProgramControl,
        // ObjectDescriptionCommand
        33 | 34 | 35 | 36 | 37 | 38 | 39 | 41 | 42 | 43 | 44 | 45 | 46 | 47 | 48 | 49 | 50 | 51
        | 52 | 53 | 54 | 55 | 56 | 57 | 70 | 71 | 72 | 73 | 74 | 75 | 76 => ObjectDescription,
        // ObjectMotionCommand
        40 | 58 | 59 | 60 | 61 | 62 | 63 | 64 | 65 | 66 | 67 | 68 | 69 | 77 | 78 | 79 | 80 | 81
        | 82 | 83 | 84 | 85 | 86 | 87 | 88 | 89 | 90 | 91 | 131 | 132 => ObjectMotion,
        // PictureManagementCommand (show.pri.screen(29) is dispatched
        // through MiscCommand in the original, not here)
        25 | 26 | 28 => Picture,
        // TextManagementCommand. print/print.v (101, 102) have no case in
        // this core's switch either (likely an oversight — they index the
        // same message table as display/display.v) so they are grouped
        // here and given the same real implementation.
        101 | 102 | 103 | 104 | 105 | 106 | 107 | 108 | 112 | 119 | 120 => Text,
        _ => Misc,
    }
}
