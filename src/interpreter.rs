/*!
interpreter: the cycle state machine — clock and input variables, room
transitions, and the public driver API (spec §5, §6).

Grounded on `lib/cycle.cpp` (`StartCycle`/`ResumeCycle`/`FinishCycle`),
`lib/interpreter.cpp` (`SetInitialState`/`NewRoom`/`Call`), and
`lib/input.cpp` (`PollInput`). The host window/surface adapter, sound
backend, and "said" parsing are out of scope (spec §1); this type exposes
only the contract spec §6 names: open a resource set, step cycles, accept
key events, and read back the framebuffer.
*/

use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::render::framebuffer::Framebuffer;
use crate::render::picture;
use crate::resource::{ResourceSet, Script};
use crate::vm::condition::ConditionHost;
use crate::vm::frame::{Frame, UserActionRequest};
use crate::vm::opcode;
use crate::world::object::SurfaceType;
use crate::world::table::{BlockRect, EGO};
use crate::world::ObjectTable;

/// Variable indices named in spec §6 (selection).
pub mod var {
    pub const CURRENT_ROOM: u8 = 0;
    pub const PREVIOUS_ROOM: u8 = 1;
    pub const EGO_TOUCH_CODE: u8 = 2;
    pub const SCORE: u8 = 3;
    pub const OBJECT_TOUCHED_BORDER: u8 = 4;
    pub const OBJECT_TOUCH_CODE: u8 = 5;
    pub const EGO_DIRECTION: u8 = 6;
    pub const MAX_SCORE: u8 = 7;
    pub const FREE_MEMORY_PAGES: u8 = 8;
    pub const MISMATCHED_WORDS: u8 = 9;
    pub const CYCLE_DELAY: u8 = 10;
    pub const CLOCK_SECONDS: u8 = 11;
    pub const CLOCK_MINUTES: u8 = 12;
    pub const CLOCK_HOURS: u8 = 13;
    pub const CLOCK_DAYS: u8 = 14;
    pub const JOYSTICK_SENSITIVITY: u8 = 15;
    pub const EGO_VIEW: u8 = 16;
    pub const ERROR_CODE: u8 = 17;
    pub const ERROR_INFO: u8 = 18;
    pub const PRESSED_KEY: u8 = 19;
    pub const COMPUTER_TYPE: u8 = 20;
    pub const MESSAGE_WINDOW_TIMER: u8 = 21;
    pub const SOUND_TYPE: u8 = 22;
    pub const SOUND_VOLUME: u8 = 23;
    pub const INPUT_BUFFER_SIZE: u8 = 24;
    pub const SELECTED_ITEM: u8 = 25;
    pub const MONITOR_TYPE: u8 = 26;
}

/// Flag indices named in spec §6 (selection).
pub mod flag {
    pub const PLAYER_COMMAND_ENTERED: u8 = 2;
    pub const USER_INPUT_ACCEPTED: u8 = 4;
    pub const ROOM_FIRST_RUN: u8 = 5;
    pub const RESTART_EXECUTED: u8 = 6;
    pub const SOUND_ENABLED: u8 = 9;
    pub const FIRST_LOGIC_0_RUN: u8 = 11;
    pub const RESTORE_EXECUTED: u8 = 12;
    pub const ENABLE_MENU: u8 = 14;
    pub const NON_BLOCKING_WINDOWS: u8 = 15;
}

/// The AGI logic-script interpreter: owns every piece of per-game state
/// (spec §3 "Ownership" — "Objects, flags, variables, and the framebuffer
/// are exclusively owned by the interpreter").
pub struct Interpreter {
    pub(crate) resources: ResourceSet,
    pub(crate) objects: ObjectTable,
    pub(crate) variables: [u8; 256],
    pub(crate) flags: [bool; 256],
    /// "Executed before" bits, indexed by *logic number* (spec §3), not by
    /// room — `lib/interpreter.cpp::Call` tests `roomFlags_` once per logic
    /// number for the life of the interpreter, never clearing it on
    /// `new.room` (see SPEC_FULL.md §B).
    pub(crate) room_flags: [bool; 256],
    pub(crate) stack: Vec<Frame>,
    keys: VecDeque<u8>,
    /// The offscreen plane `draw.pic`/`overlay.pic` paint into; `show.pic`
    /// republishes it as the base `finish_cycle` composites sprites onto.
    picture_buffer: Framebuffer,
    /// The plane `framebuffer()` reads: a fresh composite of `picture_buffer`
    /// plus every drawn sprite, rebuilt every `finish_cycle` so sprites never
    /// accumulate into the retained room picture.
    framebuffer: Framebuffer,
    pub(crate) program_control: bool,
    pub(crate) rng: StdRng,
    /// The text most recently selected by `print`/`print.v`/`display`/
    /// `display.v` (spec §4.7 "Text management"). There is no glyph
    /// rasterizer in this core (spec §1 Non-goals exclude the text window
    /// renderer), so the message string itself is the externally visible
    /// result rather than pixels in the framebuffer.
    last_message: Option<String>,
    pub(crate) accepting_input: bool,
}

impl Interpreter {
    /// Open a game directory and set up initial variable/flag state (spec
    /// §6, `SetInitialState`).
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let resources = ResourceSet::open(path)?;
        let mut interp = Self {
            resources,
            objects: ObjectTable::new(),
            variables: [0; 256],
            flags: [false; 256],
            room_flags: [false; 256],
            stack: Vec::new(),
            keys: VecDeque::new(),
            picture_buffer: Framebuffer::new(),
            framebuffer: Framebuffer::new(),
            program_control: true,
            rng: StdRng::from_entropy(),
            last_message: None,
            accepting_input: true,
        };
        interp.set_initial_state();
        Ok(interp)
    }

    /// Same as [`Interpreter::new`] but with a deterministic RNG seed, for
    /// tests that exercise `random`/`wander`.
    pub fn with_seed(path: impl AsRef<Path>, seed: u64) -> Result<Self> {
        let mut interp = Self::new(path)?;
        interp.rng = StdRng::seed_from_u64(seed);
        Ok(interp)
    }

    /// An interpreter with an empty, in-memory resource set (no directory
    /// files, no volumes) and a deterministic RNG — for handler unit tests
    /// that only touch variables/flags/objects, never resources.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let resources = ResourceSet {
            volumes: crate::resource::VolumeCache::new(std::path::PathBuf::new()),
            logics: crate::resource::ScriptLoader::new(Vec::new()),
            pictures: crate::resource::PictureLoader::new(Vec::new()),
            views: crate::resource::ViewLoader::new(Vec::new()),
            sounds: Vec::new(),
        };
        let mut interp = Self {
            resources,
            objects: ObjectTable::new(),
            variables: [0; 256],
            flags: [false; 256],
            room_flags: [false; 256],
            stack: Vec::new(),
            keys: VecDeque::new(),
            picture_buffer: Framebuffer::new(),
            framebuffer: Framebuffer::new(),
            program_control: true,
            rng: StdRng::seed_from_u64(1),
            last_message: None,
            accepting_input: true,
        };
        interp.set_initial_state();
        interp
    }

    fn set_initial_state(&mut self) {
        self.set_var(var::CYCLE_DELAY, 1);
        self.set_var(var::FREE_MEMORY_PAGES, 255);
        self.set_var(var::INPUT_BUFFER_SIZE, 41);
        self.set_var(var::COMPUTER_TYPE, 0);
        self.set_var(var::SOUND_TYPE, 0);
        self.set_var(var::MONITOR_TYPE, 3); // EGA
        self.set_flag(flag::FIRST_LOGIC_0_RUN, true);
        self.set_flag(flag::ROOM_FIRST_RUN, true);
        self.program_control = true;
    }

    pub fn var(&self, index: u8) -> u8 {
        self.variables[index as usize]
    }

    pub fn set_var(&mut self, index: u8, value: u8) {
        self.variables[index as usize] = value;
    }

    pub fn flag(&self, index: u8) -> bool {
        self.flags[index as usize]
    }

    pub fn set_flag(&mut self, index: u8, value: bool) {
        self.flags[index as usize] = value;
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectTable {
        &mut self.objects
    }

    /// Read-only access to the currently published color/priority planes
    /// (spec §6).
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// `V[10] * 50` milliseconds (spec §5, §6).
    pub fn cycle_delay(&self) -> u64 {
        self.var(var::CYCLE_DELAY) as u64 * 50
    }

    /// Enqueue a key event and set `V[19]` (spec §5 "Shared resources").
    pub fn on_key_press(&mut self, scancode: u8) {
        self.keys.push_back(scancode);
        self.set_var(var::PRESSED_KEY, scancode);
    }

    fn has_pending_key(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Poll input: drive ego's direction from `V[6]` under program
    /// control (spec §4.7 `program.control`; `lib/input.cpp::PollInput`).
    /// Direct keyboard-to-direction mapping under player control is a host
    /// concern (out of scope, spec §1) beyond the scancode queue itself.
    fn poll_input(&mut self) {
        self.keys.clear();
        if self.program_control {
            let dir = self.var(var::EGO_DIRECTION);
            self.objects.set_dir(EGO, dir);
        }
    }

    /// `start_cycle`: clears per-cycle flags, polls input, updates
    /// direction of controllable objects, clears the script stack, pushes
    /// logic 0, and runs the VM until suspension or an empty stack (spec
    /// §6).
    pub fn start_cycle(&mut self) -> Result<Option<UserActionRequest>> {
        self.set_flag(flag::PLAYER_COMMAND_ENTERED, false);
        self.set_flag(flag::USER_INPUT_ACCEPTED, false);
        self.poll_input();

        self.stack.clear();
        self.call(0)?;
        self.resume_cycle()
    }

    /// `resume_cycle`: continues a suspended cycle (or a just-started one)
    /// and finishes it if it runs to completion (spec §6).
    pub fn resume_cycle(&mut self) -> Result<Option<UserActionRequest>> {
        let uar = crate::vm::exec::run_cycle(self)?;
        if uar.is_none() {
            self.finish_cycle();
        }
        Ok(uar)
    }

    /// `FinishCycle`: clear first-run/one-shot flags, composite the
    /// scene, and advance every controlled object's animation and motion
    /// (spec §5 "Ordering guarantees", `lib/cycle.cpp::FinishCycle`).
    fn finish_cycle(&mut self) {
        self.set_flag(flag::FIRST_LOGIC_0_RUN, false);
        self.set_var(var::OBJECT_TOUCH_CODE, 0);
        self.set_flag(flag::RESTART_EXECUTED, false);
        self.set_flag(flag::RESTORE_EXECUTED, false);

        let mut frame = self.picture_buffer.clone();
        self.objects.draw_all(&mut frame);
        self.framebuffer = frame;
        let mut flags = [false; 256];
        self.objects.update_cycle(&mut flags, &mut self.rng);
        for (i, set) in flags.iter().enumerate() {
            if *set {
                self.flags[i] = true;
            }
        }
    }

    /// `call`: push a new frame for logic `logic_number`, setting the
    /// room-first-run flag the way `lib/interpreter.cpp::Call` does (spec
    /// §3, SPEC_FULL.md §B).
    pub(crate) fn call(&mut self, logic_number: u8) -> Result<()> {
        let already_run = self.room_flags[logic_number as usize];
        self.set_flag(flag::ROOM_FIRST_RUN, !already_run);
        self.room_flags[logic_number as usize] = true;
        let script: Rc<Script> = self.resources.logic(logic_number)?;
        self.stack.push(Frame::new(script));
        Ok(())
    }

    /// `new.room`: unanimate all, reset horizon/program-control/touch
    /// variables, and truncate the cycle by clearing the frame stack
    /// (spec §4.7 `new.room`, §5 "Cancellation & timeout").
    pub(crate) fn new_room(&mut self, room: u8) {
        self.objects.unanimate_all();
        self.program_control = true;
        self.objects.unblock();
        self.objects.horizon = 36;
        let previous = self.var(var::CURRENT_ROOM);
        self.set_var(var::PREVIOUS_ROOM, previous);
        self.set_var(var::CURRENT_ROOM, room);
        self.set_var(var::OBJECT_TOUCHED_BORDER, 0);
        self.set_var(var::OBJECT_TOUCH_CODE, 0);
        self.set_var(var::MISMATCHED_WORDS, 0);
        self.set_var(var::EGO_TOUCH_CODE, 0);
        debug!("new.room -> {room}");
        self.stack.clear();
    }

    pub(crate) fn load_logic(&mut self, index: u8) -> Result<()> {
        self.resources.logic(index)?;
        Ok(())
    }

    /// `set.view`/`set.view.v`: load the view and attach it to object
    /// `id` (spec §4.7 `set.view`).
    pub(crate) fn set_view(&mut self, id: u8, view_index: u8) -> Result<()> {
        let view = self.resources.view(view_index)?;
        self.objects.set_view(id, view_index, Some(view));
        Ok(())
    }

    /// `draw.pic`: clear the offscreen plane and decode picture `index`
    /// into it (spec §4.7 `draw.pic`).
    pub(crate) fn draw_pic(&mut self, index: u8) -> Result<()> {
        self.picture_buffer.clear();
        let payload = self.resources.picture_payload(index)?;
        picture::decode(payload, &mut self.picture_buffer);
        Ok(())
    }

    /// `overlay.pic`: decode picture `index` without clearing first.
    pub(crate) fn overlay_pic(&mut self, index: u8) -> Result<()> {
        let payload = self.resources.picture_payload(index)?;
        picture::decode(payload, &mut self.picture_buffer);
        Ok(())
    }

    /// `show.pic`: publish the offscreen plane as the visible one (spec
    /// §5 "the published visible framebuffer updates atomically").
    pub(crate) fn show_pic(&mut self) {
        self.framebuffer = self.picture_buffer.clone();
    }

    /// `print`/`print.v`/`display`/`display.v`: look the message number up
    /// in the currently-executing frame's script and record it as the
    /// selected text (spec §4.7 "Text management";
    /// `lib/interpreter.cpp::DisplayMessage`).
    pub(crate) fn display_message(&mut self, index: u8) {
        let text = self
            .stack
            .last()
            .and_then(|frame| frame.script.message(index))
            .map(|s| s.to_owned());
        debug!("message[{index}] = {text:?}");
        self.last_message = text;
    }

    /// The text most recently selected by `print`/`display` (spec §6).
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// `clear.lines(top, bottom, color)`: blank the given screen rows on
    /// the visible plane (spec §4.7 `clear.lines`).
    pub(crate) fn framebuffer_clear_lines(&mut self, top: u8, bottom: u8, color: u8) {
        self.framebuffer.clear_lines(top, bottom, color);
    }

    /// Whether `accept.input`/`prevent.input` currently allow the host to
    /// read a line of typed text (spec §4.7).
    pub fn accepting_input(&self) -> bool {
        self.accepting_input
    }

    pub(crate) fn warn_unknown_opcode(&self, opcode: u8, ip: usize) {
        warn!("unknown opcode 0x{opcode:02x} at ip {ip}, treated as a no-op");
    }

    pub(crate) fn trace_call(&self, logic: u8) {
        trace!("call(logic={logic})");
    }
}

impl ConditionHost for Interpreter {
    fn var(&self, index: u8) -> u8 {
        Interpreter::var(self, index)
    }

    fn flag(&self, index: u8) -> bool {
        Interpreter::flag(self, index)
    }

    fn object_in_box(&self, obj: u8, x1: u8, y1: u8, x2: u8, y2: u8) -> bool {
        self.objects.object_in_box(obj, x1, y1, x2, y2)
    }

    fn has_key(&self) -> bool {
        self.has_pending_key()
    }
}

pub(crate) fn block_rect(x1: u8, y1: u8, x2: u8, y2: u8) -> BlockRect {
    BlockRect { x1, y1, x2, y2 }
}

pub(crate) fn surface_type(n: u8) -> SurfaceType {
    match n {
        1 => SurfaceType::Water,
        2 => SurfaceType::Land,
        _ => SurfaceType::Any,
    }
}

pub(crate) fn opcode_argc(cmd: u8) -> u8 {
    opcode::arity(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_logic_payload, build_resource_set};

    #[test]
    fn new_room_opcode_drives_a_full_cycle_to_completion() {
        // new.room(5); return
        let code = [18u8, 5, 0x00];
        let logic = build_logic_payload(&code, &[]);
        let game = build_resource_set(&[logic], &[], &[], &[]);

        let mut interp = Interpreter::with_seed(&game.dir, 1).unwrap();
        let uar = interp.start_cycle().unwrap();
        assert!(uar.is_none());
        assert_eq!(interp.var(var::CURRENT_ROOM), 5);
        assert_eq!(interp.var(var::PREVIOUS_ROOM), 0);
        assert!(interp.stack.is_empty());
    }

    #[test]
    fn draw_pic_then_show_pic_publishes_the_decoded_picture() {
        // assignn(50, 0); draw.pic(50); show.pic(); return
        let code = [3u8, 50, 0, 25, 50, 26, 0x00];
        let logic = build_logic_payload(&code, &[]);
        let picture = vec![0xF0u8, 5, 0xF6, 0, 0, 5, 0, 0xFF];
        let game = build_resource_set(&[logic], &[picture], &[], &[]);

        let mut interp = Interpreter::with_seed(&game.dir, 1).unwrap();
        interp.start_cycle().unwrap();

        let fb = interp.framebuffer();
        for x in 0..=5usize {
            assert_eq!(fb.picture_plane()[x * 2], 5);
        }
    }

    #[test]
    fn call_pushes_a_frame_and_return_pops_it() {
        // logic 0: call(1); return
        let logic0 = build_logic_payload(&[22u8, 1, 0x00], &[]);
        // logic 1: assignn(7, 99); return
        let logic1 = build_logic_payload(&[3u8, 7, 99, 0x00], &[]);
        let game = build_resource_set(&[logic0, logic1], &[], &[], &[]);

        let mut interp = Interpreter::with_seed(&game.dir, 1).unwrap();
        interp.start_cycle().unwrap();

        assert_eq!(interp.var(7), 99);
        assert!(interp.stack.is_empty());
    }
}
