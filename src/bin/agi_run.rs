//! `agi-run`: a headless smoke driver.
//!
//! Opens a resource directory, runs a fixed number of cycles with no input,
//! and reports the final framebuffer checksum plus a handful of object/VM
//! state fields. This has no windowing dependency — display is out of
//! scope for this core (spec §1) — this plays the same role a minimal
//! smoke driver plays for any emulated-machine core: a quick "does this
//! load and run" check, not a playable frontend.

use std::env;
use std::process::ExitCode;

use agi_core::interpreter::var;
use agi_core::Interpreter;

const DEFAULT_CYCLES: u32 = 60;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: agi-run <game-directory> [cycles]");
        return ExitCode::FAILURE;
    };
    let cycles: u32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CYCLES);

    let mut interp = match Interpreter::new(&path) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("failed to open {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    for cycle in 0..cycles {
        match interp.start_cycle() {
            Ok(Some(request)) => {
                log::info!(
                    "cycle {cycle}: suspended awaiting text input (var {}, max_len {})",
                    request.string_index,
                    request.max_len
                );
                // Headless driver has no keyboard: resume immediately with
                // whatever the script already has in its string buffer.
                if let Err(e) = interp.resume_cycle() {
                    eprintln!("cycle {cycle} failed to resume: {e}");
                    return ExitCode::FAILURE;
                }
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("cycle {cycle} failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let fb = interp.framebuffer();
    let checksum = fb
        .picture_plane()
        .iter()
        .chain(fb.priority_plane())
        .fold(0u64, |acc, &b| acc.wrapping_mul(31).wrapping_add(b as u64));

    println!("ran {cycles} cycles over {path}");
    println!("room = {}", interp.var(var::CURRENT_ROOM));
    println!("ego view = {}", interp.var(var::EGO_VIEW));
    println!("framebuffer checksum = {checksum:#018x}");
    if let Some(msg) = interp.last_message() {
        println!("last message = {msg:?}");
    }

    ExitCode::SUCCESS
}
