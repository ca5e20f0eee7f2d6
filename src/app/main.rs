use std::{env, path::Path, process, thread, time::Duration};

// Declare modules located within the src/app/ directory
mod constants;
mod dashboard;
mod input;

use nibbler::machine::Machine;

fn main() -> Result<(), String> {
    // --- Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <program-path> [clock_hz]", args[0]);
        process::exit(1);
    }
    let program_path = Path::new(&args[1]);

    let clock_hz = match args.get(2) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("Invalid clock rate '{raw}'"))?,
        None => constants::DEFAULT_CLOCK_HZ,
    };
    if !(constants::MIN_CLOCK_HZ..=constants::MAX_CLOCK_HZ).contains(&clock_hz) {
        return Err(format!(
            "Clock rate {clock_hz} Hz is outside {}..={} Hz",
            constants::MIN_CLOCK_HZ,
            constants::MAX_CLOCK_HZ
        ));
    }

    // --- Load ROM tables and the program image ---
    // All input errors surface here, before the clock starts.
    let mut machine = Machine::from_rom_files(
        Path::new(constants::CONTROL_ROM_PATH),
        Path::new(constants::ALU_LOW_ROM_PATH),
        Path::new(constants::ALU_HIGH_ROM_PATH),
    )?;

    let image = std::fs::read(program_path)
        .map_err(|e| format!("Failed to read program '{}': {e}", program_path.display()))?;
    machine.load_program(&image)?;
    machine.reset();

    let half_cycle = Duration::from_secs_f64(1.0 / clock_hz as f64);

    // --- Main Loop ---
    // One half-tick per pass. A halted clock waits for a manual step; EOF on
    // stdin or the instruction cap ends the run cleanly.
    loop {
        if machine.state().halted() {
            dashboard::print_state(&machine);
            println!("clock halted - Enter steps, Ctrl-D quits");
            if !input::wait_for_step() {
                break;
            }
            machine.force_half_tick();
        } else {
            machine.half_tick();
        }

        dashboard::print_state(&machine);
        thread::sleep(half_cycle);

        if machine.instructions_retired() >= constants::INSTRUCTION_CAP {
            println!("instruction cap reached after {} instructions", constants::INSTRUCTION_CAP);
            break;
        }
    }

    Ok(())
}
