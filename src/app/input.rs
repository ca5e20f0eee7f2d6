use std::io::{self, BufRead};

/// Block until the user pushes the clock one step (Enter). Returns false on
/// EOF, which the main loop treats as "stop the emulator".
pub fn wait_for_step() -> bool {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => false, // EOF
        Ok(_) => true,
        Err(_) => false,
    }
}
