//! Generate the control sequencer table and write it under `bin/`.

use nibbler::control;
use std::fs;
use std::path::Path;

fn main() -> Result<(), String> {
    let out_dir = Path::new("bin");
    fs::create_dir_all(out_dir)
        .map_err(|e| format!("failed to create '{}': {e}", out_dir.display()))?;

    let table = control::generate();
    let path = out_dir.join("control.bin");
    fs::write(&path, &table).map_err(|e| format!("failed to write '{}': {e}", path.display()))?;
    println!("wrote {} ({} bytes)", path.display(), table.len());
    Ok(())
}
