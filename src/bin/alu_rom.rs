//! Generate the two ALU slice tables and write them under `bin/`.

use nibbler::alu;
use std::fs;
use std::path::Path;

fn main() -> Result<(), String> {
    let out_dir = Path::new("bin");
    fs::create_dir_all(out_dir)
        .map_err(|e| format!("failed to create '{}': {e}", out_dir.display()))?;

    let (low, high) = alu::generate();

    write_table(&out_dir.join("alu_low.bin"), &low)?;
    write_table(&out_dir.join("alu_high.bin"), &high)?;
    Ok(())
}

fn write_table(path: &Path, table: &[u8]) -> Result<(), String> {
    fs::write(path, table).map_err(|e| format!("failed to write '{}': {e}", path.display()))?;
    println!("wrote {} ({} bytes)", path.display(), table.len());
    Ok(())
}
