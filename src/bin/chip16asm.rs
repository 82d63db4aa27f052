use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("chip16asm: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let input = args.next().ok_or_else(|| "usage: chip16asm <src> <out>".to_string())?;
    let output = args.next().ok_or_else(|| "usage: chip16asm <src> <out>".to_string())?;
    let input = PathBuf::from(input);
    let output = PathBuf::from(output);

    let source = fs::read_to_string(&input)
        .map_err(|err| format!("failed to read {}: {err}", input.display()))?;

    let ops = chip16_asm::assemble(&source).map_err(|err| err.to_string())?;
    log::debug!("assembled {} words from {}", ops.len(), input.display());

    let bytes = chip16_asm::rom::write(&ops).map_err(|err| err.to_string())?;

    fs::write(&output, bytes)
        .map_err(|err| format!("failed to write {}: {err}", output.display()))?;

    Ok(())
}
