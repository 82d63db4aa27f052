use std::env;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use chip16_core::{ConsoleIO, DeviceSet, Vm};

/// Lazily reads lines from stdin, locking only for the duration of each
/// read so the iterator itself stays `Send` (unlike `io::Lines<StdinLock>`).
struct StdinLines(io::Stdin);

impl Iterator for StdinLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.0.lock().read_line(&mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.ends_with('\n') {
                    buf.pop();
                    if buf.ends_with('\r') {
                        buf.pop();
                    }
                }
                Some(buf)
            }
            Err(_) => None,
        }
    }
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("chip16: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let command = args.next().ok_or_else(|| "usage: chip16 run <rom>".to_string())?;
    if command != "run" {
        return Err(format!("unknown command `{command}` (expected `run`)"));
    }
    let rom_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| "usage: chip16 run <rom>".to_string())?;

    let image = fs::read(&rom_path).map_err(|err| format!("failed to read {}: {err}", rom_path.display()))?;

    let mut devices = DeviceSet::empty();
    let stdin_lines = StdinLines(io::stdin());
    devices.attach(0, Box::new(ConsoleIO::new(stdin_lines, io::stdout())));

    let mut vm = Vm::new(&image, devices).map_err(|err| err.to_string())?;
    vm.execute(None).map_err(|err| err.to_string())?;

    if vm.alert {
        log::warn!("program raised `alert` at least once during execution");
    }

    Ok(())
}
