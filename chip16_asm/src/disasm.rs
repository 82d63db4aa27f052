//! Opcode stream → mnemonic text (supplemental: the source has no
//! disassembler). Exists to make §8 invariant 4 ("assembling then
//! disassembling reproduces the original opcode sequence") mechanically
//! testable; every word round-trips, defined opcode or not, since
//! undefined bit patterns fall back to a `db` literal of the same word.

use chip16_core::bits::{addr12, field_x, field_y, field_z, low_byte, top_nibble};

/// One text line per word, in the same grammar [`crate::assembler::assemble`]
/// accepts, `goto`/`call`/`smp` using raw hex addresses instead of labels.
pub fn disassemble(ops: &[u16]) -> Vec<String> {
    ops.iter().map(|&word| disassemble_word(word)).collect()
}

fn reg(n: u8) -> String {
    format!("r{n:X}")
}

fn dev(n: u8) -> String {
    format!("dev{n:X}")
}

fn raw(word: u16) -> String {
    format!("db {word:04X}")
}

fn disassemble_word(word: u16) -> String {
    let x = field_x(word);
    let y = field_y(word);
    let nn = low_byte(word);
    let nnn = addr12(word);

    match top_nibble(word) {
        0x0 => match word {
            0x0000 => "hlt".to_string(),
            0x01EE => "ret".to_string(),
            _ => raw(word),
        },
        0x1 => format!("goto {nnn:X}"),
        0x2 => format!("call {nnn:X}"),
        0x3 => format!("snec {}, {nn:X}", reg(x)),
        0x4 => format!("snuec {}, {nn:X}", reg(x)),
        0x5 if field_z(word) == 0 => format!("sne {}, {}", reg(x), reg(y)),
        0x6 => format!("acr {}, {nn:X}", reg(x)),
        0x7 => format!("adc {}, {nn:X}", reg(x)),
        0x8 => match field_z(word) {
            0x0 => format!("ar {}, {}", reg(x), reg(y)),
            0x1 => format!("or {}, {}", reg(x), reg(y)),
            0x2 => format!("and {}, {}", reg(x), reg(y)),
            0x3 => format!("xor {}, {}", reg(x), reg(y)),
            0x4 => format!("add {}, {}", reg(x), reg(y)),
            0x5 => format!("sub {}, {}", reg(x), reg(y)),
            0x6 => format!("shr {}, {y:X}", reg(x)),
            0x7 => format!("rsub {}, {}", reg(x), reg(y)),
            0xE => format!("shl {}, {y:X}", reg(x)),
            0xF => format!("xch {}, {}", reg(x), reg(y)),
            _ => raw(word),
        },
        0x9 if field_z(word) == 0 => format!("snue {}, {}", reg(x), reg(y)),
        0xA => format!("smp {nnn:X}"),
        0xB => format!("cpac {nnn:X}"),
        0xC => format!("bar {}, {nn:X}", reg(x)),
        0xD => format!("rdb {}, {nn:X}", dev(x)),
        0xE => match nn {
            0x00 => format!("dps {}", dev(x)),
            0x01 => format!("dpg {}", dev(x)),
            0x1E => format!("mpar {}", reg(x)),
            0x55 => format!("spl {}", reg(x)),
            0x65 => format!("ld {}", reg(x)),
            _ => raw(word),
        },
        0xF => format!("wrb {}, {nn:X}", dev(x)),
        _ => raw(word),
    }
}
