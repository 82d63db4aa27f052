//! Big-endian word stream ↔ byte file (spec §4.6, §6.2).

use crate::error::AsmError;

/// Serializes `ops` as a flat big-endian byte stream, high byte first
/// per word, no header. Errors if the image would exceed the 12-bit
/// address space (4096 bytes / 2048 words).
pub fn write(ops: &[u16]) -> Result<Vec<u8>, AsmError> {
    if ops.len() * 2 > 4096 {
        return Err(AsmError::AddressOverflow);
    }
    let mut bytes = Vec::with_capacity(ops.len() * 2);
    for &word in ops {
        bytes.push((word >> 8) as u8);
        bytes.push((word & 0xFF) as u8);
    }
    Ok(bytes)
}

/// Reverses [`write`] into the word stream a loader can replay, or
/// hand straight to `chip16_core::vm::Vm::new` as the raw byte image.
pub fn read(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| {
            let hi = pair[0] as u16;
            let lo = *pair.get(1).unwrap_or(&0) as u16;
            (hi << 8) | lo
        })
        .collect()
}
