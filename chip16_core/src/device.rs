//! Memory-mapped I/O devices (spec §4.2).
//!
//! `DevicePort` is a four-method port every Chip16 device implements,
//! generalized from a single display-shaped interface into something
//! any memory-mapped peripheral can speak.
//! The VM owns a fixed [`DeviceSet`] of sixteen slots, each either a
//! boxed `dyn DevicePort` or the [`NullDevice`] sentinel, matching §3's
//! "VM owns a fixed array of 16 slots; empty slots hold a null-device
//! sentinel that fails if addressed."

use crate::error::VmError;

/// Contract every memory-mapped device implements (spec §4.2).
pub trait DevicePort {
    /// Reads `n` bytes from the device. May block on external I/O.
    fn read(&mut self, n: u8) -> Result<Vec<u8>, VmError>;
    /// Consumes `bytes`, writing them to the device.
    fn write(&mut self, bytes: &[u8]) -> Result<(), VmError>;
    fn get_ptr(&self) -> u16;
    fn set_ptr(&mut self, value: u16);
}

/// Fails every call; occupies empty device slots so `DXNN`/`EX..`/`FXNN`
/// against an unattached slot return `DeviceAbsent` instead of panicking.
struct NullDevice {
    slot: u8,
}

impl DevicePort for NullDevice {
    fn read(&mut self, _n: u8) -> Result<Vec<u8>, VmError> {
        Err(VmError::DeviceAbsent { slot: self.slot })
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), VmError> {
        Err(VmError::DeviceAbsent { slot: self.slot })
    }

    fn get_ptr(&self) -> u16 {
        0
    }

    fn set_ptr(&mut self, _value: u16) {}
}

/// Fixed-size table of sixteen optional device ports (spec C3).
pub struct DeviceSet {
    slots: [Box<dyn DevicePort>; 16],
}

impl DeviceSet {
    pub fn empty() -> Self {
        Self {
            slots: std::array::from_fn(|slot| -> Box<dyn DevicePort> {
                Box::new(NullDevice { slot: slot as u8 })
            }),
        }
    }

    /// Attaches `device` at `slot`, returning whatever was there before.
    pub fn attach(&mut self, slot: u8, device: Box<dyn DevicePort>) -> Box<dyn DevicePort> {
        std::mem::replace(&mut self.slots[slot as usize], device)
    }

    pub fn get(&self, slot: u8) -> &dyn DevicePort {
        self.slots[slot as usize].as_ref()
    }

    pub fn get_mut(&mut self, slot: u8) -> &mut dyn DevicePort {
        self.slots[slot as usize].as_mut()
    }
}

impl Default for DeviceSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Console input/output device (spec §4.2).
///
/// `format_code` doubles as the device's pointer register: `get_ptr`/
/// `set_ptr` read and write it directly. Mode 0 is character I/O; mode
/// 1 is one `0x{:02x}` token per line on write, and a `u8` parsed per
/// input line on read, so a `ConsoleIO` writing bytes and another
/// `ConsoleIO` reading them round-trips.
pub struct ConsoleIO {
    format_code: u16,
    input: Box<dyn Iterator<Item = String> + Send>,
    output: Box<dyn std::io::Write + Send>,
}

impl ConsoleIO {
    pub fn new(
        input: impl Iterator<Item = String> + Send + 'static,
        output: impl std::io::Write + Send + 'static,
    ) -> Self {
        Self {
            format_code: 0,
            input: Box::new(input),
            output: Box::new(output),
        }
    }

    fn next_line(&mut self) -> String {
        self.input.next().unwrap_or_default()
    }
}

impl DevicePort for ConsoleIO {
    fn read(&mut self, n: u8) -> Result<Vec<u8>, VmError> {
        match self.format_code {
            1 => {
                let mut out = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    let line = self.next_line();
                    let trimmed = line.trim();
                    let value = trimmed
                        .strip_prefix("0x")
                        .or_else(|| trimmed.strip_prefix("0X"))
                        .map(|digits| u8::from_str_radix(digits, 16))
                        .unwrap_or_else(|| trimmed.parse::<u8>())
                        .unwrap_or(0);
                    out.push(value);
                }
                Ok(out)
            }
            _ => {
                let line = self.next_line();
                let mut bytes: Vec<u8> = line.bytes().collect();
                bytes.resize(n as usize, 0);
                Ok(bytes)
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), VmError> {
        match self.format_code {
            1 => {
                for byte in bytes {
                    let _ = writeln!(self.output, "0x{byte:02x}");
                }
            }
            _ => {
                for &byte in bytes {
                    let _ = write!(self.output, "{}", byte as char);
                }
            }
        }
        Ok(())
    }

    fn get_ptr(&self) -> u16 {
        self.format_code
    }

    fn set_ptr(&mut self, value: u16) {
        self.format_code = value;
    }
}

/// Flat 64 KiB buffer addressed through a settable cursor (spec §4.2).
///
/// `read`/`write` operate at the cursor without advancing it, so
/// repeated reads see the same bytes until `set_ptr` moves the cursor.
pub struct MemoryDevice {
    buf: Vec<u8>,
    cursor: u16,
}

impl MemoryDevice {
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; 1 << 16],
            cursor: 0,
        }
    }
}

impl Default for MemoryDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl DevicePort for MemoryDevice {
    fn read(&mut self, n: u8) -> Result<Vec<u8>, VmError> {
        let start = self.cursor as usize;
        let end = (start + n as usize).min(self.buf.len());
        Ok(self.buf[start..end].to_vec())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), VmError> {
        let start = self.cursor as usize;
        let end = (start + bytes.len()).min(self.buf.len());
        let count = end - start;
        self.buf[start..end].copy_from_slice(&bytes[..count]);
        Ok(())
    }

    fn get_ptr(&self) -> u16 {
        self.cursor
    }

    fn set_ptr(&mut self, value: u16) {
        self.cursor = value;
    }
}

/// Same layout as [`MemoryDevice`] but loaded from a ROM image and
/// read-only from the VM's perspective (spec §4.2: "writes ... SHOULD
/// be rejected in a rewrite" — the Python original silently accepted
/// them).
pub struct RomDevice {
    buf: Vec<u8>,
    cursor: u16,
    slot: u8,
}

impl RomDevice {
    pub fn from_bytes(slot: u8, image: &[u8]) -> Self {
        let mut buf = vec![0u8; 1 << 16];
        let len = image.len().min(buf.len());
        buf[..len].copy_from_slice(&image[..len]);
        Self {
            buf,
            cursor: 0,
            slot,
        }
    }
}

impl DevicePort for RomDevice {
    fn read(&mut self, n: u8) -> Result<Vec<u8>, VmError> {
        let start = self.cursor as usize;
        let end = (start + n as usize).min(self.buf.len());
        Ok(self.buf[start..end].to_vec())
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), VmError> {
        Err(VmError::DeviceReadOnly { slot: self.slot })
    }

    fn get_ptr(&self) -> u16 {
        self.cursor
    }

    fn set_ptr(&mut self, value: u16) {
        self.cursor = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_device_fails_every_call() {
        let mut set = DeviceSet::empty();
        assert!(matches!(
            set.get_mut(3).read(1),
            Err(VmError::DeviceAbsent { slot: 3 })
        ));
    }

    #[test]
    fn memory_device_round_trips_at_cursor() {
        let mut dev = MemoryDevice::new();
        dev.set_ptr(0x10);
        dev.write(&[1, 2, 3]).unwrap();
        assert_eq!(dev.read(3).unwrap(), vec![1, 2, 3]);
        // reading again does not advance the cursor.
        assert_eq!(dev.read(3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rom_device_rejects_writes() {
        let mut dev = RomDevice::from_bytes(2, &[0xAA, 0xBB]);
        assert_eq!(dev.read(2).unwrap(), vec![0xAA, 0xBB]);
        assert!(matches!(
            dev.write(&[0]),
            Err(VmError::DeviceReadOnly { slot: 2 })
        ));
    }

    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn console_io_mode1_round_trips_through_itself() {
        let sink = SharedBuf::default();
        let mut writer = ConsoleIO::new(std::iter::empty(), sink.clone());
        writer.set_ptr(1);
        writer.write(&[0x2a]).unwrap();

        let line = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        let mut reader = ConsoleIO::new(std::iter::once(line.trim().to_string()), Vec::new());
        reader.set_ptr(1);
        assert_eq!(reader.read(1).unwrap(), vec![0x2a]);
    }
}
