//! Chip16 virtual machine: RAM, registers, devices, and the
//! fetch-execute loop. See `chip16_asm` for the companion assembler.

pub mod bits;
pub mod decode;
pub mod device;
pub mod error;
pub mod ops;
pub mod vm;

pub use device::{ConsoleIO, DevicePort, DeviceSet, MemoryDevice, RomDevice};
pub use error::VmError;
pub use vm::{Registers, Vm, Word, RAM_SIZE};
