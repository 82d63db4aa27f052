use thiserror::Error;

/// Runtime error taxonomy for the VM (spec §7). `UnknownOpcode` is
/// deliberately absent: it is non-fatal and surfaces as [`crate::vm::Vm::alert`]
/// instead of an `Err`.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum VmError {
    #[error("ROM image of {len} bytes exceeds the 4096-byte address space")]
    ImageTooLarge { len: usize },

    #[error("memory access at {addr:#06x} (len {len}) is out of range")]
    AddressOutOfRange { addr: u32, len: u32 },

    #[error("RET executed with an empty call stack")]
    StackUnderflow,

    #[error("CALL exceeded the configured stack depth of {depth}")]
    StackOverflow { depth: usize },

    #[error("device slot {slot:#x} is empty")]
    DeviceAbsent { slot: u8 },

    #[error("device slot {slot:#x} rejected a write: read-only")]
    DeviceReadOnly { slot: u8 },
}
