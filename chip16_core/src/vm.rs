//! VM state and the fetch-execute loop (spec §3, §4.1).

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::bits;
use crate::decode;
use crate::device::DeviceSet;
use crate::error::VmError;

/// Register width, fixed at compile time. Chip64 (spec §1) is "a
/// trivial re-parameterisation" of the same machine with `Word = u64`;
/// this crate implements the default, 16-bit, parameterisation named
/// Chip16.
pub type Word = u16;

pub const RAM_SIZE: usize = 4096;
pub const REGISTER_COUNT: usize = 16;
pub const CARRY_REGISTER: usize = 0xF;
/// Recommended stack depth from spec §7; the source enforces none.
pub const DEFAULT_STACK_LIMIT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [Word; REGISTER_COUNT],
    pub i: Word,
    pub pc: Word,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: 0,
        }
    }
}

/// One Chip16 machine: RAM, registers, call stack, and the attached
/// device table. Exactly one per instance (spec §3).
pub struct Vm {
    pub ram: [u8; RAM_SIZE],
    pub regs: Registers,
    pub stack: Vec<Word>,
    pub devices: DeviceSet,
    pub alert: bool,
    pub halted: bool,
    stack_limit: usize,
    initial_image: Vec<u8>,
    rng: Box<dyn RngCore>,
}

impl std::fmt::Debug for Vm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vm")
            .field("regs", &self.regs)
            .field("stack", &self.stack)
            .field("alert", &self.alert)
            .field("halted", &self.halted)
            .field("stack_limit", &self.stack_limit)
            .finish_non_exhaustive()
    }
}

impl Vm {
    /// Copies `code` into RAM starting at address 0; fails with
    /// `ImageTooLarge` if it does not fit (spec §4.1).
    pub fn new(code: &[u8], devices: DeviceSet) -> Result<Self, VmError> {
        Self::with_rng(code, devices, Box::new(StdRng::from_os_rng()))
    }

    /// As [`Vm::new`], but with an injectable RNG so `BAR` (opcode
    /// `CXNN`) is reproducible in tests, per spec §5's "SHOULD allow
    /// seeding" note.
    pub fn with_rng(
        code: &[u8],
        devices: DeviceSet,
        rng: Box<dyn RngCore>,
    ) -> Result<Self, VmError> {
        if code.len() > RAM_SIZE {
            return Err(VmError::ImageTooLarge { len: code.len() });
        }
        let mut ram = [0u8; RAM_SIZE];
        ram[..code.len()].copy_from_slice(code);
        Ok(Self {
            ram,
            regs: Registers::default(),
            stack: Vec::new(),
            devices,
            alert: false,
            halted: false,
            stack_limit: DEFAULT_STACK_LIMIT,
            initial_image: code.to_vec(),
            rng,
        })
    }

    pub fn with_stack_limit(mut self, limit: usize) -> Self {
        self.stack_limit = limit;
        self
    }

    pub fn stack_limit(&self) -> usize {
        self.stack_limit
    }

    /// Restores the VM to its just-constructed state: RAM reloaded
    /// from the original code image, registers/stack/flags cleared.
    /// Devices and the RNG are left untouched — they may own external
    /// resources outside the VM's lifecycle (spec §5).
    pub fn reset(&mut self) {
        self.ram = [0u8; RAM_SIZE];
        self.ram[..self.initial_image.len()].copy_from_slice(&self.initial_image);
        self.regs = Registers::default();
        self.stack.clear();
        self.alert = false;
        self.halted = false;
    }

    /// Runs until `cycles` reaches zero or a `HLT` is decoded. `None`
    /// runs until `HLT` (spec §4.1).
    pub fn execute(&mut self, cycles: Option<u64>) -> Result<(), VmError> {
        let mut remaining = cycles;
        loop {
            if remaining == Some(0) {
                break;
            }
            self.step()?;
            if let Some(n) = remaining.as_mut() {
                *n -= 1;
            }
            if self.halted {
                break;
            }
        }
        Ok(())
    }

    /// Performs one fetch-execute step (spec §4.1). A no-op once the
    /// VM has halted.
    pub fn step(&mut self) -> Result<(), VmError> {
        if self.halted {
            return Ok(());
        }
        let pc = self.regs.pc;
        let hi = self.read_u8(pc as u32)?;
        let lo = self.read_u8(pc.wrapping_add(1) as u32)?;
        let instruction = bits::concat_be(hi, lo);
        decode::dispatch(self, instruction)
    }

    pub fn random_u8(&mut self) -> u8 {
        (self.rng.next_u32() & 0xFF) as u8
    }

    pub fn read_u8(&self, addr: u32) -> Result<u8, VmError> {
        self.ram
            .get(addr as usize)
            .copied()
            .ok_or(VmError::AddressOutOfRange { addr, len: 1 })
    }

    pub fn write_u8(&mut self, addr: u32, value: u8) -> Result<(), VmError> {
        let slot = self
            .ram
            .get_mut(addr as usize)
            .ok_or(VmError::AddressOutOfRange { addr, len: 1 })?;
        *slot = value;
        Ok(())
    }

    pub fn read_bytes(&self, addr: u32, len: u32) -> Result<&[u8], VmError> {
        let start = addr as usize;
        let end = start
            .checked_add(len as usize)
            .filter(|&end| end <= RAM_SIZE)
            .ok_or(VmError::AddressOutOfRange { addr, len })?;
        Ok(&self.ram[start..end])
    }

    pub fn write_bytes(&mut self, addr: u32, data: &[u8]) -> Result<(), VmError> {
        let start = addr as usize;
        let end = start
            .checked_add(data.len())
            .filter(|&end| end <= RAM_SIZE)
            .ok_or(VmError::AddressOutOfRange {
                addr,
                len: data.len() as u32,
            })?;
        self.ram[start..end].copy_from_slice(data);
        Ok(())
    }

    pub fn push_call(&mut self, return_addr: Word) -> Result<(), VmError> {
        if self.stack.len() >= self.stack_limit {
            return Err(VmError::StackOverflow {
                depth: self.stack_limit,
            });
        }
        self.stack.push(return_addr);
        Ok(())
    }

    pub fn pop_call(&mut self) -> Result<Word, VmError> {
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }
}
