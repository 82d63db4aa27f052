//! Label table (spec §3, §4.5, §9's "two maps" design note).
//!
//! The source's `symtab` conflates resolved labels and pending patches
//! in one list per name, distinguished by an entry-kind tag. This
//! keeps them in two maps instead — `labels` for resolved addresses,
//! `pending` for patch addresses still waiting on a label — resolved
//! eagerly on definition and swept for leftovers at end of assembly.

use std::collections::HashMap;

use crate::error::AsmError;

#[derive(Default)]
pub struct SymbolTable {
    labels: HashMap<String, u16>,
    pending: HashMap<String, Vec<u16>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `name` to its address if already defined; otherwise
    /// records `patch_addr` (the byte address of the not-yet-emitted
    /// placeholder opcode) as pending and returns `None`.
    pub fn reference(&mut self, name: &str, patch_addr: u16) -> Option<u16> {
        if let Some(&addr) = self.labels.get(name) {
            return Some(addr);
        }
        self.pending.entry(name.to_string()).or_default().push(patch_addr);
        None
    }

    /// Defines `name` at `here`, returning the patch addresses of any
    /// pending references so the caller can back-patch `ops`.
    pub fn define(&mut self, name: &str, here: u16) -> Result<Vec<u16>, AsmError> {
        if self.labels.contains_key(name) {
            return Err(AsmError::DuplicateLabel {
                name: name.to_string(),
            });
        }
        if here > 0x0FFE {
            return Err(AsmError::AddressOverflow);
        }
        self.labels.insert(name.to_string(), here);
        Ok(self.pending.remove(name).unwrap_or_default())
    }

    /// Names with a pending reference that was never defined.
    pub fn unresolved(&self) -> Vec<String> {
        let mut names: Vec<_> = self.pending.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn resolved_address(&self, name: &str) -> Option<u16> {
        self.labels.get(name).copied()
    }
}
