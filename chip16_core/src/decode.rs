//! Instruction dispatch (spec §4.1, §9): select a handler in
//! [`crate::ops`] by the instruction's top nibble. Families `8` and
//! `E` carry their own sub-dispatch on the low nibble/byte inside
//! their handlers rather than a second table here.

use crate::bits::top_nibble;
use crate::error::VmError;
use crate::ops;
use crate::vm::Vm;

pub fn dispatch(vm: &mut Vm, instruction: u16) -> Result<(), VmError> {
    match top_nibble(instruction) {
        0x0 => ops::op_0(vm, instruction),
        0x1 => ops::op_1(vm, instruction),
        0x2 => ops::op_2(vm, instruction),
        0x3 => ops::op_3(vm, instruction),
        0x4 => ops::op_4(vm, instruction),
        0x5 => ops::op_5(vm, instruction),
        0x6 => ops::op_6(vm, instruction),
        0x7 => ops::op_7(vm, instruction),
        0x8 => ops::op_8(vm, instruction),
        0x9 => ops::op_9(vm, instruction),
        0xA => ops::op_a(vm, instruction),
        0xB => ops::op_b(vm, instruction),
        0xC => ops::op_c(vm, instruction),
        0xD => ops::op_d(vm, instruction),
        0xE => ops::op_e(vm, instruction),
        0xF => ops::op_f(vm, instruction),
        _ => unreachable!("a nibble is always in 0..=0xF"),
    }
}
