use crate::cpu::{Control, Cpu};
use crate::memory::AddressSpace;

impl Cpu {
    pub(crate) fn exec_nop(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        Control::Next
    }

    pub(crate) fn exec_di(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.ime = false;
        Control::Next
    }

    /// Without an interrupt controller the one-instruction EI delay is not
    /// observable, so IME is set immediately.
    pub(crate) fn exec_ei(&mut self, _mem: &mut AddressSpace, _opcode: u8) -> Control {
        self.ime = true;
        Control::Next
    }
}
