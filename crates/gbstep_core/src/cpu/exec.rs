//! Instruction handlers, grouped by instruction family.
//!
//! Each handler matches one of the `Operation` shapes in `table.rs` and is
//! referenced from the opcode table by path. Families sharing a handler
//! decode their register, pair or condition fields from the opcode bits.

mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;
