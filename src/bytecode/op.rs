use serde::{Deserialize, Serialize};

// =============================================================================
// OP - Bytecode instructions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    // cell arithmetic, wrapping modulo 256
    /// `memory[ptr] = memory[ptr] + n`
    AddCell(u8),
    /// `memory[ptr] = memory[ptr] - n`
    SubCell(u8),

    // pointer movement
    MoveRight(usize),
    MoveLeft(usize),

    // I/O primitives, bound to real streams by the host
    /// Output `memory[ptr]` as one byte.
    Write,
    /// Read one byte (EOF reads as -1) and store it masked to 8 bits.
    Read,

    // ==========================================================================
    // Jump instructions for flat control flow
    // ==========================================================================
    /// Unconditional relative jump. Offset is added to current ip.
    Jump(i32),

    /// Jump if `memory[ptr] == 0`, otherwise continue to next instruction.
    JumpIfZero(i32),

    Return,
}

impl Op {
    pub fn jump_offset(&self) -> Option<i32> {
        match self {
            Op::Jump(offset) | Op::JumpIfZero(offset) => Some(*offset),
            _ => None,
        }
    }
}
