use crate::bytecode::Op;
use serde::{Deserialize, Serialize};

/// Default size of the generated program's memory buffer, in cells.
pub const DEFAULT_MEMORY_SIZE: usize = 30_000;

/// A compiled bytecode program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramBc {
    /// Program state the host has to allocate before running `code`.
    pub decls: Declarations,

    /// The fully resolved instruction stream; ends with `Op::Return`.
    pub code: CodeObject,
}

impl ProgramBc {
    pub fn new(decls: Declarations) -> Self {
        Self {
            decls,
            code: CodeObject::new(),
        }
    }
}

/// Declarations of the two program-visible values: `memory` and `ptr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declarations {
    /// `memory[0..memory_size)`, zero-filled.
    pub memory_size: usize,
    /// Initial value of `ptr`.
    pub ptr_init: usize,
    /// Trap as soon as `ptr` leaves the memory instead of on the next access.
    pub bounds_check: bool,
}

impl Default for Declarations {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            ptr_init: 0,
            bounds_check: false,
        }
    }
}

/// A single compiled instruction stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeObject {
    pub ops: Vec<Op>,
}

impl CodeObject {
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }
}

impl Default for CodeObject {
    fn default() -> Self {
        Self::new()
    }
}
