pub mod compile;
pub mod compile_error;
pub mod disasm;
pub mod emitter;
pub mod ir;
pub mod op;

pub use compile::{CodegenContext, CompileOptions, Compiler, compile_source, generate};
pub use compile_error::CompileError;
pub use ir::{CodeObject, Declarations, ProgramBc};
pub use op::Op;
