use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// `ptr` addressed a cell outside `memory`
    #[error("runtime error: pointer {ptr} is outside memory of {memory_size} cells (at ip {ip})")]
    PointerOutOfBounds {
        ptr: i64,
        memory_size: usize,
        ip: usize,
    },

    /// The declared memory could not be allocated
    #[error("runtime error: cannot allocate memory of {size} cells")]
    MemoryAllocation { size: usize },

    #[error("runtime error: jump at ip {ip} targets {target}, outside the program")]
    BadJump { ip: usize, target: i64 },

    #[error("runtime error: execution step limit exceeded ({0})")]
    StepLimit(usize),

    #[error("runtime error: i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
