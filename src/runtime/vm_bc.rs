use crate::bytecode::{Op, ProgramBc};
use crate::runtime::runtime_error::RuntimeError;
use std::io::{self, Read, Write};

/// Value a read stores before masking when the input is exhausted.
const EOF_SENTINEL: i32 = -1;

#[derive(Debug, Clone, Default)]
pub struct VmBcConfig {
    pub max_steps: Option<usize>,
}

/// Host for compiled programs: owns `memory` and `ptr` and binds the
/// `Write`/`Read` primitives to the streams passed to [`VmBc::run_compiled`].
pub struct VmBc {
    memory: Vec<u8>,
    ptr: i64,
    bounds_check: bool,
    // Safety limits
    config: VmBcConfig,
    steps: usize,
}

impl VmBc {
    pub fn new() -> Self {
        Self::with_config(VmBcConfig::default())
    }

    pub fn with_config(config: VmBcConfig) -> Self {
        Self {
            memory: Vec::new(),
            ptr: 0,
            bounds_check: false,
            config,
            steps: 0,
        }
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn ptr(&self) -> i64 {
        self.ptr
    }

    pub fn reset_execution_state(&mut self, prog: &ProgramBc) -> Result<(), RuntimeError> {
        let size = prog.decls.memory_size;

        // The size comes from a decoded artifact, so allocation may fail
        let mut memory = Vec::new();
        memory
            .try_reserve_exact(size)
            .map_err(|_| RuntimeError::MemoryAllocation { size })?;
        memory.resize(size, 0);

        self.memory = memory;
        self.ptr = prog.decls.ptr_init as i64;
        self.bounds_check = prog.decls.bounds_check;
        self.steps = 0;
        Ok(())
    }

    pub fn run_compiled<R: Read, W: Write>(
        &mut self,
        prog: &ProgramBc,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError> {
        self.reset_execution_state(prog)?;

        tracing::debug!(
            ops = prog.code.ops.len(),
            memory_size = prog.decls.memory_size,
            "running bytecode"
        );

        let result = self.exec_ops(&prog.code.ops, input, output);
        // Whatever was written before a trap still reaches the stream
        output.flush()?;
        result
    }

    // Execution

    fn check_limits(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;

        if let Some(max) = self.config.max_steps {
            if self.steps > max {
                return Err(RuntimeError::StepLimit(max));
            }
        }

        Ok(())
    }

    fn exec_ops<R: Read, W: Write>(
        &mut self,
        ops: &[Op],
        input: &mut R,
        output: &mut W,
    ) -> Result<(), RuntimeError> {
        let mut ip: usize = 0;

        while ip < ops.len() {
            self.check_limits()?;

            match ops[ip] {
                Op::AddCell(n) => {
                    let cell = self.cell_mut(ip)?;
                    *cell = cell.wrapping_add(n);
                }
                Op::SubCell(n) => {
                    let cell = self.cell_mut(ip)?;
                    *cell = cell.wrapping_sub(n);
                }

                Op::MoveRight(n) => self.move_ptr(n as i64, ip)?,
                Op::MoveLeft(n) => self.move_ptr(-(n as i64), ip)?,

                Op::Write => {
                    let byte = *self.cell_mut(ip)?;
                    output.write_all(&[byte])?;
                }
                Op::Read => {
                    // Pending output (a prompt) must be visible before blocking on input
                    output.flush()?;
                    let value = read_byte(input)?;
                    *self.cell_mut(ip)? = (value & 0xFF) as u8;
                }

                // =============================================================
                // Jump instructions
                // =============================================================
                Op::Jump(offset) => {
                    ip = jump_target(ip, offset, ops.len())?;
                    continue;
                }
                Op::JumpIfZero(offset) => {
                    if *self.cell_mut(ip)? == 0 {
                        ip = jump_target(ip, offset, ops.len())?;
                        continue;
                    }
                }

                Op::Return => return Ok(()),
            }

            ip += 1;
        }

        Ok(())
    }

    fn move_ptr(&mut self, delta: i64, ip: usize) -> Result<(), RuntimeError> {
        self.ptr = self.ptr.wrapping_add(delta);

        if self.bounds_check && self.index().is_none() {
            return Err(self.out_of_bounds(ip));
        }
        Ok(())
    }

    fn index(&self) -> Option<usize> {
        usize::try_from(self.ptr)
            .ok()
            .filter(|i| *i < self.memory.len())
    }

    fn cell_mut(&mut self, ip: usize) -> Result<&mut u8, RuntimeError> {
        match self.index() {
            Some(i) => Ok(&mut self.memory[i]),
            None => Err(self.out_of_bounds(ip)),
        }
    }

    fn out_of_bounds(&self, ip: usize) -> RuntimeError {
        RuntimeError::PointerOutOfBounds {
            ptr: self.ptr,
            memory_size: self.memory.len(),
            ip,
        }
    }
}

impl Default for VmBc {
    fn default() -> Self {
        Self::new()
    }
}

/// One byte of input, or `EOF_SENTINEL` once the stream is exhausted.
fn read_byte<R: Read>(input: &mut R) -> Result<i32, RuntimeError> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(EOF_SENTINEL),
            Ok(_) => return Ok(buf[0] as i32),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
}

fn jump_target(ip: usize, offset: i32, len: usize) -> Result<usize, RuntimeError> {
    let target = ip as i64 + offset as i64;
    // Jumping to `len` means falling off the end, which is a clean exit
    if target < 0 || target > len as i64 {
        return Err(RuntimeError::BadJump { ip, target });
    }
    Ok(target as usize)
}
