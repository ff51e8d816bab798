use crate::{
    bytecode::{
        Op, ProgramBc,
        compile_error::CompileError,
        emitter::{Emitter, Label},
        ir::{DEFAULT_MEMORY_SIZE, Declarations},
    },
    frontend::{
        lexer::{CompressedInstruction, RunPolicy, Span, compress_with},
        token::Command,
    },
};

/// Settings the generator consults while emitting code. Passed explicitly
/// to every compile; there is no process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenContext {
    pub memory_size: usize,
    pub bounds_check: bool,
}

impl Default for CodegenContext {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            bounds_check: false,
        }
    }
}

/// Everything needed to go from source text to a [`ProgramBc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    pub memory_size: usize,
    pub policy: RunPolicy,
    pub bounds_check: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            policy: RunPolicy::default(),
            bounds_check: false,
        }
    }
}

impl CompileOptions {
    pub fn context(&self) -> CodegenContext {
        CodegenContext {
            memory_size: self.memory_size,
            bounds_check: self.bounds_check,
        }
    }
}

/// Jump targets of one open `[`.
#[derive(Debug, Clone, Copy)]
struct LoopFrame {
    /// Already marked at the loop head
    start: Label,
    /// Marked when the matching `]` is compiled
    end: Label,
    /// Where the opening bracket run starts, for diagnostics
    span: Span,
}

pub struct Compiler {
    ctx: CodegenContext,

    /// Output instruction stream
    emitter: Emitter,

    /// Open loops, innermost last
    loops: Vec<LoopFrame>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_context(CodegenContext::default())
    }

    pub fn with_context(ctx: CodegenContext) -> Self {
        Self {
            ctx,
            emitter: Emitter::new(),
            loops: Vec::new(),
        }
    }

    /// Walk the compressed commands once and produce the resolved program.
    pub fn compile_program(
        mut self,
        instructions: &[CompressedInstruction],
    ) -> Result<ProgramBc, CompileError> {
        if self.ctx.memory_size == 0 {
            return Err(CompileError::ZeroMemorySize);
        }

        let decls = Declarations {
            memory_size: self.ctx.memory_size,
            ptr_init: 0,
            bounds_check: self.ctx.bounds_check,
        };

        for ci in instructions {
            self.compile_instruction(ci)?;
        }

        if let Some(open) = self.loops.last() {
            return Err(CompileError::UnmatchedOpenBracket { span: open.span });
        }

        self.emitter.emit(Op::Return);

        let mut program = ProgramBc::new(decls);
        program.code.ops = self.emitter.finish()?;

        tracing::debug!(
            runs = instructions.len(),
            ops = program.code.ops.len(),
            memory_size = decls.memory_size,
            "generated bytecode"
        );

        Ok(program)
    }

    fn compile_instruction(&mut self, ci: &CompressedInstruction) -> Result<(), CompileError> {
        let n = ci.count;

        match ci.command {
            // Runs fold into a single constant
            Command::IncCell => self.emitter.emit(Op::AddCell(fold_cell(n))),
            Command::DecCell => self.emitter.emit(Op::SubCell(fold_cell(n))),
            Command::MoveRight => self.emitter.emit(Op::MoveRight(n)),
            Command::MoveLeft => self.emitter.emit(Op::MoveLeft(n)),

            // Every output and input is its own event
            Command::Write => {
                for _ in 0..n {
                    self.emitter.emit(Op::Write);
                }
            }
            Command::Read => {
                for _ in 0..n {
                    self.emitter.emit(Op::Read);
                }
            }

            Command::LoopStart => {
                for _ in 0..n {
                    self.emit_loop_head(ci.span)?;
                }
            }
            Command::LoopEnd => {
                for _ in 0..n {
                    self.emit_loop_end(ci.span)?;
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Loop resolution
    // =========================================================================

    /// head: JUMP_ZERO → end
    fn emit_loop_head(&mut self, span: Span) -> Result<(), CompileError> {
        let start = self.emitter.define_label();
        let end = self.emitter.define_label();

        self.emitter.mark_label(start)?;
        self.emitter.emit_jump(Op::JumpIfZero, end);

        self.loops.push(LoopFrame { start, end, span });
        Ok(())
    }

    /// JUMP → head, then mark end right after it
    fn emit_loop_end(&mut self, span: Span) -> Result<(), CompileError> {
        let frame = self
            .loops
            .pop()
            .ok_or(CompileError::UnmatchedCloseBracket { span })?;

        self.emitter.emit_jump(Op::Jump, frame.start);
        self.emitter.mark_label(frame.end)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// A run of `n` increments is one add of `n mod 256`.
fn fold_cell(n: usize) -> u8 {
    (n % 256) as u8
}

/// Generate a program from already compressed commands.
pub fn generate(
    instructions: &[CompressedInstruction],
    ctx: CodegenContext,
) -> Result<ProgramBc, CompileError> {
    Compiler::with_context(ctx).compile_program(instructions)
}

/// Scan, compress and generate in one step.
pub fn compile_source(source: &str, options: CompileOptions) -> Result<ProgramBc, CompileError> {
    let instructions = compress_with(source, options.policy);
    generate(&instructions, options.context())
}
