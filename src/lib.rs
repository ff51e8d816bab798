//! Brainfuck compiler: source text to a runnable bytecode artifact.
//!
//! The pipeline is [`frontend::compress`] (run-length compressed commands),
//! [`bytecode::generate`] (resolved instruction stream) and
//! [`artifact::write_artifact`]; [`runtime::VmBc`] runs the result.

pub mod artifact;
pub mod bytecode;
pub mod error;
pub mod frontend;
pub mod runtime;

pub use error::{Error, Result};

use bytecode::{CompileOptions, ProgramBc, compile_source};
use runtime::{VmBc, VmBcConfig};
use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::SourceFileNotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Compile `input` and write the artifact to `output`.
///
/// A failing compile never touches `output`.
pub fn compile_file(input: &Path, output: &Path, options: CompileOptions) -> Result<ProgramBc> {
    let source = read_source(input)?;
    let program = compile_source(&source, options)?;
    artifact::write_artifact(&program, output)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        ops = program.code.ops.len(),
        "compiled"
    );
    Ok(program)
}

/// Load the artifact at `path` and run it against the given streams.
pub fn run_artifact<R: Read, W: Write>(
    path: &Path,
    config: VmBcConfig,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let program = artifact::read_artifact(path)?;
    VmBc::with_config(config).run_compiled(&program, input, output)?;
    Ok(())
}
