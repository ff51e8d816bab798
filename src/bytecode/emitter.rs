//! Instruction emitter with symbolic jump targets.
//!
//! Jumps are emitted against a [`Label`] that may not be placed yet; the
//! emitter records a fixup and rewrites the placeholder offset in
//! [`Emitter::finish`], once every label has a position.

use crate::bytecode::{Op, compile_error::CompileError};

/// A jump target handed out by [`Emitter::define_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label(usize);

#[derive(Debug, Default)]
pub struct Emitter {
    ops: Vec<Op>,
    /// Position of each label, `None` until marked
    labels: Vec<Option<usize>>,
    /// (ip of jump op, label it targets)
    fixups: Vec<(usize, Label)>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next emitted op will get.
    pub fn position(&self) -> usize {
        self.ops.len()
    }

    pub fn emit(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn define_label(&mut self) -> Label {
        self.labels.push(None);
        Label(self.labels.len() - 1)
    }

    /// Bind `label` to the current emission point.
    pub fn mark_label(&mut self, label: Label) -> Result<(), CompileError> {
        let pos = self.position();
        let slot = self
            .labels
            .get_mut(label.0)
            .ok_or_else(|| CompileError::internal(format!("unknown label {}", label.0)))?;

        if slot.is_some() {
            return Err(CompileError::internal(format!(
                "label {} marked twice",
                label.0
            )));
        }
        *slot = Some(pos);
        Ok(())
    }

    /// Emit a jump to `label`; the offset is filled in by `finish`.
    pub fn emit_jump(&mut self, make: fn(i32) -> Op, label: Label) {
        self.fixups.push((self.position(), label));
        self.emit(make(0));
    }

    /// Resolve every pending jump and return the finished stream.
    pub fn finish(mut self) -> Result<Vec<Op>, CompileError> {
        for (ip, label) in std::mem::take(&mut self.fixups) {
            let target = self
                .labels
                .get(label.0)
                .copied()
                .flatten()
                .ok_or_else(|| {
                    CompileError::internal(format!("label {} was never marked", label.0))
                })?;

            let offset = i32::try_from(target as i64 - ip as i64).map_err(|_| {
                CompileError::internal(format!("jump at {} to {} is out of range", ip, target))
            })?;

            self.ops[ip] = match self.ops[ip] {
                Op::Jump(_) => Op::Jump(offset),
                Op::JumpIfZero(_) => Op::JumpIfZero(offset),
                other => {
                    return Err(CompileError::internal(format!(
                        "fixup at {} points at non-jump {:?}",
                        ip, other
                    )));
                }
            };
        }

        Ok(self.ops)
    }
}
