use crate::bytecode::{Op, ProgramBc};
use std::fmt::Write;

/// Print disassembly of a bytecode program
pub fn print_bc(bc: &ProgramBc) {
    print!("{}", format_bc(bc));
}

pub fn format_bc(bc: &ProgramBc) -> String {
    let mut out = String::new();

    out.push_str("=== BYTECODE PROGRAM ===\n\n");
    let _ = writeln!(
        out,
        "memory   {} cells{}",
        bc.decls.memory_size,
        if bc.decls.bounds_check {
            " (bounds checked)"
        } else {
            ""
        }
    );
    let _ = writeln!(out, "ptr      {}", bc.decls.ptr_init);
    out.push('\n');

    format_code_object(&mut out, "main", &bc.code.ops);
    out
}

fn format_code_object(out: &mut String, name: &str, ops: &[Op]) {
    out.push_str("════════════════════════════════════════\n");
    let _ = writeln!(out, " {}", name);
    let _ = writeln!(out, " {} instructions", ops.len());
    out.push_str("════════════════════════════════════════\n");
    disassemble_ops(out, ops);
    out.push('\n');
}

/// Disassemble a slice of ops, marking every jump target
pub fn disassemble_ops(out: &mut String, ops: &[Op]) {
    let jump_targets = collect_jump_targets(ops);

    for (ip, op) in ops.iter().enumerate() {
        if jump_targets.contains(&ip) {
            out.push_str("      ┌──────────────────────────────────\n");
        }

        let _ = write!(out, "{:04} ", ip);

        if jump_targets.contains(&ip) {
            out.push_str("► ");
        } else {
            out.push_str("  ");
        }

        out.push_str(&format_op(op, ip));
        out.push('\n');
    }
}

fn collect_jump_targets(ops: &[Op]) -> Vec<usize> {
    let mut targets = Vec::new();

    for (ip, op) in ops.iter().enumerate() {
        if let Some(offset) = op.jump_offset() {
            let target = (ip as i64 + offset as i64) as usize;
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }

    targets
}

fn format_op(op: &Op, ip: usize) -> String {
    match op {
        Op::AddCell(n) => format!("ADD_CELL    {}", n),
        Op::SubCell(n) => format!("SUB_CELL    {}", n),
        Op::MoveRight(n) => format!("MOVE_RIGHT  {}", n),
        Op::MoveLeft(n) => format!("MOVE_LEFT   {}", n),

        Op::Write => "WRITE       ; out(memory[ptr])".to_string(),
        Op::Read => "READ        ; memory[ptr] = in() & 0xFF".to_string(),

        Op::Jump(offset) => format_jump("JUMP", ip, *offset),
        Op::JumpIfZero(offset) => format_jump("JUMP_ZERO", ip, *offset),

        Op::Return => "RETURN".to_string(),
    }
}

fn format_jump(name: &str, ip: usize, offset: i32) -> String {
    let target = (ip as i64 + offset as i64) as usize;
    let direction = if offset < 0 { "↑" } else { "↓" };
    format!("{:<11} {:+} {} (→ {:04})", name, offset, direction, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::compile::{CompileOptions, compile_source};

    fn disasm(source: &str) -> String {
        format_bc(&compile_source(source, CompileOptions::default()).unwrap())
    }

    #[test]
    fn test_header_lists_declarations() {
        let text = disasm("+");
        assert!(text.contains("memory   30000 cells"));
        assert!(text.contains("ptr      0"));
        assert!(text.contains(" 2 instructions"));
    }

    #[test]
    fn test_jumps_show_direction_and_target() {
        let text = disasm("[-]");
        assert!(text.contains("JUMP_ZERO   +3 ↓ (→ 0003)"), "{}", text);
        assert!(text.contains("JUMP        -2 ↑ (→ 0000)"), "{}", text);
    }

    #[test]
    fn test_jump_targets_are_marked() {
        let text = disasm("[-]");
        assert!(text.contains("0000 ► JUMP_ZERO"));
        assert!(text.contains("0003 ► RETURN"));
        assert!(text.contains("0001   SUB_CELL    1"));
    }

    #[test]
    fn test_bounds_check_is_shown() {
        let options = CompileOptions {
            bounds_check: true,
            ..CompileOptions::default()
        };
        let text = format_bc(&compile_source("", options).unwrap());
        assert!(text.contains("(bounds checked)"));
    }
}
