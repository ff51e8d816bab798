use crate::frontend::lexer::CompressedInstruction;
use crate::frontend::token::Command;

pub struct TokenDumper {
    pub color: bool,
    pub show_debug_repr: bool, // if false, prints the source run instead of the Debug form
}

impl Default for TokenDumper {
    fn default() -> Self {
        Self {
            color: true,
            show_debug_repr: true,
        }
    }
}

impl TokenDumper {
    // ANSI colors
    const RESET: &'static str = "\x1b[0m";
    const GRN: &'static str = "\x1b[32m";
    const YEL: &'static str = "\x1b[33m";
    const CYN: &'static str = "\x1b[36m";
    const MAG: &'static str = "\x1b[35m";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn no_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn pretty(mut self) -> Self {
        self.show_debug_repr = false;
        self
    }

    pub fn dump(&self, runs: &[CompressedInstruction]) {
        for ci in runs {
            println!("{}", self.line(ci));
        }
    }

    pub fn line(&self, ci: &CompressedInstruction) -> String {
        let kind = Self::kind(ci.command);
        let colr = if self.color { Self::color(ci.command) } else { "" };
        let reset = if self.color { Self::RESET } else { "" };

        let value = if self.show_debug_repr {
            format!("{:?} x{}", ci.command, ci.count)
        } else {
            // Long runs are abbreviated so a 10k-char run stays one short line
            let sym = ci.command.symbol();
            if ci.count <= 16 {
                sym.to_string().repeat(ci.count)
            } else {
                format!("{} ({} times)", sym, ci.count)
            }
        };

        format!(
            "[{:02}:{:02}] {}{:<8} {}{}",
            ci.span.line, ci.span.col, colr, kind, value, reset
        )
    }

    fn kind(c: Command) -> &'static str {
        use Command::*;
        match c {
            IncCell | DecCell => "CELL",
            MoveLeft | MoveRight => "PTR",
            Write | Read => "IO",
            LoopStart | LoopEnd => "BRACKET",
        }
    }

    fn color(c: Command) -> &'static str {
        use Command::*;
        match c {
            IncCell | DecCell => Self::CYN,
            MoveLeft | MoveRight => Self::YEL,
            Write | Read => Self::GRN,
            LoopStart | LoopEnd => Self::MAG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::compress;

    #[test]
    fn test_debug_line_without_color() {
        let runs = compress("+++");
        let line = TokenDumper::new().no_color().line(&runs[0]);
        assert_eq!(line, "[01:01] CELL     IncCell x3");
    }

    #[test]
    fn test_pretty_line_repeats_short_runs() {
        let runs = compress("\n  [[");
        let line = TokenDumper::new().no_color().pretty().line(&runs[0]);
        assert_eq!(line, "[02:03] BRACKET  [[");
    }

    #[test]
    fn test_pretty_line_abbreviates_long_runs() {
        let source = ">".repeat(40);
        let runs = compress(&source);
        let line = TokenDumper::new().no_color().pretty().line(&runs[0]);
        assert!(line.ends_with("> (40 times)"), "{}", line);
    }

    #[test]
    fn test_color_wraps_value() {
        let runs = compress(".");
        let line = TokenDumper::new().line(&runs[0]);
        assert!(line.contains(TokenDumper::GRN));
        assert!(line.ends_with(TokenDumper::RESET));
    }
}
