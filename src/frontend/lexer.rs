use crate::frontend::token::Command;

/// 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A run of identical commands folded into one entry.
///
/// `count` is always at least 1. `span` points at the first character of
/// the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedInstruction {
    pub command: Command,
    pub count: usize,
    pub span: Span,
}

/// How runs are delimited when comment characters sit between identical
/// commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPolicy {
    /// Only textually adjacent characters form a run: `++x++` is two runs
    /// of two.
    #[default]
    Adjacent,
    /// Runs are merged over the comment-free command stream: `++x++` is a
    /// single run of four.
    Filtered,
}

/// Compress `source` with the default [`RunPolicy::Adjacent`].
pub fn compress(source: &str) -> Vec<CompressedInstruction> {
    Lexer::new(source).compress(RunPolicy::Adjacent)
}

pub fn compress_with(source: &str, policy: RunPolicy) -> Vec<CompressedInstruction> {
    Lexer::new(source).compress(policy)
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.current();
        if ch == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        ch
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            col: self.col,
        }
    }

    /// Scan the whole source into run-length compressed commands.
    ///
    /// Never fails: characters outside the command alphabet are comments.
    pub fn compress(&mut self, policy: RunPolicy) -> Vec<CompressedInstruction> {
        let mut out: Vec<CompressedInstruction> = Vec::new();

        while let Some(ch) = self.current() {
            let Some(command) = Command::from_char(ch) else {
                self.advance();
                continue;
            };

            let span = self.span();
            let count = self.read_run(ch);

            if policy == RunPolicy::Filtered {
                if let Some(last) = out.last_mut() {
                    if last.command == command {
                        last.count += count;
                        continue;
                    }
                }
            }

            out.push(CompressedInstruction {
                command,
                count,
                span,
            });
        }

        tracing::trace!(runs = out.len(), ?policy, "compressed source");
        out
    }

    /// Consume the maximal run of `ch` starting at the current position.
    fn read_run(&mut self, ch: char) -> usize {
        let mut count = 0;
        while self.current() == Some(ch) {
            self.advance();
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Command::*;

    fn runs(source: &str) -> Vec<(Command, usize)> {
        compress(source)
            .into_iter()
            .map(|ci| (ci.command, ci.count))
            .collect()
    }

    fn runs_filtered(source: &str) -> Vec<(Command, usize)> {
        compress_with(source, RunPolicy::Filtered)
            .into_iter()
            .map(|ci| (ci.command, ci.count))
            .collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(runs("").is_empty());
    }

    #[test]
    fn test_comments_only() {
        assert!(runs("hello world\n# no commands here").is_empty());
    }

    #[test]
    fn test_single_commands() {
        assert_eq!(
            runs("+-<>.,[]"),
            vec![
                (IncCell, 1),
                (DecCell, 1),
                (MoveLeft, 1),
                (MoveRight, 1),
                (Write, 1),
                (Read, 1),
                (LoopStart, 1),
                (LoopEnd, 1),
            ]
        );
    }

    #[test]
    fn test_runs_are_folded() {
        assert_eq!(
            runs("+++>>--<<<...,,[[]]"),
            vec![
                (IncCell, 3),
                (MoveRight, 2),
                (DecCell, 2),
                (MoveLeft, 3),
                (Write, 3),
                (Read, 2),
                (LoopStart, 2),
                (LoopEnd, 2),
            ]
        );
    }

    #[test]
    fn test_no_two_adjacent_entries_share_a_command() {
        let out = runs("++++----++>><<>>..,.,[[]][]");
        for pair in out.windows(2) {
            assert_ne!(pair[0].0, pair[1].0, "{:?}", out);
        }
    }

    #[test]
    fn test_trailing_single_command() {
        assert_eq!(runs("++-"), vec![(IncCell, 2), (DecCell, 1)]);
    }

    #[test]
    fn test_comment_breaks_run_when_adjacent() {
        assert_eq!(runs("++x++"), vec![(IncCell, 2), (IncCell, 2)]);
    }

    #[test]
    fn test_comment_does_not_break_run_when_filtered() {
        assert_eq!(runs_filtered("++x++"), vec![(IncCell, 4)]);
        assert_eq!(
            runs_filtered("+ + -\n- >"),
            vec![(IncCell, 2), (DecCell, 2), (MoveRight, 1)]
        );
    }

    #[test]
    fn test_filtered_still_separates_different_commands() {
        assert_eq!(
            runs_filtered("+x-x+"),
            vec![(IncCell, 1), (DecCell, 1), (IncCell, 1)]
        );
    }

    #[test]
    fn test_spans_point_at_run_start() {
        let out = compress("ab++\n  [-]");
        let spans: Vec<_> = out.iter().map(|ci| (ci.span.line, ci.span.col)).collect();
        assert_eq!(spans, vec![(1, 3), (2, 3), (2, 4), (2, 5)]);
    }

    #[test]
    fn test_non_ascii_is_a_comment() {
        assert_eq!(runs("+é+ü"), vec![(IncCell, 1), (IncCell, 1)]);
    }
}
