/// One of the eight Brainfuck operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Cell arithmetic
    IncCell,
    DecCell,

    // Pointer movement
    MoveLeft,
    MoveRight,

    // I/O
    Write,
    Read,

    // Control flow
    LoopStart,
    LoopEnd,
}

impl Command {
    /// Map a source character to its command; anything else is a comment.
    pub fn from_char(ch: char) -> Option<Command> {
        use Command::*;
        Some(match ch {
            '+' => IncCell,
            '-' => DecCell,
            '<' => MoveLeft,
            '>' => MoveRight,
            '.' => Write,
            ',' => Read,
            '[' => LoopStart,
            ']' => LoopEnd,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        use Command::*;
        match self {
            IncCell => '+',
            DecCell => '-',
            MoveLeft => '<',
            MoveRight => '>',
            Write => '.',
            Read => ',',
            LoopStart => '[',
            LoopEnd => ']',
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_symbol_maps_back_to_itself() {
        for ch in "+-<>.,[]".chars() {
            let cmd = Command::from_char(ch).expect("command symbol");
            assert_eq!(cmd.symbol(), ch);
        }
    }

    #[test]
    fn test_non_commands_are_comments() {
        for ch in "abc xyz\n\t#!0123456789{}()".chars() {
            assert_eq!(Command::from_char(ch), None, "{:?}", ch);
        }
    }

    #[test]
    fn test_display_uses_symbol() {
        assert_eq!(Command::LoopStart.to_string(), "[");
        assert_eq!(Command::Read.to_string(), ",");
    }
}
