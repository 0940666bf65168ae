use std::collections::HashSet;
use std::fmt::{self, Display};

/// Category of the sentinel lexeme returned past the end of a stream.
pub const END_OF_STREAM: &str = "None";

/// A classified piece of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: String,
    pub text: String,
    /// 1-based line of the first character, 0 for the sentinel.
    pub line: usize,
    /// 1-based column of the first character, 0 for the sentinel.
    pub column: usize,
}

impl Lexeme {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Lexeme {
            kind: kind.into(),
            text: text.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// The end of stream sentinel.
    pub fn none() -> Self {
        Lexeme::new(END_OF_STREAM, END_OF_STREAM)
    }

    pub fn is_none(&self) -> bool {
        self.kind == END_OF_STREAM
    }
}

impl Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}<{}>", self.kind, self.text.escape_debug())
    }
}

/// A saved cursor position. Only obtainable from `LexemeStream::checkpoint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// An ordered sequence of lexemes with a cursor that can be rewound.
///
/// # Examples
///
/// ```
/// use parsegen::{Lexeme, LexemeStream};
///
/// let mut stream = LexemeStream::new(vec![
///     Lexeme::new("Word", "hello"),
///     Lexeme::new("Space", " "),
///     Lexeme::new("Word", "world"),
/// ])
/// .skipping(&["Space"]);
///
/// let start = stream.checkpoint();
/// assert_eq!(stream.next_significant().text, "hello");
/// assert_eq!(stream.next_significant().text, "world");
/// assert!(stream.next_significant().is_none());
///
/// stream.rewind(start);
/// assert_eq!(stream.peek_significant().text, "hello");
/// ```
#[derive(Debug, Clone)]
pub struct LexemeStream {
    lexemes: Vec<Lexeme>,
    insignificant: HashSet<String>,
    cursor: usize,
    none: Lexeme,
}

impl LexemeStream {
    pub fn new(lexemes: Vec<Lexeme>) -> Self {
        LexemeStream {
            lexemes,
            insignificant: HashSet::new(),
            cursor: 0,
            none: Lexeme::none(),
        }
    }

    /// Mark lexeme categories as insignificant whitespace.
    pub fn skipping(mut self, kinds: &[&str]) -> Self {
        self.insignificant
            .extend(kinds.iter().map(|kind| (*kind).to_owned()));
        self
    }

    pub fn is_insignificant(&self, lexeme: &Lexeme) -> bool {
        self.insignificant.contains(&lexeme.kind)
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }

    /// Whether the cursor has moved past the last lexeme.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.lexemes.len()
    }

    /// The lexeme under the cursor, without advancing.
    pub fn current(&self) -> &Lexeme {
        self.lexemes.get(self.cursor).unwrap_or(&self.none)
    }

    /// Return the lexeme under the cursor and advance. Past the end this keeps
    /// returning the sentinel and the cursor stays put.
    pub fn next(&mut self) -> Lexeme {
        match self.lexemes.get(self.cursor) {
            Some(lexeme) => {
                self.cursor += 1;
                lexeme.clone()
            }
            None => self.none.clone(),
        }
    }

    /// Like `next`, skipping insignificant lexemes.
    pub fn next_significant(&mut self) -> Lexeme {
        loop {
            let lexeme = self.next();
            if !self.is_insignificant(&lexeme) {
                return lexeme;
            }
        }
    }

    /// The lexeme `next_significant` would return, without advancing.
    pub fn peek_significant(&self) -> &Lexeme {
        self.lexemes[self.cursor.min(self.lexemes.len())..]
            .iter()
            .find(|lexeme| !self.is_insignificant(lexeme))
            .unwrap_or(&self.none)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.cursor)
    }

    /// Move the cursor back to a saved position, undoing everything consumed
    /// since.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.cursor = checkpoint.0;
    }
}
