use std::fmt;

/// A pattern syntax error, with the byte offset of the offending construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxKind,
    pub pos: usize,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxKind, pos: usize) -> Self {
        Self { kind, pos }
    }
}

/// How a pattern was malformed; the classic POSIX `regcomp` error codes
/// (`REG_EBRACK`, `REG_EPAREN`, and so on) minus the locale-only ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    /// Unbalanced `[` / `]`.
    Bracket,
    /// Unbalanced `(` / `)`.
    Paren,
    /// Unbalanced `{` / `}`.
    Brace,
    /// Invalid repetition bound, e.g. `{3,1}` or a bound above 255.
    Bound,
    /// Reversed character range, e.g. `[z-a]`.
    Range,
    /// Back-references (`\1` .. `\9`) are not supported.
    Backref,
    /// Trailing backslash.
    Escape,
    /// Unknown `[[:name:]]` character class.
    ClassName,
    /// `[[.x.]]` / `[[=x=]]` collating syntax is not supported.
    Collate,
    /// Repetition operator with nothing to repeat, e.g. `*a`.
    Repeat,
    /// Anything else the grammar rejects.
    Parse,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            SyntaxKind::Bracket => "unbalanced bracket",
            SyntaxKind::Paren => "unbalanced parenthesis",
            SyntaxKind::Brace => "unbalanced brace",
            SyntaxKind::Bound => "invalid repetition bound",
            SyntaxKind::Range => "invalid character range",
            SyntaxKind::Backref => "invalid back-reference",
            SyntaxKind::Escape => "trailing backslash",
            SyntaxKind::ClassName => "unknown character class name",
            SyntaxKind::Collate => "unsupported collating element",
            SyntaxKind::Repeat => "repetition with nothing to repeat",
            SyntaxKind::Parse => "invalid pattern syntax",
        };
        write!(f, "{} at offset {}", what, self.pos)
    }
}

impl std::error::Error for SyntaxError {}

/// Any error this crate can surface. A failed match is never an error;
/// search functions return `None` and iterators simply finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Syntax(SyntaxError),
    /// The compiled automaton would exceed the state limit.
    TooLarge,
    /// A capture index outside `0..=group_count` was requested.
    Group(usize),
    /// A `pos`/`endpos` argument out of bounds, reversed, or off a
    /// character boundary.
    Position(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => e.fmt(f),
            Self::TooLarge => write!(f, "compiled pattern too large"),
            Self::Group(n) => write!(f, "no capture group {}", n),
            Self::Position(p) => write!(f, "position {} out of range", p),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Self::Syntax(e)
    }
}
