mod ast;
mod lexer;

use lalrpop_util::ParseError;

use crate::error::{SyntaxError, SyntaxKind};
use crate::flags::Flags;

pub use ast::{Anchor, Ast, ClassItem, ClassKind, ClassSet, Repeat};

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::ptr_arg)]
    #[rustfmt::skip]
    grammar,
    "/parser/grammar.rs"
);

pub(crate) fn parse(pattern: &str, flags: Flags) -> Result<Ast, SyntaxError> {
    grammar::PatternParser::new()
        .parse(lexer::Lexer::new(pattern, flags))
        .map_err(from_lalrpop)
}

fn from_lalrpop(err: ParseError<usize, lexer::Tok, SyntaxError>) -> SyntaxError {
    match err {
        ParseError::User { error } => error,
        ParseError::UnrecognizedToken {
            token: (pos, tok, _),
            ..
        } => {
            let kind = match tok {
                lexer::Tok::Star | lexer::Tok::Plus | lexer::Tok::QMark | lexer::Tok::Bound(_) => {
                    SyntaxKind::Repeat
                }
                _ => SyntaxKind::Parse,
            };
            SyntaxError::new(kind, pos)
        }
        ParseError::UnrecognizedEof { location, .. } | ParseError::InvalidToken { location } => {
            SyntaxError::new(SyntaxKind::Parse, location)
        }
        ParseError::ExtraToken {
            token: (pos, _, _), ..
        } => SyntaxError::new(SyntaxKind::Parse, pos),
    }
}

impl Ast {
    /// Parse pattern text without compiling it.
    pub fn parse(pattern: &str, flags: Flags) -> Result<Ast, SyntaxError> {
        parse(pattern, flags)
    }
}
