use crate::error::{SyntaxError, SyntaxKind};
use crate::flags::Flags;

use super::ast::{ClassItem, ClassKind, ClassSet, Repeat};

#[derive(Debug, Clone)]
pub enum Tok {
    Literal(char),
    Class(ClassSet),
    Dot,
    Star,
    Plus,
    QMark,
    Bound(Repeat),
    Pipe,
    /// Group open; carries the capture index, or `None` for `(?:`.
    Open(Option<u32>),
    Close,
    Caret,
    Dollar,
}

pub type Spanned = Result<(usize, Tok, usize), SyntaxError>;

/// RE_DUP_MAX: the largest bound a `{m,n}` repetition may name.
const DUP_MAX: u32 = 255;

/// A stateful pattern tokenizer. Everything needing lookahead or balance
/// tracking lives here: bracket expressions and bounds come out as single
/// tokens, parentheses are balance-checked, capture groups numbered, and
/// the basic/extended/literal split resolved before the grammar runs.
pub struct Lexer<'a> {
    pattern: &'a str,
    i: usize,
    flags: Flags,
    groups: u32,
    opens: Vec<usize>,
    // whether a BRE '*' (or '^') in this position is an operator
    can_repeat: bool,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(pattern: &'a str, flags: Flags) -> Self {
        Self {
            pattern,
            i: 0,
            flags,
            groups: 0,
            opens: Vec::new(),
            can_repeat: false,
            done: false,
        }
    }

    fn cur(&self) -> Option<char> {
        self.pattern[self.i..].chars().next()
    }

    fn rest(&self) -> &str {
        &self.pattern[self.i..]
    }

    fn second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self, c: char) {
        self.i += c.len_utf8();
    }

    fn token(&mut self, c: char, start: usize) -> Result<Tok, SyntaxError> {
        if self.flags.contains(Flags::LITERAL) {
            self.bump(c);
            return Ok(Tok::Literal(c));
        }

        let extended = self.flags.contains(Flags::EXTENDED);
        match c {
            '\\' => self.escape(start),
            '[' => {
                self.bump(c);
                self.class(start)
            }
            '.' => {
                self.bump(c);
                Ok(Tok::Dot)
            }
            '*' => {
                self.bump(c);
                if extended || self.can_repeat {
                    Ok(Tok::Star)
                } else {
                    // a leading '*' is an ordinary character in BRE
                    Ok(Tok::Literal('*'))
                }
            }
            '^' => {
                self.bump(c);
                if extended || !self.can_repeat {
                    Ok(Tok::Caret)
                } else {
                    Ok(Tok::Literal('^'))
                }
            }
            '$' => {
                let after = &self.pattern[self.i + 1..];
                self.bump(c);
                if extended
                    || after.is_empty()
                    || after.starts_with("\\)")
                    || after.starts_with("\\|")
                {
                    Ok(Tok::Dollar)
                } else {
                    Ok(Tok::Literal('$'))
                }
            }
            '(' if extended => {
                self.bump(c);
                self.open(start)
            }
            ')' if extended => {
                self.bump(c);
                self.close(start)
            }
            '|' if extended => {
                self.bump(c);
                Ok(Tok::Pipe)
            }
            '+' if extended => {
                self.bump(c);
                Ok(Tok::Plus)
            }
            '?' if extended => {
                self.bump(c);
                Ok(Tok::QMark)
            }
            '{' if extended => {
                self.bump(c);
                self.bound(start, false)
            }
            _ => {
                self.bump(c);
                Ok(Tok::Literal(c))
            }
        }
    }

    fn escape(&mut self, start: usize) -> Result<Tok, SyntaxError> {
        self.i += 1;
        let Some(c) = self.cur() else {
            return Err(SyntaxError::new(SyntaxKind::Escape, start));
        };
        let basic = !self.flags.contains(Flags::EXTENDED);
        self.bump(c);

        match c {
            '1'..='9' => Err(SyntaxError::new(SyntaxKind::Backref, start)),
            'n' => Ok(Tok::Literal('\n')),
            't' => Ok(Tok::Literal('\t')),
            'r' => Ok(Tok::Literal('\r')),
            'f' => Ok(Tok::Literal('\x0c')),
            'v' => Ok(Tok::Literal('\x0b')),
            'a' => Ok(Tok::Literal('\x07')),
            'd' => Ok(Tok::Class(ClassSet::named(ClassKind::Digit, false))),
            'D' => Ok(Tok::Class(ClassSet::named(ClassKind::Digit, true))),
            's' => Ok(Tok::Class(ClassSet::named(ClassKind::Space, false))),
            'S' => Ok(Tok::Class(ClassSet::named(ClassKind::Space, true))),
            'w' => Ok(Tok::Class(ClassSet::named(ClassKind::Word, false))),
            'W' => Ok(Tok::Class(ClassSet::named(ClassKind::Word, true))),
            '(' if basic => {
                self.groups += 1;
                self.opens.push(start);
                Ok(Tok::Open(Some(self.groups)))
            }
            ')' if basic => self.close(start),
            '{' if basic => self.bound(start, true),
            '}' if basic => Err(SyntaxError::new(SyntaxKind::Brace, start)),
            '|' if basic => Ok(Tok::Pipe),
            '+' if basic => Ok(Tok::Plus),
            '?' if basic => Ok(Tok::QMark),
            _ => Ok(Tok::Literal(c)),
        }
    }

    fn open(&mut self, start: usize) -> Result<Tok, SyntaxError> {
        if self.rest().starts_with('?') {
            if self.rest().starts_with("?:") {
                self.i += 2;
                self.opens.push(start);
                Ok(Tok::Open(None))
            } else {
                Err(SyntaxError::new(SyntaxKind::Parse, self.i))
            }
        } else {
            self.groups += 1;
            self.opens.push(start);
            Ok(Tok::Open(Some(self.groups)))
        }
    }

    fn close(&mut self, start: usize) -> Result<Tok, SyntaxError> {
        if self.opens.pop().is_none() {
            Err(SyntaxError::new(SyntaxKind::Paren, start))
        } else {
            Ok(Tok::Close)
        }
    }

    // `{` already consumed; in BRE the terminator is `\}`
    fn bound(&mut self, start: usize, basic: bool) -> Result<Tok, SyntaxError> {
        if !self.cur().is_some_and(|c| c.is_ascii_digit()) {
            if basic {
                return Err(SyntaxError::new(SyntaxKind::Bound, start));
            }
            // `{` not opening a bound is an ordinary character in ERE
            return Ok(Tok::Literal('{'));
        }

        let min = self.digits();
        let max = if self.cur() == Some(',') {
            self.i += 1;
            self.cur()
                .is_some_and(|c| c.is_ascii_digit())
                .then(|| self.digits())
        } else {
            Some(min)
        };

        if basic {
            if self.rest().starts_with("\\}") {
                self.i += 2;
            } else if self.cur().is_none() {
                return Err(SyntaxError::new(SyntaxKind::Brace, start));
            } else {
                return Err(SyntaxError::new(SyntaxKind::Bound, start));
            }
        } else {
            match self.cur() {
                Some('}') => self.i += 1,
                Some(_) => return Err(SyntaxError::new(SyntaxKind::Bound, start)),
                None => return Err(SyntaxError::new(SyntaxKind::Brace, start)),
            }
        }

        if min > DUP_MAX || max.is_some_and(|m| m > DUP_MAX || m < min) {
            return Err(SyntaxError::new(SyntaxKind::Bound, start));
        }
        Ok(Tok::Bound(Repeat { min, max }))
    }

    fn digits(&mut self) -> u32 {
        let mut n: u32 = 0;
        while let Some(d) = self.cur().and_then(|c| c.to_digit(10)) {
            n = n.saturating_mul(10).saturating_add(d);
            self.i += 1;
        }
        n
    }

    // `[` already consumed
    fn class(&mut self, start: usize) -> Result<Tok, SyntaxError> {
        let mut negated = false;
        if self.cur() == Some('^') {
            negated = true;
            self.i += 1;
        }

        let mut items = Vec::new();
        let mut first = true;
        loop {
            let Some(c) = self.cur() else {
                return Err(SyntaxError::new(SyntaxKind::Bracket, start));
            };
            if c == ']' && !first {
                self.i += 1;
                break;
            }
            first = false;

            if c == '[' && self.second() == Some(':') {
                items.push(ClassItem::Named(self.named_class()?));
                continue;
            }
            if c == '[' && matches!(self.second(), Some('.') | Some('=')) {
                return Err(SyntaxError::new(SyntaxKind::Collate, self.i));
            }

            let lo = c;
            let lo_pos = self.i;
            self.bump(c);

            if self.cur() == Some('-') && !matches!(self.second(), Some(']') | None) {
                self.i += 1;
                let Some(hi) = self.cur() else {
                    return Err(SyntaxError::new(SyntaxKind::Bracket, start));
                };
                self.bump(hi);
                if lo > hi {
                    return Err(SyntaxError::new(SyntaxKind::Range, lo_pos));
                }
                items.push(ClassItem::Range(lo, hi));
            } else {
                items.push(ClassItem::Range(lo, lo));
            }
        }

        Ok(Tok::Class(ClassSet { negated, items }))
    }

    // at `[:`
    fn named_class(&mut self) -> Result<ClassKind, SyntaxError> {
        let start = self.i;
        self.i += 2;
        let name_start = self.i;
        while self.cur().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.i += 1;
        }
        let name = &self.pattern[name_start..self.i];
        if !self.rest().starts_with(":]") {
            return Err(SyntaxError::new(SyntaxKind::Bracket, start));
        }
        self.i += 2;

        match name {
            "alnum" => Ok(ClassKind::Alnum),
            "alpha" => Ok(ClassKind::Alpha),
            "blank" => Ok(ClassKind::Blank),
            "cntrl" => Ok(ClassKind::Cntrl),
            "digit" => Ok(ClassKind::Digit),
            "graph" => Ok(ClassKind::Graph),
            "lower" => Ok(ClassKind::Lower),
            "print" => Ok(ClassKind::Print),
            "punct" => Ok(ClassKind::Punct),
            "space" => Ok(ClassKind::Space),
            "upper" => Ok(ClassKind::Upper),
            "xdigit" => Ok(ClassKind::Xdigit),
            _ => Err(SyntaxError::new(SyntaxKind::ClassName, start)),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Spanned;

    fn next(&mut self) -> Option<Spanned> {
        if self.done {
            return None;
        }
        let Some(c) = self.cur() else {
            self.done = true;
            if let Some(&unmatched) = self.opens.first() {
                return Some(Err(SyntaxError::new(SyntaxKind::Paren, unmatched)));
            }
            return None;
        };

        let start = self.i;
        match self.token(c, start) {
            Ok(tok) => {
                self.can_repeat = !matches!(tok, Tok::Open(_) | Tok::Pipe | Tok::Caret);
                Some(Ok((start, tok, self.i)))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
