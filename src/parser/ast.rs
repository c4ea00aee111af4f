/// A repetition bound. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    pub min: u32,
    pub max: Option<u32>,
}

impl Repeat {
    pub(crate) fn star() -> Self {
        Self { min: 0, max: None }
    }

    pub(crate) fn plus() -> Self {
        Self { min: 1, max: None }
    }

    pub(crate) fn opt() -> Self {
        Self { min: 0, max: Some(1) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    End,
}

/// A POSIX named character class, plus `Word` for the `\w` shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Xdigit,
    Word,
}

impl ClassKind {
    pub(crate) fn contains(self, c: char) -> bool {
        match self {
            Self::Alnum => c.is_alphanumeric(),
            Self::Alpha => c.is_alphabetic(),
            Self::Blank => c == ' ' || c == '\t',
            Self::Cntrl => c.is_control(),
            Self::Digit => c.is_ascii_digit(),
            Self::Graph => !c.is_whitespace() && !c.is_control(),
            Self::Lower => c.is_lowercase(),
            Self::Print => c == ' ' || (!c.is_whitespace() && !c.is_control()),
            Self::Punct => c.is_ascii_punctuation(),
            Self::Space => c.is_whitespace(),
            Self::Upper => c.is_uppercase(),
            Self::Xdigit => c.is_ascii_hexdigit(),
            Self::Word => c.is_alphanumeric() || c == '_',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    Range(char, char),
    Named(ClassKind),
}

/// A bracket expression, or one of the `\d`-style shorthands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSet {
    pub negated: bool,
    pub items: Vec<ClassItem>,
}

impl ClassSet {
    pub(crate) fn named(kind: ClassKind, negated: bool) -> Self {
        Self {
            negated,
            items: vec![ClassItem::Named(kind)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Empty,
    Literal(char),
    Class(ClassSet),
    Dot,
    Anchor(Anchor),
    Seq(Vec<Ast>),
    Alt(Vec<Ast>),
    Repeat { rep: Repeat, inner: Box<Ast> },
    /// `index` is `None` for a `(?:...)` shell group.
    Group { index: Option<u32>, inner: Box<Ast> },
}

impl Ast {
    pub(crate) fn then(lhs: Ast, rhs: Ast) -> Self {
        match lhs {
            Self::Empty => rhs,
            Self::Seq(mut inner) => {
                inner.push(rhs);
                Self::Seq(inner)
            }
            lhs => Self::Seq(vec![lhs, rhs]),
        }
    }

    pub(crate) fn or(lhs: Ast, rhs: Ast) -> Self {
        if let Self::Alt(mut inner) = lhs {
            inner.push(rhs);
            Self::Alt(inner)
        } else {
            Self::Alt(vec![lhs, rhs])
        }
    }

    pub(crate) fn repeat(inner: Ast, rep: Repeat) -> Self {
        Self::Repeat {
            rep,
            inner: Box::new(inner),
        }
    }

    pub(crate) fn group(index: Option<u32>, inner: Ast) -> Self {
        Self::Group {
            index,
            inner: Box::new(inner),
        }
    }

    /// The number of capturing groups. Groups are numbered 1.. in order of
    /// their opening parenthesis, so the count is the largest index.
    pub fn group_count(&self) -> u32 {
        match self {
            Self::Empty | Self::Literal(_) | Self::Class(_) | Self::Dot | Self::Anchor(_) => 0,
            Self::Seq(inner) | Self::Alt(inner) => {
                inner.iter().map(Ast::group_count).max().unwrap_or(0)
            }
            Self::Repeat { inner, .. } => inner.group_count(),
            Self::Group { index, inner } => index.unwrap_or(0).max(inner.group_count()),
        }
    }
}
