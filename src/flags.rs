use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Compilation flags, fixed for the lifetime of a [`Pattern`](crate::Pattern).
/// The empty set selects POSIX basic syntax, where `(){}|+?` are ordinary
/// characters and their escaped forms are the operators.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags(u16);

impl Flags {
    /// POSIX basic regular expression syntax (the empty flag set).
    pub const BASIC: Flags = Flags(0);
    /// POSIX extended regular expression syntax.
    pub const EXTENDED: Flags = Flags(1);
    /// Case-insensitive matching.
    pub const ICASE: Flags = Flags(1 << 1);
    /// Newline-sensitive matching: `.` and negated classes do not match
    /// `\n`, and `^` / `$` also match after and before a `\n`.
    pub const NEWLINE: Flags = Flags(1 << 2);
    /// Do not track submatches; capture groups report as non-participating.
    pub const NOSUB: Flags = Flags(1 << 3);
    /// Treat the whole pattern as literal text.
    pub const LITERAL: Flags = Flags(1 << 4);
    /// Right-associative concatenation. Accepted for compatibility;
    /// associativity cannot change what this engine matches.
    pub const RIGHT_ASSOC: Flags = Flags(1 << 5);
    /// Prefer shorter submatches when the overall span is not at stake.
    pub const UNGREEDY: Flags = Flags(1 << 6);

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 7] = [
            (Flags::EXTENDED, "EXTENDED"),
            (Flags::ICASE, "ICASE"),
            (Flags::NEWLINE, "NEWLINE"),
            (Flags::NOSUB, "NOSUB"),
            (Flags::LITERAL, "LITERAL"),
            (Flags::RIGHT_ASSOC, "RIGHT_ASSOC"),
            (Flags::UNGREEDY, "UNGREEDY"),
        ];

        let mut any = false;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if any {
                    write!(f, " | ")?;
                }
                write!(f, "{}", name)?;
                any = true;
            }
        }
        if !any {
            write!(f, "BASIC")?;
        }
        Ok(())
    }
}
