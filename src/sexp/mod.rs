//! S-expression encoding of notification payloads.
//!
//! The enotify listener speaks Emacs Lisp, so every message we put on the
//! wire is the textual form of a lisp value. Encoding is one-directional:
//! runtime value to text, never back.

#[cfg(test)]
mod tests;

use std::fmt;

/// A symbolic token, e.g. a slot id or a handler function name.
///
/// Underscores in the name render as hyphens, matching lisp naming
/// convention (`mouse_1` encodes to `mouse-1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom(String);

impl Atom {
    /// Build an atom from a symbolic name.
    ///
    /// Panics on names that cannot form a lisp symbol (empty, or containing
    /// whitespace, quotes, or parentheses). That is a contract violation by
    /// the caller, not a runtime condition.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(
            !name.is_empty()
                && !name
                    .chars()
                    .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"')),
            "invalid atom name: {name:?}"
        );
        Atom(name)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// Keyword form of this atom: the same name prefixed with a colon.
    /// Idempotent; an already-keyword atom is returned unchanged.
    pub fn keyword(&self) -> Atom {
        if self.0.starts_with(':') {
            self.clone()
        } else {
            Atom(format!(":{}", self.0))
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for c in self.0.chars() {
            f.write_char(if c == '_' { '-' } else { c })?;
        }
        Ok(())
    }
}

/// How a [`SexpMap`] renders as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// `(k1 v1 k2 v2)`
    Flat,
    /// `((k1 . v1) (k2 . v2))`
    Alist,
    /// `(:k1 v1 :k2 v2)`, the default.
    #[default]
    Plist,
}

/// An ordered key/value mapping tagged with its rendering mode.
///
/// The tag is an explicit field rather than a sentinel key inside the pair
/// list, so it can never collide with real data keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SexpMap {
    pairs: Vec<(Atom, Sexp)>,
    mode: RenderMode,
}

impl SexpMap {
    /// Property-list rendering (the default): `(:a 1 :b 2)`.
    pub fn plist(pairs: Vec<(Atom, Sexp)>) -> Self {
        Self {
            pairs,
            mode: RenderMode::Plist,
        }
    }

    /// Association-list rendering: `((a . 1) (b . 2))`.
    pub fn alist(pairs: Vec<(Atom, Sexp)>) -> Self {
        Self {
            pairs,
            mode: RenderMode::Alist,
        }
    }

    /// Flat-list rendering: `(a 1 b 2)`.
    pub fn flat(pairs: Vec<(Atom, Sexp)>) -> Self {
        Self {
            pairs,
            mode: RenderMode::Flat,
        }
    }

    /// Same pairs, different rendering tag.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn pairs(&self) -> &[(Atom, Sexp)] {
        &self.pairs
    }
}

impl fmt::Display for SexpMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match self.mode {
                RenderMode::Flat => write!(f, "{key} {value}")?,
                RenderMode::Alist => write!(f, "({key} . {value})")?,
                RenderMode::Plist => write!(f, "{} {value}", key.keyword())?,
            }
        }
        f.write_str(")")
    }
}

/// The closed set of values the encoder accepts. Encoding is total over
/// this enum; there is no failure path.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexp {
    Int(i64),
    Float(f64),
    Text(String),
    Atom(Atom),
    List(Vec<Sexp>),
    Map(SexpMap),
}

impl Sexp {
    pub fn atom(name: impl Into<String>) -> Self {
        Sexp::Atom(Atom::new(name))
    }

    pub fn text(s: impl Into<String>) -> Self {
        Sexp::Text(s.into())
    }

    /// Render this value as s-expression text.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Int(n) => write!(f, "{n}"),
            Sexp::Float(x) => write!(f, "{x}"),
            Sexp::Text(s) => write_quoted(f, s),
            Sexp::Atom(a) => write!(f, "{a}"),
            Sexp::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Sexp::Map(map) => write!(f, "{map}"),
        }
    }
}

/// Quote a string literal the way the lisp reader expects: backslash and
/// double-quote escaped, newline/tab/CR as two-character sequences.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    use fmt::Write;
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            _ => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
