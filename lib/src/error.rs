use std::fmt;

use crate::span::Span;

#[macro_export]
macro_rules! mismatch {
    ($description: expr, $expected: expr, $got: expr) => {
        format!("{} must be {}; got {}", $description, $expected, $got)
    };
}

/// A checked value did not satisfy an arity or type requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub description: String,
    pub expected: String,
    pub got: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&mismatch!(self.description, self.expected, self.got))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Mismatch(Mismatch),
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    message: String,
    span: Span,
    kind: ErrorKind,
}

impl Error {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            kind: ErrorKind::Runtime,
        }
    }
    pub fn mismatch(mismatch: Mismatch, span: Span) -> Self {
        Self {
            message: mismatch.to_string(),
            span,
            kind: ErrorKind::Mismatch(mismatch),
        }
    }
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn span(&self) -> Span {
        self.span
    }
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
    pub fn as_mismatch(&self) -> Option<&Mismatch> {
        match &self.kind {
            ErrorKind::Mismatch(mismatch) => Some(mismatch),
            ErrorKind::Runtime => None,
        }
    }

    /// Renders the message followed by the source lines the span covers, with
    /// the spanned text highlighted.
    pub fn render(&self, name: &str, src: &str) -> String {
        let (start, end) = self.span.locate(src);
        let mut out = format!(
            "error: {}\n --> {}:{}:{}\n",
            self.message,
            name,
            start.ln + 1,
            start.col + 1
        );
        let lines = src
            .lines()
            .enumerate()
            .skip(start.ln)
            .take(end.ln.saturating_sub(start.ln) + 1);
        for (ln, line) in lines {
            let from = if ln == start.ln {
                start.col.min(line.len())
            } else {
                0
            };
            let to = if ln == end.ln {
                end.col.clamp(from, line.len().max(from))
            } else {
                line.len()
            };
            out.push_str(&format!(
                "{}\x1b[1;31m{}\x1b[0m{}\n",
                &line[..from],
                &line[from..to],
                &line[to..]
            ));
        }
        out
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message, self.span.begin, self.span.end
        )
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close_mismatch() -> Error {
        Error::mismatch(
            Mismatch {
                description: "argument to close".into(),
                expected: "non-negative int".into(),
                got: "abc".into(),
            },
            Span::new(6, 9),
        )
    }

    #[test]
    fn mismatch_message_shape() {
        let err = close_mismatch();
        assert_eq!(
            err.message(),
            "argument to close must be non-negative int; got abc"
        );
        assert_eq!(err.as_mismatch().map(|m| m.got.as_str()), Some("abc"));
        assert_eq!(err.to_string(), format!("{} at 6..9", err.message()));
    }

    #[test]
    fn runtime_errors_carry_no_mismatch() {
        let err = Error::new("boom", Span::default()).with_span(Span::new(1, 2));
        assert_eq!(err.kind(), &ErrorKind::Runtime);
        assert_eq!(err.span(), Span::new(1, 2));
        assert!(err.as_mismatch().is_none());
    }

    #[test]
    fn render_highlights_single_line() {
        let rendered = close_mismatch().render("demo.sb", "close abc\n");
        assert_eq!(
            rendered,
            "error: argument to close must be non-negative int; got abc\n \
             --> demo.sb:1:7\n\
             close \x1b[1;31mabc\x1b[0m\n"
        );
    }

    #[test]
    fn render_spans_multiple_lines() {
        let err = Error::new("bad", Span::new(2, 11));
        let rendered = err.render("x", "ab cd\nef gh\n");
        assert_eq!(
            rendered,
            "error: bad\n --> x:1:3\nab\x1b[1;31m cd\x1b[0m\n\x1b[1;31mef gh\x1b[0m\n"
        );
    }

    #[test]
    fn render_tolerates_empty_source() {
        let err = Error::new("bad", Span::new(0, 4));
        assert_eq!(err.render("x", ""), "error: bad\n --> x:1:1\n");
    }
}
