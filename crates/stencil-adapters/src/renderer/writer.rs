//! Indentation-aware text builder shared by every artifact renderer.

/// Accumulates source text line by line at a tracked indentation level.
///
/// Output always ends with exactly one newline, never carries trailing
/// whitespace, and never contains two blank lines in a row unless asked to
/// with [`CodeWriter::blank_lines`].
#[derive(Debug, Clone)]
pub struct CodeWriter {
    buf: String,
    level: usize,
    unit: &'static str,
}

impl CodeWriter {
    pub fn new(unit: &'static str) -> Self {
        Self {
            buf: String::new(),
            level: 0,
            unit,
        }
    }

    /// Four-space indentation.
    pub fn python() -> Self {
        Self::new("    ")
    }

    /// Two-space indentation.
    pub fn typescript() -> Self {
        Self::new("  ")
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref().trim_end();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buf.push_str(self.unit);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    /// Write several lines at the current indentation.
    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
        self
    }

    /// A single blank line; collapses with a preceding blank line.
    pub fn blank(&mut self) -> &mut Self {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
        self
    }

    /// Ensure exactly `count` blank lines precede the next line.
    pub fn blank_lines(&mut self, count: usize) -> &mut Self {
        if self.buf.is_empty() {
            return self;
        }
        while self.buf.ends_with("\n\n") {
            self.buf.pop();
        }
        for _ in 0..count {
            self.buf.push('\n');
        }
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// `header`, then `body` one level deeper (Python-style block).
    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.line(header);
        self.indent();
        body(self);
        self.dedent();
        self
    }

    /// `open`, then `body` one level deeper, then `close` (brace-style block).
    pub fn braced(
        &mut self,
        open: impl AsRef<str>,
        close: impl AsRef<str>,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The finished text with a single trailing newline.
    pub fn finish(self) -> String {
        let mut out = self.buf;
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_indents_body() {
        let mut w = CodeWriter::python();
        w.block("class Product(Base):", |w| {
            w.line("__tablename__ = \"products\"");
        });
        assert_eq!(w.finish(), "class Product(Base):\n    __tablename__ = \"products\"\n");
    }

    #[test]
    fn braced_closes_at_outer_level() {
        let mut w = CodeWriter::typescript();
        w.braced("function f() {", "}", |w| {
            w.line("return 1;");
        });
        assert_eq!(w.finish(), "function f() {\n  return 1;\n}\n");
    }

    #[test]
    fn blank_lines_collapse() {
        let mut w = CodeWriter::python();
        w.blank().line("a").blank().blank().line("b").blank_lines(2).line("c");
        assert_eq!(w.finish(), "a\n\nb\n\n\nc\n");
    }

    #[test]
    fn empty_lines_carry_no_indentation() {
        let mut w = CodeWriter::python();
        w.indent().line("x").line("").line("y   ");
        assert_eq!(w.finish(), "    x\n\n    y\n");
    }

    #[test]
    fn dedent_never_underflows() {
        let mut w = CodeWriter::python();
        w.dedent().dedent().line("top");
        assert_eq!(w.finish(), "top\n");
    }
}
