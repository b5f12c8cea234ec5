//! An indentation-aware text accumulator for generated code.

/// Accumulates generated source text, tracking an indentation level.
///
/// `write` emits whole lines at the current level; `open_block` and
/// `close_block` handle brace-delimited languages. Non-empty output always
/// ends with a newline.
///
/// ```
/// use wrought_codegen_core::writer::CodeWriter;
///
/// let mut writer = CodeWriter::new();
/// writer
///     .open_block("impl City")
///     .write("pub fn name(&self) -> &str {")
///     .indent()
///     .write("&self.name")
///     .dedent()
///     .write("}")
///     .close_block("}");
/// assert!(writer.into_string().starts_with("impl City {\n    pub fn"));
/// ```
#[derive(Debug)]
pub struct CodeWriter {
    out: String,
    indent_text: String,
    level: usize,
    at_line_start: bool,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    /// A writer indenting with four spaces.
    pub fn new() -> Self {
        Self::with_indent_text("    ")
    }

    /// A writer with custom indent text (tabs, two spaces, ...).
    pub fn with_indent_text(indent_text: impl Into<String>) -> Self {
        Self {
            out: String::new(),
            indent_text: indent_text.into(),
            level: 0,
            at_line_start: true,
        }
    }

    /// Write `text` as full lines at the current indentation. Multi-line
    /// input is indented line by line; empty lines stay empty.
    pub fn write(&mut self, text: impl AsRef<str>) -> &mut Self {
        if !self.at_line_start {
            self.out.push('\n');
            self.at_line_start = true;
        }
        let text = text.as_ref();
        if text.is_empty() {
            self.out.push('\n');
            return self;
        }
        for line in text.lines() {
            if line.is_empty() {
                self.out.push('\n');
                continue;
            }
            for _ in 0..self.level {
                self.out.push_str(&self.indent_text);
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
        self
    }

    /// Append text to the current line without ending it. Starts the line
    /// at the current indentation when nothing has been written on it yet.
    pub fn write_inline(&mut self, text: impl AsRef<str>) -> &mut Self {
        if self.at_line_start {
            for _ in 0..self.level {
                self.out.push_str(&self.indent_text);
            }
            self.at_line_start = false;
        }
        self.out.push_str(text.as_ref());
        self
    }

    /// Write an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.write("")
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    /// Decrease the indentation level, saturating at zero.
    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Write `header` followed by ` {` and indent.
    pub fn open_block(&mut self, header: impl AsRef<str>) -> &mut Self {
        let header = header.as_ref();
        if header.is_empty() {
            self.write("{");
        } else {
            self.write(format!("{header} {{"));
        }
        self.indent()
    }

    /// Dedent and write `footer` (usually `}` or `};`).
    pub fn close_block(&mut self, footer: impl AsRef<str>) -> &mut Self {
        self.dedent().write(footer)
    }

    /// The accumulated text; non-empty output ends with a newline.
    pub fn into_string(mut self) -> String {
        if !self.at_line_start {
            self.out.push('\n');
        }
        self.out
    }
}
