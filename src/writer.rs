//! Indentation-aware text buffer for generated Python.

const INDENT: &str = "    ";

#[derive(Debug, Clone, Default)]
pub struct CodeWriter {
    buf: String,
    level: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Write a protobuf leading comment as `#` lines.
    pub fn comment(&mut self, comment: &str) {
        for line in comment.trim_end().lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line("#");
            } else if line.starts_with(' ') {
                self.line(format!("#{line}"));
            } else {
                self.line(format!("# {line}"));
            }
        }
    }

    pub fn set_level(&mut self, level: usize) {
        self.level = level;
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}
