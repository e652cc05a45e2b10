use std::io::{self, Write};

use anstyle::Style;

/// A text sink with two per-process capability bits: whether it accepts ANSI
/// color sequences and whether it accepts non-ASCII glyphs. Both affect
/// rendering only.
#[derive(Debug)]
pub struct OutputStream<W> {
    writer: W,
    color: bool,
    unicode: bool,
}

impl OutputStream<Vec<u8>> {
    /// An in-memory stream, used by tests and by diagnostics that format
    /// values before embedding them in message text.
    #[must_use]
    pub fn buffer() -> Self {
        Self {
            writer: Vec::new(),
            color: false,
            unicode: false,
        }
    }

    /// Consume the stream and return the accumulated text.
    ///
    /// Only valid UTF-8 is ever written; invalid bytes are replaced rather
    /// than panicking.
    #[must_use]
    pub fn into_string(self) -> String {
        String::from_utf8_lossy(&self.writer).into_owned()
    }
}

impl<W: Write> OutputStream<W> {
    #[must_use]
    pub fn new(writer: W, color: bool, unicode: bool) -> Self {
        Self {
            writer,
            color,
            unicode,
        }
    }

    #[must_use]
    pub fn supports_color(&self) -> bool {
        self.color
    }

    #[must_use]
    pub fn supports_unicode(&self) -> bool {
        self.unicode
    }

    /// Pick the glyph matching the sink's capability.
    #[must_use]
    pub fn choose_ascii_or_unicode(
        &self,
        ascii: &'static str,
        unicode: &'static str,
    ) -> &'static str {
        if self.unicode { unicode } else { ascii }
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    pub fn write_char(&mut self, ch: char) -> io::Result<()> {
        let mut encoded = [0u8; 4];
        self.write_str(ch.encode_utf8(&mut encoded))
    }

    pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) -> io::Result<()> {
        self.writer.write_fmt(args)
    }

    /// Write `text` wrapped in `style`, when the sink supports color.
    pub fn write_styled(&mut self, style: Style, text: &str) -> io::Result<()> {
        if self.color {
            write!(self.writer, "{}{}{}", style.render(), text, style.render_reset())
        } else {
            self.write_str(text)
        }
    }

    pub fn write_styled_fmt(
        &mut self,
        style: Style,
        args: std::fmt::Arguments<'_>,
    ) -> io::Result<()> {
        if self.color {
            write!(self.writer, "{}", style.render())?;
            self.writer.write_fmt(args)?;
            write!(self.writer, "{}", style.render_reset())
        } else {
            self.writer.write_fmt(args)
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
