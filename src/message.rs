use std::io::{self, Write};
use std::panic;

use anstyle::{AnsiColor, Style};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

use crate::source::{SourceContext, SourceRange};
use crate::stream::OutputStream;

/// How bad a message is. Ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, IntoPrimitive, TryFromPrimitive,
)]
#[repr(u8)]
pub enum Severity {
    Debug = 0,
    Note = 1,
    Warning = 2,
    Error = 3,
    FatalError = 4,
    InternalError = 5,
}

impl Severity {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Note => "note",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::FatalError => "fatal error",
            Self::InternalError => "internal error",
        }
    }

    /// Whether messages of this severity make the compilation fail.
    #[must_use]
    pub fn is_error(self) -> bool {
        self >= Self::Error
    }

    fn label_style(self) -> Style {
        match self {
            Self::Debug => AnsiColor::Magenta.on_default().bold(),
            Self::Note => AnsiColor::BrightBlack.on_default().bold(),
            Self::Warning => AnsiColor::BrightYellow.on_default().bold(),
            Self::Error => AnsiColor::Red.on_default().bold(),
            Self::FatalError => AnsiColor::BrightRed.on_default().bold().underline(),
            Self::InternalError => AnsiColor::Cyan.on_default().bold(),
        }
    }

    fn sample_text_style(self) -> Style {
        if self == Self::Warning {
            AnsiColor::BrightYellow.on_default()
        } else {
            AnsiColor::BrightRed.on_default()
        }
    }

    fn sample_underline_style(self) -> Style {
        if self == Self::Warning {
            AnsiColor::Yellow.on_default().bold()
        } else {
            AnsiColor::Red.on_default().bold()
        }
    }

    /// The internal-origin prefix is only interesting when debugging the
    /// compiler itself.
    fn shows_internal_origin(self) -> bool {
        matches!(self, Self::Debug | Self::InternalError)
    }
}

/// Handle to a message in a [`MessageBuffer`], used to attach child notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageId(usize);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageError {
    #[error("child messages can only have severity 'note', not '{}'", .0.label())]
    InvalidChildSeverity(Severity),
    #[error("no message for handle `{0}`")]
    UnknownParent(usize),
}

/// A structured diagnostic: severity, optional stable code, text, an optional
/// source range, and `note` children. Also records which line of the
/// compiler's own source emitted it.
#[derive(Debug, Clone)]
pub struct Message {
    origin_file: &'static str,
    origin_line: u32,
    source_range: SourceRange,
    severity: Severity,
    code: Option<&'static str>,
    text: String,
    children: Vec<Message>,
}

impl Message {
    fn new(
        origin: &'static panic::Location<'static>,
        severity: Severity,
        code: Option<&'static str>,
        source_range: Option<SourceRange>,
        text: String,
    ) -> Self {
        debug_assert!(!text.is_empty());
        debug_assert!(text.chars().next().is_some_and(|c| c.is_ascii_uppercase()));
        debug_assert!(!text.ends_with(['.', ',', ':', '\n', ' ']));
        if let Some(code) = code {
            debug_assert!(!code.is_empty());
        }

        Self {
            origin_file: origin.file(),
            origin_line: origin.line(),
            source_range: source_range.unwrap_or(SourceRange::NULL),
            severity,
            code,
            text,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        self.code
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn source_range(&self) -> &SourceRange {
        &self.source_range
    }

    #[must_use]
    pub fn children(&self) -> &[Message] {
        &self.children
    }

    fn matches(&self, query: &MessageQuery<'_>) -> bool {
        if let Some(severity) = query.severity {
            if self.severity != severity {
                return false;
            }
        }
        if let Some(code) = query.code {
            if self.code != Some(code) {
                return false;
            }
        }
        if let Some(text) = query.text {
            if self.text != text {
                return false;
            }
        }
        if let Some(line) = query.line {
            if self.source_range.start.line != line {
                return false;
            }
        }
        if let Some(file) = query.file {
            if self.source_range.start.file != Some(file) {
                return false;
            }
        }
        true
    }
}

/// Predicate for [`MessageBuffer::query`]; unset fields match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageQuery<'a> {
    pub severity: Option<Severity>,
    pub code: Option<&'a str>,
    pub text: Option<&'a str>,
    pub line: Option<u32>,
    pub file: Option<crate::source::SourceFileId>,
}

/// Buffers messages in emission order and keeps running warning and error
/// counters. Exclusive to the driver that owns the compilation.
#[derive(Debug, Clone, Default)]
pub struct MessageBuffer {
    messages: Vec<Message>,
    warning_count: usize,
    error_count: usize,
}

impl MessageBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return a handle for attaching child notes.
    #[track_caller]
    pub fn emit(
        &mut self,
        severity: Severity,
        code: Option<&'static str>,
        source_range: Option<SourceRange>,
        text: String,
    ) -> MessageId {
        match severity {
            Severity::Warning => self.warning_count += 1,
            _ if severity.is_error() => self.error_count += 1,
            _ => {}
        }
        self.messages.push(Message::new(
            panic::Location::caller(),
            severity,
            code,
            source_range,
            text,
        ));
        MessageId(self.messages.len() - 1)
    }

    /// Attach a `note` under an existing message.
    #[track_caller]
    pub fn emit_child(
        &mut self,
        parent: MessageId,
        severity: Severity,
        code: Option<&'static str>,
        text: String,
    ) -> Result<(), MessageError> {
        if severity != Severity::Note {
            return Err(MessageError::InvalidChildSeverity(severity));
        }
        let origin = panic::Location::caller();
        let parent = self
            .messages
            .get_mut(parent.0)
            .ok_or(MessageError::UnknownParent(parent.0))?;
        parent
            .children
            .push(Message::new(origin, severity, code, None, text));
        Ok(())
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Iterate messages matching the query, in emission order.
    pub fn query<'a>(
        &'a self,
        query: &'a MessageQuery<'a>,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| m.matches(query))
    }

    /// The single message matching the query, or `None` when there are zero
    /// or several.
    #[must_use]
    pub fn query_single<'a>(&'a self, query: &MessageQuery<'_>) -> Option<&'a Message> {
        let mut found = self.messages.iter().filter(|m| m.matches(query));
        let first = found.next()?;
        if found.next().is_some() { None } else { Some(first) }
    }

    /// Render every buffered message. When `sources` is absent, samples are
    /// omitted and a closing note says so.
    pub fn render<W: Write>(
        &self,
        stream: &mut OutputStream<W>,
        sources: Option<&SourceContext>,
    ) -> io::Result<()> {
        for message in &self.messages {
            let gutter_width = gutter_width_for(message);
            render_message(stream, sources, message, gutter_width)?;
        }
        if sources.is_none()
            && self
                .messages
                .iter()
                .any(|m| m.source_range.is_resolved())
        {
            stream.write_styled(
                Severity::Note.label_style(),
                "note: ",
            )?;
            stream.write_str("source samples omitted because no source map was supplied\n")?;
        }
        Ok(())
    }

    /// The closing `compiled with N warning(s) and M error(s)` line.
    pub fn render_summary<W: Write>(&self, stream: &mut OutputStream<W>) -> io::Result<()> {
        stream.write_str("compiled with ")?;
        let warnings = format!(
            "{} warning{}",
            self.warning_count,
            if self.warning_count == 1 { "" } else { "s" }
        );
        let errors = format!(
            "{} error{}",
            self.error_count,
            if self.error_count == 1 { "" } else { "s" }
        );
        if self.warning_count > 0 {
            stream.write_styled(AnsiColor::BrightYellow.on_default().bold(), &warnings)?;
        } else {
            stream.write_str(&warnings)?;
        }
        stream.write_str(" and ")?;
        if self.error_count > 0 {
            stream.write_styled(AnsiColor::BrightRed.on_default().bold(), &errors)?;
        } else {
            stream.write_str(&errors)?;
        }
        stream.write_str("\n")
    }
}

/// Width of the line-number gutter shared by a message and its children.
fn gutter_width_for(message: &Message) -> usize {
    fn last_sample_line(message: &Message) -> u32 {
        let mut last = message.source_range.start.line;
        for child in &message.children {
            last = last.max(last_sample_line(child));
        }
        last
    }
    let line = last_sample_line(message).max(1);
    (line.ilog10() + 1) as usize
}

fn render_message<W: Write>(
    stream: &mut OutputStream<W>,
    sources: Option<&SourceContext>,
    message: &Message,
    gutter_width: usize,
) -> io::Result<()> {
    if message.severity.shows_internal_origin() {
        stream.write_styled_fmt(
            AnsiColor::BrightBlack.on_default(),
            format_args!(
                "[internally from forge-compiler/{}:{}]\n",
                message.origin_file, message.origin_line
            ),
        )?;
    }

    let range = &message.source_range;
    if let (Some(file), Some(sources)) = (range.start.file, sources) {
        if let Ok(source) = sources.get(file) {
            let mut prefix = format!("{}:", source.path());
            if range.start.line != 0 {
                prefix.push_str(&format!("{}:", range.start.line));
                if range.start.column != 0 {
                    prefix.push_str(&format!("{}:", range.start.column));
                }
            }
            stream.write_styled(AnsiColor::Cyan.on_default(), &prefix)?;
            stream.write_char(' ')?;
        }
    }

    if message.code.is_some() {
        stream.write_styled_fmt(
            message.severity.label_style(),
            format_args!("{} ", message.severity.label()),
        )?;
        if let Some(code) = message.code {
            stream.write_styled_fmt(
                AnsiColor::BrightBlack.on_default(),
                format_args!("[{code}] "),
            )?;
        }
    } else {
        stream.write_styled_fmt(
            message.severity.label_style(),
            format_args!("{}: ", message.severity.label()),
        )?;
    }

    stream.write_styled(AnsiColor::White.on_default().bold(), &message.text)?;
    stream.write_char('\n')?;

    if let Some(sources) = sources {
        render_sample(stream, sources, message, gutter_width)?;
    }

    for child in &message.children {
        render_message(stream, sources, child, gutter_width)?;
    }

    Ok(())
}

fn render_sample<W: Write>(
    stream: &mut OutputStream<W>,
    sources: &SourceContext,
    message: &Message,
    gutter_width: usize,
) -> io::Result<()> {
    let range = &message.source_range;
    let Some(file) = range.start.file.filter(|_| range.is_resolved()) else {
        return stream.write_char('\n');
    };
    let Ok(source) = sources.get(file) else {
        return stream.write_char('\n');
    };
    let Some(sample) = source.enclosing_lines(range) else {
        return stream.write_char('\n');
    };

    let separator = stream.choose_ascii_or_unicode("|", "▏");
    let underline_glyph = stream.choose_ascii_or_unicode("^", "▔");
    let gutter_style = AnsiColor::BrightBlack.on_default();

    let mut line_number = range.start.line;
    let mut offset = range.start.offset - (range.start.column as usize - 1);
    let highlight = range.start.offset..range.start.offset + range.length;

    for line in sample.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        stream.write_styled_fmt(
            gutter_style,
            format_args!(" {line_number:>gutter_width$} {separator} "),
        )?;

        let line_end = offset + line.len();
        let within_start = highlight.start.clamp(offset, line_end);
        let within_end = highlight.end.clamp(offset, line_end);
        let before = &line[..within_start - offset];
        let within = &line[within_start - offset..within_end - offset];
        let after = &line[within_end - offset..];

        stream.write_str(before)?;
        stream.write_styled(message.severity.sample_text_style(), within)?;
        stream.write_str(after)?;
        stream.write_char('\n')?;

        if !within.is_empty() {
            stream.write_styled_fmt(
                gutter_style,
                format_args!(" {:>gutter_width$} {separator} ", ""),
            )?;
            for _ in 0..before.chars().count() {
                stream.write_char(' ')?;
            }
            let underline = underline_glyph.repeat(within.chars().count());
            stream.write_styled(message.severity.sample_underline_style(), &underline)?;
            stream.write_char('\n')?;
        }

        offset = line_end + 1;
        line_number += 1;
    }

    Ok(())
}
