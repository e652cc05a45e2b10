//! Lexical casts for literal token text: parsing integer, float, character,
//! and string literals into value nodes, and formatting characters and
//! strings back for display. The upstream lexer hands tokens here; errors
//! become `ES-*` diagnostics (or `IS-*` when the caller misused the API).

use crate::ast::Node;
use crate::codes;
use crate::message::MessageBuffer;
use crate::source::{Location, SourceRange};

/// A cursor over one token's text that tracks the source location of every
/// byte it consumes.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    text: &'a str,
    consumed: usize,
    location: Location,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(text: &'a str, start: Location) -> Self {
        Self {
            text,
            consumed: 0,
            location: start,
        }
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.text[self.consumed..].chars().next()
    }

    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.consumed += ch.len_utf8();
        self.location.offset += ch.len_utf8();
        if ch == '\n' {
            if self.location.line != 0 {
                self.location.line += 1;
                self.location.column = 1;
            }
        } else if self.location.column != 0 {
            self.location.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character if it matches.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.consumed >= self.text.len()
    }

    /// The range from `start` up to the current position.
    #[must_use]
    pub fn range_from(&self, start: Location) -> SourceRange {
        SourceRange::new(start, self.location.offset - start.offset)
    }

    /// A one-character-wide range at the current position.
    #[must_use]
    pub fn here(&self) -> SourceRange {
        SourceRange::new(self.location, self.peek().map_or(1, char::len_utf8))
    }
}

fn digit_value(ch: char, base: u32) -> Option<u64> {
    ch.to_digit(base).map(u64::from)
}

/// Parse an integer literal such as `0`, `0xff_u8`, `0b1010`, or `42i64`.
///
/// The whole token's text (without sign) is given in `text`; `range` is its
/// source range. Returns a `value-int` node, or `None` with diagnostics.
pub fn parse_int(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    text: &str,
) -> Option<Node> {
    if text.is_empty() {
        codes::emit_is_2_empty_literal(messages, range);
        return None;
    }

    let mut reader = Reader::new(text, range.start);
    let mut base = 10u32;
    let mut digits = 0usize;
    if reader.eat('0') {
        digits = 1;
        match reader.peek() {
            Some('b') => {
                reader.next();
                base = 2;
                digits = 0;
            }
            Some('o') => {
                reader.next();
                base = 8;
                digits = 0;
            }
            Some('x') => {
                reader.next();
                base = 16;
                digits = 0;
            }
            _ => {}
        }
    }

    let mut value: u64 = 0;
    loop {
        let Some(ch) = reader.peek() else { break };
        if ch == '_' {
            reader.next();
            continue;
        }
        let Some(digit) = digit_value(ch, base) else {
            break;
        };
        reader.next();
        digits += 1;
        value = value.wrapping_mul(u64::from(base)).wrapping_add(digit);
    }
    if digits == 0 {
        codes::emit_es_8_unexpected_end_of_literal(messages, range);
        return None;
    }

    let (unsigned, has_suffix) = match reader.peek() {
        Some('i') => (false, true),
        Some('u') => (true, true),
        None => (false, false),
        Some(other) => {
            codes::emit_es_1_unexpected_character(messages, &reader.here(), other);
            return None;
        }
    };

    let mut bit_width = 32u64;
    if has_suffix {
        let suffix_start = reader.location();
        reader.next();
        bit_width = 0;
        while let Some(digit) = reader.peek().and_then(|ch| digit_value(ch, 10)) {
            reader.next();
            bit_width = bit_width.saturating_mul(10).saturating_add(digit);
        }
        if !matches!(bit_width, 8 | 16 | 32 | 64) {
            codes::emit_es_10_invalid_bit_width_for_int(
                messages,
                &reader.range_from(suffix_start),
                bit_width,
            );
            return None;
        }
        if let Some(other) = reader.peek() {
            codes::emit_es_1_unexpected_character(messages, &reader.here(), other);
            return None;
        }
    }

    let flags = if unsigned {
        crate::ast::IntFlags::UNSIGNED
    } else {
        crate::ast::IntFlags::empty()
    };
    Some(Node::value_int(
        *range,
        crate::ast::TypeInt::new(*range, flags, bit_width as u8),
        value,
    ))
}

/// Parse a float literal such as `1.5`, `0.25f32`, or `2.0f64`. A `.` is
/// required; the upstream lexer never produces a float token without one.
pub fn parse_float(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    text: &str,
) -> Option<Node> {
    if text.is_empty() {
        codes::emit_is_2_empty_literal(messages, range);
        return None;
    }
    if !text.contains('.') {
        codes::emit_is_4_float_literal_missing_dot(messages, range);
        return None;
    }

    let (digits, bit_width) = if let Some(stripped) = text.strip_suffix("f32") {
        (stripped, 32u64)
    } else if let Some(stripped) = text.strip_suffix("f64") {
        (stripped, 64)
    } else if let Some(position) = text.find('f') {
        let declared = text[position + 1..].parse::<u64>().unwrap_or(0);
        let start = Location {
            offset: range.start.offset + position,
            column: if range.start.column == 0 {
                0
            } else {
                range.start.column + position as u32
            },
            ..range.start
        };
        codes::emit_es_11_invalid_bit_width_for_float(
            messages,
            &SourceRange::new(start, text.len() - position),
            declared,
        );
        return None;
    } else {
        (text, 64)
    };

    let cleaned: String = digits.chars().filter(|ch| *ch != '_').collect();
    let Ok(value) = cleaned.parse::<f64>() else {
        codes::emit_es_8_unexpected_end_of_literal(messages, range);
        return None;
    };
    Some(if bit_width == 32 {
        Node::value_float_f32(*range, value as f32)
    } else {
        Node::value_float_f64(*range, value)
    })
}

fn parse_escape(messages: &mut MessageBuffer, reader: &mut Reader<'_>) -> Option<char> {
    let escape_start = reader.location();
    let Some(ch) = reader.next() else {
        codes::emit_es_3_string_ends_with_backslash(messages, &reader.here());
        return None;
    };
    match ch {
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '0' => Some('\0'),
        'x' => {
            let mut value = 0u32;
            let mut count = 0usize;
            while count < 2 {
                let Some(digit) = reader.peek().and_then(|c| c.to_digit(16)) else {
                    break;
                };
                reader.next();
                value = value * 16 + digit;
                count += 1;
            }
            if count < 2 {
                codes::emit_es_4_escape_x_expects_2_hex_digits(
                    messages,
                    &reader.range_from(escape_start),
                    count,
                );
                return None;
            }
            char::from_u32(value)
        }
        'u' => {
            if !reader.eat('{') {
                codes::emit_es_5_escape_u_expects_opening_brace(
                    messages,
                    &reader.range_from(escape_start),
                );
                return None;
            }
            let mut value = 0u32;
            let mut count = 0usize;
            while let Some(digit) = reader.peek().and_then(|c| c.to_digit(16)) {
                reader.next();
                value = value.saturating_mul(16).saturating_add(digit);
                count += 1;
            }
            if count == 0 || count > 6 {
                codes::emit_es_7_escape_u_expects_hex_digits(
                    messages,
                    &reader.range_from(escape_start),
                    count,
                );
                return None;
            }
            if !reader.eat('}') {
                codes::emit_es_6_escape_u_expects_closing_brace(
                    messages,
                    &reader.range_from(escape_start),
                );
                return None;
            }
            if value > 0xff_ffff {
                codes::emit_is_1_code_point_limit(
                    messages,
                    &reader.range_from(escape_start),
                    value,
                );
                return None;
            }
            char::from_u32(value)
        }
        other => {
            codes::emit_es_1_unexpected_character(messages, &reader.here(), other);
            None
        }
    }
}

fn parse_quoted(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    text: &str,
    quote: char,
) -> Option<String> {
    if text.is_empty() {
        codes::emit_is_2_empty_literal(messages, range);
        return None;
    }
    let mut reader = Reader::new(text, range.start);
    if !reader.eat(quote) {
        codes::emit_is_3_literal_must_start_with_quote(messages, range);
        return None;
    }

    let mut out = String::new();
    loop {
        let Some(ch) = reader.next() else {
            codes::emit_es_8_unexpected_end_of_literal(messages, range);
            return None;
        };
        if ch == quote {
            break;
        }
        if ch == '\\' {
            out.push(parse_escape(messages, &mut reader)?);
        } else {
            out.push(ch);
        }
    }
    if !reader.is_at_end() {
        codes::emit_es_1_unexpected_character(messages, &reader.here(), reader.peek()?);
        return None;
    }
    Some(out)
}

/// Parse a string literal, quotes included, into a `value-string` node.
pub fn parse_string(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    text: &str,
) -> Option<Node> {
    let value = parse_quoted(messages, range, text, '"')?;
    Some(Node::value_string(*range, value))
}

/// Parse a character literal, quotes included, into a `value-character`
/// node.
pub fn parse_character(
    messages: &mut MessageBuffer,
    range: &SourceRange,
    text: &str,
) -> Option<Node> {
    let value = parse_quoted(messages, range, text, '\'')?;
    let mut chars = value.chars();
    let first = match chars.next() {
        Some(first) => first,
        None => {
            codes::emit_es_8_unexpected_end_of_literal(messages, range);
            return None;
        }
    };
    if chars.next().is_some() {
        codes::emit_es_9_multiple_characters_in_character_literal(messages, range);
        return None;
    }
    Some(Node::value_character(*range, first))
}

fn is_printable(ch: char) -> bool {
    !ch.is_control() && (ch.is_ascii() || ch.is_alphanumeric())
}

fn push_escaped(out: &mut String, ch: char, quote: char) {
    match ch {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\0' => out.push_str("\\0"),
        ch if ch == quote => {
            out.push('\\');
            out.push(quote);
        }
        ch if is_printable(ch) => out.push(ch),
        ch if (ch as u32) <= 0xff => {
            out.push_str(&format!("\\x{:02x}", ch as u32));
        }
        ch => {
            out.push_str(&format!("\\u{{{:x}}}", ch as u32));
        }
    }
}

/// Render an integer literal back to source form, value then type keyword,
/// e.g. `255u8` or `-5i32`.
#[must_use]
pub fn format_int(value: &crate::ast::ValueInt) -> String {
    if value.ty.is_unsigned() {
        format!("{}{}", value.as_u64(), value.ty.keyword())
    } else {
        format!("{}{}", value.as_i64(), value.ty.keyword())
    }
}

/// Quote and escape a character for display, e.g. `'a'` or `'\n'`.
#[must_use]
pub fn format_char(value: char) -> String {
    let mut out = String::from('\'');
    push_escaped(&mut out, value, '\'');
    out.push('\'');
    out
}

/// Quote and escape a string for display, e.g. `"line\n"`.
#[must_use]
pub fn format_str(value: &str) -> String {
    let mut out = String::from('"');
    for ch in value.chars() {
        push_escaped(&mut out, ch, '"');
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::IntFlags;
    use crate::message::MessageQuery;

    fn null() -> SourceRange {
        SourceRange::NULL
    }

    fn parse_int_ok(text: &str) -> crate::ast::ValueInt {
        let mut messages = MessageBuffer::new();
        let node = parse_int(&mut messages, &null(), text).unwrap();
        assert!(messages.is_empty(), "unexpected messages for {text}");
        match node {
            Node::ValueInt(payload) => payload,
            other => panic!("expected value-int, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_parse_int_plain() {
        let parsed = parse_int_ok("42");
        assert_eq!(42, parsed.value);
        assert_eq!(32, parsed.ty.bit_width);
        assert!(!parsed.ty.is_unsigned());
    }

    #[test]
    fn test_parse_int_suffixes() {
        let parsed = parse_int_ok("255u8");
        assert_eq!(255, parsed.as_u64());
        assert_eq!(IntFlags::UNSIGNED, parsed.ty.flags);
        assert_eq!(8, parsed.ty.bit_width);

        let parsed = parse_int_ok("7i64");
        assert_eq!(7, parsed.as_i64());
        assert_eq!(64, parsed.ty.bit_width);
    }

    #[test]
    fn test_parse_int_bases_and_separators() {
        assert_eq!(0xff, parse_int_ok("0xff").value);
        assert_eq!(0b1010, parse_int_ok("0b1010").value);
        assert_eq!(0o17, parse_int_ok("0o17").value);
        assert_eq!(1_000_000, parse_int_ok("1_000_000").value);
    }

    #[test]
    fn test_parse_int_invalid_bit_width() {
        let mut messages = MessageBuffer::new();
        assert!(parse_int(&mut messages, &null(), "1u12").is_none());
        let query = MessageQuery {
            code: Some("ES-10"),
            ..MessageQuery::default()
        };
        let message = messages.query_single(&query).unwrap();
        assert_eq!("Invalid bit width for integer literal: 12", message.text());
        assert_eq!(
            "Valid bit widths are: 8, 16, 32, 64",
            message.children()[0].text()
        );
    }

    #[test]
    fn test_parse_int_empty_is_internal() {
        let mut messages = MessageBuffer::new();
        assert!(parse_int(&mut messages, &null(), "").is_none());
        assert_eq!(1, messages.error_count());
        assert_eq!(Some("IS-2"), messages.messages()[0].code());
    }

    #[test]
    fn test_parse_float() {
        let mut messages = MessageBuffer::new();
        let Some(Node::ValueFloat(parsed)) = parse_float(&mut messages, &null(), "2.5f32") else {
            panic!("expected value-float");
        };
        assert_eq!(2.5, parsed.value);
        assert_eq!(32, parsed.ty.bit_width);

        assert!(parse_float(&mut messages, &null(), "25").is_none());
        assert_eq!(Some("IS-4"), messages.messages()[0].code());

        assert!(parse_float(&mut messages, &null(), "2.5f16").is_none());
        let query = MessageQuery {
            code: Some("ES-11"),
            ..MessageQuery::default()
        };
        assert!(messages.query_single(&query).is_some());
    }

    #[test]
    fn test_parse_string_escapes() {
        let mut messages = MessageBuffer::new();
        let Some(Node::ValueString(parsed)) =
            parse_string(&mut messages, &null(), "\"a\\n\\x20\\u{2764}\"")
        else {
            panic!("expected value-string");
        };
        assert_eq!("a\n \u{2764}", parsed.value);
        assert!(messages.is_empty());
    }

    #[test]
    fn test_parse_string_error_cases() {
        let mut messages = MessageBuffer::new();
        assert!(parse_string(&mut messages, &null(), "\"\\x2\"").is_none());
        assert_eq!(Some("ES-4"), messages.messages()[0].code());

        let mut messages = MessageBuffer::new();
        assert!(parse_string(&mut messages, &null(), "\"\\u20\"").is_none());
        assert_eq!(Some("ES-5"), messages.messages()[0].code());

        let mut messages = MessageBuffer::new();
        assert!(parse_string(&mut messages, &null(), "\"unterminated").is_none());
        assert_eq!(Some("ES-8"), messages.messages()[0].code());

        let mut messages = MessageBuffer::new();
        assert!(parse_string(&mut messages, &null(), "no-quote").is_none());
        assert_eq!(Some("IS-3"), messages.messages()[0].code());
    }

    #[test]
    fn test_parse_character() {
        let mut messages = MessageBuffer::new();
        let Some(Node::ValueCharacter(parsed)) = parse_character(&mut messages, &null(), "'a'")
        else {
            panic!("expected value-character");
        };
        assert_eq!('a', parsed.value);

        assert!(parse_character(&mut messages, &null(), "'ab'").is_none());
        let query = MessageQuery {
            code: Some("ES-9"),
            ..MessageQuery::default()
        };
        let message = messages.query_single(&query).unwrap();
        assert_eq!(
            "If this was supposed to be a string, use double quotes instead",
            message.children()[0].text()
        );
    }

    #[test]
    fn test_format_round_trip() {
        assert_eq!("'a'", format_char('a'));
        assert_eq!("'\\n'", format_char('\n'));
        assert_eq!("'\\x07'", format_char('\u{7}'));
        assert_eq!("\"say \\\"hi\\\"\"", format_str("say \"hi\""));
    }
}
