//! Content line lexer for iCalendar (RFC 5545 §3.1).

use super::error::{ParseError, ParseResult};
use crate::rfc::ical::core::{ContentLine, Parameter};

/// Splits input into logical content lines, each paired with the 1-based
/// number of its first physical line.
///
/// CRLF and bare LF both end a line. A line starting with SP or HTAB
/// continues the previous one with that character removed. Folds land
/// anywhere, including before the `:` of a property.
#[must_use]
pub fn split_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (number, raw) in (1..).zip(input.lines()) {
        let text = raw.trim_end_matches('\r');
        if text.is_empty() {
            continue;
        }

        let folded = text.strip_prefix([' ', '\t']);
        match (folded, lines.last_mut()) {
            (Some(tail), Some((_, previous))) => previous.push_str(tail),
            (Some(tail), None) => lines.push((number, tail.to_string())),
            (None, _) => lines.push((number, text.to_string())),
        }
    }

    lines
}

/// Parses `name *(";" param) ":" value`. Names come back upper-cased; the
/// value is everything after the first unquoted `:`.
///
/// ## Errors
/// Returns an error naming `line` if the text is not a content line.
pub fn parse_content_line(text: &str, line: usize) -> ParseResult<ContentLine> {
    let mut scan = Scanner { text, pos: 0, line };

    let name = scan.name();
    match scan.peek() {
        None => return Err(ParseError::NoValue { line }),
        Some(';' | ':') if name.is_empty() => return Err(ParseError::BadName { line, column: 1 }),
        Some(';' | ':') => {}
        Some(_) => {
            return Err(ParseError::BadName {
                line,
                column: scan.column(),
            });
        }
    }

    let mut params = Vec::new();
    while scan.bump() == Some(';') {
        params.push(scan.parameter()?);
    }

    Ok(ContentLine {
        name: name.to_ascii_uppercase(),
        params,
        raw_value: scan.rest().to_string(),
    })
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    const fn column(&self) -> usize {
        self.pos + 1
    }

    fn rest(&mut self) -> &'a str {
        let rest = &self.text[self.pos..];
        self.pos = self.text.len();
        rest
    }

    /// Letters, digits and `-`.
    fn name(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '-') {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// `name "=" value *("," value)`, leaving the terminating `;` or `:`
    /// unconsumed.
    fn parameter(&mut self) -> ParseResult<Parameter> {
        let column = self.column();
        let name = self.name();
        if name.is_empty() || self.bump() != Some('=') {
            return Err(ParseError::BadParameter {
                line: self.line,
                column,
            });
        }

        let mut values = vec![self.param_value()?];
        loop {
            match self.peek() {
                Some(',') => {
                    self.bump();
                    values.push(self.param_value()?);
                }
                Some(';' | ':') => return Ok(Parameter::with_values(name.to_ascii_uppercase(), values)),
                Some(_) => {
                    return Err(ParseError::BadParameter {
                        line: self.line,
                        column: self.column(),
                    });
                }
                None => return Err(ParseError::NoValue { line: self.line }),
            }
        }
    }

    fn param_value(&mut self) -> ParseResult<String> {
        if self.peek() == Some('"') {
            self.bump();
            let start = self.pos;
            let Some(len) = self.text[start..].find('"') else {
                return Err(ParseError::OpenQuote { line: self.line });
            };
            self.pos = start + len + 1;
            return Ok(decode_carets(&self.text[start..start + len]));
        }

        let start = self.pos;
        while !matches!(self.peek(), None | Some(',' | ';' | ':')) {
            self.bump();
        }
        Ok(decode_carets(&self.text[start..self.pos]))
    }
}

/// RFC 6868 parameter value encoding: `^^`, `^n` and `^'`.
fn decode_carets(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        let mut lookahead = chars.clone();
        let decoded = match lookahead.next() {
            Some('^') => '^',
            Some('n' | 'N') => '\n',
            Some('\'') => '"',
            _ => {
                out.push('^');
                continue;
            }
        };
        out.push(decoded);
        chars = lookahead;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folded_lines_are_joined() {
        let input = "DESCRIPTION:This is a long description\r\n that continues here\r\nSUMMARY:x\r\n";
        assert_eq!(
            split_lines(input),
            [
                (1, "DESCRIPTION:This is a long descriptionthat continues here".to_string()),
                (3, "SUMMARY:x".to_string()),
            ]
        );
    }

    #[test]
    fn bare_lf_tab_folds_and_blank_lines() {
        let lines = split_lines("DESCRIPTION:First\n\tSecond\n\n Third\n");
        assert_eq!(lines, [(1, "DESCRIPTION:FirstSecondThird".to_string())]);
    }

    #[test]
    fn fold_before_the_colon_stays_one_property() {
        let input = "ATTENDEE;CN=A:mailto:a@example.com\r\n\
                     ATTENDEE;CN=Bob;X-CALENDARSERVER-DTSTAMP=20240101T1\r\n 20000Z:mailto:bob@example.com\r\n";
        let lines = split_lines(input);
        assert_eq!(
            lines,
            [
                (1, "ATTENDEE;CN=A:mailto:a@example.com".to_string()),
                (
                    2,
                    "ATTENDEE;CN=Bob;X-CALENDARSERVER-DTSTAMP=20240101T120000Z:mailto:bob@example.com".to_string()
                ),
            ]
        );

        let bob = parse_content_line(&lines[1].1, lines[1].0).unwrap();
        assert_eq!(bob.params[1].value(), Some("20240101T120000Z"));
        assert_eq!(bob.raw_value, "mailto:bob@example.com");
    }

    #[test]
    fn unindented_line_without_colon_is_not_merged() {
        let lines = split_lines("SUMMARY:x\nGARBAGE\n");
        assert_eq!(lines, [(1, "SUMMARY:x".to_string()), (2, "GARBAGE".to_string())]);
        assert_eq!(
            parse_content_line(&lines[1].1, lines[1].0),
            Err(ParseError::NoValue { line: 2 })
        );
    }

    #[test]
    fn name_and_value_only() {
        let line = parse_content_line("summary:Team Meeting", 1).unwrap();
        assert_eq!(line.name, "SUMMARY");
        assert!(line.params.is_empty());
        assert_eq!(line.raw_value, "Team Meeting");
    }

    #[test]
    fn quoted_parameter_may_hold_separators() {
        let line = parse_content_line("ATTENDEE;CN=\"Doe, Jane: PhD\";RSVP=TRUE:mailto:jane@example.com", 1).unwrap();
        assert_eq!(line.params[0].value(), Some("Doe, Jane: PhD"));
        assert_eq!(line.params[1].name, "RSVP");
        assert_eq!(line.raw_value, "mailto:jane@example.com");
    }

    #[test]
    fn multi_valued_and_empty_parameters() {
        let line = parse_content_line("ATTENDEE;ROLE=REQ-PARTICIPANT,OPT-PARTICIPANT;X-E=:", 1).unwrap();
        assert_eq!(line.params[0].values, ["REQ-PARTICIPANT", "OPT-PARTICIPANT"]);
        assert_eq!(line.params[1].value(), Some(""));
        assert_eq!(line.raw_value, "");
    }

    #[test]
    fn caret_sequences_decode() {
        let line = parse_content_line("ATTENDEE;CN=\"a^nb ^'c^' ^^ ^x\":mailto:t@example.com", 1).unwrap();
        assert_eq!(line.params[0].value(), Some("a\nb \"c\" ^ ^x"));
    }

    #[test]
    fn malformed_lines_report_their_line() {
        assert_eq!(
            parse_content_line("ATTENDEE;CN=\"Unclosed:mailto:t@example.com", 2),
            Err(ParseError::OpenQuote { line: 2 })
        );
        assert_eq!(parse_content_line("INVALID", 4), Err(ParseError::NoValue { line: 4 }));
        assert_eq!(
            parse_content_line("BAD NAME:x", 1),
            Err(ParseError::BadName { line: 1, column: 4 })
        );
        assert_eq!(
            parse_content_line(":x", 1),
            Err(ParseError::BadName { line: 1, column: 1 })
        );
        assert_eq!(
            parse_content_line("X;=a:b", 1),
            Err(ParseError::BadParameter { line: 1, column: 3 })
        );
    }
}
