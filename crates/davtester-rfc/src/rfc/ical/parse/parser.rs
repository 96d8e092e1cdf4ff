//! Builds the component tree from content lines.

use super::error::{ParseError, ParseResult};
use super::lexer::{parse_content_line, split_lines};
use crate::rfc::ical::core::{Component, ContentLine, ICalendar, Property};

/// Parses a document that must consist of exactly one VCALENDAR.
///
/// ## Errors
/// Returns an error for malformed content lines, unbalanced BEGIN/END
/// pairs, a root other than VCALENDAR, or anything after its END.
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseResult<ICalendar> {
    let mut lines = split_lines(input)
        .into_iter()
        .map(|(number, text)| parse_content_line(&text, number).map(|line| (number, line)));

    let (first, begin) = lines.next().ok_or(ParseError::Empty)??;
    if begin.name != "BEGIN" || !begin.raw_value.trim().eq_ignore_ascii_case("VCALENDAR") {
        return Err(ParseError::NotCalendar {
            line: first,
            found: format!("{}:{}", begin.name, begin.raw_value),
        });
    }

    let root = Builder { lines: &mut lines }.component(first, &begin.raw_value)?;

    if let Some(extra) = lines.next() {
        let (line, extra) = extra?;
        return Err(ParseError::Trailing {
            line,
            name: extra.name,
        });
    }

    tracing::trace!(
        properties = root.properties.len(),
        children = root.children.len(),
        "Parsed calendar"
    );
    Ok(ICalendar { root })
}

struct Builder<'a, I> {
    lines: &'a mut I,
}

impl<I> Builder<'_, I>
where
    I: Iterator<Item = ParseResult<(usize, ContentLine)>>,
{
    /// Reads up to the END matching a BEGIN already consumed at `opened`.
    fn component(&mut self, opened: usize, name: &str) -> ParseResult<Component> {
        let mut component = Component::named(name.trim());

        while let Some(next) = self.lines.next() {
            let (line, content) = next?;
            match content.name.as_str() {
                "BEGIN" => {
                    let child = self.component(line, &content.raw_value)?;
                    component.children.push(child);
                }
                "END" => {
                    let found = content.raw_value.trim().to_ascii_uppercase();
                    if found != component.name {
                        return Err(ParseError::Mismatched {
                            line,
                            expected: component.name,
                            found,
                        });
                    }
                    return Ok(component);
                }
                _ => component.properties.push(Property::from(content)),
            }
        }

        Err(ParseError::Unterminated {
            line: opened,
            name: component.name,
        })
    }
}
