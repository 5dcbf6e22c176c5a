use std::str::Split;

use tracing::warn;

use crate::Document;
use crate::error::ParseError;
use crate::util::is_name_char;

/// Represents an on-going parse.
#[derive(Debug, Clone)]
pub(crate) struct Parser<'a> {
    lines: Split<'a, char>,
    line: usize,
    errors: Vec<ParseError>,
}

/// What a single trimmed line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Comment(&'a str),
    Header { kind: &'a str, name: &'a str },
    Option { key: &'a str, value: &'a str },
    Unrecognized,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n'),
            line: 0,
            errors: Vec::new(),
        }
    }
}

impl Parser<'_> {
    /// Feed every line into `document` and return the lines that had to be dropped.
    pub(crate) fn parse_into(mut self, document: &mut Document) -> Vec<ParseError> {
        // Index into `document.sections` of the last header seen.
        let mut current = None::<usize>;

        while let Some(raw) = self.lines.next() {
            self.line += 1;

            match classify(raw.trim()) {
                LineKind::Blank => {}
                LineKind::Comment(text) => {
                    // There is nowhere to keep a comment above the first header.
                    if let Some(i) = current {
                        document.sections[i].insert_comment(text);
                    }
                }
                LineKind::Header { kind, name } => {
                    current = Some(document.section_index(kind, name));
                }
                LineKind::Option { key, value } => match current {
                    Some(i) => document.sections[i].insert_option(key, value),
                    None => self.report(ParseError::MissingSection { line: self.line }),
                },
                LineKind::Unrecognized => {
                    self.report(ParseError::UnrecognizedLine { line: self.line });
                }
            }
        }

        self.errors
    }

    fn report(&mut self, error: ParseError) {
        warn!("{error}");
        self.errors.push(error);
    }
}

fn classify(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with('#') {
        LineKind::Comment(line)
    } else if let Some((kind, name)) = parse_header(line) {
        LineKind::Header { kind, name }
    } else if let Some((key, value)) = parse_option(line) {
        LineKind::Option { key, value }
    } else {
        LineKind::Unrecognized
    }
}

/// `[type name]`, where the type is a run of name characters and the name is anything up to
/// the closing bracket.
fn parse_header(line: &str) -> Option<(&str, &str)> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    if inner.contains(']') {
        return None;
    }

    let inner = inner.trim_start();
    let end = inner.find(|c| !is_name_char(c)).unwrap_or(inner.len());
    if end == 0 {
        return None;
    }

    let (kind, name) = inner.split_at(end);
    Some((kind, name.trim()))
}

/// `key = value`. Everything after the first `=` is the value.
fn parse_option(line: &str) -> Option<(&str, &str)> {
    let end = line.find(|c| !is_name_char(c))?;
    if end == 0 {
        return None;
    }

    let (key, rest) = line.split_at(end);
    let value = rest.trim_start().strip_prefix('=')?;
    Some((key, value.trim()))
}
