#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! Read and write `[type name]` configuration files without losing their layout.
//!
//! ```text
//! [server irc.example.net]
//! # a comment
//! port = 6667
//! ```
//!
//! Sections, options and comments are written back in the order they were read or created.
//! Options declared with a default through [`Section::get_option`] are left out of the output
//! while they still hold that default.

mod error;
mod parser;
mod section;
mod util;

use std::collections::HashMap;
use std::fmt;

pub use error::{ConversionError, EntryError, ParseError};
pub use section::{Comment, ConfigOption, Line, OptionType, Section, TypedValue};

use crate::parser::Parser;
use crate::section::{check_single_line, section_kind};
use crate::util::is_name;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    next_id: usize,
    // Kept in creation order, which is also id order.
    sections: Vec<Section>,
    // "type name" -> index into `sections`.
    index: HashMap<String, usize>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` into a new document, returning the lines that were dropped along with it.
    #[must_use]
    pub fn from_text(text: &str) -> (Self, Vec<ParseError>) {
        let mut document = Self::new();
        let errors = document.parse(text);
        (document, errors)
    }

    /// Replace the contents of the document with the sections in `text`.
    ///
    /// Malformed lines never stop the parse. Each one is logged, skipped, and returned in the
    /// order it was found.
    pub fn parse(&mut self, text: &str) -> Vec<ParseError> {
        self.sections.clear();
        self.index.clear();

        Parser::new(text).parse_into(self)
    }

    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// All sections in creation order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn find_section(&self, kind: &str, name: &str) -> Option<&Section> {
        let &i = self.index.get(&section_key(kind, name))?;
        Some(&self.sections[i])
    }

    /// Get a section, creating an empty one at the end of the document if it does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the type is not a run of letters, digits, `_` or `-`, or the name contains `]`
    /// or a line break.
    pub fn get_section(&mut self, kind: &str, name: &str) -> Result<&mut Section, EntryError> {
        if !is_name(kind.trim()) {
            return Err(EntryError::InvalidKind {
                kind: kind.to_owned(),
            });
        }
        if name.contains(']') {
            return Err(EntryError::InvalidSectionName {
                name: name.to_owned(),
            });
        }
        check_single_line(name)?;

        let i = self.section_index(kind, name);
        Ok(&mut self.sections[i])
    }

    /// Sections of the given type in creation order.
    pub fn sections_by_type(&self, kind: &str) -> impl Iterator<Item = &Section> {
        let kind = section_kind(kind);
        self.sections.iter().filter(move |s| s.kind() == kind)
    }

    pub fn sections_by_type_mut(&mut self, kind: &str) -> impl Iterator<Item = &mut Section> {
        let kind = section_kind(kind);
        self.sections.iter_mut().filter(move |s| s.kind() == kind)
    }

    fn section_index(&mut self, kind: &str, name: &str) -> usize {
        let key = section_key(kind, name);
        if let Some(&i) = self.index.get(&key) {
            return i;
        }

        let section = Section::new(self.next_id, kind, name);
        self.next_id += 1;
        self.sections.push(section);
        self.index.insert(key, self.sections.len() - 1);
        self.sections.len() - 1
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{section}")?;
        }

        Ok(())
    }
}

fn section_key(kind: &str, name: &str) -> String {
    format!("{} {}", section_kind(kind), name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_separated_by_a_blank_line() {
        let (document, errors) = Document::from_text(
            r"
[server one]
host = a

[options]
limit = 3
",
        );

        assert!(errors.is_empty());
        assert_eq!(
            document.serialize(),
            "[server one]\nhost = a\n\n[options]\nlimit = 3\n"
        );
    }

    #[test]
    fn repeated_header_merges_into_first_section() {
        let (document, _) = Document::from_text("[a]\nx = 1\n[b]\ny = 2\n[A]\nz = 3\n");

        assert_eq!(document.sections().len(), 2);
        assert_eq!(
            document.serialize(),
            "[a]\nx = 1\nz = 3\n\n[b]\ny = 2\n"
        );
    }

    #[test]
    fn leading_comment_is_dropped() {
        let (document, errors) = Document::from_text("# top\n[s]\n# kept\n");

        assert!(errors.is_empty());
        assert_eq!(document.serialize(), "[s]\n# kept\n");
    }

    #[test]
    fn parse_discards_previous_contents() {
        let mut document = Document::new();
        document
            .get_section("old", "")
            .and_then(|s| s.add_option("a", "1"))
            .expect("valid section");

        let errors = document.parse("[new]\nb = 2\n");

        assert!(errors.is_empty());
        assert!(document.find_section("old", "").is_none());
        assert_eq!(document.serialize(), "[new]\nb = 2\n");
    }

    #[test]
    fn section_ids_keep_counting_across_parses() {
        let mut document = Document::new();
        document.get_section("a", "").expect("valid section");
        document.parse("[b]\n");

        assert_eq!(document.sections()[0].id(), 1);
    }

    #[test]
    fn get_section_is_idempotent() {
        let mut document = Document::new();
        document
            .get_section(" Server ", " one ")
            .and_then(|s| s.add_option("port", "1"))
            .expect("valid section");
        document
            .get_section("server", "one")
            .and_then(|s| s.add_option("host", "h"))
            .expect("valid section");

        assert_eq!(document.sections().len(), 1);
        assert_eq!(
            document.serialize(),
            "[server one]\nport = 1\nhost = h\n"
        );
    }

    #[test]
    fn sections_by_type_in_creation_order() {
        let (mut document, _) =
            Document::from_text("[server z]\n[options]\n[server a]\n[server m]\n");

        let names = document
            .sections_by_type(" SERVER ")
            .map(Section::name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["z", "a", "m"]);

        for section in document.sections_by_type_mut("server") {
            section.add_option("enabled", "true").expect("valid option");
        }
        assert!(
            document
                .find_section("options", "")
                .is_some_and(|s| s.lines().next().is_none())
        );
        assert_eq!(
            document
                .find_section("server", "a")
                .and_then(|s| s.find_option("enabled"))
                .map(ConfigOption::raw_value),
            Some("true")
        );
    }

    #[test]
    fn unreadable_sections_are_rejected() {
        let mut document = Document::new();

        assert!(matches!(
            document.get_section("", "x"),
            Err(EntryError::InvalidKind { .. })
        ));
        assert!(matches!(
            document.get_section("irc server", ""),
            Err(EntryError::InvalidKind { .. })
        ));
        assert!(matches!(
            document.get_section("s", "a]b"),
            Err(EntryError::InvalidSectionName { .. })
        ));
        assert!(matches!(
            document.get_section("s", "a\nb"),
            Err(EntryError::MultiLine { .. })
        ));
        assert!(document.sections().is_empty());
    }

    #[test]
    fn empty_document_serializes_to_nothing() {
        assert_eq!(Document::new().serialize(), "");
    }
}
