use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{ConversionError, EntryError};
use crate::util::{is_name, is_single_line, string_to_bool, string_to_int};

/// A `[type name]` block and the lines under it, kept in the order they were created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: usize,
    kind: String,
    name: String,
    next_id: usize,
    // Lines in id order. Overwriting an option leaves its old slot vacant.
    slots: Vec<Slot>,
    // Option key -> (position in `slots`, option).
    options: HashMap<String, (usize, ConfigOption)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Option(String),
    Comment(Comment),
    Vacant,
}

impl Section {
    #[must_use]
    pub(crate) fn new(id: usize, kind: &str, name: &str) -> Self {
        Self {
            id,
            kind: section_kind(kind),
            name: name.trim().to_owned(),
            next_id: 0,
            slots: Vec::with_capacity(16),
            options: HashMap::with_capacity(16),
        }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// The first word of the header, lowercased.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Everything after the type in the header. Empty when the header had no name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options and comments in creation order.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        self.slots.iter().filter_map(move |slot| match slot {
            Slot::Option(key) => self.options.get(key).map(|(_, option)| Line::Option(option)),
            Slot::Comment(comment) => Some(Line::Comment(comment)),
            Slot::Vacant => None,
        })
    }

    pub fn options(&self) -> impl Iterator<Item = &ConfigOption> {
        self.lines().filter_map(|line| match line {
            Line::Option(option) => Some(option),
            Line::Comment(_) => None,
        })
    }

    /// Look up an option without creating it.
    #[must_use]
    pub fn find_option(&self, name: &str) -> Option<&ConfigOption> {
        self.options
            .get(&option_key(name))
            .map(|(_, option)| option)
    }

    /// Store an option, replacing any earlier option with the same key. The replacement gets a
    /// fresh id, so it serializes where it was last written.
    ///
    /// # Errors
    ///
    /// Fails if the name is not a run of letters, digits, `_` or `-`, or the value contains a
    /// line break.
    pub fn add_option(&mut self, name: &str, value: &str) -> Result<(), EntryError> {
        check_option(name, value)?;
        self.insert_option(name, value);
        Ok(())
    }

    pub(crate) fn insert_option(&mut self, name: &str, value: &str) {
        let key = option_key(name);
        let option = ConfigOption::new(self.take_id(), &key, value);

        self.slots.push(Slot::Option(key.clone()));
        if let Some((old, _)) = self.options.insert(key, (self.slots.len() - 1, option)) {
            self.slots[old] = Slot::Vacant;
        }
    }

    /// Append a comment line. A `#` is put in front of text that does not start with one.
    ///
    /// # Errors
    ///
    /// Fails if the text contains a line break.
    pub fn add_comment(&mut self, line: &str) -> Result<(), EntryError> {
        check_single_line(line)?;

        let line = line.trim();
        let line = if line.starts_with('#') {
            line.to_owned()
        } else if line.is_empty() {
            "#".to_owned()
        } else {
            format!("# {line}")
        };
        self.insert_comment(&line);
        Ok(())
    }

    pub(crate) fn insert_comment(&mut self, line: &str) {
        let comment = Comment::new(self.take_id(), line);
        self.slots.push(Slot::Comment(comment));
    }

    /// Get an option, creating it from `default_value` if it does not exist yet. An existing
    /// option keeps its value; only the default and type are updated, and only by the arguments
    /// that are `Some`.
    ///
    /// # Errors
    ///
    /// Fails on the same names and values as [`Section::add_option`].
    pub fn get_option(
        &mut self,
        name: &str,
        default_value: Option<&str>,
        option_type: Option<OptionType>,
    ) -> Result<&mut ConfigOption, EntryError> {
        let value = default_value.unwrap_or_default();
        check_option(name, value)?;

        let (_, option) = match self.options.entry(option_key(name)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let id = self.next_id;
                self.next_id += 1;

                let option = ConfigOption::new(id, entry.key(), value);
                self.slots.push(Slot::Option(entry.key().clone()));
                entry.insert((self.slots.len() - 1, option))
            }
        };

        option.set_default_value(default_value, option_type);
        Ok(option)
    }

    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    fn take_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            writeln!(f, "[{}]", self.kind)?;
        } else {
            writeln!(f, "[{} {}]", self.kind, self.name)?;
        }

        for line in self.lines() {
            if let Some(text) = line.serialize_line() {
                writeln!(f, "{text}")?;
            }
        }

        Ok(())
    }
}

pub(crate) fn section_kind(kind: &str) -> String {
    kind.trim().to_lowercase()
}

fn option_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn check_option(name: &str, value: &str) -> Result<(), EntryError> {
    if !is_name(name.trim()) {
        return Err(EntryError::InvalidOptionName {
            name: name.to_owned(),
        });
    }
    check_single_line(value)
}

pub(crate) fn check_single_line(text: &str) -> Result<(), EntryError> {
    if is_single_line(text) {
        Ok(())
    } else {
        Err(EntryError::MultiLine {
            text: text.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Option(&'a ConfigOption),
    Comment(&'a Comment),
}

impl Line<'_> {
    #[must_use]
    pub fn id(self) -> usize {
        match self {
            Self::Option(option) => option.id(),
            Self::Comment(comment) => comment.id(),
        }
    }

    /// The text written back for this line, or `None` if it is left out.
    #[must_use]
    pub fn serialize_line(self) -> Option<String> {
        match self {
            Self::Option(option) => option.serialize_line(),
            Self::Comment(comment) => Some(comment.serialize_line().to_owned()),
        }
    }
}

/// How an option's stored string is read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Bool,
    Int,
    Text,
}

impl FromStr for OptionType {
    type Err = Infallible;

    /// Unknown type names read as [`OptionType::Text`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "bool" => Self::Bool,
            "int" => Self::Int,
            _ => Self::Text,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl TypedValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Self::Int(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOption {
    id: usize,
    name: String,
    value: String,
    default_value: Option<String>,
    option_type: Option<OptionType>,
}

impl ConfigOption {
    #[must_use]
    pub(crate) fn new(id: usize, name: &str, value: &str) -> Self {
        Self {
            id,
            name: name.trim().to_owned(),
            value: value.trim().to_owned(),
            default_value: None,
            option_type: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored string, unconverted.
    #[must_use]
    pub fn raw_value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    #[must_use]
    pub fn option_type(&self) -> Option<OptionType> {
        self.option_type
    }

    /// # Errors
    ///
    /// Fails if the value contains a line break; the stored value is left as it was.
    pub fn set_value(&mut self, value: &str) -> Result<(), EntryError> {
        check_single_line(value)?;
        self.value = value.trim().to_owned();
        Ok(())
    }

    /// Fill in whichever of the default and type are given, leaving the others as they are.
    pub fn set_default_value(
        &mut self,
        default_value: Option<&str>,
        option_type: Option<OptionType>,
    ) {
        if let Some(default_value) = default_value {
            self.default_value = Some(default_value.to_owned());
        }
        if let Some(option_type) = option_type {
            self.option_type = Some(option_type);
        }
    }

    /// The stored string read as the option's type.
    ///
    /// A string that does not convert falls back to the default value, and then to `false` or
    /// `0`. Options without a type are returned as text.
    #[must_use]
    pub fn value(&self) -> TypedValue {
        convert(self.option_type, &self.value, self.default_value.as_deref())
    }

    /// `name = value`, or `None` when the value is the same as the default once both are
    /// converted to the option's type.
    #[must_use]
    pub fn serialize_line(&self) -> Option<String> {
        if let Some(default_value) = self.default_value.as_deref() {
            let default = convert(self.option_type, default_value, Some(default_value));
            if self.value() == default {
                return None;
            }
        }

        Some(format!("{} = {}", self.name, self.value))
    }
}

fn convert(
    option_type: Option<OptionType>,
    value: &str,
    default_value: Option<&str>,
) -> TypedValue {
    match option_type {
        Some(OptionType::Bool) => {
            TypedValue::Bool(with_fallback(value, default_value, string_to_bool))
        }
        Some(OptionType::Int) => {
            TypedValue::Int(with_fallback(value, default_value, string_to_int))
        }
        Some(OptionType::Text) | None => TypedValue::Text(value.to_owned()),
    }
}

fn with_fallback<T>(
    value: &str,
    default_value: Option<&str>,
    parse: fn(&str) -> Result<T, ConversionError>,
) -> T
where
    T: Default,
{
    match parse(value) {
        Ok(v) => v,
        Err(err) => {
            debug!("{err}, using the default value");
            default_value
                .and_then(|d| parse(d).ok())
                .unwrap_or_default()
        }
    }
}

/// A `#` line, kept for writing back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: usize,
    name: String,
    line: String,
}

impl Comment {
    #[must_use]
    pub(crate) fn new(id: usize, line: &str) -> Self {
        Self {
            id,
            // Contains a space, which option keys never do once parsed.
            name: format!(" comment {id}"),
            line: line.to_owned(),
        }
    }

    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn serialize_line(&self) -> &str {
        &self.line
    }
}
