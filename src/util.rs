use crate::error::ConversionError;

const TRUTHY: &[&str] = &["true", "yes", "on", "1", "enabled"];
const FALSY: &[&str] = &["false", "no", "off", "0", "disabled"];

/// Read a boolean token, ignoring case and surrounding whitespace.
pub fn string_to_bool(value: &str) -> Result<bool, ConversionError> {
    let token = value.trim();

    if TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        Ok(true)
    } else if FALSY.iter().any(|f| f.eq_ignore_ascii_case(token)) {
        Ok(false)
    } else {
        Err(ConversionError::NotBool {
            value: value.to_owned(),
        })
    }
}

/// Read a signed decimal integer, ignoring surrounding whitespace.
pub fn string_to_int(value: &str) -> Result<i64, ConversionError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConversionError::NotInt {
            value: value.to_owned(),
        })
}

/// Section and option names are word characters plus hyphens.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// A non-empty run of name characters.
pub fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_name_char)
}

pub fn is_single_line(s: &str) -> bool {
    !s.contains(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_tokens_ignore_case() {
        for token in ["true", "TRUE", " Yes ", "on", "1", "Enabled"] {
            assert_eq!(string_to_bool(token), Ok(true), "{token:?}");
        }

        for token in ["false", "No", "OFF", "0", "disabled"] {
            assert_eq!(string_to_bool(token), Ok(false), "{token:?}");
        }
    }

    #[test]
    fn unknown_bool_token() {
        assert!(matches!(
            string_to_bool("maybe"),
            Err(ConversionError::NotBool { .. })
        ));
        assert!(string_to_bool("").is_err());
    }

    #[test]
    fn int_parsing() {
        assert_eq!(string_to_int(" 42 "), Ok(42));
        assert_eq!(string_to_int("-7"), Ok(-7));
        assert_eq!(string_to_int("+3"), Ok(3));
        assert!(matches!(
            string_to_int("12abc"),
            Err(ConversionError::NotInt { .. })
        ));
    }

    #[test]
    fn name_chars() {
        assert!("max-size_2".chars().all(is_name_char));
        assert!(!is_name_char(' '));
        assert!(!is_name_char('='));
        assert!(!is_name_char('é'));

        assert!(is_name("irc-server"));
        assert!(!is_name(""));
        assert!(!is_name("max downloads"));
    }

    #[test]
    fn single_line() {
        assert!(is_single_line("a = b"));
        assert!(!is_single_line("a\nb"));
        assert!(!is_single_line("a\r"));
    }
}
