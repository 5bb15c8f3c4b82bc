//! URL-encoded form parsing
//!
//! Decodes `application/x-www-form-urlencoded` request bodies.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("form body is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid percent-encoding in field '{0}'")]
    InvalidEncoding(String),

    #[error("missing form field '{0}'")]
    MissingField(&'static str),
}

/// Parse a urlencoded body into field/value pairs
///
/// `+` decodes to a space. When a key repeats, the first value wins.
pub fn parse_urlencoded(body: &[u8]) -> Result<HashMap<String, String>, FormError> {
    let raw = std::str::from_utf8(body).map_err(|_| FormError::InvalidUtf8)?;
    let mut fields = HashMap::new();

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key)?;
        let value = decode_component(value).map_err(|_| FormError::InvalidEncoding(key.clone()))?;
        fields.entry(key).or_insert(value);
    }

    Ok(fields)
}

fn decode_component(component: &str) -> Result<String, FormError> {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| FormError::InvalidEncoding(component.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_plus_and_percent() {
        let fields = parse_urlencoded(b"name=Acme+Corp&description=50%25+off%21").unwrap();
        assert_eq!(fields["name"], "Acme Corp");
        assert_eq!(fields["description"], "50% off!");
    }

    #[test]
    fn test_first_value_wins_and_bare_keys() {
        let fields = parse_urlencoded(b"name=one&name=two&flag&&").unwrap();
        assert_eq!(fields["name"], "one");
        assert_eq!(fields["flag"], "");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        assert_eq!(parse_urlencoded(&[0xff, 0xfe]), Err(FormError::InvalidUtf8));
        assert!(matches!(
            parse_urlencoded(b"name=%FF"),
            Err(FormError::InvalidEncoding(_))
        ));
    }
}
