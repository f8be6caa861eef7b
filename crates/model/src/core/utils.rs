const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Hex `bytea` literal (`\x0aff...`).
pub fn encode_bytea(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + 2 * bytes.len());
    out.push_str("\\x");
    for b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Renders a PostgreSQL array literal with every item double-quoted:
/// `{"a","b \"c\""}`.
pub fn encode_text_array_literal<S: AsRef<str>>(values: &[S]) -> String {
    let mut literal = String::from('{');
    for (idx, value) in values.iter().enumerate() {
        if idx > 0 {
            literal.push(',');
        }
        quote_array_item(&mut literal, value.as_ref());
    }
    literal.push('}');
    literal
}

/// Integer arrays need no item quoting: `{1,2,3}`.
pub fn encode_int_array_literal(values: &[i64]) -> String {
    let items = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{items}}}")
}

fn quote_array_item(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bytea() {
        assert_eq!(encode_bytea(&[0x00, 0x0a, 0xff]), "\\x000aff");
        assert_eq!(encode_bytea(&[]), "\\x");
    }

    #[test]
    fn test_text_array_literal_escapes_items() {
        assert_eq!(encode_text_array_literal(&["a", "b"]), r#"{"a","b"}"#);
        assert_eq!(
            encode_text_array_literal(&[r#"say "hi""#, r"back\slash"]),
            r#"{"say \"hi\"","back\\slash"}"#
        );
        assert_eq!(encode_text_array_literal::<&str>(&[]), "{}");
    }

    #[test]
    fn test_int_array_literal() {
        assert_eq!(encode_int_array_literal(&[1, -2, 3]), "{1,-2,3}");
        assert_eq!(encode_int_array_literal(&[]), "{}");
    }
}
