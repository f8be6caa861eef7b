/// What the CSV writer makes of the empty-string marker.
const ESCAPED_MARKER: &str = "\"\"\"\"\"\"";

/// What the CSV writer makes of a record whose only field is empty.
const QUOTED_EMPTY: &str = "\"\"";

/// PostgreSQL's end-of-data line.
const END_OF_DATA: &str = "\\.";

/// Replaces every field that is exactly six double quotes with `""`, the
/// quoted empty field PostgreSQL reads as an empty string.
///
/// The CSV writer also quotes an empty field when it is the only one in its
/// record. Cells only come out empty for NULL, so such a line is emptied
/// again and stays NULL.
///
/// Fields are split on commas and newlines outside quotes, so a quoted cell
/// spanning several lines is one field and quote runs inside longer cells
/// are left alone.
pub fn fix_empty_string_marks(payload: &str) -> String {
    if !payload.contains(QUOTED_EMPTY) {
        return payload.to_string();
    }

    let bytes = payload.as_bytes();
    let mut out = String::with_capacity(payload.len());
    let mut in_quotes = false;
    let mut start = 0;
    let mut line_start = true;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b',' | b'\n' if !in_quotes => {
                let whole_line = line_start && b == b'\n';
                push_field(&mut out, &payload[start..i], whole_line);
                out.push(b as char);
                start = i + 1;
                line_start = b == b'\n';
            }
            _ => {}
        }
    }
    push_field(&mut out, &payload[start..], line_start);

    out
}

fn push_field(out: &mut String, field: &str, whole_line: bool) {
    match field {
        ESCAPED_MARKER => out.push_str(QUOTED_EMPTY),
        QUOTED_EMPTY if whole_line => {}
        _ => out.push_str(field),
    }
}

/// Quotes an unquoted `\.` that is alone on its line. Servers before
/// PostgreSQL 18 read that line as the end of the data and drop every row
/// after it; the quoted form loads as the two characters.
pub fn quote_end_of_data_marks(payload: &str) -> String {
    if !payload.contains(END_OF_DATA) {
        return payload.to_string();
    }

    let bytes = payload.as_bytes();
    let mut out = String::with_capacity(payload.len() + 2);
    let mut in_quotes = false;
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'"' => in_quotes = !in_quotes,
            b'\n' if !in_quotes => {
                push_line(&mut out, &payload[start..i]);
                out.push('\n');
                start = i + 1;
            }
            _ => {}
        }
    }
    push_line(&mut out, &payload[start..]);

    out
}

fn push_line(out: &mut String, line: &str) {
    if line == END_OF_DATA {
        out.push('"');
        out.push_str(END_OF_DATA);
        out.push('"');
    } else {
        out.push_str(line);
    }
}
