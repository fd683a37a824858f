use serde_json::{Map, Value};

/// Render rows as CSV. The header is the key order of the first row; a field
/// containing a comma, quote, or newline is quoted with embedded quotes
/// doubled. Rows are joined by `\n`.
pub fn to_csv(rows: &[Map<String, Value>]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns: Vec<&String> = first.keys().collect();

    let mut out = String::new();
    out.push_str(
        &columns
            .iter()
            .map(|c| escape_field(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        out.push('\n');
        let line = columns
            .iter()
            .map(|c| escape_value(row.get(c.as_str())))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
    }
    out
}

fn escape_value(v: Option<&Value>) -> String {
    let s = match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    escape_field(&s)
}

fn escape_field(s: &str) -> String {
    let escaped = s.replace('"', "\"\"");
    if escaped.contains(',') || escaped.contains('"') || escaped.contains('\n') {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

/// Parse CSV text back into rows of string fields. Understands the quoting
/// produced by [`to_csv`]; used to verify round-trips.
pub fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut field)),
                '\n' => {
                    fields.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut fields));
                }
                _ => field.push(c),
            }
        }
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        rows.push(fields);
    }
    rows
}
