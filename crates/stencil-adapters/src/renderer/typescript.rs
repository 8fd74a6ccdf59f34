//! TypeScript spelling of registry types and literals.

use stencil_core::domain::SchemaType;

/// Type of a field in the API's JSON response.
pub fn response_type(schema: SchemaType) -> &'static str {
    match schema {
        SchemaType::Integer => "number",
        SchemaType::Boolean => "boolean",
        SchemaType::Object => "Record<string, unknown>",
        // Decimals are serialised as strings to keep their precision.
        SchemaType::String
        | SchemaType::Decimal
        | SchemaType::Date
        | SchemaType::DateTime
        | SchemaType::Email
        | SchemaType::Url
        | SchemaType::Uuid
        | SchemaType::FilePath => "string",
    }
}

/// Double-quoted TypeScript string literal.
pub fn string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Text placed between JSX tags; braces and angle brackets are escaped.
pub fn jsx_text(value: &str) -> String {
    value
        .replace('{', "&#123;")
        .replace('}', "&#125;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
