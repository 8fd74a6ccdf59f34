//! Python spelling of registry types, literals and imports.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use stencil_core::domain::{FieldKind, SampleLiteral, SchemaType, StorageType};

use super::writer::CodeWriter;

/// Annotation used on SQLAlchemy `Mapped[...]` attributes.
pub fn model_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::ShortText
        | FieldKind::LongText
        | FieldKind::Email
        | FieldKind::Url
        | FieldKind::FileReference => "str",
        FieldKind::Integer => "int",
        FieldKind::Decimal => "Decimal",
        FieldKind::Boolean => "bool",
        FieldKind::Date => "date",
        FieldKind::DateTime => "datetime",
        FieldKind::StructuredData => "dict[str, Any]",
        FieldKind::Identifier => "uuid.UUID",
    }
}

/// Annotation used on Pydantic schema attributes.
pub fn schema_type(schema: SchemaType) -> &'static str {
    match schema {
        SchemaType::String | SchemaType::FilePath => "str",
        SchemaType::Integer => "int",
        SchemaType::Decimal => "Decimal",
        SchemaType::Boolean => "bool",
        SchemaType::Date => "date",
        SchemaType::DateTime => "datetime",
        SchemaType::Email => "EmailStr",
        SchemaType::Url => "HttpUrl",
        SchemaType::Object => "dict[str, Any]",
        SchemaType::Uuid => "uuid.UUID",
    }
}

/// SQLAlchemy column type expression and the name it imports.
pub fn column_type(storage: StorageType) -> (String, &'static str) {
    match storage {
        StorageType::VarChar(len) => (format!("String({len})"), "String"),
        StorageType::Text => ("Text".into(), "Text"),
        StorageType::Integer => ("Integer".into(), "Integer"),
        StorageType::Numeric { precision, scale } => {
            (format!("Numeric({precision}, {scale})"), "Numeric")
        }
        StorageType::Boolean => ("Boolean".into(), "Boolean"),
        StorageType::Date => ("Date".into(), "Date"),
        StorageType::Timestamp => ("DateTime".into(), "DateTime"),
        StorageType::Json => ("JSON".into(), "JSON"),
        StorageType::Uuid => ("Uuid".into(), "Uuid"),
    }
}

/// Double-quoted Python string literal.
pub fn string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Python expression for a JSON value (`null` → `None`, `true` → `True`).
pub fn value(value: &Value) -> String {
    match value {
        Value::Null => "None".into(),
        Value::Bool(true) => "True".into(),
        Value::Bool(false) => "False".into(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(self::value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", string(k), self::value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// JSON-compatible Python literal for a request payload. Decimals travel as
/// strings so no precision is lost.
pub fn payload_literal(sample: &SampleLiteral) -> String {
    match sample {
        SampleLiteral::Text(s) | SampleLiteral::Decimal(s) => string(s),
        SampleLiteral::Integer(i) => i.to_string(),
        SampleLiteral::Boolean(true) => "True".into(),
        SampleLiteral::Boolean(false) => "False".into(),
        SampleLiteral::Object(pairs) => {
            let entries: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{}: {}", string(k), string(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

// ── Imports ──────────────────────────────────────────────────────────────────

/// Import sections, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Group {
    Stdlib,
    ThirdParty,
    Local,
}

#[derive(Debug, Default)]
struct Section {
    modules: BTreeSet<String>,
    names: BTreeMap<String, BTreeSet<String>>,
}

/// Collects imports and writes them sorted, one section per [`Group`].
#[derive(Debug, Default)]
pub struct Imports {
    sections: BTreeMap<Group, Section>,
}

impl Imports {
    pub fn new() -> Self {
        Self::default()
    }

    /// `import <module>`
    pub fn module(&mut self, group: Group, module: &str) -> &mut Self {
        self.sections
            .entry(group)
            .or_default()
            .modules
            .insert(module.to_string());
        self
    }

    /// `from <module> import <name>`
    pub fn from(&mut self, group: Group, module: &str, name: &str) -> &mut Self {
        self.sections
            .entry(group)
            .or_default()
            .names
            .entry(module.to_string())
            .or_default()
            .insert(name.to_string());
        self
    }

    /// Standard-library imports an annotation needs.
    pub fn annotation(&mut self, annotation: &str) -> &mut Self {
        if annotation.contains("Decimal") {
            self.from(Group::Stdlib, "decimal", "Decimal");
        }
        if annotation.contains("datetime") {
            self.from(Group::Stdlib, "datetime", "datetime");
        } else if annotation.contains("date") {
            self.from(Group::Stdlib, "datetime", "date");
        }
        if annotation.contains("Any") {
            self.from(Group::Stdlib, "typing", "Any");
        }
        if annotation.contains("uuid.") {
            self.module(Group::Stdlib, "uuid");
        }
        self
    }

    pub fn write(&self, w: &mut CodeWriter) {
        for section in self.sections.values() {
            w.blank();
            for module in &section.modules {
                w.line(format!("import {module}"));
            }
            for (module, names) in &section.names {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                w.line(format!("from {module} import {}", names.join(", ")));
            }
        }
    }
}

/// Module docstring followed by the import block.
pub fn preamble(w: &mut CodeWriter, docstring: &str, imports: &Imports) {
    w.line(format!("\"\"\"{docstring}\"\"\""));
    imports.write(w);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_escapes_quotes_and_backslashes() {
        assert_eq!(string(r#"a "b" \c"#), r#""a \"b\" \\c""#);
        assert_eq!(string("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn json_values_become_python_expressions() {
        assert_eq!(value(&json!(null)), "None");
        assert_eq!(value(&json!(true)), "True");
        assert_eq!(value(&json!(3.5)), "3.5");
        assert_eq!(value(&json!(["a", false])), "[\"a\", False]");
        assert_eq!(value(&json!({"k": 1})), "{\"k\": 1}");
    }

    #[test]
    fn imports_are_grouped_and_sorted() {
        let mut imports = Imports::new();
        imports
            .from(Group::ThirdParty, "sqlalchemy", "String")
            .from(Group::ThirdParty, "sqlalchemy", "Integer")
            .annotation("Decimal | None")
            .annotation("uuid.UUID")
            .from(Group::Local, "shops.database", "Base");

        let mut w = CodeWriter::python();
        w.line("\"\"\"Doc.\"\"\"");
        imports.write(&mut w);
        assert_eq!(
            w.finish(),
            "\"\"\"Doc.\"\"\"\n\nimport uuid\nfrom decimal import Decimal\n\n\
             from sqlalchemy import Integer, String\n\nfrom shops.database import Base\n"
        );
    }

    #[test]
    fn date_and_datetime_are_distinguished() {
        let mut imports = Imports::new();
        imports.annotation("date | None");
        let mut w = CodeWriter::python();
        imports.write(&mut w);
        assert_eq!(w.finish(), "from datetime import date\n");
    }
}
