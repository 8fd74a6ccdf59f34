//! React list and form components.

use serde_json::Value;
use stencil_core::{
    application::ports::RenderInput,
    domain::{
        ArtifactFile, ArtifactKind, DomainError, FieldKind, UiWidget, naming,
        registry::{self, kind_def},
    },
};

use super::{
    KeyInfo,
    typescript::{self as ts, jsx_text},
    writer::CodeWriter,
};

/// One editable input of the form.
struct FormInput {
    name: String,
    label: String,
    kind: FieldKind,
    widget: UiWidget,
    required: bool,
    default: Option<Value>,
    max_length: Option<u32>,
    min: Option<f64>,
    max: Option<f64>,
}

impl FormInput {
    fn value_type(&self) -> &'static str {
        if self.widget == UiWidget::Checkbox {
            "boolean"
        } else {
            "string"
        }
    }

    fn initial(&self) -> String {
        match (&self.default, self.widget) {
            (Some(Value::Bool(b)), UiWidget::Checkbox) => b.to_string(),
            (_, UiWidget::Checkbox) => "false".into(),
            (Some(Value::String(s)), _) => ts::string(s),
            (Some(Value::Null) | None, _) => "\"\"".into(),
            (Some(other), _) => ts::string(&other.to_string()),
        }
    }

    /// Expression converting the form value to its JSON payload value.
    fn payload(&self) -> String {
        let value = format!("values.{}", self.name);
        let converted = match self.widget {
            UiWidget::Checkbox => return value,
            UiWidget::Number if self.kind == FieldKind::Integer => format!("Number({value})"),
            UiWidget::JsonEditor => format!("JSON.parse({value})"),
            _ => value.clone(),
        };
        if self.required && converted == value {
            value
        } else {
            format!("{value} === \"\" ? null : {converted}")
        }
    }

    fn write(&self, w: &mut CodeWriter) {
        let name = &self.name;
        w.braced("<label>", "</label>", |w| {
            w.line(jsx_text(&self.label));
            match self.widget {
                UiWidget::TextArea | UiWidget::JsonEditor => {
                    w.line("<textarea");
                    w.indent();
                    w.line(format!("value={{values.{name}}}"));
                    w.line(format!(
                        "onChange={{(event) => update(\"{name}\", event.target.value)}}"
                    ));
                    if self.required {
                        w.line("required");
                    }
                    if let Some(max) = self.max_length {
                        w.line(format!("maxLength={{{max}}}"));
                    }
                    w.dedent();
                    w.line("/>");
                }
                UiWidget::Checkbox => {
                    w.line("<input");
                    w.indent();
                    w.line("type=\"checkbox\"");
                    w.line(format!("checked={{values.{name}}}"));
                    w.line(format!(
                        "onChange={{(event) => update(\"{name}\", event.target.checked)}}"
                    ));
                    w.dedent();
                    w.line("/>");
                }
                UiWidget::File => {
                    w.line("<input");
                    w.indent();
                    w.line("type=\"file\"");
                    w.line(format!(
                        "onChange={{(event) => update(\"{name}\", event.target.files?.[0]?.name ?? \"\")}}"
                    ));
                    if self.required {
                        w.line("required");
                    }
                    w.dedent();
                    w.line("/>");
                }
                widget => {
                    let input_type = widget.input_type().unwrap_or("text");
                    w.line("<input");
                    w.indent();
                    w.line(format!("type=\"{input_type}\""));
                    w.line(format!("value={{values.{name}}}"));
                    w.line(format!(
                        "onChange={{(event) => update(\"{name}\", event.target.value)}}"
                    ));
                    if self.required {
                        w.line("required");
                    }
                    if let Some(max) = self.max_length {
                        w.line(format!("maxLength={{{max}}}"));
                    }
                    if let Some(min) = self.min {
                        w.line(format!("min={{{min}}}"));
                    }
                    if let Some(max) = self.max {
                        w.line(format!("max={{{max}}}"));
                    }
                    if widget == UiWidget::DecimalNumber {
                        w.line("step=\"any\"");
                    }
                    w.dedent();
                    w.line("/>");
                }
            }
        });
    }
}

/// Renders `<C>List.tsx` and `<C>Form.tsx`, in that order.
pub fn render(input: &RenderInput<'_>) -> Result<Vec<ArtifactFile>, DomainError> {
    let RenderInput {
        entity,
        relations,
        registry: types,
        layout,
        ..
    } = *input;
    let paths = layout.paths(&entity.name, ArtifactKind::Ui);
    let key = KeyInfo::of(entity, types)?;
    let class = types.class_name(entity);
    let api_url = ts::string(&format!("/{}", types.route_segment(entity)));

    // ── Response shape ──
    let mut columns = vec![(
        key.name.to_string(),
        naming::to_title_case(key.name),
        ts::response_type(kind_def(key.kind).schema).to_string(),
        key.kind,
    )];
    for field in entity.data_fields() {
        let kind = types.kind_of(entity, field)?;
        let mut ty = ts::response_type(types.schema_type(entity, field)?).to_string();
        if !field.required {
            ty.push_str(" | null");
        }
        columns.push((field.name.clone(), naming::to_title_case(&field.name), ty, kind));
    }
    for fk in relations.added_columns() {
        let kind = fk.references.kind.unwrap_or(FieldKind::Integer);
        let ty = format!("{} | null", ts::response_type(kind_def(kind).schema));
        columns.push((fk.column.clone(), naming::to_title_case(&fk.column), ty, kind));
    }

    // ── Form inputs ──
    let mut inputs = Vec::new();
    let editable_key = key.field.filter(|_| !key.generated);
    for field in editable_key.into_iter().chain(entity.data_fields()) {
        let kind = types.kind_of(entity, field)?;
        let widget = types.ui_input_kind(entity, field)?;
        if widget == UiWidget::Hidden {
            continue;
        }
        let text = field.field_type.text_constraints();
        let numeric = field.field_type.numeric_constraints();
        inputs.push(FormInput {
            name: field.name.clone(),
            label: naming::to_title_case(&field.name),
            kind,
            widget,
            required: field.required || editable_key.is_some_and(|k| k.name == field.name),
            default: field.default_value.clone(),
            max_length: text.and_then(|c| c.max_length).or_else(|| {
                (kind == FieldKind::ShortText).then(|| types.short_text_length())
            }),
            min: numeric.and_then(|c| c.min),
            max: numeric.and_then(|c| c.max),
        });
    }
    for fk in relations.added_columns() {
        let kind = fk.references.kind.unwrap_or(FieldKind::Integer);
        let widget = registry::kind_def(kind).widget;
        if widget == UiWidget::Hidden {
            continue;
        }
        inputs.push(FormInput {
            name: fk.column.clone(),
            label: naming::to_title_case(&fk.column),
            kind,
            widget,
            required: false,
            default: None,
            max_length: None,
            min: None,
            max: None,
        });
    }

    let list = render_list(&class, &api_url, &key, &columns, types.display_label_plural(entity));
    let form = render_form(&class, &api_url, &inputs, types.display_label(entity));

    let mut paths = paths.into_iter();
    Ok(vec![
        ArtifactFile::new(paths.next().unwrap_or_default(), list),
        ArtifactFile::new(paths.next().unwrap_or_default(), form),
    ])
}

type Column = (String, String, String, FieldKind);

fn render_list(
    class: &str,
    api_url: &str,
    key: &KeyInfo<'_>,
    columns: &[Column],
    heading: String,
) -> String {
    let mut w = CodeWriter::typescript();
    w.line("import { useEffect, useState } from \"react\";");
    w.blank();
    w.braced(format!("export interface {class} {{"), "}", |w| {
        w.lines(columns.iter().map(|(name, _, ty, _)| format!("{name}: {ty};")));
    });
    w.blank();
    w.line(format!("const API_URL = {api_url};"));
    w.blank();

    w.braced(format!("export function {class}List() {{"), "}", |w| {
        w.line(format!("const [rows, setRows] = useState<{class}[]>([]);"));
        w.line("const [error, setError] = useState<string | null>(null);");
        w.blank();
        w.braced("useEffect(() => {", "}, []);", |w| {
            w.line("fetch(`${API_URL}/`)");
            w.indent();
            w.braced(".then((response) => {", "})", |w| {
                w.braced("if (!response.ok) {", "}", |w| {
                    w.line("throw new Error(`Request failed with status ${response.status}`);");
                });
                w.line(format!("return response.json() as Promise<{class}[]>;"));
            });
            w.line(".then(setRows)");
            w.line(".catch((err: Error) => setError(err.message));");
            w.dedent();
        });
        w.blank();
        w.braced("if (error) {", "}", |w| {
            w.line("return <p role=\"alert\">{error}</p>;");
        });
        w.blank();
        w.braced("return (", ");", |w| {
            w.braced("<table>", "</table>", |w| {
                w.line(format!("<caption>{}</caption>", jsx_text(&heading)));
                w.braced("<thead>", "</thead>", |w| {
                    w.braced("<tr>", "</tr>", |w| {
                        w.lines(
                            columns
                                .iter()
                                .map(|(_, label, _, _)| format!("<th>{}</th>", jsx_text(label))),
                        );
                    });
                });
                w.braced("<tbody>", "</tbody>", |w| {
                    w.braced("{rows.map((row) => (", "))}", |w| {
                        w.braced(
                            format!("<tr key={{String(row.{})}}>", key.name),
                            "</tr>",
                            |w| {
                                w.lines(columns.iter().map(|(name, _, _, kind)| cell(name, *kind)));
                            },
                        );
                    });
                });
            });
        });
    });
    w.blank();
    w.line(format!("export default {class}List;"));
    w.finish()
}

fn cell(name: &str, kind: FieldKind) -> String {
    match kind {
        FieldKind::Boolean => format!("<td>{{row.{name} ? \"Yes\" : \"No\"}}</td>"),
        FieldKind::StructuredData => format!("<td>{{JSON.stringify(row.{name})}}</td>"),
        _ => format!("<td>{{row.{name} ?? \"\"}}</td>"),
    }
}

fn render_form(class: &str, api_url: &str, inputs: &[FormInput], label: String) -> String {
    let values = format!("{class}FormValues");
    let props = format!("{class}FormProps");

    let mut w = CodeWriter::typescript();
    w.line("import { type FormEvent, useState } from \"react\";");
    w.blank();
    w.line(format!("import type {{ {class} }} from \"./{class}List\";"));
    w.blank();
    w.line(format!("const API_URL = {api_url};"));
    w.blank();
    w.braced(format!("type {values} = {{"), "};", |w| {
        w.lines(
            inputs
                .iter()
                .map(|input| format!("{}: {};", input.name, input.value_type())),
        );
    });
    w.blank();
    w.braced(format!("const INITIAL_STATE: {values} = {{"), "};", |w| {
        w.lines(
            inputs
                .iter()
                .map(|input| format!("{}: {},", input.name, input.initial())),
        );
    });
    w.blank();
    w.braced(format!("interface {props} {{"), "}", |w| {
        w.line(format!("onCreated?: (record: {class}) => void;"));
    });
    w.blank();
    w.braced(
        format!("function toPayload(values: {values}): Record<string, unknown> {{"),
        "}",
        |w| {
            if inputs.is_empty() {
                w.line("void values;");
                w.line("return {};");
            } else {
                w.braced("return {", "};", |w| {
                    w.lines(
                        inputs
                            .iter()
                            .map(|input| format!("{}: {},", input.name, input.payload())),
                    );
                });
            }
        },
    );
    w.blank();

    w.braced(
        format!("export function {class}Form({{ onCreated }}: {props}) {{"),
        "}",
        |w| {
            w.line(format!(
                "const [values, setValues] = useState<{values}>(INITIAL_STATE);"
            ));
            w.line("const [error, setError] = useState<string | null>(null);");
            w.blank();
            w.braced(
                format!(
                    "function update<K extends keyof {values}>(name: K, value: {values}[K]) {{"
                ),
                "}",
                |w| {
                    w.line("setValues((current) => ({ ...current, [name]: value }));");
                },
            );
            w.blank();
            w.braced(
                "async function handleSubmit(event: FormEvent<HTMLFormElement>) {",
                "}",
                |w| {
                    w.line("event.preventDefault();");
                    w.line("setError(null);");
                    w.braced("try {", "} catch (err) {", |w| {
                        w.braced("const response = await fetch(`${API_URL}/`, {", "});", |w| {
                            w.line("method: \"POST\",");
                            w.line("headers: { \"Content-Type\": \"application/json\" },");
                            w.line("body: JSON.stringify(toPayload(values)),");
                        });
                        w.braced("if (!response.ok) {", "}", |w| {
                            w.line(
                                "throw new Error(`Request failed with status ${response.status}`);",
                            );
                        });
                        w.line(format!("const created = (await response.json()) as {class};"));
                        w.line("setValues(INITIAL_STATE);");
                        w.line("onCreated?.(created);");
                    });
                    w.indent();
                    w.line("setError(err instanceof Error ? err.message : String(err));");
                    w.dedent();
                    w.line("}");
                },
            );
            w.blank();
            w.braced("return (", ");", |w| {
                w.braced("<form onSubmit={handleSubmit}>", "</form>", |w| {
                    for input in inputs {
                        input.write(w);
                    }
                    w.line("{error && <p role=\"alert\">{error}</p>}");
                    w.line(format!(
                        "<button type=\"submit\">Create {}</button>",
                        jsx_text(&label)
                    ));
                });
            });
        },
    );
    w.blank();
    w.line(format!("export default {class}Form;"));
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::{shop, try_render};
    use stencil_core::domain::{DomainConfiguration, Entity, Field};

    fn ui(config: &DomainConfiguration, entity: &str) -> (String, String) {
        let mut files = try_render(config, entity, ArtifactKind::Ui).unwrap();
        let form = files.pop().unwrap();
        let list = files.pop().unwrap();
        assert!(list.path.ends_with("List.tsx"));
        assert!(form.path.ends_with("Form.tsx"));
        (list.content, form.content)
    }

    #[test]
    fn list_declares_the_response_interface() {
        let (list, _) = ui(&shop(), "Product");
        assert!(list.contains("export interface Product {"));
        assert!(list.contains("  id: number;\n"));
        assert!(list.contains("  name: string;\n"));
        assert!(list.contains("  price: string | null;\n"));
        assert!(list.contains("  category_id: number | null;\n"));
        assert!(list.contains("const API_URL = \"/products\";"));
        assert!(list.contains("<th>Category Id</th>"));
        assert!(list.contains("<td>{row.price ?? \"\"}</td>"));
        assert!(list.contains("export default ProductList;"));
    }

    #[test]
    fn form_inputs_follow_widgets() {
        let config = DomainConfiguration::new("Blog").with_entity(
            Entity::new("Post")
                .with_field(Field::of("title", FieldKind::ShortText).required())
                .with_field(Field::of("body", FieldKind::LongText))
                .with_field(Field::of("published", FieldKind::Boolean).with_default(true))
                .with_field(Field::of("views", FieldKind::Integer))
                .with_field(Field::of("reference", FieldKind::Identifier)),
        );
        let (list, form) = ui(&config, "Post");

        assert!(list.contains("<td>{row.published ? \"Yes\" : \"No\"}</td>"));
        assert!(form.contains("import type { Post } from \"./PostList\";"));
        assert!(form.contains("  published: boolean;\n"));
        assert!(form.contains("  published: true,\n"));
        assert!(form.contains("<textarea"));
        assert!(form.contains("type=\"checkbox\""));
        assert!(form.contains("maxLength={255}"));
        assert!(form.contains("title: values.title,"));
        assert!(form.contains("views: values.views === \"\" ? null : Number(values.views),"));
        assert!(!form.contains("values.reference"));
        assert!(form.contains("onCreated?: (record: Post) => void;"));
        assert!(form.contains("<button type=\"submit\">Create Post</button>"));
    }

    #[test]
    fn foreign_keys_are_editable() {
        let (_, form) = ui(&shop(), "Product");
        assert!(form.contains("  category_id: string;\n"));
        assert!(form.contains("update(\"category_id\", event.target.value)"));
        assert!(form.contains("step=\"any\""));
    }
}
