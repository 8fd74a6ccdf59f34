//! FastAPI CRUD routers.

use stencil_core::{
    application::ports::RenderInput,
    domain::{ArtifactFile, ArtifactKind, DomainError, naming},
};

use super::{
    KeyInfo, database_module,
    python::{self as py, Group, Imports},
    writer::CodeWriter,
};

pub fn render(input: &RenderInput<'_>) -> Result<ArtifactFile, DomainError> {
    let RenderInput {
        entity,
        registry,
        layout,
        ..
    } = *input;
    let path = layout.primary_path(&entity.name, ArtifactKind::Routes);
    let key = KeyInfo::of(entity, registry)?;

    let class = registry.class_name(entity);
    let snake = naming::to_snake_case(&entity.name);
    let plural = naming::pluralize(&snake);
    let label = registry.display_label(entity).to_lowercase();
    let key_type = py::model_type(key.kind);
    let not_found = py::string(&format!("{} not found", registry.display_label(entity)));

    let model_module = layout.module_path(&layout.primary_path(&entity.name, ArtifactKind::Model));
    let schema_module =
        layout.module_path(&layout.primary_path(&entity.name, ArtifactKind::Schema));

    let mut imports = Imports::new();
    imports
        .from(Group::ThirdParty, "fastapi", "APIRouter")
        .from(Group::ThirdParty, "fastapi", "Depends")
        .from(Group::ThirdParty, "fastapi", "HTTPException")
        .from(Group::ThirdParty, "fastapi", "status")
        .from(Group::ThirdParty, "sqlalchemy", "select")
        .from(Group::ThirdParty, "sqlalchemy.orm", "Session")
        .from(Group::Local, &database_module(layout), "get_session")
        .from(Group::Local, &model_module, &class)
        .from(Group::Local, &schema_module, &format!("{class}Create"))
        .from(Group::Local, &schema_module, &format!("{class}Read"))
        .from(Group::Local, &schema_module, &format!("{class}Update"))
        .annotation(key_type);

    let mut w = CodeWriter::python();
    py::preamble(
        &mut w,
        &format!("HTTP endpoints for {}.", registry.display_label_plural(entity).to_lowercase()),
        &imports,
    );

    w.blank_lines(1);
    w.line(format!(
        "router = APIRouter(prefix={}, tags=[{}])",
        py::string(&format!("/{}", registry.route_segment(entity))),
        py::string(&registry.display_label_plural(entity))
    ));

    // ── Handlers ──
    let session = "session: Session = Depends(get_session)";
    let key_param = format!("{}: {key_type}", key.name);

    w.blank_lines(2);
    w.line(format!("@router.get(\"/\", response_model=list[{class}Read])"));
    w.block(format!("def list_{plural}({session}) -> list[{class}]:"), |w| {
        w.line(format!("\"\"\"Return every {label}.\"\"\""));
        w.line(format!("return list(session.scalars(select({class})).all())"));
    });

    w.blank_lines(2);
    w.line(format!(
        "@router.post(\"/\", response_model={class}Read, status_code=status.HTTP_201_CREATED)"
    ));
    w.block(
        format!("def create_{snake}(payload: {class}Create, {session}) -> {class}:"),
        |w| {
            w.line(format!("\"\"\"Create a {label}.\"\"\""));
            w.line(format!("record = {class}(**payload.model_dump())"));
            w.line("session.add(record)");
            w.line("session.commit()");
            w.line("session.refresh(record)");
            w.line("return record");
        },
    );

    let lookup = |w: &mut CodeWriter| {
        w.line(format!("record = session.get({class}, {})", key.name));
        w.block("if record is None:", |w| {
            w.line(format!(
                "raise HTTPException(status_code=status.HTTP_404_NOT_FOUND, detail={not_found})"
            ));
        });
    };

    w.blank_lines(2);
    w.line(format!("@router.get(\"/{{{}}}\", response_model={class}Read)", key.name));
    w.block(
        format!("def get_{snake}({key_param}, {session}) -> {class}:"),
        |w| {
            w.line(format!("\"\"\"Return one {label}.\"\"\""));
            lookup(w);
            w.line("return record");
        },
    );

    w.blank_lines(2);
    w.line(format!("@router.patch(\"/{{{}}}\", response_model={class}Read)", key.name));
    w.block(
        format!("def update_{snake}({key_param}, payload: {class}Update, {session}) -> {class}:"),
        |w| {
            w.line(format!("\"\"\"Apply a partial update to a {label}.\"\"\""));
            lookup(w);
            w.block("for name, value in payload.model_dump(exclude_unset=True).items():", |w| {
                w.line("setattr(record, name, value)");
            });
            w.line("session.commit()");
            w.line("session.refresh(record)");
            w.line("return record");
        },
    );

    w.blank_lines(2);
    w.line(format!(
        "@router.delete(\"/{{{}}}\", status_code=status.HTTP_204_NO_CONTENT)",
        key.name
    ));
    w.block(
        format!("def delete_{snake}({key_param}, {session}) -> None:"),
        |w| {
            w.line(format!("\"\"\"Delete a {label}.\"\"\""));
            lookup(w);
            w.line("session.delete(record)");
            w.line("session.commit()");
        },
    );

    Ok(ArtifactFile::new(path, w.finish()))
}
