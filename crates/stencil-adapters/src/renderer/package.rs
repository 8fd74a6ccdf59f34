//! Package modules shared by every entity: the database module the models
//! and routes import from, and the FastAPI entry point the tests import.

use stencil_core::{
    application::ports::PackageInput,
    domain::{ArtifactFile, ArtifactKind, DomainError, naming},
};

use super::{
    database_module,
    python::{self as py, Group, Imports},
    writer::CodeWriter,
};

pub fn render(input: &PackageInput<'_>) -> Result<Vec<ArtifactFile>, DomainError> {
    let paths = input.layout.package_paths();
    let [database_path, main_path] = paths.as_slice() else {
        return Err(DomainError::RenderFailed {
            artifact: ArtifactKind::Package.to_string(),
            reason: format!("expected a database and an entry module, got {paths:?}"),
        });
    };

    Ok(vec![
        ArtifactFile::new(database_path.clone(), database(input)),
        ArtifactFile::new(main_path.clone(), main(input)),
    ])
}

fn database(input: &PackageInput<'_>) -> String {
    let mut imports = Imports::new();
    imports
        .from(Group::Stdlib, "collections.abc", "Iterator")
        .from(Group::ThirdParty, "sqlalchemy", "create_engine")
        .from(Group::ThirdParty, "sqlalchemy.orm", "DeclarativeBase")
        .from(Group::ThirdParty, "sqlalchemy.orm", "Session")
        .from(Group::ThirdParty, "sqlalchemy.orm", "sessionmaker");

    let mut w = CodeWriter::python();
    py::preamble(&mut w, "Database engine, declarative base and sessions.", &imports);

    w.blank_lines(1);
    w.line(format!(
        "DATABASE_URL = {}",
        py::string(&format!("sqlite:///./{}.db", input.layout.package()))
    ));
    w.blank();
    w.line("engine = create_engine(DATABASE_URL, connect_args={\"check_same_thread\": False})");
    w.line("SessionLocal = sessionmaker(bind=engine, autoflush=False, expire_on_commit=False)");

    w.blank_lines(2);
    w.block("class Base(DeclarativeBase):", |w| {
        w.line("\"\"\"Declarative base of every model.\"\"\"");
    });

    w.blank_lines(2);
    w.block("def get_session() -> Iterator[Session]:", |w| {
        w.line("\"\"\"Yield a session for one request, closing it afterwards.\"\"\"");
        w.block("with SessionLocal() as session:", |w| {
            w.line("yield session");
        });
    });

    w.finish()
}

fn main(input: &PackageInput<'_>) -> String {
    let PackageInput {
        config,
        routed,
        junctions,
        layout,
        ..
    } = *input;

    let mut imports = Imports::new();
    imports
        .from(Group::ThirdParty, "fastapi", "FastAPI")
        .from(Group::Local, &database_module(layout), "Base")
        .from(Group::Local, &database_module(layout), "engine");

    let mut routers = Vec::with_capacity(routed.len());
    for entity in routed {
        let alias = format!("{}_router", naming::to_snake_case(&entity.name));
        let module = layout.module_path(&layout.primary_path(&entity.name, ArtifactKind::Routes));
        imports.from(Group::Local, &module, &format!("router as {alias}"));
        routers.push(alias);
    }
    // Join tables must be registered on the metadata before `create_all`.
    for junction in junctions {
        imports.module(Group::Local, &layout.module_path(&layout.junction_path(&junction.table)));
    }

    let title = config.title.as_deref().unwrap_or(&config.name);
    let mut w = CodeWriter::python();
    py::preamble(&mut w, "Application entry point.", &imports);

    w.blank_lines(1);
    w.line("Base.metadata.create_all(bind=engine)");
    w.blank();
    w.line(format!("app = FastAPI(title={})", py::string(title)));
    if !routers.is_empty() {
        w.blank();
        w.lines(routers.iter().map(|r| format!("app.include_router({r})")));
    }

    w.finish()
}
