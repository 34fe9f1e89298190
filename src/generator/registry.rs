//! Process-wide registry of layer templates.
//!
//! The templates are compiled into the binary and loaded once into an immutable
//! [`minijinja::Environment`]. The environment carries the naming function
//! library as filters so templates never re-implement case conversion.

use crate::error::{GenError, Result};
use crate::naming::{lower_first, pluralize, to_camel_case, to_pascal_case};
use minijinja::{Environment, UndefinedBehavior};
use once_cell::sync::OnceCell;
use serde::Serialize;

use super::inputs::go_string_literal;

/// The layer artifacts rendered through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerTemplate {
    Model,
    Repository,
    Service,
    Controller,
    Controllers,
    Routes,
    Validator,
}

impl LayerTemplate {
    pub const ALL: [LayerTemplate; 7] = [
        LayerTemplate::Model,
        LayerTemplate::Repository,
        LayerTemplate::Service,
        LayerTemplate::Controller,
        LayerTemplate::Controllers,
        LayerTemplate::Routes,
        LayerTemplate::Validator,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerTemplate::Model => "model.go",
            LayerTemplate::Repository => "repository.go",
            LayerTemplate::Service => "service.go",
            LayerTemplate::Controller => "controller.go",
            LayerTemplate::Controllers => "controllers.go",
            LayerTemplate::Routes => "routes.go",
            LayerTemplate::Validator => "validator.go",
        }
    }

    fn source(self) -> &'static str {
        match self {
            LayerTemplate::Model => include_str!("../../templates/layers/model.go.j2"),
            LayerTemplate::Repository => include_str!("../../templates/layers/repository.go.j2"),
            LayerTemplate::Service => include_str!("../../templates/layers/service.go.j2"),
            LayerTemplate::Controller => include_str!("../../templates/layers/controller.go.j2"),
            LayerTemplate::Controllers => {
                include_str!("../../templates/layers/controllers.go.j2")
            }
            LayerTemplate::Routes => include_str!("../../templates/layers/routes.go.j2"),
            LayerTemplate::Validator => include_str!("../../templates/layers/validator.go.j2"),
        }
    }
}

static ENVIRONMENT: OnceCell<Environment<'static>> = OnceCell::new();

fn build_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    env.add_filter("pascal", |s: String| to_pascal_case(&s));
    env.add_filter("camel", |s: String| to_camel_case(&s));
    env.add_filter("pluralize", |s: String| pluralize(&s));
    env.add_filter("lower_first", |s: String| lower_first(&s));
    env.add_filter("go_quote", |s: String| go_string_literal(&s));

    for layer in LayerTemplate::ALL {
        env.add_template(layer.name(), layer.source())
            .map_err(|e| GenError::template(layer.name(), e))?;
    }
    Ok(env)
}

/// The shared environment, built on first use.
pub fn environment() -> Result<&'static Environment<'static>> {
    ENVIRONMENT.get_or_try_init(build_environment)
}

/// Render `layer` with a typed input.
pub fn render<S: Serialize>(layer: LayerTemplate, input: &S) -> Result<String> {
    let env = environment()?;
    let tmpl = env
        .get_template(layer.name())
        .map_err(|e| GenError::template(layer.name(), e))?;
    tmpl.render(input)
        .map_err(|e| GenError::template(layer.name(), e))
}
