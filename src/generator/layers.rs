//! Rendering of the regenerated layer files.

use std::collections::HashSet;
use std::path::PathBuf;

use super::inputs::{
    ControllerRenderInput, ControllersRenderInput, ModelRenderInput, RepositoryRenderInput,
    RoutesRenderInput, ServiceRenderInput, ValidatorRenderInput,
};
use super::operations::ModelWiring;
use super::registry::{render, LayerTemplate};
use crate::error::{GenError, Result};
use crate::spec::{ModelDefinition, RequestDefinition, Specification};

/// A rendered file and its path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub layer: LayerTemplate,
    pub path: PathBuf,
    pub content: String,
}

fn file_stem(name: &str) -> String {
    name.to_lowercase()
}

pub fn render_model(model: &ModelDefinition) -> Result<RenderedFile> {
    Ok(RenderedFile {
        layer: LayerTemplate::Model,
        path: PathBuf::from(format!("internal/model/{}.go", file_stem(&model.name))),
        content: render(LayerTemplate::Model, &ModelRenderInput::new(model))?,
    })
}

pub fn render_repository(spec: &Specification, model: &ModelDefinition) -> Result<RenderedFile> {
    Ok(RenderedFile {
        layer: LayerTemplate::Repository,
        path: PathBuf::from(format!("internal/repository/{}.go", file_stem(&model.name))),
        content: render(
            LayerTemplate::Repository,
            &RepositoryRenderInput::new(spec, model),
        )?,
    })
}

pub fn render_service(
    spec: &Specification,
    model: &ModelDefinition,
    wiring: &ModelWiring,
) -> Result<RenderedFile> {
    Ok(RenderedFile {
        layer: LayerTemplate::Service,
        path: PathBuf::from(format!("internal/service/{}.go", file_stem(&model.name))),
        content: render(
            LayerTemplate::Service,
            &ServiceRenderInput::new(spec, model, wiring),
        )?,
    })
}

pub fn render_controller(
    spec: &Specification,
    model: &ModelDefinition,
    wiring: &ModelWiring,
) -> Result<RenderedFile> {
    Ok(RenderedFile {
        layer: LayerTemplate::Controller,
        path: PathBuf::from(format!("internal/controller/{}.go", file_stem(&model.name))),
        content: render(
            LayerTemplate::Controller,
            &ControllerRenderInput::new(spec, model, wiring),
        )?,
    })
}

pub fn render_validator(request: &RequestDefinition) -> Result<RenderedFile> {
    Ok(RenderedFile {
        layer: LayerTemplate::Validator,
        path: PathBuf::from(format!("internal/validator/{}.go", file_stem(&request.name))),
        content: render(LayerTemplate::Validator, &ValidatorRenderInput::new(request))?,
    })
}

pub fn render_routes(spec: &Specification, wirings: &[ModelWiring]) -> Result<RenderedFile> {
    Ok(RenderedFile {
        layer: LayerTemplate::Routes,
        path: PathBuf::from("internal/routes/auto_routes.go"),
        content: render(
            LayerTemplate::Routes,
            &RoutesRenderInput::new(spec, wirings),
        )?,
    })
}

pub fn render_controllers(spec: &Specification) -> Result<RenderedFile> {
    Ok(RenderedFile {
        layer: LayerTemplate::Controllers,
        path: PathBuf::from("internal/controller/controllers.go"),
        content: render(
            LayerTemplate::Controllers,
            &ControllersRenderInput::new(spec),
        )?,
    })
}

/// Render all layer files in generation order: per model Model, Repository,
/// Service, Controller; then validators; then the route table and the
/// controller aggregate.
///
/// Two artifacts mapping to the same path is an error rather than a silent
/// overwrite (a model named `Controllers`, or `User` next to `user`).
pub fn render_layers(spec: &Specification) -> Result<Vec<RenderedFile>> {
    let wirings: Vec<ModelWiring> = spec
        .models
        .iter()
        .map(|m| ModelWiring::resolve(spec, m))
        .collect();

    let mut files = Vec::new();
    for (model, wiring) in spec.models.iter().zip(&wirings) {
        files.push(render_model(model)?);
        files.push(render_repository(spec, model)?);
        files.push(render_service(spec, model, wiring)?);
        files.push(render_controller(spec, model, wiring)?);
    }
    for request in &spec.requests {
        files.push(render_validator(request)?);
    }
    files.push(render_routes(spec, &wirings)?);
    files.push(render_controllers(spec)?);

    let mut paths = HashSet::new();
    if let Some(clash) = files.iter().find(|f| !paths.insert(&f.path)) {
        return Err(GenError::Validation(format!(
            "{} would be generated more than once",
            clash.path.display()
        )));
    }
    Ok(files)
}
