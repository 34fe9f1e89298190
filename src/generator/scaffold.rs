//! Project scaffold: the files written once and then left to the user.
//!
//! Each file is an askama template rendered from a small typed struct.

use askama::Template;
use std::path::PathBuf;

use super::inputs::route_path;
use super::operations::CrudOp;
use crate::error::{GenError, Result};
use crate::introspect::dsn::Dialect;
use crate::spec::Specification;

#[derive(Template)]
#[template(path = "scaffold/go.mod.txt", escape = "none")]
pub struct GoModTemplate {
    pub module: String,
    pub go_version: String,
    pub driver: String,
    pub driver_version: String,
}

/// One line of the README route listing.
#[derive(Debug, Clone)]
pub struct RouteDisplay {
    pub method: String,
    pub path: String,
    pub comment: String,
}

#[derive(Template)]
#[template(path = "scaffold/README.md.txt", escape = "none")]
pub struct ReadmeTemplate {
    pub name: String,
    pub description: String,
    pub module: String,
    pub routes: Vec<RouteDisplay>,
}

#[derive(Template)]
#[template(path = "scaffold/Makefile.txt", escape = "none")]
pub struct MakefileTemplate {
    pub name: String,
}

#[derive(Template)]
#[template(path = "scaffold/gitignore.txt", escape = "none")]
pub struct GitignoreTemplate;

#[derive(Template)]
#[template(path = "scaffold/env.example.txt", escape = "none")]
pub struct EnvExampleTemplate {
    pub dsn_example: String,
}

#[derive(Template)]
#[template(path = "scaffold/config.yaml.example.txt", escape = "none")]
pub struct ConfigYamlExampleTemplate {
    pub dsn_example: String,
}

#[derive(Template)]
#[template(path = "scaffold/docker-compose.yml.txt", escape = "none")]
pub struct DockerComposeTemplate {
    pub postgres: bool,
    pub database: String,
}

#[derive(Template)]
#[template(path = "scaffold/Dockerfile.txt", escape = "none")]
pub struct DockerfileTemplate {
    pub name: String,
    pub go_version: String,
}

#[derive(Template)]
#[template(path = "scaffold/main.go.txt", escape = "none")]
pub struct MainGoTemplate {
    pub module: String,
    pub driver: String,
    pub models: Vec<String>,
}

#[derive(Template)]
#[template(path = "scaffold/response.go.txt", escape = "none")]
pub struct ResponseGoTemplate;

#[derive(Template)]
#[template(path = "scaffold/middleware_auth.go.txt", escape = "none")]
pub struct MiddlewareAuthTemplate {
    pub module: String,
}

#[derive(Template)]
#[template(path = "scaffold/capability.go.txt", escape = "none")]
pub struct CapabilityTemplate;

/// Values shared by several scaffold files.
#[derive(Debug, Clone)]
pub struct ScaffoldContext {
    pub name: String,
    pub module: String,
    pub description: String,
    pub go_version: String,
    pub dialect: Dialect,
}

impl ScaffoldContext {
    pub fn new(spec: &Specification, go_version: &str, dialect: Dialect) -> Self {
        ScaffoldContext {
            name: project_slug(spec),
            module: spec.project.module.clone(),
            description: spec.project.description.clone(),
            go_version: go_version.to_string(),
            dialect,
        }
    }

    fn driver(&self) -> (&'static str, &'static str) {
        match self.dialect {
            Dialect::MySql => ("mysql", "v1.5.2"),
            Dialect::Postgres => ("postgres", "v1.5.4"),
        }
    }

    fn database(&self) -> String {
        self.name.replace('-', "_")
    }

    fn dsn_example(&self) -> String {
        match self.dialect {
            Dialect::MySql => format!(
                "root:password@tcp(localhost:3306)/{}?charset=utf8mb4&parseTime=True&loc=Local",
                self.database()
            ),
            Dialect::Postgres => format!(
                "host=localhost user=postgres password=password dbname={} port=5432 sslmode=disable",
                self.database()
            ),
        }
    }
}

/// Lower-case project name usable in file names and image tags.
///
/// Falls back to the last module path segment, then to `app`.
pub fn project_slug(spec: &Specification) -> String {
    let source = if spec.name.trim().is_empty() {
        spec.project.module.rsplit('/').next().unwrap_or_default()
    } else {
        spec.name.as_str()
    };
    let slug: String = source
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "app".to_string()
    } else {
        slug
    }
}

/// Routes listed in the README: the generated CRUD routes per model followed by
/// any declared endpoints whose shape differs from them.
pub fn readme_routes(spec: &Specification) -> Vec<RouteDisplay> {
    let mut routes = Vec::new();
    for model in &spec.models {
        let base = format!("/api/v1{}", route_path(model));
        for op in CrudOp::ALL {
            routes.push(RouteDisplay {
                method: op.http_method().to_string(),
                path: format!("{base}{}", op.route_suffix()),
                comment: format!("{}.{}", model.name, op.handler()),
            });
        }
    }
    for endpoint in &spec.endpoints {
        let method = endpoint.method.trim().to_ascii_uppercase();
        if routes
            .iter()
            .any(|r| r.method == method && r.path == endpoint.path)
        {
            continue;
        }
        routes.push(RouteDisplay {
            method,
            path: endpoint.path.clone(),
            comment: endpoint.comment.clone(),
        });
    }
    routes
}

fn render(artifact: &str, tmpl: &impl Template) -> Result<String> {
    tmpl.render().map_err(|e| GenError::template(artifact, e))
}

/// Render every scaffold file, paired with its path relative to the output root.
pub fn render_scaffold(spec: &Specification, ctx: &ScaffoldContext) -> Result<Vec<(PathBuf, String)>> {
    let (driver, driver_version) = ctx.driver();
    let models: Vec<String> = spec.models.iter().map(|m| m.name.clone()).collect();

    let files = vec![
        (
            "go.mod",
            render(
                "go.mod",
                &GoModTemplate {
                    module: ctx.module.clone(),
                    go_version: ctx.go_version.clone(),
                    driver: driver.to_string(),
                    driver_version: driver_version.to_string(),
                },
            )?,
        ),
        (
            "README.md",
            render(
                "README.md",
                &ReadmeTemplate {
                    name: ctx.name.clone(),
                    description: ctx.description.clone(),
                    module: ctx.module.clone(),
                    routes: readme_routes(spec),
                },
            )?,
        ),
        (
            "Makefile",
            render("Makefile", &MakefileTemplate { name: ctx.name.clone() })?,
        ),
        (".gitignore", render(".gitignore", &GitignoreTemplate)?),
        (
            ".env.example",
            render(
                ".env.example",
                &EnvExampleTemplate {
                    dsn_example: ctx.dsn_example(),
                },
            )?,
        ),
        (
            "config.yaml.example",
            render(
                "config.yaml.example",
                &ConfigYamlExampleTemplate {
                    dsn_example: ctx.dsn_example(),
                },
            )?,
        ),
        (
            "docker-compose.yml",
            render(
                "docker-compose.yml",
                &DockerComposeTemplate {
                    postgres: ctx.dialect == Dialect::Postgres,
                    database: ctx.database(),
                },
            )?,
        ),
        (
            "Dockerfile",
            render(
                "Dockerfile",
                &DockerfileTemplate {
                    name: ctx.name.clone(),
                    go_version: ctx.go_version.clone(),
                },
            )?,
        ),
        (
            "cmd/server/main.go",
            render(
                "main.go",
                &MainGoTemplate {
                    module: ctx.module.clone(),
                    driver: driver.to_string(),
                    models,
                },
            )?,
        ),
        (
            "pkg/httpx/response/response.go",
            render("response.go", &ResponseGoTemplate)?,
        ),
        (
            "pkg/httpx/middleware/auth.go",
            render(
                "auth.go",
                &MiddlewareAuthTemplate {
                    module: ctx.module.clone(),
                },
            )?,
        ),
        (
            "pkg/capability/capability.go",
            render("capability.go", &CapabilityTemplate)?,
        ),
    ];

    Ok(files
        .into_iter()
        .map(|(path, content)| (PathBuf::from(path), content))
        .collect())
}
