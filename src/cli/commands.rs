use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::selection::select_tables;
use crate::builder::{spec_from_tables, starter_spec, ProjectMeta};
use crate::config::{GeneratorConfig, CONFIG_FILE_NAME};
use crate::generator::{generate_with_options, GenerateOptions, GenerationReport, TidyOutcome};
use crate::introspect::dsn::{detect_dialect, Dialect};
use crate::introspect::{get_table_schemas, list_tables};
use crate::logging::{init_logging_with_config, LogConfig};
use crate::naming::mask_dsn;
use crate::spec::{merge_specs, parse_dir, parse_file, Specification};

/// Blog example written by `spec init`.
pub const EXAMPLE_SPEC: &str = include_str!("../../demos/blog.spec.yaml");

/// Command-line interface for gostart
///
/// Generates Go (gin + gorm) services from specification files or from the
/// schema of a live database.
#[derive(Parser)]
#[command(name = "gostart", version)]
#[command(about = "Generate Go (gin + gorm) services from specs or databases", long_about = None)]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Configuration file (default: ./gostart.toml when present)
    #[arg(long, global = true, env = "GOSTART_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold an empty project named NAME under the output directory
    Create {
        /// Project name; becomes the directory name
        name: String,

        /// Go module path (default: github.com/yourname/<NAME>)
        #[arg(short, long)]
        module: Option<String>,

        /// Directory the project directory is created in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Database driver wired into go.mod and main.go
        #[arg(long, value_enum, default_value_t = Driver::Mysql)]
        driver: Driver,

        /// Overwrite existing scaffold files
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Run `go mod tidy` after generation
        #[arg(long, default_value_t = false)]
        tidy: bool,
    },
    /// Work with specification documents
    #[command(subcommand)]
    Spec(SpecCommand),
    /// Generate from an existing database
    #[command(subcommand)]
    Gen(GenCommand),
}

#[derive(Subcommand)]
pub enum SpecCommand {
    /// Generate a project from one spec file or a directory of them
    Generate {
        /// Path to a spec file
        #[arg(short, long, conflicts_with = "dir", required_unless_present = "dir")]
        file: Option<PathBuf>,

        /// Directory whose *.spec.yaml files are merged into one project
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Overwrite existing scaffold files
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Run `go mod tidy` after generation
        #[arg(long, default_value_t = false)]
        tidy: bool,

        /// Only write the layer files under internal/
        #[arg(long, default_value_t = false)]
        no_scaffold: bool,

        /// Database driver wired into go.mod, main.go and the example config
        #[arg(long, value_enum, default_value_t = Driver::Mysql)]
        driver: Driver,
    },
    /// Check a spec file and print a summary
    Validate {
        /// Path to a spec file
        #[arg(short, long)]
        file: PathBuf,

        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write an example spec file
    Init {
        /// Where to write the example
        #[arg(short, long, default_value = "example.spec.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum GenCommand {
    /// Generate a project from database tables
    Db {
        /// Database DSN (MySQL `user:pass@tcp(host:port)/db` or Postgres)
        #[arg(long, env = "GOSTART_DSN")]
        dsn: String,

        /// Tables to include: names, `*` wildcards, 1-based indexes or ranges
        #[arg(short, long, conflicts_with = "all", required_unless_present = "all")]
        tables: Option<String>,

        /// Include every table
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Go module path (default from config)
        #[arg(short, long)]
        module: Option<String>,

        /// Project name (default: last module path segment)
        #[arg(long)]
        name: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Overwrite existing scaffold files
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Run `go mod tidy` after generation
        #[arg(long, default_value_t = false)]
        tidy: bool,

        /// Only write the layer files under internal/
        #[arg(long, default_value_t = false)]
        no_scaffold: bool,
    },
    /// List the tables of a database
    Tables {
        /// Database DSN
        #[arg(long, env = "GOSTART_DSN")]
        dsn: String,
    },
}

/// Database driver of a generated project.
///
/// `gen db` takes the driver from the DSN instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Driver {
    /// gorm.io/driver/mysql
    Mysql,
    /// gorm.io/driver/postgres
    Postgres,
}

impl From<Driver> for Dialect {
    fn from(driver: Driver) -> Self {
        match driver {
            Driver::Mysql => Dialect::MySql,
            Driver::Postgres => Dialect::Postgres,
        }
    }
}

/// Summary printed by `spec validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecSummary {
    pub name: String,
    pub version: String,
    pub module: String,
    pub author: String,
    pub models: usize,
    pub endpoints: usize,
    pub requests: usize,
    pub rules: usize,
}

impl SpecSummary {
    pub fn of(spec: &Specification) -> Self {
        SpecSummary {
            name: spec.name.clone(),
            version: spec.version.clone(),
            module: spec.project.module.clone(),
            author: spec.project.author.clone(),
            models: spec.models.len(),
            endpoints: spec.endpoints.len(),
            requests: spec.requests.len(),
            rules: spec.rules.len(),
        }
    }
}

/// Parse arguments, set up logging and run the selected command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_config = LogConfig::from_env().verbose(cli.verbose);
    init_logging_with_config(&log_config)?;
    run(cli)
}

/// Run an already parsed command line. Logging is left to the caller.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
    let config = GeneratorConfig::load(&config_path)?;

    match cli.command {
        Commands::Create {
            name,
            module,
            output,
            driver,
            force,
            tidy,
        } => {
            let name = name.trim();
            let module = module.unwrap_or_else(|| format!("github.com/yourname/{name}"));
            let spec = starter_spec(name, &module)?;
            let project_dir = output.join(name);
            let opts = generate_options(&config, force, tidy, false, driver.into());
            let report = generate_with_options(&spec, &project_dir, &opts)
                .with_context(|| format!("Failed to create {}", project_dir.display()))?;
            finish(&project_dir, report);
            println!("\n📝 Next steps:");
            println!("  cd {}", project_dir.display());
            println!("  cp config.yaml.example config.yaml");
            println!("  go run ./cmd/server");
            Ok(())
        }
        Commands::Spec(SpecCommand::Generate {
            file,
            dir,
            output,
            force,
            tidy,
            no_scaffold,
            driver,
        }) => {
            let spec = match (file, dir) {
                (Some(file), _) => parse_file(&file)
                    .with_context(|| format!("Failed to load spec {}", file.display()))?,
                (None, Some(dir)) => {
                    let specs = parse_dir(&dir)
                        .with_context(|| format!("Failed to load specs from {}", dir.display()))?;
                    merge_specs(specs)
                        .with_context(|| format!("Failed to merge specs from {}", dir.display()))?
                }
                (None, None) => bail!("either --file or --dir is required"),
            };
            let opts = generate_options(&config, force, tidy, no_scaffold, driver.into());
            let report = generate_with_options(&spec, &output, &opts)
                .with_context(|| format!("Failed to generate into {}", output.display()))?;
            finish(&output, report);
            Ok(())
        }
        Commands::Spec(SpecCommand::Validate { file, json }) => {
            let spec = parse_file(&file)
                .with_context(|| format!("Failed to load spec {}", file.display()))?;
            let summary = SpecSummary::of(&spec);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
        Commands::Spec(SpecCommand::Init { output, force }) => {
            write_example_spec(&output, force)?;
            println!("✅ Wrote example spec to {}", output.display());
            Ok(())
        }
        Commands::Gen(GenCommand::Db {
            dsn,
            tables,
            all,
            module,
            name,
            output,
            force,
            tidy,
            no_scaffold,
        }) => {
            let dialect = detect_dialect(&dsn)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;

            let available: Vec<String> = runtime
                .block_on(list_tables(&dsn))
                .with_context(|| format!("Failed to list tables of {}", mask_dsn(&dsn)))?
                .into_iter()
                .map(|t| t.name)
                .collect();
            let selected = if all {
                available
            } else {
                select_tables(&available, tables.as_deref().unwrap_or("all"))?
            };
            info!(count = selected.len(), "introspecting tables");
            let schemas = runtime
                .block_on(get_table_schemas(&dsn, &selected))
                .context("Failed to read table schemas")?;

            let module = module.unwrap_or_else(|| config.project.default_module.clone());
            let meta = ProjectMeta {
                name: name.unwrap_or_else(|| module_leaf(&module)),
                module,
                description: String::new(),
            };
            let spec = spec_from_tables(&meta, &schemas)?;
            let opts = generate_options(&config, force, tidy, no_scaffold, dialect);
            let report = generate_with_options(&spec, &output, &opts)
                .with_context(|| format!("Failed to generate into {}", output.display()))?;
            finish(&output, report);
            Ok(())
        }
        Commands::Gen(GenCommand::Tables { dsn }) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            let tables = runtime
                .block_on(list_tables(&dsn))
                .with_context(|| format!("Failed to list tables of {}", mask_dsn(&dsn)))?;
            println!("{:>4}  {:<32} {:>6} {:>7}  COMMENT", "#", "TABLE", "FIELDS", "INDEXES");
            for (i, table) in tables.iter().enumerate() {
                println!(
                    "{:>4}  {:<32} {:>6} {:>7}  {}",
                    i + 1,
                    table.name,
                    table.fields_count,
                    table.indexes_count,
                    table.comment
                );
            }
            Ok(())
        }
    }
}

/// CLI flags win over the config file; a flag can only switch a default on.
pub fn generate_options(
    config: &GeneratorConfig,
    force: bool,
    tidy: bool,
    no_scaffold: bool,
    dialect: Dialect,
) -> GenerateOptions {
    GenerateOptions {
        force: force || config.generate.force,
        tidy: tidy || config.generate.tidy,
        scaffold: !no_scaffold && config.generate.scaffold,
        go_bin: config.toolchain.go_bin.clone(),
        go_version: config.toolchain.go_version.clone(),
        dialect,
    }
}

/// Write the embedded example, refusing to clobber unless `force`.
pub fn write_example_spec(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, EXAMPLE_SPEC).with_context(|| format!("Failed to write {}", path.display()))
}

fn module_leaf(module: &str) -> String {
    module
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(module)
        .to_string()
}

fn print_summary(summary: &SpecSummary) {
    println!("✅ Spec is valid");
    println!("  name:      {}", summary.name);
    println!("  version:   {}", summary.version);
    println!("  module:    {}", summary.module);
    if !summary.author.is_empty() {
        println!("  author:    {}", summary.author);
    }
    println!("  models:    {}", summary.models);
    println!("  endpoints: {}", summary.endpoints);
    println!("  requests:  {}", summary.requests);
    println!("  rules:     {}", summary.rules);
}

/// Report the run, then let a pending tidy finish before the process exits.
fn finish(output: &Path, report: GenerationReport) {
    let c = &report.counts;
    println!(
        "✅ Generated {} files into {} ({} skipped)",
        report.written.len(),
        output.display(),
        report.skipped.len()
    );
    println!(
        "  models: {}  repositories: {}  services: {}  controllers: {}  validators: {}  routes: {}  scaffold: {}",
        c.models, c.repositories, c.services, c.controllers, c.validators, c.routes, c.scaffold
    );
    for path in &report.skipped {
        println!("⚠️  Skipped existing file: {}", path.display());
    }
    if let Some(handle) = report.tidy {
        if let TidyOutcome::Failed(reason) = handle.wait() {
            warn!(%reason, "dependencies were not tidied; run `go mod tidy` manually");
        }
    }
}
