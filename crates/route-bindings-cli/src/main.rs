//! CLI for `route-bindings`.
//!
//! # Subcommands
//!
//! ```text
//! # Print the route table
//! route-bindings --config route-bindings.yaml list
//!
//! # Resolve a URL (JSON arguments and query options)
//! route-bindings url roles.crear-funcionalidad --args '{"id": 7}'
//! route-bindings url stock.imprimir --context 'a=1' --merge-query '{"b": 2}'
//!
//! # Resolve an HTML form descriptor
//! route-bindings form stock.imprimir --method head
//!
//! # Generate Rust bindings
//! route-bindings generate --output src/routes.rs
//! ```

#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgAction, Args, Parser, Subcommand};
use route_bindings::{Method, RouteRegistry};
use route_bindings_cli::{ProjectConfig, ResolveInput};

/// Client-side route bindings: list, resolve and generate.
#[derive(Parser)]
#[command(name = "route-bindings", version, about)]
struct Cli {
    /// Path to a project config file (YAML, or TOML by extension).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the route manifest. Overrides `manifest` from the config file.
    #[arg(short, long, global = true)]
    manifest: Option<PathBuf>,

    /// Log more (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every route with its methods, URL template and handler source.
    List,

    /// Resolve a route to a URL.
    Url(ResolveArgs),

    /// Resolve a route to an HTML form `{action, method}` descriptor (JSON).
    Form(ResolveArgs),

    /// Generate Rust bindings for the route table.
    Generate(GenerateArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// Route identifier (e.g., `roles.crear-funcionalidad`).
    route: String,

    /// Route arguments as JSON: a scalar, an array (positional) or an
    /// object (by name, or an entity with `id`).
    #[arg(short, long)]
    args: Option<String>,

    /// Query parameters replacing the context query (JSON object).
    #[arg(short, long)]
    query: Option<String>,

    /// Query parameters merged over the context query (JSON object).
    #[arg(long)]
    merge_query: Option<String>,

    /// Current page query string the query options apply to.
    #[arg(long)]
    context: Option<String>,

    /// HTTP method to resolve for. Defaults to the route's primary method.
    #[arg(long)]
    method: Option<Method>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Output file. Defaults to `codegen.output` from the config, or stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut project = match &cli.config {
        Some(path) => ProjectConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ProjectConfig::default(),
    };
    if let Some(manifest) = &cli.manifest {
        project.manifest.clone_from(manifest);
    }

    init_logging(&project.log_level, cli.verbose);

    match &cli.command {
        Command::List => run_list(&project),
        Command::Url(args) => run_url(&project, args),
        Command::Form(args) => run_form(&project, args),
        Command::Generate(args) => run_generate(&project, args),
    }
}

/// Install a stderr `tracing` subscriber.
///
/// Precedence: `RUST_LOG`, then `-v` flags, then `log_level` from config.
fn init_logging(config_level: &str, verbose: u8) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => config_level,
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn load_registry(project: &ProjectConfig) -> anyhow::Result<RouteRegistry> {
    let registry = project.registry().with_context(|| {
        format!(
            "Failed to load route manifest: {}",
            project.manifest.display()
        )
    })?;
    tracing::info!(routes = registry.len(), "route table loaded");
    Ok(registry)
}

fn resolve_input(args: &ResolveArgs) -> ResolveInput<'_> {
    ResolveInput {
        route: &args.route,
        args: args.args.as_deref(),
        query: args.query.as_deref(),
        merge_query: args.merge_query.as_deref(),
        context: args.context.as_deref(),
        method: args.method,
    }
}

fn run_list(project: &ProjectConfig) -> anyhow::Result<()> {
    let registry = load_registry(project)?;
    if registry.is_empty() {
        eprintln!("No routes in {}", project.manifest.display());
        return Ok(());
    }
    print!("{}", route_bindings_cli::list_routes(&registry));
    Ok(())
}

fn run_url(project: &ProjectConfig, args: &ResolveArgs) -> anyhow::Result<()> {
    let registry = load_registry(project)?;
    let request = route_bindings_cli::resolve_request(&registry, &resolve_input(args))
        .with_context(|| format!("Failed to resolve route '{}'", args.route))?;
    println!("{}", request.url);
    Ok(())
}

fn run_form(project: &ProjectConfig, args: &ResolveArgs) -> anyhow::Result<()> {
    let registry = load_registry(project)?;
    let form = route_bindings_cli::resolve_form(&registry, &resolve_input(args))
        .with_context(|| format!("Failed to resolve form for route '{}'", args.route))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&form).context("Failed to serialize form descriptor")?
    );
    Ok(())
}

fn run_generate(project: &ProjectConfig, args: &GenerateArgs) -> anyhow::Result<()> {
    let manifest = project.load_manifest().with_context(|| {
        format!(
            "Failed to load route manifest: {}",
            project.manifest.display()
        )
    })?;
    let manifest = project.effective_manifest(&manifest);
    if manifest.routes.is_empty() {
        bail!("No routes in {}", project.manifest.display());
    }

    let code = route_bindings_build::generate_from_manifest(&manifest, &project.codegen_config())
        .context("Failed to generate route bindings")?;

    match args.output.as_ref().or(project.codegen.output.as_ref()) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output dir: {}", parent.display())
                })?;
            }
            fs::write(path, &code)
                .with_context(|| format!("Failed to write bindings: {}", path.display()))?;
            eprintln!(
                "Wrote bindings for {} routes to {}",
                manifest.routes.len(),
                path.display()
            );
        }
        None => print!("{code}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "route-bindings",
            "url",
            "roles.show",
            "--args",
            "7",
            "--manifest",
            "routes.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.manifest, Some(PathBuf::from("routes.json")));
        assert_eq!(cli.verbose, 2);
        let Command::Url(args) = cli.command else {
            panic!("expected url subcommand");
        };
        assert_eq!(args.route, "roles.show");
        assert_eq!(args.args.as_deref(), Some("7"));
    }

    #[test]
    fn parses_method_case_insensitively() {
        let cli =
            Cli::try_parse_from(["route-bindings", "form", "stock.imprimir", "--method", "HEAD"])
                .unwrap();
        let Command::Form(args) = cli.command else {
            panic!("expected form subcommand");
        };
        assert_eq!(args.method, Some(Method::Head));
    }

    #[test]
    fn rejects_unknown_method() {
        assert!(
            Cli::try_parse_from(["route-bindings", "url", "x", "--method", "TRACE"]).is_err()
        );
    }

    #[test]
    fn resolve_input_borrows_args() {
        let args = ResolveArgs {
            route: "stock.imprimir".to_string(),
            args: None,
            query: Some(r#"{"x": 1}"#.to_string()),
            merge_query: None,
            context: None,
            method: None,
        };
        let registry = RouteRegistry::builder()
            .route(
                route_bindings::RouteDefinition::new(
                    "stock.imprimir",
                    &[Method::Get],
                    "/stock/imprimir",
                )
                .unwrap(),
            )
            .build()
            .unwrap();
        let request =
            route_bindings_cli::resolve_request(&registry, &resolve_input(&args)).unwrap();
        assert_eq!(request.url, "/stock/imprimir?x=1");
    }
}
