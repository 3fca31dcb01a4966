//! CLI entry point for the nv-migrate tool.
//!
//! This binary converts a Next.js project to Vite with React Router: it
//! rewrites framework imports and APIs, plans `package.json` changes and
//! turns the `pages/` tree into a `createBrowserRouter` route table.
//!
//! # Usage
//!
//! ```bash
//! nv-migrate [OPTIONS] <COMMAND>
//!
//! # Run the conversion and print a summary
//! nv-migrate convert --path ./shop
//!
//! # Write converted files to a separate directory
//! nv-migrate convert --path ./shop --output ./shop-vite
//!
//! # Print the route module for the pages tree
//! nv-migrate routes --path ./shop --format tsx
//!
//! # List the rewrite rules of one category
//! nv-migrate rules --category routing
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fmt::Write as _;
use std::io::Write as _;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use nv_core::{
    Config, ConversionOptions, ConversionResult, ConversionStats, DependencyChange,
    DiagnosticsReport, RouteObject, RuleCategory, RuleComplexity,
};
use nv_executor::{ConversionExecutor, ProjectWalker};
use nv_rewriter::RuleRegistry;
use nv_routes::{build_source_routes, convert_routes, render_route_module};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration file picked up from the project root when `--config` is not given.
const CONFIG_FILE_NAME: &str = "nv-migrate.json";

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Converts a Next.js project to Vite with React Router.
#[derive(Parser)]
#[command(name = "nv-migrate", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Path to the Next.js project root.
    ///
    /// Defaults to the current directory.
    #[arg(short, long, global = true, env = "NV_MIGRATE_PATH")]
    path: Option<Utf8PathBuf>,

    /// Path to a JSON configuration file.
    ///
    /// Defaults to `nv-migrate.json` in the project root if it exists.
    #[arg(short, long, global = true, env = "NV_MIGRATE_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run the conversion and print a summary.
    Convert(ConvertArgs),

    /// Print the route tree derived from the pages directory.
    Routes {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = RoutesFormat::Json)]
        format: RoutesFormat,
    },

    /// List the built-in rewrite rules.
    Rules {
        /// Only show rules of this category.
        #[arg(long, value_parser = parse_category)]
        category: Option<RuleCategory>,

        /// Only show rules of this complexity.
        #[arg(long, value_parser = parse_complexity)]
        complexity: Option<RuleComplexity>,
    },
}

/// Arguments of `convert`.
#[derive(Args)]
struct ConvertArgs {
    /// Summary format.
    #[arg(short, long, value_enum, default_value_t = SummaryFormat::Text)]
    format: SummaryFormat,

    /// Directory to write converted files to.
    #[arg(short, long, env = "NV_MIGRATE_OUTPUT")]
    output: Option<Utf8PathBuf>,

    /// Abort parsing a file after this many microseconds.
    #[arg(long, env = "NV_MIGRATE_PARSE_TIMEOUT_US")]
    parse_timeout: Option<u64>,

    #[command(flatten)]
    flags: OptionFlags,
}

/// Switches that turn individual conversions off.
#[derive(Args, Default)]
struct OptionFlags {
    /// Keep Next.js routing APIs and skip route conversion.
    #[arg(long, env = "NV_MIGRATE_NO_REACT_ROUTER")]
    no_react_router: bool,

    /// Leave API routes untouched.
    #[arg(long, env = "NV_MIGRATE_NO_API_ROUTES")]
    no_api_routes: bool,

    /// Leave data-fetching exports untouched.
    #[arg(long, env = "NV_MIGRATE_NO_DATA_FETCHING")]
    no_data_fetching: bool,

    /// Keep `next/link`, `next/image` and friends.
    #[arg(long, env = "NV_MIGRATE_NO_COMPONENTS")]
    no_components: bool,

    /// Do not plan `package.json` changes.
    #[arg(long, env = "NV_MIGRATE_NO_DEPENDENCIES")]
    no_dependencies: bool,

    /// Skip the general TypeScript cleanups.
    #[arg(long, env = "NV_MIGRATE_NO_TYPESCRIPT")]
    no_typescript: bool,

    /// Skip middleware and config handling.
    #[arg(long, env = "NV_MIGRATE_NO_MIDDLEWARE")]
    no_middleware: bool,
}

impl OptionFlags {
    /// Turns off every option whose flag is set. Unset flags keep the
    /// configured value.
    fn apply(&self, options: &mut ConversionOptions) {
        options.use_react_router &= !self.no_react_router;
        options.convert_api_routes &= !self.no_api_routes;
        options.transform_data_fetching &= !self.no_data_fetching;
        options.replace_components &= !self.no_components;
        options.update_dependencies &= !self.no_dependencies;
        options.preserve_typescript &= !self.no_typescript;
        options.handle_middleware &= !self.no_middleware;
    }
}

/// Summary output format of `convert`.
#[derive(Clone, Copy, ValueEnum)]
enum SummaryFormat {
    /// Human-readable text.
    Text,
    /// JSON format.
    Json,
}

/// Output format of `routes`.
#[derive(Clone, Copy, ValueEnum)]
enum RoutesFormat {
    /// The route objects as JSON.
    Json,
    /// A `createBrowserRouter` module.
    Tsx,
}

fn parse_category(label: &str) -> Result<RuleCategory, String> {
    RuleCategory::from_label(label).ok_or_else(|| {
        let known: Vec<&str> = RuleCategory::ALL.into_iter().map(RuleCategory::label).collect();
        format!("unknown category '{label}' (expected one of: {})", known.join(", "))
    })
}

fn parse_complexity(label: &str) -> Result<RuleComplexity, String> {
    RuleComplexity::from_label(label).ok_or_else(|| {
        let known: Vec<&str> = RuleComplexity::ALL.into_iter().map(RuleComplexity::label).collect();
        format!("unknown complexity '{label}' (expected one of: {})", known.join(", "))
    })
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
/// The file walking crates are filtered to `warn` level.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Resolves and validates the project root.
fn project_root(path: Option<&Utf8Path>) -> color_eyre::Result<Utf8PathBuf> {
    let path = path.map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_owned);

    if !path.exists() {
        return Err(eyre!("Path does not exist: {path}"));
    }
    if !path.is_dir() {
        return Err(eyre!("Path is not a directory: {path}"));
    }
    Ok(path)
}

/// Loads the configuration: `--config` if given, else `nv-migrate.json` in
/// the project root if present, else the defaults.
fn load_config(explicit: Option<&Utf8Path>, root: &Utf8Path) -> color_eyre::Result<Config> {
    let path = match explicit {
        Some(path) => path.to_owned(),
        None => {
            let candidate = root.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                debug!(root = %root, "no configuration file, using defaults");
                return Ok(Config::default());
            }
            candidate
        }
    };
    info!(path = %path, "loading configuration");
    Ok(Config::load(&path)?)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs the conversion over the project at `root`.
///
/// # Errors
///
/// Returns an error if the project cannot be walked, outputs cannot be
/// written, or the conversion recorded errors.
async fn run_convert(
    root: &Utf8Path,
    mut config: Config,
    args: ConvertArgs,
) -> color_eyre::Result<()> {
    args.flags.apply(&mut config.options);
    if let Some(micros) = args.parse_timeout {
        config.executor.parse_timeout_micros = micros;
    }
    if args.output.is_some() {
        config.executor.collect_outputs = true;
    }
    info!(root = %root, options = ?config.options, "Starting conversion");

    let result = ConversionExecutor::from_disk(root, config)
        .await
        .wrap_err("Failed to collect project files")?
        .on_progress(|percent, message| debug!(percent, "{message}"))
        .execute()
        .await;

    if let Some(dir) = &args.output {
        write_outputs(dir, &result).await?;
    }

    let content = match args.format {
        SummaryFormat::Text => render_summary_text(&result),
        SummaryFormat::Json => render_summary_json(&result)?,
    };
    write_stdout(&content)?;

    if result.success {
        Ok(())
    } else {
        Err(eyre!("Conversion finished with {} errors", result.errors.len()))
    }
}

/// Writes every collected output below `dir`.
async fn write_outputs(dir: &Utf8Path, result: &ConversionResult) -> color_eyre::Result<()> {
    for output in &result.outputs {
        let path = dir.join(&output.name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Failed to create {parent}"))?;
        }
        tokio::fs::write(&path, &output.code)
            .await
            .wrap_err_with(|| format!("Failed to write {path}"))?;
        debug!(path = %path, "output written");
    }
    info!(dir = %dir, files = result.outputs.len(), "Converted files written");
    Ok(())
}

/// Prints the route tree of the project at `root`.
///
/// # Errors
///
/// Returns an error if the project cannot be walked or serialized.
fn run_routes(root: &Utf8Path, config: &Config, format: RoutesFormat) -> color_eyre::Result<()> {
    let files = ProjectWalker::new(root, &config.scan)?.collect()?;
    let source_routes = build_source_routes(&files, &config.routes);
    if source_routes.is_empty() {
        warn!(pages_root = %config.routes.pages_root, "no page routes found");
    }
    let tree = convert_routes(&source_routes, &config.routes);

    let content = match format {
        RoutesFormat::Json => {
            let mut json = serde_json::to_string_pretty(&tree.routes)
                .wrap_err("Failed to serialize routes")?;
            json.push('\n');
            json
        }
        RoutesFormat::Tsx => render_route_module(&tree),
    };
    write_stdout(&content)
}

/// Lists the built-in rules.
///
/// # Errors
///
/// Returns an error if the rule registry fails to compile.
fn run_rules(
    category: Option<RuleCategory>,
    complexity: Option<RuleComplexity>,
) -> color_eyre::Result<()> {
    let registry = RuleRegistry::builtin()?;
    write_stdout(&render_rules(registry, category, complexity))
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn write_stdout(content: &str) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{content}")?;
    handle.flush()?;
    Ok(())
}

/// Renders the info lines followed by warnings and errors.
fn render_summary_text(result: &ConversionResult) -> String {
    let mut output = String::new();

    for line in &result.info {
        let _ = writeln!(output, "{line}");
    }
    if !result.warnings.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Warnings ({}):", result.warnings.len());
        for warning in &result.warnings {
            let _ = writeln!(output, "  {warning}");
        }
    }
    if !result.errors.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Errors ({}):", result.errors.len());
        for error in &result.errors {
            let _ = writeln!(output, "  {error}");
        }
    }
    let _ = writeln!(
        output,
        "\nTransformation rate: {:.1}%",
        result.stats.transformation_rate * 100.0
    );

    output
}

/// Renders the result without file contents as JSON.
fn render_summary_json(result: &ConversionResult) -> color_eyre::Result<String> {
    #[derive(serde::Serialize)]
    struct Summary<'a> {
        success: bool,
        stats: &'a ConversionStats,
        errors: &'a [String],
        warnings: &'a [String],
        info: &'a [String],
        applied_transformations: &'a [String],
        changes: &'a [String],
        routes: &'a [RouteObject],
        dependency_plan: &'a [DependencyChange],
        diagnostics: &'a DiagnosticsReport,
    }

    let summary = Summary {
        success: result.success,
        stats: &result.stats,
        errors: &result.errors,
        warnings: &result.warnings,
        info: &result.info,
        applied_transformations: &result.applied_transformations,
        changes: &result.changes,
        routes: &result.routes,
        dependency_plan: &result.dependency_plan,
        diagnostics: &result.report,
    };
    let mut json = serde_json::to_string_pretty(&summary)
        .map_err(|e| eyre!("Failed to serialize JSON: {}", e))?;
    json.push('\n');
    Ok(json)
}

/// One line per rule: category, complexity and description.
fn render_rules(
    registry: &RuleRegistry,
    category: Option<RuleCategory>,
    complexity: Option<RuleComplexity>,
) -> String {
    let mut output = String::new();
    let mut shown = 0_usize;

    for rule in registry
        .iter()
        .filter(|r| category.is_none_or(|c| r.category() == c))
        .filter(|r| complexity.is_none_or(|c| r.complexity() == c))
    {
        shown += 1;
        let _ = writeln!(
            output,
            "{:<14} {:<8} {}",
            rule.category().label(),
            rule.complexity().label(),
            rule.description()
        );
    }
    let _ = writeln!(output, "\n{shown} of {} rules", registry.len());

    output
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to appropriate command
    let Cli {
        command,
        path,
        config,
        ..
    } = cli;
    match command {
        Commands::Convert(args) => {
            let root = project_root(path.as_deref())?;
            let config = load_config(config.as_deref(), &root)?;
            run_convert(&root, config, args).await
        }
        Commands::Routes { format } => {
            let root = project_root(path.as_deref())?;
            let config = load_config(config.as_deref(), &root)?;
            run_routes(&root, &config, format)
        }
        Commands::Rules {
            category,
            complexity,
        } => run_rules(category, complexity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_only_turn_options_off() {
        let flags = OptionFlags {
            no_dependencies: true,
            no_api_routes: true,
            ..OptionFlags::default()
        };
        let mut options = ConversionOptions::all();
        options.handle_middleware = false;
        flags.apply(&mut options);

        assert!(!options.update_dependencies);
        assert!(!options.convert_api_routes);
        assert!(!options.handle_middleware);
        assert!(options.use_react_router);
        assert!(options.replace_components);
    }

    #[test]
    fn test_parse_convert_command() {
        let cli = Cli::try_parse_from([
            "nv-migrate",
            "convert",
            "--path",
            "shop",
            "--format",
            "json",
            "--no-components",
        ])
        .expect("parse");

        assert_eq!(cli.path.as_deref(), Some(Utf8Path::new("shop")));
        let Commands::Convert(args) = cli.command else {
            unreachable!("expected convert");
        };
        assert!(matches!(args.format, SummaryFormat::Json));
        assert!(args.flags.no_components);
        assert!(!args.flags.no_react_router);
    }

    #[test]
    fn test_parse_rule_filters() {
        assert_eq!(parse_category("data-fetching"), Ok(RuleCategory::DataFetching));
        assert_eq!(parse_complexity("simple"), Ok(RuleComplexity::Simple));
        assert!(parse_category("styling").is_err_and(|e| e.contains("routing")));
        assert!(Cli::try_parse_from(["nv-migrate", "rules", "--category", "styling"]).is_err());
    }

    #[test]
    fn test_render_rules_filters() {
        let registry = RuleRegistry::builtin().expect("builtin rules");
        let all = render_rules(registry, None, None);
        assert!(all.ends_with(&format!("\n{0} of {0} rules\n", registry.len())));

        let routing = render_rules(registry, Some(RuleCategory::Routing), None);
        let lines: Vec<&str> = routing.lines().take_while(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), registry.by_category(RuleCategory::Routing).count());
        assert!(lines.iter().all(|l| l.starts_with("routing ")));
    }

    #[test]
    fn test_config_file_discovery() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8");

        let defaults = load_config(None, &root).expect("defaults");
        assert_eq!(defaults, Config::default());

        std::fs::write(
            root.join(CONFIG_FILE_NAME),
            r#"{ "routes": { "pages_root": "src/pages" } }"#,
        )
        .expect("write");
        let loaded = load_config(None, &root).expect("load");
        assert_eq!(loaded.routes.pages_root, "src/pages");
        assert!(loaded.options.use_react_router);

        assert!(load_config(Some(&root.join("missing.json")), &root).is_err());
    }

    #[test]
    fn test_project_root_validation() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8");
        let file = root.join("package.json");
        std::fs::write(&file, "{}").expect("write");

        assert_eq!(project_root(Some(&root)).expect("dir"), root);
        assert_eq!(project_root(None).expect("cwd"), Utf8PathBuf::from("."));
        assert!(project_root(Some(&root.join("missing"))).is_err_and(|e| e.to_string().contains("does not exist")));
        assert!(project_root(Some(&file)).is_err_and(|e| e.to_string().contains("not a directory")));
    }

    #[test]
    fn test_text_summary_lists_problems() {
        let result = ConversionResult {
            info: vec!["Conversion Summary:".to_owned()],
            warnings: vec!["pages/api/a.ts: line 1: API handler needs a server runtime".to_owned()],
            errors: vec!["Error processing pages/b.tsx: file not found: pages/b.tsx".to_owned()],
            ..ConversionResult::default()
        };
        let text = render_summary_text(&result);

        assert!(text.starts_with("Conversion Summary:\n"));
        assert!(text.contains("Warnings (1):\n  pages/api/a.ts"));
        assert!(text.contains("Errors (1):\n  Error processing pages/b.tsx"));
        assert!(text.ends_with("Transformation rate: 0.0%\n"));
    }
}
