//! The conversion run.
//!
//! [`ConversionExecutor`] drives one run through its stages, strictly in
//! order:
//!
//! ```text
//! Idle -> Analyzing -> Transforming -> UpdatingDependencies
//!      -> ConvertingRoutes -> Finalizing -> Succeeded | Failed
//! ```
//!
//! Per-file failures are recorded and the run continues. An error that
//! escapes a stage is caught once in [`execute`](ConversionExecutor::execute),
//! which always returns a [`ConversionResult`].

use camino::Utf8Path;
use nv_core::{
    Config, ConversionOptions, ConversionResult, ConvertedFile, DiagnosticCategory,
    ExecutionStage, FileKind,
};
use nv_rewriter::{RuleEngine, RuleRegistry, StructuralTransformer};
use nv_routes::{api_endpoints, build_source_routes, convert_routes, render_route_module};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::analysis::ProjectAnalysis;
use crate::dependencies::{FrameworkUsage, apply_plan, default_plan, plan_for_manifest};
use crate::diagnostics::DiagnosticsReporter;
use crate::error::{ExecutionError, FileError, WalkError};
use crate::progress::{ProgressTracker, increments};
use crate::reader::{DiskReader, SourceReader};
use crate::walker::ProjectWalker;

/// Name of the rendered route module in collected outputs.
pub const ROUTER_MODULE: &str = "router.tsx";

/// Runs the conversion pipeline over one file set.
///
/// # Examples
///
/// ```
/// use nv_executor::{ConversionExecutor, MemoryReader};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let reader = MemoryReader::from_iter([(
///     "pages/index.tsx",
///     "import Link from 'next/link';\nexport default () => <Link href=\"/a\">A</Link>;\n",
/// )]);
/// let result = ConversionExecutor::new(["pages/index.tsx"], reader)
///     .execute()
///     .await;
///
/// assert!(result.success);
/// assert_eq!(result.stats.modified_files, 1);
/// assert_eq!(result.routes[0].path, "/");
/// # }
/// ```
#[derive(Debug)]
pub struct ConversionExecutor<R> {
    files: Vec<String>,
    reader: R,
    config: Config,
    progress: ProgressTracker,
    reporter: DiagnosticsReporter,
    result: ConversionResult,
    stage: ExecutionStage,
    analysis: ProjectAnalysis,
    usage: FrameworkUsage,
}

impl ConversionExecutor<DiskReader> {
    /// Collects the files below `root` and prepares a run over them.
    ///
    /// The project name is the root directory's name.
    ///
    /// # Errors
    ///
    /// Returns a [`WalkError`] if the project cannot be walked.
    pub async fn from_disk(root: &Utf8Path, config: Config) -> Result<Self, WalkError> {
        let files = ProjectWalker::new(root, &config.scan)?
            .collect_async()
            .await?;
        let project = root.file_name().unwrap_or("project").to_owned();
        Ok(Self::new(files, DiskReader::new(root))
            .with_config(config)
            .with_project_name(project))
    }
}

impl<R: SourceReader> ConversionExecutor<R> {
    /// Prepares a run over `files`, read through `reader`, with the default
    /// configuration.
    pub fn new(files: impl IntoIterator<Item = impl Into<String>>, reader: R) -> Self {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            reader,
            config: Config::default(),
            progress: ProgressTracker::new(),
            reporter: DiagnosticsReporter::new("project"),
            result: ConversionResult::default(),
            stage: ExecutionStage::Idle,
            analysis: ProjectAnalysis::default(),
            usage: FrameworkUsage::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replaces the conversion options.
    #[must_use]
    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Names the project in the diagnostics report.
    #[must_use]
    pub fn with_project_name(mut self, project: impl Into<String>) -> Self {
        self.reporter = DiagnosticsReporter::new(project);
        self
    }

    /// Calls `callback` with `(percent, message)` after every progress step.
    #[must_use]
    pub fn on_progress(mut self, callback: impl FnMut(f64, &str) + Send + 'static) -> Self {
        self.progress.set_callback(Box::new(callback));
        self
    }

    /// Runs every stage and returns the result. Never fails: errors end up
    /// in [`ConversionResult::errors`].
    pub async fn execute(mut self) -> ConversionResult {
        self.result.stats.total_files = self.files.len();
        info!(files = self.files.len(), "conversion started");

        if let Err(err) = self.run().await {
            error!(error = %err, stage = %self.stage, "conversion aborted");
            self.result.errors.push(format!("Unexpected error: {err}"));
            self.reporter.add_error(
                DiagnosticCategory::General,
                format!("Unexpected error during conversion: {err}"),
            );
            self.result.report = self.reporter.generate_report();
        }

        self.result.success = self.result.errors.is_empty();
        self.enter(if self.result.success {
            ExecutionStage::Succeeded
        } else {
            ExecutionStage::Failed
        });
        info!(
            success = self.result.success,
            modified = self.result.stats.modified_files,
            errors = self.result.errors.len(),
            "conversion finished"
        );
        self.result
    }

    async fn run(&mut self) -> Result<(), ExecutionError> {
        self.progress.advance(increments::START, "Starting conversion...");
        self.reporter.add_info(
            DiagnosticCategory::General,
            "Starting Next.js to Vite conversion",
        );

        self.analyze();
        self.transform().await?;
        self.update_dependencies().await;
        self.convert_routes();
        self.finalize();

        self.progress.complete("Conversion completed!");
        Ok(())
    }

    fn enter(&mut self, stage: ExecutionStage) {
        debug!(from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
    }

    fn analyze(&mut self) {
        self.enter(ExecutionStage::Analyzing);
        self.progress.advance(increments::ANALYZING, "Analyzing files...");
        self.reporter.add_info(
            DiagnosticCategory::Analysis,
            format!("Analyzing {} files", self.files.len()),
        );

        self.analysis = ProjectAnalysis::new(&self.files, &self.config);
        for line in self.analysis.summary_lines() {
            self.reporter
                .add_info(DiagnosticCategory::Analysis, format!("Found {line}"));
        }
        if self.config.options.handle_middleware {
            for name in self.analysis.of_kind(FileKind::Middleware) {
                self.reporter.add_info(
                    DiagnosticCategory::Middleware,
                    format!("Found middleware in {name}"),
                );
            }
        }

        self.reporter.complete_step(ExecutionStage::Analyzing.label());
    }

    async fn transform(&mut self) -> Result<(), ExecutionError> {
        self.enter(ExecutionStage::Transforming);
        let options = self.config.options;
        let engine = RuleEngine::for_options(RuleRegistry::builtin()?, &options);
        let structural = StructuralTransformer::new(options)
            .with_parse_timeout(self.config.executor.parse_timeout_micros);

        self.progress
            .advance(increments::TRANSFORMING, "Transforming files...");

        #[allow(clippy::cast_precision_loss)]
        let share = if self.files.is_empty() {
            0.0
        } else {
            increments::FILES / self.files.len() as f64
        };

        let files = std::mem::take(&mut self.analysis.files);
        for (name, kind) in &files {
            if kind.is_code() {
                match self.process_file(name, *kind, &engine, &structural).await {
                    Ok(()) => {}
                    Err(err) if err.is_recoverable() => {
                        let message = format!("Error processing {name}: {err}");
                        self.result.errors.push(message.clone());
                        self.reporter
                            .add_error(DiagnosticCategory::Transformation, message);
                    }
                    Err(err) => {
                        self.analysis.files = files;
                        return Err(err.into());
                    }
                }
            }
            self.progress.advance(share, &format!("Processing {name}..."));
        }
        self.analysis.files = files;

        self.result.stats.recompute_rate();
        self.reporter
            .complete_step(ExecutionStage::Transforming.label());
        Ok(())
    }

    async fn process_file(
        &mut self,
        name: &str,
        kind: FileKind,
        engine: &RuleEngine<'_>,
        structural: &StructuralTransformer,
    ) -> Result<(), FileError> {
        let content = self.reader.read_to_string(name).await?;
        if self.config.options.replace_components {
            self.usage.observe(&content);
        }

        self.reporter.add_info(
            DiagnosticCategory::Transformation,
            format!("Transforming {name} with AST"),
        );
        let ast = structural
            .apply_to_file(name, &content, kind)
            .map_err(|source| FileError::transform(name, source))?;

        self.reporter.add_info(
            DiagnosticCategory::Transformation,
            format!("Transforming {name} with regex"),
        );
        let rules = engine.apply(&ast.code);

        let category = match kind {
            FileKind::ApiRoute => DiagnosticCategory::Api,
            FileKind::Middleware => DiagnosticCategory::Middleware,
            _ => DiagnosticCategory::Transformation,
        };
        let warnings: Vec<String> = ast
            .warnings
            .iter()
            .map(|warning| format!("{name}: {warning}"))
            .collect();
        for message in &warnings {
            self.reporter.add_warning(category, message.clone());
        }

        if !ast.changed() && !rules.changed() {
            debug!(file = name, warnings = warnings.len(), "unchanged");
            return Ok(());
        }

        self.result.warnings.extend(warnings);
        self.result.stats.modified_files += 1;
        debug!(
            file = name,
            changes = ast.changes.len(),
            rules = rules.applied_transformations.len(),
            "file transformed"
        );
        self.result.info.push(format!(
            "Transformed {name}:\n{}",
            rules.applied_transformations.join("\n")
        ));

        if self.result.stats.modified_files == 1 {
            self.result.original_code.clone_from(&content);
            self.result.transformed_code.clone_from(&rules.transformed_code);
        }
        if self.config.executor.collect_outputs {
            self.result.outputs.push(ConvertedFile {
                name: name.to_owned(),
                code: rules.transformed_code,
            });
        }
        self.result
            .applied_transformations
            .extend(rules.applied_transformations);
        self.result.changes.extend(ast.changes);
        Ok(())
    }

    async fn update_dependencies(&mut self) {
        self.enter(ExecutionStage::UpdatingDependencies);
        self.progress
            .advance(increments::DEPENDENCIES, "Updating dependencies...");

        if self.config.options.update_dependencies {
            self.reporter.add_info(
                DiagnosticCategory::Dependencies,
                "Updating package.json dependencies",
            );
            let plan = match self.analysis.manifest().map(ToOwned::to_owned) {
                None => {
                    self.reporter.add_info(
                        DiagnosticCategory::Dependencies,
                        "No package.json found; using the default dependency plan",
                    );
                    default_plan(self.usage)
                }
                Some(file) => match self.read_manifest(&file).await {
                    Ok(mut manifest) => {
                        let plan = plan_for_manifest(&manifest, self.usage);
                        if self.config.executor.collect_outputs && !plan.is_empty() {
                            apply_plan(&mut manifest, &plan);
                            self.push_manifest_output(file, &manifest);
                        }
                        plan
                    }
                    Err(err) => {
                        let message = format!("{err}; using the default dependency plan");
                        self.reporter
                            .add_warning(DiagnosticCategory::Dependencies, message.clone());
                        self.result.warnings.push(message);
                        default_plan(self.usage)
                    }
                },
            };

            self.result.stats.dependency_changes = plan.len();
            if !plan.is_empty() {
                self.result.info.push("Updated dependencies:".to_owned());
                self.result
                    .info
                    .extend(plan.iter().map(|change| format!("- {change}")));
            }
            self.reporter.add_info(
                DiagnosticCategory::Dependencies,
                format!("Planned {} dependency changes", plan.len()),
            );
            self.result.dependency_plan = plan;
        } else {
            self.skip(
                DiagnosticCategory::Dependencies,
                "Dependency updates skipped as per options",
            );
        }

        self.reporter
            .complete_step(ExecutionStage::UpdatingDependencies.label());
    }

    async fn read_manifest(&self, file: &str) -> Result<Value, FileError> {
        let text = self.reader.read_to_string(file).await?;
        serde_json::from_str(&text).map_err(|source| FileError::manifest(file, source))
    }

    fn push_manifest_output(&mut self, file: String, manifest: &Value) {
        match serde_json::to_string_pretty(manifest) {
            Ok(mut code) => {
                code.push('\n');
                self.result.outputs.push(ConvertedFile { name: file, code });
            }
            Err(err) => self.reporter.add_warning(
                DiagnosticCategory::Dependencies,
                format!("could not render {file}: {err}"),
            ),
        }
    }

    fn convert_routes(&mut self) {
        self.enter(ExecutionStage::ConvertingRoutes);
        self.progress
            .advance(increments::ROUTES, "Converting routes...");

        if self.config.options.use_react_router {
            self.reporter
                .add_info(DiagnosticCategory::Routes, "Converting file-based routes");
            let routes = build_source_routes(&self.files, &self.config.routes);
            let tree = convert_routes(&routes, &self.config.routes);
            self.result.stats.route_changes = routes.len();

            let message = if routes.is_empty() {
                "No page routes found to convert".to_owned()
            } else {
                format!(
                    "Converted {} page routes into {} route objects",
                    routes.len(),
                    tree.count()
                )
            };
            self.reporter
                .add_info(DiagnosticCategory::Routes, message.clone());
            self.result.info.push(message);

            if self.config.executor.collect_outputs && !tree.is_empty() {
                self.result.outputs.push(ConvertedFile {
                    name: ROUTER_MODULE.to_owned(),
                    code: render_route_module(&tree),
                });
            }
            self.result.routes = tree.routes;
        } else {
            self.skip(
                DiagnosticCategory::Routes,
                "Route conversion skipped as per options",
            );
        }

        if self.config.options.convert_api_routes {
            self.reporter
                .add_info(DiagnosticCategory::Api, "Converting API routes");
            let endpoints = api_endpoints(&self.files, &self.config.routes);
            if endpoints.is_empty() {
                self.result
                    .info
                    .push("No API routes found to convert".to_owned());
            } else {
                self.result.info.push(format!(
                    "Found {} API routes that need a server runtime:",
                    endpoints.len()
                ));
                for endpoint in &endpoints {
                    let line = format!("- {} ({})", endpoint.path, endpoint.file);
                    self.reporter.add_info(DiagnosticCategory::Api, line.clone());
                    self.result.info.push(line);
                }
            }
        } else {
            self.skip(
                DiagnosticCategory::Api,
                "API route conversion skipped as per options",
            );
        }

        self.reporter
            .complete_step(ExecutionStage::ConvertingRoutes.label());
    }

    fn finalize(&mut self) {
        self.enter(ExecutionStage::Finalizing);
        self.progress
            .advance(increments::FINALIZING, "Finalizing conversion...");
        self.result.stats.recompute_rate();

        let summary = [
            String::new(),
            "Conversion Summary:".to_owned(),
            format!("- Total files processed: {}", self.files.len()),
            format!("- Modified files: {}", self.result.stats.modified_files),
            format!(
                "- Applied transformations: {}",
                self.result.applied_transformations.len()
            ),
            format!("- Warnings: {}", self.result.warnings.len()),
            format!("- Errors: {}", self.result.errors.len()),
        ];
        self.result.info.extend(summary);

        self.reporter
            .complete_step(ExecutionStage::Finalizing.label());
        self.result.report = self.reporter.generate_report();
    }

    fn skip(&mut self, category: DiagnosticCategory, notice: &str) {
        self.reporter.add_info(category, notice);
        self.result.info.push(notice.to_owned());
    }
}
