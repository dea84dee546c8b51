use crate::assembler::SpecAssembler;
use crate::catalog::DuplicatePolicy;
use crate::model::Specification;
use crate::scanner::SourceScanner;
use crate::serializer::{serialize_json, serialize_json_compact, serialize_yaml, write_to_file};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::PathBuf;

/// ATOZ - Generate an API specification from annotation blocks in any source tree
#[derive(Parser, Debug)]
#[command(name = "atoz")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the source tree to scan
    #[arg(value_name = "SOURCE_DIR", default_value = ".")]
    pub source_dir: PathBuf,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Emit JSON on a single line
    #[arg(long = "compact")]
    pub compact: bool,

    /// Fail when two blocks of the same kind share a @ref
    #[arg(long = "strict")]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl CliArgs {
    /// Duplicate-reference policy selected by `--strict`.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.strict {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::Replace
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.source_dir.exists() {
        anyhow::bail!("Source path does not exist: {}", args.source_dir.display());
    }

    if !args.source_dir.is_dir() {
        anyhow::bail!("Source path is not a directory: {}", args.source_dir.display());
    }

    if args.compact && args.output_format == OutputFormat::Yaml {
        warn!("--compact only applies to JSON output and is ignored for YAML");
    }

    info!("Source path: {}", args.source_dir.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    info!("Duplicate references: {:?}", args.duplicate_policy());

    Ok(args)
}

/// Renders the specification in the format the arguments ask for.
pub fn render(spec: &Specification, args: &CliArgs) -> Result<String> {
    match (args.output_format, args.compact) {
        (OutputFormat::Yaml, _) => serialize_yaml(spec),
        (OutputFormat::Json, true) => serialize_json_compact(spec),
        (OutputFormat::Json, false) => serialize_json(spec),
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting API specification generation...");

    // Step 1: Collect candidate source files
    info!("Scanning source tree...");
    let scanner = SourceScanner::new(args.source_dir.clone());
    let scan_result = scanner.scan()?;

    info!("Found {} files", scan_result.files.len());
    for warning in &scan_result.warnings {
        warn!("{}", warning);
    }

    // Step 2: Extract and assemble annotation blocks
    info!("Extracting annotation blocks...");
    let assembler = SpecAssembler::with_policy(args.duplicate_policy());
    let spec = assembler.assemble_files(&scan_result.files)?;

    if spec.actions.is_empty() && spec.objects.is_empty() {
        warn!("No annotated actions or objects found");
    }

    // Step 3: Serialize
    info!("Serializing to {:?} format...", args.output_format);
    let content = render(&spec, &args)?;

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Files scanned: {}", scan_result.files.len());
    info!("  - Actions: {}", spec.actions.len());
    info!("  - Objects: {}", spec.objects.len());

    Ok(())
}
