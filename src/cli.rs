use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::env;
use std::path::PathBuf;

use crate::fetcher::DEFAULT_DOCUMENT_URL;

/// OpenAPI client patcher - Generate a typescript-axios client from a running service
#[derive(Parser, Debug)]
#[command(name = "openapi-client-patcher")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Directory receiving the patched client files, relative to the current directory
    #[arg(value_name = "TARGET_DIR")]
    pub target_dir: PathBuf,

    /// URL of the OpenAPI document served by the running service
    #[arg(short = 'u', long = "url", default_value = DEFAULT_DOCUMENT_URL)]
    pub url: String,

    /// Read the OpenAPI document from a local file instead of fetching it
    #[arg(short = 'i', long = "input", value_name = "FILE", conflicts_with = "url")]
    pub input: Option<PathBuf>,

    /// Generator executable (defaults to the project's node_modules install, then PATH)
    #[arg(short = 'g', long = "generator", value_name = "PATH")]
    pub generator: Option<PathBuf>,

    /// Also write the normalized document to this file
    #[arg(long = "schema-output", value_name = "FILE")]
    pub schema_output: Option<PathBuf>,

    /// Format of the --schema-output file
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub schema_format: SchemaFormat,

    /// Fail when a patch rule does not match the generated code
    #[arg(long = "strict")]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options for the normalized document
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Where the raw document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Url(String),
    File(PathBuf),
}

impl CliArgs {
    pub fn source(&self) -> DocumentSource {
        match &self.input {
            Some(path) => DocumentSource::File(path.clone()),
            None => DocumentSource::Url(self.url.clone()),
        }
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    match args.source() {
        DocumentSource::File(ref path) => {
            if !path.is_file() {
                anyhow::bail!("Input file does not exist: {}", path.display());
            }
            info!("Input file: {}", path.display());
        }
        DocumentSource::Url(ref url) => {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("URL must start with http:// or https://: {}", url);
            }
            info!("Document URL: {}", url);
        }
    }

    if args.target_dir.exists() && !args.target_dir.is_dir() {
        anyhow::bail!(
            "Target path is not a directory: {}",
            args.target_dir.display()
        );
    }

    info!("Target directory: {}", args.target_dir.display());
    if let Some(ref output) = args.schema_output {
        info!("Schema output: {} ({:?})", output.display(), args.schema_format);
    }
    if args.strict {
        info!("Strict patching enabled");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::fetcher::{load_file, DocumentFetcher};
    use crate::generator::{locate_generator, GeneratorCommand, DEFAULT_GENERATOR};
    use crate::normalizer::normalize;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};
    use crate::workspace::{patch_generated_files, place_files, Workspace};

    let cwd = env::current_dir().context("Failed to read current directory")?;
    let target_dir = cwd.join(&args.target_dir);
    let workspace = Workspace::new()?;

    // Step 1: Fetch the raw document
    let raw = match args.source() {
        DocumentSource::Url(url) => DocumentFetcher::new()?.fetch(&url)?,
        DocumentSource::File(path) => load_file(&path)
            .with_context(|| format!("Failed to load OpenAPI document: {}", path.display()))?,
    };

    // Step 2: Normalize it and write it for the generator
    info!("Normalizing OpenAPI document...");
    let document = normalize(raw)?;
    let schema_path = workspace.write_schema(&document)?;

    if let Some(output_path) = &args.schema_output {
        let content = match args.schema_format {
            SchemaFormat::Yaml => serialize_yaml(&document)?,
            SchemaFormat::Json => serialize_json(&document)?,
        };
        info!("Writing normalized document to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    }

    // Step 3: Generate the client
    let program = args
        .generator
        .clone()
        .or_else(|| locate_generator(&cwd))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_GENERATOR));
    let generated_dir = workspace.generated_dir();
    GeneratorCommand::new(program, schema_path, generated_dir.clone()).run()?;

    // Step 4: Patch the generated files
    info!("Patching generated API files...");
    let reports = patch_generated_files(&generated_dir, args.strict)?;

    // Step 5: Copy them to the target directory
    place_files(&generated_dir, &target_dir)?;

    // Step 6: Summary (the workspace is removed when dropped)
    info!("Generation complete!");
    info!("Summary:");
    for report in &reports {
        let applied = report.rules.iter().filter(|rule| rule.matches > 0).count();
        info!(
            "  - {}: {}/{} patch rules applied",
            report.role.file_name(),
            applied,
            report.rules.len()
        );
    }
    info!("  - Output: {}", target_dir.display());

    Ok(())
}
