//! Command-line interface for the classgram utility
//!
//! Converts class diagram notation into skeletal source code and renders
//! descriptor catalogs as class diagrams.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use classgram::core::logging::init_logging;
use classgram::plugins::class::DescriptorCatalog;
use classgram::plugins::Orchestrator;
use classgram::{MemberFilter, SourceConfig, Visibility, DEFAULT_PLACEHOLDER_TYPE};

/// Classgram - Convert between Mermaid class diagrams and code skeletons
#[derive(Parser)]
#[command(name = "classgram")]
#[command(about = "Turn Mermaid class diagrams into skeleton code and type catalogs into class diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate skeleton source code from a class diagram
    Code {
        /// Input file containing the class diagram (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the generated code (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Type written for members declared without one
        #[arg(long, default_value = DEFAULT_PLACEHOLDER_TYPE)]
        placeholder: String,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,
    },

    /// Render types from a descriptor catalog as a class diagram
    Diagram {
        /// JSON descriptor catalog
        #[arg(short, long)]
        catalog: PathBuf,

        /// Names of the types to include
        #[arg(long, required = true, num_args = 1..)]
        classes: Vec<String>,

        /// Include members of every accessibility
        #[arg(long)]
        all: bool,

        /// Include public members only (overrides --all)
        #[arg(long)]
        public: bool,

        /// Lowest accessibility of included methods
        #[arg(long, value_enum)]
        method: Option<Access>,

        /// Lowest accessibility of included fields
        #[arg(long, value_enum)]
        field: Option<Access>,

        /// Lowest accessibility of included properties
        #[arg(long, value_enum)]
        props: Option<Access>,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate class diagram syntax
    Validate {
        /// Input file to validate (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a class diagram in canonical layout
    Format {
        /// Input file containing the class diagram (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for the formatted diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Member accessibility floors
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum Access {
    Public,
    Internal,
    Protected,
    Private,
}

impl From<Access> for Visibility {
    fn from(value: Access) -> Self {
        match value {
            Access::Public => Visibility::Public,
            Access::Internal => Visibility::Internal,
            Access::Protected => Visibility::Protected,
            Access::Private => Visibility::Private,
        }
    }
}

/// Resolve the diagram command's accessibility flags
///
/// `--public` beats `--all`; either one overrides the per-kind floors.
pub fn resolve_member_filter(
    all: bool,
    public: bool,
    method: Option<Access>,
    field: Option<Access>,
    props: Option<Access>,
) -> MemberFilter {
    if public {
        return MemberFilter::public_only();
    }
    if all {
        return MemberFilter::all();
    }
    let floor = |access: Option<Access>| access.map(Visibility::from).unwrap_or_default();
    MemberFilter::new(floor(method), floor(field), floor(props))
}

/// Main CLI application
pub struct ClassgramApp {
    orchestrator: Orchestrator,
}

impl ClassgramApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self {
            orchestrator: Orchestrator::new(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over the flags
        let log_level = std::env::var("CLASSGRAM_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| {
                if cli.verbose && cli.log_level == LogLevel::Warn {
                    LogLevel::Info.as_str().to_string()
                } else {
                    cli.log_level.as_str().to_string()
                }
            });
        let log_format = std::env::var("CLASSGRAM_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Classgram v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Code {
                input,
                output,
                placeholder,
                indent,
            } => self.code_command(input, output, placeholder, indent, cli.verbose),
            Commands::Diagram {
                catalog,
                classes,
                all,
                public,
                method,
                field,
                props,
                output,
            } => {
                let filter = resolve_member_filter(all, public, method, field, props);
                self.diagram_command(catalog, classes, filter, output, cli.verbose)
            }
            Commands::Validate { input, json } => self.validate_command(input, json, cli.verbose),
            Commands::Format { input, output } => self.format_command(input, output, cli.verbose),
        }
    }

    /// Handle the code command
    fn code_command(
        &mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        placeholder: String,
        indent: usize,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let config = SourceConfig::new()
            .with_indent_width(indent)
            .with_placeholder_type(placeholder);
        self.orchestrator = Orchestrator::new().with_source_config(config);

        let source = self.orchestrator.notation_to_source(&content)?;
        if verbose {
            eprintln!("Generated {} bytes of source", source.len());
        }
        self.write_output(output, &source)
    }

    /// Handle the diagram command
    fn diagram_command(
        &mut self,
        catalog: PathBuf,
        classes: Vec<String>,
        filter: MemberFilter,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let catalog = DescriptorCatalog::from_path(&catalog).map_err(|e| {
            anyhow!(
                "Failed to load descriptor catalog '{}': {}",
                catalog.display(),
                e
            )
        })?;
        info!(types = catalog.len(), "loaded descriptor catalog");
        if verbose {
            eprintln!(
                "Loaded {} descriptors, rendering {} requested types",
                catalog.len(),
                classes.len()
            );
        }

        self.orchestrator = Orchestrator::new().with_member_filter(filter);
        debug!(?filter, "member filter");
        let notation = self.orchestrator.names_to_notation(&classes, &catalog)?;
        self.write_output(output, &notation)
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        match self.orchestrator.validate(&content) {
            Ok(summary) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    println!(
                        "✓ Valid class diagram: {} classes, {} members, {} relations, {} notes",
                        summary.classes, summary.members, summary.relations, summary.notes
                    );
                }
                Ok(())
            }
            Err(e) => {
                if json {
                    let report = serde_json::json!({ "valid": false, "error": e.to_string() });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("✗ Invalid class diagram: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Handle the format command
    fn format_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let formatted = self.orchestrator.notation_to_notation(&content)?;
        self.write_output(output, &formatted)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                let mut stdout = io::stdout();
                stdout.write_all(content.as_bytes())?;
                if !content.is_empty() && !content.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
                stdout.flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ClassgramApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const DIAGRAM: &str = "classDiagram\n    A <|-- B\n    B ..|> C\n\n    class A\n    class B {\n        -TestField\n        +int AnotherTestField\n        +TestMethod() int*\n        +VoidMethod()$\n    }\n";

    const CATALOG: &str = r#"[
        { "name": "Shape", "is_abstract": true },
        {
            "name": "Circle",
            "base_type": { "name": "Shape" },
            "members": [
                { "kind": "property", "name": "Radius", "type": "double" },
                { "kind": "field", "name": "cache", "type": "int", "accessibility": "private" }
            ]
        }
    ]"#;

    #[test]
    fn test_cli_parsing_code_command() {
        let args = vec![
            "classgram",
            "code",
            "--input",
            "model.mmd",
            "--output",
            "Model.cs",
            "--placeholder",
            "object",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Code {
                input,
                output,
                placeholder,
                indent,
            } => {
                assert_eq!(input.unwrap().to_string_lossy(), "model.mmd");
                assert_eq!(output.unwrap().to_string_lossy(), "Model.cs");
                assert_eq!(placeholder, "object");
                assert_eq!(indent, 4);
            }
            _ => panic!("Expected Code command"),
        }
    }

    #[test]
    fn test_cli_parsing_diagram_command() {
        let args = vec![
            "classgram",
            "diagram",
            "--catalog",
            "types.json",
            "--classes",
            "Shape",
            "Circle",
            "--method",
            "protected",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Diagram {
                catalog,
                classes,
                all,
                public,
                method,
                field,
                props,
                output,
            } => {
                assert_eq!(catalog.to_string_lossy(), "types.json");
                assert_eq!(classes, vec!["Shape", "Circle"]);
                assert!(!all);
                assert!(!public);
                assert_eq!(method, Some(Access::Protected));
                assert_eq!(field, None);
                assert_eq!(props, None);
                assert!(output.is_none());
            }
            _ => panic!("Expected Diagram command"),
        }
    }

    #[test]
    fn test_cli_diagram_requires_classes() {
        let args = vec!["classgram", "diagram", "--catalog", "types.json"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_validate_command() {
        let cli = Cli::try_parse_from(vec!["classgram", "validate", "--json"]).unwrap();

        match cli.command {
            Commands::Validate { input, json } => {
                assert!(input.is_none());
                assert!(json);
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(vec![
            "classgram",
            "format",
            "--verbose",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_member_filter_resolution() {
        assert_eq!(
            resolve_member_filter(false, false, None, None, None),
            MemberFilter::public_only()
        );
        assert_eq!(
            resolve_member_filter(true, false, Some(Access::Public), None, None),
            MemberFilter::all()
        );
        assert_eq!(
            resolve_member_filter(true, true, Some(Access::Private), None, None),
            MemberFilter::public_only()
        );
        assert_eq!(
            resolve_member_filter(false, false, Some(Access::Private), None, Some(Access::Internal)),
            MemberFilter::new(Visibility::Private, Visibility::Public, Visibility::Internal)
        );
    }

    #[test]
    fn test_read_input_from_file() {
        let app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("model.mmd");
        fs::write(&file_path, DIAGRAM).unwrap();

        let content = app.read_input(Some(file_path)).unwrap();
        assert_eq!(content, DIAGRAM);
    }

    #[test]
    fn test_read_input_missing_file() {
        let app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let err = app
            .read_input(Some(dir.path().join("missing.mmd")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_write_output_to_file() {
        let app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("out.cs");

        app.write_output(Some(file_path.clone()), "public class A\n{\n}\n")
            .unwrap();
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "public class A\n{\n}\n"
        );
    }

    #[test]
    fn test_code_command_writes_source() {
        let mut app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("model.mmd");
        let output = dir.path().join("Model.cs");
        fs::write(&input, DIAGRAM).unwrap();

        app.code_command(Some(input), Some(output.clone()), "TYPE".to_string(), 4, false)
            .unwrap();

        let source = fs::read_to_string(&output).unwrap();
        assert!(source.contains("public class A\n{\n}\n"));
        assert!(source.contains("public abstract class B : A, C\n"));
        assert!(source.contains("    private TYPE TestField { get; set; }\n"));
        assert!(source.contains("    public abstract int TestMethod();\n"));
        assert!(source.contains("    public static void VoidMethod()\n"));
    }

    #[test]
    fn test_code_command_rejects_invalid_input() {
        let mut app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.mmd");
        fs::write(&input, "classDiagram\nclass B {\n    -x\n").unwrap();

        let result = app.code_command(
            Some(input),
            Some(dir.path().join("out.cs")),
            "TYPE".to_string(),
            4,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_diagram_command_writes_notation() {
        let mut app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("types.json");
        let output = dir.path().join("types.mmd");
        fs::write(&catalog, CATALOG).unwrap();

        app.diagram_command(
            catalog,
            vec!["Shape".into(), "Circle".into(), "Square".into()],
            MemberFilter::default(),
            Some(output.clone()),
            false,
        )
        .unwrap();

        let notation = fs::read_to_string(&output).unwrap();
        assert!(notation.starts_with("classDiagram\n"));
        assert!(notation.contains("    Circle : +double Radius\n"));
        assert!(!notation.contains("cache"));
        assert!(notation.contains("    Circle ..|> Shape\n"));
        assert!(notation.contains("    note \"Square not found\"\n"));
    }

    #[test]
    fn test_diagram_command_missing_catalog() {
        let mut app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let result = app.diagram_command(
            dir.path().join("missing.json"),
            vec!["Shape".into()],
            MemberFilter::default(),
            None,
            false,
        );
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to load descriptor catalog"));
    }

    #[test]
    fn test_format_command_round_trips() {
        let app = ClassgramApp::new();
        let dir = tempdir().unwrap();
        let input = dir.path().join("model.mmd");
        let first = dir.path().join("first.mmd");
        let second = dir.path().join("second.mmd");
        fs::write(&input, DIAGRAM).unwrap();

        app.format_command(Some(input), Some(first.clone()), false)
            .unwrap();
        app.format_command(Some(first.clone()), Some(second.clone()), false)
            .unwrap();

        assert_eq!(
            fs::read_to_string(&first).unwrap(),
            fs::read_to_string(&second).unwrap()
        );
    }
}
