use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lvjson_io::prelude::*;

const EXIT_USAGE: i32 = 1;
const EXIT_CONVERSION: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "lvjson",
    version,
    about = "Convert LabVIEW project and package build files between XML and JSON"
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "info", "lvjson_patch=debug").
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an XML document (.lvproj / .vipb) into JSON.
    #[command(name = "xml2json")]
    Xml2json {
        /// Input XML path
        input: PathBuf,
        /// Output JSON path
        output: PathBuf,
        /// Document kind; inferred from the input extension when omitted
        #[arg(long)]
        kind: Option<DocumentKind>,
        /// Keep whitespace-only text (indentation) in the JSON
        #[arg(long)]
        preserve_whitespace: bool,
    },
    /// Convert a JSON document back into XML.
    #[command(name = "json2xml")]
    Json2xml {
        /// Input JSON path
        input: PathBuf,
        /// Output XML path
        output: PathBuf,
        /// Document kind; inferred from the output extension when omitted
        #[arg(long)]
        kind: Option<DocumentKind>,
    },
    /// Apply patch files to a JSON document and write the result as XML.
    Patch {
        /// Input JSON path
        input: PathBuf,
        /// Output XML path
        output: PathBuf,
        /// Primary patch file (YAML); skipped when it does not exist
        #[arg(long)]
        patch: Option<PathBuf>,
        /// Patch file applied after the primary one; missing or empty is a no-op
        #[arg(long)]
        always_patch: Option<PathBuf>,
        /// How patch keys are interpreted
        #[arg(long, value_enum, default_value_t = KeyModeArg::Literal)]
        key_mode: KeyModeArg,
        /// Alias catalog (YAML); defaults to ./alias-catalog.yml
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Overwrite the input JSON with the patched document
        #[arg(long)]
        write_back_json: bool,
        /// Document kind; inferred from the output extension when omitted
        #[arg(long)]
        kind: Option<DocumentKind>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeyModeArg {
    Literal,
    Alias,
    AliasOrLiteral,
}

impl From<KeyModeArg> for KeyMode {
    fn from(arg: KeyModeArg) -> Self {
        match arg {
            KeyModeArg::Literal => KeyMode::Literal,
            KeyModeArg::Alias => KeyMode::Alias,
            KeyModeArg::AliasOrLiteral => KeyMode::AliasOrLiteral,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            process::exit(if e.use_stderr() { EXIT_USAGE } else { 0 });
        }
    };

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("error: {e:#}");
        process::exit(EXIT_USAGE);
    }

    match execute(cli.cmd) {
        Ok(outcome) => {
            println!("{}", outcome.output.display());
        }
        Err(e) => {
            // Conversion errors already carry their cause in the message.
            eprintln!("error: {e}");
            process::exit(exit_code(&e));
        }
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

fn execute(cmd: Command) -> Result<ConvertOutcome> {
    let req = match cmd {
        Command::Xml2json {
            input,
            output,
            kind,
            preserve_whitespace,
        } => {
            let kind = resolve_kind(kind, &input);
            let mut req = ConvertRequest::new(Mode::Encode, kind, input, output);
            if preserve_whitespace {
                req.whitespace = Whitespace::Preserve;
            }
            req
        }
        Command::Json2xml {
            input,
            output,
            kind,
        } => {
            let kind = resolve_kind(kind, &output);
            ConvertRequest::new(Mode::Decode, kind, input, output)
        }
        Command::Patch {
            input,
            output,
            patch,
            always_patch,
            key_mode,
            catalog,
            write_back_json,
            kind,
        } => {
            let kind = resolve_kind(kind, &output);
            let mut req = ConvertRequest::new(Mode::DecodeWithPatch, kind, input, output);
            req.patch = patch;
            req.always_patch = always_patch;
            req.key_mode = key_mode.into();
            req.catalog = catalog;
            req.write_back_json = write_back_json;
            req
        }
    };

    tracing::debug!(?req, "starting conversion");
    Ok(run(&req)?)
}

/// An explicit `--kind`, else the XML file's extension, else `package`.
fn resolve_kind(explicit: Option<DocumentKind>, xml_path: &Path) -> DocumentKind {
    explicit
        .or_else(|| DocumentKind::from_extension(xml_path))
        .unwrap_or(DocumentKind::Package)
}

/// 1 for filesystem failures, 2 for documents that cannot be converted.
fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<ConvertError>() {
        Some(err) if !err.is_io() => EXIT_CONVERSION,
        _ => EXIT_USAGE,
    }
}
