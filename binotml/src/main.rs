//! OTML command-line tool for checking, formatting, and transcoding OTML
//! documents.
//!
//! Usage: otml [OPTIONS] [FILE|DIR]
//!
//! Options:
//!       --check            Check if input is valid (exit 0 if valid, 1 if invalid)
//!   -t, --to <FORMAT>      Output format (otml, json, yaml, toml, cbor) [default: otml]
//!       --typed            Read scalars as null, integers, floats, and booleans when transcoding
//!   -o, --output <FILE>    Write output to specified file
//!   -w, --write            Write output to file with inferred name
//!       --indent <N>       Spaces per indentation level of the input [default: 2]
//!   -h, --help             Print help
//!   -V, --version          Print version

use std::fs;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use libotml::{emit, parse_reader, Node, ParseContext, DEFAULT_INDENT_WIDTH};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod transcode;

/// Output format for -t.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Otml,
    Json,
    Yaml,
    Toml,
    Cbor,
}

fn parse_format(s: &str) -> Result<Format, String> {
    match s {
        "otml" | "otui" => Ok(Format::Otml),
        "json" => Ok(Format::Json),
        "yaml" | "yml" => Ok(Format::Yaml),
        "toml" => Ok(Format::Toml),
        "cbor" => Ok(Format::Cbor),
        _ => Err(format!("unknown format: {}", s)),
    }
}

fn format_extension(format: Format) -> &'static str {
    match format {
        Format::Otml => "otml",
        Format::Json => "json",
        Format::Yaml => "yaml",
        Format::Toml => "toml",
        Format::Cbor => "cbor",
    }
}

#[derive(Parser, Debug)]
#[command(name = "otml", version)]
#[command(about = "Check, format, and transcode OTML documents")]
struct Args {
    /// Input file or directory (reads from stdin if absent or `-`).
    /// A directory processes every .otml file in it.
    path: Option<PathBuf>,

    /// Check if input is valid (exit 0 if valid, 1 if invalid)
    #[arg(long)]
    check: bool,

    /// Output format: otml, json, yaml, toml, cbor
    #[arg(short = 't', long, value_parser = parse_format, default_value = "otml")]
    to: Format,

    /// Read scalars as null, integers, floats, and booleans when transcoding
    #[arg(long)]
    typed: bool,

    /// Write output to specified file (not valid with directory input)
    #[arg(short = 'o', long, value_name = "FILE", conflicts_with = "write")]
    output: Option<PathBuf>,

    /// Write output next to the input, with the extension of the output format
    #[arg(short = 'w', long)]
    write: bool,

    /// Spaces per indentation level of the input
    #[arg(long, value_name = "N", default_value_t = DEFAULT_INDENT_WIDTH)]
    indent: usize,
}

/// Where output goes.
#[derive(Debug, Clone, Copy)]
enum Sink<'a> {
    Stdout,
    File(&'a Path),
    /// Next to the input file.
    Beside,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let input_path = args.path.as_deref().filter(|p| *p != Path::new("-"));

    if let Some(path) = input_path {
        if path.is_dir() {
            if args.output.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process::exit(process_directory(path, &args));
        }
    }

    let sink = match (&args.output, args.write) {
        (Some(path), _) => Sink::File(path),
        (None, true) => Sink::Beside,
        (None, false) => Sink::Stdout,
    };
    process::exit(process_input(input_path, &args, sink));
}

fn process_directory(dir: &Path, args: &Args) -> i32 {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir.display(), e);
            return 1;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "otml").unwrap_or(false))
        .collect();
    paths.sort();
    debug!(dir = %dir.display(), files = paths.len(), "processing directory");

    let sink = if args.write { Sink::Beside } else { Sink::Stdout };
    let mut had_errors = false;
    for path in &paths {
        if process_input(Some(path), args, sink) != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_input(input_path: Option<&Path>, args: &Args, sink: Sink<'_>) -> i32 {
    let origin = input_path
        .map(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| p.display().to_string())
        })
        .unwrap_or_default();
    let ctx = ParseContext::new(&origin).with_indent_width(args.indent);

    let parsed = match input_path {
        Some(path) => match fs::File::open(path) {
            Ok(file) => parse_reader(BufReader::new(file), &ctx),
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                return 1;
            }
        },
        None => parse_reader(io::stdin().lock(), &ctx),
    };

    let root = match parsed {
        Ok(root) => root,
        Err(e) => {
            match input_path {
                Some(path) => eprintln!("{}: {}", path.display(), e),
                None => eprintln!("Parse error: {}", e),
            }
            return 1;
        }
    };

    if args.check {
        match input_path {
            Some(path) => println!("{}: ok", path.display()),
            None => println!("ok"),
        }
        return 0;
    }

    let output = match render(&root, args.to, args.typed) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match write_output(&output, args.to, sink, input_path) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}

/// Serialize a parsed tree in the requested format.
fn render(root: &Node, format: Format, typed: bool) -> Result<Vec<u8>, String> {
    match format {
        Format::Otml => {
            if typed {
                warn!("--typed has no effect on OTML output");
            }
            Ok(emit(root).into_bytes())
        }
        Format::Json => transcode::json::encode(&transcode::document(root, typed)?)
            .map(String::into_bytes),
        Format::Yaml => transcode::yaml::encode(&transcode::document(root, typed)?)
            .map(String::into_bytes)
            .map_err(|e| format!("Cannot convert to YAML: {}", e)),
        Format::Toml => transcode::toml::encode(&transcode::document(root, typed)?)
            .map(String::into_bytes)
            .map_err(|e| format!("Cannot convert to TOML: {}", e)),
        Format::Cbor => transcode::cbor::encode(&transcode::document(root, typed)?),
    }
}

fn write_output(
    output: &[u8],
    format: Format,
    sink: Sink<'_>,
    input_file: Option<&Path>,
) -> Result<(), String> {
    match sink {
        Sink::File(path) => {
            fs::write(path, output).map_err(|e| format!("Error writing {}: {}", path.display(), e))
        }
        Sink::Beside => {
            let input_path = input_file.ok_or("Error: --write requires an input file")?;
            let output_path = input_path.with_extension(format_extension(format));
            fs::write(&output_path, output)
                .map_err(|e| format!("Error writing {}: {}", output_path.display(), e))
        }
        Sink::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output)
                .map_err(|e| format!("Error writing to stdout: {}", e))
        }
    }
}
