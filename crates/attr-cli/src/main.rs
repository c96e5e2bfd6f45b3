//! `attr` CLI: format, tokenize, patch and diff JSON through the attr tree.
//!
//! ## Usage
//!
//! ```sh
//! # Re-serialize JSON compactly (stdin → stdout)
//! echo '{ "n": 42, "l": [1, 2] }' | attr format
//!
//! # Pretty-print from file to file
//! attr format --pretty -i data.json -o data.pretty.json
//!
//! # Wrap the document under a key path
//! echo '[1,2]' | attr format --wrap response.items
//!
//! # Turn a URL query string into JSON
//! echo 'a[b]=1&a[c]=2' | attr query
//!
//! # Print the token stream, one token per line
//! attr tokens -i data.json
//!
//! # Apply a JSON Patch document
//! attr patch --patch ops.json -i data.json
//!
//! # Print the patch turning one document into another
//! attr diff old.json new.json
//!
//! # Load parser/serializer options from a file, log at debug level
//! attr --config attr.json -vv format -i data.json
//! ```

use anyhow::{Context, Result};
use attr_core::{
    AttrConfig, AttrParser, EscapeMode, JsonBackend, JsonSerializer, JsonStreamReader,
    JsonWriter, SerdeJsonStreamReader, StreamReader, StreamToken, TrailingContent,
    WrappedStreamReader,
};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, Read};
use tracing::Level;

#[derive(Parser)]
#[command(name = "attr", version, about = "Attr value tree CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON file with parser and serializer options
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse JSON and serialize it again
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
        /// Spaces per nesting level (implies --pretty)
        #[arg(long)]
        indent: Option<usize>,
        /// Tokenizer backend: native or serde
        #[arg(long)]
        backend: Option<JsonBackend>,
        /// Fail on content after the root element
        #[arg(long)]
        strict: bool,
        /// String escaping: standard or quote-only
        #[arg(long)]
        escape: Option<EscapeMode>,
        /// Dot-separated key path to wrap the document under
        #[arg(long)]
        wrap: Option<String>,
        /// Copy tokens straight to the writer without building a tree
        #[arg(long, conflicts_with = "wrap")]
        streaming: bool,
    },
    /// Parse a URL query string into JSON
    Query {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the token stream of a JSON document
    Tokens {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Tokenizer backend: native or serde
        #[arg(long)]
        backend: Option<JsonBackend>,
    },
    /// Apply a JSON Patch document
    Patch {
        /// Patch file (a JSON array of operations)
        #[arg(long)]
        patch: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the JSON Patch that turns FROM into TO
    Diff {
        from: String,
        to: String,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_writer(io::stderr)
        .init();

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // Re-parse with --help to show usage (clap handles this)
            Cli::parse_from(["attr", "--help"]);
            unreachable!();
        }
    };

    let mut config = load_config(cli.config.as_deref())?;

    match command {
        Commands::Format {
            input,
            output,
            pretty,
            indent,
            backend,
            strict,
            escape,
            wrap,
            streaming,
        } => {
            if let Some(backend) = backend {
                config.parser.backend = backend;
            }
            if strict {
                config.parser.trailing = TrailingContent::Reject;
            }
            if let Some(escape) = escape {
                config.serializer.escape = escape;
            }
            if let Some(indent) = indent {
                config.serializer.indent = indent;
                config.serializer.pretty = true;
            }
            config.serializer.pretty |= pretty;

            let json = read_input(input.as_deref())?;
            let text = if streaming {
                stream_format(&config, &json)?
            } else {
                let parser = AttrParser::with_options(config.parser.clone());
                let attr = match wrap.as_deref() {
                    Some(path) => {
                        let keys = path.split('.').filter(|k| !k.is_empty());
                        let reader =
                            WrappedStreamReader::new(reader_for(config.parser.backend, &json), keys);
                        parser.parse_reader(reader)
                    }
                    None => parser.parse_str(&json),
                }
                .context("Failed to parse JSON")?;
                JsonSerializer::with_options(config.serializer.clone())
                    .serialize_to_string(&attr)
                    .context("Failed to serialize JSON")?
            };
            write_output(output.as_deref(), &text)?;
        }
        Commands::Query {
            input,
            output,
            pretty,
        } => {
            let query = read_input(input.as_deref())?;
            let attr = attr_core::parse_query(query.trim());
            config.serializer.pretty |= pretty;
            let text = JsonSerializer::with_options(config.serializer)
                .serialize_to_string(&attr)
                .context("Failed to serialize JSON")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Tokens { input, backend } => {
            let json = read_input(input.as_deref())?;
            let backend = backend.unwrap_or(config.parser.backend);
            let listing = list_tokens(reader_for(backend, &json)).context("Failed to tokenize JSON")?;
            print!("{}", listing);
        }
        Commands::Patch {
            patch,
            input,
            output,
            pretty,
        } => {
            let parser = AttrParser::with_options(config.parser.clone());
            let mut target = parser
                .parse_str(&read_input(input.as_deref())?)
                .context("Failed to parse JSON")?;
            let ops = parser
                .parse_str(&read_input(Some(&patch))?)
                .context("Failed to parse patch document")?;
            attr_core::apply_patch_attr(&mut target, &ops).context("Failed to apply patch")?;

            config.serializer.pretty |= pretty;
            let text = JsonSerializer::with_options(config.serializer)
                .serialize_to_string(&target)
                .context("Failed to serialize JSON")?;
            write_output(output.as_deref(), &text)?;
        }
        Commands::Diff {
            from,
            to,
            output,
            pretty,
        } => {
            let parser = AttrParser::with_options(config.parser.clone());
            let origin = parser
                .parse_str(&read_input(Some(&from))?)
                .with_context(|| format!("Failed to parse JSON: {}", from))?;
            let target = parser
                .parse_str(&read_input(Some(&to))?)
                .with_context(|| format!("Failed to parse JSON: {}", to))?;

            let ops = attr_core::diff(&origin, &target);
            tracing::info!(operations = ops.len(), "computed diff");

            config.serializer.pretty |= pretty;
            let text = JsonSerializer::with_options(config.serializer)
                .serialize_to_string(&attr_core::patch::patch_to_attr(&ops))
                .context("Failed to serialize patch")?;
            write_output(output.as_deref(), &text)?;
        }
    }

    Ok(())
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn load_config(path: Option<&str>) -> Result<AttrConfig> {
    let Some(path) = path else {
        return Ok(AttrConfig::default());
    };
    let text = read_input(Some(path))?;
    let config = AttrConfig::from_json(&text)
        .with_context(|| format!("Invalid config file: {}", path))?;
    tracing::debug!(?config, path, "loaded config");
    Ok(config)
}

fn reader_for(backend: JsonBackend, json: &str) -> Box<dyn StreamReader + '_> {
    match backend {
        JsonBackend::Native => Box::new(JsonStreamReader::from_str(json)),
        JsonBackend::Serde => Box::new(SerdeJsonStreamReader::new(json.as_bytes())),
    }
}

/// Format by piping tokens into the writer. Blank input becomes `null`.
fn stream_format(config: &AttrConfig, json: &str) -> Result<String> {
    let mut reader = reader_for(config.parser.backend, json);
    let mut writer = JsonWriter::new(config.serializer.clone());
    if reader.advance().context("Failed to parse JSON")? {
        attr_core::transcode(&mut reader, &mut writer).context("Failed to parse JSON")?;
        if config.parser.trailing == TrailingContent::Reject
            && reader.advance().context("Failed to parse JSON")?
        {
            anyhow::bail!("Unexpected content after the root element");
        }
    } else {
        writer.null().context("Failed to serialize JSON")?;
    }
    writer.finish().context("Failed to serialize JSON")
}

/// One line per token: the token kind, then its payload if it has one.
/// Strings and property names are JSON-quoted.
fn list_tokens(mut reader: Box<dyn StreamReader + '_>) -> attr_core::Result<String> {
    let mut listing = String::new();
    while reader.advance()? {
        let token = reader.current_token();
        let line = match (token, reader.current_value()) {
            (StreamToken::String | StreamToken::PropertyName, Some(value)) => {
                let text = value.to_string();
                let quoted = serde_json::to_string(&text).unwrap_or(text);
                format!("{} {}", token, quoted)
            }
            (StreamToken::Null, _) | (_, None) => token.to_string(),
            (_, Some(value)) => format!("{} {}", token, value),
        };
        listing.push_str(&line);
        listing.push('\n');
    }
    Ok(listing)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
