use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use welder_ether::{AbiArguments, EtherWelder};
use welder_types::Elements;

#[derive(Parser)]
#[command(name = "welder")]
#[command(about = "Build Ethereum ABI descriptors and values from runtime schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schema into ABI argument descriptors
    Serialize {
        /// Schema file (JSON array of elements)
        #[arg(short = 'f', long = "schema-file", required = true)]
        schema_file: PathBuf,

        /// Pretty print JSON output
        #[arg(short = 'p', long = "pretty")]
        pretty: bool,
    },

    /// Convert ABI argument descriptors back into a schema
    Deserialize {
        /// Descriptor file: a parameter array, or a full ABI with --function
        #[arg(short = 'f', long = "abi-file", required = true)]
        abi_file: PathBuf,

        /// Take the inputs of this entry of a full ABI document
        #[arg(short = 'n', long = "function")]
        function: Option<String>,

        /// Pretty print JSON output
        #[arg(short = 'p', long = "pretty")]
        pretty: bool,
    },

    /// Print the zero value of a schema as example JSON input
    Build {
        /// Schema file (JSON array of elements)
        #[arg(short = 'f', long = "schema-file", required = true)]
        schema_file: PathBuf,

        /// Pretty print JSON output
        #[arg(short = 'p', long = "pretty")]
        pretty: bool,
    },

    /// Pack a JSON payload with the schema's ABI types
    Encode {
        /// Schema file (JSON array of elements)
        #[arg(short = 'f', long = "schema-file", required = true)]
        schema_file: PathBuf,

        /// Payload file (JSON array with one entry per schema element)
        #[arg(short = 'd', long = "data-file", required = true)]
        data_file: PathBuf,

        /// Prefix the output with the selector of this function signature
        #[arg(short = 's', long = "signature")]
        signature: Option<String>,
    },

    /// Unpack ABI data into JSON using the schema's types
    Decode {
        /// Schema file (JSON array of elements)
        #[arg(short = 'f', long = "schema-file", required = true)]
        schema_file: PathBuf,

        /// Hex encoded data (0x prefix optional)
        #[arg(short = 'x', long = "hex", conflicts_with = "data_file")]
        hex: Option<String>,

        /// Raw binary data file
        #[arg(short = 'd', long = "data-file")]
        data_file: Option<PathBuf>,

        /// The data starts with a 4-byte selector
        #[arg(long = "skip-selector")]
        skip_selector: bool,

        /// Pretty print JSON output
        #[arg(short = 'p', long = "pretty")]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let welder = EtherWelder::default();

    match cli.command {
        Commands::Serialize {
            schema_file,
            pretty,
        } => {
            let schema = read_schema(&schema_file)?;
            let args = welder.serialize(&schema)?;
            let out = if pretty {
                args.to_json_pretty()?
            } else {
                args.to_json()?
            };
            println!("{out}");
        }

        Commands::Deserialize {
            abi_file,
            function,
            pretty,
        } => {
            let text = read_text(&abi_file)?;
            let args = match function {
                Some(name) => AbiArguments::from_abi_inputs(&text, &name)?,
                None => AbiArguments::from_json(&text)?,
            };
            let schema = welder.deserialize(&args)?;
            print_json(&serde_json::to_value(&schema)?, pretty)?;
        }

        Commands::Build {
            schema_file,
            pretty,
        } => {
            let schema = read_schema(&schema_file)?;
            let values = welder.builder().builds(&schema)?;
            let example = JsonValue::Array(values.iter().map(|v| v.to_json()).collect());
            print_json(&example, pretty)?;
        }

        Commands::Encode {
            schema_file,
            data_file,
            signature,
        } => {
            let schema = read_schema(&schema_file)?;
            let payload = std::fs::read(&data_file)
                .with_context(|| format!("reading {}", data_file.display()))?;
            let data = welder.encode(&schema, &payload, signature.as_deref())?;
            println!("0x{}", hex::encode(data));
        }

        Commands::Decode {
            schema_file,
            hex,
            data_file,
            skip_selector,
            pretty,
        } => {
            let schema = read_schema(&schema_file)?;
            let data = match (hex, data_file) {
                (Some(text), _) => hex::decode(text.trim().trim_start_matches("0x"))
                    .context("decoding hex data")?,
                (None, Some(path)) => std::fs::read(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => anyhow::bail!("either --hex or --data-file is required"),
            };
            let body = if skip_selector {
                data.get(4..).context("data is shorter than a selector")?
            } else {
                &data[..]
            };
            let values = welder.decode(&schema, body)?;
            let out = JsonValue::Array(values.iter().map(|v| v.to_json()).collect());
            print_json(&out, pretty)?;
        }
    }

    Ok(())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_schema(path: &Path) -> anyhow::Result<Elements> {
    let text = read_text(path)?;
    let schema: Elements = serde_json::from_str(&text)
        .with_context(|| format!("parsing schema {}", path.display()))?;
    tracing::debug!(nodes = schema.len(), file = %path.display(), "loaded schema");
    Ok(schema)
}

fn print_json(value: &JsonValue, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", serde_json::to_string(value)?);
    }
    Ok(())
}
