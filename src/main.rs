//! # SecureVision CLI
//!
//! Command-line front end for the encode and decode flows.
//!
//! ## Usage
//!
//! ```bash
//! securevision encode photo.png --out downloads --extract
//! securevision decode encrypted_shares.zip
//! securevision decode share1.png share2.png recovery_data.npy
//! securevision --base-url http://10.0.0.5:8000 health
//! securevision --inline decode package.zip
//! ```
//!
//! The CLI will:
//! 1. Load configuration from the TOML file, if one is given
//! 2. Apply command-line overrides
//! 3. Run the requested flow against the remote service
//! 4. Save the result into the download directory
//! 5. Print the saved paths (and `data:` URIs of the previews with `--inline`)

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{error, info};

use securevision_client::client::TransferClient;
use securevision_client::common::config::{load_config, ClientConfig};
use securevision_client::common::logging::init_logger;
use securevision_client::{Blob, DecodeFlow, EncodeFlow, Member, Result, ShareError};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a client configuration file (TOML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Service root URL, overrides `api.base_url`
    #[arg(long)]
    base_url: Option<String>,

    /// Download directory, overrides `output.directory`
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print each result preview as a `data:` URI
    #[arg(long, global = true)]
    inline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an image into two shares plus recovery data
    Encode {
        /// Image to encode (png, jpeg, tiff or heic)
        image: PathBuf,

        /// Also write share1.png and share2.png next to the archive
        #[arg(long)]
        extract: bool,
    },
    /// Rebuild an image from a package zip or its three loose files
    Decode {
        #[arg(required = true, num_args = 1..=3)]
        files: Vec<PathBuf>,
    },
    /// Ask the service whether it is up
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logger();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, falling back to defaults without --config
    let mut config: ClientConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    // Command-line flags win over the file
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }
    let out_dir = args
        .out
        .unwrap_or_else(|| PathBuf::from(&config.output.directory));

    // One client per run; each flow makes a single request through it
    let client = TransferClient::from_config(&config.api);
    let inline = args.inline;

    let outcome = match args.command {
        Command::Encode { image, extract } => {
            encode(&client, &config, &image, &out_dir, extract, inline).await
        }
        Command::Decode { files } => decode(&client, &files, &out_dir, inline).await,
        Command::Health => health(&client).await,
    };

    // Report flow errors in user-facing terms and exit non-zero
    if let Err(e) = outcome {
        error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

/// Encode one image and save the share archive.
///
/// # Arguments
///
/// * `image` - Image to encode; its extension declares the media type
/// * `out_dir` - Where `encrypted_shares.zip` (and the shares with `extract`) go
/// * `extract` - Also write `share1.png` and `share2.png`
/// * `inline` - Print the share previews as `data:` URIs
async fn encode(
    client: &TransferClient,
    config: &ClientConfig,
    image: &Path,
    out_dir: &Path,
    extract: bool,
    inline: bool,
) -> Result<()> {
    let mut flow = EncodeFlow::new().with_expected_dimensions(config.api.expected_dimensions);
    flow.select_image(Blob::from_path(image)?)?;
    flow.submit(client).await?;

    // Save the archive under its suggested name
    let presenter = flow.presenter();
    let saved = presenter.save_to(out_dir)?;
    println!("{}", saved.display());

    if extract {
        for path in presenter.export_previews(out_dir)? {
            println!("{}", path.display());
        }
    }
    if inline {
        print_uris(&presenter.data_uris());
    }
    Ok(())
}

/// Decode a package zip or the three loose files and save the image.
///
/// # Arguments
///
/// * `files` - One `.zip`, or the two shares and the `.npy` recovery file
/// * `out_dir` - Where `retrieved_image.png` goes
/// * `inline` - Print the image preview as a `data:` URI
///
/// # Errors
///
/// Fails with `MissingMember` before any request when a loose upload is
/// incomplete.
async fn decode(
    client: &TransferClient,
    files: &[PathBuf],
    out_dir: &Path,
    inline: bool,
) -> Result<()> {
    // Read every file, declaring its type from the extension
    let blobs = files
        .iter()
        .map(|path| Blob::from_path(path))
        .collect::<std::io::Result<Vec<_>>>()?;

    // All files go in as one batch, like a single drop
    let mut flow = DecodeFlow::new();
    let outcome = flow.add_files(blobs)?;
    if !outcome.ignored.is_empty() {
        info!("Ignored: {}", outcome.ignored.join(", "));
    }
    if !flow.action_enabled() {
        return Err(ShareError::MissingMember(missing(&flow)));
    }

    flow.submit(client).await?;

    let saved = flow.presenter().save_to(out_dir)?;
    println!("{}", saved.display());

    if inline {
        print_uris(&flow.presenter().data_uris());
    }
    Ok(())
}

fn print_uris(uris: &[String]) {
    for uri in uris {
        println!("{}", uri);
    }
}

fn missing(flow: &DecodeFlow) -> Vec<Member> {
    Member::ALL
        .into_iter()
        .filter(|m| flow.state().slot(*m).is_none())
        .collect()
}

async fn health(client: &TransferClient) -> Result<()> {
    let status = client.health().await?;
    println!("{}: {}", status.status, status.message);
    Ok(())
}
