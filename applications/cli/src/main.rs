/// Vidshare - media checks, thumbnails and upload simulation
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidshare_cli::commands::{self, ThumbnailInput, UploadRequest};
use vidshare_cli::AppConfig;
use vidshare_upload::MediaKind;

#[derive(Parser)]
#[command(name = "vidshare")]
#[command(about = "Vidshare media tools", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./vidshare.toml if present)
    #[arg(short, long, global = true, env = "VIDSHARE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Video,
    Thumbnail,
}

impl From<Kind> for MediaKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Video => MediaKind::Video,
            Kind::Thumbnail => MediaKind::Thumbnail,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check a file against the upload type and size rules
    Check {
        /// File to check
        path: PathBuf,
        /// Draft slot the file is meant for
        #[arg(short, long, value_enum, default_value = "video")]
        kind: Kind,
    },
    /// Encode an image as a JPEG thumbnail
    Thumbnail {
        /// Source image
        input: PathBuf,
        /// Output JPEG path
        output: PathBuf,
        /// JPEG quality 1-100 (default: from config)
        #[arg(short, long)]
        quality: Option<u8>,
    },
    /// Run a draft through the upload pipeline against a local service
    Upload {
        /// Video file
        video: PathBuf,
        /// Title
        #[arg(short, long)]
        title: String,
        /// Description
        #[arg(short, long)]
        description: String,
        /// Thumbnail image
        #[arg(long, conflicts_with = "poster")]
        thumbnail: Option<PathBuf>,
        /// Still image to capture an automatic thumbnail from
        #[arg(long, required_unless_present = "thumbnail")]
        poster: Option<PathBuf>,
        /// Capture time for the automatic thumbnail, in seconds
        #[arg(long, default_value_t = 0.0)]
        at: f64,
        /// Signed-in username (pass an empty value to upload signed out)
        #[arg(short, long, default_value = "johnsmith")]
        user: Option<String>,
        /// Simulated service latency in milliseconds
        #[arg(long, default_value_t = 3000)]
        latency_ms: u64,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidshare=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { path, kind } => {
            let report = commands::check_file(&path, kind.into(), &config)?;
            println!("{report}");
        }
        Commands::Thumbnail {
            input,
            output,
            quality,
        } => {
            let quality = quality.unwrap_or(config.upload.thumbnail_quality);
            let file = commands::make_thumbnail(&input, &output, quality)?;
            println!("{}: {} bytes", output.display(), file.size());
        }
        Commands::Upload {
            video,
            title,
            description,
            thumbnail,
            poster,
            at,
            user,
            latency_ms,
        } => {
            let thumbnail = match (thumbnail, poster) {
                (Some(path), _) => ThumbnailInput::File(path),
                (None, Some(poster)) => ThumbnailInput::Frame {
                    poster,
                    at_seconds: at,
                },
                (None, None) => anyhow::bail!("either --thumbnail or --poster is required"),
            };
            let request = UploadRequest {
                video,
                thumbnail,
                title,
                description,
                username: user.filter(|name| !name.is_empty()),
                latency: Duration::from_millis(latency_ms),
            };
            let uploaded = commands::simulate_upload(&config, request).await?;
            println!("{}", uploaded.id.watch_path());
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
