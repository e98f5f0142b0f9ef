//! Upload web service converting EPUB files.

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use zhepub::progress::BYTES_MIB;
use zhepub::server::{ServerConfig, UploadConfig, run_server};
use zhepub::{ConversionContext, ScriptVariant};

/// Convert simplified Chinese to traditional Chinese in uploaded epub files
#[derive(Parser)]
#[command(name = "zhepub-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "ZHEPUB_BIND", default_value = "0.0.0.0:5000")]
    bind: SocketAddr,

    /// Largest accepted upload, in MiB
    #[arg(long, env = "ZHEPUB_MAX_UPLOAD_MIB", default_value_t = 20)]
    max_upload_mib: u64,

    /// Target script variant
    #[arg(long, env = "ZHEPUB_VARIANT", value_enum, default_value = "taiwan")]
    variant: Variant,
}

#[derive(Copy, Clone, ValueEnum)]
enum Variant {
    Traditional,
    Taiwan,
}

impl From<Variant> for ScriptVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Traditional => ScriptVariant::Traditional,
            Variant::Taiwan => ScriptVariant::Taiwan,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = ServerConfig {
        bind_addr: args.bind,
        upload: UploadConfig::default()
            .max_upload_bytes(args.max_upload_mib.saturating_mul(BYTES_MIB)),
    };

    // Tables are loaded here, before the first request arrives
    let context = ConversionContext::new(args.variant.into());

    match run_server(config, context).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
