use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qicomposite::composite::{CompositeBuilder, CompositeRequest};
use qicomposite::config::ComposerConfig;
use qicomposite::geometry::FrameShape;
use qicomposite::payload::{build_payload, PayloadFields, QrType};
use qicomposite::render::{
    BarcodeRenderRequest, CodeKind, HexColor, QrRenderRequest, Rotation,
};
use qicomposite::source::HttpImageLoader;
use qicomposite::{logos, output};

#[derive(Parser)]
#[command(name = "qicomposite")]
#[command(about = "Render a QR code or barcode and composite a framed logo onto it", long_about = None)]
struct Cli {
    /// Main value of the code (the `val` field)
    value: Option<String>,

    /// Kind of QR payload to build
    #[arg(long = "type", short = 't', default_value = "url")]
    qr_type: QrType,

    /// Extra payload field as key=value, e.g. --field ssid=home
    #[arg(long = "field", short = 'f', value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Render a linear barcode in this symbology instead of a QR code
    #[arg(long)]
    barcode: Option<String>,

    /// Barcode rotation: N, R, I or L
    #[arg(long, default_value = "N")]
    rotate: Rotation,

    /// Hide the human readable text under a barcode
    #[arg(long)]
    no_text: bool,

    /// Logo: a predefined name (GitHub, LinkedIn, ...), URL, data URI or file path
    #[arg(long, short = 'l')]
    logo: Option<String>,

    /// Logo frame: square, rounded or circle
    #[arg(long, default_value = "square")]
    shape: FrameShape,

    /// Foreground color
    #[arg(long, default_value = "#000000")]
    fg: HexColor,

    /// Background color
    #[arg(long, default_value = "#ffffff")]
    bg: HexColor,

    /// Canvas edge in pixels (defaults to QICOMPOSITE_CANVAS_SIZE or 1000)
    #[arg(long)]
    size: Option<u32>,

    /// Directory to save the PNG into
    #[arg(long, short = 'o', default_value = "generated")]
    out: PathBuf,

    /// Print the PNG as a data URL instead of saving it
    #[arg(long)]
    data_url: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,qicomposite=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ComposerConfig::from_env().context("Failed to load configuration")?;
    let canvas_size = cli.size.unwrap_or(config.canvas_size);

    let mut fields: PayloadFields = cli.fields.into_iter().collect();
    if let Some(value) = cli.value {
        fields.insert("val".to_string(), value);
    }
    let payload = build_payload(cli.qr_type, &fields);
    info!(kind = %cli.qr_type, payload_len = payload.len(), "payload built");

    let kind = match cli.barcode {
        Some(symbology) => CodeKind::Barcode { symbology },
        None => CodeKind::Qr,
    };
    let base_url = match &kind {
        CodeKind::Qr => QrRenderRequest::new(payload.as_str(), canvas_size)
            .colors(cli.fg, cli.bg)
            .url(&config.qr_endpoint),
        CodeKind::Barcode { symbology } => {
            let mut request = BarcodeRenderRequest::new(payload.as_str(), symbology.as_str())
                .colors(cli.fg, cli.bg);
            request.rotation = cli.rotate;
            request.include_text = !cli.no_text;
            request.url(&config.barcode_endpoint)
        }
    };

    let mut request = CompositeRequest::new(base_url, canvas_size)
        .context("Invalid canvas size")?
        .with_frame_shape(cli.shape)
        .with_overlay_supported(kind.supports_overlay())
        .with_background(cli.bg.to_rgba());
    if let Some(logo) = cli.logo.as_deref() {
        request = request.with_logo(logos::resolve(logo));
    }

    let loader = HttpImageLoader::new(config.http_timeout).context("Failed to build HTTP client")?;
    let png = CompositeBuilder::new(loader)
        .build(&request)
        .await
        .context("Failed to build composite image")?;

    if cli.data_url {
        println!("{}", output::to_data_url(&png));
        return Ok(());
    }

    let filename = output::download_filename(&config.app_name, Utc::now());
    let path = output::save_png(&cli.out, &filename, &png)
        .with_context(|| format!("Failed to save {}", filename))?;
    println!("{}", path.display());
    Ok(())
}
