//! Renders mockup variations from the command line.
//!
//! ```text
//! merchmagic logo.svg --preset gradient-noise --color "#dc2626" --count 4 --out-dir out/
//! ```
//!
//! Session settings are read from `merchmagic.toml` in the working directory
//! when present. Set `MERCHMAGIC_LOG=json` for JSON logs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use merchmagic::{
    init_logging_with, CompositionSession, EmbeddedTemplateSource, LogFormat, SessionConfig,
    UploadedAsset,
};

#[derive(Parser, Debug)]
#[command(name = "merchmagic")]
#[command(about = "Render garment mockup variations", version)]
struct Cli {
    /// Artwork to place on the garment (.svg or .png)
    artwork: PathBuf,

    /// Preset id (flat-shadow or gradient-noise)
    #[arg(short, long, default_value = "flat-shadow")]
    preset: String,

    /// Garment colour as hex
    #[arg(short, long, default_value = "#ffffff")]
    color: String,

    /// Number of variations to export
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Directory the PNG files are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn load_config() -> anyhow::Result<SessionConfig> {
    let path = Path::new("merchmagic.toml");
    if path.exists() {
        SessionConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))
    } else {
        Ok(SessionConfig::default())
    }
}

fn read_asset(path: &Path) -> anyhow::Result<UploadedAsset> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artwork".to_string());
    let is_vector = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));

    if is_vector {
        let markup = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(UploadedAsset::vector(name, markup))
    } else {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(UploadedAsset::from_png_bytes(name, &bytes))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = match std::env::var("MERCHMAGIC_LOG").as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    init_logging_with(format)?;

    let mut session = CompositionSession::new(load_config()?);
    session.mount_surface();
    session
        .load_garment(&EmbeddedTemplateSource, &cli.color)
        .await?;
    session.load_artwork(&read_asset(&cli.artwork)?, None)?;

    std::fs::create_dir_all(&cli.out_dir)?;
    for mockup in session.export_variations(&cli.preset, cli.count)? {
        let file_name = format!("mockup-{}-{}.png", mockup.preset, mockup.variation_index);
        let path = cli.out_dir.join(file_name);
        std::fs::write(&path, &mockup.png)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
    }

    session.dispose();
    Ok(())
}
