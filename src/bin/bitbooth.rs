use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use bitbooth::session::model::SLOT_COUNT;
use bitbooth::{Overlay, StillImage, StripRenderer, ThemeCatalog};

#[derive(Parser, Debug)]
#[command(name = "bitbooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the theme catalog.
    Themes(ThemesArgs),
    /// Compose a photo strip from up to four photos.
    Strip(StripArgs),
}

#[derive(Parser, Debug)]
struct ThemesArgs {
    /// Replacement theme catalog JSON (defaults to the built-in set).
    #[arg(long)]
    themes: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct StripArgs {
    /// Photo file, one per slot in order; pass `-` for an empty slot.
    /// At most four.
    #[arg(long = "photo", required = true)]
    photos: Vec<PathBuf>,

    /// Theme key; unknown keys fall back to the catalog's first theme.
    #[arg(long, default_value = "gameboy")]
    theme: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Overlay placements JSON: one array of overlays per slot.
    #[arg(long)]
    overlays: Option<PathBuf>,

    /// Replacement theme catalog JSON.
    #[arg(long)]
    themes: Option<PathBuf>,

    /// Seed for the footer serial (omit for a random one).
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Themes(args) => cmd_themes(args),
        Command::Strip(args) => cmd_strip(args),
    }
}

fn read_catalog(path: Option<&Path>) -> anyhow::Result<ThemeCatalog> {
    let Some(path) = path else {
        return Ok(ThemeCatalog::builtin());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read theme catalog '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| "parse theme catalog JSON")
}

fn cmd_themes(args: ThemesArgs) -> anyhow::Result<()> {
    let catalog = read_catalog(args.themes.as_deref())?;
    for theme in catalog.themes() {
        println!("{:<12} {} — {}", theme.key, theme.title, theme.subtitle);
    }
    Ok(())
}

fn cmd_strip(args: StripArgs) -> anyhow::Result<()> {
    if args.photos.len() > SLOT_COUNT {
        anyhow::bail!("at most {SLOT_COUNT} photos fit on a strip");
    }

    let mut photos: [Option<StillImage>; SLOT_COUNT] = Default::default();
    for (slot, path) in args.photos.iter().enumerate() {
        if path.as_os_str() == "-" {
            continue;
        }
        let bytes =
            fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
        photos[slot] = Some(
            StillImage::from_png_bytes(bytes)
                .with_context(|| format!("decode photo '{}'", path.display()))?,
        );
    }

    let overlays: [Vec<Overlay>; SLOT_COUNT] = match &args.overlays {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read overlays '{}'", path.display()))?;
            serde_json::from_str(&raw).with_context(|| "parse overlays JSON")?
        }
        None => Default::default(),
    };

    let catalog = read_catalog(args.themes.as_deref())?;
    let theme = catalog.get(&args.theme);

    let mut renderer = match args.seed {
        Some(seed) => StripRenderer::with_seed(seed),
        None => StripRenderer::new(),
    };
    let strip = renderer.generate(&photos, theme, &overlays)?;

    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fs::write(&args.out, &strip.png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, theme '{}')",
        args.out.display(),
        strip.width,
        strip.height,
        theme.key
    );
    Ok(())
}
