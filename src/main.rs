use std::path::{Path, PathBuf};

use anyhow::Context as _;
use artqr::{
    codec::{decode_image, encode_png},
    matte::remove_white_background,
    render::{overlay_logo, LogoOptions},
    BlendStrategy, CompositionOptions, Compositor, CornerStyle, DotStyle, ECLevel, QRReader, SymbolBuilder,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "artqr", version)]
struct Cli {
    /// Verbose logging (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a QR symbol as a PNG.
    Render(RenderArgs),
    /// Composite art into a QR image.
    Compose(ComposeArgs),
    /// Decode a QR image and print its content.
    Read(ReadArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Dots {
    Square,
    Dots,
    Rounded,
    ExtraRounded,
    Classy,
    ClassyRounded,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Corners {
    Square,
    Dot,
    ExtraRounded,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Level {
    L,
    M,
    Q,
    H,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Text to encode.
    #[arg(long)]
    data: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas side in pixels.
    #[arg(long, default_value_t = 1024)]
    size: u32,

    /// Shape of data modules.
    #[arg(long, value_enum, default_value_t = Dots::Square)]
    dots: Dots,

    /// Shape of the finder patterns.
    #[arg(long, value_enum, default_value_t = Corners::Square)]
    corners: Corners,

    /// Error correction level.
    #[arg(long, value_enum, default_value_t = Level::H)]
    ec_level: Level,

    /// QR version, ignored with --auto-version.
    #[arg(long, default_value_t = 3)]
    version: u32,

    /// Let the encoder pick the version.
    #[arg(long, default_value_t = false)]
    auto_version: bool,

    /// Logo drawn in the centre of the symbol.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo side as a share of the canvas.
    #[arg(long, default_value_t = 0.3)]
    logo_ratio: f32,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// QR image.
    #[arg(long)]
    qr: PathBuf,

    /// Art image.
    #[arg(long)]
    art: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// conservative, readableArt, badge or classic. Overrides the config file.
    #[arg(long)]
    strategy: Option<BlendStrategy>,

    /// Canvas side in pixels. Overrides the config file.
    #[arg(long)]
    size: Option<u32>,

    /// Composition options as JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail unless the output decodes to this text.
    #[arg(long)]
    verify: Option<String>,
}

#[derive(Parser, Debug)]
struct ReadArgs {
    /// Image to decode.
    image: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Compose(args) => cmd_compose(args),
        Command::Read(args) => cmd_read(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn read_image(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}

fn write_png(path: &Path, img: &image::RgbaImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = encode_png(img)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let dots = match args.dots {
        Dots::Square => DotStyle::Square,
        Dots::Dots => DotStyle::Dots,
        Dots::Rounded => DotStyle::Rounded,
        Dots::ExtraRounded => DotStyle::ExtraRounded,
        Dots::Classy => DotStyle::Classy,
        Dots::ClassyRounded => DotStyle::ClassyRounded,
    };
    let corners = match args.corners {
        Corners::Square => CornerStyle::Square,
        Corners::Dot => CornerStyle::Dot,
        Corners::ExtraRounded => CornerStyle::ExtraRounded,
    };
    let ec_level = match args.ec_level {
        Level::L => ECLevel::L,
        Level::M => ECLevel::M,
        Level::Q => ECLevel::Q,
        Level::H => ECLevel::H,
    };

    let mut builder = SymbolBuilder::new(args.data.as_bytes());
    builder.dots(dots).corners(corners).ec_level(ec_level).version(args.version);
    if args.auto_version {
        builder.unset_version();
    }
    let symbol = builder.build(args.size)?;
    info!(version = symbol.version, modules = symbol.geometry.symbol_modules, "Rendered symbol");

    let img = match &args.logo {
        Some(path) => {
            let mut logo = read_image(path)?;
            remove_white_background(&mut logo);
            let opts = LogoOptions { size_ratio: args.logo_ratio, ..Default::default() };
            overlay_logo(&symbol.image, &logo, &opts)?
        }
        None => symbol.image,
    };

    write_png(&args.out, &img)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut opts = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            CompositionOptions::from_json(&json)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => CompositionOptions::default(),
    };
    if let Some(strategy) = args.strategy {
        opts.strategy = strategy;
    }
    if let Some(size) = args.size {
        opts.canvas_size = size;
    }

    let compositor = Compositor::new(opts)?;
    let qr = read_image(&args.qr)?;
    let art = read_image(&args.art)?;
    let out = compositor.compose(&qr, &art)?;
    info!(strategy = opts.strategy.name(), size = opts.canvas_size, "Composed");

    if let Some(expected) = &args.verify {
        let content = QRReader::read(&out).context("verify composed image")?;
        anyhow::ensure!(&content == expected, "composed image decodes to '{content}'");
        info!("Verified");
    }

    write_png(&args.out, &out)
}

fn cmd_read(args: ReadArgs) -> anyhow::Result<()> {
    let img = read_image(&args.image)?;
    let content = QRReader::read(&img)?;
    println!("{content}");
    Ok(())
}
