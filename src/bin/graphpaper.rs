use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "graphpaper", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a grid as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Image width in pixels.
    #[arg(long)]
    width: u32,

    /// Image height in pixels.
    #[arg(long)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Grid options JSON. Defaults are used when omitted.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Primary palette color, RRGGBB or RRGGBBAA.
    #[arg(long, default_value = "000000ff")]
    primary: graphpaper::Rgba8,

    /// Secondary palette color, RRGGBB or RRGGBBAA.
    #[arg(long, default_value = "ffffffff")]
    secondary: graphpaper::Rgba8,

    /// Paint bands in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Rows per band (parallel mode only).
    #[arg(long, default_value_t = 64)]
    band_rows: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let palette = graphpaper::Palette {
        primary: args.primary,
        secondary: args.secondary,
    };
    let options = match &args.options {
        Some(path) => graphpaper::GridOptions::from_path_with_defaults(path, &palette)?,
        None => graphpaper::GridOptions::with_palette_defaults(&palette),
    };
    let config = options
        .resolve(&palette, args.width, args.height)
        .context("resolve grid options")?;

    let session = graphpaper::GridSession::new(config)?;
    let mut surface = graphpaper::Surface::new(args.width, args.height);
    let region = surface.bounds();
    if args.parallel {
        let opts = graphpaper::TileOpts {
            band_rows: args.band_rows,
            threads: args.threads,
        };
        session.paint_region_parallel(
            &mut surface,
            graphpaper::Vec2::ZERO,
            region,
            &opts,
            &graphpaper::NeverCancel,
        )?;
    } else {
        session.paint_tile(
            &mut surface,
            graphpaper::Vec2::ZERO,
            region,
            &graphpaper::NeverCancel,
        )?;
    }

    let straight: Vec<u8> = surface
        .data
        .chunks_exact(4)
        .flat_map(|px| {
            let premul = graphpaper::Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]);
            let c = premul.to_straight();
            [c.r, c.g, c.b, c.a]
        })
        .collect();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &straight,
        args.width,
        args.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
