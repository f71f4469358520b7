use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moodwave", version)]
struct Cli {
    /// Log filter (for example `debug` or `moodwave=trace`); `RUST_LOG` is used when omitted.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the scene for a piece of text as a PNG.
    Frame(FrameArgs),
    /// Inspect or produce configuration files.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Text to analyze; its dominant emotions drive the palette.
    #[arg(long)]
    text: Option<String>,

    /// Configuration JSON to load before rendering.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Scheduler ticks to run before the captured frame.
    #[arg(long, default_value_t = 60)]
    frames: u64,

    /// Simulated milliseconds between ticks.
    #[arg(long, default_value_t = 16.0)]
    step_ms: f64,

    /// Fixed noise seed for reproducible grain and glitch.
    #[arg(long)]
    seed: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Directory for the three layer thumbnails.
    #[arg(long)]
    thumbs: Option<PathBuf>,

    /// Print the text overlay as JSON on stdout.
    #[arg(long)]
    overlay: bool,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a configuration file holding the default styles and settings.
    Defaults {
        /// Output path; defaults to `emotion-config-YYYY-MM-DD.json` in the current directory.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Validate a configuration file against the defaults and report what it sets.
    Check { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Config(ConfigCommand::Defaults { out }) => cmd_config_defaults(out),
        Command::Config(ConfigCommand::Check { path }) => cmd_config_check(&path),
    }
}

fn init_tracing(filter: Option<&str>) -> anyhow::Result<()> {
    let filter = match filter {
        Some(f) => EnvFilter::try_new(f).with_context(|| format!("parse log filter '{f}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let canvas = moodwave::Canvas::new(args.width, args.height)?;
    let clock = moodwave::ManualClock::new(0.0);
    let mut core = moodwave::RenderCore::new(canvas, clock.clone())?;
    if let Some(seed) = args.seed {
        core = core.with_seed(seed);
    }

    if let Some(path) = &args.config {
        core.load_config(path)
            .with_context(|| format!("load config '{}'", path.display()))?;
    }

    if let Some(text) = &args.text {
        let mut analyzer = moodwave::KeywordAnalyzer::new();
        let state = analyzer.analyze(text);
        tracing::info!(
            current = %state.current_emotion,
            secondary = %state.secondary_emotion,
            "analyzed text"
        );
        core.process_analysis(moodwave::AnalysisResult {
            state,
            text: text.clone(),
            button_click: true,
        });
    }

    let mut render_loop = moodwave::RenderLoop::new(
        core,
        moodwave::MemorySurface::new(canvas),
        moodwave::MemoryText::new(),
    );
    for _ in 0..args.frames {
        clock.advance(args.step_ms);
        render_loop.step();
    }
    render_loop.core_mut().request_redraw();
    if render_loop.step() != moodwave::StepOutcome::Rendered {
        anyhow::bail!("final frame failed to render");
    }

    let surface = render_loop.surface();
    let frame = surface
        .frame()
        .context("render loop produced no frame")?;
    write_png(frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(dir) = &args.thumbs {
        let thumbs = surface
            .thumbnails()
            .context("render loop produced no thumbnails")?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create thumbnail dir '{}'", dir.display()))?;
        write_png(&thumbs.background, &dir.join("background.png"))?;
        write_png(&thumbs.gradient, &dir.join("gradient.png"))?;
        write_png(&thumbs.text, &dir.join("text.png"))?;
    }

    if args.overlay {
        let overlay = render_loop
            .text()
            .overlay()
            .context("render loop produced no text overlay")?;
        println!("{}", serde_json::to_string_pretty(overlay)?);
    }

    let stats = render_loop.stats();
    tracing::info!(
        ticks = stats.ticks,
        rendered = stats.rendered,
        failed = stats.failed,
        "frame done"
    );
    Ok(())
}

fn write_png(surface: &moodwave::Surface, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface
        .to_rgba_image()?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_config_defaults(out: Option<PathBuf>) -> anyhow::Result<()> {
    let path = out.unwrap_or_else(|| PathBuf::from(moodwave::suggested_file_name()));
    moodwave::save_config_file(
        &path,
        &moodwave::EmotionStyleTable::default(),
        &moodwave::RenderSettings::default(),
    )
    .with_context(|| format!("write config '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_config_check(path: &Path) -> anyhow::Result<()> {
    let doc = moodwave::read_config_file(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let defaults = moodwave::RenderSettings::default();
    let (_, settings) = doc
        .resolve(&moodwave::EmotionStyleTable::default(), &defaults)
        .with_context(|| format!("config '{}' is not applicable", path.display()))?;

    let before = serde_json::to_value(&defaults)?;
    let after = serde_json::to_value(&settings)?;
    let mut changed = 0usize;
    if let (Some(before), Some(after)) = (before.as_object(), after.as_object()) {
        for (key, value) in after {
            if before.get(key) != Some(value) {
                println!("{key}: {value}");
                changed += 1;
            }
        }
    }
    eprintln!(
        "{} ok ({} setting(s) differ from defaults)",
        path.display(),
        changed
    );
    Ok(())
}
