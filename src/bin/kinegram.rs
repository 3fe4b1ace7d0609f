use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "kinegram", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a scene script and write its frames as JSON lines.
    Render(RenderArgs),
    /// Play a scene script and print the frame count and stream fingerprint.
    Digest(PlayArgs),
    /// Run only the layout phase and print the bounds of every named node.
    Layout(PlayArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Quality tier; overrides the script's config.
    #[arg(long, value_enum)]
    quality: Option<QualityChoice>,

    /// Frames per second; overrides the quality tier.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    play: PlayArgs,

    /// Output NDJSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum QualityChoice {
    Low,
    Medium,
    High,
    Production,
    FourK,
}

impl From<QualityChoice> for kinegram::Quality {
    fn from(q: QualityChoice) -> Self {
        match q {
            QualityChoice::Low => Self::Low,
            QualityChoice::Medium => Self::Medium,
            QualityChoice::High => Self::High,
            QualityChoice::Production => Self::Production,
            QualityChoice::FourK => Self::FourK,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    kinegram::logging::init_logging(&kinegram::LoggingConfig { level: cli.log });
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Digest(args) => cmd_digest(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn read_script(path: &Path) -> anyhow::Result<kinegram::SceneScript> {
    let script = kinegram::SceneScript::from_json_path(path)
        .with_context(|| format!("load scene script '{}'", path.display()))?;
    Ok(script)
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn resolve_config(script: &kinegram::SceneScript, args: &PlayArgs) -> kinegram::RenderConfig {
    let mut cfg = script.config.unwrap_or_default();
    if let Some(q) = args.quality {
        cfg.quality = q.into();
    }
    if args.fps.is_some() {
        cfg.fps = args.fps;
    }
    cfg
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let script = read_script(&args.play.in_path)?;
    let cfg = resolve_config(&script, &args.play);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    let sink = kinegram::JsonLinesSink::new(BufWriter::new(file));

    let (sink, reports) =
        kinegram::run_script(&script, base_dir(&args.play.in_path), Some(cfg), sink)
            .context("play scene script")?;
    println!(
        "wrote {} frames from {} plays to {}",
        sink.frames_written(),
        reports.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_digest(args: PlayArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let cfg = resolve_config(&script, &args);
    let (sink, reports) = kinegram::run_script(
        &script,
        base_dir(&args.in_path),
        Some(cfg),
        kinegram::DigestSink::new(),
    )
    .context("play scene script")?;
    let digest = sink.digest();
    let fps = cfg.fps()?;
    println!("frames={}", digest.frames);
    println!("plays={}", reports.len());
    println!("seconds={}", fps.frames_to_secs(digest.frames));
    println!("fingerprint={}", digest.fingerprint);
    Ok(())
}

#[derive(serde::Serialize)]
struct NamedBounds {
    center: Option<kinegram::Point>,
    bounds: Option<kinegram::Rect>,
}

fn cmd_layout(args: PlayArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let cfg = resolve_config(&script, &args);
    let mut scene = kinegram::Scene::new(cfg, kinegram::InMemorySink::new())?;
    kinegram::script::runner::build_scene(&script, base_dir(&args.in_path), &mut scene)
        .context("build scene")?;

    let g = scene.graph();
    let mut out = BTreeMap::new();
    for def in &script.nodes {
        if let Some(id) = g.id_for_name(&def.name) {
            out.insert(
                def.name.clone(),
                NamedBounds {
                    center: g.center(id),
                    bounds: g.bounds(id),
                },
            );
        }
    }
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, &out).context("write layout JSON")?;
    writeln!(lock)?;
    Ok(())
}
