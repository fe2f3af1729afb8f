use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cdcard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one card from a release record JSON file.
    Card(CardArgs),
    /// Turn release page text into a record JSON file.
    Extract(ExtractArgs),
    /// Render every card of a JSON manifest in parallel.
    Batch(BatchArgs),
    /// Stack already rendered card PNGs into one image.
    Stack(StackArgs),
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Font file (TTF/OTF/TTC) used for every text role.
    #[arg(long)]
    font: PathBuf,

    /// Layout configuration JSON; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the canvas width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the maximum canvas height.
    #[arg(long)]
    max_height: Option<u32>,
}

#[derive(Parser, Debug)]
struct CardArgs {
    /// Release record JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Link text drawn under the code image.
    #[arg(long, default_value = "")]
    link: String,

    /// Cover image file.
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Code image file (e.g. a QR code).
    #[arg(long)]
    code: Option<PathBuf>,

    /// Draw a QR code of `--link` when no code image is given.
    #[arg(long)]
    qr: bool,

    /// Render at this height instead of the estimate.
    #[arg(long)]
    height: Option<u32>,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Page text file, one visible line per line.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Page heading, preferred over the heuristic title.
    #[arg(long)]
    heading: Option<String>,

    /// Cover image URL to record.
    #[arg(long)]
    cover_url: Option<String>,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Manifest JSON: an array of jobs.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving one PNG per job.
    #[arg(long)]
    out_dir: PathBuf,

    /// Also write all cards stacked into this PNG.
    #[arg(long)]
    stack: Option<PathBuf>,

    /// Worker threads (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Draw a QR code of each job's link when the job has no code image.
    #[arg(long)]
    qr: bool,

    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Parser, Debug)]
struct StackArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Padding around and between cards.
    #[arg(long, default_value_t = 30)]
    padding: u32,

    /// Card PNGs, top to bottom.
    #[arg(required = true)]
    cards: Vec<PathBuf>,
}

/// One entry of a batch manifest. Image paths are relative to the manifest.
#[derive(serde::Deserialize, Debug)]
struct BatchJob {
    record: cdcard::ReleaseRecord,
    #[serde(default)]
    link: String,
    #[serde(default)]
    cover: Option<PathBuf>,
    #[serde(default)]
    code: Option<PathBuf>,
    /// Output file name inside `--out-dir`; defaults to `card_<index>.png`.
    #[serde(default)]
    name: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Card(args) => cmd_card(args),
        Command::Extract(args) => cmd_extract(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Stack(args) => cmd_stack(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    let value = serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))?;
    Ok(value)
}

fn read_optional(path: Option<&Path>) -> anyhow::Result<Option<Vec<u8>>> {
    path.map(|p| std::fs::read(p).with_context(|| format!("read image '{}'", p.display())))
        .transpose()
}

fn load_layout(args: &LayoutArgs) -> anyhow::Result<(cdcard::LayoutConfig, cdcard::FontFace)> {
    let mut config: cdcard::LayoutConfig = match &args.config {
        Some(path) => read_json(path, "layout config")?,
        None => cdcard::LayoutConfig::default(),
    };
    if let Some(w) = args.width {
        config.canvas_width = w;
    }
    if let Some(h) = args.max_height {
        config.max_canvas_height = h;
    }
    config.validate()?;

    let font = cdcard::FontFace::load(&args.font)?;
    tracing::debug!(family = font.family(), "font loaded");
    Ok((config, font))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_card(args: CardArgs) -> anyhow::Result<()> {
    let record: cdcard::ReleaseRecord = read_json(&args.in_path, "release record")?;
    let (config, font) = load_layout(&args.layout)?;
    let renderer = cdcard::CardRenderer::new(config, font)?;

    let mut request = cdcard::CardRequest::new(record, args.link);
    request.cover = read_optional(args.cover.as_deref())?;
    request.code = read_optional(args.code.as_deref())?;
    request.fixed_height = args.height;
    request.qr_from_link = args.qr;

    let card = renderer.render(&request)?;
    ensure_parent(&args.out)?;
    card.save_png(&args.out)?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        card.width,
        card.height
    );
    Ok(())
}

fn cmd_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read page text '{}'", args.in_path.display()))?;
    let mut page = cdcard::ReleaseText::from_text(&text);
    page.heading = args.heading;
    page.cover_url = args.cover_url;

    let record = cdcard::extract_release(&page);
    let json = serde_json::to_string_pretty(&record).context("serialize release record")?;
    match &args.out {
        Some(out) => {
            ensure_parent(out)?;
            std::fs::write(out, json).with_context(|| format!("write '{}'", out.display()))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let jobs: Vec<BatchJob> = read_json(&args.in_path, "batch manifest")?;
    let (config, font) = load_layout(&args.layout)?;
    let base = args.in_path.parent().unwrap_or_else(|| Path::new("."));

    let mut requests = Vec::with_capacity(jobs.len());
    let mut names = Vec::with_capacity(jobs.len());
    for (i, job) in jobs.into_iter().enumerate() {
        let mut request = cdcard::CardRequest::new(job.record, job.link);
        request.cover = read_optional(job.cover.map(|p| base.join(p)).as_deref())?;
        request.code = read_optional(job.code.map(|p| base.join(p)).as_deref())?;
        request.qr_from_link = args.qr;
        requests.push(request);
        names.push(job.name.unwrap_or_else(|| format!("card_{i:03}.png")));
    }

    let cards = cdcard::render_batch(&config, &font, &requests, args.threads)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (card, name) in cards.iter().zip(&names) {
        card.save_png(args.out_dir.join(name))?;
    }
    eprintln!("wrote {} cards to {}", cards.len(), args.out_dir.display());

    if let Some(out) = &args.stack {
        write_stack(&cards, &cdcard::StackOptions::default(), out)?;
    }
    Ok(())
}

fn cmd_stack(args: StackArgs) -> anyhow::Result<()> {
    let mut cards = Vec::with_capacity(args.cards.len());
    for path in &args.cards {
        let img = image::open(path)
            .with_context(|| format!("open card '{}'", path.display()))?
            .to_rgba8();
        cards.push(cdcard::CardImage::from_rgba_image(img));
    }
    let opts = cdcard::StackOptions {
        padding: args.padding,
        ..cdcard::StackOptions::default()
    };
    write_stack(&cards, &opts, &args.out)
}

fn write_stack(
    cards: &[cdcard::CardImage],
    opts: &cdcard::StackOptions,
    out: &Path,
) -> anyhow::Result<()> {
    let Some(sheet) = cdcard::stack_cards(cards, opts)? else {
        anyhow::bail!("nothing to stack");
    };
    ensure_parent(out)?;
    sheet
        .save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!(
        "wrote {} ({}x{})",
        out.display(),
        sheet.width(),
        sheet.height()
    );
    Ok(())
}
