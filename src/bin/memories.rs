use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memories::{
    Background, Collaborators, DirTemplateSource, EditorConfig, FontLibrary, FsPageStore, Insets,
    ItemId, OutboxTransport, OutputFormat, PAGE_HEIGHT, PAGE_WIDTH, PageDocument, PageId,
    PageStore, Point, Rgba8, Session, SessionMode, Size, UserId, fit_to_viewport, load_session,
};

#[derive(Parser, Debug)]
#[command(name = "memories", version)]
struct Cli {
    /// Page store directory; defaults to the configured store.
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty page in the store and print its id.
    New,
    /// Add an image to a page, sized to the default width.
    AddImage(AddImageArgs),
    /// Remove an item from a page.
    RemoveItem(RemoveItemArgs),
    /// Set a page background color or template.
    Background(BackgroundArgs),
    /// Print the scale and offset fitting the page into a viewport.
    Fit(FitArgs),
    /// Flatten a page into a JPEG or PNG.
    Flatten(FlattenArgs),
    /// Flatten a page and deliver it to a recipient's outbox.
    Send(SendArgs),
}

#[derive(Parser, Debug)]
struct AddImageArgs {
    /// Page id in the store.
    #[arg(long)]
    page: PageId,

    /// Image file (PNG, JPEG, ...).
    #[arg(long)]
    image: PathBuf,

    /// Center x in page units.
    #[arg(long, default_value_t = PAGE_WIDTH / 2.0)]
    x: f64,

    /// Center y in page units.
    #[arg(long, default_value_t = PAGE_HEIGHT / 2.0)]
    y: f64,
}

#[derive(Parser, Debug)]
struct RemoveItemArgs {
    /// Page id in the store.
    #[arg(long)]
    page: PageId,

    #[arg(long)]
    id: ItemId,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("kind").required(true).args(["color", "template", "none"])))]
struct BackgroundArgs {
    /// Page id in the store.
    #[arg(long)]
    page: PageId,

    /// `#rrggbb` or `#rrggbbaa`.
    #[arg(long)]
    color: Option<Rgba8>,

    /// Background template name.
    #[arg(long)]
    template: Option<String>,

    /// Reset to the plain white page.
    #[arg(long)]
    none: bool,
}

#[derive(Parser, Debug)]
struct FitArgs {
    #[arg(long)]
    width: f64,

    #[arg(long)]
    height: f64,

    #[arg(long, default_value_t = memories::transform::DEFAULT_VIEWPORT_PADDING)]
    padding: f64,

    /// Top safe-area inset.
    #[arg(long, default_value_t = 0.0)]
    top: f64,

    /// Bottom safe-area inset.
    #[arg(long, default_value_t = 0.0)]
    bottom: f64,
}

#[derive(Parser, Debug)]
struct FlattenArgs {
    /// Page id in the store.
    #[arg(long)]
    page: PageId,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = PAGE_WIDTH)]
    width: f64,

    #[arg(long, default_value_t = PAGE_HEIGHT)]
    height: f64,

    /// `jpeg` or `png`; defaults to the configured format.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// JPEG quality 1..=100; defaults to the configured quality.
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Parser, Debug)]
struct SendArgs {
    /// Page id in the store.
    #[arg(long)]
    page: PageId,

    #[arg(long)]
    sender: UserId,

    /// Recipient user id.
    #[arg(long = "to")]
    recipient: UserId,

    /// Outbox root; defaults to the configured outbox.
    #[arg(long)]
    outbox: Option<PathBuf>,

    #[arg(long, default_value_t = PAGE_WIDTH)]
    width: f64,

    #[arg(long, default_value_t = PAGE_HEIGHT)]
    height: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = EditorConfig::from_env();
    if let Some(store) = cli.store {
        config.store_dir = store;
    }
    match cli.cmd {
        Command::New => cmd_new(&config),
        Command::AddImage(args) => cmd_add_image(args, &config),
        Command::RemoveItem(args) => cmd_remove_item(args, &config),
        Command::Background(args) => cmd_background(args, &config),
        Command::Fit(args) => cmd_fit(args),
        Command::Flatten(args) => cmd_flatten(args, config),
        Command::Send(args) => cmd_send(args, config),
    }
}

fn open_session(id: PageId, config: &EditorConfig) -> anyhow::Result<Session> {
    let store = FsPageStore::new(&config.store_dir);
    let doc = store.load_document(id)?;
    let collaborators = Collaborators::new(store)
        .with_transport(OutboxTransport::new(&config.outbox_dir))
        .with_templates(DirTemplateSource::new(&config.templates_dir));

    let mut fonts = FontLibrary::new();
    if let Some(dir) = &config.fonts_dir {
        let n = fonts.load_dir(dir)?;
        tracing::debug!(fonts = n, dir = %dir.display(), "loaded fonts");
    }

    Ok(load_session(doc, collaborators)?
        .with_fonts(fonts)
        .with_flatten_settings(config.flatten_settings()))
}

fn cmd_new(config: &EditorConfig) -> anyhow::Result<()> {
    let doc = PageDocument::create_empty();
    FsPageStore::new(&config.store_dir).save_document(&doc)?;
    println!("{}", doc.id());
    Ok(())
}

fn cmd_add_image(args: AddImageArgs, config: &EditorConfig) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("read image '{}'", args.image.display()))?;
    let mut session = open_session(args.page, config)?;
    let id = session.add_image_bytes(bytes, Point::new(args.x, args.y))?;
    session.save()?;
    println!("{id}");
    Ok(())
}

fn cmd_remove_item(args: RemoveItemArgs, config: &EditorConfig) -> anyhow::Result<()> {
    let mut session = open_session(args.page, config)?;
    if !session.remove_item(args.id) {
        tracing::warn!(item = %args.id, "item not on page");
        return Ok(());
    }
    Ok(session.save()?)
}

fn cmd_background(args: BackgroundArgs, config: &EditorConfig) -> anyhow::Result<()> {
    let background = match (args.color, args.template) {
        (Some(color), _) => Background::Color(color),
        (None, Some(name)) => Background::Image(name),
        (None, None) => Background::None,
    };
    let mut session = open_session(args.page, config)?;
    session.set_background(background)?;
    Ok(session.save()?)
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let fit = fit_to_viewport(
        Size::new(args.width, args.height),
        args.padding,
        Insets::new(args.top, args.bottom),
    )?;
    println!(
        "scale={} offset=({}, {})",
        fit.scale, fit.offset.x, fit.offset.y
    );
    Ok(())
}

fn cmd_flatten(args: FlattenArgs, mut config: EditorConfig) -> anyhow::Result<()> {
    if let Some(format) = args.format {
        config.flatten_format = format;
    }
    if let Some(quality) = args.quality {
        config.jpeg_quality = quality.clamp(1, 100);
    }
    let mut session = open_session(args.page, &config)?;
    let bytes = session.flatten_to_image(Size::new(args.width, args.height))?;
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write image '{}'", args.out.display()))?;
    tracing::info!(out = %args.out.display(), bytes = bytes.len(), "flattened page");
    Ok(())
}

fn cmd_send(args: SendArgs, mut config: EditorConfig) -> anyhow::Result<()> {
    if let Some(outbox) = args.outbox {
        config.outbox_dir = outbox;
    }
    let mut session = open_session(args.page, &config)?.with_mode(SessionMode::Letter {
        sender: args.sender,
        recipient: args.recipient,
    });
    let letter = session.send_letter(Size::new(args.width, args.height))?;
    println!("{}", serde_json::to_string_pretty(&letter)?);
    Ok(())
}
