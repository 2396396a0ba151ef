//! Command-line front end: renders passages, links and shortcodes to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use exn::ResultExt;
use pericope::error::{ErrorKind, Result};
use pericope::{Config, ItemId, LinkOptions, Pericope, Shortcode};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pericope", version)]
#[command(about = "Embed scripture passages from BibleGateway into HTML")]
struct Args {
    /// Config file (TOML, YAML or JSON); defaults to the platform config directory
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reader locale used to pick a translation, e.g. en_GB
    #[arg(short, long, global = true)]
    locale: Option<String>,

    /// Content item owning the cached passages
    #[arg(short, long, global = true, default_value = "0")]
    item: String,

    /// Keep the passage cache in memory instead of the SQLite file
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Quote a passage with attribution
    Quote {
        verse: String,
        /// Translation code, e.g. NIV (defaults to the locale's translation)
        #[arg(short, long)]
        translation: Option<String>,
    },
    /// Link to a passage
    Link {
        verse: String,
        #[arg(short, long)]
        translation: Option<String>,
        /// Anchor text replacing the citation
        #[arg(long)]
        text: Option<String>,
        /// Leave the translation code out of the link text
        #[arg(long)]
        hide_version: bool,
    },
    /// Link every citation found in prose read from FILE or stdin
    Autolink { file: Option<PathBuf> },
    /// Render a shortcode tag such as '[bible verse="Ps 23"]'
    Shortcode { tag: String },
    /// Forget every cached passage of a content item
    Purge {
        #[arg(value_name = "ITEM")]
        content_item: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pericope=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<String> {
    let config = Config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let pericope = Pericope::from_config(config, args.memory).await?;
    let item = ItemId::from(args.item);
    let locale = args.locale.as_deref();
    match args.command {
        Command::Quote { verse, translation } => {
            let translation = pericope.translation(translation.as_deref(), locale)?;
            pericope.quote(&item, &verse, &translation).await
        },
        Command::Link { verse, translation, text, hide_version } => {
            let translation = pericope.translation(translation.as_deref(), locale)?;
            let show_version = pericope.config().render.show_version && !hide_version;
            pericope.link(&verse, &translation, &LinkOptions::new(show_version).with_anchor_text(text))
        },
        Command::Autolink { file } => {
            let prose = match file {
                Some(path) => tokio::fs::read_to_string(&path).await.or_raise(|| ErrorKind::Input)?,
                None => {
                    let mut prose = String::new();
                    tokio::io::stdin().read_to_string(&mut prose).await.or_raise(|| ErrorKind::Input)?;
                    prose
                },
            };
            pericope.autolink(&prose, locale)
        },
        Command::Shortcode { tag } => {
            let shortcode: Shortcode = tag.parse()?;
            pericope.shortcode(&item, &shortcode, locale).await
        },
        Command::Purge { content_item } => {
            let removed = pericope.purge(&ItemId::from(content_item)).await?;
            Ok(format!("{removed} cached passage(s) removed"))
        },
    }
}
