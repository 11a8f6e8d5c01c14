//! `casefile` - CLI for the evidence cataloging portal
//!
//! This binary provides the command-line interface for running the evidence
//! API server and working with the shared evidence document.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;

use casefile::cache::LocalCache;
use casefile::cli::{
    AccountCommand, AddCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat,
    RmCommand, ServeCommand,
};
use casefile::record::{CriminalDraft, PhotoDraft, TextDraft, VideoDraft};
use casefile::{
    auth, init_logging, server, Config, EvidenceSet, HttpRemote, Portal, RecordKind, SyncClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(cmd) => handle_serve(config, &cmd).await,
        Command::Status(cmd) => handle_status(&config, cmd.json).await,
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Add(cmd) => handle_add(&config, cmd).await,
        Command::Rm(cmd) => handle_rm(&config, cmd).await,
        Command::Account(cmd) => {
            handle_account(&cmd);
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: &ServeCommand) -> Result<()> {
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(bind) = &cmd.bind {
        config.server.bind_addr.clone_from(bind);
    }
    config.validate()?;

    println!("Serving evidence API on http://{}", config.bind_addr());
    server::serve(&config).await?;
    Ok(())
}

async fn load_evidence(config: &Config) -> Result<EvidenceSet> {
    let cache = LocalCache::open(config.cache_dir())?;
    let sync = SyncClient::new(Arc::new(HttpRemote::new(&config.remote.url)), cache);
    Ok(sync.load().await)
}

async fn handle_status(config: &Config, json: bool) -> Result<()> {
    let counts = load_evidence(config).await?.counts();

    if json {
        let status = serde_json::json!({
            "remote_url": config.remote.url,
            "database_path": config.database_path(),
            "photos": counts.photos,
            "videos": counts.videos,
            "text": counts.text,
            "criminals": counts.criminals,
            "total": counts.total(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("casefile status");
        println!("---------------");
        println!("Remote:        {}", config.remote.url);
        println!("Database:      {}", config.database_path().display());
        println!();
        println!("Photos:        {}", counts.photos);
        println!("Videos:        {}", counts.videos);
        println!("Text records:  {}", counts.text);
        println!("Criminals:     {}", counts.criminals);
        println!("Total:         {}", counts.total());
    }
    Ok(())
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> Result<()> {
    let set = load_evidence(config).await?;
    let kind = cmd.kind.map(RecordKind::from);

    if cmd.format == OutputFormat::Json {
        let value = match kind {
            None => serde_json::to_value(&set)?,
            Some(RecordKind::Photo) => serde_json::to_value(&set.photos)?,
            Some(RecordKind::Video) => serde_json::to_value(&set.videos)?,
            Some(RecordKind::Text) => serde_json::to_value(&set.text)?,
            Some(RecordKind::Criminal) => serde_json::to_value(&set.criminals)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if cmd.format == OutputFormat::Table {
        println!("{:<10} {:<15} {:<12} TITLE", "KIND", "ID", "DATE");
    }
    if kind.is_none() || kind == Some(RecordKind::Photo) {
        for p in &set.photos {
            println!("{:<10} {:<15} {:<12} {}", "photo", p.id, p.date, p.title);
        }
    }
    if kind.is_none() || kind == Some(RecordKind::Video) {
        for v in &set.videos {
            println!("{:<10} {:<15} {:<12} {}", "video", v.id, v.date, v.title);
        }
    }
    if kind.is_none() || kind == Some(RecordKind::Text) {
        for t in &set.text {
            println!("{:<10} {:<15} {:<12} {}", "text", t.id, t.date, t.title);
        }
    }
    if kind.is_none() || kind == Some(RecordKind::Criminal) {
        for c in &set.criminals {
            println!("{:<10} {:<15} {:<12} {}", "criminal", c.id, c.date, c.name);
        }
    }
    Ok(())
}

fn date_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

async fn handle_add(config: &Config, cmd: AddCommand) -> Result<()> {
    let mut portal = Portal::open(config).await?;

    let (kind, id) = match cmd {
        AddCommand::Photo {
            title,
            description,
            url,
            date,
            auth,
        } => {
            portal.login(&auth.user, &auth.password)?;
            let id = portal
                .add_photo(PhotoDraft {
                    title,
                    description,
                    url,
                    date: date_or_today(date),
                })
                .await?;
            (RecordKind::Photo, id)
        }
        AddCommand::Video {
            title,
            description,
            url,
            thumbnail,
            date,
            auth,
        } => {
            portal.login(&auth.user, &auth.password)?;
            let id = portal
                .add_video(VideoDraft {
                    title,
                    description,
                    url,
                    thumbnail,
                    date: date_or_today(date),
                })
                .await?;
            (RecordKind::Video, id)
        }
        AddCommand::Text {
            title,
            content,
            date,
            auth,
        } => {
            portal.login(&auth.user, &auth.password)?;
            let id = portal
                .add_text(TextDraft {
                    title,
                    content,
                    date: date_or_today(date),
                })
                .await?;
            (RecordKind::Text, id)
        }
        AddCommand::Criminal {
            name,
            age,
            charges,
            status,
            photo,
            description,
            date,
            auth,
        } => {
            portal.login(&auth.user, &auth.password)?;
            let id = portal
                .add_criminal(CriminalDraft {
                    name,
                    age,
                    charges,
                    status,
                    photo,
                    description,
                    date: date_or_today(date),
                })
                .await?;
            (RecordKind::Criminal, id)
        }
    };

    println!("Added {kind} record {id}");
    Ok(())
}

async fn handle_rm(config: &Config, cmd: RmCommand) -> Result<()> {
    if !cmd.yes && !confirm_delete()? {
        println!("Aborted.");
        return Ok(());
    }

    let mut portal = Portal::open(config).await?;
    portal.login(&cmd.auth.user, &cmd.auth.password)?;

    let kind = RecordKind::from(cmd.kind);
    if portal.remove(kind, cmd.id).await? {
        println!("Removed {kind} record {}", cmd.id);
    } else {
        println!("No {kind} record with id {}", cmd.id);
    }
    Ok(())
}

fn confirm_delete() -> Result<bool> {
    print!("Are you sure you want to delete this evidence? This action cannot be undone. [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn handle_account(cmd: &AccountCommand) {
    match cmd {
        AccountCommand::Hash { password } => {
            println!("{}", auth::hash_password(password));
        }
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:    {}", config.bind_addr());
                println!("  Database path:   {}", config.database_path().display());
                println!(
                    "  Assets dir:      {}",
                    config
                        .server
                        .assets_dir
                        .as_ref()
                        .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
                );
                println!();
                println!("[Remote]");
                println!("  URL:             {}", config.remote.url);
                println!();
                println!("[Cache]");
                println!("  Directory:       {}", config.cache_dir().display());
                println!();
                println!("[Thumbnail]");
                println!("  Enabled:         {}", config.thumbnail.enabled);
                println!("  ffmpeg:          {}", config.thumbnail.ffmpeg_path.display());
                println!("  ffprobe:         {}", config.thumbnail.ffprobe_path.display());
                println!("  JPEG quality:    {}", config.thumbnail.jpeg_quality);
                println!();
                println!("[Auth]");
                if config.auth.accounts.is_empty() {
                    println!("  Accounts:        built-in (editor, viewer)");
                } else {
                    println!("  Accounts:        {}", config.auth.accounts.len());
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
