use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use localblog::app_context::AppContext;
use localblog::logger::configure_logger;
use localblog::migrate::migrate_legacy;
use localblog::post_list::PostList;

use crate::config::open_config;
use crate::post::new_post;

mod config;
mod post;

const CFG_FILE_NAME: &str = "localblog.toml";
const SUMMARY_SIZE: usize = 10;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Number of posts and the latest published ones
    Summary {
        /// Posts folder. Defaults to the configured one
        folder: Option<PathBuf>,
    },
    /// Searches the posts for a phrase
    Search {
        phrase: String,
        /// Posts folder. Defaults to the configured one
        folder: Option<PathBuf>,
    },
    /// Creates a draft post
    New {
        /// Title of the post
        #[arg(short, long)]
        title: String,

        /// Directory where the post file is written
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Rewrites posts exported by the old blog into the current header format
    Migrate {
        /// Address of the blog the posts were exported from
        #[arg(short, long)]
        baselink: String,

        /// Only prints the files that would change
        #[arg(long)]
        dry_run: bool,

        /// Posts folder. Defaults to the configured one
        folder: Option<PathBuf>,
    },
}

fn summary_cmd(context: &AppContext) {
    let repository = context.repository();
    println!("{} posts in {}", repository.total(), repository.folder().display());
    for year in repository.years() {
        println!("  {}: {} posts", year.year(), repository.from_year(year.year()).len());
    }

    println!("Latest published:");
    for post in repository.posts().iter().filter(|p| p.status().is_published()).take(SUMMARY_SIZE) {
        println!("  {}  {}  {}", post.header.creation_date.format("%Y-%m-%d"), post.permalink(), post.header.title);
    }
}

fn search_cmd(context: &AppContext, phrase: &str) {
    let repository = context.repository();
    let found = repository.search(phrase);
    println!("{} posts found for '{}'", found.len(), phrase);
    for post in found {
        println!("  {}  {}", post.permalink(), post.header.title);
    }
}

fn migrate_cmd(folder: &Path, baselink: &str, dry_run: bool) -> Result<()> {
    let files = PostList::new(folder.to_path_buf()).retrieve_files()?;
    let mut changed = 0;

    for path in files {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => continue,
        };
        let text = fs::read_to_string(&path)?;

        match migrate_legacy(&file_name, &text, baselink) {
            Ok(Some(migrated)) => {
                changed += 1;
                if dry_run {
                    println!("Would migrate {}", path.display());
                } else {
                    fs::write(&path, migrated)?;
                    info!("Migrated {}", path.display());
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    println!("{} files {}", changed, if dry_run { "to migrate" } else { "migrated" });
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    if let Command::New { title, output_dir } = &args.command {
        let output_dir = output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let path = new_post(title, &output_dir)?;
        println!("Creating file {}", path.display());
        return Ok(());
    }

    let folder = match &args.command {
        Command::Summary { folder } | Command::Search { folder, .. } | Command::Migrate { folder, .. } => folder.clone(),
        Command::New { .. } => None,
    };

    let config = match open_config(config_path, folder) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run localblog --help");
            return Ok(());
        }
    };

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    if let Command::Migrate { baselink, dry_run, .. } = &args.command {
        return migrate_cmd(&config.paths.posts_dir, baselink, *dry_run);
    }

    info!("Loading posts from {}", config.paths.posts_dir.display());
    let context = AppContext::build(config)?;

    match args.command {
        Command::Summary { .. } => summary_cmd(&context),
        Command::Search { phrase, .. } => search_cmd(&context, &phrase),
        Command::New { .. } | Command::Migrate { .. } => {}
    }

    Ok(())
}
