use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chronicler_viewer::archive::{download_file, ArchiveApi, ArchiveApiClient, PageRequest};
use chronicler_viewer::config::Config;
use chronicler_viewer::models::{FileBucket, SortField, SortOrder, Sorting};
use chronicler_viewer::render::{render_listing, render_thread, RenderOptions};
use chronicler_viewer::resolver::NamePrecedence;

#[derive(Parser)]
#[command(name = "chronicler-viewer")]
#[command(about = "Browse threads stored in a chronicler archive")]
struct Args {
    /// Archive API base URL (overrides CHRONICLER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Which source names a record: `parent` or `own`
    #[arg(long, global = true)]
    names: Option<NamePrecedence>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List thread summaries
    List {
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Page size (defaults to CHRONICLER_PAGE_SIZE)
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        query: Option<String>,
    },
    /// Print one thread as a reply tree
    Show {
        id: String,
        /// Attachments to list: image, audio, video, document or all
        #[arg(long)]
        files: Option<FileBucket>,
        /// create_time or fetch_time
        #[arg(long, default_value = "create_time")]
        sort: SortField,
        /// Newest first
        #[arg(long)]
        desc: bool,
    },
    /// Save one attachment of a thread
    Download {
        id: String,
        file: String,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Delete threads from the archive
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chronicler_viewer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(base_url) = args.base_url {
        config.archive.base_url = base_url;
    }
    if let Some(names) = args.names {
        config.display.name_precedence = names;
    }
    config.validate()?;

    let client = ArchiveApiClient::new(&config.archive)?;
    tracing::debug!("Using archive at {}", client.base_url());
    let mut options = RenderOptions::from_config(&config.display);

    match args.command {
        Command::List {
            offset,
            size,
            query,
        } => {
            let mut page = PageRequest::new(offset, size.unwrap_or(config.archive.page_size));
            if let Some(query) = query {
                page = page.with_query(query);
            }
            let listing = client.list_record_sets(&page).await?;
            tracing::info!("Fetched {} record sets", listing.len());
            print!("{}", render_listing(&listing, &options));
        }
        Command::Show {
            id,
            files,
            sort,
            desc,
        } => {
            let set = client.get_record_set(&id).await?;
            options.files = files;
            options.sorting = Sorting::new(
                sort,
                if desc { SortOrder::Desc } else { SortOrder::Asc },
            );
            print!("{}", render_thread(&set, &options));
        }
        Command::Download { id, file, output } => {
            let target = output.unwrap_or_else(|| PathBuf::from(&file));
            let written = download_file(&client, &id, &file, &target).await?;
            println!("{} ({} bytes)", target.display(), written);
        }
        Command::Delete { ids } => {
            let results = client.delete_record_sets(&ids).await?;
            for result in results {
                match result.error {
                    Some(error) if !error.is_null() => {
                        tracing::error!("Failed to delete {}: {}", result.id, error);
                        println!("{}  failed", result.id);
                    }
                    _ => println!(
                        "{}  {}",
                        result.id,
                        if result.deleted { "deleted" } else { "kept" }
                    ),
                }
            }
        }
    }

    Ok(())
}
