//! mvista - browse a MusicVista catalog from the terminal

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mvista_client::render::CliFormatter;
use mvista_client::{
    calculate_pagination, AlbumQuery, ApiClient, ApiConfig, ArtistQuery, ClientError,
    TrackQuery, DEFAULT_PAGE_SIZE,
};
use mvista_common::emotion::EmotionFilter;
use mvista_common::sql::SortOrder;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "mvista")]
#[command(about = "Browse a MusicVista music catalog")]
#[command(version)]
struct Cli {
    /// API base URL (default from MVISTA_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trending artists and recent albums
    Home {
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },
    /// Search and filter the catalog
    Explore {
        #[command(subcommand)]
        target: ExploreTarget,
    },
    /// Catalog-wide insights
    Insights,
    /// Artist page
    Artist { id: String },
    /// Album page with its track list
    Album { id: String },
    /// Track page with lyrics and similar tracks
    Track { id: String },
}

#[derive(Subcommand, Debug)]
enum ExploreTarget {
    Artists {
        #[command(flatten)]
        page: PageArgs,
        /// Genre substring
        #[arg(short, long)]
        genre: Option<String>,
    },
    Albums {
        #[command(flatten)]
        page: PageArgs,
        /// single, album, compilation or all
        #[arg(short = 't', long = "type")]
        album_type: Option<String>,
    },
    Tracks {
        #[command(flatten)]
        page: PageArgs,
        /// Emotion name or All
        #[arg(short, long)]
        emotion: Option<EmotionFilter>,
    },
}

#[derive(Args, Debug)]
struct PageArgs {
    /// Name substring
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long)]
    sort_by: Option<String>,

    /// ASC or DESC
    #[arg(long)]
    sort_order: Option<SortOrder>,

    #[arg(short, long, default_value_t = 1)]
    page: i64,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mvista_client=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = ApiConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    debug!("Using API at {}", config.base_url);
    let client = ApiClient::new(config).context("Failed to create HTTP client")?;

    let output = match run(&client, cli.command).await {
        Ok(output) => output,
        Err(e) => {
            match e.detail() {
                Some(detail) => eprintln!("Error: {} ({})", e, detail),
                None => eprintln!("Error: {}", e),
            }
            std::process::exit(1);
        }
    };
    print!("{}", output);
    Ok(())
}

async fn run(client: &ApiClient, command: Command) -> Result<String, ClientError> {
    match command {
        Command::Home { limit } => home(client, limit).await,
        Command::Explore { target } => explore(client, target).await,
        Command::Insights => insights(client).await,
        Command::Artist { id } => artist_page(client, &id).await,
        Command::Album { id } => album_page(client, &id).await,
        Command::Track { id } => track_page(client, &id).await,
    }
}

async fn home(client: &ApiClient, limit: i64) -> Result<String, ClientError> {
    let artists = client.artists().trending(Some(limit)).await?;
    let albums = client.albums().recent(Some(limit)).await?;

    let mut output = String::from("\nTrending artists\n");
    output.push_str(&CliFormatter::artists_table(&artists));
    output.push_str("\nRecent albums\n");
    output.push_str(&CliFormatter::albums_table(&albums));
    Ok(output)
}

async fn explore(client: &ApiClient, target: ExploreTarget) -> Result<String, ClientError> {
    match target {
        ExploreTarget::Artists { page, genre } => {
            let mut query = ArtistQuery {
                search_term: page.search,
                genre_filter: genre,
                sort_by: page.sort_by,
                sort_order: page.sort_order,
                ..Default::default()
            };
            let total = client.artists().count(&query).await?;
            let p = calculate_pagination(total, page.page, page.page_size);
            query.limit = Some(p.page_size);
            query.offset = Some(p.offset);

            let artists = client.artists().search(&query).await?;
            query.ids = artists.iter().map(|a| a.id.clone()).collect();
            let genres = client.artists().genre_distribution(&query).await?;

            let mut output = CliFormatter::artists_table(&artists);
            output.push_str(&CliFormatter::page_footer(&p, total));
            if !artists.is_empty() {
                output.push_str(&CliFormatter::genre_distribution(&genres));
            }
            Ok(output)
        }
        ExploreTarget::Albums { page, album_type } => {
            let mut query = AlbumQuery {
                search_term: page.search,
                type_filter: album_type,
                sort_by: page.sort_by,
                sort_order: page.sort_order,
                ..Default::default()
            };
            let total = client.albums().count(&query).await?;
            let p = calculate_pagination(total, page.page, page.page_size);
            query.limit = Some(p.page_size);
            query.offset = Some(p.offset);

            let albums = client.albums().search(&query).await?;
            let types = client.albums().type_distribution(&query).await?;

            let mut output = CliFormatter::albums_table(&albums);
            output.push_str(&CliFormatter::page_footer(&p, total));
            if total > 0 {
                output.push_str(&CliFormatter::type_distribution(&types));
            }
            Ok(output)
        }
        ExploreTarget::Tracks { page, emotion } => {
            let mut query = TrackQuery {
                search_term: page.search,
                emotion_filter: emotion,
                sort_by: page.sort_by,
                sort_order: page.sort_order,
                ..Default::default()
            };
            let total = client.tracks().count(&query).await?;
            let p = calculate_pagination(total, page.page, page.page_size);
            query.limit = Some(p.page_size);
            query.offset = Some(p.offset);

            let tracks = client.tracks().search(&query).await?;
            let mut output = CliFormatter::tracks_table(&tracks);
            output.push_str(&CliFormatter::page_footer(&p, total));
            Ok(output)
        }
    }
}

async fn insights(client: &ApiClient) -> Result<String, ClientError> {
    let api = client.insights();
    let love = api.love_distribution().await?;
    let words = api.pop_words().await?;
    let growth = api.artist_popularity_growth().await?;
    let variety = api.artist_emotion_variety().await?;

    let mut output = CliFormatter::love_distribution(&love);
    output.push_str(&CliFormatter::pop_words(&words));
    output.push_str(&CliFormatter::popularity_growth(&growth));
    output.push_str(&CliFormatter::emotion_variety(&variety));
    Ok(output)
}

async fn artist_page(client: &ApiClient, id: &str) -> Result<String, ClientError> {
    let api = client.artists();
    let artist = api.get(id).await?;
    let track_count = api.track_count(id).await?;
    let album_count = api.album_count(id).await?;
    let albums = api.albums(id, Some(DEFAULT_PAGE_SIZE), None).await?;
    let tracks = api.tracks(id, Some(DEFAULT_PAGE_SIZE), None).await?;
    let collaborators = api.collaborators(id).await?;
    let emotions = api.emotion_distribution_of(id).await?;

    let mut output = CliFormatter::artist_detail(&artist);
    output.push_str(&format!("\nAlbums ({}):\n", album_count));
    output.push_str(&CliFormatter::albums_table(&albums));
    output.push_str(&format!("\nTracks ({}):\n", track_count));
    output.push_str(&CliFormatter::tracks_table(&tracks));
    output.push_str(&CliFormatter::collaborators(&collaborators));
    output.push_str(&CliFormatter::emotion_distribution(&emotions));
    Ok(output)
}

async fn album_page(client: &ApiClient, id: &str) -> Result<String, ClientError> {
    let album = client.albums().get(id).await?;
    let tracks = client.albums().tracks(id).await?;
    Ok(CliFormatter::album_detail(&album, &tracks))
}

async fn track_page(client: &ApiClient, id: &str) -> Result<String, ClientError> {
    let api = client.tracks();
    let track = api.get(id).await?;
    let lyrics = api.lyrics(id).await?;
    let similar = api.similar(id, None).await?;
    Ok(CliFormatter::track_detail(&track, lyrics.as_deref(), &similar))
}
