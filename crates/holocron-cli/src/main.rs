use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use holocron_api::{
    Character, Film, Planet, Resource, ResourceKind, Specie, Starship, SwapiClient, Vehicle,
};
use holocron_core::{CancelScope, Config, LoadOutcome, LoadedProfile, PagedList, ProfileLoader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "holocron")]
#[command(version, about = "Browse the Star Wars API from the terminal", long_about = None)]
struct Cli {
    /// API root, e.g. https://swapi.dev/api
    #[arg(long, global = true, env = "HOLOCRON_API_URL")]
    base_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List a collection page by page
    List {
        /// characters, planets, species, starships, vehicles or films
        kind: ResourceKind,
        /// Number of pages to pull
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Only show items whose name contains this text
        #[arg(long, short)]
        query: Option<String>,
        /// Print image URLs next to each item
        #[arg(long)]
        images: bool,
        #[arg(long)]
        json: bool,
    },
    /// Fetch a single record by id
    Get {
        kind: ResourceKind,
        id: String,
    },
    /// Show a character with homeworld, films, species, starships and vehicles
    Show {
        /// Character id or full resource URL
        character: String,
        #[arg(long)]
        json: bool,
    },
}

struct ListArgs {
    pages: u32,
    query: Option<String>,
    images: bool,
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so --json output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holocron=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    // Flag (or HOLOCRON_API_URL) wins over whatever the config file says
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    let client = SwapiClient::new(config.client_options()).context("building HTTP client")?;

    match cli.command {
        Commands::List {
            kind,
            pages,
            query,
            images,
            json,
        } => {
            let args = ListArgs {
                pages,
                query,
                images,
                json,
            };
            match kind {
                ResourceKind::Character => list::<Character>(client, &config, args).await,
                ResourceKind::Planet => list::<Planet>(client, &config, args).await,
                ResourceKind::Specie => list::<Specie>(client, &config, args).await,
                ResourceKind::Starship => list::<Starship>(client, &config, args).await,
                ResourceKind::Vehicle => list::<Vehicle>(client, &config, args).await,
                ResourceKind::Film => list::<Film>(client, &config, args).await,
            }
        }
        Commands::Get { kind, id } => match kind {
            ResourceKind::Character => get::<Character>(&client, &id).await,
            ResourceKind::Planet => get::<Planet>(&client, &id).await,
            ResourceKind::Specie => get::<Specie>(&client, &id).await,
            ResourceKind::Starship => get::<Starship>(&client, &id).await,
            ResourceKind::Vehicle => get::<Vehicle>(&client, &id).await,
            ResourceKind::Film => get::<Film>(&client, &id).await,
        },
        Commands::Show { character, json } => show(client, &character, json).await,
    }
}

async fn list<T: Resource>(client: SwapiClient, config: &Config, args: ListArgs) -> anyhow::Result<()> {
    let list: PagedList<T, _> = PagedList::new(client, &config.list);
    list.start().await?;

    // Scroll to the bottom until we have enough pages or run out
    while list.pages_loaded() < args.pages {
        let last = list.items().len().saturating_sub(1);
        match list.load_more(last).await? {
            LoadOutcome::Loaded(_) => {}
            LoadOutcome::Skipped(reason) => {
                tracing::debug!("Stopped paging: {:?}", reason);
                break;
            }
        }
    }

    if let Some(query) = args.query {
        list.set_query(query);
    }
    let visible = list.visible();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("No results for search");
        return Ok(());
    }

    for (index, item) in visible.iter().enumerate() {
        if args.images {
            let image = list
                .visible_image_url(index, &config.api.image_base_url)
                .unwrap_or_default();
            println!("{:>4}  {:<30} {}", item.display_id(), item.display_name(), image);
        } else {
            println!("{:>4}  {}", item.display_id(), item.display_name());
        }
    }
    println!(
        "-- {} shown, {} loaded of {} {}",
        visible.len(),
        list.items().len(),
        list.count(),
        T::KIND.path()
    );

    Ok(())
}

async fn get<T: Resource>(client: &SwapiClient, id: &str) -> anyhow::Result<()> {
    let entity: T = client.fetch_entity_by_id(id).await?;
    println!("{}", serde_json::to_string_pretty(&entity)?);
    Ok(())
}

async fn show(client: SwapiClient, character: &str, json: bool) -> anyhow::Result<()> {
    let reference = if character.contains("://") {
        character.to_string()
    } else {
        format!(
            "{}/{}/{}/",
            client.base_url(),
            ResourceKind::Character.path(),
            character.trim_matches('/')
        )
    };

    let loader = ProfileLoader::new(client);
    let scope = CancelScope::new();

    // Ctrl-C flips the scope so nothing half-loaded gets printed
    let profile = tokio::select! {
        result = loader.load(&reference, &scope) => result?,
        _ = tokio::signal::ctrl_c() => {
            scope.cancel();
            anyhow::bail!("Cancelled");
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }
    Ok(())
}

fn print_profile(profile: &LoadedProfile) {
    let c = &profile.character;
    println!("{} (#{})", c.name, c.display_id);
    for (label, value) in [
        ("Height", &c.height),
        ("Mass", &c.mass),
        ("Hair Color", &c.hair_color),
        ("Skin Color", &c.skin_color),
        ("Eye Color", &c.eye_color),
        ("Birth Year", &c.birth_year),
        ("Gender", &c.gender),
    ] {
        println!("  {:<12} {}", label, value);
    }

    if let Some(homeworld) = &profile.homeworld {
        println!("Homeworld\n  {}", homeworld.name);
    }
    print_names("Films", profile.films.iter().map(|f| f.title.as_str()));
    print_names("Species", profile.species.iter().map(|s| s.name.as_str()));
    print_names("Starships", profile.starships.iter().map(|s| s.name.as_str()));
    print_names("Vehicles", profile.vehicles.iter().map(|v| v.name.as_str()));
}

fn print_names<'a>(heading: &str, names: impl Iterator<Item = &'a str>) {
    let names: Vec<_> = names.collect();
    if names.is_empty() {
        return;
    }
    println!("{}", heading);
    for name in names {
        println!("  {}", name);
    }
}
