use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use geonode_catalog_client::actions::{Action, DEFAULT_FEATURED_PAGE_SIZE};
use geonode_catalog_client::api::CatalogHttpClient;
use geonode_catalog_client::config::{ClientConfig, ConfigLoader};
use geonode_catalog_client::domain::{ResourcePk, SearchParams};
use geonode_catalog_client::error::CatalogError;
use geonode_catalog_client::output::{
    JsonOutput, OutputMode, print_notifications, print_search_summary,
};
use geonode_catalog_client::save::DirectorySink;
use geonode_catalog_client::{Store, initial_state};

#[derive(Parser)]
#[command(name = "gn-catalog")]
#[command(about = "Search a GeoNode catalog, download metadata and manage favorites")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Search catalog resources")]
    Search(SearchArgs),
    #[command(about = "Show a single resource")]
    Show(ShowArgs),
    #[command(about = "Download a metadata document of a resource")]
    Download(DownloadArgs),
    #[command(about = "Mark or unmark a resource as favorite")]
    Favorite(FavoriteArgs),
    #[command(about = "List featured resources")]
    Featured(FeaturedArgs),
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long, short)]
    query: Option<String>,

    #[arg(long = "filter", short)]
    filters: Vec<String>,

    #[arg(long)]
    sort: Option<String>,

    #[arg(long, default_value_t = 1)]
    page: u32,
}

#[derive(Args)]
struct ShowArgs {
    pk: String,
}

#[derive(Args)]
struct DownloadArgs {
    pk: String,

    #[arg(long, default_value = "ISO")]
    format: String,

    #[arg(long)]
    out: Option<String>,
}

#[derive(Args)]
struct FeaturedArgs {
    #[arg(long, default_value_t = DEFAULT_FEATURED_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Args)]
struct FavoriteArgs {
    pk: String,

    #[arg(long)]
    off: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<CatalogError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &CatalogError) -> u8 {
    match error {
        CatalogError::MissingLink { .. } | CatalogError::MissingResource => 2,
        CatalogError::InvalidPk(_) | CatalogError::InvalidUrl(_) => 2,
        CatalogError::ConfigRead(_) | CatalogError::ConfigParse(_) => 2,
        CatalogError::Http(_) | CatalogError::Status { .. } | CatalogError::ServiceException(_) => 3,
        CatalogError::Filesystem(_) | CatalogError::EffectPanicked(_) => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Summary
    };
    let mut config = ConfigLoader::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Search(args) => run_search(args, config, output_mode),
        Command::Show(args) => run_show(args, config, output_mode),
        Command::Download(args) => {
            if let Some(out) = &args.out {
                config.download_dir = out.as_str().into();
            }
            run_download(args, config, output_mode)
        }
        Command::Favorite(args) => run_favorite(args, config, output_mode),
        Command::Featured(args) => run_featured(args, config, output_mode),
    }
}

type HttpStore = Store<CatalogHttpClient, DirectorySink>;

fn build_store(config: ClientConfig) -> miette::Result<HttpStore> {
    let state = initial_state(&config);
    let saver = DirectorySink::new(config.download_dir.clone());
    let client = CatalogHttpClient::new(config)?;
    Ok(Store::new(state, client, saver))
}

fn open_resource(store: &mut HttpStore, pk: &str) -> miette::Result<ResourcePk> {
    let pk: ResourcePk = pk.parse()?;
    store.dispatch_and_wait(Action::RequestResource {
        pk: Some(pk.clone()),
    })?;
    if let Some(message) = store.state().gnresource.error {
        return Err(miette::Report::msg(message));
    }
    Ok(pk)
}

fn run_search(args: SearchArgs, config: ClientConfig, mode: OutputMode) -> miette::Result<()> {
    let mut params = SearchParams::new().with("page", args.page.to_string());
    if let Some(query) = args.query {
        params.set("q", query);
    }
    if let Some(sort) = args.sort {
        params.set("sort", sort);
    }
    for filter in args.filters {
        params.insert("f", filter);
    }

    let mut store = build_store(config)?;
    let state = store.dispatch_and_wait(Action::SearchResources {
        params,
        reset: true,
    })?;
    print_notifications(&state);
    if state.gnsearch.error {
        return Err(miette::Report::msg("resource search failed"));
    }
    match mode {
        OutputMode::Json => JsonOutput::print_search(&state.gnsearch).into_diagnostic(),
        OutputMode::Summary => {
            print_search_summary(&state.gnsearch);
            Ok(())
        }
    }
}

fn run_show(args: ShowArgs, config: ClientConfig, mode: OutputMode) -> miette::Result<()> {
    let mut store = build_store(config)?;
    open_resource(&mut store, &args.pk)?;
    let state = store.state();
    match (mode, &state.gnresource.data) {
        (OutputMode::Json, _) => JsonOutput::print_resource(&state.gnresource).into_diagnostic(),
        (OutputMode::Summary, Some(resource)) => {
            println!("{} {}", resource.pk, resource.title);
            for link in &resource.links {
                println!("  {:<24} {}", link.name, link.url);
            }
            Ok(())
        }
        (OutputMode::Summary, None) => Ok(()),
    }
}

fn run_download(args: DownloadArgs, config: ClientConfig, mode: OutputMode) -> miette::Result<()> {
    let download_dir = config.download_dir.clone();
    let mut store = build_store(config)?;
    let pk = open_resource(&mut store, &args.pk)?;
    let state = store.dispatch_and_wait(Action::DownloadMetadata {
        link: args.format.clone(),
        pk,
    })?;
    print_notifications(&state);
    if state.notifications.errors().next().is_some() {
        return Err(miette::Report::msg("metadata download failed"));
    }
    match mode {
        OutputMode::Json => JsonOutput::print_downloads(&state.gndownload).into_diagnostic(),
        OutputMode::Summary => {
            println!("{} metadata saved to {download_dir}", args.format);
            Ok(())
        }
    }
}

fn run_favorite(args: FavoriteArgs, config: ClientConfig, mode: OutputMode) -> miette::Result<()> {
    let mut store = build_store(config)?;
    open_resource(&mut store, &args.pk)?;
    let state = store.dispatch_and_wait(Action::SetFavoriteResource { favorite: !args.off })?;
    print_notifications(&state);
    match mode {
        OutputMode::Json => JsonOutput::print_resource(&state.gnresource).into_diagnostic(),
        OutputMode::Summary => {
            if let Some(resource) = &state.gnresource.data {
                let label = if resource.favorite { "favorite" } else { "not favorite" };
                println!("{} {}: {label}", resource.pk, resource.title);
            }
            Ok(())
        }
    }
}

fn run_featured(args: FeaturedArgs, config: ClientConfig, mode: OutputMode) -> miette::Result<()> {
    let mut store = build_store(config)?;
    let state = store.dispatch_and_wait(Action::UpdateFeaturedResources {
        direction: None,
        page_size: args.page_size,
    })?;
    if let Some(message) = &state.gnresource.error {
        return Err(miette::Report::msg(message.clone()));
    }
    let featured = &state.gnsearch.featured_resources;
    match mode {
        OutputMode::Json => JsonOutput::print_featured(featured).into_diagnostic(),
        OutputMode::Summary => {
            for resource in &featured.resources {
                println!("{:>6}  {}", resource.pk.as_str(), resource.title);
            }
            Ok(())
        }
    }
}
