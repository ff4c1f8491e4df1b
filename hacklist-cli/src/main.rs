use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use hacklist::{
    CollectionKind, Config, Criteria, Date, Directory, Page, PageLink, PageWindow, Query, Record,
    SortKey, Value,
};
use serde_json::{json, Value as JsonValue};

mod template;

use template::Templates;

#[derive(Parser, Debug)]
#[clap(name = "hacklist", about, version)]
struct Args {
    /// Increase output logging verbosity.
    #[clap(short, long)]
    verbose: bool,

    /// Configuration file (JSON, YAML or TOML). Defaults apply if it does
    /// not exist.
    #[clap(short, long, default_value = "hacklist.toml")]
    config: PathBuf,

    /// Print results as JSON instead of text.
    #[clap(long)]
    json: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search hackathon events by name, description or location.
    Hackathons {
        #[clap(flatten)]
        listing: ListingArgs,
    },
    /// Show a single hackathon and its participants.
    Hackathon {
        /// The hackathon's ID.
        id: String,
    },
    /// List hackathons that have not ended yet, soonest first.
    Upcoming {
        /// Reference date (YYYY-MM-DD). Defaults to today.
        #[clap(long)]
        today: Option<String>,
    },
    /// Find teammates by name or bio, skill, location or hackathon.
    Teammates {
        #[clap(flatten)]
        listing: ListingArgs,

        /// Only show developers with this skill.
        #[clap(long)]
        skill: Option<String>,

        /// Only show developers in this location.
        #[clap(long)]
        location: Option<String>,

        /// Only show developers taking part in the hackathon with this ID.
        #[clap(long)]
        hackathon: Option<String>,
    },
    /// List the distinct values of a field, e.g. all skills.
    Facets {
        /// Either "events" or "profiles".
        collection: CollectionKind,

        /// The field to collect values from.
        field: String,
    },
}

#[derive(clap::Args, Debug)]
struct ListingArgs {
    /// Free-text search query.
    #[clap(short, long)]
    query: Option<String>,

    /// Page number, starting at 1.
    #[clap(short, long, default_value_t = 1, allow_hyphen_values = true)]
    page: i64,

    /// Number of results per page. Overrides the configured page size.
    #[clap(long, allow_hyphen_values = true)]
    page_size: Option<i64>,

    /// Sort by FIELD, FIELD:asc or FIELD:desc. May be repeated.
    #[clap(long)]
    sort: Vec<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = simple_logger::init_with_level(if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    }) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(&args) {
        log::error!("Failed: {:?}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(&args.config)?;
    let directory = Directory::from_config(&config).wrap_err("failed to load directory data")?;
    let templates = Templates::new()?;
    let output = Output {
        json: args.json,
        templates,
    };

    match &args.command {
        Command::Hackathons { listing } => {
            let kind = CollectionKind::Events;
            let criteria = Criteria::new()
                .with_query(listing.query.as_deref().unwrap_or_default())
                .search_in(config.search_fields(kind));
            let query = build_query(&config, kind, listing, criteria)?;
            let page = query.run(directory.events());
            output.page("event", "hackathon", &page)
        }
        Command::Hackathon { id } => {
            let event = directory
                .event(&Value::parse_scalar(id))
                .ok_or_else(|| eyre!("no hackathon with ID {}", id))?;
            let participants = directory.participants(event);
            let mut data = serde_json::to_value(event)?;
            data["participants"] = serde_json::to_value(&participants)?;
            output.single("event_detail", &data)
        }
        Command::Upcoming { today } => {
            let today = match today {
                Some(s) => Date::from_str(s).wrap_err("invalid --today date")?,
                None => Date::today(),
            };
            let events = directory
                .upcoming_events(today)
                .into_iter()
                .map(|event| upcoming_entry(event, today))
                .collect::<Result<Vec<JsonValue>>>()?;
            output.list("upcoming", "upcoming hackathon", &events)
        }
        Command::Teammates {
            listing,
            skill,
            location,
            hackathon,
        } => {
            let kind = CollectionKind::Profiles;
            let criteria = Criteria::new()
                .with_query(listing.query.as_deref().unwrap_or_default())
                .search_in(config.search_fields(kind))
                .with_selector("skills", skill.as_deref())
                .with_selector("location", location.as_deref())
                .with_selector("hackathons", hackathon.as_deref().map(Value::parse_scalar));
            let query = build_query(&config, kind, listing, criteria)?;
            let page = query.run(directory.profiles());
            output.page("profile", "developer", &page)
        }
        Command::Facets { collection, field } => {
            let values = directory.collection(*collection).distinct(field);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                for value in values {
                    println!("{}", value);
                }
            }
            Ok(())
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    Config::load_or_default(path)
        .wrap_err_with(|| format!("failed to load configuration from {}", path.display()))
}

fn build_query(
    config: &Config,
    kind: CollectionKind,
    listing: &ListingArgs,
    criteria: Criteria,
) -> Result<Query> {
    let window = match listing.page_size {
        Some(size) => PageWindow::from_signed(size, listing.page)?,
        None => config
            .first_page(kind)
            .wrap_err_with(|| format!("invalid page size configured for {}", kind))?
            .with_number(usize::try_from(listing.page).unwrap_or(0)),
    };
    let sort_keys = if listing.sort.is_empty() {
        config.sort_keys(kind)?
    } else {
        listing
            .sort
            .iter()
            .map(|s| SortKey::from_str(s))
            .collect::<std::result::Result<Vec<SortKey>, hacklist::Error>>()?
    };
    Ok(sort_keys
        .into_iter()
        .fold(Query::new(window).with_criteria(criteria), Query::sorted_by))
}

fn upcoming_entry(event: &Record, today: Date) -> Result<JsonValue> {
    let mut entry = serde_json::to_value(event)?;
    let days_until = Directory::days_until(event, today);
    entry["daysUntil"] = json!(days_until);
    entry["started"] = json!(days_until.map(|d| d < 0).unwrap_or(false));
    Ok(entry)
}

struct Output<'reg> {
    json: bool,
    templates: Templates<'reg>,
}

impl<'reg> Output<'reg> {
    fn page(&self, template: &str, noun: &str, page: &Page<&Record>) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(page)?);
            return Ok(());
        }
        println!(
            "{} {}{} found",
            page.total_items,
            noun,
            if page.total_items == 1 { "" } else { "s" }
        );
        for record in &page.items {
            println!("{}", self.templates.render(template, record)?);
        }
        if page.items.is_empty() && page.total_items > 0 {
            println!("(no results on page {})", page.number);
        }
        if page.total_pages > 1 {
            println!("Page {} of {}", page.number, page.total_pages);
            println!("{}", format_navigation(page));
        }
        Ok(())
    }

    fn list(&self, template: &str, noun: &str, items: &[JsonValue]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(items)?);
            return Ok(());
        }
        println!(
            "{} {}{}",
            items.len(),
            noun,
            if items.len() == 1 { "" } else { "s" }
        );
        for item in items {
            println!("{}", self.templates.render(template, item)?);
        }
        Ok(())
    }

    fn single(&self, template: &str, data: &JsonValue) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(data)?);
        } else {
            println!("{}", self.templates.render(template, data)?);
        }
        Ok(())
    }
}

fn format_navigation<T>(page: &Page<T>) -> String {
    let mut parts = Vec::new();
    if page.has_previous() {
        parts.push(format!("< Previous (-p {})", page.previous()));
    }
    parts.push(format_links(&page.links()));
    if page.has_next() {
        parts.push(format!("Next (-p {}) >", page.next()));
    }
    parts.join("   ")
}

fn format_links(links: &[PageLink]) -> String {
    links
        .iter()
        .map(|link| match link {
            PageLink::Page {
                number,
                current: true,
            } => format!("[{}]", number),
            PageLink::Page { number, .. } => number.to_string(),
            PageLink::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<String>>()
        .join(" ")
}
