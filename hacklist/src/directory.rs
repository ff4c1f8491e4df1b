use std::str::FromStr;

use log::debug;

use crate::{Collection, Config, Date, Error, Record, SortKey, SupportedFormat, Value};

const BUILTIN_EVENTS: &str = include_str!("../data/hackathons.json");
const BUILTIN_PROFILES: &str = include_str!("../data/profiles.json");

/// The two kinds of collections held by a [`Directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Hackathon events.
    Events,
    /// Developer profiles.
    Profiles,
}

impl CollectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Profiles => "profiles",
        }
    }

    pub fn default_search_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Events => &["name", "description", "location"],
            Self::Profiles => &["name", "bio"],
        }
    }

    pub fn default_page_size(&self) -> usize {
        match self {
            Self::Events => 4,
            Self::Profiles => 6,
        }
    }

    fn builtin_data(&self) -> &'static str {
        match self {
            Self::Events => BUILTIN_EVENTS,
            Self::Profiles => BUILTIN_PROFILES,
        }
    }
}

impl FromStr for CollectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "events" | "hackathons" => Ok(Self::Events),
            "profiles" | "teammates" => Ok(Self::Profiles),
            _ => Err(Error::UnknownCollection(s.to_string())),
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The directory of hackathon events and developer profiles.
///
/// Events carry `id`, `name`, `date`, `endDate`, `location`, `description`,
/// `participants` (profile IDs) and `image`. Profiles carry `id`, `name`,
/// `username`, `avatar`, `bio`, `location`, `skills`, `interests`,
/// `hackathons` (event IDs), `connections` and `connectionRequests`.
#[derive(Debug, Clone)]
pub struct Directory {
    events: Collection,
    profiles: Collection,
}

impl Directory {
    /// Constructor.
    pub fn new(events: Collection, profiles: Collection) -> Self {
        Self { events, profiles }
    }

    /// The sample data that ships with this crate.
    pub fn builtin() -> Result<Self, Error> {
        Ok(Self::new(
            builtin_collection(CollectionKind::Events)?,
            builtin_collection(CollectionKind::Profiles)?,
        ))
    }

    /// Load each collection from its configured source, falling back to the
    /// built-in data for collections without one.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let load = |kind: CollectionKind| match config.source(kind) {
            Some(source) => Collection::load(kind.name(), &source),
            None => builtin_collection(kind),
        };
        Ok(Self::new(
            load(CollectionKind::Events)?,
            load(CollectionKind::Profiles)?,
        ))
    }

    pub fn events(&self) -> &Collection {
        &self.events
    }

    pub fn profiles(&self) -> &Collection {
        &self.profiles
    }

    pub fn collection(&self, kind: CollectionKind) -> &Collection {
        match kind {
            CollectionKind::Events => &self.events,
            CollectionKind::Profiles => &self.profiles,
        }
    }

    pub fn event(&self, id: &Value) -> Option<&Record> {
        self.events.get(id)
    }

    pub fn profile(&self, id: &Value) -> Option<&Record> {
        self.profiles.get(id)
    }

    /// Events that have not yet ended as of `today`, soonest first.
    ///
    /// Events without a parseable `endDate` are left out.
    pub fn upcoming_events(&self, today: Date) -> Vec<&Record> {
        let mut upcoming = self
            .events
            .iter()
            .filter(|e| {
                e.get("endDate")
                    .and_then(Value::as_date)
                    .map(|end| end >= today)
                    .unwrap_or(false)
            })
            .collect::<Vec<&Record>>();
        crate::sort(&mut upcoming, &[SortKey::ascending("date")]);
        debug!("{} upcoming event(s) as of {}", upcoming.len(), today);
        upcoming
    }

    /// Whole days from `today` until the event starts. Negative for events
    /// that have already started, `None` if the event has no valid `date`.
    pub fn days_until(event: &Record, today: Date) -> Option<i64> {
        event
            .get("date")
            .and_then(Value::as_date)
            .map(|start| today.days_until(start))
    }

    /// The profiles taking part in the given event, in the order listed by
    /// the event. IDs with no matching profile are skipped.
    pub fn participants(&self, event: &Record) -> Vec<&Record> {
        event
            .get("participants")
            .and_then(Value::as_array)
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.profiles.get(id))
            .collect()
    }
}

fn builtin_collection(kind: CollectionKind) -> Result<Collection, Error> {
    let value = Value::load_as(SupportedFormat::Json, kind.builtin_data())?;
    let collection = Collection::from_value(kind.name(), value)?;
    debug!(
        "Loaded {} built-in record(s) into {}",
        collection.len(),
        kind
    );
    Ok(collection)
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(s: &str) -> Date {
        Date::from_str(s).unwrap()
    }

    #[test]
    fn builtin_data_loads() {
        let dir = Directory::builtin().unwrap();
        assert_eq!(dir.events().len(), 4);
        assert_eq!(dir.profiles().len(), 6);
        assert_eq!(
            dir.event(&Value::Unsigned(3)).unwrap().get_str("name"),
            Some("Code for India")
        );
        assert_eq!(
            dir.profile(&Value::from(6)).unwrap().get_str("username"),
            Some("kavyagamedev")
        );
    }

    #[test]
    fn upcoming_events_are_sorted_by_start() {
        let dir = Directory::builtin().unwrap();
        let upcoming = dir.upcoming_events(date("2023-11-06"));
        let names = upcoming
            .iter()
            .filter_map(|e| e.get_str("name"))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["HackBangalore", "Code for India", "AI & ML Summit Hyderabad"]
        );
        assert!(dir.upcoming_events(date("2030-01-01")).is_empty());
    }

    #[test]
    fn days_until_event() {
        let dir = Directory::builtin().unwrap();
        let event = dir.event(&Value::from(1)).unwrap();
        assert_eq!(Directory::days_until(event, date("2023-10-10")), Some(5));
        assert_eq!(Directory::days_until(event, date("2023-10-16")), Some(-1));
    }

    #[test]
    fn participants_resolve_to_profiles() {
        let dir = Directory::builtin().unwrap();
        let event = dir.event(&Value::from(1)).unwrap();
        let names = dir
            .participants(event)
            .into_iter()
            .filter_map(|p| p.get_str("name"))
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Arjun Sharma", "Priya Patel", "Rohan Mehta"]);

        let lonely = Record::new(99, Default::default()).with("participants", vec![42]);
        assert!(dir.participants(&lonely).is_empty());
    }

    #[test]
    fn collection_kinds_parse() {
        assert_eq!(
            CollectionKind::from_str("Teammates").unwrap(),
            CollectionKind::Profiles
        );
        assert!(CollectionKind::from_str("messages").is_err());
    }

    #[test]
    fn config_sources_override_builtin_data() {
        let dir = std::env::temp_dir().join(format!("hacklist-directory-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("hackpune.toml"),
            "name = \"HackPune\"\ndate = 2025-03-01\nendDate = 2025-03-02\n",
        )
        .unwrap();
        let config =
            Config::default().with_source(CollectionKind::Events, format!("{}/*.toml", dir.display()));
        let directory = Directory::from_config(&config).unwrap();
        assert_eq!(directory.events().len(), 1);
        assert_eq!(directory.profiles().len(), 6);
        let event = directory.event(&Value::from("hackpune")).unwrap();
        assert_eq!(
            Directory::days_until(event, date("2025-02-27")),
            Some(2)
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
