//! Navigation adapter seam.
//!
//! The library only reads and writes the `search` part of a location; the
//! adapter supplies it and performs the actual navigation.

use serde::{Deserialize, Serialize};

/// The part of a location this library cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Query string, with or without its leading `?`.
    pub search: String,
}

impl Location {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
        }
    }
}

/// How a location change enters the navigation history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationBehavior {
    Push,
    #[default]
    Replace,
}

/// Source of the current location and sink for navigations.
pub trait Adapter {
    fn location(&self) -> Location;

    fn push_location(&mut self, location: Location);

    fn replace_location(&mut self, location: Location);

    fn navigate(&mut self, behavior: NavigationBehavior, location: Location) {
        match behavior {
            NavigationBehavior::Push => self.push_location(location),
            NavigationBehavior::Replace => self.replace_location(location),
        }
    }
}

/// In-memory [`Adapter`] that records every navigation.
///
/// # Examples
///
/// ```
/// use navquery::{Adapter, ClearOptions, MemoryAdapter, NavigationBehavior, Registry, RouteCodec, RouteSchema};
///
/// let registry = Registry::new();
/// let schema = RouteSchema::new().param("page", "number");
/// let codec = RouteCodec::new(&registry, &schema);
///
/// let mut adapter = MemoryAdapter::new("page=3&lang=en");
/// let options = ClearOptions::new().behavior(NavigationBehavior::Push);
/// assert!(codec.clear_query_params(&mut adapter, &options));
///
/// assert_eq!(adapter.location().search, "lang=en");
/// assert_eq!(adapter.history().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryAdapter {
    current: Location,
    history: Vec<(NavigationBehavior, Location)>,
}

impl MemoryAdapter {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            current: Location::new(search),
            history: Vec::new(),
        }
    }

    /// Every navigation so far, oldest first.
    pub fn history(&self) -> &[(NavigationBehavior, Location)] {
        &self.history
    }

    /// Number of pushed entries, the initial location included.
    pub fn stack_depth(&self) -> usize {
        1 + self
            .history
            .iter()
            .filter(|(behavior, _)| *behavior == NavigationBehavior::Push)
            .count()
    }
}

impl Adapter for MemoryAdapter {
    fn location(&self) -> Location {
        self.current.clone()
    }

    fn push_location(&mut self, location: Location) {
        self.history.push((NavigationBehavior::Push, location.clone()));
        self.current = location;
    }

    fn replace_location(&mut self, location: Location) {
        self.history.push((NavigationBehavior::Replace, location.clone()));
        self.current = location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_behavior_is_replace() {
        assert_eq!(NavigationBehavior::default(), NavigationBehavior::Replace);
    }

    #[test]
    fn test_navigate_records_history() {
        let mut adapter = MemoryAdapter::new("a=1");
        adapter.navigate(NavigationBehavior::Push, Location::new("a=2"));
        adapter.navigate(NavigationBehavior::Replace, Location::new("a=3"));

        assert_eq!(adapter.location(), Location::new("a=3"));
        assert_eq!(
            adapter.history(),
            &[
                (NavigationBehavior::Push, Location::new("a=2")),
                (NavigationBehavior::Replace, Location::new("a=3")),
            ]
        );
        assert_eq!(adapter.stack_depth(), 2);
    }

    #[test]
    fn test_behavior_serde() {
        let json = serde_json::to_string(&NavigationBehavior::Push).unwrap();
        assert_eq!(json, "\"push\"");
        let parsed: NavigationBehavior = serde_json::from_str("\"replace\"").unwrap();
        assert_eq!(parsed, NavigationBehavior::Replace);
    }
}
