//! Removal of a route's parameters from a query string.

use crate::adapter::NavigationBehavior;
use crate::query::params::QueryParams;
use crate::schema::RouteSchema;

/// Which parameters to clear, and how to navigate afterwards.
///
/// With neither `include` nor `exclude`, every schema parameter is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearOptions {
    /// Clear only these parameters.
    pub include: Option<Vec<String>>,
    /// Never clear these. Given alone, every other schema parameter is
    /// cleared.
    pub exclude: Option<Vec<String>>,
    pub behavior: NavigationBehavior,
}

impl ClearOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn behavior(mut self, behavior: NavigationBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    fn targets<'a>(&'a self, schema: &'a RouteSchema) -> Vec<&'a str> {
        let candidates: Vec<&str> = match &self.include {
            Some(include) => include.iter().map(String::as_str).collect(),
            None => schema.params().map(|(name, _)| name).collect(),
        };
        let excluded = self.exclude.as_deref().unwrap_or_default();
        candidates
            .into_iter()
            .filter(|name| !excluded.iter().any(|e| e == name))
            .collect()
    }
}

pub(crate) fn clear_query_string(
    schema: &RouteSchema,
    search: &str,
    options: &ClearOptions,
) -> Option<String> {
    let mut params = QueryParams::parse(search);
    let targets: Vec<&str> = options
        .targets(schema)
        .into_iter()
        .filter(|name| params.contains(name))
        .collect();

    if targets.is_empty() {
        return None;
    }
    for name in targets {
        params.delete(name);
    }
    Some(params.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> RouteSchema {
        RouteSchema::new()
            .param("page", "number")
            .param("q", "string")
            .param("sort", "stringEnum")
    }

    #[test]
    fn test_clear_all_schema_params() {
        let out = clear_query_string(&schema(), "?page=1&q=x&utm=ad", &ClearOptions::new());
        assert_eq!(out.as_deref(), Some("utm=ad"));
    }

    #[test]
    fn test_include() {
        let out = clear_query_string(&schema(), "page=1&q=x", &ClearOptions::new().include(["q"]));
        assert_eq!(out.as_deref(), Some("page=1"));
    }

    #[test]
    fn test_exclude_alone() {
        let out = clear_query_string(&schema(), "page=1&q=x&sort=asc", &ClearOptions::new().exclude(["page"]));
        assert_eq!(out.as_deref(), Some("page=1"));
    }

    #[test]
    fn test_include_and_exclude() {
        let options = ClearOptions::new().include(["page", "q"]).exclude(["q"]);
        let out = clear_query_string(&schema(), "page=1&q=x&sort=asc", &options);
        assert_eq!(out.as_deref(), Some("q=x&sort=asc"));
    }

    #[test]
    fn test_nothing_to_clear() {
        assert_eq!(clear_query_string(&schema(), "utm=ad", &ClearOptions::new()), None);
        assert_eq!(
            clear_query_string(&schema(), "page=1", &ClearOptions::new().exclude(["page"])),
            None
        );
        assert_eq!(clear_query_string(&schema(), "", &ClearOptions::new()), None);
    }
}
