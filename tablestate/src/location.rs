//! Location and history
//!
//! The manager needs three things from the routing layer:
//! - read the current path and query ([`History::location`])
//! - replace the query without adding a history entry ([`History::replace_query`])
//! - be told when the location moved (the host calls
//!   [`PreservedTableState::location_changed`](crate::manager::PreservedTableState::location_changed))
//!
//! [`MemoryHistory`] is an in-memory implementation, for hosts without a browser
//! history and for tests.
//!

use std::{cell::RefCell, rc::Rc};

use url::{Url, form_urlencoded};

/// Path and query of a page. The query is stored without the leading `?`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl AsRef<str>) -> Self {
        Self {
            path: path.into(),
            query: query.as_ref().trim_start_matches('?').to_string(),
        }
    }

    /// Parses a relative href (`/items?state=..#top`) or an absolute url.
    /// The fragment is dropped.
    pub fn parse(href: &str) -> Self {
        if let Ok(url) = Url::parse(href) {
            return Self::new(url.path(), url.query().unwrap_or_default());
        }
        let href = href.split_once('#').map_or(href, |(before, _)| before);
        match href.split_once('?') {
            Some((path, query)) => Self::new(path, query),
            None => Self::new(href, ""),
        }
    }

    /// Path plus `?query`, or just the path when the query is empty.
    /// Two locations are the same page state exactly when their hrefs are equal.
    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }

    /// Returns the (decoded) value of the first query parameter called `name`.
    pub fn param(&self, name: &str) -> Option<String> {
        form_urlencoded::parse(self.query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Same path, query reduced to parameter `name`. Tables sharing one url compare
    /// locations this way, so a write by one table is not a navigation for another.
    pub fn scoped(&self, name: &str) -> Location {
        let query = Location::default().with_param(name, self.param(name).as_deref());
        Location::new(self.path.clone(), query)
    }

    /// Returns the query with parameter `name` set to `value`, or removed when
    /// `value` is `None`. Other parameters keep their order; the parameter keeps its
    /// position when it was already present.
    pub fn with_param(&self, name: &str, value: Option<&str>) -> String {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut replaced = false;
        for (key, current) in form_urlencoded::parse(self.query.as_bytes()) {
            if key != name {
                pairs.push((key.into_owned(), current.into_owned()));
            } else if let Some(value) = value
                && !replaced
            {
                pairs.push((key.into_owned(), value.to_string()));
                replaced = true;
            }
        }
        if let Some(value) = value
            && !replaced
        {
            pairs.push((name.to_string(), value.to_string()));
        }
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }
}

/// Access to the routing layer's current location.
pub trait History {
    /// Current path and query.
    fn location(&self) -> Location;

    /// Replaces the query of the current entry. Must not add a history entry.
    fn replace_query(&mut self, query: &str);
}

/// Lets several managers (with different parameter names) share one history.
impl<H: History> History for Rc<RefCell<H>> {
    fn location(&self) -> Location {
        self.borrow().location()
    }

    fn replace_query(&mut self, query: &str) {
        self.borrow_mut().replace_query(query);
    }
}

/// In-memory history: a stack of entries with a cursor, like a browser tab.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
    replace_count: usize,
}

impl MemoryHistory {
    pub fn new(path: impl Into<String>, query: impl AsRef<str>) -> Self {
        Self {
            entries: vec![Location::new(path, query)],
            index: 0,
            replace_count: 0,
        }
    }

    /// Starts at the page given by `href`.
    pub fn from_href(href: &str) -> Self {
        Self {
            entries: vec![Location::parse(href)],
            index: 0,
            replace_count: 0,
        }
    }

    /// Navigates to `href`, discarding forward entries.
    pub fn push(&mut self, href: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Location::parse(href));
        self.index = self.entries.len() - 1;
    }

    /// Moves one entry back. Returns false at the first entry.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Moves one entry forward. Returns false at the last entry.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Number of entries in the stack. Never zero: a history starts with one page.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of `replace_query` calls so far.
    pub fn replace_count(&self) -> usize {
        self.replace_count
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.entries[self.index].clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.entries[self.index].query = query.trim_start_matches('?').to_string();
        self.replace_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relative_and_absolute() {
        let location = Location::parse("/catalogue/items?state=abc&tab=1#top");
        assert_eq!(location.path, "/catalogue/items");
        assert_eq!(location.query, "state=abc&tab=1");

        let location = Location::parse("https://ims.example.org/systems?state=xyz");
        assert_eq!(location.path, "/systems");
        assert_eq!(location.param("state").as_deref(), Some("xyz"));

        let location = Location::parse("/systems");
        assert_eq!(location.href(), "/systems");
    }

    #[test]
    fn test_with_param_preserves_other_params() {
        let location = Location::new("/items", "tab=1&state=old&sort=x");
        assert_eq!(
            location.with_param("state", Some("new")),
            "tab=1&state=new&sort=x"
        );
        assert_eq!(location.with_param("state", None), "tab=1&sort=x");
        assert_eq!(
            Location::new("/items", "tab=1").with_param("state", Some("v")),
            "tab=1&state=v"
        );
        assert_eq!(Location::new("/items", "state=v").with_param("state", None), "");
    }

    #[test]
    fn test_scoped_keeps_one_param() {
        let location = Location::new("/items", "tab=1&state=abc&dialog=x");
        assert_eq!(location.scoped("state").href(), "/items?state=abc");
        assert_eq!(location.scoped("other").href(), "/items");
    }

    #[test]
    fn test_memory_history_navigation() {
        let mut history = MemoryHistory::new("/systems", "");
        history.push("/systems/1?state=a");
        history.push("/systems/2");
        assert!(history.back());
        assert_eq!(history.location().href(), "/systems/1?state=a");

        history.replace_query("state=b");
        assert_eq!(history.location().href(), "/systems/1?state=b");
        assert_eq!(history.entry_count(), 3);
        assert_eq!(history.replace_count(), 1);

        // push drops forward entries
        history.push("/items");
        assert_eq!(history.entry_count(), 3);
        assert!(!history.forward());
        assert!(history.back());
        assert!(history.back());
        assert!(!history.back());
        assert_eq!(history.location().path, "/systems");
    }

    #[test]
    fn test_shared_history() {
        let shared = Rc::new(RefCell::new(MemoryHistory::new("/items", "")));
        let mut handle = Rc::clone(&shared);
        handle.replace_query("state=a");
        assert_eq!(shared.borrow().location().query, "state=a");
    }
}
