//! Mirroring the active configuration into a shareable URL query parameter.
//!
//! The host adapts its browser or router by implementing [`Location`].
//! [`MemoryLocation`] is an in-process implementation for native hosts and tests.

use crate::catalog::{ConfigurationCatalog, ConfigurationId};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

/// How a URL write is recorded in history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Rewrite the current entry in place.
    #[default]
    Replace,
    /// Append a new entry.
    Push,
}

/// A URL whose query string can be read and written.
pub trait Location: fmt::Debug {
    fn query_param(&self, name: &str) -> Option<String>;

    fn write_query_param(&mut self, name: &str, value: &str, mode: HistoryMode);
}

#[derive(Debug, Default)]
struct LocationState {
    path: String,
    query: Vec<(String, String)>,
    fragment: Option<String>,
    history: Vec<String>,
}

impl LocationState {
    fn href(&self) -> String {
        let mut href = self.path.clone();
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            href.push('?');
            href.push_str(&query);
        }
        if let Some(fragment) = &self.fragment {
            href.push('#');
            href.push_str(fragment);
        }
        href
    }
}

/// An in-memory location with a history stack.
///
/// Clones share the same state, so a host can keep one handle while the
/// configurator writes through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryLocation {
    state: Rc<RefCell<LocationState>>,
}

impl MemoryLocation {
    /// Parses `path?key=value&...#fragment`, percent-decoding query pairs.
    pub fn parse(href: &str) -> Self {
        let (rest, fragment) = match href.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_owned())),
            None => (href, None),
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let query = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let mut state = LocationState {
            path: path.to_owned(),
            query,
            fragment,
            history: Vec::new(),
        };
        state.history.push(state.href());
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn href(&self) -> String {
        self.state.borrow().href()
    }

    /// Every history entry, oldest first; the last one is current.
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.state.borrow().history.len()
    }
}

impl Location for MemoryLocation {
    fn query_param(&self, name: &str) -> Option<String> {
        self.state
            .borrow()
            .query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn write_query_param(&mut self, name: &str, value: &str, mode: HistoryMode) {
        let mut state = self.state.borrow_mut();
        match state.query.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_owned(),
            None => state.query.push((name.to_owned(), value.to_owned())),
        }

        let href = state.href();
        match mode {
            HistoryMode::Push => state.history.push(href),
            HistoryMode::Replace => match state.history.last_mut() {
                Some(current) => *current = href,
                None => state.history.push(href),
            },
        }
    }
}

/// Reads the starting configuration once and mirrors later changes.
#[derive(Debug)]
pub struct UrlSync {
    location: Box<dyn Location>,
    param: String,
    mode: HistoryMode,
}

impl UrlSync {
    pub fn new(location: Box<dyn Location>, param: impl Into<String>, mode: HistoryMode) -> Self {
        Self {
            location,
            param: param.into(),
            mode,
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// The configuration named by the query parameter, if the catalog has it.
    pub fn requested(&self, catalog: &ConfigurationCatalog) -> Option<ConfigurationId> {
        let requested = self.location.query_param(&self.param)?;
        if requested.is_empty() {
            return None;
        }
        if !catalog.contains(&requested) {
            debug!(param = %self.param, requested = %requested, "Ignoring unknown configuration in URL");
            return None;
        }
        info!(param = %self.param, requested = %requested, "Seeding configuration from URL");
        Some(requested)
    }

    /// Writes `active_id` unless the parameter already holds it.
    ///
    /// Returns whether a write happened.
    pub fn publish(&mut self, active_id: &str) -> bool {
        if active_id.is_empty() {
            return false;
        }
        if self.location.query_param(&self.param).as_deref() == Some(active_id) {
            return false;
        }
        self.location
            .write_query_param(&self.param, active_id, self.mode);
        true
    }
}
