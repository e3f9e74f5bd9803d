use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use super::query::QueryParams;

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct Location {
  pub pathname: String,
  pub query:    QueryParams
}

impl Location {
  pub fn new(
    pathname: impl Into<String>,
    query: QueryParams
  ) -> Self {
    Self {
      pathname: pathname.into(),
      query
    }
  }

  /// Parses `/path?query#hash`; the hash is dropped.
  pub fn parse(href: &str) -> Self {
    let without_hash = href
      .split_once('#')
      .map_or(href, |(head, _)| head);
    let (pathname, search) =
      match without_hash.split_once('?')
      {
        | Some((path, query)) => {
          (path, query)
        }
        | None => (without_hash, "")
      };
    let pathname = if pathname.is_empty()
    {
      "/"
    } else {
      pathname
    };
    Self {
      pathname: pathname.to_string(),
      query:    QueryParams::parse(
        search
      )
    }
  }

  pub fn to_href(&self) -> String {
    format!(
      "{}{}",
      self.pathname,
      self.query.to_search()
    )
  }
}

/// The browser's URL and history facility as the synchronizer sees
/// it. `location` must always report the live URL.
pub trait UrlHistory {
  fn location(&self) -> Location;

  /// Commits `location` as one new history entry.
  fn push(&self, location: Location);

  /// Rewrites the current entry in place.
  fn replace(&self, location: Location);
}

#[derive(Debug)]
struct MemoryHistoryInner {
  entries: Vec<Location>,
  cursor:  usize
}

/// In-process history with back/forward, for tests and hosts without
/// a browser.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
  inner: Rc<RefCell<MemoryHistoryInner>>
}

impl MemoryHistory {
  pub fn new(initial: &str) -> Self {
    Self {
      inner: Rc::new(RefCell::new(
        MemoryHistoryInner {
          entries: vec![Location::parse(
            initial
          )],
          cursor:  0
        }
      ))
    }
  }

  pub fn len(&self) -> usize {
    self.inner.borrow().entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn entries(&self) -> Vec<Location> {
    self.inner.borrow().entries.clone()
  }

  /// Moves one entry back; false at the start of history.
  pub fn back(&self) -> bool {
    let mut inner =
      self.inner.borrow_mut();
    if inner.cursor == 0 {
      return false;
    }
    inner.cursor -= 1;
    trace!(
      cursor = inner.cursor,
      "memory history back"
    );
    true
  }

  pub fn forward(&self) -> bool {
    let mut inner =
      self.inner.borrow_mut();
    if inner.cursor + 1
      >= inner.entries.len()
    {
      return false;
    }
    inner.cursor += 1;
    trace!(
      cursor = inner.cursor,
      "memory history forward"
    );
    true
  }

  /// Navigates to another path, as a link click would.
  pub fn navigate(&self, href: &str) {
    self.push(Location::parse(href));
  }
}

impl Default for MemoryHistory {
  fn default() -> Self {
    Self::new("/")
  }
}

impl UrlHistory for MemoryHistory {
  fn location(&self) -> Location {
    let inner = self.inner.borrow();
    inner.entries[inner.cursor].clone()
  }

  fn push(&self, location: Location) {
    let mut inner =
      self.inner.borrow_mut();
    let keep = inner.cursor + 1;
    inner.entries.truncate(keep);
    inner.entries.push(location);
    inner.cursor =
      inner.entries.len() - 1;
  }

  fn replace(
    &self,
    location: Location
  ) {
    let mut inner =
      self.inner.borrow_mut();
    let cursor = inner.cursor;
    inner.entries[cursor] = location;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn location_parse_drops_hash_and_defaults_root(
  ) {
    let loc =
      Location::parse("/boqs?id=B-1#notes");
    assert_eq!(loc.pathname, "/boqs");
    assert_eq!(loc.query.get("id"), Some("B-1"));
    assert_eq!(loc.to_href(), "/boqs?id=B-1");

    let root = Location::parse("?tab=x");
    assert_eq!(root.pathname, "/");
  }

  #[test]
  fn push_after_back_discards_forward_entries(
  ) {
    let history = MemoryHistory::new("/");
    history.navigate("/companies");
    history.navigate("/contacts");
    assert!(history.back());
    history.navigate("/boqs");

    assert_eq!(history.len(), 3);
    assert!(!history.forward());
    assert_eq!(
      history.location().pathname,
      "/boqs"
    );
  }
}
