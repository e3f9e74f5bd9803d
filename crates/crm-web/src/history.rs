use crm_core::url_state::{
  Location,
  QueryParams,
  UrlHistory
};
use yew_router::history::{
  BrowserHistory,
  History
};

/// The browser's history, shared with the router so a push made here
/// re-renders every `use_location` consumer.
#[derive(Clone, Debug, PartialEq)]
pub struct BrowserUrlHistory {
  inner: BrowserHistory
}

impl BrowserUrlHistory {
  pub fn new() -> Self {
    Self {
      inner: BrowserHistory::new()
    }
  }

  pub fn back(&self) {
    self.inner.back();
  }

  /// Moves to another page, dropping the current query.
  pub fn navigate(&self, href: &str) {
    self.push(Location::parse(href));
  }
}

impl Default for BrowserUrlHistory {
  fn default() -> Self {
    Self::new()
  }
}

impl UrlHistory for BrowserUrlHistory {
  fn location(&self) -> Location {
    let live = self.inner.location();
    Location::new(
      live.path(),
      QueryParams::parse(live.query_str())
    )
  }

  fn push(&self, location: Location) {
    self.inner.push(location.to_href());
  }

  fn replace(
    &self,
    location: Location
  ) {
    self.inner.replace(location.to_href());
  }
}
