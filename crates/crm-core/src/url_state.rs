//! Query-string backed UI state.
//!
//! The URL is the only source of truth: every read goes to the live
//! history location and every write is merged into the location read
//! at that moment, then committed as a single history entry.
//!
//! ```
//! use crm_core::url_state::{MemoryHistory, UrlState};
//!
//! let history = MemoryHistory::new("/companies");
//! let state = UrlState::new(history.clone());
//! let id = state.synced("id", "");
//!
//! id.set("CMP-0001", &["innerTab"]);
//! assert_eq!(id.value(), "CMP-0001");
//! assert_eq!(history.len(), 2);
//! ```

mod history;
mod query;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{
  Rc,
  Weak
};

use anyhow::Context;
pub use history::{
  Location,
  MemoryHistory,
  UrlHistory
};
pub use query::QueryParams;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{
  debug,
  error,
  trace
};

type ParamCallback =
  Rc<dyn Fn(Option<&str>)>;

struct Subscriber {
  id:       u64,
  key:      String,
  callback: ParamCallback
}

#[derive(Default)]
struct Registry {
  last_seen:   QueryParams,
  next_id:     u64,
  subscribers: Vec<Subscriber>
}

/// Keeps a per-key subscription alive; dropping it unsubscribes.
#[must_use]
pub struct Subscription {
  id:       u64,
  registry: Weak<RefCell<Registry>>
}

impl Drop for Subscription {
  fn drop(&mut self) {
    if let Some(registry) =
      self.registry.upgrade()
    {
      registry
        .borrow_mut()
        .subscribers
        .retain(|sub| sub.id != self.id);
    }
  }
}

/// An empty value reads the same as an absent key.
fn present<'a>(
  query: &'a QueryParams,
  key: &str
) -> Option<&'a str> {
  query.get(key).filter(|v| !v.is_empty())
}

pub struct UrlState<H> {
  history:  H,
  registry: Rc<RefCell<Registry>>
}

impl<H: Clone> Clone for UrlState<H> {
  fn clone(&self) -> Self {
    Self {
      history:  self.history.clone(),
      registry: Rc::clone(
        &self.registry
      )
    }
  }
}

impl<H: UrlHistory> UrlState<H> {
  pub fn new(history: H) -> Self {
    let last_seen =
      history.location().query;
    Self {
      history,
      registry: Rc::new(RefCell::new(
        Registry {
          last_seen,
          ..Registry::default()
        }
      ))
    }
  }

  pub fn history(&self) -> &H {
    &self.history
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self
      .history
      .location()
      .query
      .get(key)
      .filter(|value| !value.is_empty())
      .map(str::to_string)
  }

  pub fn get_or(
    &self,
    key: &str,
    default: &str
  ) -> String {
    self
      .get(key)
      .unwrap_or_else(|| {
        default.to_string()
      })
  }

  /// Reads a JSON-encoded parameter. Malformed JSON is logged and
  /// treated as absent.
  pub fn get_json<T>(
    &self,
    key: &str,
    default: T
  ) -> T
  where
    T: DeserializeOwned
  {
    let Some(raw) = self.get(key) else {
      return default;
    };
    match serde_json::from_str::<T>(&raw)
    {
      | Ok(value) => value,
      | Err(err) => {
        error!(
          key,
          %err,
          "failed parsing json url \
           parameter"
        );
        default
      }
    }
  }

  pub fn set_json<T>(
    &self,
    key: &str,
    value: &T
  ) -> anyhow::Result<bool>
  where
    T: Serialize
  {
    let encoded =
      serde_json::to_string(value)
        .with_context(|| {
          format!(
            "failed to encode url \
             parameter {key}"
          )
        })?;
    Ok(self.set(
      &[(key, Some(encoded.as_str()))],
      &[]
    ))
  }

  /// Applies `updates` (a `None` or empty value deletes the key), then
  /// deletes `remove_keys`, then commits one history entry. Returns
  /// false when the query string would not change, in which case no
  /// entry is pushed.
  #[tracing::instrument(skip(self))]
  pub fn set(
    &self,
    updates: &[(&str, Option<&str>)],
    remove_keys: &[&str]
  ) -> bool {
    let current =
      self.history.location();
    let mut next =
      current.query.clone();

    for (key, value) in updates {
      match value {
        | Some(value) => {
          next.set(key, value)
        }
        | None => next.remove(key)
      }
    }
    for key in remove_keys {
      next.remove(key);
    }

    if next.same_entries(&current.query)
    {
      trace!(
        "url parameters unchanged; \
         skipping history entry"
      );
      return false;
    }

    debug!(
      from = %current.query.to_query_string(),
      to = %next.to_query_string(),
      "committing url parameters"
    );
    self.history.push(Location::new(
      current.pathname,
      next
    ));
    self.sync_from_history();
    true
  }

  /// Registers `callback` for changes of `key`, whether caused by
  /// `set` or by an external location change reported through
  /// [`UrlState::sync_from_history`].
  pub fn subscribe<F>(
    &self,
    key: &str,
    callback: F
  ) -> Subscription
  where
    F: Fn(Option<&str>) + 'static
  {
    let mut registry =
      self.registry.borrow_mut();
    let id = registry.next_id;
    registry.next_id += 1;
    registry.subscribers.push(
      Subscriber {
        id,
        key: key.to_string(),
        callback: Rc::new(callback)
      }
    );
    Subscription {
      id,
      registry: Rc::downgrade(
        &self.registry
      )
    }
  }

  /// Diffs the live query against the last one observed and notifies
  /// subscribers of changed keys. Hosts call this on back/forward
  /// navigation; `set` calls it after every commit.
  pub fn sync_from_history(&self) {
    let current =
      self.history.location().query;

    let pending: Vec<(
      ParamCallback,
      Option<String>
    )> = {
      let mut registry =
        self.registry.borrow_mut();
      let previous = std::mem::replace(
        &mut registry.last_seen,
        current.clone()
      );
      registry
        .subscribers
        .iter()
        .filter(|sub| {
          present(&previous, &sub.key)
            != present(&current, &sub.key)
        })
        .map(|sub| {
          (
            Rc::clone(&sub.callback),
            present(&current, &sub.key)
              .map(str::to_string)
          )
        })
        .collect()
    };

    for (callback, value) in pending {
      callback(value.as_deref());
    }
  }
}

impl<H: UrlHistory + Clone> UrlState<H> {
  /// One parameter with a default, e.g. the selected `id`.
  pub fn synced(
    &self,
    key: &str,
    default: &str
  ) -> SyncedValue<H> {
    SyncedValue {
      state:   self.clone(),
      key:     key.to_string(),
      default: default.to_string()
    }
  }

  /// Several parameters read and written together.
  pub fn synced_many(
    &self,
    configs: &[(&str, &str)]
  ) -> SyncedValues<H> {
    SyncedValues {
      state:   self.clone(),
      configs: configs
        .iter()
        .map(|(key, default)| {
          (
            key.to_string(),
            default.to_string()
          )
        })
        .collect()
    }
  }
}

pub struct SyncedValue<H> {
  state:   UrlState<H>,
  key:     String,
  default: String
}

impl<H: UrlHistory> SyncedValue<H> {
  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn value(&self) -> String {
    self
      .state
      .get_or(&self.key, &self.default)
  }

  /// Writes the value and clears `remove_keys` in the same entry.
  pub fn set(
    &self,
    value: &str,
    remove_keys: &[&str]
  ) -> bool {
    self.state.set(
      &[(self.key.as_str(), Some(value))],
      remove_keys
    )
  }

  pub fn clear(&self) -> bool {
    self.state.set(
      &[(self.key.as_str(), None)],
      &[]
    )
  }
}

pub struct SyncedValues<H> {
  state:   UrlState<H>,
  configs: Vec<(String, String)>
}

impl<H: UrlHistory> SyncedValues<H> {
  /// Current value of every configured key, defaults filled in.
  pub fn snapshot(
    &self
  ) -> BTreeMap<String, String> {
    let query =
      self.state.history.location().query;
    self
      .configs
      .iter()
      .map(|(key, default)| {
        let value = query
          .get(key)
          .filter(|v| !v.is_empty())
          .unwrap_or(default.as_str());
        (key.clone(), value.to_string())
      })
      .collect()
  }

  pub fn set(
    &self,
    updates: &[(&str, Option<&str>)],
    remove_keys: &[&str]
  ) -> bool {
    self.state.set(updates, remove_keys)
  }
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;
  use std::rc::Rc;

  use super::*;

  #[test]
  fn set_then_get_round_trips() {
    let history =
      MemoryHistory::new("/companies");
    let state = UrlState::new(history);

    assert!(
      state.set(&[("id", Some("X"))], &[])
    );
    assert_eq!(
      state.get("id").as_deref(),
      Some("X")
    );

    assert!(state.set(&[("id", None)], &[]));
    assert_eq!(state.get("id"), None);
    assert_eq!(
      state.synced("id", "none").value(),
      "none"
    );
  }

  #[test]
  fn empty_string_removes_key_without_ghost_param(
  ) {
    let history = MemoryHistory::new(
      "/tasks?statusTab=Open"
    );
    let state =
      UrlState::new(history.clone());
    state.set(
      &[("statusTab", Some(""))],
      &[]
    );
    assert_eq!(
      history.location().to_href(),
      "/tasks"
    );
  }

  #[test]
  fn dependent_keys_clear_in_the_same_entry(
  ) {
    let history = MemoryHistory::new(
      "/companies?id=A&innerTab=tasks"
    );
    let state =
      UrlState::new(history.clone());
    let id = state.synced("id", "");

    id.set("B", &["innerTab"]);

    assert_eq!(history.len(), 2);
    let query = history.location().query;
    assert_eq!(query.get("id"), Some("B"));
    assert_eq!(query.get("innerTab"), None);
    assert_eq!(
      history.location().pathname,
      "/companies"
    );
  }

  #[test]
  fn batch_setter_commits_one_entry() {
    let history =
      MemoryHistory::new("/boqs");
    let state =
      UrlState::new(history.clone());
    let values = state.synced_many(&[
      ("a", "0"),
      ("b", "0"),
      ("c", "fallback")
    ]);

    values.set(
      &[("a", Some("1")), ("b", Some("2"))],
      &[]
    );

    assert_eq!(history.len(), 2);
    assert!(
      history.location().query.same_entries(
        &QueryParams::parse("b=2&a=1")
      )
    );
    let snapshot = values.snapshot();
    assert_eq!(snapshot["a"], "1");
    assert_eq!(snapshot["b"], "2");
    assert_eq!(snapshot["c"], "fallback");
  }

  #[test]
  fn unchanged_set_pushes_nothing() {
    let history =
      MemoryHistory::new("/boqs?id=B-1");
    let state =
      UrlState::new(history.clone());
    assert!(
      !state.set(&[("id", Some("B-1"))], &[])
    );
    assert!(!state.set(&[], &["missing"]));
    assert_eq!(history.len(), 1);
  }

  #[test]
  fn back_to_back_setters_read_the_live_url(
  ) {
    let history =
      MemoryHistory::new("/companies");
    let state =
      UrlState::new(history.clone());
    let id = state.synced("id", "");
    let tab = state.synced("tab", "all");

    id.set("CMP-1", &[]);
    tab.set("recent", &[]);

    let query = history.location().query;
    assert_eq!(query.get("id"), Some("CMP-1"));
    assert_eq!(query.get("tab"), Some("recent"));
  }

  #[test]
  fn subscribers_see_commits_and_back_navigation(
  ) {
    let history =
      MemoryHistory::new("/contacts");
    let state =
      UrlState::new(history.clone());
    let seen =
      Rc::new(RefCell::new(Vec::new()));

    let sub = {
      let seen = Rc::clone(&seen);
      state.subscribe("id", move |value| {
        seen
          .borrow_mut()
          .push(value.map(str::to_string));
      })
    };

    state.set(&[("id", Some("C-1"))], &[]);
    state.set(&[("tab", Some("x"))], &[]);
    assert!(history.back());
    state.sync_from_history();
    assert!(history.back());
    state.sync_from_history();

    assert_eq!(
      *seen.borrow(),
      vec![Some("C-1".to_string()), None]
    );

    drop(sub);
    state.set(&[("id", Some("C-2"))], &[]);
    assert_eq!(seen.borrow().len(), 2);
  }

  #[test]
  fn empty_external_value_reaches_subscribers_as_absent(
  ) {
    let history =
      MemoryHistory::new("/companies?id=A");
    let state =
      UrlState::new(history.clone());
    state.sync_from_history();
    let seen =
      Rc::new(RefCell::new(Vec::new()));

    let _sub = {
      let seen = Rc::clone(&seen);
      state.subscribe("id", move |value| {
        seen
          .borrow_mut()
          .push(value.map(str::to_string));
      })
    };

    history.navigate("/companies?id=");
    state.sync_from_history();
    assert_eq!(state.get("id"), None);
    assert_eq!(*seen.borrow(), vec![None]);

    // `?id=` to no `id` at all is not a change.
    history.navigate("/companies");
    state.sync_from_history();
    assert_eq!(seen.borrow().len(), 1);
  }

  #[test]
  fn json_params_fall_back_on_malformed_input(
  ) {
    let history = MemoryHistory::new(
      "/tasks?filters=%7Bbroken"
    );
    let state =
      UrlState::new(history.clone());
    let parsed: Vec<String> = state
      .get_json("filters", vec![
        "default".to_string(),
      ]);
    assert_eq!(parsed, vec![
      "default".to_string()
    ]);

    state
      .set_json("filters", &vec!["Open"])
      .expect("encode");
    let parsed: Vec<String> =
      state.get_json("filters", vec![]);
    assert_eq!(parsed, vec![
      "Open".to_string()
    ]);
  }
}
