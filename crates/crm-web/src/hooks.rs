use std::collections::BTreeMap;
use std::rc::Rc;

use crm_core::CrmClient;
use crm_core::dialogs::{
  DialogState,
  DialogStore
};
use crm_core::session::SessionState;
use crm_shared::store::{
  Invalidation,
  ListArgs
};
use serde::de::DeserializeOwned;
use yew::{
  Callback,
  Reducible,
  UseReducerHandle,
  hook,
  use_context,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_state
};
use yew_router::hooks::use_location;

use crate::api::DocumentClient;
use crate::history::BrowserUrlHistory;

pub type Client = CrmClient<BrowserUrlHistory>;

/// Everything a page needs to reach the state layer and the server.
#[derive(Clone)]
pub struct ClientHandle {
  pub core: Rc<Client>,
  pub docs: DocumentClient
}

impl PartialEq for ClientHandle {
  fn eq(
    &self,
    other: &Self
  ) -> bool {
    Rc::ptr_eq(&self.core, &other.core)
  }
}

impl ClientHandle {
  pub fn dialogs(&self) -> &DialogStore {
    &self.core.dialogs
  }

  pub fn history(
    &self
  ) -> &BrowserUrlHistory {
    self.core.url.history()
  }
}

#[hook]
pub fn use_client() -> ClientHandle {
  use_context::<ClientHandle>().expect(
    "ClientHandle context is provided \
     by the app shell"
  )
}

#[hook]
pub fn use_session() -> SessionState {
  use_context::<SessionState>()
    .unwrap_or(SessionState::Loading)
}

pub type SetParam =
  Callback<(String, Vec<&'static str>)>;

/// One query parameter with a default. The setter takes the new value
/// and the keys to clear in the same history entry.
#[hook]
pub fn use_synced_param(
  key: &'static str,
  default: &'static str
) -> (String, SetParam) {
  let client = use_client();
  let _location = use_location();

  let value = client
    .core
    .url
    .synced(key, default)
    .value();
  let set = {
    let url = client.core.url.clone();
    Callback::from(
      move |(value, remove): (
        String,
        Vec<&'static str>
      )| {
        url
          .synced(key, default)
          .set(&value, &remove);
      }
    )
  };
  (value, set)
}

pub type SetParams = Callback<
  Vec<(&'static str, Option<String>)>
>;

/// Several query parameters read together and written in one entry.
#[hook]
pub fn use_synced_params(
  configs: &'static [(
    &'static str,
    &'static str
  )]
) -> (BTreeMap<String, String>, SetParams)
{
  let client = use_client();
  let _location = use_location();

  let values = client
    .core
    .url
    .synced_many(configs)
    .snapshot();
  let set = {
    let url = client.core.url.clone();
    Callback::from(
      move |updates: Vec<(
        &'static str,
        Option<String>
      )>| {
        let borrowed: Vec<(
          &str,
          Option<&str>
        )> = updates
          .iter()
          .map(|(key, value)| {
            (*key, value.as_deref())
          })
          .collect();
        url
          .synced_many(configs)
          .set(&borrowed, &[]);
      }
    )
  };
  (values, set)
}

/// Current dialog snapshot; re-renders on every dialog action.
#[hook]
pub fn use_dialog_state() -> DialogState {
  let client = use_client();
  let update = use_force_update();
  use_effect_with(
    client.dialogs().clone(),
    move |store| {
      let subscription = store
        .subscribe(move |_| {
          update.force_update()
        });
      move || drop(subscription)
    }
  );
  client.dialogs().state()
}

/// Invalidations seen so far, each stamped with when it last fired.
#[derive(
  Clone, Debug, Default, PartialEq,
)]
pub struct Revisions {
  counter: u64,
  stamps:  Vec<(Invalidation, u64)>
}

impl Revisions {
  /// Latest stamp of an invalidation covering `cache_key`.
  pub fn stamp_for(
    &self,
    cache_key: &str
  ) -> u64 {
    self
      .stamps
      .iter()
      .filter(|(inv, _)| {
        inv.matches(cache_key)
      })
      .map(|(_, stamp)| *stamp)
      .max()
      .unwrap_or(0)
  }
}

impl Reducible for Revisions {
  type Action = Invalidation;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let counter = self.counter + 1;
    let mut stamps = self
      .stamps
      .iter()
      .filter(|(inv, _)| *inv != action)
      .cloned()
      .collect::<Vec<_>>();
    tracing::debug!(?action, counter, "invalidating listings");
    stamps.push((action, counter));
    Rc::new(Self { counter, stamps })
  }
}

pub type RevisionsHandle =
  UseReducerHandle<Revisions>;

#[hook]
pub fn use_invalidate()
-> Callback<Invalidation> {
  let revisions =
    use_context::<RevisionsHandle>();
  Callback::from(move |inv| {
    if let Some(revisions) =
      revisions.as_ref()
    {
      revisions.dispatch(inv);
    }
  })
}

/// Numbers the requests a listing sends; only the newest may land.
#[derive(Debug, Default)]
pub struct Generations {
  latest: u64
}

impl Generations {
  pub fn begin(&mut self) -> u64 {
    self.latest += 1;
    self.latest
  }

  pub fn is_current(
    &self,
    generation: u64
  ) -> bool {
    generation == self.latest
  }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Fetch<T> {
  Loading,
  Ready(T),
  Failed(String)
}

/// Lists documents, refetching when the arguments change or an
/// invalidation covers them. A response that arrives after a newer
/// request was sent is dropped.
#[hook]
pub fn use_doc_list<T>(
  args: ListArgs
) -> Fetch<Vec<T>>
where
  T: DeserializeOwned + Clone + 'static
{
  let client = use_client();
  let revisions =
    use_context::<RevisionsHandle>();
  let state = use_state(|| Fetch::Loading);
  let generations =
    use_mut_ref(Generations::default);

  let key = args.cache_key();
  let stamp = revisions
    .as_ref()
    .map_or(0, |r| r.stamp_for(&key));

  {
    let state = state.clone();
    let docs = client.docs.clone();
    let generations = generations.clone();
    use_effect_with(
      (key, stamp),
      move |(key, _)| {
        let generation =
          generations.borrow_mut().begin();
        tracing::debug!(%key, generation, "fetching listing");
        state.set(Fetch::Loading);
        wasm_bindgen_futures::spawn_local(
          async move {
            let result =
              docs.list::<T>(&args).await;
            if !generations
              .borrow()
              .is_current(generation)
            {
              tracing::debug!(
                doctype = %args.doctype,
                generation,
                "dropping stale listing"
              );
              return;
            }
            match result
            {
              | Ok(items) => {
                state.set(Fetch::Ready(
                  items
                ))
              }
              | Err(err) => {
                tracing::error!(
                  doctype = %args.doctype,
                  error = %err,
                  "listing failed"
                );
                state.set(Fetch::Failed(err))
              }
            }
          }
        );
        || ()
      }
    );
  }

  (*state).clone()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn doctype(name: &str) -> Invalidation {
    Invalidation::Doctype(name.to_string())
  }

  #[test]
  fn invalidation_bumps_only_matching_listings() {
    let companies =
      ListArgs::new("CRM Company").cache_key();
    let contacts =
      ListArgs::new("CRM Contacts").cache_key();

    let revisions = Rc::new(Revisions::default())
      .reduce(doctype("CRM Company"));
    assert_eq!(revisions.stamp_for(&companies), 1);
    assert_eq!(revisions.stamp_for(&contacts), 0);

    let revisions =
      revisions.reduce(doctype("CRM Contacts"));
    let revisions =
      revisions.reduce(doctype("CRM Company"));
    assert_eq!(revisions.stamp_for(&companies), 3);
    assert_eq!(revisions.stamp_for(&contacts), 2);
    assert_eq!(revisions.stamps.len(), 2);
  }

  #[test]
  fn only_the_newest_request_is_current() {
    let mut generations = Generations::default();
    let first = generations.begin();
    let second = generations.begin();
    assert!(!generations.is_current(first));
    assert!(generations.is_current(second));
  }
}
