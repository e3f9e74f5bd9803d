pub mod config;
pub mod date_range;
pub mod dialogs;
pub mod fab;
pub mod guard;
pub mod nav;
pub mod route;
pub mod session;
pub mod url_state;

use tracing::{
  debug,
  info
};

use crate::config::CrmConfig;
use crate::dialogs::DialogStore;
use crate::guard::{
  GuardDecision,
  GuardPolicy
};
use crate::route::Route;
use crate::session::SessionState;
use crate::url_state::{
  Location,
  UrlHistory,
  UrlState
};

/// The client-side state layer for one page session: URL-backed
/// parameters, the dialog registry and the navigation guard.
pub struct CrmClient<H> {
  pub config:  CrmConfig,
  pub url:     UrlState<H>,
  pub dialogs: DialogStore,
  pub guard:   GuardPolicy
}

impl<H: UrlHistory> CrmClient<H> {
  /// Loads the configuration (defaults when `toml_text` is `None`)
  /// and wires the state layer over `history`.
  #[tracing::instrument(skip_all)]
  pub fn start(
    toml_text: Option<&str>,
    history: H
  ) -> anyhow::Result<Self> {
    let config =
      CrmConfig::load(toml_text)?;
    let client =
      Self::with_config(config, history);
    info!("crm client state layer ready");
    Ok(client)
  }

  pub fn with_config(
    config: CrmConfig,
    history: H
  ) -> Self {
    let guard = GuardPolicy::from_config(
      config.guard.clone()
    );
    Self {
      config,
      url: UrlState::new(history),
      dialogs: DialogStore::new(),
      guard
    }
  }

  /// Classifies the live location.
  pub fn route(&self) -> Route {
    let location =
      self.url.history().location();
    Route::classify(
      &location.pathname,
      &location.query
    )
  }

  /// Runs the guard against the live location.
  pub fn check_navigation(
    &self,
    session: &SessionState
  ) -> GuardDecision {
    let pathname =
      self.url.history().location().pathname;
    let decision =
      self.guard.evaluate(session, &pathname);
    debug!(%pathname, ?decision, "navigation checked");
    decision
  }

  /// Runs the guard and applies a redirect by replacing the current
  /// history entry, so Back never lands on the denied path again.
  pub fn enforce_navigation(
    &self,
    session: &SessionState
  ) -> GuardDecision {
    let decision =
      self.check_navigation(session);
    if let GuardDecision::Redirect(target) =
      &decision
    {
      info!(%target, "redirecting denied navigation");
      self
        .url
        .history()
        .replace(Location::parse(target));
      self.url.sync_from_history();
    }
    decision
  }
}
