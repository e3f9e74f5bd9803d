use tracing::debug;

use crate::config::GuardConfig;
use crate::session::{
  Role,
  SessionState
};

/// True when `path` is listed in `allow_list`, or sits below a listed
/// non-root entry. `/` only ever matches itself.
pub fn is_path_allowed<S>(
  path: &str,
  allow_list: &[S]
) -> bool
where
  S: AsRef<str>
{
  allow_list.iter().any(|entry| {
    let base = entry.as_ref();
    path == base
      || (base != "/"
        && path
          .strip_prefix(base)
          .is_some_and(|rest| {
            rest.starts_with('/')
          }))
  })
}

fn is_under(
  path: &str,
  prefix: &str
) -> bool {
  is_path_allowed(path, &[prefix])
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum GuardDecision {
  /// Session still loading; render a spinner, decide nothing.
  Pending,
  Allow,
  Redirect(String)
}

impl GuardDecision {
  pub fn is_allowed(&self) -> bool {
    matches!(self, Self::Allow)
  }
}

/// Role-based navigation rules. Each applicable rule is checked on its
/// own and any failure denies.
#[derive(
  Debug, Clone, PartialEq,
)]
pub struct GuardPolicy {
  config: GuardConfig
}

impl Default for GuardPolicy {
  fn default() -> Self {
    Self::from_config(
      GuardConfig::default()
    )
  }
}

impl GuardPolicy {
  pub fn from_config(
    config: GuardConfig
  ) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &GuardConfig {
    &self.config
  }

  /// Whether a signed-in user may view `pathname`.
  pub fn allows(
    &self,
    role: &Role,
    has_company: bool,
    pathname: &str
  ) -> bool {
    let cfg = &self.config;

    let role_paths = match role {
      | Role::Sales if !has_company => {
        Some(&cfg.restricted_sales_paths)
      }
      | Role::Sales => {
        Some(&cfg.sales_paths)
      }
      | Role::Estimates => {
        Some(&cfg.estimates_paths)
      }
      | Role::Admin | Role::Other(_) => {
        None
      }
    };
    if let Some(paths) = role_paths
      && !paths.is_empty()
      && !is_path_allowed(pathname, paths)
    {
      debug!(
        ?role,
        has_company,
        pathname,
        "path outside role allow-list"
      );
      return false;
    }

    if !role.is_admin()
      && cfg
        .admin_only_prefixes
        .iter()
        .any(|prefix| {
          is_under(pathname, prefix)
        })
    {
      debug!(
        ?role,
        pathname,
        "admin-only path"
      );
      return false;
    }

    true
  }

  #[tracing::instrument(skip(self, session))]
  pub fn evaluate(
    &self,
    session: &SessionState,
    pathname: &str
  ) -> GuardDecision {
    let pathname = normalize(pathname);
    if is_under(pathname, &self.config.login)
    {
      return GuardDecision::Allow;
    }

    match session {
      | SessionState::Loading => {
        GuardDecision::Pending
      }
      | SessionState::Anonymous => {
        debug!(
          pathname,
          "no signed-in user"
        );
        GuardDecision::Redirect(
          self.config.login.clone()
        )
      }
      | SessionState::Ready(session) => {
        if self.allows(
          &session.role,
          session.has_company,
          pathname
        ) {
          GuardDecision::Allow
        } else {
          GuardDecision::Redirect(
            self.config.home.clone()
          )
        }
      }
    }
  }
}

/// [`GuardPolicy::allows`] with the default allow-lists.
pub fn is_navigation_allowed(
  role: &Role,
  has_company: bool,
  pathname: &str
) -> bool {
  GuardPolicy::default().allows(
    role,
    has_company,
    normalize(pathname)
  )
}

// `/boqs/` and `/boqs` are the same page.
fn normalize(pathname: &str) -> &str {
  let trimmed =
    pathname.trim_end_matches('/');
  if trimmed.is_empty() {
    "/"
  } else {
    trimmed
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::session::Session;

  fn ready(
    role: Role,
    has_company: bool
  ) -> SessionState {
    SessionState::Ready(Session {
      user_id: "u@example.com".into(),
      full_name: "U".into(),
      user_image: None,
      role,
      has_company
    })
  }

  #[test]
  fn path_matching_requires_separator() {
    let list = ["/", "/boqs"];
    assert!(is_path_allowed("/", &list));
    assert!(is_path_allowed("/boqs/123", &list));
    assert!(!is_path_allowed("/tasks", &list));
    assert!(!is_path_allowed("/boqsextra", &list));
  }

  #[test]
  fn restricted_sales_is_confined() {
    let policy = GuardPolicy::default();
    let session = ready(Role::Sales, false);
    assert_eq!(
      policy.evaluate(&session, "/team"),
      GuardDecision::Redirect("/".into())
    );
    assert_eq!(
      policy.evaluate(&session, "/boqs/abc"),
      GuardDecision::Allow
    );
    assert_eq!(
      policy.evaluate(&session, "/companies"),
      GuardDecision::Redirect("/".into())
    );
  }

  #[test]
  fn team_requires_admin() {
    assert!(!is_navigation_allowed(
      &Role::Sales,
      true,
      "/team/settings"
    ));
    assert!(is_navigation_allowed(
      &Role::Admin,
      false,
      "/team/settings"
    ));
    assert!(!is_navigation_allowed(
      &Role::Other("Viewer".into()),
      true,
      "/team"
    ));
  }

  #[test]
  fn estimates_and_company_sales_lists() {
    assert!(is_navigation_allowed(
      &Role::Estimates,
      false,
      "/calendar"
    ));
    assert!(!is_navigation_allowed(
      &Role::Estimates,
      false,
      "/companies"
    ));
    assert!(is_navigation_allowed(
      &Role::Sales,
      true,
      "/companies/company"
    ));
    assert!(!is_navigation_allowed(
      &Role::Sales,
      true,
      "/settings"
    ));
  }

  #[test]
  fn loading_and_anonymous_sessions() {
    let policy = GuardPolicy::default();
    assert_eq!(
      policy.evaluate(
        &SessionState::Loading,
        "/team"
      ),
      GuardDecision::Pending
    );
    assert_eq!(
      policy.evaluate(
        &SessionState::Anonymous,
        "/boqs"
      ),
      GuardDecision::Redirect(
        "/login".into()
      )
    );
    assert_eq!(
      policy.evaluate(
        &SessionState::Anonymous,
        "/login/"
      ),
      GuardDecision::Allow
    );
  }

  #[test]
  fn empty_role_list_disables_that_rule() {
    let mut config = GuardConfig::default();
    config.estimates_paths.clear();
    let policy =
      GuardPolicy::from_config(config);
    assert!(policy.allows(
      &Role::Estimates,
      false,
      "/companies"
    ));
    assert!(!policy.allows(
      &Role::Estimates,
      false,
      "/team"
    ));
  }
}
