use crm_shared::{
  CrmUserDoc,
  TaskProfile
};
use tracing::debug;

use crate::config::CrmConfig;

pub const ADMINISTRATOR_USER: &str =
  "Administrator";
pub const GUEST_USER: &str = "Guest";

#[derive(
  Debug, Clone, PartialEq, Eq, Hash,
)]
pub enum Role {
  Sales,
  Estimates,
  Admin,
  Other(String)
}

impl Role {
  pub fn is_admin(&self) -> bool {
    matches!(self, Self::Admin)
  }

  /// Task profile a user of this role creates tasks under, when it
  /// is fixed by the role alone.
  pub fn task_profile(
    &self
  ) -> Option<TaskProfile> {
    match self {
      | Self::Sales => {
        Some(TaskProfile::Sales)
      }
      | Self::Estimates => {
        Some(TaskProfile::Estimates)
      }
      | Self::Admin | Self::Other(_) => {
        None
      }
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Session {
  pub user_id:     String,
  pub full_name:   String,
  pub user_image:  Option<String>,
  pub role:        Role,
  pub has_company: bool
}

impl Session {
  pub fn administrator(
    full_name: Option<String>
  ) -> Self {
    Self {
      user_id:     ADMINISTRATOR_USER
        .to_string(),
      full_name:   full_name
        .unwrap_or_else(|| {
          ADMINISTRATOR_USER.to_string()
        }),
      user_image:  None,
      role:        Role::Admin,
      has_company: true
    }
  }

  pub fn from_user_doc(
    doc: CrmUserDoc,
    cfg: &CrmConfig
  ) -> Self {
    let role = cfg.profile_role(
      doc
        .nirmaan_role_name
        .as_deref()
        .unwrap_or_default()
    );
    Self {
      full_name: doc
        .full_name
        .unwrap_or_else(|| {
          "User".to_string()
        }),
      user_id: doc.name,
      user_image: doc.user_image,
      role,
      has_company: doc.has_company
    }
  }
}

/// What the client currently knows about the signed-in user.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum SessionState {
  Loading,
  Anonymous,
  Ready(Session)
}

impl SessionState {
  /// Combines the logged-in user id and the user's CRM profile
  /// document. A signed-in non-admin user whose profile has not
  /// arrived yet is still loading.
  pub fn resolve(
    logged_user: Option<&str>,
    crm_user: Option<CrmUserDoc>,
    cfg: &CrmConfig
  ) -> Self {
    let state = match logged_user {
      | None | Some(GUEST_USER) => {
        Self::Anonymous
      }
      | Some(ADMINISTRATOR_USER) => {
        Self::Ready(
          Session::administrator(None)
        )
      }
      | Some(_) => match crm_user {
        | Some(doc) => Self::Ready(
          Session::from_user_doc(
            doc, cfg
          )
        ),
        | None => Self::Loading
      }
    };
    debug!(?state, "resolved session");
    state
  }

  pub fn session(
    &self
  ) -> Option<&Session> {
    match self {
      | Self::Ready(session) => {
        Some(session)
      }
      | Self::Loading
      | Self::Anonymous => None
    }
  }

  pub fn role(&self) -> Option<&Role> {
    self
      .session()
      .map(|session| &session.role)
  }

  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Loading)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{
    ESTIMATES_PROFILE,
    SALES_PROFILE
  };

  fn user_doc(
    profile: &str,
    has_company: bool
  ) -> CrmUserDoc {
    CrmUserDoc {
      name: "member@example.com"
        .to_string(),
      full_name: Some(
        "Member".to_string()
      ),
      user_image: None,
      nirmaan_role_name: Some(
        profile.to_string()
      ),
      has_company
    }
  }

  #[test]
  fn administrator_is_admin_with_company(
  ) {
    let state = SessionState::resolve(
      Some(ADMINISTRATOR_USER),
      None,
      &CrmConfig::default()
    );
    let session =
      state.session().expect("ready");
    assert_eq!(session.role, Role::Admin);
    assert!(session.has_company);
  }

  #[test]
  fn crm_user_waits_for_profile_doc() {
    let cfg = CrmConfig::default();
    assert_eq!(
      SessionState::resolve(
        Some("member@example.com"),
        None,
        &cfg
      ),
      SessionState::Loading
    );

    let state = SessionState::resolve(
      Some("member@example.com"),
      Some(user_doc(
        SALES_PROFILE,
        false
      )),
      &cfg
    );
    let session =
      state.session().expect("ready");
    assert_eq!(session.role, Role::Sales);
    assert!(!session.has_company);
  }

  #[test]
  fn guest_is_anonymous() {
    let cfg = CrmConfig::default();
    assert_eq!(
      SessionState::resolve(
        Some(GUEST_USER),
        Some(user_doc(
          ESTIMATES_PROFILE,
          true
        )),
        &cfg
      ),
      SessionState::Anonymous
    );
    assert_eq!(
      SessionState::resolve(
        None, None, &cfg
      ),
      SessionState::Anonymous
    );
  }
}
