//! One place that turns a location into meaning. Page titles, the back
//! button, the active nav entry and the fab all read a [`Route`].

use crate::url_state::QueryParams;

pub const ID_PARAM: &str = "id";
pub const MEMBER_PARAM: &str = "memberId";
/// Detail-pane tab; cleared whenever the selected record changes.
pub const INNER_TAB_PARAM: &str = "innerTab";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
)]
pub enum TaskVariant {
  History,
  Pending,
  Upcoming
}

impl TaskVariant {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::History => "history",
      | Self::Pending => "pending",
      | Self::Upcoming => "upcoming"
    }
  }
}

/// Top-level area a route belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
)]
pub enum Section {
  Home,
  Companies,
  Contacts,
  Boqs,
  Tasks,
  Calendar,
  Settings,
  Team,
  Login
}

impl Section {
  pub fn path(self) -> &'static str {
    match self {
      | Self::Home => "/",
      | Self::Companies => "/companies",
      | Self::Contacts => "/contacts",
      | Self::Boqs => "/boqs",
      | Self::Tasks => "/tasks",
      | Self::Calendar => "/calendar",
      | Self::Settings => "/settings",
      | Self::Team => "/team",
      | Self::Login => "/login"
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum Route {
  Home,
  /// List page; `selected` drives the desktop detail pane.
  Companies {
    selected: Option<String>
  },
  Company {
    id: Option<String>
  },
  NewCompany,
  Contacts {
    selected: Option<String>
  },
  Contact {
    id: Option<String>
  },
  NewContact,
  Boqs {
    selected: Option<String>
  },
  Boq {
    id: Option<String>
  },
  NewBoq,
  Tasks {
    selected: Option<String>
  },
  Task {
    id: Option<String>
  },
  TaskVariant(TaskVariant),
  NewTask,
  Calendar,
  Settings,
  Team {
    member: Option<String>
  },
  Login,
  NotFound(String)
}

impl Route {
  pub fn classify(
    pathname: &str,
    query: &QueryParams
  ) -> Self {
    let id = || param(query, ID_PARAM);
    let trimmed =
      pathname.trim_end_matches('/');
    let segments: Vec<&str> = trimmed
      .split('/')
      .filter(|segment| {
        !segment.is_empty()
      })
      .collect();

    match segments.as_slice() {
      | [] => Self::Home,
      | ["companies"] => {
        Self::Companies { selected: id() }
      }
      | ["companies", "company"] => {
        Self::Company { id: id() }
      }
      | ["companies", "new-company"] => {
        Self::NewCompany
      }
      | ["contacts"] => {
        Self::Contacts { selected: id() }
      }
      | ["contacts", "contact"] => {
        Self::Contact { id: id() }
      }
      | ["contacts", "new-contact"] => {
        Self::NewContact
      }
      | ["boqs"] => {
        Self::Boqs { selected: id() }
      }
      | ["boqs", "boq"] => {
        Self::Boq { id: id() }
      }
      | ["boqs", "new"] => Self::NewBoq,
      | ["tasks"] => {
        Self::Tasks { selected: id() }
      }
      | ["tasks", "task"] => {
        Self::Task { id: id() }
      }
      | ["tasks", "new"] => Self::NewTask,
      | ["tasks", "history"] => {
        Self::TaskVariant(
          TaskVariant::History
        )
      }
      | ["tasks", "pending"] => {
        Self::TaskVariant(
          TaskVariant::Pending
        )
      }
      | ["tasks", "upcoming"] => {
        Self::TaskVariant(
          TaskVariant::Upcoming
        )
      }
      | ["calendar"] => Self::Calendar,
      | ["settings"] => Self::Settings,
      | ["team"] => Self::Team {
        member: param(
          query,
          MEMBER_PARAM
        )
      },
      | ["login"] => Self::Login,
      | _ => {
        Self::NotFound(pathname.to_string())
      }
    }
  }

  pub fn section(
    &self
  ) -> Option<Section> {
    match self {
      | Self::Home => Some(Section::Home),
      | Self::Companies { .. }
      | Self::Company { .. }
      | Self::NewCompany => {
        Some(Section::Companies)
      }
      | Self::Contacts { .. }
      | Self::Contact { .. }
      | Self::NewContact => {
        Some(Section::Contacts)
      }
      | Self::Boqs { .. }
      | Self::Boq { .. }
      | Self::NewBoq => {
        Some(Section::Boqs)
      }
      | Self::Tasks { .. }
      | Self::Task { .. }
      | Self::TaskVariant(_)
      | Self::NewTask => {
        Some(Section::Tasks)
      }
      | Self::Calendar => {
        Some(Section::Calendar)
      }
      | Self::Settings => {
        Some(Section::Settings)
      }
      | Self::Team { .. } => {
        Some(Section::Team)
      }
      | Self::Login => {
        Some(Section::Login)
      }
      | Self::NotFound(_) => None
    }
  }

  /// Nav entry to highlight.
  pub fn nav_section(
    &self
  ) -> Option<Section> {
    self.section()
  }

  /// The record this route is showing, either as a detail page or as
  /// the selected row of a list.
  pub fn entity_id(
    &self
  ) -> Option<&str> {
    match self {
      | Self::Companies { selected }
      | Self::Contacts { selected }
      | Self::Boqs { selected }
      | Self::Tasks { selected } => {
        selected.as_deref()
      }
      | Self::Company { id }
      | Self::Contact { id }
      | Self::Boq { id }
      | Self::Task { id } => id.as_deref(),
      | Self::Team { member } => {
        member.as_deref()
      }
      | _ => None
    }
  }

  pub fn title(&self) -> &'static str {
    match self {
      | Self::Company { .. } => {
        "Company Details"
      }
      | Self::Contact { .. } => {
        "Contact Details"
      }
      | Self::Boq { .. } => "BOQ Details",
      | Self::Task { .. } => "Task Details",
      | _ => match self.section() {
        | Some(Section::Companies) => {
          "Companies"
        }
        | Some(Section::Contacts) => {
          "Contacts"
        }
        | Some(Section::Boqs) => "BOQs",
        | Some(Section::Tasks) => "Tasks",
        | Some(Section::Calendar) => {
          "Calendar"
        }
        | Some(Section::Settings) => {
          "Settings"
        }
        | Some(Section::Team) => "Team",
        | Some(Section::Login) => "Login",
        | Some(Section::Home) | None => {
          "Home"
        }
      }
    }
  }

  /// Main pages have no back button; everything below them does.
  pub fn shows_back_button(&self) -> bool {
    !matches!(
      self,
      Self::Home
        | Self::Companies { .. }
        | Self::Contacts { .. }
        | Self::Boqs { .. }
        | Self::Tasks { .. }
        | Self::Settings
        | Self::Team { .. }
        | Self::Login
    )
  }
}

fn param(
  query: &QueryParams,
  key: &str
) -> Option<String> {
  query
    .get(key)
    .filter(|value| !value.is_empty())
    .map(str::to_string)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn classify(href: &str) -> Route {
    let location =
      crate::url_state::Location::parse(
        href
      );
    Route::classify(
      &location.pathname,
      &location.query
    )
  }

  #[test]
  fn list_and_detail_paths_are_distinct() {
    assert_eq!(
      classify("/companies?id=CMP-1"),
      Route::Companies {
        selected: Some("CMP-1".into())
      }
    );
    assert_eq!(
      classify("/companies/company?id=CMP-1"),
      Route::Company {
        id: Some("CMP-1".into())
      }
    );
    assert_eq!(
      classify("/boqs/new/"),
      Route::NewBoq
    );
    assert_eq!(
      classify("/tasks/pending"),
      Route::TaskVariant(
        TaskVariant::Pending
      )
    );
    assert_eq!(
      classify("/nowhere"),
      Route::NotFound("/nowhere".into())
    );
  }

  #[test]
  fn titles_and_back_button() {
    let detail =
      classify("/contacts/contact?id=C-1");
    assert_eq!(detail.title(), "Contact Details");
    assert!(detail.shows_back_button());
    assert_eq!(detail.entity_id(), Some("C-1"));

    let list = classify("/contacts?id=C-1");
    assert_eq!(list.title(), "Contacts");
    assert!(!list.shows_back_button());

    assert_eq!(classify("/").title(), "Home");
    assert_eq!(
      classify("/tasks/history").title(),
      "Tasks"
    );
    assert!(
      classify("/calendar").shows_back_button()
    );
  }

  #[test]
  fn team_reads_member_param() {
    let route = classify("/team?memberId=u1");
    assert_eq!(route.entity_id(), Some("u1"));
    assert_eq!(
      route.nav_section(),
      Some(Section::Team)
    );
  }
}
