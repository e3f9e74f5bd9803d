use crate::route::Section;
use crate::session::Role;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub struct NavItem {
  pub label:      &'static str,
  pub section:    Section,
  pub admin_only: bool
}

impl NavItem {
  pub fn path(&self) -> &'static str {
    self.section.path()
  }
}

pub const NAV_ITEMS: &[NavItem] = &[
  NavItem {
    label:      "Home",
    section:    Section::Home,
    admin_only: false
  },
  NavItem {
    label:      "My Team",
    section:    Section::Team,
    admin_only: true
  },
  NavItem {
    label:      "Company",
    section:    Section::Companies,
    admin_only: false
  },
  NavItem {
    label:      "Contact",
    section:    Section::Contacts,
    admin_only: false
  },
  NavItem {
    label:      "BOQs",
    section:    Section::Boqs,
    admin_only: false
  },
  NavItem {
    label:      "Tasks",
    section:    Section::Tasks,
    admin_only: false
  }
];

/// Sidebar and bottom-bar entries for a signed-in user.
pub fn nav_items(
  role: &Role,
  has_company: bool
) -> Vec<NavItem> {
  let keep = |item: &&NavItem| match role {
    | Role::Sales if !has_company => {
      item.section != Section::Team
    }
    | Role::Estimates => matches!(
      item.section,
      Section::Home | Section::Boqs
    ),
    | Role::Admin => true,
    | Role::Sales => !item.admin_only,
    | Role::Other(name)
      if name.is_empty() =>
    {
      false
    }
    | Role::Other(_) => !item.admin_only
  };
  NAV_ITEMS.iter().filter(keep).copied().collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn labels(
    role: Role,
    has_company: bool
  ) -> Vec<&'static str> {
    nav_items(&role, has_company)
      .into_iter()
      .map(|item| item.label)
      .collect()
  }

  #[test]
  fn items_follow_role() {
    assert_eq!(
      labels(Role::Estimates, true),
      vec!["Home", "BOQs"]
    );
    assert_eq!(
      labels(Role::Admin, true).len(),
      6
    );
    assert_eq!(
      labels(Role::Sales, false),
      vec![
        "Home", "Company", "Contact",
        "BOQs", "Tasks"
      ]
    );
    assert!(
      !labels(Role::Sales, true)
        .contains(&"My Team")
    );
  }

  #[test]
  fn missing_role_has_no_items() {
    assert!(
      labels(Role::Other(String::new()), true)
        .is_empty()
    );
  }
}
