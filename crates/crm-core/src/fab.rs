use tracing::debug;

use crate::dialogs::{
  DialogStore,
  NewTaskContext,
  ParentLink,
  create_task
};
use crate::route::{
  Route,
  Section
};
use crate::session::Role;

/// What a floating action button entry does when pressed.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum FabAction {
  NewCompany,
  NewContact(ParentLink),
  NewBoq(ParentLink),
  /// Goes through role-based task routing.
  NewTask(NewTaskContext),
  NewUser
}

impl FabAction {
  pub fn dispatch(
    &self,
    store: &DialogStore,
    role: &Role
  ) {
    debug!(action = ?self, "fab action");
    match self {
      | Self::NewCompany => {
        store.open_new_company(())
      }
      | Self::NewContact(link) => {
        store.open_new_contact(link.clone())
      }
      | Self::NewBoq(link) => {
        store.open_new_boq(link.clone())
      }
      | Self::NewTask(context) => {
        create_task(
          store,
          role,
          context.clone()
        );
      }
      | Self::NewUser => {
        store.open_new_user(())
      }
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct FabOption {
  pub label:  &'static str,
  pub action: FabAction
}

fn option(
  label: &'static str,
  action: FabAction
) -> FabOption {
  FabOption { label, action }
}

/// Quick-create entries for the current page. The first matching row
/// wins; a selected record narrows the options to that record.
pub fn fab_options(
  route: &Route,
  role: &Role
) -> Vec<FabOption> {
  let id = route.entity_id();
  match (route.section(), id) {
    | (Some(Section::Team), _) => vec![
      option(
        "Add New CRM User",
        FabAction::NewUser
      ),
    ],
    | (Some(Section::Companies), Some(id)) => {
      vec![
        option(
          "Add New BOQ",
          FabAction::NewBoq(
            ParentLink::company(id)
          )
        ),
        option(
          "Add New Contact",
          FabAction::NewContact(
            ParentLink::company(id)
          )
        ),
        option(
          "Add New Task",
          FabAction::NewTask(
            NewTaskContext::for_company(id)
          )
        ),
      ]
    }
    | (Some(Section::Contacts), Some(id)) => {
      vec![
        option(
          "Add New Task",
          FabAction::NewTask(
            NewTaskContext::for_contact(id)
          )
        ),
        option(
          "Add New BOQ",
          FabAction::NewBoq(
            ParentLink::contact(id)
          )
        ),
      ]
    }
    | (Some(Section::Boqs), Some(id)) => {
      vec![option(
        "Add Follow-up Task",
        FabAction::NewTask(
          NewTaskContext::for_boq(id)
        )
      )]
    }
    | (Some(Section::Tasks), Some(id)) => {
      vec![option(
        "Add Follow-up Task",
        FabAction::NewTask(
          NewTaskContext::follow_up(id)
        )
      )]
    }
    | (Some(Section::Companies), None) => {
      vec![option(
        "Add New Company",
        FabAction::NewCompany
      )]
    }
    | (Some(Section::Contacts), None) => {
      vec![option(
        "Add New Contact",
        FabAction::NewContact(
          ParentLink::default()
        )
      )]
    }
    | (Some(Section::Boqs), None) => {
      vec![option(
        "Add New BOQ",
        FabAction::NewBoq(
          ParentLink::default()
        )
      )]
    }
    | (Some(Section::Tasks), None) => {
      vec![option(
        "Add New Task",
        FabAction::NewTask(
          NewTaskContext::default()
        )
      )]
    }
    | (Some(Section::Home), _)
      if *role == Role::Estimates =>
    {
      vec![option(
        "Add New BOQ",
        FabAction::NewBoq(
          ParentLink::default()
        )
      )]
    }
    | (Some(Section::Home), _) => vec![
      option(
        "Add New Company",
        FabAction::NewCompany
      ),
      option(
        "Add New Contact",
        FabAction::NewContact(
          ParentLink::default()
        )
      ),
      option(
        "Add New BOQ",
        FabAction::NewBoq(
          ParentLink::default()
        )
      ),
      option(
        "Add New Task",
        FabAction::NewTask(
          NewTaskContext::default()
        )
      ),
    ],
    | _ => Vec::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dialogs::{
    DialogId,
    keys
  };
  use crate::url_state::Location;

  fn route(href: &str) -> Route {
    let location = Location::parse(href);
    Route::classify(
      &location.pathname,
      &location.query
    )
  }

  fn labels(options: &[FabOption]) -> Vec<&str> {
    options
      .iter()
      .map(|option| option.label)
      .collect()
  }

  #[test]
  fn selected_company_offers_linked_creates(
  ) {
    for href in [
      "/companies?id=CMP-1",
      "/companies/company?id=CMP-1"
    ] {
      let options =
        fab_options(&route(href), &Role::Sales);
      assert_eq!(labels(&options), vec![
        "Add New BOQ",
        "Add New Contact",
        "Add New Task"
      ]);
      assert_eq!(
        options[0].action,
        FabAction::NewBoq(
          ParentLink::company("CMP-1")
        )
      );
    }
  }

  #[test]
  fn home_depends_on_role() {
    assert_eq!(
      labels(&fab_options(
        &route("/"),
        &Role::Estimates
      )),
      vec!["Add New BOQ"]
    );
    assert_eq!(
      fab_options(&route("/"), &Role::Admin)
        .len(),
      4
    );
    assert!(
      fab_options(
        &route("/calendar"),
        &Role::Admin
      )
      .is_empty()
    );
  }

  #[test]
  fn follow_up_task_routes_by_role() {
    let options = fab_options(
      &route("/boqs?id=BOQ-3"),
      &Role::Estimates
    );
    assert_eq!(labels(&options), vec![
      "Add Follow-up Task"
    ]);

    let store = DialogStore::new();
    options[0]
      .action
      .dispatch(&store, &Role::Estimates);
    assert_eq!(store.open_keys(), vec![
      DialogId::NewEstimationTask
    ]);
    assert_eq!(
      store
        .get::<keys::NewEstimationTask>()
        .context
        .boq_id
        .as_deref(),
      Some("BOQ-3")
    );
  }

  #[test]
  fn team_always_offers_new_user() {
    let options = fab_options(
      &route("/team?memberId=u1"),
      &Role::Admin
    );
    assert_eq!(labels(&options), vec![
      "Add New CRM User"
    ]);
  }
}
