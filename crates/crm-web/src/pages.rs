mod calendar;
mod home;
mod login;
mod records;
mod tasks;
mod team;

use crm_core::dialogs::{
  NewTaskContext,
  ParentLink
};
use crm_core::fab::FabAction;
use crm_core::route::{
  Route,
  Section
};
use crm_core::url_state::{
  Location,
  UrlHistory
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with
};

use crate::components::Spinner;
use crate::hooks::{
  Fetch,
  use_client,
  use_session
};

#[derive(Properties, PartialEq)]
pub struct RoutePageProps {
  pub route:        Route,
  pub on_signed_in: Callback<()>
}

#[function_component(RoutePage)]
pub fn route_page(
  props: &RoutePageProps
) -> Html {
  match &props.route {
    | Route::Home => html! { <home::HomePage /> },
    | Route::Companies { selected } => html! {
        <records::CompaniesPage selected={selected.clone()} />
    },
    | Route::Company { id } => detail_or_missing(id, |id| html! {
        <records::CompanyDetail id={id} />
    }),
    | Route::Contacts { selected } => html! {
        <records::ContactsPage selected={selected.clone()} />
    },
    | Route::Contact { id } => detail_or_missing(id, |id| html! {
        <records::ContactDetail id={id} />
    }),
    | Route::Boqs { selected } => html! {
        <records::BoqsPage selected={selected.clone()} />
    },
    | Route::Boq { id } => detail_or_missing(id, |id| html! {
        <records::BoqDetail id={id} />
    }),
    | Route::Tasks { selected } => html! {
        <tasks::TasksPage selected={selected.clone()} />
    },
    | Route::Task { id } => detail_or_missing(id, |id| html! {
        <tasks::TaskDetail id={id} />
    }),
    | Route::TaskVariant(variant) => html! {
        <tasks::TaskVariantPage variant={*variant} />
    },
    | Route::NewCompany => html! {
        <LaunchForm action={FabAction::NewCompany} fallback={Section::Companies} />
    },
    | Route::NewContact => html! {
        <LaunchForm
            action={FabAction::NewContact(ParentLink::default())}
            fallback={Section::Contacts} />
    },
    | Route::NewBoq => html! {
        <LaunchForm
            action={FabAction::NewBoq(ParentLink::default())}
            fallback={Section::Boqs} />
    },
    | Route::NewTask => html! {
        <LaunchForm
            action={FabAction::NewTask(NewTaskContext::default())}
            fallback={Section::Tasks} />
    },
    | Route::Calendar => html! { <calendar::CalendarPage /> },
    | Route::Settings => html! { <SettingsPage /> },
    | Route::Team { member } => html! {
        <team::TeamPage member={member.clone()} />
    },
    | Route::Login => html! {
        <login::LoginPage on_signed_in={props.on_signed_in.clone()} />
    },
    | Route::NotFound(path) => html! {
        <div class="panel empty">
            { format!("Nothing lives at {path}.") }
        </div>
    }
  }
}

fn detail_or_missing(
  id: &Option<String>,
  render: impl FnOnce(String) -> Html
) -> Html {
  match id {
    | Some(id) => render(id.clone()),
    | None => html! {
        <div class="panel empty">{ "No record selected." }</div>
    }
  }
}

/// Spinner, error line or the rendered items.
pub(crate) fn fetch_view<T>(
  fetch: &Fetch<Vec<T>>,
  render: impl FnOnce(&[T]) -> Html
) -> Html {
  match fetch {
    | Fetch::Loading => html! { <Spinner /> },
    | Fetch::Failed(err) => html! {
        <div class="panel error">{ err.clone() }</div>
    },
    | Fetch::Ready(items) => render(items)
  }
}

#[derive(Properties, PartialEq)]
struct LaunchFormProps {
  action:   FabAction,
  fallback: Section
}

/// Full-page create routes: opens the matching dialog once, then
/// replaces the entry with the section's list.
#[function_component(LaunchForm)]
fn launch_form(
  props: &LaunchFormProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let role = session.role().cloned();

  {
    let client = client.clone();
    let action = props.action.clone();
    let fallback = props.fallback;
    use_effect_with(role, move |role| {
      if let Some(role) = role {
        action.dispatch(client.dialogs(), role);
        client
          .history()
          .replace(Location::parse(fallback.path()));
      }
      || ()
    });
  }

  html! { <Spinner /> }
}

#[function_component(SettingsPage)]
fn settings_page() -> Html {
  let client = use_client();
  let session = use_session();
  let on_profile = {
    let dialogs = client.dialogs().clone();
    move |_| dialogs.open_user_profile(())
  };

  html! {
      <div class="panel settings">
          <div class="header">{ "Settings" }</div>
          if let Some(user) = session.session() {
              <dl>
                  <dt>{ "Signed in as" }</dt><dd>{ &user.full_name }</dd>
                  <dt>{ "Company linked" }</dt><dd>{ if user.has_company { "yes" } else { "no" } }</dd>
              </dl>
          }
          <dl>
              <dt>{ "Server" }</dt><dd>{ &client.core.config.api.base_url }</dd>
          </dl>
          <button class="btn" type="button" onclick={on_profile}>{ "Profile" }</button>
      </div>
  }
}
