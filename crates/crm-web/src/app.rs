use std::rc::Rc;

use crm_core::CrmClient;
use crm_core::guard::GuardDecision;
use crm_core::route::Route;
use crm_core::session::SessionState;
use yew::{
  Callback,
  Children,
  ContextProvider,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_reducer,
  use_state
};
use yew_router::BrowserRouter;
use yew_router::hooks::use_location;

use crate::api::DocumentClient;
use crate::components::{
  DialogHost,
  FabMenu,
  NavBar,
  PageHeader,
  Spinner,
  ToastAction,
  ToastArea,
  Toasts,
  ToastsHandle
};
use crate::hooks::{
  ClientHandle,
  Revisions,
  RevisionsHandle,
  use_client,
  use_session
};
use crate::history::BrowserUrlHistory;
use crate::pages::RoutePage;

const CRM_CONFIG: &str =
  include_str!("../crm.toml");

#[function_component(App)]
pub fn app() -> Html {
  html! {
      <BrowserRouter>
          <Shell />
      </BrowserRouter>
  }
}

/// Builds the state layer once and provides it, the session and the
/// listing revisions to the rest of the tree.
#[function_component(Shell)]
fn shell() -> Html {
  let client = use_memo((), |_| {
    let history = BrowserUrlHistory::new();
    let core = match CrmClient::start(
      Some(CRM_CONFIG),
      history.clone()
    ) {
      | Ok(core) => core,
      | Err(err) => {
        tracing::error!(
          error = %format!("{err:#}"),
          "bad embedded crm config; using defaults"
        );
        CrmClient::with_config(
          Default::default(),
          history
        )
      }
    };
    let docs =
      DocumentClient::new(&core.config);
    ClientHandle {
      core: Rc::new(core),
      docs
    }
  });
  let client = (*client).clone();

  let session =
    use_state(|| SessionState::Loading);
  let revisions =
    use_reducer(Revisions::default);
  let toasts =
    use_reducer(Toasts::default);
  let session_tick = use_state(|| 0_u64);

  {
    let session = session.clone();
    let client = client.clone();
    let toasts = toasts.clone();
    use_effect_with(
      *session_tick,
      move |_| {
        wasm_bindgen_futures::spawn_local(
          async move {
            match client
              .docs
              .fetch_session(
                &client.core.config
              )
              .await
            {
              | Ok(state) => {
                tracing::info!(
                  signed_in = state.session().is_some(),
                  "session resolved"
                );
                session.set(state)
              }
              | Err(err) => {
                tracing::error!(
                  error = %err,
                  "session lookup failed"
                );
                toasts.dispatch(ToastAction::Push(err));
                session.set(
                  SessionState::Anonymous
                );
              }
            }
          }
        );
        || ()
      }
    );
  }

  // Back to loading first so the guard waits instead of bouncing the
  // user to the login page again.
  let on_signed_in = {
    let session = session.clone();
    let session_tick =
      session_tick.clone();
    Callback::from(move |()| {
      session.set(SessionState::Loading);
      session_tick.set(*session_tick + 1)
    })
  };

  let on_signed_out = {
    let session = session.clone();
    Callback::from(move |()| {
      tracing::info!("signed out");
      session.set(SessionState::Anonymous)
    })
  };

  html! {
      <ContextProvider<ClientHandle> context={client}>
          <ContextProvider<SessionState> context={(*session).clone()}>
              <ContextProvider<RevisionsHandle> context={revisions}>
                  <ContextProvider<ToastsHandle> context={toasts}>
                      <Guard>
                          <Layout on_signed_in={on_signed_in} on_signed_out={on_signed_out} />
                      </Guard>
                      <ToastArea />
                  </ContextProvider<ToastsHandle>>
              </ContextProvider<RevisionsHandle>>
          </ContextProvider<SessionState>>
      </ContextProvider<ClientHandle>>
  }
}

#[derive(Properties, PartialEq)]
struct GuardProps {
  children: Children
}

/// Shows a spinner while the session loads and redirects when the
/// current path is not allowed for the user.
#[function_component(Guard)]
fn guard(props: &GuardProps) -> Html {
  let client = use_client();
  let session = use_session();
  let location = use_location();

  {
    let client = client.clone();
    use_effect_with(location, move |_| {
      client.core.url.sync_from_history();
      || ()
    });
  }

  let decision =
    client.core.check_navigation(&session);

  {
    let client = client.clone();
    let session = session.clone();
    use_effect_with(
      decision.clone(),
      move |decision| {
        if matches!(
          decision,
          GuardDecision::Redirect(_)
        ) {
          client
            .core
            .enforce_navigation(&session);
        }
        || ()
      }
    );
  }

  match decision {
    | GuardDecision::Pending => {
      html! { <Spinner /> }
    }
    | GuardDecision::Redirect(_) => {
      html! {}
    }
    | GuardDecision::Allow => html! {
        <>{ for props.children.iter() }</>
    }
  }
}

#[derive(Properties, PartialEq)]
struct LayoutProps {
  on_signed_in:  Callback<()>,
  on_signed_out: Callback<()>
}

#[function_component(Layout)]
fn layout(props: &LayoutProps) -> Html {
  let client = use_client();
  let _location = use_location();
  let route = client.core.route();

  if route == Route::Login {
    return html! {
        <RoutePage route={route} on_signed_in={props.on_signed_in.clone()} />
    };
  }

  html! {
      <div class="app">
          <NavBar active={route.nav_section()} />
          <div class="main">
              <PageHeader
                  title={route.title()}
                  show_back={route.shows_back_button()}
              />
              <RoutePage route={route.clone()} on_signed_in={props.on_signed_in.clone()} />
              <FabMenu route={route} />
          </div>
          <DialogHost on_signed_out={props.on_signed_out.clone()} />
      </div>
  }
}
