use crm_core::fab::fab_options;
use crm_core::route::Route;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_state
};

use crate::hooks::{
  use_client,
  use_session
};

#[derive(Properties, PartialEq)]
pub struct FabMenuProps {
  pub route: Route
}

/// Quick-create button for the current page. A single option opens
/// directly; several expand into a menu first.
#[function_component(FabMenu)]
pub fn fab_menu(
  props: &FabMenuProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let expanded = use_state(|| false);
  let Some(role) =
    session.role().cloned()
  else {
    return html! {};
  };

  let options =
    fab_options(&props.route, &role);
  if options.is_empty() {
    return html! {};
  }

  let run = |index: usize| {
    let options = options.clone();
    let store = client.dialogs().clone();
    let role = role.clone();
    let expanded = expanded.clone();
    Callback::from(move |_: MouseEvent| {
      if let Some(option) = options.get(index) {
        option.action.dispatch(&store, &role);
      }
      expanded.set(false);
    })
  };

  let on_fab = if options.len() == 1 {
    run(0)
  } else {
    let expanded = expanded.clone();
    Callback::from(move |_: MouseEvent| {
      expanded.set(!*expanded)
    })
  };

  html! {
      <div class="fab">
          if *expanded {
              <div class="fab-menu">
                  {
                      for options.iter().enumerate().map(|(index, option)| html! {
                          <button class="btn" type="button" onclick={run(index)}>
                              { option.label }
                          </button>
                      })
                  }
              </div>
          }
          <button class="btn primary fab-button" type="button" onclick={on_fab}>
              { "+" }
          </button>
      </div>
  }
}
