use crm_core::nav::nav_items;
use crm_core::route::Section;
use yew::{
  Html,
  Properties,
  function_component,
  html
};

use crate::hooks::{
  use_client,
  use_session
};

#[derive(Properties, PartialEq)]
pub struct NavBarProps {
  pub active: Option<Section>
}

#[function_component(NavBar)]
pub fn nav_bar(
  props: &NavBarProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let Some(user) = session.session()
  else {
    return html! {};
  };

  let items =
    nav_items(&user.role, user.has_company);
  let on_profile = {
    let dialogs =
      client.dialogs().clone();
    move |_| dialogs.open_user_profile(())
  };

  html! {
      <div class="panel sidebar">
          <div class="header">{ "CRM" }</div>
          {
              for items.into_iter().map(|item| {
                  let class = if props.active == Some(item.section) {
                      "item active"
                  } else {
                      "item"
                  };
                  let history = client.history().clone();
                  html! {
                      <div class={class} onclick={move |_| history.navigate(item.path())}>
                          { item.label }
                      </div>
                  }
              })
          }
          <div class="item profile" onclick={on_profile}>
              { &user.full_name }
          </div>
      </div>
  }
}
