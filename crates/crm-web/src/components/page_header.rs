use yew::{
  Html,
  Properties,
  function_component,
  html
};

use crate::hooks::use_client;

#[derive(Properties, PartialEq)]
pub struct PageHeaderProps {
  pub title:     &'static str,
  pub show_back: bool
}

#[function_component(PageHeader)]
pub fn page_header(
  props: &PageHeaderProps
) -> Html {
  let client = use_client();
  let back = {
    let history = client.history().clone();
    move |_| history.back()
  };

  html! {
      <div class="page-header">
          if props.show_back {
              <button class="btn" type="button" onclick={back}>{ "Back" }</button>
          }
          <h1>{ props.title }</h1>
      </div>
  }
}
