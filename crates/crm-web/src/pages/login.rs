use web_sys::{
  HtmlInputElement,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  InputEvent,
  Properties,
  TargetCast,
  UseStateHandle,
  function_component,
  html,
  use_state
};

use crate::components::use_toast;
use crate::hooks::use_client;

#[derive(Properties, PartialEq)]
pub struct LoginPageProps {
  pub on_signed_in: Callback<()>
}

fn bind(
  handle: &UseStateHandle<String>
) -> Callback<InputEvent> {
  let handle = handle.clone();
  Callback::from(move |e: InputEvent| {
    let input: HtmlInputElement =
      e.target_unchecked_into();
    handle.set(input.value());
  })
}

#[function_component(LoginPage)]
pub fn login_page(
  props: &LoginPageProps
) -> Html {
  let client = use_client();
  let toast = use_toast();
  let user = use_state(String::new);
  let password = use_state(String::new);
  let busy = use_state(|| false);

  let on_submit = {
    let user = user.clone();
    let password = password.clone();
    let busy = busy.clone();
    let on_signed_in = props.on_signed_in.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if user.trim().is_empty() || password.is_empty() {
        toast.emit("enter a user and a password".to_string());
        return;
      }
      busy.set(true);
      let client = client.clone();
      let user = user.trim().to_string();
      let password = (*password).clone();
      let busy = busy.clone();
      let toast = toast.clone();
      let on_signed_in = on_signed_in.clone();
      wasm_bindgen_futures::spawn_local(async move {
        let result = client.docs.login(&user, &password).await;
        busy.set(false);
        match result {
          | Ok(()) => {
            tracing::info!(%user, "signed in");
            on_signed_in.emit(());
            let home = client.core.config.guard.home.clone();
            client.history().navigate(&home);
          }
          | Err(err) => toast.emit(format!("login failed: {err}"))
        }
      });
    })
  };

  html! {
      <form class="panel login" onsubmit={on_submit}>
          <div class="header">{ "Sign in" }</div>
          <label class="field">
              <span>{ "User" }</span>
              <input type="text" value={(*user).clone()} oninput={bind(&user)} />
          </label>
          <label class="field">
              <span>{ "Password" }</span>
              <input type="password" value={(*password).clone()} oninput={bind(&password)} />
          </label>
          <button class="btn primary" type="submit" disabled={*busy}>
              { if *busy { "Signing in..." } else { "Sign in" } }
          </button>
      </form>
  }
}
