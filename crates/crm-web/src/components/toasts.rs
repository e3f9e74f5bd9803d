use std::rc::Rc;

use yew::{
  Callback,
  Html,
  Reducible,
  UseReducerHandle,
  function_component,
  hook,
  html,
  use_context
};

const MAX_TOASTS: usize = 4;

/// Store and network errors waiting to be read.
#[derive(
  Clone, Debug, Default, PartialEq,
)]
pub struct Toasts {
  next_id: u64,
  items:   Vec<(u64, String)>
}

pub enum ToastAction {
  Push(String),
  Dismiss(u64)
}

impl From<String> for ToastAction {
  fn from(message: String) -> Self {
    Self::Push(message)
  }
}

impl Reducible for Toasts {
  type Action = ToastAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    apply(&self, action)
  }
}

fn apply(
  toasts: &Toasts,
  action: ToastAction
) -> Rc<Toasts> {
  let mut next = toasts.clone();
  match action {
    | ToastAction::Push(message) => {
      next
        .items
        .push((next.next_id, message));
      next.next_id += 1;
      if next.items.len() > MAX_TOASTS {
        next.items.remove(0);
      }
    }
    | ToastAction::Dismiss(id) => {
      next
        .items
        .retain(|(item, _)| *item != id);
    }
  }
  Rc::new(next)
}

pub type ToastsHandle =
  UseReducerHandle<Toasts>;

/// Reports an error to the user.
#[hook]
pub fn use_toast() -> Callback<String> {
  let toasts =
    use_context::<ToastsHandle>();
  Callback::from(move |message: String| {
    tracing::warn!(%message, "showing error toast");
    if let Some(toasts) = toasts.as_ref() {
      toasts.dispatch(message.into());
    }
  })
}

#[function_component(ToastArea)]
pub fn toast_area() -> Html {
  let Some(toasts) =
    use_context::<ToastsHandle>()
  else {
    return html! {};
  };
  let visible = toasts.items.clone();

  html! {
      <div class="toast-area">
          {
              for visible.into_iter().map(|(id, message)| {
                  let toasts = toasts.clone();
                  html! {
                      <div class="toast error" onclick={move |_| toasts.dispatch(ToastAction::Dismiss(id))}>
                          { message }
                      </div>
                  }
              })
          }
      </div>
  }
}
