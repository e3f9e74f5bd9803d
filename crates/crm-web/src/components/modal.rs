use yew::{
  Callback,
  Children,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ModalProps {
  pub title:    String,
  pub on_close: Callback<()>,
  #[prop_or_default]
  pub footer:   Html,
  #[prop_or_default]
  pub children: Children
}

/// Backdrop plus a small centered panel. Clicking the backdrop closes;
/// clicks inside the panel stay inside.
#[function_component(Modal)]
pub fn modal(
  props: &ModalProps
) -> Html {
  let close = {
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| {
      on_close.emit(())
    })
  };

  html! {
      <div class="modal-backdrop" onclick={close.clone()}>
          <div class="modal modal-sm" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
              <div class="header">{ &props.title }</div>
              <div class="content">
                  { for props.children.iter() }
              </div>
              <div class="footer">
                  { props.footer.clone() }
                  <button class="btn" type="button" onclick={close}>
                      { "Close" }
                  </button>
              </div>
          </div>
      </div>
  }
}
