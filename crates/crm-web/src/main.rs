mod api;
mod app;
mod components;
mod history;
mod hooks;
mod pages;

const MOUNT_ID: &str = "app";

fn main() {
  console_error_panic_hook::set_once();
  wasm_tracing::set_as_global_default();

  tracing::info!(
    version = env!("CARGO_PKG_VERSION"),
    "starting CRM client"
  );

  // Without a mount point there is nothing to render into.
  let Some(root) = web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| {
      document.get_element_by_id(MOUNT_ID)
    })
  else {
    tracing::error!(
      mount = MOUNT_ID,
      "mount element missing; not starting"
    );
    return;
  };

  yew::Renderer::<app::App>::with_root(root)
    .render();
}
