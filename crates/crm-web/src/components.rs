mod dialog_forms;
mod dialog_host;
mod fab_menu;
mod modal;
mod nav_bar;
mod page_header;
mod record_list;
mod spinner;
mod toasts;

pub use dialog_host::DialogHost;
pub use fab_menu::FabMenu;
pub use modal::Modal;
pub use nav_bar::NavBar;
pub use page_header::PageHeader;
pub use record_list::{
  RecordList,
  RecordRow
};
pub use spinner::Spinner;
pub use toasts::{
  ToastAction,
  ToastArea,
  Toasts,
  ToastsHandle,
  use_toast
};
