//! Every modal in the client, with its open flag and typed context.
//!
//! A [`DialogStore`] is an explicit, cloneable handle. Components get
//! it injected; tests build their own. State only changes through the
//! named `open_*`/`close_*` actions, each of which notifies the
//! subscribers once the change is committed.
//!
//! Closing a dialog keeps its context so a closing form can still read
//! what it was opened with. Opening always replaces the context.

mod context;
mod tasks;

use std::cell::RefCell;
use std::rc::{
  Rc,
  Weak
};

pub use context::{
  BoqContext,
  BoqEditMode,
  DateRangeCallback,
  DateRangeContext,
  DialogCallback,
  EditBoqContext,
  EditCompanyContext,
  EditContactContext,
  EditTaskContext,
  NewTaskContext,
  ParentLink,
  ProfileCallback,
  RenameContext,
  SelectTaskProfileContext,
  StatsDetailContext,
  TaskEditMode
};
use crm_shared::TaskProfile;
pub use tasks::{
  create_task,
  open_task_creator,
  open_task_editor
};
use tracing::{
  debug,
  trace,
  warn
};

use crate::date_range::DateRange;

/// Open flag plus the context the dialog was last opened with.
#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct Dialog<C> {
  pub is_open: bool,
  pub context: C
}

/// Ties a marker type in [`keys`] to its slot in [`DialogState`].
pub trait DialogKey: 'static {
  type Context: Clone
    + Default
    + PartialEq
    + std::fmt::Debug
    + 'static;

  const ID: DialogId;

  fn slot(
    state: &DialogState
  ) -> &Dialog<Self::Context>;

  fn slot_mut(
    state: &mut DialogState
  ) -> &mut Dialog<Self::Context>;
}

macro_rules! dialog_registry {
  ($(
    $key:ident => $field:ident: $ctx:ty,
      $open:ident / $close:ident;
  )+) => {
    #[derive(
      Debug,
      Clone,
      Copy,
      PartialEq,
      Eq,
      Hash,
      PartialOrd,
      Ord,
    )]
    pub enum DialogId {
      $($key),+
    }

    impl DialogId {
      pub const ALL: &'static [DialogId] =
        &[$(DialogId::$key),+];

      pub fn name(self) -> &'static str {
        match self {
          $(| DialogId::$key => stringify!($field)),+
        }
      }
    }

    #[derive(
      Debug, Clone, Default, PartialEq,
    )]
    pub struct DialogState {
      $(pub $field: Dialog<$ctx>),+
    }

    impl DialogState {
      pub fn is_open(
        &self,
        id: DialogId
      ) -> bool {
        match id {
          $(| DialogId::$key => self.$field.is_open),+
        }
      }
    }

    /// Marker types naming each dialog for [`DialogStore::get`].
    pub mod keys {
      use super::*;

      $(
        #[derive(Debug, Clone, Copy)]
        pub struct $key;

        impl DialogKey for $key {
          type Context = $ctx;

          const ID: DialogId = DialogId::$key;

          fn slot(
            state: &DialogState
          ) -> &Dialog<$ctx> {
            &state.$field
          }

          fn slot_mut(
            state: &mut DialogState
          ) -> &mut Dialog<$ctx> {
            &mut state.$field
          }
        }
      )+
    }

    impl DialogStore {
      $(
        pub fn $open(&self, context: $ctx) {
          self.open::<keys::$key>(context);
        }

        pub fn $close(&self) {
          self.close::<keys::$key>();
        }
      )+
    }
  };
}

dialog_registry! {
  NewCompany => new_company: (),
    open_new_company / close_new_company;
  NewContact => new_contact: ParentLink,
    open_new_contact / close_new_contact;
  NewBoq => new_boq: ParentLink,
    open_new_boq / close_new_boq;
  NewTask => new_task: NewTaskContext,
    open_new_task / close_new_task;
  NewEstimationTask => new_estimation_task: NewTaskContext,
    open_new_estimation_task / close_new_estimation_task;
  EditTask => edit_task: EditTaskContext,
    open_edit_task / close_edit_task;
  EditEstimationTask => edit_estimation_task: EditTaskContext,
    open_edit_estimation_task / close_edit_estimation_task;
  SelectTaskProfile => select_task_profile: SelectTaskProfileContext,
    open_select_task_profile / close_select_task_profile;
  EditCompany => edit_company: EditCompanyContext,
    open_edit_company / close_edit_company;
  EditContact => edit_contact: EditContactContext,
    open_edit_contact / close_edit_contact;
  EditBoq => edit_boq: EditBoqContext,
    open_edit_boq / close_edit_boq;
  AssignBoq => assign_boq: BoqContext,
    open_assign_boq / close_assign_boq;
  RemarkBoq => remark_boq: BoqContext,
    open_remark_boq / close_remark_boq;
  EditDealStatus => edit_deal_status: BoqContext,
    open_edit_deal_status / close_edit_deal_status;
  DateRangePicker => date_range_picker: DateRangeContext,
    open_date_range_picker / close_date_range_picker;
  StatsDetail => stats_detail: StatsDetailContext,
    open_stats_detail / close_stats_detail;
  UserProfile => user_profile: (),
    open_user_profile / close_user_profile;
  NewUser => new_user: (),
    open_new_user / close_new_user;
  RenameBoqName => rename_boq_name: RenameContext,
    open_rename_boq_name / close_rename_boq_name;
  RenameCompanyName => rename_company_name: RenameContext,
    open_rename_company_name / close_rename_company_name;
  RenameContactName => rename_contact_name: RenameContext,
    open_rename_contact_name / close_rename_contact_name;
}

type Listener = Rc<dyn Fn(DialogId)>;

#[derive(Default)]
struct StoreInner {
  state:     DialogState,
  next_id:   u64,
  listeners: Vec<(u64, Listener)>
}

#[derive(Clone, Default)]
pub struct DialogStore {
  inner: Rc<RefCell<StoreInner>>
}

/// Non-owning handle; used by callbacks stored inside contexts.
#[derive(Clone, Default)]
pub struct WeakDialogStore {
  inner: Weak<RefCell<StoreInner>>
}

impl WeakDialogStore {
  pub fn upgrade(
    &self
  ) -> Option<DialogStore> {
    self
      .inner
      .upgrade()
      .map(|inner| DialogStore { inner })
  }
}

/// Keeps a store listener registered; dropping it unsubscribes.
#[must_use]
pub struct DialogSubscription {
  id:    u64,
  inner: Weak<RefCell<StoreInner>>
}

impl Drop for DialogSubscription {
  fn drop(&mut self) {
    if let Some(inner) =
      self.inner.upgrade()
    {
      inner
        .borrow_mut()
        .listeners
        .retain(|(id, _)| *id != self.id);
    }
  }
}

impl PartialEq for DialogStore {
  fn eq(
    &self,
    other: &Self
  ) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }
}

impl std::fmt::Debug for DialogStore {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>
  ) -> std::fmt::Result {
    f.debug_struct("DialogStore")
      .field("open", &self.open_keys())
      .finish()
  }
}

impl DialogStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn downgrade(
    &self
  ) -> WeakDialogStore {
    WeakDialogStore {
      inner: Rc::downgrade(&self.inner)
    }
  }

  /// Snapshot of every dialog.
  pub fn state(&self) -> DialogState {
    self.inner.borrow().state.clone()
  }

  pub fn get<K: DialogKey>(
    &self
  ) -> Dialog<K::Context> {
    K::slot(&self.inner.borrow().state)
      .clone()
  }

  pub fn is_open<K: DialogKey>(
    &self
  ) -> bool {
    K::slot(&self.inner.borrow().state)
      .is_open
  }

  pub fn is_any_open(&self) -> bool {
    let inner = self.inner.borrow();
    DialogId::ALL
      .iter()
      .any(|id| inner.state.is_open(*id))
  }

  /// Open dialogs in declaration order.
  pub fn open_keys(&self) -> Vec<DialogId> {
    let inner = self.inner.borrow();
    DialogId::ALL
      .iter()
      .copied()
      .filter(|id| inner.state.is_open(*id))
      .collect()
  }

  /// Calls `listener` with the affected dialog after every action.
  pub fn subscribe<F>(
    &self,
    listener: F
  ) -> DialogSubscription
  where
    F: Fn(DialogId) + 'static
  {
    let mut inner =
      self.inner.borrow_mut();
    let id = inner.next_id;
    inner.next_id += 1;
    inner
      .listeners
      .push((id, Rc::new(listener)));
    DialogSubscription {
      id,
      inner: Rc::downgrade(&self.inner)
    }
  }

  /// The profile picker's action: hands `profile` to the callback it
  /// was opened with, then closes the picker.
  #[tracing::instrument(skip(self))]
  pub fn choose_task_profile(
    &self,
    profile: TaskProfile
  ) {
    let picker =
      self.get::<keys::SelectTaskProfile>();
    if !picker.is_open {
      warn!(
        "task profile chosen while the \
         picker is closed; ignoring"
      );
      return;
    }
    match picker.context.on_select {
      | Some(on_select) => {
        on_select.emit(profile)
      }
      | None => warn!(
        "task profile picker has no \
         selection handler"
      )
    }
    self.close_select_task_profile();
  }

  /// The date picker's action: hands `range` to the callback it was
  /// opened with, then closes the picker.
  #[tracing::instrument(skip(self))]
  pub fn confirm_date_range(
    &self,
    range: DateRange
  ) {
    let picker =
      self.get::<keys::DateRangePicker>();
    if !picker.is_open {
      warn!(
        "date range confirmed while the \
         picker is closed; ignoring"
      );
      return;
    }
    if let Some(on_confirm) =
      picker.context.on_confirm
    {
      on_confirm.emit(range);
    }
    self.close_date_range_picker();
  }

  fn open<K: DialogKey>(
    &self,
    context: K::Context
  ) {
    {
      let mut inner =
        self.inner.borrow_mut();
      let slot =
        K::slot_mut(&mut inner.state);
      slot.is_open = true;
      slot.context = context;
    }
    debug!(
      dialog = K::ID.name(),
      "opened dialog"
    );
    self.notify(K::ID);
  }

  fn close<K: DialogKey>(&self) {
    let was_open = {
      let mut inner =
        self.inner.borrow_mut();
      let slot =
        K::slot_mut(&mut inner.state);
      std::mem::take(&mut slot.is_open)
    };
    if was_open {
      debug!(
        dialog = K::ID.name(),
        "closed dialog"
      );
    } else {
      trace!(
        dialog = K::ID.name(),
        "close requested for a closed \
         dialog"
      );
    }
    self.notify(K::ID);
  }

  fn notify(&self, id: DialogId) {
    let listeners: Vec<Listener> = self
      .inner
      .borrow()
      .listeners
      .iter()
      .map(|(_, listener)| {
        Rc::clone(listener)
      })
      .collect();
    for listener in listeners {
      listener(id);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;

  use crm_shared::CompanyDoc;

  use super::*;

  #[test]
  fn close_keeps_context_and_reopen_overwrites(
  ) {
    let store = DialogStore::new();
    store.open_new_contact(ParentLink::company("CMP-1"));
    let dialog =
      store.get::<keys::NewContact>();
    assert!(dialog.is_open);

    store.close_new_contact();
    let dialog =
      store.get::<keys::NewContact>();
    assert!(!dialog.is_open);
    assert_eq!(
      dialog.context.company_id.as_deref(),
      Some("CMP-1")
    );

    store.open_new_contact(
      ParentLink::default()
    );
    assert_eq!(
      store
        .get::<keys::NewContact>()
        .context
        .company_id,
      None
    );
  }

  #[test]
  fn dialogs_stack_without_closing_each_other(
  ) {
    let store = DialogStore::new();
    store.open_edit_company(
      EditCompanyContext {
        company: Some(CompanyDoc {
          name: "CMP-1".into(),
          ..CompanyDoc::default()
        })
      }
    );
    store.open_rename_company_name(
      RenameContext::new(
        crm_shared::COMPANY_DOCTYPE,
        "CMP-1"
      )
    );

    assert_eq!(store.open_keys(), vec![
      DialogId::EditCompany,
      DialogId::RenameCompanyName
    ]);
    store.close_rename_company_name();
    assert!(store.is_open::<keys::EditCompany>());
    assert!(store.is_any_open());
  }

  #[test]
  fn subscribers_are_notified_outside_the_borrow(
  ) {
    let store = DialogStore::new();
    let seen = Rc::new(Cell::new(0));
    let sub = {
      let seen = Rc::clone(&seen);
      let reader = store.clone();
      store.subscribe(move |id| {
        // Reading the store from a listener must not panic.
        let _ = reader.state().is_open(id);
        seen.set(seen.get() + 1);
      })
    };

    store.open_user_profile(());
    store.close_user_profile();
    assert_eq!(seen.get(), 2);

    drop(sub);
    store.open_new_user(());
    assert_eq!(seen.get(), 2);
  }

  #[test]
  fn date_range_confirm_calls_back_and_closes(
  ) {
    let store = DialogStore::new();
    let picked = Rc::new(RefCell::new(None));
    let on_confirm = {
      let picked = Rc::clone(&picked);
      DialogCallback::new(move |range: DateRange| {
        *picked.borrow_mut() = Some(range);
      })
    };
    store.open_date_range_picker(
      DateRangeContext {
        initial:    None,
        on_confirm: Some(on_confirm)
      }
    );

    let day = chrono::NaiveDate::from_ymd_opt(
      2026, 5, 1
    )
    .expect("date");
    store.confirm_date_range(
      DateRange::new(day, day)
    );

    assert!(picked.borrow().is_some());
    assert!(
      !store.is_open::<keys::DateRangePicker>()
    );
  }

  #[test]
  fn every_dialog_starts_closed() {
    let store = DialogStore::new();
    assert!(!store.is_any_open());
    assert_eq!(
      DialogId::ALL.len(),
      21
    );
    assert_eq!(
      DialogId::SelectTaskProfile.name(),
      "select_task_profile"
    );
  }
}
