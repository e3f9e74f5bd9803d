use crm_shared::{
  TaskDoc,
  TaskProfile
};
use tracing::{
  debug,
  error,
  warn
};

use super::{
  DialogCallback,
  DialogId,
  DialogStore,
  EditTaskContext,
  NewTaskContext,
  SelectTaskProfileContext,
  TaskEditMode
};
use crate::session::Role;

/// Opens the create form for `profile`, stamping the profile into the
/// context.
pub fn open_task_creator(
  store: &DialogStore,
  profile: TaskProfile,
  context: NewTaskContext
) -> DialogId {
  let context =
    context.with_profile(profile);
  match profile {
    | TaskProfile::Sales => {
      store.open_new_task(context);
      DialogId::NewTask
    }
    | TaskProfile::Estimates => {
      store.open_new_estimation_task(
        context
      );
      DialogId::NewEstimationTask
    }
  }
}

/// Starts task creation for a user of `role`. Sales and Estimates
/// users get their own form directly; admins first pick a profile.
/// Returns the dialog that was opened.
#[tracing::instrument(skip(store, context))]
pub fn create_task(
  store: &DialogStore,
  role: &Role,
  context: NewTaskContext
) -> Option<DialogId> {
  if let Some(profile) =
    role.task_profile()
  {
    return Some(open_task_creator(
      store, profile, context
    ));
  }

  if !role.is_admin() {
    warn!(
      ?role,
      "role cannot create tasks"
    );
    return None;
  }

  let weak = store.downgrade();
  let original = context.clone();
  let on_select =
    DialogCallback::new(move |profile: TaskProfile| {
      let Some(store) = weak.upgrade()
      else {
        debug!(
          "dialog store dropped before \
           a task profile was chosen"
        );
        return;
      };
      open_task_creator(
        &store,
        profile,
        original.clone()
      );
    });

  store.open_select_task_profile(
    SelectTaskProfileContext {
      original:  context,
      on_select: Some(on_select)
    }
  );
  Some(DialogId::SelectTaskProfile)
}

/// Opens the edit form matching the task's profile. A task with no
/// profile is a data fault; it is reported and edited with the sales
/// form.
#[tracing::instrument(
  skip(store, task),
  fields(task = %task.name)
)]
pub fn open_task_editor(
  store: &DialogStore,
  task: TaskDoc,
  mode: TaskEditMode
) -> DialogId {
  let profile = match task.task_profile {
    | Some(profile) => profile,
    | None => {
      error!(
        task = %task.name,
        "task has no task_profile; \
         using the sales editor"
      );
      TaskProfile::Sales
    }
  };
  let context = EditTaskContext {
    task: Some(task),
    mode
  };
  match profile {
    | TaskProfile::Sales => {
      store.open_edit_task(context);
      DialogId::EditTask
    }
    | TaskProfile::Estimates => {
      store.open_edit_estimation_task(
        context
      );
      DialogId::EditEstimationTask
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dialogs::keys;

  #[test]
  fn sales_opens_sales_form_without_picker(
  ) {
    let store = DialogStore::new();
    let opened = create_task(
      &store,
      &Role::Sales,
      NewTaskContext::for_company("CMP-1")
    );

    assert_eq!(opened, Some(DialogId::NewTask));
    assert_eq!(store.open_keys(), vec![
      DialogId::NewTask
    ]);
    let context =
      store.get::<keys::NewTask>().context;
    assert_eq!(
      context.task_profile,
      Some(TaskProfile::Sales)
    );
    assert_eq!(
      context.company_id.as_deref(),
      Some("CMP-1")
    );
  }

  #[test]
  fn admin_picks_profile_then_picker_closes(
  ) {
    let store = DialogStore::new();
    create_task(
      &store,
      &Role::Admin,
      NewTaskContext::for_boq("BOQ-7")
    );
    assert_eq!(store.open_keys(), vec![
      DialogId::SelectTaskProfile
    ]);

    store.choose_task_profile(
      TaskProfile::Estimates
    );

    assert_eq!(store.open_keys(), vec![
      DialogId::NewEstimationTask
    ]);
    let context = store
      .get::<keys::NewEstimationTask>()
      .context;
    assert_eq!(
      context.boq_id.as_deref(),
      Some("BOQ-7")
    );
    assert_eq!(
      context.task_profile,
      Some(TaskProfile::Estimates)
    );
  }

  #[test]
  fn unknown_role_opens_nothing() {
    let store = DialogStore::new();
    assert_eq!(
      create_task(
        &store,
        &Role::Other("Guest".into()),
        NewTaskContext::default()
      ),
      None
    );
    assert!(!store.is_any_open());
  }

  #[test]
  fn editor_follows_profile_and_falls_back_to_sales(
  ) {
    let store = DialogStore::new();
    let estimate = TaskDoc {
      name: "TASK-1".into(),
      task_profile: Some(
        TaskProfile::Estimates
      ),
      ..TaskDoc::default()
    };
    assert_eq!(
      open_task_editor(
        &store,
        estimate,
        TaskEditMode::ScheduleNext
      ),
      DialogId::EditEstimationTask
    );
    assert_eq!(
      store
        .get::<keys::EditEstimationTask>()
        .context
        .mode,
      TaskEditMode::ScheduleNext
    );

    let unlabeled = TaskDoc {
      name: "TASK-2".into(),
      ..TaskDoc::default()
    };
    assert_eq!(
      open_task_editor(
        &store,
        unlabeled,
        TaskEditMode::UpdateStatus
      ),
      DialogId::EditTask
    );
    let context =
      store.get::<keys::EditTask>().context;
    assert_eq!(
      context.mode,
      TaskEditMode::UpdateStatus
    );
    assert_eq!(
      context
        .task
        .map(|task| task.name)
        .as_deref(),
      Some("TASK-2")
    );
  }
}
