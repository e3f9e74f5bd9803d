use std::fmt;
use std::rc::Rc;

use crm_shared::{
  BoqDoc,
  CompanyDoc,
  ContactDoc,
  TaskDoc,
  TaskProfile
};
use serde_json::Value;

use crate::date_range::DateRange;

/// A function carried inside a dialog context. Two callbacks compare
/// equal only when they share the same allocation.
pub struct DialogCallback<T> {
  inner: Rc<dyn Fn(T)>
}

impl<T> DialogCallback<T> {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(T) + 'static
  {
    Self { inner: Rc::new(f) }
  }

  pub fn emit(&self, value: T) {
    (self.inner)(value);
  }
}

impl<T> Clone for DialogCallback<T> {
  fn clone(&self) -> Self {
    Self {
      inner: Rc::clone(&self.inner)
    }
  }
}

impl<T> PartialEq for DialogCallback<T> {
  fn eq(
    &self,
    other: &Self
  ) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }
}

impl<T> fmt::Debug for DialogCallback<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str("DialogCallback(..)")
  }
}

pub type ProfileCallback =
  DialogCallback<TaskProfile>;
pub type DateRangeCallback =
  DialogCallback<DateRange>;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
)]
pub enum TaskEditMode {
  #[default]
  Edit,
  UpdateStatus,
  ScheduleNext
}

impl TaskEditMode {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Edit => "edit",
      | Self::UpdateStatus => {
        "updateStatus"
      }
      | Self::ScheduleNext => {
        "scheduleNext"
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
)]
pub enum BoqEditMode {
  #[default]
  Details,
  Status,
  Attachment,
  AssignedEstimate
}

impl BoqEditMode {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Details => "details",
      | Self::Status => "status",
      | Self::Attachment => "attachment",
      | Self::AssignedEstimate => {
        "assigned-estimate"
      }
    }
  }
}

/// Parent links prefilled into a create form.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct ParentLink {
  pub company_id: Option<String>,
  pub contact_id: Option<String>
}

impl ParentLink {
  pub fn company(
    company_id: impl Into<String>
  ) -> Self {
    Self {
      company_id: Some(
        company_id.into()
      ),
      contact_id: None
    }
  }

  pub fn contact(
    contact_id: impl Into<String>
  ) -> Self {
    Self {
      company_id: None,
      contact_id: Some(
        contact_id.into()
      )
    }
  }
}

/// Links and profile for the task create forms.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct NewTaskContext {
  pub company_id:   Option<String>,
  pub contact_id:   Option<String>,
  pub boq_id:       Option<String>,
  pub task_id:      Option<String>,
  pub task_profile: Option<TaskProfile>
}

impl NewTaskContext {
  pub fn for_company(
    company_id: impl Into<String>
  ) -> Self {
    Self {
      company_id: Some(
        company_id.into()
      ),
      ..Self::default()
    }
  }

  pub fn for_contact(
    contact_id: impl Into<String>
  ) -> Self {
    Self {
      contact_id: Some(
        contact_id.into()
      ),
      ..Self::default()
    }
  }

  pub fn for_boq(
    boq_id: impl Into<String>
  ) -> Self {
    Self {
      boq_id: Some(boq_id.into()),
      ..Self::default()
    }
  }

  /// A follow-up to an existing task.
  pub fn follow_up(
    task_id: impl Into<String>
  ) -> Self {
    Self {
      task_id: Some(task_id.into()),
      ..Self::default()
    }
  }

  pub fn with_profile(
    mut self,
    profile: TaskProfile
  ) -> Self {
    self.task_profile = Some(profile);
    self
  }
}

#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct SelectTaskProfileContext {
  /// Passed through untouched to whichever task form is chosen.
  pub original:  NewTaskContext,
  pub on_select: Option<ProfileCallback>
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct EditCompanyContext {
  pub company: Option<CompanyDoc>
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct EditContactContext {
  pub contact: Option<ContactDoc>
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct EditBoqContext {
  pub boq:  Option<BoqDoc>,
  pub mode: BoqEditMode
}

/// Shared by the assign, remark and deal status forms.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct BoqContext {
  pub boq: Option<BoqDoc>
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct EditTaskContext {
  pub task: Option<TaskDoc>,
  pub mode: TaskEditMode
}

#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct DateRangeContext {
  pub initial:    Option<DateRange>,
  pub on_confirm: Option<DateRangeCallback>
}

#[derive(
  Debug, Clone, Default, PartialEq,
)]
pub struct StatsDetailContext {
  pub title: String,
  pub items: Vec<Value>
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct RenameContext {
  pub doctype:  String,
  pub doc_name: String
}

impl RenameContext {
  pub fn new(
    doctype: &str,
    doc_name: &str
  ) -> Self {
    Self {
      doctype:  doctype.to_string(),
      doc_name: doc_name.to_string()
    }
  }
}
