use chrono::Local;
use crm_core::dialogs::{
  NewTaskContext,
  TaskEditMode,
  create_task,
  open_task_editor
};
use crm_core::route::TaskVariant;
use crm_shared::store::{
  Filter,
  FilterOp,
  ListArgs,
  OrderBy
};
use crm_shared::{
  TASK_DOCTYPE,
  TaskDoc
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

use super::fetch_view;
use super::records::{
  DetailProps,
  ListPageProps,
  use_select_record
};
use crate::components::{
  RecordList,
  RecordRow
};
use crate::hooks::{
  use_client,
  use_doc_list,
  use_session
};

/// Status a task carries until someone reports on it.
const SCHEDULED: &str = "Scheduled";

pub(super) fn task_row(
  doc: &TaskDoc
) -> RecordRow {
  let title = doc
    .title
    .clone()
    .or_else(|| doc.task_type.clone())
    .unwrap_or_else(|| doc.name.clone());
  let when = [doc.start_date.as_deref(), doc.time.as_deref()]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");
  let with = doc
    .contact
    .as_deref()
    .or(doc.company.as_deref())
    .unwrap_or_default();
  RecordRow {
    id:     doc.name.clone(),
    title,
    meta:   if with.is_empty() {
      when
    } else {
      format!("{when} · {with}")
    },
    status: doc.status.clone()
  }
}

#[function_component(TasksPage)]
pub fn tasks_page(
  props: &ListPageProps
) -> Html {
  let fetch = use_doc_list::<TaskDoc>(
    ListArgs::new(TASK_DOCTYPE)
  );
  let select = use_select_record();
  html! {
      <div class="split">
          { fetch_view(&fetch, |docs| html! {
              <RecordList title="Tasks" rows={docs.iter().map(task_row).collect::<Vec<_>>()}
                  selected={props.selected.clone()} on_select={select.clone()} />
          }) }
          if let Some(id) = props.selected.clone() {
              <TaskDetail id={id} />
          }
      </div>
  }
}

#[function_component(TaskDetail)]
pub fn task_detail(
  props: &DetailProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let fetch = use_doc_list::<TaskDoc>(
    ListArgs::new(TASK_DOCTYPE)
      .filter(Filter::eq("name", props.id.clone()))
      .limit(Some(1))
  );
  let role = session.role().cloned();

  fetch_view(&fetch, |docs| {
    let Some(task) = docs.first().cloned() else {
      return html! { <div class="panel empty">{ "Task not found." }</div> };
    };
    let edit = |mode: TaskEditMode| {
      let store = client.dialogs().clone();
      let task = task.clone();
      Callback::from(move |_: MouseEvent| {
        open_task_editor(&store, task.clone(), mode);
      })
    };
    let follow_up = {
      let store = client.dialogs().clone();
      let role = role.clone();
      let ctx = NewTaskContext {
        company_id: task.company.clone(),
        contact_id: task.contact.clone(),
        boq_id: task.boq.clone(),
        ..NewTaskContext::follow_up(task.name.clone())
      };
      Callback::from(move |_: MouseEvent| {
        if let Some(role) = role.as_ref() {
          create_task(&store, role, ctx.clone());
        }
      })
    };
    let field = |value: &Option<String>| {
      value.clone().unwrap_or_else(|| "-".to_string())
    };

    html! {
        <div class="panel details">
            <div class="header">{ task_row(&task).title }</div>
            <dl>
                <dt>{ "Type" }</dt><dd>{ field(&task.task_type) }</dd>
                <dt>{ "When" }</dt><dd>{ format!("{} {}", field(&task.start_date), field(&task.time)) }</dd>
                <dt>{ "Status" }</dt><dd>{ field(&task.status) }</dd>
                <dt>{ "Company" }</dt><dd>{ field(&task.company) }</dd>
                <dt>{ "Contact" }</dt><dd>{ field(&task.contact) }</dd>
                <dt>{ "BOQ" }</dt><dd>{ field(&task.boq) }</dd>
                <dt>{ "Remarks" }</dt><dd>{ field(&task.remarks) }</dd>
            </dl>
            <div class="actions">
                <button class="btn" type="button" onclick={edit(TaskEditMode::Edit)}>{ "Edit" }</button>
                <button class="btn" type="button" onclick={edit(TaskEditMode::UpdateStatus)}>{ "Update status" }</button>
                <button class="btn" type="button" onclick={edit(TaskEditMode::ScheduleNext)}>{ "Schedule next" }</button>
                <button class="btn" type="button" onclick={follow_up}>{ "Follow-up" }</button>
            </div>
        </div>
    }
  })
}

/// Listing arguments for the pending, upcoming and history task views.
pub(super) fn variant_args(
  variant: TaskVariant,
  today: &str
) -> ListArgs {
  let base = ListArgs::new(TASK_DOCTYPE);
  match variant {
    | TaskVariant::Pending => base
      .filter(Filter::eq("status", SCHEDULED))
      .filter(Filter::new("start_date", FilterOp::Lte, today))
      .order_by(OrderBy::asc("start_date")),
    | TaskVariant::Upcoming => base
      .filter(Filter::eq("status", SCHEDULED))
      .filter(Filter::new("start_date", FilterOp::Gte, today))
      .order_by(OrderBy::asc("start_date")),
    | TaskVariant::History => base
      .filter(Filter::new("status", FilterOp::NotEq, SCHEDULED))
      .order_by(OrderBy::desc("start_date"))
  }
}

#[derive(Properties, PartialEq)]
pub struct TaskVariantProps {
  pub variant: TaskVariant
}

#[function_component(TaskVariantPage)]
pub fn task_variant_page(
  props: &TaskVariantProps
) -> Html {
  let client = use_client();
  let today = Local::now().date_naive().to_string();
  let fetch = use_doc_list::<TaskDoc>(variant_args(
    props.variant,
    &today
  ));
  let open = Callback::from(move |id: String| {
    client.history().navigate(&format!(
      "/tasks/task?id={}",
      String::from(js_sys::encode_uri_component(&id))
    ));
  });
  let title = match props.variant {
    | TaskVariant::History => "Task history",
    | TaskVariant::Pending => "Pending tasks",
    | TaskVariant::Upcoming => "Upcoming tasks"
  };

  fetch_view(&fetch, |docs| html! {
      <RecordList title={title} rows={docs.iter().map(task_row).collect::<Vec<_>>()}
          selected={None::<String>} on_select={open} />
  })
}
