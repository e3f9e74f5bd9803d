use std::collections::BTreeMap;

use chrono::{
  Local,
  NaiveDate
};
use crm_core::date_range::DateRange;
use crm_core::dialogs::{
  BoqEditMode,
  DialogState,
  DialogStore,
  NewTaskContext,
  ParentLink,
  TaskEditMode
};
use crm_shared::{
  BOQ_DOCTYPE,
  BoqDoc,
  COMPANY_DOCTYPE,
  CONTACT_DOCTYPE,
  TASK_DOCTYPE,
  TaskDoc,
  TaskProfile,
  USER_DOCTYPE
};
use serde_json::Value;
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  InputEvent,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

use super::dialog_forms::{
  DocForm,
  Field,
  Submit,
  date,
  initial_values,
  text
};
use super::{
  Modal,
  use_toast
};
use crate::hooks::{
  use_client,
  use_dialog_state,
  use_session
};

const COMPANY_FIELDS: &[Field] = &[
  text("company_name", "Company name"),
  text("company_type", "Type"),
  text("company_city", "City"),
  text("company_website", "Website")
];

const CONTACT_FIELDS: &[Field] = &[
  text("first_name", "First name"),
  text("last_name", "Last name"),
  text("mobile", "Mobile"),
  text("email", "Email"),
  text("designation", "Designation"),
  text("department", "Department")
];

const BOQ_FIELDS: &[Field] = &[
  text("boq_name", "BOQ name"),
  text("boq_value", "Value"),
  date("boq_submission_date", "Submission date"),
  text("city", "City")
];

const TASK_FIELDS: &[Field] = &[
  text("type", "Type"),
  date("start_date", "Date"),
  Field {
    name:  "time",
    label: "Time",
    input: "time"
  },
  text("remarks", "Remarks")
];

const TASK_STATUS_FIELDS: &[Field] = &[
  text("status", "Status"),
  text("reason", "Reason"),
  text("remarks", "Remarks")
];

const RENAME_FIELDS: &[Field] =
  &[text("new_name", "New name")];

const BOQ_STATUS_FIELDS: &[Field] = &[
  text("boq_status", "Status"),
  text("boq_sub_status", "Sub status"),
  text("remarks", "Remarks")
];

const BOQ_ATTACHMENT_FIELDS: &[Field] =
  &[text("boq_link", "Attachment link")];

const BOQ_ESTIMATE_FIELDS: &[Field] = &[text(
  "assigned_estimations",
  "Assigned estimator"
)];

const BOQ_ASSIGN_FIELDS: &[Field] = &[
  text("assigned_sales", "Sales"),
  text("assigned_estimations", "Estimations")
];

const BOQ_REMARK_FIELDS: &[Field] =
  &[text("remarks", "Remarks")];

const DEAL_STATUS_FIELDS: &[Field] =
  &[text("deal_status", "Deal status")];

const USER_FIELDS: &[Field] = &[
  text("email", "Email"),
  text("first_name", "First name"),
  text("last_name", "Last name"),
  text("nirmaan_role_name", "Role")
];

fn closer(
  store: &DialogStore,
  close: fn(&DialogStore)
) -> Callback<()> {
  let store = store.clone();
  Callback::from(move |()| close(&store))
}

fn insert_link(
  fixed: &mut BTreeMap<String, Value>,
  key: &str,
  value: Option<&String>
) {
  if let Some(value) = value {
    fixed.insert(
      key.to_string(),
      Value::String(value.clone())
    );
  }
}

fn parent_fixed(
  link: &ParentLink
) -> BTreeMap<String, Value> {
  let mut fixed = BTreeMap::new();
  insert_link(
    &mut fixed,
    "company",
    link.company_id.as_ref()
  );
  insert_link(
    &mut fixed,
    "contact",
    link.contact_id.as_ref()
  );
  fixed
}

fn new_task_fixed(
  ctx: &NewTaskContext,
  profile: TaskProfile
) -> BTreeMap<String, Value> {
  let mut fixed = parent_fixed(&ParentLink {
    company_id: ctx.company_id.clone(),
    contact_id: ctx.contact_id.clone()
  });
  insert_link(&mut fixed, "boq", ctx.boq_id.as_ref());
  insert_link(
    &mut fixed,
    "reference_task",
    ctx.task_id.as_ref()
  );
  fixed.insert(
    "task_profile".to_string(),
    Value::String(profile.as_str().to_string())
  );
  fixed
}

/// Links carried from an existing task into its scheduled successor.
fn follow_up_fixed(
  task: &TaskDoc
) -> BTreeMap<String, Value> {
  let ctx = NewTaskContext {
    company_id:   task.company.clone(),
    contact_id:   task.contact.clone(),
    boq_id:       task.boq.clone(),
    task_id:      Some(task.name.clone()),
    task_profile: task.task_profile
  };
  new_task_fixed(
    &ctx,
    task.task_profile.unwrap_or(TaskProfile::Sales)
  )
}

fn task_form(
  store: &DialogStore,
  task: Option<&TaskDoc>,
  mode: TaskEditMode,
  close: fn(&DialogStore)
) -> Html {
  let Some(task) = task else {
    return html! {};
  };
  let on_close = closer(store, close);
  match mode {
    | TaskEditMode::Edit => html! {
        <DocForm
            title={format!("Edit task {}", task.name)}
            doctype={TASK_DOCTYPE}
            fields={TASK_FIELDS.to_vec()}
            initial={initial_values(Some(task), TASK_FIELDS)}
            submit={Submit::Update(task.name.clone())}
            on_close={on_close} />
    },
    | TaskEditMode::UpdateStatus => html! {
        <DocForm
            title={format!("Update status of {}", task.name)}
            doctype={TASK_DOCTYPE}
            fields={TASK_STATUS_FIELDS.to_vec()}
            initial={initial_values(Some(task), TASK_STATUS_FIELDS)}
            submit={Submit::Update(task.name.clone())}
            on_close={on_close} />
    },
    | TaskEditMode::ScheduleNext => html! {
        <DocForm
            title={"Schedule next task".to_string()}
            doctype={TASK_DOCTYPE}
            fields={TASK_FIELDS.to_vec()}
            fixed={follow_up_fixed(task)}
            submit={Submit::Create}
            on_close={on_close} />
    }
  }
}

fn boq_form(
  store: &DialogStore,
  state: &DialogState
) -> Html {
  let ctx = &state.edit_boq.context;
  let Some(boq) = ctx.boq.as_ref() else {
    return html! {};
  };
  let fields: &[Field] = match ctx.mode {
    | BoqEditMode::Details => BOQ_FIELDS,
    | BoqEditMode::Status => BOQ_STATUS_FIELDS,
    | BoqEditMode::Attachment => {
      BOQ_ATTACHMENT_FIELDS
    }
    | BoqEditMode::AssignedEstimate => {
      BOQ_ESTIMATE_FIELDS
    }
  };
  html! {
      <DocForm
          title={format!("Edit {} ({})", boq.name, ctx.mode.as_str())}
          doctype={BOQ_DOCTYPE}
          fields={fields.to_vec()}
          initial={initial_values(Some(boq), fields)}
          submit={Submit::Update(boq.name.clone())}
          on_close={closer(store, DialogStore::close_edit_boq)} />
  }
}

fn simple_boq_form(
  store: &DialogStore,
  boq: Option<&BoqDoc>,
  title: &str,
  fields: &'static [Field],
  close: fn(&DialogStore)
) -> Html {
  let Some(boq) = boq else {
    return html! {};
  };
  html! {
      <DocForm
          title={format!("{title}: {}", boq.name)}
          doctype={BOQ_DOCTYPE}
          fields={fields.to_vec()}
          initial={initial_values(Some(boq), fields)}
          submit={Submit::Update(boq.name.clone())}
          on_close={closer(store, close)} />
  }
}

fn rename_form(
  store: &DialogStore,
  doctype: &'static str,
  doc_name: &str,
  close: fn(&DialogStore)
) -> Html {
  html! {
      <DocForm
          title={format!("Rename {doc_name}")}
          doctype={doctype}
          fields={RENAME_FIELDS.to_vec()}
          submit={Submit::Rename(doc_name.to_string())}
          on_close={closer(store, close)} />
  }
}

#[derive(Properties, PartialEq)]
pub struct DialogHostProps {
  pub on_signed_out: Callback<()>
}

/// Renders every open dialog. Mounted once, under the page content.
#[function_component(DialogHost)]
pub fn dialog_host(
  props: &DialogHostProps
) -> Html {
  let client = use_client();
  let state = use_dialog_state();
  let store = client.dialogs();
  let mut open = Vec::<Html>::new();

  if state.new_company.is_open {
    open.push(html! {
        <DocForm
            title={"New company".to_string()}
            doctype={COMPANY_DOCTYPE}
            fields={COMPANY_FIELDS.to_vec()}
            submit={Submit::Create}
            on_close={closer(store, DialogStore::close_new_company)} />
    });
  }
  if state.new_contact.is_open {
    open.push(html! {
        <DocForm
            title={"New contact".to_string()}
            doctype={CONTACT_DOCTYPE}
            fields={CONTACT_FIELDS.to_vec()}
            fixed={parent_fixed(&state.new_contact.context)}
            submit={Submit::Create}
            on_close={closer(store, DialogStore::close_new_contact)} />
    });
  }
  if state.new_boq.is_open {
    open.push(html! {
        <DocForm
            title={"New BOQ".to_string()}
            doctype={BOQ_DOCTYPE}
            fields={BOQ_FIELDS.to_vec()}
            fixed={parent_fixed(&state.new_boq.context)}
            submit={Submit::Create}
            on_close={closer(store, DialogStore::close_new_boq)} />
    });
  }
  if state.new_task.is_open {
    open.push(html! {
        <DocForm
            title={"New task".to_string()}
            doctype={TASK_DOCTYPE}
            fields={TASK_FIELDS.to_vec()}
            fixed={new_task_fixed(&state.new_task.context, TaskProfile::Sales)}
            submit={Submit::Create}
            on_close={closer(store, DialogStore::close_new_task)} />
    });
  }
  if state.new_estimation_task.is_open {
    open.push(html! {
        <DocForm
            title={"New estimation task".to_string()}
            doctype={TASK_DOCTYPE}
            fields={TASK_FIELDS.to_vec()}
            fixed={new_task_fixed(&state.new_estimation_task.context, TaskProfile::Estimates)}
            submit={Submit::Create}
            on_close={closer(store, DialogStore::close_new_estimation_task)} />
    });
  }
  if state.edit_task.is_open {
    let ctx = &state.edit_task.context;
    open.push(task_form(
      store,
      ctx.task.as_ref(),
      ctx.mode,
      DialogStore::close_edit_task
    ));
  }
  if state.edit_estimation_task.is_open {
    let ctx = &state.edit_estimation_task.context;
    open.push(task_form(
      store,
      ctx.task.as_ref(),
      ctx.mode,
      DialogStore::close_edit_estimation_task
    ));
  }
  if state.select_task_profile.is_open {
    open.push(html! { <ProfilePicker /> });
  }
  if state.edit_company.is_open
    && let Some(company) =
      state.edit_company.context.company.as_ref()
  {
    open.push(html! {
        <DocForm
            title={format!("Edit {}", company.name)}
            doctype={COMPANY_DOCTYPE}
            fields={COMPANY_FIELDS.to_vec()}
            initial={initial_values(Some(company), COMPANY_FIELDS)}
            submit={Submit::Update(company.name.clone())}
            on_close={closer(store, DialogStore::close_edit_company)} />
    });
  }
  if state.edit_contact.is_open
    && let Some(contact) =
      state.edit_contact.context.contact.as_ref()
  {
    open.push(html! {
        <DocForm
            title={format!("Edit {}", contact.display_name())}
            doctype={CONTACT_DOCTYPE}
            fields={CONTACT_FIELDS.to_vec()}
            initial={initial_values(Some(contact), CONTACT_FIELDS)}
            submit={Submit::Update(contact.name.clone())}
            on_close={closer(store, DialogStore::close_edit_contact)} />
    });
  }
  if state.edit_boq.is_open {
    open.push(boq_form(store, &state));
  }
  if state.assign_boq.is_open {
    open.push(simple_boq_form(
      store,
      state.assign_boq.context.boq.as_ref(),
      "Assign",
      BOQ_ASSIGN_FIELDS,
      DialogStore::close_assign_boq
    ));
  }
  if state.remark_boq.is_open {
    open.push(simple_boq_form(
      store,
      state.remark_boq.context.boq.as_ref(),
      "Remark",
      BOQ_REMARK_FIELDS,
      DialogStore::close_remark_boq
    ));
  }
  if state.edit_deal_status.is_open {
    open.push(simple_boq_form(
      store,
      state.edit_deal_status.context.boq.as_ref(),
      "Deal status",
      DEAL_STATUS_FIELDS,
      DialogStore::close_edit_deal_status
    ));
  }
  if state.date_range_picker.is_open {
    open.push(html! {
        <DateRangePicker initial={state.date_range_picker.context.initial} />
    });
  }
  if state.stats_detail.is_open {
    let ctx = &state.stats_detail.context;
    open.push(html! {
        <Modal
            title={ctx.title.clone()}
            on_close={closer(store, DialogStore::close_stats_detail)}>
            <ul class="stats-detail">
                { for ctx.items.iter().map(|item| html! { <li>{ describe_item(item) }</li> }) }
            </ul>
        </Modal>
    });
  }
  if state.user_profile.is_open {
    open.push(html! {
        <UserProfile on_signed_out={props.on_signed_out.clone()} />
    });
  }
  if state.new_user.is_open {
    open.push(html! {
        <DocForm
            title={"New user".to_string()}
            doctype={USER_DOCTYPE}
            fields={USER_FIELDS.to_vec()}
            submit={Submit::Create}
            on_close={closer(store, DialogStore::close_new_user)} />
    });
  }
  if state.rename_boq_name.is_open {
    open.push(rename_form(
      store,
      BOQ_DOCTYPE,
      &state.rename_boq_name.context.doc_name,
      DialogStore::close_rename_boq_name
    ));
  }
  if state.rename_company_name.is_open {
    open.push(rename_form(
      store,
      COMPANY_DOCTYPE,
      &state.rename_company_name.context.doc_name,
      DialogStore::close_rename_company_name
    ));
  }
  if state.rename_contact_name.is_open {
    open.push(rename_form(
      store,
      CONTACT_DOCTYPE,
      &state.rename_contact_name.context.doc_name,
      DialogStore::close_rename_contact_name
    ));
  }

  html! { <>{ for open }</> }
}

fn describe_item(item: &Value) -> String {
  ["title", "boq_name", "company_name", "name"]
    .iter()
    .find_map(|key| item.get(*key).and_then(Value::as_str))
    .map_or_else(|| item.to_string(), str::to_string)
}

#[function_component(ProfilePicker)]
fn profile_picker() -> Html {
  let client = use_client();
  let store = client.dialogs().clone();
  let choose = |profile: TaskProfile| {
    let store = store.clone();
    Callback::from(move |_: MouseEvent| {
      store.choose_task_profile(profile)
    })
  };

  html! {
      <Modal
          title={"Which kind of task?".to_string()}
          on_close={closer(&store, DialogStore::close_select_task_profile)}>
          <div class="choice-row">
              <button class="btn" type="button" onclick={choose(TaskProfile::Sales)}>
                  { "Sales task" }
              </button>
              <button class="btn" type="button" onclick={choose(TaskProfile::Estimates)}>
                  { "Estimation task" }
              </button>
          </div>
      </Modal>
  }
}

#[derive(Properties, PartialEq)]
struct DateRangePickerProps {
  initial: Option<DateRange>
}

fn parse_date(
  value: &str
) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[function_component(DateRangePicker)]
fn date_range_picker(
  props: &DateRangePickerProps
) -> Html {
  let client = use_client();
  let toast = use_toast();
  let store = client.dialogs().clone();
  let range = props.initial.unwrap_or_else(|| {
    DateRange::last_days(Local::now().date_naive(), 30)
  });
  let from = use_state(|| range.from.to_string());
  let to = use_state(|| range.to.to_string());

  let bind = |handle: &yew::UseStateHandle<String>| {
    let handle = handle.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement = e.target_unchecked_into();
      handle.set(input.value());
    })
  };

  let confirm = {
    let store = store.clone();
    let from = from.clone();
    let to = to.clone();
    Callback::from(move |_: MouseEvent| {
      match (parse_date(&from), parse_date(&to)) {
        | (Some(a), Some(b)) => {
          store.confirm_date_range(DateRange::new(a, b))
        }
        | _ => toast.emit("pick both dates".to_string())
      }
    })
  };

  let footer = html! {
      <button class="btn primary" type="button" onclick={confirm}>{ "Apply" }</button>
  };

  html! {
      <Modal
          title={"Date range".to_string()}
          on_close={closer(&store, DialogStore::close_date_range_picker)}
          footer={footer}>
          <label class="field">
              <span>{ "From" }</span>
              <input type="date" value={(*from).clone()} oninput={bind(&from)} />
          </label>
          <label class="field">
              <span>{ "To" }</span>
              <input type="date" value={(*to).clone()} oninput={bind(&to)} />
          </label>
      </Modal>
  }
}

#[derive(Properties, PartialEq)]
struct UserProfileProps {
  on_signed_out: Callback<()>
}

/// Clearing the session lets the guard send the user to the login page.
#[function_component(UserProfile)]
fn user_profile(
  props: &UserProfileProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let toast = use_toast();
  let store = client.dialogs().clone();

  let logout = {
    let client = client.clone();
    let store = store.clone();
    let on_signed_out = props.on_signed_out.clone();
    Callback::from(move |_: MouseEvent| {
      let client = client.clone();
      let store = store.clone();
      let toast = toast.clone();
      let on_signed_out = on_signed_out.clone();
      wasm_bindgen_futures::spawn_local(async move {
        match client.docs.logout().await {
          | Ok(()) => {
            store.close_user_profile();
            on_signed_out.emit(());
          }
          | Err(err) => toast.emit(format!("logout failed: {err}"))
        }
      });
    })
  };

  let body = match session.session() {
    | Some(session) => html! {
        <dl class="profile">
            <dt>{ "Name" }</dt><dd>{ &session.full_name }</dd>
            <dt>{ "User" }</dt><dd>{ &session.user_id }</dd>
            <dt>{ "Role" }</dt><dd>{ format!("{:?}", session.role) }</dd>
        </dl>
    },
    | None => html! { <p>{ "Not signed in" }</p> }
  };
  let footer = html! {
      <button class="btn" type="button" onclick={logout}>{ "Log out" }</button>
  };

  html! {
      <Modal
          title={"Profile".to_string()}
          on_close={closer(&store, DialogStore::close_user_profile)}
          footer={footer}>
          { body }
      </Modal>
  }
}
