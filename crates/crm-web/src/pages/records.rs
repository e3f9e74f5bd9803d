//! Company, contact and BOQ pages. List routes show a master list with
//! the selected record beside it; detail routes show the record alone.

use crm_core::dialogs::{
  BoqContext,
  BoqEditMode,
  DialogStore,
  EditBoqContext,
  EditCompanyContext,
  EditContactContext,
  NewTaskContext,
  ParentLink,
  RenameContext,
  create_task
};
use crm_core::route::{
  ID_PARAM,
  INNER_TAB_PARAM
};
use crm_shared::store::{
  Filter,
  ListArgs
};
use crm_shared::{
  BOQ_DOCTYPE,
  BoqDoc,
  COMPANY_DOCTYPE,
  CONTACT_DOCTYPE,
  CompanyDoc,
  ContactDoc,
  TASK_DOCTYPE
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  hook,
  html
};

use super::fetch_view;
use super::tasks::task_row;
use crate::components::{
  RecordList,
  RecordRow
};
use crate::hooks::{
  ClientHandle,
  use_client,
  use_doc_list,
  use_session,
  use_synced_param
};

fn or_dash(value: Option<&String>) -> String {
  value
    .filter(|v| !v.is_empty())
    .cloned()
    .unwrap_or_else(|| "-".to_string())
}

pub(super) fn company_row(
  doc: &CompanyDoc
) -> RecordRow {
  RecordRow {
    id:     doc.name.clone(),
    title:  doc
      .company_name
      .clone()
      .unwrap_or_else(|| doc.name.clone()),
    meta:   format!(
      "{} · {}",
      or_dash(doc.company_city.as_ref()),
      or_dash(doc.company_type.as_ref())
    ),
    status: None
  }
}

pub(super) fn contact_row(
  doc: &ContactDoc
) -> RecordRow {
  RecordRow {
    id:     doc.name.clone(),
    title:  doc.display_name(),
    meta:   or_dash(doc.company.as_ref()),
    status: None
  }
}

pub(super) fn boq_row(
  doc: &BoqDoc
) -> RecordRow {
  RecordRow {
    id:     doc.name.clone(),
    title:  doc
      .boq_name
      .clone()
      .unwrap_or_else(|| doc.name.clone()),
    meta:   format!(
      "{} · {}",
      or_dash(doc.company.as_ref()),
      or_dash(doc.city.as_ref())
    ),
    status: doc.boq_status.clone()
  }
}

/// Selecting a row writes `id` and drops the old record's tab in the
/// same history entry.
#[hook]
pub(super) fn use_select_record()
-> Callback<String> {
  let (_, set_id) =
    use_synced_param(ID_PARAM, "");
  Callback::from(move |id: String| {
    set_id.emit((id, vec![INNER_TAB_PARAM]))
  })
}

const COMPANY_TABS: &[(&str, &str)] = &[
  ("contacts", "Contacts"),
  ("boqs", "BOQs"),
  ("tasks", "Tasks")
];
const CONTACT_TABS: &[(&str, &str)] =
  &[("boqs", "BOQs"), ("tasks", "Tasks")];
const BOQ_TABS: &[(&str, &str)] =
  &[("details", "Details"), ("tasks", "Tasks")];

#[derive(Properties, PartialEq)]
pub(super) struct TabsProps {
  pub tabs:    &'static [(&'static str, &'static str)],
  pub default: &'static str
}

/// Tab strip bound to `innerTab`.
#[function_component(Tabs)]
pub(super) fn tabs(
  props: &TabsProps
) -> Html {
  let (active, set_tab) =
    use_synced_param(INNER_TAB_PARAM, props.default);
  html! {
      <div class="tabs">
          {
              for props.tabs.iter().map(|(key, label)| {
                  let set_tab = set_tab.clone();
                  let class = if active == *key { "tab active" } else { "tab" };
                  html! {
                      <button class={class} type="button"
                          onclick={move |_| set_tab.emit((key.to_string(), Vec::new()))}>
                          { *label }
                      </button>
                  }
              })
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub(super) struct RelatedProps {
  pub doctype: &'static str,
  pub field:   &'static str,
  pub value:   String
}

fn decode_rows<T: DeserializeOwned>(
  docs: &[Value],
  row: fn(&T) -> RecordRow
) -> Vec<RecordRow> {
  docs
    .iter()
    .filter_map(|doc| {
      serde_json::from_value::<T>(doc.clone()).ok()
    })
    .map(|doc| row(&doc))
    .collect()
}

/// Records of `doctype` linked to the current one through `field`.
/// Rows open the linked record's detail page.
#[function_component(Related)]
pub(super) fn related(
  props: &RelatedProps
) -> Html {
  let client = use_client();
  let fetch = use_doc_list::<Value>(
    ListArgs::new(props.doctype).filter(Filter::eq(
      props.field,
      props.value.clone()
    ))
  );
  let doctype = props.doctype;
  let detail_path = match doctype {
    | CONTACT_DOCTYPE => "/contacts/contact",
    | BOQ_DOCTYPE => "/boqs/boq",
    | _ => "/tasks/task"
  };
  let open = Callback::from(move |id: String| {
    client.history().navigate(&format!(
      "{detail_path}?{ID_PARAM}={}",
      String::from(js_sys::encode_uri_component(&id))
    ));
  });

  fetch_view(&fetch, |docs| {
    let (title, rows) = match doctype {
      | CONTACT_DOCTYPE => {
        ("Contacts", decode_rows(docs, contact_row))
      }
      | BOQ_DOCTYPE => {
        ("BOQs", decode_rows(docs, boq_row))
      }
      | _ => ("Tasks", decode_rows(docs, task_row))
    };
    html! {
        <RecordList title={title} rows={rows} selected={None::<String>} on_select={open} />
    }
  })
}

#[derive(Properties, PartialEq)]
pub struct ListPageProps {
  pub selected: Option<String>
}

#[function_component(CompaniesPage)]
pub fn companies_page(
  props: &ListPageProps
) -> Html {
  let fetch = use_doc_list::<CompanyDoc>(
    ListArgs::new(COMPANY_DOCTYPE)
  );
  let select = use_select_record();
  html! {
      <div class="split">
          { fetch_view(&fetch, |docs| html! {
              <RecordList title="Companies" rows={docs.iter().map(company_row).collect::<Vec<_>>()}
                  selected={props.selected.clone()} on_select={select.clone()} />
          }) }
          if let Some(id) = props.selected.clone() {
              <CompanyDetail id={id} />
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct DetailProps {
  pub id: String
}

fn by_name(
  doctype: &str,
  id: &str
) -> ListArgs {
  ListArgs::new(doctype)
    .filter(Filter::eq("name", id))
    .limit(Some(1))
}

fn action(
  label: &'static str,
  onclick: Callback<yew::MouseEvent>
) -> Html {
  html! {
      <button class="btn" type="button" onclick={onclick}>{ label }</button>
  }
}

fn on_click(
  client: &ClientHandle,
  f: impl Fn(&ClientHandle) + 'static
) -> Callback<yew::MouseEvent> {
  let client = client.clone();
  Callback::from(move |_| f(&client))
}

#[function_component(CompanyDetail)]
pub fn company_detail(
  props: &DetailProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let fetch = use_doc_list::<CompanyDoc>(by_name(
    COMPANY_DOCTYPE,
    &props.id
  ));
  let (tab, _) =
    use_synced_param(INNER_TAB_PARAM, "contacts");
  let role = session.role().cloned();

  fetch_view(&fetch, |docs| {
    let Some(company) = docs.first().cloned() else {
      return html! { <div class="panel empty">{ "Company not found." }</div> };
    };
    let id = company.name.clone();
    let edit = {
      let company = company.clone();
      on_click(&client, move |c| {
        c.dialogs().open_edit_company(EditCompanyContext {
          company: Some(company.clone())
        })
      })
    };
    let rename = {
      let id = id.clone();
      on_click(&client, move |c| {
        c.dialogs().open_rename_company_name(
          RenameContext::new(COMPANY_DOCTYPE, &id)
        )
      })
    };
    let new_contact = {
      let id = id.clone();
      on_click(&client, move |c| {
        c.dialogs().open_new_contact(ParentLink::company(id.clone()))
      })
    };
    let new_task = {
      let id = id.clone();
      let role = role.clone();
      on_click(&client, move |c| {
        if let Some(role) = role.as_ref() {
          create_task(c.dialogs(), role, NewTaskContext::for_company(id.clone()));
        }
      })
    };

    html! {
        <div class="panel details">
            <div class="header">{ company.company_name.clone().unwrap_or_else(|| id.clone()) }</div>
            <dl>
                <dt>{ "City" }</dt><dd>{ or_dash(company.company_city.as_ref()) }</dd>
                <dt>{ "Website" }</dt><dd>{ or_dash(company.company_website.as_ref()) }</dd>
                <dt>{ "Sales" }</dt><dd>{ or_dash(company.assigned_sales.as_ref()) }</dd>
                <dt>{ "Last meeting" }</dt><dd>{ or_dash(company.last_meeting.as_ref()) }</dd>
            </dl>
            <div class="actions">
                { action("Edit", edit) }
                { action("Rename", rename) }
                { action("New contact", new_contact) }
                { action("New task", new_task) }
            </div>
            <Tabs tabs={COMPANY_TABS} default="contacts" />
            {
                match tab.as_str() {
                    | "boqs" => html! { <Related doctype={BOQ_DOCTYPE} field="company" value={id.clone()} /> },
                    | "tasks" => html! { <Related doctype={TASK_DOCTYPE} field="company" value={id.clone()} /> },
                    | _ => html! { <Related doctype={CONTACT_DOCTYPE} field="company" value={id.clone()} /> }
                }
            }
        </div>
    }
  })
}

#[function_component(ContactsPage)]
pub fn contacts_page(
  props: &ListPageProps
) -> Html {
  let fetch = use_doc_list::<ContactDoc>(
    ListArgs::new(CONTACT_DOCTYPE)
  );
  let select = use_select_record();
  html! {
      <div class="split">
          { fetch_view(&fetch, |docs| html! {
              <RecordList title="Contacts" rows={docs.iter().map(contact_row).collect::<Vec<_>>()}
                  selected={props.selected.clone()} on_select={select.clone()} />
          }) }
          if let Some(id) = props.selected.clone() {
              <ContactDetail id={id} />
          }
      </div>
  }
}

#[function_component(ContactDetail)]
pub fn contact_detail(
  props: &DetailProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let fetch = use_doc_list::<ContactDoc>(by_name(
    CONTACT_DOCTYPE,
    &props.id
  ));
  let (tab, _) =
    use_synced_param(INNER_TAB_PARAM, "boqs");
  let role = session.role().cloned();

  fetch_view(&fetch, |docs| {
    let Some(contact) = docs.first().cloned() else {
      return html! { <div class="panel empty">{ "Contact not found." }</div> };
    };
    let id = contact.name.clone();
    let edit = {
      let contact = contact.clone();
      on_click(&client, move |c| {
        c.dialogs().open_edit_contact(EditContactContext {
          contact: Some(contact.clone())
        })
      })
    };
    let rename = {
      let id = id.clone();
      on_click(&client, move |c| {
        c.dialogs().open_rename_contact_name(
          RenameContext::new(CONTACT_DOCTYPE, &id)
        )
      })
    };
    let new_boq = {
      let link = ParentLink {
        company_id: contact.company.clone(),
        contact_id: Some(id.clone())
      };
      on_click(&client, move |c| {
        c.dialogs().open_new_boq(link.clone())
      })
    };
    let new_task = {
      let mut ctx = NewTaskContext::for_contact(id.clone());
      ctx.company_id = contact.company.clone();
      let role = role.clone();
      on_click(&client, move |c| {
        if let Some(role) = role.as_ref() {
          create_task(c.dialogs(), role, ctx.clone());
        }
      })
    };

    html! {
        <div class="panel details">
            <div class="header">{ contact.display_name() }</div>
            <dl>
                <dt>{ "Company" }</dt><dd>{ or_dash(contact.company.as_ref()) }</dd>
                <dt>{ "Mobile" }</dt><dd>{ or_dash(contact.mobile.as_ref()) }</dd>
                <dt>{ "Email" }</dt><dd>{ or_dash(contact.email.as_ref()) }</dd>
                <dt>{ "Designation" }</dt><dd>{ or_dash(contact.designation.as_ref()) }</dd>
            </dl>
            <div class="actions">
                { action("Edit", edit) }
                { action("Rename", rename) }
                { action("New BOQ", new_boq) }
                { action("New task", new_task) }
            </div>
            <Tabs tabs={CONTACT_TABS} default="boqs" />
            if tab == "tasks" {
                <Related doctype={TASK_DOCTYPE} field="contact" value={id.clone()} />
            } else {
                <Related doctype={BOQ_DOCTYPE} field="contact" value={id.clone()} />
            }
        </div>
    }
  })
}

#[function_component(BoqsPage)]
pub fn boqs_page(
  props: &ListPageProps
) -> Html {
  let fetch = use_doc_list::<BoqDoc>(
    ListArgs::new(BOQ_DOCTYPE)
  );
  let select = use_select_record();
  html! {
      <div class="split">
          { fetch_view(&fetch, |docs| html! {
              <RecordList title="BOQs" rows={docs.iter().map(boq_row).collect::<Vec<_>>()}
                  selected={props.selected.clone()} on_select={select.clone()} />
          }) }
          if let Some(id) = props.selected.clone() {
              <BoqDetail id={id} />
          }
      </div>
  }
}

#[function_component(BoqDetail)]
pub fn boq_detail(
  props: &DetailProps
) -> Html {
  let client = use_client();
  let session = use_session();
  let fetch = use_doc_list::<BoqDoc>(by_name(
    BOQ_DOCTYPE,
    &props.id
  ));
  let (tab, _) =
    use_synced_param(INNER_TAB_PARAM, "details");
  let role = session.role().cloned();

  fetch_view(&fetch, |docs| {
    let Some(boq) = docs.first().cloned() else {
      return html! { <div class="panel empty">{ "BOQ not found." }</div> };
    };
    let id = boq.name.clone();
    let edit = |mode: BoqEditMode| {
      let boq = boq.clone();
      on_click(&client, move |c| {
        c.dialogs().open_edit_boq(EditBoqContext {
          boq: Some(boq.clone()),
          mode
        })
      })
    };
    let with_boq = |open: fn(&DialogStore, BoqContext)| {
      let boq = boq.clone();
      on_click(&client, move |c| {
        open(c.dialogs(), BoqContext { boq: Some(boq.clone()) })
      })
    };
    let rename = {
      let id = id.clone();
      on_click(&client, move |c| {
        c.dialogs().open_rename_boq_name(
          RenameContext::new(BOQ_DOCTYPE, &id)
        )
      })
    };
    let follow_up = {
      let mut ctx = NewTaskContext::for_boq(id.clone());
      ctx.company_id = boq.company.clone();
      ctx.contact_id = boq.contact.clone();
      let role = role.clone();
      on_click(&client, move |c| {
        if let Some(role) = role.as_ref() {
          create_task(c.dialogs(), role, ctx.clone());
        }
      })
    };

    html! {
        <div class="panel details">
            <div class="header">{ boq.boq_name.clone().unwrap_or_else(|| id.clone()) }</div>
            <div class="actions">
                { action("Edit", edit(BoqEditMode::Details)) }
                { action("Status", edit(BoqEditMode::Status)) }
                { action("Attachment", edit(BoqEditMode::Attachment)) }
                { action("Estimator", edit(BoqEditMode::AssignedEstimate)) }
                { action("Assign", with_boq(DialogStore::open_assign_boq)) }
                { action("Remark", with_boq(DialogStore::open_remark_boq)) }
                { action("Deal status", with_boq(DialogStore::open_edit_deal_status)) }
                { action("Rename", rename) }
                { action("Follow-up task", follow_up) }
            </div>
            <Tabs tabs={BOQ_TABS} default="details" />
            if tab == "tasks" {
                <Related doctype={TASK_DOCTYPE} field="boq" value={id.clone()} />
            } else {
                <dl>
                    <dt>{ "Company" }</dt><dd>{ or_dash(boq.company.as_ref()) }</dd>
                    <dt>{ "Contact" }</dt><dd>{ or_dash(boq.contact.as_ref()) }</dd>
                    <dt>{ "Status" }</dt><dd>{ or_dash(boq.boq_status.as_ref()) }</dd>
                    <dt>{ "Sub status" }</dt><dd>{ or_dash(boq.boq_sub_status.as_ref()) }</dd>
                    <dt>{ "Value" }</dt><dd>{ or_dash(boq.boq_value.as_ref()) }</dd>
                    <dt>{ "Submission" }</dt><dd>{ or_dash(boq.boq_submission_date.as_ref()) }</dd>
                    <dt>{ "Deal status" }</dt><dd>{ or_dash(boq.deal_status.as_ref()) }</dd>
                    <dt>{ "Estimator" }</dt><dd>{ or_dash(boq.assigned_estimations.as_ref()) }</dd>
                    <dt>{ "Remarks" }</dt><dd>{ or_dash(boq.remarks.as_ref()) }</dd>
                </dl>
            }
        </div>
    }
  })
}
