use crm_core::route::MEMBER_PARAM;
use crm_shared::store::{
  Filter,
  ListArgs
};
use crm_shared::{
  CrmUserDoc,
  TASK_DOCTYPE,
  TaskDoc,
  USER_DOCTYPE
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::fetch_view;
use super::tasks::task_row;
use crate::components::{
  RecordList,
  RecordRow
};
use crate::hooks::{
  use_doc_list,
  use_synced_param
};

fn member_row(
  doc: &CrmUserDoc
) -> RecordRow {
  RecordRow {
    id:     doc.name.clone(),
    title:  doc
      .full_name
      .clone()
      .unwrap_or_else(|| doc.name.clone()),
    meta:   doc
      .nirmaan_role_name
      .clone()
      .unwrap_or_default(),
    status: None
  }
}

#[derive(Properties, PartialEq)]
pub struct TeamPageProps {
  pub member: Option<String>
}

/// CRM users beside the selected member's tasks.
#[function_component(TeamPage)]
pub fn team_page(
  props: &TeamPageProps
) -> Html {
  let fetch = use_doc_list::<CrmUserDoc>(
    ListArgs::new(USER_DOCTYPE)
      .fields(["name", "full_name", "nirmaan_role_name", "has_company"])
  );
  let (_, set_member) =
    use_synced_param(MEMBER_PARAM, "");
  let select = Callback::from(move |id: String| {
    set_member.emit((id, Vec::new()))
  });

  html! {
      <div class="split">
          { fetch_view(&fetch, |docs| html! {
              <RecordList title="Team" rows={docs.iter().map(member_row).collect::<Vec<_>>()}
                  selected={props.member.clone()} on_select={select} />
          }) }
          if let Some(member) = props.member.clone() {
              <MemberTasks member={member} />
          }
      </div>
  }
}

#[derive(Properties, PartialEq)]
struct MemberTasksProps {
  member: String
}

#[function_component(MemberTasks)]
fn member_tasks(
  props: &MemberTasksProps
) -> Html {
  let fetch = use_doc_list::<TaskDoc>(
    ListArgs::new(TASK_DOCTYPE).filter(Filter::eq(
      "assigned_sales",
      props.member.clone()
    ))
  );
  fetch_view(&fetch, |docs| html! {
      <RecordList title="Tasks" rows={docs.iter().map(task_row).collect::<Vec<_>>()}
          selected={None::<String>} on_select={Callback::noop()} />
  })
}
