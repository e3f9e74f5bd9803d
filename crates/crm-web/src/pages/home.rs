use std::collections::BTreeMap;

use chrono::Local;
use crm_core::date_range::{
  DateRange,
  FROM_PARAM,
  TO_PARAM
};
use crm_core::dialogs::{
  DateRangeContext,
  DialogCallback,
  StatsDetailContext
};
use crm_core::session::Role;
use crm_shared::store::{
  Filter,
  FilterOp,
  ListArgs
};
use crm_shared::{
  BOQ_DOCTYPE,
  TASK_DOCTYPE
};
use serde_json::Value;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

use super::fetch_view;
use crate::hooks::{
  use_client,
  use_doc_list,
  use_session,
  use_synced_params
};

/// Window shown when the URL carries no range.
const DEFAULT_WINDOW_DAYS: u32 = 30;

const RANGE_PARAMS: &[(&str, &str)] =
  &[(FROM_PARAM, ""), (TO_PARAM, "")];

fn group_by(
  items: &[Value],
  field: &str
) -> BTreeMap<String, Vec<Value>> {
  let mut groups =
    BTreeMap::<String, Vec<Value>>::new();
  for item in items {
    let key = item
      .get(field)
      .and_then(Value::as_str)
      .filter(|s| !s.is_empty())
      .unwrap_or("Unset")
      .to_string();
    groups.entry(key).or_default().push(item.clone());
  }
  groups
}

#[derive(Properties, PartialEq)]
struct StatsCardProps {
  title:  &'static str,
  groups: BTreeMap<String, Vec<Value>>
}

/// One count per group; a count opens the records behind it.
#[function_component(StatsCard)]
fn stats_card(
  props: &StatsCardProps
) -> Html {
  let client = use_client();
  let total: usize =
    props.groups.values().map(Vec::len).sum();

  html! {
      <div class="panel stats">
          <div class="header">{ format!("{} ({total})", props.title) }</div>
          {
              for props.groups.iter().map(|(status, items)| {
                  let store = client.dialogs().clone();
                  let ctx = StatsDetailContext {
                      title: format!("{}: {status}", props.title),
                      items: items.clone()
                  };
                  html! {
                      <button class="stat" type="button"
                          onclick={move |_| store.open_stats_detail(ctx.clone())}>
                          <span class="label">{ status }</span>
                          <span class="count">{ items.len() }</span>
                      </button>
                  }
              })
          }
      </div>
  }
}

#[function_component(HomePage)]
pub fn home_page() -> Html {
  let client = use_client();
  let session = use_session();
  let (params, set_params) =
    use_synced_params(RANGE_PARAMS);

  let today = Local::now().date_naive();
  let range = DateRange::parse(
    &params[FROM_PARAM],
    &params[TO_PARAM]
  )
  .unwrap_or_else(|| {
    DateRange::last_days(today, DEFAULT_WINDOW_DAYS)
  });
  let between = Value::Array(vec![
    Value::String(range.from.to_string()),
    Value::String(range.to.to_string()),
  ]);

  let boqs = use_doc_list::<Value>(
    ListArgs::new(BOQ_DOCTYPE)
      .fields(["name", "boq_name", "boq_status", "company"])
      .filter(Filter::new(
        "modified",
        FilterOp::Between,
        between.clone()
      ))
      .limit(None)
  );
  let tasks = use_doc_list::<Value>(
    ListArgs::new(TASK_DOCTYPE)
      .fields(["name", "title", "status", "start_date"])
      .filter(Filter::new(
        "start_date",
        FilterOp::Between,
        between
      ))
      .limit(None)
  );

  // The picker writes the chosen range back as `from`/`to` in one
  // history entry.
  let pick_range = {
    let store = client.dialogs().clone();
    Callback::from(move |_: MouseEvent| {
      let set_params = set_params.clone();
      store.open_date_range_picker(DateRangeContext {
        initial:    Some(range),
        on_confirm: Some(DialogCallback::new(
          move |picked: DateRange| {
            set_params.emit(
              picked
                .to_params()
                .into_iter()
                .map(|(key, value)| {
                  (key, Some(value))
                })
                .collect()
            );
          }
        ))
      })
    })
  };

  let estimates_only = session.role() == Some(&Role::Estimates);

  html! {
      <div class="home">
          <div class="panel range">
              <span>{ format!("{} to {}", range.from, range.to) }</span>
              <button class="btn" type="button" onclick={pick_range}>{ "Change" }</button>
          </div>
          { fetch_view(&boqs, |items| html! {
              <StatsCard title="BOQs" groups={group_by(items, "boq_status")} />
          }) }
          if !estimates_only {
              { fetch_view(&tasks, |items| html! {
                  <StatsCard title="Tasks" groups={group_by(items, "status")} />
              }) }
          }
      </div>
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn groups_blank_status_as_unset() {
    let groups = group_by(
      &[
        json!({"name": "A", "status": "Scheduled"}),
        json!({"name": "B", "status": ""}),
        json!({"name": "C"}),
        json!({"name": "D", "status": "Scheduled"}),
      ],
      "status"
    );
    assert_eq!(groups["Scheduled"].len(), 2);
    assert_eq!(groups["Unset"].len(), 2);
  }
}
