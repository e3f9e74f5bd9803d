use std::collections::BTreeMap;

use chrono::{
  Datelike,
  Local,
  Months,
  NaiveDate
};
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
use serde_json::Value;
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html
};

use super::fetch_view;
use super::tasks::task_row;
use crate::components::RecordList;
use crate::hooks::{
  use_client,
  use_doc_list,
  use_synced_param
};

const MONTH_PARAM: &str = "month";

/// First day of the `YYYY-MM` month, or of the current month when the
/// value does not parse.
fn month_start(
  value: &str,
  today: NaiveDate
) -> NaiveDate {
  NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
    .ok()
    .or_else(|| today.with_day(1))
    .unwrap_or(today)
}

fn month_key(start: NaiveDate) -> String {
  start.format("%Y-%m").to_string()
}

#[function_component(CalendarPage)]
pub fn calendar_page() -> Html {
  let client = use_client();
  let today = Local::now().date_naive();
  let (month, set_month) =
    use_synced_param(MONTH_PARAM, "");
  let start = month_start(&month, today);
  let next = start
    .checked_add_months(Months::new(1))
    .unwrap_or(start);
  let prev = start
    .checked_sub_months(Months::new(1))
    .unwrap_or(start);
  let end = next.pred_opt().unwrap_or(start);

  let fetch = use_doc_list::<TaskDoc>(
    ListArgs::new(TASK_DOCTYPE)
      .filter(Filter::new(
        "start_date",
        FilterOp::Between,
        Value::Array(vec![
          Value::String(start.to_string()),
          Value::String(end.to_string()),
        ])
      ))
      .order_by(OrderBy::asc("start_date"))
      .limit(None)
  );

  let go = |target: NaiveDate| {
    let set_month = set_month.clone();
    Callback::from(move |_: MouseEvent| {
      set_month.emit((month_key(target), Vec::new()))
    })
  };
  let open = Callback::from(move |id: String| {
    client.history().navigate(&format!(
      "/tasks/task?id={}",
      String::from(js_sys::encode_uri_component(&id))
    ));
  });

  html! {
      <div class="calendar">
          <div class="panel range">
              <button class="btn" type="button" onclick={go(prev)}>{ "<" }</button>
              <span>{ start.format("%B %Y").to_string() }</span>
              <button class="btn" type="button" onclick={go(next)}>{ ">" }</button>
          </div>
          { fetch_view(&fetch, |tasks| {
              let mut days = BTreeMap::<String, Vec<_>>::new();
              for task in tasks {
                  let day = task.start_date.clone().unwrap_or_default();
                  days.entry(day).or_default().push(task_row(task));
              }
              html! {
                  <>
                      {
                          for days.into_iter().map(|(day, rows)| {
                              let label = if day.is_empty() { "Undated".to_string() } else { day };
                              html! {
                                  <div class="day">
                                      <div class="date">{ label }</div>
                                      <RecordList title="" rows={rows} selected={None::<String>} on_select={open.clone()} />
                                  </div>
                              }
                          })
                      }
                  </>
              }
          }) }
      </div>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn month_param_falls_back_to_current_month() {
    let today = NaiveDate::from_ymd_opt(2026, 3, 18)
      .expect("date");
    assert_eq!(
      month_start("2026-01", today),
      NaiveDate::from_ymd_opt(2026, 1, 1).expect("date")
    );
    assert_eq!(
      month_start("soon", today),
      NaiveDate::from_ymd_opt(2026, 3, 1).expect("date")
    );
  }
}
