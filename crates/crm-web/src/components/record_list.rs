use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

/// One document as a list line.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordRow {
  pub id:     String,
  pub title:  String,
  pub meta:   String,
  pub status: Option<String>
}

#[derive(Properties, PartialEq)]
pub struct RecordListProps {
  pub title:     &'static str,
  pub rows:      Vec<RecordRow>,
  pub selected:  Option<String>,
  pub on_select: Callback<String>
}

#[function_component(RecordList)]
pub fn record_list(
  props: &RecordListProps
) -> Html {
  html! {
      <div class="panel list">
          <div class="header">{ props.title }</div>
          if props.rows.is_empty() {
              <div class="empty">{ "Nothing here yet." }</div>
          }
          {
              for props.rows.iter().cloned().map(|row| {
                  let selected = props.selected.as_deref() == Some(row.id.as_str());
                  let on_select = props.on_select.clone();
                  let id = row.id.clone();
                  let status_class = match row.status.as_deref() {
                      | Some("Completed" | "Won") => "dot done",
                      | Some("Cancelled" | "Lost") => "dot deleted",
                      | Some(_) => "dot pending",
                      | None => "dot waiting"
                  };
                  html! {
                      <div
                          class={if selected { "row selected" } else { "row" }}
                          onclick={move |_| on_select.emit(id.clone())}>
                          <span class={status_class}></span>
                          <div class="title">{ row.title }</div>
                          <div class="meta">
                              { row.meta }
                              if let Some(status) = row.status {
                                  <span class="badge">{ status }</span>
                              }
                          </div>
                      </div>
                  }
              })
          }
      </div>
  }
}
