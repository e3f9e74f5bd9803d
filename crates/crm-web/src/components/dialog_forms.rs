use std::collections::BTreeMap;

use crm_shared::store::Invalidation;
use serde::Serialize;
use serde_json::{
  Map,
  Value
};
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

use super::{
  Modal,
  use_toast
};
use crate::hooks::{
  use_client,
  use_invalidate
};

#[derive(Clone, Copy, PartialEq)]
pub struct Field {
  pub name:  &'static str,
  pub label: &'static str,
  pub input: &'static str
}

pub const fn text(
  name: &'static str,
  label: &'static str
) -> Field {
  Field {
    name,
    label,
    input: "text"
  }
}

pub const fn date(
  name: &'static str,
  label: &'static str
) -> Field {
  Field {
    name,
    label,
    input: "date"
  }
}

#[derive(Clone, PartialEq)]
pub enum Submit {
  Create,
  Update(String),
  /// Renames the document; the form's `new_name` field holds the
  /// target name.
  Rename(String)
}

/// String form values for `fields`, read from a serialized document.
pub fn initial_values<T: Serialize>(
  doc: Option<&T>,
  fields: &[Field]
) -> BTreeMap<String, String> {
  let value = doc
    .and_then(|doc| {
      serde_json::to_value(doc).ok()
    })
    .unwrap_or(Value::Null);
  fields
    .iter()
    .filter_map(|field| {
      let raw = value.get(field.name)?;
      let text = match raw {
        | Value::String(s) => s.clone(),
        | Value::Null => return None,
        | other => other.to_string()
      };
      Some((field.name.to_string(), text))
    })
    .collect()
}

#[derive(Properties, PartialEq)]
pub struct DocFormProps {
  pub title:    String,
  pub doctype:  &'static str,
  pub fields:   Vec<Field>,
  pub submit:   Submit,
  pub on_close: Callback<()>,
  #[prop_or_default]
  pub initial:
    BTreeMap<String, String>,
  /// Sent with every submit; not editable.
  #[prop_or_default]
  pub fixed:    BTreeMap<String, Value>
}

#[function_component(DocForm)]
pub fn doc_form(
  props: &DocFormProps
) -> Html {
  let client = use_client();
  let invalidate = use_invalidate();
  let toast = use_toast();
  let values = {
    let initial = props.initial.clone();
    use_state(move || initial)
  };
  let saving = use_state(|| false);

  let on_submit = {
    let values = values.clone();
    let saving = saving.clone();
    let docs = client.docs.clone();
    let doctype = props.doctype;
    let submit = props.submit.clone();
    let fixed = props.fixed.clone();
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| {
      let mut body = Map::new();
      for (key, value) in &fixed {
        body.insert(key.clone(), value.clone());
      }
      for (key, value) in values.iter() {
        if !value.trim().is_empty() {
          body.insert(
            key.clone(),
            Value::String(value.trim().to_string())
          );
        }
      }

      saving.set(true);
      let docs = docs.clone();
      let submit = submit.clone();
      let saving = saving.clone();
      let invalidate = invalidate.clone();
      let toast = toast.clone();
      let on_close = on_close.clone();
      wasm_bindgen_futures::spawn_local(async move {
        let body = Value::Object(body);
        let result = match &submit {
          | Submit::Create => docs
            .create::<Value, _>(doctype, &body)
            .await
            .map(|_| ()),
          | Submit::Update(name) => docs
            .update::<Value, _>(doctype, name, &body)
            .await
            .map(|_| ()),
          | Submit::Rename(old_name) => {
            let new_name = body
              .get("new_name")
              .and_then(Value::as_str)
              .unwrap_or_default()
              .to_string();
            if new_name.is_empty() {
              Err("a new name is required".to_string())
            } else {
              docs
                .rename(doctype, old_name, &new_name)
                .await
                .map(|_| ())
            }
          }
        };
        saving.set(false);
        match result {
          | Ok(()) => {
            tracing::info!(doctype, "saved document");
            invalidate.emit(Invalidation::Doctype(
              doctype.to_string()
            ));
            on_close.emit(());
          }
          | Err(err) => toast.emit(format!("{doctype}: {err}"))
        }
      });
    })
  };

  let footer = html! {
      <button class="btn primary" type="button" disabled={*saving} onclick={on_submit}>
          { if *saving { "Saving..." } else { "Save" } }
      </button>
  };

  html! {
      <Modal title={props.title.clone()} on_close={props.on_close.clone()} footer={footer}>
          {
              for props.fields.iter().map(|field| {
                  let name = field.name;
                  let current = values.get(name).cloned().unwrap_or_default();
                  let values = values.clone();
                  let oninput = Callback::from(move |e: InputEvent| {
                      let input: HtmlInputElement = e.target_unchecked_into();
                      let mut next = (*values).clone();
                      next.insert(name.to_string(), input.value());
                      values.set(next);
                  });
                  html! {
                      <label class="field">
                          <span>{ field.label }</span>
                          <input type={field.input} value={current} oninput={oninput} />
                      </label>
                  }
              })
          }
      </Modal>
  }
}
