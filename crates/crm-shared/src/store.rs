//! Request shapes for the remote document store.
//!
//! The store itself lives on the server; these types describe what the
//! client asks for so the web crate and the tests agree on one encoding.

use serde::{
  Deserialize,
  Serialize
};
use serde_json::Value;

pub const DEFAULT_LIST_LIMIT: usize =
  100;

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub enum FilterOp {
  #[serde(rename = "=")]
  Eq,
  #[serde(rename = "!=")]
  NotEq,
  #[serde(rename = "like")]
  Like,
  #[serde(rename = "in")]
  In,
  #[serde(rename = ">=")]
  Gte,
  #[serde(rename = "<=")]
  Lte,
  #[serde(rename = "between")]
  Between
}

impl FilterOp {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Eq => "=",
      | Self::NotEq => "!=",
      | Self::Like => "like",
      | Self::In => "in",
      | Self::Gte => ">=",
      | Self::Lte => "<=",
      | Self::Between => "between"
    }
  }
}

#[derive(
  Debug, Clone, PartialEq,
)]
pub struct Filter {
  pub field: String,
  pub op:    FilterOp,
  pub value: Value
}

impl Filter {
  pub fn eq(
    field: impl Into<String>,
    value: impl Into<Value>
  ) -> Self {
    Self {
      field: field.into(),
      op:    FilterOp::Eq,
      value: value.into()
    }
  }

  pub fn new(
    field: impl Into<String>,
    op: FilterOp,
    value: impl Into<Value>
  ) -> Self {
    Self {
      field: field.into(),
      op,
      value: value.into()
    }
  }

  fn to_json(&self) -> Value {
    Value::Array(vec![
      Value::String(self.field.clone()),
      Value::String(
        self.op.as_str().to_string()
      ),
      self.value.clone(),
    ])
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum SortDirection {
  Asc,
  Desc
}

#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct OrderBy {
  pub field:     String,
  pub direction: SortDirection
}

impl OrderBy {
  pub fn desc(
    field: impl Into<String>
  ) -> Self {
    Self {
      field:     field.into(),
      direction: SortDirection::Desc
    }
  }

  pub fn asc(
    field: impl Into<String>
  ) -> Self {
    Self {
      field:     field.into(),
      direction: SortDirection::Asc
    }
  }

  fn render(&self) -> String {
    let direction =
      match self.direction {
        | SortDirection::Asc => "asc",
        | SortDirection::Desc => "desc"
      };
    format!(
      "{} {direction}",
      self.field
    )
  }
}

/// Arguments of a `list(doctype, ...)` call.
#[derive(
  Debug, Clone, PartialEq,
)]
pub struct ListArgs {
  pub doctype:  String,
  pub fields:   Vec<String>,
  pub filters:  Vec<Filter>,
  pub limit:    Option<usize>,
  pub order_by: Option<OrderBy>
}

impl ListArgs {
  pub fn new(
    doctype: impl Into<String>
  ) -> Self {
    Self {
      doctype:  doctype.into(),
      fields:   vec!["*".to_string()],
      filters:  vec![],
      limit:    Some(
        DEFAULT_LIST_LIMIT
      ),
      order_by: Some(OrderBy::desc(
        "modified"
      ))
    }
  }

  pub fn fields<I, S>(
    mut self,
    fields: I
  ) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>
  {
    self.fields = fields
      .into_iter()
      .map(Into::into)
      .collect();
    self
  }

  pub fn filter(
    mut self,
    filter: Filter
  ) -> Self {
    self.filters.push(filter);
    self
  }

  pub fn limit(
    mut self,
    limit: Option<usize>
  ) -> Self {
    self.limit = limit;
    self
  }

  pub fn order_by(
    mut self,
    order_by: OrderBy
  ) -> Self {
    self.order_by = Some(order_by);
    self
  }

  /// Query pairs for the `/api/resource/<doctype>` listing route.
  /// A `None` limit is sent as `0`, which the server reads as "no
  /// limit".
  pub fn to_query_pairs(
    &self
  ) -> Vec<(String, String)> {
    let mut pairs = vec![(
      "fields".to_string(),
      Value::Array(
        self
          .fields
          .iter()
          .cloned()
          .map(Value::String)
          .collect()
      )
      .to_string()
    )];

    if !self.filters.is_empty() {
      pairs.push((
        "filters".to_string(),
        Value::Array(
          self
            .filters
            .iter()
            .map(Filter::to_json)
            .collect()
        )
        .to_string()
      ));
    }

    pairs.push((
      "limit_page_length".to_string(),
      self
        .limit
        .unwrap_or(0)
        .to_string()
    ));

    if let Some(order_by) =
      self.order_by.as_ref()
    {
      pairs.push((
        "order_by".to_string(),
        order_by.render()
      ));
    }

    pairs
  }

  /// Key under which a listing is cached, `doctype` first so doctype
  /// invalidation can match on prefix.
  pub fn cache_key(&self) -> String {
    let mut key = self.doctype.clone();
    for (name, value) in
      self.to_query_pairs()
    {
      key.push('|');
      key.push_str(&name);
      key.push('=');
      key.push_str(&value);
    }
    key
  }
}

/// Signal telling cached listings to refetch.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub enum Invalidation {
  Doctype(String),
  KeyPrefix(String)
}

impl Invalidation {
  pub fn matches(
    &self,
    cache_key: &str
  ) -> bool {
    match self {
      | Self::Doctype(doctype) => {
        cache_key == doctype
          || cache_key
            .strip_prefix(
              doctype.as_str()
            )
            .is_some_and(|rest| {
              rest.starts_with('|')
            })
      }
      | Self::KeyPrefix(prefix) => {
        cache_key.starts_with(
          prefix.as_str()
        )
      }
    }
  }
}

/// Envelope the server wraps around every resource response.
#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct DataEnvelope<T> {
  pub data: T
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::TASK_DOCTYPE;

  #[test]
  fn list_args_encode_filters_as_nested_arrays(
  ) {
    let args =
      ListArgs::new(TASK_DOCTYPE)
        .fields(["name", "status"])
        .filter(Filter::eq(
          "boq", "BOQ-0004"
        ))
        .filter(Filter::new(
          "start_date",
          FilterOp::Between,
          json!([
            "2026-01-01",
            "2026-01-31"
          ])
        ))
        .limit(Some(20));

    let pairs = args.to_query_pairs();
    assert_eq!(
      pairs[0],
      (
        "fields".to_string(),
        r#"["name","status"]"#
          .to_string()
      )
    );
    assert_eq!(
      pairs[1],
      (
        "filters".to_string(),
        r#"[["boq","=","BOQ-0004"],["start_date","between",["2026-01-01","2026-01-31"]]]"#
          .to_string()
      )
    );
    assert!(pairs.contains(&(
      "limit_page_length".to_string(),
      "20".to_string()
    )));
    assert!(pairs.contains(&(
      "order_by".to_string(),
      "modified desc".to_string()
    )));
  }

  #[test]
  fn doctype_invalidation_does_not_match_longer_doctypes(
  ) {
    let contacts =
      ListArgs::new("CRM Contacts");
    let company =
      ListArgs::new("CRM Company");
    let signal = Invalidation::Doctype(
      "CRM Company".to_string()
    );

    assert!(
      signal.matches(&company.cache_key())
    );
    assert!(
      !signal
        .matches(&contacts.cache_key())
    );
    assert!(!signal.matches(
      "CRM Company Types|fields=[]"
    ));
    assert!(
      Invalidation::KeyPrefix(
        "CRM".to_string()
      )
      .matches(&contacts.cache_key())
    );
  }
}
