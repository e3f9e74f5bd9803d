use url::form_urlencoded;

/// Ordered query-string parameters. Keys are unique; the first
/// occurrence wins when parsing a string that repeats a key.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct QueryParams {
  pairs: Vec<(String, String)>
}

impl QueryParams {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses `?a=1&b=2` or `a=1&b=2`.
  pub fn parse(raw: &str) -> Self {
    let raw =
      raw.strip_prefix('?').unwrap_or(raw);
    let mut params = Self::new();
    for (key, value) in
      form_urlencoded::parse(
        raw.as_bytes()
      )
    {
      if key.is_empty()
        || params.get(&key).is_some()
      {
        continue;
      }
      params.pairs.push((
        key.into_owned(),
        value.into_owned()
      ));
    }
    params
  }

  pub fn get(
    &self,
    key: &str
  ) -> Option<&str> {
    self
      .pairs
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  /// Upserts `key`; an empty value removes it instead.
  pub fn set(
    &mut self,
    key: &str,
    value: &str
  ) {
    if value.is_empty() {
      self.remove(key);
      return;
    }
    if let Some(slot) = self
      .pairs
      .iter_mut()
      .find(|(k, _)| k == key)
    {
      slot.1 = value.to_string();
    } else {
      self.pairs.push((
        key.to_string(),
        value.to_string()
      ));
    }
  }

  pub fn remove(&mut self, key: &str) {
    self.pairs.retain(|(k, _)| k != key);
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  pub fn iter(
    &self
  ) -> impl Iterator<Item = (&str, &str)>
  {
    self
      .pairs
      .iter()
      .map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Order-insensitive comparison.
  pub fn same_entries(
    &self,
    other: &Self
  ) -> bool {
    self.len() == other.len()
      && self.iter().all(|(key, value)| {
        other.get(key) == Some(value)
      })
  }

  /// Encodes without the leading `?`.
  pub fn to_query_string(&self) -> String {
    let mut serializer =
      form_urlencoded::Serializer::new(
        String::new()
      );
    for (key, value) in &self.pairs {
      serializer.append_pair(key, value);
    }
    serializer.finish()
  }

  /// Encodes with a leading `?`, or an empty string when there are no
  /// parameters.
  pub fn to_search(&self) -> String {
    if self.is_empty() {
      String::new()
    } else {
      format!(
        "?{}",
        self.to_query_string()
      )
    }
  }
}

#[cfg(test)]
mod tests {
  use super::QueryParams;

  #[test]
  fn parses_with_or_without_question_mark(
  ) {
    let a =
      QueryParams::parse("?id=CMP-1&tab=all");
    let b =
      QueryParams::parse("id=CMP-1&tab=all");
    assert_eq!(a, b);
    assert_eq!(a.get("id"), Some("CMP-1"));
    assert_eq!(a.get("missing"), None);
  }

  #[test]
  fn decodes_and_encodes_reserved_characters(
  ) {
    let params = QueryParams::parse(
      "company=Acme+%26+Sons&note=a%3Db"
    );
    assert_eq!(
      params.get("company"),
      Some("Acme & Sons")
    );
    assert_eq!(
      params.get("note"),
      Some("a=b")
    );
    assert_eq!(
      params.to_search(),
      "?company=Acme+%26+Sons&note=a%3Db"
    );
  }

  #[test]
  fn empty_value_removes_key() {
    let mut params =
      QueryParams::parse("id=1&innerTab=tasks");
    params.set("innerTab", "");
    assert_eq!(params.get("innerTab"), None);
    assert_eq!(params.to_search(), "?id=1");
  }

  #[test]
  fn first_duplicate_wins() {
    let params =
      QueryParams::parse("id=first&id=second");
    assert_eq!(params.len(), 1);
    assert_eq!(params.get("id"), Some("first"));
  }

  #[test]
  fn same_entries_ignores_order() {
    let a = QueryParams::parse("a=1&b=2");
    let b = QueryParams::parse("b=2&a=1");
    assert_ne!(a, b);
    assert!(a.same_entries(&b));
  }
}
