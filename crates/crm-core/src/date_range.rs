use chrono::{
  Duration,
  NaiveDate
};

use crate::url_state::QueryParams;

pub const FROM_PARAM: &str = "from";
pub const TO_PARAM: &str = "to";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar range, always ordered.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub struct DateRange {
  pub from: NaiveDate,
  pub to:   NaiveDate
}

impl DateRange {
  pub fn new(
    a: NaiveDate,
    b: NaiveDate
  ) -> Self {
    if a <= b {
      Self { from: a, to: b }
    } else {
      Self { from: b, to: a }
    }
  }

  /// The `days`-long window ending on `today`.
  pub fn last_days(
    today: NaiveDate,
    days: u32
  ) -> Self {
    let span = i64::from(
      days.saturating_sub(1)
    );
    Self::new(
      today - Duration::days(span),
      today
    )
  }

  pub fn contains(
    &self,
    date: NaiveDate
  ) -> bool {
    self.from <= date && date <= self.to
  }

  /// Reads `from`/`to`; both must be present and valid.
  pub fn from_query(
    query: &QueryParams
  ) -> Option<Self> {
    Self::parse(
      query.get(FROM_PARAM)?,
      query.get(TO_PARAM)?
    )
  }

  /// Parses two `YYYY-MM-DD` values, in either order.
  pub fn parse(
    from: &str,
    to: &str
  ) -> Option<Self> {
    Some(Self::new(
      parse_date(from)?,
      parse_date(to)?
    ))
  }

  /// Values for the `from`/`to` parameters.
  pub fn to_params(
    &self
  ) -> [(&'static str, String); 2] {
    [
      (
        FROM_PARAM,
        self
          .from
          .format(DATE_FORMAT)
          .to_string()
      ),
      (
        TO_PARAM,
        self.to.format(DATE_FORMAT).to_string()
      )
    ]
  }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(
    raw.trim(),
    DATE_FORMAT
  )
  .ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn reversed_bounds_are_ordered() {
    let range = DateRange::new(
      date(2026, 3, 10),
      date(2026, 3, 1)
    );
    assert_eq!(range.from, date(2026, 3, 1));
    assert!(range.contains(date(2026, 3, 5)));
    assert!(!range.contains(date(2026, 3, 11)));
  }

  #[test]
  fn query_requires_both_bounds() {
    let query = QueryParams::parse(
      "from=2026-01-01&to=2026-01-31"
    );
    let range = DateRange::from_query(&query)
      .expect("range");
    assert_eq!(range.to, date(2026, 1, 31));
    assert_eq!(
      range.to_params()[0].1,
      "2026-01-01"
    );

    assert_eq!(
      DateRange::from_query(
        &QueryParams::parse("from=2026-01-01")
      ),
      None
    );
    assert_eq!(
      DateRange::from_query(
        &QueryParams::parse(
          "from=yesterday&to=2026-01-31"
        )
      ),
      None
    );
  }

  #[test]
  fn parse_rejects_blank_bounds() {
    assert_eq!(DateRange::parse("", ""), None);
    assert_eq!(
      DateRange::parse(
        "2026-05-31",
        " 2026-05-01 "
      ),
      Some(DateRange::new(
        date(2026, 5, 1),
        date(2026, 5, 31)
      ))
    );
  }

  #[test]
  fn last_days_is_inclusive_of_today() {
    let range = DateRange::last_days(
      date(2026, 2, 7),
      7
    );
    assert_eq!(range.from, date(2026, 2, 1));
    assert_eq!(range.to, date(2026, 2, 7));
  }
}
