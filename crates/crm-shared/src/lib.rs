pub mod store;

use serde::{
  Deserialize,
  Deserializer,
  Serialize
};

pub const COMPANY_DOCTYPE: &str =
  "CRM Company";
pub const CONTACT_DOCTYPE: &str =
  "CRM Contacts";
pub const BOQ_DOCTYPE: &str = "CRM BOQ";
pub const TASK_DOCTYPE: &str =
  "CRM Task";
pub const USER_DOCTYPE: &str =
  "CRM Users";

/// Which team a task belongs to.
#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Hash,
)]
pub enum TaskProfile {
  Sales,
  Estimates
}

impl TaskProfile {
  pub fn as_str(self) -> &'static str {
    match self {
      | Self::Sales => "Sales",
      | Self::Estimates => "Estimates"
    }
  }

  pub fn parse(
    raw: &str
  ) -> Option<Self> {
    match raw.trim() {
      | "Sales" => Some(Self::Sales),
      | "Estimates" => {
        Some(Self::Estimates)
      }
      | _ => None
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct CompanyDoc {
  pub name:            String,
  pub company_name:    Option<String>,
  pub company_website: Option<String>,
  pub company_type:    Option<String>,
  pub company_city:    Option<String>,
  pub assigned_sales:  Option<String>,
  pub last_meeting:    Option<String>,
  pub modified:        Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct ContactDoc {
  pub name:           String,
  pub company:        Option<String>,
  pub first_name:     Option<String>,
  pub last_name:      Option<String>,
  pub mobile:         Option<String>,
  pub email:          Option<String>,
  pub designation:    Option<String>,
  pub department:     Option<String>,
  pub assigned_sales: Option<String>,
  pub last_meeting:   Option<String>,
  pub modified:       Option<String>
}

impl ContactDoc {
  pub fn display_name(&self) -> String {
    let full = [
      self.first_name.as_deref(),
      self.last_name.as_deref()
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    if full.is_empty() {
      self.name.clone()
    } else {
      full
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct BoqDoc {
  pub name:                 String,
  pub boq_name:             Option<String>,
  pub company:              Option<String>,
  pub contact:              Option<String>,
  pub boq_status:           Option<String>,
  pub boq_sub_status:       Option<String>,
  pub boq_value:            Option<String>,
  pub boq_submission_date:  Option<String>,
  pub city:                 Option<String>,
  pub remarks:              Option<String>,
  pub deal_status:          Option<String>,
  pub assigned_sales:       Option<String>,
  pub assigned_estimations: Option<String>,
  pub modified:             Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct TaskDoc {
  pub name:           String,
  pub title:          Option<String>,
  #[serde(rename = "type")]
  pub task_type:      Option<String>,
  pub company:        Option<String>,
  pub contact:        Option<String>,
  pub boq:            Option<String>,
  pub start_date:     Option<String>,
  pub time:           Option<String>,
  pub status:         Option<String>,
  pub reason:         Option<String>,
  pub remarks:        Option<String>,
  pub assigned_sales: Option<String>,
  #[serde(
    default,
    deserialize_with = "deserialize_task_profile"
  )]
  pub task_profile:   Option<TaskProfile>,
  pub modified:       Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct CrmUserDoc {
  pub name:              String,
  pub full_name:         Option<String>,
  pub user_image:        Option<String>,
  pub nirmaan_role_name: Option<String>,
  /// A missing or `null` flag reads as `false`, so a Sales user stays
  /// confined until the backend says they own a company.
  #[serde(
    default,
    deserialize_with = "deserialize_flag"
  )]
  pub has_company:       bool
}

// Unknown or blank profiles decode as missing so callers can apply
// their own fallback.
fn deserialize_task_profile<'de, D>(
  deserializer: D
) -> Result<Option<TaskProfile>, D::Error>
where
  D: Deserializer<'de>
{
  let raw =
    Option::<String>::deserialize(
      deserializer
    )?;
  Ok(
    raw
      .as_deref()
      .and_then(TaskProfile::parse)
  )
}

/// Decodes a Frappe check field that may arrive as a bool, a 0/1
/// integer, or the legacy `"true"`/`"false"` strings.
pub fn deserialize_flag<'de, D>(
  deserializer: D
) -> Result<bool, D::Error>
where
  D: Deserializer<'de>
{
  let value =
    serde_json::Value::deserialize(
      deserializer
    )?;
  Ok(flag_from_value(&value))
}

pub fn flag_from_value(
  value: &serde_json::Value
) -> bool {
  match value {
    | serde_json::Value::Bool(flag) => {
      *flag
    }
    | serde_json::Value::Number(
      number
    ) => {
      number
        .as_i64()
        .is_some_and(|n| n != 0)
    }
    | serde_json::Value::String(raw) => {
      matches!(
        raw.trim()
          .to_ascii_lowercase()
          .as_str(),
        "true" | "1" | "yes"
      )
    }
    // `null`, arrays and objects fail closed.
    | _ => false
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn missing_or_null_company_flag_is_false() {
    let missing: CrmUserDoc =
      serde_json::from_value(json!({
        "name": "sales@example.com"
      }))
      .expect("decode user without flag");
    assert!(!missing.has_company);

    let null: CrmUserDoc =
      serde_json::from_value(json!({
        "name": "sales@example.com",
        "has_company": null
      }))
      .expect("decode user with null flag");
    assert!(!null.has_company);
  }

  #[test]
  fn has_company_accepts_legacy_strings()
  {
    let legacy: CrmUserDoc =
      serde_json::from_value(json!({
        "name": "sales@example.com",
        "nirmaan_role_name": "Nirmaan Sales User Profile",
        "has_company": "false"
      }))
      .expect("decode legacy user");
    assert!(!legacy.has_company);

    let numeric: CrmUserDoc =
      serde_json::from_value(json!({
        "name": "sales@example.com",
        "has_company": 1
      }))
      .expect("decode numeric user");
    assert!(numeric.has_company);

    let missing: CrmUserDoc =
      serde_json::from_value(json!({
        "name": "guest"
      }))
      .expect("decode bare user");
    assert!(!missing.has_company);
  }

  #[test]
  fn task_profile_decodes_unknown_as_missing(
  ) {
    let task: TaskDoc =
      serde_json::from_value(json!({
        "name": "TASK-0001",
        "type": "Call",
        "task_profile": "Marketing"
      }))
      .expect("decode task");
    assert_eq!(task.task_profile, None);
    assert_eq!(
      task.task_type.as_deref(),
      Some("Call")
    );

    let task: TaskDoc =
      serde_json::from_value(json!({
        "name": "TASK-0002",
        "task_profile": "Estimates"
      }))
      .expect("decode task");
    assert_eq!(
      task.task_profile,
      Some(TaskProfile::Estimates)
    );
  }

  #[test]
  fn contact_display_name_falls_back_to_doc_name(
  ) {
    let contact = ContactDoc {
      name: "CONT-0009".to_string(),
      ..ContactDoc::default()
    };
    assert_eq!(
      contact.display_name(),
      "CONT-0009"
    );

    let contact = ContactDoc {
      name: "CONT-0010".to_string(),
      first_name: Some(
        "Asha".to_string()
      ),
      last_name: Some(
        "Rao".to_string()
      ),
      ..ContactDoc::default()
    };
    assert_eq!(
      contact.display_name(),
      "Asha Rao"
    );
  }
}
