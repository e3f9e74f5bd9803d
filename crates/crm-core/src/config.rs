use anyhow::Context;
use serde::Deserialize;
use tracing::{
  info,
  warn
};

use crate::session::Role;

pub const SALES_PROFILE: &str =
  "Nirmaan Sales User Profile";
pub const ESTIMATES_PROFILE: &str =
  "Nirmaan Estimations User Profile";
pub const ADMIN_PROFILE: &str =
  "Nirmaan Admin User Profile";

#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
  Deserialize,
)]
#[serde(default)]
pub struct CrmConfig {
  pub api:   ApiConfig,
  pub roles: RoleNames,
  pub guard: GuardConfig
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Default,
  Deserialize,
)]
#[serde(default)]
pub struct ApiConfig {
  /// Empty means same origin.
  pub base_url: String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct RoleNames {
  pub sales:     String,
  pub estimates: String,
  pub admin:     String
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
#[serde(default)]
pub struct GuardConfig {
  pub home:                   String,
  pub login:                  String,
  pub restricted_sales_paths: Vec<String>,
  pub sales_paths:            Vec<String>,
  pub estimates_paths:        Vec<String>,
  pub admin_only_prefixes:    Vec<String>
}

impl Default for RoleNames {
  fn default() -> Self {
    Self {
      sales:     SALES_PROFILE
        .to_string(),
      estimates: ESTIMATES_PROFILE
        .to_string(),
      admin:     ADMIN_PROFILE
        .to_string()
    }
  }
}

impl Default for GuardConfig {
  fn default() -> Self {
    Self {
      home:                   "/"
        .to_string(),
      login:                  "/login"
        .to_string(),
      restricted_sales_paths: paths(&[
        "/", "/boqs"
      ]),
      sales_paths:            paths(&[
        "/",
        "/boqs",
        "/contacts",
        "/companies",
        "/tasks",
        "/calendar"
      ]),
      estimates_paths:        paths(&[
        "/",
        "/boqs",
        "/calendar",
        "/tasks"
      ]),
      admin_only_prefixes:    paths(&[
        "/team"
      ])
    }
  }
}

impl CrmConfig {
  /// Builds the configuration from optional TOML text layered over
  /// the compiled-in defaults. Missing sections keep their defaults.
  #[tracing::instrument(skip(
    toml_text
  ))]
  pub fn load(
    toml_text: Option<&str>
  ) -> anyhow::Result<Self> {
    let Some(text) = toml_text else {
      warn!(
        "no crm config supplied; using \
         defaults"
      );
      return Ok(Self::default());
    };

    let cfg = Self::from_toml_str(text)?;
    info!(
      base_url = %cfg.api.base_url,
      "loaded crm config"
    );
    Ok(cfg)
  }

  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    toml::from_str::<Self>(text)
      .context(
        "failed to parse crm config"
      )
  }

  /// Maps a backend profile name onto a role.
  pub fn profile_role(
    &self,
    profile_name: &str
  ) -> Role {
    let name = profile_name.trim();
    if name == self.roles.sales {
      Role::Sales
    } else if name
      == self.roles.estimates
    {
      Role::Estimates
    } else if name == self.roles.admin
    {
      Role::Admin
    } else {
      Role::Other(name.to_string())
    }
  }
}

fn paths(raw: &[&str]) -> Vec<String> {
  raw
    .iter()
    .map(|path| path.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_toml_keeps_defaults_for_missing_sections(
  ) {
    let cfg = CrmConfig::from_toml_str(
      r#"
[api]
base_url = "https://crm.example.com"

[guard]
estimates_paths = ["/", "/boqs"]
"#
    )
    .expect("parse config");

    assert_eq!(
      cfg.api.base_url,
      "https://crm.example.com"
    );
    assert_eq!(
      cfg.guard.estimates_paths,
      vec![
        "/".to_string(),
        "/boqs".to_string()
      ]
    );
    assert_eq!(
      cfg.guard.restricted_sales_paths,
      GuardConfig::default()
        .restricted_sales_paths
    );
    assert_eq!(
      cfg.roles,
      RoleNames::default()
    );
  }

  #[test]
  fn profile_names_map_to_roles() {
    let cfg = CrmConfig::default();
    assert_eq!(
      cfg.profile_role(SALES_PROFILE),
      Role::Sales
    );
    assert_eq!(
      cfg.profile_role(ADMIN_PROFILE),
      Role::Admin
    );
    assert_eq!(
      cfg.profile_role("Guest"),
      Role::Other("Guest".to_string())
    );
  }

  #[test]
  fn invalid_toml_reports_context() {
    let err = CrmConfig::from_toml_str(
      "[guard\nhome = 1"
    )
    .expect_err("invalid toml");
    assert!(
      err
        .to_string()
        .contains("failed to parse crm config")
    );
  }
}
