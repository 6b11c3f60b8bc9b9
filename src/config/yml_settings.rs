use serde::{Deserialize, Serialize};

/// One engine entry of the YAML catalog
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct EngineSettings {
    pub alias: String,
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<bool>,
}
