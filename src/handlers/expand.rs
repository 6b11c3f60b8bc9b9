// Raw expansion endpoint: runs the substitution engine on an arbitrary template

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::domain::{
    modifier::{substitute, ModificationChain, ModifierParser},
    SEARCH_TERMS,
};

fn default_variable() -> String {
    SEARCH_TERMS.to_string()
}

fn default_encode() -> bool {
    true
}

#[derive(Deserialize)]
pub struct ExpandParams {
    template: String,
    #[serde(default)]
    text: String,
    #[serde(default = "default_variable")]
    variable: String,
    #[serde(default = "default_encode")]
    encode: bool,
}

#[derive(Serialize)]
pub struct ExpandResponse {
    pub url: String,
    /// Parsed chain of the first occurrence, the sentinel if none parses
    pub first_occurrence: ModificationChain,
}

// GET /expand?template=..&text=..&variable=..&encode=..
pub async fn expand(Query(params): Query<ExpandParams>) -> Json<ExpandResponse> {
    let url = substitute(&params.template, &params.variable, &params.text, params.encode);
    let first_occurrence = ModifierParser::locate(&params.template, &params.variable, 0);

    Json(ExpandResponse {
        url,
        first_occurrence,
    })
}
