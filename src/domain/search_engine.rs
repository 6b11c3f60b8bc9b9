// Search engine: a named URL template the selection is substituted into

use serde::Serialize;

use super::modifier::substitute_all;
use super::page_context::PageContext;

pub const SEARCH_TERMS: &str = "searchTerms";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEngine {
    pub alias: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub encode: bool,
}

impl SearchEngine {
    pub fn new(alias: &str, name: &str, url: &str) -> Self {
        Self {
            alias: alias.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            description: None,
            encode: true,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_no_encode(mut self) -> Self {
        self.encode = false;
        self
    }

    /// Build the destination URL for `selection`.
    ///
    /// Page variables and `searchTerms` are spliced in one pass over the template, so
    /// neither the selected text nor a page value is ever scanned for other variables.
    /// Without a page context the page variables are left as written.
    pub fn build_url(&self, selection: &str, page: Option<&PageContext>) -> String {
        let mut values: Vec<(&str, &str)> =
            page.map(|p| p.variables().to_vec()).unwrap_or_default();
        values.push((SEARCH_TERMS, selection));

        substitute_all(&self.url, &values, self.encode)
    }
}
