// Common test utilities shared across test files

use selsearch::{config::EngineCatalog, create_router, AppState};

#[allow(dead_code)]
pub const TEST_ENGINES: &str = r#"
- alias: g
  name: Google
  url: 'https://www.google.com/search?q={searchTerms}'
  description: Search <Google>
- alias: gs
  name: Google (this site)
  url: 'https://www.google.com/search?q={searchTerms}+site%3A{hostname}'
- alias: w
  name: Wikipedia
  url: 'https://en.wikipedia.org/wiki/{searchTerms{ |_}(disableuriencoding)}'
- alias: raw
  name: Raw
  url: 'https://example.com/{searchTerms}'
  encode: false
"#;

/// Catalog built from TEST_ENGINES
#[allow(dead_code)]
pub fn test_catalog() -> EngineCatalog {
    EngineCatalog::from_yaml(TEST_ENGINES).expect("Failed to parse test engines")
}

/// Create a test Axum router for integration tests
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    create_router(AppState::new(test_catalog()))
}
