// Named functions usable as `(name)` modifiers

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped by `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `value` the way `encodeURIComponent` does
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Trait for text transformations addressed by name
pub trait TextFunction: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, value: &str) -> String;
}

pub struct LowercaseFn;

impl TextFunction for LowercaseFn {
    fn name(&self) -> &'static str {
        "lowercase"
    }

    fn apply(&self, value: &str) -> String {
        value.to_lowercase()
    }
}

pub struct UppercaseFn;

impl TextFunction for UppercaseFn {
    fn name(&self) -> &'static str {
        "uppercase"
    }

    fn apply(&self, value: &str) -> String {
        value.to_uppercase()
    }
}

pub struct EncodeUriComponentFn;

impl TextFunction for EncodeUriComponentFn {
    fn name(&self) -> &'static str {
        "encodeuricomponent"
    }

    fn apply(&self, value: &str) -> String {
        encode_uri_component(value)
    }
}

/// Leaves the text alone. Its presence in a chain turns off the final encoding step.
pub struct DisableUriEncodingFn;

impl TextFunction for DisableUriEncodingFn {
    fn name(&self) -> &'static str {
        "disableuriencoding"
    }

    fn apply(&self, value: &str) -> String {
        value.to_string()
    }
}

/// Registry for named functions, keyed by lowercase name
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Box<dyn TextFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };
        registry.register(Box::new(LowercaseFn));
        registry.register(Box::new(UppercaseFn));
        registry.register(Box::new(EncodeUriComponentFn));
        registry.register(Box::new(DisableUriEncodingFn));
        registry
    }

    pub fn register(&mut self, function: Box<dyn TextFunction>) {
        self.functions.insert(function.name(), function);
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&dyn TextFunction> {
        self.functions
            .get(name.to_ascii_lowercase().as_str())
            .map(|b| b.as_ref())
    }

    /// Apply the named function; unknown names leave the text unchanged
    pub fn apply(&self, name: &str, value: &str) -> String {
        match self.get(name) {
            Some(function) => function.apply(value),
            None => value.to_string(),
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
