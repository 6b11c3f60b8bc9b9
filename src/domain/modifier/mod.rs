// Template variable modification language
//
// A variable token such as `{searchTerms{ |+}(uppercase)[0:5]}` carries a chain of text
// transformations. This module locates such tokens, parses their chains, and substitutes
// the transformed text back into the template.

mod apply;
mod ast;
mod functions;
mod parser;
mod substitution;

pub use apply::slice_chars;
pub use ast::{Modification, ModificationChain, VariableSpan};
pub use functions::{encode_uri_component, FunctionRegistry, TextFunction};
pub use parser::ModifierParser;
pub use substitution::{substitute, substitute_all, trim_text, Substituter};
