//! Main-content extraction
//!
//! Pages are reduced to their substantive region by an ordered, configurable
//! policy: strip non-content tags, drop boilerplate by attribute pattern,
//! probe for the content container, then clean up inside it.

mod main_content;
mod rules;

pub use main_content::extract_main;
pub use rules::{check_tag_name, compile_pattern, AttributeRule, ContainerProbe, ExtractionRules};
