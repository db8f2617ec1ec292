//! Prompt Template System
//!
//! Loads and renders the `.pmt` templates that frame each generation task.
//!
//! Template loading chain:
//! 1. `{override-dir}/{name}.pmt` (user override, from config)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax with HTML escaping turned off.

pub mod embedded;
mod loader;

pub use loader::PromptLoader;
