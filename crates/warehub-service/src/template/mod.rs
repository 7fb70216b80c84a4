//! What an alert says: variables, bundled templates, selection, and rendering.

pub mod format;
pub mod legacy;
pub mod renderer;
pub mod selector;
pub mod tables;
pub mod variables;

pub use renderer::{TemplateValidation, Variables, html_to_text, normalize, render, validate};
pub use selector::{SelectedTemplate, TemplateChoice, TemplateOrigin, TemplateSelector};
pub use tables::TableGenerator;
pub use variables::{KNOWN_VARIABLES, TemplateVariables, VariableBuilder};
