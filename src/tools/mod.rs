//! Tool catalog and command-line construction.
//!
//! Each tool pairs a descriptor (name, description, input schema) with a
//! [`CommandTemplate`]. The catalog is built once at startup and never changes.

mod registry;
mod template;

pub use registry::{Tool, ToolDescriptor, ToolRegistry};
pub use template::{CommandTemplate, TemplateError};
