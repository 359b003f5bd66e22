//! Widget template resource
//!
//! One read-only resource: the widget markup, fetched from a
//! `TemplateSource` at startup and served unchanged afterwards.

mod error;
mod source;
mod widget;

pub use error::{ResourceError, ResourceResult};
pub use source::{
    template_source, FileTemplateSource, HttpTemplateSource, StaticTemplateSource, TemplateSource,
};
pub use widget::{ResourceContent, ResourceDescriptor, WidgetResource};
