// Clean Reader DOM layer
// A parsed, read-only snapshot of the page (`Document`) and the seam to the
// live page whose body the reading view replaces (`PageHost`).

pub mod document;
pub mod page;

pub use document::{Document, ImageSize};
pub use page::{HtmlPage, PageHost};
