//! Cross-validation of derived structures.

mod index;
mod load;
mod validator;

pub use index::{ContentIndex, PageContent};
pub use load::{load_content_index, load_toc_index};
pub use validator::{CrossValidator, ValidationOptions, ValidationReport};
