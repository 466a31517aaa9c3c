mod dialect;
mod document;
mod lexer;
mod methods;
mod types;

pub use dialect::{starts_with_keyword, strip_keyword, Dialect};
pub use document::SourceDocument;
pub use lexer::{classify, is_annotation, mask_strings, normalize, strip_trailing_comment};
pub use methods::{find_methods, is_declaration_boundary};
pub use types::{Block, LineClass, MethodSpan, NewlineStyle};
