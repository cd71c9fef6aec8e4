//! TeX parsing and preprocessing.

mod macros;
mod options;
mod tex;

pub use macros::{resolve_macros, resolve_macros_file};
pub use options::IdentifyOptions;
pub use tex::parse_tex;
