//! Comparison of a deploy package against a baseline package.

pub mod engine;
pub mod file_list;
pub mod record;
pub mod result;
pub mod status;
pub mod tree;
pub mod variables;

pub use engine::{Comparator, ComparisonError};
pub use record::{ComparisonStatus, ConfigFileRecord, ConfigKeyInfo};
pub use result::{ComparisonResult, MalformedInputError};
pub use tree::FileNode;
