pub mod package;
pub mod project;
pub mod variables;
