pub mod archive;
pub mod validator;

pub use archive::{build_archive, BuiltArchive};
pub use validator::{validate_dependencies, validate_environment_variables, validate_request};
