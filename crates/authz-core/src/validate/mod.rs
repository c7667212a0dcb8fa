//! Field-presence validation of hand-written model files
//!
//! - **contract**: the fields every relationship model must declare
//! - **reader**: structural readers that pull a declaration out of a
//!   Python or TypeScript source file
//! - **validator**: compares a declaration with the schema model

mod contract;
mod reader;
mod validator;

pub use contract::FieldContract;
pub use reader::{
    FieldDecl, ModelDeclaration, ModelReader, PythonModelReader, TypeScriptModelReader,
    load_declaration, reader_for_extension,
};
pub use validator::{FieldPresenceValidator, ValidationError};
