pub mod ast;
pub mod config;
pub mod equality;
pub mod error;
pub mod hasher;
pub mod number;
pub mod obfuscator;
pub mod serializer;
pub mod visit;

pub use config::SqlObjectsConfig;
pub use equality::equals;
pub use error::SqlObjectError;
pub use hasher::hash;
pub use number::Number64;
pub use obfuscator::{Obfuscator, obfuscate};
pub use serializer::{ParameterBindings, pretty_print, serialize, serialize_parameterized};
pub use visit::{Accept, SqlObject, SqlObjectArgVisitor, SqlObjectKind, SqlObjectRef, SqlObjectVisitor};
