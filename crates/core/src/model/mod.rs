pub mod builder;
pub mod entity;
pub mod expr;
pub mod file;
pub mod package;
pub mod primitive;
pub mod range;
pub mod refs;
pub mod scope;
pub mod type_ref;

pub use builder::FileScopeBuilder;
pub use entity::*;
pub use expr::*;
pub use file::*;
pub use package::PackageScope;
pub use primitive::PrimitiveType;
pub use range::*;
pub use refs::*;
pub use scope::*;
pub use type_ref::*;
