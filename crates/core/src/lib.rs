//! Entity and scope model of the Java semantic engine.
//!
//! Files are built once through [`model::FileScopeBuilder`] and assembled into a
//! [`module::Module`]; the solver crate only ever reads them.

pub mod builtin;
pub mod config;
pub mod error;
pub mod handle;
pub mod logging;
pub mod model;
pub mod module;
pub mod shadowing;

pub use config::EngineConfig;
pub use error::{Result, SemanticError};
pub use handle::ModuleHandle;
pub use module::Module;
pub use shadowing::{ShadowGroup, Shadowable, ShadowingListBuilder};
