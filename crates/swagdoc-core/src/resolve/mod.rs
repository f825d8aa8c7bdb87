pub mod classify;
pub mod example;
pub mod loader;
pub mod method;
pub mod namespace;
pub mod naming;
pub mod resource;
pub mod security;

pub use classify::{Classified, Shape, classify, shape_of};
pub use loader::{BuildOptions, DEFAULT_VERSION, build, build_into, operation_in_tag};
pub use method::MethodCompiler;
pub use resource::{MAP_KEY, Resolved, ResourceResolver};
