pub mod group;
pub mod method;
pub mod resource;
pub mod security;
pub mod specification;

pub use group::ApiGroup;
pub use method::{HttpMethod, Method, MethodRef, Parameter, Response};
pub use resource::{Resource, ResourceKey};
pub use security::{OAuth2Scheme, Security, SecurityScheme};
pub use specification::{ApiSpecification, Info};
