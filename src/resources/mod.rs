pub mod collections;
pub mod crud;
pub mod registry;

pub use crud::{CrudError, Resource, StoredResource};
pub use registry::{Operations, RegistryError, ResourceDescriptor, ResourceRegistry};
