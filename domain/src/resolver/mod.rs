//! Resolvers: identities, the registry table, request preprocessing and
//! routing policy.

pub mod name;
pub mod preprocess;
pub mod registry;
pub mod selection;

pub use name::ResolverName;
pub use preprocess::Preprocessing;
pub use registry::{ResolverRegistry, ResolverSpec, well_known};
pub use selection::{
    DomainRule, NeverSuitable, ResolverSelector, RoutingTable, Specialty, SuitabilityPolicy,
};
