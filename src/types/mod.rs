// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Resource identifier parsing, region lookup, and phantom-typed IDs.

mod id;
mod ocid;
mod region;

pub use id::{DeploymentId, Id, PipelineId};
pub use ocid::{Ocid, OcidError, parse_region};
pub use region::{Region, RegionError};
