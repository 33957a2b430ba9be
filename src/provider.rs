//! Provider-facing descriptors (data), operations, and strategies (behavior).
//!
//! `descriptor` exposes validated metadata (`ProviderDescriptor`) covering the user-pool
//! region and its JSON RPC endpoint. `operation` names the three user-pool actions the
//! gateway drives. `strategy` defines [`ProviderStrategy`], an HTTP-client-agnostic hook that
//! maps provider failures into the gateway error taxonomy.

pub mod descriptor;
pub mod operation;
pub mod strategy;

pub use descriptor::*;
pub use operation::*;
pub use strategy::*;
