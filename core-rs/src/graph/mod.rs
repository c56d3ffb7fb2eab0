//! Graph rendering
//!
//! Turns hierarchy and neighborhood queries into the node/link/category
//! payload consumed by graph widgets, with degree-based symbol sizing.

pub mod degree;
pub mod edge;
pub mod hierarchy;
pub mod model;
pub mod neighborhood;

pub use degree::{refresh_degree, symbol_size, DegreeRefiner};
pub use edge::EdgeKind;
pub use hierarchy::{Hierarchy, HierarchyExtractor};
pub use model::{Category, LineStyle, LineType, LinkLabel, VisualGraph, VisualLink, VisualNode, UNDEFINED_CATEGORY};
pub use neighborhood::{Neighborhood, NeighborhoodBuilder, CLASS_CATEGORY, INSTANCE_CATEGORY};
