// The type-level metric suite.
// One module per metric; the engine gets a fresh suite per measured type.

pub mod cohesion;
pub mod complexity;
pub mod coupling;
pub mod field_count;
pub mod hierarchy;
pub mod loc;
pub mod method_count;
pub mod response;

use crate::domain::type_index::TypeIndex;
use crate::ports::TypeLevelMetric;
use std::sync::Arc;

pub use cohesion::CohesionMetric;
pub use complexity::ComplexityMetric;
pub use coupling::CouplingMetric;
pub use field_count::FieldCountMetric;
pub use hierarchy::HierarchyMetric;
pub use loc::LocMetric;
pub use method_count::MethodCountMetric;
pub use response::ResponseMetric;

/// Fresh instances of every type-level metric.
pub fn type_level_suite(index: &Arc<TypeIndex>) -> Vec<Box<dyn TypeLevelMetric>> {
    vec![
        Box::new(MethodCountMetric::new()),
        Box::new(FieldCountMetric::new()),
        Box::new(ComplexityMetric::new()),
        Box::new(CouplingMetric::new()),
        Box::new(ResponseMetric::new()),
        Box::new(CohesionMetric::new()),
        Box::new(HierarchyMetric::new(Arc::clone(index))),
        Box::new(LocMetric::new()),
    ]
}
