mod outputs;
pub use outputs::{file_outputs, resolve_outputs, target_outputs, QueryInput, TargetSet};
