mod files;
pub use files::{OutputFile, SourceFile};

mod graph;
pub use graph::{FileIndex, FileRelation, TargetGraph};

mod label;
pub use label::Label;

mod layout;
pub use layout::Layout;

mod target;
pub use target::{CrateKind, RustValues, Target, TargetInner, TargetKind};

mod toolchain;
pub use toolchain::{Tool, Toolchain};
