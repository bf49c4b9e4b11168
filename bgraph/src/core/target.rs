use crate::core::{Label, OutputFile, SourceFile, Toolchain};
use crate::utils::IResult;
use std::collections::BTreeMap;
use std::sync::Arc;


/// What a build node produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    StaticLibrary,
    SharedLibrary,
    Executable,
    RustLibrary,
    RustProcMacro,
    Action,
    Copy,
    Group,
}


/// Crate type of a compiled Rust target.
///
/// Kept as a variant rather than a bag of booleans since most projection
/// decisions apply to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrateKind {
    Library,
    Binary,
    ProcMacro,
}


/// Language-specific values of a compiled Rust target.
#[derive(Debug, Clone)]
pub struct RustValues {
    /// Root compilation unit (`lib.rs`/`main.rs`).
    pub crate_root: SourceFile,
    /// Symbolic name other crates link this crate under.
    pub crate_name: String,
    pub kind: CrateKind,
    /// Language edition tag, e.g. `"2018"`.
    pub edition: String,
    /// Compiler flags, as declared.
    pub flags: Vec<String>,
    /// Dependencies linked under a different name than their crate name.
    pub renamed_deps: BTreeMap<Label, String>,
    /// Opts out of the implicit standard library.
    pub no_std: bool,
}


/// A resolved build node.
///
/// Created once during graph construction and never mutated afterwards;
/// queries hold cheap clones while the graph owns the set.
#[derive(Clone)]
pub struct Target(Arc<TargetInner>);

#[derive(Debug)]
pub struct TargetInner {
    pub label: Label,
    pub kind: TargetKind,
    /// Declared source files, in declaration order.
    pub sources: Vec<SourceFile>,
    /// Declared non-compiled inputs.
    pub inputs: Vec<SourceFile>,
    /// Dependency targets, resolved against the owning graph.
    pub deps: Vec<Label>,
    /// Declared outputs (actions and copies); binary kinds derive theirs
    /// from the toolchain instead.
    pub outputs: Vec<OutputFile>,
    pub rust: Option<RustValues>,
}

impl std::ops::Deref for Target {
    type Target = TargetInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Target {
    pub fn new(inner: TargetInner) -> Self {
        Self(Arc::new(inner))
    }

    pub fn label(&self) -> &Label {
        &self.0.label
    }

    pub fn is_rust(&self) -> bool {
        self.0.rust.is_some()
    }

    pub fn rust(&self) -> Option<&RustValues> {
        self.0.rust.as_ref()
    }

    /// Directory for intermediate outputs, relative to the build root.
    pub fn out_dir(&self) -> String {
        let dir = self.label.dir().trim_start_matches('/');
        if dir.is_empty() {
            // Root-level targets land directly in obj/
            "obj".to_string()
        } else {
            format!("obj/{}", dir)
        }
    }

    /// Stamp file marking the target as done, for kinds with no real output.
    pub fn stamp_file(&self) -> OutputFile {
        OutputFile::new(format!("{}/{}.stamp", self.out_dir(), self.label.name()))
    }

    /// The toolchain tool that produces this target's own output, if any.
    pub fn tool_name(&self) -> Option<&'static str> {
        match self.kind {
            TargetKind::StaticLibrary => Some("alink"),
            TargetKind::SharedLibrary => Some("solink"),
            TargetKind::RustLibrary => Some("rust_rlib"),
            TargetKind::RustProcMacro => Some("rust_macro"),
            TargetKind::Executable => Some(if self.is_rust() { "rust_bin" } else { "link" }),
            TargetKind::Action | TargetKind::Copy | TargetKind::Group => None,
        }
    }

    /// Every file this target produces as a build result, in declared order.
    ///
    /// The only failure mode is an inconsistent configuration (an action
    /// with no declared outputs, or a binary whose toolchain lacks the
    /// required tool); the message propagates to the caller verbatim.
    pub fn build_outputs(&self, toolchain: &Toolchain) -> IResult<Vec<OutputFile>> {
        match self.kind {
            TargetKind::Action | TargetKind::Copy => {
                if self.outputs.is_empty() {
                    anyhow::bail!("target `{}` declares no outputs", self.label);
                }
                Ok(self.outputs.clone())
            }
            TargetKind::Group => Ok(vec![self.stamp_file()]),
            _ => {
                let tool = toolchain.tool_for_target(self).ok_or_else(|| {
                    anyhow::anyhow!(
                        "toolchain `{}` has no `{}` tool for target `{}`",
                        toolchain.label(),
                        self.tool_name().unwrap_or("?"),
                        self.label,
                    )
                })?;
                Ok(tool.outputs_for(self, None))
            }
        }
    }

    /// Outputs of the compile step for one of this target's sources.
    ///
    /// A source with no compile step (a header, a text file) yields an empty
    /// list, which is not an error.
    pub fn outputs_for_source(&self, toolchain: &Toolchain, file: &SourceFile) -> Vec<OutputFile> {
        match toolchain.tool_for_source(self, file) {
            Some(tool) => tool.outputs_for(self, Some(file)),
            None => Vec::new(),
        }
    }
}

impl Eq for Target {}

impl PartialEq for Target {
    fn eq(&self, other: &Target) -> bool {
        std::ptr::eq(&*self.0, &*other.0)
    }
}

impl std::hash::Hash for Target {
    fn hash<H: std::hash::Hasher>(&self, hasher: &mut H) {
        std::ptr::hash(&*self.0, hasher)
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
