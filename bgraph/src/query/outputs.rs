use crate::core::{FileIndex, FileRelation, Label, OutputFile, SourceFile, Target, TargetGraph};
use crate::utils::IResult;
use anyhow::bail;
use std::collections::HashSet;
use std::str::FromStr;


/// Insertion-ordered target set. A target picked up through several inputs
/// is still resolved once.
#[derive(Default)]
pub struct TargetSet {
    order: Vec<Target>,
    seen: HashSet<Label>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn push(&mut self, target: &Target) {
        if self.seen.insert(target.label().clone()) {
            self.order.push(target.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.order.iter()
    }
}


/// One element of a mixed target/file query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Target(Label),
    File(SourceFile),
}

impl QueryInput {
    /// Classifies a raw input string. Labels start with `//` or carry an
    /// explicit `:`; everything else is a file path relative to the project
    /// root.
    pub fn parse(input: &str) -> IResult<Self> {
        if input.starts_with("//") || input.contains(':') {
            Ok(Self::Target(Label::from_str(input)?))
        } else {
            Ok(Self::File(SourceFile::new(input)))
        }
    }
}


/// Every file a target produces as a build result, in declared output order.
pub fn target_outputs(graph: &TargetGraph, target: &Target) -> IResult<Vec<OutputFile>> {
    let toolchain = graph.toolchain_for(target)?;
    target.build_outputs(toolchain)
}

/// Outputs corresponding to one source file.
///
/// For each target compiling the file, the outputs of that compile step (a
/// file with no compile step contributes nothing). A target merely listing
/// the file as an input is folded into `targets` instead: the input maps to
/// the owning target's own outputs, which the caller resolves in its
/// target pass.
pub fn file_outputs(
    graph: &TargetGraph,
    index: &FileIndex,
    file: &SourceFile,
    targets: &mut TargetSet,
) -> IResult<Vec<OutputFile>> {
    let refs = index.refs(file);
    if refs.is_empty() {
        bail!("no targets reference the file '{}'", file);
    }

    let mut outputs = Vec::new();
    for (target, how) in refs {
        match how {
            FileRelation::Input => targets.push(target),
            FileRelation::Source => {
                let toolchain = graph.toolchain_for(target)?;
                outputs.extend(target.outputs_for_source(toolchain, file));
            }
        }
    }
    Ok(outputs)
}

/// The union query over a mixed list of target and file identifiers.
///
/// Any input resolving to zero targets or files aborts the whole query, as
/// does a failing output computation. File-derived outputs come first
/// because file resolution may add targets to the target pass; nothing is
/// deduplicated beyond the per-target uniqueness of [`TargetSet`].
pub fn resolve_outputs(
    graph: &TargetGraph,
    index: &FileIndex,
    inputs: &[String],
) -> IResult<Vec<OutputFile>> {
    let mut files = Vec::new();
    let mut targets = TargetSet::new();
    for input in inputs {
        match QueryInput::parse(input)? {
            QueryInput::File(file) => files.push(file),
            QueryInput::Target(label) => {
                let matches = graph.matching(&label);
                if matches.is_empty() {
                    bail!("the input `{}` matched no targets", input);
                }
                for target in matches {
                    targets.push(target);
                }
            }
        }
    }
    if files.is_empty() && targets.is_empty() {
        bail!("the input matched no targets or files");
    }

    let mut outputs = Vec::new();

    // Files first: an `inputs` reference adds its owning target to the set.
    for file in files.iter() {
        outputs.extend(file_outputs(graph, index, file, &mut targets)?);
    }

    for target in targets.iter() {
        outputs.extend(target_outputs(graph, target)?);
    }

    Ok(outputs)
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn classify() {
        assert!(matches!(
            QueryInput::parse("//hare:bar").unwrap(),
            QueryInput::Target(..)
        ));
        assert!(matches!(
            QueryInput::parse("src/lib.cc").unwrap(),
            QueryInput::File(..)
        ));
        // A bare `:` forces label interpretation, and must parse as one
        assert!(QueryInput::parse("src:lib").is_err());
    }
}
