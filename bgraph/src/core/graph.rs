use crate::core::{Label, SourceFile, Target, Toolchain};
use crate::utils::IResult;
use std::collections::HashMap;


/// The fully-resolved, immutable build graph.
///
/// Construction happens behind the frontend's completion barrier; every
/// query afterwards takes `&TargetGraph` and nothing ever mutates it.
#[derive(Debug)]
pub struct TargetGraph {
    // Insertion order is the resolution order and is observable (projection
    // input order), so keep the list alongside the lookup maps.
    targets: Vec<Target>,
    by_label: HashMap<Label, Target>,
    toolchains: HashMap<String, Toolchain>,
    // Canonical `//dir:name` of the default toolchain
    default_toolchain: String,
}

impl TargetGraph {
    /// Freezes a resolved target set.
    ///
    /// Every target label must be unique (per toolchain), every dependency
    /// must name a target in the set, and every target's toolchain must be
    /// supplied; a violation means the frontend handed over an unresolved
    /// graph, which is an error here.
    pub fn new(
        targets: Vec<Target>,
        toolchains: Vec<Toolchain>,
        default_toolchain: Label,
    ) -> IResult<Self> {
        let mut by_label = HashMap::new();
        for target in targets.iter() {
            if by_label.insert(target.label().clone(), target.clone()).is_some() {
                anyhow::bail!("duplicate target `{}`", target.label());
            }
        }

        let toolchains: HashMap<String, Toolchain> = toolchains
            .into_iter()
            .map(|tc| (tc.label().to_string(), tc))
            .collect();

        let default_toolchain = default_toolchain.to_string();
        if !toolchains.contains_key(&default_toolchain) {
            anyhow::bail!("default toolchain `{}` is not in the graph", default_toolchain);
        }

        for target in targets.iter() {
            for dep in target.deps.iter() {
                if !by_label.contains_key(dep) {
                    anyhow::bail!(
                        "dependency `{}` of target `{}` is not in the graph",
                        dep,
                        target.label(),
                    );
                }
            }
            if let Some(tc) = target.label().toolchain() {
                if !toolchains.contains_key(tc) {
                    anyhow::bail!(
                        "target `{}` uses unknown toolchain `{}`",
                        target.label(),
                        tc,
                    );
                }
            }
        }

        Ok(Self { targets, by_label, toolchains, default_toolchain })
    }

    /// Canonical label of the default toolchain.
    pub fn default_toolchain(&self) -> &str {
        &self.default_toolchain
    }

    /// User-facing rendering of a target label: targets in the default
    /// toolchain drop their toolchain suffix, all others keep it.
    pub fn display_label(&self, label: &Label) -> String {
        if label.toolchain() == Some(self.default_toolchain.as_str()) {
            label.without_toolchain().to_string()
        } else {
            label.to_string()
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// All targets, in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Exact lookup (label must carry its toolchain scope if the target's
    /// does).
    pub fn get(&self, label: &Label) -> Option<&Target> {
        self.by_label.get(label)
    }

    /// All targets matching a query label. A label without a toolchain
    /// matches the target in every toolchain; one with a toolchain matches
    /// only that variant.
    pub fn matching(&self, label: &Label) -> Vec<&Target> {
        if label.has_toolchain() {
            return self.get(label).into_iter().collect();
        }
        self.targets
            .iter()
            .filter(|t| t.label().without_toolchain() == *label)
            .collect()
    }

    /// The toolchain a target is built with.
    pub fn toolchain_for(&self, target: &Target) -> IResult<&Toolchain> {
        target
            .label()
            .toolchain()
            .and_then(|tc| self.toolchains.get(tc))
            .ok_or_else(|| anyhow::anyhow!("target `{}` has no toolchain", target.label()))
    }
}


/// How a target references a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRelation {
    /// Listed under `sources` - the file is compiled by the target.
    Source,
    /// Listed under `inputs` - the file feeds the target without its own
    /// compile step.
    Input,
}


/// Reverse index from source file to every target referencing it.
///
/// Built once over the frozen graph so that repeated per-file lookups do not
/// rescan every target's source list. A target built for several toolchains
/// appears once per variant.
#[derive(Default)]
pub struct FileIndex {
    refs: HashMap<SourceFile, Vec<(Target, FileRelation)>>,
}

impl FileIndex {
    pub fn new(graph: &TargetGraph) -> Self {
        let mut index = Self::default();
        for target in graph.iter() {
            for file in target.sources.iter() {
                index
                    .refs
                    .entry(file.clone())
                    .or_default()
                    .push((target.clone(), FileRelation::Source));
            }
            for file in target.inputs.iter() {
                index
                    .refs
                    .entry(file.clone())
                    .or_default()
                    .push((target.clone(), FileRelation::Input));
            }
        }
        index
    }

    /// Every (target, relation) pair for a file. Zero matches is not an
    /// error at this layer; the caller decides.
    pub fn refs(&self, file: &SourceFile) -> &[(Target, FileRelation)] {
        self.refs.get(file).map(Vec::as_slice).unwrap_or(&[])
    }
}
