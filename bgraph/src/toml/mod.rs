use crate::core::*;
use crate::utils::{paths, IResult};
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;


/// Reads a resolved-graph description from a TOML file.
///
/// This is not a build language: the frontend has already evaluated rules
/// and resolved dependencies; the file is a plain listing of the result.
/// Returns the frozen graph plus warnings for unrecognized keys.
pub fn read_graph(path: &Path) -> IResult<(TargetGraph, Vec<String>)> {
    let contents = paths::read_string(path)?;

    let toml: toml::Value = contents
        .parse()
        .map_err(|e| anyhow::Error::from(e).context("could not parse input as TOML"))?;

    let mut unused = BTreeSet::new();
    let desc: TomlGraph = serde_ignored::deserialize(toml, |path| {
        let mut key = String::new();
        stringify(&mut key, &path);
        unused.insert(key);
    })?;

    let warnings = unused
        .into_iter()
        .map(|key| format!("unused graph key: `{}`", key))
        .collect();

    return Ok((desc.to_real()?, warnings));

    fn stringify(dst: &mut String, path: &serde_ignored::Path<'_>) {
        use serde_ignored::Path;

        match *path {
            Path::Root => {}
            Path::Seq { parent, index } => {
                stringify(dst, parent);
                if !dst.is_empty() {
                    dst.push('.');
                }
                dst.push_str(&index.to_string());
            }
            Path::Map { parent, ref key } => {
                stringify(dst, parent);
                if !dst.is_empty() {
                    dst.push('.');
                }
                dst.push_str(key);
            }
            Path::Some { parent }
            | Path::NewtypeVariant { parent }
            | Path::NewtypeStruct { parent } => stringify(dst, parent),
        }
    }
}


/// This type is used to deserialize resolved-graph description files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlGraph {
    /// Toolchain attached to any label that does not name one explicitly.
    default_toolchain: Label,
    toolchains: Option<Vec<TomlToolchain>>,
    targets: Option<Vec<TomlTarget>>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlToolchain {
    label: Label,
    // tool name -> output patterns
    tools: Option<BTreeMap<String, Tool>>,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlTarget {
    label: Label,
    kind: TomlTargetKind,
    // declared source files (relative to the project root)
    sources: Option<Vec<SourceFile>>,
    // declared non-compiled inputs
    inputs: Option<Vec<SourceFile>>,
    // dependency labels; an unscoped label inherits the target's toolchain
    deps: Option<Vec<Label>>,
    // declared outputs (actions and copies only)
    outputs: Option<Vec<OutputFile>>,
    rust: Option<TomlRustValues>,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TomlTargetKind {
    StaticLibrary,
    SharedLibrary,
    Executable,
    RustLibrary,
    RustProcMacro,
    Action,
    Copy,
    Group,
}


/// Language block of a compiled Rust target. The crate type is deduced from
/// the target kind unless overridden.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TomlRustValues {
    crate_root: SourceFile,
    crate_name: String,
    crate_type: Option<TomlCrateKind>,
    edition: Option<String>,
    flags: Option<Vec<String>>,
    // dependency label -> name it is linked under
    renamed_deps: Option<BTreeMap<String, String>>,
    no_std: Option<bool>,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TomlCrateKind {
    Lib,
    Bin,
    ProcMacro,
}


impl TomlGraph {
    fn to_real(&self) -> IResult<TargetGraph> {
        let default_tc = &self.default_toolchain;

        let mut toolchains = Vec::new();
        for tc in self.toolchains.as_ref().unwrap_or(&Vec::new()) {
            let mut toolchain = Toolchain::new(tc.label.clone());
            for (name, tool) in tc.tools.as_ref().unwrap_or(&BTreeMap::new()) {
                toolchain.add_tool(name.as_str(), tool.clone());
            }
            toolchains.push(toolchain);
        }

        let mut targets = Vec::new();
        for target in self.targets.as_ref().unwrap_or(&Vec::new()) {
            targets.push(target.to_real(default_tc)?);
        }

        TargetGraph::new(targets, toolchains, default_tc.clone())
    }
}

impl TomlTarget {
    fn to_real(&self, default_tc: &Label) -> IResult<Target> {
        let label = qualify(&self.label, default_tc);
        let kind = self.kind.to_real();

        let mut deps = Vec::new();
        for dep in self.deps.as_ref().unwrap_or(&Vec::new()) {
            deps.push(qualify(dep, default_tc));
        }

        let rust = match &self.rust {
            Some(values) => Some(values.to_real(&label, kind, default_tc)?),
            None => {
                if matches!(kind, TargetKind::RustLibrary | TargetKind::RustProcMacro) {
                    bail!("target `{}` is a Rust target but has no `rust` block", label);
                }
                None
            }
        };

        Ok(Target::new(TargetInner {
            label,
            kind,
            sources: self.sources.clone().unwrap_or_default(),
            inputs: self.inputs.clone().unwrap_or_default(),
            deps,
            outputs: self.outputs.clone().unwrap_or_default(),
            rust,
        }))
    }
}

impl TomlTargetKind {
    fn to_real(self) -> TargetKind {
        match self {
            Self::StaticLibrary => TargetKind::StaticLibrary,
            Self::SharedLibrary => TargetKind::SharedLibrary,
            Self::Executable => TargetKind::Executable,
            Self::RustLibrary => TargetKind::RustLibrary,
            Self::RustProcMacro => TargetKind::RustProcMacro,
            Self::Action => TargetKind::Action,
            Self::Copy => TargetKind::Copy,
            Self::Group => TargetKind::Group,
        }
    }
}

impl TomlRustValues {
    fn to_real(&self, label: &Label, kind: TargetKind, default_tc: &Label) -> IResult<RustValues> {
        let crate_kind = match self.crate_type {
            Some(TomlCrateKind::Lib) => CrateKind::Library,
            Some(TomlCrateKind::Bin) => CrateKind::Binary,
            Some(TomlCrateKind::ProcMacro) => CrateKind::ProcMacro,
            // Deduced from the target kind
            None => match kind {
                TargetKind::RustLibrary => CrateKind::Library,
                TargetKind::RustProcMacro => CrateKind::ProcMacro,
                TargetKind::Executable => CrateKind::Binary,
                _ => bail!(
                    "target `{}` has a `rust` block but kind `{:?}` is not a Rust kind",
                    label,
                    kind,
                ),
            },
        };

        let mut renamed_deps = BTreeMap::new();
        for (dep, name) in self.renamed_deps.as_ref().unwrap_or(&BTreeMap::new()) {
            let dep = Label::from_str(dep)
                .map_err(|e| e.context(format!("invalid renamed dep of `{}`", label)))?;
            renamed_deps.insert(qualify(&dep, default_tc), name.clone());
        }

        Ok(RustValues {
            crate_root: self.crate_root.clone(),
            crate_name: self.crate_name.clone(),
            kind: crate_kind,
            edition: self.edition.clone().unwrap_or_else(|| "2015".to_string()),
            flags: self.flags.clone().unwrap_or_default(),
            renamed_deps,
            no_std: self.no_std.unwrap_or(false),
        })
    }
}

fn qualify(label: &Label, default_tc: &Label) -> Label {
    if label.has_toolchain() {
        label.clone()
    } else {
        label.in_toolchain(default_tc)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn parse(contents: &str) -> IResult<TargetGraph> {
        let toml: toml::Value = contents.parse().unwrap();
        let desc: TomlGraph = toml.try_into().unwrap();
        desc.to_real()
    }

    const GRAPH: &str = r#"
        default-toolchain = "//toolchain:default"

        [[toolchains]]
        label = "//toolchain:default"
        [toolchains.tools.rust_rlib]
        outputs = ["{{target_out_dir}}/lib{{target_output_name}}.rlib"]

        [[targets]]
        label = "//tortoise:tortoise"
        kind = "rust-library"
        sources = ["tortoise/lib.rs"]
        [targets.rust]
        crate-root = "tortoise/lib.rs"
        crate-name = "tortoise"
        edition = "2015"

        [[targets]]
        label = "//hare:hare"
        kind = "rust-library"
        sources = ["hare/lib.rs"]
        deps = ["//tortoise:tortoise"]
        [targets.rust]
        crate-root = "hare/lib.rs"
        crate-name = "hare"
        edition = "2015"
    "#;

    #[test]
    fn labels_inherit_default_toolchain() {
        let graph = parse(GRAPH).unwrap();
        assert_eq!(graph.len(), 2);

        let hare = graph
            .get(&"//hare:hare(//toolchain:default)".parse().unwrap())
            .unwrap();
        assert_eq!(hare.deps[0].to_string(), "//tortoise:tortoise(//toolchain:default)");
        assert!(hare.is_rust());
    }

    #[test]
    fn rust_kind_requires_rust_block() {
        let err = parse(
            r#"
            default-toolchain = "//toolchain:default"
            [[toolchains]]
            label = "//toolchain:default"
            [[targets]]
            label = "//a:a"
            kind = "rust-library"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no `rust` block"));
    }

    #[test]
    fn dangling_dep_is_rejected() {
        let err = parse(
            r#"
            default-toolchain = "//toolchain:default"
            [[toolchains]]
            label = "//toolchain:default"
            [[targets]]
            label = "//a:a"
            kind = "group"
            deps = ["//missing:missing"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not in the graph"));
    }
}
