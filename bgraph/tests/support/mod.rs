#![allow(dead_code)]

use bgraph::core::*;
use std::collections::BTreeMap;

pub const TC: &str = "//toolchain:default";

/// Parses a label and attaches the default toolchain unless it already
/// carries one.
pub fn scoped(label: &str) -> Label {
    let label: Label = label.parse().unwrap();
    if label.has_toolchain() {
        label
    } else {
        label.in_toolchain(&TC.parse().unwrap())
    }
}

/// A toolchain with the full set of tools the builders below rely on.
pub fn default_toolchain() -> Toolchain {
    toolchain_labelled(TC)
}

pub fn toolchain_labelled(label: &str) -> Toolchain {
    let mut tc = Toolchain::new(label.parse().unwrap());
    tc.add_tool("cc", Tool::new(vec!["{{target_out_dir}}/{{source_name_part}}.o".into()]));
    tc.add_tool("alink", Tool::new(vec!["{{target_out_dir}}/lib{{target_output_name}}.a".into()]));
    tc.add_tool("solink", Tool::new(vec!["{{target_out_dir}}/lib{{target_output_name}}.so".into()]));
    tc.add_tool("link", Tool::new(vec!["{{target_out_dir}}/{{target_output_name}}".into()]));
    tc.add_tool("rust_rlib", Tool::new(vec!["{{target_out_dir}}/lib{{target_output_name}}.rlib".into()]));
    tc.add_tool("rust_macro", Tool::new(vec!["{{target_out_dir}}/lib{{target_output_name}}.so".into()]));
    tc.add_tool("rust_bin", Tool::new(vec!["{{target_out_dir}}/{{target_output_name}}".into()]));
    tc
}

pub fn graph(targets: Vec<Target>) -> TargetGraph {
    TargetGraph::new(targets, vec![default_toolchain()], TC.parse().unwrap()).unwrap()
}

pub fn target(
    label: &str,
    kind: TargetKind,
    sources: &[&str],
    inputs: &[&str],
    deps: &[&str],
    outputs: &[&str],
) -> Target {
    Target::new(TargetInner {
        label: scoped(label),
        kind,
        sources: sources.iter().map(SourceFile::new).collect(),
        inputs: inputs.iter().map(SourceFile::new).collect(),
        deps: deps.iter().map(|d| scoped(d)).collect(),
        outputs: outputs.iter().map(|o| OutputFile::new(*o)).collect(),
        rust: None,
    })
}

pub fn static_library(label: &str, sources: &[&str], inputs: &[&str], deps: &[&str]) -> Target {
    target(label, TargetKind::StaticLibrary, sources, inputs, deps, &[])
}

pub fn rust_values(crate_root: &str, crate_name: &str, edition: &str) -> RustValues {
    RustValues {
        crate_root: SourceFile::new(crate_root),
        crate_name: crate_name.to_string(),
        kind: CrateKind::Library,
        edition: edition.to_string(),
        flags: vec![],
        renamed_deps: BTreeMap::new(),
        no_std: false,
    }
}

pub fn rust_library(label: &str, crate_root: &str, deps: &[&str]) -> Target {
    let name = scoped(label).name().to_string();
    rust_library_with(label, crate_root, deps, rust_values(crate_root, &name, "2015"))
}

pub fn rust_library_with(
    label: &str,
    crate_root: &str,
    deps: &[&str],
    rust: RustValues,
) -> Target {
    Target::new(TargetInner {
        label: scoped(label),
        kind: TargetKind::RustLibrary,
        sources: vec![SourceFile::new(crate_root)],
        inputs: vec![],
        deps: deps.iter().map(|d| scoped(d)).collect(),
        outputs: vec![],
        rust: Some(rust),
    })
}
