use crate::core::{Label, OutputFile, SourceFile, Target};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;


/// The set of tools a set of targets is built with.
///
/// Tool semantics (which tool runs, how it is invoked) belong to the build
/// frontend; queries only ever look at the declared output patterns, which is
/// all this type carries.
#[derive(Debug, Clone)]
pub struct Toolchain {
    label: Label,
    tools: BTreeMap<String, Tool>,
}

impl Toolchain {
    pub fn new(label: Label) -> Self {
        Self { label, tools: BTreeMap::new() }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn add_tool(&mut self, name: impl Into<String>, tool: Tool) {
        self.tools.insert(name.into(), tool);
    }

    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// The tool that links/archives the target itself.
    pub fn tool_for_target(&self, target: &Target) -> Option<&Tool> {
        target.tool_name().and_then(|name| self.tool(name))
    }

    /// The tool that compiles one source of the target, if any compiles it.
    ///
    /// Headers and other non-compiled source types have no tool; that is not
    /// an error, the compile step for such a file simply produces nothing.
    pub fn tool_for_source(&self, target: &Target, file: &SourceFile) -> Option<&Tool> {
        match file.extension() {
            Some("c") | Some("cc") | Some("cpp") | Some("cxx") | Some("m") | Some("mm")
            | Some("S") | Some("s") | Some("asm") => self.tool("cc"),
            // Rust compiles whole crates; the per-source step is the crate build
            Some("rs") => self.tool_for_target(target),
            _ => None,
        }
    }
}


/// One tool of a toolchain: just its output-file patterns.
///
/// Patterns support the `{{target_output_name}}`, `{{target_out_dir}}`,
/// `{{source_name_part}}` and `{{source_file_part}}` substitutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    outputs: Vec<String>,
}

impl Tool {
    pub fn new(outputs: Vec<String>) -> Self {
        Self { outputs }
    }

    /// Expands the output patterns for a target, in declared pattern order.
    pub fn outputs_for(&self, target: &Target, source: Option<&SourceFile>) -> Vec<OutputFile> {
        self.outputs
            .iter()
            .map(|pattern| OutputFile::new(expand(pattern, target, source)))
            .collect()
    }
}


fn expand(pattern: &str, target: &Target, source: Option<&SourceFile>) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        match substitute(&after[..end], target, source) {
            Some(value) => out.push_str(&value),
            // Unknown variables pass through untouched
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn substitute(var: &str, target: &Target, source: Option<&SourceFile>) -> Option<String> {
    match var {
        "target_output_name" => Some(target.label.name().to_string()),
        "target_out_dir" => Some(target.out_dir()),
        "source_name_part" => source.map(|s| s.name_part().to_string()),
        "source_file_part" => source.map(|s| s.file_name().to_string()),
        _ => None,
    }
}
