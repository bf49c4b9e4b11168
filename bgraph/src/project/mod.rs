mod crates;
pub use crates::{
    add_sysroot, extract_cfgs, extract_target_triple, Crate, CrateList, SysrootIndexMap,
    SYSROOT_EDITION,
};

mod writer;
pub use writer::{render_project, write_project};

use crate::core::{Label, Layout, Target, TargetGraph};
use crate::utils::IResult;
use anyhow::bail;
use std::collections::{HashMap, HashSet};


/// Per-run projection state. Private to one run; every run starts from an
/// empty list and assigns ids 0, 1, 2, ... in first-visit order.
struct Projector<'a> {
    graph: &'a TargetGraph,
    layout: &'a Layout,
    sysroot: &'a str,
    lookup: HashMap<Label, usize>,
    in_progress: HashSet<Label>,
    sysroot_lookup: SysrootIndexMap,
    crates: CrateList,
}

/// Projects the compiled-language subset of `targets` (plus transitive
/// dependencies and, where required, the synthetic standard library) into a
/// crate list. Targets are visited in input order; non-Rust targets are
/// skipped.
pub fn project_crates(
    graph: &TargetGraph,
    layout: &Layout,
    sysroot: &str,
    targets: &[Target],
) -> IResult<CrateList> {
    let mut projector = Projector {
        graph,
        layout,
        sysroot,
        lookup: HashMap::new(),
        in_progress: HashSet::new(),
        sysroot_lookup: SysrootIndexMap::new(),
        crates: CrateList::new(),
    };
    for target in targets {
        projector.add_target(target)?;
    }
    Ok(projector.crates)
}

impl<'a> Projector<'a> {
    /// Depth-first visit. Dependencies are appended before their dependents,
    /// so every recorded edge refers to an id already in the list - forward
    /// references cannot be created.
    fn add_target(&mut self, target: &Target) -> IResult<()> {
        let Some(rust) = target.rust() else {
            return Ok(());
        };
        if self.lookup.contains_key(target.label()) {
            return Ok(());
        }
        if !self.in_progress.insert(target.label().clone()) {
            bail!("dependency cycle involving `{}` in the target graph", target.label());
        }

        let rust_deps: Vec<Target> = target
            .deps
            .iter()
            .filter_map(|dep| self.graph.get(dep))
            .filter(|dep| dep.is_rust())
            .cloned()
            .collect();
        for dep in rust_deps.iter() {
            self.add_target(dep)?;
        }

        if !rust.no_std {
            add_sysroot(self.layout, self.sysroot, &mut self.sysroot_lookup, &mut self.crates);
        }

        // Labels are user-visible: default-toolchain targets drop the suffix
        let mut krate = Crate::new(
            rust.crate_root.clone(),
            self.graph.display_label(target.label()),
            rust.edition.clone(),
        );
        for cfg in extract_cfgs(&rust.flags) {
            krate.add_config_item(cfg);
        }
        krate.set_compiler_target(extract_target_triple(&rust.flags));

        if !rust.no_std {
            if let Some(&std_id) = self.sysroot_lookup.get("std") {
                krate.add_dependency(std_id, "std");
            }
        }
        for dep in rust_deps.iter() {
            let id = self.lookup[dep.label()];
            if let Some(dep_rust) = dep.rust() {
                let name = rust
                    .renamed_deps
                    .get(dep.label())
                    .cloned()
                    .unwrap_or_else(|| dep_rust.crate_name.clone());
                krate.add_dependency(id, name);
            }
        }

        self.lookup.insert(target.label().clone(), self.crates.len());
        self.crates.push(krate);
        self.in_progress.remove(target.label());
        Ok(())
    }
}
