use crate::core::{Layout, SourceFile};
use std::collections::HashMap;


/// A projected compilation unit.
///
/// Its identifier is its position in the [`CrateList`]; the struct never
/// stores an id of its own, so id and position cannot drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crate {
    root_module: SourceFile,
    label: String,
    deps: Vec<(usize, String)>,
    edition: String,
    cfg: Vec<String>,
    compiler_target: Option<String>,
}

impl Crate {
    pub fn new(
        root_module: SourceFile,
        label: impl Into<String>,
        edition: impl Into<String>,
    ) -> Self {
        Self {
            root_module,
            label: label.into(),
            deps: Vec::new(),
            edition: edition.into(),
            cfg: Vec::new(),
            compiler_target: None,
        }
    }

    pub fn add_dependency(&mut self, id: usize, name: impl Into<String>) {
        self.deps.push((id, name.into()));
    }

    pub fn add_config_item(&mut self, item: impl Into<String>) {
        self.cfg.push(item.into());
    }

    pub fn set_compiler_target(&mut self, triple: Option<String>) {
        self.compiler_target = triple;
    }

    pub fn root_module(&self) -> &SourceFile {
        &self.root_module
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Dependency edges in recorded order, as (crate id, link name).
    pub fn deps(&self) -> &[(usize, String)] {
        &self.deps
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn cfg(&self) -> &[String] {
        &self.cfg
    }

    /// Explicit compiler target triple, when one was declared. Optional
    /// metadata: absent is normal and never serialized.
    pub fn compiler_target(&self) -> Option<&str> {
        self.compiler_target.as_deref()
    }
}


/// Append-only crate sequence; the index is the crate id. Ids are only ever
/// taken from the length at append time.
pub type CrateList = Vec<Crate>;

/// Assigned ids of the synthetic standard-library crates, so a second
/// injection request in the same run finds the existing nodes.
pub type SysrootIndexMap = HashMap<&'static str, usize>;


/// The synthetic standard-library chain, in injection order, each with its
/// fixed dependencies. Kept as plain data so the topology is testable on
/// its own.
const SYSROOT_CRATES: &[(&str, &[&str])] = &[
    ("core", &[]),
    ("alloc", &["core"]),
    ("panic_abort", &[]),
    ("unwind", &[]),
    ("std", &["alloc", "core", "panic_abort", "unwind"]),
    ("collections", &[]),
    ("libc", &[]),
    ("panic_unwind", &[]),
    ("proc_macro", &[]),
    ("rustc_unicode", &[]),
    ("std_unicode", &[]),
    ("test", &[]),
    ("alloc_jemalloc", &[]),
    ("alloc_system", &[]),
    ("compiler_builtins", &[]),
    ("getopts", &[]),
    ("build_helper", &[]),
    ("rustc_asan", &[]),
    ("rustc_lsan", &[]),
    ("rustc_msan", &[]),
    ("rustc_tsan", &[]),
    ("syntax", &[]),
];

/// Edition shared by every sysroot crate.
pub const SYSROOT_EDITION: &str = "2018";

// Singular in the upstream format; external tooling matches the exact string.
const SYSROOT_CFG: &str = "debug_assertion";

fn sysroot_crate_deps(name: &str) -> &'static [&'static str] {
    SYSROOT_CRATES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, deps)| *deps)
        .unwrap_or(&[])
}

/// Injects the standard-library chain into `crates` exactly once per run.
///
/// Idempotent: nodes already tracked in `lookup` are left alone, so calling
/// this for every std-dependent target is safe.
pub fn add_sysroot(
    layout: &Layout,
    sysroot: &str,
    lookup: &mut SysrootIndexMap,
    crates: &mut CrateList,
) {
    for (name, _) in SYSROOT_CRATES {
        add_sysroot_crate(layout, sysroot, name, lookup, crates);
    }
}

fn add_sysroot_crate(
    layout: &Layout,
    sysroot: &str,
    name: &'static str,
    lookup: &mut SysrootIndexMap,
    crates: &mut CrateList,
) {
    if lookup.contains_key(name) {
        return;
    }

    // Dependencies first, so their ids exist when the edges are recorded.
    let deps = sysroot_crate_deps(name);
    for dep in deps {
        add_sysroot_crate(layout, sysroot, dep, lookup, crates);
    }

    let root = format!("{}lib{}/lib.rs", layout.sysroot_src_dir(sysroot), name);
    let mut krate = Crate::new(SourceFile::new(root), name, SYSROOT_EDITION);
    krate.add_config_item(SYSROOT_CFG);
    for dep in deps {
        krate.add_dependency(lookup[dep], *dep);
    }

    lookup.insert(name, crates.len());
    crates.push(krate);
}


/// Scans a compiler-flag list for an explicit `--target` triple.
///
/// Absent, or present as the final element with nothing after it, means "no
/// triple specified" - optional metadata, not an error.
pub fn extract_target_triple(flags: &[String]) -> Option<String> {
    let pos = flags.iter().position(|flag| flag == "--target")?;
    flags.get(pos + 1).cloned()
}

/// Collects `--cfg=x` / `--cfg x` values from a compiler-flag list, in
/// order.
pub fn extract_cfgs(flags: &[String]) -> Vec<String> {
    let mut cfgs = Vec::new();
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        if let Some(value) = flag.strip_prefix("--cfg=") {
            cfgs.push(value.to_string());
        } else if flag == "--cfg" {
            if let Some(value) = iter.next() {
                cfgs.push(value.clone());
            }
        }
    }
    cfgs
}


#[cfg(test)]
mod test {
    use super::*;

    fn flags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn extract_triple_simple() {
        let flags = flags(&[
            "--cfg=feature=\"foo_enabled\"",
            "--target",
            "x86-someos",
            "--edition=2018",
        ]);
        assert_eq!(extract_target_triple(&flags), Some("x86-someos".to_string()));
    }

    #[test]
    fn extract_triple_missing() {
        let flags = flags(&["--cfg=feature=\"foo_enabled\"", "x86-someos", "--edition=2018"]);
        assert_eq!(extract_target_triple(&flags), None);
    }

    #[test]
    fn extract_triple_dont_fall_off_end() {
        let flags = flags(&["--cfg=feature=\"foo_enabled\"", "--edition=2018", "--target"]);
        assert_eq!(extract_target_triple(&flags), None);
    }

    #[test]
    fn extract_cfgs_both_spellings() {
        let flags = flags(&["--cfg=unix", "-O", "--cfg", "feature=\"test\"", "--cfg"]);
        assert_eq!(extract_cfgs(&flags), vec!["unix", "feature=\"test\""]);
    }

    #[test]
    fn sysroot_ids_are_dense_and_match_topology() {
        let layout = Layout::new("out/Debug");
        let mut lookup = SysrootIndexMap::new();
        let mut crates = CrateList::new();
        add_sysroot(&layout, "path", &mut lookup, &mut crates);

        assert_eq!(crates.len(), SYSROOT_CRATES.len());
        assert_eq!(crates[0].label(), "core");
        assert_eq!(crates[1].label(), "alloc");
        assert_eq!(crates[4].label(), "std");
        assert_eq!(
            crates[4].deps(),
            &[
                (1, "alloc".to_string()),
                (0, "core".to_string()),
                (2, "panic_abort".to_string()),
                (3, "unwind".to_string()),
            ],
        );
        assert_eq!(
            crates[0].root_module().value(),
            "out/Debug/path/lib/rustlib/src/rust/src/libcore/lib.rs",
        );
        for (i, krate) in crates.iter().enumerate() {
            assert_eq!(lookup[krate.label()], i);
            assert_eq!(krate.edition(), "2018");
            assert_eq!(krate.cfg(), &["debug_assertion".to_string()]);
        }
    }

    #[test]
    fn sysroot_injection_is_idempotent() {
        let layout = Layout::new("out/Debug");
        let mut lookup = SysrootIndexMap::new();
        let mut crates = CrateList::new();
        add_sysroot(&layout, "path", &mut lookup, &mut crates);
        let len = crates.len();
        add_sysroot(&layout, "path", &mut lookup, &mut crates);
        assert_eq!(crates.len(), len);
    }
}
