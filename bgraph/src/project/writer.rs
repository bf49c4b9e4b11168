use crate::project::CrateList;
use crate::utils::{paths, IResult};
use serde::Serialize;
use std::path::Path;


// Field names and ordering below are the compatibility surface consumed by
// external tooling; do not reorder or rename.

#[derive(Serialize)]
struct ProjectJson<'a> {
    roots: Vec<&'a str>,
    crates: Vec<CrateJson<'a>>,
}

#[derive(Serialize)]
struct CrateJson<'a> {
    crate_id: usize,
    root_module: &'a str,
    label: &'a str,
    deps: Vec<DepJson<'a>>,
    edition: &'a str,
    cfg: &'a [String],
}

#[derive(Serialize)]
struct DepJson<'a> {
    #[serde(rename = "crate")]
    crate_id: usize,
    name: &'a str,
}

/// Serializes a crate list: `roots` (one containing directory per crate)
/// before `crates`, both in crate-id order. String escaping is the JSON
/// serializer's; no other transformation is applied.
pub fn render_project(crates: &CrateList) -> IResult<String> {
    let project = ProjectJson {
        roots: crates.iter().map(|c| c.root_module().dir()).collect(),
        crates: crates
            .iter()
            .enumerate()
            .map(|(id, c)| CrateJson {
                crate_id: id,
                root_module: c.root_module().value(),
                label: c.label(),
                deps: c
                    .deps()
                    .iter()
                    .map(|(crate_id, name)| DepJson { crate_id: *crate_id, name })
                    .collect(),
                edition: c.edition(),
                cfg: c.cfg(),
            })
            .collect(),
    };
    let mut out = serde_json::to_string_pretty(&project)?;
    out.push('\n');
    Ok(out)
}

/// Writes the serialized graph to a caller-specified path, creating parent
/// directories as needed.
pub fn write_project(crates: &CrateList, path: impl AsRef<Path>) -> IResult<()> {
    paths::write_create_all(path, render_project(crates)?)
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::core::SourceFile;
    use crate::project::Crate;

    #[test]
    fn write_crates() {
        let mut crates = CrateList::new();

        let dep = Crate::new(SourceFile::new("tortoise/lib.rs"), "//tortoise:bar", "2015");
        let mut target = Crate::new(SourceFile::new("hare/lib.rs"), "//hare:bar", "2015");
        target.add_dependency(0, "tortoise");
        target.add_config_item("unix");
        target.add_config_item("feature=\"test\"");

        crates.push(dep);
        crates.push(target);

        let out = render_project(&crates).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(
            value["roots"],
            serde_json::json!(["tortoise/", "hare/"]),
        );
        assert_eq!(value["crates"][0]["crate_id"], 0);
        assert_eq!(value["crates"][0]["root_module"], "tortoise/lib.rs");
        assert_eq!(value["crates"][0]["deps"], serde_json::json!([]));
        assert_eq!(value["crates"][1]["crate_id"], 1);
        assert_eq!(value["crates"][1]["label"], "//hare:bar");
        assert_eq!(
            value["crates"][1]["deps"],
            serde_json::json!([{"crate": 0, "name": "tortoise"}]),
        );
        assert_eq!(
            value["crates"][1]["cfg"],
            serde_json::json!(["unix", "feature=\"test\""]),
        );

        // `roots` precedes `crates`, and the crate fields keep their order
        let roots_at = out.find("\"roots\"").unwrap();
        let crates_at = out.find("\"crates\"").unwrap();
        assert!(roots_at < crates_at);
        let order = ["\"crate_id\"", "\"root_module\"", "\"label\"", "\"deps\"", "\"edition\"", "\"cfg\""];
        let found: Vec<usize> = order.iter().map(|k| out.find(k).unwrap()).collect();
        let mut sorted = found.clone();
        sorted.sort_unstable();
        assert_eq!(found, sorted);
    }

    #[test]
    fn strings_are_escaped() {
        let mut crates = CrateList::new();
        let mut krate = Crate::new(SourceFile::new("a/lib.rs"), "//a:a", "2018");
        krate.add_config_item("feature=\"test\"");
        crates.push(krate);

        let out = render_project(&crates).unwrap();
        assert!(out.contains(r#""feature=\"test\"""#));
    }
}
