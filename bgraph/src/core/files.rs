use serde::{Deserialize, Serialize};


/// Path to an input file, normalized relative to the project root.
///
/// Equality is path equality; two references to the same file through
/// different `..`/`.` spellings compare equal after construction.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SourceFile(String);

// Hand-written so deserialized paths go through normalization too.
impl<'de> Deserialize<'de> for SourceFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(|s| SourceFile::new(s))
    }
}

impl SourceFile {
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(normalize(path.as_ref()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// The containing directory, with a trailing `/` (empty for a file at the
    /// project root).
    pub fn dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[..=i],
            None => "",
        }
    }

    /// The final path component.
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// The file name without its extension.
    pub fn name_part(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(i) => &name[..i],
        }
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(i) => Some(&name[i + 1..]),
        }
    }
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}


/// Path to a build result, relative to the build output root.
///
/// Only ever produced by the artifact resolver; the target graph itself
/// stores declared outputs but never computes new ones.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputFile(String);

impl OutputFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for OutputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for OutputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}


/// Collapses `.` and `..` segments without touching the filesystem.
fn normalize(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            _ => out.push(comp),
        }
    }
    out.join("/")
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalized_on_construction() {
        assert_eq!(SourceFile::new("a/./b.c"), SourceFile::new("a/b.c"));
        assert_eq!(SourceFile::new("a/x/../b.c"), SourceFile::new("a/b.c"));
        assert_eq!(SourceFile::new("./b.c").value(), "b.c");
    }

    #[test]
    fn parts() {
        let file = SourceFile::new("tortoise/lib.rs");
        assert_eq!(file.dir(), "tortoise/");
        assert_eq!(file.file_name(), "lib.rs");
        assert_eq!(file.name_part(), "lib");
        assert_eq!(file.extension(), Some("rs"));

        let root = SourceFile::new("README");
        assert_eq!(root.dir(), "");
        assert_eq!(root.extension(), None);

        let dotfile = SourceFile::new("src/.config");
        assert_eq!(dotfile.name_part(), ".config");
        assert_eq!(dotfile.extension(), None);
    }
}
