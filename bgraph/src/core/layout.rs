/// Resolved build-output root.
///
/// Output-file paths are relative to this directory; only the projector
/// needs it spelled out, to derive the synthetic sysroot source roots.
pub struct Layout {
    build_dir: String,
}

impl Layout {
    pub fn new(build_dir: impl Into<String>) -> Self {
        let mut build_dir = build_dir.into();
        if !build_dir.is_empty() && !build_dir.ends_with('/') {
            build_dir.push('/');
        }
        Self { build_dir }
    }

    /// The build directory, with a trailing `/`.
    pub fn build_dir(&self) -> &str {
        &self.build_dir
    }

    /// Source root of a standard-library distribution below the build
    /// directory, e.g. `out/Debug/sysroot/lib/rustlib/src/rust/src/`.
    pub fn sysroot_src_dir(&self, sysroot: &str) -> String {
        format!("{}{}/lib/rustlib/src/rust/src/", self.build_dir, sysroot)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trailing_slash() {
        assert_eq!(Layout::new("out/Debug").build_dir(), "out/Debug/");
        assert_eq!(Layout::new("out/Debug/").build_dir(), "out/Debug/");
    }

    #[test]
    fn sysroot_template() {
        let layout = Layout::new("out/Debug");
        assert_eq!(
            layout.sysroot_src_dir("path"),
            "out/Debug/path/lib/rustlib/src/rust/src/",
        );
    }
}
