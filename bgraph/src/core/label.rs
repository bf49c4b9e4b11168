use crate::utils::Error;
use serde::{de, ser};
use std::str::FromStr;


/// Identity of a target: a directory-scoped name plus the toolchain it is
/// built with, e.g. `//hare:hare(//toolchain:default)`.
///
/// The same `//dir:name` may exist once per toolchain; each variant is a
/// distinct target in the resolved graph.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    // "//hare", no trailing slash
    dir: String,
    name: String,
    // Canonical `//dir:name` of the toolchain, when explicit
    toolchain: Option<String>,
}

impl Label {
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn toolchain(&self) -> Option<&str> {
        self.toolchain.as_deref()
    }

    pub fn has_toolchain(&self) -> bool {
        self.toolchain.is_some()
    }

    /// This label rescoped to the given toolchain.
    pub fn in_toolchain(&self, tc: &Label) -> Label {
        Label {
            dir: self.dir.clone(),
            name: self.name.clone(),
            toolchain: Some(format!("{}:{}", tc.dir, tc.name)),
        }
    }

    /// This label with any toolchain scope removed.
    pub fn without_toolchain(&self) -> Label {
        Label {
            dir: self.dir.clone(),
            name: self.name.clone(),
            toolchain: None,
        }
    }
}

impl FromStr for Label {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, toolchain) = match s.find('(') {
            Some(open) => {
                let inner = s
                    .strip_suffix(')')
                    .map(|v| &v[open + 1..])
                    .ok_or_else(|| anyhow::anyhow!("unterminated toolchain in label `{}`", s))?;
                let tc = Label::from_str(inner)?;
                if tc.has_toolchain() {
                    anyhow::bail!("toolchain label `{}` may not itself have a toolchain", inner);
                }
                (&s[..open], Some(format!("{}:{}", tc.dir, tc.name)))
            }
            None => (s, None),
        };

        if !base.starts_with("//") {
            anyhow::bail!("expected a label like `//dir:name`, got `{}`", s);
        }

        let (dir, name) = match base.rfind(':') {
            Some(colon) => (trim_dir(&base[..colon]), &base[colon + 1..]),
            // `//foo/bar` is shorthand for `//foo/bar:bar`
            None => {
                let dir = trim_dir(base);
                let name = &dir[dir.rfind('/').map(|i| i + 1).unwrap_or(0)..];
                (dir, name)
            }
        };
        if name.is_empty() {
            anyhow::bail!("expected a label like `//dir:name`, got `{}`", s);
        }

        return Ok(Label {
            dir: dir.to_string(),
            name: name.to_string(),
            toolchain,
        });

        // Trailing slashes drop, but the `//` root itself stays intact.
        fn trim_dir(dir: &str) -> &str {
            let trimmed = dir.trim_end_matches('/');
            if trimmed.len() < 2 {
                "//"
            } else {
                trimmed
            }
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.dir, self.name)?;
        if let Some(tc) = &self.toolchain {
            write!(f, "({})", tc)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl ser::Serialize for Label {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> de::Deserialize<'de> for Label {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        struct LabelVisitor;
        impl<'de> de::Visitor<'de> for LabelVisitor {
            type Value = Label;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a target label string like \"//dir:name\"")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Label::from_str(v).map_err(|e| de::Error::custom(e.to_string()))
            }
        }
        deserializer.deserialize_str(LabelVisitor)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_str() {
        let label = "//hare:bar".parse::<Label>().unwrap();
        assert_eq!(label.dir(), "//hare");
        assert_eq!(label.name(), "bar");
        assert_eq!(label.toolchain(), None);

        assert!("hare:bar".parse::<Label>().is_err());
        assert!("//hare:".parse::<Label>().is_err());
        assert!("//".parse::<Label>().is_err());
        assert!("//hare:bar(//tc:default".parse::<Label>().is_err());
    }

    #[test]
    fn root_level_label() {
        let label = "//:gen".parse::<Label>().unwrap();
        assert_eq!(label.dir(), "//");
        assert_eq!(label.name(), "gen");
        assert_eq!(label.to_string(), "//:gen");

        let roundtrip = label.to_string().parse::<Label>().unwrap();
        assert_eq!(roundtrip, label);
    }

    #[test]
    fn implicit_name() {
        let label = "//foo/bar".parse::<Label>().unwrap();
        assert_eq!(label.dir(), "//foo/bar");
        assert_eq!(label.name(), "bar");
        assert_eq!(label.to_string(), "//foo/bar:bar");
    }

    #[test]
    fn toolchain_suffix() {
        let label = "//hare:bar(//toolchain:default)".parse::<Label>().unwrap();
        assert_eq!(label.toolchain(), Some("//toolchain:default"));
        assert_eq!(label.to_string(), "//hare:bar(//toolchain:default)");
        assert_eq!(label.without_toolchain().to_string(), "//hare:bar");

        assert!("//hare:bar(//tc:a(//tc:b))".parse::<Label>().is_err());
    }

    #[test]
    fn rescope() {
        let tc = "//toolchain:alt".parse::<Label>().unwrap();
        let label = "//hare:bar".parse::<Label>().unwrap().in_toolchain(&tc);
        assert_eq!(label.to_string(), "//hare:bar(//toolchain:alt)");
    }
}
