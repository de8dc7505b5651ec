use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// How a notebook context is compared with a working directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextMatch {
    /// Plain string prefix: `/foo/ba` matches `/foo/bar`.
    #[default]
    Prefix,
    /// Whole path segments only: `/foo/ba` does not match `/foo/bar`.
    Segment,
}

impl ContextMatch {
    pub fn matches(self, context: &str, cwd: &str) -> bool {
        match self {
            Self::Prefix => cwd.starts_with(context),
            Self::Segment => !context.is_empty() && Path::new(cwd).starts_with(Path::new(context)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prefix => "prefix",
            Self::Segment => "segment",
        }
    }
}

impl Display for ContextMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextMatch {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "segment" => Ok(Self::Segment),
            other => Err(format!(
                "unsupported context match `{other}`; expected prefix|segment"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContextMatch;

    #[test]
    fn prefix_mode_matches_partial_segments() {
        assert!(ContextMatch::Prefix.matches("/tmp/nb", "/tmp/nb/sub/dir"));
        assert!(ContextMatch::Prefix.matches("/foo/ba", "/foo/bar"));
        assert!(!ContextMatch::Prefix.matches("/tmp/nb", "/tmp/other"));
    }

    #[test]
    fn segment_mode_requires_whole_segments() {
        assert!(ContextMatch::Segment.matches("/tmp/nb", "/tmp/nb/sub/dir"));
        assert!(ContextMatch::Segment.matches("/tmp/nb", "/tmp/nb"));
        assert!(!ContextMatch::Segment.matches("/foo/ba", "/foo/bar"));
        assert!(!ContextMatch::Segment.matches("", "/foo/bar"));
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("Segment".parse::<ContextMatch>(), Ok(ContextMatch::Segment));
        assert_eq!(" prefix ".parse::<ContextMatch>(), Ok(ContextMatch::Prefix));
        assert!("fuzzy".parse::<ContextMatch>().is_err());
    }
}
