use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Gitee,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Gitee => "gitee",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Platform::Github),
            "gitee" => Ok(Platform::Gitee),
            _ => Err(FetchError::InvalidProject(s.to_owned())),
        }
    }
}

/// A repository on a code hosting platform; also the cache key for its
/// metric bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    pub platform: Platform,
    pub org: String,
    pub repo: String,
}

impl ProjectRef {
    /// Parses an `org/repo` full name.
    pub fn parse(platform: Platform, full_name: &str) -> Result<Self, FetchError> {
        let invalid = || FetchError::InvalidProject(full_name.to_owned());
        let (org, repo) = full_name.trim().split_once('/').ok_or_else(invalid)?;
        let (org, repo) = (org.trim(), repo.trim());
        if org.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(invalid());
        }
        Ok(ProjectRef {
            platform,
            org: org.to_owned(),
            repo: repo.to_owned(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    /// `{platform}/{org}/{repo}`, the URL prefix of every metric file.
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.platform, self.org, self.repo)
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_names() {
        let project = ProjectRef::parse(Platform::Gitee, " kwdb/kwdb ").unwrap();
        assert_eq!(project.path(), "gitee/kwdb/kwdb");
        assert_eq!(project.full_name(), "kwdb/kwdb");
    }

    #[test]
    fn rejects_incomplete_names() {
        for name in ["", "kwdb", "kwdb/", "/kwdb", "a/b/c"] {
            assert!(ProjectRef::parse(Platform::Github, name).is_err(), "{name:?}");
        }
    }

    #[test]
    fn platform_from_str() {
        assert_eq!("GitHub".parse::<Platform>().unwrap(), Platform::Github);
        assert!("gitlab".parse::<Platform>().is_err());
    }
}
