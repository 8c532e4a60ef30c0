//! Repository classification for skeleton sources
//!
//! A skeleton source is either a local directory or a version-control URL.
//! Classification is purely string based; nothing is fetched, and a URL that
//! mimics another scheme's shape can be misclassified.

use std::fmt;
use url::Url;

/// Kind of skeleton source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryKind {
    /// Plain filesystem path (no repository detected)
    Local,
    Git,
    Svn,
}

/// Scheme prefixes that always denote a Subversion repository
const SVN_PREFIXES: &[&str] = &["file://", "svn://", "svn+ssh://"];

/// Path fragments that mark an http(s) URL as Subversion hosting
const SVN_PATH_MARKERS: &[&str] = &["/repos/", "/svn/"];

impl RepositoryKind {
    /// Classify a source string. Rules are checked in order and are
    /// case-sensitive on the scheme.
    pub fn classify(source: &str) -> Self {
        let source = source.trim();

        if source.starts_with("git://") {
            return RepositoryKind::Git;
        }

        if SVN_PREFIXES.iter().any(|prefix| source.starts_with(prefix)) {
            return RepositoryKind::Svn;
        }

        if (source.starts_with("http://") || source.starts_with("https://"))
            && Self::is_svn_hosting(source)
        {
            return RepositoryKind::Svn;
        }

        RepositoryKind::Local
    }

    /// Approximate check for Subversion hosting conventions on an http(s) URL
    fn is_svn_hosting(source: &str) -> bool {
        let Ok(url) = Url::parse(source) else {
            return false;
        };

        let host_is_svn = url.host_str().is_some_and(|host| host.contains("svn"));
        let path = url.path();
        host_is_svn || SVN_PATH_MARKERS.iter().any(|marker| path.contains(marker))
    }

    /// True for any version-control kind
    pub fn is_repository(&self) -> bool {
        !matches!(self, RepositoryKind::Local)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RepositoryKind::Local => "local",
            RepositoryKind::Git => "git",
            RepositoryKind::Svn => "svn",
        }
    }
}

impl fmt::Display for RepositoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_urls() {
        assert_eq!(
            RepositoryKind::classify("git://github.com/TwP/bones.git"),
            RepositoryKind::Git
        );
        assert_eq!(
            RepositoryKind::classify("git://github.com/TwP/bones.git/"),
            RepositoryKind::Git
        );
    }

    #[test]
    fn test_svn_urls() {
        for source in [
            "file:///home/user/svn/ruby/trunk/apc",
            "http://svn.ruby-lang.org/repos/ruby/branches/ruby_1_8",
            "https://svn.ruby-lang.org/repos/ruby/branches/ruby_1_8",
            "svn://10.10.10.10/project/trunk",
            "svn+ssh://10.10.10.10/project/trunk",
        ] {
            assert_eq!(RepositoryKind::classify(source), RepositoryKind::Svn, "{}", source);
        }
    }

    #[test]
    fn test_http_repos_path_without_svn_host() {
        assert_eq!(
            RepositoryKind::classify("https://code.example.com/repos/project/trunk"),
            RepositoryKind::Svn
        );
    }

    #[test]
    fn test_local_paths() {
        assert_eq!(
            RepositoryKind::classify("/some/directory/on/your/hard/drive"),
            RepositoryKind::Local
        );
        assert_eq!(RepositoryKind::classify("default"), RepositoryKind::Local);
        assert!(!RepositoryKind::classify("./skeleton").is_repository());
    }

    #[test]
    fn test_unmatched_urls_are_local() {
        assert_eq!(
            RepositoryKind::classify("https://example.com/project"),
            RepositoryKind::Local
        );
        assert_eq!(RepositoryKind::classify("http://"), RepositoryKind::Local);
    }

    #[test]
    fn test_scheme_is_case_sensitive() {
        assert_eq!(
            RepositoryKind::classify("GIT://github.com/TwP/bones.git"),
            RepositoryKind::Local
        );
        assert_eq!(
            RepositoryKind::classify("SVN://10.10.10.10/project"),
            RepositoryKind::Local
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(RepositoryKind::Git.to_string(), "git");
        assert_eq!(RepositoryKind::Local.to_string(), "local");
    }
}
