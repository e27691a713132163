use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{RemoteStatus, VcsStatus};
use crate::runner::CommandRunner;

/// One line of `git remote -v`: name, url, direction
static RE_REMOTE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+\((fetch|push)\)").unwrap());

/// Whether any configured remote points at the hosting provider.
///
/// Takes the project's version-control result; a non-repository is answered
/// without listing remotes.
pub async fn probe(
    runner: &impl CommandRunner,
    project: &Path,
    hosting_domain: &str,
    vcs: VcsStatus,
) -> RemoteStatus {
    if vcs == VcsStatus::NotARepo {
        return RemoteStatus::NoRemote;
    }

    let dir = project.to_string_lossy();
    let output = match runner.run("git", &["-C", &dir, "remote", "-v"]).await {
        Ok(output) if output.success => output,
        Ok(_) => return RemoteStatus::NoRemote,
        Err(e) => {
            tracing::debug!("git remote in {} failed: {}", dir, e);
            return RemoteStatus::NoRemote;
        }
    };

    if remote_urls(&output.stdout).any(|url| url.contains(hosting_domain)) {
        RemoteStatus::HasRemote
    } else {
        RemoteStatus::NoRemote
    }
}

fn remote_urls(listing: &str) -> impl Iterator<Item = &str> {
    listing.lines().filter_map(|line| {
        RE_REMOTE_LINE
            .captures(line.trim())
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::FakeRunner;

    const LISTING: &str = "origin\tgit@github.com:me/app.git (fetch)\n\
                           origin\tgit@github.com:me/app.git (push)\n\
                           mirror\thttps://gitlab.com/me/app.git (fetch)\n";

    #[test]
    fn test_remote_urls() {
        let urls: Vec<&str> = remote_urls(LISTING).collect();
        assert_eq!(
            urls,
            vec![
                "git@github.com:me/app.git",
                "git@github.com:me/app.git",
                "https://gitlab.com/me/app.git",
            ]
        );
        assert_eq!(remote_urls("garbage line\n").count(), 0);
    }

    #[tokio::test]
    async fn test_has_remote() {
        let runner = FakeRunner::new().respond("remote -v", true, LISTING);
        assert_eq!(
            probe(&runner, Path::new("/a"), "github.com", VcsStatus::Clean).await,
            RemoteStatus::HasRemote
        );
    }

    #[tokio::test]
    async fn test_other_provider_only() {
        let runner = FakeRunner::new().respond(
            "remote -v",
            true,
            "origin\thttps://gitlab.com/me/app.git (fetch)\n",
        );
        assert_eq!(
            probe(&runner, Path::new("/a"), "github.com", VcsStatus::Dirty).await,
            RemoteStatus::NoRemote
        );
    }

    #[tokio::test]
    async fn test_remote_listing_fails() {
        let runner = FakeRunner::new().missing("remote -v");
        assert_eq!(
            probe(&runner, Path::new("/a"), "github.com", VcsStatus::Clean).await,
            RemoteStatus::NoRemote
        );
    }

    #[tokio::test]
    async fn test_not_a_repo_never_lists_remotes() {
        let runner = FakeRunner::new().respond("remote -v", true, LISTING);
        assert_eq!(
            probe(&runner, Path::new("/a"), "github.com", VcsStatus::NotARepo).await,
            RemoteStatus::NoRemote
        );
        assert!(runner.calls().is_empty());
    }
}
