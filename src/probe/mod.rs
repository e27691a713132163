//! Live status probes for a project directory.
//!
//! Each probe is a side-effect-free query against an external tool. Failures
//! of the tool (absent, non-zero exit, timeout) fold into the negative branch
//! of the probe's status enum and never reach the caller.

mod remote;
mod session;
mod vcs;

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt};

use crate::runner::CommandRunner;
use crate::tmux::TmuxClient;

/// Display intent of a status value, mapped to a color by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Info,
    Warning,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsStatus {
    NotARepo,
    Clean,
    Dirty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStatus {
    HasRemote,
    NoRemote,
}

impl SessionStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Active => "\u{25CF} tmux",
            Self::Inactive => "\u{25CB} tmux",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::Active => Tone::Good,
            Self::Inactive => Tone::Info,
        }
    }
}

impl VcsStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::NotARepo => "? git",
            Self::Clean => "\u{2713} git",
            Self::Dirty => "\u{00B1} git",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::NotARepo => Tone::Warning,
            Self::Clean => Tone::Good,
            Self::Dirty => Tone::Alert,
        }
    }
}

impl RemoteStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::HasRemote => "\u{2713} github",
            Self::NoRemote => "\u{2715} github",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            Self::HasRemote => Tone::Good,
            Self::NoRemote => Tone::Warning,
        }
    }
}

/// All three facets for one project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectStatus {
    pub session: SessionStatus,
    pub vcs: VcsStatus,
    pub remote: RemoteStatus,
}

/// Runs the probes for a set of projects with bounded concurrency
pub struct Prober<'a, R: CommandRunner> {
    pub runner: &'a R,
    pub tmux: &'a TmuxClient,
    pub descriptor_stem: &'a str,
    pub hosting_domain: &'a str,
    pub concurrency: usize,
}

impl<'a, R: CommandRunner> Prober<'a, R> {
    pub async fn session(&self, project: &Path) -> SessionStatus {
        session::probe(self.runner, self.tmux, project, self.descriptor_stem).await
    }

    /// Probe every facet of one project. The repo check runs before the
    /// remote listing, which it may skip.
    pub async fn project(&self, project: &Path) -> ProjectStatus {
        let session = self.session(project).await;
        let vcs = vcs::probe(self.runner, project).await;
        let remote = remote::probe(self.runner, project, self.hosting_domain, vcs).await;
        ProjectStatus {
            session,
            vcs,
            remote,
        }
    }

    /// Probe all projects, returning results in input order
    pub async fn all(&self, projects: &[PathBuf]) -> Vec<ProjectStatus> {
        stream::iter(projects)
            .map(|project| self.project(project))
            .buffered(self.concurrency.max(1))
            .collect()
            .await
    }

    /// Session facet only, for every project, in input order
    pub async fn sessions(&self, projects: &[PathBuf]) -> Vec<SessionStatus> {
        stream::iter(projects)
            .map(|project| self.session(project))
            .buffered(self.concurrency.max(1))
            .collect()
            .await
    }
}
