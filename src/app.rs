use std::io::Write;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::launch;
use crate::listing::{self, Row};
use crate::output::Console;
use crate::picker::{resolve_selection, Picker};
use crate::probe::{Prober, SessionStatus};
use crate::registry::{self, ProjectEntry, RegistryKind};
use crate::runner::CommandRunner;
use crate::tmux::TmuxClient;

/// One invocation of the tool: registry, probes, picker and launch wired
/// together.
pub struct App<'a, R: CommandRunner, P: Picker> {
    config: &'a Config,
    runner: &'a R,
    picker: &'a P,
    tmux: TmuxClient,
    /// Whether this process runs inside a tmux client
    inside_client: bool,
}

impl<'a, R: CommandRunner, P: Picker> App<'a, R, P> {
    pub fn new(config: &'a Config, runner: &'a R, picker: &'a P) -> Self {
        Self {
            config,
            runner,
            picker,
            tmux: TmuxClient::new(&config.multiplexer),
            inside_client: std::env::var_os(&config.multiplexer.inside_env).is_some(),
        }
    }

    #[cfg(test)]
    fn with_inside_client(mut self, inside_client: bool) -> Self {
        self.inside_client = inside_client;
        self
    }

    fn prober(&self) -> Prober<'_, R> {
        Prober {
            runner: self.runner,
            tmux: &self.tmux,
            descriptor_stem: &self.config.multiplexer.descriptor_stem,
            hosting_domain: &self.config.hosting_domain,
            concurrency: self.config.probe.concurrency,
        }
    }

    /// Pick a project from the registry and open it.
    pub async fn open<O: Write, E: Write>(
        &self,
        kind: RegistryKind,
        sessions_only: bool,
        console: &mut Console<O, E>,
    ) -> Result<()> {
        let Some(project) = self.select(kind, sessions_only, console).await? else {
            return Ok(());
        };

        let stem = &self.config.multiplexer.descriptor_stem;
        let action =
            launch::decide(self.runner, &self.tmux, &project, stem, self.inside_client).await;
        tracing::debug!("{} -> {:?}", project.display(), action);
        launch::execute(&action, &self.tmux, stem, console).await
    }

    /// Print the live listing without picking.
    pub async fn status<O: Write, E: Write>(
        &self,
        sessions_only: bool,
        console: &mut Console<O, E>,
    ) -> Result<()> {
        let color = self.config.color && console.out_is_terminal;
        let lines = self
            .listing(RegistryKind::Plain, sessions_only, color, console)
            .await?
            .unwrap_or_default();
        for line in &lines {
            console.emit(line)?;
        }
        Ok(())
    }

    /// Run the picker over the listing and resolve the answer to a path.
    /// `None` when there was nothing to pick or the user cancelled.
    async fn select<O: Write, E: Write>(
        &self,
        kind: RegistryKind,
        sessions_only: bool,
        console: &mut Console<O, E>,
    ) -> Result<Option<PathBuf>> {
        let Some(lines) = self
            .listing(kind, sessions_only, self.config.color, console)
            .await?
        else {
            return Ok(None);
        };

        let selection = self.picker.pick(&lines).await?;
        let project = selection.as_deref().and_then(resolve_selection);
        if project.is_none() {
            console.notice("No project selected.")?;
        }
        Ok(project)
    }

    /// Load the registry and build its display lines. `None` when there is
    /// nothing to show.
    async fn listing<O: Write, E: Write>(
        &self,
        kind: RegistryKind,
        sessions_only: bool,
        color: bool,
        console: &mut Console<O, E>,
    ) -> Result<Option<Vec<String>>> {
        let path = match kind {
            RegistryKind::Plain => self.config.registry_path(),
            RegistryKind::Structured => self.config.structured_registry_path(),
        };
        let loaded = registry::load(kind, &path)?;
        if loaded.rewritten {
            console.notice("Sorting project registry...")?;
        }
        if loaded.entries.is_empty() {
            console.notice("No projects found in registry.")?;
            return Ok(None);
        }

        let rows = self.rows(kind, &loaded.entries, sessions_only).await;
        if rows.is_empty() {
            console.notice("No projects with an active tmux session.")?;
            return Ok(None);
        }
        Ok(Some(listing::format(&rows, color)))
    }

    /// Rows for the listing. The plain registry is probed live; the
    /// structured registry shows its stored status and is only probed for
    /// sessions when filtering on them.
    async fn rows(
        &self,
        kind: RegistryKind,
        entries: &[ProjectEntry],
        sessions_only: bool,
    ) -> Vec<Row> {
        let paths: Vec<PathBuf> = entries.iter().map(ProjectEntry::path).collect();
        let prober = self.prober();

        match kind {
            RegistryKind::Plain => {
                let statuses = prober.all(&paths).await;
                entries
                    .iter()
                    .zip(&statuses)
                    .filter(|(_, status)| {
                        !sessions_only || status.session == SessionStatus::Active
                    })
                    .map(|(entry, status)| listing::row(entry, Some(status)))
                    .collect()
            }
            RegistryKind::Structured => {
                let keep: Vec<bool> = if sessions_only {
                    let sessions = prober.sessions(&paths).await;
                    sessions.iter().map(|s| *s == SessionStatus::Active).collect()
                } else {
                    vec![true; entries.len()]
                };
                entries
                    .iter()
                    .zip(keep)
                    .filter(|(_, keep)| *keep)
                    .map(|(entry, _)| listing::row(entry, None))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::BufferConsole;
    use crate::runner::fake::FakeRunner;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Chooses the first offered line containing `choose`
    struct FakePicker {
        choose: Option<String>,
        offered: Mutex<Vec<String>>,
    }

    impl FakePicker {
        fn choosing(pattern: &str) -> Self {
            Self {
                choose: Some(pattern.to_string()),
                offered: Mutex::new(Vec::new()),
            }
        }

        fn cancelling() -> Self {
            Self {
                choose: None,
                offered: Mutex::new(Vec::new()),
            }
        }

        fn offered(&self) -> Vec<String> {
            self.offered.lock().unwrap().clone()
        }
    }

    impl Picker for FakePicker {
        async fn pick(&self, lines: &[String]) -> Result<Option<String>> {
            *self.offered.lock().unwrap() = lines.to_vec();
            Ok(self
                .choose
                .as_ref()
                .and_then(|pattern| lines.iter().find(|l| l.contains(pattern.as_str())))
                .cloned())
        }
    }

    fn config_in(dir: &TempDir) -> Config {
        Config {
            registry: dir.path().join("projects.txt").display().to_string(),
            structured_registry: dir.path().join("bo-registry.yaml").display().to_string(),
            color: false,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_missing_registry_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let (runner, picker) = (FakeRunner::new(), FakePicker::cancelling());
        let mut console = BufferConsole::buffered();

        let err = App::new(&config, &runner, &picker)
            .open(RegistryKind::Plain, false, &mut console)
            .await
            .unwrap_err();

        assert!(err.is_missing_registry());
    }

    #[tokio::test]
    async fn test_empty_registry_exits_cleanly() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(config.registry_path(), "\n\n").unwrap();
        let (runner, picker) = (FakeRunner::new(), FakePicker::cancelling());
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .open(RegistryKind::Plain, false, &mut console)
            .await
            .unwrap();

        assert!(console.err_text().contains("No projects found"));
        assert!(picker.offered().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_prints_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(config.registry_path(), "/p/api\n").unwrap();
        let (runner, picker) = (FakeRunner::new(), FakePicker::cancelling());
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .open(RegistryKind::Plain, false, &mut console)
            .await
            .unwrap();

        assert_eq!(picker.offered().len(), 1);
        assert!(console.out_text().is_empty());
        assert!(console.err_text().contains("No project selected."));
    }

    #[tokio::test]
    async fn test_selected_project_without_descriptor_prints_path() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let api = dir.path().join("api");
        let web = dir.path().join("web");
        std::fs::create_dir_all(&api).unwrap();
        std::fs::create_dir_all(&web).unwrap();
        std::fs::write(
            config.registry_path(),
            format!("{}\n{}\n", web.display(), api.display()),
        )
        .unwrap();

        let runner = FakeRunner::new();
        let picker = FakePicker::choosing("web    ");
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .with_inside_client(false)
            .open(RegistryKind::Plain, false, &mut console)
            .await
            .unwrap();

        let canonical = std::fs::canonicalize(&web).unwrap();
        assert_eq!(console.out_text(), format!("{}\n", canonical.display()));
        assert!(console.err_text().contains("Sorting project registry..."));
        assert!(picker.offered()[0].starts_with("api "));
    }

    #[tokio::test]
    async fn test_sessions_only_filters_before_measuring() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(
            config.registry_path(),
            "/p/a-rather-long-project-name\n/p/short\n",
        )
        .unwrap();
        let runner = FakeRunner::new().respond("has-session -t =short", true, "");
        let picker = FakePicker::cancelling();
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .status(true, &mut console)
            .await
            .unwrap();

        assert_eq!(
            console.out_text(),
            "short    ● tmux    ? git    ✕ github    /p/short\n"
        );
    }

    #[tokio::test]
    async fn test_status_is_plain_when_not_on_a_terminal() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            color: true,
            ..config_in(&dir)
        };
        std::fs::write(config.registry_path(), "/p/api\n").unwrap();
        let (runner, picker) = (FakeRunner::new(), FakePicker::cancelling());
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .status(false, &mut console)
            .await
            .unwrap();

        assert_eq!(
            console.out_text(),
            "api    ○ tmux    ? git    ✕ github    /p/api\n"
        );
    }

    #[tokio::test]
    async fn test_sessions_only_with_no_sessions() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(config.registry_path(), "/p/api\n").unwrap();
        let (runner, picker) = (FakeRunner::new(), FakePicker::choosing("api"));
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .open(RegistryKind::Plain, true, &mut console)
            .await
            .unwrap();

        assert!(picker.offered().is_empty());
        assert!(console.out_text().is_empty());
        assert!(console.err_text().contains("No projects with an active tmux session."));
    }

    #[tokio::test]
    async fn test_browse_shows_stored_status_without_probing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(
            config.structured_registry_path(),
            "path: /p/api\nname: api\nlanguage: Rust\nframework: axum\n\
             tmux status: \"● tmux\"\ngit status: \"✓ git\"\ngithub status: \"✓ github\"\n",
        )
        .unwrap();
        let (runner, picker) = (FakeRunner::new(), FakePicker::cancelling());
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .open(RegistryKind::Structured, false, &mut console)
            .await
            .unwrap();

        assert_eq!(
            picker.offered(),
            vec!["api    Rust    axum    ● tmux    ✓ git    ✓ github    /p/api"]
        );
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_browse_sessions_only_probes_sessions() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        std::fs::write(
            config.structured_registry_path(),
            "path: /p/api\n---\npath: /p/web\n",
        )
        .unwrap();
        let runner = FakeRunner::new().respond("has-session -t =web", true, "");
        let picker = FakePicker::cancelling();
        let mut console = BufferConsole::buffered();

        App::new(&config, &runner, &picker)
            .open(RegistryKind::Structured, true, &mut console)
            .await
            .unwrap();

        let offered = picker.offered();
        assert_eq!(offered.len(), 1);
        assert!(offered[0].ends_with("/p/web"));
        assert!(!runner.called("git"));
    }
}
