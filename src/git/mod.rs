//! Git sync controller.
//!
//! Wraps the `git` CLI for status polling and the add/commit/push sequence.
//! Commands run with an argument vector in the site root, never through a
//! shell. The working tree is checked with `status --porcelain` before
//! committing, so a clean tree skips the commit instead of failing it.

use std::path::PathBuf;
use std::process::Output;

use chrono::Utc;
use tokio::process::Command;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{GitStatus, SyncOutcome};

const NOTHING_TO_COMMIT: &str = "Nothing to commit";

/// Controller for the site repository.
#[derive(Debug)]
pub struct GitController {
    repo_root: PathBuf,
    publish_remote: String,
    publish_branch: String,
    publish_message: String,
    /// Held for the whole add/commit/push sequence
    sequence: Mutex<()>,
}

impl GitController {
    pub fn new(
        repo_root: impl Into<PathBuf>,
        publish_remote: impl Into<String>,
        publish_branch: impl Into<String>,
        publish_message: impl Into<String>,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            publish_remote: publish_remote.into(),
            publish_branch: publish_branch.into(),
            publish_message: publish_message.into(),
            sequence: Mutex::new(()),
        }
    }

    /// Current branch and uncommitted changes. Read-only.
    pub async fn status(&self) -> Result<GitStatus, AppError> {
        let changes = self.porcelain().await?;
        let branch = self.run(&["branch", "--show-current"]).await?;

        Ok(GitStatus {
            has_changes: !changes.is_empty(),
            branch: stdout_of(&branch).trim().to_string(),
            changes,
        })
    }

    /// Stage everything, commit with `message` (timestamped default) and
    /// push to the upstream of the current branch.
    pub async fn sync(&self, message: Option<&str>) -> Result<SyncOutcome, AppError> {
        let message = match message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => format!("Update content via Admin: {}", Utc::now().to_rfc3339()),
        };

        let _guard = self.sequence.lock().await;
        self.commit_and_push(&message, &["push"], "@{u}").await
    }

    /// One-click publish: fixed message, explicit remote and branch.
    pub async fn publish(&self) -> Result<SyncOutcome, AppError> {
        let upstream = format!("{}/{}", self.publish_remote, self.publish_branch);
        let push = ["push", self.publish_remote.as_str(), self.publish_branch.as_str()];

        let _guard = self.sequence.lock().await;
        self.commit_and_push(&self.publish_message, &push, &upstream)
            .await
    }

    async fn commit_and_push(
        &self,
        message: &str,
        push: &[&str],
        upstream: &str,
    ) -> Result<SyncOutcome, AppError> {
        self.run(&["add", "."]).await?;

        if self.porcelain().await?.is_empty() {
            if self.commits_ahead(upstream).await == 0 {
                tracing::info!("Working tree clean, nothing to sync");
                return Ok(SyncOutcome {
                    message: NOTHING_TO_COMMIT.to_string(),
                    committed: false,
                    pushed: false,
                });
            }

            self.run(push).await?;
            tracing::info!("Pushed pending commits");
            return Ok(SyncOutcome {
                message: "Pushed pending commits".to_string(),
                committed: false,
                pushed: true,
            });
        }

        self.run(&["commit", "-m", message]).await?;
        tracing::info!(message = %message, "Committed changes");

        self.run(push).await?;
        tracing::info!("Pushed changes");

        Ok(SyncOutcome {
            message: "Synced successfully".to_string(),
            committed: true,
            pushed: true,
        })
    }

    async fn porcelain(&self) -> Result<Vec<String>, AppError> {
        let output = self.run(&["status", "--porcelain"]).await?;
        Ok(stdout_of(&output)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Local commits not yet on `upstream`; 0 when there is no upstream.
    async fn commits_ahead(&self, upstream: &str) -> u64 {
        let range = format!("{}..HEAD", upstream);
        match self.run(&["rev-list", "--count", &range]).await {
            Ok(output) => stdout_of(&output).trim().parse().unwrap_or(0),
            Err(e) => {
                tracing::debug!(upstream = %upstream, "No upstream to compare against: {}", e);
                0
            }
        }
    }

    /// Run one git command; a non-zero exit is an `ExternalProcess` error
    /// carrying git's own output.
    async fn run(&self, args: &[&str]) -> Result<Output, AppError> {
        tracing::debug!(args = ?args, "Running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .await
            .map_err(|e| AppError::ExternalProcess(format!("Failed to run git: {}", e)))?;

        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let detail = [stderr.trim(), stdout.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        tracing::error!(args = ?args, status = %output.status, "git failed: {}", detail);
        Err(AppError::ExternalProcess(format!(
            "git {} failed: {}",
            args.join(" "),
            detail
        )))
    }
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {:?} failed", args);
    }

    /// A repository on branch `main` with one commit and no remote.
    fn init_repo() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        git(dir, &["init", "-q"]);
        git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(dir, &["config", "user.email", "admin@example.com"]);
        git(dir, &["config", "user.name", "Admin"]);
        git(dir, &["config", "commit.gpgsign", "false"]);
        std::fs::write(dir.join("README.md"), "site\n").unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-q", "-m", "init"]);
        temp_dir
    }

    fn controller(dir: &Path) -> GitController {
        GitController::new(dir, "origin", "main", "add posts")
    }

    #[tokio::test]
    async fn test_status_clean_tree() {
        if !git_available() {
            return;
        }
        let repo = init_repo();
        let status = controller(repo.path()).status().await.unwrap();

        assert!(!status.has_changes);
        assert!(status.changes.is_empty());
        assert_eq!(status.branch, "main");
    }

    #[tokio::test]
    async fn test_status_reports_changes() {
        if !git_available() {
            return;
        }
        let repo = init_repo();
        std::fs::write(repo.path().join("new.md"), "hi").unwrap();

        let status = controller(repo.path()).status().await.unwrap();
        assert!(status.has_changes);
        assert_eq!(status.changes, vec!["?? new.md".to_string()]);
    }

    #[tokio::test]
    async fn test_sync_clean_tree_is_noop() {
        if !git_available() {
            return;
        }
        let repo = init_repo();
        let controller = controller(repo.path());

        let outcome = controller.sync(None).await.unwrap();
        assert_eq!(
            outcome,
            SyncOutcome {
                message: NOTHING_TO_COMMIT.to_string(),
                committed: false,
                pushed: false,
            }
        );

        let outcome = controller.publish().await.unwrap();
        assert!(!outcome.committed);
        assert!(!outcome.pushed);
    }

    #[tokio::test]
    async fn test_failed_push_keeps_commit() {
        if !git_available() {
            return;
        }
        let repo = init_repo();
        std::fs::write(repo.path().join("post.md"), "hello").unwrap();
        let controller = controller(repo.path());

        let result = controller.sync(Some("add post \"quoted\"")).await;
        assert!(matches!(result, Err(AppError::ExternalProcess(_))));

        let status = controller.status().await.unwrap();
        assert!(!status.has_changes);

        let log = std::process::Command::new("git")
            .args(["log", "-1", "--format=%s"])
            .current_dir(repo.path())
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), "add post \"quoted\"");
    }

    #[tokio::test]
    async fn test_sync_pushes_to_upstream() {
        if !git_available() {
            return;
        }
        let remote = TempDir::new().unwrap();
        git(remote.path(), &["init", "-q", "--bare"]);

        let repo = init_repo();
        let remote_url = remote.path().to_string_lossy().into_owned();
        git(repo.path(), &["remote", "add", "origin", &remote_url]);
        git(repo.path(), &["push", "-q", "-u", "origin", "main"]);

        std::fs::write(repo.path().join("post.md"), "hello").unwrap();
        let controller = controller(repo.path());

        let outcome = controller.sync(Some("new post")).await.unwrap();
        assert!(outcome.committed);
        assert!(outcome.pushed);

        // A commit made outside the dashboard is pushed by the next sync.
        std::fs::write(repo.path().join("other.md"), "x").unwrap();
        git(repo.path(), &["add", "."]);
        git(repo.path(), &["commit", "-q", "-m", "manual"]);

        let outcome = controller.sync(None).await.unwrap();
        assert!(!outcome.committed);
        assert!(outcome.pushed);

        let outcome = controller.sync(None).await.unwrap();
        assert_eq!(outcome.message, NOTHING_TO_COMMIT);
    }

    #[tokio::test]
    async fn test_status_outside_repository_fails() {
        if !git_available() {
            return;
        }
        let temp_dir = TempDir::new().unwrap();
        // A dangling gitdir pointer stops discovery of any enclosing repository.
        std::fs::write(temp_dir.path().join(".git"), "gitdir: /nonexistent\n").unwrap();

        let result = controller(temp_dir.path()).status().await;
        assert!(matches!(result, Err(AppError::ExternalProcess(_))));
    }
}
