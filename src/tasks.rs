use std::collections::BTreeSet;
use std::future::Future;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::registry::{git::GitCli, probe, Registry, RepoName, Repository};

/// What a finished background job reports back.
#[derive(Debug)]
pub enum JobOutcome {
    CloneFinished {
        repo: RepoName,
        result: std::result::Result<(), String>,
    },
    FetchFinished {
        repo: RepoName,
        result: std::result::Result<(), String>,
    },
}

impl JobOutcome {
    pub fn repo(&self) -> &RepoName {
        match self {
            JobOutcome::CloneFinished { repo, .. } | JobOutcome::FetchFinished { repo, .. } => repo,
        }
    }
}

enum JobKind {
    Clone,
    Fetch,
}

/// Dispatches clone and fetch jobs onto background tasks and funnels their
/// outcomes through one channel.
///
/// Background jobs only touch the filesystem; registry and cache mutation
/// happen on the task draining `next_outcome`, keeping all state changes
/// on one logical thread. At most one job per repository is in flight, so
/// overlapping clones of the same clone path cannot race.
pub struct JobPool {
    tx: mpsc::Sender<JobOutcome>,
    rx: mpsc::Receiver<JobOutcome>,
    in_flight: BTreeSet<RepoName>,
}

impl JobPool {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(16);
        Self {
            tx,
            rx,
            in_flight: BTreeSet::new(),
        }
    }

    /// Start a background clone. Returns false if a job for this
    /// repository is already in flight.
    pub fn spawn_clone(&mut self, repo: &Repository) -> bool {
        let url = repo.remote_url.clone();
        let path = repo.local_path.clone();
        self.dispatch(repo.name(), JobKind::Clone, async move {
            GitCli::clone(&url, &path).await.map_err(|e| e.to_string())
        })
    }

    /// Start a background fetch of `origin`.
    pub fn spawn_fetch(&mut self, repo: &Repository) -> bool {
        let path = repo.local_path.clone();
        self.dispatch(repo.name(), JobKind::Fetch, async move {
            GitCli::fetch(&path).await.map_err(|e| e.to_string())
        })
    }

    fn dispatch(
        &mut self,
        repo: RepoName,
        kind: JobKind,
        job: impl Future<Output = std::result::Result<(), String>> + Send + 'static,
    ) -> bool {
        if !self.in_flight.insert(repo.clone()) {
            return false;
        }
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = job.await;
            let outcome = match kind {
                JobKind::Clone => JobOutcome::CloneFinished { repo, result },
                JobKind::Fetch => JobOutcome::FetchFinished { repo, result },
            };
            // The pool owns the receiver for its whole lifetime; a send
            // only fails if the pool was dropped, and then nobody cares.
            let _ = tx.send(outcome).await;
        });
        true
    }

    /// Wait for the next finished job. `None` once every dispatched job
    /// has reported.
    pub async fn next_outcome(&mut self) -> Option<JobOutcome> {
        if self.in_flight.is_empty() {
            return None;
        }
        let outcome = self.rx.recv().await;
        if let Some(outcome) = &outcome {
            self.in_flight.remove(outcome.repo());
        }
        outcome
    }

    pub fn idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

impl Default for JobPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloned repositories whose minimum fetch interval has elapsed. The
/// caller stamps `last_fetch` when it dispatches, so a slow fetch is not
/// re-dispatched every tick.
pub fn fetch_due(registry: &Registry, now: DateTime<Utc>) -> Vec<RepoName> {
    registry
        .iter()
        .filter(|(_, repo)| repo.fetch_due(now) && probe::is_cloned(&repo.local_path))
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_outcomes_drain_in_completion_order() {
        let mut pool = JobPool::new();
        pool.dispatch(RepoName::from("acme.a"), JobKind::Clone, async { Ok(()) });
        pool.dispatch(RepoName::from("acme.b"), JobKind::Fetch, async {
            Err("boom".to_string())
        });

        let mut seen = Vec::new();
        while let Some(outcome) = pool.next_outcome().await {
            seen.push(outcome.repo().clone());
        }
        seen.sort();

        assert_eq!(seen, vec![RepoName::from("acme.a"), RepoName::from("acme.b")]);
        assert!(pool.idle());
    }

    #[tokio::test]
    async fn test_one_job_per_repository() {
        let mut pool = JobPool::new();
        let repo = RepoName::from("acme.a");

        assert!(pool.dispatch(repo.clone(), JobKind::Clone, async { Ok(()) }));
        // Second dispatch for the same repository is refused while the
        // first is in flight.
        assert!(!pool.dispatch(repo.clone(), JobKind::Clone, async { Ok(()) }));

        assert!(pool.next_outcome().await.is_some());
        assert!(pool.next_outcome().await.is_none());

        // Once drained, the repository can be dispatched again.
        assert!(pool.dispatch(repo, JobKind::Clone, async { Ok(()) }));
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_swallowed() {
        let mut pool = JobPool::new();
        pool.dispatch(RepoName::from("acme.a"), JobKind::Clone, async {
            Err("no route to host".to_string())
        });

        match pool.next_outcome().await.unwrap() {
            JobOutcome::CloneFinished { result, .. } => {
                assert_eq!(result.unwrap_err(), "no route to host");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
