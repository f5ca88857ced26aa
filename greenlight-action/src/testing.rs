//! In-memory repositories for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use greenlight_client::{ClientError, Result};
use greenlight_core::domain::artifact::Artifact;
use greenlight_core::domain::check_suite::{
    CheckConclusion, CheckSuite, GITHUB_ACTIONS_APP, HeadCommit,
};
use greenlight_core::domain::deployment::Deployment;
use greenlight_core::dto::deployment::CreateDeployment;

use crate::repository::{
    ArtifactRepository, BranchHeadSnapshot, CheckSuiteRepository, DeploymentRepository,
};

pub const TARBALL_URL: &str = "https://api.github.com/repos/acme/broker/tarball/abc123";

pub fn suite(conclusion: Option<CheckConclusion>, run_id: u64) -> CheckSuite {
    app_suite(GITHUB_ACTIONS_APP, conclusion, run_id)
}

pub fn app_suite(app: &str, conclusion: Option<CheckConclusion>, run_id: u64) -> CheckSuite {
    CheckSuite {
        app_name: Some(app.to_string()),
        conclusion,
        workflow_run_id: Some(run_id),
    }
}

pub fn snapshot(suites: Vec<CheckSuite>) -> BranchHeadSnapshot {
    BranchHeadSnapshot {
        head: Some(HeadCommit {
            tarball_url: Some(TARBALL_URL.to_string()),
            check_suites: suites,
        }),
        errors: Vec::new(),
    }
}

pub fn artifact(id: u64, name: &str) -> Artifact {
    Artifact {
        id,
        name: name.to_string(),
        archive_download_url: format!(
            "https://api.github.com/repos/acme/broker/actions/artifacts/{}/zip",
            id
        ),
        size_in_bytes: 0,
        expired: false,
        created_at: None,
        expires_at: None,
    }
}

/// Answers queries from a script, then repeats a fallback forever
#[derive(Default)]
pub struct FakeCheckSuites {
    script: Mutex<VecDeque<Result<BranchHeadSnapshot>>>,
    fallback: Option<BranchHeadSnapshot>,
    calls: AtomicUsize,
}

impl FakeCheckSuites {
    pub fn repeating(snapshot: BranchHeadSnapshot) -> Self {
        Self {
            fallback: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn scripted(script: Vec<Result<BranchHeadSnapshot>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub fn then_repeat(mut self, snapshot: BranchHeadSnapshot) -> Self {
        self.fallback = Some(snapshot);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckSuiteRepository for FakeCheckSuites {
    async fn fetch_default_branch_head(
        &self,
        _owner: &str,
        _repo: &str,
        _suites: u32,
    ) -> Result<BranchHeadSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }

        self.fallback
            .clone()
            .ok_or_else(|| ClientError::api_error(500, "script exhausted"))
    }
}

/// Serves artifacts per run id and records which runs were listed
#[derive(Default)]
pub struct FakeArtifacts {
    runs: HashMap<u64, Vec<Artifact>>,
    listed: Mutex<Vec<u64>>,
}

impl FakeArtifacts {
    pub fn with_run(mut self, run_id: u64, artifacts: Vec<Artifact>) -> Self {
        self.runs.insert(run_id, artifacts);
        self
    }

    pub fn listed(&self) -> Vec<u64> {
        self.listed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArtifactRepository for FakeArtifacts {
    async fn list_run_artifacts(
        &self,
        _owner: &str,
        _repo: &str,
        run_id: u64,
    ) -> Result<Vec<Artifact>> {
        self.listed.lock().unwrap().push(run_id);

        self.runs
            .get(&run_id)
            .cloned()
            .ok_or_else(|| ClientError::api_error(404, "Not Found"))
    }
}

/// Records every deployment it is asked to create
#[derive(Default)]
pub struct FakeDeployments {
    created: Mutex<Vec<(String, String, CreateDeployment)>>,
    fail_with: Option<u16>,
}

impl FakeDeployments {
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<(String, String, CreateDeployment)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeploymentRepository for FakeDeployments {
    async fn create_deployment(
        &self,
        owner: &str,
        repo: &str,
        req: &CreateDeployment,
    ) -> Result<Deployment> {
        self.created
            .lock()
            .unwrap()
            .push((owner.to_string(), repo.to_string(), req.clone()));

        if let Some(status) = self.fail_with {
            return Err(ClientError::api_error(status, "deployment rejected"));
        }

        Ok(Deployment {
            id: 1,
            sha: req.git_ref.clone(),
            git_ref: req.git_ref.clone(),
            environment: req.environment.clone(),
            payload: serde_json::to_value(&req.payload).unwrap_or_default(),
            created_at: None,
        })
    }
}
