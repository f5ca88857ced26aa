//! Deployment notifier
//!
//! Runs as a pre/post step pair so that the deployment is created after every
//! other post step of the job, in particular after the build output has been
//! pushed to the binary cache. The pre phase only leaves a marker behind.

use std::sync::Arc;

use greenlight_core::domain::deployment::{Deployment, Phase};
use greenlight_core::dto::deployment::CreateDeployment;
use tracing::info;

use crate::config::NotifierConfig;
use crate::error::Result;
use crate::repository::DeploymentRepository;
use crate::runtime::WorkflowRuntime;

/// State key saved by the pre phase
pub const RUN_MARKER: &str = "isPost";

/// Picks the phase from the marker a previous pre phase saved
pub fn phase_from_marker(runtime: &WorkflowRuntime) -> Phase {
    if runtime.get_state(RUN_MARKER).is_some() {
        Phase::Post
    } else {
        Phase::Pre
    }
}

/// Creates a deployment record on the post phase of a job
pub struct DeploymentNotifier {
    config: NotifierConfig,
    deployments: Arc<dyn DeploymentRepository>,
    runtime: Arc<WorkflowRuntime>,
}

impl DeploymentNotifier {
    pub fn new(
        config: NotifierConfig,
        deployments: Arc<dyn DeploymentRepository>,
        runtime: Arc<WorkflowRuntime>,
    ) -> Self {
        Self {
            config,
            deployments,
            runtime,
        }
    }

    /// Runs one phase
    ///
    /// # Returns
    /// The created deployment on the post phase, `None` on the pre phase
    pub async fn run(&self, phase: Phase) -> Result<Option<Deployment>> {
        info!("Running deployment notifier ({} phase)", phase);

        match phase {
            Phase::Pre => {
                self.on_pre()?;
                Ok(None)
            }
            Phase::Post => self.on_post().await.map(Some),
        }
    }

    /// Saves the run marker; no API call
    pub fn on_pre(&self) -> Result<()> {
        self.runtime.save_state(RUN_MARKER, "true")?;
        info!("Deployment will be created in the post phase");
        Ok(())
    }

    /// Creates the deployment
    ///
    /// Fails without calling the API when the store path, repository or
    /// commit is missing.
    pub async fn on_post(&self) -> Result<Deployment> {
        let target = self.config.target()?;

        let req = CreateDeployment::for_store_path(&target.sha, &target.store_path)
            .with_environment(target.environment);

        let deployment = self
            .deployments
            .create_deployment(&target.owner, &target.repo, &req)
            .await?;

        info!(
            "Created deployment {} of {} for {}/{} (store path {})",
            deployment.id, target.sha, target.owner, target.repo, target.store_path
        );

        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;
    use crate::testing::FakeDeployments;

    fn config(store_path: Option<&str>) -> NotifierConfig {
        NotifierConfig {
            repository: Some("acme/broker".to_string()),
            sha: Some("abc123".to_string()),
            store_path: store_path.map(str::to_string),
            environment: None,
        }
    }

    fn notifier(
        config: NotifierConfig,
        deployments: &Arc<FakeDeployments>,
        runtime: WorkflowRuntime,
    ) -> DeploymentNotifier {
        DeploymentNotifier::new(
            config,
            Arc::clone(deployments) as Arc<dyn DeploymentRepository>,
            Arc::new(runtime),
        )
    }

    #[tokio::test]
    async fn test_pre_phase_saves_marker_without_api_call() {
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("state");
        let deployments = Arc::new(FakeDeployments::default());
        let runtime = WorkflowRuntime::new(None, Some(state_file.clone()));

        let result = notifier(config(Some("/nix/store/xyz")), &deployments, runtime)
            .run(Phase::Pre)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(deployments.created().is_empty());

        let state = std::fs::read_to_string(&state_file).unwrap();
        assert!(state.starts_with("isPost<<ghadelimiter_"));
        assert!(state.contains("\ntrue\n"));
    }

    #[tokio::test]
    async fn test_post_phase_without_store_path_fails_without_api_call() {
        let deployments = Arc::new(FakeDeployments::default());

        let err = notifier(config(None), &deployments, WorkflowRuntime::default())
            .run(Phase::Post)
            .await
            .unwrap_err();

        assert!(matches!(err, ActionError::Configuration(_)));
        assert_eq!(err.to_string(), "DEPLOY_STORE_PATH not set");
        assert!(deployments.created().is_empty());
    }

    #[tokio::test]
    async fn test_post_phase_creates_one_deployment() {
        let deployments = Arc::new(FakeDeployments::default());

        let deployment = notifier(
            config(Some("/nix/store/xyz-broker")),
            &deployments,
            WorkflowRuntime::default(),
        )
        .run(Phase::Post)
        .await
        .unwrap()
        .unwrap();

        let created = deployments.created();
        assert_eq!(created.len(), 1);

        let (owner, repo, req) = &created[0];
        assert_eq!(owner, "acme");
        assert_eq!(repo, "broker");
        assert_eq!(req.git_ref, "abc123");
        assert_eq!(req.payload.store_path, "/nix/store/xyz-broker");
        assert!(req.required_contexts.is_empty());
        assert_eq!(deployment.git_ref, "abc123");
    }

    #[tokio::test]
    async fn test_api_failure_is_surfaced() {
        let deployments = Arc::new(FakeDeployments::failing(422));

        let err = notifier(
            config(Some("/nix/store/xyz")),
            &deployments,
            WorkflowRuntime::default(),
        )
        .on_post()
        .await
        .unwrap_err();

        assert!(matches!(err, ActionError::Client(ref e) if e.is_client_error()));
        assert_eq!(deployments.created().len(), 1);
    }

    #[test]
    fn test_phase_from_marker() {
        assert_eq!(phase_from_marker(&WorkflowRuntime::default()), Phase::Pre);
        assert_eq!(
            phase_from_marker(&WorkflowRuntime::default().with_state(RUN_MARKER, "true")),
            Phase::Post
        );
    }
}
