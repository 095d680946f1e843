use serde_json::{json, Value};
use snafu::{ResultExt, Snafu};
use tracing::{info, instrument, warn};

use crate::alias::AliasResolver;
use crate::lock::NameLocks;
use crate::naming::{unique_index_name, Clock, SystemClock};
use crate::ports::cluster::{self, ClusterAdmin};
use crate::ports::config::IndexConfigSource;
use crate::ports::populate::{PopulateRequest, Populator};
use crate::ports::report::Reporter;
use crate::readable::readable_error;

/// Failures happening before the cluster was modified by the recreation.
#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Discovery Error for index '{}': {}", index, source))]
    Discovery {
        index: String,
        source: cluster::Error,
    },

    #[snafu(display("Could not delete the unaliased index '{}': {}", index, source))]
    BareIndexDeletion {
        index: String,
        source: cluster::Error,
    },
}

/// How a recreation ended. Every index created by the recreation is either
/// the new target of the alias or has been deleted (unless `rolled_back` is
/// false, the deletion itself having failed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecreationOutcome {
    Succeeded { index: String },
    FailedAtCreate { index: String, reason: String },
    FailedAtPopulate { index: String, rolled_back: bool },
    FailedAtCutover { index: String, rolled_back: bool },
}

impl RecreationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RecreationOutcome::Succeeded { .. })
    }

    /// The physical index created by the recreation.
    pub fn index(&self) -> &str {
        match self {
            RecreationOutcome::Succeeded { index }
            | RecreationOutcome::FailedAtCreate { index, .. }
            | RecreationOutcome::FailedAtPopulate { index, .. }
            | RecreationOutcome::FailedAtCutover { index, .. } => index,
        }
    }
}

/// Steps of a recreation. `previous` holds the indexes the logical name was
/// aliased to when the recreation started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Discovering,
    Creating {
        previous: Vec<String>,
    },
    Populating {
        index: String,
        previous: Vec<String>,
    },
    CuttingOver {
        index: String,
        previous: Vec<String>,
    },
    CleaningUp {
        index: String,
        superseded: Vec<String>,
    },
    Failed(RecreationOutcome),
    Succeeded(RecreationOutcome),
}

impl Stage {
    pub fn outcome(&self) -> Option<&RecreationOutcome> {
        match self {
            Stage::Failed(outcome) | Stage::Succeeded(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// What to recreate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecreateRequest {
    pub logical: String,
    /// Database connection handed over to the population.
    pub database: Option<String>,
}

impl RecreateRequest {
    pub fn new(logical: impl Into<String>) -> Self {
        RecreateRequest {
            logical: logical.into(),
            database: None,
        }
    }

    pub fn with_database(mut self, database: Option<String>) -> Self {
        self.database = database;
        self
    }
}

pub struct RecreateOrchestrator<C, P, S, R> {
    cluster: C,
    populator: P,
    configs: S,
    reporter: R,
    clock: Box<dyn Clock>,
    locks: NameLocks,
}

impl<C, P, S, R> RecreateOrchestrator<C, P, S, R>
where
    C: ClusterAdmin,
    P: Populator,
    S: IndexConfigSource,
    R: Reporter,
{
    pub fn new(cluster: C, populator: P, configs: S, reporter: R) -> Self {
        RecreateOrchestrator {
            cluster,
            populator,
            configs,
            reporter,
            clock: Box::new(SystemClock),
            locks: NameLocks::default(),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Shares the exclusion registry with other orchestrators of the process.
    pub fn with_locks(mut self, locks: NameLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Rebuilds the index behind `request.logical` and points the logical
    /// name to it once it is fully populated.
    ///
    /// Only failures preceding any modification of the cluster are returned
    /// as errors, every other failure ends in a [`RecreationOutcome`].
    #[instrument(skip(self, request), fields(logical = %request.logical))]
    pub async fn recreate(&self, request: &RecreateRequest) -> Result<RecreationOutcome, Error> {
        let _guard = self.locks.acquire(&request.logical).await;

        let mut stage = Stage::Discovering;
        loop {
            stage = self.advance(request, stage).await?;
            if let Some(outcome) = stage.outcome() {
                info!("recreation of '{}' ended: {:?}", request.logical, outcome);
                return Ok(outcome.clone());
            }
        }
    }

    /// Runs one transition. Terminal stages are returned unchanged.
    pub async fn advance(&self, request: &RecreateRequest, stage: Stage) -> Result<Stage, Error> {
        let next = match stage {
            Stage::Discovering => self.discover(&request.logical).await?,
            Stage::Creating { previous } => self.create(&request.logical, previous).await,
            Stage::Populating { index, previous } => {
                self.populate(request, index, previous).await
            }
            Stage::CuttingOver { index, previous } => {
                self.cut_over(&request.logical, index, previous).await
            }
            Stage::CleaningUp { index, superseded } => self.clean_up(index, superseded).await,
            terminal @ (Stage::Failed(_) | Stage::Succeeded(_)) => terminal,
        };
        Ok(next)
    }

    /// Finds out what `logical` currently is: nothing, a bare index, or an
    /// alias. A bare index is deleted so the alias can be created later.
    pub async fn discover(&self, logical: &str) -> Result<Stage, Error> {
        self.reporter
            .line(&format!("Recreating index « {} » ...", logical));

        let exists = self
            .cluster
            .index_exists(logical)
            .await
            .context(DiscoverySnafu { index: logical })?;

        if !exists {
            self.reporter.line("Index does not exist yet.");
            return Ok(Stage::Creating { previous: vec![] });
        }

        let previous = AliasResolver::new(&self.cluster)
            .find_indexes_by_alias(logical)
            .await
            .context(DiscoverySnafu { index: logical })?;

        if previous.is_empty() {
            self.reporter
                .line("Index already exists and is not an alias.");
            let bare = vec![logical.to_string()];
            self.reporter.line(&deleting_message(&bare));
            self.cluster
                .delete_indexes(&bare)
                .await
                .context(BareIndexDeletionSnafu { index: logical })?;
        } else {
            self.reporter.line(&format!(
                "Index already exists as an alias of « {} ».",
                previous.join(", ")
            ));
        }

        Ok(Stage::Creating { previous })
    }

    /// Creates the new physical index with the configuration of `logical`.
    pub async fn create(&self, logical: &str, previous: Vec<String>) -> Stage {
        let index = unique_index_name(logical, self.clock.now());
        let config = self.configs.index_config(logical).unwrap_or_else(|| {
            info!("no configuration for index '{}', using defaults", logical);
            empty_config()
        });

        self.reporter
            .line(&format!("Creating index « {} » ...", index));

        let created = self.cluster.create_index(&index, &config).await;
        match created {
            Ok(()) => Stage::Populating { index, previous },
            Err(err) => {
                let reason = readable_error(&err);
                self.reporter.error(&reason);
                Stage::Failed(RecreationOutcome::FailedAtCreate { index, reason })
            }
        }
    }

    /// Fills the new index. Serving indexes are not touched whatever happens.
    pub async fn populate(
        &self,
        request: &RecreateRequest,
        index: String,
        previous: Vec<String>,
    ) -> Stage {
        let populate = PopulateRequest {
            index: index.clone(),
            alias: request.logical.clone(),
            mappings: true,
            database: request.database.clone(),
        };

        let succeeded = match self.populator.populate(&populate).await {
            Ok(0) => true,
            Ok(status) => {
                warn!("population of '{}' exited with status {}", index, status);
                self.reporter
                    .error(&format!("Population exited with status {}.", status));
                false
            }
            Err(err) => {
                self.reporter.error(&readable_error(&err));
                false
            }
        };

        if succeeded {
            Stage::CuttingOver { index, previous }
        } else {
            let rolled_back = self.roll_back(&index).await;
            Stage::Failed(RecreationOutcome::FailedAtPopulate { index, rolled_back })
        }
    }

    /// Moves the alias from the superseded indexes to the new one in a single
    /// atomic update, so the logical name always resolves to a populated index.
    pub async fn cut_over(&self, logical: &str, index: String, previous: Vec<String>) -> Stage {
        // The aliases may have moved since the discovery, the current view
        // wins when it can be read.
        let superseded: Vec<String> = match AliasResolver::new(&self.cluster)
            .find_indexes_by_alias(logical)
            .await
        {
            Ok(current) => current,
            Err(err) => {
                self.reporter.warn(&readable_error(&err));
                previous
            }
        }
        .into_iter()
        .filter(|name| name != &index)
        .collect();

        if !superseded.is_empty() {
            self.reporter.line(&removing_alias_message(&superseded));
        }
        let new_index = vec![index.clone()];
        self.reporter.line(&adding_alias_message(&new_index));

        let updated = self
            .cluster
            .update_aliases(logical, &new_index, &superseded)
            .await;
        match updated {
            Ok(()) => Stage::CleaningUp { index, superseded },
            Err(err) => {
                self.reporter.warn(&readable_error(&err));
                self.settle_cut_over(logical, index, superseded).await
            }
        }
    }

    /// An alias update reported as failed may still have been applied, e.g.
    /// when it was not acknowledged in time. The current aliases decide
    /// whether the new index is already serving before anything is deleted.
    async fn settle_cut_over(
        &self,
        logical: &str,
        index: String,
        superseded: Vec<String>,
    ) -> Stage {
        let current = AliasResolver::new(&self.cluster)
            .find_indexes_by_alias(logical)
            .await;
        match current {
            Ok(current) if current.contains(&index) => {
                self.reporter.warn(&format!(
                    "Alias « {} » points to « {} » despite the error.",
                    logical, index
                ));
                let superseded = superseded
                    .into_iter()
                    .filter(|name| !current.contains(name))
                    .collect();
                Stage::CleaningUp { index, superseded }
            }
            Ok(_) => {
                let rolled_back = self.roll_back(&index).await;
                Stage::Failed(RecreationOutcome::FailedAtCutover { index, rolled_back })
            }
            Err(err) => {
                self.reporter.warn(&readable_error(&err));
                self.reporter.error(&format!(
                    "Could not check alias « {} », keeping index « {} ».",
                    logical, index
                ));
                Stage::Failed(RecreationOutcome::FailedAtCutover {
                    index,
                    rolled_back: false,
                })
            }
        }
    }

    /// The new index is live: failures from here on are only warnings.
    pub async fn clean_up(&self, index: String, superseded: Vec<String>) -> Stage {
        if !superseded.is_empty() {
            self.reporter.line(&deleting_message(&superseded));
            if let Err(err) = self.cluster.delete_indexes(&superseded).await {
                self.reporter.warn(&readable_error(&err));
            }
        }

        let new_index = std::slice::from_ref(&index);
        self.reporter.line(&refreshing_message(new_index));
        if let Err(err) = self.cluster.refresh_indexes(new_index).await {
            self.reporter.warn(&readable_error(&err));
        }

        Stage::Succeeded(RecreationOutcome::Succeeded { index })
    }

    /// Deletes the index built by a failed recreation, best effort.
    pub async fn roll_back(&self, index: &str) -> bool {
        let indexes = vec![index.to_string()];
        self.reporter.line(&deleting_message(&indexes));
        match self.cluster.delete_indexes(&indexes).await {
            Ok(()) => true,
            Err(err) => {
                self.reporter.warn(&readable_error(&err));
                false
            }
        }
    }
}

fn empty_config() -> Value {
    json!({})
}

fn quoted(indexes: &[String]) -> String {
    indexes.join(" », « ")
}

fn deleting_message(indexes: &[String]) -> String {
    if indexes.len() > 1 {
        format!("Deleting indexes « {} »", quoted(indexes))
    } else {
        format!("Deleting index « {} »", quoted(indexes))
    }
}

fn removing_alias_message(indexes: &[String]) -> String {
    if indexes.len() > 1 {
        format!("Removing alias from indexes « {} » ...", quoted(indexes))
    } else {
        format!("Removing alias from index « {} » ...", quoted(indexes))
    }
}

fn adding_alias_message(indexes: &[String]) -> String {
    if indexes.len() > 1 {
        format!("Adding alias to indexes « {} » ...", quoted(indexes))
    } else {
        format!("Adding alias to index « {} » ...", quoted(indexes))
    }
}

fn refreshing_message(indexes: &[String]) -> String {
    if indexes.len() > 1 {
        format!("Refreshing indexes « {} » ...", quoted(indexes))
    } else {
        format!("Refreshing index « {} » ...", quoted(indexes))
    }
}
