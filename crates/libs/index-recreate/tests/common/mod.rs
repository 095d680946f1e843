#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use index_recreate::naming::Clock;
use index_recreate::ports::cluster::{self, AliasMap, ClusterAdmin};
use index_recreate::ports::populate::{self, PopulateRequest, Populator};
use index_recreate::ports::report::{Level, Reporter};
use index_recreate::ports::BoxError;
use index_recreate::RecreateOrchestrator;

#[derive(Debug)]
pub struct FakeError(pub String);

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FakeError {}

fn es_error(kind: &str, status: u16) -> BoxError {
    Box::new(FakeError(format!(
        r#"{{"error":{{"root_cause":[{{"type":"{kind}"}}],"type":"{kind}"}},"status":{status}}}"#
    )))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Op {
    Exists,
    Create,
    Delete,
    AliasMap,
    UpdateAliases,
    Refresh,
}

#[derive(Default)]
struct State {
    indexes: AliasMap,
    configs: BTreeMap<String, Value>,
    calls: Vec<String>,
    failing: BTreeSet<Op>,
    undeletable: BTreeSet<String>,
    unacknowledged_alias_updates: bool,
    failing_after_alias_update: BTreeSet<Op>,
}

/// In memory cluster with Elasticsearch's alias semantics: alias updates are
/// atomic and every referenced index must exist.
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        FakeCluster::default()
    }

    pub fn with_index(self, name: &str, aliases: &[&str]) -> Self {
        self.state.lock().unwrap().indexes.insert(
            name.to_string(),
            aliases.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn fail(&self, op: Op) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub fn refuse_deletion_of(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .undeletable
            .insert(name.to_string());
    }

    /// Alias updates are applied, then answered as not acknowledged.
    pub fn leave_alias_updates_unacknowledged(&self) {
        self.state.lock().unwrap().unacknowledged_alias_updates = true;
    }

    /// `op` starts failing once an alias update has been attempted.
    pub fn fail_after_alias_update(&self, op: Op) {
        self.state
            .lock()
            .unwrap()
            .failing_after_alias_update
            .insert(op);
    }

    pub fn add_alias(&self, index: &str, alias: &str) {
        self.state
            .lock()
            .unwrap()
            .indexes
            .entry(index.to_string())
            .or_default()
            .insert(alias.to_string());
    }

    pub fn resolve(&self, alias: &str) -> Vec<String> {
        index_recreate::alias::indexes_with_alias(&self.state.lock().unwrap().indexes, alias)
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.state.lock().unwrap().indexes.contains_key(name)
    }

    pub fn indexes(&self) -> Vec<String> {
        self.state.lock().unwrap().indexes.keys().cloned().collect()
    }

    pub fn config_of(&self, name: &str) -> Option<Value> {
        self.state.lock().unwrap().configs.get(name).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    fn exists(state: &State, name: &str) -> bool {
        state.indexes.contains_key(name)
            || state.indexes.values().any(|aliases| aliases.contains(name))
    }
}

#[async_trait]
impl ClusterAdmin for FakeCluster {
    async fn index_exists(&self, name: &str) -> Result<bool, cluster::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("exists {name}"));
        if state.failing.contains(&Op::Exists) {
            return Err(cluster::Error::IndexExistence {
                index: name.to_string(),
                source: Box::new(FakeError("connection refused".to_string())),
            });
        }
        Ok(FakeCluster::exists(&state, name))
    }

    async fn create_index(&self, name: &str, config: &Value) -> Result<(), cluster::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create {name}"));
        if state.failing.contains(&Op::Create) {
            return Err(cluster::Error::IndexCreation {
                index: name.to_string(),
                source: es_error("illegal_argument_exception", 400),
            });
        }
        if FakeCluster::exists(&state, name) {
            return Err(cluster::Error::IndexCreation {
                index: name.to_string(),
                source: es_error("resource_already_exists_exception", 400),
            });
        }
        state.indexes.insert(name.to_string(), BTreeSet::new());
        state.configs.insert(name.to_string(), config.clone());
        Ok(())
    }

    async fn delete_indexes(&self, names: &[String]) -> Result<(), cluster::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("delete {}", names.join(",")));
        let refused = state.failing.contains(&Op::Delete)
            || names.iter().any(|name| state.undeletable.contains(name));
        let missing = names.iter().any(|name| !state.indexes.contains_key(name));
        if refused || missing {
            return Err(cluster::Error::IndexDeletion {
                indexes: names.join(","),
                source: es_error(
                    if missing {
                        "index_not_found_exception"
                    } else {
                        "cluster_block_exception"
                    },
                    if missing { 404 } else { 403 },
                ),
            });
        }
        for name in names {
            state.indexes.remove(name);
        }
        Ok(())
    }

    async fn alias_map(&self) -> Result<AliasMap, cluster::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("aliases".to_string());
        if state.failing.contains(&Op::AliasMap) {
            return Err(cluster::Error::AliasRetrieval {
                source: Box::new(FakeError("timeout".to_string())),
            });
        }
        Ok(state.indexes.clone())
    }

    async fn update_aliases(
        &self,
        alias: &str,
        add: &[String],
        remove: &[String],
    ) -> Result<(), cluster::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!(
            "update_aliases {alias} +[{}] -[{}]",
            add.join(","),
            remove.join(",")
        ));
        let failing_after = std::mem::take(&mut state.failing_after_alias_update);
        state.failing.extend(failing_after);
        if state.failing.contains(&Op::UpdateAliases) {
            return Err(cluster::Error::AliasUpdate {
                alias: alias.to_string(),
                source: es_error("illegal_state_exception", 500),
            });
        }
        let valid = add.iter().all(|index| state.indexes.contains_key(index))
            && remove.iter().all(|index| {
                state
                    .indexes
                    .get(index)
                    .map(|aliases| aliases.contains(alias))
                    .unwrap_or(false)
            });
        if !valid {
            return Err(cluster::Error::AliasUpdate {
                alias: alias.to_string(),
                source: es_error("aliases_not_found_exception", 404),
            });
        }
        for index in remove {
            if let Some(aliases) = state.indexes.get_mut(index) {
                aliases.remove(alias);
            }
        }
        for index in add {
            if let Some(aliases) = state.indexes.get_mut(index) {
                aliases.insert(alias.to_string());
            }
        }
        if state.unacknowledged_alias_updates {
            return Err(cluster::Error::AliasUpdate {
                alias: alias.to_string(),
                source: Box::new(FakeError(r#"{"acknowledged":false}"#.to_string())),
            });
        }
        Ok(())
    }

    async fn refresh_indexes(&self, names: &[String]) -> Result<(), cluster::Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("refresh {}", names.join(",")));
        if state.failing.contains(&Op::Refresh) {
            return Err(cluster::Error::IndexRefresh {
                indexes: names.join(","),
                source: es_error("index_closed_exception", 400),
            });
        }
        Ok(())
    }
}

type Hook = Arc<dyn Fn(&PopulateRequest) + Send + Sync>;

/// Population returning a fixed status, optionally running `during` while
/// "populating".
#[derive(Clone)]
pub struct ScriptedPopulator {
    status: Result<i32, String>,
    requests: Arc<Mutex<Vec<PopulateRequest>>>,
    during: Option<Hook>,
}

impl ScriptedPopulator {
    pub fn exiting_with(status: i32) -> Self {
        ScriptedPopulator {
            status: Ok(status),
            requests: Arc::default(),
            during: None,
        }
    }

    pub fn failing_to_launch(details: &str) -> Self {
        ScriptedPopulator {
            status: Err(details.to_string()),
            requests: Arc::default(),
            during: None,
        }
    }

    pub fn during(mut self, hook: impl Fn(&PopulateRequest) + Send + Sync + 'static) -> Self {
        self.during = Some(Arc::new(hook));
        self
    }

    pub fn requests(&self) -> Vec<PopulateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Populator for ScriptedPopulator {
    async fn populate(&self, request: &PopulateRequest) -> Result<i32, populate::Error> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(hook) = &self.during {
            hook(request);
        }
        self.status
            .clone()
            .map_err(|details| populate::Error::Launch {
                details: details.clone(),
                source: Box::new(FakeError(details)),
            })
    }
}

#[derive(Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingReporter {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.reports
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn lines(&self) -> Vec<String> {
        self.messages(Level::Line)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warn)
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages(Level::Error)
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, level: Level, message: &str) {
        self.reports
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}

/// Starts at `start` and moves one second forward on every reading.
#[derive(Clone)]
pub struct SteppingClock {
    next: Arc<Mutex<DateTime<Utc>>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        SteppingClock {
            next: Arc::new(Mutex::new(start)),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

pub fn new_year() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub type TestOrchestrator =
    RecreateOrchestrator<FakeCluster, ScriptedPopulator, BTreeMap<String, Value>, RecordingReporter>;

pub fn orchestrator(
    cluster: &FakeCluster,
    populator: &ScriptedPopulator,
    configs: BTreeMap<String, Value>,
) -> (TestOrchestrator, RecordingReporter) {
    let reporter = RecordingReporter::default();
    let orchestrator = RecreateOrchestrator::new(
        cluster.clone(),
        populator.clone(),
        configs,
        reporter.clone(),
    )
    .with_clock(SteppingClock::starting_at(new_year()));
    (orchestrator, reporter)
}
