use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use index_recreate::ports::populate::{self, PopulateRequest, Populator};

use crate::PopulateSettings;

/// Fills the new index by running an external command, which inherits the
/// standard streams of the current process.
#[derive(Debug, Clone)]
pub struct CommandPopulator {
    program: String,
    args: Vec<String>,
}

impl CommandPopulator {
    pub fn new(settings: &PopulateSettings) -> Self {
        CommandPopulator {
            program: settings.program.clone(),
            args: settings.args.clone(),
        }
    }

    /// Configured arguments followed by the ones describing `request`.
    pub fn arguments(&self, request: &PopulateRequest) -> Vec<String> {
        let mut args = self.args.clone();
        args.extend([
            "--index".to_string(),
            request.index.clone(),
            "--index-alias".to_string(),
            request.alias.clone(),
        ]);
        if request.mappings {
            args.push("--mappings".to_string());
        }
        if let Some(database) = &request.database {
            args.extend(["--database".to_string(), database.clone()]);
        }
        args
    }
}

#[async_trait]
impl Populator for CommandPopulator {
    async fn populate(&self, request: &PopulateRequest) -> Result<i32, populate::Error> {
        let args = self.arguments(request);
        info!("running {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|err| populate::Error::Launch {
                details: format!("could not run '{}'", self.program),
                source: Box::new(err),
            })?;

        // No code when killed by a signal.
        Ok(status.code().unwrap_or(-1))
    }
}
