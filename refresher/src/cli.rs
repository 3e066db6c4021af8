//! Command line interface

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use secrecy::SecretString;

use crate::authn::credential::CredentialInput;
use crate::config::options::{normalize_base_url, BatchOptions, HttpOptions, RefreshOptions};
use crate::config::settings::Settings;
use crate::errors::RefreshError;
use crate::logs::{LogLevel, LogOptions};
use crate::stacks::catalog::StackFilter;

/// Re-pull images and redeploy Portainer stacks
#[derive(Parser, Debug)]
#[command(
    name = "portainer-refresher",
    version,
    about = "Re-pull images and redeploy Portainer stacks",
    long_about = "Re-pulls the images of Portainer stacks and redeploys them, keeping their \
                  environment, prune setting and stack file unchanged.\n\n\
                  Examples:\n  \
                  portainer-refresher -u http://localhost:9000 -U admin -e 1 my_stack\n  \
                  PORTAINER_PASSWORD=secret portainer-refresher --url https://portainer.example.com --username me --stack 123\n  \
                  portainer-refresher --url https://portainer.example.com --api-key ptr_xxx --only-active"
)]
pub struct CliArgs {
    /// Portainer URL, e.g. http://localhost:9000
    #[arg(short = 'u', long, env = "PORTAINER_URL")]
    pub url: Option<String>,

    /// Username for the login exchange
    #[arg(short = 'U', long, env = "PORTAINER_USERNAME")]
    pub username: Option<String>,

    /// Password for the login exchange (prefer the environment variable)
    #[arg(short = 'P', long, env = "PORTAINER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Access token; used instead of username/password when set
    #[arg(short = 'k', long, env = "PORTAINER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Only refresh stacks owned by this endpoint
    #[arg(short = 'e', long, env = "PORTAINER_ENDPOINT_ID")]
    pub endpoint_id: Option<i64>,

    /// Name or ID of a single stack to refresh
    #[arg(short = 's', long = "stack", value_name = "STACK")]
    pub stack: Option<String>,

    /// Name or ID of a single stack to refresh (positional form)
    #[arg(value_name = "STACK", env = "PORTAINER_TARGET_STACK")]
    pub stack_positional: Option<String>,

    /// Skip stacks that are not running
    #[arg(long)]
    pub only_active: bool,

    /// JSON settings file
    #[arg(short = 'c', long, value_name = "PATH", env = "PORTAINER_REFRESHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Write logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Print the run summary as JSON on stdout instead of progress lines
    #[arg(long)]
    pub summary_json: bool,

    /// Timeout for ordinary API calls, in seconds
    #[arg(long, value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Timeout for each redeploy call, in seconds
    #[arg(long, value_name = "SECS")]
    pub update_timeout: Option<u64>,

    /// Pause between stacks, in milliseconds
    #[arg(long, value_name = "MILLIS")]
    pub pacing_ms: Option<u64>,
}

/// Everything the binary needs to start a run
#[derive(Debug)]
pub struct ResolvedConfig {
    pub refresh: RefreshOptions,
    pub logs: LogOptions,
    pub summary_json: bool,
}

impl CliArgs {
    /// Merge flags and environment over the settings file
    pub fn resolve(self, settings: Settings) -> Result<ResolvedConfig, RefreshError> {
        let url = non_empty(self.url)
            .or(settings.url)
            .ok_or_else(|| {
                RefreshError::ConfigError(
                    "Portainer URL is required (--url or PORTAINER_URL)".to_string(),
                )
            })?;
        let base_url = normalize_base_url(&url)?;

        let credentials = CredentialInput {
            username: non_empty(self.username).or(settings.username),
            password: non_empty(self.password).map(SecretString::from),
            access_token: non_empty(self.api_key).map(SecretString::from),
        };

        let filter = StackFilter {
            identifier: non_empty(self.stack)
                .or(non_empty(self.stack_positional))
                .or(non_empty(settings.stack)),
            endpoint_id: self.endpoint_id.or(settings.endpoint_id),
            only_active: self.only_active || settings.only_active,
        };

        let http = HttpOptions {
            request_timeout: Duration::from_secs(
                self.request_timeout.unwrap_or(settings.request_timeout_secs),
            ),
            update_timeout: Duration::from_secs(
                self.update_timeout.unwrap_or(settings.update_timeout_secs),
            ),
        };

        let batch = BatchOptions {
            pacing: Duration::from_millis(self.pacing_ms.unwrap_or(settings.pacing_millis)),
        };

        let log_level = if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level.unwrap_or(settings.log_level)
        };

        Ok(ResolvedConfig {
            refresh: RefreshOptions {
                base_url,
                credentials,
                filter,
                http,
                batch,
            },
            logs: LogOptions {
                log_level,
                json_format: self.json_logs,
                log_file: self.log_file,
            },
            summary_json: self.summary_json,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
