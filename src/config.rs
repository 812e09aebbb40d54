use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "result-analyzer", version, about = "Academic result dashboard with a scripted insights assistant")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the dashboard server (default).
    Serve(ServeConfig),
    /// Ask the assistant one question and print the reply.
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    #[arg(long, env = "RESULT_ANALYZER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "RESULT_ANALYZER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Simulated "thinking" time before each assistant reply.
    #[arg(long, env = "RESULT_ANALYZER_REPLY_DELAY_MS", default_value_t = 800)]
    pub reply_delay_ms: u64,

    /// Sessions with no requests for this long are shut down.
    #[arg(long, env = "RESULT_ANALYZER_SESSION_TTL_SECS", default_value_t = 1800)]
    pub session_ttl_secs: u64,
}

#[derive(Parser)]
struct ServeOnly {
    #[command(flatten)]
    config: ServeConfig,
}

impl ServeConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// How often idle sessions are swept: a quarter of the TTL, at least a second.
    pub fn sweep_interval(&self) -> Duration {
        (self.session_ttl() / 4).max(Duration::from_secs(1))
    }

    /// Defaults overridden by `RESULT_ANALYZER_*` variables, for runs without a subcommand.
    pub fn from_env() -> Self {
        ServeOnly::parse_from(["result-analyzer"]).config
    }
}
