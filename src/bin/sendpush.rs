use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use apptools::{ToolConfig, cli, logger, push};
use apptools_push::{FcmClient, Message, NotificationSender, PushError, Target};
use clap::{Parser, Subcommand, ValueEnum};

/// Send a test push notification through Firebase Cloud Messaging.
#[derive(Debug, Parser)]
#[command(name = "sendpush", version)]
struct Args {
    /// Firebase project id (default: push.project_id from the config).
    #[arg(long, env = "FCM_PROJECT_ID")]
    project: Option<String>,

    /// OAuth2 access token with the firebase.messaging scope,
    /// e.g. from `gcloud auth print-access-token`.
    #[arg(long, env = "FCM_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Let FCM validate the message without delivering it.
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Broadcast to every subscriber of a topic.
    Topic {
        #[arg(long, value_enum)]
        kind: Kind,
        /// Title (custom only).
        #[arg(long)]
        title: Option<String>,
        /// Body (custom only).
        #[arg(long)]
        body: Option<String>,
        /// Topic name (default: push.topic from the config).
        #[arg(long)]
        topic: Option<String>,
    },
    /// Send straight to one device's FCM registration token.
    Device {
        token: String,
        #[arg(long, default_value = "Prueba iOS")]
        title: String,
        #[arg(long, default_value = "Si ves esto, las notificaciones funcionan en tu iPhone.")]
        body: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    /// Market opening preset.
    Open,
    /// End-of-day preset.
    Close,
    /// Free text, requires --title and --body.
    Custom,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = cli::parse_args();
    let cfg = ToolConfig::discover(args.config.as_deref(), &args.project_root)?;
    logger::init(cfg.logging.level, args.verbose);
    let push_cfg = &cfg.push;

    let message = build_message(&args.cmd, &push_cfg.topic, &push_cfg.channel_id)?;

    let project = args
        .project
        .as_deref()
        .or(push_cfg.project_id.as_deref())
        .context("no Firebase project id; pass --project or set push.project_id")?;
    let client = FcmClient::new(project, &args.access_token, Duration::from_secs(push_cfg.timeout_secs))?
        .validate_only(args.dry_run);

    match client.send(&message).await {
        Ok(id) => {
            let verb = if args.dry_run { "Validated" } else { "Sent" };
            println!("{} notification to {}.", verb, message.target.describe());
            println!("  Message ID: {}", id);
            Ok(())
        }
        Err(PushError::Unregistered) => {
            if let Target::Topic(topic) = &message.target {
                bail!("topic '{}' has no subscribers; make sure the app is running and subscribed", topic);
            }
            bail!("device token is no longer registered; reopen the app to get a fresh token");
        }
        Err(e) => Err(e).context("sending notification"),
    }
}

fn build_message(cmd: &Cmd, default_topic: &str, channel: &str) -> anyhow::Result<Message> {
    Ok(match cmd {
        Cmd::Topic { kind, title, body, topic } => {
            let topic = topic.as_deref().unwrap_or(default_topic);
            match kind {
                Kind::Open => push::market_open(topic, channel),
                Kind::Close => push::market_close(topic, channel),
                Kind::Custom => {
                    let (Some(title), Some(body)) = (title, body) else {
                        bail!("--title and --body are required for --kind custom");
                    };
                    push::custom(topic, channel, title, body, "custom", &push::local_timestamp())
                }
            }
        }
        Cmd::Device { token, title, body } => {
            let token = push::validate_device_token(token).map_err(anyhow::Error::msg)?;
            push::device_test(token, channel, title, body)
        }
    })
}
