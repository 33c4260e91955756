//! clipwatch CLI: submit a video, watch the job, review and publish the
//! generated schedule. A terminal stand-in for the web UI layer.

mod logging;

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use clipwatch_client::{
    ClientSettings, EmojiUsage, HttpJobService, JobService, JobWatcher, NewJobRequest, PollTiming,
    ServiceError, Tone,
};
use clipwatch_core::{JobView, Phase};
use watch_logging::watch_info;

#[derive(Parser)]
#[command(
    name = "clipwatch",
    about = "Turn a video into scheduled social posts and watch the job from your terminal."
)]
struct Cli {
    /// Base URL of the content service.
    #[arg(
        long,
        env = "CLIPWATCH_API_URL",
        default_value = "http://localhost:8000",
        global = true
    )]
    api_url: String,

    /// Also write logs to ./clipwatch.log.
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a video URL for content generation and print the job id.
    Create {
        /// Source video URL (YouTube).
        #[arg(long)]
        url: String,
        #[arg(long, value_enum, default_value = "professional")]
        tone: ToneArg,
        #[arg(long, value_enum, default_value = "none")]
        emoji: EmojiArg,
        /// Keep watching the created job until it is ready or failed.
        #[arg(long)]
        watch: bool,
    },
    /// Watch an existing job until the schedule is ready or the job fails.
    Watch {
        job_id: String,
        /// Item ids to exclude from publishing (repeatable).
        #[arg(long = "skip", value_name = "ITEM_ID")]
        skip: Vec<String>,
        /// Publish the schedule once it is ready.
        #[arg(long)]
        publish: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ToneArg {
    Professional,
    Casual,
    Bold,
}

impl From<ToneArg> for Tone {
    fn from(arg: ToneArg) -> Self {
        match arg {
            ToneArg::Professional => Tone::Professional,
            ToneArg::Casual => Tone::Casual,
            ToneArg::Bold => Tone::Bold,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EmojiArg {
    None,
    Light,
    Medium,
}

impl From<EmojiArg> for EmojiUsage {
    fn from(arg: EmojiArg) -> Self {
        match arg {
            EmojiArg::None => EmojiUsage::None,
            EmojiArg::Light => EmojiUsage::Light,
            EmojiArg::Medium => EmojiUsage::Medium,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(if cli.log_file {
        logging::LogDestination::Both
    } else {
        logging::LogDestination::Terminal
    });

    let settings = ClientSettings {
        base_url: cli.api_url.clone(),
        ..ClientSettings::default()
    };
    let service: Arc<dyn JobService> = Arc::new(HttpJobService::new(settings)?);

    match cli.command {
        Command::Create {
            url,
            tone,
            emoji,
            watch,
        } => {
            let job_id = create_job(service.clone(), &url, tone.into(), emoji.into()).await?;
            println!("Created job {job_id}");
            if watch {
                watch_job(service, job_id, Vec::new(), false).await?;
            }
        }
        Command::Watch {
            job_id,
            skip,
            publish,
        } => {
            watch_job(service, job_id, skip, publish).await?;
        }
    }

    Ok(())
}

async fn create_job(
    service: Arc<dyn JobService>,
    url: &str,
    tone: Tone,
    emoji_usage: EmojiUsage,
) -> anyhow::Result<String> {
    let request = NewJobRequest {
        url: url.to_string(),
        tone,
        emoji_usage,
    };
    match service.create_job(&request).await {
        Ok(job_id) => {
            watch_info!("created job {} for {}", job_id, url);
            Ok(job_id)
        }
        // The same field-level messages the web form shows.
        Err(ServiceError::InvalidUrl(_)) => {
            bail!("Please enter a valid YouTube URL.")
        }
        Err(ServiceError::CaptionsUnavailable(_)) => {
            bail!("This video does not have captions enabled.")
        }
        Err(ServiceError::AccessDenied(_)) => {
            bail!("This video cannot be processed due to access restrictions.")
        }
        Err(err) => Err(err).context("failed to create content job"),
    }
}

/// Drives one watcher to a terminal phase, printing phase transitions as the
/// reconciled view changes, then optionally excludes items and publishes.
async fn watch_job(
    service: Arc<dyn JobService>,
    job_id: String,
    skip: Vec<String>,
    publish: bool,
) -> anyhow::Result<()> {
    let watcher = JobWatcher::new(service, PollTiming::default());
    let mut rx = watcher.subscribe();
    watcher.start(job_id.clone());

    let mut last_phase: Option<Phase> = None;
    let terminal: JobView = loop {
        let view = rx.borrow_and_update().clone();
        if last_phase != Some(view.phase) {
            println!("[{:?}] {}", view.phase, view.message);
            last_phase = Some(view.phase);
        }
        if view.phase.is_terminal() {
            break view;
        }
        rx.changed()
            .await
            .context("watcher stopped before reaching a terminal phase")?;
    };

    if terminal.phase == Phase::Error {
        bail!("job {job_id} failed: {}", terminal.message);
    }

    println!();
    for item in &terminal.items {
        let date = item.scheduled_date.as_deref().unwrap_or("unscheduled");
        println!("  {} [{}] ({})", item.id, item.platform.as_str(), date);
        println!("    {}", item.content);
    }

    for item_id in &skip {
        watcher.toggle_inclusion(item_id, false);
    }
    let view = watcher.current_view();
    println!(
        "\n{} of {} items selected",
        view.included_count,
        view.items.len()
    );

    if publish {
        let count = watcher.publish().await.context("publish failed")?;
        println!("Published {count} posts.");
    }

    watcher.stop();
    Ok(())
}
