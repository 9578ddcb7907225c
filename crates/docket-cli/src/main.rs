use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use docket_core::domain::{Actor, NewWorkItem, Priority, TenantId};
use docket_core::impls::{
    InMemoryJobGateway, InMemoryReminderStore, InMemoryWorkItemStore, RecordingNotificationSender,
    TracingEventSink,
};
use docket_core::ports::{Clock, FixedClock};
use docket_core::{AppBuilder, DocketConfig};

#[derive(Parser, Debug)]
#[command(name = "docket", version, about = "Work items with reminders that fire once")]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the effective configuration as JSON.
    Config,

    /// Run a scripted scenario against in-memory adapters and a fixed clock.
    Demo {
        /// Make delivery fail for the reminder with this message.
        #[arg(long)]
        fail_message: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DocketConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DocketConfig::default(),
    };

    match cli.command {
        Command::Config => print_json(&config),
        Command::Demo { fail_message } => demo(config, fail_message).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCKET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "docket=debug,docket_core=debug,info"
        } else {
            "docket=info,docket_core=info,warn"
        })
    });

    let format = env::var("DOCKET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn demo(config: DocketConfig, fail_message: Option<String>) -> anyhow::Result<()> {
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let gateway = Arc::new(InMemoryJobGateway::new());
    let notifier = Arc::new(RecordingNotificationSender::new());
    if let Some(message) = &fail_message {
        notifier.fail_on(message.clone()).await;
    }

    let app = AppBuilder::new()
        .reminder_store(Arc::new(InMemoryReminderStore::new()))
        .work_item_store(Arc::new(InMemoryWorkItemStore::new()))
        .notifier(notifier.clone())
        .job_gateway(gateway.clone())
        .event_sink(Arc::new(TracingEventSink))
        .clock(clock.clone())
        .config(config)
        .build()?;

    let tenant = TenantId::generate();
    let alice = Actor::new("alice@example.com");
    let start = clock.now();
    info!(tenant_id = %tenant, "demo tenant seeded");

    let item = app
        .work_items
        .create_work_item(
            tenant,
            NewWorkItem {
                priority: Priority::High,
                due_date: Some(start + Duration::days(1)),
                estimated_hours: 8.0,
                tags: vec!["finance".into()],
                ..NewWorkItem::titled("Quarterly report")
            },
            &alice,
        )
        .await?;
    app.work_items.start(tenant, item, &alice).await?;

    let mut scheduled = Vec::new();
    for (offset, message) in [
        (Duration::minutes(10), "Draft the summary"),
        (Duration::minutes(20), "Collect the numbers"),
        (Duration::hours(2), "Send it out"),
    ] {
        let id = app
            .reminders
            .schedule_reminder(tenant, item, start + offset, message, &alice)
            .await?;
        scheduled.push(id);
    }
    println!("== jobs after scheduling");
    print_json(&gateway.jobs().await)?;

    clock.advance(Duration::minutes(30));
    println!("== sweep at +30m");
    print_json(&app.run_sweep_once().await?)?;

    let last = scheduled[2];
    app.reminders
        .reschedule_reminder(tenant, last, start + Duration::hours(3), None, &alice)
        .await?;
    if let Err(e) = app.reminders.trigger_reminder(tenant, last, None, &alice).await {
        tracing::warn!(reminder_id = %last, error = %e, "manual trigger did not deliver");
    }

    clock.advance(Duration::hours(4));
    println!("== sweep at +4h30m");
    print_json(&app.run_sweep_once().await?)?;

    println!("== reminders");
    print_json(&app.reminders.reminders_for_work_item(tenant, item).await?)?;
    println!("== notifications sent");
    print_json(&notifier.sent().await)?;
    println!("== jobs left");
    print_json(&gateway.jobs().await)?;
    Ok(())
}
