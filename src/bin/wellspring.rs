//! Wellspring CLI - Command-line interface for the wellness analytics core
//!
//! Commands:
//! - add-mood: Record a mood entry with optional activities
//! - add-metric: Record a body-metric sample
//! - journal: Record a journal entry
//! - list: Show stored entries, optionally filtered
//! - stats: Print derived statistics and insights
//! - series: Print chart series data

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use wellspring::aggregate;
use wellspring::insight;
use wellspring::present;
use wellspring::store::{EntryDraft, EntryFilter};
use wellspring::{
    CoreError, Entry, EntryValue, FileStorage, Goal, Metric, PersistentStore, WELLSPRING_VERSION,
};

/// Wellspring - Analytics core for a personal-wellness tracker
#[derive(Parser)]
#[command(name = "wellspring")]
#[command(version = WELLSPRING_VERSION)]
#[command(about = "Track wellness entries and derive statistics", long_about = None)]
struct Cli {
    /// Directory holding the entry snapshots
    #[arg(long, default_value = "wellspring-data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a mood entry with optional activities
    AddMood {
        /// Mood level, 1 (bad) to 5 (excellent)
        level: u8,

        /// Comma-separated activity tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Record a body-metric sample
    AddMetric {
        /// Metric to record
        #[arg(value_enum)]
        metric: MetricArg,

        /// Sample value (non-negative)
        value: f64,
    },

    /// Record a journal entry
    Journal {
        /// Entry title
        title: String,

        /// Entry body text
        content: String,

        /// Single mood label tag
        #[arg(long)]
        mood: Option<String>,
    },

    /// Show stored entries, optionally filtered
    List {
        /// Domain to list
        #[arg(value_enum, default_value = "moods")]
        domain: Domain,

        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print derived statistics and insights
    Stats {
        /// Metric to summarize against a goal target
        #[arg(long, value_enum)]
        goal_metric: Option<MetricArg>,

        /// Goal target for the chosen metric
        #[arg(long)]
        goal_target: Option<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print chart series data
    Series {
        /// Series to print
        #[arg(value_enum)]
        kind: SeriesKind,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Steps,
    Water,
    Sleep,
    Meditation,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Steps => Metric::Steps,
            MetricArg::Water => Metric::Water,
            MetricArg::Sleep => Metric::Sleep,
            MetricArg::Meditation => Metric::Meditation,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Domain {
    /// Mood entries
    Moods,
    /// Body-metric samples
    Metrics,
    /// Journal entries
    Journal,
}

impl Domain {
    fn key(&self) -> &'static str {
        match self {
            Domain::Moods => "moods",
            Domain::Metrics => "metrics",
            Domain::Journal => "journal",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SeriesKind {
    /// Mean mood per calendar date
    Timeline,
    /// Mean mood per activity tag
    Tags,
    /// Mean mood per time-of-day bucket
    TimeOfDay,
    /// Entry count per mood level
    Distribution,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CoreError> {
    match cli.command {
        Commands::AddMood { level, tags, note } => {
            let mut store = open_store(&cli.data_dir, Domain::Moods)?;
            let mut draft = EntryDraft::new(EntryValue::Mood(level)).with_tags(tags);
            if let Some(note) = note {
                draft = draft.with_note(note);
            }
            let id = store.add(draft)?;
            println!("Recorded mood entry {id}");
            Ok(())
        }

        Commands::AddMetric { metric, value } => {
            let mut store = open_store(&cli.data_dir, Domain::Metrics)?;
            let metric = Metric::from(metric);
            let id = store.add(EntryDraft::new(EntryValue::Measure { metric, value }))?;
            println!("Recorded {} sample {id}", metric.as_str());
            Ok(())
        }

        Commands::Journal {
            title,
            content,
            mood,
        } => {
            let mut store = open_store(&cli.data_dir, Domain::Journal)?;
            let draft = EntryDraft::new(EntryValue::Journal {
                title,
                body: content,
                image_url: None,
            })
            .with_tags(mood.into_iter().collect());
            let id = store.add(draft)?;
            println!("Recorded journal entry {id}");
            Ok(())
        }

        Commands::List {
            domain,
            from,
            to,
            search,
            json,
        } => cmd_list(&cli.data_dir, domain, from, to, search, json),

        Commands::Stats {
            goal_metric,
            goal_target,
            json,
        } => cmd_stats(&cli.data_dir, goal_metric, goal_target, json),

        Commands::Series { kind, json } => cmd_series(&cli.data_dir, kind, json),
    }
}

fn open_store(
    data_dir: &PathBuf,
    domain: Domain,
) -> Result<PersistentStore<FileStorage>, CoreError> {
    let storage = FileStorage::open(data_dir)?;
    PersistentStore::open(storage, domain.key())
}

fn cmd_list(
    data_dir: &PathBuf,
    domain: Domain,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    search: Option<String>,
    json: bool,
) -> Result<(), CoreError> {
    let store = open_store(data_dir, domain)?;
    let filter = EntryFilter {
        from,
        to,
        text: search,
        tag: None,
    };
    let entries: Vec<&Entry> = store.store().list_by_timestamp(Some(&filter));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let when = entry.timestamp.format("%Y-%m-%d %H:%M");
        match &entry.value {
            EntryValue::Mood(level) => {
                let tags = if entry.tags.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", entry.tags.join(", "))
                };
                println!("{} #{} mood {}{}", when, entry.id, level, tags);
            }
            EntryValue::Measure { metric, value } => {
                println!(
                    "{} #{} {} {} {}",
                    when,
                    entry.id,
                    metric.as_str(),
                    value,
                    metric.unit()
                );
            }
            EntryValue::Journal { title, .. } => {
                println!("{} #{} journal: {}", when, entry.id, title);
            }
        }
    }
    println!("{} entries", entries.len());
    Ok(())
}

fn cmd_stats(
    data_dir: &PathBuf,
    goal_metric: Option<MetricArg>,
    goal_target: Option<f64>,
    json: bool,
) -> Result<(), CoreError> {
    let moods = open_store(data_dir, Domain::Moods)?;
    let entries: Vec<&Entry> = moods.store().list(None).collect();

    let mut tags: Vec<String> = entries.iter().flat_map(|e| e.tags.clone()).collect();
    tags.sort();
    tags.dedup();
    let universe: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();

    let insights = insight::generate(&entries, &universe);

    let summary = match (goal_metric, goal_target) {
        (Some(metric), Some(target)) => {
            let metrics = open_store(data_dir, Domain::Metrics)?;
            let samples: Vec<&Entry> = metrics.store().list(None).collect();
            let goal = Goal {
                metric: metric.into(),
                target,
            };
            Some(aggregate::metric_summary(&samples, &goal)?)
        }
        _ => None,
    };

    if json {
        let report = serde_json::json!({
            "entry_count": entries.len(),
            "insights": insights,
            "goal_summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Wellspring Stats");
    println!("================");
    println!("Mood entries: {}", entries.len());
    if !insights.is_empty() {
        println!("\nInsights:");
        for insight in &insights {
            println!("  - {}", insight.text);
        }
    }
    if let Some(summary) = summary {
        println!(
            "\n{}: total {:.1} {}, average {:.1}, goal met on {} of {} samples",
            summary.metric.as_str(),
            summary.total,
            summary.metric.unit(),
            summary.average,
            summary.goal_met,
            summary.sample_count,
        );
    }
    Ok(())
}

fn cmd_series(data_dir: &PathBuf, kind: SeriesKind, json: bool) -> Result<(), CoreError> {
    let moods = open_store(data_dir, Domain::Moods)?;
    let entries: Vec<&Entry> = moods.store().list(None).collect();

    let points = match kind {
        SeriesKind::Timeline => present::timeline_series(&aggregate::group_by_date(&entries)),
        SeriesKind::Tags => {
            let mut tags: Vec<String> = entries.iter().flat_map(|e| e.tags.clone()).collect();
            tags.sort();
            tags.dedup();
            let universe: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
            present::tag_series(&aggregate::correlate_by_tag(&entries, &universe))
        }
        SeriesKind::TimeOfDay => {
            present::time_of_day_series(&aggregate::group_by_time_of_day(&entries))
        }
        SeriesKind::Distribution => {
            present::distribution_series(&aggregate::mood_distribution(&entries))
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        for point in &points {
            println!("{}\t{:.2}\t{}", point.label, point.value, point.count);
        }
    }
    Ok(())
}

// Error reporting

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(errors) => CliError {
                code: "VALIDATION_ERROR".to_string(),
                message: errors.to_string(),
                hint: Some("Fix the listed fields and retry".to_string()),
            },
            CoreError::NotFound(id) => CliError {
                code: "NOT_FOUND".to_string(),
                message: format!("No entry with id {id}"),
                hint: Some("Run 'wellspring list' to see stored entries".to_string()),
            },
            CoreError::NotConfirmed => CliError {
                code: "NOT_CONFIRMED".to_string(),
                message: "Removal was not confirmed".to_string(),
                hint: None,
            },
            CoreError::InvalidGoal(target) => CliError {
                code: "INVALID_GOAL".to_string(),
                message: format!("Goal target must be positive and finite, got {target}"),
                hint: Some("Pass a positive --goal-target".to_string()),
            },
            CoreError::CorruptSnapshot(message) => CliError {
                code: "CORRUPT_SNAPSHOT".to_string(),
                message,
                hint: Some("The snapshot was reset; re-add your entries".to_string()),
            },
            CoreError::Storage(message) => CliError {
                code: "STORAGE_ERROR".to_string(),
                message,
                hint: Some("Check the data directory path and permissions".to_string()),
            },
            CoreError::ExternalService(message) => CliError {
                code: "SERVICE_ERROR".to_string(),
                message,
                hint: None,
            },
            CoreError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
        }
    }
}
