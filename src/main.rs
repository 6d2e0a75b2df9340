use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use answer_annotator::config::Settings;
use answer_annotator::parser::extract::citations::count_markers;
use answer_annotator::parser::extract::profile::{self, FieldStatus, ProfileField};
use answer_annotator::parser::extract::sources;
use answer_annotator::parser::sections::SectionKey;
use answer_annotator::transcript::{self, TranscriptError};
use answer_annotator::{process_answer, AnswerInput};

#[derive(Parser)]
#[command(name = "answer_annotator", about = "Recover sections, schemes, sources and citations from markdown answers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate one markdown answer
    Annotate {
        /// Markdown answer file
        #[arg(short, long)]
        answer: PathBuf,
        /// JSON file holding the raw source list
        #[arg(short, long)]
        sources: Option<PathBuf>,
        /// Text file with the user message that preceded the answer
        #[arg(short, long)]
        profile: Option<PathBuf>,
        /// Only annotate the first section with this key
        #[arg(long)]
        section: Option<SectionKey>,
    },
    /// Detect profile fields in a user message
    Profile {
        /// Message text (reads --file when omitted)
        text: Option<String>,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Normalize and classify a raw source list
    Sources {
        /// JSON file holding the raw source list
        file: PathBuf,
    },
    /// Annotate every assistant turn of a JSON transcript
    Transcript {
        file: PathBuf,
        #[arg(long)]
        section: Option<SectionKey>,
    },
    /// Annotate every *.json transcript in a directory
    Batch {
        dir: PathBuf,
        /// Max transcripts to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load();
    tracing::debug!(?settings, "loaded settings");

    let result = match cli.command {
        Commands::Annotate {
            answer,
            sources,
            profile,
            section,
        } => {
            let answer = read_text(&answer)?;
            let raw_sources = match sources {
                Some(path) => read_json(&path)?,
                None => serde_json::Value::Null,
            };
            let profile_text = profile.as_deref().map(read_text).transpose()?;
            let view = process_answer(&AnswerInput {
                answer,
                raw_sources,
                profile_text,
                focus: section,
            });
            print_json(&view, &settings)
        }
        Commands::Profile { text, file } => {
            let text = match (text, file) {
                (Some(t), _) => t,
                (None, Some(path)) => read_text(&path)?,
                (None, None) => anyhow::bail!("pass the message text or --file"),
            };
            let attrs = profile::extract(&text);
            let status = profile::field_status(&attrs);
            println!("{:<9} | {:<7} | Value", "Field", "Status");
            println!("{}", "-".repeat(40));
            for field in ProfileField::ALL {
                let mark = match status[&field] {
                    FieldStatus::Match => "match",
                    FieldStatus::Missing => "missing",
                };
                println!("{:<9} | {:<7} | {}", field, mark, attrs.get(field).unwrap_or("-"));
            }
            Ok(())
        }
        Commands::Sources { file } => {
            let cards = sources::normalize(&read_json(&file)?);
            if cards.is_empty() {
                println!("No usable sources.");
                return Ok(());
            }
            println!("{:>2} | {:<13} | {:<28} | {:<30}", "#", "Kind", "Host", "Title");
            println!("{}", "-".repeat(82));
            for (i, card) in cards.iter().enumerate() {
                println!(
                    "{:>2} | {:<13} | {:<28} | {:<30}",
                    i + 1,
                    sources::classify(card),
                    truncate(&sources::hostname(&card.url), 28),
                    truncate(&card.title, 30),
                );
            }
            Ok(())
        }
        Commands::Transcript { file, section } => {
            let messages = transcript::load_transcript(&file)?;
            let views = transcript::annotate_transcript(&messages, section);
            print_json(&views, &settings)
        }
        Commands::Batch { dir, limit } => {
            let files = list_transcripts(&dir, limit)?;
            if files.is_empty() {
                println!("No transcripts found in {}.", dir.display());
                return Ok(());
            }
            println!("Annotating {} transcripts...", files.len());
            let counts = process_transcripts(&files, settings.chunk_size);
            counts.print();
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let raw = read_text(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, settings: &Settings) -> Result<()> {
    let out = if settings.compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{out}");
    Ok(())
}

fn list_transcripts(dir: &Path, limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    if let Some(n) = limit {
        files.truncate(n);
    }
    Ok(files)
}

#[derive(Default)]
struct BatchCounts {
    transcripts: usize,
    answers: usize,
    sections: usize,
    schemes: usize,
    sources: usize,
    citations: usize,
    failed: Vec<String>,
}

impl BatchCounts {
    fn print(&self) {
        println!(
            "Annotated {} transcripts: {} answers, {} sections, {} schemes, {} sources, {} citations.",
            self.transcripts, self.answers, self.sections, self.schemes, self.sources, self.citations,
        );
        if !self.failed.is_empty() {
            println!("\n--- {} failed ---", self.failed.len());
            for f in &self.failed {
                println!("  {f}");
            }
        }
    }
}

fn process_transcripts(files: &[PathBuf], chunk_size: usize) -> BatchCounts {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    let mut counts = BatchCounts::default();

    for chunk in files.chunks(chunk_size) {
        let results: Vec<Result<_, TranscriptError>> = chunk
            .par_iter()
            .map(|path| {
                transcript::load_transcript(path)
                    .map(|messages| transcript::annotate_transcript(&messages, None))
            })
            .collect();

        for result in results {
            match result {
                Ok(views) => {
                    counts.transcripts += 1;
                    counts.answers += views.len();
                    for view in &views {
                        counts.sections += view.sections.len();
                        counts.schemes += view.schemes.len();
                        counts.sources += view.sources.len();
                        counts.citations += count_markers(&view.annotated);
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping transcript");
                    counts.failed.push(err.to_string());
                }
            }
        }
        pb.inc(chunk.len() as u64);
    }

    pb.finish_and_clear();
    counts
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
