mod aggregate;
mod classify;
mod email;
mod parser;
mod taxonomy;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use aggregate::Digest;
use taxonomy::Taxonomy;

#[derive(Parser)]
#[command(name = "scholar_digest", about = "Topic-bucketed digest of Google Scholar alert emails")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, classify and aggregate a batch of alert emails
    Digest {
        /// JSON file, HTML file, or directory of email files
        path: PathBuf,
        /// Max emails to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print the digest as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Inspect one email: inferred query, section, extracted studies
    Parse {
        /// JSON or HTML file holding the email
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Digest { path, limit, json } => run_digest(&path, limit, json),
        Commands::Parse { path } => run_parse(&path),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_digest(path: &Path, limit: Option<usize>, json: bool) -> anyhow::Result<()> {
    let mut emails = email::load_emails(path)?;
    if let Some(n) = limit {
        emails.truncate(n);
    }
    if emails.is_empty() {
        println!("No emails found at {}", path.display());
        return Ok(());
    }

    println!("Processing {} email(s)...", emails.len());
    let taxonomy = Taxonomy::reference();
    let digest = process_emails(&taxonomy, &emails);

    if json {
        println!("{}", serde_json::to_string_pretty(&digest)?);
    } else {
        print_digest(&digest);
    }

    let populated = digest.sections.iter().filter(|b| !b.studies.is_empty()).count();
    println!(
        "Digested {} email(s) into {} studies across {} section(s).",
        emails.len(),
        digest.total,
        populated
    );
    Ok(())
}

fn run_parse(path: &Path) -> anyhow::Result<()> {
    let emails = email::load_emails(path)?;
    let Some(first) = emails.first() else {
        println!("No email found at {}", path.display());
        return Ok(());
    };

    let taxonomy = Taxonomy::reference();
    let normalized = parser::normalize(first);
    let section = classify::classify(&taxonomy, &normalized.alert_query, &normalized.search_text);

    let query = if normalized.alert_query.is_empty() {
        "(none)"
    } else {
        normalized.alert_query.as_str()
    };
    println!("Alert query: {}", query);
    println!("Section:     {}", section);
    println!("Studies:     {}", normalized.studies.len());
    for study in &normalized.studies {
        println!("\n- {}", study.title);
        println!("  {}", study.url);
        println!("  {}", study.summary.replace('\n', "\n  "));
    }
    Ok(())
}

/// Normalize + classify each email in parallel (emails are independent),
/// then fold the batches sequentially in input order so first-seen
/// deduplication stays reproducible.
fn process_emails(taxonomy: &Taxonomy, emails: &[email::EmailInput]) -> Digest {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(emails.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut batches = Vec::with_capacity(emails.len());
    for chunk in emails.chunks(64) {
        let normalized: Vec<_> = chunk.par_iter().map(parser::normalize).collect();
        for n in normalized {
            let section = classify::classify(taxonomy, &n.alert_query, &n.search_text);
            batches.push((section, n.studies));
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    aggregate::aggregate(taxonomy, batches)
}

fn print_digest(digest: &Digest) {
    for bucket in &digest.sections {
        if bucket.studies.is_empty() {
            continue;
        }
        println!("\n=== {} ({}) ===", bucket.name, bucket.studies.len());
        for (i, study) in bucket.studies.iter().enumerate() {
            let first_line = study.summary.lines().next().unwrap_or("");
            println!("{:>3}. {}", i + 1, truncate(&study.title, 76));
            println!("     {}", truncate(&study.url, 76));
            println!("     {}", truncate(first_line, 76));
        }
    }
    println!("\n{} studies total", digest.total);
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

// ── Tests ──
