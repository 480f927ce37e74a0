//! `factcheck` subcommand.
//!
//! With a claim on the command line, checks it once. Without one, reads
//! claims from stdin until `/quit`; checks run in the background and
//! `/history` lists the session's earlier results.

use std::sync::Arc;
use std::time::Duration;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use loksahayak_core::config::FactCheckConfig;
use loksahayak_factcheck::{
    FactCheckError, FactCheckRecord, FactCheckResult, FactCheckSession, PlaceholderChecker,
    Verdict,
};

use crate::repl::Flow;

type CheckOutcome = Result<Option<FactCheckResult>, FactCheckError>;

pub async fn run(config: &FactCheckConfig, claim: &str) -> Result<(), Box<dyn std::error::Error>> {
    let checker = Arc::new(PlaceholderChecker::new(Duration::from_millis(config.latency_ms)));
    let session = Arc::new(FactCheckSession::new(checker, config));

    if claim.trim().is_empty() {
        return interactive(session).await;
    }

    println!("  {}", style("Checking…").dim());
    match session.check(claim).await? {
        Some(result) => print_result(&result),
        None => println!("  Enter a claim to check."),
    }
    Ok(())
}

async fn interactive(session: Arc<FactCheckSession>) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "  {}",
        style("Type a claim to check. /history lists earlier checks, /quit exits.").dim()
    );

    let mut tasks = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if handle_line(&session, &mut tasks, &line) == Flow::Quit {
                    break;
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "Fact check task failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    tasks.shutdown().await;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FactCheckInput {
    Claim(String),
    History,
    Quit,
    Blank,
}

fn parse_line(line: &str) -> FactCheckInput {
    match line.trim() {
        "" => FactCheckInput::Blank,
        "/history" => FactCheckInput::History,
        "/quit" | "/exit" => FactCheckInput::Quit,
        claim => FactCheckInput::Claim(claim.to_string()),
    }
}

/// Apply one line; claims are checked on a background task.
fn handle_line(
    session: &Arc<FactCheckSession>,
    tasks: &mut JoinSet<CheckOutcome>,
    line: &str,
) -> Flow {
    match parse_line(line) {
        FactCheckInput::Blank => {}
        FactCheckInput::Quit => return Flow::Quit,
        FactCheckInput::History => print_history(&session.history()),
        FactCheckInput::Claim(claim) => {
            let session = Arc::clone(session);
            tasks.spawn(async move {
                println!("  {}", style("Checking…").dim());
                let outcome = session.check(&claim).await;
                match &outcome {
                    Ok(Some(result)) => print_result(result),
                    Ok(None) => {}
                    Err(FactCheckError::Busy) => println!(
                        "  {}",
                        style("A check is already running. Wait for it to finish.").yellow()
                    ),
                    Err(e) => eprintln!("  {} {}", style("!").red().bold(), e),
                }
                outcome
            });
        }
    }
    Flow::Continue
}

fn verdict_badge(verdict: Verdict) -> console::StyledObject<String> {
    match verdict {
        Verdict::LikelyTrue => style(format!("✔ {verdict}")).green(),
        Verdict::LikelyFalse => style(format!("✖ {verdict}")).red(),
        Verdict::Unclear => style(format!("? {verdict}")).yellow(),
    }
}

fn print_history(history: &[FactCheckRecord]) {
    println!();
    if history.is_empty() {
        println!("  {}", style("No claims checked yet.").dim());
    }
    for (n, record) in history.iter().enumerate() {
        println!(
            "  {} {}  {}%  {}",
            style(format!("{}.", n + 1)).dim(),
            verdict_badge(record.result.verdict),
            record.result.score,
            record.claim
        );
    }
    println!();
}

fn print_result(result: &FactCheckResult) {
    println!();
    println!("  Verdict  {}", verdict_badge(result.verdict).bold());
    println!("  Score    {}%", result.score);
    println!();
    for source in &result.sources {
        println!(
            "  {} {} [{}, {} reliability]",
            style(format!("{}.", source.id)).dim(),
            style(&source.title).bold(),
            source.stance,
            source.reliability
        );
        println!("     {}", source.excerpt);
    }
    println!();
    println!(
        "  {}",
        style("Placeholder scoring: the verdict does not reflect the claim's content.").dim()
    );
}
