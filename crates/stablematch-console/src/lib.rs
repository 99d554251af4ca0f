//! Colorful console output for solver events.
//!
//! Provides a custom `tracing` layer that formats matcher and search events
//! with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve/phase start and end, comparisons)
//! - **WARN**: Search budget exhausted
//! - **DEBUG**: Reduction passes and backtracks
//! - **TRACE**: Individual proposals and candidate checks

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const DEFAULT_DIRECTIVE: &str = "stablematch_solver=info";

/// Initializes the solver console output.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default `stablematch_solver=info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        let default: Directive = DEFAULT_DIRECTIVE
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into());
        let filter = EnvFilter::builder()
            .with_default_directive(default)
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("stablematch") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    solver: Option<String>,
    phase: Option<String>,
    outcome: Option<String>,
    proposer_count: Option<u64>,
    receiver_count: Option<u64>,
    step_bound: Option<u64>,
    steps: Option<u64>,
    step: Option<u64>,
    backtracks: Option<u64>,
    matched: Option<u64>,
    passes: Option<u64>,
    removed: Option<u64>,
    pass: Option<u64>,
    proposer: Option<u64>,
    receiver: Option<u64>,
    depth: Option<u64>,
    duration_ms: Option<u64>,
    found: Option<bool>,
    consistent: Option<bool>,
    identical: Option<bool>,
    deferred_blocking: Option<u64>,
    csp_found: Option<bool>,
    csp_improved: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "proposer_count" => &mut self.proposer_count,
            "receiver_count" => &mut self.receiver_count,
            "step_bound" => &mut self.step_bound,
            "steps" => &mut self.steps,
            "step" => &mut self.step,
            "backtracks" => &mut self.backtracks,
            "matched" => &mut self.matched,
            "passes" => &mut self.passes,
            "removed" => &mut self.removed,
            "pass" => &mut self.pass,
            "proposer" => &mut self.proposer,
            "receiver" => &mut self.receiver,
            "depth" => &mut self.depth,
            "duration_ms" => &mut self.duration_ms,
            "deferred_blocking" => &mut self.deferred_blocking,
            "csp_improved" => &mut self.csp_improved,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "found" => self.found = Some(value),
            "consistent" => self.consistent = Some(value),
            "identical" => self.identical = Some(value),
            "csp_found" => self.csp_found = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "solver" => self.solver = Some(value.to_string()),
            "phase" => self.phase = Some(value.to_string()),
            "outcome" => self.outcome = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "budget_exhausted" => format_budget_exhausted(v),
        "comparison" => format_comparison(v),
        "reduction_pass" | "backtrack" if matches!(level, Level::DEBUG | Level::TRACE) => {
            format_detail(v)
        }
        "proposal" if level == Level::TRACE => format_proposal(v),
        "candidate" if level == Level::TRACE => format_candidate(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn solver_name(v: &EventVisitor) -> &'static str {
    match v.solver.as_deref() {
        Some("deferred_acceptance") => "Deferred acceptance",
        Some("csp") => "Constraint search",
        _ => "Solver",
    }
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();

    let mut output = format!(
        "{} {} {} │ {} proposers │ {} receivers",
        format_elapsed(),
        "▶".bright_green().bold(),
        solver_name(v).white().bold(),
        count(v.proposer_count).bright_yellow(),
        count(v.receiver_count).bright_yellow(),
    );

    if let Some(bound) = v.step_bound {
        output.push_str(&format!(
            " │ bound {} steps",
            bound.to_formatted_string(&Locale::en).bright_yellow()
        ));
    }

    output
}

fn format_solve_end(v: &EventVisitor) -> String {
    let duration = v.duration_ms.unwrap_or(0);
    let mut output = format!(
        "{} {} {} complete │ {} │ {} steps",
        format_elapsed(),
        "■".bright_cyan().bold(),
        solver_name(v).white().bold(),
        format_duration_ms(duration).yellow(),
        count(v.steps).white(),
    );

    if let Some(matched) = v.matched {
        output.push_str(&format!(
            " │ {} matched",
            matched.to_formatted_string(&Locale::en).bright_green()
        ));
    }

    if let Some(backtracks) = v.backtracks {
        output.push_str(&format!(
            " │ {} backtracks",
            backtracks.to_formatted_string(&Locale::en).bright_magenta()
        ));
    }

    if let Some(found) = v.found {
        output.push_str(&format!(" │ {}", format_found(found)));
    }

    output
}

fn format_phase_start(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("unknown");

    format!(
        "{} {} {} started",
        format_elapsed(),
        "▶".bright_blue(),
        phase.white().bold()
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("unknown");
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} {} ended │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        phase.white().bold(),
        format_duration_ms(duration).yellow(),
    );

    if let Some(passes) = v.passes {
        output.push_str(&format!(
            " │ {} passes │ {} removed",
            passes.to_formatted_string(&Locale::en).white(),
            count(v.removed).bright_magenta(),
        ));
    }

    if let Some(steps) = v.steps {
        output.push_str(&format!(
            " │ {} steps │ {} backtracks",
            steps.to_formatted_string(&Locale::en).white(),
            count(v.backtracks).bright_magenta(),
        ));
    }

    if let Some(found) = v.found {
        output.push_str(&format!(" │ {}", format_found(found)));
    }

    output
}

fn format_budget_exhausted(v: &EventVisitor) -> String {
    format!(
        "{} {} Search budget exhausted │ {} steps │ {} backtracks │ depth {} │ {}",
        format_elapsed(),
        "⚠".bright_yellow().bold(),
        count(v.steps).white(),
        count(v.backtracks).bright_magenta(),
        count(v.depth).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
    )
}

fn format_comparison(v: &EventVisitor) -> String {
    let same = if v.identical.unwrap_or(false) {
        "identical matchings".bright_green().to_string()
    } else {
        "different matchings".bright_yellow().to_string()
    };
    let blocking = v.deferred_blocking.unwrap_or(0);
    let blocking = if blocking == 0 {
        "stable".bright_green().to_string()
    } else {
        format!("{} blocking", blocking).bright_red().to_string()
    };

    format!(
        "{} {} Comparison │ {} │ deferred acceptance {} │ csp {} │ {} proposers better off",
        format_elapsed(),
        "≡".bright_cyan().bold(),
        same,
        blocking,
        format_found(v.csp_found.unwrap_or(false)),
        count(v.csp_improved).white(),
    )
}

fn format_detail(v: &EventVisitor) -> String {
    let event = v.event.as_deref().unwrap_or("");
    let text = match event {
        "reduction_pass" => format!(
            "Reduction pass {} │ {} removed",
            count(v.pass),
            count(v.removed)
        ),
        _ => format!(
            "Backtrack │ proposer {} releases receiver {} │ {} total",
            count(v.proposer),
            count(v.receiver),
            count(v.backtracks)
        ),
    };
    format!("{} {} {}", format_elapsed(), "↺".bright_blue(), text.bright_black())
}

fn format_proposal(v: &EventVisitor) -> String {
    let outcome = v.outcome.as_deref().unwrap_or("unknown");
    let icon = match outcome {
        "accepted" | "replaced" => "✓".bright_green().to_string(),
        "exhausted" => "∅".bright_yellow().to_string(),
        _ => "✗".bright_red().to_string(),
    };
    let target = match v.receiver {
        Some(r) => format!("→ receiver {:>6}", r.to_formatted_string(&Locale::en)),
        None => "(list exhausted)".to_string(),
    };

    format!(
        "{} {} Step {:>10} │ Proposer {:>6} {} │ {}",
        format_elapsed(),
        icon,
        count(v.step).bright_black(),
        count(v.proposer).bright_black(),
        target.bright_black(),
        outcome.bright_black()
    )
}

fn format_candidate(v: &EventVisitor) -> String {
    let (icon, verdict) = if v.consistent.unwrap_or(false) {
        ("✓".bright_green().to_string(), "consistent")
    } else {
        ("✗".bright_red().to_string(), "rejected")
    };

    format!(
        "{} {} Candidate │ Proposer {:>6} → receiver {:>6} │ {}",
        format_elapsed(),
        icon,
        count(v.proposer).bright_black(),
        count(v.receiver).bright_black(),
        verdict.bright_black()
    )
}

fn format_found(found: bool) -> String {
    if found {
        "FOUND".bright_green().bold().to_string()
    } else {
        "NOT FOUND".bright_red().bold().to_string()
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_solve_start_names_solver_and_sizes() {
        let v = EventVisitor {
            solver: Some("deferred_acceptance".to_string()),
            proposer_count: Some(1200),
            receiver_count: Some(3),
            ..visitor("solve_start")
        };
        let output = format_event(&v, Level::INFO);
        assert!(output.contains("Deferred acceptance"));
        assert!(output.contains("1,200"));
        assert!(output.contains("proposers"));
    }

    #[test]
    fn test_solve_end_reports_found() {
        let v = EventVisitor {
            solver: Some("csp".to_string()),
            steps: Some(5),
            backtracks: Some(1),
            found: Some(false),
            ..visitor("solve_end")
        };
        let output = format_event(&v, Level::INFO);
        assert!(output.contains("Constraint search"));
        assert!(output.contains("backtracks"));
        assert!(output.contains("NOT FOUND"));
    }

    #[test]
    fn test_reduction_phase_end() {
        let v = EventVisitor {
            phase: Some("reduction".to_string()),
            passes: Some(2),
            removed: Some(4),
            ..visitor("phase_end")
        };
        let output = format_event(&v, Level::INFO);
        assert!(output.contains("reduction"));
        assert!(output.contains("passes"));
        assert!(!output.contains("backtracks"));
    }

    #[test]
    fn test_budget_exhausted() {
        let v = EventVisitor {
            steps: Some(10_000),
            ..visitor("budget_exhausted")
        };
        let output = format_event(&v, Level::WARN);
        assert!(output.contains("Search budget exhausted"));
        assert!(output.contains("10,000"));
    }

    #[test]
    fn test_proposal_only_at_trace() {
        let v = EventVisitor {
            step: Some(2),
            proposer: Some(1),
            receiver: Some(0),
            outcome: Some("replaced".to_string()),
            ..visitor("proposal")
        };
        assert!(format_event(&v, Level::DEBUG).is_empty());
        let output = format_event(&v, Level::TRACE);
        assert!(output.contains("replaced"));
        assert!(output.contains("receiver"));
    }

    #[test]
    fn test_candidate_check_at_trace() {
        let v = EventVisitor {
            proposer: Some(1),
            receiver: Some(2),
            consistent: Some(false),
            ..visitor("candidate")
        };
        assert!(format_event(&v, Level::DEBUG).is_empty());
        let output = format_event(&v, Level::TRACE);
        assert!(output.contains("Candidate"));
        assert!(output.contains("rejected"));

        let v = EventVisitor {
            consistent: Some(true),
            ..v
        };
        assert!(format_event(&v, Level::TRACE).contains("consistent"));
    }

    #[test]
    fn test_backtrack_detail_at_debug() {
        let v = EventVisitor {
            proposer: Some(0),
            receiver: Some(1),
            backtracks: Some(1),
            ..visitor("backtrack")
        };
        assert!(format_event(&v, Level::INFO).is_empty());
        assert!(format_event(&v, Level::DEBUG).contains("Backtrack"));
    }

    #[test]
    fn test_unknown_event_is_silent() {
        assert!(format_event(&visitor("certified"), Level::INFO).is_empty());
        assert!(format_event(&EventVisitor::default(), Level::INFO).is_empty());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init();
        init();
    }
}
