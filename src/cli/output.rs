//! Output formatting for CLI commands.
//!
//! Everything prints either as JSON or as human-readable text.

use anyhow::Result;
use netops_voice::{CommandMatcher, DispatchEngine, DispatchOutcome, Metrics, ShortcutAction};
use serde_json::json;

/// Print the outcome of one utterance with the resulting view.
pub fn print_outcome(engine: &DispatchEngine, outcome: &DispatchOutcome, json: bool) -> Result<()> {
    if json {
        let value = json!({
            "result": outcome,
            "announcement": engine.last_announcement(),
            "state": engine.state(),
            "context_depth": engine.context().len(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match outcome {
        DispatchOutcome::Empty => return Ok(()),
        DispatchOutcome::Handled { resolution } => {
            println!(
                "[{} via {}] {}",
                resolution.intent.name(),
                resolution.stage.label(),
                engine.state().section.display_name()
            );
        }
        DispatchOutcome::Unrecognized => {}
    }
    if let Some(text) = engine.last_announcement() {
        println!("{}", text);
    }
    Ok(())
}

pub fn print_shortcut(
    engine: &DispatchEngine,
    chord: &str,
    action: Option<ShortcutAction>,
    json: bool,
) -> Result<()> {
    if json {
        let value = json!({
            "chord": chord,
            "action": action,
            "announcement": engine.last_announcement(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match action {
            Some(action) => {
                println!("{}: {}", chord, action.description());
                if let Some(text) = engine.last_announcement() {
                    println!("{}", text);
                }
            }
            None => println!("{} is not bound.", chord),
        }
    }
    Ok(())
}

/// Print the phrase table followed by the grammar in scan order.
pub fn print_patterns(matcher: &CommandMatcher, json: bool) -> Result<()> {
    if json {
        let phrases: Vec<_> = matcher
            .phrases()
            .entries()
            .map(|(phrase, intent)| json!({"phrase": phrase, "intent": intent.name()}))
            .collect();
        let rules: Vec<_> = matcher
            .grammar()
            .patterns()
            .iter()
            .map(|rule| {
                json!({
                    "ordinal": rule.ordinal,
                    "id": rule.id,
                    "domain": rule.domain.as_str(),
                    "pattern": rule.pattern(),
                })
            })
            .collect();
        let value = json!({"phrases": phrases, "rules": rules});
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Exact phrases ({}):", matcher.phrases().len());
    for (phrase, intent) in matcher.phrases().entries() {
        println!("  {:<20} {}", phrase, intent.name());
    }
    println!();
    println!("Grammar rules ({}):", matcher.grammar().len());
    for rule in matcher.grammar().patterns() {
        println!(
            "  {:>2}. {:<32} {}",
            rule.ordinal,
            rule.id,
            rule.domain.as_str()
        );
    }
    Ok(())
}

pub fn print_state(engine: &DispatchEngine, json: bool) -> Result<()> {
    let state = engine.state();
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
    } else {
        println!("Section: {}", state.section.display_name());
        if let Some(brand) = &state.brand {
            println!("Brand: {}", brand.display_name());
        }
        if let Some(store) = &state.store_id {
            println!("Store: {}", store);
        }
        if let Some(query) = &state.query {
            println!("Query: {}", query);
        }
        if let Some(timeframe) = &state.timeframe {
            println!("Timeframe: {}", timeframe);
        }
        println!(
            "Intelligence: {}",
            if engine.intelligence_available() {
                "available"
            } else {
                "unavailable"
            }
        );
    }
    Ok(())
}

/// Print the context stack, most recent first.
pub fn print_context(engine: &DispatchEngine, json: bool) -> Result<()> {
    let mut entries: Vec<_> = engine.context().iter().collect();
    entries.reverse();
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("Context is empty.");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{}. {} ({}) at {}",
            i + 1,
            entry.kind().as_str(),
            entry.snapshot().section.display_name(),
            entry.timestamp().format("%H:%M:%S")
        );
    }
    Ok(())
}

pub fn print_metrics(metrics: &Metrics, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&metrics.export_json())?);
    } else {
        print!("{}", metrics.export_prometheus());
    }
    Ok(())
}
