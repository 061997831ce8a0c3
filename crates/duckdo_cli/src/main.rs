//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive one user's session against a SQLite file for local sanity checks.
//! - Keep output plain and line-oriented.
//!
//! Usage: `duckdo_cli <user> <command> [args]`, where command is one of
//! `ping | tasks | add <text> | describe <task-id> [text] | toggle <task-id> |
//! delete <task-id> <phrase> | draw <count> | hatch | pond`.

use duckdo_core::db::open_db;
use duckdo_core::{
    collection_stats, init_logging, CoreConfig, DuckSession, SqliteKvStore, StdRandomSource,
    SystemClock, TaskQuery, TaskSort,
};
use std::error::Error;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use uuid::Uuid;

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), Box<dyn Error>> {
    if args.first().map(String::as_str) == Some("ping") {
        println!("duckdo_core ping={}", duckdo_core::ping());
        println!("duckdo_core version={}", duckdo_core::core_version());
        return Ok(());
    }

    let (user, command, rest) = match args.as_slice() {
        [user, command, rest @ ..] => (user.as_str(), command.as_str(), rest),
        _ => return Err(usage().into()),
    };

    let config = CoreConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.to_str() {
        // Logging is best-effort for the smoke binary.
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let conn = open_db(&config.db_path)?;
    let mut session = DuckSession::new(
        SqliteKvStore::new(&conn),
        user,
        StdRandomSource::from_entropy(),
        SystemClock,
    );

    match (command, rest) {
        ("tasks", []) => {
            let query = TaskQuery {
                sort: TaskSort::Status,
                ..TaskQuery::default()
            };
            for task in session.list_tasks(&query)? {
                let mark = if task.is_done() { "x" } else { " " };
                println!("[{mark}] {} {}", task.id, task.content);
            }
        }
        ("add", words) if !words.is_empty() => {
            let task = session.create_task(words.join(" "), None)?;
            println!("added {}", task.id);
        }
        ("describe", [id, words @ ..]) => {
            let text = (!words.is_empty()).then(|| words.join(" "));
            let task = session.describe_task(Uuid::parse_str(id)?, text)?;
            println!("{} {}", task.id, task.description.as_deref().unwrap_or("-"));
        }
        ("toggle", [id]) => {
            let toggle = session.toggle_task_status(Uuid::parse_str(id)?)?;
            println!("status={}", toggle.outcome.status.as_str());
            if let Some(grant) = toggle.outcome.reward {
                println!(
                    "+{} ticket, +{}% egg (tickets={}, egg={}%)",
                    grant.currency,
                    grant.incubation_progress,
                    toggle.economy.currency,
                    toggle.economy.incubation_progress
                );
            }
        }
        ("delete", [id, phrase]) => {
            let removed = session.delete_task(Uuid::parse_str(id)?, phrase)?;
            println!("deleted {}", removed.id);
        }
        ("draw", [count]) => {
            let purchase = session.purchase_draw(count.parse()?)?;
            thread::sleep(Duration::from_millis(config.draw_reveal_delay_ms));
            for draw in &purchase.draws {
                let badge = if draw.is_new() { "NEW" } else { "dup" };
                println!("{:<9} {} [{badge}]", draw.tier.as_str(), draw.instance.name);
            }
            println!(
                "tickets={} pity={}",
                purchase.economy.currency, purchase.economy.pity_counter
            );
        }
        ("hatch", []) => {
            let outcome = session.hatch()?;
            println!(
                "hatched {} {} (eggs hatched={})",
                outcome.instance.rarity.as_str(),
                outcome.instance.name,
                outcome.economy.incubation_count
            );
        }
        ("pond", []) => {
            let economy = session.economy()?;
            let collection = session.collection()?;
            let stats = collection_stats(&collection);
            println!(
                "tickets={} egg={}% pity={} ducks={} stars={}",
                economy.currency,
                economy.incubation_progress,
                economy.pity_counter,
                stats.distinct,
                stats.total_stars
            );
            for duck in &collection {
                println!("{:<9} {} x{}", duck.rarity.as_str(), duck.name, duck.star_level);
            }
        }
        _ => return Err(usage().into()),
    }

    Ok(())
}

fn usage() -> String {
    concat!(
        "usage: duckdo_cli ping | duckdo_cli <user> ",
        "(tasks | add <text> | describe <id> [text] | toggle <id> | delete <id> <phrase> | ",
        "draw <count> | hatch | pond)"
    )
    .to_string()
}
