// SPDX-License-Identifier: MIT
// cli/calc.rs — calculator subcommands + interactive REPL.
//
// Single-shot ops print the result and append to the history log. The REPL
// keeps errors non-fatal: a bad token or a division by zero prints a message
// and waits for the next line.

use anyhow::Result;
use std::io::{self, BufRead, Write as IoWrite};

use crate::calc::history::{HistoryEntry, HistoryLog};
use crate::calc::Op;
use crate::config::TaskdConfig;

fn open_log(config: &TaskdConfig) -> HistoryLog {
    HistoryLog::at(config.history_file.clone())
}

pub async fn run_op(config: &TaskdConfig, op: Op, a: f64, b: f64) -> Result<()> {
    let result = op.apply(a, b)?;
    println!("{} {} {} = {}", a, op.symbol(), b, result);
    open_log(config)
        .append(HistoryEntry::now(op, a, b, result))
        .await?;
    Ok(())
}

pub async fn history(config: &TaskdConfig, limit: Option<usize>) -> Result<()> {
    let entries = open_log(config).load().await;
    print_history(&entries, limit);
    Ok(())
}

pub async fn stats(config: &TaskdConfig) -> Result<()> {
    let stats = open_log(config).stats().await;
    println!("total: {}", stats.total);
    println!("  add: {}", stats.add);
    println!("  sub: {}", stats.sub);
    println!("  mul: {}", stats.mul);
    println!("  div: {}", stats.div);
    Ok(())
}

pub async fn clear(config: &TaskdConfig) -> Result<()> {
    open_log(config).clear().await?;
    println!("History cleared.");
    Ok(())
}

fn print_history(entries: &[HistoryEntry], limit: Option<usize>) {
    if entries.is_empty() {
        println!("No operations in history.");
        return;
    }
    let shown = match limit {
        Some(n) => &entries[entries.len().saturating_sub(n)..],
        None => entries,
    };
    for (i, entry) in shown.iter().enumerate() {
        println!(
            "{}. [{}] {} {} {} = {:.4}",
            i + 1,
            entry.timestamp.to_rfc3339(),
            entry.operand_a,
            entry.operation.symbol(),
            entry.operand_b,
            entry.result
        );
    }
}

// ─── REPL ─────────────────────────────────────────────────────────────────────

pub async fn run_repl(config: &TaskdConfig) -> Result<()> {
    println!("taskd calc — interactive mode");
    println!("commands: add|sub|mul|div <a> <b>, history [n], stats, clear, quit");

    let log = open_log(config);
    let stdin = io::stdin();

    loop {
        print!(">>> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default().to_lowercase();

        match command.as_str() {
            "quit" | "exit" | "q" => break,
            "history" => {
                let limit = parts.next().and_then(|n| n.parse::<usize>().ok());
                print_history(&log.load().await, limit);
            }
            "stats" => {
                let stats = log.stats().await;
                println!(
                    "total: {} (add {}, sub {}, mul {}, div {})",
                    stats.total, stats.add, stats.sub, stats.mul, stats.div
                );
            }
            "clear" => {
                log.clear().await?;
                println!("History cleared.");
            }
            _ => {
                let Some(op) = Op::parse(&command) else {
                    println!("unknown command '{command}' — expected add, sub, mul, div, history, stats, clear, or quit");
                    continue;
                };
                let (Some(a_str), Some(b_str)) = (parts.next(), parts.next()) else {
                    println!("usage: {command} <a> <b>");
                    continue;
                };
                let (Ok(a), Ok(b)) = (a_str.parse::<f64>(), b_str.parse::<f64>()) else {
                    println!("'{a_str}' or '{b_str}' is not a number");
                    continue;
                };

                match op.apply(a, b) {
                    Ok(result) => {
                        println!("{} {} {} = {:.4}", a, op.symbol(), b, result);
                        log.append(HistoryEntry::now(op, a, b, result)).await?;
                    }
                    Err(e) => println!("error: {e}"),
                }
            }
        }
    }

    Ok(())
}
