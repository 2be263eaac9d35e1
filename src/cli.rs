use std::cmp;
use std::error::Error;

use atty::Stream;
use clap::{Parser, Subcommand};
use doa_rs::clipboard::{Clipboard, SystemClipboard};
use doa_rs::{CATEGORY_ALL, Catalog, Dua};
use serde_json::json;
use termimad::{FmtText, MadSkin, terminal_size};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "doa-rs", about = "Explore the 40 Doa Pilihan collection", version)]
pub struct Cli {
    /// Emit JSON instead of human-readable tables.
    #[arg(long, global = true)]
    json: bool,

    /// Log debug detail to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List duas, optionally restricted to one category.
    List {
        /// Category to restrict to; omit for all categories.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Search duas by substring across Arabic, transliteration, and translation.
    Search {
        /// Substring to match; Arabic matches verbatim, Latin fields fold case.
        pattern: String,
        /// Category to restrict to; omit for all categories.
        #[arg(short, long)]
        category: Option<String>,
        /// Maximum number of matches to return.
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show the full entry for a dua, including word-by-word glosses.
    Show {
        /// ID of the dua to display.
        id: u32,
    },
    /// List categories with their record counts.
    Categories,
    /// Copy a dua (Arabic, transliteration, translation) to the system clipboard.
    Copy {
        /// ID of the dua to copy.
        id: u32,
    },
}

pub fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::List { category } => handle_list(category, cli.json),
        Command::Search {
            pattern,
            category,
            limit,
        } => handle_search(pattern, category, limit, cli.json),
        Command::Show { id } => handle_show(id, cli.json),
        Command::Categories => handle_categories(cli.json),
        Command::Copy { id } => handle_copy(id, cli.json),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "doa_rs=debug" } else { "doa_rs=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_list(category: Option<String>, as_json: bool) -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::bundled();
    let category = resolve_category(catalog, category)?;
    let rows = catalog.filter("", &category);

    if as_json {
        let payload = json!({
            "category": category,
            "total": catalog.len(),
            "results": rows.iter().map(|dua| dua_summary_json(dua)).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print_dua_table(&rows, &format!("No duas in category \"{category}\"."));
        if !rows.is_empty() {
            println!("\nShowing {} of {} duas.", rows.len(), catalog.len());
        }
    }
    Ok(())
}

fn handle_search(
    pattern: String,
    category: Option<String>,
    limit: usize,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    if pattern.trim().is_empty() {
        return Err("Search pattern cannot be empty".into());
    }
    let catalog = Catalog::bundled();
    let category = resolve_category(catalog, category)?;
    let limit = cmp::max(1, limit);
    let mut rows = catalog.filter(&pattern, &category);
    rows.truncate(limit);

    let suggestions = if rows.is_empty() {
        catalog.suggest(&pattern, 3)
    } else {
        Vec::new()
    };

    if as_json {
        let payload = json!({
            "pattern": pattern,
            "category": category,
            "limit": limit,
            "results": rows.iter().map(|dua| dua_summary_json(dua)).collect::<Vec<_>>(),
            "suggestions": suggestions.iter().map(|(dua, score)| {
                json!({"id": dua.id, "transliteration": dua.transliteration, "score": score})
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if rows.is_empty() {
        println!("No duas matched \"{pattern}\".");
        if !suggestions.is_empty() {
            println!("Did you mean:");
            for (dua, score) in &suggestions {
                println!("  {} (#{}, {:.0}% match)", dua.transliteration, dua.id, score);
            }
        }
    } else {
        println!("Matches for \"{pattern}\":");
        print_dua_table(&rows, "");
    }
    Ok(())
}

fn handle_show(id: u32, as_json: bool) -> Result<(), Box<dyn Error>> {
    let dua = Catalog::bundled()
        .by_id(id)
        .ok_or_else(|| format!("No dua found with ID {id}"))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&dua_to_json(dua))?);
    } else {
        print_dua(dua);
    }
    Ok(())
}

fn handle_categories(as_json: bool) -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::bundled();
    let counts: Vec<(&str, usize)> = catalog
        .categories()
        .iter()
        .map(|category| {
            let count = if category == CATEGORY_ALL {
                catalog.len()
            } else {
                catalog
                    .duas()
                    .iter()
                    .filter(|dua| &dua.category == category)
                    .count()
            };
            (category.as_str(), count)
        })
        .collect();

    if as_json {
        let payload: Vec<_> = counts
            .iter()
            .map(|(category, count)| json!({"category": category, "duas": count}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let width = counts
            .iter()
            .map(|(category, _)| category.chars().count())
            .max()
            .unwrap_or(8)
            .max("CATEGORY".len());
        println!("{:<width$}  {}", "CATEGORY", "DUAS", width = width);
        println!("{:-<width$}  {}", "", "----", width = width);
        for (category, count) in &counts {
            println!("{:<width$}  {}", category, count, width = width);
        }
    }
    Ok(())
}

fn handle_copy(id: u32, as_json: bool) -> Result<(), Box<dyn Error>> {
    let dua = Catalog::bundled()
        .by_id(id)
        .ok_or_else(|| format!("No dua found with ID {id}"))?;
    let text = dua.copy_text();

    let mut clipboard = SystemClipboard::new();
    match clipboard.write(&text) {
        Ok(()) => {
            if as_json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({"id": id, "copied": true}))?
                );
            } else {
                println!("Copied dua {id} to the clipboard.");
            }
        }
        Err(err) => {
            // The write is best-effort; fall back to printing the payload so it
            // can still be selected by hand.
            eprintln!("warning: clipboard write failed ({err})");
            if as_json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(
                        &json!({"id": id, "copied": false, "text": text})
                    )?
                );
            } else {
                println!("{text}");
            }
        }
    }
    Ok(())
}

fn resolve_category(
    catalog: &Catalog,
    category: Option<String>,
) -> Result<String, Box<dyn Error>> {
    match category {
        None => Ok(CATEGORY_ALL.to_string()),
        Some(category) => {
            if catalog.is_known_category(&category) {
                Ok(category)
            } else {
                Err(format!(
                    "Unknown category {:?}. Known categories: {}",
                    category,
                    catalog.categories().join(", ")
                )
                .into())
            }
        }
    }
}

fn print_dua_table(rows: &[&Dua], empty_message: &str) {
    if rows.is_empty() {
        if !empty_message.is_empty() {
            println!("{empty_message}");
        }
        return;
    }
    let category_width = rows
        .iter()
        .map(|dua| dua.category.chars().count())
        .max()
        .unwrap_or(8)
        .max("CATEGORY".len());
    let source_width = rows
        .iter()
        .map(|dua| dua.source.chars().count())
        .max()
        .unwrap_or(6)
        .max("SOURCE".len());
    println!(
        "{:>3}  {:<category_width$}  {:<source_width$}  {}",
        "ID", "CATEGORY", "SOURCE", "TRANSLITERATION"
    );
    println!(
        "{:->3}  {:-<category_width$}  {:-<source_width$}  {}",
        "", "", "", "---------------"
    );
    for dua in rows {
        println!(
            "{:>3}  {:<category_width$}  {:<source_width$}  {}",
            dua.id, dua.category, dua.source, dua.transliteration
        );
    }
}

fn print_dua(dua: &Dua) {
    println!("Doa {} [{}] ({})", dua.id, dua.category, dua.source);
    println!("\n{}", dua.arabic);
    render_markdown_block("Transliterasi", &dua.transliteration);
    render_markdown_block("Maksud", &dua.translation);

    if dua.has_glosses() {
        let fragment_width = dua
            .word_by_word
            .iter()
            .map(|gloss| gloss.arabic.chars().count())
            .max()
            .unwrap_or(8)
            .max("FRAGMENT".len());
        println!("\nWord by word:");
        println!("{:<fragment_width$}  {}", "FRAGMENT", "MEANING");
        println!("{:-<fragment_width$}  {}", "", "-------");
        for gloss in &dua.word_by_word {
            println!("{:<fragment_width$}  {}", gloss.arabic, gloss.meaning);
        }
    }
}

fn dua_summary_json(dua: &Dua) -> serde_json::Value {
    json!({
        "id": dua.id,
        "category": dua.category,
        "source": dua.source,
        "transliteration": dua.transliteration,
    })
}

fn dua_to_json(dua: &Dua) -> serde_json::Value {
    json!({
        "id": dua.id,
        "arabic": dua.arabic,
        "transliteration": dua.transliteration,
        "translation": dua.translation,
        "category": dua.category,
        "source": dua.source,
        "word_by_word": dua.word_by_word.iter().map(|gloss| {
            json!({"arabic": gloss.arabic, "meaning": gloss.meaning})
        }).collect::<Vec<_>>(),
    })
}

fn stdout_is_tty() -> bool {
    atty::is(Stream::Stdout)
}

fn markdown_width() -> usize {
    let (width, _) = terminal_size();
    width.max(60) as usize
}

fn render_markdown_block(title: &str, body: &str) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return;
    }
    println!("\n{title}:");
    if stdout_is_tty() {
        let skin = MadSkin::default();
        let formatted = FmtText::from(&skin, trimmed, Some(markdown_width()));
        println!("{formatted}");
    } else {
        println!("{trimmed}");
    }
}
