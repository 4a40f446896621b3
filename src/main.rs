//! Shopping List Command Line Front-end

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use shopping_list::{
    ActionOutcome, AppConfig, AppContext, DomainError, DomainResult, ItemDraft, ListItems, Prompter,
    ShoppingList,
};

#[derive(Parser, Debug)]
#[command(name = "shopping-list", version, about = "Shared shopping lists")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print this run's log lines when done
    #[arg(long, global = true)]
    show_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the effective configuration to the config file
    InitConfig,
    /// Show active and archived lists
    Lists,
    /// Create a list owned by the current user
    New { title: String },
    Rename { list: String },
    Archive { list: String },
    Unarchive { list: String },
    Delete { list: String },
    /// Leave a list shared with you
    Leave { list: String },
    Invite { list: String },
    RemoveMember { list: String, member: String },
    /// Show the items of a list
    Items {
        list: String,
        /// Include completed items
        #[arg(long)]
        all: bool,
    },
    AddItem {
        list: String,
        name: String,
        #[arg(long)]
        qty: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    Toggle { list: String, item: String },
    DeleteItem { list: String, item: String },
    ClearCompleted { list: String },
    CheckAll { list: String },
    UncheckAll { list: String },
}

/// Asks on stderr, reads answers from stdin
struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line(prompt: &str) -> Option<String> {
        eprint!("{} ", prompt);
        io::stderr().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn ask_text(&self, message: &str, default: Option<&str>) -> Option<String> {
        let prompt = match default {
            Some(default) => format!("{} [{}]", message, default),
            None => message.to_string(),
        };
        let answer = Self::read_line(&prompt)?;
        match default {
            Some(default) if answer.is_empty() => Some(default.to_string()),
            _ => Some(answer),
        }
    }

    fn confirm(&self, message: &str) -> bool {
        Self::read_line(&format!("{} [y/N]", message))
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

fn print_list(list: &ShoppingList, user: &str) {
    let shared = if list.is_owned_by(user) {
        String::new()
    } else {
        format!(" (shared by {})", list.owner)
    };
    println!(
        "{}  {}{}  [{}/{}]",
        list.id,
        list.title,
        shared,
        list.done_count(),
        list.items.len()
    );
}

fn print_items(view: &ListItems, show_completed: bool) {
    for item in view.visible(show_completed) {
        let mark = if item.is_done { "x" } else { " " };
        let mut line = format!("[{}] {}  {}", mark, item.id, item.name);
        if let Some(quantity) = item.quantity {
            line.push_str(&format!("  {}", quantity));
            if let Some(unit) = &item.unit {
                line.push_str(&format!(" {}", unit));
            }
        }
        if let Some(note) = &item.note {
            line.push_str(&format!("  ({})", note));
        }
        println!("{}", line);
    }
    println!("{} of {} done", view.done_count(), view.total_count());
}

async fn open_items(ctx: &AppContext, list_id: &str) -> DomainResult<ListItems> {
    ctx.items(list_id)
        .await
        .ok_or_else(|| DomainError::NotFound(format!("list {}", list_id)))
}

fn report(outcome: ActionOutcome) {
    if outcome == ActionOutcome::Abandoned {
        println!("Nothing changed");
    }
}

async fn run(ctx: &AppContext, command: Command) -> DomainResult<()> {
    let actions = &ctx.actions;
    let user = ctx.lists.current_user().to_string();

    match command {
        // Handled before the context is built
        Command::InitConfig => {}
        Command::Lists => {
            for list in ctx.lists.active().await {
                print_list(&list, &user);
            }
            let archived = ctx.lists.archived().await;
            if !archived.is_empty() {
                println!("Archived:");
                for list in archived {
                    print_list(&list, &user);
                }
            }
        }
        Command::New { title } => report(actions.create(&title).await?),
        Command::Rename { list } => report(actions.rename(&list).await?),
        Command::Archive { list } => report(actions.archive(&list).await?),
        Command::Unarchive { list } => report(actions.unarchive(&list).await?),
        Command::Delete { list } => report(actions.delete(&list).await?),
        Command::Leave { list } => report(actions.leave(&list).await?),
        Command::Invite { list } => report(actions.invite(&list).await?),
        Command::RemoveMember { list, member } => {
            report(actions.remove_member_click(&list, &member).await?)
        }
        Command::Items { list, all } => {
            let view = open_items(ctx, &list).await?;
            print_items(&view, all);
        }
        Command::AddItem {
            list,
            name,
            qty,
            unit,
            note,
        } => {
            let mut view = open_items(ctx, &list).await?;
            let mut draft = ItemDraft::new(name);
            if let Some(qty) = qty {
                draft = draft.with_quantity(qty);
            }
            if let Some(unit) = unit {
                draft = draft.with_unit(unit);
            }
            if let Some(note) = note {
                draft = draft.with_note(note);
            }
            match view.add_item(draft).await? {
                Some(item) => println!("Added {}", item.id),
                None => println!("Item name is required"),
            }
        }
        Command::Toggle { list, item } => open_items(ctx, &list).await?.toggle_done(&item).await?,
        Command::DeleteItem { list, item } => open_items(ctx, &list).await?.delete_item(&item).await?,
        Command::ClearCompleted { list } => open_items(ctx, &list).await?.clear_completed().await?,
        Command::CheckAll { list } => open_items(ctx, &list).await?.check_all().await?,
        Command::UncheckAll { list } => open_items(ctx, &list).await?.uncheck_all().await?,
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> DomainResult<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    Ok(config.from_env())
}

fn init_config(path: Option<&Path>, config: &AppConfig) -> DomainResult<()> {
    let path = path.ok_or_else(|| DomainError::Config("no config directory".to_string()))?;
    config.save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn flush_notices(ctx: &AppContext) {
    for notice in ctx.notifications.drain() {
        eprintln!("! {}", notice);
    }
}

fn finish(result: DomainResult<()>, show_log: bool) -> ExitCode {
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = rolling_logger::error(&format!("Command failed: {}", e));
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    };
    if show_log {
        for line in rolling_logger::recent_lines() {
            eprintln!("{}", line);
        }
    }
    code
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = cli.config.clone().or_else(AppConfig::default_path);

    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = rolling_logger::init_logger(config.log_dir(), "shopping-list") {
        eprintln!("Failed to init logger: {}", e);
    }
    let _ = rolling_logger::info(&format!("Starting as {}", config.current_user));

    if matches!(cli.command, Command::InitConfig) {
        return finish(init_config(config_path.as_deref(), &config), cli.show_log);
    }

    let ctx = match AppContext::new(&config, Arc::new(TerminalPrompter)) {
        Ok(ctx) => ctx,
        Err(e) => return finish(Err(e), cli.show_log),
    };

    // The mirror still serves reads when the store is unreachable
    if let Err(e) = ctx.lists.load().await {
        eprintln!("Failed to load lists: {}", e);
    }

    let result = run(&ctx, cli.command).await;
    flush_notices(&ctx);
    finish(result, cli.show_log)
}
