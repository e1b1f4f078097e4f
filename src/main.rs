//! Golf scorecard binary entrypoint wiring the terminal shell to the
//! stores.

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use dialoguer::{Input, Select, theme::ColorfulTheme};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use golf_scorecard::{
    config::AppConfig,
    dao::{ArchiveStore, FileStore, GameStateStore, KeyValueStore, MemoryStore},
    dto::GameSummary,
    error::ServiceError,
    services::{archive_service, game_service},
    state::EditMode,
    ui::{ConsoleShell, Notifier, render},
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let matches = Command::new("golf-scorecard")
        .about("Round-by-round score tracking with a local archive")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding the persisted records (overrides the config file)"),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .action(ArgAction::SetTrue)
                .help("Keep everything in memory; nothing is written to disk"),
        )
        .get_matches();

    let backend: Arc<dyn KeyValueStore> = if matches.get_flag("ephemeral") {
        Arc::new(MemoryStore::new())
    } else {
        let data_dir = matches
            .get_one::<String>("data-dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| AppConfig::load().data_dir);
        Arc::new(FileStore::new(data_dir))
    };

    let mut game = GameStateStore::open(backend.clone()).context("restoring the live game")?;
    let mut archive = ArchiveStore::open(backend).context("restoring the archive")?;
    let shell = ConsoleShell::new();
    let theme = ColorfulTheme::default();

    loop {
        println!("\n{}\n", render::score_table(game.sheet()));

        let wild_label = if game.sheet().wild_round_pending() {
            "Wild round: on (toggle off)"
        } else {
            "Wild round: off (toggle on)"
        };
        let editing_label = match game.mode() {
            EditMode::Viewing => "Enable editing",
            EditMode::Editing => "Disable editing",
        };
        let choices = [
            "Enter a score",
            "Add score",
            wild_label,
            "Rename a player",
            "Change player count",
            editing_label,
            "Edit a score",
            "Remove a round",
            "Save game",
            "Past games",
            "Export archive",
            "Import archive",
            "Quit",
        ];
        let Some(choice) = Select::with_theme(&theme)
            .with_prompt("Scorecard")
            .items(&choices)
            .default(0)
            .interact_opt()?
        else {
            continue;
        };

        let outcome = match choice {
            0 => enter_score(&mut game, &theme),
            1 => game_service::add_score(&mut game),
            2 => {
                let pending = game.sheet().wild_round_pending();
                game.set_wild_round(!pending);
                Ok(())
            }
            3 => rename_player(&mut game, &theme),
            4 => change_player_count(&mut game, &theme),
            5 => {
                game.toggle_editing();
                Ok(())
            }
            6 => edit_score(&mut game, &theme),
            7 => remove_round(&mut game, &theme),
            8 => game_service::save_game(&mut game, &mut archive, &shell).map(|saved| {
                if let Some(saved) = saved {
                    shell.notify(&format!("Saved `{}`.", saved.name));
                }
            }),
            9 => browse_archive(&mut archive, &shell, &theme),
            10 => archive_service::export_archive(&archive, &shell, &shell),
            11 => import_from_file(&mut archive, &shell, &theme),
            _ => break,
        };

        if let Err(err) = outcome {
            shell.error(&err.to_string());
        }
    }

    Ok(())
}

/// Pick a player by header; `None` when the prompt is cancelled.
fn select_player(game: &GameStateStore, theme: &ColorfulTheme) -> Option<usize> {
    let headers = game.sheet().headers();
    if headers.len() == 1 {
        return Some(0);
    }
    Select::with_theme(theme)
        .with_prompt("Which player?")
        .items(headers)
        .default(0)
        .interact_opt()
        .ok()
        .flatten()
}

fn enter_score(game: &mut GameStateStore, theme: &ColorfulTheme) -> Result<(), ServiceError> {
    let Some(player) = select_player(game, theme) else {
        return Ok(());
    };
    let Some(raw) = prompt_text(theme, "Score") else {
        return Ok(());
    };
    // Rejected text keeps the prior entry and produces no message.
    game.record_input(player, &raw)?;
    Ok(())
}

fn rename_player(game: &mut GameStateStore, theme: &ColorfulTheme) -> Result<(), ServiceError> {
    let Some(player) = select_player(game, theme) else {
        return Ok(());
    };
    let Some(name) = prompt_text(theme, "Player name") else {
        return Ok(());
    };
    game.set_header(player, &name)?;
    Ok(())
}

fn change_player_count(
    game: &mut GameStateStore,
    theme: &ColorfulTheme,
) -> Result<(), ServiceError> {
    let count = Input::<usize>::with_theme(theme)
        .with_prompt("Players")
        .default(game.sheet().player_count())
        .interact_text();
    if let Ok(count) = count {
        game.set_player_count(count)?;
    }
    Ok(())
}

fn edit_score(game: &mut GameStateStore, theme: &ColorfulTheme) -> Result<(), ServiceError> {
    let Some(player) = select_player(game, theme) else {
        return Ok(());
    };
    let Some(round) = prompt_round(game, theme) else {
        return Ok(());
    };
    let Some(raw) = prompt_text(theme, "New score") else {
        return Ok(());
    };
    game.edit_score(player, round, &raw)?;
    Ok(())
}

fn remove_round(game: &mut GameStateStore, theme: &ColorfulTheme) -> Result<(), ServiceError> {
    let Some(round) = prompt_round(game, theme) else {
        return Ok(());
    };
    game.remove_round(round)?;
    Ok(())
}

fn browse_archive(
    archive: &mut ArchiveStore,
    shell: &ConsoleShell,
    theme: &ColorfulTheme,
) -> Result<(), ServiceError> {
    if archive.is_empty() {
        shell.notify("No past games available.");
        return Ok(());
    }

    let games: Vec<_> = archive.list_by_date_desc().cloned().collect();
    let mut lines: Vec<String> = games
        .iter()
        .map(|game| render::summary_line(&GameSummary::from(game)))
        .collect();
    lines.push("Back".to_owned());

    let Ok(Some(choice)) = Select::with_theme(theme)
        .with_prompt("Past games")
        .items(&lines)
        .default(0)
        .interact_opt()
    else {
        return Ok(());
    };
    let Some(selected) = games.get(choice) else {
        return Ok(());
    };

    println!("\n{}\n", render::archived_table(selected));

    let Ok(Some(action)) = Select::with_theme(theme)
        .items(&["Back", "Delete this game"])
        .default(0)
        .interact_opt()
    else {
        return Ok(());
    };
    if action == 1 && archive_service::delete_game(archive, selected, shell)? {
        shell.notify("Game deleted.");
    }
    Ok(())
}

fn import_from_file(
    archive: &mut ArchiveStore,
    shell: &ConsoleShell,
    theme: &ColorfulTheme,
) -> Result<(), ServiceError> {
    let Some(path) = prompt_text(theme, "Path of the archive document") else {
        return Ok(());
    };
    let document = match fs::read_to_string(path.trim()) {
        Ok(document) => document,
        Err(err) => {
            shell.error(&format!("could not read `{}`: {err}", path.trim()));
            return Ok(());
        }
    };
    match archive_service::import_archive(archive, &document, shell) {
        // The user was already notified about a rejected document.
        Ok(_) | Err(ServiceError::ImportRejected(_)) => Ok(()),
        Err(err) => Err(err),
    }
}

/// Ask for a committed round, 1-based as displayed; `None` when cancelled.
fn prompt_round(game: &GameStateStore, theme: &ColorfulTheme) -> Option<usize> {
    let round = Input::<usize>::with_theme(theme)
        .with_prompt(format!("Round (1-{})", game.sheet().round_count()))
        .interact_text()
        .ok()?;
    round.checked_sub(1)
}

fn prompt_text(theme: &ColorfulTheme, prompt: &str) -> Option<String> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .ok()
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,golf_scorecard=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
