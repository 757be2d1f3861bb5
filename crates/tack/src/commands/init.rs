//! `tack init` -- create a board in the current directory.

use std::fs;

use anyhow::{Context, Result, bail};

use tack_config::config::CONFIG_FILE;
use tack_config::tack_dir::{db_path, ensure_tack_dir};
use tack_config::{TackConfig, load_config, save_config};
use tack_storage::SqliteAdapter;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

const GITIGNORE_CONTENT: &str = "# tack database files\ntack.db\ntack.db-journal\ntack.db-wal\ntack.db-shm\n";

/// Execute the `tack init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let target = ctx.init_target()?;
    let tack_dir = ensure_tack_dir(&target)
        .with_context(|| format!("failed to create board directory under {}", target.display()))?;
    let config_path = tack_dir.join(CONFIG_FILE);
    let db = db_path(&tack_dir);

    let existing = config_path.exists() || db.exists();
    if existing && !args.force {
        bail!(
            "Found an existing board in {}\n\n\
            Use --force to re-initialize (tasks are kept).",
            tack_dir.display()
        );
    }

    let mut config = if config_path.exists() {
        load_config(&tack_dir).context("failed to load existing config")?
    } else {
        TackConfig::default()
    };
    if let Some(prefix) = &args.prefix {
        config.id_prefix = prefix.trim_end_matches('-').to_string();
    }
    if let Some(project) = &args.project {
        config.project = project.clone();
    }
    config.validate()?;
    save_config(&tack_dir, &config)?;

    let gitignore = tack_dir.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, GITIGNORE_CONTENT)
            .with_context(|| format!("failed to create {}", gitignore.display()))?;
    }

    let adapter =
        SqliteAdapter::open(&db).with_context(|| format!("failed to create database: {}", db.display()))?;
    adapter.set_id_prefix(&config.id_prefix)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "dir": tack_dir.display().to_string(),
            "database": db.display().to_string(),
            "project": config.project,
            "id_prefix": config.id_prefix,
        }));
    } else if !ctx.quiet {
        println!("tack initialized in {}", tack_dir.display());
        println!("  Project:   {}", config.project);
        println!("  Task ids:  {}-1, {}-2, ...", config.id_prefix, config.id_prefix);
        println!();
        println!("Run `tack create \"My first task\"` to get started.");
    }
    Ok(())
}
