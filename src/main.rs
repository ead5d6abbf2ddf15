use clap::Parser;
use partnerhub::cli::ui;
use partnerhub::cli::{
    run_add, run_config, run_dashboard, run_delete, run_duplicate, run_edit, run_export,
    run_history, run_import, run_insights, run_list, run_lookup, run_register, run_show, Cli,
    Commands,
};
use partnerhub::config::Config;
use partnerhub::db::Database;
use partnerhub::store::{Repository, StoreError};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        match e.downcast_ref::<StoreError>() {
            Some(store_err) => ui::print_store_error(store_err),
            None => ui::error(&format!("{:#}", e)),
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db = Database::open()?;
    let config = Config::load(&db)?;

    // Settings and lookups never touch the partner collection.
    match cli.command {
        Some(Commands::Config(ref args)) => return run_config(&db, args),
        Some(Commands::Lookup(ref args)) => return run_lookup(args, &config),
        _ => {}
    }

    let mut repo = Repository::open(&db)?;
    match cli.command {
        None | Some(Commands::Dashboard) => run_dashboard(&repo)?,
        Some(Commands::List(args)) => run_list(&repo, &args)?,
        Some(Commands::Show(args)) => run_show(&repo, &args.identifier)?,
        Some(Commands::Add(args)) => run_add(&mut repo, &args, &config)?,
        Some(Commands::Register(args)) => run_register(&mut repo, &args, &config)?,
        Some(Commands::Edit(args)) => run_edit(&mut repo, &args)?,
        Some(Commands::Duplicate(args)) => run_duplicate(&mut repo, &args.identifier)?,
        Some(Commands::Delete(args)) => run_delete(&mut repo, &args.identifier, args.force)?,
        Some(Commands::History(args)) => run_history(&mut repo, &args)?,
        Some(Commands::Export(args)) => run_export(&repo, &args)?,
        Some(Commands::Import(args)) => run_import(&mut repo, &args)?,
        Some(Commands::Insights) => run_insights(&repo, &config)?,
        Some(Commands::Config(_)) | Some(Commands::Lookup(_)) => {}
    }
    Ok(())
}
