use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.owner.as_deref(), cli.test)?;
    let db_path = cfg.database_path();

    println!("⚙️  Initializing timekeeper…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_path.display());

    let pool = DbPool::open_initialized(&db_path.to_string_lossy(), cfg.store_timeout())?;

    println!("✅ Database initialized at {}", db_path.display());

    // non-blocking
    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        "",
        &format!("Database initialized at {}", db_path.display()),
    ) {
        eprintln!("⚠️ Failed to write internal log: {}", e);
    }

    println!("🎉 timekeeper initialization completed!");
    Ok(())
}
