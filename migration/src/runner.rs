use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

/// Applies every registered migration in order, printing per-step progress.
/// Exits the process on the first failure so a half-migrated database is
/// obvious from the shell.
pub async fn run_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");
    let manager = SchemaManager::new(&db);

    let migrations = <crate::Migrator as MigratorTrait>::migrations();
    let total = migrations.len();
    println!("Applying {total} migrations");

    let started = Instant::now();
    for (idx, migration) in migrations.into_iter().enumerate() {
        print!("  [{}/{}] {} ... ", idx + 1, total, migration.name().bold());
        io::stdout().flush().ok();

        let outcome = std::panic::AssertUnwindSafe(migration.up(&manager))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => println!("{}", "ok".green()),
            Ok(Err(e)) => {
                println!("{} {e}", "failed".red());
                std::process::exit(1);
            }
            Err(_) => {
                println!("{}", "panicked".red());
                std::process::exit(1);
            }
        }
    }

    println!("Done in {:.2?}", started.elapsed());
}
