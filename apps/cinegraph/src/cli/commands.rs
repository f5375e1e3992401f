//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use cinegraph_core::{Catalog, CatalogError};
use std::path::{Path, PathBuf};

// =============================================================================
// CATALOG LOADING
// =============================================================================

/// Open the catalogue with the requested backend.
///
/// - `redb`: opens or creates the database at `db_path`
/// - `memory`: a fresh volatile catalogue (mostly useful for demos and tests)
fn load_or_create_catalog(db_path: &Path, backend: &str) -> Result<Catalog, CatalogError> {
    match backend {
        "redb" => Catalog::with_redb(db_path),
        "memory" => Ok(Catalog::new()),
        other => Err(CatalogError::Io(format!(
            "Unknown backend '{other}' (expected 'redb' or 'memory')"
        ))),
    }
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    db_path: &PathBuf,
    backend: &str,
    host: &str,
    port: u16,
) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;

    println!("Cinegraph Catalogue Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", host);
    println!("  Port:     {}", port);
    println!("  Backend:  {}", backend);
    println!("  Database: {:?}", db_path);
    println!();
    println!("Endpoints:");
    println!("  POST /users                - Register a user");
    println!("  PUT  /users                - Update a user");
    println!("  GET  /users                - List users");
    println!("  PUT  /users/{{id}}/friends/{{friendId}} - Send friend request");
    println!("  POST /films                - Catalogue a film");
    println!("  PUT  /films/{{id}}/like/{{userId}}     - Like a film");
    println!("  GET  /films/popular        - Most-liked films");
    println!("  GET  /genres, /mpa         - Reference data");
    println!("  GET  /health, /status      - Diagnostics");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, catalog).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show catalogue status.
pub fn cmd_status(db_path: &PathBuf, backend: &str, json_mode: bool) -> Result<(), CatalogError> {
    let catalog = load_or_create_catalog(db_path, backend)?;
    let user_count = catalog.user_count()?;
    let film_count = catalog.film_count()?;

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "backend": backend,
            "persistent": catalog.is_persistent(),
            "user_count": user_count,
            "film_count": film_count,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Cinegraph Catalogue Status");
    println!("==========================");
    println!("Database: {:?}", db_path);
    println!("Backend:  {}", backend);
    println!();
    println!("Users: {}", user_count);
    println!("Films: {}", film_count);

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty database.
pub fn cmd_init(db_path: &PathBuf, backend: &str, force: bool) -> Result<(), CatalogError> {
    if backend != "redb" {
        return Err(CatalogError::Io(
            "init only applies to the 'redb' backend".to_string(),
        ));
    }

    if db_path.exists() {
        if !force {
            return Err(CatalogError::Io(format!(
                "Database {:?} already exists (use --force to overwrite)",
                db_path
            )));
        }
        std::fs::remove_file(db_path).map_err(|e| CatalogError::Io(e.to_string()))?;
        tracing::info!("Removed existing database at {:?}", db_path);
    }

    let catalog = Catalog::with_redb(db_path)?;
    println!("Initialized empty catalogue at {:?}", db_path);
    println!(
        "Reference data: {} genres, {} MPA ratings",
        catalog.genres().len(),
        catalog.mpa_ratings().len()
    );

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn unknown_backend_rejected() {
        let result = load_or_create_catalog(Path::new("x.db"), "sqlite");
        assert!(result.is_err());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("catalog.db");

        cmd_init(&db_path, "redb", false).expect("first init");
        let result = cmd_init(&db_path, "redb", false);
        assert!(result.is_err());

        cmd_init(&db_path, "redb", true).expect("forced init");
    }

    #[test]
    fn status_works_on_fresh_database() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("catalog.db");
        cmd_status(&db_path, "redb", true).expect("status");
    }
}
