//! Generate static files

use anyhow::Result;
use std::time::{Duration, Instant};

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::Folio;

/// Load content and generate the static site
pub fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();

    let registry = ContentLoader::new(folio).load()?;
    tracing::info!(
        "Loaded {} posts and {} pages",
        registry.posts.len(),
        registry.pages.len()
    );

    let written = Generator::new(folio)?.generate(&registry)?;

    tracing::info!(
        "Generated {} files in {:.2}s",
        written,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(folio: &Folio) -> Result<()> {
    let folio = folio.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&folio)).await?
}

fn watch_blocking(folio: &Folio) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(&folio.source_dir, RecursiveMode::Recursive)?;

    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    for result in rx {
        match result {
            Ok(events) if events.iter().any(|e| is_relevant(&e.path)) => {
                tracing::info!("File changed, regenerating...");
                if let Err(e) = reload(folio).and_then(|f| run(&f)) {
                    tracing::error!("Generation failed: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Re-read the configuration so edits to `_config.yml` take effect
pub(crate) fn reload(folio: &Folio) -> Result<Folio> {
    Folio::new(&folio.base_dir)
}

/// Ignore editor and VCS noise
pub(crate) fn is_relevant(path: &std::path::Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}
