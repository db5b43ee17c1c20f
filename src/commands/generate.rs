//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::CONFIG_FILE;
use crate::content::loader::ContentLoader;
use crate::content::{LinkData, PostMetaData};
use crate::generator::Generator;
use crate::templates::TeraComponentRenderer;
use crate::Site;

/// Generate the whole site once
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let components = TeraComponentRenderer::new();
    let generator = Generator::new(site, &components)?;
    generator.clear_outputs()?;

    let loader = ContentLoader::new(site, &components);
    let posts = loader.load_posts()?;
    let links: Vec<LinkData> = posts.iter().map(PostMetaData::link).collect();
    let pages = loader.load_pages(&links)?;
    tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

    let summary = generator.generate(&posts, &pages)?;
    if summary.skipped > 0 {
        tracing::info!("Skipped {} documents", summary.skipped);
    }
    tracing::info!(
        "Generated {} pages, {} posts and {} components in {:.2}s",
        summary.pages,
        summary.posts,
        summary.components,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Watch content, templates and settings, regenerating after each change
///
/// A regeneration in progress always finishes; Ctrl+C is only honored
/// between runs.
pub async fn watch(site: &Site) -> Result<()> {
    // One pending signal is enough: changes during a run coalesce into it
    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                if !events.is_empty() {
                    let _ = tx.try_send(());
                }
            }
        },
    )?;

    let mut watched = watch_targets(site);
    for (path, mode) in &watched {
        debouncer.watcher().watch(path, *mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut current = site.clone();
    loop {
        tokio::select! {
            changed = rx.recv() => {
                if changed.is_none() {
                    break;
                }
                tracing::info!("Change detected, regenerating...");
                let base_dir = current.base_dir.clone();
                let fallback = current.clone();
                let reloaded = match tokio::task::spawn_blocking(move || regenerate(base_dir, fallback)).await {
                    Ok((reloaded, result)) => {
                        if let Err(e) = result {
                            tracing::error!("Generation failed: {}", e);
                        }
                        reloaded
                    }
                    Err(e) => {
                        tracing::error!("Generation task failed: {}", e);
                        continue;
                    }
                };

                // The settings may have moved the content or template folders
                let targets = watch_targets(&reloaded);
                for (path, _) in watched.iter().filter(|(p, _)| !targets.iter().any(|(t, _)| t == p)) {
                    if let Err(e) = debouncer.watcher().unwatch(path) {
                        tracing::debug!("Could not unwatch {:?}: {}", path, e);
                    }
                }
                for (path, mode) in targets.iter().filter(|(t, _)| !watched.iter().any(|(p, _)| p == t)) {
                    match debouncer.watcher().watch(path, *mode) {
                        Ok(()) => tracing::debug!("Watching: {:?}", path),
                        Err(e) => tracing::warn!("Could not watch {:?}: {}", path, e),
                    }
                }
                watched = targets;
                current = reloaded;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

/// Folders and files whose changes trigger a regeneration
fn watch_targets(site: &Site) -> Vec<(PathBuf, RecursiveMode)> {
    let mut targets: Vec<(PathBuf, RecursiveMode)> =
        [&site.posts_dir, &site.pages_dir, &site.templates_dir]
            .into_iter()
            .filter(|dir| dir.exists())
            .map(|dir| (dir.clone(), RecursiveMode::Recursive))
            .collect();

    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        targets.push((config_path, RecursiveMode::NonRecursive));
    }
    targets
}

/// Re-read the settings (they may be what changed) and generate
///
/// Returns the site that was generated, the previous one if the settings
/// could not be reloaded.
fn regenerate(base_dir: PathBuf, fallback: Site) -> (Site, Result<()>) {
    let site = match Site::new(&base_dir) {
        Ok(site) => site,
        Err(e) => {
            tracing::warn!("Could not reload settings, keeping the previous ones: {}", e);
            fallback
        }
    };
    let result = run(&site);
    (site, result)
}
