use bevy::prelude::*;

use bevy::window::WindowResolution;

use brawler::game::config::{KeyBindings, INITIAL_CONFIG_PATH};
use brawler::game::GamePlugin;

use bevy::log::LogPlugin;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_DIR: &str = "logs";
const LOG_PREFIX: &str = "brawler";
const KEPT_LOGS: usize = 25;

fn setup_file_logging() -> String {
    let log_dir = PathBuf::from(LOG_DIR);
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create logs directory: {}", e);
    }

    cleanup_old_logs(&log_dir, KEPT_LOGS);

    // One file per match, named by start time
    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));
    let log_file_path = log_dir.join(&log_filename);
    let log_path_str = log_file_path.to_string_lossy().to_string();

    // Create file appender with timestamped filename
    let file_appender = RollingFileAppender::new(
        Rotation::NEVER, // Don't rotate during a single run
        &log_dir,
        &log_filename
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false); // No ANSI colors in file

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    // Mode transitions are logged at debug; RUST_LOG=brawler=debug shows them
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            EnvFilter::new("wgpu=error,bevy_render=info,bevy_ecs=info,brawler=info")
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    log_path_str
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    if let Ok(entries) = fs::read_dir(log_dir) {
        let mut log_files: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|s| s.starts_with(LOG_PREFIX) && s.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Sort by modified time (oldest first)
        log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        // Delete oldest files if we exceed keep_count
        if log_files.len() > keep_count {
            for file in log_files.iter().take(log_files.len() - keep_count) {
                let _ = fs::remove_file(file.path());
            }
        }
    }
}

fn print_banner(log_file: &str) {
    let keys = KeyBindings::default();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Brawler                                                 ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    println!("║  Log file: {:<45} ║", log_file);
    println!("║  Physics:  {:<45} ║", INITIAL_CONFIG_PATH);
    println!("║  Move {:?}/{:?}, crouch {:?}, jump {:?}", keys.left, keys.right, keys.down, keys.up);
    println!("║  Double tap a side to dash (back dash to the left)");
    println!("╚══════════════════════════════════════════════════════════╝");
}

fn main() {
    let log_file = setup_file_logging();
    print_banner(&log_file);

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Brawler".into(),
                resolution: WindowResolution::new(1280, 720),
                resizable: true,
                ..default()
            }),
            ..default()
        }).build().disable::<LogPlugin>()) // Disable Bevy's default logging since we set up our own
        .add_plugins(GamePlugin)
        .run();
}
