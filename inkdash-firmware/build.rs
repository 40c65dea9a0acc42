//! Build script for inkdash-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates dashboard.toml and embeds it as postcard bytes
//! - Embeds the indexed font image from assets/

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use inkdash_core::config::{DashboardConfig, CONFIG_VERSION};

/// Largest glyph cache the firmware reserves RAM for
const MAX_CACHE_SIZE: u16 = 64;

/// Indexed font with no glyphs (magic, 16×16 cells, zero entries)
const EMPTY_FONT: [u8; 8] = [0x46, 0x55, 16, 0, 16, 0, 0, 0];

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    embed_config(&out_dir);
    embed_font(&out_dir);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse, validate and serialize dashboard.toml
fn embed_config(out_dir: &Path) {
    println!("cargo:rerun-if-changed=dashboard.toml");

    let config_path = Path::new("dashboard.toml");
    let config = if config_path.exists() {
        let content = match fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) => {
                panic!(
                    "\n\
                    ╔══════════════════════════════════════════════════════════════════╗\n\
                    ║  ERROR: Failed to read dashboard.toml                            ║\n\
                    ║                                                                  ║\n\
                    ║  Error: {:<56} ║\n\
                    ╚══════════════════════════════════════════════════════════════════╝\n",
                    e
                );
            }
        };

        match toml::from_str::<DashboardConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                panic!(
                    "\n\
                    ╔══════════════════════════════════════════════════════════════════╗\n\
                    ║  ERROR: Invalid dashboard.toml                                   ║\n\
                    ╠══════════════════════════════════════════════════════════════════╣\n\
                    {}\n\
                    ╚══════════════════════════════════════════════════════════════════╝\n",
                    format_error_lines(&e.to_string())
                );
            }
        }
    } else {
        println!("cargo:warning=dashboard.toml not found, embedding default configuration");
        DashboardConfig::default()
    };

    let errors = validate(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid dashboard configuration                          ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    let mut buf = [0u8; 256];
    let bytes = config
        .to_postcard(&mut buf)
        .expect("configuration exceeds 256 bytes");
    fs::write(out_dir.join("dashboard.bin"), bytes).unwrap();
}

/// Check values the firmware cannot work with
fn validate(config: &DashboardConfig) -> Vec<String> {
    let mut errors = Vec::new();
    let layout = &config.layout;

    if config.version != CONFIG_VERSION {
        errors.push(format!(
            "version must be {} (found {})",
            CONFIG_VERSION, config.version
        ));
    }
    if layout.margin as u32 + layout.max_width as u32 > layout.column_width as u32 {
        errors.push("[layout] margin + max_width exceeds column_width".to_string());
    }
    if 2 * layout.column_width as u32 > 800 {
        errors.push("[layout] two columns do not fit the 800 px panel".to_string());
    }
    if layout.title_scale == 0 {
        errors.push("[layout] title_scale must be at least 1".to_string());
    }
    if layout.content_bottom <= layout.content_top {
        errors.push("[layout] content_bottom must be below content_top".to_string());
    }
    if layout.status_y >= 480 {
        errors.push("[layout] status_y must be inside the 480 px panel".to_string());
    }
    if config.font.cache_size > MAX_CACHE_SIZE {
        errors.push(format!("[font] cache_size must be 0-{}", MAX_CACHE_SIZE));
    }
    if config.panel.busy_initial_ms == 0 {
        errors.push("[panel] busy_initial_ms must be positive".to_string());
    }
    if config.panel.busy_max_ms < config.panel.busy_initial_ms {
        errors.push("[panel] busy_max_ms must be >= busy_initial_ms".to_string());
    }
    if !(-12..=14).contains(&config.clock.utc_offset_hours) {
        errors.push("[clock] utc_offset_hours must be -12..14".to_string());
    }

    errors
}

/// Copy the font image into OUT_DIR, or an empty font if there is none
fn embed_font(out_dir: &Path) {
    println!("cargo:rerun-if-changed=assets/unified_font.bin");

    let font_path = Path::new("assets/unified_font.bin");
    let font = if font_path.exists() {
        fs::read(font_path).unwrap()
    } else {
        println!("cargo:warning=assets/unified_font.bin not found, embedding an empty font");
        EMPTY_FONT.to_vec()
    };
    fs::write(out_dir.join("font.bin"), font).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
