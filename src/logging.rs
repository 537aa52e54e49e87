use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use time::macros::format_description;

/// Log to stderr and to `logs/<stem>_<timestamp>.logs`; returns the file path.
pub fn init(stem: &str) -> anyhow::Result<PathBuf> {
    init_in(Path::new("logs"), stem)
}

pub fn init_in(log_dir: &Path, stem: &str) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let ts = Local::now().format("%Y%m%d-%H%M%S");
    let log_path = log_dir.join(format!("{stem}_{ts}.logs"));
    let log_file = fs::File::create(&log_path)?;

    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, config, log_file),
    ])?;

    Ok(log_path)
}

/// File stem of an output path, used to name the log file
pub fn stem_of(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}
