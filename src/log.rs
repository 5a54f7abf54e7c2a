use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Formats every record as a PACE comment line.
pub fn build_pace_logger_for_level(level: LevelFilter) {
    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| writeln!(buf, "c {} - {}", record.level(), record.args()))
        .filter(None, level)
        .init();
}

pub fn build_pace_logger() {
    build_pace_logger_for_level(LevelFilter::Info);
}
