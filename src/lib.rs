pub mod api_server;
pub mod bot;
pub mod config;
pub mod day;
pub mod error;
pub mod time;

use env_logger::Env;

/// Initialize logging with the timestamped format, `RUST_LOG` taking precedence
/// over `default_level`.
pub fn init_logger(default_level: &str) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use error::{FallbackError, ShaonError};
pub use time::{extract_best_time, extract_times_all, ClockTime, Extraction, TimeExtractor};
