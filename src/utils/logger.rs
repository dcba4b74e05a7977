use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: SimpleLogger = SimpleLogger;

/// Writes every enabled record to stderr, tagged with its origin.
struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let target = if !record.target().is_empty() {
            record.target()
        } else {
            record.module_path().unwrap_or_default()
        };
        let line = record.line().unwrap_or(0);
        let args = record.args();

        match record.level() {
            Level::Error => eprintln!("Error (in {}:{}): {}", target, line, args),
            Level::Warn => eprintln!("Warning (in {}:{}): {}", target, line, args),
            Level::Info => eprintln!("Info (in {}:{}): {}", target, line, args),
            Level::Debug => eprintln!("Debug (in {}:{}): {}", target, line, args),
            Level::Trace => eprintln!("Trace (in {}:{}): {}", target, line, args),
        }
    }

    fn flush(&self) {}
}

/// Installs the stderr logger; later calls only change the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

#[test]
fn test_init_sets_level() {
    init(LevelFilter::Debug);
    assert_eq!(log::max_level(), LevelFilter::Debug);

    init(LevelFilter::Error);
    assert_eq!(log::max_level(), LevelFilter::Error);
    assert!(!LOGGER.enabled(&Metadata::builder().level(Level::Info).build()));
}
