use index_recreate::ports::report::{Level, Reporter};

/// Prints the narration on the standard output, warnings and errors on the
/// standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Line | Level::Info => println!("{}", message),
            Level::Warn => eprintln!("[warning] {}", message),
            Level::Error => eprintln!("[error] {}", message),
        }
    }
}
