//! Human-readable progress lines.

/// Sink for the per-command lines the dispatcher emits.
pub trait Report {
    /// A command (or interface) succeeded.
    fn success(&mut self, line: &str);

    /// A command (or interface) failed.
    fn failure(&mut self, line: &str);

    /// Informational line, such as the mode being configured.
    fn notice(&mut self, line: &str) {
        self.success(line);
    }
}

impl<R: Report + ?Sized> Report for &mut R {
    fn success(&mut self, line: &str) {
        (**self).success(line)
    }

    fn failure(&mut self, line: &str) {
        (**self).failure(line)
    }

    fn notice(&mut self, line: &str) {
        (**self).notice(line)
    }
}

/// Prints successes to stdout and failures to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl Report for ConsoleReporter {
    fn success(&mut self, line: &str) {
        println!("{}", line);
    }

    fn failure(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}
