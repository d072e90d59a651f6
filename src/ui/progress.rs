use indicatif::ProgressBar;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;

/// Spinner currently drawing on the terminal, if any
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active() -> Option<ProgressBar> {
    ACTIVE.lock().ok().and_then(|guard| guard.clone())
}

fn set_active(pb: Option<ProgressBar>) {
    if let Ok(mut guard) = ACTIVE.lock() {
        *guard = pb;
    }
}

/// Spinner shown while a blocking call runs; hidden when stdout is not a terminal
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if console::Term::stdout().is_term() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        Self::start(pb, message)
    }

    fn start(pb: ProgressBar, message: &str) -> Self {
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        set_active(Some(pb.clone()));
        Self { pb }
    }

    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
        set_active(None);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.pb.is_finished() {
            self.finish_and_clear();
        }
    }
}

/// stderr writer for the tracing subscriber.
///
/// Log lines emitted while a [`Spinner`] is running suspend it, so the
/// spinner line is cleared first and redrawn after the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWriter;

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active() {
            Some(pb) => pb.suspend(|| io::stderr().write(buf)),
            None => io::stderr().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
