// Headless display - Prints one status line per state change

use crate::sequencer::format::{format_session_time, status_line};
use crate::sequencer::{CuePlayer, Sequencer};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Instant;

/// Run one session to completion, writing status lines to `out`
///
/// Returns the number of ticks delivered by the clock. With looping enabled
/// the session only ends when `out` fails.
pub fn run_headless<P, W>(sequencer: &mut Sequencer<P>, out: W) -> io::Result<u64>
where
    P: CuePlayer,
    W: Write + 'static,
{
    let out = Rc::new(RefCell::new(out));
    let write_error: Rc<RefCell<Option<io::Error>>> = Rc::new(RefCell::new(None));

    writeln!(
        out.borrow_mut(),
        "session time {}",
        format_session_time(sequencer.projection().total_session_ticks)
    )?;

    let id = {
        let out = Rc::clone(&out);
        let write_error = Rc::clone(&write_error);
        let mut last_line = String::new();
        sequencer.subscribe(move |projection| {
            let line = status_line(projection);
            if line == last_line || write_error.borrow().is_some() {
                return;
            }
            if let Err(e) = writeln!(out.borrow_mut(), "{}", line) {
                *write_error.borrow_mut() = Some(e);
            }
            last_line = line;
        })
    };

    sequencer.start();
    let mut ticks = 0u64;
    while sequencer.is_running() {
        if write_error.borrow().is_some() {
            sequencer.stop();
            break;
        }
        if let Some(wait) = sequencer.next_tick_in(Instant::now()) {
            std::thread::sleep(wait);
        }
        ticks += sequencer.pump(Instant::now()) as u64;
    }

    sequencer.unsubscribe(id);
    tracing::info!(ticks, "Headless session ended");

    match write_error.borrow_mut().take() {
        Some(e) => Err(e),
        None => Ok(ticks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Configuration, PhaseDurations};
    use crate::sequencer::TickClock;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Writer whose contents stay readable after it is moved into the run
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn short_program() -> Configuration {
        Configuration {
            timing: PhaseDurations::uniform(1),
            repeat_count_per_step: 1,
            audio_enabled: false,
            ..Configuration::default()
        }
    }

    #[test]
    fn test_headless_runs_program_to_completion() {
        let mut sequencer = Sequencer::new(short_program())
            .with_clock(TickClock::new(Duration::from_millis(1)));
        let buffer = SharedBuffer::default();

        let ticks = run_headless(&mut sequencer, buffer.clone()).unwrap();

        assert!(!sequencer.is_running());
        assert_eq!(sequencer.subscriber_count(), 0);
        assert!(ticks > 0);

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("session time 0.6 minutes"));
        assert!(text.contains("sequence 1/9"));
        assert!(text.contains("sequence 9/9"));
        assert!(text.trim_end().ends_with("idle - session time 0.6 minutes"));
    }

    #[test]
    fn test_headless_reports_write_failure() {
        let mut sequencer = Sequencer::new(short_program());
        let result = run_headless(&mut sequencer, FailingWriter);

        assert!(result.is_err());
        assert!(!sequencer.is_running());
    }
}
