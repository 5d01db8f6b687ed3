//! Tracing setup.
//!
//! In the browser every formatted event goes to the devtools console at the
//! matching level (`console.error` / `warn` / `info` / `log`). Native builds
//! (tests) write to stderr. No timestamps: `SystemTime` panics on wasm32.

use tracing::Level;

/// Install the global subscriber showing events up to `max_level`. Later
/// calls are no-ops.
pub fn init(max_level: Level) {
    #[cfg(target_arch = "wasm32")]
    let writer = console::ConsoleMakeWriter;
    #[cfg(not(target_arch = "wasm32"))]
    let writer = std::io::stderr;

    let _ = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(max_level)
        .without_time()
        .with_target(false)
        .try_init();
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing::{Level, Metadata};
    use tracing_subscriber::fmt::MakeWriter;

    pub struct ConsoleMakeWriter;

    /// Buffers one formatted event and hands it to the console on drop.
    pub struct ConsoleWriter {
        level: Level,
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let text = String::from_utf8_lossy(&self.buf);
            let line = text.trim_end();
            if line.is_empty() {
                return;
            }
            if self.level == Level::ERROR {
                web_sys::console::error_1(&line.into());
            } else if self.level == Level::WARN {
                web_sys::console::warn_1(&line.into());
            } else if self.level == Level::INFO {
                web_sys::console::info_1(&line.into());
            } else {
                web_sys::console::log_1(&line.into());
            }
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter {
                level: Level::INFO,
                buf: Vec::new(),
            }
        }

        fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
            ConsoleWriter {
                level: *meta.level(),
                buf: Vec::new(),
            }
        }
    }
}
