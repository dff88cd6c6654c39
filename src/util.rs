//! Wall-clock timing of generation passes.

use std::time::{Duration, Instant};

use log::Level;

/// Times one pass and logs `"<pass> finished in <elapsed>"` when dropped.
///
/// ```ignore
/// let _t = Timed::new(Level::Debug, "foundation");
/// ```
pub struct Timed {
    pass: &'static str,
    start: Instant,
    level: Level,
}

impl Timed {
    /// Starts timing `pass`; the start is logged one level below `level`.
    pub fn new(level: Level, pass: &'static str) -> Self {
        let announce = match level {
            Level::Error | Level::Warn | Level::Info => Level::Debug,
            Level::Debug | Level::Trace => Level::Trace,
        };
        log::log!(announce, "{pass} started");
        Self {
            pass,
            start: Instant::now(),
            level,
        }
    }

    /// Time since the pass started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        log::log!(self.level, "{} finished in {:.3?}", self.pass, self.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_only_grows() {
        let t = Timed::new(Level::Trace, "pass");
        let a = t.elapsed();
        let b = t.elapsed();
        assert!(b >= a);
    }
}
