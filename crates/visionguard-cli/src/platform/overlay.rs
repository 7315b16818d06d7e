use std::io::{self, Stdout, Write};

use visionguard_core::Overlay;

const RULE: &str = "============================================================";

/// Break banner on the daemon's terminal.
///
/// Write failures (a closed or redirected stdout) are logged and dropped;
/// the timer keeps running without a visible banner.
#[derive(Debug)]
pub struct ConsoleOverlay<W = Stdout> {
    out: W,
}

impl ConsoleOverlay {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleOverlay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn banner(break_seconds: u64, strict: bool) -> String {
        let mut lines = vec![
            RULE.to_string(),
            "  Look away! Focus on something 20 feet away.".to_string(),
            format!("  Break: {break_seconds} seconds"),
        ];
        if !strict {
            lines.push("  Run `visionguard skip` to end the break early.".to_string());
        }
        lines.push(RULE.to_string());
        lines.join("\n")
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

impl<W: Write + Send> Overlay for ConsoleOverlay<W> {
    fn show(&mut self, break_seconds: u64, strict: bool) {
        let text = format!("\n{}", Self::banner(break_seconds, strict));
        if let Err(e) = self.emit(&text) {
            tracing::warn!(error = %e, "failed to write break banner");
        }
    }

    fn hide(&mut self) {
        if let Err(e) = self.emit("Break over, back to work.") {
            tracing::warn!(error = %e, "failed to write break banner");
        }
    }
}
