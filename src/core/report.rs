use crate::domain::model::RoundReport;
use crate::domain::ports::Reporter;
use crate::utils::error::Result;
use std::io::Write;

/// 純文字報告，格式與原本的終端機輸出一致
pub struct ConsoleReporter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn round_started(&mut self, round: u64) -> Result<()> {
        writeln!(self.out, "Run {}", round)?;
        self.out.flush()?;
        Ok(())
    }

    fn round_finished(&mut self, report: &RoundReport) -> Result<()> {
        for line in &report.domains {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn round_separator(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }
}

/// One JSON object per line per round.
pub struct JsonReporter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
    fn round_started(&mut self, _round: u64) -> Result<()> {
        Ok(())
    }

    fn round_finished(&mut self, report: &RoundReport) -> Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn round_separator(&mut self) -> Result<()> {
        Ok(())
    }
}
