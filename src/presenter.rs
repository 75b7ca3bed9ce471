//! Terminal front end: colored reports on stdout, performances on the audio thread.

use crate::audio::Performer;
use colored::*;
use std::io::{self, Write};
use tonecard_core::{HandReport, PerformedNote, Presenter};

pub struct TerminalPresenter<W: Write = Box<dyn Write>> {
    out: W,
    performer: Option<Performer>,
    audio_enabled: bool,
}

impl TerminalPresenter {
    pub fn new(performer: Option<Performer>) -> Self {
        Self::with_writer(Box::new(io::stdout()), performer)
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn with_writer(out: W, performer: Option<Performer>) -> Self {
        let audio_enabled = performer.is_some();
        TerminalPresenter {
            out,
            performer,
            audio_enabled,
        }
    }

    /// Audio can only be turned on when a performer was started
    pub fn set_audio(&mut self, enabled: bool) -> bool {
        self.audio_enabled = enabled && self.performer.is_some();
        self.audio_enabled
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> TerminalPresenter<W> {
    fn write_report(&mut self, report: &HandReport) -> io::Result<()> {
        write!(self.out, "{}", report)?;
        if !report.labels.is_empty() {
            writeln!(
                self.out,
                "  {} {}",
                "scored:".bright_black(),
                report.labels.join(", ").bright_white()
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present_report(&mut self, report: &HandReport) {
        if let Err(e) = self.write_report(report) {
            log::warn!("could not write report: {}", e);
        }
    }

    fn present_performance(&mut self, notes: &[PerformedNote]) {
        if !self.audio_enabled {
            return;
        }
        if let Some(performer) = &self.performer {
            performer.perform(notes);
        }
    }
}
