//! Plain-text report for the terminal.
//!
//! ```text
//!
//! - Same files (26c7827d889f6da3):
//!  -> '/scanned/root/a.txt'
//!  -> '/scanned/root/b.txt'
//!
//! Number of files: 3
//! Elapsed time: 0.002 s
//! ```

use std::io::{self, Write};

use crate::duplicates::ScanReport;

/// Text formatter over a finished scan.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    report: &'a ScanReport,
}

impl<'a> TextOutput<'a> {
    #[must_use]
    pub fn new(report: &'a ScanReport) -> Self {
        Self { report }
    }

    /// Write one block per duplicate set, ordered by size then digest,
    /// followed by the file count and elapsed time.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for (_, digest, paths) in self.report.duplicates().iter() {
            writeln!(writer)?;
            writeln!(writer, "- Same files ({}):", digest)?;
            for path in paths {
                writeln!(writer, " -> '{}'", path.display())?;
            }
        }

        let summary = self.report.summary();
        writeln!(writer)?;
        writeln!(writer, "Number of files: {}", self.report.num_of_files())?;
        if summary.skipped() > 0 {
            writeln!(writer, "Skipped entries: {}", summary.skipped())?;
        }
        if summary.duplicate_groups > 0 {
            writeln!(
                writer,
                "Duplicate sets: {} ({} reclaimable)",
                summary.duplicate_groups,
                summary.reclaimable_display()
            )?;
        }
        writeln!(
            writer,
            "Elapsed time: {:.3} s",
            summary.scan_duration.as_secs_f64()
        )?;
        Ok(())
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
