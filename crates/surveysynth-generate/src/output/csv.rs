use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use surveysynth_core::{INTERVIEW_COLUMNS, InterviewRecord, SURVEY_COLUMNS, SurveyRecord};

/// Write the quantitative table in the fixed 80-column layout.
pub fn write_survey_csv(path: &Path, records: &[SurveyRecord]) -> Result<u64, csv::Error> {
    write_table(path, &SURVEY_COLUMNS, records.iter().map(SurveyRecord::to_row))
}

/// Write the qualitative table.
pub fn write_interview_csv(path: &Path, records: &[InterviewRecord]) -> Result<u64, csv::Error> {
    write_table(
        path,
        &INTERVIEW_COLUMNS,
        records.iter().map(InterviewRecord::to_row),
    )
}

fn write_table(
    path: &Path,
    header: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<u64, csv::Error> {
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
