//! Row/column view of a transmission log for table-style displays.

use std::fmt;

use log::trace;

use crate::transmission::LogReader;
use crate::{LogError, MoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Time,
    From,
    To,
    Data,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::Time, Column::From, Column::To, Column::Data];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Time => "Time",
            Column::From => "From",
            Column::To => "To",
            Column::Data => "Data",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives mote highlight requests. The table forwards mote ids as-is.
pub trait MoteHighlighter {
    fn highlight(&self, mote: MoteId);
}

impl<F> MoteHighlighter for F
where
    F: Fn(MoteId),
{
    fn highlight(&self, mote: MoteId) {
        self(mote)
    }
}

pub struct LogTable<H> {
    reader: LogReader,
    highlighter: H,
}

impl<H: MoteHighlighter> LogTable<H> {
    pub fn new(reader: LogReader, highlighter: H) -> Self {
        Self {
            reader,
            highlighter,
        }
    }

    pub fn row_count(&self) -> usize {
        self.reader.len()
    }

    pub fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    pub fn cell(&self, row: usize, column: Column) -> Result<String, LogError> {
        self.reader.with_record(row, |record| match column {
            Column::Time => record.timestamp().to_string(),
            Column::From => record.source().label(),
            Column::To => format!("[{} motes]", record.destination_count()),
            Column::Data => record.data_summary(),
        })
    }

    /// Detailed view of the data cell; empty for other columns and for
    /// records without a payload.
    pub fn tooltip(&self, row: usize, column: Column) -> Result<String, LogError> {
        self.reader.with_record(row, |record| match column {
            Column::Data => record.data_details().unwrap_or_default(),
            _ => String::new(),
        })
    }

    pub fn destination_choices(&self, row: usize) -> Result<Vec<String>, LogError> {
        self.reader.with_record(row, |record| {
            record.destinations().iter().map(|d| d.label()).collect()
        })
    }

    /// Highlight the source mote of `row`. Returns the mote that was
    /// forwarded, if the source radio sits on one.
    pub fn select_row(&self, row: usize) -> Result<Option<MoteId>, LogError> {
        let mote = self.reader.with_record(row, |record| record.source().mote)?;
        self.forward(mote);
        Ok(mote)
    }

    pub fn select_destination(
        &self,
        row: usize,
        destination: usize,
    ) -> Result<Option<MoteId>, LogError> {
        let mote = self.reader.with_record(row, |record| {
            let destinations = record.destinations();
            destinations
                .get(destination)
                .map(|d| d.mote)
                .ok_or(LogError::DestinationOutOfRange {
                    index: destination,
                    len: destinations.len(),
                })
        })??;
        self.forward(mote);
        Ok(mote)
    }

    fn forward(&self, mote: Option<MoteId>) {
        if let Some(mote) = mote {
            trace!("Highlighting {}", mote);
            self.highlighter.highlight(mote);
        }
    }
}
