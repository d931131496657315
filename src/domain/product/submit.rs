// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/product/submit.rs
//
// Submission seam for assembled product records.

use super::record::ProductRecord;

/// Receives a fully assembled record on submit.
pub trait SubmissionSink {
    fn submit(&mut self, record: &ProductRecord) -> anyhow::Result<()>;
}

/// Writes submitted records to the log as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SubmissionSink for LogSink {
    fn submit(&mut self, record: &ProductRecord) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        log::info!("Product submitted:\n{json}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sink_accepts_any_record() {
        let record = ProductRecord {
            name: "Kettle".into(),
            description: "<p>1.7 l</p>".into(),
            ..ProductRecord::default()
        };
        assert!(LogSink.submit(&record).is_ok());
    }
}
