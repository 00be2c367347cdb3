use std::io::Write;

use log::debug;
use nv_results::{LoadError, LoadResult, NormalizedResult, ResultSink};

/// Writes the records as JSON, one object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> JsonLinesSink<W> {
        JsonLinesSink { writer, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn sink_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> LoadError {
    LoadError::Sink {
        source: Box::new(e),
    }
}

impl<W: Write> ResultSink for JsonLinesSink<W> {
    fn insert_many(&mut self, results: Vec<NormalizedResult>) -> LoadResult<()> {
        // The batch is rendered first so that a failure writes nothing.
        let mut buf: Vec<u8> = Vec::new();
        for res in results.iter() {
            serde_json::to_writer(&mut buf, res).map_err(sink_error)?;
            buf.push(b'\n');
        }
        self.writer.write_all(&buf).map_err(sink_error)?;
        self.writer.flush().map_err(sink_error)?;
        self.written += results.len();
        debug!("insert_many: {} results, {} in total", results.len(), self.written);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nv_results::{CommonFields, ReportingLevel, VoteCount};

    fn result(votes: VoteCount) -> NormalizedResult {
        NormalizedResult {
            common: CommonFields {
                election_id: "nv-2008-11-04-general".to_string(),
                state: "NV".to_string(),
                source: "carson_city.csv".to_string(),
                start_date: Some("2008-11-04".to_string()),
                election_type: Some("general".to_string()),
            },
            reporting_level: ReportingLevel::County,
            office: "PRESIDENT".to_string(),
            district: None,
            party: Some("DEM".to_string()),
            primary_party: None,
            full_name: "Jane Doe".to_string(),
            jurisdiction: "Carson City".to_string(),
            ocd_id: "ocd-division/country:us/state:nv/place:carson_city".to_string(),
            votes,
        }
    }

    #[test]
    fn one_line_per_result() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.insert_many(vec![result(VoteCount::Count(3)), result(VoteCount::NotApplicable)])
            .unwrap();
        assert_eq!(sink.written(), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "{\"election_id\":\"nv-2008-11-04-general\",\"state\":\"NV\",\"source\":\"carson_city.csv\",\
             \"start_date\":\"2008-11-04\",\"election_type\":\"general\",\"reporting_level\":\"county\",\
             \"office\":\"PRESIDENT\",\"party\":\"DEM\",\"full_name\":\"Jane Doe\",\
             \"jurisdiction\":\"Carson City\",\"ocd_id\":\"ocd-division/country:us/state:nv/place:carson_city\",\
             \"votes\":3}"
        );
        assert!(lines[1].ends_with("\"votes\":\"N/A\"}"));
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.insert_many(Vec::new()).unwrap();
        assert_eq!(sink.written(), 0);
        assert!(sink.into_inner().is_empty());
    }
}
