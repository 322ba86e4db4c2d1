//! JSON output

use crate::renderer::CurveReport;
use crate::report::Summary;
use chrono::Local;
use serde::Serialize;
use std::io::{self, Write};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    summary: Summary,
    files: &'a [CurveReport],
}

pub fn write<W: Write>(writer: &mut W, results: &[CurveReport]) -> io::Result<()> {
    let report = JsonReport {
        generated: Local::now().to_rfc3339(),
        summary: Summary::from_results(results),
        files: results,
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}
