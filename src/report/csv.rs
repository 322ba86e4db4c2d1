//! CSV output, one row per point

use crate::curve::{CurvePoint, MeasuredPoint, SpectralCurve};
use crate::renderer::CurveReport;
use std::io::{self, Write};

const HEADER: [&str; 5] = ["file", "series", "band", "frequency_hz", "level_db"];

pub fn write<W: Write>(writer: &mut W, results: &[CurveReport]) -> io::Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    for r in results {
        if let Some(ref main) = r.main {
            write_curve(&mut wtr, &r.file_name, "", main)?;
        }
        if let Some(ref reference) = r.reference {
            write_curve(&mut wtr, &r.file_name, "reference_", reference)?;
        }
        if let Some(ref diff) = r.difference {
            write_points(&mut wtr, &r.file_name, "difference", diff)?;
        }
    }

    wtr.flush()
}

fn write_curve<W: Write>(
    wtr: &mut ::csv::Writer<W>,
    file: &str,
    prefix: &str,
    curve: &SpectralCurve,
) -> io::Result<()> {
    write_points(wtr, file, &format!("{}curve", prefix), &curve.curve)?;
    write_measured(wtr, file, &format!("{}measured", prefix), &curve.measured)
}

fn write_points<W: Write>(
    wtr: &mut ::csv::Writer<W>,
    file: &str,
    series: &str,
    points: &[CurvePoint],
) -> io::Result<()> {
    for p in points {
        let freq = format!("{:.3}", p.frequency_hz);
        let level = format!("{:.3}", p.level_db);
        wtr.write_record([file, series, "", freq.as_str(), level.as_str()])?;
    }
    Ok(())
}

fn write_measured<W: Write>(
    wtr: &mut ::csv::Writer<W>,
    file: &str,
    series: &str,
    points: &[MeasuredPoint],
) -> io::Result<()> {
    for p in points {
        let freq = format!("{:.3}", p.frequency_hz);
        let level = format!("{:.3}", p.level_db);
        wtr.write_record([file, series, p.band_name.as_str(), freq.as_str(), level.as_str()])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::{empty, rendered, with_reference};

    fn to_lines(results: &[CurveReport]) -> Vec<String> {
        let mut buf = Vec::new();
        write(&mut buf, results).unwrap();
        String::from_utf8(buf).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let lines = to_lines(&[empty("c.json")]);
        assert_eq!(lines, vec!["file,series,band,frequency_hz,level_db"]);
    }

    #[test]
    fn test_csv_rows_per_point() {
        let lines = to_lines(&[rendered("a.json")]);

        // header + 151 curve points + 3 measured bands
        assert_eq!(lines.len(), 1 + 151 + 3);
        assert_eq!(lines[1], "a.json,curve,,20.000,-60.000");
        assert_eq!(lines[151], "a.json,curve,,20000.000,-20.000");
        assert_eq!(lines[152], "a.json,measured,Sub,40.000,-60.000");
        assert_eq!(lines[154], "a.json,measured,Mids,1800.000,-20.000");
    }

    #[test]
    fn test_csv_reference_series() {
        let lines = to_lines(&[with_reference("b.json")]);

        assert!(lines.iter().any(|l| l.starts_with("b.json,reference_curve,,")));
        assert!(lines.iter().any(|l| l.starts_with("b.json,reference_measured,Mids,")));
        let diff: Vec<_> = lines.iter().filter(|l| l.starts_with("b.json,difference,")).collect();
        assert_eq!(diff.len(), 151);
        assert!(diff[0].ends_with(",10.000"));
    }
}
