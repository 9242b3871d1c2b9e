//! # Colormap Loader
//!
//! Reads an ordered sequence of RGB triples from a CSV file whose header line is exactly
//! `RGB_r,RGB_g,RGB_b`. Used by [`crate::render`] to map normalized trail intensity to a color
//! ramp.

use crate::errors::ColormapError;
use std::path::Path;

const EXPECTED_HEADER: &str = "RGB_r,RGB_g,RGB_b";

pub fn load_colormap(path: &Path) -> Result<Vec<(u8, u8, u8)>, ColormapError> {
    let path_str = path.display().to_string();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| ColormapError::Io {
            path: path_str.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })?;

    let header = reader.headers().map_err(|e| ColormapError::Io {
        path: path_str.clone(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    })?;
    let found = header.iter().collect::<Vec<_>>().join(",");
    if found != EXPECTED_HEADER {
        return Err(ColormapError::BadHeader {
            path: path_str,
            found,
        });
    }

    let mut colors = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ColormapError::MalformedRow {
            path: path_str.clone(),
            row: row_idx,
            detail: e.to_string(),
        })?;
        if record.len() != 3 {
            return Err(ColormapError::MalformedRow {
                path: path_str.clone(),
                row: row_idx,
                detail: format!("expected 3 fields, found {}", record.len()),
            });
        }
        let mut channels = [0u8; 3];
        for (i, field) in record.iter().enumerate() {
            let value: i64 = field.trim().parse().map_err(|_| ColormapError::MalformedRow {
                path: path_str.clone(),
                row: row_idx,
                detail: format!("channel `{field}` is not an integer"),
            })?;
            if !(0..=255).contains(&value) {
                return Err(ColormapError::ChannelOutOfRange {
                    path: path_str.clone(),
                    row: row_idx,
                    value,
                });
            }
            channels[i] = value as u8;
        }
        colors.push((channels[0], channels[1], channels[2]));
    }

    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_well_formed_colormap() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "RGB_r,RGB_g,RGB_b").unwrap();
        writeln!(file, "0,0,0").unwrap();
        writeln!(file, "255,128,0").unwrap();
        let colors = load_colormap(file.path()).unwrap();
        assert_eq!(colors, vec![(0, 0, 0), (255, 128, 0)]);
    }

    #[test]
    fn rejects_a_bad_header() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "r,g,b").unwrap();
        writeln!(file, "0,0,0").unwrap();
        assert!(matches!(
            load_colormap(file.path()),
            Err(ColormapError::BadHeader { .. })
        ));
    }

    #[test]
    fn rejects_an_out_of_range_channel() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "RGB_r,RGB_g,RGB_b").unwrap();
        writeln!(file, "300,0,0").unwrap();
        assert!(matches!(
            load_colormap(file.path()),
            Err(ColormapError::ChannelOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_a_missing_file() {
        let result = load_colormap(Path::new("/nonexistent/colormap.csv"));
        assert!(matches!(result, Err(ColormapError::Io { .. })));
    }
}
