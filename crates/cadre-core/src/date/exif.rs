use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{CadreError, Result};

/// The EXIF fields the label pipeline cares about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifRecord {
    pub date_time_original: Option<NaiveDateTime>,
    /// (latitude, longitude) in signed decimal degrees
    pub coords: Option<(f64, f64)>,
    /// EXIF orientation, 1..=8
    pub orientation: Option<u16>,
}

/// Source of EXIF records. A file without EXIF is an empty record, not an error.
pub trait ExifSource {
    fn read(&self, path: &Path) -> Result<ExifRecord>;
}

/// Reads EXIF straight from JPEG/HEIF containers with kamadak-exif.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifReader;

impl ExifSource for ExifReader {
    fn read(&self, path: &Path) -> Result<ExifRecord> {
        let file = File::open(path).map_err(|e| CadreError::io(path, e))?;
        let mut reader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(ExifRecord::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(record_from_exif(&exif))
    }
}

fn record_from_exif(exif: &Exif) -> ExifRecord {
    let date_time_original = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .and_then(|f| parse_exif_datetime(&f.display_value().to_string()));

    let coords = match (
        gps_coord(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef),
        gps_coord(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef),
    ) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => None,
    };

    let orientation = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .and_then(|o| u16::try_from(o).ok())
        .filter(|o| (1..=8).contains(o));

    ExifRecord {
        date_time_original,
        coords,
        orientation,
    }
}

/// Parse an EXIF datetime. Impossible calendar dates ("2021:02:30") give None.
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s
        .trim()
        .trim_matches('"')
        .replace('-', ":")
        .replace('/', ":")
        .replace('\\', ":")
        .replace('.', ":");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(d) = chrono::NaiveDate::parse_from_str(cleaned.split(' ').next()?, "%Y:%m:%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    None
}

fn gps_coord(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let field = exif.get_field(coord_tag, In::PRIMARY)?;
    let Value::Rational(ref parts) = field.value else {
        return None;
    };
    let degrees = dms_to_degrees(
        &parts.iter().map(|r| r.to_f64()).collect::<Vec<_>>(),
    )?;

    let negative = exif
        .get_field(ref_tag, In::PRIMARY)
        .map(|f| {
            let r = f.display_value().to_string();
            r.contains('S') || r.contains('W')
        })
        .unwrap_or(false);

    Some(if negative { -degrees } else { degrees })
}

/// Degrees/minutes/seconds to decimal degrees; missing trailing parts count as 0.
fn dms_to_degrees(parts: &[f64]) -> Option<f64> {
    let deg = *parts.first()?;
    let min = parts.get(1).copied().unwrap_or(0.0);
    let sec = parts.get(2).copied().unwrap_or(0.0);
    let value = deg + min / 60.0 + sec / 3600.0;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_exif_datetime() {
        let expected = NaiveDate::from_ymd_opt(2021, 6, 15)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(parse_exif_datetime("2021:06:15 14:30:05"), Some(expected));
        assert_eq!(parse_exif_datetime("2021-06-15 14:30:05"), Some(expected));
        assert_eq!(parse_exif_datetime("\"2021:06:15 14:30:05\""), Some(expected));
    }

    #[test]
    fn test_invalid_calendar_dates_are_absent() {
        assert_eq!(parse_exif_datetime("2021:02:30 10:00:00"), None);
        assert_eq!(parse_exif_datetime("0000:00:00 00:00:00"), None);
        assert_eq!(parse_exif_datetime("    :  :     :  :  "), None);
        assert_eq!(parse_exif_datetime(""), None);
    }

    #[test]
    fn test_date_only() {
        let d = parse_exif_datetime("2020:01:02").unwrap();
        assert_eq!(d.format("%Y-%m-%d %H:%M").to_string(), "2020-01-02 00:00");
    }

    #[test]
    fn test_dms_to_degrees() {
        let v = dms_to_degrees(&[45.0, 54.0, 36.0]).unwrap();
        assert!((v - 45.91).abs() < 1e-9);
        assert_eq!(dms_to_degrees(&[12.5]), Some(12.5));
        assert_eq!(dms_to_degrees(&[]), None);
        assert_eq!(dms_to_degrees(&[f64::NAN]), None);
    }

    #[test]
    fn test_file_without_exif_is_empty_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jpg");
        // SOI + EOI, a JPEG with no APP1 segment
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xD9]).unwrap();
        assert_eq!(ExifReader.read(&path).unwrap(), ExifRecord::default());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ExifReader.read(Path::new("/nonexistent/cadre/IMG_0001.jpg")).unwrap_err();
        assert!(matches!(err, CadreError::Io { .. }));
    }
}
