//! CSV serialization of the merged table.

use std::io::Write;
use std::path::Path;

use plyfeat_core::{FEATURE_COLUMNS, FeatureRecord};

use crate::error::PipelineError;

/// Write the header row and one row per record.
///
/// The header is written even when there are no records. Unknown results
/// are left as empty cells.
pub fn write_csv<W: Write>(records: &[FeatureRecord], writer: W) -> Result<(), PipelineError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(FEATURE_COLUMNS)?;
    for record in records {
        out.serialize(record)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// [`write_csv`] to a file, creating or truncating it.
pub fn write_csv_file(path: &Path, records: &[FeatureRecord]) -> Result<(), PipelineError> {
    let file = std::fs::File::create(path).map_err(csv::Error::from)?;
    write_csv(records, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use plyfeat_core::{BoardProjection, CastleFlags, Color, GameResult, Ratings, extract};

    use super::*;

    fn render(records: &[FeatureRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(records, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_only_for_empty_table() {
        assert_eq!(
            render(&[]),
            "white_pawns,black_pawns,turn,white_castled,black_castled,white_elo,black_elo,material_diff,is_white_turn,result\n"
        );
    }

    #[test]
    fn rows_follow_the_header_order() {
        let board = BoardProjection::new([[8, 2, 2, 2, 1, 1], [7, 2, 2, 2, 0, 1]], Color::Black, 30);
        let mut castled = CastleFlags::default();
        castled.mark(Color::White);
        let ratings = Ratings {
            white: 2000,
            black: 1000,
        };
        let known = extract(&board, ratings, castled, GameResult::Draw);
        let unknown = extract(&board, ratings, castled, GameResult::Unknown);

        let text = render(&[known, unknown]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "8,7,0.5,1,0,0.5,0.0,10,0,1");
        assert_eq!(lines[2], "8,7,0.5,1,0,0.5,0.0,10,0,");
    }

    #[test]
    fn rows_read_back() {
        let board = BoardProjection::starting_position();
        let row = extract(&board, Ratings::default(), CastleFlags::default(), GameResult::WhiteWin);
        let text = render(&[row]);
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let back: Vec<FeatureRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(back, [row]);
    }

    #[test]
    fn file_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        write_csv_file(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("white_pawns,"));
    }

    #[test]
    fn unwritable_path_is_an_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_csv_file(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Output { .. }));
    }
}
