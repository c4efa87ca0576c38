use std::path::Path;

use anyhow::{bail, Context};

use crate::scoring::ScoreSheet;

/// Parses `criteria_id=score` as given on the command line.
pub fn parse_score_arg(raw: &str) -> anyhow::Result<(String, i32)> {
    let Some((id, score)) = raw.split_once('=') else {
        bail!("expected criteria_id=score, got {raw}");
    };
    let id = id.trim();
    if id.is_empty() {
        bail!("missing criteria id in {raw}");
    }
    let score = score
        .trim()
        .parse()
        .with_context(|| format!("score for {id} is not an integer"))?;
    Ok((id.to_string(), score))
}

/// Reads a `criteria_id,score` CSV file into a sheet, in file order.
pub fn read_score_file(path: &Path) -> anyhow::Result<ScoreSheet> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        criteria_id: String,
        score: i32,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut sheet = ScoreSheet::new();
    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        sheet.set(row.criteria_id.trim(), row.score);
    }
    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_score_pairs() {
        assert_eq!(
            parse_score_arg("perf-quality=85").unwrap(),
            ("perf-quality".to_string(), 85)
        );
        assert!(parse_score_arg("perf-quality").is_err());
        assert!(parse_score_arg("=40").is_err());
        assert!(parse_score_arg("perf-quality=high").is_err());
    }

    #[test]
    fn score_file_keeps_file_order() {
        let path = std::env::temp_dir().join(format!("scores-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "criteria_id,score\npers-teamwork,60\nperf-quality,90\npers-teamwork,80\n",
        )
        .unwrap();

        let sheet = read_score_file(&path).unwrap();
        let entries: Vec<(&str, i32)> = sheet.iter().collect();
        assert_eq!(entries, vec![("pers-teamwork", 80), ("perf-quality", 90)]);
        std::fs::remove_file(path).unwrap();
    }
}
