use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(super) struct RubricRow {
    pub(super) category: String,
    pub(super) key: String,
    #[serde(default)]
    pub(super) title: String,
    pub(super) weight: u32,
}

pub(super) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RubricRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RubricRow>() {
        let mut row: RubricRow = record?;
        if row.title.is_empty() {
            row.title = row.key.clone();
        }
        rows.push(row);
    }

    Ok(rows)
}
