//! ライブラリのCSV出力
//!
//! ヘッダー `Card Name,Card ID,Quantity`、名前とIDはダブルクォート、
//! 枚数はクォートなし。改行区切りで末尾改行なし。

use crate::error::Result;
use crate::library::ExportRow;
use std::io::Write;

pub const CSV_HEADER: &str = "Card Name,Card ID,Quantity";

/// エクスポートファイル名 (`mtg-library-2026-10-19.csv`)
pub fn export_file_name(iso_date: &str) -> String {
    format!("mtg-library-{}.csv", iso_date)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn render_row(row: &ExportRow<'_>) -> String {
    format!("{},{},{}", quote(row.name), quote(row.id), row.quantity)
}

/// CSV文字列を生成
pub fn render_csv<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = ExportRow<'a>>,
{
    std::iter::once(CSV_HEADER.to_string())
        .chain(rows.into_iter().map(|row| render_row(&row)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// CSVをwriterへ書き出し
pub fn write_csv<'a, W, I>(writer: &mut W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = ExportRow<'a>>,
{
    writer.write_all(render_csv(rows).as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row<'a>(name: &'a str, id: &'a str, quantity: u32) -> ExportRow<'a> {
        ExportRow { name, id, quantity }
    }

    #[test]
    fn test_render_two_entries() {
        let csv = render_csv(vec![row("Shock", "Shock-1", 2), row("Bolt", "Bolt-2", 1)]);
        assert_eq!(
            csv,
            "Card Name,Card ID,Quantity\n\"Shock\",\"Shock-1\",2\n\"Bolt\",\"Bolt-2\",1"
        );
    }

    #[test]
    fn test_render_empty_is_header_only() {
        assert_eq!(render_csv(Vec::<ExportRow>::new()), CSV_HEADER);
    }

    #[test]
    fn test_quotes_escaped() {
        let csv = render_csv(vec![row("Kongming, \"Sleeping Dragon\"", "k-1", 1)]);
        assert!(csv.ends_with("\"Kongming, \"\"Sleeping Dragon\"\"\",\"k-1\",1"));
    }

    #[test]
    fn test_write_csv() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, vec![row("Shock", "Shock-1", 3)]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Card Name,Card ID,Quantity\n\"Shock\",\"Shock-1\",3"
        );
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("2026-10-19"), "mtg-library-2026-10-19.csv");
    }
}
