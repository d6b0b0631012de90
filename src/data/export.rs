use std::io::Write;

use super::model::ORDER_DATE;
use super::pivot::PivotTable;
use super::Result;

/// Write the wide table as CSV: `Order Date` followed by one column per
/// category, dates in ISO format.
pub fn write_pivot_csv<W: Write>(table: &PivotTable, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec![ORDER_DATE.to_string()];
    header.extend(table.categories.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.date.format("%Y-%m-%d").to_string()];
        record.extend(row.values.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the melted table as a JSON array of
/// `{ "order_date", "category", "sales" }` records.
pub fn write_melted_json<W: Write>(table: &PivotTable, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, &table.melt())?;
    Ok(())
}
