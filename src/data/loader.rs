use std::io::Read;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, AsArray, Date32Array, Date64Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{OrderLine, SalesDataset, CATEGORY, CITY, ORDER_DATE, SALES};
use super::{DataError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row containing `Order Date`, `Category`, `City`, `Sales`
/// * `.json`    – `[{ "Order Date": "...", "Category": "...", ... }, ...]`
/// * `.parquet` – the same four columns; dates as Utf8 or Date32/Date64
pub fn load_file(path: &Path) -> Result<SalesDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = open(path)?;
            load_csv_reader(file)
        }
        "json" => {
            let file = open(path)?;
            load_json_reader(file)
        }
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }
}

fn open(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Cell parsing shared by every format
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse an `Order Date` cell. Timestamps keep only their date part.
pub fn parse_order_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Parse a `Sales` cell, tolerating a leading `$` and thousands separators.
pub fn parse_sales(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn date_cell(s: &str, row: usize) -> Result<NaiveDate> {
    parse_order_date(s).ok_or_else(|| DataError::InvalidValue {
        row,
        column: ORDER_DATE,
        value: s.to_string(),
    })
}

fn sales_cell(s: &str, row: usize) -> Result<f64> {
    parse_sales(s).ok_or_else(|| DataError::InvalidValue {
        row,
        column: SALES,
        value: s.to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. Only `Order Date`, `Category`,
/// `City` and `Sales` are read.
pub fn load_csv_reader<R: Read>(input: R) -> Result<SalesDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers()?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(DataError::MissingColumn(name))
    };
    let date_idx = column(ORDER_DATE)?;
    let category_idx = column(CATEGORY)?;
    let city_idx = column(CITY)?;
    let sales_idx = column(SALES)?;

    let mut orders = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;

        orders.push(OrderLine {
            order_date: date_cell(record.get(date_idx).unwrap_or(""), row_no)?,
            category: record.get(category_idx).unwrap_or("").trim().to_string(),
            city: record.get(city_idx).unwrap_or("").trim().to_string(),
            sales: sales_cell(record.get(sales_idx).unwrap_or(""), row_no)?,
        });
    }

    log::debug!("parsed {} CSV rows", orders.len());
    Ok(SalesDataset::from_orders(orders))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `to_json(orient='records')`):
///
/// ```json
/// [
///   { "Order Date": "11/8/2022", "Category": "Furniture", "City": "Henderson", "Sales": 261.96 },
///   ...
/// ]
/// ```
pub fn load_json_reader<R: Read>(input: R) -> Result<SalesDataset> {
    let root: JsonValue = serde_json::from_reader(input)?;

    let records = root
        .as_array()
        .ok_or_else(|| DataError::Malformed("expected top-level JSON array".into()))?;

    let mut orders = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::Malformed(format!("row {i} is not a JSON object")))?;

        let text = |name: &'static str| -> Result<String> {
            match obj.get(name) {
                Some(JsonValue::String(s)) => Ok(s.trim().to_string()),
                Some(other) => Ok(other.to_string()),
                None => Err(DataError::MissingColumn(name)),
            }
        };

        let sales = match obj.get(SALES) {
            Some(JsonValue::Number(n)) => n.as_f64().ok_or_else(|| DataError::InvalidValue {
                row: i,
                column: SALES,
                value: n.to_string(),
            })?,
            Some(JsonValue::String(s)) => sales_cell(s, i)?,
            Some(other) => {
                return Err(DataError::InvalidValue {
                    row: i,
                    column: SALES,
                    value: other.to_string(),
                })
            }
            None => return Err(DataError::MissingColumn(SALES)),
        };

        orders.push(OrderLine {
            order_date: date_cell(&text(ORDER_DATE)?, i)?,
            category: text(CATEGORY)?,
            city: text(CITY)?,
            sales,
        });
    }

    Ok(SalesDataset::from_orders(orders))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing order lines.
///
/// Expected schema:
/// - `Order Date`: Utf8 / LargeUtf8 text, Date32 or Date64
/// - `Category`, `City`: Utf8 / LargeUtf8
/// - `Sales`: Float64, Float32, Int64 or Int32
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SalesDataset> {
    let file = open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut orders = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let date_col = named_column(&batch, ORDER_DATE)?;
        let category_col = named_column(&batch, CATEGORY)?;
        let city_col = named_column(&batch, CITY)?;
        let sales_col = named_column(&batch, SALES)?;

        for row in 0..batch.num_rows() {
            let row_no = orders.len();
            orders.push(OrderLine {
                order_date: extract_date(date_col, row, row_no)?,
                category: extract_string(category_col, row, CATEGORY, row_no)?,
                city: extract_string(city_col, row, CITY, row_no)?,
                sales: extract_f64(sales_col, row, row_no)?,
            });
        }
    }

    Ok(SalesDataset::from_orders(orders))
}

// -- Parquet / Arrow helpers --

fn named_column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

fn invalid(row: usize, column: &'static str, col: &ArrayRef) -> DataError {
    DataError::InvalidValue {
        row,
        column,
        value: format!("{:?}", col.data_type()),
    }
}

fn extract_string(
    col: &ArrayRef,
    row: usize,
    column: &'static str,
    row_no: usize,
) -> Result<String> {
    if col.is_null(row) {
        return Err(invalid(row_no, column, col));
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).trim().to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).trim().to_string()),
        _ => Err(invalid(row_no, column, col)),
    }
}

fn extract_date(col: &ArrayRef, row: usize, row_no: usize) -> Result<NaiveDate> {
    if col.is_null(row) {
        return Err(invalid(row_no, ORDER_DATE, col));
    }
    let date = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let text = extract_string(col, row, ORDER_DATE, row_no)?;
            return date_cell(&text, row_no);
        }
        DataType::Date32 => col
            .as_any()
            .downcast_ref::<Date32Array>()
            .and_then(|a| a.value_as_date(row)),
        DataType::Date64 => col
            .as_any()
            .downcast_ref::<Date64Array>()
            .and_then(|a| a.value_as_date(row)),
        _ => None,
    };
    date.ok_or_else(|| invalid(row_no, ORDER_DATE, col))
}

fn extract_f64(col: &ArrayRef, row: usize, row_no: usize) -> Result<f64> {
    if col.is_null(row) {
        return Err(invalid(row_no, SALES, col));
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .and_then(|a| parse_sales(a.value(row))),
        _ => None,
    };
    value.ok_or_else(|| invalid(row_no, SALES, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use std::sync::Arc;

    const SAMPLE: &str = "\
Row ID,Order ID,Order Date,Ship Mode,City,State,Category,Sales
1,CA-2022-152156,11/8/2022,Second Class,Henderson,Kentucky,Furniture,261.96
2,CA-2022-152156,11/8/2022,Second Class,Henderson,Kentucky,Furniture,731.94
3,CA-2022-138688,6/12/2022,Second Class,Los Angeles,California,Office Supplies,14.62
4,US-2021-108966,10/11/2021,Standard Class,Fort Lauderdale,Florida,Technology,\"$1,957.58\"
";

    #[test]
    fn csv_reads_required_columns_and_ignores_the_rest() {
        let ds = load_csv_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(ds.len(), 4);
        let first = &ds.orders[0];
        assert_eq!(first.order_date, NaiveDate::from_ymd_opt(2022, 11, 8).unwrap());
        assert_eq!(first.category, "Furniture");
        assert_eq!(first.city, "Henderson");
        assert!((first.sales - 261.96).abs() < 1e-9);
        assert!((ds.orders[3].sales - 1957.58).abs() < 1e-9);
        assert_eq!(
            ds.categories,
            vec!["Furniture", "Office Supplies", "Technology"]
        );
    }

    #[test]
    fn csv_missing_column_is_reported_by_name() {
        let err = load_csv_reader("Order Date,City,Sales\n1/1/2021,Austin,3\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(CATEGORY)));
    }

    #[test]
    fn csv_bad_date_names_the_row() {
        let input = "Order Date,Category,City,Sales\n1/1/2021,Furniture,Austin,3\nsoon,Furniture,Austin,4\n";
        match load_csv_reader(input.as_bytes()).unwrap_err() {
            DataError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, ORDER_DATE);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 7).unwrap();
        assert_eq!(parse_order_date("3/7/2021"), Some(expected));
        assert_eq!(parse_order_date("03/07/2021"), Some(expected));
        assert_eq!(parse_order_date("2021-03-07"), Some(expected));
        assert_eq!(parse_order_date("07-03-2021"), Some(expected));
        assert_eq!(parse_order_date("2021-03-07 13:45:00"), Some(expected));
        assert_eq!(parse_order_date("2021-03-07T13:45:00Z"), Some(expected));
        assert_eq!(parse_order_date("March"), None);
    }

    #[test]
    fn sales_formats() {
        assert_eq!(parse_sales("12.5"), Some(12.5));
        assert_eq!(parse_sales(" $1,200 "), Some(1200.0));
        assert_eq!(parse_sales("n/a"), None);
        assert_eq!(parse_sales("NaN"), None);
    }

    #[test]
    fn json_records() {
        let input = r#"[
            {"Order Date": "2023-01-04", "Category": "Technology", "City": "Seattle", "Sales": 99.5},
            {"Order Date": "1/5/2023", "Category": "Furniture", "City": "Seattle", "Sales": "$10"}
        ]"#;
        let ds = load_json_reader(input.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.orders[1].sales, 10.0);
        assert_eq!(ds.years.iter().copied().collect::<Vec<_>>(), vec![2023]);
    }

    #[test]
    fn json_requires_array() {
        let err = load_json_reader(r#"{"rows": []}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }

    #[test]
    fn json_rows_need_every_column() {
        let input = r#"[{"Order Date": "2023-01-04", "City": "Seattle", "Sales": 1}]"#;
        let err = load_json_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(CATEGORY)));

        let err = load_json_reader(r#"[1]"#.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("orders.CSV");
        std::fs::File::create(&csv_path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(load_file(&csv_path).unwrap().len(), 4);

        let txt_path = dir.path().join("orders.txt");
        std::fs::write(&txt_path, SAMPLE).unwrap();
        assert!(matches!(
            load_file(&txt_path),
            Err(DataError::UnsupportedExtension(ext)) if ext == "txt"
        ));

        assert!(matches!(
            load_file(&dir.path().join("missing.csv")),
            Err(DataError::Io { .. })
        ));
    }

    #[test]
    fn parquet_round_trip_through_arrow_writer() {
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new(ORDER_DATE, DataType::Date32, false),
            Field::new(CATEGORY, DataType::Utf8, false),
            Field::new(CITY, DataType::Utf8, false),
            Field::new(SALES, DataType::Float64, false),
        ]));
        // 2021-01-01 is day 18628 since the epoch.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![18628, 18629])),
                Arc::new(StringArray::from(vec!["Technology", "Furniture"])),
                Arc::new(StringArray::from(vec!["Seattle", "Austin"])),
                Arc::new(Float64Array::from(vec![10.0, 20.5])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.orders[0].order_date,
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
        assert_eq!(ds.orders[1].city, "Austin");
        assert_eq!(ds.orders[1].sales, 20.5);
    }
}
