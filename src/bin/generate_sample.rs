use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Log-normal draw, so most orders are small and a few are large.
    fn lognormal(&mut self, mu: f64, sigma: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        (mu + sigma * z).exp()
    }
}

const CITIES: [(&str, &str); 12] = [
    ("Chicago", "Illinois"),
    ("Columbus", "Ohio"),
    ("Dallas", "Texas"),
    ("Henderson", "Kentucky"),
    ("Houston", "Texas"),
    ("Los Angeles", "California"),
    ("New York City", "New York"),
    ("Philadelphia", "Pennsylvania"),
    ("San Diego", "California"),
    ("San Francisco", "California"),
    ("Seattle", "Washington"),
    ("York", "Pennsylvania"),
];

/// Category and the (mu, sigma) of its log-normal order value.
const CATEGORIES: [(&str, f64, f64); 3] = [
    ("Furniture", 5.4, 1.0),
    ("Office Supplies", 3.6, 1.2),
    ("Technology", 5.6, 1.1),
];

struct Row {
    order_id: String,
    date: NaiveDate,
    city: &'static str,
    state: &'static str,
    category: &'static str,
    sales: f64,
}

/// `n` orders spread uniformly over the four years starting at `start`.
fn generate(rng: &mut SimpleRng, start: NaiveDate, n: usize) -> Vec<Row> {
    let days = 4 * 365;

    let mut rows: Vec<Row> = (0..n)
        .map(|i| {
            let date = start + Duration::days((rng.next_u64() % days) as i64);
            let &(city, state) = rng.pick(&CITIES);
            let &(category, mu, sigma) = rng.pick(&CATEGORIES);
            Row {
                order_id: format!("CA-{}-{:06}", date.year(), 100_000 + i),
                date,
                city,
                state,
                category,
                sales: (rng.lognormal(mu, sigma) * 100.0).round() / 100.0,
            }
        })
        .collect();
    rows.sort_by_key(|r| r.date);
    rows
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(["Row ID", "Order ID", "Order Date", "City", "State", "Category", "Sales"])?;
    for (i, r) in rows.iter().enumerate() {
        writer.write_record([
            (i + 1).to_string(),
            r.order_id.clone(),
            r.date.format("%-m/%-d/%Y").to_string(),
            r.city.to_string(),
            r.state.to_string(),
            r.category.to_string(),
            r.sales.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let epoch = NaiveDate::default();

    let schema = Arc::new(Schema::new(vec![
        Field::new("Order Date", DataType::Date32, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Sales", DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Date32Array::from(
            rows.iter()
                .map(|r| (r.date - epoch).num_days() as i32)
                .collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(rows.iter().map(|r| r.city).collect::<Vec<_>>())),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.category).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.sales).collect::<Vec<_>>(),
        )),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).context("start date")?;
    let rows = generate(&mut rng, start, 5000);

    let dir = Path::new("data");
    std::fs::create_dir_all(dir).context("creating data directory")?;

    let csv_path = dir.join("Superstore_Orders.csv");
    write_csv(&rows, &csv_path)?;
    let parquet_path = dir.join("Superstore_Orders.parquet");
    write_parquet(&rows, &parquet_path)?;

    println!(
        "Wrote {} order lines to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
