//! Writes ten records with a `|` delimiter and a heading row, then prints
//! the result.
//!
//! Run with: cargo run --example write_records

use record_csv::{EncodeError, Record, RecordEncoder};

#[derive(Record)]
struct TestStruct {
    #[csv(name = "a_name")]
    a: String,
    #[csv(name = "b_name")]
    b: i64,
    #[csv(name = "c_name")]
    c: i32,
    #[csv(name = "d_name")]
    d: i64,
    #[csv(name = "e_name")]
    e: f32,
    #[csv(name = "f_name")]
    f: f64,
    #[csv(name = "j_name")]
    j: bool,
}

fn main() -> Result<(), EncodeError> {
    let records: Vec<TestStruct> = (0..10)
        .map(|i| TestStruct {
            a: "some value".to_string(),
            b: 10 + i as i64,
            c: -10 + i,
            d: 12 + i as i64,
            e: 13.21 + i as f32,
            f: -121.31 + i as f64,
            j: i % 2 == 0,
        })
        .collect();

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true).delimiter('|');
    for record in &records {
        encoder.write(record)?;
    }

    print!("{}", String::from_utf8_lossy(encoder.get_ref()));
    Ok(())
}
