//! Integration tests for the record encoder over in-memory and file sinks

use record_csv::{EncodeError, EncoderConfig, Record, RecordEncoder, WriteStage};
use serde::Serialize;

use std::fs::File;
use std::io::{self, Write};
use tempfile::tempdir;

#[derive(Debug, Clone, Record)]
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

/// Helper: the ten records of the reference scenario
fn reference_records() -> Vec<TestStruct> {
    (0..10)
        .map(|i| TestStruct {
            a: "some value".to_string(),
            b: 10 + i as i64,
            c: -10 + i,
            d: 12 + i as i64,
            e: 13.21 + i as f32,
            f: -121.31 + i as f64,
            j: i % 2 == 0,
        })
        .collect()
}

/// Test the full reference scenario: `|` delimiter, heading on, ten rows.
#[test]
fn test_reference_output() {
    let mut buf = Vec::new();
    {
        let mut encoder = RecordEncoder::new(&mut buf);
        encoder.write_heading(true).delimiter('|');
        for record in reference_records() {
            encoder.write(&record).expect("write should succeed");
        }
    }

    let out = String::from_utf8(buf).unwrap();
    let expected = "\
a_name|b_name|c_name|d_name|e_name|f_name|j_name
some value|10|-10|12|13.21|-121.31|true
some value|11|-9|13|14.21|-120.31|false
some value|12|-8|14|15.21|-119.31|true
some value|13|-7|15|16.21|-118.31|false
some value|14|-6|16|17.21|-117.31|true
some value|15|-5|17|18.21|-116.31|false
some value|16|-4|18|19.21|-115.31|true
some value|17|-3|19|20.21|-114.31|false
some value|18|-2|20|21.21|-113.31|true
some value|19|-1|21|22.21|-112.31|false
";
    assert_eq!(out, expected);
}

/// Test that rows parse back into the expected number of columns.
#[test]
fn test_rows_have_one_value_per_field() {
    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true).delimiter('|');
    for record in reference_records() {
        encoder.write(&record).unwrap();
    }
    let bytes = encoder.into_inner();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(true)
        .from_reader(bytes.as_slice());

    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 7);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 10);
    for row in &rows {
        assert_eq!(row.len(), 7);
    }
    assert_eq!(&rows[2][2], "-8");
}

/// Test writing to a file through a borrowed handle, then reading it back.
#[test]
fn test_file_sink() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.csv");

    {
        let mut file = File::create(&path).unwrap();
        let mut encoder = RecordEncoder::new(&mut file);
        encoder.write_heading(true);
        for record in reference_records().iter().take(3) {
            encoder.write(record).unwrap();
        }
        file.flush().unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "a_name,b_name,c_name,d_name,e_name,f_name,j_name");
    assert_eq!(lines[3], "some value,12,-8,14,15.21,-119.31,true");
}

/// Test that an encoder built from a loaded configuration behaves like the
/// chained setters.
#[test]
fn test_config_from_json() {
    let config: EncoderConfig =
        serde_json::from_str(r#"{ "delimiter": ";", "write_heading": true }"#).unwrap();
    assert_eq!(config.heading_field_delimiter, '.');

    let mut encoder = RecordEncoder::with_config(Vec::new(), config);
    encoder.write(&reference_records()[0]).unwrap();

    let out = String::from_utf8(encoder.into_inner()).unwrap();
    assert_eq!(
        out,
        "a_name;b_name;c_name;d_name;e_name;f_name;j_name\nsome value;10;-10;12;13.21;-121.31;true\n"
    );
}

/// Test that fields without a `csv` name map to an empty column name.
#[test]
fn test_untagged_fields_have_empty_names() {
    #[derive(Record)]
    struct Partly {
        #[csv(name = "tagged")]
        a: i32,
        untagged: i32,
    }

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);
    encoder.write(&Partly { a: 1, untagged: 2 }).unwrap();

    assert_eq!(encoder.column_names(), Some(&["tagged".to_string(), String::new()][..]));
    assert_eq!(encoder.into_inner(), b"tagged,\n1,2\n");
}

/// Test that a record with no annotations at all yields an all-empty heading.
#[test]
fn test_all_untagged_heading() {
    #[derive(Record)]
    struct Bare {
        x: u8,
        y: bool,
        z: &'static str,
    }

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true).delimiter('|');
    encoder.write(&Bare { x: 9, y: false, z: "z" }).unwrap();

    assert_eq!(encoder.into_inner(), b"||\n9|false|z\n");
}

/// Test that the derive handles tuple structs and generic fields.
#[test]
fn test_derived_tuple_and_generic_records() {
    #[derive(Record)]
    struct Pair(#[csv(name = "left")] i32, i32);

    #[derive(Record)]
    struct Labeled<T> {
        #[csv(name = "label")]
        label: String,
        #[csv(name = "value")]
        value: T,
    }

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);
    encoder.write(&Pair(-1, 2)).unwrap();
    assert_eq!(encoder.into_inner(), b"left,\n-1,2\n");

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);
    encoder
        .write(&Labeled {
            label: "pi".to_string(),
            value: 1.23456f64,
        })
        .unwrap();
    assert_eq!(encoder.into_inner(), b"label,value\npi,1.23\n");
}

/// Test that serde-derived records are named by their serde keys.
#[test]
fn test_serde_keys_name_serde_records() {
    #[derive(Serialize)]
    struct Keyed {
        #[serde(rename = "first")]
        one: u8,
        two: u8,
    }

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);
    encoder.write(&Keyed { one: 1, two: 2 }).unwrap();

    assert_eq!(encoder.into_inner(), b"first,two\n1,2\n");
}

/// Test that column names stay fixed after the first record, even when a
/// later record has a different shape.
#[test]
fn test_column_names_not_rederived() {
    #[derive(Record)]
    struct A {
        #[csv(name = "x")]
        x: i32,
        #[csv(name = "y")]
        y: i32,
    }

    #[derive(Record)]
    struct B {
        #[csv(name = "p")]
        p: i32,
        #[csv(name = "q")]
        q: i32,
        #[csv(name = "r")]
        r: i32,
    }

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);
    encoder.write(&A { x: 1, y: 2 }).unwrap();
    encoder.write(&B { p: 3, q: 4, r: 5 }).unwrap();

    assert_eq!(
        encoder.column_names(),
        Some(&["x".to_string(), "y".to_string()][..])
    );
    assert_eq!(encoder.stats().total_records, 2);
    assert_eq!(encoder.into_inner(), b"x,y\n1,2\n3,4,5\n");
}

/// Test that unsupported field types become empty values without failing.
#[test]
fn test_unsupported_fields_are_empty() {
    #[derive(Serialize)]
    struct Inner {
        x: i32,
    }

    #[derive(Serialize)]
    enum Status {
        Active,
    }

    #[derive(Serialize)]
    struct Outer {
        id: u32,
        inner: Inner,
        tags: Vec<&'static str>,
        status: Status,
        missing: Option<i32>,
        raw: (),
    }

    let mut encoder = RecordEncoder::new(Vec::new());
    let n = encoder
        .write(&Outer {
            id: 7,
            inner: Inner { x: 1 },
            tags: vec!["a", "b"],
            status: Status::Active,
            missing: None,
            raw: (),
        })
        .unwrap();

    let out = encoder.get_ref().clone();
    assert_eq!(out, b"7,,,,,\n");
    assert_eq!(n, out.len());
    assert_eq!(encoder.stats().empty_fields, 5);
}

/// Test that references and boxes are accepted in place of the record.
#[test]
fn test_pointer_records() {
    let record = reference_records().remove(0);
    let boxed: Box<TestStruct> = Box::new(record.clone());

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write(&record).unwrap();
    encoder.write(&&record).unwrap();
    encoder.write(&boxed).unwrap();
    encoder.write(&Some(record)).unwrap();

    let out = String::from_utf8(encoder.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().all(|l| *l == lines[0]));
}

/// Test that every non-struct kind is rejected and nothing reaches the sink.
#[test]
fn test_non_struct_values_are_rejected() {
    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);

    let cases: Vec<(Result<usize, EncodeError>, &str)> = vec![
        (encoder.write(&1i64), "i64"),
        (encoder.write(&1.5f64), "f64"),
        (encoder.write(&true), "bool"),
        (encoder.write("text"), "str"),
        (encoder.write(&vec![1, 2, 3]), "seq"),
        (encoder.write(&(1, 2)), "tuple"),
        (encoder.write(&()), "unit"),
        (encoder.write(&None::<TestStruct>), "none"),
    ];

    for (result, expected_kind) in cases {
        match result {
            Err(EncodeError::StructExpected { kind }) => assert_eq!(kind, expected_kind),
            other => panic!("expected StructExpected for {expected_kind}, got {other:?}"),
        }
    }

    assert!(encoder.get_ref().is_empty());
    assert!(!encoder.heading_written());
}

/// Test that a struct enum variant is accepted as a record.
#[test]
fn test_struct_variant_record() {
    #[derive(Serialize)]
    enum Event {
        Move {
            #[serde(rename = "dx")]
            dx: i32,
            #[serde(rename = "dy")]
            dy: i32,
        },
    }

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);
    encoder.write(&Event::Move { dx: 3, dy: -4 }).unwrap();

    assert_eq!(encoder.into_inner(), b"dx,dy\n3,-4\n");
}

/// A sink that fails every write.
struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Test that sink failures surface with the stage that failed.
#[test]
fn test_sink_errors_carry_stage() {
    let record = reference_records().remove(0);

    let mut encoder = RecordEncoder::new(ClosedSink);
    let err = encoder.write(&record).unwrap_err();
    assert_eq!(err.stage(), Some(WriteStage::Record));
    assert_eq!(err.to_string(), "write record: closed");

    let mut encoder = RecordEncoder::new(ClosedSink);
    encoder.write_heading(true);
    let err = encoder.write(&record).unwrap_err();
    assert_eq!(err.stage(), Some(WriteStage::Heading));
    assert_eq!(err.to_string(), "write heading: closed");
}

/// Test that a heading left unwritten by a failed attempt is retried on the
/// next call.
#[test]
fn test_heading_retried_after_failure() {
    struct FlakySink {
        fail_next: bool,
        written: Vec<u8>,
    }

    impl Write for FlakySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.fail_next {
                self.fail_next = false;
                return Err(io::Error::other("transient"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let record = reference_records().remove(0);
    let mut encoder = RecordEncoder::new(FlakySink {
        fail_next: true,
        written: Vec::new(),
    });
    encoder.write_heading(true);

    assert!(encoder.write(&record).is_err());
    encoder.write(&record).unwrap();

    let out = String::from_utf8(encoder.into_inner().written).unwrap();
    assert_eq!(out.lines().count(), 2);
    assert!(out.starts_with("a_name,"));
}

/// Test that the encoder logs through tracing without requiring a subscriber
/// configuration beyond the test writer.
#[test]
fn test_write_with_tracing_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let mut encoder = RecordEncoder::new(Vec::new());
    encoder.write_heading(true);
    encoder.write(&reference_records()[1]).unwrap();
    assert_eq!(encoder.stats().total_records, 1);
}
