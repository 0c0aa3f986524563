#![allow(missing_docs)]

use std::fs;

use invar_ingest::{CsvOptions, IngestError, read_csv_frame};
use polars::prelude::DataType;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_read_csv_infers_types() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "data.csv", "x,w,y,flag\n1,0.5,a,true\n2,,b,false\n3,1.5,,true\n");

    let df = read_csv_frame(&path, &CsvOptions::default()).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 4);
    assert_eq!(df.column("x").unwrap().dtype(), &DataType::Int64);
    assert_eq!(df.column("w").unwrap().dtype(), &DataType::Float64);
    assert_eq!(df.column("y").unwrap().dtype(), &DataType::String);
    assert_eq!(df.column("flag").unwrap().dtype(), &DataType::Boolean);
    assert_eq!(df.column("w").unwrap().null_count(), 1);
}

#[test]
fn test_read_tsv_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "data.tsv", "a\tb\n1\thello world\n");

    let df = read_csv_frame(&path, &CsvOptions::default()).unwrap();
    assert_eq!(df.width(), 2);
    assert_eq!(df.column("b").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_explicit_delimiter() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "data.dat", "a;b\n1;2\n");

    let df = read_csv_frame(&path, &CsvOptions::new().with_delimiter(b';')).unwrap();
    assert_eq!(df.width(), 2);
    assert_eq!(df.column("b").unwrap().dtype(), &DataType::Int64);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = read_csv_frame(&dir.path().join("absent.csv"), &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn test_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "data.json", "{}");
    let err = read_csv_frame(&path, &CsvOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedExtension { ref extension, .. } if extension == "json"));
}
