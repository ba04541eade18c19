#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use staff_reconcile::{
    data::Value,
    dataset::{Dataset, Row},
    model,
};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the three sources in their default layout.
    pub fn write_default_sources(&self) {
        self.write("source1.json", ROSTER_JSON);
        self.write("source2.csv", SALARY_CSV);
        self.write("source3", QUALIFICATION_TXT);
    }
}

pub const ROSTER_JSON: &str = r#"{"personal_number":1,"name":"Ann","position":"Engineer","degree":"BSc","salary":50000.0,"employee_number":100}
{"personal_number":1,"name":"Ann","position":"Engineer","degree":"BSc","salary":50000.0,"employee_number":100}
{"personal_number":2,"name":"Ben","position":"Analyst","degree":"MSc","salary":61000.0,"employee_number":101}
{"personal_number":3,"name":"Cid","position":"Manager","degree":"PhD","salary":90000.0,"employee_number":102}
"#;

pub const SALARY_CSV: &str = "personal_number,name,position,degree,salary,employee_number
1,Ann,Engineer,BSc,40000,100
4,Ann,Engineer,BSc,45000,100
2,Ben,Analyst,MSc,61000,101
2,Ben,Analyst,MSc,61000,101
5,Dee,Engineer,MSc,72000,103
6,Eve,Manager,PhD,99000,104
";

// Cid (3) has no qualification row, so PhD never reaches the report.
pub const QUALIFICATION_TXT: &str = "1 BSc Physics
1 BSc Physics
2 MSc Data Science
2 MSc Data Science
";

pub fn int(value: i64) -> Option<Value> {
    Some(Value::Integer(value))
}

pub fn float(value: f64) -> Option<Value> {
    Some(Value::Float(value))
}

pub fn text(value: &str) -> Option<Value> {
    Some(Value::String(value.to_string()))
}

/// A roster/salary row: (personal_number, name, position, degree, salary, employee_number).
pub fn employee_row(
    personal_number: i64,
    name: &str,
    position: &str,
    degree: &str,
    salary: f64,
    employee_number: i64,
) -> Row {
    vec![
        int(personal_number),
        text(name),
        text(position),
        text(degree),
        float(salary),
        int(employee_number),
    ]
}

pub fn employees(name: &str, rows: Vec<Row>) -> Dataset {
    Dataset::new(name, model::employee_schema(), rows).expect("employee dataset")
}

pub fn raw_qualifications(rows: Vec<Row>) -> Dataset {
    Dataset::new("emp_qualification", model::qualification_schema(), rows)
        .expect("qualification dataset")
}

pub fn cleaned_qualifications(rows: Vec<(i64, &str, &str)>) -> Dataset {
    Dataset::new(
        "cleaned_emp_qualification",
        model::cleaned_qualification_schema(),
        rows.into_iter()
            .map(|(pn, degree, specialisation)| vec![int(pn), text(degree), text(specialisation)])
            .collect(),
    )
    .expect("cleaned qualification dataset")
}
