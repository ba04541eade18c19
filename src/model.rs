//! Column layouts of the raw sources, the canonical tables, and the report
//! rows.

use crate::{
    data::Value,
    dataset::Row,
    error::{PipelineError, Result},
    schema::{ColumnType, Schema},
};

pub const PERSONAL_NUMBER: &str = "personal_number";
pub const NAME: &str = "name";
pub const POSITION: &str = "position";
pub const DEGREE: &str = "degree";
pub const SALARY: &str = "salary";
pub const EMPLOYEE_NUMBER: &str = "employee_number";

pub const QUAL_PERSONAL_NUMBER: &str = "personalnumber";
pub const SPECIALISATION: &str = "specialisation";
pub const SPECIALISATION_2: &str = "specialisation2";
pub const SPECIALISATION_3: &str = "specialisation3";
pub const SPECIALISATION_4: &str = "specialisation4";

pub const MAX_SALARY: &str = "max_salary";

/// Roster and salary sources share one shape.
pub fn employee_schema() -> Schema {
    Schema::of(&[
        (PERSONAL_NUMBER, ColumnType::Integer),
        (NAME, ColumnType::String),
        (POSITION, ColumnType::String),
        (DEGREE, ColumnType::String),
        (SALARY, ColumnType::Float),
        (EMPLOYEE_NUMBER, ColumnType::Integer),
    ])
}

pub fn qualification_schema() -> Schema {
    Schema::of(&[
        (QUAL_PERSONAL_NUMBER, ColumnType::Integer),
        (SPECIALISATION, ColumnType::String),
        (SPECIALISATION_2, ColumnType::String),
        (SPECIALISATION_3, ColumnType::String),
        (SPECIALISATION_4, ColumnType::String),
    ])
}

pub fn cleaned_qualification_schema() -> Schema {
    Schema::of(&[
        (QUAL_PERSONAL_NUMBER, ColumnType::Integer),
        (DEGREE, ColumnType::String),
        (SPECIALISATION, ColumnType::String),
    ])
}

/// One row of the max-salary-per-degree report.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeSalary {
    pub max_salary: Option<f64>,
    pub degree: String,
}

/// One row of the max-salary-per-position-and-degree report.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionDegreeSalary {
    pub max_salary: Option<f64>,
    pub position: Option<String>,
    pub degree: String,
}

impl DegreeSalary {
    pub const HEADERS: [&'static str; 2] = [MAX_SALARY, DEGREE];

    /// Reads a `[max_salary, degree]` row.
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            max_salary: float_cell(row, 0),
            degree: required_text(row, 1, DEGREE)?,
        })
    }

    pub fn to_record(&self) -> Vec<String> {
        vec![format_salary(self.max_salary), self.degree.clone()]
    }
}

impl PositionDegreeSalary {
    pub const HEADERS: [&'static str; 3] = [MAX_SALARY, POSITION, DEGREE];

    /// Reads a `[max_salary, position, degree]` row.
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            max_salary: float_cell(row, 0),
            position: text_cell(row, 1),
            degree: required_text(row, 2, DEGREE)?,
        })
    }

    pub fn to_record(&self) -> Vec<String> {
        vec![
            format_salary(self.max_salary),
            self.position.clone().unwrap_or_default(),
            self.degree.clone(),
        ]
    }
}

fn float_cell(row: &Row, idx: usize) -> Option<f64> {
    row.get(idx).and_then(|cell| cell.as_ref()).and_then(Value::as_f64)
}

fn text_cell(row: &Row, idx: usize) -> Option<String> {
    row.get(idx)
        .and_then(|cell| cell.as_ref())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn required_text(row: &Row, idx: usize, column: &str) -> Result<String> {
    text_cell(row, idx).ok_or_else(|| {
        PipelineError::schema_mismatch("report", format!("row is missing '{column}'"))
    })
}

fn format_salary(value: Option<f64>) -> String {
    value
        .map(|salary| Value::Float(salary).as_display())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_salary_reads_report_row() {
        let row: Row = vec![
            Some(Value::Float(50000.0)),
            Some(Value::String("BSc".into())),
        ];
        let parsed = DegreeSalary::from_row(&row).unwrap();
        assert_eq!(
            parsed,
            DegreeSalary {
                max_salary: Some(50000.0),
                degree: "BSc".into()
            }
        );
        assert_eq!(parsed.to_record(), vec!["50000", "BSc"]);
    }

    #[test]
    fn position_is_optional_but_degree_is_not() {
        let row: Row = vec![None, None, Some(Value::String("MSc".into()))];
        let parsed = PositionDegreeSalary::from_row(&row).unwrap();
        assert_eq!(parsed.position, None);
        assert_eq!(parsed.to_record(), vec!["", "", "MSc"]);

        let missing: Row = vec![None, None, None];
        assert!(PositionDegreeSalary::from_row(&missing).is_err());
    }
}
