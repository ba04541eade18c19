//! Max-salary reports over the canonical datasets.
//!
//! Both reports share one join chain: employees meet qualifications on the
//! person number, and the result meets salaries on the degree string. The
//! second join is by degree, not by person, so a degree held by anyone on
//! the roster pulls in every salary row filed under that degree. Inner joins
//! drop anything without a partner on either side.

use log::info;

use crate::{
    aggregate::group_max,
    dataset::Dataset,
    error::Result,
    join::inner_join,
    model::{
        DEGREE, DegreeSalary, MAX_SALARY, PERSONAL_NUMBER, POSITION, PositionDegreeSalary,
        QUAL_PERSONAL_NUMBER, SALARY,
    },
};

const EMP: &str = "emp";
const QUAL: &str = "qual";
const SAL: &str = "sal";

fn qualified(alias: &str, column: &str) -> String {
    format!("{alias}.{column}")
}

/// Employees ⋈ qualifications ⋈ salaries, with columns prefixed by
/// `emp.`, `qual.` and `sal.`.
pub fn join_for_report(
    employees: &Dataset,
    qualifications: &Dataset,
    salaries: &Dataset,
) -> Result<Dataset> {
    let emp = employees.qualified(EMP);
    let qual = qualifications.qualified(QUAL);
    let sal = salaries.qualified(SAL);

    let person_left = qualified(EMP, PERSONAL_NUMBER);
    let person_right = qualified(QUAL, QUAL_PERSONAL_NUMBER);
    let with_qualifications = inner_join(
        &emp,
        &qual,
        &[person_left.as_str()],
        &[person_right.as_str()],
    )?;

    let degree_left = qualified(QUAL, DEGREE);
    let degree_right = qualified(SAL, DEGREE);
    inner_join(
        &with_qualifications,
        &sal,
        &[degree_left.as_str()],
        &[degree_right.as_str()],
    )
}

/// Highest salary per qualification degree.
pub fn report_by_degree(
    employees: &Dataset,
    qualifications: &Dataset,
    salaries: &Dataset,
) -> Result<Vec<DegreeSalary>> {
    let joined = join_for_report(employees, qualifications, salaries)?;
    let degree = qualified(QUAL, DEGREE);
    let grouped = group_max(
        &joined,
        &[degree.as_str()],
        &qualified(SAL, SALARY),
        MAX_SALARY,
    )?;
    let rows = grouped
        .rows()
        .iter()
        .map(DegreeSalary::from_row)
        .collect::<Result<Vec<_>>>()?;
    info!(
        "Degree report: {} group(s) from {} joined row(s)",
        rows.len(),
        joined.len()
    );
    Ok(rows)
}

/// Highest salary per (salary-side position, qualification degree).
pub fn report_by_position_degree(
    employees: &Dataset,
    qualifications: &Dataset,
    salaries: &Dataset,
) -> Result<Vec<PositionDegreeSalary>> {
    let joined = join_for_report(employees, qualifications, salaries)?;
    let position = qualified(SAL, POSITION);
    let degree = qualified(QUAL, DEGREE);
    let grouped = group_max(
        &joined,
        &[position.as_str(), degree.as_str()],
        &qualified(SAL, SALARY),
        MAX_SALARY,
    )?;
    let rows = grouped
        .rows()
        .iter()
        .map(PositionDegreeSalary::from_row)
        .collect::<Result<Vec<_>>>()?;
    info!(
        "Position/degree report: {} group(s) from {} joined row(s)",
        rows.len(),
        joined.len()
    );
    Ok(rows)
}
