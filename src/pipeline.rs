//! End-to-end reconciliation: load the three sources, clean them, and hand
//! back the canonical datasets as plain values.

use anyhow::{Context, Result};
use log::info;

use crate::{
    concat::with_concatenated,
    config::PipelineConfig,
    dataset::Dataset,
    dedup::dedup_dataset,
    error,
    loader::Loader,
    model::{
        DEGREE, DegreeSalary, EMPLOYEE_NUMBER, PERSONAL_NUMBER, PositionDegreeSalary,
        QUAL_PERSONAL_NUMBER, SPECIALISATION, SPECIALISATION_2, SPECIALISATION_3,
        SPECIALISATION_4,
    },
    rank::resolve_latest,
    report,
    sink::{Sink, SinkFormat},
};

pub const EMPLOYEES_TABLE: &str = "tbl_emp";
pub const SALARIES_TABLE: &str = "tbl_cleaned_emp_salary";
pub const QUALIFICATIONS_TABLE: &str = "tbl_cleaned_emp_qualification";

const SPECIALISATION_SEPARATOR: &str = " ";
const DERIVED_SPECIALISATION: &str = "specialisation_full";

/// The reconciled datasets every report reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDatasets {
    pub employees: Dataset,
    pub salaries: Dataset,
    pub qualifications: Dataset,
}

impl CanonicalDatasets {
    /// Builds the canonical datasets from already-loaded raw sources.
    pub fn from_raw(
        roster: &Dataset,
        salary: &Dataset,
        qualification: &Dataset,
    ) -> error::Result<Self> {
        Ok(Self {
            employees: clean_employees(roster),
            salaries: clean_salaries(salary)?,
            qualifications: clean_qualifications(qualification)?,
        })
    }

    pub fn report_by_degree(&self) -> error::Result<Vec<DegreeSalary>> {
        report::report_by_degree(&self.employees, &self.qualifications, &self.salaries)
    }

    pub fn report_by_position_degree(&self) -> error::Result<Vec<PositionDegreeSalary>> {
        report::report_by_position_degree(&self.employees, &self.qualifications, &self.salaries)
    }

    /// Writes all three datasets through `sink` under their table names.
    pub fn persist(&self, sink: &dyn Sink, format: SinkFormat) -> Result<()> {
        for (dataset, table) in [
            (&self.employees, EMPLOYEES_TABLE),
            (&self.salaries, SALARIES_TABLE),
            (&self.qualifications, QUALIFICATIONS_TABLE),
        ] {
            sink.persist(dataset, table, format)?;
        }
        Ok(())
    }
}

/// Loads every configured source through `loader` and reconciles them.
pub fn run(loader: &dyn Loader, config: &PipelineConfig) -> Result<CanonicalDatasets> {
    let roster = loader.load(&config.roster_spec()?)?;
    let salary = loader.load(&config.salary_spec()?)?;
    let qualification = loader.load(&config.qualification_spec()?)?;
    let canonical = CanonicalDatasets::from_raw(&roster, &salary, &qualification)
        .context("Reconciling loaded sources")?;
    info!(
        "Canonical datasets: {} employee(s), {} salary row(s), {} qualification(s)",
        canonical.employees.len(),
        canonical.salaries.len(),
        canonical.qualifications.len()
    );
    Ok(canonical)
}

pub fn clean_employees(roster: &Dataset) -> Dataset {
    let employees = dedup_dataset(roster).renamed(EMPLOYEES_TABLE);
    info!(
        "Employees: {} raw row(s), {} distinct",
        roster.len(),
        employees.len()
    );
    employees
}

/// Distinct rows, then the highest `personal_number` per `employee_number`
/// (all tied rows survive), then distinct again.
pub fn clean_salaries(salary: &Dataset) -> error::Result<Dataset> {
    let distinct = dedup_dataset(salary);
    let latest = resolve_latest(&distinct, EMPLOYEE_NUMBER, PERSONAL_NUMBER)?;
    let salaries = dedup_dataset(&latest).renamed(SALARIES_TABLE);
    info!(
        "Salaries: {} raw row(s), {} after latest-wins resolution",
        salary.len(),
        salaries.len()
    );
    Ok(salaries)
}

/// Projects `personalnumber`, `degree` (the first specialisation) and
/// `specialisation` (all four joined by single spaces, nulls as empty), then
/// keeps distinct rows.
pub fn clean_qualifications(qualification: &Dataset) -> error::Result<Dataset> {
    let distinct = dedup_dataset(qualification);
    let derived = with_concatenated(
        &distinct,
        DERIVED_SPECIALISATION,
        &[
            SPECIALISATION,
            SPECIALISATION_2,
            SPECIALISATION_3,
            SPECIALISATION_4,
        ],
        SPECIALISATION_SEPARATOR,
    )?;
    let projected = derived.select_as(&[
        (QUAL_PERSONAL_NUMBER, QUAL_PERSONAL_NUMBER),
        (SPECIALISATION, DEGREE),
        (DERIVED_SPECIALISATION, SPECIALISATION),
    ])?;
    let qualifications = dedup_dataset(&projected).renamed(QUALIFICATIONS_TABLE);
    info!(
        "Qualifications: {} raw row(s), {} distinct",
        qualification.len(),
        qualifications.len()
    );
    Ok(qualifications)
}
