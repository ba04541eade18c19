mod common;

use std::path::PathBuf;

use common::{TestWorkspace, float, int, text};
use staff_reconcile::{
    config::PipelineConfig,
    error::PipelineError,
    loader::{FileLoader, LoadOptions, Loader, SourceFormat, SourceSpec},
    model,
    pipeline,
};

fn salary_spec(location: &str) -> SourceSpec {
    SourceSpec {
        name: "emp_salary".to_string(),
        location: PathBuf::from(location),
        format: SourceFormat::Csv,
        options: LoadOptions::default(),
        schema: model::employee_schema(),
    }
}

fn schema_mismatch(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<PipelineError>(),
        Some(PipelineError::SchemaMismatch { .. })
    )
}

#[test]
fn csv_with_header_loads_typed_rows() {
    let workspace = TestWorkspace::new();
    workspace.write("source2.csv", common::SALARY_CSV);
    let loader = FileLoader::new(workspace.path());

    let dataset = loader.load(&salary_spec("source2.csv")).expect("load");
    assert_eq!(dataset.name(), "emp_salary");
    assert_eq!(dataset.len(), 6);
    assert_eq!(
        dataset.rows()[0],
        vec![
            int(1),
            text("Ann"),
            text("Engineer"),
            text("BSc"),
            float(40000.0),
            int(100)
        ]
    );
}

#[test]
fn csv_header_mismatch_is_a_schema_mismatch() {
    let workspace = TestWorkspace::new();
    workspace.write(
        "salary.csv",
        "personal_number,name,role,degree,salary,employee_number\n1,Ann,Eng,BSc,1,100\n",
    );
    let loader = FileLoader::new(workspace.path());
    let err = loader.load(&salary_spec("salary.csv")).unwrap_err();
    assert!(schema_mismatch(&err), "unexpected error: {err:#}");
    assert!(format!("{err:#}").contains("expected 'position' but found 'role'"));
}

#[test]
fn unparsable_number_is_a_schema_mismatch() {
    let workspace = TestWorkspace::new();
    workspace.write(
        "salary.csv",
        "personal_number,name,position,degree,salary,employee_number\n1,Ann,Eng,BSc,lots,100\n",
    );
    let loader = FileLoader::new(workspace.path());
    let err = loader.load(&salary_spec("salary.csv")).unwrap_err();
    assert!(schema_mismatch(&err));
    assert!(format!("{err:#}").contains("column 'salary'"));
}

#[test]
fn error_line_accounts_for_multiline_quoted_fields() {
    let workspace = TestWorkspace::new();
    workspace.write(
        "salary.csv",
        "personal_number,name,position,degree,salary,employee_number\n\
         1,\"Ann\nSmith\",Eng,BSc,1,100\n\
         2,Ben,Eng,BSc,lots,101\n",
    );
    let loader = FileLoader::new(workspace.path());
    let err = loader.load(&salary_spec("salary.csv")).unwrap_err();
    assert!(schema_mismatch(&err));
    assert!(
        format!("{err:#}").contains("line 4 column 'salary'"),
        "unexpected error: {err:#}"
    );
}

#[test]
fn headerless_space_delimited_rows_fill_missing_fields_with_null() {
    let workspace = TestWorkspace::new();
    workspace.write("source3", "1 BSc Physics\n2 MSc Data Science Ethics\n");
    let loader = FileLoader::new(workspace.path());
    let spec = PipelineConfig::default()
        .qualification_spec()
        .expect("qualification spec");

    let dataset = loader.load(&spec).expect("load");
    assert_eq!(
        dataset.rows().to_vec(),
        vec![
            vec![int(1), text("BSc"), text("Physics"), None, None],
            vec![
                int(2),
                text("MSc"),
                text("Data"),
                text("Science"),
                text("Ethics")
            ],
        ]
    );
}

#[test]
fn json_lines_map_fields_by_name() {
    let workspace = TestWorkspace::new();
    workspace.write(
        "source1.json",
        "{\"employee_number\":5,\"personal_number\":9,\"name\":\"Kim\",\"salary\":70000}\n\n",
    );
    let loader = FileLoader::new(workspace.path());
    let spec = PipelineConfig::default().roster_spec().expect("roster spec");

    let dataset = loader.load(&spec).expect("load");
    assert_eq!(
        dataset.rows().to_vec(),
        vec![vec![int(9), text("Kim"), None, None, float(70000.0), int(5)]]
    );
}

#[test]
fn json_type_mismatch_is_a_schema_mismatch() {
    let workspace = TestWorkspace::new();
    workspace.write("source1.json", "{\"personal_number\":\"nine\"}\n");
    let loader = FileLoader::new(workspace.path());
    let spec = PipelineConfig::default().roster_spec().expect("roster spec");
    let err = loader.load(&spec).unwrap_err();
    assert!(schema_mismatch(&err));
}

#[test]
fn missing_file_reports_its_path() {
    let workspace = TestWorkspace::new();
    let loader = FileLoader::new(workspace.path());
    let err = loader.load(&salary_spec("nowhere.csv")).unwrap_err();
    assert!(format!("{err:#}").contains("nowhere.csv"));
}

#[test]
fn pipeline_run_reconciles_default_sources() {
    let workspace = TestWorkspace::new();
    workspace.write_default_sources();
    let loader = FileLoader::new(workspace.path());

    let canonical = pipeline::run(&loader, &PipelineConfig::default()).expect("pipeline");
    assert_eq!(canonical.employees.len(), 3);
    assert_eq!(canonical.salaries.len(), 4);
    assert_eq!(canonical.qualifications.len(), 2);
    assert_eq!(
        canonical.qualifications.rows()[0],
        vec![int(1), text("BSc"), text("BSc Physics  ")]
    );

    let degrees = canonical
        .report_by_degree()
        .expect("report")
        .into_iter()
        .map(|row| (row.degree, row.max_salary))
        .collect::<Vec<_>>();
    assert_eq!(
        degrees,
        vec![
            ("BSc".to_string(), Some(45000.0)),
            ("MSc".to_string(), Some(72000.0))
        ]
    );
}
