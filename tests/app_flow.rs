//! Flujo completo sobre el store en memoria: catálogo -> envío -> revisión
//! -> reportes, pasando por el parseo y la ejecución de comandos.

use esgflow::cli::{parse_args, run, CliError};
use esgflow::config::AppConfig;
use esgflow::EsgApp;
use esg_core::{CoreError, EsgStore, InMemoryEsgStore, InMemoryUserRepository, UserRepository, UserRole};
use serde_json::Value;

fn exec<S: EsgStore, U: UserRepository>(app: &EsgApp<S, U>, argv: &[&str]) -> Result<Value, CliError> {
    let args: Vec<String> = argv.iter().map(|s| s.to_string()).collect();
    run(app, parse_args(&args)?)
}

fn id_of(v: &Value) -> String {
    v["id"].as_str().expect("id").to_string()
}

fn app() -> EsgApp<InMemoryEsgStore> {
    EsgApp::in_memory(&AppConfig::from_values(Some("reviewer@esg.local".into()), None))
}

#[test]
fn submit_review_and_report() {
    let app = app();
    let site = id_of(&exec(&app, &["sites", "add", "--name", "Pune Plant", "--location", "Pune"]).unwrap());
    let energy = id_of(&exec(&app, &["categories", "add", "--name", "Energy", "--type", "environmental"]).unwrap());
    let total = id_of(&exec(&app,
                            &["parameters", "add", "--name", "Total Electricity", "--unit", "kWh", "--category",
                              &energy]).unwrap());
    let ppa = id_of(&exec(&app, &["parameters", "add", "--name", "Renewable PPA", "--category", &energy]).unwrap());

    let structure = exec(&app, &["structure"]).unwrap();
    assert_eq!(structure["parameters"], 2);
    assert_eq!(structure["categories"], 1);

    let values = format!(r#"{{"{total}": "1500", "{ppa}": 300}}"#);
    let submitted =
        exec(&app, &["submit", "--site", &site, "--month", "2", "--year", "2024", "--values", &values]).unwrap();
    assert_eq!(submitted["status"], "pending");
    assert_eq!(submitted["period"], "Feb'24");
    let submission = id_of(&submitted);

    let pending = exec(&app, &["submissions", "pending"]).unwrap();
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["site_name"], "Pune Plant");

    // sin aprobar todavía: los reportes están vacíos
    let summary = exec(&app, &["report", "summary"]).unwrap();
    assert_eq!(summary["approved_submissions"], 0);

    let approved = exec(&app, &["approve", "--id", &submission]).unwrap();
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["reviewer"], "reviewer@esg.local");
    assert!(approved["review_comment"].is_null());

    let summary = exec(&app, &["report", "summary", "--site", &site]).unwrap();
    assert_eq!(summary["approved_submissions"], 1);
    assert_eq!(summary["total_electricity"], 1500.0);
    assert_eq!(summary["renewable_percentage"], 20.0);

    let series = exec(&app, &["report", "series", "--fields", "total_electricity"]).unwrap();
    assert_eq!(series[0]["label"], "Feb'24");
    assert_eq!(series[0]["total_electricity"], 1500.0);

    let details = exec(&app, &["submissions", "show", "--id", &submission]).unwrap();
    assert_eq!(details["environmental"]["renewable_ppa"], 300.0);
}

#[test]
fn reviewing_twice_is_rejected_with_exit_code_4() {
    let app = app();
    let site = id_of(&exec(&app, &["sites", "add", "--name", "Chennai DC"]).unwrap());
    let board = id_of(&exec(&app, &["categories", "add", "--name", "Board", "--type", "governance"]).unwrap());
    let members = id_of(&exec(&app, &["parameters", "add", "--name", "Board Members", "--category", &board]).unwrap());
    let values = format!(r#"{{"{members}": 9}}"#);
    let id = id_of(&exec(&app, &["submit", "--site", &site, "--month", "1", "--year", "2024", "--values", &values])
                  .unwrap());

    let err = exec(&app, &["reject", "--id", &id, "--comment", " "]).unwrap_err();
    assert_eq!(err.exit_code(), 4);

    exec(&app, &["reject", "--id", &id, "--comment", "incompleto"]).unwrap();
    let err = exec(&app, &["approve", "--id", &id]).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains("rejected"));
}

#[test]
fn drafts_stay_out_of_the_approval_queue() {
    let app = app();
    let site = id_of(&exec(&app, &["sites", "add", "--name", "Pune Plant"]).unwrap());
    let workforce = id_of(&exec(&app, &["categories", "add", "--name", "Workforce", "--type", "social"]).unwrap());
    let total = id_of(&exec(&app, &["parameters", "add", "--name", "Total Employees", "--category", &workforce])
                          .unwrap());
    let values = format!(r#"{{"{total}": "120"}}"#);
    let draft = exec(&app,
                     &["submit", "--site", &site, "--month", "3", "--year", "2024", "--values", &values, "--draft"]).unwrap();
    assert_eq!(draft["status"], "draft");
    assert!(exec(&app, &["submissions", "pending"]).unwrap().as_array().unwrap().is_empty());
    assert_eq!(exec(&app, &["submissions", "list"]).unwrap().as_array().unwrap().len(), 1);
}

#[test]
fn catalog_errors_map_to_exit_codes() {
    let app = app();
    let energy = id_of(&exec(&app, &["categories", "add", "--name", "Energy", "--type", "environmental"]).unwrap());
    // nombre sin columna declarada
    let err = exec(&app, &["parameters", "add", "--name", "Solar Thermal", "--category", &energy]).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    // tipo desconocido
    let err = exec(&app, &["categories", "add", "--name", "X", "--type", "economic"]).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    // JSON inválido
    let site = id_of(&exec(&app, &["sites", "add", "--name", "Pune Plant"]).unwrap());
    let err = exec(&app, &["submit", "--site", &site, "--month", "1", "--year", "2024", "--values", "{"]).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    // mes fuera de rango
    let err = exec(&app, &["submit", "--site", &site, "--month", "13", "--year", "2024", "--values", "{}"]).unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[test]
fn current_user_is_listed_as_admin() {
    let app = app();
    let users = exec(&app, &["users", "list"]).unwrap();
    assert_eq!(users[0]["email"], "reviewer@esg.local");
    assert_eq!(users[0]["role"], "admin");
}

#[test]
fn injected_directory_decides_who_can_review() {
    let config = AppConfig::from_values(Some("ana@plant.io".into()), None);
    let users = InMemoryUserRepository::new();
    users.add_user("Ana", "ana@plant.io", UserRole::Submitter).unwrap();
    let app = EsgApp::new(InMemoryEsgStore::new(), users, &config);

    let site = id_of(&exec(&app, &["sites", "add", "--name", "Pune Plant"]).unwrap());
    let board = id_of(&exec(&app, &["categories", "add", "--name", "Board", "--type", "governance"]).unwrap());
    let members = id_of(&exec(&app, &["parameters", "add", "--name", "Board Members", "--category", &board]).unwrap());
    let values = format!(r#"{{"{members}": 7}}"#);
    let id = id_of(&exec(&app, &["submit", "--site", &site, "--month", "5", "--year", "2024", "--values", &values])
                  .unwrap());

    // un submitter puede enviar pero no revisar
    let err = exec(&app, &["approve", "--id", &id]).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert_eq!(exec(&app, &["submissions", "pending"]).unwrap().as_array().unwrap().len(), 1);

    let listed = exec(&app, &["users", "list"]).unwrap();
    assert_eq!(listed[0]["role"], "submitter");

    // fuera del directorio tampoco puede revisar
    let stranger = EsgApp::new(InMemoryEsgStore::new(),
                               InMemoryUserRepository::new(),
                               &AppConfig::from_values(Some("ravi@plant.io".into()), None));
    assert!(matches!(stranger.reviewer(), Err(CoreError::Validation(_))));
}
