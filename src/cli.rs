//! CLI mínima `esg <comando> [--flag valor]...`.
//!
//! Salida JSON en stdout. Códigos de salida:
//! - 2: uso incorrecto
//! - 3: entrada no parseable (uuid, fecha, JSON)
//! - 4: no encontrado, transición rechazada o validación
//! - 5: fallo del backend
use std::collections::HashMap;

use chrono::NaiveDate;
use esg_core::{CoreError, EsgStore, FormInput, ReportFilter, SubmissionIntent, SubmissionRequest, UserRepository};
use esg_domain::{EsgType, NewSite, ReportingPeriod};
use esg_persistence::PersistenceError;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::EsgApp;

pub const USAGE: &str = "\
Uso: esg <comando> [opciones]

  sites list
  sites add --name <TXT> [--location <TXT>] [--type <TXT>]
  sites delete --id <UUID>
  categories list [--type environmental|social|governance]
  categories add --name <TXT> --type <TIPO>
  categories delete --id <UUID>
  parameters list [--category <UUID>]
  parameters add --name <TXT> --category <UUID> [--unit <TXT>]
  parameters delete --id <UUID>
  structure
  submit --site <UUID> --month <1-12> --year <AAAA> --values '<JSON>' [--draft]
  submissions list|pending
  submissions show --id <UUID>
  approve --id <UUID>
  reject --id <UUID> --comment <TXT>
  report summary|series|table [--site <UUID>] [--from <AAAA-MM-DD>] [--to <AAAA-MM-DD>] [--fields a,b]
  users list";

const DEFAULT_SERIES_FIELDS: &[&str] = &["total_electricity", "renewable_ppa", "renewable_rooftop"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Summary,
    Series,
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    SitesList,
    SitesAdd { name: String, location: Option<String>, site_type: Option<String> },
    SitesDelete { id: Uuid },
    CategoriesList { esg_type: Option<EsgType> },
    CategoriesAdd { name: String, esg_type: EsgType },
    CategoriesDelete { id: Uuid },
    ParametersList { category: Option<Uuid> },
    ParametersAdd { name: String, unit: Option<String>, category: Uuid },
    ParametersDelete { id: Uuid },
    Structure,
    Submit { site: Uuid, year: i32, month: u32, values: FormInput, draft: bool },
    SubmissionsList,
    SubmissionsPending,
    SubmissionsShow { id: Uuid },
    Approve { id: Uuid },
    Reject { id: Uuid, comment: String },
    Report { kind: ReportKind, filter: ReportFilter, fields: Vec<String> },
    UsersList,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("entrada inválida: {0}")]
    Parse(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            CliError::Parse(_) => 3,
            CliError::Core(CoreError::Storage(_)) | CliError::Persistence(_) => 5,
            CliError::Core(_) => 4,
        }
    }
}

// Flags `--nombre valor`; `--draft` es el único flag sin valor.
struct Flags(HashMap<String, Option<String>>);

impl Flags {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let mut flags = HashMap::new();
        let mut i = 0;
        while i < args.len() {
            let Some(name) = args[i].strip_prefix("--") else {
                return Err(CliError::Usage(format!("argumento inesperado: {}", args[i])));
            };
            if name == "draft" {
                flags.insert(name.to_string(), None);
                i += 1;
                continue;
            }
            let value = args.get(i + 1)
                            .filter(|v| !v.starts_with("--"))
                            .ok_or_else(|| CliError::Usage(format!("--{name} requiere un valor")))?;
            flags.insert(name.to_string(), Some(value.clone()));
            i += 2;
        }
        Ok(Self(flags))
    }

    fn opt(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned().flatten()
    }

    fn req(&self, name: &str) -> Result<String, CliError> {
        self.opt(name).ok_or_else(|| CliError::Usage(format!("falta --{name}")))
    }

    fn switch(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    fn uuid(&self, name: &str) -> Result<Option<Uuid>, CliError> {
        self.opt(name)
            .map(|v| Uuid::parse_str(&v).map_err(|e| CliError::Parse(format!("--{name}: {e}"))))
            .transpose()
    }

    fn req_uuid(&self, name: &str) -> Result<Uuid, CliError> {
        self.uuid(name)?.ok_or_else(|| CliError::Usage(format!("falta --{name}")))
    }

    fn date(&self, name: &str) -> Result<Option<NaiveDate>, CliError> {
        self.opt(name)
            .map(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d").map_err(|e| CliError::Parse(format!("--{name}: {e}"))))
            .transpose()
    }

    fn number<T: std::str::FromStr>(&self, name: &str) -> Result<T, CliError> {
        let raw = self.req(name)?;
        raw.parse().map_err(|_| CliError::Parse(format!("--{name}: '{raw}' no es un número")))
    }

    fn esg_type(&self, name: &str) -> Result<Option<EsgType>, CliError> {
        self.opt(name)
            .map(|v| v.parse::<EsgType>().map_err(|e| CliError::Parse(e.to_string())))
            .transpose()
    }
}

/// Parsea los argumentos (sin el nombre del binario).
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let words: Vec<&str> = args.iter().take_while(|a| !a.starts_with("--")).map(String::as_str).collect();
    let flags = Flags::parse(&args[words.len()..])?;
    let command = match words.as_slice() {
        [] | ["help"] => Command::Help,
        ["sites", "list"] => Command::SitesList,
        ["sites", "add"] => Command::SitesAdd { name: flags.req("name")?,
                                                location: flags.opt("location"),
                                                site_type: flags.opt("type") },
        ["sites", "delete"] => Command::SitesDelete { id: flags.req_uuid("id")? },
        ["categories", "list"] => Command::CategoriesList { esg_type: flags.esg_type("type")? },
        ["categories", "add"] => {
            let esg_type = flags.esg_type("type")?.ok_or_else(|| CliError::Usage("falta --type".into()))?;
            Command::CategoriesAdd { name: flags.req("name")?, esg_type }
        }
        ["categories", "delete"] => Command::CategoriesDelete { id: flags.req_uuid("id")? },
        ["parameters", "list"] => Command::ParametersList { category: flags.uuid("category")? },
        ["parameters", "add"] => Command::ParametersAdd { name: flags.req("name")?,
                                                          unit: flags.opt("unit"),
                                                          category: flags.req_uuid("category")? },
        ["parameters", "delete"] => Command::ParametersDelete { id: flags.req_uuid("id")? },
        ["structure"] => Command::Structure,
        ["submit"] => {
            let raw = flags.req("values")?;
            let values: FormInput =
                serde_json::from_str(&raw).map_err(|e| CliError::Parse(format!("--values: {e}")))?;
            Command::Submit { site: flags.req_uuid("site")?,
                              year: flags.number("year")?,
                              month: flags.number("month")?,
                              values,
                              draft: flags.switch("draft") }
        }
        ["submissions", "list"] => Command::SubmissionsList,
        ["submissions", "pending"] => Command::SubmissionsPending,
        ["submissions", "show"] => Command::SubmissionsShow { id: flags.req_uuid("id")? },
        ["approve"] => Command::Approve { id: flags.req_uuid("id")? },
        ["reject"] => Command::Reject { id: flags.req_uuid("id")?, comment: flags.req("comment")? },
        ["report", kind] => {
            let kind = match *kind {
                "summary" => ReportKind::Summary,
                "series" => ReportKind::Series,
                "table" => ReportKind::Table,
                other => return Err(CliError::Usage(format!("reporte desconocido: {other}"))),
            };
            let fields: Vec<String> = match flags.opt("fields") {
                Some(raw) => raw.split(',').map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect(),
                None => DEFAULT_SERIES_FIELDS.iter().map(|f| f.to_string()).collect(),
            };
            if let Some(unknown) = fields.iter().find(|f| !EsgType::ALL.iter().any(|t| t.has_column(f))) {
                return Err(CliError::Parse(format!("--fields: columna desconocida '{unknown}'")));
            }
            Command::Report { kind,
                              filter: ReportFilter { site_id: flags.uuid("site")?,
                                                     from: flags.date("from")?,
                                                     to: flags.date("to")? },
                              fields }
        }
        ["users", "list"] => Command::UsersList,
        other => return Err(CliError::Usage(format!("comando desconocido: {}", other.join(" ")))),
    };
    Ok(command)
}

/// Ejecuta un comando contra la aplicación y devuelve la salida JSON.
pub fn run<S: EsgStore, U: UserRepository>(app: &EsgApp<S, U>, command: Command) -> Result<Value, CliError> {
    let out = match command {
        Command::Help => json!({ "usage": USAGE }),
        Command::SitesList => json!(app.store().list_sites()?),
        Command::SitesAdd { name, location, site_type } => {
            if name.trim().is_empty() {
                return Err(CoreError::Validation("site name is required".into()).into());
            }
            json!(app.store().insert_site(NewSite { name: name.trim().to_string(), location, site_type })?)
        }
        Command::SitesDelete { id } => {
            app.store().delete_site(id)?;
            json!({ "deleted": id })
        }
        Command::CategoriesList { esg_type } => json!(app.catalog().list_categories(esg_type)?),
        Command::CategoriesAdd { name, esg_type } => json!(app.catalog().add_category(&name, esg_type)?),
        Command::CategoriesDelete { id } => {
            app.catalog().remove_category(id)?;
            json!({ "deleted": id })
        }
        Command::ParametersList { category } => json!(app.catalog().list_parameters(category)?),
        Command::ParametersAdd { name, unit, category } => {
            json!(app.catalog().add_parameter(&name, unit.as_deref(), category)?)
        }
        Command::ParametersDelete { id } => {
            app.catalog().remove_parameter(id)?;
            json!({ "deleted": id })
        }
        Command::Structure => {
            let structure = app.catalog().build_structure()?;
            json!({
                "categories": structure.category_count(),
                "parameters": structure.parameter_count(),
                "duplicate_names": structure.duplicate_names(),
                "structure": structure,
            })
        }
        Command::Submit { site, year, month, values, draft } => {
            let period = ReportingPeriod::for_month(year, month).map_err(CoreError::from)?;
            let intent = if draft { SubmissionIntent::SaveDraft } else { SubmissionIntent::SubmitForApproval };
            let request = SubmissionRequest { site_id: site,
                                              period,
                                              submitted_by: app.current_user().to_string(),
                                              intent };
            let id = app.submissions().submit_form(&request, &values)?;
            json!({ "id": id, "status": intent.initial_status(), "period": period.label() })
        }
        Command::SubmissionsList => json!(app.submissions().list()?),
        Command::SubmissionsPending => json!(app.submissions().pending()?),
        Command::SubmissionsShow { id } => json!(app.submissions().details(id)?),
        Command::Approve { id } => {
            let reviewer = app.reviewer()?;
            json!(app.submissions().approve(id, &reviewer.email)?)
        }
        Command::Reject { id, comment } => {
            let reviewer = app.reviewer()?;
            json!(app.submissions().reject(id, &reviewer.email, &comment)?)
        }
        Command::Report { kind, filter, fields } => {
            let reports = app.reports();
            match kind {
                ReportKind::Summary => json!(reports.summary(&filter)?),
                ReportKind::Series => {
                    let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                    json!(reports.series(&filter, &fields)?)
                }
                ReportKind::Table => json!(reports.table(&filter)?),
            }
        }
        Command::UsersList => json!(app.users().list_users()?),
    };
    Ok(out)
}
