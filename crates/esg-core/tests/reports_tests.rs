mod support;

use chrono::NaiveDate;
use esg_core::{CoreError, EsgStore, FormInput, FormValue, ReportFilter, Reports, SubmissionIntent,
               SubmissionLifecycle, SubmissionRequest};
use esg_domain::{NewSite, ReportingPeriod};
use uuid::Uuid;

fn submit(s: &support::Seeded,
          site_id: Uuid,
          month: u32,
          values: &[(&str, &str)],
          intent: SubmissionIntent)
          -> Result<Uuid, CoreError> {
    let form: FormInput = values.iter()
                                .map(|(name, v)| (s.param(name).id, FormValue::from(*v)))
                                .collect();
    let request = SubmissionRequest { site_id,
                                      period: ReportingPeriod::for_month(2024, month).unwrap(),
                                      submitted_by: "ana@plant.io".into(),
                                      intent };
    SubmissionLifecycle::new(&s.store).submit_form(&request, &form)
}

fn approved(s: &support::Seeded, site_id: Uuid, month: u32, values: &[(&str, &str)]) -> Uuid {
    let id = submit(s, site_id, month, values, SubmissionIntent::SubmitForApproval).unwrap();
    SubmissionLifecycle::new(&s.store).approve(id, "reviewer@esg.local").unwrap();
    id
}

#[test]
fn only_approved_submissions_are_aggregated() {
    let s = support::seeded();
    approved(&s,
             s.site.id,
             1,
             &[("Total Electricity", "1000"), ("Renewable PPA", "200"), ("Renewable Rooftop", "50")]);
    approved(&s,
             s.site.id,
             2,
             &[("Total Electricity", "1000"), ("Renewable PPA", "250"), ("Total Employees", "80")]);
    // pendiente y borrador no cuentan
    submit(&s,
           s.site.id,
           3,
           &[("Total Electricity", "5000"), ("Renewable PPA", "5000")],
           SubmissionIntent::SubmitForApproval).unwrap();
    submit(&s, s.site.id, 4, &[("Total Electricity", "7000")], SubmissionIntent::SaveDraft).unwrap();

    let summary = Reports::new(&s.store).summary(&ReportFilter::default()).unwrap();
    assert_eq!(summary.approved_submissions, 2);
    assert_eq!(summary.sites, 1);
    assert_eq!(summary.total_electricity, 2000.0);
    assert_eq!(summary.renewable_percentage, 25.0);
    assert_eq!(summary.total_employees, 80.0);
}

#[test]
fn renewable_percentage_is_zero_without_electricity() {
    let s = support::seeded();
    approved(&s, s.site.id, 1, &[("Renewable PPA", "100")]);
    let summary = Reports::new(&s.store).summary(&ReportFilter::default()).unwrap();
    assert_eq!(summary.renewable_percentage, 0.0);
}

#[test]
fn fugitive_emissions_sum_refrigerants() {
    let s = support::seeded();
    approved(&s, s.site.id, 1, &[("R22", "1"), ("R32", "2"), ("R410", "3")]);
    approved(&s, s.site.id, 2, &[("R134A", "4"), ("R514A", "5"), ("CO2", "6")]);

    let summary = Reports::new(&s.store).summary(&ReportFilter::default()).unwrap();
    let f = summary.fugitive_emissions;
    assert_eq!((f.r22, f.r32, f.r410, f.r134a, f.r514a, f.co2), (1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
    assert_eq!(f.total, 21.0);
    // 1*1810 + 2*675 + 3*2088 + 4*1430 + 5*2 + 6*1 = 15160 kgCO2e
    assert!((summary.fugitive_emissions_tco2e - 15.16).abs() < 1e-9);
}

#[test]
fn series_is_sorted_by_period_with_short_labels() {
    let s = support::seeded();
    approved(&s, s.site.id, 3, &[("Total Electricity", "300")]);
    approved(&s, s.site.id, 1, &[("Total Electricity", "100")]);
    approved(&s, s.site.id, 2, &[("Total Electricity", "200"), ("Total Employees", "40")]);

    let series = Reports::new(&s.store).series(&ReportFilter::default(), &["total_electricity", "total_employees"])
                                       .unwrap();
    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Jan'24", "Feb'24", "Mar'24"]);
    assert_eq!(series[1].values["total_electricity"], 200.0);
    assert_eq!(series[1].values["total_employees"], 40.0);
    assert_eq!(series[0].values["total_employees"], 0.0);
    assert_eq!(series[0].site_name, "Pune Plant");

    let json = serde_json::to_value(&series[1]).unwrap();
    assert_eq!(json["label"], "Feb'24");
    assert_eq!(json["total_electricity"], 200.0);
}

#[test]
fn filters_by_site_and_date_range() {
    let s = support::seeded();
    let other = s.store
                 .insert_site(NewSite { name: "Chennai DC".into(), location: None, site_type: None })
                 .unwrap();
    approved(&s, s.site.id, 1, &[("Total Electricity", "100")]);
    approved(&s, s.site.id, 2, &[("Total Electricity", "200")]);
    approved(&s, other.id, 2, &[("Total Electricity", "400")]);
    let reports = Reports::new(&s.store);

    let by_site = ReportFilter { site_id: Some(other.id), ..Default::default() };
    assert_eq!(reports.summary(&by_site).unwrap().total_electricity, 400.0);

    let february = ReportFilter { from: NaiveDate::from_ymd_opt(2024, 2, 1),
                                  to: NaiveDate::from_ymd_opt(2024, 2, 29),
                                  ..Default::default() };
    let rows = reports.table(&february).unwrap();
    assert_eq!(rows.len(), 2);
    // mismo periodo: orden por sitio
    assert_eq!(rows[0].site_name, "Chennai DC");
    assert_eq!(rows[1].site_name, "Pune Plant");
    assert_eq!(rows[1].label, "Feb'24");
    assert_eq!(rows[1].reviewer.as_deref(), Some("reviewer@esg.local"));
}

#[test]
fn rejected_submissions_are_excluded() {
    let s = support::seeded();
    let id = submit(&s,
                    s.site.id,
                    1,
                    &[("Total Electricity", "900")],
                    SubmissionIntent::SubmitForApproval).unwrap();
    SubmissionLifecycle::new(&s.store).reject(id, "reviewer@esg.local", "valores fuera de rango")
                                      .unwrap();
    let reports = Reports::new(&s.store);
    assert!(reports.approved_entries(&ReportFilter::default()).unwrap().is_empty());
    assert_eq!(reports.summary(&ReportFilter::default()).unwrap().total_electricity, 0.0);
}
