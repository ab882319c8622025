//! Catálogo y sitio de prueba sobre el store en memoria.
#![allow(dead_code)]

use esg_core::{EsgStore, InMemoryEsgStore, ParameterCatalog};
use esg_domain::{EsgType, NewSite, Parameter, Site};

pub struct Seeded {
    pub store: InMemoryEsgStore,
    pub site: Site,
    pub params: Vec<Parameter>,
}

impl Seeded {
    pub fn param(&self, name: &str) -> &Parameter {
        self.params.iter().find(|p| p.name == name).unwrap_or_else(|| panic!("parámetro {name} no sembrado"))
    }
}

pub fn seeded() -> Seeded {
    let store = InMemoryEsgStore::new();
    let site = store.insert_site(NewSite { name: "Pune Plant".into(),
                                           location: Some("Pune, IN".into()),
                                           site_type: Some("manufacturing".into()) })
                    .unwrap();
    let mut params = vec![];
    {
        let catalog = ParameterCatalog::new(&store);
        let energy = catalog.add_category("Energy", EsgType::Environmental).unwrap();
        for name in ["Total Electricity", "Renewable PPA", "Renewable Rooftop"] {
            params.push(catalog.add_parameter(name, Some("kWh"), energy.id).unwrap());
        }
        let refrigerants = catalog.add_category("Refrigerants", EsgType::Environmental).unwrap();
        for name in ["R22", "R32", "R410", "R134A", "R514A", "CO2"] {
            params.push(catalog.add_parameter(name, Some("kg"), refrigerants.id).unwrap());
        }
        let workforce = catalog.add_category("Workforce", EsgType::Social).unwrap();
        params.push(catalog.add_parameter("Total Employees", None, workforce.id).unwrap());
        let board = catalog.add_category("Board", EsgType::Governance).unwrap();
        params.push(catalog.add_parameter("Board Members", None, board.id).unwrap());
    }
    Seeded { store, site, params }
}
