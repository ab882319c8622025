//! Catálogo de parámetros: categorías y métricas definidas por el
//! administrador, y la estructura anidada que da forma al formulario.
//!
//! La estructura agrupa tipo ESG -> nombre de categoría -> parámetros. Los
//! tres tipos ESG aparecen siempre, aunque no tengan categorías.
use esg_domain::{normalize_parameter_name, Category, EsgType, NewCategory, NewParameter, Parameter};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::store::EsgStore;

/// Entrada de una categoría dentro de la estructura.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub category_id: Uuid,
    pub parameters: Vec<Parameter>,
}

/// Nombre normalizado compartido por varios parámetros del mismo tipo ESG.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateName {
    pub esg_type: EsgType,
    pub normalized_name: String,
    pub parameter_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CatalogStructure(IndexMap<EsgType, IndexMap<String, CategoryEntry>>);

impl Default for CatalogStructure {
    fn default() -> Self {
        Self(EsgType::ALL.iter().map(|t| (*t, IndexMap::new())).collect())
    }
}

impl CatalogStructure {
    /// Agrupa cada parámetro bajo el nombre de su categoría, anidado en el
    /// tipo ESG de la categoría. Conserva el orden de entrada.
    ///
    /// Dos categorías con el mismo nombre dentro de un tipo ESG producen
    /// `CoreError::Conflict`: la estructura indexa por nombre.
    pub fn build(categories: &[Category], parameters: &[Parameter]) -> Result<Self, CoreError> {
        let mut structure = Self::default();
        let mut by_id: IndexMap<Uuid, (EsgType, &str)> = IndexMap::new();
        for category in categories {
            let entries = structure.0.entry(category.esg_type).or_default();
            if entries.contains_key(&category.name) {
                return Err(CoreError::Conflict(format!("duplicate category '{}' in {}",
                                                       category.name, category.esg_type)));
            }
            entries.insert(category.name.clone(), CategoryEntry { category_id: category.id, parameters: vec![] });
            by_id.insert(category.id, (category.esg_type, category.name.as_str()));
        }
        for parameter in parameters {
            let Some((esg_type, name)) = by_id.get(&parameter.category_id) else {
                warn!("build_structure: parámetro {} sin categoría {}", parameter.id, parameter.category_id);
                continue;
            };
            if let Some(entry) = structure.0.get_mut(esg_type).and_then(|e| e.get_mut(*name)) {
                if entry.category_id == parameter.category_id {
                    entry.parameters.push(parameter.clone());
                }
            }
        }
        Ok(structure)
    }

    pub fn categories(&self, esg_type: EsgType) -> impl Iterator<Item = (&str, &CategoryEntry)> {
        self.0.get(&esg_type).into_iter().flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn category(&self, esg_type: EsgType, name: &str) -> Option<&CategoryEntry> {
        self.0.get(&esg_type).and_then(|m| m.get(name))
    }

    /// Parámetros de un tipo ESG en el orden categoría -> parámetro.
    pub fn parameters(&self, esg_type: EsgType) -> impl Iterator<Item = &Parameter> {
        self.categories(esg_type).flat_map(|(_, entry)| entry.parameters.iter())
    }

    pub fn category_count(&self) -> usize {
        self.0.values().map(|m| m.len()).sum()
    }

    pub fn parameter_count(&self) -> usize {
        self.0.values().flat_map(|m| m.values()).map(|e| e.parameters.len()).sum()
    }

    /// El formulario se considera cargado cuando hay al menos un parámetro.
    pub fn is_loaded(&self) -> bool {
        self.parameter_count() > 0
    }

    /// Nombres normalizados repetidos dentro de un mismo tipo ESG. Al mapear
    /// el formulario, el último parámetro procesado sobrescribe al anterior.
    pub fn duplicate_names(&self) -> Vec<DuplicateName> {
        let mut out = vec![];
        for esg_type in EsgType::ALL {
            let mut seen: IndexMap<String, Vec<Uuid>> = IndexMap::new();
            for parameter in self.parameters(esg_type) {
                seen.entry(parameter.normalized_name()).or_default().push(parameter.id);
            }
            out.extend(seen.into_iter()
                           .filter(|(_, ids)| ids.len() > 1)
                           .map(|(normalized_name, parameter_ids)| DuplicateName { esg_type,
                                                                                  normalized_name,
                                                                                  parameter_ids }));
        }
        out
    }
}

/// Servicio de catálogo sobre un `EsgStore`.
pub struct ParameterCatalog<'s, S: EsgStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: EsgStore + ?Sized> ParameterCatalog<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    pub fn list_categories(&self, esg_type: Option<EsgType>) -> Result<Vec<Category>, CoreError> {
        self.store.list_categories(esg_type)
    }

    pub fn list_parameters(&self, category_id: Option<Uuid>) -> Result<Vec<Parameter>, CoreError> {
        self.store.list_parameters(category_id)
    }

    pub fn build_structure(&self) -> Result<CatalogStructure, CoreError> {
        let categories = self.store.list_categories(None)?;
        let parameters = self.store.list_parameters(None)?;
        let structure = CatalogStructure::build(&categories, &parameters)?;
        debug!("build_structure:done categories={} parameters={}",
               structure.category_count(),
               structure.parameter_count());
        Ok(structure)
    }

    /// Crea una categoría. El nombre debe ser único dentro de su tipo ESG
    /// porque la estructura indexa por nombre.
    pub fn add_category(&self, name: &str, esg_type: EsgType) -> Result<Category, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("category name is required".into()));
        }
        if self.store.list_categories(Some(esg_type))?.iter().any(|c| c.name == name) {
            return Err(CoreError::Conflict(format!("category '{name}' already exists in {esg_type}")));
        }
        self.store.insert_category(NewCategory { name: name.to_string(), esg_type })
    }

    /// Crea un parámetro validando que su nombre normalizado corresponda a
    /// una columna declarada de la tabla de detalle de su tipo ESG.
    pub fn add_parameter(&self, name: &str, unit: Option<&str>, category_id: Uuid) -> Result<Parameter, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("parameter name is required".into()));
        }
        let category = self.store
                           .find_category(category_id)?
                           .ok_or_else(|| CoreError::NotFound(format!("category {category_id}")))?;
        let column = normalize_parameter_name(name);
        if !category.esg_type.has_column(&column) {
            return Err(CoreError::UnknownColumn { esg_type: category.esg_type, column });
        }
        let unit = unit.map(str::trim).filter(|u| !u.is_empty()).map(str::to_string);
        self.store.insert_parameter(NewParameter { name: name.to_string(), unit, category_id })
    }

    pub fn remove_category(&self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_category(id)
    }

    pub fn remove_parameter(&self, id: Uuid) -> Result<(), CoreError> {
        self.store.delete_parameter(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, esg_type: EsgType) -> Category {
        Category { id: Uuid::new_v4(), name: name.into(), esg_type }
    }

    fn parameter(name: &str, category: &Category) -> Parameter {
        Parameter { id: Uuid::new_v4(), name: name.into(), unit: None, category_id: category.id }
    }

    #[test]
    fn empty_category_still_appears() {
        let energy = category("Energy", EsgType::Environmental);
        let board = category("Board", EsgType::Governance);
        let structure = CatalogStructure::build(&[energy.clone(), board], &[parameter("Total Electricity", &energy)])
                                            .unwrap();
        let entry = structure.category(EsgType::Governance, "Board").unwrap();
        assert!(entry.parameters.is_empty());
        assert_eq!(structure.category_count(), 2);
        assert!(structure.is_loaded());
    }

    #[test]
    fn no_parameters_means_not_loaded() {
        let structure = CatalogStructure::build(&[category("Energy", EsgType::Environmental)], &[]).unwrap();
        assert!(!structure.is_loaded());
    }

    #[test]
    fn orphan_parameter_is_skipped() {
        let energy = category("Energy", EsgType::Environmental);
        let ghost = category("Ghost", EsgType::Social);
        let structure = CatalogStructure::build(&[energy], &[parameter("Total Employees", &ghost)]).unwrap();
        assert_eq!(structure.parameter_count(), 0);
    }

    #[test]
    fn serializes_nested_by_type_then_category_name() {
        let energy = category("Energy", EsgType::Environmental);
        let structure = CatalogStructure::build(&[energy.clone()], &[]).unwrap();
        let json = serde_json::to_value(&structure).unwrap();
        assert_eq!(json["environmental"]["Energy"]["category_id"], serde_json::json!(energy.id));
        assert!(json["social"].as_object().unwrap().is_empty());
    }

    #[test]
    fn duplicate_names_reported_per_type() {
        let air = category("Air", EsgType::Environmental);
        let stack = category("Stack Emissions", EsgType::Environmental);
        let a = parameter("NOx", &air);
        let b = parameter("NOX", &stack);
        let structure = CatalogStructure::build(&[air, stack], &[a.clone(), b.clone()]).unwrap();
        let dups = structure.duplicate_names();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].normalized_name, "nox");
        assert_eq!(dups[0].parameter_ids, vec![a.id, b.id]);
    }

    #[test]
    fn duplicate_category_name_in_same_type_is_a_conflict() {
        let first = category("Energy", EsgType::Environmental);
        let second = category("Energy", EsgType::Environmental);
        let params = [parameter("Total Electricity", &first), parameter("Renewable PPA", &second)];
        let err = CatalogStructure::build(&[first, second], &params).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        // mismo nombre en otro tipo sí es válido
        let social = category("Energy", EsgType::Social);
        let env = category("Energy", EsgType::Environmental);
        assert_eq!(CatalogStructure::build(&[env, social], &[]).unwrap().category_count(), 2);
    }
}
