//! Immutable table of importable survey datasets.
//!
//! A [`Registry`] is constructed once (usually via [`Registry::standard()`])
//! and handed by reference to whatever needs to resolve a target key.

use std::collections::HashSet;

use heck::ToTitleCase;

use crate::{
    error::UnknownTarget,
    models,
    schema::{FieldSpec, RecordSchema},
};

/// Maps an upload column onto a record attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub column: String,
    pub attribute: String,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub key: String,
    pub label: String,
    pub description: String,
    pub schema: RecordSchema,
    pub field_map: Vec<ColumnMapping>,
    pub required_columns: Vec<String>,
}

impl Dataset {
    pub fn new(
        key: &str,
        label: &str,
        description: &str,
        schema: RecordSchema,
        required_columns: &[&str],
    ) -> Self {
        let field_map = build_field_map(&schema);
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            schema,
            field_map,
            required_columns: required_columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn expected_columns(&self) -> impl Iterator<Item = &str> {
        self.field_map.iter().map(|mapping| mapping.column.as_str())
    }

    pub fn attribute_for(&self, column: &str) -> Option<&str> {
        self.field_map
            .iter()
            .find(|mapping| mapping.column == column)
            .map(|mapping| mapping.attribute.as_str())
    }

    pub fn field_for_column(&self, column: &str) -> Option<&FieldSpec> {
        self.attribute_for(column)
            .and_then(|attribute| self.schema.field(attribute))
    }

    pub fn is_required(&self, column: &str) -> bool {
        self.required_columns.iter().any(|required| required == column)
    }

    /// Required columns absent from `columns`, in declaration order.
    pub fn missing_required<'a, I>(&self, columns: I) -> Vec<&str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present = columns.into_iter().collect::<HashSet<_>>();
        self.required_columns
            .iter()
            .map(String::as_str)
            .filter(|column| !present.contains(*column))
            .collect()
    }

    /// User-facing label for a column, e.g. `farmer_id` → `Farmer Id`.
    pub fn humanised_column(&self, column: &str) -> String {
        match self.field_for_column(column) {
            Some(field) if field.is_foreign_key() && column.ends_with("_id") => {
                format!("{} Id", field.label())
            }
            Some(field) => field.label(),
            None => column.replace('_', " ").to_title_case(),
        }
    }
}

/// Foreign keys are addressed as `<name>_id`; every other field by its name.
pub fn build_field_map(schema: &RecordSchema) -> Vec<ColumnMapping> {
    schema
        .fields
        .iter()
        .map(|field| {
            let column = if field.is_foreign_key() {
                format!("{}_id", field.name)
            } else {
                field.name.clone()
            };
            ColumnMapping {
                column,
                attribute: field.name.clone(),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Registry {
    targets: Vec<Dataset>,
}

impl Registry {
    pub fn new(targets: Vec<Dataset>) -> Self {
        Self { targets }
    }

    /// The PMKSY survey targets in menu order.
    pub fn standard() -> Self {
        let farmer = models::farmer();
        let targets = vec![
            Dataset::new(
                "farmers",
                "Farmers (Basic Profile)",
                "Create farmer records with demographic and household level attributes.",
                farmer.clone(),
                &["name"],
            ),
            Dataset::new(
                "land_holdings",
                "Land Holdings",
                "Attach land parcel information to an existing farmer via farmer_id.",
                models::land_holding(&farmer),
                &["farmer_id"],
            ),
            Dataset::new(
                "assets",
                "Assets",
                "Bulk upload asset ownership for farmers.",
                models::asset(&farmer),
                &["farmer_id", "item_name"],
            ),
            Dataset::new(
                "crop_history",
                "Crop History",
                "Historical crop production information.",
                models::crop_history(&farmer),
                &["farmer_id", "crop_name"],
            ),
            Dataset::new(
                "cost_of_cultivation",
                "Cost of Cultivation",
                "Cost inputs for crop cultivation.",
                models::cost_of_cultivation(&farmer),
                &["farmer_id", "crop_name", "particular"],
            ),
            Dataset::new(
                "weed_records",
                "Weeds",
                "Weed management records, linked to an existing farmer.",
                models::weed_record(&farmer),
                &["farmer_id"],
            ),
            Dataset::new(
                "water_management",
                "Water Management",
                "Water management practices including irrigation counts and costs.",
                models::water_management(&farmer),
                &["farmer_id"],
            ),
            Dataset::new(
                "pest_disease",
                "Pest & Disease",
                "Pest and disease management entries for a farmer.",
                models::pest_disease(&farmer),
                &["farmer_id", "pest_disease"],
            ),
            Dataset::new(
                "nutrient_management",
                "Nutrient Management",
                "Fertiliser and nutrient application by crop and season.",
                models::nutrient_management(&farmer),
                &["farmer_id", "crop_name"],
            ),
            Dataset::new(
                "income_from_crops",
                "Income from Crops",
                "Income realisation per crop and season.",
                models::income_from_crops(&farmer),
                &["farmer_id", "crop_name"],
            ),
            Dataset::new(
                "enterprises",
                "Enterprises",
                "Allied enterprises and diversification activities.",
                models::enterprise(&farmer),
                &["farmer_id", "enterprise_type"],
            ),
            Dataset::new(
                "annual_family_income",
                "Annual Family Income",
                "Annual income from different livelihood sources.",
                models::annual_family_income(&farmer),
                &["farmer_id", "source"],
            ),
            Dataset::new(
                "migration",
                "Migration",
                "Migration details for household members.",
                models::migration(&farmer),
                &["farmer_id", "age_gender"],
            ),
            Dataset::new(
                "adaptation_strategies",
                "Adaptation Strategies",
                "Climate adaptation strategies known or adopted.",
                models::adaptation_strategy(&farmer),
                &["farmer_id", "strategy"],
            ),
            Dataset::new(
                "financials",
                "Financial Records",
                "Financial inclusion, credit and benefit utilisation.",
                models::financial_record(&farmer),
                &["farmer_id"],
            ),
            Dataset::new(
                "consumption_pattern",
                "Consumption Pattern",
                "Monthly consumption of agricultural produce.",
                models::consumption_pattern(&farmer),
                &["farmer_id", "crop"],
            ),
            Dataset::new(
                "market_price",
                "Market Price",
                "Market price realisation for crops.",
                models::market_price(&farmer),
                &["farmer_id", "crop"],
            ),
            Dataset::new(
                "irrigated_rainfed",
                "Irrigated & Rainfed",
                "Split irrigated versus rainfed crop areas.",
                models::irrigated_rainfed(&farmer),
                &["farmer_id", "crop"],
            ),
        ];
        Self::new(targets)
    }

    pub fn get(&self, key: &str) -> Result<&Dataset, UnknownTarget> {
        self.targets
            .iter()
            .find(|target| target.key == key)
            .ok_or_else(|| UnknownTarget(key.to_string()))
    }

    /// `(key, label)` pairs for selection menus.
    pub fn choices(&self) -> Vec<(&str, &str)> {
        self.targets
            .iter()
            .map(|target| (target.key.as_str(), target.label.as_str()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.targets.iter()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
