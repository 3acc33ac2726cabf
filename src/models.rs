//! Record schemas of the PMKSY socio-economic survey.
//!
//! Every record other than [`farmer()`] hangs off a farmer household through
//! a `farmer` reference to the farmer's UUID key.

use crate::schema::{FieldSpec, RecordSchema};

pub fn farmer() -> RecordSchema {
    RecordSchema::new(
        "Farmer",
        "farmer",
        vec![
            FieldSpec::uuid_key("farmer_id"),
            FieldSpec::char("name", 255),
            FieldSpec::text("address").optional(),
            FieldSpec::char("village", 255).optional(),
            FieldSpec::char("taluka_block", 255).optional(),
            FieldSpec::char("district", 255).optional(),
            FieldSpec::char("contact_no", 50).optional(),
            FieldSpec::char("education", 255).optional(),
            FieldSpec::char("caste_religion", 255).optional(),
            FieldSpec::positive_integer("farming_experience_years"),
            FieldSpec::float("latitude"),
            FieldSpec::float("longitude"),
            FieldSpec::float("altitude"),
            FieldSpec::positive_integer("family_males"),
            FieldSpec::positive_integer("family_females"),
            FieldSpec::positive_integer("family_children"),
            FieldSpec::positive_integer("family_adult"),
        ],
    )
}

pub fn land_holding(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "LandHolding",
        "land holding",
        vec![
            FieldSpec::uuid_key("land_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("category", 255).optional(),
            FieldSpec::decimal("total_area_ha", 10, 2),
            FieldSpec::decimal("irrigated_area_ha", 10, 2),
            FieldSpec::char("irrigation_source", 255).optional(),
            FieldSpec::char("irrigation_no", 255).optional(),
            FieldSpec::float("irrigation_latitude"),
            FieldSpec::float("irrigation_longitude"),
            FieldSpec::text("soil_details").optional(),
        ],
    )
}

pub fn asset(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "Asset",
        "asset",
        vec![
            FieldSpec::uuid_key("asset_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("item_name", 255),
            FieldSpec::positive_integer("quantity"),
            FieldSpec::positive_integer("years_owned"),
            FieldSpec::decimal("current_value", 12, 2),
        ],
    )
}

pub fn crop_history(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "CropHistory",
        "crop history",
        vec![
            FieldSpec::uuid_key("crop_hist_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("crop_name", 255),
            FieldSpec::char("variety", 255).optional(),
            FieldSpec::char("season", 100).optional(),
            FieldSpec::decimal("area_ha", 10, 2),
            FieldSpec::decimal("production_kg", 12, 2),
            FieldSpec::decimal("sold_market_kg", 12, 2),
            FieldSpec::decimal("retained_seed_kg", 12, 2),
            FieldSpec::decimal("home_consumption_kg", 12, 2),
        ],
    )
}

pub fn cost_of_cultivation(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "CostOfCultivation",
        "cost of cultivation",
        vec![
            FieldSpec::uuid_key("cost_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("crop_name", 255),
            FieldSpec::char("particular", 255),
            FieldSpec::decimal("quantity", 12, 2),
            FieldSpec::decimal("cost_rs", 12, 2),
        ],
    )
}

pub fn weed_record(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "WeedRecord",
        "weed record",
        vec![
            FieldSpec::uuid_key("weed_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("season", 100).optional(),
            FieldSpec::char("weed_type", 255).optional(),
            FieldSpec::char("weeding_time", 255).optional(),
            FieldSpec::char("herbicide", 255).optional(),
            FieldSpec::decimal("chemical_cost", 12, 2),
            FieldSpec::decimal("labour_days", 10, 2),
            FieldSpec::decimal("labour_charge", 12, 2),
        ],
    )
}

pub fn water_management(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "WaterManagement",
        "water management",
        vec![
            FieldSpec::uuid_key("wm_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("season", 100).optional(),
            FieldSpec::char("irrigation_source", 255).optional(),
            FieldSpec::positive_integer("irrigation_count"),
            FieldSpec::decimal("depth", 8, 2),
            FieldSpec::decimal("energy_cost", 12, 2),
            FieldSpec::decimal("labour_charge", 12, 2),
        ],
    )
}

pub fn pest_disease(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "PestDiseaseRecord",
        "pest disease record",
        vec![
            FieldSpec::uuid_key("pest_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("season", 100).optional(),
            FieldSpec::char("pest_disease", 255),
            FieldSpec::char("chemical_used", 255).optional(),
            FieldSpec::decimal("chemical_qty", 12, 2),
            FieldSpec::decimal("chemical_cost", 12, 2),
            FieldSpec::decimal("labour_days", 10, 2),
            FieldSpec::decimal("labour_charge", 12, 2),
        ],
    )
}

pub fn nutrient_management(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "NutrientManagement",
        "nutrient management",
        vec![
            FieldSpec::uuid_key("nutrient_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("season", 100).optional(),
            FieldSpec::char("crop_name", 255),
            FieldSpec::decimal("fym_kg", 12, 2),
            FieldSpec::decimal("nitrogen_kg", 12, 2),
            FieldSpec::decimal("phosphate_kg", 12, 2),
            FieldSpec::decimal("gromer_kg", 12, 2),
            FieldSpec::text("other_fertilizer").optional(),
        ],
    )
}

pub fn income_from_crops(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "IncomeFromCrops",
        "income from crops",
        vec![
            FieldSpec::uuid_key("income_crop_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("season", 100).optional(),
            FieldSpec::char("crop_name", 255),
            FieldSpec::decimal("production_qntl", 12, 2),
            FieldSpec::decimal("yield_qntl_ha", 12, 2),
            FieldSpec::decimal("price_rs_qntl", 12, 2),
            FieldSpec::decimal("gross_income_rs", 12, 2),
            FieldSpec::decimal("byproduct_income_rs", 12, 2),
        ],
    )
}

pub fn enterprise(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "Enterprise",
        "enterprise",
        vec![
            FieldSpec::uuid_key("enterprise_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("enterprise_type", 255),
            FieldSpec::positive_integer("number"),
            FieldSpec::decimal("production", 12, 2),
            FieldSpec::decimal("home_consumption", 12, 2),
            FieldSpec::decimal("sold_market", 12, 2),
            FieldSpec::decimal("market_price", 12, 2),
        ],
    )
}

pub fn annual_family_income(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "AnnualFamilyIncome",
        "annual family income",
        vec![
            FieldSpec::uuid_key("afi_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("source", 255),
            FieldSpec::decimal("income_rs", 12, 2),
            FieldSpec::positive_integer("employment_days"),
        ],
    )
}

pub fn migration(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "MigrationRecord",
        "migration record",
        vec![
            FieldSpec::uuid_key("migration_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("age_gender", 255),
            FieldSpec::text("reason").optional(),
            FieldSpec::char("migration_type", 255).optional(),
            FieldSpec::decimal("remittance", 12, 2),
        ],
    )
}

pub fn adaptation_strategy(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "AdaptationStrategy",
        "adaptation strategy",
        vec![
            FieldSpec::uuid_key("strategy_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("strategy", 255),
            FieldSpec::boolean("aware"),
            FieldSpec::boolean("adopted"),
        ],
    )
}

pub fn financial_record(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "FinancialRecord",
        "financial record",
        vec![
            FieldSpec::uuid_key("fin_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::boolean("loan"),
            FieldSpec::char("loan_purpose", 255).optional(),
            FieldSpec::boolean("credit_returned"),
            FieldSpec::boolean("kcc"),
            FieldSpec::boolean("kcc_used"),
            FieldSpec::text("memberships").optional(),
            FieldSpec::text("benefits").optional(),
            FieldSpec::boolean("soil_testing"),
            FieldSpec::text("training").optional(),
            FieldSpec::text("info_sources").optional(),
            FieldSpec::text("constraints").optional(),
        ],
    )
}

pub fn consumption_pattern(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "ConsumptionPattern",
        "consumption pattern",
        vec![
            FieldSpec::uuid_key("cp_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("crop", 255),
            FieldSpec::char("crop_product", 255).optional(),
            FieldSpec::decimal("consumption_kg_month", 12, 2),
            FieldSpec::boolean("purchased"),
            FieldSpec::boolean("pds"),
        ],
    )
}

pub fn market_price(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "MarketPrice",
        "market price",
        vec![
            FieldSpec::uuid_key("price_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("crop", 255),
            FieldSpec::char("season", 100).optional(),
            FieldSpec::decimal("area_ha", 10, 2),
            FieldSpec::decimal("production_tons", 12, 2),
            FieldSpec::decimal("price_rs_qntl", 12, 2),
        ],
    )
}

pub fn irrigated_rainfed(farmer: &RecordSchema) -> RecordSchema {
    RecordSchema::new(
        "IrrigatedRainfed",
        "irrigated rainfed",
        vec![
            FieldSpec::uuid_key("ir_id"),
            FieldSpec::foreign_key("farmer", farmer),
            FieldSpec::char("crop", 255),
            FieldSpec::date("sowing_date"),
            FieldSpec::date("harvesting_date"),
            FieldSpec::decimal("rainfed_area", 10, 2),
            FieldSpec::decimal("irrigated_area", 10, 2),
            FieldSpec::decimal("fertilizer_rate", 12, 2),
        ],
    )
}
