use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::model::{Entity, EntityKind, ServiceCategory, YearTotals};

// Producers write either name for each field, and some write both.
#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawEntity {
    #[serde(default)]
    vendor_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    vendor_name_normalized: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    vendor_type: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    service_category: Option<String>,
    #[serde(default)]
    yearly_payments: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawYearTotals {
    #[serde(default)]
    year: Option<Value>,
    #[serde(default)]
    public_total: Option<Value>,
    #[serde(default)]
    non_profit_total: Option<Value>,
    #[serde(default)]
    for_profit_total: Option<Value>,
    #[serde(default)]
    unknown_total: Option<Value>,
}

pub(super) fn parse_entities(raw: &str) -> Result<Vec<Entity>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in entity list")?;
    let Some(items) = parsed.as_array() else {
        warn!("entity payload is not an array; treating as empty");
        return Ok(Vec::new());
    };

    let mut entities = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for (index, item) in items.iter().enumerate() {
        let record = match RawEntity::deserialize(item) {
            Ok(record) => record,
            Err(error) => {
                warn!(index, "skipping unreadable entity record: {error}");
                skipped += 1;
                continue;
            }
        };
        match normalize_entity(record) {
            Some(entity) => entities.push(entity),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(
            skipped,
            kept = entities.len(),
            "some entity records were skipped"
        );
    }

    Ok(entities)
}

pub(super) fn parse_totals(raw: &str) -> Result<Vec<YearTotals>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in yearly totals")?;
    let Some(items) = parsed.as_array() else {
        warn!("totals payload is not an array; treating as empty");
        return Ok(Vec::new());
    };

    let mut totals = items
        .iter()
        .filter_map(|item| RawYearTotals::deserialize(item).ok())
        .filter_map(|record| {
            let year = record.year.as_ref().and_then(value_to_year)?;
            Some(YearTotals {
                year,
                public: amount_or_zero(record.public_total.as_ref()),
                non_profit: amount_or_zero(record.non_profit_total.as_ref()),
                for_profit: amount_or_zero(record.for_profit_total.as_ref()),
                unknown: amount_or_zero(record.unknown_total.as_ref()),
            })
        })
        .collect::<Vec<_>>();
    if totals.len() < items.len() {
        warn!(
            skipped = items.len() - totals.len(),
            "totals records without a usable year were skipped"
        );
    }
    totals.sort_by_key(|totals| totals.year);
    totals.dedup_by_key(|totals| totals.year);

    Ok(totals)
}

fn first_text(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    [primary, fallback]
        .into_iter()
        .flatten()
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
}

fn normalize_entity(record: RawEntity) -> Option<Entity> {
    let id = match record.vendor_id.or(record.id)? {
        Value::String(id) => id.trim().to_string(),
        Value::Number(id) => id.to_string(),
        _ => return None,
    };
    if id.is_empty() {
        return None;
    }

    let name = first_text(record.name, record.vendor_name_normalized)
        .unwrap_or_else(|| "Unknown".to_string());
    let kind = first_text(record.kind, record.vendor_type)
        .as_deref()
        .map_or(EntityKind::Unknown, EntityKind::from_raw);
    let service = first_text(record.category, record.service_category)
        .as_deref()
        .and_then(ServiceCategory::from_raw);

    let mut yearly = BTreeMap::new();
    if let Some(Value::Object(payments)) = record.yearly_payments {
        for (key, value) in payments {
            let Ok(year) = key.trim().parse::<i32>() else {
                continue;
            };
            if let Some(amount) = value_to_amount(&value)
                && amount > 0.0
            {
                yearly.insert(year, amount);
            }
        }
    }

    Some(Entity {
        id,
        name,
        kind,
        service,
        yearly,
    })
}

fn value_to_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    amount.is_finite().then_some(amount)
}

fn amount_or_zero(value: Option<&Value>) -> f64 {
    value
        .and_then(value_to_amount)
        .filter(|amount| *amount > 0.0)
        .unwrap_or(0.0)
}

fn value_to_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number.as_i64().and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_field_variants_normalize_to_one_shape() {
        let raw = r#"[
            {"vendor_id": "a", "name": "Acme Staffing", "type": "for_profit",
             "category": "staffing", "yearly_payments": {"2018": 100, "2019": 250.5}},
            {"vendor_id": "b", "vendor_name_normalized": "City Hospital",
             "vendor_type": "public", "service_category": "healthcare_delivery",
             "yearly_payments": {"2019": "75"}}
        ]"#;

        let entities = parse_entities(raw).unwrap();
        assert_eq!(entities.len(), 2);

        assert_eq!(entities[0].name, "Acme Staffing");
        assert_eq!(entities[0].kind, EntityKind::ForProfit);
        assert_eq!(entities[0].service, Some(ServiceCategory::Staffing));
        assert_eq!(entities[0].amount(2019), 250.5);

        assert_eq!(entities[1].name, "City Hospital");
        assert_eq!(entities[1].kind, EntityKind::Public);
        assert_eq!(entities[1].service, Some(ServiceCategory::HealthcareDelivery));
        assert_eq!(entities[1].amount(2019), 75.0);
        assert_eq!(entities[1].amount(2018), 0.0);
    }

    #[test]
    fn records_carrying_both_field_names_are_kept() {
        let raw = r#"[
            {"vendor_id": "V00001", "name": "Acme Staffing",
             "vendor_name_normalized": "ACME STAFFING",
             "type": "for_profit", "vendor_type": "for_profit",
             "category": "staffing", "service_category": "staffing",
             "yearly_payments": {"2019": 900}},
            {"vendor_id": "V00002", "type": "public", "yearly_payments": {"2019": 10}},
            {"id": "V00003", "vendor_name_normalized": "Fallback Name",
             "type": "", "vendor_type": "non_profit", "yearly_payments": {"2019": 5}}
        ]"#;

        let entities = parse_entities(raw).unwrap();
        let ids = entities.iter().map(|entity| entity.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["V00001", "V00002", "V00003"]);

        assert_eq!(entities[0].name, "Acme Staffing");
        assert_eq!(entities[0].kind, EntityKind::ForProfit);
        assert_eq!(entities[0].service, Some(ServiceCategory::Staffing));
        assert_eq!(entities[0].amount(2019), 900.0);

        assert_eq!(entities[2].name, "Fallback Name");
        assert_eq!(entities[2].kind, EntityKind::NonProfit);
    }

    #[test]
    fn mistyped_record_is_skipped_without_losing_the_rest() {
        let raw = r#"[
            {"vendor_id": "a", "name": 42, "yearly_payments": {"2019": 1}},
            {"vendor_id": "b", "yearly_payments": {"2019": 1}}
        ]"#;
        let entities = parse_entities(raw).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, "b");
    }

    #[test]
    fn non_array_payload_is_empty_not_an_error() {
        assert!(parse_entities(r#"{"vendors": []}"#).unwrap().is_empty());
        assert!(parse_totals("42").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_entities("[{").is_err());
        assert!(parse_totals("not json").is_err());
    }

    #[test]
    fn unusable_records_and_amounts_are_dropped() {
        let raw = r#"[
            {"name": "no identity", "yearly_payments": {"2018": 5}},
            {"vendor_id": "", "yearly_payments": {"2018": 5}},
            {"vendor_id": 17, "type": "mystery",
             "yearly_payments": {"2018": -4, "2019": null, "20x0": 3, "2020": 9}}
        ]"#;

        let entities = parse_entities(raw).unwrap();
        assert_eq!(entities.len(), 1);
        let entity = &entities[0];
        assert_eq!(entity.id, "17");
        assert_eq!(entity.name, "Unknown");
        assert_eq!(entity.kind, EntityKind::Unknown);
        assert_eq!(entity.yearly.len(), 1);
        assert_eq!(entity.amount(2020), 9.0);
    }

    #[test]
    fn totals_are_sorted_and_missing_fields_are_zero() {
        let raw = r#"[
            {"year": 2020, "public_total": 10, "for_profit_total": 5},
            {"year": "2018", "public_total": 1, "non_profit_total": 2,
             "for_profit_total": 3, "unknown_total": 4},
            {"public_total": 99}
        ]"#;

        let totals = parse_totals(raw).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].year, 2018);
        assert_eq!(totals[0].total(), 10.0);
        assert_eq!(totals[1].year, 2020);
        assert_eq!(totals[1].non_profit, 0.0);
        assert_eq!(totals[1].total(), 15.0);
    }
}
