// Normalizer - raw field maps → typed, closed-schema records
//
// - rules.rs: encoding repair, dates, capital, company type
// - address.rs: city, street type, number and name from "Domicilio"
//
// A failing field degrades to absent and is reported; a record without a
// name cannot be placed in the schema and is dropped.

pub mod address;
pub mod rules;

use crate::error::{FieldError, PipelineError};
use crate::observer::Observer;
use crate::types::{fields, CompanyType, NormalizedRecord, RawRecord, StreetType};
use std::sync::Arc;

pub use address::Address;

/// Outcome of normalizing the records of one bulletin
#[derive(Debug, Clone, Default)]
pub struct NormalizationReport {
    pub records: Vec<NormalizedRecord>,
    /// Records that could not be normalized at all
    pub dropped: Vec<PipelineError>,
    pub field_failures: Vec<FieldError>,
}

/// A normalized record plus the fields that degraded to absent
#[derive(Debug, Clone)]
pub struct Normalized {
    pub record: NormalizedRecord,
    pub failures: Vec<FieldError>,
}

pub struct Normalizer {
    observer: Arc<dyn Observer>,
}

impl Normalizer {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    /// Normalize one raw record; `index` is its position in the batch
    pub fn normalize(&self, index: usize, raw: &RawRecord) -> Result<Normalized, PipelineError> {
        let mut failures = Vec::new();
        let mut name: Option<String> = None;
        let mut company_type = CompanyType::Unspecified;
        let mut incorporation_date = None;
        let mut capital_amount = None;
        let mut address: Option<Address> = None;

        for (key, value) in raw.fields() {
            let key = rules::repair_encoding(key);
            let value = rules::clean_value(value);

            match key.as_str() {
                fields::OPERATIONS_START => match rules::parse_operations_date(&value) {
                    Ok(date) => incorporation_date = Some(date),
                    Err(err) => failures.push(err),
                },
                fields::CAPITAL => match rules::parse_capital(&value) {
                    Ok(amount) => capital_amount = Some(amount),
                    Err(err) => failures.push(err),
                },
                fields::NAME => {
                    company_type = rules::classify_company(&value);
                    name = Some(value);
                }
                fields::ADDRESS => {
                    let (parsed, address_failures) = Address::parse(&value);
                    failures.extend(address_failures);
                    address = Some(parsed);
                }
                // Closed schema: everything else is dropped
                _ => {}
            }
        }

        let name = name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| PipelineError::RecordShape {
                index,
                reason: format!("missing '{}'", fields::NAME),
            })?;

        let record = match address {
            Some(address) => NormalizedRecord {
                name,
                company_type,
                incorporation_date,
                full_address: Some(address.full),
                city: address.city,
                street_type: address.street_type,
                street_number: address.street_number,
                street_name: Some(address.street_name),
                capital_amount,
            },
            None => NormalizedRecord {
                name,
                company_type,
                incorporation_date,
                full_address: None,
                city: None,
                street_type: StreetType::Unspecified,
                street_number: None,
                street_name: None,
                capital_amount,
            },
        };

        Ok(Normalized { record, failures })
    }

    /// Normalize a batch; failures are reported and never abort the batch
    pub fn normalize_all(&self, bulletin_id: &str, raw_records: &[RawRecord]) -> NormalizationReport {
        let mut report = NormalizationReport::default();

        for (index, raw) in raw_records.iter().enumerate() {
            let id = raw.get(fields::ID).unwrap_or("?");
            match self.normalize(index, raw) {
                Ok(Normalized { record, failures }) => {
                    for failure in &failures {
                        self.observer.warn(
                            &format!("Field degraded to absent: {failure}"),
                            &[
                                ("bulletin", bulletin_id),
                                ("record", id),
                                ("field", failure.field),
                            ],
                        );
                    }
                    report.field_failures.extend(failures);
                    report.records.push(record);
                }
                Err(err) => {
                    self.observer.error(
                        &format!("Dropping record: {err}"),
                        &[("bulletin", bulletin_id), ("record", id)],
                    );
                    report.dropped.push(err);
                }
            }
        }

        report
    }
}
