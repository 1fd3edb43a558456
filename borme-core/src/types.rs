use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ===== RAW FIELD NAMES =====
// Keys emitted by the record grammars and consumed by the normalizer.
// They mirror the labels printed in the bulletin itself.

pub mod fields {
    pub const ID: &str = "Id";
    pub const NAME: &str = "nombre";
    pub const LEGAL_ACT: &str = "Acto legal";
    pub const DISSOLUTION_ACT: &str = "Actolegal";
    pub const OPERATIONS_START: &str = "Comienzo de operaciones";
    pub const ADDRESS: &str = "Domicilio";
    pub const CAPITAL: &str = "Capital";
    pub const DISSOLUTION: &str = "Disolución";
}

/// Constant value of [`fields::DISSOLUTION_ACT`] on every dissolution record
pub const DISSOLUTION_ACT_VALUE: &str = "Extinción";

/// One issue of the gazette, already reduced to a single text blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bulletin {
    /// File stem or date the bulletin was read from
    pub id: String,
    pub text: String,
}

impl Bulletin {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Sequential decimal identifier prefixing each record within a bulletin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordCode(pub u64);

impl RecordCode {
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(RecordCode)
    }
}

impl fmt::Display for RecordCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text of one record, always starting with its own code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub code: RecordCode,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Incorporation,
    Dissolution,
}

/// Field name → raw string value, in the order the grammar emitted them.
///
/// Serializes as a flat JSON object of strings; the kind is not written and
/// is recovered from the fields when reading back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub kind: RecordKind,
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    /// Sets a field, replacing an earlier value under the same key in place
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn infer_kind(pairs: &[(String, String)]) -> RecordKind {
        let is_dissolution = pairs
            .iter()
            .any(|(k, v)| k == fields::DISSOLUTION_ACT && v == DISSOLUTION_ACT_VALUE);
        if is_dissolution {
            RecordKind::Dissolution
        } else {
            RecordKind::Incorporation
        }
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct RawRecordVisitor;

impl<'de> Visitor<'de> for RawRecordVisitor {
    type Value = RawRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a flat object of record fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRecord, A::Error> {
        let mut fields: Vec<(String, String)> = Vec::new();
        while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
            // Non-string values are kept as their JSON text
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            fields.push((key, value));
        }
        let kind = RawRecord::infer_kind(&fields);
        let mut record = RawRecord::new(kind);
        for (key, value) in fields {
            record.set(key, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawRecordVisitor)
    }
}

// ===== NORMALIZED SCHEMA =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyType {
    LimitedLiability,
    PublicLimited,
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreetType {
    Street,
    Square,
    Road,
    Avenue,
    Promenade,
    Unspecified,
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for StreetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Column order of the tabular output. Every row carries all of them.
pub const TABULAR_COLUMNS: [&str; 9] = [
    "Name",
    "CompanyType",
    "IncorporationDate",
    "FullAddress",
    "City",
    "StreetType",
    "StreetNumber",
    "StreetName",
    "CapitalAmount",
];

/// Typed, closed-schema company record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedRecord {
    pub name: String,
    pub company_type: CompanyType,
    pub incorporation_date: Option<NaiveDate>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub street_type: StreetType,
    pub street_number: Option<u32>,
    pub street_name: Option<String>,
    pub capital_amount: Option<u64>,
}

impl NormalizedRecord {
    /// Row in [`TABULAR_COLUMNS`] order; absent values become `placeholder`
    pub fn to_row(&self, placeholder: &str) -> [String; 9] {
        fn or<T: ToString>(value: &Option<T>, placeholder: &str) -> String {
            value
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| placeholder.to_string())
        }

        [
            self.name.clone(),
            self.company_type.to_string(),
            self.incorporation_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| placeholder.to_string()),
            or(&self.full_address, placeholder),
            or(&self.city, placeholder),
            self.street_type.to_string(),
            or(&self.street_number, placeholder),
            or(&self.street_name, placeholder),
            or(&self.capital_amount, placeholder),
        ]
    }
}
