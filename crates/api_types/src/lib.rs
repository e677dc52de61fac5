use std::fmt;

use chrono::{DateTime, Utc};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use uuid::Uuid;

/// Person to amount, serialized as a JSON object that keeps its key order.
///
/// Amounts are JSON numbers in major units (e.g. `12.5`). A repeated key is
/// kept as a separate entry; the engine decides which one wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmountMap(pub Vec<(String, f64)>);

impl Serialize for AmountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (person, amount) in &self.0 {
            map.serialize_entry(person, amount)?;
        }
        map.end()
    }
}

struct AmountMapVisitor;

impl<'de> Visitor<'de> for AmountMapVisitor {
    type Value = AmountMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object of person names to amounts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((person, amount)) = access.next_entry::<String, f64>()? {
            entries.push((person, amount));
        }
        Ok(AmountMap(entries))
    }
}

impl<'de> Deserialize<'de> for AmountMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AmountMapVisitor)
    }
}

pub mod expense {
    use super::*;

    /// Request body for creating or replacing an expense.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount: f64,
        #[serde(default)]
        pub description: String,
        pub paid_by: String,
        pub shared_with: Vec<String>,
        /// Explicit owed amounts; replaces the equal split when non-empty.
        #[serde(default)]
        pub shares: Option<AmountMap>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Expense {
        pub id: Uuid,
        pub amount: f64,
        pub description: String,
        pub paid_by: String,
        pub shared_with: Vec<String>,
        pub shares: Option<AmountMap>,
        /// RFC3339 timestamp.
        pub created_at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDeleted {
        pub message: String,
    }
}

pub mod settlement {
    use super::*;

    /// A transfer from the person who owes to the person who is owed.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct Settlement {
        pub from: String,
        pub to: String,
        pub amount: f64,
    }
}
