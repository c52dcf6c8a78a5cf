//! Product records and the values used to address and modify them

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::Result;

/// Store-assigned product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl ProductId {
    /// Identifier given to the first product of an empty catalog
    pub const FIRST: ProductId = ProductId(1);

    /// The identifier following this one, if it fits in a `u64`
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A stored product
///
/// `price` and `stock` keep the JSON number exactly as it was written, so
/// negative or fractional values survive a load/persist cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier assigned by the store
    pub id: ProductId,
    /// Display name
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Unit price
    pub price: Number,
    /// Thumbnail location
    pub thumbnail: String,
    /// Caller-supplied code, unique across the catalog
    pub code: String,
    /// Units in stock
    pub stock: Number,
    /// Any other properties supplied when the product was added
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Build the stored form of a candidate under the given id.
    ///
    /// The candidate is laid over `{ "id": id }`, so a candidate that carries
    /// its own `id` (or any typed field in `extra`) overrides it.
    pub fn from_candidate(id: ProductId, candidate: NewProduct) -> serde_json::Result<Self> {
        let mut object = Map::new();
        object.insert("id".to_string(), Value::from(id.0));
        if let Value::Object(fields) = serde_json::to_value(candidate)? {
            object.extend(fields);
        }
        serde_json::from_value(Value::Object(object))
    }

    /// Price as a decimal, if it is representable
    pub fn price_decimal(&self) -> Option<Decimal> {
        let text = self.price.to_string();
        text.parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_scientific(&text).ok())
    }
}

/// Typed fields of a candidate, in declaration order
const CANDIDATE_FIELDS: [&str; 6] = [
    "title",
    "description",
    "price",
    "thumbnail",
    "code",
    "stock",
];

/// A product that has not been stored yet
///
/// Absent fields deserialize to empty/zero values, which
/// [`NewProduct::missing_fields`] then reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewProduct {
    /// Display name
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Unit price, must not be zero
    pub price: Number,
    /// Thumbnail location
    pub thumbnail: String,
    /// Caller-supplied code
    pub code: String,
    /// Units in stock, must not be zero
    pub stock: Number,
    /// Additional properties stored verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for NewProduct {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            price: Number::from(0),
            thumbnail: String::new(),
            code: String::new(),
            stock: Number::from(0),
            extra: Map::new(),
        }
    }
}

impl NewProduct {
    /// Create a candidate with every required field set
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: impl Into<Number>,
        thumbnail: impl Into<String>,
        code: impl Into<String>,
        stock: impl Into<Number>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price: price.into(),
            thumbnail: thumbnail.into(),
            code: code.into(),
            stock: stock.into(),
            extra: Map::new(),
        }
    }

    /// Attach an additional property. A key naming a typed field takes
    /// effect when the candidate is [normalized](NewProduct::normalized).
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Move extra properties that name a typed field into that field.
    ///
    /// The extra value wins. Fails if it has the wrong type for the field.
    pub fn normalized(self) -> serde_json::Result<Self> {
        if !self
            .extra
            .keys()
            .any(|key| CANDIDATE_FIELDS.contains(&key.as_str()))
        {
            return Ok(self);
        }
        serde_json::from_value(serde_json::to_value(self)?)
    }

    /// Required fields that are empty or zero, in declaration order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            self.title.is_empty(),
            self.description.is_empty(),
            is_zero(&self.price),
            self.thumbnail.is_empty(),
            self.code.is_empty(),
            is_zero(&self.stock),
        ];

        CANDIDATE_FIELDS
            .into_iter()
            .zip(checks)
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }
}

fn is_zero(number: &Number) -> bool {
    number.as_f64() == Some(0.0)
}

/// Id argument accepted by lookups
///
/// Text ids only ever match under loose comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdQuery {
    /// Numeric id
    Number(u64),
    /// Id given as text, e.g. taken from a URL segment
    Text(String),
}

impl IdQuery {
    /// Loose comparison: text is compared by its numeric value
    pub fn matches_loose(&self, id: ProductId) -> bool {
        match self {
            Self::Number(n) => *n == id.0,
            Self::Text(text) => numeric_value(text).is_some_and(|value| value == id.0 as f64),
        }
    }

    /// Strict comparison: only an equal number matches
    pub fn matches_strict(&self, id: ProductId) -> bool {
        matches!(self, Self::Number(n) if *n == id.0)
    }
}

/// Numeric reading of an id given as text.
///
/// Blank text reads as 0; `0x`, `0o` and `0b` prefixes select a radix and
/// take no sign.
fn numeric_value(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };

    match radix {
        Some(radix) => {
            let digits = &trimmed[2..];
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            u64::from_str_radix(digits, radix).ok().map(|value| value as f64)
        }
        None => trimmed.parse::<f64>().ok().filter(|value| !value.is_nan()),
    }
}

impl fmt::Display for IdQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(text) => write!(f, "{:?}", text),
        }
    }
}

impl From<u64> for IdQuery {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<ProductId> for IdQuery {
    fn from(id: ProductId) -> Self {
        Self::Number(id.0)
    }
}

impl From<&str> for IdQuery {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for IdQuery {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Ordered set of property overwrites for an update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    /// Empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a patch from a JSON object
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Set a property; later calls for the same key replace the value
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Value for a key, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the patch has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Patch {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_missing_fields_reports_empty_and_zero() {
        let complete = NewProduct::new("A", "d", 10, "t", "c1", 5);
        assert!(complete.missing_fields().is_empty());

        let candidate = NewProduct {
            description: String::new(),
            price: Number::from(0),
            stock: Number::from_f64(0.0).unwrap(),
            ..complete
        };
        assert_eq!(candidate.missing_fields(), vec!["description", "price", "stock"]);
    }

    #[test]
    fn test_candidate_with_absent_fields_deserializes() {
        let candidate: NewProduct =
            serde_json::from_value(json!({ "title": "A", "price": 3 })).unwrap();
        assert_eq!(candidate.price, Number::from(3));
        assert_eq!(
            candidate.missing_fields(),
            vec!["description", "thumbnail", "code", "stock"]
        );
    }

    #[test]
    fn test_negative_and_fractional_numbers_are_not_missing() {
        let candidate = NewProduct::new("A", "d", -1, "t", "c1", 5);
        assert!(candidate.missing_fields().is_empty());

        let candidate = NewProduct {
            stock: Number::from_f64(0.5).unwrap(),
            ..candidate
        };
        assert!(candidate.missing_fields().is_empty());
    }

    #[test]
    fn test_product_keeps_extra_properties() {
        let raw = json!({
            "id": 4,
            "title": "A",
            "description": "d",
            "price": 10,
            "thumbnail": "t",
            "code": "c1",
            "stock": 5,
            "color": "red"
        });
        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.id, ProductId(4));
        assert_eq!(product.extra.get("color"), Some(&json!("red")));

        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }

    #[test]
    fn test_numbers_round_trip_exactly() {
        let raw = r#"{"id":1,"title":"A","description":"d","price":19.99,"thumbnail":"t","code":"c1","stock":-2.5}"#;
        let product: Product = serde_json::from_str(raw).unwrap();

        assert_eq!(product.price_decimal(), Some(dec!(19.99)));
        assert_eq!(serde_json::to_string(&product).unwrap(), raw);
    }

    #[test]
    fn test_candidate_keys_override_assigned_fields() {
        let candidate = NewProduct::new("A", "d", 10, "t", "c1", 5)
            .with_extra("id", 9)
            .with_extra("title", "B");
        let candidate = candidate.normalized().unwrap();
        assert_eq!(candidate.title, "B");
        assert!(!candidate.extra.contains_key("title"));

        let product = Product::from_candidate(ProductId(1), candidate).unwrap();
        assert_eq!(product.id, ProductId(9));
        assert!(product.extra.is_empty());

        let text = serde_json::to_string(&product).unwrap();
        assert_eq!(text.matches("\"id\"").count(), 1);
        assert!(text.starts_with("{\"id\":9,"));
    }

    #[test]
    fn test_normalize_rejects_wrongly_typed_field() {
        let candidate = NewProduct::new("A", "d", 10, "t", "c1", 5).with_extra("stock", "many");
        assert!(candidate.normalized().is_err());
    }

    #[test]
    fn test_loose_and_strict_id_matching() {
        let id = ProductId(2);

        assert!(IdQuery::Number(2).matches_loose(id));
        assert!(IdQuery::from("2").matches_loose(id));
        assert!(IdQuery::from(" 2 ").matches_loose(id));
        assert!(IdQuery::from("2.0").matches_loose(id));
        assert!(!IdQuery::from("two").matches_loose(id));
        assert!(!IdQuery::Number(3).matches_loose(id));

        assert!(IdQuery::Number(2).matches_strict(id));
        assert!(!IdQuery::from("2").matches_strict(id));
    }

    #[test]
    fn test_loose_matching_reads_radix_prefixes() {
        assert!(IdQuery::from("0x1").matches_loose(ProductId(1)));
        assert!(IdQuery::from("0X1f").matches_loose(ProductId(31)));
        assert!(IdQuery::from("0o17").matches_loose(ProductId(15)));
        assert!(IdQuery::from("0b101").matches_loose(ProductId(5)));

        assert!(!IdQuery::from("0x").matches_loose(ProductId(0)));
        assert!(!IdQuery::from("0x+1").matches_loose(ProductId(1)));
        assert!(!IdQuery::from("-0x1").matches_loose(ProductId(1)));
        assert!(!IdQuery::from("0b2").matches_loose(ProductId(2)));
    }

    #[test]
    fn test_patch_preserves_insertion_order() {
        let patch = Patch::new()
            .set("title", "B")
            .set("code", "c2")
            .set("description", "x");
        let keys: Vec<&str> = patch.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["title", "code", "description"]);
    }

    #[test]
    fn test_patch_from_non_object_fails() {
        let err = Patch::from_value(json!([1, 2])).unwrap_err();
        assert!(err.is_parse());
    }
}
