use chrono::{DateTime, Utc};

/// Identifier assigned to every ledger record.
pub type RecordId = i64;

/// Identifier of the (optional) user owning a record.
pub type UserId = i64;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> RecordId;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Lifecycle timestamps shared by every persisted record.
pub trait Timestamped: Identifiable {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    /// Overwrites the lifecycle stamps; used when an update replaces a stored record.
    fn restamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

/// Label shown when a transaction points at a category or account that no longer exists.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Serde codec for money amounts that keeps non-finite values.
///
/// JSON has no NaN or infinity, so those are written as the strings `"NaN"`,
/// `"Infinity"` and `"-Infinity"`. A `null` amount reads back as NaN.
pub mod amount_serde {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "Infinity";
    const NEG_INFINITY: &str = "-Infinity";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if amount.is_finite() {
            serializer.serialize_f64(*amount)
        } else if amount.is_nan() {
            serializer.serialize_str(NAN)
        } else if amount.is_sign_positive() {
            serializer.serialize_str(INFINITY)
        } else {
            serializer.serialize_str(NEG_INFINITY)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<RawAmount>::deserialize(deserializer)? {
            None => Ok(f64::NAN),
            Some(RawAmount::Number(amount)) => Ok(amount),
            Some(RawAmount::Text(text)) => match text.as_str() {
                NAN => Ok(f64::NAN),
                INFINITY => Ok(f64::INFINITY),
                NEG_INFINITY => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!("invalid amount `{other}`"))),
            },
        }
    }
}
