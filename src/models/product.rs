use serde::{Deserialize, Deserializer, Serialize};

/// Core product entity, serialized with the catalog's wire names.
/// `imageBase64` is omitted entirely when absent so the persisted file
/// never carries explicit nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    #[serde(
        rename = "imageBase64",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_base64: Option<String>,
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce_price")]
    pub price: Option<f64>,
    #[serde(rename = "imageBase64", default)]
    pub image_base64: Option<String>,
}

/// Partial update. `image_base64` uses the double-Option pattern: the outer
/// `Option` distinguishes "field absent" from "field provided", and the inner
/// one carries the provided value (which may be null or empty).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduct {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce_price")]
    pub price: Option<f64>,
    #[serde(rename = "imageBase64", default, deserialize_with = "double_option")]
    pub image_base64: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Accept a price as either a JSON number or a numeric string.
/// Clients historically sent both forms; a non-numeric string is a
/// deserialization error rather than a silently persisted NaN.
fn coerce_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceInput {
        Number(f64),
        Text(String),
    }

    match Option::<PriceInput>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PriceInput::Number(n)) => Ok(Some(n)),
        Some(PriceInput::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {s:?}"))),
    }
}
