use serde::{Deserialize, Serialize};

/// A catalog product. Field names match the persisted JSON layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub short_description: String,
    pub long_description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub price: f64,
    /// Integer percentage off the listed price
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub featured: bool,
    pub img_url: String,
    #[serde(default)]
    pub quiz_score: Vec<i64>,
}

/// A discount coupon. Codes are uppercased at write time; the `type` tag
/// (percentage vs fixed) is opaque here and interpreted by the pricing UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub discount: f64,
    #[serde(rename = "type")]
    pub kind: String,
    pub active: bool,
}

/// An admin credential. Created only by the bootstrap seeding routine;
/// the persisted field is named `password` for layout compatibility but
/// always holds a salted hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub role: String,
}
