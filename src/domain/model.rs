use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type NodeId = u64;
pub type ProductId = u64;
pub type UserId = u64;

/// Depth of a node in the supplier hierarchy, 0 being a root supplier.
///
/// Serialized as the bare integer so stored data and API payloads carry
/// `0`, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Tier {
    Zero = 0,
    One = 1,
    Two = 2,
}

impl Tier {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.as_u8()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Tier::Zero),
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            other => Err(format!("\"{}\" is not a valid level, expected 0, 1 or 2", other)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Money amounts always carry two decimal places (`0.00`, `10.50`).
pub fn money(mut value: Decimal) -> Decimal {
    value.rescale(2);
    value
}

/// A company in the trade network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub supplier: Option<NodeId>,
    #[serde(rename = "level")]
    pub tier: Tier,
    pub debt_to_the_supplier: Decimal,
    pub date_of_creation: DateTime<Utc>,
}

/// Address details attached one-to-one to a node. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub owner: NodeId,
    pub name: String,
    pub model: String,
    pub release_date: NaiveDate,
    pub selling_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub date_joined: DateTime<Utc>,
}

/// Node as returned by the public API: supplier by name, contact inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub supplier: Option<String>,
    pub level: Tier,
    pub debt_to_the_supplier: Decimal,
    pub date_of_creation: DateTime<Utc>,
    pub contact: Contact,
}

/// Public user representation; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub token: String,
    pub user: UserView,
}

/// Link to another admin page, rendered by the back-office client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLink {
    pub id: NodeId,
    pub name: String,
    pub href: String,
}

impl AdminLink {
    pub fn to_node(id: NodeId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            href: format!("/admin/node/{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminNodeRow {
    pub id: NodeId,
    pub name: String,
    pub level: Tier,
    pub to_supplier: Option<AdminLink>,
    pub debt_to_the_supplier: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminNodeDetail {
    pub id: NodeId,
    pub name: String,
    pub level: Tier,
    pub supplier: Option<AdminLink>,
    pub debt_to_the_supplier: Decimal,
    pub date_of_creation: DateTime<Utc>,
    pub contact: Contact,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminProductRow {
    pub id: ProductId,
    pub name: String,
    pub model: String,
    pub release_date: NaiveDate,
    pub owner: AdminLink,
}
