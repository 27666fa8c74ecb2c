use crate::domain::model::{Contact, NodeId};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_email, validate_max_length, validate_money, validate_non_empty,
    validate_optional_length, Validate,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

pub const NODE_NAME_MAX: usize = 300;
pub const CONTACT_FIELD_MAX: usize = 50;
pub const HOUSE_NUMBER_MAX: usize = 10;
pub const PRODUCT_NAME_MAX: usize = 150;
pub const PRODUCT_MODEL_MAX: usize = 100;
pub const USER_FIELD_MAX: usize = 150;

/// 區分「欄位未提供」與「明確給 null」
fn double_option<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeCreate {
    pub name: String,
    /// Supplier referenced by its unique name.
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeUpdate {
    #[serde(default)]
    pub name: Option<String>,
    /// `Some(None)` clears the supplier, `None` leaves it unchanged.
    #[serde(default, deserialize_with = "double_option")]
    pub supplier: Option<Option<String>>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub owner: NodeId,
    pub name: String,
    pub model: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub selling_price: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub owner: Option<NodeId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub selling_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub password_repeat: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordUpdate {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DebtUpdate {
    pub debt_to_the_supplier: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearDebtRequest {
    pub ids: Vec<NodeId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeListQuery {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub owner: Option<NodeId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminNodeQuery {
    pub city: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminProductQuery {
    pub search: Option<String>,
}

/// Names are stored trimmed, so the limits apply to the trimmed value.
pub fn validate_node_name(name: &str) -> Result<()> {
    let name = name.trim();
    validate_non_empty("name", name)?;
    validate_max_length("name", name, NODE_NAME_MAX)
}

pub fn validate_username(username: &str) -> Result<()> {
    validate_non_empty("username", username)?;
    validate_max_length("username", username, USER_FIELD_MAX)?;
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(crate::utils::error::TradeError::validation(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters",
        ));
    }
    Ok(())
}

fn validate_optional_email(value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    validate_email("email", value)
}

impl Validate for Contact {
    fn validate(&self) -> Result<()> {
        if let Some(email) = self.email.as_deref() {
            validate_optional_email(email)?;
        }
        validate_optional_length("country", self.country.as_deref(), CONTACT_FIELD_MAX)?;
        validate_optional_length("city", self.city.as_deref(), CONTACT_FIELD_MAX)?;
        validate_optional_length("street", self.street.as_deref(), CONTACT_FIELD_MAX)?;
        validate_optional_length("house_number", self.house_number.as_deref(), HOUSE_NUMBER_MAX)
    }
}

impl Validate for NodeCreate {
    fn validate(&self) -> Result<()> {
        validate_node_name(&self.name)?;
        if let Some(contact) = &self.contact {
            contact.validate()?;
        }
        Ok(())
    }
}

impl Validate for NodeUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_node_name(name)?;
        }
        if let Some(contact) = &self.contact {
            contact.validate()?;
        }
        Ok(())
    }
}

fn validate_product_name(name: &str) -> Result<()> {
    validate_non_empty("name", name)?;
    validate_max_length("name", name, PRODUCT_NAME_MAX)
}

fn validate_product_model(model: &str) -> Result<()> {
    validate_non_empty("model", model)?;
    validate_max_length("model", model, PRODUCT_MODEL_MAX)
}

impl Validate for ProductCreate {
    fn validate(&self) -> Result<()> {
        validate_product_name(&self.name)?;
        validate_product_model(&self.model)?;
        validate_money("selling_price", self.selling_price)
    }
}

impl Validate for ProductUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(model) = &self.model {
            validate_product_model(model)?;
        }
        if let Some(price) = self.selling_price {
            validate_money("selling_price", price)?;
        }
        Ok(())
    }
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<()> {
        validate_username(&self.username)?;
        validate_max_length("first_name", &self.first_name, USER_FIELD_MAX)?;
        validate_max_length("last_name", &self.last_name, USER_FIELD_MAX)?;
        validate_optional_email(&self.email)
    }
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<()> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(first_name) = &self.first_name {
            validate_max_length("first_name", first_name, USER_FIELD_MAX)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_max_length("last_name", last_name, USER_FIELD_MAX)?;
        }
        if let Some(email) = &self.email {
            validate_optional_email(email)?;
        }
        Ok(())
    }
}

impl Validate for DebtUpdate {
    fn validate(&self) -> Result<()> {
        validate_money("debt_to_the_supplier", self.debt_to_the_supplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_update_distinguishes_null_from_missing() {
        let update: NodeUpdate = serde_json::from_str(r#"{"supplier": null}"#).unwrap();
        assert_eq!(update.supplier, Some(None));

        let update: NodeUpdate = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(update.supplier, None);

        let update: NodeUpdate = serde_json::from_str(r#"{"supplier": "RootCo"}"#).unwrap();
        assert_eq!(update.supplier, Some(Some("RootCo".to_string())));
    }

    #[test]
    fn test_node_create_ignores_read_only_fields() {
        let payload: NodeCreate = serde_json::from_str(
            r#"{"name": "Acme", "debt_to_the_supplier": "500.00", "id": 99}"#,
        )
        .unwrap();
        assert_eq!(payload.name, "Acme");
        assert!(payload.supplier.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_contact_validation() {
        let contact = Contact {
            email: Some("not-an-email".to_string()),
            ..Contact::default()
        };
        assert!(contact.validate().is_err());

        let contact = Contact {
            house_number: Some("12345678901".to_string()),
            ..Contact::default()
        };
        assert!(contact.validate().is_err());

        assert!(Contact::default().validate().is_ok());
    }

    #[test]
    fn test_node_name_limit_applies_after_trim() {
        let padded = format!("  {}  ", "a".repeat(NODE_NAME_MAX));
        assert!(validate_node_name(&padded).is_ok());
        assert!(validate_node_name(&"a".repeat(NODE_NAME_MAX + 1)).is_err());
        assert!(validate_node_name("   ").is_err());
    }

    #[test]
    fn test_username_characters() {
        assert!(validate_username("jane.doe+ops@corp").is_ok());
        assert!(validate_username("jane doe").is_err());
        assert!(validate_username("").is_err());
    }
}
