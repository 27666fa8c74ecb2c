use crate::core::network::{NetworkService, NetworkTables};
use crate::core::Storage;
use crate::domain::model::{
    money, AdminLink, AdminNodeDetail, AdminNodeRow, AdminProductRow, Node, NodeId,
};
use crate::domain::requests::{AdminNodeQuery, AdminProductQuery, DebtUpdate};
use crate::utils::error::{Result, TradeError};
use crate::utils::validation::Validate;
use rust_decimal::Decimal;

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl NetworkTables {
    fn supplier_link(&self, node: &Node) -> Option<AdminLink> {
        let supplier = node.supplier?;
        self.node_name(supplier)
            .map(|name| AdminLink::to_node(supplier, name))
    }

    fn admin_row(&self, node: &Node) -> AdminNodeRow {
        AdminNodeRow {
            id: node.id,
            name: node.name.clone(),
            level: node.tier,
            to_supplier: self.supplier_link(node),
            debt_to_the_supplier: node.debt_to_the_supplier,
        }
    }
}

// 後台操作：列表、搜尋、批次清除欠款
impl<S: Storage> NetworkService<S> {
    pub async fn admin_node_rows(&self, query: &AdminNodeQuery) -> Vec<AdminNodeRow> {
        self.store
            .read(|tables| {
                tables
                    .ordered_nodes()
                    .into_iter()
                    .filter(|node| match query.city.as_deref() {
                        Some(city) => {
                            tables.contacts.get(&node.id).and_then(|c| c.city.as_deref())
                                == Some(city)
                        }
                        None => true,
                    })
                    .filter(|node| match query.search.as_deref() {
                        Some(search) => contains_ignore_case(&node.name, search),
                        None => true,
                    })
                    .map(|node| tables.admin_row(node))
                    .collect()
            })
            .await
    }

    pub async fn admin_node_detail(&self, id: NodeId) -> Result<AdminNodeDetail> {
        self.store
            .read(|tables| {
                let node = tables.node(id)?;
                Ok(AdminNodeDetail {
                    id: node.id,
                    name: node.name.clone(),
                    level: node.tier,
                    supplier: tables.supplier_link(node),
                    debt_to_the_supplier: node.debt_to_the_supplier,
                    date_of_creation: node.date_of_creation,
                    contact: tables.contact(id),
                    products: tables
                        .ordered_products()
                        .into_iter()
                        .filter(|product| product.owner == id)
                        .cloned()
                        .collect(),
                })
            })
            .await
    }

    /// Sets the debt of every selected node to zero. Unknown ids are skipped.
    pub async fn clear_debt(&self, ids: &[NodeId]) -> Result<usize> {
        let ids = ids.to_vec();
        let cleared = self
            .store
            .write(move |tables| {
                let mut cleared = 0;
                for id in &ids {
                    if let Some(node) = tables.nodes.get_mut(id) {
                        node.debt_to_the_supplier = money(Decimal::ZERO);
                        cleared += 1;
                    }
                }
                Ok(cleared)
            })
            .await?;

        tracing::info!("🧹 Cleared debt to the supplier for {} node(s)", cleared);
        Ok(cleared)
    }

    pub async fn set_debt(&self, id: NodeId, update: DebtUpdate) -> Result<AdminNodeRow> {
        update.validate()?;
        let row = self
            .store
            .write(move |tables| {
                let node = tables.node_mut(id)?;
                node.debt_to_the_supplier = money(update.debt_to_the_supplier);
                Ok(tables.admin_row(tables.node(id)?))
            })
            .await?;

        tracing::info!(
            "💰 Debt of node '{}' set to {}",
            row.name,
            row.debt_to_the_supplier
        );
        Ok(row)
    }

    pub async fn admin_product_rows(&self, query: &AdminProductQuery) -> Vec<AdminProductRow> {
        self.store
            .read(|tables| {
                tables
                    .ordered_products()
                    .into_iter()
                    .filter(|product| match query.search.as_deref() {
                        Some(search) => {
                            contains_ignore_case(&product.name, search)
                                || contains_ignore_case(&product.model, search)
                                || product.release_date.to_string().contains(search)
                        }
                        None => true,
                    })
                    .filter_map(|product| {
                        let owner = tables.node_name(product.owner)?;
                        Some(AdminProductRow {
                            id: product.id,
                            name: product.name.clone(),
                            model: product.model.clone(),
                            release_date: product.release_date,
                            owner: AdminLink::to_node(product.owner, owner),
                        })
                    })
                    .collect()
            })
            .await
    }
}

/// Rejects callers that are not staff.
pub fn require_staff(is_staff: bool) -> Result<()> {
    if is_staff {
        Ok(())
    } else {
        Err(TradeError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::domain::model::{Contact, Tier};
    use crate::domain::requests::{NodeCreate, ProductCreate};
    use chrono::NaiveDate;
    use std::str::FromStr;

    async fn seeded() -> NetworkService<MemoryStorage> {
        let service = NetworkService::open(MemoryStorage::new()).await.unwrap();
        for (name, supplier, city) in [
            ("RootCo", None, "Berlin"),
            ("Acme Retail", Some("RootCo"), "Paris"),
            ("Acme Corner", Some("Acme Retail"), "Berlin"),
        ] {
            service
                .create_node(NodeCreate {
                    name: name.to_string(),
                    supplier: supplier.map(str::to_string),
                    contact: Some(Contact {
                        city: Some(city.to_string()),
                        ..Contact::default()
                    }),
                })
                .await
                .unwrap();
        }
        service
    }

    #[tokio::test]
    async fn test_rows_filter_by_city_and_search() {
        let service = seeded().await;

        let berlin = service
            .admin_node_rows(&AdminNodeQuery {
                city: Some("Berlin".to_string()),
                search: None,
            })
            .await;
        let names: Vec<&str> = berlin.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["RootCo", "Acme Corner"]);

        let acme = service
            .admin_node_rows(&AdminNodeQuery {
                city: None,
                search: Some("acme".to_string()),
            })
            .await;
        assert_eq!(acme.len(), 2);
        assert_eq!(acme[0].level, Tier::One);
        let link = acme[0].to_supplier.as_ref().unwrap();
        assert_eq!(link.name, "RootCo");
        assert_eq!(link.href, "/admin/node/1");
    }

    #[tokio::test]
    async fn test_set_and_clear_debt() {
        let service = seeded().await;
        let amount = Decimal::from_str("1500.25").unwrap();

        let row = service
            .set_debt(
                2,
                DebtUpdate {
                    debt_to_the_supplier: amount,
                },
            )
            .await
            .unwrap();
        assert_eq!(row.debt_to_the_supplier, amount);
        service
            .set_debt(
                3,
                DebtUpdate {
                    debt_to_the_supplier: amount,
                },
            )
            .await
            .unwrap();

        let negative = DebtUpdate {
            debt_to_the_supplier: Decimal::from_str("-1").unwrap(),
        };
        assert!(service.set_debt(2, negative).await.is_err());

        let cleared = service.clear_debt(&[2, 3, 404]).await.unwrap();
        assert_eq!(cleared, 2);
        let rows = service.admin_node_rows(&AdminNodeQuery::default()).await;
        assert!(rows.iter().all(|r| r.debt_to_the_supplier.is_zero()));
    }

    #[tokio::test]
    async fn test_detail_and_product_search() {
        let service = seeded().await;
        service
            .create_product(ProductCreate {
                owner: 2,
                name: "Kettle".to_string(),
                model: "K-9".to_string(),
                release_date: NaiveDate::from_ymd_opt(2022, 11, 3).unwrap(),
                selling_price: Decimal::from(40),
            })
            .await
            .unwrap();

        let detail = service.admin_node_detail(2).await.unwrap();
        assert_eq!(detail.products.len(), 1);
        assert_eq!(detail.contact.city.as_deref(), Some("Paris"));

        let by_date = service
            .admin_product_rows(&AdminProductQuery {
                search: Some("2022-11".to_string()),
            })
            .await;
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].owner.name, "Acme Retail");

        let none = service
            .admin_product_rows(&AdminProductQuery {
                search: Some("toaster".to_string()),
            })
            .await;
        assert!(none.is_empty());
    }

    #[test]
    fn test_require_staff() {
        assert!(require_staff(true).is_ok());
        assert!(matches!(require_staff(false), Err(TradeError::PermissionDenied)));
    }
}
