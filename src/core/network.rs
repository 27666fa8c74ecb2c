use crate::core::store::SnapshotStore;
use crate::core::tier;
use crate::core::Storage;
use crate::domain::model::{money, Contact, Node, NodeId, NodeView, Product, ProductId};
use crate::domain::ports::NodeLookup;
use crate::domain::requests::{
    NodeCreate, NodeListQuery, NodeUpdate, ProductCreate, ProductListQuery, ProductUpdate,
};
use crate::utils::error::{Result, TradeError};
use crate::utils::validation::Validate;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NETWORK_SNAPSHOT: &str = "network.json";

/// Nodes, their contacts and products.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkTables {
    next_node_id: NodeId,
    next_product_id: ProductId,
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) contacts: BTreeMap<NodeId, Contact>,
    pub(crate) products: BTreeMap<ProductId, Product>,
}

impl NetworkTables {
    fn allocate_node_id(&mut self) -> NodeId {
        self.next_node_id += 1;
        self.next_node_id
    }

    fn allocate_product_id(&mut self) -> ProductId {
        self.next_product_id += 1;
        self.next_product_id
    }

    pub(crate) fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|node| node.name == name)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| TradeError::not_found("node", id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| TradeError::not_found("node", id))
    }

    fn supplier_id(&self, name: Option<&str>) -> Result<Option<NodeId>> {
        match name {
            Some(name) => self
                .node_by_name(name)
                .map(|node| Some(node.id))
                .ok_or_else(|| TradeError::not_found("node", name)),
            None => Ok(None),
        }
    }

    pub(crate) fn node_name(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|node| node.name.as_str())
    }

    pub(crate) fn contact(&self, id: NodeId) -> Contact {
        self.contacts.get(&id).cloned().unwrap_or_default()
    }

    pub(crate) fn view(&self, id: NodeId) -> Result<NodeView> {
        let node = self.node(id)?;
        Ok(NodeView {
            id: node.id,
            name: node.name.clone(),
            supplier: node
                .supplier
                .and_then(|supplier| self.node_name(supplier))
                .map(str::to_string),
            level: node.tier,
            debt_to_the_supplier: node.debt_to_the_supplier,
            date_of_creation: node.date_of_creation,
            contact: self.contact(id),
        })
    }

    fn product(&self, id: ProductId) -> Result<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| TradeError::not_found("product", id))
    }

    /// 依 level 排序，同層依建立順序
    pub(crate) fn ordered_nodes(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by_key(|node| (node.tier, node.id));
        nodes
    }

    pub(crate) fn ordered_products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.products.values().collect();
        products.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.model.cmp(&b.model))
                .then_with(|| a.id.cmp(&b.id))
        });
        products
    }

    fn ensure_unique_name(&self, name: &str, except: Option<NodeId>) -> Result<()> {
        match self.node_by_name(name) {
            Some(existing) if Some(existing.id) != except => Err(TradeError::conflict(format!(
                "trading network member with this name already exists: {}",
                name
            ))),
            _ => Ok(()),
        }
    }
}

impl NodeLookup for NetworkTables {
    fn supplier_of(&self, name: &str) -> Result<Option<NodeId>> {
        self.node_by_name(name)
            .map(|node| node.supplier)
            .ok_or_else(|| TradeError::not_found("node", name))
    }
}

pub struct NetworkService<S: Storage> {
    pub(crate) store: SnapshotStore<NetworkTables, S>,
}

impl<S: Storage> NetworkService<S> {
    pub async fn open(storage: S) -> Result<Self> {
        let store = SnapshotStore::open(storage, NETWORK_SNAPSHOT).await?;
        Ok(Self { store })
    }

    /// Creates a node and its contact in one commit. The level always comes
    /// from the tier classifier.
    pub async fn create_node(&self, payload: NodeCreate) -> Result<NodeView> {
        payload.validate()?;
        let name = payload.name.trim().to_string();

        let view = self
            .store
            .write(move |tables| {
                tables.ensure_unique_name(&name, None)?;

                let supplier = payload.supplier.as_deref().map(str::trim);
                let tier = tier::classify(&*tables, supplier)?;
                let supplier_id = tables.supplier_id(supplier)?;

                let id = tables.allocate_node_id();
                tables.nodes.insert(
                    id,
                    Node {
                        id,
                        name,
                        supplier: supplier_id,
                        tier,
                        debt_to_the_supplier: money(Decimal::ZERO),
                        date_of_creation: Utc::now(),
                    },
                );
                tables
                    .contacts
                    .insert(id, payload.contact.unwrap_or_default());

                tables.view(id)
            })
            .await?;

        tracing::info!(
            "🏭 Created node '{}' (id={}, level={}, supplier={:?})",
            view.name,
            view.id,
            view.level,
            view.supplier
        );
        Ok(view)
    }

    pub async fn list_nodes(&self, query: &NodeListQuery) -> Vec<NodeView> {
        self.store
            .read(|tables| {
                tables
                    .ordered_nodes()
                    .into_iter()
                    .filter(|node| match query.country.as_deref() {
                        Some(country) => {
                            tables.contacts.get(&node.id).and_then(|c| c.country.as_deref())
                                == Some(country)
                        }
                        None => true,
                    })
                    .filter_map(|node| tables.view(node.id).ok())
                    .collect()
            })
            .await
    }

    pub async fn get_node(&self, id: NodeId) -> Result<NodeView> {
        self.store.read(|tables| tables.view(id)).await
    }

    /// Updates name, supplier and/or contact. `partial` is false for a full
    /// replacement, which requires the name.
    pub async fn update_node(
        &self,
        id: NodeId,
        payload: NodeUpdate,
        partial: bool,
    ) -> Result<NodeView> {
        if !partial && payload.name.is_none() {
            return Err(TradeError::validation("name", "This field is required"));
        }
        payload.validate()?;

        let view = self
            .store
            .write(move |tables| {
                tables.node(id)?;

                if let Some(supplier) = &payload.supplier {
                    let supplier = supplier.as_deref().map(str::trim);
                    let supplier_id = tables.supplier_id(supplier)?;
                    if supplier_id == Some(id) {
                        return Err(TradeError::validation(
                            "supplier",
                            "A node cannot be its own supplier",
                        ));
                    }
                    let tier = tier::classify(&*tables, supplier)?;

                    let node = tables.node_mut(id)?;
                    node.supplier = supplier_id;
                    node.tier = tier;
                }

                if let Some(name) = &payload.name {
                    let name = name.trim();
                    tables.ensure_unique_name(name, Some(id))?;
                    tables.node_mut(id)?.name = name.to_string();
                }

                if let Some(contact) = payload.contact {
                    tables.contacts.insert(id, contact);
                }

                tables.view(id)
            })
            .await?;

        tracing::info!("✏️ Updated node '{}' (id={}, level={})", view.name, id, view.level);
        Ok(view)
    }

    /// Removes the node with its contact and products. Nodes it supplied lose
    /// their supplier reference; their stored level is left as it was.
    pub async fn delete_node(&self, id: NodeId) -> Result<()> {
        let (name, orphaned) = self
            .store
            .write(move |tables| {
                let node = tables
                    .nodes
                    .remove(&id)
                    .ok_or_else(|| TradeError::not_found("node", id))?;
                tables.contacts.remove(&id);
                tables.products.retain(|_, product| product.owner != id);

                let mut orphaned = 0usize;
                for dependent in tables.nodes.values_mut() {
                    if dependent.supplier == Some(id) {
                        dependent.supplier = None;
                        orphaned += 1;
                    }
                }
                Ok((node.name, orphaned))
            })
            .await?;

        tracing::info!("🗑️ Deleted node '{}' (id={})", name, id);
        if orphaned > 0 {
            tracing::warn!(
                "⚠️ {} node(s) lost their supplier '{}' and keep their previous level",
                orphaned,
                name
            );
        }
        Ok(())
    }

    pub async fn update_contact(&self, id: NodeId, contact: Contact) -> Result<Contact> {
        contact.validate()?;
        let contact = self
            .store
            .write(move |tables| {
                tables.node(id)?;
                tables.contacts.insert(id, contact.clone());
                Ok(contact)
            })
            .await?;

        tracing::debug!("Updated contact of node {}", id);
        Ok(contact)
    }

    pub async fn create_product(&self, payload: ProductCreate) -> Result<Product> {
        payload.validate()?;
        let product = self
            .store
            .write(move |tables| {
                tables.node(payload.owner)?;
                let id = tables.allocate_product_id();
                let product = Product {
                    id,
                    owner: payload.owner,
                    name: payload.name.trim().to_string(),
                    model: payload.model.trim().to_string(),
                    release_date: payload.release_date,
                    selling_price: money(payload.selling_price),
                };
                tables.products.insert(id, product.clone());
                Ok(product)
            })
            .await?;

        tracing::info!(
            "📦 Created product '{}' {} (id={}, owner={})",
            product.name,
            product.model,
            product.id,
            product.owner
        );
        Ok(product)
    }

    pub async fn list_products(&self, query: &ProductListQuery) -> Vec<Product> {
        self.store
            .read(|tables| {
                tables
                    .ordered_products()
                    .into_iter()
                    .filter(|product| query.owner.map_or(true, |owner| product.owner == owner))
                    .cloned()
                    .collect()
            })
            .await
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.store.read(|tables| tables.product(id).cloned()).await
    }

    pub async fn update_product(&self, id: ProductId, payload: ProductUpdate) -> Result<Product> {
        payload.validate()?;
        self.store
            .write(move |tables| {
                if let Some(owner) = payload.owner {
                    tables.node(owner)?;
                }
                let product = tables
                    .products
                    .get_mut(&id)
                    .ok_or_else(|| TradeError::not_found("product", id))?;

                if let Some(owner) = payload.owner {
                    product.owner = owner;
                }
                if let Some(name) = payload.name {
                    product.name = name.trim().to_string();
                }
                if let Some(model) = payload.model {
                    product.model = model.trim().to_string();
                }
                if let Some(release_date) = payload.release_date {
                    product.release_date = release_date;
                }
                if let Some(price) = payload.selling_price {
                    product.selling_price = money(price);
                }
                Ok(product.clone())
            })
            .await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.store
            .write(move |tables| {
                tables
                    .products
                    .remove(&id)
                    .map(|_| ())
                    .ok_or_else(|| TradeError::not_found("product", id))
            })
            .await?;
        tracing::info!("🗑️ Deleted product {}", id);
        Ok(())
    }
}
