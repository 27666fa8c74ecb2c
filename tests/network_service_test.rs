use anyhow::Result;
use rust_decimal::Decimal;
use tempfile::TempDir;
use trade_network::core::Tier;
use trade_network::domain::model::Contact;
use trade_network::domain::requests::{NodeCreate, NodeListQuery, NodeUpdate};
use trade_network::{LocalStorage, NetworkService, TradeError};

fn node(name: &str, supplier: Option<&str>) -> NodeCreate {
    NodeCreate {
        name: name.to_string(),
        supplier: supplier.map(str::to_string),
        contact: None,
    }
}

#[tokio::test]
async fn test_supplier_chain_levels() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = NetworkService::open(LocalStorage::new(temp_dir.path())).await?;

    let factory = service.create_node(node("Factory", None)).await?;
    let retail = service.create_node(node("Retail", Some("Factory"))).await?;
    let shop = service.create_node(node("Shop", Some("Retail"))).await?;
    let kiosk = service.create_node(node("Kiosk", Some("Shop"))).await?;

    assert_eq!(factory.level, Tier::Zero);
    assert_eq!(retail.level, Tier::One);
    assert_eq!(shop.level, Tier::Two);
    // 超過兩層仍為 2
    assert_eq!(kiosk.level, Tier::Two);
    assert_eq!(shop.supplier.as_deref(), Some("Retail"));
    assert_eq!(shop.debt_to_the_supplier, Decimal::ZERO);

    Ok(())
}

#[tokio::test]
async fn test_unknown_supplier_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = NetworkService::open(LocalStorage::new(temp_dir.path())).await?;

    let result = service
        .create_node(NodeCreate {
            name: "Orphan".to_string(),
            supplier: Some("Ghost".to_string()),
            contact: Some(Contact {
                country: Some("Spain".to_string()),
                ..Contact::default()
            }),
        })
        .await;

    assert!(matches!(result, Err(TradeError::NotFound { .. })));
    assert!(service.list_nodes(&NodeListQuery::default()).await.is_empty());
    assert!(!temp_dir.path().join("network.json").exists());

    Ok(())
}

#[tokio::test]
async fn test_snapshot_survives_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;

    {
        let service = NetworkService::open(LocalStorage::new(temp_dir.path())).await?;
        service.create_node(node("Factory", None)).await?;
        service
            .create_node(NodeCreate {
                name: "Retail".to_string(),
                supplier: Some("Factory".to_string()),
                contact: Some(Contact {
                    country: Some("Chile".to_string()),
                    ..Contact::default()
                }),
            })
            .await?;
    }

    let service = NetworkService::open(LocalStorage::new(temp_dir.path())).await?;
    let chile = service
        .list_nodes(&NodeListQuery {
            country: Some("Chile".to_string()),
        })
        .await;
    assert_eq!(chile.len(), 1);
    assert_eq!(chile[0].name, "Retail");
    assert_eq!(chile[0].level, Tier::One);

    // ids keep increasing after a reopen
    let third = service.create_node(node("Shop", Some("Retail"))).await?;
    assert_eq!(third.id, 3);
    assert_eq!(third.level, Tier::Two);

    Ok(())
}

#[tokio::test]
async fn test_reassign_and_delete_supplier() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = NetworkService::open(LocalStorage::new(temp_dir.path())).await?;

    service.create_node(node("Factory", None)).await?;
    service.create_node(node("Retail", Some("Factory"))).await?;
    let shop = service.create_node(node("Shop", Some("Retail"))).await?;

    let moved = service
        .update_node(
            shop.id,
            NodeUpdate {
                supplier: Some(Some("Factory".to_string())),
                ..NodeUpdate::default()
            },
            true,
        )
        .await?;
    assert_eq!(moved.level, Tier::One);

    service.delete_node(1).await?;
    let retail = service.get_node(2).await?;
    assert_eq!(retail.supplier, None);
    assert_eq!(retail.level, Tier::One);

    Ok(())
}
