//! End-to-end offline round trip: sales completed without connectivity
//! are queued durably, then replayed exactly once by the background
//! worker when the connection comes back.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use checkout_core::pricing::compute_totals;
use checkout_core::store::{tables, MemoryRemoteStore, OfflineStore, RemoteStore, RemoteWriter};
use checkout_core::{CheckoutOrchestrator, ConnectivityMonitor, SaleRequest, SyncReconciler, SyncWorker};
use shared::models::{CashRegister, PaymentMethod, ProductSnapshot, RegisterStatus};
use shared::util::now_millis;
use shared::{Cart, CartProduct};

struct Terminal {
    remote: Arc<MemoryRemoteStore>,
    offline: Arc<OfflineStore>,
    connectivity: ConnectivityMonitor,
    orchestrator: CheckoutOrchestrator,
    reconciler: Arc<SyncReconciler>,
}

fn terminal(dir: &tempfile::TempDir, online: bool) -> Result<Terminal> {
    let remote = Arc::new(MemoryRemoteStore::new());
    let offline = Arc::new(OfflineStore::open(dir.path().join("offline.redb"))?);
    let connectivity = ConnectivityMonitor::new(online);
    let writer = RemoteWriter::new(remote.clone() as Arc<dyn RemoteStore>);
    let orchestrator =
        CheckoutOrchestrator::new(writer.clone(), offline.clone(), connectivity.clone());
    let reconciler = Arc::new(SyncReconciler::new(writer, offline.clone()));
    Ok(Terminal {
        remote,
        offline,
        connectivity,
        orchestrator,
        reconciler,
    })
}

fn cart_with(product_id: &str, price: f64, stock: i64, quantity: u32) -> Cart {
    let mut cart = Cart::new();
    cart.add_line(
        CartProduct::Catalog(ProductSnapshot {
            product_id: product_id.to_string(),
            name: format!("Product {product_id}"),
            price,
            stock,
        }),
        quantity,
    );
    cart
}

fn register() -> CashRegister {
    CashRegister {
        id: Some("reg-1".to_string()),
        name: "Till 1".to_string(),
        operator_id: None,
        status: RegisterStatus::Open,
        opening_amount: 50.0,
        cash_total: 0.0,
        card_total: 0.0,
        transfer_total: 0.0,
        transaction_count: 0,
        opened_at: now_millis(),
        closed_at: None,
    }
}

fn request(cart: Cart, payment_method: PaymentMethod) -> SaleRequest {
    let totals = compute_totals(&cart, &[], now_millis());
    SaleRequest {
        cart,
        totals,
        customer: None,
        register: Some(register()),
        payment_method,
    }
}

async fn wait_until_drained(offline: &OfflineStore) -> Result<()> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if offline.pending_count().unwrap_or(u64::MAX) == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn offline_sales_replay_once_on_reconnect() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let t = terminal(&dir, false)?;

    let shutdown = CancellationToken::new();
    let worker = SyncWorker::new(t.connectivity.clone(), t.reconciler.clone(), shutdown.clone());
    let worker_handle = tokio::spawn(worker.run());

    // Two sales at the till while the network is down
    let first = t
        .orchestrator
        .submit_sale(&request(cart_with("p1", 12.50, 6, 2), PaymentMethod::Cash))
        .await?;
    // Separate enqueue timestamps so replay order is deterministic
    tokio::time::sleep(Duration::from_millis(2)).await;
    let second = t
        .orchestrator
        .submit_sale(&request(cart_with("p2", 4.00, 9, 1), PaymentMethod::Card))
        .await?;

    assert!(first.offline && second.offline);
    assert_ne!(first.sale_id, second.sale_id);
    assert_eq!(t.offline.pending_count()?, 2);
    assert_eq!(t.remote.count(tables::SALES), 0);

    // Connection restored: the worker drains the queue in enqueue order
    t.connectivity.set_online(true);
    wait_until_drained(&t.offline).await?;

    let sales = t.remote.rows(tables::SALES);
    assert_eq!(sales.len(), 2);
    assert_eq!(sales[0]["total"].as_f64(), Some(25.0));
    assert_eq!(sales[1]["total"].as_f64(), Some(4.0));

    let items = t.remote.rows(tables::SALE_ITEMS);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_id"].as_str(), Some("p1"));
    assert_eq!(items[0]["quantity"].as_u64(), Some(2));

    let movements = t.remote.rows(tables::STOCK_MOVEMENTS);
    assert_eq!(movements.len(), 2);
    assert_eq!(movements[0]["previous_stock"].as_i64(), Some(6));
    assert_eq!(movements[0]["new_stock"].as_i64(), Some(4));

    // Flap the signal: redundant reconciles are no-ops, nothing is
    // replayed twice
    t.connectivity.set_online(false);
    t.connectivity.set_online(true);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(t.remote.count(tables::SALES), 2);
    assert_eq!(t.offline.pending_count()?, 0);

    shutdown.cancel();
    worker_handle.await?;
    Ok(())
}

#[tokio::test]
async fn queue_survives_process_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;

    // First "process": sell offline, then drop everything
    {
        let t = terminal(&dir, false)?;
        t.orchestrator
            .submit_sale(&request(cart_with("p1", 9.99, 3, 1), PaymentMethod::Cash))
            .await?;
        assert_eq!(t.offline.pending_count()?, 1);
    }

    // Second "process" reopens the same store and reconciles
    let t = terminal(&dir, true)?;
    assert_eq!(t.offline.pending_count()?, 1);

    let report = t.reconciler.reconcile().await?;
    assert_eq!(report.synced, 1);
    assert_eq!(t.offline.pending_count()?, 0);
    assert_eq!(t.remote.count(tables::SALES), 1);
    Ok(())
}
