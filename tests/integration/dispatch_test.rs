//! End-to-end tests for the alert dispatch pipeline.

mod helpers;

use chrono::{Duration, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use warehub_entity::alert::AlertStatus;
use warehub_entity::catalog::Audience;
use warehub_entity::communication::{ChannelToggles, CommunicationAlert};
use warehub_entity::record::{EntityKind, EntityRecord, EntityRef, Shipment, Task};
use warehub_service::DispatchRequest;
use warehub_service::template::{TemplateOrigin, TemplateSelector, VariableBuilder};

use helpers::TestApp;

fn shipment(tenant_id: Uuid, account_id: Uuid) -> Shipment {
    Shipment {
        id: Uuid::new_v4(),
        tenant_id,
        shipment_number: "SHP-1001".to_string(),
        shipment_type: Some("inbound".to_string()),
        status: Some("received".to_string()),
        account_id: Some(account_id),
        carrier: Some("FedEx Freight".to_string()),
        tracking_number: Some("TRK-778".to_string()),
        po_number: None,
        expected_arrival_date: None,
        received_at: Some(Utc::now()),
        notes: None,
    }
}

fn overdue_task(tenant_id: Uuid, days: i64) -> Task {
    Task {
        id: Uuid::new_v4(),
        tenant_id,
        title: "Inspect sofa".to_string(),
        task_type: Some("inspection".to_string()),
        status: Some("open".to_string()),
        priority: Some("high".to_string()),
        due_date: Some(Utc::now().date_naive() - Duration::days(days)),
        assigned_to: None,
        account_id: None,
        description: None,
        completed_at: None,
    }
}

#[tokio::test]
async fn test_client_alert_goes_only_to_account_contact() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    app.with_user("manager@acme-storage.test", &["manager"]).await;
    app.with_trigger("shipment_received", Audience::Client).await;
    let account = app
        .with_account("Globex Interiors", Some("Receiving@Globex.test"))
        .await;
    let shipment = shipment(app.tenant_id, account.id);
    app.store
        .insert_record(app.tenant_id, EntityRecord::Shipment(shipment.clone()))
        .await;
    let alert = app
        .enqueue("shipment_received", Some(("shipment", shipment.id)))
        .await;

    let summary = app
        .dispatcher
        .run_batch(&DispatchRequest::default())
        .await
        .unwrap();
    assert_eq!(summary.sent, 1);

    let sent = app.outbox.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["receiving@globex.test".to_string()]);
    assert_eq!(sent[0].subject, "Shipment SHP-1001 received");
    assert!(sent[0].html.contains("SHP-1001"));
    assert!(sent[0].html.contains("Globex Interiors"));
    assert!(sent[0].html.contains("FedEx Freight"));
    assert!(!sent[0].html.contains("{{"));

    assert_eq!(app.status(alert.id).await, AlertStatus::Sent);
    assert!(app.store.notifications().await.is_empty());

    let selected = TemplateSelector::new(std::sync::Arc::new(app.store.clone()))
        .resolve_email(&alert)
        .await;
    assert_eq!(selected.origin, TemplateOrigin::Bundled);
}

#[tokio::test]
async fn test_unresolvable_recipients_fail_without_sending() {
    let app = TestApp::new();
    let alert = app.enqueue("task_overdue", None).await;

    let summary = app
        .dispatcher
        .run_batch(&DispatchRequest::default())
        .await
        .unwrap();
    assert_eq!(summary.failed, 1);
    assert!(app.outbox.sent().await.is_empty());

    let stored = app.store.alert(alert.id).await.unwrap();
    assert_eq!(stored.status, AlertStatus::Failed);
    let message = stored.error_message.unwrap();
    assert!(message.contains("office alert emails"));
    assert!(message.contains("manager"));
}

#[tokio::test]
async fn test_disabled_email_channel_is_skipped() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    app.store
        .insert_alert_config(CommunicationAlert {
            id: Uuid::new_v4(),
            tenant_id: app.tenant_id,
            trigger_event: "invoice_created".to_string(),
            is_enabled: true,
            channels: Json(ChannelToggles {
                email: false,
                ..ChannelToggles::default()
            }),
            recipient_emails: None,
            updated_at: Some(Utc::now()),
        })
        .await;
    let alert = app.enqueue("invoice_created", None).await;

    let summary = app
        .dispatcher
        .run_batch(&DispatchRequest::default())
        .await
        .unwrap();
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.message, "Processed 1 alert(s): 0 sent, 0 failed, 1 skipped");
    assert!(app.outbox.sent().await.is_empty());

    let stored = app.store.alert(alert.id).await.unwrap();
    assert_eq!(stored.status, AlertStatus::Skipped);
    assert!(stored.error_message.unwrap().contains("Email channel is disabled"));
}

#[tokio::test]
async fn test_task_overdue_reports_days_overdue() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    let task = overdue_task(app.tenant_id, 3);
    app.store
        .insert_record(app.tenant_id, EntityRecord::Task(task.clone()))
        .await;

    let builder = VariableBuilder::new(
        std::sync::Arc::new(app.store.clone()),
        std::sync::Arc::new(app.store.clone()),
        std::sync::Arc::new(app.store.clone()),
        std::sync::Arc::new(app.store.clone()),
        "https://app.warehub.app",
    );
    let vars = builder
        .build(
            "task_overdue",
            Some(EntityRef::new(EntityKind::Task, task.id)),
            app.tenant_id,
        )
        .await;
    assert_eq!(vars.variables["task_days_overdue"], "3");

    let alert = app.enqueue("task_overdue", Some(("task", task.id))).await;
    app.dispatcher.run_batch(&DispatchRequest::default()).await.unwrap();

    let sent = app.outbox.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Overdue task: Inspect sofa (3 days)");
    assert_eq!(app.status(alert.id).await, AlertStatus::Sent);
}

#[tokio::test]
async fn test_both_audience_merges_internal_and_client_recipients() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    let manager = app.with_user("manager@acme-storage.test", &["Manager"]).await;
    app.with_trigger("shipment_received", Audience::Both).await;
    let account = app
        .with_account("Globex Interiors", Some("receiving@globex.test"))
        .await;
    app.store
        .subscribe_client_contact(
            app.tenant_id,
            "shipment_received",
            "globex interiors",
            "dock@globex.test",
        )
        .await;
    let shipment = shipment(app.tenant_id, account.id);
    app.store
        .insert_record(app.tenant_id, EntityRecord::Shipment(shipment.clone()))
        .await;
    app.enqueue("shipment_received", Some(("shipment", shipment.id)))
        .await;

    app.dispatcher.run_batch(&DispatchRequest::default()).await.unwrap();

    let sent = app.outbox.sent().await;
    assert_eq!(
        sent[0].to,
        vec![
            "ops@acme-storage.test".to_string(),
            "dock@globex.test".to_string()
        ]
    );

    let notifications = app.store.notifications().await;
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].user_id, manager.id);
    assert_eq!(notifications[0].entity_id, Some(shipment.id));
}

#[tokio::test]
async fn test_batch_scope_and_limit() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    let first = app.enqueue("shipment_received", None).await;
    let second = app.enqueue("shipment_received", None).await;
    let other_tenant = helpers::pending_alert(Uuid::new_v4(), "shipment_received", None);
    app.store.insert_alert(other_tenant.clone()).await;

    let summary = app
        .dispatcher
        .run_batch(&DispatchRequest {
            alert_id: Some(second.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(app.status(second.id).await, AlertStatus::Sent);
    assert_eq!(app.status(first.id).await, AlertStatus::Pending);

    let summary = app
        .dispatcher
        .run_batch(&DispatchRequest {
            tenant_id: Some(app.tenant_id),
            limit: Some(10),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(app.status(first.id).await, AlertStatus::Sent);
    assert_eq!(app.status(other_tenant.id).await, AlertStatus::Pending);
}

#[tokio::test]
async fn test_provider_rejection_fails_alert_and_batch_continues() {
    let app = TestApp::new();
    app.with_office_emails("ops@acme-storage.test").await;
    app.outbox
        .fail_with("Email provider rejected the message (403): domain not verified")
        .await;
    let first = app.enqueue("shipment_received", None).await;
    let second = app.enqueue("task_overdue", None).await;

    let summary = app
        .dispatcher
        .run_batch(&DispatchRequest::default())
        .await
        .unwrap();
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 2);

    for id in [first.id, second.id] {
        let stored = app.store.alert(id).await.unwrap();
        assert_eq!(stored.status, AlertStatus::Failed);
        assert!(stored.error_message.unwrap().contains("domain not verified"));
    }
}
