//! Full create, read, update and delete cycle against a mock API.

use prodata_core::ConfigLayer;
use prodata_provider::{
    Action, Attr, ByIdQuery, DataSource, ImageQuery, Lifecycle, Provider, Scope, Tracked, VolumeState,
};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data, "errors": []}))
}

fn volume(name: &str) -> serde_json::Value {
    json!({
        "id": 101, "name": name, "type": "SSD", "size": 20,
        "inUse": false, "attachedId": null
    })
}

fn configured(server: &MockServer) -> Provider {
    let mut provider = Provider::new("0.1.0");
    let diags = provider.configure_with(
        ConfigLayer {
            api_base_url: Some(server.uri()),
            api_key_id: Some("key-id".to_string()),
            api_secret_key: Some(SecretString::from("secret".to_string())),
            region: Some("KZ-1".to_string()),
            project_id: Some(10),
        },
        |_| None,
    );
    assert!(diags.is_empty(), "{diags:?}");
    provider
}

#[tokio::test]
async fn volume_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/panel-main/api/v2/volumes"))
        .and(header("user-agent", "terraform-provider-prodata/0.1.0"))
        .and(body_json(json!({
            "region": "KZ-1", "projectId": 10, "name": "data", "type": "SSD", "size": 20
        })))
        .respond_with(ok(volume("data")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/panel-main/api/v2/volumes/101"))
        .and(header("x-region", "KZ-1"))
        .respond_with(ok(volume("data")))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/panel-main/api/v2/volumes/101"))
        .and(query_param("region", "KZ-1"))
        .and(query_param("projectId", "10"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ok(volume("renamed")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/panel-main/api/v2/volumes/101"))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let provider = configured(&server);
    let volumes = provider.volume_resource().unwrap();
    let desired = VolumeState::new("data", "SSD", 20);

    // Create
    let mut current = Tracked::planned();
    let plan = volumes.plan(&current, Some(&desired));
    assert_eq!(plan.action, Action::Create);
    volumes.apply(&mut current, &plan).await.unwrap();
    assert_eq!(current.lifecycle, Lifecycle::Created);
    let created = current.state.clone().unwrap();
    assert_eq!(created.id, Attr::Known(101));
    assert_eq!(created.region, Attr::Known("KZ-1".to_string()));
    assert_eq!(created.project_id, Attr::Known(10));

    // Read returns the same server-controlled fields
    let current = volumes.refresh(&current).await.unwrap();
    assert_eq!(current.lifecycle, Lifecycle::Synced);
    assert_eq!(current.state.as_ref(), Some(&created));

    // Persisted state round-trips through JSON
    let saved = serde_json::to_value(current.state.as_ref().unwrap()).unwrap();
    let restored: VolumeState = serde_json::from_value(saved).unwrap();
    let mut current = Tracked::synced(restored);

    // Update: only the name changes
    let renamed = VolumeState::new("renamed", "SSD", 20);
    let plan = volumes.plan(&current, Some(&renamed));
    assert_eq!(plan.action, Action::Update);
    volumes.apply(&mut current, &plan).await.unwrap();
    assert_eq!(current.lifecycle, Lifecycle::Updated);
    assert_eq!(current.state.as_ref().unwrap().name, "renamed");

    // Delete
    let plan = volumes.plan(&current, None);
    assert_eq!(plan.action, Action::Delete);
    volumes.apply(&mut current, &plan).await.unwrap();
    assert_eq!(current.state, None);
    assert_eq!(current.lifecycle, Lifecycle::Deleted);
}

#[tokio::test]
async fn vanished_volume_leaves_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/panel-main/api/v2/volumes/101"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "errors": [{"code": 404, "message": "volume not found"}]
        })))
        .mount(&server)
        .await;

    let provider = configured(&server);
    let volumes = provider.volume_resource().unwrap();
    let mut state = VolumeState::new("data", "SSD", 20)
        .with_region("KZ-1")
        .with_project_id(10);
    state.id = Attr::Known(101);

    let refreshed = volumes.refresh(&Tracked::synced(state)).await.unwrap();
    assert_eq!(refreshed.state, None);
    assert_eq!(refreshed.lifecycle, Lifecycle::Deleted);
}

#[tokio::test]
async fn data_sources_read_through_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/panel-main/api/v2/image"))
        .and(query_param("slug", "ubuntu-22.04"))
        .and(header("x-region", "UZ-5"))
        .respond_with(ok(json!({
            "id": 3, "name": "Ubuntu 22.04", "slug": "ubuntu-22.04", "isCustom": false
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/panel-main/api/v2/local-networks/7"))
        .respond_with(ok(json!({
            "id": 7, "name": "private", "cidr": "10.0.0.0/24",
            "gateway": "10.0.0.1", "linked": true
        })))
        .mount(&server)
        .await;

    let provider = configured(&server);

    let query: ImageQuery =
        serde_json::from_value(json!({"slug": "ubuntu-22.04", "region": "UZ-5"})).unwrap();
    let image = provider.image_data_source().unwrap().read(&query).await.unwrap();
    assert_eq!(image.item.id, 3);
    assert_eq!(image.region, "UZ-5");

    let network = provider
        .local_network_data_source()
        .unwrap()
        .read(&ByIdQuery {
            id: 7,
            scope: Scope::default(),
        })
        .await
        .unwrap();
    assert!(network.item.linked);
    assert_eq!(network.project_id, 10);
}
