//! Tests for the client

use super::*;
use crate::config::{DEFAULT_CATALOG_URL, DERDEN_CATALOG_URL};
use crate::error::ErrorKind;
use crate::odata::{DatasetKind, Select};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE: &str = "82010NED";

fn host(server: &MockServer) -> String {
    server.address().to_string()
}

fn client_for(server: &MockServer) -> Client {
    Client::new(Options::new().with_catalog_url(host(server))).unwrap()
}

fn table_path(resource: &str) -> String {
    format!("/ODataApi/odata/{TABLE}/{resource}")
}

fn info_record(identifier: &str) -> serde_json::Value {
    json!({
        "ID": 1,
        "Title": "Bevolking; kerncijfers",
        "Identifier": identifier,
        "Description": "Kerncijfers over de bevolking",
        "DefaultSelection": "$filter=((Perioden eq '2016JJ00'))&$select=ID, Geslacht, Perioden"
    })
}

async fn mount_info(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(table_path("TableInfos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_service_document(server: &MockServer) {
    let base = format!("{}/ODataApi/odata/{TABLE}", server.uri());
    let names = ["TableInfos", "UntypedDataSet", "TypedDataSet", "DataProperties"];
    let value: Vec<_> = names
        .iter()
        .map(|name| json!({"name": name, "url": format!("{base}/{name}")}))
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/ODataApi/odata/{TABLE}/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "odata.metadata": format!("{base}/$metadata"),
            "value": value
        })))
        .mount(server)
        .await;
}

async fn mount_resource(server: &MockServer, resource: &str, value: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(table_path(resource)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": value})))
        .mount(server)
        .await;
}

// ============================================================================
// Metadata Tests
// ============================================================================

#[tokio::test]
async fn test_get_info() {
    let server = MockServer::start().await;
    mount_info(&server, json!({"value": [info_record(TABLE)]})).await;

    let client = client_for(&server);
    let info = client.get_info(TABLE, None).await.unwrap();

    assert_eq!(info.identifier(), Some(TABLE));
    assert_eq!(info.description(), Some("Kerncijfers over de bevolking"));
    assert_eq!(info.id(), Some(&json!(1)));
    assert_eq!(info.title(), Some("Bevolking; kerncijfers"));
    for key in REQUIRED_INFO_KEYS {
        assert!(info.contains_key(key));
    }

    let query = info.default_query();
    assert_eq!(query.filter.as_deref(), Some("((Perioden eq '2016JJ00'))"));
    assert_eq!(query.select, Some(Select::from("ID, Geslacht, Perioden")));
}

#[tokio::test]
async fn test_get_info_not_found() {
    let server = MockServer::start().await;
    mount_info(&server, json!({"value": []})).await;

    let err = client_for(&server).get_info(TABLE, None).await.unwrap_err();
    assert!(matches!(err, Error::TableNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[tokio::test]
async fn test_get_info_ambiguous() {
    let server = MockServer::start().await;
    mount_info(
        &server,
        json!({"value": [info_record(TABLE), info_record(TABLE)]}),
    )
    .await;

    let err = client_for(&server).get_info(TABLE, None).await.unwrap_err();
    assert!(matches!(err, Error::AmbiguousMetadata { count: 2, .. }));
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[tokio::test]
async fn test_get_info_missing_key() {
    let server = MockServer::start().await;
    mount_info(&server, json!({"value": [{"ID": 1, "Identifier": TABLE}]})).await;

    let err = client_for(&server).get_info(TABLE, None).await.unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref key, .. } if key == "Description"));
    assert_eq!(err.kind(), ErrorKind::DataContract);
}

#[test]
fn test_table_info_deserialize_checks_keys() {
    let err = serde_json::from_value::<TableInfo>(json!({})).unwrap_err();
    assert!(err
        .to_string()
        .contains("Missing required key 'Description' in TableInfos"));

    let err = serde_json::from_value::<TableInfo>(json!({
        "Description": "x",
        "Identifier": TABLE
    }))
    .unwrap_err();
    assert!(err.to_string().contains("'ID'"));

    let err = TableInfo::try_from(Record::new()).unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref key, .. } if key == "Description"));
    assert_eq!(err.kind(), ErrorKind::DataContract);
}

#[test]
fn test_table_info_serializes_as_record() {
    let value = json!({"Description": "x", "ID": 1, "Identifier": TABLE});
    let info: TableInfo = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(info.id(), Some(&json!(1)));
    assert_eq!(serde_json::to_value(&info).unwrap(), value);
}

#[tokio::test]
async fn test_get_info_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(table_path("TableInfos")))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let err = client_for(&server).get_info(TABLE, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_get_info_invalid_table_id() {
    let server = MockServer::start().await;
    let err = client_for(&server)
        .get_info("../ODataCatalog", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
}

#[tokio::test]
async fn test_get_table_list_follows_next_link() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ODataCatalog/Tables"))
        .and(query_param("$format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"Identifier": "82010NED"}, {"Identifier": "80884ENG"}],
            "odata.nextLink": format!("{}/ODataCatalog/Tables?$skip=2", server.uri())
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ODataCatalog/Tables"))
        .and(query_param("$skip", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"Identifier": "82070ENG"}]
        })))
        .mount(&server)
        .await;

    let tables = client_for(&server).get_table_list(None).await.unwrap();
    let ids: Vec<&str> = tables
        .iter()
        .map(|t| t["Identifier"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["82010NED", "80884ENG", "82070ENG"]);
}

#[tokio::test]
async fn test_get_table_list_with_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ODataCatalog/Tables"))
        .and(query_param("$select", "Identifier, Title"))
        .and(query_param("$filter", "Language eq 'nl'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"Identifier": "82010NED", "Title": "Bevolking"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = QueryOptions::new()
        .select(vec!["Identifier", "Title"])
        .filter("Language eq 'nl'");
    let tables = client_for(&server)
        .get_table_list_with(&query, None)
        .await
        .unwrap();
    assert_eq!(tables.len(), 1);
}

#[tokio::test]
async fn test_get_meta() {
    let server = MockServer::start().await;
    mount_resource(
        &server,
        "DataProperties",
        json!([{"Key": "TotaleBevolking_1", "Type": "Topic"}]),
    )
    .await;

    let meta = client_for(&server)
        .get_meta(TABLE, "DataProperties", None)
        .await
        .unwrap();
    assert_eq!(meta[0]["Key"], json!("TotaleBevolking_1"));
}

#[tokio::test]
async fn test_get_resources() {
    let server = MockServer::start().await;
    mount_service_document(&server).await;

    let resources = client_for(&server).get_resources(TABLE, None).await.unwrap();
    let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["TableInfos", "UntypedDataSet", "TypedDataSet", "DataProperties"]
    );
}

// ============================================================================
// Data Tests
// ============================================================================

#[tokio::test]
async fn test_get_data_fetches_only_dataset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(table_path("UntypedDataSet")))
        .and(query_param("$select", "ID, Perioden"))
        .and(query_param("$filter", "Perioden eq '2016JJ00'"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"ID": 0, "Perioden": "2016JJ00"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/ODataApi/odata/{TABLE}/")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(0)
        .mount(&server)
        .await;

    let request = DataRequest::new()
        .select(vec!["ID", "Perioden"])
        .filter("Perioden eq '2016JJ00'");
    let data = client_for(&server).get_data(TABLE, &request).await.unwrap();

    assert_eq!(data.len(), 1);
    assert_eq!(data[0].len(), 2);
}

#[tokio::test]
async fn test_get_data_typed() {
    let server = MockServer::start().await;
    mount_resource(&server, "TypedDataSet", json!([{"ID": 0, "Aantal": 12}])).await;

    let data = client_for(&server)
        .get_data(TABLE, &DataRequest::new().typed(true))
        .await
        .unwrap();
    assert_eq!(data[0]["Aantal"], json!(12));
}

#[tokio::test]
async fn test_get_data_invalid_select() {
    let server = MockServer::start().await;
    let request = DataRequest::new().select(vec!["ID", ""]);

    let err = client_for(&server).get_data(TABLE, &request).await.unwrap_err();
    assert!(matches!(err, Error::InvalidSelect { .. }));
}

#[tokio::test]
async fn test_download_data_without_dir() {
    let server = MockServer::start().await;
    mount_service_document(&server).await;
    mount_info(&server, json!({"value": [info_record(TABLE)]})).await;
    mount_resource(&server, "UntypedDataSet", json!([{"ID": 0}, {"ID": 1}])).await;
    mount_resource(&server, "DataProperties", json!([{"Key": "ID"}])).await;

    Mock::given(method("GET"))
        .and(path(table_path("TypedDataSet")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(0)
        .mount(&server)
        .await;

    let download = client_for(&server)
        .download_data(TABLE, &DataRequest::new())
        .await
        .unwrap();

    assert_eq!(download.table_id(), TABLE);
    assert_eq!(
        download.names().collect::<Vec<_>>(),
        vec!["TableInfos", "UntypedDataSet", "DataProperties"]
    );
    assert_eq!(download.dataset().map(<[Record]>::len), Some(2));
    assert_eq!(download.get("DataProperties").map(<[Record]>::len), Some(1));
}

#[tokio::test]
async fn test_download_data_stores_resources() {
    let server = MockServer::start().await;
    mount_service_document(&server).await;
    mount_info(&server, json!({"value": [info_record(TABLE)]})).await;
    mount_resource(&server, "DataProperties", json!([{"Key": "ID"}])).await;

    // Narrowing reaches the dataset only
    Mock::given(method("GET"))
        .and(path(table_path("TypedDataSet")))
        .and(query_param("$select", "ID"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"ID": 0}, {"ID": 1}, {"ID": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let target = dir.path().join("out").join(TABLE);
    let request = DataRequest::new().dir(&target).select("ID").typed(true);

    let data = client_for(&server).get_data(TABLE, &request).await.unwrap();
    assert_eq!(data.len(), 3);

    assert!(target.join("TableInfos.json").is_file());
    assert!(target.join("TypedDataSet.json").is_file());
    assert!(target.join("DataProperties.json").is_file());
    assert!(!target.join("UntypedDataSet.json").exists());

    let stored: Vec<Record> =
        serde_json::from_str(&std::fs::read_to_string(target.join("TypedDataSet.json")).unwrap())
            .unwrap();
    assert_eq!(stored, data);
}

#[tokio::test]
async fn test_download_data_failure_leaves_no_partial_file() {
    let server = MockServer::start().await;
    mount_service_document(&server).await;
    mount_info(&server, json!({"value": [info_record(TABLE)]})).await;

    Mock::given(method("GET"))
        .and(path(table_path("UntypedDataSet")))
        .and(query_param("$format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"ID": 0}],
            "odata.nextLink": "UntypedDataSet?$skip=1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(table_path("UntypedDataSet")))
        .and(query_param("$skip", "1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let request = DataRequest::new().dir(dir.path());
    let err = client_for(&server)
        .download_data(TABLE, &request)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(dir.path().join("TableInfos.json").is_file());
    assert!(!dir.path().join("UntypedDataSet.json").exists());
}

#[tokio::test]
async fn test_data_pages() {
    let server = MockServer::start().await;
    mount_resource(&server, "UntypedDataSet", json!([{"ID": 0}])).await;

    let client = client_for(&server);
    let mut pages = client.data_pages(TABLE, &DataRequest::new()).unwrap();
    let page = pages.next_page().await.unwrap().unwrap();
    assert_eq!(page.len(), 1);
    assert!(pages.next_page().await.unwrap().is_none());
}

// ============================================================================
// Catalog Selection Tests
// ============================================================================

async fn mount_table_list(server: &MockServer, marker: &str) {
    Mock::given(method("GET"))
        .and(path("/ODataCatalog/Tables"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"Identifier": "47015NED", "Catalog": marker}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_catalog_configured_scoped_and_per_call_agree() {
    let main = MockServer::start().await;
    let derden = MockServer::start().await;
    mount_table_list(&main, "main").await;
    mount_table_list(&derden, "derden").await;

    let mut client = client_for(&main);

    client.set_catalog_url(host(&derden));
    let configured = client.get_table_list(None).await.unwrap();
    client.set_catalog_url(host(&main));

    let scoped = {
        let scope = client.catalog(host(&derden));
        scope.get_table_list(None).await.unwrap()
    };

    let per_call = client
        .get_table_list(Some(&host(&derden)))
        .await
        .unwrap();

    assert_eq!(configured[0]["Catalog"], json!("derden"));
    assert_eq!(configured, scoped);
    assert_eq!(scoped, per_call);

    // Nothing leaked into later calls
    let after = client.get_table_list(None).await.unwrap();
    assert_eq!(after[0]["Catalog"], json!("main"));
}

#[tokio::test]
async fn test_per_call_catalog_beats_scope() {
    let main = MockServer::start().await;
    let derden = MockServer::start().await;
    mount_table_list(&main, "main").await;
    mount_table_list(&derden, "derden").await;

    let mut client = client_for(&main);
    let scope = client.catalog(host(&derden));
    let tables = scope.get_table_list(Some(&host(&main))).await.unwrap();
    assert_eq!(tables[0]["Catalog"], json!("main"));
}

#[test]
fn test_scope_restores_on_drop() {
    let mut client = Client::with_defaults().unwrap();
    {
        let mut outer = client.catalog(DERDEN_CATALOG_URL);
        assert_eq!(outer.resolve(None).host(), DERDEN_CATALOG_URL);
        {
            let inner = outer.catalog_with_scheme("mirror.example.org", true);
            let catalog = inner.resolve(None);
            assert_eq!(catalog.host(), "mirror.example.org");
            assert!(catalog.use_https());
        }
        assert_eq!(outer.resolve(None).host(), DERDEN_CATALOG_URL);
        assert!(!outer.resolve(None).use_https());
    }
    assert_eq!(client.resolve(None).host(), DEFAULT_CATALOG_URL);
}

#[test]
fn test_scope_restores_on_early_return() {
    fn fails_inside_scope(client: &mut Client) -> Result<()> {
        let scope = client.catalog(DERDEN_CATALOG_URL);
        scope.resolve(None).table_url("")?;
        Ok(())
    }

    let mut client = Client::with_defaults().unwrap();
    assert!(fails_inside_scope(&mut client).is_err());
    assert_eq!(client.resolve(None).host(), DEFAULT_CATALOG_URL);
}

#[test]
fn test_scope_restores_on_panic() {
    let mut client = Client::with_defaults().unwrap();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _scope = client.catalog(DERDEN_CATALOG_URL);
        panic!("boom");
    }));

    assert!(result.is_err());
    assert_eq!(client.resolve(None).host(), DEFAULT_CATALOG_URL);
}

#[test]
fn test_set_options_keeps_scope_behavior() {
    let mut client = Client::with_defaults().unwrap();
    client
        .set_options(Options::new().with_https(true).with_max_retries(2))
        .unwrap();
    assert!(client.resolve(None).use_https());
    assert_eq!(client.http().config().max_retries, 2);
}

#[test]
fn test_catalog_setters_leave_transport_alone() {
    let mut client = Client::new(Options::new().with_max_retries(2)).unwrap();
    client.set_catalog_url(DERDEN_CATALOG_URL);
    client.set_https(true);
    client.set_service(ApiService::Feed);

    let catalog = client.resolve(None);
    assert_eq!(catalog.host(), DERDEN_CATALOG_URL);
    assert!(catalog.use_https());
    assert_eq!(catalog.service(), ApiService::Feed);
    assert_eq!(client.options().catalog_url, DERDEN_CATALOG_URL);
    assert_eq!(client.http().config().max_retries, 2);
}

#[test]
fn test_new_rejects_invalid_options() {
    let err = Client::new(Options::new().with_catalog_url(" ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_data_request_builder() {
    let request = DataRequest::new()
        .catalog_url(DERDEN_CATALOG_URL)
        .select("ID, Perioden")
        .filter("Perioden eq '2016JJ00'")
        .typed(true);

    assert_eq!(request.catalog_url.as_deref(), Some(DERDEN_CATALOG_URL));
    assert_eq!(request.dataset, DatasetKind::Typed);
    assert_eq!(request.query.select, Some(Select::from(vec!["ID", "Perioden"])));
    assert!(request.dir.is_none());
}
