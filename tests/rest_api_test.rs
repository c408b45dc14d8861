mod common;

use pagos::domain::pago::{EstadoPago, PagoPatch};
use pagos::domain::ports::PagosApi;
use pagos::error::PagosError;
use pagos::infrastructure::http::RestPagosApi;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn api(server: &MockServer) -> RestPagosApi {
    RestPagosApi::new(format!("{}/pagos/", server.uri()))
}

#[tokio::test]
async fn test_list_parses_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pagos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::server_pagos()))
        .mount(&server)
        .await;

    let pagos = api(&server).await.list().await.unwrap();

    assert_eq!(pagos.len(), 2);
    assert_eq!(pagos[0].id, "P-0001");
    assert!(pagos[0].trazabilidad.is_empty());
    assert_eq!(pagos[1].estado_pago, EstadoPago::Pagado);
    assert_eq!(pagos[1].trazabilidad.len(), 1);
}

#[tokio::test]
async fn test_create_posts_camel_case_body() {
    let server = MockServer::start().await;
    let pago = common::pago("P-0100", EstadoPago::Pendiente, "Alpina", "2025-05-02");
    Mock::given(method("POST"))
        .and(path("/pagos"))
        .and(body_partial_json(json!({
            "id": "P-0100",
            "fecha": "2025-05-02",
            "estadoPago": "PENDIENTE",
            "formaPago": "TRANSFERENCIA"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&pago))
        .expect(1)
        .mount(&server)
        .await;

    let created = api(&server).await.create(&pago).await.unwrap();
    assert_eq!(created, pago);
}

#[tokio::test]
async fn test_update_patches_item_url() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/pagos/P-0001"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"estadoPago": "AUTORIZADO"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let patch = PagoPatch {
        estado_pago: Some(EstadoPago::Autorizado),
        ..Default::default()
    };
    let echoed = api(&server).await.update("P-0001", &patch).await.unwrap();

    assert_eq!(echoed.estado_pago, Some(EstadoPago::Autorizado));
    assert_eq!(echoed.empresa, None);

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body, json!({"estadoPago": "AUTORIZADO"}));
}

#[tokio::test]
async fn test_delete_and_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/pagos/P-0001"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/pagos/P-4040"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = api(&server).await;
    api.delete("P-0001").await.unwrap();
    assert!(matches!(
        api.delete("P-4040").await,
        Err(PagosError::HttpError(_))
    ));
}
