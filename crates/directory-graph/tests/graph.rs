// Copyright 2026 Element Creations Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE files in the repository root for full details.

use std::collections::HashMap;

use serde_json::json;
use tenure_directory::{AccessToken, AppInstallation, DirectoryConnection, TokenService};
use tenure_directory_graph::{ClientCredentialsTokenService, GraphConnection};
use url::Url;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{bearer_token, method, path},
};

const APP_ID: &str = "5a902a13-8bf7-41a7-b25c-9e3a8e0a5a28";
const USER_ID: &str = "4f21e351-96f9-40ca-bb71-6e525ee05d69";
const INSTALLATION_ID: &str = "NGYyMWUzNTEtOTZmOS00MGNhLWJiNzEtNmU1MjVlZTA1ZDY5";
const TOKEN: &str = "app-token";

async fn graph_connection() -> (GraphConnection, MockServer) {
    let mock_server = MockServer::start().await;
    let endpoint: Url = mock_server.uri().parse().unwrap();
    let conn = GraphConnection::new(endpoint, APP_ID.to_owned(), tenure_http::client());
    (conn, mock_server)
}

#[tokio::test]
async fn find_installed_app_returns_the_installation() {
    let (conn, mock_server) = graph_connection().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v1.0/users/{USER_ID}/teamwork/installedApps"
        )))
        .and(bearer_token(TOKEN))
        .and(|req: &Request| {
            // The filter must target the app by its catalog id
            req.url
                .query_pairs()
                .any(|(k, v)| k == "$filter" && v.contains(APP_ID))
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": INSTALLATION_ID,
                "teamsApp": { "externalId": APP_ID },
            }],
        })))
        .mount(&mock_server)
        .await;

    let installation = conn
        .find_installed_app(&AccessToken::new(TOKEN), USER_ID)
        .await
        .unwrap();

    assert_eq!(
        installation,
        Some(AppInstallation {
            id: INSTALLATION_ID.to_owned()
        })
    );
}

#[tokio::test]
async fn find_installed_app_handles_no_installation() {
    let (conn, mock_server) = graph_connection().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v1.0/users/{USER_ID}/teamwork/installedApps"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": [] })))
        .mount(&mock_server)
        .await;

    let installation = conn
        .find_installed_app(&AccessToken::new(TOKEN), USER_ID)
        .await
        .unwrap();

    assert_eq!(installation, None);
}

#[tokio::test]
async fn find_installed_app_treats_a_missing_user_as_not_installed() {
    let (conn, mock_server) = graph_connection().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "NotFound", "message": "No user found with the given id." },
        })))
        .mount(&mock_server)
        .await;

    let installation = conn
        .find_installed_app(&AccessToken::new(TOKEN), USER_ID)
        .await
        .unwrap();

    assert_eq!(installation, None);
}

#[tokio::test]
async fn find_installed_app_propagates_other_errors() {
    let (conn, mock_server) = graph_connection().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": "Forbidden", "message": "Missing permission." },
        })))
        .mount(&mock_server)
        .await;

    let result = conn
        .find_installed_app(&AccessToken::new(TOKEN), USER_ID)
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn revoke_installed_app_deletes_the_installation() {
    let (conn, mock_server) = graph_connection().await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/v1.0/users/{USER_ID}/teamwork/installedApps/{INSTALLATION_ID}"
        )))
        .and(bearer_token(TOKEN))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    conn.revoke_installed_app(
        &AccessToken::new(TOKEN),
        USER_ID,
        &AppInstallation {
            id: INSTALLATION_ID.to_owned(),
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn revoke_installed_app_tolerates_an_already_removed_installation() {
    let (conn, mock_server) = graph_connection().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": "NotFound", "message": "No installation found." },
        })))
        .mount(&mock_server)
        .await;

    conn.revoke_installed_app(
        &AccessToken::new(TOKEN),
        USER_ID,
        &AppInstallation {
            id: INSTALLATION_ID.to_owned(),
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn revoke_installed_app_propagates_other_errors() {
    let (conn, mock_server) = graph_connection().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "code": "InternalServerError", "message": "Something went wrong." },
        })))
        .mount(&mock_server)
        .await;

    let result = conn
        .revoke_installed_app(
            &AccessToken::new(TOKEN),
            USER_ID,
            &AppInstallation {
                id: INSTALLATION_ID.to_owned(),
            },
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn obtain_app_token_with_client_credentials() {
    let mock_server = MockServer::start().await;
    let token_endpoint: Url = format!("{}/token", mock_server.uri()).parse().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(|req: &Request| {
            let pairs = form_urlencoded(&req.body);

            pairs.get("grant_type").map(String::as_str) == Some("client_credentials")
                && pairs.get("client_id").map(String::as_str) == Some("client-id")
                && pairs.get("client_secret").map(String::as_str) == Some("client-secret")
                && pairs.get("scope").map(String::as_str) == Some("directory.default")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "Bearer",
            "expires_in": 3599,
        })))
        .mount(&mock_server)
        .await;

    let service = ClientCredentialsTokenService::new(
        token_endpoint,
        "client-id".to_owned(),
        "client-secret".to_owned(),
        "directory.default".to_owned(),
        tenure_http::client(),
    );

    let token = service.obtain_app_token().await.unwrap();
    assert_eq!(token, Some(AccessToken::new(TOKEN)));
}

#[tokio::test]
async fn obtain_app_token_handles_an_empty_grant() {
    let mock_server = MockServer::start().await;
    let token_endpoint: Url = format!("{}/token", mock_server.uri()).parse().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "",
        })))
        .mount(&mock_server)
        .await;

    let service = ClientCredentialsTokenService::new(
        token_endpoint,
        "client-id".to_owned(),
        "client-secret".to_owned(),
        "directory.default".to_owned(),
        tenure_http::client(),
    );

    let token = service.obtain_app_token().await.unwrap();
    assert_eq!(token, None);
}

#[tokio::test]
async fn obtain_app_token_propagates_a_rejected_grant() {
    let mock_server = MockServer::start().await;
    let token_endpoint: Url = format!("{}/token", mock_server.uri()).parse().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_client",
        })))
        .mount(&mock_server)
        .await;

    let service = ClientCredentialsTokenService::new(
        token_endpoint,
        "client-id".to_owned(),
        "bad-secret".to_owned(),
        "directory.default".to_owned(),
        tenure_http::client(),
    );

    let result = service.obtain_app_token().await;
    assert!(result.is_err());
}

fn form_urlencoded(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
