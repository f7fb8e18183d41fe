mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn upload_list_get_delete_round_trip() -> Result<()> {
    let app = common::test_app();
    let property_id = common::create_property(&app, "Documented").await;

    let request = common::multipart_request(
        &format!("/api/documents/property/{}", property_id),
        "document",
        "lease-2026.pdf",
        "application/pdf",
        b"pdf-bytes",
        &[
            ("document_type", "lease"),
            ("document_name", "Lease 2026"),
            ("description", "Signed copy"),
        ],
    );
    let (status, uploaded) = common::dispatch(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(uploaded["entity_type"], "property");
    assert_eq!(uploaded["entity_id"], property_id.as_str());
    assert_eq!(uploaded["document_type"], "lease");
    assert_eq!(uploaded["document_name"], "Lease 2026");
    assert_eq!(uploaded["description"], "Signed copy");
    let document_id = uploaded["id"].as_str().expect("document id").to_string();
    let public_url = uploaded["public_url"].as_str().expect("public url");
    assert!(public_url.contains(&format!("documents/property/{}/", property_id)));

    let (status, listed) = common::send(
        &app,
        "GET",
        &format!("/api/documents/property/{}", property_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], document_id.as_str());

    let (status, fetched) = common::send(&app, "GET", &format!("/api/documents/{}", document_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["document_name"], "Lease 2026");
    assert_eq!(fetched["content_type"], "application/pdf");

    let (status, body) = common::send(&app, "DELETE", &format!("/api/documents/{}", document_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document deleted successfully");

    let (status, _) = common::send(&app, "GET", &format!("/api/documents/{}", document_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn upload_applies_metadata_defaults() -> Result<()> {
    let app = common::test_app();
    let property_id = common::create_property(&app, "Defaulted").await;

    let request = common::multipart_request(
        &format!("/api/documents/property/{}", property_id),
        "document",
        "inspection.pdf",
        "application/pdf",
        b"pdf-bytes",
        &[],
    );
    let (status, uploaded) = common::dispatch(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(uploaded["document_type"], "other");
    assert_eq!(uploaded["document_name"], "inspection.pdf");
    assert_eq!(uploaded["description"], "");
    Ok(())
}

#[tokio::test]
async fn contract_documents_attach_to_the_contract() -> Result<()> {
    let app = common::test_app();
    let property_id = common::create_property(&app, "With Lease").await;
    let (_, contract) = common::create_contract(&app, &property_id, "active", "2099-06-30", 1200.0).await;
    let contract_id = contract["id"].as_str().expect("id").to_string();

    let request = common::multipart_request(
        &format!("/api/documents/contract/{}", contract_id),
        "document",
        "addendum.pdf",
        "application/pdf",
        b"pdf-bytes",
        &[],
    );
    let (status, uploaded) = common::dispatch(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(uploaded["entity_type"], "contract");
    assert_eq!(uploaded["entity_id"], contract_id.as_str());
    Ok(())
}

#[tokio::test]
async fn invalid_entity_type_is_rejected() -> Result<()> {
    let app = common::test_app();

    let request = common::multipart_request(
        "/api/documents/vehicle/v-1",
        "document",
        "title.pdf",
        "application/pdf",
        b"pdf-bytes",
        &[],
    );
    let (status, body) = common::dispatch(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid entity type");

    let (status, body) = common::send(&app, "GET", "/api/documents/vehicle/v-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid entity type");
    Ok(())
}

#[tokio::test]
async fn upload_to_missing_entity_is_404() -> Result<()> {
    let app = common::test_app();

    let request = common::multipart_request(
        "/api/documents/tenant/no-such-tenant",
        "document",
        "id-card.png",
        "image/png",
        b"png-bytes",
        &[],
    );
    let (status, body) = common::dispatch(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "tenant not found");
    Ok(())
}

#[tokio::test]
async fn upload_without_file_is_rejected() -> Result<()> {
    let app = common::test_app();
    let property_id = common::create_property(&app, "Fileless").await;

    let request = common::multipart_request(
        &format!("/api/documents/property/{}", property_id),
        "notes",
        "",
        "text/plain",
        b"",
        &[("document_type", "lease")],
    );
    let (status, body) = common::dispatch(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No document file provided");
    Ok(())
}
