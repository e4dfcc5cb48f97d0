use blobsign_azure_blob::{
    BlobClient, BlobSasPermissions, Credential, DelegationGrant, Error, SasProtocol,
};
use blobsign_core::time::{now, parse_rfc3339};
use blobsign_core::{Context, ErrorKind};
use pretty_assertions::assert_eq;

use crate::AZURITE_KEY;

fn client() -> BlobClient {
    BlobClient::new(
        Context::new(),
        Credential::with_shared_key("devstoreaccount1", AZURITE_KEY),
    )
}

#[test]
fn test_sas_url() {
    let grant = DelegationGrant::new(
        "images",
        "a b.png",
        BlobSasPermissions::read_only(),
        parse_rfc3339("2024-01-09T03:04:05Z").unwrap(),
    )
    .with_protocol(SasProtocol::Https);

    assert_eq!(
        client().sas_url(grant).unwrap(),
        "https://devstoreaccount1.blob.core.windows.net/images/a%20b.png\
         ?sv=2022-11-02&sp=r&sr=b&se=2024-01-09T03%3A04%3A05Z&spr=https\
         &sig=VoccePJJiUmOKowxXQLVDlMx76m4fFBBjgAvC9Hp7JY%3D"
    );
}

#[test]
fn test_shareable_url_expiry_follows_days() {
    let before = now();
    let url = client().shareable_url("images", "a.png", 3).unwrap();

    let query = url.split_once('?').unwrap().1;
    let se = form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "se")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    let expiry = parse_rfc3339(&se).unwrap();

    let days = (expiry - before).num_seconds() as f64 / 86400.0;
    assert!((2.99..=3.01).contains(&days), "expiry is {days} days away");
}

#[test]
fn test_shareable_url_without_grant() {
    assert_eq!(
        client().shareable_url("images", "a.png", 0).unwrap(),
        "https://devstoreaccount1.blob.core.windows.net/images/a.png"
    );
}

#[test]
fn test_shareable_url_rejects_negative_days() {
    let Err(Error::Fatal(err)) = client().shareable_url("images", "a.png", -3) else {
        panic!("negative days must be rejected");
    };
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_sas_signatures_differ_per_blob() {
    let expiry = parse_rfc3339("2024-01-09T03:04:05Z").unwrap();
    let a = client()
        .sas_url(DelegationGrant::new("images", "a.png", BlobSasPermissions::read_only(), expiry))
        .unwrap();
    let b = client()
        .sas_url(DelegationGrant::new("images", "b.png", BlobSasPermissions::read_only(), expiry))
        .unwrap();

    assert_ne!(a.split_once("sig=").unwrap().1, b.split_once("sig=").unwrap().1);
}

#[test]
fn test_sas_url_for_container_grant() {
    let grant = DelegationGrant::for_container(
        "images",
        BlobSasPermissions::read_only(),
        parse_rfc3339("2024-01-09T03:04:05Z").unwrap(),
    );

    let url = client().sas_url(grant).unwrap();
    assert!(
        url.starts_with("https://devstoreaccount1.blob.core.windows.net/images?"),
        "got {url}"
    );
    assert!(url.contains("&sr=c&"));
}

#[test]
fn test_sas_url_rejects_blob_grant_without_name() {
    let grant = DelegationGrant::new(
        "images",
        "",
        BlobSasPermissions::read_only(),
        parse_rfc3339("2024-01-09T03:04:05Z").unwrap(),
    );

    let Err(Error::Fatal(err)) = client().sas_url(grant) else {
        panic!("a blob grant needs a blob name");
    };
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}
