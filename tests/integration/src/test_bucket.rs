//! Bucket operation integration tests.

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use rustoss_client::ListObjectsOptions;

    use crate::{FakeResponse, mock_client};

    const LIST_BUCKETS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListAllMyBucketsResult>
  <Owner><ID>bcaf1ffd86f41161ca5fb16fd081034f</ID><DisplayName>webfile</DisplayName></Owner>
  <Buckets>
    <Bucket><Name>quotes</Name><CreationDate>2006-02-03T16:45:09.000Z</CreationDate></Bucket>
    <Bucket><Name>samples</Name><CreationDate>2006-02-03T16:41:58.000Z</CreationDate></Bucket>
  </Buckets>
</ListAllMyBucketsResult>"#;

    const LIST_OBJECTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult>
  <Name>quotes</Name>
  <Prefix>N</Prefix>
  <Marker>Ned</Marker>
  <MaxKeys>40</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <Contents>
    <Key>Nelson</Key>
    <LastModified>2006-01-01T12:00:00.000Z</LastModified>
    <ETag>&quot;828ef3fdfa96f00ad9f27c383fc9ac7f&quot;</ETag>
    <Size>5</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
  <Contents>
    <Key>Neo</Key>
    <LastModified>2006-01-01T12:00:00.000Z</LastModified>
    <ETag>&quot;828ef3fdfa96f00ad9f27c383fc9ac7f&quot;</ETag>
    <Size>4</Size>
  </Contents>
  <CommonPrefixes><Prefix>Nested/</Prefix></CommonPrefixes>
</ListBucketResult>"#;

    #[tokio::test]
    async fn test_should_list_buckets() {
        let (client, transport) = mock_client([FakeResponse::ok().body(LIST_BUCKETS)]);

        let result = client.list_buckets().await.expect("list_buckets");

        let names: Vec<&str> = result.buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["quotes", "samples"]);
        assert_eq!(result.owner.map(|o| o.display_name).as_deref(), Some("webfile"));

        let request = transport.only_request();
        assert_eq!(request.parts.method, Method::GET);
        assert_eq!(request.parts.uri.path(), "/");
    }

    #[tokio::test]
    async fn test_should_create_and_delete_bucket() {
        let (client, transport) = mock_client([
            FakeResponse::ok(),
            FakeResponse::with_status(StatusCode::NO_CONTENT),
        ]);

        client.create_bucket("quotes").await.expect("create_bucket");
        client.delete_bucket("quotes").await.expect("delete_bucket");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].parts.method, Method::PUT);
        assert_eq!(requests[0].parts.uri.path(), "/quotes");
        assert_eq!(requests[1].parts.method, Method::DELETE);
        assert_eq!(requests[1].parts.uri.path(), "/quotes");
    }

    #[tokio::test]
    async fn test_should_list_objects_with_query() {
        let (client, transport) = mock_client([FakeResponse::ok().body(LIST_OBJECTS)]);
        let options = ListObjectsOptions::builder()
            .prefix("N")
            .marker("Ned")
            .max_keys(40)
            .build();

        let result = client
            .list_objects("quotes", &options)
            .await
            .expect("list_objects");

        assert_eq!(result.name, "quotes");
        assert_eq!(result.max_keys, 40);
        assert!(!result.is_truncated);
        let keys: Vec<&str> = result.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["Nelson", "Neo"]);
        assert_eq!(result.contents[0].etag, "\"828ef3fdfa96f00ad9f27c383fc9ac7f\"");
        assert_eq!(result.common_prefixes, ["Nested/"]);

        let request = transport.only_request();
        assert_eq!(request.parts.uri.path(), "/quotes");
        assert_eq!(request.parts.uri.query(), Some("prefix=N&marker=Ned&max-keys=40"));
    }

    #[tokio::test]
    async fn test_should_fetch_listed_key_with_entities_and_spaces() -> anyhow::Result<()> {
        let listing = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult>
  <Name>quotes</Name>
  <Contents>
    <Key>Tom &amp; Jerry.txt</Key>
    <Size>5</Size>
  </Contents>
  <Contents>
    <Key> padded </Key>
    <Size>1</Size>
  </Contents>
</ListBucketResult>"#;
        let (client, transport) = mock_client([
            FakeResponse::ok().body(listing),
            FakeResponse::ok().body("hello"),
        ]);

        let result = client
            .list_objects("quotes", &ListObjectsOptions::default())
            .await?;
        let keys: Vec<&str> = result.contents.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, ["Tom & Jerry.txt", " padded "]);

        let object = client.get_object("quotes", &result.contents[0].key).await?;
        assert_eq!(&object.body[..], b"hello");

        let requests = transport.requests();
        assert_eq!(requests[1].parts.uri.path(), "/quotes/Tom%20%26%20Jerry.txt");
        Ok(())
    }

    #[tokio::test]
    async fn test_should_report_missing_bucket() {
        let (client, _transport) = mock_client([FakeResponse::error(
            StatusCode::NOT_FOUND,
            "NoSuchBucket",
            "The specified bucket does not exist",
        )]);

        let err = client
            .list_objects("missing", &ListObjectsOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.code(), Some("NoSuchBucket"));
    }
}
