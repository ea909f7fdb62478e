use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webhdfs::{DirEntry, Error, FileType, ReadRange, WebHdfsClient, WebHdfsConfig};

fn config_for(namenode: &MockServer) -> WebHdfsConfig {
    let address = namenode.address();
    WebHdfsConfig::new(address.ip().to_string(), address.port(), "hadoop")
}

#[tokio::test]
async fn test_mkdir_then_get_file_status() {
    let namenode = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/webhdfs/v1/user/hadoop/reports"))
        .and(query_param("op", "MKDIRS"))
        .and(query_param("user.name", "hadoop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"boolean": true})))
        .expect(1)
        .mount(&namenode)
        .await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/user/hadoop/reports"))
        .and(query_param("op", "GETFILESTATUS"))
        .and(query_param("user.name", "hadoop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "FileStatus": {
                "accessTime": 0,
                "blockSize": 0,
                "group": "supergroup",
                "length": 0,
                "modificationTime": 1320173277227u64,
                "owner": "hadoop",
                "pathSuffix": "",
                "permission": "755",
                "replication": 0,
                "type": "DIRECTORY"
            }
        })))
        .expect(1)
        .mount(&namenode)
        .await;

    let config = config_for(&namenode);
    let (created, status) = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        let created = client.mkdir("/user/hadoop/reports").unwrap();
        let status = client.get_file_status("/user/hadoop/reports").unwrap();
        (created, status)
    })
    .await
    .unwrap();

    assert_eq!(created, json!({"boolean": true}));
    let status = status.unwrap();
    assert_eq!(status["type"], "DIRECTORY");
    assert_eq!(status["permission"], "755");
}

#[tokio::test]
async fn test_rmdir_is_recursive() {
    let namenode = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/webhdfs/v1/tmp/scratch"))
        .and(query_param("op", "DELETE"))
        .and(query_param("recursive", "true"))
        .and(query_param("user.name", "hadoop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"boolean": true})))
        .expect(1)
        .mount(&namenode)
        .await;

    let config = config_for(&namenode);
    let result = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client.rmdir("/tmp/scratch").unwrap()
    })
    .await
    .unwrap();

    assert_eq!(result["boolean"], true);
}

#[tokio::test]
async fn test_list_dir_in_service_order() {
    let namenode = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/data"))
        .and(query_param("op", "LISTSTATUS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "FileStatuses": {"FileStatus": [
                {"pathSuffix": "a.txt", "length": 10, "type": "FILE", "owner": "hadoop"},
                {"pathSuffix": "sub", "length": 0, "type": "DIRECTORY", "owner": "hadoop"}
            ]}
        })))
        .mount(&namenode)
        .await;

    let config = config_for(&namenode);
    let entries = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client.list_dir("/data").unwrap()
    })
    .await
    .unwrap();

    assert_eq!(
        entries,
        vec![
            DirEntry::new("a.txt", 10, FileType::File),
            DirEntry::new("sub", 0, FileType::Directory),
        ]
    );
}

#[tokio::test]
async fn test_read_file_follows_redirect() {
    let namenode = MockServer::start().await;
    let datanode = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/logs/app.log"))
        .and(query_param("op", "OPEN"))
        .and(query_param("offset", "0"))
        .and(query_param("length", "10000"))
        .and(query_param("buffersize", "10000"))
        .respond_with(ResponseTemplate::new(307).insert_header(
            "Location",
            format!(
                "{}/webhdfs/v1/logs/app.log?op=OPEN&user.name=hadoop&namenoderpcaddress=nn:8020&offset=0&length=10000",
                datanode.uri()
            )
            .as_str(),
        ))
        .expect(1)
        .mount(&namenode)
        .await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/logs/app.log"))
        .and(query_param("namenoderpcaddress", "nn:8020"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"line one\nline two\n".to_vec()))
        .expect(1)
        .mount(&datanode)
        .await;

    let config = config_for(&namenode);
    let data = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client
            .read_file("/logs/app.log", ReadRange::default())
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(data, b"line one\nline two\n");
}

#[tokio::test]
async fn test_read_file_decompresses_gz() {
    let namenode = MockServer::start().await;
    let datanode = MockServer::start().await;

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"hello world").unwrap();
    let compressed = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/data/file.log-2013-05-31.gz"))
        .respond_with(ResponseTemplate::new(307).insert_header(
            "Location",
            format!(
                "{}/webhdfs/v1/data/file.log-2013-05-31.gz?op=OPEN&offset=0&length=10000",
                datanode.uri()
            )
            .as_str(),
        ))
        .mount(&namenode)
        .await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/data/file.log-2013-05-31.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(compressed))
        .mount(&datanode)
        .await;

    let config = config_for(&namenode);
    let data = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client
            .read_file("/data/file.log-2013-05-31.gz", ReadRange::default())
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(data, b"hello world");
}

#[tokio::test]
async fn test_copy_to_local_empty_file_skips_datanode() {
    let namenode = MockServer::start().await;
    let datanode = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/empty.txt"))
        .and(query_param("op", "OPEN"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&namenode)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("empty.txt");
    std::fs::write(&target, b"previous contents").unwrap();

    let config = config_for(&namenode);
    let local = target.clone();
    let status = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client.copy_to_local("/empty.txt", &local).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(status, 200);
    assert_eq!(std::fs::metadata(&target).unwrap().len(), 0);
    assert!(datanode.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_copy_to_local_writes_file() {
    let namenode = MockServer::start().await;
    let datanode = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/src/report.csv"))
        .respond_with(ResponseTemplate::new(307).insert_header(
            "Location",
            format!("{}/webhdfs/v1/src/report.csv?op=OPEN&offset=0", datanode.uri()).as_str(),
        ))
        .mount(&namenode)
        .await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/src/report.csv"))
        .and(query_param("op", "OPEN"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a,b\n1,2\n".to_vec()))
        .expect(1)
        .mount(&datanode)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("report.csv");

    let config = config_for(&namenode);
    let local = target.clone();
    let status = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client.copy_to_local("/src/report.csv", &local).unwrap()
    })
    .await
    .unwrap();

    assert_eq!(status, 200);
    assert_eq!(std::fs::read(&target).unwrap(), b"a,b\n1,2\n");
}

#[tokio::test]
async fn test_copy_to_local_failure_keeps_local_file() {
    let namenode = MockServer::start().await;
    let datanode = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/src/report.csv"))
        .respond_with(ResponseTemplate::new(307).insert_header(
            "Location",
            format!("{}/webhdfs/v1/src/report.csv?op=OPEN", datanode.uri()).as_str(),
        ))
        .mount(&namenode)
        .await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/src/report.csv"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "RemoteException": {
                "exception": "AccessControlException",
                "javaClassName": "org.apache.hadoop.security.AccessControlException",
                "message": "Permission denied"
            }
        })))
        .expect(1)
        .mount(&datanode)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("report.csv");
    std::fs::write(&target, b"old contents").unwrap();

    let config = config_for(&namenode);
    let local = target.clone();
    let result = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client.copy_to_local("/src/report.csv", &local)
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(Error::Remote { status: 403, .. })));
    assert_eq!(std::fs::read(&target).unwrap(), b"old contents");
}

#[tokio::test]
async fn test_copy_from_local_appends_replication() {
    let namenode = MockServer::start().await;
    let datanode = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/webhdfs/v1/user/hadoop/upload.txt"))
        .and(query_param("op", "CREATE"))
        .and(query_param("overwrite", "true"))
        .and(query_param("user.name", "hadoop"))
        .respond_with(ResponseTemplate::new(307).insert_header(
            "Location",
            format!(
                "{}/webhdfs/v1/user/hadoop/upload.txt?op=CREATE&user.name=hadoop&namenoderpcaddress=nn:8020&overwrite=true",
                datanode.uri()
            )
            .as_str(),
        ))
        .expect(1)
        .mount(&namenode)
        .await;

    Mock::given(method("PUT"))
        .and(path("/webhdfs/v1/user/hadoop/upload.txt"))
        .and(query_param("replication", "3"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&datanode)
        .await;

    let mut source = tempfile::NamedTempFile::new().unwrap();
    source.write_all(b"uploaded bytes").unwrap();
    let source_path = source.path().to_path_buf();

    let config = config_for(&namenode);
    let result = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client
            .copy_from_local(&source_path, "/user/hadoop/upload.txt", 3, true)
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(result, serde_json::Value::Null);

    let requests = datanode.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url.query(),
        Some("op=CREATE&user.name=hadoop&namenoderpcaddress=nn:8020&overwrite=true&replication=3")
    );
    assert_eq!(requests[0].body, b"uploaded bytes");
}

#[tokio::test]
async fn test_copy_from_local_streaming() {
    let namenode = MockServer::start().await;
    let datanode = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/webhdfs/v1/big.bin"))
        .and(query_param("overwrite", "false"))
        .respond_with(ResponseTemplate::new(307).insert_header(
            "Location",
            format!("{}/webhdfs/v1/big.bin?op=CREATE&overwrite=false", datanode.uri()).as_str(),
        ))
        .mount(&namenode)
        .await;

    Mock::given(method("PUT"))
        .and(path("/webhdfs/v1/big.bin"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&datanode)
        .await;

    let payload: Vec<u8> = (0..64 * 1024).map(|i| (i % 251) as u8).collect();
    let mut source = tempfile::NamedTempFile::new().unwrap();
    source.write_all(&payload).unwrap();
    let source_path = source.path().to_path_buf();

    let config = config_for(&namenode);
    tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client
            .copy_from_local_streaming(&source_path, "/big.bin", 1, false)
            .unwrap()
    })
    .await
    .unwrap();

    let requests = datanode.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, payload);
    assert_eq!(
        requests[0].url.query(),
        Some("op=CREATE&overwrite=false&replication=1")
    );
}

#[tokio::test]
async fn test_remote_exception_is_reported() {
    let namenode = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "RemoteException": {
                "exception": "FileNotFoundException",
                "javaClassName": "java.io.FileNotFoundException",
                "message": "File does not exist: /missing"
            }
        })))
        .mount(&namenode)
        .await;

    let config = config_for(&namenode);
    let result = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client.get_file_status("/missing")
    })
    .await
    .unwrap();

    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(404));
    match error {
        Error::Remote { exception, .. } => {
            assert_eq!(exception.unwrap().exception, "FileNotFoundException");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_redirect_fails_fast() {
    let namenode = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/webhdfs/v1/f"))
        .respond_with(
            ResponseTemplate::new(307)
                .insert_header("Location", "http://data_node!:50075/webhdfs/v1/f?op=OPEN"),
        )
        .mount(&namenode)
        .await;

    let config = config_for(&namenode);
    let result = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::from_config(config).unwrap();
        client.read_file("/f", ReadRange::default())
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(Error::MalformedRedirect { .. })));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = tokio::task::spawn_blocking(move || {
        let client = WebHdfsClient::new("127.0.0.1", port, "hadoop").unwrap();
        client.mkdir("/x")
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(Error::Transport(_))));
}
