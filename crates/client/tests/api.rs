//! Drives the API facade against a scripted daemon listening on a unix socket.

use std::path::Path;

use dockwire::models::{ConnectNetwork, CreateNetwork, CreateVolume};
use dockwire::{ApiError, Docker};
use http::StatusCode;
use indoc::indoc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;

/// Reads one request, head and `Content-Length` body.
async fn read_request(stream: &mut UnixStream) -> String {
    let mut received = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf).await.unwrap();
        if n == 0 {
            break;
        }
        received.extend_from_slice(&buf[..n]);

        let text = String::from_utf8_lossy(&received);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| line.strip_prefix("content-length: "))
                .map_or(0, |value| value.parse::<usize>().unwrap());
            if received.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8(received).unwrap()
}

/// Answers one connection per entry of `responses`; returns what it received.
fn spawn_daemon(path: &Path, responses: Vec<String>) -> JoinHandle<Vec<String>> {
    let listener = UnixListener::bind(path).unwrap();
    tokio::spawn(async move {
        let mut requests = Vec::new();
        for response in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        requests
    })
}

fn json_response(status: &str, body: &str) -> String {
    format!("HTTP/1.1 {status}\r\nApi-Version: 1.43\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}", body.len())
}

/// Same payload, sent with chunked transfer encoding in two pieces.
fn chunked_json_response(body: &str) -> String {
    let (first, second) = body.split_at(body.len() / 2);
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\n\r\n{:x}\r\n{first}\r\n{:x}\r\n{second}\r\n0\r\n\r\n",
        first.len(),
        second.len()
    )
}

#[tokio::test]
async fn ping() {
    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("docker.sock");
    let daemon = spawn_daemon(
        &socket,
        vec![
            "HTTP/1.1 200 OK\r\nApi-Version: 1.43\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: 2\r\n\r\nOK".to_owned(),
            "HTTP/1.1 200 OK\r\nApi-Version: 1.43\r\nContent-Length: 2\r\n\r\n".to_owned(),
        ],
    );

    let docker = Docker::new(&socket);
    assert_eq!(docker.system().ping().await.unwrap(), "OK");
    docker.system().ping_head().await.unwrap();

    let requests = daemon.await.unwrap();
    assert_eq!(requests[0], "GET /_ping HTTP/1.1\r\nhost: docker\r\n\r\n");
    assert_eq!(requests[1], "HEAD /_ping HTTP/1.1\r\nhost: docker\r\n\r\n");
}

#[tokio::test]
async fn version_and_info() {
    let version = indoc! {r#"
    {"Platform":{"Name":"Docker Engine - Community"},"Components":[{"Name":"Engine","Version":"24.0.7","Details":{"GitCommit":"311b9ff"}}],
     "Version":"24.0.7","ApiVersion":"1.43","MinAPIVersion":"1.12","GitCommit":"311b9ff","GoVersion":"go1.20.10","Os":"linux","Arch":"amd64",
     "KernelVersion":"6.5.0","BuildTime":"2023-10-26T09:08:01.000000000+00:00"}
    "#};
    let info = r#"{"ID":"7TRN:IPZB","Containers":3,"ContainersRunning":1,"Images":12,"Driver":"overlay2","NCPU":8,"OSType":"linux","ServerVersion":"24.0.7"}"#;

    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("docker.sock");
    let daemon = spawn_daemon(&socket, vec![chunked_json_response(version), json_response("200 OK", info)]);

    let docker = Docker::new(&socket);
    let version = docker.system().version().await.unwrap();
    let info = docker.system().info().await.unwrap();

    assert_eq!(version.api_version, "1.43");
    assert_eq!(version.min_api_version.as_deref(), Some("1.12"));
    assert_eq!(version.components.unwrap()[0].name, "Engine");
    assert_eq!(info.containers, 3);
    assert_eq!(info.ncpu, 8);
    assert_eq!(info.driver, "overlay2");

    let requests = daemon.await.unwrap();
    assert!(requests[0].starts_with("GET /version HTTP/1.1\r\n"));
    assert!(requests[1].starts_with("GET /info HTTP/1.1\r\n"));
}

#[tokio::test]
async fn volume_lifecycle() {
    let volume = r#"{"CreatedAt":"2024-03-01T10:00:00Z","Driver":"local","Labels":null,"Mountpoint":"/var/lib/docker/volumes/data/_data","Name":"data","Options":null,"Scope":"local"}"#;
    let list = format!(r#"{{"Volumes":[{volume}],"Warnings":null}}"#);

    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("docker.sock");
    let daemon = spawn_daemon(
        &socket,
        vec![
            json_response("201 Created", volume),
            chunked_json_response(&list),
            json_response("200 OK", volume),
            "HTTP/1.1 204 No Content\r\nApi-Version: 1.43\r\n\r\n".to_owned(),
            json_response("200 OK", r#"{"VolumesDeleted":["old"],"SpaceReclaimed":4096}"#),
        ],
    );

    let docker = Docker::new(&socket);
    let volumes = docker.volumes();

    let created = volumes.create(&CreateVolume::named("data")).await.unwrap();
    assert_eq!(created.name, "data");

    let listed = volumes.list().await.unwrap();
    assert_eq!(listed.volumes().len(), 1);
    assert_eq!(listed.volumes()[0].mountpoint, "/var/lib/docker/volumes/data/_data");

    let inspected = volumes.inspect("data").await.unwrap();
    assert_eq!(inspected.scope, "local");

    volumes.remove("data", true).await.unwrap();

    let pruned = volumes.prune().await.unwrap();
    assert_eq!(pruned.volumes_deleted.unwrap(), vec!["old".to_owned()]);
    assert_eq!(pruned.space_reclaimed, 4096);

    let requests = daemon.await.unwrap();
    assert_eq!(
        requests[0],
        "POST /volumes/create HTTP/1.1\r\nhost: docker\r\ncontent-length: 15\r\ncontent-type: application/json\r\n\r\n{\"Name\":\"data\"}"
    );
    assert!(requests[1].starts_with("GET /volumes HTTP/1.1\r\n"));
    assert!(requests[2].starts_with("GET /volumes/data HTTP/1.1\r\n"));
    assert!(requests[3].starts_with("DELETE /volumes/data?force=true HTTP/1.1\r\n"));
    assert!(requests[4].starts_with("POST /volumes/prune HTTP/1.1\r\n"));
}

#[tokio::test]
async fn network_lifecycle() {
    let id = "7d86d31b1478e7cca9ebed7e73aa0fdeec46c5ca29497431d3007d2d9e15ed99";
    let network = format!(
        r#"{{"Name":"app_net","Id":"{id}","Created":"2024-03-01T10:00:00Z","Scope":"local","Driver":"bridge","EnableIPv6":false,"IPAM":{{"Driver":"default","Config":[{{"Subnet":"172.19.0.0/16"}}]}},"Internal":false,"Attachable":false,"Ingress":false,"Containers":{{}},"Options":{{}},"Labels":{{}}}}"#
    );
    let empty_ok = "HTTP/1.1 200 OK\r\nApi-Version: 1.43\r\nContent-Length: 0\r\n\r\n".to_owned();

    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("docker.sock");
    let daemon = spawn_daemon(
        &socket,
        vec![
            json_response("201 Created", &format!(r#"{{"Id":"{id}","Warning":""}}"#)),
            chunked_json_response(&format!("[{network}]")),
            json_response("200 OK", &network),
            empty_ok.clone(),
            empty_ok,
            "HTTP/1.1 204 No Content\r\nApi-Version: 1.43\r\n\r\n".to_owned(),
            json_response("200 OK", r#"{"NetworksDeleted":["old_net"]}"#),
            json_response("403 Forbidden", r#"{"message":"bridge is a pre-defined network and cannot be removed"}"#),
        ],
    );

    let docker = Docker::new(&socket);
    let networks = docker.networks();

    let created = networks.create(&CreateNetwork::named("app_net")).await.unwrap();
    assert_eq!(created.id, id);

    let listed = networks.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].driver, "bridge");

    let inspected = networks.inspect("app_net").await.unwrap();
    assert_eq!(inspected.ipam.unwrap().config.unwrap()[0].subnet.as_deref(), Some("172.19.0.0/16"));

    networks.connect(id, &ConnectNetwork::container("web")).await.unwrap();
    networks.disconnect(id, "web", true).await.unwrap();
    networks.remove(id).await.unwrap();

    let pruned = networks.prune().await.unwrap();
    assert_eq!(pruned.networks_deleted.unwrap(), vec!["old_net".to_owned()]);

    let error = networks.remove("bridge").await.unwrap_err();
    assert!(matches!(error, ApiError::UnexpectedStatus { status, .. } if status == StatusCode::FORBIDDEN));

    let requests = daemon.await.unwrap();
    assert_eq!(
        requests[0],
        "POST /networks/create HTTP/1.1\r\nhost: docker\r\ncontent-length: 18\r\ncontent-type: application/json\r\n\r\n{\"Name\":\"app_net\"}"
    );
    assert!(requests[1].starts_with("GET /networks HTTP/1.1\r\n"));
    assert!(requests[2].starts_with("GET /networks/app_net HTTP/1.1\r\n"));
    assert!(requests[3].starts_with(&format!("POST /networks/{id}/connect HTTP/1.1\r\n")));
    assert!(requests[3].ends_with("\r\n\r\n{\"Container\":\"web\"}"));
    assert!(requests[4].starts_with(&format!("POST /networks/{id}/disconnect HTTP/1.1\r\n")));
    assert!(requests[4].ends_with("\r\n\r\n{\"Container\":\"web\",\"Force\":true}"));
    assert!(requests[5].starts_with(&format!("DELETE /networks/{id} HTTP/1.1\r\n")));
    assert!(requests[6].starts_with("POST /networks/prune HTTP/1.1\r\n"));
    assert!(requests[7].starts_with("DELETE /networks/bridge HTTP/1.1\r\n"));
}

#[tokio::test]
async fn status_mapping() {
    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("docker.sock");
    let daemon = spawn_daemon(
        &socket,
        vec![
            json_response("404 Not Found", r#"{"message":"get missing: no such volume"}"#),
            json_response("409 Conflict", r#"{"message":"remove data: volume is in use"}"#),
            json_response("500 Internal Server Error", r#"{"message":"boom"}"#),
            json_response("200 OK", "{}"),
        ],
    );

    let docker = Docker::new(&socket);

    let error = docker.volumes().inspect("missing").await.unwrap_err();
    assert!(matches!(error, ApiError::NotFound { ref message } if message == "get missing: no such volume"));

    let error = docker.volumes().remove("data", false).await.unwrap_err();
    assert!(matches!(error, ApiError::Conflict { .. }));

    let error = docker.volumes().prune().await.unwrap_err();
    assert!(matches!(error, ApiError::Server { ref message } if message == "boom"));

    // removal answers 204, anything else is unexpected
    let error = docker.volumes().remove("data", false).await.unwrap_err();
    assert!(matches!(error, ApiError::UnexpectedStatus { status, .. } if status == StatusCode::OK));

    let requests = daemon.await.unwrap();
    assert!(requests[1].starts_with("DELETE /volumes/data HTTP/1.1\r\n"));
}

#[tokio::test]
async fn invalid_json() {
    let dir = TempDir::new().unwrap();
    let socket = dir.path().join("docker.sock");
    let _daemon = spawn_daemon(&socket, vec![json_response("200 OK", "not json")]);

    let error = Docker::new(&socket).system().info().await.unwrap_err();
    assert!(matches!(error, ApiError::Json { .. }));
}

#[tokio::test]
async fn transport_error() {
    let dir = TempDir::new().unwrap();

    let error = Docker::new(dir.path().join("missing.sock")).system().ping().await.unwrap_err();
    assert!(matches!(error, ApiError::Transport { .. }));
}
