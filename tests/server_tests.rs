use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pkgindex::{Config, IndexClient, IndexServer, IndexService, Response};

/// Spin up a server on an OS-assigned port, returning its address.
async fn spawn_test_server(config: Config) -> (SocketAddr, Arc<IndexService>) {
    let config = Config {
        bind_address: "127.0.0.1".to_string(),
        port: 0,
        ..config
    };
    let service = Arc::new(IndexService::new());
    let server = IndexServer::bind(&config, Arc::clone(&service))
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move {
        server.serve().await.unwrap();
    });
    (addr, service)
}

async fn client(addr: SocketAddr) -> IndexClient {
    IndexClient::connect(addr).await.unwrap()
}

#[tokio::test]
async fn simple_index_and_query() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut c = client(addr).await;

    assert_eq!(c.send("INDEX|testpackage1|").await.unwrap(), Response::Ok);
    assert_eq!(c.send("QUERY|testpackage1|").await.unwrap(), Response::Ok);
}

#[tokio::test]
async fn index_with_missing_dependencies() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut c = client(addr).await;

    assert_eq!(c.send("INDEX|pkg3|pkg1,pkg2").await.unwrap(), Response::Fail);
    assert_eq!(c.send("QUERY|pkg3|").await.unwrap(), Response::Fail);
}

#[tokio::test]
async fn index_updates_dependencies() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut c = client(addr).await;

    let script = [
        ("INDEX|pkg1|", Response::Ok),
        ("INDEX|pkg2|", Response::Ok),
        ("INDEX|pkg3|pkg1,pkg2", Response::Ok),
        ("REMOVE|pkg1|", Response::Fail),
        ("INDEX|pkg3|pkg2", Response::Ok),
        ("REMOVE|pkg1|", Response::Ok),
    ];
    for (message, expected) in script {
        assert_eq!(c.send(message).await.unwrap(), expected, "{}", message);
    }
}

#[tokio::test]
async fn removal_rules() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut c = client(addr).await;

    assert_eq!(c.send("REMOVE|testpackage1|").await.unwrap(), Response::Ok);
    assert_eq!(c.send("INDEX|testpackage1|").await.unwrap(), Response::Ok);
    assert_eq!(c.send("INDEX|testpackage2|testpackage1").await.unwrap(), Response::Ok);
    assert_eq!(c.send("REMOVE|testpackage1|").await.unwrap(), Response::Fail);
    assert_eq!(c.send("REMOVE|testpackage2|").await.unwrap(), Response::Ok);
    assert_eq!(c.send("REMOVE|testpackage1|").await.unwrap(), Response::Ok);
    assert_eq!(c.send("QUERY|testpackage1|").await.unwrap(), Response::Fail);
}

#[tokio::test]
async fn error_messages() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut c = client(addr).await;

    for message in [
        "BadMessage",
        "QUERY|",
        "QUERY|LIB",
        "BAD|lib|",
        "INDEX|&badchar|",
        "INDEX|lib|a,,b",
    ] {
        assert_eq!(c.send(message).await.unwrap(), Response::Error, "{}", message);
    }

    // The connection survives rejected lines.
    assert_eq!(c.send("INDEX|lib|").await.unwrap(), Response::Ok);
}

#[tokio::test]
async fn read_error_closes_only_that_connection() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut healthy = client(addr).await;
    let mut broken = client(addr).await;

    assert_eq!(healthy.send("INDEX|shared|").await.unwrap(), Response::Ok);

    // Invalid UTF-8 fails the read: answered with ERROR, then closed.
    assert_eq!(
        broken.send_raw(b"QUERY|\xff\xfe|\n").await.unwrap(),
        Response::Error
    );
    assert!(broken.send("QUERY|shared|").await.is_err());

    assert_eq!(healthy.send("QUERY|shared|").await.unwrap(), Response::Ok);
}

#[tokio::test]
async fn state_is_shared_across_connections() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut first = client(addr).await;
    let mut second = client(addr).await;

    assert_eq!(first.send("INDEX|base|").await.unwrap(), Response::Ok);
    assert_eq!(second.send("INDEX|app|base").await.unwrap(), Response::Ok);
    assert_eq!(first.send("REMOVE|base|").await.unwrap(), Response::Fail);
}

#[tokio::test]
async fn concurrent_clients_build_consistent_index() {
    let (addr, service) = spawn_test_server(Config::default()).await;

    let tasks: Vec<_> = (0..16)
        .map(|t| {
            tokio::spawn(async move {
                let mut c = IndexClient::connect(addr).await.unwrap();
                let root = format!("root{}", t);
                assert_eq!(c.send(&format!("INDEX|{}|", root)).await.unwrap(), Response::Ok);
                for i in 0..20 {
                    let message = format!("INDEX|leaf{}_{}|{}", t, i, root);
                    assert_eq!(c.send(&message).await.unwrap(), Response::Ok);
                }
                assert_eq!(c.send(&format!("REMOVE|{}|", root)).await.unwrap(), Response::Fail);
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let stats = service.inspect(|store| store.stats()).unwrap();
    assert_eq!(stats.package_count, 16 * 21);
    assert_eq!(stats.edge_count, 16 * 20);
}

#[tokio::test]
async fn racing_index_and_remove_follow_a_serial_order() {
    let (addr, _) = spawn_test_server(Config::default()).await;
    let mut setup = client(addr).await;

    for round in 0..25 {
        let dep = format!("dep{}", round);
        let pkg = format!("pkg{}", round);
        assert_eq!(setup.send(&format!("INDEX|{}|", dep)).await.unwrap(), Response::Ok);

        let index = {
            let message = format!("INDEX|{}|{}", pkg, dep);
            tokio::spawn(async move { client(addr).await.send(&message).await.unwrap() })
        };
        let remove = {
            let message = format!("REMOVE|{}|", dep);
            tokio::spawn(async move { client(addr).await.send(&message).await.unwrap() })
        };
        let (indexed, removed) = (index.await.unwrap(), remove.await.unwrap());

        let pkg_present = setup.send(&format!("QUERY|{}|", pkg)).await.unwrap();
        let dep_present = setup.send(&format!("QUERY|{}|", dep)).await.unwrap();

        match (indexed, removed) {
            // INDEX first: the dependency is pinned.
            (Response::Ok, Response::Fail) => {
                assert_eq!(pkg_present, Response::Ok);
                assert_eq!(dep_present, Response::Ok);
            }
            // REMOVE first: the index has nothing to depend on.
            (Response::Fail, Response::Ok) => {
                assert_eq!(pkg_present, Response::Fail);
                assert_eq!(dep_present, Response::Fail);
            }
            other => panic!("outcome {:?} matches no serial order", other),
        }
    }
}

#[tokio::test]
async fn throttled_connection_is_paced() {
    let (addr, _) = spawn_test_server(Config {
        throttle: 20,
        ..Config::default()
    })
    .await;
    let mut c = client(addr).await;

    let start = Instant::now();
    for _ in 0..5 {
        assert_eq!(c.send("QUERY|lib|").await.unwrap(), Response::Fail);
    }
    // 20 msg/s: one message per 50ms, first one included.
    assert!(start.elapsed() >= Duration::from_millis(240));
}
