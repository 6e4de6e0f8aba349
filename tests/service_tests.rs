use std::sync::Arc;
use std::time::Duration;

use laptop_catalog::auth::{AuthInterceptor, JwtManager, User};
use laptop_catalog::client::{AuthClient, LaptopClient};
use laptop_catalog::proto::auth_service_server::AuthServiceServer;
use laptop_catalog::proto::laptop_service_server::LaptopServiceServer;
use laptop_catalog::proto::{memory, Cpu, Filter, Memory};
use laptop_catalog::sample;
use laptop_catalog::service::{CatalogService, LoginService, MAX_IMAGE_SIZE};
use laptop_catalog::store::{DiskImageStore, LaptopStore, RatingStore, UserStore};
use tempfile::TempDir;
use tonic::transport::{Channel, Server};
use tonic::Code;

const TEST_SECRET: &str = "test-secret";

struct TestServer {
    channel: Channel,
    laptop_store: LaptopStore,
    _image_folder: TempDir,
}

async fn start_test_server() -> TestServer {
    let user_store = UserStore::new();
    for (username, password, role) in [
        ("admin", "admin", "admin"),
        ("user1", "password", "user"),
    ] {
        let user = User::new(username, password, role).unwrap();
        user_store.save(&user).await.unwrap();
    }

    let jwt_manager = Arc::new(JwtManager::new(TEST_SECRET, Duration::from_secs(900)));
    let login_service = LoginService::new(user_store, jwt_manager.clone());

    let laptop_store = LaptopStore::new();
    let image_folder = TempDir::new().unwrap();
    let interceptor = Arc::new(AuthInterceptor::new(
        jwt_manager,
        AuthInterceptor::default_access_roles(),
    ));
    let catalog_service = CatalogService::new(
        laptop_store.clone(),
        DiskImageStore::new(image_folder.path()),
        RatingStore::new(),
        interceptor,
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let local_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(AuthServiceServer::new(login_service))
            .add_service(LaptopServiceServer::new(catalog_service))
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    let channel = Channel::from_shared(format!("http://{local_addr}"))
        .unwrap()
        .connect()
        .await
        .expect("Failed to connect to test server");

    TestServer {
        channel,
        laptop_store,
        _image_folder: image_folder,
    }
}

async fn login(server: &TestServer, username: &str, password: &str) -> String {
    AuthClient::new(server.channel.clone(), username, password)
        .login()
        .await
        .expect("Login should succeed")
}

async fn admin_client(server: &TestServer) -> LaptopClient {
    let token = login(server, "admin", "admin").await;
    LaptopClient::with_access_token(server.channel.clone(), token)
}

fn gigabytes(value: u64) -> Memory {
    Memory {
        value,
        unit: memory::Unit::Gigabyte as i32,
    }
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let server = start_test_server().await;

    let result = AuthClient::new(server.channel.clone(), "admin", "wrong")
        .login()
        .await;
    assert_eq!(result.unwrap_err().code(), Code::NotFound);

    let result = AuthClient::new(server.channel.clone(), "nobody", "admin")
        .login()
        .await;
    assert_eq!(result.unwrap_err().code(), Code::NotFound);
}

#[tokio::test]
async fn create_laptop_returns_the_final_id() {
    let server = start_test_server().await;
    let mut client = admin_client(&server).await;

    // client-supplied id is kept
    let laptop = sample::new_laptop();
    let id = client.create_laptop(laptop.clone()).await.unwrap();
    assert_eq!(id, laptop.id);
    assert!(server.laptop_store.find(&id).await.is_some());

    // empty id gets generated server-side
    let mut no_id = sample::new_laptop();
    no_id.id = String::new();
    let generated = client.create_laptop(no_id).await.unwrap();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());
}

#[tokio::test]
async fn create_laptop_rejects_bad_and_duplicate_ids() {
    let server = start_test_server().await;
    let mut client = admin_client(&server).await;

    let mut bad_id = sample::new_laptop();
    bad_id.id = "not-a-uuid".to_string();
    let err = client.create_laptop(bad_id).await.unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);

    let laptop = sample::new_laptop();
    client.create_laptop(laptop.clone()).await.unwrap();
    let err = client.create_laptop(laptop).await.unwrap_err();
    assert_eq!(err.code(), Code::AlreadyExists);
}

#[tokio::test]
async fn create_laptop_enforces_the_gate() {
    let server = start_test_server().await;

    // no token at all
    let mut anonymous = LaptopClient::new(server.channel.clone());
    let err = anonymous.create_laptop(sample::new_laptop()).await.unwrap_err();
    assert_eq!(err.code(), Code::Unauthenticated);

    // a valid token with an unlisted role
    let token = login(&server, "user1", "password").await;
    let mut user_client = LaptopClient::with_access_token(server.channel.clone(), token);
    let err = user_client.create_laptop(sample::new_laptop()).await.unwrap_err();
    assert_eq!(err.code(), Code::PermissionDenied);
}

#[tokio::test]
async fn search_laptop_is_public_and_filters() {
    let server = start_test_server().await;

    let mut matching = sample::new_laptop();
    matching.price_usd = 1800.0;
    matching.cpu = Some(Cpu {
        number_of_cores: 8,
        min_ghz: 3.0,
        ..Default::default()
    });
    matching.ram = Some(gigabytes(16));

    let mut too_expensive = matching.clone();
    too_expensive.id = uuid::Uuid::new_v4().to_string();
    too_expensive.price_usd = 2500.0;

    let mut too_little_ram = matching.clone();
    too_little_ram.id = uuid::Uuid::new_v4().to_string();
    too_little_ram.ram = Some(gigabytes(4));

    for laptop in [&matching, &too_expensive, &too_little_ram] {
        server.laptop_store.save(laptop).await.unwrap();
    }

    // no access token on purpose
    let mut client = LaptopClient::new(server.channel.clone());
    let filter = Filter {
        max_price_usd: 2000.0,
        min_cpu_cores: 4,
        min_cpu_ghz: 2.5,
        min_ram: Some(gigabytes(8)),
    };
    let found = client.search_laptop(filter).await.unwrap();

    let found_ids: Vec<_> = found.into_iter().map(|laptop| laptop.id).collect();
    assert_eq!(found_ids, vec![matching.id]);
}

#[tokio::test]
async fn upload_image_stores_the_blob() {
    let server = start_test_server().await;
    let mut client = admin_client(&server).await;

    let laptop = sample::new_laptop();
    let laptop_id = client.create_laptop(laptop).await.unwrap();

    let data = vec![0x5A; 4096];
    let response = client.upload_image(&laptop_id, ".jpg", data).await.unwrap();

    assert_eq!(response.size, 4096);
    assert!(!response.id.is_empty());
}

#[tokio::test]
async fn upload_image_enforces_the_size_ceiling() {
    let server = start_test_server().await;
    let mut client = admin_client(&server).await;

    let laptop_id = client.create_laptop(sample::new_laptop()).await.unwrap();

    // exactly at the ceiling passes
    let at_limit = vec![0u8; MAX_IMAGE_SIZE];
    let response = client.upload_image(&laptop_id, ".jpg", at_limit).await.unwrap();
    assert_eq!(response.size as usize, MAX_IMAGE_SIZE);

    // one byte more fails
    let over_limit = vec![0u8; MAX_IMAGE_SIZE + 1];
    let err = client
        .upload_image(&laptop_id, ".jpg", over_limit)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
}

#[tokio::test]
async fn upload_image_requires_a_known_laptop() {
    let server = start_test_server().await;
    let mut client = admin_client(&server).await;

    let err = client
        .upload_image("ffffffff-0000-0000-0000-000000000000", ".jpg", vec![1, 2, 3])
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Internal);
}

#[tokio::test]
async fn rate_laptop_reports_the_running_average() {
    let server = start_test_server().await;
    let mut client = admin_client(&server).await;

    let laptop_id = client.create_laptop(sample::new_laptop()).await.unwrap();

    let ids = vec![laptop_id.clone(), laptop_id.clone(), laptop_id.clone()];
    let responses = client.rate_laptop(&ids, &[8.0, 7.5, 10.0]).await.unwrap();

    assert_eq!(responses.len(), 3);
    let reported: Vec<_> = responses
        .iter()
        .map(|response| (response.rated_count, response.average_score))
        .collect();
    assert_eq!(reported, vec![(1, 8.0), (2, 7.75), (3, 8.5)]);
}

#[tokio::test]
async fn rate_laptop_is_open_to_the_user_role() {
    let server = start_test_server().await;
    let mut admin = admin_client(&server).await;

    let laptop_id = admin.create_laptop(sample::new_laptop()).await.unwrap();

    let token = login(&server, "user1", "password").await;
    let mut user_client = LaptopClient::with_access_token(server.channel.clone(), token);
    let responses = user_client
        .rate_laptop(&[laptop_id], &[6.0])
        .await
        .unwrap();

    assert_eq!(responses[0].rated_count, 1);
    assert_eq!(responses[0].average_score, 6.0);
}

#[tokio::test]
async fn rate_laptop_fails_for_unknown_laptops() {
    let server = start_test_server().await;
    let mut client = admin_client(&server).await;

    let err = client
        .rate_laptop(&["ffffffff-0000-0000-0000-000000000000".to_string()], &[5.0])
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}
