use clap::Parser;
use laptop_catalog::client::{AuthClient, LaptopClient};
use laptop_catalog::proto::{memory, Filter, Memory};
use laptop_catalog::sample;
use tonic::transport::Channel;
use tonic::Code;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Laptop catalog demo client", long_about = None)]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, env = "SERVER_ADDR", default_value = "http://127.0.0.1:8080")]
    addr: String,

    /// Username to log in with
    #[arg(short, long, env = "CATALOG_USERNAME", default_value = "admin")]
    username: String,

    /// Password to log in with
    #[arg(long, env = "CATALOG_PASSWORD", default_value = "admin")]
    password: String,

    /// How many sample laptops to create
    #[arg(short, long, default_value = "10")]
    count: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let channel = Channel::from_shared(args.addr.clone())?.connect().await?;

    let mut auth_client = AuthClient::new(channel.clone(), args.username, args.password);
    let access_token = auth_client.login().await?;
    info!("logged in");

    let mut laptop_client = LaptopClient::with_access_token(channel, access_token);

    let mut laptop_ids = Vec::new();
    for _ in 0..args.count {
        match laptop_client.create_laptop(sample::new_laptop()).await {
            Ok(id) => {
                info!(%id, "created laptop");
                laptop_ids.push(id);
            }
            Err(status) if status.code() == Code::AlreadyExists => {
                info!("laptop already exists");
            }
            Err(status) => return Err(status.into()),
        }
    }

    let filter = Filter {
        max_price_usd: 3000.0,
        min_cpu_cores: 4,
        min_cpu_ghz: 2.5,
        min_ram: Some(Memory {
            value: 8,
            unit: memory::Unit::Gigabyte as i32,
        }),
    };
    for laptop in laptop_client.search_laptop(filter).await? {
        info!(
            id = %laptop.id,
            brand = %laptop.brand,
            name = %laptop.name,
            price_usd = laptop.price_usd,
            "found laptop"
        );
    }

    if let Some(laptop_id) = laptop_ids.first() {
        let image = vec![0xAB; 64 * 1024];
        let response = laptop_client.upload_image(laptop_id, ".jpg", image).await?;
        info!(id = %response.id, size = response.size, "uploaded image");
    }

    let scores: Vec<f64> = laptop_ids.iter().map(|_| sample::random_laptop_score()).collect();
    for response in laptop_client.rate_laptop(&laptop_ids, &scores).await? {
        info!(
            laptop_id = %response.laptop_id,
            rated_count = response.rated_count,
            average_score = response.average_score,
            "laptop rated"
        );
    }

    Ok(())
}
