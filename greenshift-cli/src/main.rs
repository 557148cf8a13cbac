use std::path::PathBuf;

use clap::Parser;
use greenshift_client::GreenShiftClient;
use uuid::Uuid;

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long)]
    server: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Register {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
        #[clap(long, default_value = "individual")]
        user_type: String,
    },
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    ListProducts,
    GetProduct {
        id: Uuid,
    },
    Upload {
        #[clap(long)]
        name: String,
        #[clap(long)]
        description: String,
        #[clap(long)]
        price: f64,
        #[clap(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let endpoint = args.server.as_deref().unwrap_or("http://127.0.0.1:8080");
    let mut client = GreenShiftClient::connect(endpoint)?;

    match args.command {
        Command::Register {
            name,
            email,
            password,
            user_type,
        } => {
            let user = client.register(&name, &email, &password, &user_type).await?;
            println!("Registered {} as {} ({})", user.name, user.role, user.email);
        }
        Command::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.name, user.role);
        }
        Command::ListProducts => {
            let products = client.list_products().await?;
            println!("Products ({})", products.len());
            for product in products {
                println!(
                    "- [{}] {} (${:.2}) by {}",
                    product.id, product.name, product.price, product.vendor.name
                );
            }
        }
        Command::GetProduct { id } => {
            let product = client.get_product(id).await?;
            println!("{} (${:.2}, {})", product.name, product.price, product.status);
            println!("  vendor: {} [{}]", product.vendor.name, product.vendor.id);
            println!("  image: {}", product.image);
            println!("  analysis: {}", product.analysis);
        }
        Command::Upload {
            name,
            description,
            price,
            file,
        } => {
            let product = client
                .upload_product(&name, &description, price, &file)
                .await?;
            println!("Listing created! ID: {}", product.id);
            println!("  analysis: {}", product.analysis);
        }
    }

    Ok(())
}
