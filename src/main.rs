use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_i18n::t;

use service_finder::{
    ApiClient, AppConfig, Category, ClientResult, NewServiceListing, PaymentProof, RestoreOutcome, Role, Service,
    ServiceFilter, SignupFields,
};

extern crate pretty_env_logger;
#[macro_use]
extern crate log;

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(name = "service-finder", version, about = "Find, book and review local services")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List services, optionally filtered
    Services {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Show one service
    Service { id: String },
    /// Show reviews for a service
    Reviews { service_id: String },
    /// List the known service categories
    Categories,
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: Role,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Book a service; prints the payment order to complete
    Book { service_id: String },
    /// Forward payment proof for a booking's order
    VerifyPayment {
        #[arg(long)]
        order_id: String,
        #[arg(long)]
        payment_id: String,
        #[arg(long)]
        signature: String,
    },
    /// Review a service
    Review {
        service_id: String,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        text: String,
    },
    /// List your own services (providers only)
    MyServices,
    /// Publish a service (providers only)
    CreateService {
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        location: String,
        /// Hourly price in whole currency units
        #[arg(long)]
        price: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = pretty_env_logger::try_init_timed();

    let cli = Cli::parse();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    rust_i18n::set_locale(&config.locale);

    let client = ApiClient::from_config(&config).context("Failed to initialize client")?;

    match client.restore_session().await {
        RestoreOutcome::Restored(identity) => debug!("Restored session for {}", identity.id),
        RestoreOutcome::Discarded => eprintln!("{}", t!("session.discarded")),
        RestoreOutcome::Offline => eprintln!("{}", t!("session.offline")),
        RestoreOutcome::NoToken | RestoreOutcome::Superseded => {}
    }

    if let Err(e) = run(&client, cli.command).await {
        error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(client: &ApiClient, command: Command) -> ClientResult<()> {
    match command {
        Command::Services {
            search,
            category,
            location,
        } => {
            let filter = ServiceFilter {
                search,
                category,
                location,
            };
            print_services(&client.list_services(&filter).await?);
        }
        Command::Service { id } => print_service(&client.get_service(&id).await?),
        Command::Reviews { service_id } => {
            for review in client.list_reviews(&service_id).await? {
                let author = review.author.as_ref().and_then(|a| a.name()).unwrap_or("anonymous");
                println!("{} {}  {} ({})", "★".repeat(review.rating.into()), review.text, author, review.id);
            }
        }
        Command::Categories => {
            for category in Category::ALL {
                println!("{}", category);
            }
        }
        Command::Signup {
            name,
            email,
            password,
            role,
        } => {
            let fields = SignupFields {
                name,
                email,
                password,
                role,
            };
            let response = client.signup(&fields).await?;
            println!("{}", t!("session.welcome", name = response.user.name));
        }
        Command::Login { email, password } => {
            let response = client.login(&email, &password).await?;
            println!("{}", t!("session.welcome", name = response.user.name));
        }
        Command::Logout => {
            client.logout().await?;
            println!("{}", t!("session.logged_out"));
        }
        Command::Whoami => match client.identity().await {
            Some(identity) => println!(
                "{} <{}> {} {}",
                identity.name,
                identity.id,
                identity.role,
                identity.email.as_deref().unwrap_or("-")
            ),
            None => println!("{}", t!("session.anonymous")),
        },
        Command::Book { service_id } => {
            let receipt = client.create_booking(&service_id).await?;
            let handle = client.initiate_payment(&receipt);
            println!("{}", t!("booking.created", order_id = handle.order_id));
        }
        Command::VerifyPayment {
            order_id,
            payment_id,
            signature,
        } => {
            let proof = PaymentProof {
                razorpay_order_id: order_id,
                razorpay_payment_id: payment_id,
                razorpay_signature: signature,
            };
            let confirmation = client.verify_payment(&proof).await?;
            match confirmation.message {
                Some(message) => println!("{}", message),
                None => println!("{}", t!("booking.verified")),
            }
        }
        Command::Review {
            service_id,
            rating,
            text,
        } => {
            client.create_review(&service_id, &text, rating).await?;
            println!("{}", t!("review.created"));
        }
        Command::MyServices => print_services(&client.list_my_services().await?),
        Command::CreateService {
            title,
            category,
            location,
            price,
        } => {
            let listing = NewServiceListing {
                title,
                category,
                location,
                price,
            };
            let service = client.create_service_listing(&listing).await?;
            println!("{}", t!("listing.created", title = service.title));
        }
    }

    Ok(())
}

fn print_services(services: &[Service]) {
    if services.is_empty() {
        println!("{}", t!("listing.empty"));
        return;
    }
    for service in services {
        print_service(service);
    }
}

fn print_service(service: &Service) {
    let provider = service
        .provider
        .as_ref()
        .and_then(|p| p.name().or(p.id()))
        .unwrap_or("-");
    println!(
        "{}  {} | {} | {} | {} | {}",
        service.id,
        service.title,
        service.category,
        service.location,
        t!("listing.price", price = service.price),
        provider
    );
}
