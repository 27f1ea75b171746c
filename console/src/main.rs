use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use client::api::{self, account, course, enrollment, major};
use client::routes::{self, Navigator};
use client::{DurableStorage, FileStorage, HttpTransport, SessionStore};
use shared::config::{load_config, validate_config};
use shared::types::{ChangePasswordRequest, ClientConfig, LoginRequest, RegisterRequest};

mod cli;

use cli::{Cli, Command, EnrollmentCommand, EntityCommand};

type Store = SessionStore<HttpTransport>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => load_config(path).context(format!("Failed to load config from {}", path))?,
        None => {
            let config = ClientConfig::default();
            validate_config(&config).context("Default configuration is invalid")?;
            config
        }
    };

    let storage: Arc<dyn DurableStorage> = Arc::new(
        FileStorage::open(&config.storage.path)
            .context(format!("Failed to open session file {}", config.storage.path))?,
    );
    let transport = HttpTransport::from_config(&config.api, storage.clone());
    let store = SessionStore::restore(transport, storage.clone());

    debug!("Dispatching {:?}", cli.command);
    run(cli.command, store, storage).await
}

async fn run(command: Command, store: Store, storage: Arc<dyn DurableStorage>) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let response = store
                .login(&LoginRequest::new(username, password))
                .await
                .context("Login failed")?;
            println!("{}", response.message);
            if store.user().and_then(|u| u.first_login()) == Some(true) {
                println!("First sign-in: please change your password (change-password).");
            }
        }

        Command::Logout => {
            let mut navigator = Navigator::new(storage);
            let events = store.subscribe();
            store.logout().await;
            // Dropping the store closes the channel so `follow` returns.
            drop(store);
            navigator.follow(events).await;
            println!("Signed out, now at {}", navigator.location());
        }

        Command::Whoami => {
            let session = store.snapshot();
            println!("state: {:?}", session.state());
            match session.user {
                Some(user) => print_json(user.fields())?,
                None => println!("no user on record"),
            }
        }

        Command::Profile => {
            store.fetch_profile().await.context("Fetching profile failed")?;
            if let Some(user) = store.user() {
                print_json(user.fields())?;
            }
        }

        Command::Register(args) => {
            let details = RegisterRequest {
                name: args.name,
                age: args.age,
                phone: args.phone,
                enrollment_date: args.enrollment_date,
                major_id: args.major_id,
            };
            let response = store.register(&details).await.context("Registration failed")?;
            println!("{}", response.message);
            print_json(&response.data)?;
        }

        Command::ChangePassword { current, new } => {
            let response = store
                .change_password(&ChangePasswordRequest::new(current, new))
                .await
                .context("Password change failed")?;
            println!("{}", response.message);
        }

        Command::SetToken { token } => {
            store.set_token(&token).context("Failed to store token")?;
            info!("Session is now {:?}", store.state());
        }

        Command::Majors => {
            print_json(&api::auth::public_majors(store.transport()).await?)?;
        }

        Command::Route { path } => {
            let mut navigator = Navigator::new(storage);
            match navigator.push(&path) {
                routes::Navigation::Allow(to) => println!("allowed: {}", to),
                routes::Navigation::Redirect(to) => println!("redirected: {}", to),
            }
        }

        Command::Account(cmd) => match cmd {
            EntityCommand::List => print_json(&account::list(store.transport()).await?)?,
            EntityCommand::Get { id } => print_json(&account::get(store.transport(), id).await?)?,
            EntityCommand::Save { json } => {
                let record = parse_record(&json)?;
                report(account::save(store.transport(), &record).await?)
            }
            EntityCommand::Delete { id } => report(account::delete(store.transport(), id).await?),
        },

        Command::Course(cmd) => match cmd {
            EntityCommand::List => print_json(&course::list(store.transport()).await?)?,
            EntityCommand::Get { id } => print_json(&course::get(store.transport(), id).await?)?,
            EntityCommand::Save { json } => {
                let record = parse_record(&json)?;
                report(course::save(store.transport(), &record).await?)
            }
            EntityCommand::Delete { id } => report(course::delete(store.transport(), id).await?),
        },

        Command::Major(cmd) => match cmd {
            EntityCommand::List => print_json(&major::list(store.transport()).await?)?,
            EntityCommand::Get { id } => print_json(&major::get(store.transport(), id).await?)?,
            EntityCommand::Save { json } => {
                let record = parse_record(&json)?;
                report(major::save(store.transport(), &record).await?)
            }
            EntityCommand::Delete { id } => report(major::delete(store.transport(), id).await?),
        },

        Command::Enrollment(cmd) => enrollment_command(cmd, &store).await?,
    }

    Ok(())
}

async fn enrollment_command(cmd: EnrollmentCommand, store: &Store) -> Result<()> {
    let t = store.transport();

    match cmd {
        EnrollmentCommand::Selected { student_id } => {
            print_json(&enrollment::selected_courses(t, student_id).await?)?
        }
        EnrollmentCommand::Select {
            student_id,
            course_id,
        } => report(enrollment::select_course(t, student_id, course_id).await?),
        EnrollmentCommand::Drop {
            student_id,
            course_id,
        } => report(enrollment::drop_course(t, student_id, course_id).await?),
        EnrollmentCommand::Credits { student_id } => {
            println!("{}", enrollment::total_credits(t, student_id).await?)
        }
        EnrollmentCommand::All => print_json(&enrollment::all(t).await?)?,
        EnrollmentCommand::ByStudent { student_id } => {
            print_json(&enrollment::by_student(t, student_id).await?)?
        }
        EnrollmentCommand::ByCourse { course_id } => {
            print_json(&enrollment::by_course(t, course_id).await?)?
        }
        EnrollmentCommand::Statistics => print_json(&enrollment::statistics(t).await?)?,
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", text);
    Ok(())
}

fn parse_record<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).context("Record is not valid JSON for this entity")
}

/// Mutations answer with a message and, sometimes, a payload.
fn report(response: shared::types::Envelope) {
    if response.message.is_empty() {
        println!("done");
    } else {
        println!("{}", response.message);
    }
    if !response.data.is_null() {
        println!("{}", response.data);
    }
}
