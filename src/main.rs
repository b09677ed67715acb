use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use barberbook::config::ClientConfig;
use barberbook::screens::appointment_created::AppointmentCreatedScreen;
use barberbook::screens::create_appointment::CreateAppointmentScreen;
use barberbook::screens::dashboard::DashboardScreen;
use barberbook::screens::profile::ProfileScreen;
use barberbook::screens::sign_in::SignInScreen;
use barberbook::screens::sign_up::SignUpScreen;
use barberbook::screens::{Navigator, Outcome, Route};
use barberbook::services::validation::ValidationErrors;
use barberbook::state::AppState;

#[derive(Parser)]
#[command(name = "barberbook", about = "Book barbershop appointments from the terminal")]
struct Cli {
    /// Base URL of the booking API
    #[arg(long, env = "API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session on this device
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    SignOut,
    /// Greeting and provider list
    Dashboard,
    /// Show free hours for a provider on a day (default: today)
    Availability {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Book an hour with a provider
    Book {
        #[arg(long)]
        provider: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        hour: u8,
    },
    /// Update name, e-mail or password
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value = "")]
        old_password: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        password_confirmation: String,
    },
    /// Upload a JPEG as the new avatar
    Avatar { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    tracing::debug!(api_url = %config.api_url, storage = %config.storage_path, "starting");

    let mut state = AppState::from_config(&config).context("failed to initialise client")?;
    let mut nav = Navigator::for_state(&state);

    match cli.command {
        Command::SignIn { email, password } => {
            let mut screen = SignInScreen::new();
            screen.form.email = email;
            screen.form.password = password;
            let outcome = screen.submit(&mut state).await;
            print_errors(&screen.errors);
            apply(&mut nav, outcome);
            if nav.current() == &Route::Dashboard {
                show_dashboard(&mut state, &mut nav).await?;
            }
        }
        Command::SignUp {
            name,
            email,
            password,
        } => {
            nav.apply(SignInScreen::new().create_account().transition);
            let mut screen = SignUpScreen::new();
            screen.form.name = name;
            screen.form.email = email;
            screen.form.password = password;
            let outcome = screen.submit(&mut state).await;
            print_errors(&screen.errors);
            apply(&mut nav, outcome);
        }
        Command::SignOut => {
            let outcome = DashboardScreen::new().sign_out(&mut state)?;
            apply(&mut nav, outcome);
            println!("Signed out");
        }
        Command::Dashboard => {
            require_session(&state)?;
            show_dashboard(&mut state, &mut nav).await?;
        }
        Command::Availability { provider, date } => {
            require_session(&state)?;
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut screen = CreateAppointmentScreen::new(&provider, date);
            let outcome = screen.load(&mut state).await;
            if apply(&mut nav, outcome) {
                println!("{}", screen.render(&state)?);
            }
        }
        Command::Book {
            provider,
            date,
            hour,
        } => {
            require_session(&state)?;
            nav.apply(DashboardScreen::new().select_provider(&provider).transition);

            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let mut screen = CreateAppointmentScreen::new(&provider, date);
            let outcome = screen.load(&mut state).await;
            if !apply(&mut nav, outcome) {
                return Ok(());
            }

            if !screen.select_hour(hour) {
                println!("{hour:02}:00 is not available");
                println!("Free: {}", screen.availability().to_human_readable());
                return Ok(());
            }

            let outcome = screen.submit(&mut state).await;
            apply(&mut nav, outcome);
            if let Route::AppointmentCreated { date } = nav.current() {
                let confirmation = AppointmentCreatedScreen::new(*date);
                println!("{}", confirmation.render(&state)?);
                nav.apply(confirmation.ok().transition);
            }
        }
        Command::Profile {
            name,
            email,
            old_password,
            password,
            password_confirmation,
        } => {
            let user = require_session(&state)?;
            let mut screen = ProfileScreen::new(&user);
            if let Some(name) = name {
                screen.form.name = name;
            }
            if let Some(email) = email {
                screen.form.email = email;
            }
            screen.form.old_password = old_password;
            screen.form.password = password;
            screen.form.password_confirmation = password_confirmation;

            nav.apply(DashboardScreen::new().open_profile().transition);
            let outcome = screen.submit(&mut state).await;
            print_errors(&screen.errors);
            apply(&mut nav, outcome);
            if let Some(user) = state.session.user() {
                println!("{}", screen.render(user));
            }
        }
        Command::Avatar { path } => {
            let user = require_session(&state)?;
            let screen = ProfileScreen::new(&user);
            let outcome = screen.update_avatar(&mut state, &path).await;
            if apply(&mut nav, outcome) {
                println!("Avatar updated");
            }
        }
    }

    nav.guard(&state);
    tracing::debug!(route = ?nav.current(), "done");
    Ok(())
}

fn require_session(state: &AppState) -> anyhow::Result<barberbook::models::User> {
    let session = state
        .session
        .require()
        .context("not signed in, run `barberbook sign-in` first")?;
    Ok(session.user.clone())
}

async fn show_dashboard(state: &mut AppState, nav: &mut Navigator) -> anyhow::Result<()> {
    let mut screen = DashboardScreen::new();
    let outcome = screen.load(state).await;
    if apply(nav, outcome) {
        println!("{}", screen.render(state)?);
    }
    Ok(())
}

/// Prints the alert, if any, and moves the navigator. Returns false when an
/// alert was raised.
fn apply(nav: &mut Navigator, outcome: Outcome) -> bool {
    let clean = outcome.alert.is_none();
    if let Some(alert) = outcome.alert {
        println!("{alert}");
    }
    nav.apply(outcome.transition);
    clean
}

fn print_errors(errors: &ValidationErrors) {
    for (field, message) in errors.iter() {
        println!("{field}: {message}");
    }
}
