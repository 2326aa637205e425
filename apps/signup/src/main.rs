use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use client_core::{
    config::normalize_register_url, load_settings, RegistrationApi, RegistrationClient,
    RegistrationForm, SubmitAttempt,
};
use shared::domain::Field;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Register a new account against the users API")]
struct Args {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Password confirmation; must equal --password.
    #[arg(long)]
    password2: String,
    /// Overrides signup.toml and the environment.
    #[arg(long)]
    register_url: Option<String>,
}

impl Args {
    fn values(&self) -> [(Field, &str); 6] {
        [
            (Field::FirstName, self.first_name.as_str()),
            (Field::LastName, self.last_name.as_str()),
            (Field::Username, self.username.as_str()),
            (Field::Email, self.email.as_str()),
            (Field::Password, self.password.as_str()),
            (Field::Password2, self.password2.as_str()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(url) = &args.register_url {
        settings.register_url = normalize_register_url(url)?;
    }
    info!(register_url = %settings.register_url, "using register endpoint");
    let client = RegistrationClient::from_settings(&settings);

    let (lines, success) = run(&args, &client).await;
    for line in lines {
        println!("{line}");
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Drives the form the way an interactive front end would and returns the lines to show.
async fn run<A>(args: &Args, api: &A) -> (Vec<String>, bool)
where
    A: RegistrationApi + ?Sized,
{
    let mut form = RegistrationForm::new();
    for (field, value) in args.values() {
        form.on_change(field, value);
        form.on_blur(field);
    }

    match form.submit(api).await {
        SubmitAttempt::Invalid(_) => {
            let lines = Field::ALL
                .into_iter()
                .filter_map(|field| {
                    form.visible_error(field)
                        .map(|message| format!("{}: {message}", field.label()))
                })
                .collect();
            (lines, false)
        }
        SubmitAttempt::Completed(outcome) => {
            if form.signup_success() {
                (vec![outcome.message().to_string()], true)
            } else {
                let mut lines = vec![format!(
                    "Error: {}",
                    form.signup_error().unwrap_or(outcome.message())
                )];
                lines.extend(Field::ALL.into_iter().filter_map(|field| {
                    form.field(field)
                        .server_error
                        .as_ref()
                        .map(|message| format!("{}: {message}", field.label()))
                }));
                (lines, false)
            }
        }
    }
}
