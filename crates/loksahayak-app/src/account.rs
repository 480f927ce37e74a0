//! `login`, `signup` and `logout` subcommands.

use console::style;
use dialoguer::{Input, Password, Select};

use loksahayak_api::{ApiClient, AuthError, AuthOutcome, SignInForm, SignUpForm, SignupLanguage};

type CliResult = Result<(), Box<dyn std::error::Error>>;

pub async fn login(client: &ApiClient, identifier: Option<String>) -> CliResult {
    let identifier = match identifier {
        Some(i) => i,
        None => Input::<String>::new()
            .with_prompt("Phone number / email address")
            .interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    let form = SignInForm {
        identifier,
        password,
    };
    report(client.sign_in(&form).await, "Signed in")
}

pub async fn signup(
    client: &ApiClient,
    full_name: Option<String>,
    username: Option<String>,
    language: Option<String>,
) -> CliResult {
    let full_name = match full_name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Full name")
            .interact_text()?,
    };
    let username = match username {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let language = match language {
        Some(l) => l.parse::<SignupLanguage>()?,
        None => {
            let names: Vec<String> = SignupLanguage::ALL.iter().map(ToString::to_string).collect();
            let selection = Select::new()
                .with_prompt("Preferred language")
                .items(&names)
                .default(0)
                .interact()?;
            SignupLanguage::ALL[selection]
        }
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let form = SignUpForm {
        full_name,
        username,
        password,
        language,
    };
    report(client.sign_up(&form).await, "Account created")
}

pub fn logout(client: &ApiClient) {
    client.clear_token();
    println!("  {} Signed out", style("✓").green().bold());
}

fn report(result: Result<AuthOutcome, AuthError>, success: &str) -> CliResult {
    match result {
        Ok(outcome) => {
            println!("  {} {success}", style("✓").green().bold());
            if !outcome.token_issued {
                println!("  {}", style("The server did not issue a token.").dim());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("  {} {e}", style("!").red().bold());
            Err(e.into())
        }
    }
}
