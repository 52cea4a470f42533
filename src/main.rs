//! Lockbox - a command-line client for the Lockbox password-vault server.
//!
//! The binary is a thin shell over the library: it restores the session,
//! wires it into the API client, and maps subcommands onto endpoint calls.
//! All vault logic (crypto, storage, password generation) runs server-side.

use anyhow::Result;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lockbox::api::ApiClient;
use lockbox::auth::{Session, SharedSession};
use lockbox::config::Config;
use lockbox::models::{PasswordSpec, SecretPatch, ServerConfigPatch};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn usage() {
    eprintln!(
        "Usage: lockbox <command>\n\n\
         Commands:\n\
         \thealth                     probe the server\n\
         \tlogin                      authenticate with the master password\n\
         \tinit                       create a new vault\n\
         \tlogout                     end the session\n\
         \tstatus                     show session state\n\
         \tlist [--hide-passwords]    list secrets\n\
         \tshow <id>                  show one secret\n\
         \tadd <title> <username>     add a secret (prompts for password)\n\
         \tedit <id>                  change a secret's password\n\
         \trm <id>                    delete a secret\n\
         \tgenerate [length]          server-side password generation\n\
         \tvault-health               aggregate security status\n\
         \tbackup                     produce a backup artifact\n\
         \trestore <backup_file>      restore from a named artifact\n\
         \tchange-password            rotate the master password\n\
         \tconfig [timeout <min>]     show or update server configuration\n\
         \tset-server <url>           set the server address for this client"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::load()?;
    let mut session = Session::new(Config::state_dir()?);
    if session.restore()? {
        debug!("Session restored");
    }

    let session: SharedSession = session.into_shared();
    let client = ApiClient::new(config.api_base_url(), session.clone())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("");

    match command {
        "health" => {
            let health = client.health().await?;
            println!(
                "server {} ({}), vault exists: {}",
                health.version, health.status, health.vault_exists
            );
        }
        "login" => {
            let password = rpassword::prompt_password("Master password: ")?;
            let grant = client.authenticate(&password).await?;
            info!("Authenticated");
            let expiry = grant.expiry;
            lock_write(&session)?.login(grant.token, expiry)?;
            println!("Logged in, session valid until {}", expiry);
        }
        "init" => {
            let password = rpassword::prompt_password("New master password: ")?;
            let confirm = rpassword::prompt_password("Confirm master password: ")?;
            if password != confirm {
                anyhow::bail!("Passwords do not match");
            }
            let grant = client.init_vault(&password).await?;
            let expiry = grant.expiry;
            lock_write(&session)?.login(grant.token, expiry)?;
            println!("Vault created, session valid until {}", expiry);
        }
        "logout" => {
            // Best-effort server-side invalidation; the local session is
            // cleared regardless of the outcome.
            if let Err(e) = client.logout().await {
                warn!(error = %e, "Server-side logout failed");
            }
            lock_write(&session)?.logout()?;
            println!("Logged out");
        }
        "status" => {
            let session = lock_read(&session)?;
            if session.is_authenticated() {
                match session.expiry() {
                    Some(expiry) => println!("authenticated, session expires {}", expiry),
                    None => println!("authenticated"),
                }
            } else {
                println!("not authenticated");
            }
        }
        "list" => {
            let hide = args.iter().any(|a| a == "--hide-passwords");
            let secrets = client.list_secrets(hide).await?;
            for secret in &secrets {
                println!(
                    "{}  {}  {}  {}",
                    secret.id,
                    secret.title,
                    secret.username,
                    secret.display_url()
                );
            }
            println!("{} entries", secrets.len());
        }
        "show" => {
            let id = required_arg(&args, 1, "show <id>")?;
            let secret = client.get_secret(id).await?;
            println!("title:    {}", secret.title);
            println!("username: {}", secret.username);
            println!("password: {}", secret.password);
            println!("url:      {}", secret.display_url());
            if let Some(notes) = &secret.notes {
                println!("notes:    {}", notes);
            }
            println!("modified: {}", secret.modified_at);
        }
        "add" => {
            let title = required_arg(&args, 1, "add <title> <username>")?;
            let username = required_arg(&args, 2, "add <title> <username>")?;
            let password = rpassword::prompt_password("Password (empty to generate): ")?;
            let password = if password.is_empty() {
                client
                    .generate_password(&PasswordSpec::default())
                    .await?
                    .password
            } else {
                password
            };
            let secret = client
                .add_secret(&SecretPatch {
                    title: Some(title.to_string()),
                    username: Some(username.to_string()),
                    password: Some(password),
                    ..Default::default()
                })
                .await?;
            println!("Added {} ({})", secret.title, secret.id);
        }
        "edit" => {
            let id = required_arg(&args, 1, "edit <id>")?;
            let password = rpassword::prompt_password("New password: ")?;
            let secret = client
                .update_secret(
                    id,
                    &SecretPatch {
                        password: Some(password),
                        ..Default::default()
                    },
                )
                .await?;
            println!("Updated {} ({})", secret.title, secret.id);
        }
        "rm" => {
            let id = required_arg(&args, 1, "rm <id>")?;
            client.delete_secret(id).await?;
            println!("Deleted {}", id);
        }
        "generate" => {
            let mut spec = PasswordSpec::default();
            if let Some(length) = args.get(1) {
                spec.length = length.parse()?;
            }
            let generated = client.generate_password(&spec).await?;
            println!("{}", generated.password);
        }
        "vault-health" => {
            let health = client.vault_health().await?;
            println!(
                "{} ({} entries)",
                health.status.display_name(),
                health.total_entries
            );
            for issue in &health.issues {
                println!("issue:   {}", issue);
            }
            for warning in &health.warnings {
                println!("warning: {}", warning);
            }
        }
        "backup" => {
            let receipt = client.backup_vault().await?;
            println!(
                "Backup {} written to {} at {}",
                receipt.backup_file, receipt.backup_path, receipt.backup_time
            );
        }
        "restore" => {
            let file = required_arg(&args, 1, "restore <backup_file>")?;
            let receipt = client.restore_vault(file).await?;
            println!("Restored {} at {}", receipt.backup_file, receipt.restore_time);
        }
        "change-password" => {
            let current = rpassword::prompt_password("Current master password: ")?;
            let new = rpassword::prompt_password("New master password: ")?;
            let confirm = rpassword::prompt_password("Confirm new master password: ")?;
            if new != confirm {
                anyhow::bail!("Passwords do not match");
            }
            client.change_master_password(&current, &new).await?;
            println!("Master password changed");
        }
        "config" => {
            if args.get(1).map(String::as_str) == Some("timeout") {
                let minutes: i64 = required_arg(&args, 2, "config timeout <min>")?.parse()?;
                let updated = client
                    .update_config(&ServerConfigPatch {
                        timeout: Some(minutes),
                        ..Default::default()
                    })
                    .await?;
                println!("Timeout set to {} minutes", updated.timeout);
            } else {
                let server = client.get_config().await?;
                println!("timeout:        {} minutes", server.timeout);
                println!("key derivation: {}", server.key_derivation);
                println!("api port:       {}", server.api_port);
                println!("tls:            {}", server.enable_tls);
                if let Some(version) = &server.version {
                    println!("version:        {}", version);
                }
            }
        }
        "set-server" => {
            let url = required_arg(&args, 1, "set-server <url>")?;
            let mut config = config;
            config.api_url = Some(url.to_string());
            config.save()?;
            println!("Server address set to {}", url);
        }
        _ => {
            usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

fn required_arg<'a>(args: &'a [String], index: usize, hint: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Usage: lockbox {}", hint))
}

fn lock_read(session: &SharedSession) -> Result<std::sync::RwLockReadGuard<'_, Session>> {
    session
        .read()
        .map_err(|_| anyhow::anyhow!("Session state is poisoned"))
}

fn lock_write(session: &SharedSession) -> Result<std::sync::RwLockWriteGuard<'_, Session>> {
    session
        .write()
        .map_err(|_| anyhow::anyhow!("Session state is poisoned"))
}
