//! Guided server launch.
//!
//! Asks for the VWorld key when none is configured, then for the listen
//! address, and starts the server once the user confirms.

use dialoguer::{Confirm, Input, Password};
use parcel_map_wfs::config::API_KEY_ENV;

/// Answers collected before launch.
struct LaunchSettings {
    key: Option<String>,
    bind_addr: String,
    port: String,
}

impl LaunchSettings {
    fn prompt() -> Self {
        let key_configured =
            std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty());

        let key = if key_configured {
            None
        } else {
            Password::new()
                .with_prompt("VWorld API key (leave empty to skip)")
                .allow_empty_password(true)
                .interact()
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
        };

        Self {
            key,
            bind_addr: text_or_default("Bind address", super::DEFAULT_BIND_ADDR),
            port: text_or_default("Port", &super::DEFAULT_PORT.to_string()),
        }
    }

    /// Publishes the answers where [`super::run_server`] reads them.
    fn export_env(&self) {
        // SAFETY: nothing else touches the environment while the launch
        // prompts run; the server reads these once on startup.
        unsafe {
            if let Some(key) = &self.key {
                std::env::set_var(API_KEY_ENV, key);
            }
            std::env::set_var("BIND_ADDR", &self.bind_addr);
            std::env::set_var("PORT", &self.port);
        }
    }
}

fn text_or_default(prompt: &str, default: &str) -> String {
    Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()
        .unwrap_or_else(|_| default.to_string())
}

/// Prompts for launch settings and runs the server with them.
///
/// A failed prompt falls back to its default. Declining the final
/// confirmation returns without starting anything.
///
/// # Errors
///
/// Propagates the `std::io::Error` from [`super::run_server`].
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Parcel Map Server");
    println!();

    let settings = LaunchSettings::prompt();
    settings.export_env();

    let start = Confirm::new()
        .with_prompt(format!(
            "Listen on {}:{}?",
            settings.bind_addr, settings.port
        ))
        .default(true)
        .interact()
        .unwrap_or(true);

    if !start {
        println!("Not started.");
        return Ok(());
    }

    super::run_server().await
}
