use serde_json::json;

use crate::auth;
use crate::cli::utils::{output_fields, output_success};
use crate::cli::OutputFormat;
use crate::config;

pub fn hash_password(password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    let hash = auth::hash_password(password)?;
    match output_format {
        OutputFormat::Json => output_success(output_format, "Password hashed", Some(json!({ "hash": hash }))),
        OutputFormat::Text => {
            println!("{}", hash);
            Ok(())
        }
    }
}

pub fn token(email: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;
    let pair = auth::issue_pair(email, security)?;
    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            "Token pair issued",
            Some(json!({ "access": pair.access, "refresh": pair.refresh })),
        ),
        OutputFormat::Text => {
            output_fields(&[
                ("subject", auth::normalize_email(email)),
                ("access", pair.access),
                ("refresh", pair.refresh),
                ("access ttl", format!("{} min", security.access_ttl_minutes)),
                ("refresh ttl", format!("{} days", security.refresh_ttl_days)),
            ]);
            Ok(())
        }
    }
}
