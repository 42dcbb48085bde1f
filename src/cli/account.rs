// Copyright (c) 2025 Fortress Labs. All rights reserved.
// This software is proprietary and confidential.

use anyhow::Result;
use tracing::info;

use crate::api::auth::AuthClient;
use crate::cli::AppContext;
use crate::session;

pub async fn login(ctx: &AppContext, username: &str, password: &str) -> Result<()> {
    // A valid stored session short-circuits the round trip
    if let Ok(Some(existing)) = ctx.sessions.load() {
        if session::token_is_valid(&existing.access) {
            println!("Already signed in. Run `fortress logout` to switch accounts.");
            return Ok(());
        }
        // Expired token on disk - clear before logging in again
        let _ = ctx.sessions.clear();
    }

    let auth = AuthClient::new(&ctx.config)?;
    let new_session = auth.login(username, password).await?;
    ctx.sessions.save(&new_session)?;

    info!("Login successful for {}", username);
    println!("Login successful.");
    Ok(())
}

pub async fn register(ctx: &AppContext, username: &str, password: &str) -> Result<()> {
    let auth = AuthClient::new(&ctx.config)?;
    auth.register(username, password).await?;
    println!("Registration successful. Sign in with `fortress login`.");
    Ok(())
}

pub async fn reset_password(ctx: &AppContext, username: &str, new_password: &str) -> Result<()> {
    let auth = AuthClient::new(&ctx.config)?;
    auth.reset_password(username, new_password).await?;
    println!("Password reset successful. Sign in with `fortress login`.");
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.sessions.clear()?;
    println!("Logged out.");
    Ok(())
}
