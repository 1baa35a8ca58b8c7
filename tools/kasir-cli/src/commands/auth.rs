//! Account commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::{Input, Password};
use kasir_client::Registration;

use super::{LoginArgs, PasswordArgs, PasswordCommand, RegisterArgs, WhoamiArgs};
use crate::context::Context;

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let email = match args.email {
        Some(email) => email,
        None => prompt_text(ctx, "Email")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt_password(ctx, "Password", false)?,
    };

    let mut client = ctx.client()?;
    let spinner = ctx.output.spinner("Logging in...");
    let result = client.login(&email, &password).await;
    spinner.finish_and_clear();
    let session = result.context("Login failed")?;

    ctx.save_session(&session)?;

    if ctx.output.is_json() {
        ctx.output.json(&session.user);
        return Ok(());
    }
    ctx.output.success(&format!("Logged in as {}", display_name(&session.user)));
    Ok(())
}

/// Run the logout command.
pub async fn logout(ctx: &Context) -> Result<()> {
    let session = match ctx.load_session()? {
        Some(session) => session,
        None => {
            ctx.output.info("Not logged in.");
            return Ok(());
        }
    };

    let mut client = ctx.client()?.with_session(session);
    let result = client.logout().await;
    ctx.delete_session()?;

    match result {
        Ok(()) => ctx.output.success("Logged out"),
        Err(e) => ctx
            .output
            .warn(&format!("Server logout failed ({}); local session removed", e)),
    }
    Ok(())
}

/// Run the whoami command.
pub async fn whoami(args: WhoamiArgs, ctx: &Context) -> Result<()> {
    let session = match ctx.load_session()? {
        Some(session) => session,
        None => bail!("Not logged in. Run `kasir login` first."),
    };

    if args.check {
        let client = ctx.client()?.with_session(session.clone());
        let spinner = ctx.output.spinner("Checking session...");
        let valid = client.check_auth().await;
        spinner.finish_and_clear();
        if !valid? {
            ctx.delete_session()?;
            bail!("Session expired. Run `kasir login` again.");
        }
    }

    if ctx.output.is_json() {
        ctx.output.json(&session.user);
        return Ok(());
    }

    ctx.output.header("Current user");
    ctx.output.kv("name", &session.user.name);
    ctx.output.kv("email", &session.user.email);
    if let Some(address) = &session.user.address {
        ctx.output.kv("address", address);
    }
    if let Some(store_id) = session.user.store_id {
        ctx.output.kv("store", &store_id.to_string());
    }
    Ok(())
}

/// Run the register command.
pub async fn register(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => prompt_text(ctx, "Name")?,
    };
    let email = match args.email {
        Some(email) => email,
        None => prompt_text(ctx, "Email")?,
    };
    let address = match args.address {
        Some(address) => address,
        None => prompt_text(ctx, "Address")?,
    };
    let password = prompt_password(ctx, "Password", true)?;

    let registration = Registration {
        name,
        email,
        address,
        password_confirmation: password.clone(),
        password,
    };

    let client = ctx.client()?;
    let spinner = ctx.output.spinner("Creating account...");
    let result = client.register(&registration).await;
    spinner.finish_and_clear();
    let message = result.context("Registration failed")?;

    ctx.output.success(non_empty(&message, "Account created"));
    ctx.output.info("Run `kasir login` to sign in.");
    Ok(())
}

/// Run the password command.
pub async fn password(args: PasswordArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let message = match args.command {
        PasswordCommand::Forgot { email } => client
            .forgot_password(&email)
            .await
            .context("Could not request a reset token")?,
        PasswordCommand::Verify { email, token } => client
            .verify_reset_token(&email, &token)
            .await
            .context("Token rejected")?,
        PasswordCommand::Reset { email, token } => {
            let password = prompt_password(ctx, "New password", true)?;
            client
                .reset_password(&email, &token, &password, &password)
                .await
                .context("Password reset failed")?
        }
    };
    ctx.output.success(non_empty(&message, "Done"));
    Ok(())
}

fn prompt_text(ctx: &Context, label: &str) -> Result<String> {
    if ctx.output.is_json() {
        bail!("{} is required in --json mode", label.to_lowercase());
    }
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .context("Failed to read input")
}

fn prompt_password(ctx: &Context, label: &str, confirm: bool) -> Result<String> {
    if ctx.output.is_json() {
        bail!("{} is required in --json mode", label.to_lowercase());
    }
    let mut prompt = Password::new().with_prompt(label);
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    prompt.interact().context("Failed to read password")
}

fn display_name(user: &kasir_client::User) -> &str {
    if user.name.is_empty() {
        &user.email
    } else {
        &user.name
    }
}

fn non_empty<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.trim().is_empty() {
        fallback
    } else {
        message
    }
}
