//! Account commands

use clap::Args;

use crate::domain::{LoginCredentials, RegisterCredentials, User};
use crate::ClientState;

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long, env = "ROSTER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, env = "ROSTER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Avatar image URL
    #[arg(long)]
    pub avatar: Option<String>,
}

pub async fn login(state: &ClientState, args: LoginArgs) -> anyhow::Result<()> {
    let user = state
        .auth
        .login(&LoginCredentials::new(args.email, args.password))
        .await?;

    println!("Signed in as {} <{}>", user.full_name(), user.email());
    Ok(())
}

pub async fn register(state: &ClientState, args: RegisterArgs) -> anyhow::Result<()> {
    let mut credentials =
        RegisterCredentials::new(args.name, args.last_name, args.email, args.password);
    if let Some(avatar) = args.avatar {
        credentials = credentials.with_avatar(avatar);
    }

    let user = state.auth.register(&credentials).await?;

    println!("Registered and signed in as {} <{}>", user.full_name(), user.email());
    Ok(())
}

pub async fn logout(state: &ClientState) -> anyhow::Result<()> {
    state.auth.logout().await?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(state: &ClientState) -> anyhow::Result<()> {
    let user = signed_in_user(state)?;

    println!("{} <{}>", user.full_name(), user.email());
    println!("  id:   {}", user.id());
    println!("  role: {}", user.role());
    match user.organization_id() {
        Some(team) => println!("  team: {}", team),
        None => println!("  team: (none)"),
    }
    Ok(())
}

pub(crate) fn signed_in_user(state: &ClientState) -> anyhow::Result<User> {
    state
        .auth
        .user()
        .ok_or_else(|| anyhow::anyhow!("Not signed in; run `roster login` first"))
}
