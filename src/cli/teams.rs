//! Team membership commands

use futures::future::join;

use super::auth::signed_in_user;
use super::TeamsArgs;
use crate::domain::{Organization, OrganizationId, OrganizationQuery};
use crate::ClientState;

pub async fn show_team(state: &ClientState) -> anyhow::Result<()> {
    signed_in_user(state)?;

    let Some(team) = state.organizations.fetch_user_organization().await? else {
        println!("You are not on a team. Browse with `roster teams`.");
        return Ok(());
    };

    let (games, status) = join(
        state.events.fetch_upcoming_games(team.id()),
        state.organizations.check_subscription_status(),
    )
    .await;

    print_team(&team);
    for player in team.players() {
        println!(
            "  #{:<3} {:<24} {}",
            player.jersey_number,
            player.full_name(),
            player.position
        );
    }

    if let Ok(games) = games {
        if let Some(next) = games.first() {
            println!("Next game: {} ({})", next.title, next.start_date.format("%Y-%m-%d %H:%M"));
        }
    }
    if let Ok(status) = status {
        if status.organization_id.as_ref() != Some(team.id()) {
            println!("Warning: the server no longer lists you on this team");
        }
    }
    Ok(())
}

pub async fn list(state: &ClientState, args: TeamsArgs) -> anyhow::Result<()> {
    let mut query = OrganizationQuery::new()
        .with_page(args.page)
        .with_limit(args.limit);
    if let Some(search) = args.search {
        query = query.with_search(search);
    }

    let page = state.organizations.fetch_organizations(query).await?;
    if page.organizations.is_empty() {
        println!("No teams found");
        return Ok(());
    }

    for team in &page.organizations {
        print_team(team);
    }
    let pagination = page.pagination;
    println!(
        "Page {} of {} ({} teams)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    );
    Ok(())
}

pub async fn subscribe(state: &ClientState, organization_id: &str) -> anyhow::Result<()> {
    let id = OrganizationId::new(organization_id)?;
    let team = state.organizations.subscribe_to_team(&id).await?;

    println!("Joined {}", team.name());
    Ok(())
}

pub async fn unsubscribe(state: &ClientState) -> anyhow::Result<()> {
    state.organizations.unsubscribe_from_team().await?;

    println!("Left your team");
    let available = state.organizations.state().organizations;
    if !available.is_empty() {
        println!("Teams you can join:");
        for team in &available {
            print_team(team);
        }
    }
    Ok(())
}

pub async fn status(state: &ClientState) -> anyhow::Result<()> {
    let status = state.organizations.check_subscription_status().await?;

    match status.organization_id {
        Some(id) if status.is_subscribed => println!("Subscribed to {}", id),
        _ => println!("Not subscribed to any team"),
    }
    Ok(())
}

pub async fn can_join(state: &ClientState, organization_id: &str) -> anyhow::Result<()> {
    let id = OrganizationId::new(organization_id)?;
    let can_join = state.organizations.check_join_eligibility(&id).await?;

    if can_join {
        println!("You can join {}", id);
    } else {
        println!("You cannot join {}", id);
    }
    Ok(())
}

fn print_team(team: &Organization) {
    println!(
        "[{:<3}] {} ({}) - {} players",
        team.abbreviation(),
        team.name(),
        team.id(),
        team.player_count()
    );
    if !team.description().is_empty() {
        println!("      {}", team.description());
    }
}
