//! Player, match and schedule commands

use super::auth::signed_in_user;
use crate::domain::{MatchId, PlayerId};
use crate::ClientState;

const NO_TEAM: &str = "Join a team to see players, matches and games";

pub async fn player(state: &ClientState, player_id: &str) -> anyhow::Result<()> {
    let id = PlayerId::new(player_id)?;
    let Some(player) = state.players.load(&id).await? else {
        anyhow::bail!(NO_TEAM);
    };

    println!("{} #{}", player.full_name(), player.jersey_number);
    if !player.position.is_empty() {
        println!("  position: {}", player.position);
    }
    println!("  age:      {}", player.age);
    println!(
        "  goals: {}  assists: {}  passes: {}",
        player.total_goals, player.total_assists, player.total_passes_completed
    );
    Ok(())
}

pub async fn show_match(state: &ClientState, match_id: &str) -> anyhow::Result<()> {
    let id = MatchId::new(match_id)?;
    let Some(game) = state.matches.load(&id).await? else {
        anyhow::bail!(NO_TEAM);
    };

    let (home, away) = game.score();
    println!("{}", game.title());
    println!("  {}  [{}]", game.date.format("%Y-%m-%d %H:%M"), game.status);
    println!(
        "  score: {} {} - {} {}{}",
        game.home_name(),
        home,
        away,
        game.away_name(),
        if game.is_live() { " (live)" } else { "" }
    );
    if let Some(location) = &game.location {
        println!("  at {}", location);
    }
    Ok(())
}

pub async fn games(state: &ClientState, past: bool) -> anyhow::Result<()> {
    let user = signed_in_user(state)?;
    let Some(team) = user.organization_id() else {
        anyhow::bail!(NO_TEAM);
    };

    let games = if past {
        state.events.fetch_past_games(team).await?
    } else {
        state.events.fetch_upcoming_games(team).await?
    };

    if games.is_empty() {
        println!("No games");
        return Ok(());
    }
    for game in &games {
        let score = match (game.home_team.score, game.away_team.score) {
            (Some(home), Some(away)) if past => format!("  {} - {}", home, away),
            _ => String::new(),
        };
        println!(
            "{}  {}{}",
            game.start_date.format("%Y-%m-%d %H:%M"),
            game.title,
            score
        );
    }
    Ok(())
}
