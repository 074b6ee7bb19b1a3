//! Single binary web server: JSON API over the tournament store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, DEFAULT_MAX_TEAMS.

use actix_web::{
    delete, error, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use team_tournament_web::config::ServerConfig;
use team_tournament_web::store::{NewTeam, TeamUpdate, TournamentUpdate, DEFAULT_RECENT_LIMIT};
use team_tournament_web::{
    LeaderboardScope, MatchId, TeamId, TournamentError, TournamentFormat, TournamentId,
    TournamentStore,
};

/// In-memory state. Every mutating route takes the write lock, so operations never interleave.
type AppState = Data<RwLock<TournamentStore>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(rename = "type", default)]
    format: TournamentFormat,
    max_teams: Option<usize>,
}

#[derive(Deserialize)]
struct CreateMatchBody {
    team_1: TeamId,
    team_2: TeamId,
    round: u32,
}

#[derive(Deserialize)]
struct ScoreBody {
    team_1_score: u32,
    team_2_score: u32,
}

#[derive(Deserialize)]
struct ScheduleBody {
    scheduled_time: String,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct TournamentTeamPath {
    id: TournamentId,
    team_id: TeamId,
}

#[derive(Deserialize)]
struct TeamPath {
    id: TeamId,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    tournament_id: Option<TournamentId>,
}

#[derive(Deserialize)]
struct RecentQuery {
    limit: Option<usize>,
}

fn error_response(e: TournamentError) -> HttpResponse {
    log::warn!("Rejected request: {}", e);
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => error_response(e),
    }
}

fn respond_created<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Created().json(body),
        Err(e) => error_response(e),
    }
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "team-tournament-web",
    })
}

// ---- tournaments ----

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.list_tournaments())
}

/// Create a tournament (Upcoming, no teams).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    config: Data<ServerConfig>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let max_teams = body.max_teams.unwrap_or(config.default_max_teams);
    respond_created(g.create_tournament(&body.name, body.format, max_teams))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.get_tournament(path.id))
}

/// Rename; change format or capacity while Upcoming.
#[put("/api/tournaments/{id}")]
async fn api_update_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentUpdate>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.update_tournament(path.id, body.into_inner()))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(
        g.delete_tournament(path.id)
            .map(|()| serde_json::json!({ "message": "Tournament deleted" })),
    )
}

/// Register a team (tournament must be Upcoming and not full).
#[post("/api/tournaments/{id}/teams")]
async fn api_add_team(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<NewTeam>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond_created(g.add_team(path.id, body.into_inner()))
}

/// Remove a team by id (tournament must be Upcoming).
#[delete("/api/tournaments/{id}/teams/{team_id}")]
async fn api_remove_team(state: AppState, path: Path<TournamentTeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(
        g.remove_team(path.id, path.team_id)
            .map(|()| serde_json::json!({ "message": "Team removed from tournament" })),
    )
}

/// Start the tournament (Upcoming -> Active) and generate its matches.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.start_tournament(path.id))
}

#[post("/api/tournaments/{id}/complete")]
async fn api_complete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.complete_tournament(path.id))
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.bracket(path.id))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.standings(path.id))
}

// ---- teams ----

#[get("/api/teams")]
async fn api_list_teams(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.list_teams())
}

#[post("/api/teams")]
async fn api_create_team(state: AppState, body: Json<NewTeam>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond_created(g.create_team(body.into_inner()))
}

#[get("/api/teams/{id}")]
async fn api_get_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.get_team(path.id))
}

#[put("/api/teams/{id}")]
async fn api_update_team(
    state: AppState,
    path: Path<TeamPath>,
    body: Json<TeamUpdate>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.update_team(path.id, body.into_inner()))
}

#[delete("/api/teams/{id}")]
async fn api_delete_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(
        g.delete_team(path.id)
            .map(|()| serde_json::json!({ "message": "Team deleted" })),
    )
}

// ---- matches ----

#[get("/api/matches")]
async fn api_list_matches(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.list_matches())
}

/// Create a match by hand between two standalone teams.
#[post("/api/matches")]
async fn api_create_match(state: AppState, body: Json<CreateMatchBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond_created(g.create_match(body.team_1, body.team_2, body.round))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.get_match(path.id))
}

/// Delete a hand-made match. Tournament matches cannot be deleted.
#[delete("/api/matches/{id}")]
async fn api_delete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(
        g.delete_match(path.id)
            .map(|()| serde_json::json!({ "message": "Match deleted" })),
    )
}

#[put("/api/matches/{id}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.start_match(path.id))
}

#[put("/api/matches/{id}/score")]
async fn api_update_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.update_score(path.id, body.team_1_score, body.team_2_score))
}

/// Complete a match: winner/loser from the scores, team stats updated, winner advanced.
#[put("/api/matches/{id}/complete")]
async fn api_complete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.complete_match(path.id))
}

#[put("/api/matches/{id}/schedule")]
async fn api_schedule_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ScheduleBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.schedule_match(path.id, &body.scheduled_time))
}

// ---- statistics ----

#[get("/api/statistics/overview")]
async fn api_overview(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.overview())
}

/// Team leaderboard, global or for one tournament (`?tournament_id=`).
#[get("/api/statistics/leaderboard/teams")]
async fn api_team_leaderboard(state: AppState, query: Query<LeaderboardQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let scope = match query.tournament_id {
        Some(id) => LeaderboardScope::Tournament(id),
        None => LeaderboardScope::Global,
    };
    respond(g.leaderboard(scope))
}

/// Same table as `/api/tournaments/{id}/standings`, under the statistics prefix.
#[get("/api/statistics/tournaments/{id}/standings")]
async fn api_statistics_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    respond(g.standings(path.id))
}

#[get("/api/statistics/leaderboard/players")]
async fn api_player_leaderboard(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.player_leaderboard())
}

#[get("/api/statistics/recent-matches")]
async fn api_recent_matches(state: AppState, query: Query<RecentQuery>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.recent_matches(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT)))
}

/// Malformed JSON bodies (missing fields, negative or non-numeric scores) get the same
/// `{"error": ...}` shape as engine errors.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("Rejected request body: {}", message);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(TournamentStore::new()));
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .app_data(json_config())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_update_tournament)
            .service(api_delete_tournament)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_start_tournament)
            .service(api_complete_tournament)
            .service(api_bracket)
            .service(api_standings)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_get_team)
            .service(api_update_team)
            .service(api_delete_team)
            .service(api_list_matches)
            .service(api_create_match)
            .service(api_get_match)
            .service(api_delete_match)
            .service(api_start_match)
            .service(api_update_score)
            .service(api_complete_match)
            .service(api_schedule_match)
            .service(api_overview)
            .service(api_team_leaderboard)
            .service(api_statistics_standings)
            .service(api_player_leaderboard)
            .service(api_recent_matches)
    })
    .bind(bind)?
    .run()
    .await
}
