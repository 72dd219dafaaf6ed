use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
}

pub async fn game_modes(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    let modes = &state.pipeline.reference().game_modes;
    Json(
        modes
            .iter()
            .map(|(id, name)| CatalogEntry {
                id,
                name: name.to_string(),
            })
            .collect(),
    )
}

pub async fn heroes(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    let heroes = &state.pipeline.reference().heroes;
    Json(
        heroes
            .iter()
            .map(|(id, name)| CatalogEntry {
                id,
                name: name.to_string(),
            })
            .collect(),
    )
}
