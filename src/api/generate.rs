use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::llm;
use crate::models::{
    GeneratedRecipe, ImageUpload, IngredientItem, IngredientsResponse, RecipeDetailsRequest,
};
use crate::state::AppState;

/// POST /detect-ingredients - Identify food items in base64 photos
pub async fn detect_ingredients(
    State(state): State<AppState>,
    Json(upload): Json<ImageUpload>,
) -> Json<IngredientsResponse> {
    if upload.images.is_empty() {
        return Json(IngredientsResponse::failure(
            "No images found",
            "At least one image is required",
        ));
    }

    let Ok(_permit) = state.llm_semaphore.acquire().await else {
        return Json(IngredientsResponse::failure(
            "Error analyzing the images",
            "LLM service is shutting down",
        ));
    };
    let response =
        llm::ingredients::detect_ingredients(&state.http_client, &state.llm_config, &upload.images)
            .await;
    tracing::info!(
        "Ingredient detection over {} image(s): {}",
        upload.images.len(),
        response.message
    );
    Json(response)
}

/// POST /recipes/generate/list - Suggest recipe titles for ingredients
pub async fn generate_recipe_list(
    State(state): State<AppState>,
    Json(ingredients): Json<Vec<IngredientItem>>,
) -> Json<Vec<String>> {
    let names: Vec<String> = ingredients.into_iter().map(|i| i.name).collect();

    let Ok(_permit) = state.llm_semaphore.acquire().await else {
        return Json(vec![llm::suggest::GENERATION_FAILED.to_string()]);
    };
    Json(llm::suggest::suggest_titles(&state.http_client, &state.llm_config, &names).await)
}

/// POST /recipes/generate/details - Full recipe for a title and ingredients
pub async fn generate_recipe_details(
    State(state): State<AppState>,
    Json(req): Json<RecipeDetailsRequest>,
) -> Result<Json<GeneratedRecipe>, (StatusCode, String)> {
    let (Some(title), Some(ingredients)) = (req.recipe_title, req.ingredients) else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Recipe title and ingredients are required".to_string(),
        ));
    };
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Recipe title and ingredients are required".to_string(),
        ));
    }

    let names: Vec<String> = ingredients.iter().map(|i| i.name().to_string()).collect();

    let _permit = state.llm_semaphore.acquire().await.map_err(|_| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "LLM service is shutting down".to_string(),
        )
    })?;
    let recipe =
        llm::details::generate_details(&state.http_client, &state.llm_config, &title, &names).await;
    Ok(Json(recipe))
}
