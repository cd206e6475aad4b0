/// Album API routes
use crate::{
    error::{FormRejection, Result},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use shelf_core::{
    catalog, Album, AlbumField, AlbumFields, AlbumId, FieldErrorKind, ShelfError, ValidationErrors,
};

/// The album form as submitted
///
/// Every field arrives as text. Numbers may be left empty; tracks are one per
/// line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlbumForm {
    pub title: String,
    pub artist: String,
    pub year: String,
    pub running_time: String,
    pub tracks: String,
}

impl AlbumForm {
    /// Parse and validate the submitted text
    pub fn parse(&self) -> std::result::Result<AlbumFields, ValidationErrors<AlbumField>> {
        let mut errors = ValidationErrors::new();

        let year = parse_number(&self.year).unwrap_or_else(|_| {
            errors.add(
                AlbumField::Year,
                FieldErrorKind::NotANumber,
                "Year must be a whole number",
            );
            None
        });
        let running_time = parse_number(&self.running_time).unwrap_or_else(|_| {
            errors.add(
                AlbumField::RunningTime,
                FieldErrorKind::NotANumber,
                "Running time must be a whole number",
            );
            None
        });

        let mut fields = AlbumFields {
            title: self.title.clone(),
            artist: self.artist.clone(),
            year,
            running_time,
            tracks: self.tracks.lines().map(str::to_string).collect(),
        };
        fields.normalize();

        if let Err(field_errors) = fields.validate() {
            errors.merge(field_errors);
        }

        errors.into_result().map(|()| fields)
    }
}

/// Empty text is "not set"; anything else must be an integer
fn parse_number(text: &str) -> std::result::Result<Option<i32>, std::num::ParseIntError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IntentForm {
    #[serde(default)]
    pub intent: String,
}

#[derive(Debug, Serialize)]
pub struct AlbumListPage {
    pub albums: Vec<Album>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlbumPage {
    pub album: Album,
}

#[derive(Debug, Serialize)]
pub struct AlbumFormPage {
    pub values: AlbumForm,
}

fn album_location(id: &AlbumId) -> String {
    format!("/albums/{}", id)
}

/// GET /albums
pub async fn list_albums(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<AlbumListPage>> {
    let albums = catalog::list_albums(&*app_state.store, &user_id, query.q.as_deref()).await?;

    Ok(Json(AlbumListPage {
        albums,
        q: query.q,
    }))
}

/// GET /albums/new
pub async fn new_album_page(_user: AuthenticatedUser) -> Json<AlbumFormPage> {
    Json(AlbumFormPage {
        values: AlbumForm::default(),
    })
}

/// POST /albums/new
pub async fn create_album(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Form(form): Form<AlbumForm>,
) -> Result<Response> {
    let fields = match form.parse() {
        Ok(fields) => fields,
        Err(errors) => return Ok(FormRejection::invalid_album(errors, form).into_response()),
    };

    match catalog::create_album(&*app_state.store, &user_id, fields).await {
        Ok(album) => {
            tracing::info!("User {} created album {}", user_id, album.id);
            Ok(Redirect::to(&album_location(&album.id)).into_response())
        }
        Err(ShelfError::AlbumInvalid(errors)) => {
            Ok(FormRejection::invalid_album(errors, form).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /albums/:id
pub async fn get_album(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<AlbumPage>> {
    let album = catalog::get_owned_album(&*app_state.store, &AlbumId::new(id), &user_id).await?;
    Ok(Json(AlbumPage { album }))
}

/// POST /albums/:id
///
/// `intent=delete` removes the album; anything else shows it again.
pub async fn album_action(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<String>,
    Form(form): Form<IntentForm>,
) -> Result<Response> {
    let id = AlbumId::new(id);

    if form.intent == "delete" {
        catalog::delete_owned_album(&*app_state.store, &id, &user_id).await?;
        tracing::info!("User {} deleted album {}", user_id, id);
        return Ok(Redirect::to("/albums").into_response());
    }

    let album = catalog::get_owned_album(&*app_state.store, &id, &user_id).await?;
    Ok(Json(AlbumPage { album }).into_response())
}

/// GET /albums/:id/edit
pub async fn edit_album_page(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<AlbumPage>> {
    let album = catalog::get_owned_album(&*app_state.store, &AlbumId::new(id), &user_id).await?;
    Ok(Json(AlbumPage { album }))
}

/// POST /albums/:id/edit
pub async fn update_album(
    State(app_state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(id): Path<String>,
    Form(form): Form<AlbumForm>,
) -> Result<Response> {
    let id = AlbumId::new(id);

    // Missing and foreign albums fail before the form is looked at
    catalog::get_owned_album(&*app_state.store, &id, &user_id).await?;

    let fields = match form.parse() {
        Ok(fields) => fields,
        Err(errors) => return Ok(FormRejection::invalid_album(errors, form).into_response()),
    };

    match catalog::update_owned_album(&*app_state.store, &id, &user_id, fields).await {
        Ok(album) => Ok(Redirect::to(&album_location(&album.id)).into_response()),
        Err(ShelfError::AlbumInvalid(errors)) => {
            Ok(FormRejection::invalid_album(errors, form).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
