//! Audio-to-minutes endpoint

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::debug;

use crate::domain::audio::AudioUpload;
use crate::domain::minutes::Minutes;

use super::{ApiError, ApiResult, AppState};

/// Multipart field carrying the recording
pub const AUDIO_FIELD: &str = "audio_file";

/// POST /whisper/process-audio/
///
/// Returns `{"full_text", "summary"}`; see [`ApiError`] for failures.
pub async fn process_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Minutes>> {
    let upload = read_audio_field(&mut multipart).await?;
    let minutes = state
        .generator
        .generate(upload, state.shutdown.child_token())
        .await?;
    Ok(Json(minutes))
}

/// Take the first `audio_file` part; other parts are skipped
async fn read_audio_field(multipart: &mut Multipart) -> ApiResult<AudioUpload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            debug!(field = field.name().unwrap_or("-"), "Skipping form field");
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await?;

        return Ok(AudioUpload::from_part(
            data.to_vec(),
            content_type.as_deref(),
            file_name.as_deref(),
        ));
    }

    Err(ApiError::MissingField(AUDIO_FIELD))
}
