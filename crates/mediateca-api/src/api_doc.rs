//! OpenAPI document for the archive API.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::albums::CreateAlbumRequest;
use crate::handlers::texts::UpdateTextRequest;
use crate::handlers::uploads::UploadResponse;
use mediateca_core::models::{
    AudioAlbumResponse, AudioResponse, AudioTrackResponse, TextCategory, TextResponse, UploadForm,
    UploadKind, VideoResponse, VttKind, VttTrackResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "mediateca",
        description = "Media-upload archive backend: texts, videos, audio, albums, and VTT tracks"
    ),
    paths(
        crate::handlers::texts::upload_text,
        crate::handlers::texts::list_texts,
        crate::handlers::texts::get_text,
        crate::handlers::texts::update_text,
        crate::handlers::texts::delete_text,
        crate::handlers::videos::upload_video,
        crate::handlers::videos::list_videos,
        crate::handlers::videos::get_video,
        crate::handlers::videos::delete_video,
        crate::handlers::vtt_tracks::upload_vtt_track,
        crate::handlers::vtt_tracks::list_vtt_tracks,
        crate::handlers::vtt_tracks::delete_vtt_track,
        crate::handlers::audios::upload_audio,
        crate::handlers::audios::list_audio,
        crate::handlers::audios::get_audio,
        crate::handlers::audios::delete_audio,
        crate::handlers::albums::create_album,
        crate::handlers::albums::list_albums,
        crate::handlers::albums::get_album,
        crate::handlers::albums::delete_album,
        crate::handlers::albums::upload_track,
        crate::handlers::albums::delete_track,
        crate::handlers::uploads::get_upload,
        crate::handlers::uploads::download_upload,
    ),
    components(schemas(
        TextResponse,
        VideoResponse,
        AudioResponse,
        AudioAlbumResponse,
        AudioTrackResponse,
        VttTrackResponse,
        UploadResponse,
        UpdateTextRequest,
        CreateAlbumRequest,
        ErrorResponse,
        UploadForm,
        UploadKind,
        TextCategory,
        VttKind,
    )),
    tags(
        (name = "texts", description = "Text uploads (pdf)"),
        (name = "videos", description = "Video uploads (mp4) and their VTT tracks"),
        (name = "audio", description = "Standalone audio uploads (mp3)"),
        (name = "audio-albums", description = "Audio albums and their tracks"),
        (name = "uploads", description = "Kind-agnostic upload access"),
    )
)]
pub struct ApiDoc;
