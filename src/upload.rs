//! Turning a user-picked image file into a custom asset.
//!
//! [`validate`] rejects non-images and oversized files before anything is
//! decoded. [`UploadSession`] then walks the upload through processing,
//! naming and commit. A processing failure keeps the original preview so
//! the user can adjust options and retry, or cancel.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::config::StudioConfig;
use crate::cutout::{Cutout, CutoutError, RemovalOptions};
use crate::doc::{AssetId, NewCustomAsset};
use crate::store::SceneStore;

const MIB: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please select an image file")]
    NotAnImage { mime: String },
    #[error("Image must be smaller than {}MB", .limit / MIB)]
    TooLarge { size: u64, limit: u64 },
    #[error("Failed to process image. Please try again.")]
    Processing(#[source] CutoutError),
    #[error("Failed to reprocess image.")]
    Reprocessing(#[source] CutoutError),
    #[error("malformed data URL")]
    MalformedDataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("upload is not ready to save")]
    Incomplete,
}

/// A file as picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    /// Declared MIME type, e.g. `image/png`.
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Check MIME type and size against the configured limit.
///
/// # Errors
///
/// `NotAnImage` unless the MIME type starts with `image/`; `TooLarge` if the
/// file exceeds `config.upload_max_bytes`.
pub fn validate(file: &ImageFile, config: &StudioConfig) -> Result<(), UploadError> {
    if !file.mime.starts_with("image/") {
        return Err(UploadError::NotAnImage { mime: file.mime.clone() });
    }
    let size = u64::try_from(file.bytes.len()).unwrap_or(u64::MAX);
    if size > config.upload_max_bytes {
        return Err(UploadError::TooLarge { size, limit: config.upload_max_bytes });
    }
    Ok(())
}

/// File name without its last extension: `"lava-rock.final.png"` becomes `"lava-rock.final"`.
#[must_use]
pub fn default_asset_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem.to_owned(),
        _ => file_name.to_owned(),
    }
}

// =============================================================
// Data URLs
// =============================================================

#[must_use]
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// A decoded `data:<mime>;base64,<payload>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// # Errors
///
/// `MalformedDataUrl` for anything other than a base64 data URL, `Base64`
/// if the payload doesn't decode.
pub fn parse_data_url(url: &str) -> Result<DataUrl, UploadError> {
    let rest = url.strip_prefix("data:").ok_or(UploadError::MalformedDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(UploadError::MalformedDataUrl)?;
    let mime = meta.strip_suffix(";base64").ok_or(UploadError::MalformedDataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok(DataUrl { mime: mime.to_owned(), bytes })
}

// =============================================================
// Session
// =============================================================

/// Data URLs produced by one processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Processed {
    image: String,
    thumbnail: String,
}

/// One upload in progress.
#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    original: Option<String>,
    processed: Option<Processed>,
    name: String,
    options: RemovalOptions,
    error: Option<String>,
}

impl UploadSession {
    #[must_use]
    pub fn new(options: RemovalOptions) -> Self {
        Self { options, ..Self::default() }
    }

    /// Take a newly picked file: validate, keep it as the preview, and process it.
    ///
    /// Invalid files leave the session as it was apart from the error message.
    ///
    /// # Errors
    ///
    /// Validation errors, or `Processing` if decoding or keying fails.
    pub fn select_file(&mut self, file: &ImageFile, config: &StudioConfig) -> Result<(), UploadError> {
        if let Err(err) = validate(file, config) {
            tracing::warn!(name = %file.name, mime = %file.mime, error = %err, "upload rejected");
            self.error = Some(err.to_string());
            return Err(err);
        }
        self.original = Some(encode_data_url(&file.mime, &file.bytes));
        self.processed = None;
        self.name = default_asset_name(&file.name);
        self.error = None;
        self.run(&file.bytes, config, UploadError::Processing)
    }

    /// Re-run background removal on the kept original with the current options.
    ///
    /// # Errors
    ///
    /// `Incomplete` with no original, `Reprocessing` if keying fails.
    pub fn reprocess(&mut self, config: &StudioConfig) -> Result<(), UploadError> {
        let original = self.original.as_deref().ok_or(UploadError::Incomplete)?;
        let source = parse_data_url(original)?;
        self.error = None;
        self.run(&source.bytes, config, UploadError::Reprocessing)
    }

    fn run(
        &mut self,
        bytes: &[u8],
        config: &StudioConfig,
        wrap: fn(CutoutError) -> UploadError,
    ) -> Result<(), UploadError> {
        let result = Cutout::from_bytes(bytes, &self.options, config.thumbnail_max).and_then(|c| c.to_png());
        match result {
            Ok((image, thumbnail)) => {
                tracing::debug!(name = %self.name, bytes = image.len(), "upload processed");
                self.processed = Some(Processed {
                    image: encode_data_url("image/png", &image),
                    thumbnail: encode_data_url("image/png", &thumbnail),
                });
                Ok(())
            }
            Err(cause) => {
                tracing::warn!(name = %self.name, error = %cause, "upload processing failed");
                let err = wrap(cause);
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Save the processed upload as a custom asset and reset the session.
    ///
    /// `created_at` is milliseconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// `Incomplete` unless there is an original, a processed result and a
    /// non-blank name. The session is left untouched in that case.
    pub fn commit(&mut self, store: &mut SceneStore, created_at: i64) -> Result<AssetId, UploadError> {
        if !self.is_ready() {
            return Err(UploadError::Incomplete);
        }
        let (Some(original), Some(processed)) = (self.original.take(), self.processed.take()) else {
            return Err(UploadError::Incomplete);
        };
        let id = store.add_custom_asset(NewCustomAsset {
            name: self.name.trim().to_owned(),
            original_image: original,
            processed_image: processed.image,
            thumbnail: processed.thumbnail,
            created_at,
        });
        self.cancel();
        Ok(id)
    }

    /// Drop the upload in progress. Removal options are kept.
    pub fn cancel(&mut self) {
        *self = Self::new(self.options);
    }

    // --- Accessors ---

    pub fn set_options(&mut self, options: RemovalOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn options(&self) -> RemovalOptions {
        self.options
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn original_preview(&self) -> Option<&str> {
        self.original.as_deref()
    }

    #[must_use]
    pub fn processed_preview(&self) -> Option<&str> {
        self.processed.as_ref().map(|p| p.image.as_str())
    }

    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.processed.as_ref().map(|p| p.thumbnail.as_str())
    }

    /// User-facing message from the last failed step.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether `commit` would succeed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.original.is_some() && self.processed.is_some() && !self.name.trim().is_empty()
    }
}
