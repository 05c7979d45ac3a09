use std::future::Future;
use std::io::Cursor;
use std::time::Duration;

use bytes::Bytes;
use campusfix_config::{config, FilesCompression};
use campusfix_result::{create_error, Result};
use exif::Reader;
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, ImageReader};
use tokio::time::Instant;

use crate::UploadFile;

/// Content type of re-encoded photos
pub const COMPRESSED_MIME_TYPE: &str = "image/jpeg";

/// Limits applied to photos before they are uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOptions {
    /// Maximum width of the output (px)
    pub max_width: u32,
    /// Maximum height of the output (px)
    pub max_height: u32,
    /// JPEG quality between 0 and 1
    pub quality: f32,
    /// Files smaller than this are returned untouched
    pub skip_below_bytes: usize,
    /// Deadline after which the original file is used
    pub timeout: Duration,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        CompressionOptions {
            max_width: 1024,
            max_height: 1024,
            quality: 0.8,
            skip_below_bytes: 500 * 1024,
            timeout: Duration::from_secs(10),
        }
    }
}

impl From<FilesCompression> for CompressionOptions {
    fn from(value: FilesCompression) -> Self {
        CompressionOptions {
            max_width: value.max_width,
            max_height: value.max_height,
            quality: value.quality,
            skip_below_bytes: value.skip_below_bytes,
            timeout: Duration::from_secs(value.timeout),
        }
    }
}

impl CompressionOptions {
    /// Options from the `[files.compression]` section of the configuration
    pub async fn from_config() -> CompressionOptions {
        config().await.files.compression.into()
    }

    /// Quality on the 1-100 scale used by the JPEG encoder
    fn jpeg_quality(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// Dimensions that fit inside `max_width` x `max_height` with the aspect ratio preserved
///
/// Images that already fit are never enlarged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let max_width = max_width.max(1);
    let max_height = max_height.max(1);

    if width == 0 || height == 0 {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );

    if scale >= 1.0 {
        return (width, height);
    }

    (
        ((width as f64 * scale).round() as u32).clamp(1, max_width),
        ((height as f64 * scale).round() as u32).clamp(1, max_height),
    )
}

/// Shrink and re-encode a photo before upload
///
/// This never fails: small files, files that are not images, and anything
/// that cannot be decoded or encoded in time are returned as they are.
pub async fn compress_image(file: UploadFile, options: &CompressionOptions) -> UploadFile {
    if file.size() < options.skip_below_bytes {
        tracing::debug!(
            "Skipping compression of {} ({} bytes is below the threshold)",
            file.name,
            file.size()
        );
        return file;
    }

    // Cheap probe so non-images never reach the decoder
    if imagesize::image_type(&file.data).is_err() {
        tracing::debug!("Skipping compression of {}, not an image", file.name);
        return file;
    }

    let input = file.clone();
    let worker_options = options.clone();
    let work = async move {
        tokio::task::spawn_blocking(move || reencode(&input, &worker_options))
            .await
            .map_err(|err| {
                tracing::warn!("Compression worker failed: {err:?}");
                create_error!(ImageProcessingFailed)
            })?
    };

    race_compression(file, options.timeout, work).await
}

/// Race compression against the deadline, falling back to the original file
pub(crate) async fn race_compression<F>(original: UploadFile, timeout: Duration, work: F) -> UploadFile
where
    F: Future<Output = Result<UploadFile>>,
{
    let now = Instant::now();

    match tokio::time::timeout(timeout, work).await {
        Ok(Ok(compressed)) => {
            let ratio = compressed.size() as f32 / original.size().max(1) as f32;
            tracing::info!(
                "Compressed {} from {} to {} bytes ({:.2}%) in {:?}",
                original.name,
                original.size(),
                compressed.size(),
                ratio * 100.0,
                Instant::now() - now
            );

            compressed
        }
        Ok(Err(err)) => {
            tracing::warn!("Uploading {} uncompressed: {:?}", original.name, err.error_type);
            original
        }
        Err(_) => {
            tracing::warn!(
                "Uploading {} uncompressed: compression took longer than {timeout:?}",
                original.name
            );
            original
        }
    }
}

/// Decode, orient, resize and encode as JPEG
fn reencode(file: &UploadFile, options: &CompressionOptions) -> Result<UploadFile> {
    let image = ImageReader::new(Cursor::new(&file.data[..]))
        .with_guessed_format()
        .map_err(|_| create_error!(ImageProcessingFailed))?
        .decode()
        .map_err(|err| {
            tracing::debug!("Failed to decode {}: {err:?}", file.name);
            create_error!(ImageProcessingFailed)
        })?;

    let image = apply_orientation(image, read_orientation(&file.data));

    let (width, height) = fit_within(
        image.width(),
        image.height(),
        options.max_width,
        options.max_height,
    );

    let image = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let image = image.to_rgb8();

    let mut buf: Vec<u8> = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, options.jpeg_quality())
        .encode_image(&image)
        .map_err(|err| {
            tracing::debug!("Failed to encode {}: {err:?}", file.name);
            create_error!(ImageProcessingFailed)
        })?;

    Ok(UploadFile {
        name: file.name.clone(),
        content_type: COMPRESSED_MIME_TYPE.to_owned(),
        data: Bytes::from(buf),
    })
}

/// EXIF orientation of the photo, 0 if absent
fn read_orientation(buf: &[u8]) -> u32 {
    let mut cursor = Cursor::new(buf);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => match exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY) {
            Some(orientation) => orientation.value.get_uint(0).unwrap_or_default(),
            _ => 0,
        },
        _ => 0,
    }
}

/// Rotate pixels so the re-encoded photo looks the same without EXIF data
///
/// See https://jdhao.github.io/2019/07/31/image_rotation_exif_info/
fn apply_orientation(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.rotate180().fliph(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}
