//! Image acquisition.
//!
//! Scoring only sees the [`ImageSource`] trait. Local paths are read from disk, http(s) locators
//! go through [`HttpImageSource`]; [`LocatorImageSource`] dispatches between the two.

use crate::config::FetchConfig;
use fitx_core::FetchError;
use image::RgbImage;
use regex::{Regex, RegexBuilder};
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

const SUPPORTED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];
const USER_AGENT: &str = "Mozilla/5.0";
const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Firebase storage download URL: optional single subdomain, optional `:443`, one object with an
/// image extension, `alt=media` and at most a token.
static FIREBASE_URL: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(
        r"^https://([a-z0-9\-]+\.)?firebasestorage\.googleapis\.com(:443)?/v0/b/[^/]+/o/[^/]+\.(jpg|jpeg|png|webp)\?alt=media(&token=[^&]+)?$",
    )
    .case_insensitive(true)
    .build()
    .expect("firebase url regex must compile")
});

/// Something that turns a locator into pixels.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, locator: &str) -> Result<RgbImage, FetchError>;
}

/// Decode raw bytes and apply the minimum-dimension check.
pub fn decode_image(bytes: &[u8], locator: &str, min_dimension: u32) -> Result<RgbImage, FetchError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| FetchError::Decode {
            locator: locator.to_string(),
            reason: e.to_string(),
        })?
        .to_rgb8();
    check_dimensions(image, min_dimension)
}

fn check_dimensions(image: RgbImage, min_dimension: u32) -> Result<RgbImage, FetchError> {
    let (width, height) = image.dimensions();
    if width < min_dimension || height < min_dimension {
        return Err(FetchError::TooSmall {
            width,
            height,
            min: min_dimension,
        });
    }
    Ok(image)
}

pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Strip an explicit `:443` port so Firebase URLs compare in one form.
pub fn normalize_firebase_url(url: &str) -> String {
    url.replace(":443", "")
}

fn has_supported_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn is_firebase_url(url: &str) -> bool {
    FIREBASE_URL.is_match(url)
}

/// Accept Firebase storage download URLs, or plain http(s) URLs ending in an image extension.
pub fn validate_image_url(url: &str) -> bool {
    if is_firebase_url(url) {
        return true;
    }
    is_remote(url) && has_supported_extension(url)
}

/// Reads images from the local filesystem.
#[derive(Debug, Clone)]
pub struct FileImageSource {
    min_dimension: u32,
}

impl FileImageSource {
    pub fn new(min_dimension: u32) -> Self {
        Self { min_dimension }
    }
}

impl ImageSource for FileImageSource {
    fn fetch(&self, locator: &str) -> Result<RgbImage, FetchError> {
        let image = image::open(Path::new(locator))
            .map_err(|e| FetchError::Decode {
                locator: locator.to_string(),
                reason: e.to_string(),
            })?
            .to_rgb8();
        check_dimensions(image, self.min_dimension)
    }
}

/// Blocking HTTP downloads with URL and content validation.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    agent: ureq::Agent,
    min_dimension: u32,
}

impl HttpImageSource {
    pub fn new(config: &FetchConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            min_dimension: config.min_dimension,
        }
    }
}

impl ImageSource for HttpImageSource {
    fn fetch(&self, locator: &str) -> Result<RgbImage, FetchError> {
        let url = normalize_firebase_url(locator);
        if !validate_image_url(&url) {
            return Err(FetchError::InvalidLocator(url));
        }

        let network = |reason: String| FetchError::Network {
            locator: url.clone(),
            reason,
        };

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| network(e.to_string()))?;

        let content_type = response.content_type().to_string();
        if !(content_type.starts_with("image/") || content_type.contains("octet-stream")) {
            return Err(FetchError::ContentType {
                locator: url.clone(),
                content_type,
            });
        }

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_IMAGE_BYTES + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| network(e.to_string()))?;
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(network(format!("response exceeded {MAX_IMAGE_BYTES} bytes")));
        }

        decode_image(&bytes, &url, self.min_dimension)
    }
}

/// Routes http(s) locators to the network and everything else to disk.
#[derive(Debug, Clone)]
pub struct LocatorImageSource {
    files: FileImageSource,
    http: HttpImageSource,
}

impl LocatorImageSource {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            files: FileImageSource::new(config.min_dimension),
            http: HttpImageSource::new(config),
        }
    }
}

impl ImageSource for LocatorImageSource {
    fn fetch(&self, locator: &str) -> Result<RgbImage, FetchError> {
        if is_remote(locator) {
            self.http.fetch(locator)
        } else {
            self.files.fetch(locator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_validate_plain_urls() {
        assert!(validate_image_url("https://cdn.example.com/a/shirt.JPG"));
        assert!(validate_image_url("http://example.com/x.webp"));
        assert!(!validate_image_url("https://example.com/x.gif"));
        assert!(!validate_image_url("ftp://example.com/x.png"));
        assert!(!validate_image_url("/tmp/x.png"));
    }

    #[test]
    fn test_validate_firebase_urls() {
        let url = "https://firebasestorage.googleapis.com/v0/b/closet.appspot.com/o/top.png?alt=media&token=abc";
        assert!(validate_image_url(url));

        let with_port = "https://firebasestorage.googleapis.com:443/v0/b/closet.appspot.com/o/top.jpeg?alt=media";
        assert!(validate_image_url(with_port));
        assert_eq!(
            normalize_firebase_url(with_port),
            "https://firebasestorage.googleapis.com/v0/b/closet.appspot.com/o/top.jpeg?alt=media"
        );

        let no_media = "https://firebasestorage.googleapis.com/v0/b/closet.appspot.com/o/top.png?token=abc";
        assert!(!validate_image_url(no_media));

        let mixed_case = "https://FirebaseStorage.googleapis.com/v0/b/closet.appspot.com/o/top.PNG?alt=media&token=abc";
        assert!(validate_image_url(mixed_case));

        let subdomain = "https://eu.firebasestorage.googleapis.com/v0/b/closet.appspot.com/o/top.png?alt=media";
        assert!(validate_image_url(subdomain));
        let nested = "https://a.b.firebasestorage.googleapis.com/v0/b/closet.appspot.com/o/top.png?alt=media";
        assert!(!validate_image_url(nested));

        let extra_query = "https://firebasestorage.googleapis.com/v0/b/closet.appspot.com/o/top.png?alt=media&token=abc&x=1";
        assert!(!validate_image_url(extra_query));
        let media_prefix = "https://firebasestorage.googleapis.com/v0/b/closet.appspot.com/o/top.png?alt=mediafoo";
        assert!(!validate_image_url(media_prefix));
    }

    #[test]
    fn test_file_source_reads_and_checks_size() {
        let dir = tempfile::tempdir().unwrap();
        let big = dir.path().join("big.png");
        let small = dir.path().join("small.png");
        RgbImage::from_pixel(64, 64, Rgb([1, 2, 3])).save(&big).unwrap();
        RgbImage::from_pixel(10, 64, Rgb([1, 2, 3])).save(&small).unwrap();

        let source = FileImageSource::new(50);
        let image = source.fetch(big.to_str().unwrap()).unwrap();
        assert_eq!(image.dimensions(), (64, 64));

        assert!(matches!(
            source.fetch(small.to_str().unwrap()),
            Err(FetchError::TooSmall { width: 10, .. })
        ));
        assert!(matches!(
            source.fetch(dir.path().join("missing.png").to_str().unwrap()),
            Err(FetchError::Decode { .. })
        ));
    }

    #[test]
    fn test_http_source_rejects_invalid_url_without_network() {
        let source = HttpImageSource::new(&FetchConfig::default());
        assert!(matches!(
            source.fetch("https://example.com/not-an-image"),
            Err(FetchError::InvalidLocator(_))
        ));
    }
}
