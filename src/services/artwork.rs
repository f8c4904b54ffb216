/// Image preloader: downloads and fully decodes artwork before a round is shown
use async_trait::async_trait;
use tracing::debug;

use crate::core::round::Artwork;
use crate::error::PreloadError;

#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Resolves only once the image is decoded and ready to draw.
    async fn load(&self, url: &str) -> Result<Artwork, PreloadError>;
}

pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Decode PNG/JPEG bytes into RGBA
pub fn decode_artwork(bytes: &[u8]) -> Result<Artwork, PreloadError> {
    let image = image::load_from_memory(bytes)?.into_rgba8();
    Ok(Artwork::new(image))
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> Result<Artwork, PreloadError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!(%url, len = bytes.len(), "artwork downloaded");

        tokio::task::spawn_blocking(move || decode_artwork(&bytes)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    #[test]
    fn decodes_png_bytes() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        source
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();

        let artwork = decode_artwork(&bytes).unwrap();
        assert_eq!((artwork.width(), artwork.height()), (3, 2));
        assert_eq!(artwork.image().get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_artwork(b"definitely not a png"),
            Err(PreloadError::Decode { .. })
        ));
    }
}
