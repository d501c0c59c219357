use crate::types::ContentPageDetail;

const CONTENT_UPLOADS: &str = "/uploads/content/";
const CONTENT_IMAGES: &str = "/uploads/content/images/";
const CONTENT_DOWNLOADS: &str = "/uploads/content/downloads/";

/// Point a content image at the images upload folder unless it already is
pub fn image_url(url: &str) -> String {
    correct_upload(url, CONTENT_IMAGES)
}

/// Point a content download at the downloads upload folder unless it already is
pub fn download_url(url: &str) -> String {
    correct_upload(url, CONTENT_DOWNLOADS)
}

fn correct_upload(url: &str, target: &str) -> String {
    if url.contains(target) {
        url.to_string()
    } else {
        url.replacen(CONTENT_UPLOADS, target, 1)
    }
}

/// Rewrite a page's gallery and download links to their upload folders
pub fn correct_page_urls(page: &mut ContentPageDetail) {
    for image in &mut page.gallery_images {
        image.image_url = image_url(&image.image_url);
    }
    for download in &mut page.downloads {
        if let Some(url) = download.download_url.as_mut() {
            *url = download_url(url);
        }
    }
}

/// Wrap-around position over a fixed-length list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    /// None for an empty list
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.len - 1) % self.len;
        self.index
    }

    /// Jump to `index`; out-of-range positions are ignored
    pub fn go_to(&mut self, index: usize) -> usize {
        if index < self.len {
            self.index = index;
        }
        self.index
    }

    /// The item under the cursor
    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.get(self.index)
    }
}
