// Copyright (c) 2026 rezky_nightky

pub const DEFAULT_PHOTOS: [&str; 3] = [
    "./src/img/1.jpg",
    "https://images.unsplash.com/photo-1500534314209-a25ddb2bd429?q=80&w=1600",
    "https://images.unsplash.com/photo-1491555103944-7c647fd857e6?q=80&w=1600",
];

#[derive(Clone, Debug)]
pub struct PhotoOverlay {
    photos: Vec<String>,
    next: usize,
    shown: Option<usize>,
}

impl PhotoOverlay {
    pub fn new(photos: Vec<String>) -> Self {
        let photos = if photos.is_empty() {
            DEFAULT_PHOTOS.iter().map(|s| s.to_string()).collect()
        } else {
            photos
        };
        Self {
            photos,
            next: 0,
            shown: None,
        }
    }

    pub fn count(&self) -> usize {
        self.photos.len()
    }

    pub fn is_visible(&self) -> bool {
        self.shown.is_some()
    }

    pub fn current(&self) -> Option<(usize, &str)> {
        self.shown.map(|i| (i, self.photos[i].as_str()))
    }

    pub fn show_next(&mut self) -> &str {
        let i = self.next;
        self.shown = Some(i);
        self.next = (i + 1) % self.photos.len();
        &self.photos[i]
    }

    pub fn close(&mut self) {
        self.shown = None;
    }
}
