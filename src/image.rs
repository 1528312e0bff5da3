//! Random image references and the scene drawn for them in the terminal.

use rand::{rngs::StdRng, Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, warn};

const IMAGE_BASE_URL: &str = "https://picsum.photos/800/600";
const SEED_RANGE: u32 = 100_000;

/// One randomly sourced image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub seed: u32,
    pub timestamp_ms: i64,
    /// Set once the primary request failed and the grayscale variant is in use
    pub grayscale: bool,
}

impl ImageRef {
    pub fn new(seed: u32, timestamp_ms: i64) -> Self {
        Self {
            seed,
            timestamp_ms,
            grayscale: false,
        }
    }

    pub fn primary_url(&self) -> String {
        format!(
            "{}?random={}&t={}",
            IMAGE_BASE_URL, self.seed, self.timestamp_ms
        )
    }

    pub fn fallback_url(&self) -> String {
        format!("{}?grayscale&{}", IMAGE_BASE_URL, self.timestamp_ms)
    }

    /// URL of the variant currently shown
    pub fn url(&self) -> String {
        if self.grayscale {
            self.fallback_url()
        } else {
            self.primary_url()
        }
    }

    pub fn scene(&self) -> Scene {
        Scene::generate(self.seed, self.grayscale)
    }
}

pub trait ImageSource {
    fn next_image(&mut self) -> ImageRef;
}

/// Picsum-style source: random seed plus a millisecond cache-buster
#[derive(Debug, Default)]
pub struct PicsumSource;

impl ImageSource for PicsumSource {
    fn next_image(&mut self) -> ImageRef {
        let seed = rand::thread_rng().gen_range(0..SEED_RANGE);
        ImageRef::new(seed, chrono::Utc::now().timestamp_millis())
    }
}

/// Deterministic source for tests: seeds count up from the given start
#[derive(Debug, Default)]
pub struct SequentialSource {
    next_seed: u32,
}

impl SequentialSource {
    pub fn starting_at(seed: u32) -> Self {
        Self { next_seed: seed }
    }
}

impl ImageSource for SequentialSource {
    fn next_image(&mut self) -> ImageRef {
        let image = ImageRef::new(self.next_seed, i64::from(self.next_seed));
        self.next_seed = self.next_seed.wrapping_add(1);
        image
    }
}

#[derive(Debug, Error)]
#[error("could not open image {url} or its grayscale fallback: {source}")]
pub struct ImageOpenError {
    pub url: String,
    #[source]
    pub source: std::io::Error,
}

/// Something that can show a remote image URL, e.g. a web browser
pub trait ImageOpener {
    fn open(&self, url: &str) -> std::io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserOpener;

impl ImageOpener for BrowserOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        if !webbrowser::Browser::is_available() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no web browser available",
            ));
        }
        webbrowser::open(url)
    }
}

/// Open the image, falling back once to the grayscale variant.
///
/// On fallback the image is marked grayscale so later renders match what was
/// opened.
pub fn open_with_fallback(
    image: &mut ImageRef,
    opener: &dyn ImageOpener,
) -> Result<(), ImageOpenError> {
    let primary = image.primary_url();
    match opener.open(&primary) {
        Ok(()) => {
            debug!(url = %primary, "opened image");
            Ok(())
        }
        Err(err) => {
            warn!(url = %primary, error = %err, "image failed to load, using fallback");
            image.grayscale = true;
            let fallback = image.fallback_url();
            opener.open(&fallback).map_err(|source| ImageOpenError {
                url: primary,
                source,
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn gray(&self) -> Rgb {
        let luma = (u32::from(self.0) * 299 + u32::from(self.1) * 587 + u32::from(self.2) * 114)
            / 1000;
        let l = luma as u8;
        Rgb(l, l, l)
    }
}

/// A rectangle in unit coordinates (0.0..=1.0 on both axes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub color: Rgb,
}

impl Shape {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// What the terminal draws in place of the photo: a background and a handful
/// of colored blocks, fully determined by the seed.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Rgb,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn generate(seed: u32, grayscale: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        let color = |rng: &mut StdRng| {
            let c = Rgb(rng.gen(), rng.gen(), rng.gen());
            if grayscale {
                c.gray()
            } else {
                c
            }
        };

        let background = color(&mut rng);
        let count = rng.gen_range(3..=6);
        let shapes = (0..count)
            .map(|_| {
                let w = rng.gen_range(0.1..0.45);
                let h = rng.gen_range(0.1..0.45);
                Shape {
                    x: rng.gen_range(0.0..1.0 - w),
                    y: rng.gen_range(0.0..1.0 - h),
                    w,
                    h,
                    color: color(&mut rng),
                }
            })
            .collect();

        Self { background, shapes }
    }

    /// Color at a unit coordinate; later shapes are drawn on top
    pub fn color_at(&self, x: f64, y: f64) -> Rgb {
        self.shapes
            .iter()
            .rev()
            .find(|s| s.contains(x, y))
            .map(|s| s.color)
            .unwrap_or(self.background)
    }
}
