use std::sync::Arc;

use chrono::Local;
use rayon::prelude::*;
use tokio::task;
use tracing::{debug, info, warn};

use crate::{
    compose::{GridLayout, ThemeKind},
    error::{BoothError, CompositionError, Result},
    filters::{applicator, FilterRegistry},
    raster::{
        draw::{self, Rect, TextAlign},
        Frame,
    },
};

/// Logical cell size of one photo in the strip
pub const CELL_WIDTH: u32 = 300;
pub const CELL_HEIGHT: u32 = 225;

/// Padding between cells and around the border
pub const PADDING: u32 = 20;

/// Header band height, present only when header text is set
pub const HEADER_HEIGHT: u32 = 60;

/// Footer band height, always present
pub const FOOTER_HEIGHT: u32 = 40;

/// Corner radius of the photo cards
pub const CORNER_RADIUS: f32 = 10.0;

/// Card border stroke width and color
pub const BORDER_WIDTH: f32 = 2.0;
pub const BORDER_COLOR: [u8; 4] = [0x44, 0x44, 0x44, 255];

/// Header text color (gold)
pub const HEADER_COLOR: [u8; 4] = [0xff, 0xd7, 0x00, 255];

/// Brand string drawn in the footer signature
pub const SIGNATURE: &str = "Snapshot";

/// Everything the composer needs besides the photos themselves
#[derive(Debug, Clone)]
pub struct StripSpec {
    pub layout: GridLayout,
    pub filter: String,
    pub theme: ThemeKind,
    pub header_text: Option<String>,
    pub show_timestamp: bool,
}

impl StripSpec {
    pub fn new(layout: GridLayout, filter: impl Into<String>) -> Self {
        Self {
            layout,
            filter: filter.into(),
            theme: ThemeKind::default(),
            header_text: None,
            show_timestamp: false,
        }
    }
}

/// Composes filtered photos into a single bordered grid strip
///
/// The composer follows a fixed pipeline per strip:
/// 1. Truncate the photo list to the layout's capacity (first-N, capture
///    order preserved)
/// 2. Filter and decode every remaining photo (parallel, draw order kept)
/// 3. Paint background, header band, rounded photo cards, footer signature
/// 4. Encode the canvas as a JPEG artifact
pub struct StripComposer {
    registry: Arc<FilterRegistry>,
    threads: Option<usize>,
}

impl StripComposer {
    /// Create a composer over a shared filter registry
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        Self {
            registry,
            threads: None,
        }
    }

    /// Limit the per-photo filtering pipeline to a fixed thread count
    pub fn with_threads(registry: Arc<FilterRegistry>, threads: usize) -> Self {
        Self {
            registry,
            threads: Some(threads.max(1)),
        }
    }

    /// Compose the strip and return the encoded JPEG artifact
    ///
    /// The pixel sweep runs off the async executor; individual photos that
    /// fail to decode are skipped (their card stays empty), never fatal.
    pub async fn compose(&self, photos: &[Vec<u8>], spec: &StripSpec) -> Result<Vec<u8>> {
        if photos.is_empty() {
            return Err(CompositionError::NoPhotos.into());
        }

        let photos = photos.to_vec();
        let spec = spec.clone();
        let registry = Arc::clone(&self.registry);
        let threads = self.threads;

        let artifact = task::spawn_blocking(move || {
            let run = || compose_blocking(&photos, &spec, &registry);
            match threads {
                Some(n) => rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| {
                        BoothError::from(CompositionError::InvalidParameters {
                            details: format!("thread pool: {e}"),
                        })
                    })?
                    .install(run),
                None => run(),
            }
        })
        .await
        .map_err(|e| {
            BoothError::from(CompositionError::OutputFailed {
                reason: format!("composition task failed: {e}"),
            })
        })??;

        Ok(artifact)
    }
}

/// Synchronous strip composition; the async wrapper above moves this off
/// the executor
fn compose_blocking(
    photos: &[Vec<u8>],
    spec: &StripSpec,
    registry: &FilterRegistry,
) -> Result<Vec<u8>> {
    let columns = spec.layout.columns();
    let rows = spec.layout.rows();
    let capacity = spec.layout.capacity() as usize;

    let photos = if photos.len() > capacity {
        info!(
            "dropping {} photo(s) beyond the {} layout capacity",
            photos.len() - capacity,
            spec.layout
        );
        &photos[..capacity]
    } else {
        photos
    };

    let header_text = spec
        .header_text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let header_height = if header_text.is_some() { HEADER_HEIGHT } else { 0 };

    let width = columns * CELL_WIDTH + (columns + 1) * PADDING;
    let height = header_height + rows * CELL_HEIGHT + (rows + 1) * PADDING + FOOTER_HEIGHT;

    info!(
        "composing {} photo(s) into a {} strip ({}x{})",
        photos.len(),
        spec.layout,
        width,
        height
    );

    let theme = spec.theme.colors();
    let mut canvas = Frame::new_filled(width, height, theme.background);

    if let Some(text) = header_text {
        let baseline = (PADDING + 30) as f32;
        draw::draw_text(&mut canvas, text, width as f32 / 2.0, baseline, 24.0, HEADER_COLOR, TextAlign::Center);
        // second pass, slightly offset, stands in for the bold face
        draw::draw_text(&mut canvas, text, width as f32 / 2.0 + 0.75, baseline, 24.0, HEADER_COLOR, TextAlign::Center);
    }

    // Filter every photo up front; rayon keeps the collected order stable
    // so draw order still matches capture order
    let cells: Vec<Option<Frame>> = photos
        .par_iter()
        .enumerate()
        .map(|(index, bytes)| match applicator::decode_frame(bytes) {
            Ok(frame) => match applicator::apply_filter_to_frame(&frame, &spec.filter, registry) {
                Ok(filtered) => Some(filtered),
                Err(e) => {
                    warn!("filter failed for photo {}: {}, using original", index, e);
                    Some(frame)
                }
            },
            Err(e) => {
                warn!("skipping undecodable photo {}: {}", index, e);
                None
            }
        })
        .collect();

    for (index, cell) in cells.iter().enumerate() {
        let row = index as u32 / columns;
        let col = index as u32 % columns;
        let x = PADDING + col * (CELL_WIDTH + PADDING);
        let y = header_height + PADDING + row * (CELL_HEIGHT + PADDING);
        let rect = Rect::new(x as f32, y as f32, CELL_WIDTH as f32, CELL_HEIGHT as f32);

        draw::fill_rounded_rect(&mut canvas, rect, CORNER_RADIUS, [255, 255, 255, 255]);
        if let Some(frame) = cell {
            draw::draw_clipped(&mut canvas, frame, rect, CORNER_RADIUS);
        }
        draw::stroke_rounded_rect(&mut canvas, rect, CORNER_RADIUS, BORDER_WIDTH, BORDER_COLOR);
        debug!("cell {} drawn at ({}, {})", index, x, y);
    }

    let signature = if spec.show_timestamp {
        let now = Local::now();
        format!("{} \u{2022} {}", SIGNATURE, now.format("%Y-%m-%d %H:%M:%S"))
    } else {
        SIGNATURE.to_string()
    };
    draw::draw_text(
        &mut canvas,
        &signature,
        width as f32 / 2.0,
        (height - PADDING) as f32,
        16.0,
        theme.text,
        TextAlign::Center,
    );

    applicator::encode_jpeg(&canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{applicator::encode_jpeg, decode_frame};

    fn solid_jpeg(color: [u8; 4]) -> Vec<u8> {
        encode_jpeg(&Frame::new_filled(80, 60, color)).unwrap()
    }

    fn assert_close(actual: [u8; 4], expected: [u8; 3], tolerance: i16, context: &str) {
        for c in 0..3 {
            let diff = (actual[c] as i16 - expected[c] as i16).abs();
            assert!(
                diff <= tolerance,
                "{context}: channel {c} off by {diff} (got {:?}, want {:?})",
                actual,
                expected
            );
        }
    }

    #[tokio::test]
    async fn test_three_photo_strip_order_and_geometry() {
        let photos = vec![
            solid_jpeg([255, 0, 0, 255]),
            solid_jpeg([0, 255, 0, 255]),
            solid_jpeg([0, 0, 255, 255]),
        ];
        let mut spec = StripSpec::new(GridLayout::OneByThree, "none");
        spec.header_text = Some("Test".to_string());

        let composer = StripComposer::new(Arc::new(FilterRegistry::new()));
        let artifact = composer.compose(&photos, &spec).await.unwrap();
        let strip = decode_frame(&artifact).unwrap();

        // 1 column, 3 rows, header band present, footer always present
        assert_eq!(strip.width(), CELL_WIDTH + 2 * PADDING);
        assert_eq!(
            strip.height(),
            HEADER_HEIGHT + 3 * CELL_HEIGHT + 4 * PADDING + FOOTER_HEIGHT
        );

        // cells appear in capture order, top to bottom
        let center_x = strip.width() / 2;
        let cell_center_y =
            |row: u32| HEADER_HEIGHT + PADDING + row * (CELL_HEIGHT + PADDING) + CELL_HEIGHT / 2;
        assert_close(strip.get_pixel(center_x, cell_center_y(0)), [255, 0, 0], 40, "row 0");
        assert_close(strip.get_pixel(center_x, cell_center_y(1)), [0, 255, 0], 40, "row 1");
        assert_close(strip.get_pixel(center_x, cell_center_y(2)), [0, 0, 255], 40, "row 2");

        // dark theme background outside the cards
        assert_close(strip.get_pixel(2, strip.height() - 2), [0x22, 0x22, 0x22], 24, "background");
    }

    #[tokio::test]
    async fn test_truncates_to_layout_capacity() {
        let photos = vec![
            solid_jpeg([255, 0, 0, 255]),
            solid_jpeg([0, 255, 0, 255]),
            solid_jpeg([0, 0, 255, 255]),
            solid_jpeg([255, 255, 0, 255]),
            solid_jpeg([255, 0, 255, 255]),
        ];
        let spec = StripSpec::new(GridLayout::TwoByTwo, "none");

        let composer = StripComposer::new(Arc::new(FilterRegistry::new()));
        let artifact = composer.compose(&photos, &spec).await.unwrap();
        let strip = decode_frame(&artifact).unwrap();

        // no header: 2 columns and 2 rows only
        assert_eq!(strip.width(), 2 * CELL_WIDTH + 3 * PADDING);
        assert_eq!(strip.height(), 2 * CELL_HEIGHT + 3 * PADDING + FOOTER_HEIGHT);

        // the fourth photo (yellow) lands in the last cell; the fifth is gone
        let x = PADDING + CELL_WIDTH + PADDING + CELL_WIDTH / 2;
        let y = PADDING + CELL_HEIGHT + PADDING + CELL_HEIGHT / 2;
        assert_close(strip.get_pixel(x, y), [255, 255, 0], 40, "cell 3");
    }

    #[tokio::test]
    async fn test_undecodable_photo_keeps_its_card() {
        let photos = vec![solid_jpeg([255, 0, 0, 255]), vec![0xba, 0xad]];
        let spec = StripSpec::new(GridLayout::OneByTwo, "none");

        let composer = StripComposer::new(Arc::new(FilterRegistry::new()));
        let artifact = composer.compose(&photos, &spec).await.unwrap();
        let strip = decode_frame(&artifact).unwrap();

        // the bad photo's card is still there, plain white
        let x = strip.width() / 2;
        let y = PADDING + CELL_HEIGHT + PADDING + CELL_HEIGHT / 2;
        assert_close(strip.get_pixel(x, y), [255, 255, 255], 24, "empty card");
    }

    #[tokio::test]
    async fn test_empty_session_is_an_error() {
        let composer = StripComposer::new(Arc::new(FilterRegistry::new()));
        let spec = StripSpec::new(GridLayout::OneByOne, "none");
        assert!(composer.compose(&[], &spec).await.is_err());
    }

    #[tokio::test]
    async fn test_filter_applies_to_cells() {
        let photos = vec![solid_jpeg([255, 0, 0, 255])];
        let spec = StripSpec::new(GridLayout::OneByOne, "grayscale");

        let composer = StripComposer::new(Arc::new(FilterRegistry::new()));
        let artifact = composer.compose(&photos, &spec).await.unwrap();
        let strip = decode_frame(&artifact).unwrap();

        let p = strip.get_pixel(strip.width() / 2, PADDING + CELL_HEIGHT / 2);
        let spread = p[0].max(p[1]).max(p[2]) - p[0].min(p[1]).min(p[2]);
        assert!(spread < 24, "cell should be gray, got {:?}", p);
    }
}
